pub mod nfce;

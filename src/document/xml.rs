//! Raw serde layout of an `nfeProc` document.
//!
//! Leaf values are kept as strings; numeric and date coercion happens in
//! [`super::parse`] so conversion errors can name the element they came from.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NfeProc {
    #[serde(rename = "NFe")]
    pub nfe: Nfe,
}

#[derive(Debug, Deserialize)]
pub struct Nfe {
    #[serde(rename = "infNFe")]
    pub inf_nfe: InfNfe,
}

#[derive(Debug, Deserialize)]
pub struct InfNfe {
    #[serde(rename = "@Id")]
    pub id: String,
    pub ide: Ide,
    pub emit: Emit,
    pub det: Vec<Det>,
    pub total: Total,
    pub pag: Pag,
}

#[derive(Debug, Deserialize)]
pub struct Ide {
    pub serie: String,
    #[serde(rename = "nNF")]
    pub n_nf: String,
    #[serde(rename = "dhEmi")]
    pub dh_emi: String,
}

#[derive(Debug, Deserialize)]
pub struct Emit {
    #[serde(rename = "CNPJ")]
    pub cnpj: String,
    #[serde(rename = "xNome")]
    pub x_nome: String,
    #[serde(rename = "enderEmit")]
    pub ender_emit: EnderEmit,
}

#[derive(Debug, Deserialize)]
pub struct EnderEmit {
    #[serde(rename = "xLgr")]
    pub x_lgr: String,
    pub nro: String,
    #[serde(rename = "xBairro")]
    pub x_bairro: String,
    #[serde(rename = "xMun")]
    pub x_mun: String,
    #[serde(rename = "UF")]
    pub uf: String,
}

#[derive(Debug, Deserialize)]
pub struct Det {
    pub prod: Prod,
    pub imposto: Option<Imposto>,
}

#[derive(Debug, Deserialize)]
pub struct Prod {
    #[serde(rename = "cProd")]
    pub c_prod: String,
    #[serde(rename = "xProd")]
    pub x_prod: String,
    #[serde(rename = "qCom")]
    pub q_com: String,
    #[serde(rename = "vUnCom")]
    pub v_un_com: String,
    #[serde(rename = "vProd")]
    pub v_prod: String,
}

#[derive(Debug, Deserialize)]
pub struct Imposto {
    #[serde(rename = "ICMS")]
    pub icms: Option<Icms>,
    #[serde(rename = "PIS")]
    pub pis: Option<Pis>,
    #[serde(rename = "COFINS")]
    pub cofins: Option<Cofins>,
}

/// One of the `ICMSxx` / `ICMSSNxxx` groups; only the fields the importer keeps.
#[derive(Debug, Deserialize)]
pub struct IcmsGroup {
    #[serde(rename = "CST")]
    pub cst: Option<String>,
    #[serde(rename = "CSOSN")]
    pub csosn: Option<String>,
    #[serde(rename = "vBC")]
    pub v_bc: Option<String>,
    #[serde(rename = "pICMS")]
    pub p_icms: Option<String>,
    #[serde(rename = "vICMS")]
    pub v_icms: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Icms {
    #[serde(rename = "ICMS00")]
    pub icms00: Option<IcmsGroup>,
    #[serde(rename = "ICMS02")]
    pub icms02: Option<IcmsGroup>,
    #[serde(rename = "ICMS10")]
    pub icms10: Option<IcmsGroup>,
    #[serde(rename = "ICMS15")]
    pub icms15: Option<IcmsGroup>,
    #[serde(rename = "ICMS20")]
    pub icms20: Option<IcmsGroup>,
    #[serde(rename = "ICMS30")]
    pub icms30: Option<IcmsGroup>,
    #[serde(rename = "ICMS40")]
    pub icms40: Option<IcmsGroup>,
    #[serde(rename = "ICMS51")]
    pub icms51: Option<IcmsGroup>,
    #[serde(rename = "ICMS53")]
    pub icms53: Option<IcmsGroup>,
    #[serde(rename = "ICMS60")]
    pub icms60: Option<IcmsGroup>,
    #[serde(rename = "ICMS61")]
    pub icms61: Option<IcmsGroup>,
    #[serde(rename = "ICMS70")]
    pub icms70: Option<IcmsGroup>,
    #[serde(rename = "ICMS90")]
    pub icms90: Option<IcmsGroup>,
    #[serde(rename = "ICMSPart")]
    pub icmspart: Option<IcmsGroup>,
    #[serde(rename = "ICMSST")]
    pub icmsst: Option<IcmsGroup>,
    #[serde(rename = "ICMSSN101")]
    pub icmssn101: Option<IcmsGroup>,
    #[serde(rename = "ICMSSN102")]
    pub icmssn102: Option<IcmsGroup>,
    #[serde(rename = "ICMSSN201")]
    pub icmssn201: Option<IcmsGroup>,
    #[serde(rename = "ICMSSN202")]
    pub icmssn202: Option<IcmsGroup>,
    #[serde(rename = "ICMSSN500")]
    pub icmssn500: Option<IcmsGroup>,
    #[serde(rename = "ICMSSN900")]
    pub icmssn900: Option<IcmsGroup>,
}

impl Icms {
    /// The variant group actually present, with its element name.
    ///
    /// `ICMSSN102` also carries CSOSN 103, 300 and 400; `ICMSSN202` carries 203;
    /// `ICMS40` carries CST 41 and 50.
    pub fn group(&self) -> Option<(&'static str, &IcmsGroup)> {
        [
            ("ICMS00", &self.icms00),
            ("ICMS02", &self.icms02),
            ("ICMS10", &self.icms10),
            ("ICMS15", &self.icms15),
            ("ICMS20", &self.icms20),
            ("ICMS30", &self.icms30),
            ("ICMS40", &self.icms40),
            ("ICMS51", &self.icms51),
            ("ICMS53", &self.icms53),
            ("ICMS60", &self.icms60),
            ("ICMS61", &self.icms61),
            ("ICMS70", &self.icms70),
            ("ICMS90", &self.icms90),
            ("ICMSPart", &self.icmspart),
            ("ICMSST", &self.icmsst),
            ("ICMSSN101", &self.icmssn101),
            ("ICMSSN102", &self.icmssn102),
            ("ICMSSN201", &self.icmssn201),
            ("ICMSSN202", &self.icmssn202),
            ("ICMSSN500", &self.icmssn500),
            ("ICMSSN900", &self.icmssn900),
        ]
        .into_iter()
        .find_map(|(name, group)| group.as_ref().map(|g| (name, g)))
    }
}

/// Shared shape of the PIS and COFINS rate groups (`*Aliq`, `*Outr`, `*NT`).
#[derive(Debug, Deserialize)]
pub struct ContributionGroup {
    #[serde(rename = "CST")]
    pub cst: String,
    #[serde(rename = "vBC")]
    pub v_bc: Option<String>,
    #[serde(rename = "pPIS", alias = "pCOFINS")]
    pub rate: Option<String>,
    #[serde(rename = "vPIS", alias = "vCOFINS")]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Pis {
    #[serde(rename = "PISAliq")]
    pub aliq: Option<ContributionGroup>,
    #[serde(rename = "PISOutr")]
    pub outr: Option<ContributionGroup>,
    #[serde(rename = "PISNT")]
    pub nt: Option<ContributionGroup>,
}

#[derive(Debug, Deserialize)]
pub struct Cofins {
    #[serde(rename = "COFINSAliq")]
    pub aliq: Option<ContributionGroup>,
    #[serde(rename = "COFINSOutr")]
    pub outr: Option<ContributionGroup>,
    #[serde(rename = "COFINSNT")]
    pub nt: Option<ContributionGroup>,
}

#[derive(Debug, Deserialize)]
pub struct Total {
    #[serde(rename = "ICMSTot")]
    pub icms_tot: IcmsTot,
}

/// Only the products total is kept; `vNF` and the charge/discount fields are ignored.
#[derive(Debug, Deserialize)]
pub struct IcmsTot {
    #[serde(rename = "vProd")]
    pub v_prod: String,
}

#[derive(Debug, Deserialize)]
pub struct Pag {
    #[serde(rename = "detPag")]
    pub det_pag: Vec<DetPag>,
}

#[derive(Debug, Deserialize)]
pub struct DetPag {
    #[serde(rename = "tPag")]
    pub t_pag: String,
    #[serde(rename = "vPag")]
    pub v_pag: String,
}

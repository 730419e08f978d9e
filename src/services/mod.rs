pub mod functional_patterns;
pub mod import_service;
pub mod source;

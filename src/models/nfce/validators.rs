use once_cell::sync::OnceCell;

use crate::{
    document::ACCESS_KEY_LEN,
    error::ImportError,
    services::functional_patterns::{validation_rules, Validator},
};

/// Validator for the access key left after stripping the `NFe` prefix
pub fn access_key_validator() -> Validator<String> {
    Validator::new()
        .rule(validation_rules::required("access_key"))
        .rule(validation_rules::exact_length("access_key", ACCESS_KEY_LEN))
        .rule(validation_rules::digits("access_key"))
}

/// Validate an access key candidate
pub fn validate_access_key(key: &String) -> Result<(), ImportError> {
    static ACCESS_KEY_VALIDATOR: OnceCell<Validator<String>> = OnceCell::new();
    ACCESS_KEY_VALIDATOR
        .get_or_init(access_key_validator)
        .validate(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_44_digits() {
        assert!(validate_access_key(&"35240112345678000199650010000012341234567890".to_string()).is_ok());
    }

    #[test]
    fn test_rejects_blank_key() {
        let err = validate_access_key(&String::new()).unwrap_err();
        assert!(err.to_string().contains("access_key is required"));
    }

    #[test]
    fn test_rejects_wrong_length_before_charset() {
        let err = validate_access_key(&"ABC".to_string()).unwrap_err();
        assert!(err.to_string().contains("exactly 44"));
    }
}

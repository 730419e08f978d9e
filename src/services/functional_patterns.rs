//! Functional Patterns for the Import Layer
//!
//! Provides the validation combinator used to check values pulled out of fiscal
//! documents before they reach the store. Rules are plain closures, so they can be
//! composed, reused across validators and tested in isolation.

use crate::error::{ImportError, ImportResult};
use std::marker::PhantomData;

/// Functional validation combinator
pub struct Validator<T> {
    rules: Vec<Box<dyn Fn(&T) -> ImportResult<()> + Send + Sync>>,
    _phantom: PhantomData<T>,
}

impl<T> Validator<T> {
    /// Create a new empty validator
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Add a validation rule
    pub fn rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&T) -> ImportResult<()> + Send + Sync + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    /// Validate the input against all rules, stopping at the first failure
    pub fn validate(&self, input: &T) -> ImportResult<()> {
        for rule in &self.rules {
            rule(input)?;
        }
        Ok(())
    }
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Common reusable validation rules
pub mod validation_rules {
    use super::{ImportError, ImportResult};
    use regex::Regex;
    use std::collections::HashMap;
    use std::sync::{OnceLock, RwLock};

    /// Validate that a string is not empty
    pub fn required(field_name: &'static str) -> impl Fn(&String) -> ImportResult<()> {
        move |value: &String| {
            if value.trim().is_empty() {
                Err(ImportError::validation(format!("{} is required", field_name)))
            } else {
                Ok(())
            }
        }
    }

    /// Validate that a string has exactly `len` characters
    pub fn exact_length(
        field_name: &'static str,
        len: usize,
    ) -> impl Fn(&String) -> ImportResult<()> {
        move |value: &String| {
            let count = value.chars().count();
            if count != len {
                Err(ImportError::validation(format!(
                    "{} must be exactly {} characters long, got {}",
                    field_name, len, count
                )))
            } else {
                Ok(())
            }
        }
    }

    /// Validate that a value matches a regex pattern
    pub fn pattern(
        field_name: &'static str,
        pattern: &'static str,
    ) -> impl Fn(&String) -> ImportResult<()> {
        move |value: &String| {
            static REGEX_CACHE: OnceLock<RwLock<HashMap<&'static str, Regex>>> = OnceLock::new();
            let cache = REGEX_CACHE.get_or_init(|| RwLock::new(HashMap::new()));

            let cached = cache
                .read()
                .ok()
                .and_then(|entries| entries.get(pattern).cloned());
            let regex = match cached {
                Some(regex) => regex,
                None => {
                    let regex = Regex::new(pattern).map_err(|e| {
                        ImportError::validation(format!("invalid pattern for {}: {}", field_name, e))
                    })?;
                    if let Ok(mut entries) = cache.write() {
                        entries.insert(pattern, regex.clone());
                    }
                    regex
                }
            };

            if !regex.is_match(value) {
                Err(ImportError::validation(format!(
                    "{} format is invalid",
                    field_name
                )))
            } else {
                Ok(())
            }
        }
    }

    /// Validate that a string contains only ASCII digits
    pub fn digits(field_name: &'static str) -> impl Fn(&String) -> ImportResult<()> {
        pattern(field_name, "^[0-9]*$")
    }
}

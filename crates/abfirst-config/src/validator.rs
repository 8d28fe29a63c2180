//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();
        Self::validate_ab_tests(config, &mut result);
        Self::validate_content(config, &mut result);
        result
    }

    fn validate_ab_tests(config: &Config, result: &mut ValidationResult) {
        let settings = &config.ab_tests;
        let host = settings.host.trim();

        if host.is_empty() {
            result.add_error(ValidationError::new("ab_tests.host", "Host cannot be empty"));
        } else {
            match url::Url::parse(host) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                _ => result.add_error(ValidationError::new(
                    "ab_tests.host",
                    "host must be an http:// or https:// URL",
                )),
            }
            if host.ends_with('/') {
                result.add_warning(ValidationWarning::new(
                    "ab_tests.host",
                    "Trailing slash is trimmed when building endpoint URLs",
                ));
            }
        }

        if settings.api_token.trim().is_empty() {
            result.add_error(ValidationError::new(
                "ab_tests.api_token",
                "API token cannot be empty",
            ));
        }
    }

    fn validate_content(config: &Config, result: &mut ValidationResult) {
        if config.content.origin.is_empty() {
            result.add_warning(ValidationWarning::new(
                "content.origin",
                "Origin is empty, cookie decorations will not say where they came from",
            ));
        }

        for (i, name) in config.content.extra_block_names.iter().enumerate() {
            if name.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("content.extra_block_names[{}]", i),
                    "Block name cannot be empty",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

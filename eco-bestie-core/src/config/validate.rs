//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.assistant.model.trim().is_empty() {
        errors.push("assistant.model must not be empty".to_string());
    }
    if config.assistant.max_tokens == 0 {
        errors.push("assistant.max_tokens must be > 0".to_string());
    }
    if !(0.0..=2.0).contains(&config.assistant.temperature) {
        errors.push("assistant.temperature must be in [0.0, 2.0]".to_string());
    }
    if config.assistant.persona.trim().is_empty() {
        errors.push("assistant.persona must not be empty".to_string());
    }
    if config.assistant.request_timeout_seconds == 0 {
        errors.push("assistant.request_timeout_seconds must be > 0".to_string());
    }

    if config.provider.api_base.trim().is_empty() {
        errors.push("provider.api_base must not be empty".to_string());
    }

    if let Some(path) = &config.catalog.path {
        if path.trim().is_empty() {
            errors.push("catalog.path must not be empty when set".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Config(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_defaults() {
        let config = Config::default();
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_validate_rejects_zero_max_tokens() {
        let mut config = Config::default();
        config.assistant.max_tokens = 0;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn test_validate_rejects_empty_persona() {
        let mut config = Config::default();
        config.assistant.persona = "  ".to_string();

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("persona"));
    }

    #[test]
    fn test_validate_rejects_empty_catalog_path() {
        let mut config = Config::default();
        config.catalog.path = Some(String::new());

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("catalog.path"));
    }
}

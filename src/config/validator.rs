use crate::config::Config;
use crate::error::{GeosiftError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_storage(config, &mut errors);
        Self::validate_embedding(config, &mut errors);
        Self::validate_ranking(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(GeosiftError::ConfigValidation { errors })
        }
    }

    fn validate_storage(config: &Config, errors: &mut Vec<ValidationError>) {
        // Note: directory existence is not checked here because paths may
        // contain ~ which needs expansion, and the data directory is created
        // on first save.
        if config.storage.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "storage.data_dir",
                "Data directory cannot be empty",
            ));
        }

        let file = &config.storage.snapshot_file;
        if file.is_empty() {
            errors.push(ValidationError::new(
                "storage.snapshot_file",
                "Snapshot file name cannot be empty",
            ));
        } else if file.contains('/') || file.contains('\\') {
            errors.push(ValidationError::new(
                "storage.snapshot_file",
                format!("Snapshot file must be a bare file name, got '{}'", file),
            ));
        }
    }

    fn validate_embedding(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.embedding.model.is_empty() {
            errors.push(ValidationError::new(
                "embedding.model",
                "Model name cannot be empty",
            ));
        }
    }

    fn validate_ranking(config: &Config, errors: &mut Vec<ValidationError>) {
        let weights = [
            ("ranking.full_text_weight", config.ranking.full_text_weight),
            ("ranking.well_info_weight", config.ranking.well_info_weight),
            ("ranking.technical_weight", config.ranking.technical_weight),
            ("ranking.keyword_weight", config.ranking.keyword_weight),
            ("ranking.semantic_weight", config.ranking.semantic_weight),
        ];
        for (path, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                errors.push(ValidationError::new(
                    path,
                    format!("Weight must be a non-negative number, got {}", weight),
                ));
            }
        }

        let credit = config.ranking.synonym_credit;
        if !credit.is_finite() || !(0.0..=1.0).contains(&credit) {
            errors.push(ValidationError::new(
                "ranking.synonym_credit",
                format!("Synonym credit must be between 0.0 and 1.0, got {}", credit),
            ));
        }
    }
}

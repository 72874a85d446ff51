use crate::config::ConfigError;
use crate::engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("No lease option available: {0}")]
    Unavailable(String),
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, LeaseOption};

    #[test]
    fn test_app_error_from_config_error() {
        let err: AppError = ConfigError::MissingEnv("OFFERS_PATH".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variable: OFFERS_PATH"
        );
    }

    #[test]
    fn test_app_error_from_engine_error() {
        let option = LeaseOption::new(10000, 36, Decimal::zero(), Decimal::from_u32(2500)).unwrap();
        let err: AppError = EngineError::BaselineNotIndexed(option).into();
        assert!(err.to_string().starts_with("Engine error: Baseline option"));
    }
}

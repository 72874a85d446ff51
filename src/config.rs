use crate::domain::{parse_amount, Decimal, SelectionTarget};
use crate::engine::DEFAULT_PREFERRED_PERIODS;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub offers_path: String,
    pub retail_price: Option<Decimal>,
    pub target: SelectionTarget,
    pub selection_mode: SelectionMode,
    pub preferred_periods: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Target,
    Cheapest,
    BestScore,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let offers_path = env_map
            .get("OFFERS_PATH")
            .cloned()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnv("OFFERS_PATH".to_string()))?;

        let retail_price = optional_amount(&env_map, "RETAIL_PRICE")?;
        if let Some(price) = retail_price {
            if !price.is_positive() {
                return Err(ConfigError::InvalidValue(
                    "RETAIL_PRICE".to_string(),
                    "must be greater than zero".to_string(),
                ));
            }
        }

        let target = SelectionTarget::new(
            optional_u32(&env_map, "TARGET_MILEAGE")?,
            optional_u32(&env_map, "TARGET_PERIOD")?,
            optional_amount(&env_map, "TARGET_UPFRONT")?,
        );

        let selection_mode = match env_map
            .get("SELECTION_MODE")
            .map(|s| s.as_str())
            .unwrap_or("target")
        {
            "target" => SelectionMode::Target,
            "cheapest" => SelectionMode::Cheapest,
            "best_score" => SelectionMode::BestScore,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SELECTION_MODE".to_string(),
                    format!("must be target, cheapest, or best_score, got {}", other),
                ))
            }
        };

        let preferred_periods = parse_preferred_periods_from_map(&env_map)?;

        Ok(Config {
            offers_path,
            retail_price,
            target,
            selection_mode,
            preferred_periods,
        })
    }
}

fn optional_u32(env_map: &HashMap<String, String>, key: &str) -> Result<Option<u32>, ConfigError> {
    match env_map.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .or_else(|| parse_amount(raw).and_then(|d| d.to_u32_exact()))
            .filter(|v| *v > 0)
            .map(Some)
            .ok_or_else(|| {
                ConfigError::InvalidValue(key.to_string(), "must be a positive integer".to_string())
            }),
    }
}

fn optional_amount(
    env_map: &HashMap<String, String>,
    key: &str,
) -> Result<Option<Decimal>, ConfigError> {
    match env_map.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_amount(raw)
            .filter(|d| !d.is_negative())
            .map(Some)
            .ok_or_else(|| {
                ConfigError::InvalidValue(key.to_string(), "must be a non-negative amount".to_string())
            }),
    }
}

fn parse_preferred_periods_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Vec<u32>, ConfigError> {
    let Some(raw) = env_map.get("PREFERRED_PERIODS") else {
        return Ok(DEFAULT_PREFERRED_PERIODS.to_vec());
    };

    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().ok().filter(|p| *p > 0).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "PREFERRED_PERIODS".to_string(),
                    format!("{} is not a positive number of months", s),
                )
            })
        })
        .collect()
}

use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::AppError;

pub const DEFAULT_PORT: &str = "5001";
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://huggingface.co/spaces/text-ashish/ai_service/get_recipe";
pub const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:5173,https://nutriscense-frontend.netlify.app";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: &str = "120";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub allowed_origins: Vec<String>,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|key| {
            env::var(key)
                .map_err(|_| {
                    warn!("Environment variable {key} not found, using default");
                })
                .ok()
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins = parse_origins(&load_raw(
            &lookup,
            "ALLOWED_ORIGINS",
            DEFAULT_ALLOWED_ORIGINS,
        ));
        if allowed_origins.is_empty() {
            return Err(AppError::Config(
                "ALLOWED_ORIGINS must name at least one origin".to_string(),
            ));
        }

        let timeout_secs: u64 = try_load(
            &lookup,
            "UPSTREAM_TIMEOUT_SECS",
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", DEFAULT_PORT)?,
            upstream_url: load_raw(&lookup, "UPSTREAM_URL", DEFAULT_UPSTREAM_URL),
            allowed_origins,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn load_raw<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    load_raw(lookup, key, default)
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid {key} value: {e}")))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

use std::sync::Arc;

use axum::http::HeaderValue;

use super::{
    config::Config,
    error::AppError,
    upstream::{HttpUpstream, Upstream},
};

pub struct RelayState {
    pub config: Config,
    pub allowed_origins: Vec<HeaderValue>,
    pub upstream: Arc<dyn Upstream>,
}

impl RelayState {
    pub fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let upstream = HttpUpstream::new(config.upstream_url.clone(), config.upstream_timeout)?;

        Self::with_upstream(config, Arc::new(upstream))
    }

    pub fn with_upstream(
        config: Config,
        upstream: Arc<dyn Upstream>,
    ) -> Result<Arc<Self>, AppError> {
        let allowed_origins = config
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|e| AppError::Config(format!("Invalid origin {origin}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Arc::new(Self {
            config,
            allowed_origins,
            upstream,
        }))
    }

    pub fn is_allowed_origin(&self, origin: &HeaderValue) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

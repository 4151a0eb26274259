use std::time::Duration;

use async_trait::async_trait;
use recipes::{RecipeRequest, RecipeResponse};
use reqwest::Client;
use tracing::debug;

use crate::error::FormError;

pub const DEFAULT_RELAY_URL: &str = "http://localhost:5001/api/recipe";

/// Transport between the form and the relay.
#[async_trait]
pub trait RecipeClient: Send + Sync {
    async fn fetch_recipe(&self, request: &RecipeRequest) -> Result<RecipeResponse, FormError>;
}

pub struct HttpRecipeClient {
    client: Client,
    url: String,
}

impl HttpRecipeClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FormError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RecipeClient for HttpRecipeClient {
    async fn fetch_recipe(&self, request: &RecipeRequest) -> Result<RecipeResponse, FormError> {
        debug!("POST {} for {:?}", self.url, request.query);

        let response = self.client.post(&self.url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FormError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

//! # Preference Form
//!
//! Command-line rendition of the NutriSense form.
//!
//! ## Flow
//!
//! 1. Inputs (query, dietary preference, health focus, allergens, nutrition
//!    targets) are loaded into a [`Form`].
//! 2. [`Form::submit`] builds a fresh [`recipes::RecipeRequest`] and posts it
//!    to the relay. A spinner runs while the request is pending.
//! 3. The recommendation text is rendered to HTML with
//!    [`recipes::format_markdown`] and printed with its latency, or written
//!    to a file.
//!
//! Any failure on the way shows the fixed apology message with a `-` latency.
//! Nothing is retried and nothing is cached between runs.
use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use recipes::{RecipeRequest, RecipeResponse, RenderOptions};

pub mod client;
pub mod error;
pub mod state;
pub mod utils;

pub use client::{DEFAULT_RELAY_URL, HttpRecipeClient, RecipeClient};
pub use error::FormError;
pub use state::Form;

pub struct Submission {
    pub fields: RecipeRequest,
    pub relay_url: String,
    pub timeout: Duration,
    pub options: RenderOptions,
    pub output: Option<PathBuf>,
}

pub async fn recommend(submission: Submission) -> Result<RecipeResponse, FormError> {
    let client = HttpRecipeClient::new(submission.relay_url, submission.timeout)?;
    let form = Form::new(submission.options);
    form.fill(submission.fields).await?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Finding Your Perfect Recipe...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let response = form.submit(&client).await;
    pb.finish_and_clear();

    let response = response?;
    utils::show_result(&response, submission.output.as_deref())?;

    Ok(response)
}

//! # Recipes
//!
//! Types shared by the relay and the form, plus the renderer that turns the
//! AI service's recommendation text into HTML.
//!
//! ## Payloads
//!
//! - [`RecipeRequest`]: query, dietary preference, health focus, allergens to
//!   exclude and three nutrition targets (max calories, min protein, max fat).
//!   Built fresh for every submission.
//! - [`RecipeResponse`]: recommendation text and latency in seconds. The form
//!   replaces the recommendation with rendered HTML before showing it.
//!
//! Missing request fields fall back to the same defaults as the AI service
//! (`"None"` selections, no allergens, zero targets).
pub mod blocks;
pub mod html;
pub mod markdown;
pub mod models;

pub use markdown::{RenderOptions, format_markdown, format_markdown_with};
pub use models::{Dietary, Health, Latency, RecipeRequest, RecipeResponse};

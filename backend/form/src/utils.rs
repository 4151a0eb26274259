use std::{fs, path::Path};

use recipes::RecipeResponse;

use crate::error::FormError;

/// Nutrition targets are never negative. Anything that is not a usable
/// number counts as "no target".
pub fn coerce_target(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// The AI service cannot answer an empty query with a recipe.
pub fn parse_query(text: &str) -> Result<String, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("query must not be blank".to_string());
    }

    Ok(text.to_string())
}

/// Parses a nutrition target typed by the user. Blank input means zero.
pub fn parse_target(text: &str) -> Result<f64, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    text.parse::<f64>()
        .map(coerce_target)
        .map_err(|_| format!("'{text}' is not a number"))
}

pub fn render_result(response: &RecipeResponse) -> String {
    format!(
        "Your Recommendation  \u{26a1} {}s\n\n{}\n",
        response.latency,
        response.recommendation.as_deref().unwrap_or_default()
    )
}

/// Prints the result, or writes the HTML fragment alone to `output`.
pub fn show_result(response: &RecipeResponse, output: Option<&Path>) -> Result<(), FormError> {
    match output {
        Some(path) => {
            fs::write(path, response.recommendation.as_deref().unwrap_or_default())?;
            println!("Recommendation written to {}", path.display());
        }
        None => print!("{}", render_result(response)),
    }

    Ok(())
}

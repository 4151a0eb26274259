use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

use crate::markdown::{RenderOptions, format_recommendation};

pub const FALLBACK_RECOMMENDATION: &str = "Failed to get recommendation. Please try again.";
pub const LATENCY_PLACEHOLDER: &str = "-";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Dietary {
    #[default]
    None,
    Vegetarian,
    Vegan,
    #[serde(rename = "Gluten-Free")]
    #[strum(serialize = "Gluten-Free")]
    GlutenFree,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Health {
    #[default]
    None,
    Diabetes,
    Hypertension,
    #[serde(rename = "Heart-Friendly")]
    #[strum(serialize = "Heart-Friendly")]
    HeartFriendly,
    #[serde(rename = "Weight Loss")]
    #[strum(serialize = "Weight Loss")]
    WeightLoss,
    Thyroid,
    #[serde(rename = "PCOS/PCOD")]
    #[strum(serialize = "PCOS/PCOD")]
    Pcos,
    #[serde(rename = "Kidney-Friendly")]
    #[strum(serialize = "Kidney-Friendly")]
    KidneyFriendly,
    #[serde(rename = "Liver Health")]
    #[strum(serialize = "Liver Health")]
    LiverHealth,
    Anemia,
    #[serde(rename = "Bone Health")]
    #[strum(serialize = "Bone Health")]
    BoneHealth,
}

/// Payload sent from the form to the relay, and from the relay upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeRequest {
    pub query: String,
    pub dietary: Dietary,
    pub health: Health,
    pub allergens: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
}

impl RecipeRequest {
    /// Allergens are comma separated. Blank entries are dropped.
    pub fn excluded_allergens(&self) -> Vec<String> {
        self.allergens
            .split(',')
            .map(str::trim)
            .filter(|allergen| !allergen.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Latency {
    Seconds(f64),
    Placeholder(String),
}

impl Default for Latency {
    fn default() -> Self {
        Latency::Placeholder(LATENCY_PLACEHOLDER.to_string())
    }
}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Latency::Seconds(seconds) => write!(f, "{seconds}"),
            Latency::Placeholder(placeholder) => f.write_str(placeholder),
        }
    }
}

/// Upstream answer. Fields other than the two known ones are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeResponse {
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub latency: Latency,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecipeResponse {
    pub fn fallback() -> Self {
        Self {
            recommendation: Some(FALLBACK_RECOMMENDATION.to_string()),
            latency: Latency::default(),
            extra: Map::new(),
        }
    }

    /// Runs the recommendation through the renderer, keeping everything else.
    pub fn formatted(self, options: &RenderOptions) -> Self {
        Self {
            recommendation: format_recommendation(self.recommendation, options),
            ..self
        }
    }
}

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use form::{
    DEFAULT_RELAY_URL, Submission,
    utils::{parse_query, parse_target},
};
use recipes::{Dietary, Health, RecipeRequest, RenderOptions};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Personalized meal recommendations for your health goals")]
struct Args {
    /// Recipe or meal name, e.g. "vegan curry"
    #[arg(short, long, value_parser = parse_query)]
    query: String,

    /// None, Vegetarian, Vegan or Gluten-Free
    #[arg(short, long, default_value_t = Dietary::None)]
    dietary: Dietary,

    /// None, Diabetes, Hypertension, Heart-Friendly, Weight Loss, Thyroid,
    /// PCOS/PCOD, Kidney-Friendly, Liver Health, Anemia or Bone Health
    #[arg(long, default_value_t = Health::None)]
    health: Health,

    /// Allergens to exclude, comma separated, e.g. "nuts, dairy"
    #[arg(short, long, default_value = "")]
    allergens: String,

    /// Max calories
    #[arg(long, default_value = "0", value_parser = parse_target)]
    calories: f64,

    /// Min protein (g)
    #[arg(long, default_value = "0", value_parser = parse_target)]
    protein: f64,

    /// Max fat (g)
    #[arg(long, default_value = "0", value_parser = parse_target)]
    fat: f64,

    #[arg(long, env = "RELAY_URL", default_value = DEFAULT_RELAY_URL)]
    relay_url: String,

    #[arg(long, env = "RELAY_TIMEOUT_SECS", default_value_t = 120)]
    timeout_secs: u64,

    /// Escape HTML in the recommendation before adding markup
    #[arg(long)]
    escape_html: bool,

    /// Write the HTML fragment here instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    form::recommend(Submission {
        fields: RecipeRequest {
            query: args.query,
            dietary: args.dietary,
            health: args.health,
            allergens: args.allergens,
            calories: args.calories,
            protein: args.protein,
            fat: args.fat,
        },
        relay_url: args.relay_url,
        timeout: Duration::from_secs(args.timeout_secs),
        options: RenderOptions {
            escape_html: args.escape_html,
        },
        output: args.output,
    })
    .await?;

    Ok(())
}

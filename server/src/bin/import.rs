//! One-shot import of the scraped recipe dataset into the recipes table.
//!
//! The source file is a JSON object keyed by row index; numeric fields may be
//! the literal string "NaN", and a few keys carry scraper typos ("Contient")
//! that are mapped here. Rows without a title are skipped.
//!
//! Usage:
//!   larder-import --file US_recipes.json

use clap::Parser;
use diesel::prelude::*;
use larder_server::db;
use larder_server::models::NewRecipe;
use larder_server::schema::recipes;
use serde_json::Value;
use std::env;
use std::fs;
use std::path::PathBuf;

const BATCH_SIZE: usize = 100;

#[derive(Parser)]
#[command(name = "larder-import")]
#[command(about = "Import a scraped recipe JSON dump into the database", long_about = None)]
struct Args {
    /// Path to the recipe JSON dump
    #[arg(long)]
    file: PathBuf,

    /// Database URL (default: DATABASE_URL env var)
    #[arg(long)]
    database_url: Option<String>,
}

/// Numbers in the dump arrive as JSON numbers, numeric strings, or the
/// literal string "NaN". Anything non-finite becomes NULL.
fn parse_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

fn text_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn to_new_recipe(raw: &Value) -> Option<NewRecipe> {
    let title = text(raw.get("title"))?;
    if title.trim().is_empty() {
        return None;
    }

    Some(NewRecipe {
        title,
        cuisine: text(raw.get("cuisine")).unwrap_or_else(|| "Unknown".to_string()),
        rating: parse_number(raw.get("rating")),
        prep_time: parse_number(raw.get("prep_time")),
        cook_time: parse_number(raw.get("cook_time")),
        total_time: parse_number(raw.get("total_time")),
        description: text(raw.get("description")).unwrap_or_default(),
        nutrients: raw
            .get("nutrients")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default())),
        serves: text(raw.get("serves")).unwrap_or_default(),
        // "Contient" is a typo in the source dump, not here.
        continent: text(raw.get("Contient")),
        country_state: text(raw.get("Country_State")),
        ingredients: text_array(raw.get("ingredients")),
        instructions: text_array(raw.get("instructions")),
        url_link: text(raw.get("URL")),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let database_url = match args.database_url {
        Some(url) => url,
        None => env::var("DATABASE_URL")?,
    };

    tracing::info!("Reading {}", args.file.display());
    let contents = fs::read_to_string(&args.file)?;
    let dump: Value = serde_json::from_str(&contents)?;

    // The dump is an object keyed by row index; only the values matter.
    let raw_recipes: Vec<&Value> = match &dump {
        Value::Object(map) => map.values().collect(),
        Value::Array(items) => items.iter().collect(),
        _ => anyhow::bail!("expected a JSON object or array of recipes"),
    };
    tracing::info!("Found {} recipes to process", raw_recipes.len());

    let rows: Vec<NewRecipe> = raw_recipes.iter().filter_map(|raw| to_new_recipe(raw)).collect();
    tracing::info!("Filtered down to {} valid recipes", rows.len());

    let pool = db::create_pool(&database_url)?;
    let mut conn = pool.get()?;

    let mut inserted = 0usize;
    for batch in rows.chunks(BATCH_SIZE) {
        diesel::insert_into(recipes::table)
            .values(batch)
            .execute(&mut conn)?;
        inserted += batch.len();
        tracing::info!("Inserted {}/{}", inserted, rows.len());
    }

    tracing::info!("Import completed");
    Ok(())
}

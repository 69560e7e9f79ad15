// storefront_app/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use cartsync::{MergePolicy, StoreOptions, DEFAULT_TAX_RATE};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Postgres connection string. Without it the signed-in tables live in memory.
  pub database_url: Option<String>,
  /// Directory holding the guest snapshots.
  pub local_store_dir: PathBuf,
  pub tax_rate: f64,
  pub guest_merge: MergePolicy,
  pub serialize_mutations: bool,
  /// Apply schema.sql on startup.
  pub apply_schema: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let database_url = get_env("DATABASE_URL");
    let local_store_dir = PathBuf::from(get_env("LOCAL_STORE_DIR").unwrap_or_else(|| ".storefront".to_string()));

    let tax_rate = match get_env("TAX_RATE") {
      Some(raw) => raw
        .parse::<f64>()
        .map_err(|e| AppError::Config(format!("Invalid TAX_RATE: {}", e)))?,
      None => DEFAULT_TAX_RATE,
    };
    if !tax_rate.is_finite() || tax_rate < 0.0 {
      return Err(AppError::Config(format!("TAX_RATE must be a non-negative number, got {}", tax_rate)));
    }

    let guest_merge = get_env("GUEST_MERGE")
      .unwrap_or_else(|| "discard".to_string())
      .parse::<MergePolicy>()
      .map_err(|e| AppError::Config(format!("Invalid GUEST_MERGE: {}", e)))?;

    let serialize_mutations = parse_bool("SERIALIZE_MUTATIONS", get_env("SERIALIZE_MUTATIONS"), true)?;
    let apply_schema = parse_bool("APPLY_SCHEMA", get_env("APPLY_SCHEMA"), false)?;

    tracing::info!(
      remote = if database_url.is_some() { "postgres" } else { "memory" },
      local_store_dir = %local_store_dir.display(),
      "Application configuration loaded successfully."
    );

    Ok(Self {
      database_url,
      local_store_dir,
      tax_rate,
      guest_merge,
      serialize_mutations,
      apply_schema,
    })
  }

  pub fn store_options(&self) -> StoreOptions {
    StoreOptions::default()
      .serialize_mutations(self.serialize_mutations)
      .merge_policy(self.guest_merge)
      .tax_rate(self.tax_rate)
  }
}

fn parse_bool(var_name: &str, raw: Option<String>, default: bool) -> Result<bool> {
  match raw {
    None => Ok(default),
    Some(raw) => raw
      .trim()
      .to_ascii_lowercase()
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid {} value: {}", var_name, e))),
  }
}

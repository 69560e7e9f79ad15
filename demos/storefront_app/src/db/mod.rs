// storefront_app/src/db/mod.rs

pub mod pg_table;

pub use pg_table::PgTable;

use crate::errors::Result;
use sqlx::PgPool;

const SCHEMA: &str = include_str!("../../schema.sql");

/// Creates the cart and wishlist tables if they are missing.
pub async fn apply_schema(pool: &PgPool) -> Result<()> {
  sqlx::raw_sql(SCHEMA).execute(pool).await?;
  tracing::info!("Database schema applied.");
  Ok(())
}

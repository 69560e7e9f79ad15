// storefront_app/src/state.rs
use crate::config::AppConfig;
use cartsync::{MemorySession, Storefront};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: Option<PgPool>,
  pub session: MemorySession,
  pub storefront: Arc<Storefront>,
  pub config: Arc<AppConfig>, // Share loaded config
}

// storefront_app/src/main.rs

// Declare modules for the application
mod config;
mod db;
mod errors;
mod shell;
mod state;

use crate::config::AppConfig;
use crate::db::PgTable;
use crate::errors::{AppError, Result as AppResult}; // Use the app's Result alias
use crate::shell::{Command, Flow};
use crate::state::AppState;

use cartsync::{
  CartItem, FileLocalStore, LocalStore, MemorySession, MemoryTable, RemoteTable, Storefront, WishlistItem,
};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

type Tables = (Arc<dyn RemoteTable<CartItem>>, Arc<dyn RemoteTable<WishlistItem>>);

async fn connect_tables(config: &AppConfig) -> AppResult<(Option<PgPool>, Tables)> {
  let Some(database_url) = config.database_url.as_deref() else {
    tracing::warn!("DATABASE_URL not set; signed-in carts live in memory for this run.");
    let tables: Tables = (Arc::new(MemoryTable::<CartItem>::new()), Arc::new(MemoryTable::<WishlistItem>::new()));
    return Ok((None, tables));
  };

  let pool = PgPool::connect(database_url).await?;
  tracing::info!("Successfully connected to the database.");
  if config.apply_schema {
    db::apply_schema(&pool).await?;
  }
  let tables: Tables = (
    Arc::new(PgTable::<CartItem>::new(pool.clone())),
    Arc::new(PgTable::<WishlistItem>::new(pool.clone())),
  );
  Ok((Some(pool), tables))
}

async fn build_state(config: Arc<AppConfig>) -> AppResult<AppState> {
  let (db_pool, (cart_table, wishlist_table)) = connect_tables(&config).await?;
  tokio::fs::create_dir_all(&config.local_store_dir).await.map_err(|e| {
    AppError::Config(format!(
      "Cannot use LOCAL_STORE_DIR '{}': {}",
      config.local_store_dir.display(),
      e
    ))
  })?;
  let local: Arc<dyn LocalStore> = Arc::new(FileLocalStore::new(config.local_store_dir.clone()));
  let session = MemorySession::new();

  let storefront = Arc::new(Storefront::new(
    Arc::new(session.clone()),
    cart_table,
    wishlist_table,
    local,
    config.store_options(),
  ));

  Ok(AppState {
    db_pool,
    session,
    storefront,
    config,
  })
}

#[tokio::main]
async fn main() -> AppResult<()> {
  // Initialize tracing subscriber for logging (RUST_LOG overrides the default level)
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .with_writer(std::io::stderr)
    .init();

  tracing::info!("Starting storefront shell...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(e);
    }
  };

  let app_state = build_state(app_config).await?;

  // Initial load; a failure leaves the list empty but the shell usable.
  if let Err(e) = app_state.storefront.load_all().await {
    tracing::error!(error = %e, "Initial load failed.");
  }

  let (sync_handle, sync_worker) = app_state.storefront.session_sync().start();
  let sync_task = tokio::spawn(sync_worker.run());

  let result = run_shell(&app_state).await;

  sync_handle.shutdown();
  if let Err(e) = sync_task.await {
    tracing::error!(error = %e, "Session sync task ended abnormally.");
  }
  if let Some(pool) = &app_state.db_pool {
    pool.close().await;
  }
  tracing::info!(tax_rate = app_state.config.tax_rate, "Storefront shell stopped.");
  result
}

async fn run_shell(state: &AppState) -> AppResult<()> {
  let mut stdout = tokio::io::stdout();
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  stdout.write_all(format!("{}\n", shell::HELP).as_bytes()).await?;

  loop {
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    let Some(line) = lines.next_line().await? else {
      break;
    };

    let outcome = match Command::parse(&line) {
      Ok(Some(command)) => shell::execute(state, command).await,
      Ok(None) => continue,
      Err(e) => Err(e),
    };

    match outcome {
      Ok((output, flow)) => {
        stdout.write_all(format!("{}\n", output).as_bytes()).await?;
        if flow == Flow::Quit {
          break;
        }
      }
      Err(e) if e.is_recoverable() => {
        stdout.write_all(format!("error: {}\n", e).as_bytes()).await?;
      }
      Err(e) => return Err(e),
    }
  }
  Ok(())
}

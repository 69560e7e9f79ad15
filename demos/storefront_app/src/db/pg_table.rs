// storefront_app/src/db/pg_table.rs

//! `RemoteTable` over a Postgres table laid out as in `schema.sql`.

use async_trait::async_trait;
use cartsync::{ItemPatch, NewItem, RemoteError, RemoteTable, StoredItem, UserIdentity};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::marker::PhantomData;
use tracing::{debug, instrument};
use uuid::Uuid;

pub struct PgTable<T: StoredItem> {
  pool: PgPool,
  _kind: PhantomData<fn() -> T>,
}

impl<T: StoredItem> PgTable<T> {
  pub fn new(pool: PgPool) -> Self {
    Self {
      pool,
      _kind: PhantomData,
    }
  }

  fn quantity_column() -> &'static str {
    if T::HAS_QUANTITY {
      "quantity"
    } else {
      "1 AS quantity"
    }
  }

  fn returned_columns() -> String {
    format!(
      "id, product_id, product_name, price::float8 AS price, {}, image_url",
      Self::quantity_column()
    )
  }

  // The inserted row is read back so the price reflects the column's rounding.
  fn insert_sql() -> String {
    if T::HAS_QUANTITY {
      format!(
        "INSERT INTO {} (user_id, product_id, product_name, price, image_url, quantity) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        T::TABLE,
        Self::returned_columns()
      )
    } else {
      format!(
        "INSERT INTO {} (user_id, product_id, product_name, price, image_url) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        T::TABLE,
        Self::returned_columns()
      )
    }
  }

  fn map_err(&self, err: sqlx::Error) -> RemoteError {
    match err {
      sqlx::Error::Database(db_err) => RemoteError::Rejected {
        table: T::TABLE.to_string(),
        message: db_err.message().to_string(),
      },
      sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) | sqlx::Error::Decode(_) => {
        RemoteError::Decode {
          table: T::TABLE.to_string(),
          message: err.to_string(),
        }
      }
      other => RemoteError::Transport(other.to_string()),
    }
  }

  fn decode_row(&self, row: &PgRow) -> Result<T, RemoteError> {
    let decode = |err: sqlx::Error| self.map_err(err);
    let id: Uuid = row.try_get("id").map_err(decode)?;
    let quantity: i32 = row.try_get("quantity").map_err(decode)?;
    let quantity = u32::try_from(quantity).map_err(|_| RemoteError::Decode {
      table: T::TABLE.to_string(),
      message: format!("negative quantity {} for row {}", quantity, id),
    })?;
    let new_item = NewItem {
      product_id: row.try_get("product_id").map_err(decode)?,
      product_name: row.try_get("product_name").map_err(decode)?,
      price: row.try_get("price").map_err(decode)?,
      image_url: row.try_get("image_url").map_err(decode)?,
      quantity,
    };
    Ok(T::from_new(id.to_string(), &new_item))
  }
}

#[async_trait]
impl<T: StoredItem> RemoteTable<T> for PgTable<T> {
  #[instrument(name = "PgTable::select_all_for_user", skip_all, fields(table = T::TABLE))]
  async fn select_all_for_user(&self, user: &UserIdentity) -> Result<Vec<T>, RemoteError> {
    let sql = format!(
      "SELECT {} FROM {} WHERE user_id = $1 ORDER BY added_at, id",
      Self::returned_columns(),
      T::TABLE
    );
    let rows = sqlx::query(&sql)
      .bind(&user.id)
      .fetch_all(&self.pool)
      .await
      .map_err(|e| self.map_err(e))?;
    debug!(rows = rows.len(), "Selected rows.");
    rows.iter().map(|row| self.decode_row(row)).collect()
  }

  #[instrument(name = "PgTable::insert", skip_all, fields(table = T::TABLE, product_id = %new_item.product_id))]
  async fn insert(&self, user: &UserIdentity, new_item: &NewItem) -> Result<T, RemoteError> {
    let quantity = i32::try_from(new_item.quantity).map_err(|_| RemoteError::Rejected {
      table: T::TABLE.to_string(),
      message: format!("quantity {} out of range", new_item.quantity),
    })?;
    let sql = Self::insert_sql();
    let mut query = sqlx::query(&sql)
      .bind(&user.id)
      .bind(&new_item.product_id)
      .bind(&new_item.product_name)
      .bind(new_item.price)
      .bind(&new_item.image_url);
    if T::HAS_QUANTITY {
      query = query.bind(quantity);
    }
    let row = query.fetch_one(&self.pool).await.map_err(|e| self.map_err(e))?;
    self.decode_row(&row)
  }

  #[instrument(name = "PgTable::update_fields", skip(self), fields(table = T::TABLE))]
  async fn update_fields(&self, id: &str, patch: &ItemPatch) -> Result<(), RemoteError> {
    let quantity = match patch.quantity {
      Some(quantity) if T::HAS_QUANTITY => quantity,
      // Nothing this table can store.
      _ => return Ok(()),
    };
    let not_found = || RemoteError::Rejected {
      table: T::TABLE.to_string(),
      message: format!("no row with id '{}'", id),
    };
    let row_id = Uuid::parse_str(id).map_err(|_| not_found())?;
    let quantity = i32::try_from(quantity).map_err(|_| RemoteError::Rejected {
      table: T::TABLE.to_string(),
      message: format!("quantity {} out of range", quantity),
    })?;
    let result = sqlx::query(&format!("UPDATE {} SET quantity = $1 WHERE id = $2", T::TABLE))
      .bind(quantity)
      .bind(row_id)
      .execute(&self.pool)
      .await
      .map_err(|e| self.map_err(e))?;
    if result.rows_affected() == 0 {
      return Err(not_found());
    }
    Ok(())
  }

  #[instrument(name = "PgTable::delete_by_id", skip(self), fields(table = T::TABLE))]
  async fn delete_by_id(&self, id: &str) -> Result<(), RemoteError> {
    // Ids that are not UUIDs (e.g. leftovers from a guest snapshot) cannot exist here.
    let Ok(row_id) = Uuid::parse_str(id) else {
      debug!("Id is not a row id; nothing to delete.");
      return Ok(());
    };
    sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::TABLE))
      .bind(row_id)
      .execute(&self.pool)
      .await
      .map_err(|e| self.map_err(e))?;
    Ok(())
  }

  #[instrument(name = "PgTable::delete_all_for_user", skip_all, fields(table = T::TABLE))]
  async fn delete_all_for_user(&self, user: &UserIdentity) -> Result<(), RemoteError> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE user_id = $1", T::TABLE))
      .bind(&user.id)
      .execute(&self.pool)
      .await
      .map_err(|e| self.map_err(e))?;
    debug!(rows = result.rows_affected(), "Deleted rows.");
    Ok(())
  }
}

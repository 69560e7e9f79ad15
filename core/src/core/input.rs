// cartsync/src/core/input.rs

//! Canonical caller input for add/toggle operations, validated at the store boundary.

use crate::error::{SyncError, SyncResult};
use std::fmt;

/// Display name stored when the caller does not supply one.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Largest quantity a single row may hold. Remote tables store it as a signed
/// 32-bit integer.
pub const MAX_QUANTITY: u32 = i32::MAX as u32;

/// A product identifier as the catalog hands it out: either text or a number.
/// Both normalize to the same canonical string, so `ProductKey::from(2)` and
/// `ProductKey::from("2")` address the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKey {
  Text(String),
  Numeric(u64),
}

impl ProductKey {
  /// Canonical `product_id` string.
  pub fn canonical(&self) -> String {
    match self {
      ProductKey::Text(s) => s.trim().to_string(),
      ProductKey::Numeric(n) => n.to_string(),
    }
  }
}

impl fmt::Display for ProductKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.canonical())
  }
}

impl From<&str> for ProductKey {
  fn from(value: &str) -> Self {
    ProductKey::Text(value.to_string())
  }
}

impl From<String> for ProductKey {
  fn from(value: String) -> Self {
    ProductKey::Text(value)
  }
}

impl From<&String> for ProductKey {
  fn from(value: &String) -> Self {
    ProductKey::Text(value.clone())
  }
}

impl From<u64> for ProductKey {
  fn from(value: u64) -> Self {
    ProductKey::Numeric(value)
  }
}

impl From<u32> for ProductKey {
  fn from(value: u32) -> Self {
    ProductKey::Numeric(u64::from(value))
  }
}

impl From<i32> for ProductKey {
  fn from(value: i32) -> Self {
    match u64::try_from(value) {
      Ok(n) => ProductKey::Numeric(n),
      Err(_) => ProductKey::Text(value.to_string()),
    }
  }
}

/// What the UI passes to `add_item` / `toggle_item`.
///
/// `product_id` and `price` are required; the display name and image are optional
/// and denormalized into the row at insertion time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
  pub product_id: ProductKey,
  pub price: f64,
  pub name: Option<String>,
  pub image_url: Option<String>,
}

impl ProductInput {
  pub fn new(product_id: impl Into<ProductKey>, price: f64) -> Self {
    Self {
      product_id: product_id.into(),
      price,
      name: None,
      image_url: None,
    }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
    self.image_url = Some(image_url.into());
    self
  }

  /// Validates the input and produces the row payload for `quantity` units.
  pub fn validate(&self, quantity: u32) -> SyncResult<NewItem> {
    let product_id = self.product_id.canonical();
    if product_id.is_empty() {
      return Err(SyncError::InvalidArgument("product id must not be empty".to_string()));
    }
    if !self.price.is_finite() || self.price < 0.0 {
      return Err(SyncError::InvalidArgument(format!(
        "price for product '{}' must be a finite, non-negative number (got {})",
        product_id, self.price
      )));
    }
    if quantity == 0 {
      return Err(SyncError::InvalidArgument(format!(
        "quantity for product '{}' must be at least 1",
        product_id
      )));
    }
    if quantity > MAX_QUANTITY {
      return Err(SyncError::InvalidArgument(format!(
        "quantity {} for product '{}' exceeds the maximum of {}",
        quantity, product_id, MAX_QUANTITY
      )));
    }

    let product_name = self
      .name
      .as_deref()
      .map(str::trim)
      .filter(|n| !n.is_empty())
      .unwrap_or(UNKNOWN_PRODUCT_NAME)
      .to_string();
    let image_url = self
      .image_url
      .as_deref()
      .map(str::trim)
      .filter(|u| !u.is_empty())
      .map(str::to_string);

    Ok(NewItem {
      product_id,
      product_name,
      price: self.price,
      image_url,
      quantity,
    })
  }
}

/// Validated insert payload. Built by [`ProductInput::validate`] or
/// [`StoredItem::to_new`](crate::StoredItem::to_new).
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
  pub product_id: String,
  pub product_name: String,
  pub price: f64,
  pub image_url: Option<String>,
  pub quantity: u32,
}

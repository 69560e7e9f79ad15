// cartsync/src/core/item.rs

//! Item rows held by the cart and wishlist stores.
//!
//! The same struct is used for the remote table row, the in-memory list entry and
//! the local snapshot element, so field names follow the table columns.

use crate::core::input::NewItem;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Behaviour shared by every row kind an [`ItemStore`](crate::ItemStore) can hold.
///
/// Implemented by [`CartItem`] and [`WishlistItem`]. The associated constants pick
/// the remote table and the local snapshot key for the kind.
pub trait StoredItem: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
  /// Remote table holding rows of this kind.
  const TABLE: &'static str;
  /// Fixed local snapshot key. Guests are not distinguished from one another.
  const LOCAL_KEY: &'static str;
  /// Short label used in logs.
  const KIND: &'static str;
  /// Whether rows carry a quantity column.
  const HAS_QUANTITY: bool;

  fn id(&self) -> &str;
  fn product_id(&self) -> &str;
  fn product_name(&self) -> &str;
  fn price(&self) -> f64;
  fn image_url(&self) -> Option<&str>;

  /// Quantity of the row; kinds without a quantity column report 1.
  fn quantity(&self) -> u32 {
    1
  }

  /// Overwrites the quantity. Ignored by kinds without a quantity column.
  fn set_quantity(&mut self, _quantity: u32) {}

  /// Builds a row from validated input and an id (server-assigned or client-generated).
  fn from_new(id: String, new_item: &NewItem) -> Self;

  /// The insert payload that would recreate this row (used when adopting guest rows).
  fn to_new(&self) -> NewItem {
    NewItem {
      product_id: self.product_id().to_string(),
      product_name: self.product_name().to_string(),
      price: self.price(),
      image_url: self.image_url().map(str::to_string),
      quantity: self.quantity(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
  pub id: String,
  pub product_id: String,
  pub product_name: String,
  pub price: f64,
  pub quantity: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
}

impl CartItem {
  /// Line total: unit price times quantity.
  pub fn line_total(&self) -> f64 {
    self.price * f64::from(self.quantity)
  }
}

impl StoredItem for CartItem {
  const TABLE: &'static str = "cart_items";
  const LOCAL_KEY: &'static str = "shopping-cart";
  const KIND: &'static str = "cart";
  const HAS_QUANTITY: bool = true;

  fn id(&self) -> &str {
    &self.id
  }

  fn product_id(&self) -> &str {
    &self.product_id
  }

  fn product_name(&self) -> &str {
    &self.product_name
  }

  fn price(&self) -> f64 {
    self.price
  }

  fn image_url(&self) -> Option<&str> {
    self.image_url.as_deref()
  }

  fn quantity(&self) -> u32 {
    self.quantity
  }

  fn set_quantity(&mut self, quantity: u32) {
    self.quantity = quantity;
  }

  fn from_new(id: String, new_item: &NewItem) -> Self {
    Self {
      id,
      product_id: new_item.product_id.clone(),
      product_name: new_item.product_name.clone(),
      price: new_item.price,
      quantity: new_item.quantity.max(1),
      image_url: new_item.image_url.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
  pub id: String,
  pub product_id: String,
  pub product_name: String,
  pub price: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
}

impl StoredItem for WishlistItem {
  const TABLE: &'static str = "wishlist_items";
  const LOCAL_KEY: &'static str = "shopping-wishlist";
  const KIND: &'static str = "wishlist";
  const HAS_QUANTITY: bool = false;

  fn id(&self) -> &str {
    &self.id
  }

  fn product_id(&self) -> &str {
    &self.product_id
  }

  fn product_name(&self) -> &str {
    &self.product_name
  }

  fn price(&self) -> f64 {
    self.price
  }

  fn image_url(&self) -> Option<&str> {
    self.image_url.as_deref()
  }

  fn from_new(id: String, new_item: &NewItem) -> Self {
    Self {
      id,
      product_id: new_item.product_id.clone(),
      product_name: new_item.product_name.clone(),
      price: new_item.price,
      image_url: new_item.image_url.clone(),
    }
  }
}

/// Partial update sent to [`RemoteTable::update_fields`](crate::RemoteTable::update_fields).
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub quantity: Option<u32>,
}

impl ItemPatch {
  pub fn quantity(quantity: u32) -> Self {
    Self { quantity: Some(quantity) }
  }

  /// Applies the patch to an in-memory row.
  pub fn apply_to<T: StoredItem>(&self, item: &mut T) {
    if let Some(quantity) = self.quantity {
      item.set_quantity(quantity);
    }
  }
}

// cartsync/src/core/state.rs

//! Load lifecycle of an item store and the outcomes reported by its mutations.

/// Lifecycle of an item store instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
  /// Constructed, `load()` never called.
  Uninitialized,
  /// A load is in flight. Also re-entered while reloading after an auth change.
  Loading,
  /// At least one load finished, successfully or not. The list may be empty.
  Ready,
}

impl LoadState {
  pub fn is_ready(self) -> bool {
    self == LoadState::Ready
  }
}

/// Outcome of `add_item`.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome<T> {
  /// A new row was created and appended.
  Inserted(T),
  /// An existing row for the product had its quantity raised.
  Incremented { id: String, quantity: u32 },
  /// The product is already in a list without quantities; nothing changed.
  AlreadyPresent,
}

/// Outcome of `toggle_item`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome<T> {
  Added(T),
  Removed(T),
}

impl<T> ToggleOutcome<T> {
  /// True when the product is in the list after the toggle.
  pub fn is_present(&self) -> bool {
    matches!(self, ToggleOutcome::Added(_))
  }
}

/// Subtotal, tax and grand total of a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary {
  /// Sum of quantities across all rows.
  pub item_count: u32,
  pub subtotal: f64,
  pub tax: f64,
  pub total: f64,
}

// cartsync/src/store/options.rs

//! Tunables shared by the cart and wishlist stores.

use crate::error::SyncError;
use std::str::FromStr;

/// What happens to guest items (local snapshot) when a user signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
  /// Reload from the remote table and ignore the guest snapshot. Guest items
  /// stay on disk but are not shown while signed in.
  #[default]
  Discard,
  /// Insert guest items whose `product_id` the account does not have yet, then
  /// delete the guest snapshot. Rows already in the account win on conflict.
  UnionRemoteWins,
}

impl FromStr for MergePolicy {
  type Err = SyncError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "discard" | "none" => Ok(MergePolicy::Discard),
      "union" | "union-remote-wins" | "union_remote_wins" => Ok(MergePolicy::UnionRemoteWins),
      other => Err(SyncError::InvalidArgument(format!("unknown merge policy '{}'", other))),
    }
  }
}

/// Default sales tax applied by [`CartStore::summary`](crate::CartStore::summary).
pub const DEFAULT_TAX_RATE: f64 = 0.10;

#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
  /// When true (default), mutations and loads on one store run one at a time and
  /// later calls wait for earlier ones. When false, concurrent calls interleave
  /// at their await points: each works from the list as it was when it started
  /// and the last one to finish decides the final list.
  pub serialize_mutations: bool,
  pub merge_policy: MergePolicy,
  pub tax_rate: f64,
}

impl Default for StoreOptions {
  fn default() -> Self {
    Self {
      serialize_mutations: true,
      merge_policy: MergePolicy::default(),
      tax_rate: DEFAULT_TAX_RATE,
    }
  }
}

impl StoreOptions {
  pub fn serialize_mutations(mut self, serialize: bool) -> Self {
    self.serialize_mutations = serialize;
    self
  }

  pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
    self.merge_policy = policy;
    self
  }

  pub fn tax_rate(mut self, rate: f64) -> Self {
    self.tax_rate = rate;
    self
  }
}

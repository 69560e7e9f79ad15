// cartsync/src/sync.rs

//! Reloads item stores when the session changes.
//!
//! `SessionSync` registers one listener with the session resolver. The listener
//! only forwards events into a channel; the [`SessionSyncWorker`] drains that
//! channel on the caller's executor and, per event, applies the store's merge
//! policy and reloads it from the newly authoritative backing store.

use crate::backend::session::{AuthEvent, SessionResolver, Subscription};
use crate::core::item::StoredItem;
use crate::error::SyncResult;
use crate::store::definition::ItemStore;
use crate::store::options::MergePolicy;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{event, instrument, Level};

/// Type-erased store that can react to an auth transition.
#[async_trait]
pub trait Reloadable: Send + Sync {
  fn kind(&self) -> &'static str;

  /// Called once per auth event, in event order.
  async fn on_auth_event(&self, auth_event: &AuthEvent) -> SyncResult<()>;
}

#[async_trait]
impl<T: StoredItem> Reloadable for ItemStore<T> {
  fn kind(&self) -> &'static str {
    T::KIND
  }

  async fn on_auth_event(&self, auth_event: &AuthEvent) -> SyncResult<()> {
    if let (AuthEvent::SignedIn(user), MergePolicy::UnionRemoteWins) = (auth_event, self.options.merge_policy) {
      // A failed adoption keeps the guest snapshot; the account is still loaded.
      if let Err(e) = self.adopt_guest_items(user).await {
        event!(Level::WARN, kind = T::KIND, error = %e, "Guest item adoption failed.");
      }
    }
    self.load().await.map(|_| ())
  }
}

/// Collects the stores to keep in step with the session.
pub struct SessionSync {
  session: Arc<dyn SessionResolver>,
  stores: Vec<Arc<dyn Reloadable>>,
}

impl SessionSync {
  pub fn new(session: Arc<dyn SessionResolver>) -> Self {
    Self {
      session,
      stores: Vec::new(),
    }
  }

  pub fn watch(mut self, store: Arc<dyn Reloadable>) -> Self {
    event!(Level::DEBUG, kind = store.kind(), "Watching store for session changes.");
    self.stores.push(store);
    self
  }

  /// Subscribes to the resolver.
  ///
  /// Keep the returned handle alive for as long as reloads should happen, and
  /// drive the worker (usually `tokio::spawn(worker.run())`). Dropping the
  /// handle detaches the listener, after which the worker finishes the queued
  /// events and `run()` returns.
  pub fn start(self) -> (SessionSyncHandle, SessionSyncWorker) {
    let (tx, rx) = mpsc::unbounded_channel::<AuthEvent>();
    let subscription = self.session.on_auth_state_change(Arc::new(move |auth_event| {
      if tx.send(auth_event).is_err() {
        event!(Level::DEBUG, "Session sync worker gone; dropping auth event.");
      }
    }));
    event!(Level::INFO, stores = self.stores.len(), "Session sync started.");
    (
      SessionSyncHandle { subscription },
      SessionSyncWorker {
        events: rx,
        stores: self.stores,
      },
    )
  }
}

/// Keeps the resolver subscription alive.
#[derive(Debug)]
pub struct SessionSyncHandle {
  subscription: Subscription,
}

impl SessionSyncHandle {
  pub fn shutdown(self) {
    self.subscription.unsubscribe();
  }
}

/// Applies queued auth events to the watched stores.
pub struct SessionSyncWorker {
  events: mpsc::UnboundedReceiver<AuthEvent>,
  stores: Vec<Arc<dyn Reloadable>>,
}

impl SessionSyncWorker {
  /// Waits for the next auth event and reloads every store. Returns `None` once
  /// the subscription is gone and the queue is empty.
  pub async fn process_next(&mut self) -> Option<AuthEvent> {
    let auth_event = self.events.recv().await?;
    self.apply(&auth_event).await;
    Some(auth_event)
  }

  /// Processes events until the subscription is dropped.
  pub async fn run(mut self) {
    while self.process_next().await.is_some() {}
    event!(Level::INFO, "Session sync stopped.");
  }

  #[instrument(name = "SessionSyncWorker::apply", skip_all, fields(signed_in = auth_event.user().is_some()))]
  async fn apply(&self, auth_event: &AuthEvent) {
    for store in &self.stores {
      // Each store reloads independently; one failing does not stop the others.
      if let Err(e) = store.on_auth_event(auth_event).await {
        event!(Level::ERROR, kind = store.kind(), error = %e, "Reload after auth change failed.");
      }
    }
  }
}

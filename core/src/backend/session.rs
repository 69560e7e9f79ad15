// cartsync/src/backend/session.rs

//! The Session Resolver seam: who is signed in right now, and a subscription to
//! sign-in / sign-out transitions.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{event, Level};

/// Authenticated identity reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

impl UserIdentity {
  pub fn new(id: impl Into<String>) -> Self {
    Self { id: id.into(), email: None }
  }

  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = Some(email.into());
    self
  }
}

/// Auth-state transition delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
  SignedIn(UserIdentity),
  SignedOut,
}

impl AuthEvent {
  pub fn user(&self) -> Option<&UserIdentity> {
    match self {
      AuthEvent::SignedIn(user) => Some(user),
      AuthEvent::SignedOut => None,
    }
  }
}

/// Callback registered with [`SessionResolver::on_auth_state_change`].
/// Called synchronously by the resolver; it must not block.
pub type AuthListener = Arc<dyn Fn(AuthEvent) + Send + Sync>;

/// Handle returned by [`SessionResolver::on_auth_state_change`].
///
/// Dropping the handle detaches the listener, as does calling [`unsubscribe`](Self::unsubscribe).
pub struct Subscription {
  detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
  pub fn new(detach: impl FnOnce() + Send + Sync + 'static) -> Self {
    Self {
      detach: Some(Box::new(detach)),
    }
  }

  /// A handle with nothing to detach, for resolvers that never emit events.
  pub fn noop() -> Self {
    Self { detach: None }
  }

  pub fn unsubscribe(mut self) {
    if let Some(detach) = self.detach.take() {
      detach();
    }
  }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    if let Some(detach) = self.detach.take() {
      detach();
    }
  }
}

impl fmt::Debug for Subscription {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscription")
      .field("attached", &self.detach.is_some())
      .finish()
  }
}

/// Reports the current identity and notifies on auth transitions.
#[async_trait]
pub trait SessionResolver: Send + Sync {
  /// The signed-in user, or `None` for a guest.
  async fn current_user(&self) -> SyncResult<Option<UserIdentity>>;

  /// Registers `listener` for sign-in / sign-out notifications.
  fn on_auth_state_change(&self, listener: AuthListener) -> Subscription;
}

#[derive(Default)]
struct MemorySessionInner {
  user: RwLock<Option<UserIdentity>>,
  listeners: Mutex<BTreeMap<u64, AuthListener>>,
  next_listener_id: AtomicU64,
  fail_lookups: AtomicBool,
}

/// In-process session resolver. Sign-in and sign-out are driven by the host
/// (a test, or the demo shell) and fan out to every registered listener.
#[derive(Clone, Default)]
pub struct MemorySession {
  inner: Arc<MemorySessionInner>,
}

impl MemorySession {
  pub fn new() -> Self {
    Self::default()
  }

  /// A resolver that starts signed in as `user`, without notifying anyone.
  pub fn signed_in(user: UserIdentity) -> Self {
    let session = Self::new();
    *session.inner.user.write() = Some(user);
    session
  }

  pub fn sign_in(&self, user: UserIdentity) {
    event!(Level::INFO, user_id = %user.id, "Session signed in.");
    *self.inner.user.write() = Some(user.clone());
    self.notify(AuthEvent::SignedIn(user));
  }

  pub fn sign_out(&self) {
    event!(Level::INFO, "Session signed out.");
    *self.inner.user.write() = None;
    self.notify(AuthEvent::SignedOut);
  }

  pub fn user(&self) -> Option<UserIdentity> {
    self.inner.user.read().clone()
  }

  /// Makes subsequent `current_user` calls fail until reset.
  pub fn fail_lookups(&self, fail: bool) {
    self.inner.fail_lookups.store(fail, Ordering::SeqCst);
  }

  pub fn listener_count(&self) -> usize {
    self.inner.listeners.lock().len()
  }

  fn notify(&self, auth_event: AuthEvent) {
    // Listeners run outside the lock so they may (un)subscribe re-entrantly.
    let listeners: Vec<AuthListener> = self.inner.listeners.lock().values().cloned().collect();
    event!(Level::DEBUG, listeners = listeners.len(), "Dispatching auth event.");
    for listener in listeners {
      listener(auth_event.clone());
    }
  }
}

#[async_trait]
impl SessionResolver for MemorySession {
  async fn current_user(&self) -> SyncResult<Option<UserIdentity>> {
    if self.inner.fail_lookups.load(Ordering::SeqCst) {
      return Err(SyncError::Session("session lookup failed".to_string()));
    }
    Ok(self.inner.user.read().clone())
  }

  fn on_auth_state_change(&self, listener: AuthListener) -> Subscription {
    let id = self.inner.next_listener_id.fetch_add(1, Ordering::SeqCst);
    self.inner.listeners.lock().insert(id, listener);
    let weak: Weak<MemorySessionInner> = Arc::downgrade(&self.inner);
    Subscription::new(move || {
      if let Some(inner) = weak.upgrade() {
        inner.listeners.lock().remove(&id);
      }
    })
  }
}

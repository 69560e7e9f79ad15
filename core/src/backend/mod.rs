// cartsync/src/backend/mod.rs

//! Collaborators an item store talks to: the session resolver, the remote table
//! client and the local fallback store. Each is a trait with an in-process
//! implementation; production hosts plug in their own.

pub mod local;
pub mod remote;
pub mod session;

pub use local::{FileLocalStore, LocalStore, MemoryLocalStore};
pub use remote::{MemoryTable, RemoteTable, TableOp};
pub use session::{AuthEvent, AuthListener, MemorySession, SessionResolver, Subscription, UserIdentity};

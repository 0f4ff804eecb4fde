//! Handle table mapping opaque C handles to live clients.
//!
//! # Why ids instead of pointers? (for beginners)
//!
//! A C caller cannot hold a Rust `Client` directly, so it receives a number
//! instead.  The number is a key into this table.  When the caller hands the
//! number back to `ktable_disconnect`, the table looks it up:
//!
//! - a live id is removed and its client torn down;
//! - an id that was already removed (or never issued) is simply not found.
//!
//! Ids come from a monotonically increasing counter that starts at 1, so 0 is
//! never a valid handle and a freed id is never handed out again.  A stale
//! handle therefore can never reach somebody else's client.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ktable_client::Client;

/// Opaque client handle as seen by C callers.  `0` is the null handle.
pub type KTableHandle = u64;

/// The null handle returned by failed connects.
pub const NULL_HANDLE: KTableHandle = 0;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);
static LIVE: Mutex<BTreeMap<KTableHandle, Client>> = Mutex::new(BTreeMap::new());

fn live() -> MutexGuard<'static, BTreeMap<KTableHandle, Client>> {
    LIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stores `client` and returns its new, never-before-issued handle.
pub fn insert(client: Client) -> KTableHandle {
    let handle = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    live().insert(handle, client);
    handle
}

/// Removes and returns the client behind `handle`, if it is live.
pub fn remove(handle: KTableHandle) -> Option<Client> {
    live().remove(&handle)
}

/// Number of live handles.
pub fn live_count() -> usize {
    live().len()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

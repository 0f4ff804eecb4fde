//! Process-wide table depth calibration.
//!
//! The arm detector separates arms from the table surface by depth.  The
//! *depth tweak* shifts that threshold: if arms are not detected when they
//! rest close to the table, raise it; set it too high and the table surface
//! itself starts showing up as arm blobs.
//!
//! # Semantics
//!
//! - One value per process, starting at [`DEFAULT_DEPTH_TWEAK`] (25) on every
//!   fresh start.  It is never persisted and never reset implicitly.
//! - [`set_depth_tweak`] overwrites unconditionally.  No range check is
//!   applied; negative and extreme values are accepted because the tweak is
//!   an operator knob, not a protocol field.
//! - Storage is an [`AtomicI32`] with relaxed ordering.  A read racing a
//!   write sees either the old or the new value, never a torn one.  There is
//!   no ordering guarantee between concurrent writers; the last store wins.

use std::sync::atomic::{AtomicI32, Ordering};

use tracing::debug;

/// Depth tweak in effect on a freshly started process.
pub const DEFAULT_DEPTH_TWEAK: i32 = 25;

static TABLE_DEPTH_TWEAK: AtomicI32 = AtomicI32::new(DEFAULT_DEPTH_TWEAK);

/// Returns the current depth tweak.
pub fn depth_tweak() -> i32 {
    TABLE_DEPTH_TWEAK.load(Ordering::Relaxed)
}

/// Overwrites the depth tweak.  Visible to every subsequent [`depth_tweak`].
pub fn set_depth_tweak(value: i32) {
    let previous = TABLE_DEPTH_TWEAK.swap(value, Ordering::Relaxed);
    debug!(previous, value, "table depth tweak updated");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

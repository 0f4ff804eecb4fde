//! Persistent storage for client settings.
//!
//! Only configuration is stored.  The calibration depth tweak is deliberately
//! not persisted: every process starts from the same default.

pub mod config;

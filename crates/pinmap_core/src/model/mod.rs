//! Domain model for map pins and admin accounts.
//!
//! # Responsibility
//! - Define the canonical record shared by generic/location/event pins.
//! - Keep sanitization on every untrusted write path into the model.
//!
//! # Invariants
//! - Pin identity is the storage-assigned surrogate key, nothing else.
//! - A pin never holds exactly one of start/end date.

pub mod admin;
pub mod pin;

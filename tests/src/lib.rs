//! # Elara SDK Test Suite
//!
//! Unified test crate containing cross-module integration flows driven
//! end to end over the in-memory dev node transport.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── sub_id_lifecycle.rs   # create → inspect → deploy → invoke
//!     └── subscriptions.rs      # event delivery and cancellation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p elara-tests
//! cargo test -p elara-tests integration::
//! ```

#![allow(unused_imports)]

pub mod integration;

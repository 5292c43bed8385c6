//! Cross-module integration flows.

pub mod sub_id_lifecycle;
pub mod subscriptions;

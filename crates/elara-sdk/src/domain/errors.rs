//! # Domain Errors
//!
//! Error taxonomy for framework interaction.
//!
//! Everything propagates to the caller with `?`, with one exception:
//! wallet connection converts its failure into a boolean result so UI
//! callers can branch without error handling (the underlying cause is
//! logged). Nothing in this crate retries automatically.

use crate::domain::value_objects::{Hash, SubId};
use thiserror::Error;

/// Errors surfaced by the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// No provider or network endpoint is reachable. Fatal to the session.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    /// The bound framework ABI lacks a required method. Raised locally,
    /// before any network spend.
    #[error("framework version does not support {0}")]
    CapabilityUnsupported(&'static str),

    /// Revert or invalid argument at the chain boundary. Propagated
    /// unchanged, never retried.
    #[error("contract call {method} failed: {reason}")]
    ContractCall {
        /// Method that was invoked.
        method: String,
        /// Revert reason or provider message.
        reason: String,
    },

    /// A mined transaction's receipt lacks the event the caller expected
    /// to extract a value from. Signals an ABI/version mismatch, never
    /// "value is null".
    #[error("receipt for {tx_hash} is missing expected event {event}")]
    MissingEvent {
        /// Expected event name.
        event: String,
        /// Transaction whose receipt was scanned.
        tx_hash: Hash,
    },

    /// The expected event was present but lacks the named argument.
    /// Same ABI-mismatch class as [`SdkError::MissingEvent`].
    #[error("event {event} is missing argument {arg}")]
    MissingEventArg {
        /// Event that was found.
        event: String,
        /// Argument that was absent.
        arg: String,
    },

    /// A decoded value had an unexpected shape.
    #[error("value {arg} has unexpected type, wanted {expected}")]
    ValueType {
        /// Name of the offending argument or query.
        arg: String,
        /// Type the caller required.
        expected: &'static str,
    },

    /// The sub-ID exists but has no deployed logic contract.
    #[error("sub-ID {0} has no deployed contract")]
    NotDeployed(SubId),

    /// The supplied contract ABI does not declare the named function.
    #[error("function {0} is not declared by the supplied contract ABI")]
    UnknownFunction(String),

    /// A state-changing operation was attempted with no bound account.
    #[error("no active account, connect a wallet first")]
    NoActiveAccount,

    /// Wallet provider absent or the user rejected the access request.
    /// Only ever observed inside `connect_wallet`, which converts it to
    /// a boolean result.
    #[error("wallet provider unavailable: {0}")]
    WalletUnavailable(String),

    /// ABI configuration (or the on-chain `abi()` accessor) produced an
    /// unparsable description.
    #[error("invalid ABI: {0}")]
    InvalidAbi(String),
}

impl SdkError {
    /// Returns true for failures that end the whole session rather than
    /// the single operation.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TransportUnavailable(_))
    }
}

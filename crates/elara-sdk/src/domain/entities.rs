//! # Core Domain Entities
//!
//! Receipts, emitted events, pending transactions and the sub-ID registry
//! views the client operates on.

use crate::domain::errors::SdkError;
use crate::domain::value_objects::{Address, Hash, Value, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// CONTRACT EVENTS
// =============================================================================

/// One event log emitted by a contract, with decoded arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEvent {
    /// Event name, matched exactly against the ABI.
    pub name: String,
    /// Contract that emitted the event.
    pub address: Address,
    /// Block the event was included in.
    pub block_number: u64,
    /// Transaction that produced the event.
    pub tx_hash: Hash,
    /// Decoded arguments in emission order.
    pub args: Vec<(String, Value)>,
}

impl ContractEvent {
    /// Looks up a decoded argument by name.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

// =============================================================================
// RECEIPTS
// =============================================================================

/// Confirmation record for a mined state-changing transaction.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Receipt {
    /// Hash of the confirmed transaction.
    pub tx_hash: Hash,
    /// Block of inclusion.
    pub block_number: u64,
    /// Gas actually consumed.
    pub gas_used: u64,
    /// Whether execution succeeded.
    pub success: bool,
    /// Revert reason when `success` is false.
    pub revert_reason: Option<String>,
    /// Events emitted during execution, in order.
    pub events: Vec<ContractEvent>,
}

impl Receipt {
    /// Returns the first event with the given name, if any.
    #[must_use]
    pub fn event(&self, name: &str) -> Option<&ContractEvent> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Extracts a named argument from the first event with the given name.
    ///
    /// Absence of the event (or of the argument) is an ABI/version
    /// mismatch and fails hard; it is never reported as an empty value.
    pub fn require_event_arg(&self, event: &str, arg: &str) -> Result<&Value, SdkError> {
        let found = self.event(event).ok_or_else(|| SdkError::MissingEvent {
            event: event.to_string(),
            tx_hash: self.tx_hash,
        })?;
        found.arg(arg).ok_or_else(|| SdkError::MissingEventArg {
            event: event.to_string(),
            arg: arg.to_string(),
        })
    }
}

// =============================================================================
// PENDING TRANSACTIONS
// =============================================================================

/// Ephemeral record of a submitted state-changing call, resolved to a
/// [`Receipt`] by the transport once the network confirms inclusion.
///
/// Once submitted, the chain-level transaction cannot be withdrawn; a
/// caller that abandons the wait leaves the transaction itself pending.
#[derive(Clone, Debug)]
pub struct PendingTransaction {
    /// Hash assigned by the node on broadcast.
    pub tx_hash: Hash,
    /// Target method, for diagnostics.
    pub method: String,
    /// Sender account.
    pub from: Address,
    /// Gas budget attached to the submission.
    pub gas: u64,
    /// Native value attached to the submission.
    pub value: U256,
}

// =============================================================================
// REGISTRY VIEWS
// =============================================================================

/// Ownership and deployment state of a sub-ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubIdInfo {
    /// Account that created (and owns) the sub-ID.
    pub owner: Address,
    /// Logic contract deployed under the sub-ID, if any. The registry's
    /// zero-address sentinel decodes to `None`.
    pub deployed_contract: Option<Address>,
}

impl SubIdInfo {
    /// Returns true once logic has been deployed under the sub-ID.
    #[must_use]
    pub fn has_deployment(&self) -> bool {
        self.deployed_contract.is_some()
    }
}

/// Caller-supplied options for creation and deployment calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Fee attached as call value. Defaults to zero.
    pub fee: Option<U256>,
}

impl CallOptions {
    /// Options carrying an explicit fee.
    #[must_use]
    pub fn with_fee(fee: U256) -> Self {
        Self { fee: Some(fee) }
    }

    /// The fee to attach, defaulting to zero.
    #[must_use]
    pub fn fee_or_zero(&self) -> U256 {
        self.fee.unwrap_or_else(U256::zero)
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! # Outbound Ports
//!
//! Traits for the injected collaborators: the ledger transport, the
//! wallet provider and the code-generation stub. Mock implementations
//! for testing live alongside the traits.

use crate::domain::entities::{ContractEvent, PendingTransaction, Receipt};
use crate::domain::errors::SdkError;
use crate::domain::value_objects::{Address, Hash, Value, U256};
use crate::domain::Abi;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Buffered events per raw transport feed before a lagging subscriber
/// starts dropping.
pub const EVENT_FEED_CAPACITY: usize = 1024;

// =============================================================================
// INVOCATIONS
// =============================================================================

/// A named invocation bound to a contract address.
///
/// Argument encoding is the transport's concern; the SDK hands over
/// typed values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    /// Contract the call is addressed to.
    pub target: Address,
    /// Method name, matched exactly by the contract side.
    pub method: String,
    /// Typed arguments in declaration order.
    pub args: Vec<Value>,
}

impl ContractCall {
    /// Builds a call against a target contract.
    #[must_use]
    pub fn new(target: Address, method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            target,
            method: method.into(),
            args,
        }
    }
}

/// A fully specified state-changing submission: the call plus sender,
/// gas budget and attached native value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// The invocation to execute.
    pub call: ContractCall,
    /// Sender account.
    pub from: Address,
    /// Gas budget, normally the preceding estimate.
    pub gas: u64,
    /// Attached native value.
    pub value: U256,
}

// =============================================================================
// TRANSPORT PORT
// =============================================================================

/// Ledger transport capability: read, estimate, submit, await, observe.
///
/// `submit` mutates chain state; `call` and `estimate_gas` do not.
/// Transport-level unavailability surfaces as
/// [`SdkError::TransportUnavailable`] and is never swallowed here or in
/// higher layers.
#[async_trait]
pub trait ContractTransport: Send + Sync {
    /// Read-only call. No gas is spent; the decoded value returns
    /// immediately.
    async fn call(&self, call: &ContractCall) -> Result<Value, SdkError>;

    /// Dry-run gas cost for a state-changing invocation with the given
    /// sender and attached value.
    async fn estimate_gas(
        &self,
        call: &ContractCall,
        from: Address,
        value: U256,
    ) -> Result<u64, SdkError>;

    /// Broadcasts a state-changing invocation. Resolves once the node
    /// accepts the transaction; inclusion is awaited separately.
    async fn submit(&self, submission: Submission) -> Result<PendingTransaction, SdkError>;

    /// Suspends until the transaction is included and returns its
    /// receipt.
    async fn wait_for_receipt(&self, pending: &PendingTransaction) -> Result<Receipt, SdkError>;

    /// Raw feed of contract events starting at the latest block. No
    /// replay, no deduplication; reconnection is the transport's
    /// concern.
    fn event_feed(&self) -> broadcast::Receiver<ContractEvent>;
}

// =============================================================================
// WALLET PORT
// =============================================================================

/// Wallet-provider capability: account access requests.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the provider for account access. The first returned account
    /// becomes the active signer. Rejection and provider absence both
    /// surface as [`SdkError::WalletUnavailable`].
    async fn request_accounts(&self) -> Result<Vec<Address>, SdkError>;
}

// =============================================================================
// CODE GENERATION PORT
// =============================================================================

/// External code-generation collaborator. The SDK fetches a deployed
/// contract's ABI and passes through; rendering is not its concern.
pub trait CodeGenerator: Send + Sync {
    /// Renders interaction code for a contract from its ABI.
    fn generate(&self, target: Address, abi: &Abi) -> String;
}

// =============================================================================
// MOCK TRANSPORT (for testing)
// =============================================================================

/// Scriptable transport spy.
///
/// Records every request so tests can assert exact call counts, and
/// hands out stubbed results: per-method read values, a fixed gas
/// estimate and a queue of receipts.
pub struct MockTransport {
    /// Gas returned by every estimate.
    pub gas_estimate: u64,
    /// Fail every operation with `TransportUnavailable`.
    pub should_fail: bool,
    /// Fail only gas estimation, as a node does for a call that would
    /// revert.
    pub fail_estimates: bool,
    /// Read-only calls seen, in order.
    pub calls: Mutex<Vec<ContractCall>>,
    /// Estimate requests seen, in order.
    pub estimates: Mutex<Vec<Submission>>,
    /// Submissions seen, in order.
    pub submissions: Mutex<Vec<Submission>>,
    call_results: Mutex<HashMap<String, Value>>,
    receipts: Mutex<VecDeque<Receipt>>,
    feed: broadcast::Sender<ContractEvent>,
    next_tx: AtomicU64,
}

impl MockTransport {
    /// A mock that estimates 21000 gas and confirms every submission
    /// with an eventless successful receipt.
    #[must_use]
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(EVENT_FEED_CAPACITY);
        Self {
            gas_estimate: 21_000,
            should_fail: false,
            fail_estimates: false,
            calls: Mutex::new(Vec::new()),
            estimates: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            call_results: Mutex::new(HashMap::new()),
            receipts: Mutex::new(VecDeque::new()),
            feed,
            next_tx: AtomicU64::new(1),
        }
    }

    /// Stubs the decoded result of a read-only method.
    pub fn stub_call(&self, method: &str, result: Value) {
        self.call_results.lock().insert(method.to_string(), result);
    }

    /// Queues the receipt resolved by the next confirmation.
    pub fn push_receipt(&self, receipt: Receipt) {
        self.receipts.lock().push_back(receipt);
    }

    /// Total transport requests of any kind, for zero-spend assertions.
    #[must_use]
    pub fn total_requests(&self) -> usize {
        self.calls.lock().len() + self.estimates.lock().len() + self.submissions.lock().len()
    }

    /// Pushes an event into the raw feed, as the network would.
    pub fn emit(&self, event: ContractEvent) {
        // Dropped silently when nobody subscribed yet.
        let _ = self.feed.send(event);
    }

    fn next_tx_hash(&self) -> Hash {
        let n = self.next_tx.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&n.to_be_bytes());
        Hash::new(bytes)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractTransport for MockTransport {
    async fn call(&self, call: &ContractCall) -> Result<Value, SdkError> {
        if self.should_fail {
            return Err(SdkError::TransportUnavailable("mock offline".to_string()));
        }
        self.calls.lock().push(call.clone());

        self.call_results
            .lock()
            .get(&call.method)
            .cloned()
            .ok_or_else(|| SdkError::ContractCall {
                method: call.method.clone(),
                reason: "execution reverted".to_string(),
            })
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        from: Address,
        value: U256,
    ) -> Result<u64, SdkError> {
        if self.should_fail {
            return Err(SdkError::TransportUnavailable("mock offline".to_string()));
        }
        if self.fail_estimates {
            return Err(SdkError::ContractCall {
                method: call.method.clone(),
                reason: "gas estimation failed: execution reverted".to_string(),
            });
        }
        self.estimates.lock().push(Submission {
            call: call.clone(),
            from,
            gas: 0,
            value,
        });
        Ok(self.gas_estimate)
    }

    async fn submit(&self, submission: Submission) -> Result<PendingTransaction, SdkError> {
        if self.should_fail {
            return Err(SdkError::TransportUnavailable("mock offline".to_string()));
        }
        let pending = PendingTransaction {
            tx_hash: self.next_tx_hash(),
            method: submission.call.method.clone(),
            from: submission.from,
            gas: submission.gas,
            value: submission.value,
        };
        self.submissions.lock().push(submission);
        Ok(pending)
    }

    async fn wait_for_receipt(&self, pending: &PendingTransaction) -> Result<Receipt, SdkError> {
        if self.should_fail {
            return Err(SdkError::TransportUnavailable("mock offline".to_string()));
        }
        let mut receipt = self.receipts.lock().pop_front().unwrap_or_else(|| Receipt {
            success: true,
            gas_used: pending.gas,
            ..Receipt::default()
        });
        receipt.tx_hash = pending.tx_hash;
        Ok(receipt)
    }

    fn event_feed(&self) -> broadcast::Receiver<ContractEvent> {
        self.feed.subscribe()
    }
}

// =============================================================================
// TESTS
// =============================================================================

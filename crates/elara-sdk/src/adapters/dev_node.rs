//! # Dev Node Transport
//!
//! In-memory simulated framework node implementing the transport port.
//!
//! In production the transport is a wallet-injected provider or an RPC
//! endpoint; the dev node keeps the whole framework contract state in
//! process so flows can be driven end to end without a network. It
//! interprets calls by method name, charges deterministic gas, enforces
//! the creation fee and sub-ID limit, and pushes emitted events into a
//! broadcast feed.

use crate::config::ClientConfig;
use crate::domain::abi::{methods, Abi};
use crate::domain::entities::{ContractEvent, PendingTransaction, Receipt};
use crate::domain::errors::SdkError;
use crate::domain::value_objects::{Address, Bytes, Hash, SubId, Value, U256};
use crate::events::names;
use crate::ports::outbound::{ContractCall, ContractTransport, Submission};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Base cost charged for every submission.
const BASE_GAS: u64 = 21_000;
/// Cost per word-sized argument.
const WORD_GAS: u64 = 512;
/// Cost per byte of variable-length payload.
const PAYLOAD_GAS: u64 = 16;

/// Default creation fee charged by a fresh dev node.
const DEFAULT_FEE: u64 = 100;
/// Default sub-ID creation limit.
const DEFAULT_LIMIT: u64 = 64;

/// ABI registered for every logic contract the dev node deploys,
/// exposed through the on-chain `abi()` accessor.
const LOGIC_ABI_JSON: &str = r#"[
    {"name": "ping", "type": "function",
     "outputs": [{"name": "value", "type": "uint256"}]},
    {"name": "echo", "type": "function",
     "inputs": [{"name": "data", "type": "bytes"}],
     "outputs": [{"name": "value", "type": "bytes"}]},
    {"name": "abi", "type": "function",
     "outputs": [{"name": "description", "type": "string"}]},
    {"name": "FunctionCalled", "type": "event",
     "inputs": [{"name": "returnValue", "type": "bytes"}]}
]"#;

#[derive(Debug)]
struct SubIdRecord {
    owner: Address,
    #[allow(dead_code)]
    data_hash: Hash,
    contract: Option<Address>,
}

/// In-memory framework node.
#[derive(Debug)]
pub struct DevNode {
    framework: Address,
    version: String,
    logic_abi: Abi,
    fee: RwLock<U256>,
    limit: RwLock<u64>,
    sub_ids: RwLock<HashMap<SubId, SubIdRecord>>,
    deployed: RwLock<HashMap<Address, Abi>>,
    receipts: RwLock<HashMap<Hash, Receipt>>,
    next_sub_id: AtomicU64,
    next_address: AtomicU64,
    next_tx: AtomicU64,
    block_number: AtomicU64,
    feed: broadcast::Sender<ContractEvent>,
}

impl DevNode {
    /// Dials the configured fallback endpoint. An empty endpoint (no
    /// injected provider, nothing to fall back to) is unreachable.
    pub fn connect(config: &ClientConfig) -> Result<Arc<Self>, SdkError> {
        if config.fallback_endpoint.is_empty() {
            return Err(SdkError::TransportUnavailable(
                "no injected provider and no fallback endpoint configured".to_string(),
            ));
        }
        let (feed, _) = broadcast::channel(config.event_channel_capacity.max(1));
        info!(endpoint = %config.fallback_endpoint, "dev node transport connected");
        Ok(Arc::new(Self {
            framework: config.framework_address,
            version: "2.1.0".to_string(),
            logic_abi: Abi::from_json(LOGIC_ABI_JSON)
                .map_err(|e| SdkError::TransportUnavailable(e.to_string()))?,
            fee: RwLock::new(U256::from(DEFAULT_FEE)),
            limit: RwLock::new(DEFAULT_LIMIT),
            sub_ids: RwLock::new(HashMap::new()),
            deployed: RwLock::new(HashMap::new()),
            receipts: RwLock::new(HashMap::new()),
            next_sub_id: AtomicU64::new(1),
            next_address: AtomicU64::new(1),
            next_tx: AtomicU64::new(1),
            block_number: AtomicU64::new(1),
            feed,
        }))
    }

    /// Overrides the creation fee.
    pub fn set_fee(&self, fee: U256) {
        *self.fee.write() = fee;
    }

    /// Overrides the sub-ID creation limit.
    pub fn set_limit(&self, limit: u64) {
        *self.limit.write() = limit;
    }

    fn revert(call: &ContractCall, reason: &str) -> SdkError {
        SdkError::ContractCall {
            method: call.method.clone(),
            reason: reason.to_string(),
        }
    }

    fn arg_uint(call: &ContractCall, index: usize) -> Result<U256, SdkError> {
        call.args
            .get(index)
            .and_then(Value::as_uint)
            .ok_or_else(|| Self::revert(call, "malformed arguments"))
    }

    fn arg_hash(call: &ContractCall, index: usize) -> Result<Hash, SdkError> {
        call.args
            .get(index)
            .and_then(Value::as_hash)
            .ok_or_else(|| Self::revert(call, "malformed arguments"))
    }

    fn arg_bytes<'a>(call: &'a ContractCall, index: usize) -> Result<&'a Bytes, SdkError> {
        call.args
            .get(index)
            .and_then(Value::as_bytes)
            .ok_or_else(|| Self::revert(call, "malformed arguments"))
    }

    fn call_gas(call: &ContractCall) -> u64 {
        let args: u64 = call
            .args
            .iter()
            .map(|arg| match arg {
                Value::Bytes(b) => PAYLOAD_GAS * b.len() as u64,
                Value::Str(s) => PAYLOAD_GAS * s.len() as u64,
                _ => WORD_GAS,
            })
            .sum();
        BASE_GAS + args
    }

    fn next_tx_hash(&self) -> Hash {
        let n = self.next_tx.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; 32];
        bytes[0] = 0x7c;
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        Hash::new(bytes)
    }

    fn derive_address(&self) -> Address {
        let n = self.next_address.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; 20];
        bytes[0] = 0xd0;
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Address::new(bytes)
    }

    /// Rejects submissions the contract would revert, before any state
    /// is touched. Shared by estimation and execution so an estimate
    /// fails exactly when the submission would.
    fn validate(&self, call: &ContractCall, from: Address, value: U256) -> Result<(), SdkError> {
        if call.target == self.framework {
            match call.method.as_str() {
                methods::CREATE_SUB_ID => {
                    Self::arg_hash(call, 0)?;
                    if value < *self.fee.read() {
                        return Err(Self::revert(call, "insufficient creation fee"));
                    }
                    if self.sub_ids.read().len() as u64 >= *self.limit.read() {
                        return Err(Self::revert(call, "sub-ID limit reached"));
                    }
                    Ok(())
                }
                methods::DEPLOY_SUB_ID => {
                    let sub_id = SubId::new(Self::arg_uint(call, 0)?);
                    Self::arg_bytes(call, 1)?;
                    let records = self.sub_ids.read();
                    let record = records
                        .get(&sub_id)
                        .ok_or_else(|| Self::revert(call, "unknown sub-ID"))?;
                    if record.owner != from {
                        return Err(Self::revert(call, "caller does not own sub-ID"));
                    }
                    if record.contract.is_some() {
                        return Err(Self::revert(call, "logic already deployed"));
                    }
                    Ok(())
                }
                methods::DEPLOY_EMBEDDED_FRAMEWORK => {
                    Self::arg_bytes(call, 0)?;
                    Ok(())
                }
                _ => Err(Self::revert(call, "unknown framework method")),
            }
        } else {
            let deployed = self.deployed.read();
            let abi = deployed
                .get(&call.target)
                .ok_or_else(|| Self::revert(call, "no contract at target address"))?;
            if !abi.has_function(&call.method) {
                return Err(Self::revert(call, "unknown method"));
            }
            Ok(())
        }
    }

    /// Applies a validated submission and returns the emitted events.
    fn execute(
        &self,
        call: &ContractCall,
        from: Address,
        block_number: u64,
        tx_hash: Hash,
    ) -> Vec<ContractEvent> {
        let event = |name: &str, address: Address, args: Vec<(String, Value)>| ContractEvent {
            name: name.to_string(),
            address,
            block_number,
            tx_hash,
            args,
        };

        if call.target == self.framework {
            match call.method.as_str() {
                methods::CREATE_SUB_ID => {
                    let sub_id = SubId::from(self.next_sub_id.fetch_add(1, Ordering::Relaxed));
                    let data_hash = call.args[0].as_hash().unwrap_or(Hash::ZERO);
                    self.sub_ids.write().insert(
                        sub_id,
                        SubIdRecord {
                            owner: from,
                            data_hash,
                            contract: None,
                        },
                    );
                    debug!(%sub_id, owner = %from, "sub-ID minted");
                    vec![event(
                        names::SUB_ID_CREATED,
                        self.framework,
                        vec![(names::ARG_SUB_ID.to_string(), Value::Uint(sub_id.raw()))],
                    )]
                }
                methods::DEPLOY_SUB_ID => {
                    let sub_id = SubId::new(call.args[0].as_uint().unwrap_or_default());
                    let address = self.derive_address();
                    self.deployed.write().insert(address, self.logic_abi.clone());
                    if let Some(record) = self.sub_ids.write().get_mut(&sub_id) {
                        record.contract = Some(address);
                    }
                    debug!(%sub_id, contract = %address, "logic deployed");
                    Vec::new()
                }
                methods::DEPLOY_EMBEDDED_FRAMEWORK => {
                    let address = self.derive_address();
                    self.deployed.write().insert(address, self.logic_abi.clone());
                    debug!(contract = %address, "embedded framework deployed");
                    vec![event(
                        names::EMBEDDED_FRAMEWORK_CREATED,
                        self.framework,
                        vec![(
                            names::ARG_DEPLOYED_CONTRACT.to_string(),
                            Value::Address(address),
                        )],
                    )]
                }
                _ => Vec::new(),
            }
        } else {
            // Deployed logic echoes its first argument, defaulting to 1.
            let return_value = call
                .args
                .first()
                .cloned()
                .unwrap_or(Value::Uint(U256::one()));
            vec![event(
                names::FUNCTION_CALLED,
                call.target,
                vec![(names::ARG_RETURN_VALUE.to_string(), return_value)],
            )]
        }
    }
}

#[async_trait]
impl ContractTransport for DevNode {
    async fn call(&self, call: &ContractCall) -> Result<Value, SdkError> {
        if call.target == self.framework {
            match call.method.as_str() {
                methods::GET_SUB_ID_OWNER => {
                    let sub_id = SubId::new(Self::arg_uint(call, 0)?);
                    let records = self.sub_ids.read();
                    let record = records
                        .get(&sub_id)
                        .ok_or_else(|| Self::revert(call, "unknown sub-ID"))?;
                    Ok(Value::Address(record.owner))
                }
                methods::GET_SUB_ID_CONTRACT => {
                    let sub_id = SubId::new(Self::arg_uint(call, 0)?);
                    let records = self.sub_ids.read();
                    let record = records
                        .get(&sub_id)
                        .ok_or_else(|| Self::revert(call, "unknown sub-ID"))?;
                    Ok(Value::Address(record.contract.unwrap_or(Address::ZERO)))
                }
                methods::GET_SUB_ID_FEE => Ok(Value::Uint(*self.fee.read())),
                methods::GET_SUB_ID_LIMIT => Ok(Value::Uint(U256::from(*self.limit.read()))),
                methods::GET_VERSION => Ok(Value::Str(self.version.clone())),
                _ => Err(Self::revert(call, "unknown framework method")),
            }
        } else {
            let deployed = self.deployed.read();
            let abi = deployed
                .get(&call.target)
                .ok_or_else(|| Self::revert(call, "no contract at target address"))?;
            match call.method.as_str() {
                methods::ABI => {
                    let json = serde_json::to_string(abi)
                        .map_err(|e| SdkError::InvalidAbi(e.to_string()))?;
                    Ok(Value::Str(json))
                }
                _ => Err(Self::revert(call, "unknown method")),
            }
        }
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        from: Address,
        value: U256,
    ) -> Result<u64, SdkError> {
        self.validate(call, from, value)?;
        Ok(Self::call_gas(call))
    }

    async fn submit(&self, submission: Submission) -> Result<PendingTransaction, SdkError> {
        let Submission {
            call,
            from,
            gas,
            value,
        } = submission;
        self.validate(&call, from, value)?;

        let required = Self::call_gas(&call);
        if gas < required {
            return Err(Self::revert(&call, "intrinsic gas too low"));
        }

        let block_number = self.block_number.fetch_add(1, Ordering::Relaxed);
        let tx_hash = self.next_tx_hash();
        let events = self.execute(&call, from, block_number, tx_hash);

        for event in &events {
            if self.feed.send(event.clone()).is_err() {
                debug!(event = %event.name, "event dropped (no subscribers)");
            }
        }

        self.receipts.write().insert(
            tx_hash,
            Receipt {
                tx_hash,
                block_number,
                gas_used: required,
                success: true,
                revert_reason: None,
                events,
            },
        );

        Ok(PendingTransaction {
            tx_hash,
            method: call.method,
            from,
            gas,
            value,
        })
    }

    async fn wait_for_receipt(&self, pending: &PendingTransaction) -> Result<Receipt, SdkError> {
        self.receipts
            .write()
            .remove(&pending.tx_hash)
            .ok_or_else(|| SdkError::ContractCall {
                method: pending.method.clone(),
                reason: "unknown transaction".to_string(),
            })
    }

    fn event_feed(&self) -> broadcast::Receiver<ContractEvent> {
        self.feed.subscribe()
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! # Framework Client
//!
//! Application service orchestrating framework interaction over the
//! outbound ports: sub-ID registry queries, the
//! estimate → submit → await-inclusion → extract pipeline for
//! state-changing calls, event subscriptions and wallet binding.

use crate::config::ClientConfig;
use crate::domain::abi::{methods, Abi, FrameworkCapabilities};
use crate::domain::entities::{CallOptions, Receipt, SubIdInfo};
use crate::domain::errors::SdkError;
use crate::domain::value_objects::{Address, Bytes, Hash, SubId, Value, U256};
use crate::events::{names, EventFilter, EventObserver, EventStream, EventSubscription};
use crate::ports::inbound::FrameworkApi;
use crate::ports::outbound::{
    CodeGenerator, ContractCall, ContractTransport, Submission, WalletProvider,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Client for one deployed framework contract.
///
/// Generic over the transport port; the wallet provider is optional and
/// only consulted by [`ElaraClient::connect_wallet`]. The bound account
/// is per-client state with a single writer (`connect_wallet`) and many
/// readers; concurrent connects race with last-writer-wins.
pub struct ElaraClient<T: ContractTransport> {
    config: ClientConfig,
    abi: Abi,
    capabilities: FrameworkCapabilities,
    transport: Arc<T>,
    wallet: Option<Arc<dyn WalletProvider>>,
    account: RwLock<Option<Address>>,
}

impl<T: ContractTransport> ElaraClient<T> {
    /// Binds a client to a framework contract. Capability flags are
    /// derived from the ABI here, once.
    #[must_use]
    pub fn new(config: ClientConfig, abi: Abi, transport: Arc<T>) -> Self {
        let capabilities = FrameworkCapabilities::detect(&abi);
        debug!(
            framework = %config.framework_address,
            embedded_frameworks = capabilities.embedded_frameworks,
            "framework client constructed"
        );
        Self {
            config,
            abi,
            capabilities,
            transport,
            wallet: None,
            account: RwLock::new(None),
        }
    }

    /// Attaches a wallet provider. Without one, `connect_wallet`
    /// reports failure.
    #[must_use]
    pub fn with_wallet(mut self, wallet: Arc<dyn WalletProvider>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// The framework contract this client is bound to.
    #[must_use]
    pub fn framework_address(&self) -> Address {
        self.config.framework_address
    }

    /// Capability flags derived from the bound ABI.
    #[must_use]
    pub fn capabilities(&self) -> FrameworkCapabilities {
        self.capabilities
    }

    /// The bound framework ABI.
    #[must_use]
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Pull-based alternative to the observer callback: a filtered
    /// stream over the transport's event feed.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.transport.event_feed(), filter)
    }

    fn require_account(&self) -> Result<Address, SdkError> {
        (*self.account.read()).ok_or(SdkError::NoActiveAccount)
    }

    /// Read-only query against the framework contract.
    async fn read(&self, method: &str, args: Vec<Value>) -> Result<Value, SdkError> {
        self.transport
            .call(&ContractCall::new(
                self.config.framework_address,
                method,
                args,
            ))
            .await
    }

    /// The sequential pipeline every state-changing verb runs:
    /// estimate, submit with the estimated budget, await inclusion.
    /// An estimation failure aborts before anything is broadcast; a
    /// reverted receipt surfaces as a contract-call failure.
    async fn execute(&self, call: ContractCall, value: U256) -> Result<Receipt, SdkError> {
        let from = self.require_account()?;
        let gas = self.transport.estimate_gas(&call, from, value).await?;
        debug!(method = %call.method, gas, "gas estimated");

        let method = call.method.clone();
        let pending = self
            .transport
            .submit(Submission {
                call,
                from,
                gas,
                value,
            })
            .await?;
        info!(method = %method, tx_hash = %pending.tx_hash, "transaction submitted");

        let receipt = self.transport.wait_for_receipt(&pending).await?;
        if !receipt.success {
            return Err(SdkError::ContractCall {
                method,
                reason: receipt
                    .revert_reason
                    .unwrap_or_else(|| "execution reverted".to_string()),
            });
        }
        debug!(
            tx_hash = %receipt.tx_hash,
            block = receipt.block_number,
            gas_used = receipt.gas_used,
            "transaction confirmed"
        );
        Ok(receipt)
    }

    /// Resolves a sub-ID to its deployed logic contract.
    async fn resolve_deployed_contract(&self, sub_id: SubId) -> Result<Address, SdkError> {
        let raw = self
            .read(methods::GET_SUB_ID_CONTRACT, vec![Value::Uint(sub_id.raw())])
            .await?;
        let address = raw.as_address().ok_or_else(|| SdkError::ValueType {
            arg: methods::GET_SUB_ID_CONTRACT.to_string(),
            expected: "address",
        })?;
        if address.is_zero() {
            return Err(SdkError::NotDeployed(sub_id));
        }
        Ok(address)
    }
}

#[async_trait]
impl<T: ContractTransport> FrameworkApi for ElaraClient<T> {
    async fn create_sub_id(
        &self,
        data_hash: Hash,
        options: &CallOptions,
    ) -> Result<SubId, SdkError> {
        let value = options.fee_or_zero();
        let call = ContractCall::new(
            self.config.framework_address,
            methods::CREATE_SUB_ID,
            vec![Value::Hash(data_hash)],
        );
        let receipt = self.execute(call, value).await?;

        let raw = receipt.require_event_arg(names::SUB_ID_CREATED, names::ARG_SUB_ID)?;
        let sub_id = SubId::new(raw.as_uint().ok_or_else(|| SdkError::ValueType {
            arg: names::ARG_SUB_ID.to_string(),
            expected: "uint256",
        })?);
        info!(%sub_id, "sub-ID created");
        Ok(sub_id)
    }

    async fn deploy_sub_id_logic(&self, sub_id: SubId, bytecode: Bytes) -> Result<(), SdkError> {
        let call = ContractCall::new(
            self.config.framework_address,
            methods::DEPLOY_SUB_ID,
            vec![Value::Uint(sub_id.raw()), Value::Bytes(bytecode)],
        );
        self.execute(call, U256::zero()).await?;
        info!(%sub_id, "sub-ID logic deployed");
        Ok(())
    }

    async fn deploy_embedded_framework(
        &self,
        bytecode: Bytes,
        options: &CallOptions,
    ) -> Result<Address, SdkError> {
        if !self.capabilities.embedded_frameworks {
            return Err(SdkError::CapabilityUnsupported(
                methods::DEPLOY_EMBEDDED_FRAMEWORK,
            ));
        }

        let value = options.fee_or_zero();
        let call = ContractCall::new(
            self.config.framework_address,
            methods::DEPLOY_EMBEDDED_FRAMEWORK,
            vec![Value::Bytes(bytecode)],
        );
        let receipt = self.execute(call, value).await?;

        let raw = receipt.require_event_arg(
            names::EMBEDDED_FRAMEWORK_CREATED,
            names::ARG_DEPLOYED_CONTRACT,
        )?;
        let address = raw.as_address().ok_or_else(|| SdkError::ValueType {
            arg: names::ARG_DEPLOYED_CONTRACT.to_string(),
            expected: "address",
        })?;
        info!(contract = %address, "embedded framework deployed");
        Ok(address)
    }

    async fn get_sub_id_info(&self, sub_id: SubId) -> Result<SubIdInfo, SdkError> {
        let owner = self
            .read(methods::GET_SUB_ID_OWNER, vec![Value::Uint(sub_id.raw())])
            .await?
            .as_address()
            .ok_or_else(|| SdkError::ValueType {
                arg: methods::GET_SUB_ID_OWNER.to_string(),
                expected: "address",
            })?;
        let contract = self
            .read(methods::GET_SUB_ID_CONTRACT, vec![Value::Uint(sub_id.raw())])
            .await?
            .as_address()
            .ok_or_else(|| SdkError::ValueType {
                arg: methods::GET_SUB_ID_CONTRACT.to_string(),
                expected: "address",
            })?;
        Ok(SubIdInfo {
            owner,
            deployed_contract: (!contract.is_zero()).then_some(contract),
        })
    }

    async fn call_sub_id_function(
        &self,
        sub_id: SubId,
        function: &str,
        args: Vec<Value>,
        contract_abi: &Abi,
    ) -> Result<Value, SdkError> {
        if !contract_abi.has_function(function) {
            return Err(SdkError::UnknownFunction(function.to_string()));
        }

        let target = self.resolve_deployed_contract(sub_id).await?;
        let receipt = self
            .execute(ContractCall::new(target, function, args), U256::zero())
            .await?;

        let raw = receipt.require_event_arg(names::FUNCTION_CALLED, names::ARG_RETURN_VALUE)?;
        Ok(raw.clone())
    }

    async fn get_framework_version(&self) -> Result<String, SdkError> {
        let raw = self.read(methods::GET_VERSION, vec![]).await?;
        raw.as_str()
            .map(ToString::to_string)
            .ok_or_else(|| SdkError::ValueType {
                arg: methods::GET_VERSION.to_string(),
                expected: "string",
            })
    }

    async fn get_sub_id_fee(&self) -> Result<U256, SdkError> {
        let raw = self.read(methods::GET_SUB_ID_FEE, vec![]).await?;
        raw.as_uint().ok_or_else(|| SdkError::ValueType {
            arg: methods::GET_SUB_ID_FEE.to_string(),
            expected: "uint256",
        })
    }

    async fn get_sub_id_limit(&self) -> Result<U256, SdkError> {
        let raw = self.read(methods::GET_SUB_ID_LIMIT, vec![]).await?;
        raw.as_uint().ok_or_else(|| SdkError::ValueType {
            arg: methods::GET_SUB_ID_LIMIT.to_string(),
            expected: "uint256",
        })
    }

    async fn generate_interaction_code(
        &self,
        sub_id: SubId,
        generator: &dyn CodeGenerator,
    ) -> Result<String, SdkError> {
        let target = self.resolve_deployed_contract(sub_id).await?;
        let raw = self
            .transport
            .call(&ContractCall::new(target, methods::ABI, vec![]))
            .await?;
        let json = raw.as_str().ok_or_else(|| SdkError::ValueType {
            arg: methods::ABI.to_string(),
            expected: "string",
        })?;
        let abi = Abi::from_json(json)?;
        Ok(generator.generate(target, &abi))
    }

    fn subscribe_to_event(&self, event_name: &str, observer: EventObserver) -> EventSubscription {
        EventSubscription::spawn(
            self.transport.event_feed(),
            EventFilter::named(event_name),
            observer,
        )
    }

    async fn connect_wallet(&self) -> bool {
        let Some(wallet) = &self.wallet else {
            warn!("no wallet provider configured");
            return false;
        };
        match wallet.request_accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(first) => {
                    *self.account.write() = Some(*first);
                    info!(account = %first, "wallet connected");
                    true
                }
                None => {
                    error!("wallet provider granted access to no accounts");
                    false
                }
            },
            Err(err) => {
                error!(error = %err, "wallet connection failed");
                false
            }
        }
    }

    fn active_account(&self) -> Option<Address> {
        *self.account.read()
    }
}

// =============================================================================
// TESTS
// =============================================================================

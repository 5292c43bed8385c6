//! # Driving Ports (API - Inbound)
//!
//! The public operation surface of the SDK. Applications depend on this
//! trait; [`crate::service::ElaraClient`] is the production
//! implementation.

use crate::domain::abi::Abi;
use crate::domain::entities::{CallOptions, SubIdInfo};
use crate::domain::errors::SdkError;
use crate::domain::value_objects::{Address, Bytes, Hash, SubId, Value, U256};
use crate::events::{EventObserver, EventSubscription};
use crate::ports::outbound::CodeGenerator;
use async_trait::async_trait;

/// Framework interaction API.
///
/// Every state-changing operation runs the sequential
/// estimate → submit → await-inclusion → extract pipeline and requires
/// a bound account. Independent operations may be issued concurrently;
/// the SDK imposes no serialization of its own.
#[async_trait]
pub trait FrameworkApi: Send + Sync {
    /// Mints a new sub-ID for a data hash, attaching `options.fee`
    /// (default zero) as call value. Returns the identifier extracted
    /// from the `SubIdCreated` event.
    async fn create_sub_id(
        &self,
        data_hash: Hash,
        options: &CallOptions,
    ) -> Result<SubId, SdkError>;

    /// Deploys logic bytecode under an existing sub-ID. Confirmation
    /// only; the deployed address is read back through
    /// [`FrameworkApi::get_sub_id_info`].
    async fn deploy_sub_id_logic(&self, sub_id: SubId, bytecode: Bytes) -> Result<(), SdkError>;

    /// Deploys a standalone embedded framework instance. Fails with
    /// [`SdkError::CapabilityUnsupported`] before any network round
    /// trip when the bound framework version lacks the capability.
    async fn deploy_embedded_framework(
        &self,
        bytecode: Bytes,
        options: &CallOptions,
    ) -> Result<Address, SdkError>;

    /// Ownership and deployment state of a sub-ID: two independent
    /// read-only queries combined into one result. Either query's
    /// failure propagates unconverted.
    async fn get_sub_id_info(&self, sub_id: SubId) -> Result<SubIdInfo, SdkError>;

    /// Invokes a named function on the logic contract deployed under a
    /// sub-ID and returns the `returnValue` of its `FunctionCalled`
    /// event. The deployed contract's ABI must be supplied; the
    /// function has to be declared there.
    async fn call_sub_id_function(
        &self,
        sub_id: SubId,
        function: &str,
        args: Vec<Value>,
        contract_abi: &Abi,
    ) -> Result<Value, SdkError>;

    /// Framework version string.
    async fn get_framework_version(&self) -> Result<String, SdkError>;

    /// Current sub-ID creation fee. Pure query.
    async fn get_sub_id_fee(&self) -> Result<U256, SdkError>;

    /// Sub-ID creation limit. Pure query.
    async fn get_sub_id_limit(&self) -> Result<U256, SdkError>;

    /// Fetches a deployed contract's ABI through its on-chain `abi()`
    /// accessor and delegates rendering to the supplied generator.
    async fn generate_interaction_code(
        &self,
        sub_id: SubId,
        generator: &dyn CodeGenerator,
    ) -> Result<String, SdkError>;

    /// Opens a subscription on the named event starting at the latest
    /// block and returns its cancellation handle.
    fn subscribe_to_event(&self, event_name: &str, observer: EventObserver) -> EventSubscription;

    /// Requests account access from the wallet provider and binds the
    /// first granted account. Returns false (with the cause logged) on
    /// provider absence or rejection; never raises past this boundary.
    async fn connect_wallet(&self) -> bool;

    /// The currently bound account, if any.
    fn active_account(&self) -> Option<Address>;
}

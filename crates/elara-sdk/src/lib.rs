//! # Elara SDK
//!
//! Client SDK for the Elara framework contract: sub-ID lifecycle,
//! logic deployment and invocation, and contract event subscriptions,
//! all mediated through an estimate → submit → await-receipt pipeline
//! with typed result extraction from event logs.
//!
//! The ledger client and wallet provider are injected capabilities;
//! consensus, validation, signing internals and gas pricing are their
//! concern, not this crate's.
//!
//! ## Module Structure
//!
//! ```text
//! elara-sdk/
//! ├── domain/          # value objects, entities, ABI model, errors
//! ├── ports/           # FrameworkApi; transport/wallet/codegen ports
//! ├── adapters/        # dev node transport, static wallet, codegen stub
//! ├── events           # subscription handles and streams
//! └── service          # ElaraClient
//! ```
//!
//! ## Example
//!
//! ```
//! use elara_sdk::{
//!     CallOptions, ClientConfig, DevNode, ElaraClient, FrameworkApi, Hash, StaticWallet,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), elara_sdk::SdkError> {
//! let config = ClientConfig::for_testing();
//! let node = DevNode::connect(&config)?;
//! let abi = elara_sdk::Abi::default();
//! let wallet = Arc::new(StaticWallet::new(vec![elara_sdk::Address::new([1u8; 20])]));
//!
//! let client = ElaraClient::new(config, abi, node).with_wallet(wallet);
//! assert!(client.connect_wallet().await);
//!
//! let fee = client.get_sub_id_fee().await?;
//! let sub_id = client
//!     .create_sub_id(Hash::new([0xde; 32]), &CallOptions::with_fee(fee))
//!     .await?;
//! # let _ = sub_id;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{DevNode, RustBindingGenerator, StaticWallet};
pub use config::ClientConfig;
pub use domain::{
    methods, Abi, AbiEntry, AbiEntryKind, AbiParam, Address, Bytes, CallOptions, ContractEvent,
    FrameworkCapabilities, Hash, PendingTransaction, Receipt, SdkError, SubId, SubIdInfo, Value,
    U256,
};
pub use events::{names, EventFilter, EventObserver, EventStream, EventSubscription};
pub use ports::{
    CodeGenerator, ContractCall, ContractTransport, FrameworkApi, MockTransport, Submission,
    WalletProvider,
};
pub use service::ElaraClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

//! # Ports
//!
//! Inbound (driving) and outbound (driven) interfaces of the SDK.

pub mod inbound;
pub mod outbound;

pub use inbound::FrameworkApi;
pub use outbound::{
    CodeGenerator, ContractCall, ContractTransport, MockTransport, Submission, WalletProvider,
    EVENT_FEED_CAPACITY,
};

//! # Domain Layer
//!
//! Value objects, entities, the ABI model and the error taxonomy.

pub mod abi;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use abi::{methods, Abi, AbiEntry, AbiEntryKind, AbiParam, FrameworkCapabilities};
pub use entities::{CallOptions, ContractEvent, PendingTransaction, Receipt, SubIdInfo};
pub use errors::SdkError;
pub use value_objects::{Address, Bytes, Hash, SubId, Value, U256};

//! # Adapters
//!
//! Concrete implementations of the outbound ports: the in-memory dev
//! node transport, the static wallet provider and the code-generation
//! stub.

pub mod codegen;
pub mod dev_node;
pub mod wallet;

pub use codegen::RustBindingGenerator;
pub use dev_node::DevNode;
pub use wallet::StaticWallet;

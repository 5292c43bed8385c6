//! # Code Generation Stub
//!
//! Placeholder implementation of the external code-generation
//! collaborator: renders a typed interaction skeleton from a contract
//! ABI. Real binding generation is out of scope for the SDK.

use crate::domain::abi::{Abi, AbiEntryKind};
use crate::domain::value_objects::Address;
use crate::ports::outbound::CodeGenerator;
use std::fmt::Write;

/// Renders Rust-flavoured interaction stubs for a deployed contract.
#[derive(Clone, Copy, Debug, Default)]
pub struct RustBindingGenerator;

impl CodeGenerator for RustBindingGenerator {
    fn generate(&self, target: Address, abi: &Abi) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "// Interaction bindings for contract {target:?}");
        for entry in &abi.0 {
            match entry.kind {
                AbiEntryKind::Function => {
                    let params = entry
                        .inputs
                        .iter()
                        .map(|p| format!("{}: Value", snake_case(&p.name)))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let _ = writeln!(
                        out,
                        "pub async fn {}({params}) -> Result<Value, SdkError> {{ todo!() }}",
                        snake_case(&entry.name)
                    );
                }
                AbiEntryKind::Event => {
                    let _ = writeln!(out, "// event {}", entry.name);
                }
                AbiEntryKind::Constructor => {}
            }
        }
        out
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

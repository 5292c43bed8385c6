//! # ABI Model
//!
//! Contract ABI descriptions are external configuration: an array of
//! method/event descriptors supplied at construction, never derived.
//! Capability flags are computed from the ABI once, at client
//! construction, instead of duck-typed per call.

use crate::domain::errors::SdkError;
use serde::{Deserialize, Serialize};

/// Framework method names the client invokes, matched exactly.
pub mod methods {
    /// Mints a new sub-ID for a data hash.
    pub const CREATE_SUB_ID: &str = "createSubId";
    /// Deploys logic bytecode under an existing sub-ID.
    pub const DEPLOY_SUB_ID: &str = "deploySubId";
    /// Deploys a standalone embedded framework instance. Optional;
    /// presence drives the capability flag.
    pub const DEPLOY_EMBEDDED_FRAMEWORK: &str = "deployEmbeddedFramework";
    /// Returns the owner of a sub-ID.
    pub const GET_SUB_ID_OWNER: &str = "getSubIdOwner";
    /// Returns the logic contract deployed under a sub-ID.
    pub const GET_SUB_ID_CONTRACT: &str = "getSubIdContract";
    /// Returns the current sub-ID creation fee.
    pub const GET_SUB_ID_FEE: &str = "getSubIdFee";
    /// Returns the sub-ID creation limit.
    pub const GET_SUB_ID_LIMIT: &str = "getSubIdLimit";
    /// Returns the framework version string.
    pub const GET_VERSION: &str = "getVersion";
    /// Optional introspection accessor exposed by deployed logic
    /// contracts, returning their ABI as a JSON string.
    pub const ABI: &str = "abi";
}

// =============================================================================
// DESCRIPTORS
// =============================================================================

/// Kind of an ABI entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiEntryKind {
    /// Callable function.
    Function,
    /// Emitted event.
    Event,
    /// Constructor, listed for completeness.
    Constructor,
}

/// One named parameter of a function or event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Parameter name.
    #[serde(default)]
    pub name: String,
    /// Solidity-style type name, kept opaque.
    #[serde(rename = "type")]
    pub type_name: String,
}

/// One method or event descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEntry {
    /// Entry name, matched exactly.
    pub name: String,
    /// Function, event or constructor.
    #[serde(rename = "type")]
    pub kind: AbiEntryKind,
    /// Input parameters.
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    /// Output parameters (functions only).
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
}

/// An ordered ABI description for one contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Abi(pub Vec<AbiEntry>);

impl Abi {
    /// Parses an ABI from its JSON array form.
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        serde_json::from_str(json).map_err(|e| SdkError::InvalidAbi(e.to_string()))
    }

    /// Looks up a function entry by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&AbiEntry> {
        self.0
            .iter()
            .find(|e| e.kind == AbiEntryKind::Function && e.name == name)
    }

    /// Looks up an event entry by name.
    #[must_use]
    pub fn event(&self, name: &str) -> Option<&AbiEntry> {
        self.0
            .iter()
            .find(|e| e.kind == AbiEntryKind::Event && e.name == name)
    }

    /// Returns true if a function with the given name is declared.
    #[must_use]
    pub fn has_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for an empty description.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// What the bound framework version supports, derived once at client
/// construction from its ABI. Gated operations consult these flags
/// locally before spending gas on a call guaranteed to revert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameworkCapabilities {
    /// The framework declares `deployEmbeddedFramework`.
    pub embedded_frameworks: bool,
}

impl FrameworkCapabilities {
    /// Derives the capability flags from a framework ABI.
    #[must_use]
    pub fn detect(abi: &Abi) -> Self {
        Self {
            embedded_frameworks: abi.has_function(methods::DEPLOY_EMBEDDED_FRAMEWORK),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Chain-facing types shared with the injected collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A principal address on the target chain, kept in its textual form.
///
/// Address validity is the wallet's and the node's business; this client
/// only threads the string through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a submitted transaction, as returned by the signing
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed argument to a contract function.
///
/// Serializes to the `{"type": ..., "value": ...}` shape the node and
/// wallet APIs expect; uints are carried as decimal strings so the full
/// u128 range survives JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FunctionArg {
    Uint(String),
    Principal(String),
}

impl FunctionArg {
    pub fn uint(value: u128) -> Self {
        Self::Uint(value.to_string())
    }

    pub fn principal(addr: &Address) -> Self {
        Self::Principal(addr.as_str().to_string())
    }
}

/// Guard attached to a state-changing call, enforced by the chain at
/// execution time (e.g. "transfer no more than N base units").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCondition {
    /// Principal the condition applies to.
    pub principal: Address,
    /// Comparison applied to the transferred amount.
    pub condition: ConditionCode,
    /// Amount in base units the comparison is made against.
    pub amount: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionCode {
    Eq,
    LessEq,
    GreaterEq,
}

/// Payload for a read-only function call.
#[derive(Debug, Clone, Serialize)]
pub struct ReadOnlyCall {
    pub contract_address: Address,
    pub contract_name: String,
    pub function_name: String,
    pub function_args: Vec<FunctionArg>,
    /// Sender attributed to the read; empty string when unauthenticated.
    pub sender_address: String,
}

/// Payload for a state-changing call handed to the signing collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ContractCall {
    pub contract_address: Address,
    pub contract_name: String,
    pub function_name: String,
    pub function_args: Vec<FunctionArg>,
    pub post_conditions: Vec<PostCondition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_arg_wire_shape() {
        let arg = FunctionArg::uint(5_000_000);
        let json = serde_json::to_value(&arg).unwrap();
        assert_eq!(json["type"], "uint");
        assert_eq!(json["value"], "5000000");

        let decoded: FunctionArg = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, arg);
    }

    #[test]
    fn test_principal_arg() {
        let addr = Address::new("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG");
        let arg = FunctionArg::principal(&addr);
        let json = serde_json::to_value(&arg).unwrap();
        assert_eq!(json["type"], "principal");
        assert_eq!(json["value"], addr.as_str());
    }

    #[test]
    fn test_address_transparent_serde() {
        let addr = Address::new("ST000000000000000000002AMW42H");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"ST000000000000000000002AMW42H\"");
    }
}

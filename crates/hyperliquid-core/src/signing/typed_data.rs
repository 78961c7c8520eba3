//! Minimal EIP-712 struct hashing.
//!
//! Every message the venue signs is a flat struct of `string`, `address`,
//! `uint64`, `bool` and `bytes32` members, so the encoder only covers those.

use alloy_primitives::{keccak256, Address, B256, U256};
use serde_json::{json, Map, Value};

use super::domain::Eip712Domain;
use crate::serde_utils::lower_hex;

/// A single member value of a flat EIP-712 struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    String(String),
    Address(Address),
    Uint64(u64),
    Bool(bool),
    Bytes32(B256),
}

impl TypedValue {
    /// Solidity type name used in the type string.
    pub fn sol_type(&self) -> &'static str {
        match self {
            TypedValue::String(_) => "string",
            TypedValue::Address(_) => "address",
            TypedValue::Uint64(_) => "uint64",
            TypedValue::Bool(_) => "bool",
            TypedValue::Bytes32(_) => "bytes32",
        }
    }

    /// `encodeData` word for this member.
    pub fn encode(&self) -> B256 {
        match self {
            TypedValue::String(s) => keccak256(s.as_bytes()),
            TypedValue::Address(a) => B256::left_padding_from(a.as_slice()),
            TypedValue::Uint64(n) => B256::from(U256::from(*n).to_be_bytes::<32>()),
            TypedValue::Bool(b) => B256::with_last_byte(*b as u8),
            TypedValue::Bytes32(h) => *h,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            TypedValue::String(s) => json!(s),
            TypedValue::Address(a) => json!(lower_hex(a)),
            TypedValue::Uint64(n) => json!(n),
            TypedValue::Bool(b) => json!(b),
            TypedValue::Bytes32(h) => json!(h.to_string()),
        }
    }
}

/// Named struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedField {
    pub name: String,
    pub value: TypedValue,
}

impl TypedField {
    pub fn new(name: impl Into<String>, value: TypedValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, TypedValue::String(value.into()))
    }

    pub fn address(name: impl Into<String>, value: Address) -> Self {
        Self::new(name, TypedValue::Address(value))
    }

    pub fn uint64(name: impl Into<String>, value: u64) -> Self {
        Self::new(name, TypedValue::Uint64(value))
    }

    pub fn bool(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, TypedValue::Bool(value))
    }

    pub fn bytes32(name: impl Into<String>, value: B256) -> Self {
        Self::new(name, TypedValue::Bytes32(value))
    }
}

/// A domain, a primary type and its ordered members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedData {
    pub domain: Eip712Domain,
    pub primary_type: String,
    pub fields: Vec<TypedField>,
}

impl TypedData {
    pub fn new(domain: Eip712Domain, primary_type: impl Into<String>, fields: Vec<TypedField>) -> Self {
        Self {
            domain,
            primary_type: primary_type.into(),
            fields,
        }
    }

    /// `encodeType`, e.g. `Agent(string source,bytes32 connectionId)`.
    pub fn type_string(&self) -> String {
        let members: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("{} {}", f.value.sol_type(), f.name))
            .collect();
        format!("{}({})", self.primary_type, members.join(","))
    }

    pub fn type_hash(&self) -> B256 {
        keccak256(self.type_string().as_bytes())
    }

    /// `hashStruct` of the message.
    pub fn struct_hash(&self) -> B256 {
        let mut encoded = Vec::with_capacity(32 * (self.fields.len() + 1));
        encoded.extend_from_slice(self.type_hash().as_slice());
        for field in &self.fields {
            encoded.extend_from_slice(field.value.encode().as_slice());
        }
        keccak256(&encoded)
    }

    /// Final digest to sign.
    pub fn signing_hash(&self) -> B256 {
        compute_typed_data_hash(self.domain.separator(), self.struct_hash())
    }

    /// Standard EIP-712 JSON (`domain`, `types`, `primaryType`, `message`).
    pub fn to_json(&self) -> Value {
        let member_types: Vec<Value> = self
            .fields
            .iter()
            .map(|f| json!({ "name": f.name, "type": f.value.sol_type() }))
            .collect();

        let mut message = Map::new();
        for field in &self.fields {
            message.insert(field.name.clone(), field.value.to_json());
        }

        let mut types = Map::new();
        types.insert(
            "EIP712Domain".to_string(),
            json!([
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" },
            ]),
        );
        types.insert(self.primary_type.clone(), Value::Array(member_types));

        json!({
            "domain": self.domain.to_json(),
            "types": types,
            "primaryType": self.primary_type,
            "message": message,
        })
    }
}

/// `keccak256(0x1901 ‖ domainSeparator ‖ structHash)`.
pub fn compute_typed_data_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut data = [0u8; 66];
    data[..2].copy_from_slice(&[0x19, 0x01]);
    data[2..34].copy_from_slice(domain_separator.as_slice());
    data[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(data)
}

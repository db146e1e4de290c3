//! Ledger body types as the daemon serializes them.
//!
//! Field names follow the daemon's JSON (PascalCase, with `ID` acronyms kept
//! upper-case). Slices may arrive as `null` and decode as empty. Every field
//! that feeds the binary encoding is typed; signatures are display-only and
//! stay raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::primitives::{nullable, Bytes, Currency, Hash, Segment, Specifier, UnlockHash};

/// A coin output: an amount and the address that may spend it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiacoinOutput {
    pub value: Currency,
    pub unlock_hash: UnlockHash,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SiaPublicKey {
    pub algorithm: Specifier,
    pub key: Bytes,
}

/// The spend policy an address commits to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UnlockConditions {
    pub timelock: u64,
    #[serde(deserialize_with = "nullable")]
    pub public_keys: Vec<SiaPublicKey>,
    #[serde(alias = "NumSignatures")]
    pub signatures_required: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiacoinInput {
    #[serde(rename = "ParentID")]
    pub parent_id: Hash,
    #[serde(default)]
    pub unlock_conditions: UnlockConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiafundInput {
    #[serde(rename = "ParentID")]
    pub parent_id: Hash,
    #[serde(default)]
    pub unlock_conditions: UnlockConditions,
    #[serde(default)]
    pub claim_unlock_hash: UnlockHash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiafundOutput {
    pub value: Currency,
    pub unlock_hash: UnlockHash,
    #[serde(default)]
    pub claim_start: Currency,
}

/// A storage agreement whose payout depends on whether a proof is submitted
/// inside the window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileContract {
    pub file_size: u64,
    pub file_merkle_root: Hash,
    pub window_start: u64,
    pub window_end: u64,
    pub payout: Currency,
    #[serde(deserialize_with = "nullable")]
    pub valid_proof_outputs: Vec<SiacoinOutput>,
    #[serde(deserialize_with = "nullable")]
    pub missed_proof_outputs: Vec<SiacoinOutput>,
    pub unlock_hash: UnlockHash,
    pub revision_number: u64,
}

/// A revision replaces the proof outputs of the contract named by `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileContractRevision {
    #[serde(rename = "ParentID")]
    pub parent_id: Hash,
    #[serde(default)]
    pub unlock_conditions: UnlockConditions,
    #[serde(default)]
    pub new_revision_number: u64,
    #[serde(default)]
    pub new_file_size: u64,
    #[serde(default)]
    pub new_file_merkle_root: Hash,
    #[serde(default)]
    pub new_window_start: u64,
    #[serde(default)]
    pub new_window_end: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub new_valid_proof_outputs: Vec<SiacoinOutput>,
    #[serde(default, deserialize_with = "nullable")]
    pub new_missed_proof_outputs: Vec<SiacoinOutput>,
    #[serde(default)]
    pub new_unlock_hash: UnlockHash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageProof {
    #[serde(rename = "ParentID")]
    pub parent_id: Hash,
    #[serde(default)]
    pub segment: Segment,
    #[serde(default, deserialize_with = "nullable")]
    pub hash_set: Vec<Hash>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Transaction {
    #[serde(deserialize_with = "nullable")]
    pub siacoin_inputs: Vec<SiacoinInput>,
    #[serde(deserialize_with = "nullable")]
    pub siacoin_outputs: Vec<SiacoinOutput>,
    #[serde(deserialize_with = "nullable")]
    pub file_contracts: Vec<FileContract>,
    #[serde(deserialize_with = "nullable")]
    pub file_contract_revisions: Vec<FileContractRevision>,
    #[serde(deserialize_with = "nullable")]
    pub storage_proofs: Vec<StorageProof>,
    #[serde(deserialize_with = "nullable")]
    pub siafund_inputs: Vec<SiafundInput>,
    #[serde(deserialize_with = "nullable")]
    pub siafund_outputs: Vec<SiafundOutput>,
    #[serde(deserialize_with = "nullable")]
    pub miner_fees: Vec<Currency>,
    #[serde(deserialize_with = "nullable")]
    pub arbitrary_data: Vec<Bytes>,
    #[serde(deserialize_with = "nullable")]
    pub transaction_signatures: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    #[serde(rename = "ParentID")]
    pub parent_id: Hash,
    #[serde(default)]
    pub nonce: [u8; 8],
    pub timestamp: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub miner_payouts: Vec<SiacoinOutput>,
    #[serde(default, deserialize_with = "nullable")]
    pub transactions: Vec<Transaction>,
}

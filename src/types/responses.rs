//! Response envelopes returned by the daemon's explorer and host endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ledger::{Block, FileContract, FileContractRevision, StorageProof, Transaction};
use super::primitives::{nullable, Currency, Hash, Target};

/// `ResponseType == "Block"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockResponse {
    pub block: Block,
    pub height: u64,
}

/// `ResponseType == "Transaction"`. `parent_id` is the containing block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionResponse {
    pub tx: Transaction,
    #[serde(rename = "ParentID")]
    pub parent_id: Hash,
    #[serde(default)]
    pub tx_num: u64,
}

/// `ResponseType == "Output"`: names the entity that created the output and,
/// when spent, the transaction that spent it (zero otherwise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputResponse {
    pub output_tx: Hash,
    #[serde(default)]
    pub input_tx: Hash,
}

/// `ResponseType == "Address"`: every transaction touching the address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddrResponse {
    #[serde(deserialize_with = "nullable")]
    pub txns: Vec<Hash>,
}

/// `ResponseType == "FileContract"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FcResponse {
    pub contract: FileContract,
    #[serde(default)]
    pub contract_txid: Hash,
    #[serde(default, deserialize_with = "nullable")]
    pub revisions: Vec<FileContractRevision>,
    #[serde(default, deserialize_with = "nullable")]
    pub revision_txid: Vec<Hash>,
    #[serde(default)]
    pub proof: Option<StorageProof>,
    #[serde(default)]
    pub proof_txid: Hash,
}

/// Per-height metadata from `/explorer/blockdata`, absent from the block body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockSummary {
    #[serde(rename = "ID")]
    pub id: Hash,
    #[serde(default)]
    pub timestamp: u64,
    pub target: Target,
    pub size: u64,
}

/// `/explorer/status`. Fields the explorer does not read are kept verbatim so
/// the status can be relayed unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExplorerStatus {
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub block: Hash,
    #[serde(default)]
    pub target: Target,
    #[serde(default)]
    pub total_currency: Currency,
    #[serde(default)]
    pub active_contract_count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `/hostdb/hosts/active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostSettings {
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(default)]
    pub total_storage: i64,
    #[serde(default)]
    pub price: Currency,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActiveHosts {
    #[serde(default, deserialize_with = "nullable")]
    pub hosts: Vec<HostSettings>,
}

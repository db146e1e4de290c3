//! Hashing and deterministic ID derivation.
//!
//! Output and contract IDs are never assigned by the daemon; they are derived
//! from the creating block or transaction and a position. Transaction-created
//! IDs hash the full signature-free transaction encoding (see
//! [`crate::encoding`]), not the transaction ID. These formulas are part of
//! the daemon's wire contract and must not drift.

use blake2::{digest::consts::U32, Blake2b, Digest};

use crate::encoding::encode_transaction_body;
use crate::types::{Hash, Specifier, Transaction};

type Blake2b256 = Blake2b<U32>;

pub const SPECIFIER_SIACOIN_OUTPUT: Specifier = Specifier::new(b"siacoin output");
pub const SPECIFIER_FILE_CONTRACT: Specifier = Specifier::new(b"file contract");
pub const SPECIFIER_STORAGE_PROOF: Specifier = Specifier::new(b"storage proof");

/// BLAKE2b-256 of raw bytes.
pub fn hash_bytes(data: &[u8]) -> Hash {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    Hash(hasher.finalize().into())
}

/// Incremental encoder for hashing a sequence of fields.
struct IdHasher(Blake2b256);

impl IdHasher {
    fn new() -> Self {
        IdHasher(Blake2b256::new())
    }

    fn specifier(mut self, spec: &Specifier) -> Self {
        self.0.update(spec.as_bytes());
        self
    }

    fn hash(mut self, hash: &Hash) -> Self {
        self.0.update(hash.as_bytes());
        self
    }

    fn raw(mut self, bytes: &[u8]) -> Self {
        self.0.update(bytes);
        self
    }

    fn flag(mut self, value: bool) -> Self {
        self.0.update([value as u8]);
        self
    }

    fn index(mut self, index: u64) -> Self {
        self.0.update(index.to_le_bytes());
        self
    }

    fn finish(self) -> Hash {
        Hash(self.0.finalize().into())
    }
}

/// IDs derived from one transaction. Encodes the body once so a scan over
/// many outputs does not re-encode it per index.
pub struct TransactionIds {
    body: Vec<u8>,
}

impl TransactionIds {
    pub fn new(tx: &Transaction) -> Self {
        let mut body = Vec::new();
        encode_transaction_body(tx, &mut body);
        TransactionIds { body }
    }

    /// `H(body)`
    pub fn transaction_id(&self) -> Hash {
        hash_bytes(&self.body)
    }

    /// `H("siacoin output" ‖ body ‖ i)`
    pub fn siacoin_output(&self, index: u64) -> Hash {
        IdHasher::new()
            .specifier(&SPECIFIER_SIACOIN_OUTPUT)
            .raw(&self.body)
            .index(index)
            .finish()
    }

    /// `H("file contract" ‖ body ‖ i)`
    pub fn file_contract(&self, index: u64) -> Hash {
        IdHasher::new()
            .specifier(&SPECIFIER_FILE_CONTRACT)
            .raw(&self.body)
            .index(index)
            .finish()
    }
}

pub fn transaction_id(tx: &Transaction) -> Hash {
    TransactionIds::new(tx).transaction_id()
}

/// `H(blockID ‖ i)`
pub fn miner_payout_id(block_id: &Hash, index: u64) -> Hash {
    IdHasher::new().hash(block_id).index(index).finish()
}

pub fn siacoin_output_id(tx: &Transaction, index: u64) -> Hash {
    TransactionIds::new(tx).siacoin_output(index)
}

pub fn file_contract_id(tx: &Transaction, index: u64) -> Hash {
    TransactionIds::new(tx).file_contract(index)
}

/// `H("storage proof" ‖ contractID ‖ valid ‖ j)`. The proof flag keeps valid
/// and missed outputs of the same contract apart.
pub fn storage_proof_output_id(contract_id: &Hash, valid: bool, index: u64) -> Hash {
    IdHasher::new()
        .specifier(&SPECIFIER_STORAGE_PROOF)
        .hash(contract_id)
        .flag(valid)
        .index(index)
        .finish()
}

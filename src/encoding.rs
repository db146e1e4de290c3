//! Canonical binary encoding of ledger objects.
//!
//! Transaction-derived IDs hash this encoding, so it has to match the
//! daemon's byte for byte.
//!
//! # Binary Format
//!
//! - `u64`: 8 bytes, little-endian
//! - `bool`: one byte
//! - Fixed arrays (hashes, addresses, specifiers, segments): raw bytes
//! - Slices and byte strings: 8-byte length prefix followed by the elements
//! - `Currency`: 8-byte length prefix followed by the minimal big-endian
//!   magnitude; zero has no magnitude bytes
//! - Structs: fields in declaration order

use crate::types::{
    Bytes, Currency, FileContract, FileContractRevision, Hash, Segment, SiaPublicKey,
    SiacoinInput, SiacoinOutput, SiafundInput, SiafundOutput, Specifier, StorageProof,
    Transaction, UnlockConditions, UnlockHash,
};

/// Types with a canonical binary form.
pub trait Encode {
    fn encode(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

impl Encode for u64 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Encode for bool {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(*self as u8);
    }
}

impl Encode for Hash {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.as_bytes());
    }
}

impl Encode for UnlockHash {
    fn encode(&self, out: &mut Vec<u8>) {
        self.0.encode(out);
    }
}

impl Encode for Specifier {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.as_bytes());
    }
}

impl Encode for Segment {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

impl Encode for Bytes {
    fn encode(&self, out: &mut Vec<u8>) {
        (self.0.len() as u64).encode(out);
        out.extend_from_slice(&self.0);
    }
}

impl Encode for Currency {
    fn encode(&self, out: &mut Vec<u8>) {
        let be = self.0.to_be_bytes();
        let start = be.iter().position(|&b| b != 0).unwrap_or(be.len());
        let magnitude = &be[start..];
        (magnitude.len() as u64).encode(out);
        out.extend_from_slice(magnitude);
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, out: &mut Vec<u8>) {
        (self.len() as u64).encode(out);
        for item in self {
            item.encode(out);
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        self.as_slice().encode(out);
    }
}

impl Encode for SiaPublicKey {
    fn encode(&self, out: &mut Vec<u8>) {
        self.algorithm.encode(out);
        self.key.encode(out);
    }
}

impl Encode for UnlockConditions {
    fn encode(&self, out: &mut Vec<u8>) {
        self.timelock.encode(out);
        self.public_keys.encode(out);
        self.signatures_required.encode(out);
    }
}

impl Encode for SiacoinInput {
    fn encode(&self, out: &mut Vec<u8>) {
        self.parent_id.encode(out);
        self.unlock_conditions.encode(out);
    }
}

impl Encode for SiacoinOutput {
    fn encode(&self, out: &mut Vec<u8>) {
        self.value.encode(out);
        self.unlock_hash.encode(out);
    }
}

impl Encode for FileContract {
    fn encode(&self, out: &mut Vec<u8>) {
        self.file_size.encode(out);
        self.file_merkle_root.encode(out);
        self.window_start.encode(out);
        self.window_end.encode(out);
        self.payout.encode(out);
        self.valid_proof_outputs.encode(out);
        self.missed_proof_outputs.encode(out);
        self.unlock_hash.encode(out);
        self.revision_number.encode(out);
    }
}

impl Encode for FileContractRevision {
    fn encode(&self, out: &mut Vec<u8>) {
        self.parent_id.encode(out);
        self.unlock_conditions.encode(out);
        self.new_revision_number.encode(out);
        self.new_file_size.encode(out);
        self.new_file_merkle_root.encode(out);
        self.new_window_start.encode(out);
        self.new_window_end.encode(out);
        self.new_valid_proof_outputs.encode(out);
        self.new_missed_proof_outputs.encode(out);
        self.new_unlock_hash.encode(out);
    }
}

impl Encode for StorageProof {
    fn encode(&self, out: &mut Vec<u8>) {
        self.parent_id.encode(out);
        self.segment.encode(out);
        self.hash_set.encode(out);
    }
}

impl Encode for SiafundInput {
    fn encode(&self, out: &mut Vec<u8>) {
        self.parent_id.encode(out);
        self.unlock_conditions.encode(out);
        self.claim_unlock_hash.encode(out);
    }
}

impl Encode for SiafundOutput {
    fn encode(&self, out: &mut Vec<u8>) {
        self.value.encode(out);
        self.unlock_hash.encode(out);
        self.claim_start.encode(out);
    }
}

/// Writes every transaction field except the signatures. Transaction IDs
/// and the IDs of the outputs and contracts it creates all hash this.
pub fn encode_transaction_body(tx: &Transaction, out: &mut Vec<u8>) {
    tx.siacoin_inputs.encode(out);
    tx.siacoin_outputs.encode(out);
    tx.file_contracts.encode(out);
    tx.file_contract_revisions.encode(out);
    tx.storage_proofs.encode(out);
    tx.siafund_inputs.encode(out);
    tx.siafund_outputs.encode(out);
    tx.miner_fees.encode(out);
    tx.arbitrary_data.encode(out);
}

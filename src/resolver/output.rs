//! Output resolution by deterministic ID.
//!
//! The daemon only tells us *which* block or transaction created an output.
//! To show the output itself we recompute every output ID the container can
//! produce and compare. Categories are searched in a fixed order and the
//! first match wins:
//!
//! 1. block miner payouts
//! 2. transaction siacoin outputs
//! 3. file contract proof outputs (valid, then missed)
//! 4. file contract revision proof outputs (valid, then missed)
//!
//! Each category derives IDs with its own formula; a cross-formula digest
//! collision would surface as an early false match and is not guarded against.

use serde::Serialize;

use crate::crypto::{self, TransactionIds};
use crate::error::{ExplorerError, Result};
use crate::types::{Block, Hash, SiacoinOutput, Transaction};

/// An entity that can create outputs, together with the ID it was looked up by.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Block { id: Hash, block: Block },
    Transaction { id: Hash, transaction: Transaction },
}

impl Container {
    pub fn id(&self) -> Hash {
        match self {
            Container::Block { id, .. } | Container::Transaction { id, .. } => *id,
        }
    }
}

/// Which proof-output list of a contract an output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofKind {
    Valid,
    Missed,
}

impl ProofKind {
    pub fn is_valid(self) -> bool {
        matches!(self, ProofKind::Valid)
    }
}

/// The search categories, in search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputCategory {
    MinerPayout,
    SiacoinOutput,
    ContractProof,
    RevisionProof,
}

/// Where a resolved output sits inside its creating entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputLocation {
    MinerPayout {
        block_id: Hash,
        index: u64,
    },
    SiacoinOutput {
        transaction_id: Hash,
        index: u64,
    },
    ContractProof {
        transaction_id: Hash,
        contract_id: Hash,
        proof: ProofKind,
        index: u64,
    },
    RevisionProof {
        transaction_id: Hash,
        contract_id: Hash,
        proof: ProofKind,
        index: u64,
    },
}

impl OutputLocation {
    pub fn category(&self) -> OutputCategory {
        match self {
            OutputLocation::MinerPayout { .. } => OutputCategory::MinerPayout,
            OutputLocation::SiacoinOutput { .. } => OutputCategory::SiacoinOutput,
            OutputLocation::ContractProof { .. } => OutputCategory::ContractProof,
            OutputLocation::RevisionProof { .. } => OutputCategory::RevisionProof,
        }
    }
}

type Found = (SiacoinOutput, OutputLocation);

/// Finds the output with ID `output_id` inside `container`.
pub fn resolve_output(output_id: &Hash, container: &Container) -> Result<Found> {
    let found = match container {
        Container::Block { id, block } => search_miner_payouts(output_id, id, block),
        Container::Transaction { id, transaction } => {
            let ids = TransactionIds::new(transaction);
            search_siacoin_outputs(output_id, id, &ids, transaction)
                .or_else(|| search_contract_proofs(output_id, id, &ids, transaction))
                .or_else(|| search_revision_proofs(output_id, id, transaction))
        }
    };

    found.ok_or_else(|| {
        let what = match container {
            Container::Block { .. } => "block",
            Container::Transaction { .. } => "transaction",
        };
        ExplorerError::OutputNotFound(format!(
            "output {} not found in {} {}",
            output_id,
            what,
            container.id()
        ))
    })
}

fn search_miner_payouts(target: &Hash, block_id: &Hash, block: &Block) -> Option<Found> {
    block
        .miner_payouts
        .iter()
        .enumerate()
        .find(|(i, _)| crypto::miner_payout_id(block_id, *i as u64) == *target)
        .map(|(i, output)| {
            (
                output.clone(),
                OutputLocation::MinerPayout {
                    block_id: *block_id,
                    index: i as u64,
                },
            )
        })
}

fn search_siacoin_outputs(
    target: &Hash,
    txid: &Hash,
    ids: &TransactionIds,
    tx: &Transaction,
) -> Option<Found> {
    tx.siacoin_outputs
        .iter()
        .enumerate()
        .find(|(i, _)| ids.siacoin_output(*i as u64) == *target)
        .map(|(i, output)| {
            (
                output.clone(),
                OutputLocation::SiacoinOutput {
                    transaction_id: *txid,
                    index: i as u64,
                },
            )
        })
}

/// Scans one contract's valid and missed proof outputs.
fn search_proof_lists(
    target: &Hash,
    contract_id: &Hash,
    valid: &[SiacoinOutput],
    missed: &[SiacoinOutput],
) -> Option<(SiacoinOutput, ProofKind, u64)> {
    for (kind, outputs) in [(ProofKind::Valid, valid), (ProofKind::Missed, missed)] {
        for (j, output) in outputs.iter().enumerate() {
            if crypto::storage_proof_output_id(contract_id, kind.is_valid(), j as u64) == *target {
                return Some((output.clone(), kind, j as u64));
            }
        }
    }
    None
}

fn search_contract_proofs(
    target: &Hash,
    txid: &Hash,
    ids: &TransactionIds,
    tx: &Transaction,
) -> Option<Found> {
    tx.file_contracts.iter().enumerate().find_map(|(i, fc)| {
        let contract_id = ids.file_contract(i as u64);
        search_proof_lists(
            target,
            &contract_id,
            &fc.valid_proof_outputs,
            &fc.missed_proof_outputs,
        )
        .map(|(output, proof, index)| {
            (
                output,
                OutputLocation::ContractProof {
                    transaction_id: *txid,
                    contract_id,
                    proof,
                    index,
                },
            )
        })
    })
}

fn search_revision_proofs(target: &Hash, txid: &Hash, tx: &Transaction) -> Option<Found> {
    tx.file_contract_revisions.iter().find_map(|rev| {
        search_proof_lists(
            target,
            &rev.parent_id,
            &rev.new_valid_proof_outputs,
            &rev.new_missed_proof_outputs,
        )
        .map(|(output, proof, index)| {
            (
                output,
                OutputLocation::RevisionProof {
                    transaction_id: *txid,
                    contract_id: rev.parent_id,
                    proof,
                    index,
                },
            )
        })
    })
}

//! Resolved view objects handed to the rendering side.
//!
//! The pure half of cross-reference assembly lives here: merging a block body
//! with its summary, and annotating transactions and contracts with the IDs
//! of everything they create. Fetching is done by [`super::Explorer`].

use serde::Serialize;

use super::output::OutputLocation;
use crate::crypto::{self, TransactionIds};
use crate::types::{
    AddrResponse, BlockResponse, BlockSummary, FcResponse, FileContract, FileContractRevision,
    Hash, HashCount, SiacoinOutput, StorageProof, Target, Transaction, TransactionResponse,
};

/// An output paired with its derived ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifiedOutput {
    pub id: Hash,
    pub output: SiacoinOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
    pub id: Hash,
    pub height: u64,
    pub parent_id: Hash,
    pub timestamp: u64,
    pub target: Target,
    pub size: u64,
    pub expected_hashes: HashCount,
    pub miner_payouts: Vec<IdentifiedOutput>,
    pub transactions: Vec<Transaction>,
}

/// A contract created by a transaction, with its derived ID and proof-output IDs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifiedContract {
    pub id: Hash,
    pub contract: FileContract,
    pub valid_proof_outputs: Vec<IdentifiedOutput>,
    pub missed_proof_outputs: Vec<IdentifiedOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifiedRevision {
    pub contract_id: Hash,
    pub revision: FileContractRevision,
    pub valid_proof_outputs: Vec<IdentifiedOutput>,
    pub missed_proof_outputs: Vec<IdentifiedOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    pub id: Hash,
    pub parent_block: Hash,
    pub index: u64,
    /// Parent output IDs of the siacoin inputs.
    pub inputs: Vec<Hash>,
    pub outputs: Vec<IdentifiedOutput>,
    pub file_contracts: Vec<IdentifiedContract>,
    pub revisions: Vec<IdentifiedRevision>,
    pub transaction: Transaction,
}

/// An output with its provenance: what created it and, if spent, what spent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputView {
    pub id: Hash,
    pub output: SiacoinOutput,
    pub location: OutputLocation,
    pub created_in: Hash,
    pub spent_in: Option<Hash>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressView {
    pub address: Hash,
    pub transactions: Vec<Hash>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractView {
    pub id: Hash,
    pub contract: FileContract,
    pub contract_transaction: Option<Hash>,
    pub valid_proof_outputs: Vec<IdentifiedOutput>,
    pub missed_proof_outputs: Vec<IdentifiedOutput>,
    pub revisions: Vec<FileContractRevision>,
    pub revision_transactions: Vec<Hash>,
    pub proof: Option<StorageProof>,
    pub proof_transaction: Option<Hash>,
}

/// Result of the hash dispatch, one variant per classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedView {
    Block(BlockView),
    Transaction(TransactionView),
    Output(OutputView),
    Address(AddressView),
    FileContract(ContractView),
    NotFound,
}

/// Merges a block body with the summary fetched for its height.
pub fn merge_block_view(response: BlockResponse, summary: &BlockSummary) -> BlockView {
    let id = summary.id;
    let miner_payouts = response
        .block
        .miner_payouts
        .into_iter()
        .enumerate()
        .map(|(i, output)| IdentifiedOutput {
            id: crypto::miner_payout_id(&id, i as u64),
            output,
        })
        .collect();

    BlockView {
        id,
        height: response.height,
        parent_id: response.block.parent_id,
        timestamp: response.block.timestamp,
        target: summary.target,
        size: summary.size,
        expected_hashes: summary.target.expected_hashes(),
        miner_payouts,
        transactions: response.block.transactions,
    }
}

fn proof_outputs(contract_id: &Hash, valid: bool, outputs: &[SiacoinOutput]) -> Vec<IdentifiedOutput> {
    outputs
        .iter()
        .enumerate()
        .map(|(j, output)| IdentifiedOutput {
            id: crypto::storage_proof_output_id(contract_id, valid, j as u64),
            output: output.clone(),
        })
        .collect()
}

/// Pass-through merge; everything needed is in the payload.
pub fn assemble_transaction_view(id: Hash, response: TransactionResponse) -> TransactionView {
    let tx = response.tx;
    let ids = TransactionIds::new(&tx);

    let inputs = tx.siacoin_inputs.iter().map(|input| input.parent_id).collect();

    let outputs = tx
        .siacoin_outputs
        .iter()
        .enumerate()
        .map(|(i, output)| IdentifiedOutput {
            id: ids.siacoin_output(i as u64),
            output: output.clone(),
        })
        .collect();

    let file_contracts = tx
        .file_contracts
        .iter()
        .enumerate()
        .map(|(i, fc)| {
            let contract_id = ids.file_contract(i as u64);
            IdentifiedContract {
                id: contract_id,
                contract: fc.clone(),
                valid_proof_outputs: proof_outputs(&contract_id, true, &fc.valid_proof_outputs),
                missed_proof_outputs: proof_outputs(&contract_id, false, &fc.missed_proof_outputs),
            }
        })
        .collect();

    let revisions = tx
        .file_contract_revisions
        .iter()
        .map(|rev| IdentifiedRevision {
            contract_id: rev.parent_id,
            revision: rev.clone(),
            valid_proof_outputs: proof_outputs(&rev.parent_id, true, &rev.new_valid_proof_outputs),
            missed_proof_outputs: proof_outputs(
                &rev.parent_id,
                false,
                &rev.new_missed_proof_outputs,
            ),
        })
        .collect();

    TransactionView {
        id,
        parent_block: response.parent_id,
        index: response.tx_num,
        inputs,
        outputs,
        file_contracts,
        revisions,
        transaction: tx,
    }
}

pub fn assemble_address_view(address: Hash, response: AddrResponse) -> AddressView {
    AddressView {
        address,
        transactions: response.txns,
    }
}

pub fn assemble_contract_view(id: Hash, response: FcResponse) -> ContractView {
    // the latest revision, if any, decides the outstanding proof outputs
    let (valid, missed) = match response.revisions.last() {
        Some(rev) => (
            proof_outputs(&id, true, &rev.new_valid_proof_outputs),
            proof_outputs(&id, false, &rev.new_missed_proof_outputs),
        ),
        None => (
            proof_outputs(&id, true, &response.contract.valid_proof_outputs),
            proof_outputs(&id, false, &response.contract.missed_proof_outputs),
        ),
    };

    let proof = response.proof.filter(|p| !p.parent_id.is_zero());
    let proof_transaction = if proof.is_some() {
        response.proof_txid.non_zero()
    } else {
        None
    };

    ContractView {
        id,
        contract_transaction: response.contract_txid.non_zero(),
        valid_proof_outputs: valid,
        missed_proof_outputs: missed,
        revision_transactions: response.revision_txid,
        revisions: response.revisions,
        proof,
        proof_transaction,
        contract: response.contract,
    }
}

//! Hash resolution.
//!
//! [`Explorer`] drives one resolution per call: a lookup is classified, then
//! completed with whatever follow-up fetches its kind needs. Follow-up fetches
//! run strictly in sequence since each depends on the previous answer.
//! Nothing is cached between calls.

pub mod assemble;
pub mod output;

pub use assemble::{
    assemble_address_view, assemble_contract_view, assemble_transaction_view, merge_block_view,
    AddressView, BlockView, ContractView, IdentifiedContract, IdentifiedOutput,
    IdentifiedRevision, OutputView, ResolvedView, TransactionView,
};
pub use output::{resolve_output, Container, OutputCategory, OutputLocation, ProofKind};

use serde::Serialize;

use crate::classify::{classify, ResolvedItem};
use crate::client::LedgerQuery;
use crate::error::{ExplorerError, Result};
use crate::hosts::{display_hosts, HostDisplayInfo};
use crate::types::{BlockResponse, BlockSummary, ExplorerStatus, Hash, OutputResponse};

/// Network snapshot for the landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub status: ExplorerStatus,
    /// Most recent first.
    pub blocks: Vec<BlockSummary>,
    pub version: String,
}

pub struct Explorer<L> {
    ledger: L,
}

impl<L: LedgerQuery> Explorer<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Fetches and classifies one hash. The zero hash means "absent" on the
    /// wire and is answered locally.
    pub async fn lookup(&self, hash: &Hash) -> Result<ResolvedItem> {
        if hash.is_zero() {
            return Ok(ResolvedItem::NotFound);
        }
        let raw = self.ledger.fetch_by_hash(hash).await?;
        classify(&raw)
    }

    /// Resolves `hash` into a fully assembled view of whatever it names.
    pub async fn resolve_hash(&self, hash: &Hash) -> Result<ResolvedView> {
        let view = match self.lookup(hash).await? {
            ResolvedItem::Block(response) => {
                let view = self.assemble_block_view(response).await?;
                if view.id != *hash {
                    return Err(ExplorerError::Upstream(format!(
                        "block {} reported at height {}, but that height belongs to {}",
                        hash, view.height, view.id
                    )));
                }
                ResolvedView::Block(view)
            }
            ResolvedItem::Transaction(response) => {
                ResolvedView::Transaction(assemble_transaction_view(*hash, response))
            }
            ResolvedItem::Output(response) => {
                ResolvedView::Output(self.output_view(hash, response).await?)
            }
            ResolvedItem::Address(response) => {
                ResolvedView::Address(assemble_address_view(*hash, response))
            }
            ResolvedItem::FileContract(response) => {
                ResolvedView::FileContract(assemble_contract_view(*hash, response))
            }
            ResolvedItem::NotFound => ResolvedView::NotFound,
        };
        Ok(view)
    }

    /// Summary for a single height. An empty answer means the two daemon
    /// endpoints disagree about the chain and is never defaulted.
    pub async fn block_summary(&self, height: u64) -> Result<BlockSummary> {
        let finish = height
            .checked_add(1)
            .ok_or_else(|| ExplorerError::InvalidInput(format!("height {} out of range", height)))?;
        self.ledger
            .fetch_block_range(height, finish)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ExplorerError::Upstream(format!("no block summary for height {}", height))
            })
    }

    pub async fn assemble_block_view(&self, response: BlockResponse) -> Result<BlockView> {
        let summary = self.block_summary(response.height).await?;
        Ok(merge_block_view(response, &summary))
    }

    /// Block at `height`, via its summary's ID.
    pub async fn resolve_height(&self, height: u64) -> Result<BlockView> {
        let summary = self.block_summary(height).await?;
        match self.lookup(&summary.id).await? {
            ResolvedItem::Block(response) if response.height == height => {
                Ok(merge_block_view(response, &summary))
            }
            ResolvedItem::Block(response) => Err(ExplorerError::Upstream(format!(
                "block {} listed at height {} but reported at height {}",
                summary.id, height, response.height
            ))),
            ResolvedItem::NotFound => Err(ExplorerError::NotFound(format!(
                "block {} at height {} is unknown to the daemon",
                summary.id, height
            ))),
            other => Err(ExplorerError::Upstream(format!(
                "summary ID {} at height {} names a {}, not a block",
                summary.id,
                height,
                other.kind()
            ))),
        }
    }

    /// End-to-end provenance of an output: its value, the entity that
    /// created it and, when spent, the spending transaction.
    pub async fn find_output(&self, id: &Hash) -> Result<OutputView> {
        match self.lookup(id).await? {
            ResolvedItem::Output(response) => self.output_view(id, response).await,
            ResolvedItem::NotFound => Err(ExplorerError::NotFound(format!("output {}", id))),
            other => Err(ExplorerError::OutputNotFound(format!(
                "{} names a {}, not an output",
                id,
                other.kind()
            ))),
        }
    }

    async fn output_view(&self, id: &Hash, response: OutputResponse) -> Result<OutputView> {
        let creator = response.output_tx;
        let container = match self.lookup(&creator).await? {
            ResolvedItem::Block(b) => Container::Block {
                id: creator,
                block: b.block,
            },
            ResolvedItem::Transaction(t) => Container::Transaction {
                id: creator,
                transaction: t.tx,
            },
            other => {
                return Err(ExplorerError::OutputNotFound(format!(
                    "output {} claims creator {}, which is a {}",
                    id,
                    creator,
                    other.kind()
                )))
            }
        };

        let (output, location) = resolve_output(id, &container)?;
        Ok(OutputView {
            id: *id,
            output,
            location,
            created_in: creator,
            spent_in: response.input_tx.non_zero(),
        })
    }

    /// Resolves the parent output of every siacoin input, in input order.
    pub async fn trace_inputs(&self, view: &TransactionView) -> Result<Vec<OutputView>> {
        let mut traced = Vec::with_capacity(view.inputs.len());
        for parent in &view.inputs {
            traced.push(self.find_output(parent).await?);
        }
        Ok(traced)
    }

    /// Status, the `blocks` most recent summaries and the daemon version.
    pub async fn overview(&self, blocks: u64) -> Result<Overview> {
        let status = self.ledger.fetch_status().await?;

        let finish = status.height.saturating_add(1);
        let start = finish.saturating_sub(blocks);
        let mut recent = if start < finish {
            self.ledger.fetch_block_range(start, finish).await?
        } else {
            Vec::new()
        };
        recent.reverse();

        let version = self.ledger.fetch_version().await?;
        Ok(Overview {
            status,
            blocks: recent,
            version,
        })
    }

    pub async fn active_hosts(&self) -> Result<Vec<HostDisplayInfo>> {
        let raw = self.ledger.fetch_active_hosts().await?;
        display_hosts(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto;
    use crate::types::{
        Block, Currency, FileContract, SiacoinInput, SiacoinOutput, Target, Transaction,
        UnlockConditions, UnlockHash,
    };
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BLOCK_ID: Hash = Hash([0x11; 32]);
    const TX_ID: Hash = Hash([0x22; 32]);
    const SPENDER: Hash = Hash([0x33; 32]);

    #[derive(Default)]
    struct FakeLedger {
        by_hash: HashMap<Hash, Value>,
        summaries: Vec<BlockSummary>,
        hosts: Value,
        calls: Mutex<Vec<String>>,
    }

    impl FakeLedger {
        fn with(mut self, hash: Hash, payload: Value) -> Self {
            self.by_hash.insert(hash, payload);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl LedgerQuery for FakeLedger {
        async fn fetch_by_hash(&self, hash: &Hash) -> Result<Vec<u8>> {
            self.record(format!("gethash {}", hash));
            match self.by_hash.get(hash) {
                Some(v) => Ok(serde_json::to_vec(v).unwrap()),
                None => Err(ExplorerError::Upstream("unrecognized hash".to_string())),
            }
        }

        async fn fetch_block_range(&self, start: u64, finish: u64) -> Result<Vec<BlockSummary>> {
            self.record(format!("blockdata {} {}", start, finish));
            Ok(self
                .summaries
                .iter()
                .enumerate()
                .filter(|(h, _)| (start..finish).contains(&(*h as u64)))
                .map(|(_, s)| s.clone())
                .collect())
        }

        async fn fetch_active_hosts(&self) -> Result<Vec<u8>> {
            self.record("hosts".to_string());
            Ok(serde_json::to_vec(&self.hosts).unwrap())
        }

        async fn fetch_status(&self) -> Result<ExplorerStatus> {
            self.record("status".to_string());
            Ok(ExplorerStatus {
                height: self.summaries.len().saturating_sub(1) as u64,
                ..ExplorerStatus::default()
            })
        }

        async fn fetch_version(&self) -> Result<String> {
            Ok("1.0.0".to_string())
        }
    }

    fn output(value: u128) -> SiacoinOutput {
        SiacoinOutput {
            value: Currency(value),
            unlock_hash: UnlockHash(Hash([0x44; 32])),
        }
    }

    fn summary(id: Hash, size: u64) -> BlockSummary {
        BlockSummary {
            id,
            timestamp: 0,
            target: Target([0x0f; 32]),
            size,
        }
    }

    fn block_payload(height: u64, payouts: Vec<SiacoinOutput>) -> Value {
        let block = Block {
            parent_id: Hash::ZERO,
            nonce: [0; 8],
            timestamp: 1_433_600_000,
            miner_payouts: payouts,
            transactions: vec![],
        };
        json!({ "ResponseType": "Block", "Block": block, "Height": height })
    }

    fn tx_payload(tx: Transaction) -> Value {
        json!({
            "ResponseType": "Transaction",
            "Tx": tx,
            "ParentID": BLOCK_ID,
            "TxNum": 0,
        })
    }

    fn output_payload(creator: Hash, spender: Hash) -> Value {
        json!({ "ResponseType": "Output", "OutputTx": creator, "InputTx": spender })
    }

    /// One standard output and one contract.
    fn chain_tx() -> Transaction {
        Transaction {
            siacoin_outputs: vec![output(100)],
            file_contracts: vec![FileContract {
                missed_proof_outputs: vec![output(7)],
                ..FileContract::default()
            }],
            ..Default::default()
        }
    }

    /// One block at height 1 with two payouts, and `chain_tx` under `TX_ID`.
    fn chain() -> FakeLedger {
        FakeLedger {
            summaries: vec![summary(Hash([0x01; 32]), 10), summary(BLOCK_ID, 2048)],
            ..FakeLedger::default()
        }
        .with(BLOCK_ID, block_payload(1, vec![output(1), output(2)]))
        .with(TX_ID, tx_payload(chain_tx()))
    }

    #[tokio::test]
    async fn test_block_view_uses_summary_for_its_height() {
        let explorer = Explorer::new(chain());
        match explorer.resolve_hash(&BLOCK_ID).await.unwrap() {
            ResolvedView::Block(view) => {
                assert_eq!(view.height, 1);
                assert_eq!(view.size, 2048);
                assert_eq!(view.id, BLOCK_ID);
                assert_eq!(view.expected_hashes, Target([0x0f; 32]).expected_hashes());
                assert_eq!(view.miner_payouts.len(), 2);
            }
            other => panic!("expected block view, got {:?}", other),
        }
        assert!(explorer.ledger().calls().contains(&"blockdata 1 2".to_string()));
    }

    #[tokio::test]
    async fn test_empty_summary_range_is_upstream_error() {
        let ledger = FakeLedger::default().with(BLOCK_ID, block_payload(5, vec![]));
        let explorer = Explorer::new(ledger);
        let err = explorer.resolve_hash(&BLOCK_ID).await.unwrap_err();
        assert!(matches!(err, ExplorerError::Upstream(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_transaction_dispatch_skips_block_fetch() {
        let explorer = Explorer::new(chain());
        let view = explorer.resolve_hash(&TX_ID).await.unwrap();
        match view {
            ResolvedView::Transaction(tx) => {
                assert_eq!(tx.parent_block, BLOCK_ID);
                assert_eq!(tx.outputs[0].id, crypto::siacoin_output_id(&chain_tx(), 0));
            }
            other => panic!("expected transaction view, got {:?}", other),
        }
        assert_eq!(explorer.ledger().calls(), vec![format!("gethash {}", TX_ID)]);
    }

    #[tokio::test]
    async fn test_zero_hash_is_not_found_without_fetch() {
        let explorer = Explorer::new(chain());
        assert_eq!(
            explorer.resolve_hash(&Hash::ZERO).await.unwrap(),
            ResolvedView::NotFound
        );
        assert!(explorer.ledger().calls().is_empty());
    }

    #[tokio::test]
    async fn test_find_output_in_transaction() {
        let contract_id = crypto::file_contract_id(&chain_tx(), 0);
        let output_id = crypto::storage_proof_output_id(&contract_id, false, 0);
        let ledger = chain().with(output_id, output_payload(TX_ID, SPENDER));
        let explorer = Explorer::new(ledger);

        let view = explorer.find_output(&output_id).await.unwrap();
        assert_eq!(view.output, output(7));
        assert_eq!(view.created_in, TX_ID);
        assert_eq!(view.spent_in, Some(SPENDER));
        assert_eq!(view.location.category(), OutputCategory::ContractProof);
    }

    #[tokio::test]
    async fn test_find_output_in_block() {
        let output_id = crypto::miner_payout_id(&BLOCK_ID, 1);
        let ledger = chain().with(output_id, output_payload(BLOCK_ID, Hash::ZERO));
        let explorer = Explorer::new(ledger);

        let view = explorer.find_output(&output_id).await.unwrap();
        assert_eq!(view.output, output(2));
        assert_eq!(view.spent_in, None);
        assert_eq!(
            view.location,
            OutputLocation::MinerPayout {
                block_id: BLOCK_ID,
                index: 1
            }
        );
    }

    #[tokio::test]
    async fn test_address_creator_is_output_not_found() {
        let address = Hash([0x55; 32]);
        let output_id = Hash([0x66; 32]);
        let ledger = chain()
            .with(address, json!({ "ResponseType": "Address", "Txns": [] }))
            .with(output_id, output_payload(address, Hash::ZERO));
        let explorer = Explorer::new(ledger);

        let err = explorer.find_output(&output_id).await.unwrap_err();
        assert!(matches!(err, ExplorerError::OutputNotFound(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_resolve_height() {
        let explorer = Explorer::new(chain());
        let view = explorer.resolve_height(1).await.unwrap();
        assert_eq!(view.id, BLOCK_ID);
        assert_eq!(view.size, 2048);

        let err = explorer.resolve_height(9).await.unwrap_err();
        assert!(matches!(err, ExplorerError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_trace_inputs_follows_parents() {
        let payout_id = crypto::miner_payout_id(&BLOCK_ID, 0);
        let spending_tx = Hash([0x77; 32]);
        let tx = Transaction {
            siacoin_inputs: vec![SiacoinInput {
                parent_id: payout_id,
                unlock_conditions: UnlockConditions::default(),
            }],
            ..Default::default()
        };
        let ledger = chain()
            .with(payout_id, output_payload(BLOCK_ID, spending_tx))
            .with(spending_tx, tx_payload(tx));
        let explorer = Explorer::new(ledger);

        let view = match explorer.resolve_hash(&spending_tx).await.unwrap() {
            ResolvedView::Transaction(view) => view,
            other => panic!("expected transaction view, got {:?}", other),
        };
        let traced = explorer.trace_inputs(&view).await.unwrap();
        assert_eq!(traced.len(), 1);
        assert_eq!(traced[0].output, output(1));
        assert_eq!(traced[0].spent_in, Some(spending_tx));
    }

    #[tokio::test]
    async fn test_overview_lists_newest_first() {
        let explorer = Explorer::new(chain());
        let overview = explorer.overview(10).await.unwrap();
        assert_eq!(overview.status.height, 1);
        assert_eq!(overview.version, "1.0.0");
        assert_eq!(overview.blocks.len(), 2);
        assert_eq!(overview.blocks[0].id, BLOCK_ID);
        assert!(explorer.ledger().calls().contains(&"blockdata 0 2".to_string()));

        let none = explorer.overview(0).await.unwrap();
        assert!(none.blocks.is_empty());
    }

    #[tokio::test]
    async fn test_active_hosts() {
        let ledger = FakeLedger {
            hosts: json!({ "Hosts": [{ "IPAddress": "1.2.3.4:9982", "Price": "9" }] }),
            ..FakeLedger::default()
        };
        let hosts = Explorer::new(ledger).active_hosts().await.unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].ip_address, "1.2.3.4:9982");
        assert_eq!(hosts[0].price, Currency(9));
    }
}

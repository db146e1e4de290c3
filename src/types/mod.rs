//! Data shapes exchanged with the daemon.

pub mod ledger;
pub mod primitives;
pub mod responses;

pub use ledger::{
    Block, FileContract, FileContractRevision, SiaPublicKey, SiacoinInput, SiacoinOutput,
    SiafundInput, SiafundOutput, StorageProof, Transaction, UnlockConditions,
};
pub use primitives::{
    parse_lookup_hash, Bytes, Currency, Hash, HashCount, Segment, Specifier, Target, UnlockHash,
};
pub use responses::{
    ActiveHosts, AddrResponse, BlockResponse, BlockSummary, ExplorerStatus, FcResponse,
    HostSettings, OutputResponse, TransactionResponse,
};

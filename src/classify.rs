//! Response classification.
//!
//! `/explorer/gethash` answers with a different JSON shape depending on what
//! the hash names. The payload is decoded twice: once into an envelope that
//! only carries `ResponseType`, then into the concrete shape that tag selects.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};
use crate::types::{AddrResponse, BlockResponse, FcResponse, OutputResponse, TransactionResponse};

/// The closed set of things a hash can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseKind {
    Block,
    Transaction,
    Output,
    Address,
    FileContract,
    NotFound,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Block => "Block",
            ResponseKind::Transaction => "Transaction",
            ResponseKind::Output => "Output",
            ResponseKind::Address => "Address",
            ResponseKind::FileContract => "FileContract",
            ResponseKind::NotFound => "NotFound",
        }
    }
}

impl FromStr for ResponseKind {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Block" => Ok(ResponseKind::Block),
            "Transaction" => Ok(ResponseKind::Transaction),
            "Output" => Ok(ResponseKind::Output),
            "Address" => Ok(ResponseKind::Address),
            "FileContract" => Ok(ResponseKind::FileContract),
            "NotFound" => Ok(ResponseKind::NotFound),
            other => Err(ExplorerError::MalformedResponse(format!(
                "unrecognized ResponseType {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified lookup. Only `NotFound` carries no payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedItem {
    Block(BlockResponse),
    Transaction(TransactionResponse),
    Output(OutputResponse),
    Address(AddrResponse),
    FileContract(FcResponse),
    NotFound,
}

impl ResolvedItem {
    pub fn kind(&self) -> ResponseKind {
        match self {
            ResolvedItem::Block(_) => ResponseKind::Block,
            ResolvedItem::Transaction(_) => ResponseKind::Transaction,
            ResolvedItem::Output(_) => ResponseKind::Output,
            ResolvedItem::Address(_) => ResponseKind::Address,
            ResolvedItem::FileContract(_) => ResponseKind::FileContract,
            ResolvedItem::NotFound => ResponseKind::NotFound,
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "ResponseType")]
    response_type: Option<serde_json::Value>,
}

/// Reads only the discriminator.
pub fn peek_kind(raw: &[u8]) -> Result<ResponseKind> {
    let envelope: Envelope = serde_json::from_slice(raw).map_err(|e| {
        ExplorerError::MalformedResponse(format!("payload is not a JSON object: {}", e))
    })?;
    match envelope.response_type {
        Some(serde_json::Value::String(tag)) => tag.parse(),
        Some(other) => Err(ExplorerError::MalformedResponse(format!(
            "ResponseType is not a string: {}",
            other
        ))),
        None => Err(ExplorerError::MalformedResponse(
            "payload has no ResponseType".to_string(),
        )),
    }
}

fn decode<T: DeserializeOwned>(raw: &[u8], kind: ResponseKind) -> Result<T> {
    serde_json::from_slice(raw)
        .map_err(|e| ExplorerError::Decode(format!("{} payload does not decode: {}", kind, e)))
}

/// Classifies a raw `/explorer/gethash` payload. Pure.
pub fn classify(raw: &[u8]) -> Result<ResolvedItem> {
    let kind = peek_kind(raw)?;
    let item = match kind {
        ResponseKind::Block => ResolvedItem::Block(decode(raw, kind)?),
        ResponseKind::Transaction => ResolvedItem::Transaction(decode(raw, kind)?),
        ResponseKind::Output => ResolvedItem::Output(decode(raw, kind)?),
        ResponseKind::Address => ResolvedItem::Address(decode(raw, kind)?),
        ResponseKind::FileContract => ResolvedItem::FileContract(decode(raw, kind)?),
        ResponseKind::NotFound => ResolvedItem::NotFound,
    };
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hash;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn block_payload(height: u64) -> Vec<u8> {
        raw(json!({
            "ResponseType": "Block",
            "Block": {
                "ParentID": "00".repeat(32),
                "Nonce": [0, 0, 0, 0, 0, 0, 0, 0],
                "Timestamp": 1433600000u64,
                "MinerPayouts": [],
                "Transactions": [],
            },
            "Height": height,
        }))
    }

    #[test]
    fn test_classifies_block() {
        let item = classify(&block_payload(7)).unwrap();
        match item {
            ResolvedItem::Block(b) => assert_eq!(b.height, 7),
            other => panic!("expected block, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_classifies_transaction_not_block() {
        let payload = raw(json!({
            "ResponseType": "Transaction",
            "Tx": { "SiacoinOutputs": null },
            "ParentID": "05".repeat(32),
            "TxNum": 2,
        }));
        let item = classify(&payload).unwrap();
        assert_eq!(item.kind(), ResponseKind::Transaction);
        if let ResolvedItem::Transaction(t) = item {
            assert_eq!(t.parent_id, Hash([5; 32]));
            assert_eq!(t.tx_num, 2);
        }
    }

    #[test]
    fn test_classifies_output_address_contract() {
        let output = raw(json!({ "ResponseType": "Output", "OutputTx": "01".repeat(32) }));
        assert_eq!(classify(&output).unwrap().kind(), ResponseKind::Output);

        let address = raw(json!({ "ResponseType": "Address", "Txns": ["02".repeat(32)] }));
        match classify(&address).unwrap() {
            ResolvedItem::Address(a) => assert_eq!(a.txns, vec![Hash([2; 32])]),
            other => panic!("expected address, got {:?}", other.kind()),
        }

        let contract = raw(json!({
            "ResponseType": "FileContract",
            "Contract": { "FileSize": 64, "ValidProofOutputs": null },
            "Revisions": null,
        }));
        match classify(&contract).unwrap() {
            ResolvedItem::FileContract(fc) => {
                assert_eq!(fc.contract.file_size, 64);
                assert!(fc.revisions.is_empty());
                assert!(fc.proof.is_none());
            }
            other => panic!("expected contract, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_discriminator_is_malformed() {
        let payload = raw(json!({ "ResponseType": "Foo" }));
        assert!(matches!(
            classify(&payload),
            Err(ExplorerError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_discriminator_is_malformed() {
        assert!(matches!(
            classify(&raw(json!({ "Height": 3 }))),
            Err(ExplorerError::MalformedResponse(_))
        ));
        assert!(matches!(
            classify(b"not json"),
            Err(ExplorerError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_string_discriminator_is_malformed() {
        for tag in [json!(5), json!([]), json!({ "Kind": "Block" })] {
            let err = classify(&raw(json!({ "ResponseType": tag }))).unwrap_err();
            match err {
                ExplorerError::MalformedResponse(msg) => {
                    assert!(msg.contains("ResponseType is not a string"), "{}", msg);
                    assert!(!msg.contains("not a JSON object"), "{}", msg);
                }
                other => panic!("expected malformed response, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_shape_mismatch_is_decode_error() {
        let payload = raw(json!({ "ResponseType": "Block", "Height": "three" }));
        assert!(matches!(classify(&payload), Err(ExplorerError::Decode(_))));

        let payload = raw(json!({ "ResponseType": "Output" }));
        assert!(matches!(classify(&payload), Err(ExplorerError::Decode(_))));
    }

    #[test]
    fn test_explicit_not_found() {
        let payload = raw(json!({ "ResponseType": "NotFound" }));
        assert_eq!(classify(&payload).unwrap(), ResolvedItem::NotFound);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let payload = block_payload(11);
        let first = classify(&payload).unwrap();
        let second = classify(&payload).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.kind(), second.kind());
    }
}

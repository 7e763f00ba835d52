//! Typed outcomes of broadcasting and looking up transactions.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::Action, tx::Tx, wire::int_string, Error, Result};

/// Result code reported by the chain.
///
/// Nodes are inconsistent about sending this as a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxCode {
    Number(i64),
    Text(String),
}

impl TxCode {
    pub fn is_zero(&self) -> bool {
        match self {
            TxCode::Number(code) => *code == 0,
            TxCode::Text(code) => code == "0",
        }
    }
}

impl Display for TxCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TxCode::Number(code) => write!(f, "{code}"),
            TxCode::Text(code) => f.write_str(code),
        }
    }
}

impl From<i64> for TxCode {
    fn from(code: i64) -> Self {
        TxCode::Number(code)
    }
}

/// A result is an error if and only if its code is present and not zero.
pub fn is_tx_error(code: Option<&TxCode>) -> bool {
    code.map_or(false, |code| !code.is_zero())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

/// Log output for a single message within a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxLog {
    #[serde(with = "int_string", default)]
    pub msg_index: u32,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl TxLog {
    /// Find the first value of an attribute on events of the given type.
    pub fn find_attribute(&self, event_type: &str, key: &str) -> Option<&str> {
        self.events
            .iter()
            .filter(|event| event.r#type == event_type)
            .flat_map(|event| &event.attributes)
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

/// Success or failure of a transaction that reached the chain.
///
/// Logs only exist for successful transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxOutcome {
    Success {
        logs: Vec<TxLog>,
    },
    Error {
        code: TxCode,
        codespace: Option<String>,
        message: Option<String>,
    },
}

impl TxOutcome {
    pub(crate) fn classify(
        code: Option<TxCode>,
        codespace: Option<String>,
        raw_log: &str,
        logs: Vec<TxLog>,
    ) -> Self {
        match code {
            Some(code) if !code.is_zero() => TxOutcome::Error {
                code,
                codespace,
                message: Some(raw_log.to_owned()).filter(|log| !log.is_empty()),
            },
            _ => TxOutcome::Success { logs },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TxOutcome::Error { .. })
    }

    /// Logs of a successful transaction, empty for failures.
    pub fn logs(&self) -> &[TxLog] {
        match self {
            TxOutcome::Success { logs } => logs,
            TxOutcome::Error { .. } => &[],
        }
    }
}

/// `tx_response` as returned by the LCD, before normalization.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TxResponseData {
    #[serde(with = "int_string", default)]
    pub(crate) height: u64,
    pub(crate) txhash: String,
    #[serde(default)]
    pub(crate) raw_log: String,
    #[serde(with = "int_string", default)]
    pub(crate) gas_wanted: u64,
    #[serde(with = "int_string", default)]
    pub(crate) gas_used: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) logs: Vec<TxLog>,
    pub(crate) code: Option<TxCode>,
    #[serde(default)]
    pub(crate) codespace: Option<String>,
    #[serde(default)]
    pub(crate) info: String,
    #[serde(default)]
    pub(crate) data: String,
    #[serde(default)]
    pub(crate) timestamp: String,
    #[serde(default)]
    pub(crate) tx: Option<serde_json::Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse the `tx_response` field of an LCD response.
pub(crate) fn parse_tx_response(action: Action, body: &serde_json::Value) -> Result<TxResponseData> {
    let response = body
        .get("tx_response")
        .ok_or_else(|| Error::ambiguous(action.clone(), body))?;
    serde_json::from_value(response.clone()).map_err(|_| Error::ambiguous(action, body))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsyncTxBroadcastResult {
    pub height: u64,
    pub txhash: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncTxBroadcastResult {
    pub height: u64,
    pub txhash: String,
    pub raw_log: String,
    pub code: Option<TxCode>,
    pub codespace: Option<String>,
}

impl SyncTxBroadcastResult {
    pub fn is_error(&self) -> bool {
        is_tx_error(self.code.as_ref())
    }
}

impl From<TxResponseData> for SyncTxBroadcastResult {
    fn from(d: TxResponseData) -> Self {
        SyncTxBroadcastResult {
            height: d.height,
            txhash: d.txhash,
            raw_log: d.raw_log,
            code: d.code,
            codespace: d.codespace,
        }
    }
}

/// Result of broadcasting in sync mode and then waiting for inclusion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaitTxBroadcastResult {
    pub height: u64,
    pub txhash: String,
    pub raw_log: String,
    pub gas_wanted: u64,
    pub gas_used: u64,
    /// Empty when the transaction was rejected before inclusion.
    pub timestamp: String,
    pub outcome: TxOutcome,
}

impl WaitTxBroadcastResult {
    pub fn is_error(&self) -> bool {
        self.outcome.is_error()
    }

    /// Rejected during CheckTx, never included in a block.
    pub(crate) fn rejected(sync: SyncTxBroadcastResult) -> Self {
        let outcome = TxOutcome::classify(sync.code, sync.codespace, &sync.raw_log, vec![]);
        WaitTxBroadcastResult {
            height: sync.height,
            txhash: sync.txhash,
            raw_log: sync.raw_log,
            gas_wanted: 0,
            gas_used: 0,
            timestamp: String::new(),
            outcome,
        }
    }
}

impl From<TxInfo> for WaitTxBroadcastResult {
    fn from(info: TxInfo) -> Self {
        let outcome = TxOutcome::classify(info.code, info.codespace, &info.raw_log, info.logs);
        WaitTxBroadcastResult {
            height: info.height,
            txhash: info.txhash,
            raw_log: info.raw_log,
            gas_wanted: info.gas_wanted,
            gas_used: info.gas_used,
            timestamp: info.timestamp,
            outcome,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTxBroadcastResult {
    pub height: u64,
    pub txhash: String,
    pub raw_log: String,
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub timestamp: String,
    pub info: String,
    pub data: String,
    pub outcome: TxOutcome,
}

impl BlockTxBroadcastResult {
    pub fn is_error(&self) -> bool {
        self.outcome.is_error()
    }
}

impl From<TxResponseData> for BlockTxBroadcastResult {
    fn from(d: TxResponseData) -> Self {
        let outcome = TxOutcome::classify(d.code, d.codespace, &d.raw_log, d.logs);
        BlockTxBroadcastResult {
            height: d.height,
            txhash: d.txhash,
            raw_log: d.raw_log,
            gas_wanted: d.gas_wanted,
            gas_used: d.gas_used,
            timestamp: d.timestamp,
            info: d.info,
            data: d.data,
            outcome,
        }
    }
}

/// A transaction found on chain.
#[derive(Clone, Debug, PartialEq)]
pub struct TxInfo {
    pub height: u64,
    pub txhash: String,
    pub raw_log: String,
    pub logs: Vec<TxLog>,
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub tx: Tx,
    pub timestamp: String,
    pub code: Option<TxCode>,
    pub codespace: Option<String>,
}

impl TxInfo {
    pub(crate) fn from_response(d: TxResponseData, is_classic: bool) -> Result<Self> {
        let tx = match d.tx {
            Some(tx) => Tx::from_data(tx, is_classic)?,
            None => Tx::default(),
        };
        Ok(TxInfo {
            height: d.height,
            txhash: d.txhash,
            raw_log: d.raw_log,
            logs: d.logs,
            gas_wanted: d.gas_wanted,
            gas_used: d.gas_used,
            tx,
            timestamp: d.timestamp,
            code: d.code,
            codespace: d.codespace,
        })
    }

    pub fn is_error(&self) -> bool {
        is_tx_error(self.code.as_ref())
    }

    /// Block time, if the node reported it in RFC 3339 form.
    pub fn block_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }
}

/// Error payload returned by the LCD in place of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TxLookupError {
    pub code: TxCode,
    #[serde(default)]
    pub message: String,
}

impl TxLookupError {
    /// gRPC `NotFound`, which the LCD forwards for transactions not yet indexed.
    const GRPC_NOT_FOUND: i64 = 5;

    /// Does this just mean the transaction has not been indexed yet?
    pub fn is_not_found(&self) -> bool {
        let code_not_found = match &self.code {
            TxCode::Number(code) => *code == Self::GRPC_NOT_FOUND,
            TxCode::Text(code) => code.parse::<i64>().ok() == Some(Self::GRPC_NOT_FOUND),
        };
        code_not_found || self.message.to_ascii_lowercase().contains("not found")
    }
}

/// Result of looking a transaction up by hash.
#[derive(Clone, Debug, PartialEq)]
pub enum TxLookup {
    Found(Box<TxInfo>),
    Error(TxLookupError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pagination {
    #[serde(default)]
    pub next_key: Option<String>,
    #[serde(with = "int_string", default)]
    pub total: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TxSearchResult {
    pub txs: Vec<TxInfo>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TxSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) tx_responses: Vec<TxResponseData>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) pagination: Pagination,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct GasInfo {
    #[serde(with = "int_string", default)]
    pub gas_wanted: u64,
    #[serde(with = "int_string")]
    pub gas_used: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SimulateResponse {
    pub gas_info: GasInfo,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_predicate() {
        assert!(!is_tx_error(None));
        assert!(!is_tx_error(Some(&TxCode::Number(0))));
        assert!(!is_tx_error(Some(&TxCode::Text("0".to_owned()))));
        assert!(is_tx_error(Some(&TxCode::Number(5))));
        assert!(is_tx_error(Some(&TxCode::Text("13".to_owned()))));
        assert!(is_tx_error(Some(&TxCode::Text(String::new()))));
    }

    #[test]
    fn code_wire_forms() {
        let code: TxCode = serde_json::from_str("32").unwrap();
        assert_eq!(code, TxCode::Number(32));
        let code: TxCode = serde_json::from_str(r#""32""#).unwrap();
        assert_eq!(code, TxCode::Text("32".to_owned()));
        assert_eq!(code.to_string(), "32");
    }

    #[test]
    fn error_outcome_drops_logs() {
        let log = TxLog {
            msg_index: 0,
            log: String::new(),
            events: vec![],
        };
        let outcome = TxOutcome::classify(
            Some(TxCode::Number(11)),
            Some("sdk".to_owned()),
            "out of gas",
            vec![log.clone()],
        );
        assert!(outcome.is_error());
        assert!(outcome.logs().is_empty());
        let outcome = TxOutcome::classify(Some(TxCode::Number(0)), None, "", vec![log.clone()]);
        assert_eq!(outcome, TxOutcome::Success { logs: vec![log] });
    }

    #[test]
    fn lookup_not_found() {
        let err: TxLookupError =
            serde_json::from_str(r#"{"code":5,"message":"tx not found: ABCD","details":[]}"#)
                .unwrap();
        assert!(err.is_not_found());
        let err: TxLookupError =
            serde_json::from_str(r#"{"code":"5","message":"","details":[]}"#).unwrap();
        assert!(err.is_not_found());
        let err: TxLookupError =
            serde_json::from_str(r#"{"code":3,"message":"invalid hash"}"#).unwrap();
        assert!(!err.is_not_found());
    }

    #[test]
    fn parse_logs_and_numbers() {
        let d: TxResponseData = serde_json::from_value(serde_json::json!({
            "height": "123",
            "txhash": "AB",
            "gas_wanted": 20000,
            "gas_used": "15000",
            "logs": [{
                "msg_index": 0,
                "log": "",
                "events": [{"type": "message", "attributes": [{"key": "action", "value": "/cosmos.bank.v1beta1.MsgSend"}]}]
            }],
            "code": 0,
            "timestamp": "2023-02-01T10:00:00Z"
        }))
        .unwrap();
        let block = BlockTxBroadcastResult::from(d);
        assert_eq!(block.height, 123);
        assert_eq!(block.gas_wanted, 20000);
        assert_eq!(block.gas_used, 15000);
        assert!(!block.is_error());
        assert_eq!(
            block.outcome.logs()[0].find_attribute("message", "action"),
            Some("/cosmos.bank.v1beta1.MsgSend")
        );
    }

    #[test]
    fn missing_tx_response_is_ambiguous() {
        let err = parse_tx_response(
            Action::Simulate,
            &serde_json::json!({"unexpected": true}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::AmbiguousResponse { .. }));
    }
}

mod bank;
#[cfg(test)]
mod mock;
mod staking;
mod transport;

use std::{borrow::Cow, fmt::Display, sync::Arc, time::Duration};

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::{
    error::{Action, QueryError},
    result::{parse_tx_response, TxResponseData, TxSearchResponse},
    wire::int_string,
    AsyncTxBroadcastResult, BlockTxBroadcastResult, Coins, CreateTxOptions, Error, Fee, LcdBuilder,
    Poller, PublicKey, Result, SignOptions, SignerData, SignerOptions, SimulateResponse,
    SyncTxBroadcastResult, Tx, TxBody, TxCode, TxInfo, TxLookup, TxSearchResult, TxSigner,
    WaitTxBroadcastResult,
};

pub use bank::{BankParams, SendEnabled};
pub use staking::{Delegation, StakingParams, StakingPool};
pub use transport::{HttpTransport, Params, Transport};

const SIMULATE_PATH: &str = "cosmos/tx/v1beta1/simulate";
const TXS_PATH: &str = "cosmos/tx/v1beta1/txs";

/// How the LCD should wait before answering a broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BroadcastMode {
    /// Return after CheckTx.
    Sync,
    /// Return immediately.
    Async,
    /// Return after the transaction is included in a block. Removed from
    /// newer Cosmos SDK versions.
    Block,
}

impl BroadcastMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BroadcastMode::Sync => "BROADCAST_MODE_SYNC",
            BroadcastMode::Async => "BROADCAST_MODE_ASYNC",
            BroadcastMode::Block => "BROADCAST_MODE_BLOCK",
        }
    }
}

impl Display for BroadcastMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-chain account metadata needed for signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: String,
    pub account_number: u64,
    pub sequence: u64,
    /// Absent until the account has signed its first transaction.
    pub public_key: Option<PublicKey>,
}

#[derive(Deserialize)]
struct BaseAccountData {
    address: String,
    #[serde(default)]
    pub_key: Option<Value>,
    #[serde(with = "int_string", default)]
    account_number: u64,
    #[serde(with = "int_string", default)]
    sequence: u64,
}

impl AccountInfo {
    /// Handles plain, vesting and EVM accounts, which all nest a base account.
    fn from_response(address: &str, body: &Value) -> Result<Self> {
        let ambiguous = || Error::ambiguous(Action::GetAccount(address.to_owned()), body);
        let account = body.get("account").ok_or_else(ambiguous)?;
        let base = account
            .get("base_vesting_account")
            .and_then(|vesting| vesting.get("base_account"))
            .or_else(|| account.get("base_account"))
            .unwrap_or(account);
        let data: BaseAccountData =
            serde_json::from_value(base.clone()).map_err(|_| ambiguous())?;
        let public_key = match data.pub_key {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(key) => Some(PublicKey::from_data(key)?),
        };
        Ok(AccountInfo {
            address: data.address,
            account_number: data.account_number,
            sequence: data.sequence,
            public_key,
        })
    }
}

/// A single `key=value` event condition for [LcdClient::search].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchEvent {
    pub key: String,
    pub value: String,
}

impl SearchEvent {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        SearchEvent {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Heights are compared as numbers, everything else as a quoted string.
    fn condition(&self) -> String {
        if self.key == "tx.height" {
            format!("{}={}", self.key, self.value)
        } else {
            format!("{}='{}'", self.key, self.value)
        }
    }
}

/// Options for [LcdClient::search].
#[derive(Clone, Debug, Default)]
pub struct TxSearchOptions {
    events: Vec<SearchEvent>,
    query: Option<String>,
    params: Vec<(String, String)>,
}

impl TxSearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.events.push(SearchEvent::new(key, value));
        self
    }

    /// Raw query for Cosmos SDK 0.47 and later. Replaces the query built from
    /// the events.
    pub fn set_query(&mut self, query: impl Into<Option<String>>) -> &mut Self {
        self.query = query.into();
        self
    }

    /// Extra parameters passed through as is, such as `pagination.limit`.
    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.push((key.into(), value.into()));
        self
    }

    fn to_params(&self) -> Vec<(String, String)> {
        let conditions = self
            .events
            .iter()
            .map(SearchEvent::condition)
            .collect::<Vec<_>>();
        let mut params = conditions
            .iter()
            .map(|condition| ("events".to_owned(), condition.clone()))
            .collect::<Vec<_>>();
        match &self.query {
            Some(query) => params.push(("query".to_owned(), query.clone())),
            None if !conditions.is_empty() => {
                params.push(("query".to_owned(), conditions.join(" AND ")))
            }
            None => (),
        }
        params.extend(self.params.iter().cloned());
        params
    }
}

/// Parse a successful response body, treating an unexpected shape as ambiguous.
fn parse_body<T: DeserializeOwned>(action: Action, body: Value) -> Result<T> {
    serde_json::from_value(body.clone()).map_err(|_| Error::ambiguous(action, &body))
}

/// Error body the LCD sends for failed requests.
#[derive(Deserialize)]
struct ErrorPayload {
    code: TxCode,
    #[serde(default)]
    message: String,
    #[serde(default)]
    codespace: String,
}

impl ErrorPayload {
    fn into_rejection(self, action: Action) -> Option<Error> {
        if self.code.is_zero() {
            None
        } else {
            Some(Error::ChainRejection {
                action,
                code: self.code,
                codespace: self.codespace,
                raw_log: self.message,
            })
        }
    }
}

/// Client for the LCD REST API of a Cosmos SDK chain.
#[derive(Clone)]
pub struct LcdClient {
    builder: Arc<LcdBuilder>,
    transport: Arc<dyn Transport>,
}

impl LcdClient {
    pub(crate) fn new(builder: Arc<LcdBuilder>, transport: Arc<dyn Transport>) -> Self {
        LcdClient { builder, transport }
    }

    pub fn get_config(&self) -> &LcdBuilder {
        &self.builder
    }

    fn is_classic(&self) -> bool {
        self.builder.is_classic()
    }

    async fn get(&self, action: Action, path: &str, params: &Params) -> Result<Value> {
        self.transport
            .get(path, params)
            .await
            .map_err(|source| Error::Query { action, source })
    }

    /// GET an endpoint keyed by an address. The node answers 400 for
    /// addresses it cannot parse.
    async fn get_for_address(
        &self,
        action: Action,
        address: &str,
        path: &str,
        params: &Params,
    ) -> Result<Value> {
        if address.is_empty() {
            return Err(Error::validation("Empty address"));
        }
        match self.transport.get(path, params).await {
            Ok(body) => Ok(body),
            Err(QueryError::Status {
                status: 400, body, ..
            }) => Err(Error::validation(format!("Invalid address {address}: {body}"))),
            Err(source) => Err(Error::Query { action, source }),
        }
    }

    /// POST, turning error bodies with a result code into [Error::ChainRejection].
    async fn post(&self, action: Action, path: &str, body: &Value) -> Result<Value> {
        match self.transport.post(path, body).await {
            Ok(value) => Ok(value),
            Err(QueryError::Status {
                url,
                status,
                body: text,
            }) => {
                match serde_json::from_str::<ErrorPayload>(&text)
                    .ok()
                    .and_then(|payload| payload.into_rejection(action.clone()))
                {
                    Some(rejection) => Err(rejection),
                    None => Err(Error::Query {
                        action,
                        source: QueryError::Status {
                            url,
                            status,
                            body: text,
                        },
                    }),
                }
            }
            Err(source) => Err(Error::Query { action, source }),
        }
    }

    pub async fn account_info(&self, address: &str) -> Result<AccountInfo> {
        if address.is_empty() {
            return Err(Error::validation("Empty account address"));
        }
        let action = Action::GetAccount(address.to_owned());
        let path = format!("cosmos/auth/v1beta1/accounts/{address}");
        let body = match self.transport.get(&path, &[]).await {
            Ok(body) => body,
            Err(QueryError::Status { status: 404, .. }) => {
                return Err(Error::AccountNotFound {
                    address: address.to_owned(),
                })
            }
            Err(QueryError::Status {
                status: 400, body, ..
            }) => {
                return Err(Error::validation(format!(
                    "Invalid address {address}: {body}"
                )))
            }
            Err(source) => return Err(Error::Query { action, source }),
        };
        AccountInfo::from_response(address, &body)
    }

    /// Base64 protobuf encoding of a transaction.
    pub fn encode(&self, tx: &Tx) -> Result<String> {
        Ok(tx.encode(self.is_classic())?)
    }

    pub fn decode(&self, encoded: &str) -> Result<Tx> {
        Tx::decode(encoded, self.is_classic())
    }

    /// Hash the chain will use as the transaction ID.
    pub fn hash(&self, tx: &Tx) -> Result<String> {
        Ok(tx.hash(self.is_classic())?)
    }

    /// Build an unsigned transaction.
    ///
    /// Signers missing a sequence number or public key are looked up on
    /// chain. Without an explicit fee one is estimated by simulation.
    pub async fn create(
        &self,
        signers: &[SignerOptions],
        options: &CreateTxOptions,
    ) -> Result<Tx> {
        let mut signer_data = Vec::with_capacity(signers.len());
        for signer in signers {
            let data = match (signer.sequence, &signer.public_key) {
                (Some(sequence), Some(public_key)) => SignerData {
                    sequence,
                    public_key: Some(public_key.clone()),
                },
                (sequence, public_key) => {
                    let account = self.account_info(&signer.address).await?;
                    SignerData {
                        sequence: sequence.unwrap_or(account.sequence),
                        public_key: public_key.clone().or(account.public_key),
                    }
                }
            };
            signer_data.push(data);
        }

        let fee = match &options.fee {
            Some(fee) => fee.clone(),
            None => self.estimate_fee(&signer_data, options).await?,
        };

        let messages = if options.is_evm_or_empty() {
            vec![]
        } else {
            options.msgs.clone()
        };
        Ok(Tx::new(
            TxBody {
                messages,
                memo: options.memo.clone().unwrap_or_default(),
                timeout_height: options.timeout_height.unwrap_or_default(),
            },
            fee,
        ))
    }

    /// Build a transaction for a single signer and have it signed.
    pub async fn create_and_sign_tx<S: TxSigner + ?Sized>(
        &self,
        signer: &S,
        options: &CreateTxOptions,
    ) -> Result<Tx> {
        let account = self.account_info(signer.address()).await?;
        let signer_options = SignerOptions {
            address: signer.address().to_owned(),
            sequence: Some(account.sequence),
            public_key: signer.public_key().or_else(|| account.public_key.clone()),
        };
        let tx = self.create(&[signer_options], options).await?;
        let expected = tx.auth_info.signer_infos.len() + 1;
        let sign_options = SignOptions {
            chain_id: self.builder.chain_id().to_owned(),
            account_number: account.account_number,
            sequence: account.sequence,
            is_classic: self.is_classic(),
        };
        let signed = signer.sign_tx(tx, &sign_options).await?;
        let signatures = signed.signatures().len();
        if signatures != expected || signatures != signed.auth_info.signer_infos.len() {
            return Err(Error::SignatureMismatch {
                signatures,
                signer_infos: signed.auth_info.signer_infos.len(),
            });
        }
        Ok(signed)
    }

    /// Estimate the fee for the given messages by simulating them.
    pub async fn estimate_fee(
        &self,
        signers: &[SignerData],
        options: &CreateTxOptions,
    ) -> Result<Fee> {
        let gas_adjustment = options
            .gas_adjustment
            .unwrap_or_else(|| self.builder.gas_adjustment());
        let fee_denoms = options
            .fee_denoms
            .clone()
            .unwrap_or_else(|| self.builder.fee_denoms());
        let gas_prices = options
            .gas_prices
            .as_ref()
            .or_else(|| self.builder.gas_prices())
            .map(|prices| prices.filter_denoms(&fee_denoms));
        let zero_fee = || match fee_denoms.first() {
            Some(denom) => Coins::single(denom.clone(), 0),
            None => Coins::new(),
        };

        if options.is_evm_or_empty() {
            log::debug!("No Cosmos messages to simulate, using a zero fee");
            return Ok(Fee::new(0, zero_fee()));
        }

        let gas = match options.fixed_gas() {
            Some(gas) => gas,
            None => {
                let mut draft = Tx::new(
                    TxBody {
                        messages: options.msgs.clone(),
                        memo: options.memo.clone().unwrap_or_default(),
                        timeout_height: options.timeout_height.unwrap_or_default(),
                    },
                    Fee::default(),
                );
                draft.append_empty_signatures(signers);
                self.estimate_gas(&draft, signers, Some(gas_adjustment))
                    .await?
            }
        };

        let amount = match gas_prices {
            Some(prices) => prices.mul_ceil(gas)?,
            None => zero_fee(),
        };
        Ok(Fee::new(gas, amount))
    }

    /// Simulate a transaction and scale the gas used by the gas adjustment.
    ///
    /// An unsigned transaction is simulated with placeholder signatures for
    /// `signers`, and fails if there are none.
    pub async fn estimate_gas(
        &self,
        tx: &Tx,
        signers: &[SignerData],
        gas_adjustment: Option<f64>,
    ) -> Result<u64> {
        let gas_adjustment = gas_adjustment.unwrap_or_else(|| self.builder.gas_adjustment());
        if !gas_adjustment.is_finite() || gas_adjustment <= 0.0 {
            return Err(Error::validation(format!(
                "Gas adjustment must be a positive number, got {gas_adjustment}"
            )));
        }
        let tx = if tx.is_signed() {
            Cow::Borrowed(tx)
        } else {
            if signers.is_empty() {
                return Err(Error::validation(
                    "cannot append signature: transaction is unsigned and no signers were given",
                ));
            }
            let mut draft = Tx::new(tx.body.clone(), Fee::default());
            draft.append_empty_signatures(signers);
            Cow::Owned(draft)
        };
        let res = self.simulate(&tx).await?;
        let gas = (gas_adjustment * res.gas_info.gas_used as f64).ceil() as u64;
        log::debug!(
            "Simulated gas used {}, adjusted by {gas_adjustment} to {gas}",
            res.gas_info.gas_used
        );
        Ok(gas)
    }

    pub async fn simulate(&self, tx: &Tx) -> Result<SimulateResponse> {
        let body = json!({ "tx_bytes": self.encode(tx)? });
        let res = self.post(Action::Simulate, SIMULATE_PATH, &body).await?;
        if res.get("gas_info").is_none() {
            let rejection = serde_json::from_value::<ErrorPayload>(res.clone())
                .ok()
                .and_then(|payload| payload.into_rejection(Action::Simulate));
            return Err(rejection.unwrap_or_else(|| Error::ambiguous(Action::Simulate, &res)));
        }
        serde_json::from_value(res.clone()).map_err(|_| Error::ambiguous(Action::Simulate, &res))
    }

    async fn submit(&self, tx: &Tx, mode: BroadcastMode) -> Result<TxResponseData> {
        let action = Action::Broadcast(mode);
        let body = json!({
            "tx_bytes": self.encode(tx)?,
            "mode": mode.as_str(),
        });
        let res = self.post(action.clone(), TXS_PATH, &body).await?;
        parse_tx_response(action, &res)
    }

    /// Broadcast without waiting for any checks.
    pub async fn broadcast_async(&self, tx: &Tx) -> Result<AsyncTxBroadcastResult> {
        let res = self.submit(tx, BroadcastMode::Async).await?;
        Ok(AsyncTxBroadcastResult {
            height: res.height,
            txhash: res.txhash,
        })
    }

    /// Broadcast and return after CheckTx.
    pub async fn broadcast_sync(&self, tx: &Tx) -> Result<SyncTxBroadcastResult> {
        self.submit(tx, BroadcastMode::Sync).await.map(Into::into)
    }

    /// Broadcast and have the node wait for block inclusion.
    pub async fn broadcast_block(&self, tx: &Tx) -> Result<BlockTxBroadcastResult> {
        let res: BlockTxBroadcastResult = self.submit(tx, BroadcastMode::Block).await?.into();
        log::info!(
            "Transaction {} at height {}: {}",
            res.txhash,
            res.height,
            if res.is_error() { "failed" } else { "succeeded" }
        );
        Ok(res)
    }

    /// Broadcast in sync mode, then wait for the transaction to land in a
    /// block, up to the configured broadcast timeout.
    pub async fn broadcast(&self, tx: &Tx) -> Result<WaitTxBroadcastResult> {
        self.broadcast_with_timeout(tx, self.builder.broadcast_timeout())
            .await
    }

    /// Same as [Self::broadcast] with an explicit timeout.
    pub async fn broadcast_with_timeout(
        &self,
        tx: &Tx,
        timeout: Duration,
    ) -> Result<WaitTxBroadcastResult> {
        let sync = self.broadcast_sync(tx).await?;
        if sync.is_error() {
            log::info!(
                "Transaction {} rejected during CheckTx: {}",
                sync.txhash,
                sync.raw_log
            );
            return Ok(WaitTxBroadcastResult::rejected(sync));
        }
        let info = self.wait_for_transaction(&sync.txhash, timeout).await?;
        let res = WaitTxBroadcastResult::from(info);
        log::info!(
            "Transaction {} included at height {}: {}",
            res.txhash,
            res.height,
            if res.is_error() { "failed" } else { "succeeded" }
        );
        Ok(res)
    }

    /// Look up a transaction by hash.
    ///
    /// Error payloads from the node come back as [TxLookup::Error].
    pub async fn tx_info(&self, txhash: &str) -> Result<TxLookup> {
        let action = Action::GetTx(txhash.to_owned());
        let path = format!("{TXS_PATH}/{txhash}");
        let body = self
            .transport
            .get_raw(&path, &[])
            .await
            .map_err(|source| Error::Query {
                action: action.clone(),
                source,
            })?;
        if body.get("tx_response").is_some() {
            let res = parse_tx_response(action, &body)?;
            return Ok(TxLookup::Found(Box::new(TxInfo::from_response(
                res,
                self.is_classic(),
            )?)));
        }
        if body.get("code").is_some() {
            return serde_json::from_value(body.clone())
                .map(TxLookup::Error)
                .map_err(|_| Error::ambiguous(action, &body));
        }
        Err(Error::ambiguous(action, &body))
    }

    /// Poll until the transaction is indexed.
    ///
    /// Transport errors and not found responses are retried. Any other error
    /// payload is fatal.
    pub async fn wait_for_transaction(&self, txhash: &str, timeout: Duration) -> Result<TxInfo> {
        let poller = Poller::with_timeout(self.builder.poll_interval(), timeout);
        let max_attempts = poller.max_attempts();
        let found = poller
            .poll(move |attempt| async move {
                match self.tx_info(txhash).await {
                    Ok(TxLookup::Found(info)) => Ok(Some(*info)),
                    Ok(TxLookup::Error(e)) if e.is_not_found() => {
                        log::debug!(
                            "Transaction {txhash} not ready, attempt #{attempt}/{max_attempts}"
                        );
                        Ok(None)
                    }
                    Ok(TxLookup::Error(e)) => Err(Error::TxLookupFailed {
                        txhash: txhash.to_owned(),
                        code: e.code,
                        message: e.message,
                    }),
                    Err(e @ Error::Query { .. }) => {
                        log::debug!(
                            "Transaction {txhash} not ready, attempt #{attempt}/{max_attempts}: {e}"
                        );
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            })
            .await?;
        found.ok_or_else(|| Error::ConfirmationTimeout {
            txhash: txhash.to_owned(),
            timeout,
        })
    }

    /// Hashes of the transactions in a block, or the latest block for [None].
    pub async fn tx_hashes_by_height(&self, height: Option<u64>) -> Result<Vec<String>> {
        let action = Action::GetBlock(height);
        let path = match height {
            Some(height) => format!("cosmos/base/tendermint/v1beta1/blocks/{height}"),
            None => "cosmos/base/tendermint/v1beta1/blocks/latest".to_owned(),
        };
        let body = self.get(action.clone(), &path, &[]).await?;
        let txs = match body.pointer("/block/data/txs") {
            None | Some(Value::Null) => return Ok(vec![]),
            Some(Value::Array(txs)) => txs,
            Some(_) => return Err(Error::ambiguous(action, &body)),
        };
        txs.iter()
            .map(|tx| -> Result<String> {
                let encoded = tx
                    .as_str()
                    .ok_or_else(|| Error::ambiguous(action.clone(), &body))?;
                Ok(crate::hash_tx_bytes(&crate::wire::decode(encoded)?))
            })
            .collect()
    }

    /// All transactions in a block, waiting up to the configured block
    /// timeout for the block to be indexed.
    pub async fn tx_infos_by_height(&self, height: Option<u64>) -> Result<Vec<TxInfo>> {
        self.tx_infos_by_height_with_timeout(height, self.builder.block_timeout())
            .await
    }

    /// Same as [Self::tx_infos_by_height] with an explicit timeout.
    pub async fn tx_infos_by_height_with_timeout(
        &self,
        height: Option<u64>,
        timeout: Duration,
    ) -> Result<Vec<TxInfo>> {
        let txhashes = self.tx_hashes_by_height(height).await?;
        let first = match txhashes.first() {
            Some(first) => first,
            None => return Ok(vec![]),
        };
        self.wait_for_transaction(first, timeout).await?;

        let mut infos = Vec::with_capacity(txhashes.len());
        for txhash in &txhashes {
            match self.tx_info(txhash).await? {
                TxLookup::Found(info) => infos.push(*info),
                TxLookup::Error(e) => {
                    return Err(Error::TxLookupFailed {
                        txhash: txhash.clone(),
                        code: e.code,
                        message: e.message,
                    })
                }
            }
        }
        Ok(infos)
    }

    /// Search for transactions by event attributes.
    pub async fn search(&self, options: &TxSearchOptions) -> Result<TxSearchResult> {
        let body = self
            .get(Action::SearchTxs, TXS_PATH, &options.to_params())
            .await?;
        let res: TxSearchResponse = serde_json::from_value(body.clone())
            .map_err(|_| Error::ambiguous(Action::SearchTxs, &body))?;
        Ok(TxSearchResult {
            txs: res
                .tx_responses
                .into_iter()
                .map(|tx| TxInfo::from_response(tx, self.is_classic()))
                .collect::<Result<_>>()?,
            pagination: res.pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use crate::{
        msgs::{EvmMessage, Msg, MsgSend},
        DecCoins, SignerInfo, TxOutcome, SIGN_MODE_DIRECT,
    };

    use super::{mock::*, *};

    const ADDRESS: &str = "xpla1dcegyrekltswvyy0xy69ydgxn9x8x32zdtapd8";

    const DELEGATE_TX: &str = "CsIBCp4BCiMvY29zbW9zLnN0YWtpbmcudjFiZXRhMS5Nc2dEZWxlZ2F0ZRJ3Cix0ZXJyYTF6ZHBnajhhbTVucXF2aHQ5MjdrM2V0bGp5bDZhNTJrd3F1cDBqZRIzdGVycmF2YWxvcGVyMXpkcGdqOGFtNW5xcXZodDkyN2szZXRsanlsNmE1Mmt3cW5kanoyGhIKBXVsdW5hEgkxMDQ3ODQwMDYSH2J5LiBodHRwczovL2dpdGh1Yi5jb20vZW1pZGV2OTgSagpSCkYKHy9jb3Ntb3MuY3J5cHRvLnNlY3AyNTZrMS5QdWJLZXkSIwohA+Q1ZNHkGfabYf1wRUdLcaJHlqDC62Llxam8fKgoH6mZEgQKAggBGJPWChIUCg4KBXVsdW5hEgUzNTk4MxCJ0g4aQOQgfKscECIN6Z6NtfWwEiZ2nxnnjdfZEVq4f2ypIm1QLY8Oo60Rfbe6Y10leA4bL5fPRHp8GC7d9hmrhtDVlXc=";

    struct TestSigner;

    #[async_trait]
    impl TxSigner for TestSigner {
        fn address(&self) -> &str {
            ADDRESS
        }

        async fn sign_tx(&self, mut tx: Tx, options: &SignOptions) -> Result<Tx> {
            let signer_info = SignerInfo {
                public_key: Some(PublicKey::Secp256k1(vec![2; 33])),
                sign_mode: SIGN_MODE_DIRECT,
                sequence: options.sequence,
            };
            tx.append_signature(signer_info, vec![7; 64]);
            Ok(tx)
        }
    }

    fn client(mock: &Arc<MockTransport>) -> LcdClient {
        let mut builder = LcdBuilder::new("http://localhost:1317", "cube_47-5");
        builder.set_gas_prices(Some("0.15axpla".parse().unwrap()));
        builder.build_with_transport(mock.clone())
    }

    fn send_options() -> CreateTxOptions {
        let mut options = CreateTxOptions::new();
        options.add_message(MsgSend {
            from_address: ADDRESS.to_owned(),
            to_address: ADDRESS.to_owned(),
            amount: Coins::single("uluna", 1_000_000),
        });
        options
    }

    fn account_response() -> Value {
        json!({
            "account": {
                "@type": "/cosmos.auth.v1beta1.BaseAccount",
                "address": ADDRESS,
                "pub_key": "",
                "account_number": 1,
                "sequence": 1,
            }
        })
    }

    fn found_response() -> Value {
        json!({
            "tx_response": {
                "txhash": "txInfo.txhash",
                "raw_log": "[]",
                "gas_wanted": 20000,
                "gas_used": 20000,
                "height": 20000,
                "logs": [],
                "timestamp": "1650608740",
                "tx": {
                    "@type": "/cosmos.tx.v1beta1.Tx",
                    "body": { "messages": [], "memo": "" },
                    "auth_info": {
                        "signer_infos": [],
                        "fee": { "amount": [], "gas_limit": "300000", "payer": "", "granter": "" }
                    },
                    "signatures": []
                }
            }
        })
    }

    /// Chain that accepts everything. `tx_lookup` answers transaction lookups.
    fn chain(
        tx_lookup: impl Fn() -> Result<Value, QueryError> + Send + Sync + 'static,
    ) -> Arc<MockTransport> {
        MockTransport::new(move |req| {
            if req.path.contains("cosmos/auth/v1beta1/accounts") {
                Ok(account_response())
            } else if req.path == SIMULATE_PATH {
                Ok(json!({
                    "gas_info": { "gas_wanted": 1000, "gas_used": 1000 },
                    "result": { "data": "", "log": "", "events": [] }
                }))
            } else if req.path == TXS_PATH && req.method == "POST" {
                Ok(json!({
                    "tx_response": {
                        "txhash": "4E63BF998EC3C8765400C800122207FB151B84123673554AAEB8BDF443AEDC39"
                    }
                }))
            } else if req.path.starts_with(TXS_PATH) {
                tx_lookup()
            } else {
                Err(unavailable(&req.path))
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn broadcast_fetches_tx_info() {
        let mock = chain(|| Ok(found_response()));
        let client = client(&mock);
        let tx = client
            .create_and_sign_tx(&TestSigner, &send_options())
            .await
            .unwrap();
        assert_eq!(tx.signatures().len(), 1);

        let res = client.broadcast(&tx).await.unwrap();
        assert!(!res.is_error());
        assert_eq!(res.height, 20000);
        assert_eq!(res.gas_used, 20000);
        assert_eq!(res.timestamp, "1650608740");

        let broadcast = mock
            .requests()
            .into_iter()
            .find(|req| req.path == TXS_PATH)
            .unwrap();
        assert_eq!(
            broadcast.body.unwrap()["mode"],
            Value::from("BROADCAST_MODE_SYNC")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn broadcast_times_out() {
        let mock = chain(|| Err(unavailable("lookup")));
        let client = client(&mock);
        let tx = client
            .create_and_sign_tx(&TestSigner, &send_options())
            .await
            .unwrap();
        let err = client
            .broadcast_with_timeout(&tx, Duration::from_millis(1))
            .await
            .unwrap_err();
        assert!(err.is_confirmation_timeout());
        assert!(err
            .to_string()
            .contains("was not included in a block before timeout of 1ms"));
        assert_eq!(mock.count("cosmos/tx/v1beta1/txs/"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_retried() {
        let calls = AtomicU32::new(0);
        let mock = chain(move || {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(json!({ "code": 5, "message": "tx not found: 4E63BF99" }))
            } else {
                Ok(found_response())
            }
        });
        let client = client(&mock);
        let info = client
            .wait_for_transaction("4E63BF99", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(info.height, 20000);
        assert_eq!(mock.count("cosmos/tx/v1beta1/txs/"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_error_is_fatal() {
        let mock = chain(|| Ok(json!({ "code": 3, "message": "invalid hash" })));
        let client = client(&mock);
        let err = client
            .wait_for_transaction("zz", Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TxLookupFailed { .. }));
        assert_eq!(mock.count("cosmos/tx/v1beta1/txs/"), 1);
    }

    #[tokio::test]
    async fn lookup_classification() {
        let mock = chain(|| Ok(json!({ "unexpected": true })));
        let client = client(&mock);
        assert!(matches!(
            client.tx_info("AB").await,
            Err(Error::AmbiguousResponse { .. })
        ));

        let mock = chain(|| Ok(json!({ "code": "5", "message": "not found" })));
        match client_lookup(&mock).await {
            TxLookup::Error(e) => assert!(e.is_not_found()),
            other => panic!("unexpected lookup {other:?}"),
        }
    }

    async fn client_lookup(mock: &Arc<MockTransport>) -> TxLookup {
        client(mock).tx_info("AB").await.unwrap()
    }

    #[tokio::test]
    async fn sync_rejection_skips_polling() {
        let mock = MockTransport::new(|req| {
            if req.path == TXS_PATH {
                Ok(json!({
                    "tx_response": {
                        "height": "0",
                        "txhash": "ABCD",
                        "raw_log": "insufficient funds",
                        "code": 5,
                        "codespace": "sdk"
                    }
                }))
            } else {
                Err(unavailable(&req.path))
            }
        });
        let client = client(&mock);
        let res = client.broadcast(&Tx::default()).await.unwrap();
        assert!(res.is_error());
        assert_eq!(res.gas_used, 0);
        assert_eq!(res.timestamp, "");
        assert!(matches!(res.outcome, TxOutcome::Error { .. }));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn evm_or_empty_skips_simulation() {
        let mock = chain(|| Ok(found_response()));
        let client = client(&mock);
        let signers = [SignerData {
            sequence: 1,
            public_key: None,
        }];

        let fee = client
            .estimate_fee(&signers, &CreateTxOptions::new())
            .await
            .unwrap();
        assert_eq!(fee, Fee::new(0, Coins::single("axpla", 0)));

        let mut options = CreateTxOptions::new();
        options.add_message(EvmMessage::default());
        let fee = client.estimate_fee(&signers, &options).await.unwrap();
        assert_eq!(fee.gas_limit, 0);
        assert_eq!(mock.count(SIMULATE_PATH), 0);

        let tx = client
            .create(
                &[SignerOptions {
                    address: ADDRESS.to_owned(),
                    sequence: Some(1),
                    public_key: Some(PublicKey::Secp256k1(vec![2; 33])),
                }],
                options.set_memo("evm"),
            )
            .await
            .unwrap();
        assert!(tx.body.messages.is_empty());
        assert_eq!(tx.body.memo, "evm");
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn estimate_fee_simulates() {
        let mock = chain(|| Ok(found_response()));
        let client = client(&mock);
        let signers = [SignerData {
            sequence: 4,
            public_key: None,
        }];
        let fee = client
            .estimate_fee(&signers, &send_options())
            .await
            .unwrap();
        assert_eq!(fee.gas_limit, 2000);
        assert_eq!(fee.amount, Coins::single("axpla", 300));

        let simulate = mock.requests().pop().unwrap();
        let encoded = simulate.body.unwrap()["tx_bytes"]
            .as_str()
            .unwrap()
            .to_owned();
        let draft = client.decode(&encoded).unwrap();
        assert_eq!(draft.auth_info.signer_infos.len(), 1);
        assert_eq!(draft.auth_info.signer_infos[0].sequence, 4);
        assert_eq!(draft.signatures(), [Vec::<u8>::new()]);
    }

    #[tokio::test]
    async fn explicit_gas_skips_simulation() {
        let mock = chain(|| Ok(found_response()));
        let client = client(&mock);
        let mut options = send_options();
        options
            .set_gas(1000u64)
            .set_gas_prices("0.15axpla,0.01uatom".parse::<DecCoins>().unwrap());
        let fee = client.estimate_fee(&[], &options).await.unwrap();
        assert_eq!(fee, Fee::new(1000, Coins::single("axpla", 150)));
        assert_eq!(mock.count(SIMULATE_PATH), 0);
    }

    #[tokio::test]
    async fn estimate_gas_needs_signers() {
        let mock = chain(|| Ok(found_response()));
        let client = client(&mock);
        let tx = client.create(&[], send_options().set_gas(1u64)).await.unwrap();
        let err = client.estimate_gas(&tx, &[], None).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn gas_adjustment_must_be_positive() {
        let mock = chain(|| Ok(found_response()));
        let client = client(&mock);
        let signers = [SignerData {
            sequence: 0,
            public_key: None,
        }];
        let tx = Tx::new(
            TxBody {
                messages: send_options().msgs.clone(),
                memo: String::new(),
                timeout_height: 0,
            },
            Fee::default(),
        );
        for adjustment in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            let err = client
                .estimate_gas(&tx, &signers, Some(adjustment))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "{adjustment}");
        }
        assert_eq!(mock.count(SIMULATE_PATH), 0);

        let mut options = send_options();
        options.set_gas_adjustment(-2.0);
        let err = client.estimate_fee(&signers, &options).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(mock.count(SIMULATE_PATH), 0);

        assert_eq!(client.estimate_gas(&tx, &signers, Some(1.5)).await.unwrap(), 1500);
    }

    #[tokio::test]
    async fn simulate_rejection() {
        let mock = MockTransport::new(|req| {
            Err(QueryError::Status {
                url: req.path.clone(),
                status: 400,
                body: r#"{"code":13,"message":"insufficient fee","codespace":"sdk"}"#.to_owned(),
            })
        });
        let client = client(&mock);
        let err = client
            .estimate_fee(
                &[SignerData {
                    sequence: 0,
                    public_key: None,
                }],
                &send_options(),
            )
            .await
            .unwrap_err();
        assert!(err.is_chain_rejection());
        match err {
            Error::ChainRejection {
                code,
                codespace,
                raw_log,
                ..
            } => {
                assert_eq!(code, TxCode::Number(13));
                assert_eq!(codespace, "sdk");
                assert_eq!(raw_log, "insufficient fee");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[tokio::test]
    async fn search_params() {
        let mock = MockTransport::new(|_| {
            Ok(json!({
                "tx_responses": [],
                "pagination": { "next_key": null, "total": "0" }
            }))
        });
        let client = client(&mock);
        let mut options = TxSearchOptions::new();
        options
            .add_event("tx.height", "5")
            .add_event("message.sender", "xpla1abc")
            .add_param("pagination.limit", "10");
        let res = client.search(&options).await.unwrap();
        assert!(res.txs.is_empty());

        let req = mock.requests().pop().unwrap();
        assert_eq!(req.path, TXS_PATH);
        assert_eq!(
            req.param("events"),
            ["tx.height=5", "message.sender='xpla1abc'"]
        );
        assert_eq!(
            req.param("query"),
            ["tx.height=5 AND message.sender='xpla1abc'"]
        );
        assert_eq!(req.param("pagination.limit"), ["10"]);

        options.set_query("tx.height>1".to_owned());
        assert_eq!(
            options.to_params().iter().filter(|(k, _)| k == "query").count(),
            1
        );
        assert!(options
            .to_params()
            .contains(&("query".to_owned(), "tx.height>1".to_owned())));
    }

    #[tokio::test(start_paused = true)]
    async fn block_transactions() {
        let mock = MockTransport::new(|req| {
            if req.path.contains("blocks/20000") {
                Ok(json!({ "block": { "data": { "txs": [DELEGATE_TX] } } }))
            } else if req.path.contains("blocks/latest") {
                Ok(json!({ "block": { "data": { "txs": null } } }))
            } else {
                Ok(found_response())
            }
        });
        let client = client(&mock);
        assert_eq!(
            client.tx_hashes_by_height(Some(20000)).await.unwrap(),
            ["DCD71E3E43FA35916720992C028C5649C864BD40F7458963DB9ADC17C8FCD36F"]
        );
        assert!(client.tx_infos_by_height(None).await.unwrap().is_empty());

        let infos = client.tx_infos_by_height(Some(20000)).await.unwrap();
        assert_eq!(infos.len(), 1);
        // one poll for the first transaction, then one read per transaction
        assert_eq!(mock.count("cosmos/tx/v1beta1/txs/"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn block_with_unregistered_message() {
        let ethereum_tx = json!({
            "@type": "/ethermint.evm.v1.MsgEthereumTx",
            "data": { "@type": "/ethermint.evm.v1.DynamicFeeTx", "nonce": "12" },
            "size": 0,
            "hash": "0x5d1d",
            "from": ""
        });
        let mut response = found_response();
        response["tx_response"]["tx"]["body"]["messages"] = json!([ethereum_tx.clone()]);
        let mock = MockTransport::new(move |req| {
            if req.path.contains("blocks/20000") {
                Ok(json!({ "block": { "data": { "txs": [DELEGATE_TX] } } }))
            } else {
                Ok(response.clone())
            }
        });
        let client = client(&mock);

        let infos = client.tx_infos_by_height(Some(20000)).await.unwrap();
        assert_eq!(infos.len(), 1);
        let msg = &infos[0].tx.body.messages[0];
        assert_eq!(msg.type_url(), Some("/ethermint.evm.v1.MsgEthereumTx"));
        assert!(matches!(msg, Msg::Unknown(_)));

        let info = match client.tx_info("txInfo.txhash").await.unwrap() {
            TxLookup::Found(info) => info,
            TxLookup::Error(e) => panic!("unexpected lookup error {e:?}"),
        };
        assert_eq!(info.tx.to_data(false).unwrap()["body"]["messages"][0], ethereum_tx);
    }

    #[tokio::test]
    async fn account_forms() {
        let mock = MockTransport::new(|req| {
            if req.path.ends_with("/vesting") {
                Ok(json!({
                    "account": {
                        "@type": "/cosmos.vesting.v1beta1.ContinuousVestingAccount",
                        "base_vesting_account": {
                            "base_account": {
                                "address": "vesting",
                                "pub_key": {
                                    "@type": "/cosmos.crypto.secp256k1.PubKey",
                                    "key": "A+Q1ZNHkGfabYf1wRUdLcaJHlqDC62Llxam8fKgoH6mZ"
                                },
                                "account_number": "7",
                                "sequence": "3"
                            }
                        }
                    }
                }))
            } else if req.path.ends_with("/evm") {
                Ok(json!({
                    "account": {
                        "@type": "/ethermint.types.v1.EthAccount",
                        "base_account": {
                            "address": "evm",
                            "pub_key": null,
                            "account_number": "8",
                            "sequence": "0"
                        },
                        "code_hash": "0x"
                    }
                }))
            } else if req.path.ends_with("/plain") {
                Ok(account_response())
            } else {
                Err(QueryError::Status {
                    url: req.path.clone(),
                    status: 404,
                    body: r#"{"code":5,"message":"account not found"}"#.to_owned(),
                })
            }
        });
        let client = client(&mock);

        let vesting = client.account_info("vesting").await.unwrap();
        assert_eq!((vesting.account_number, vesting.sequence), (7, 3));
        assert_eq!(
            vesting.public_key.map(|key| key.key_bytes().len()),
            Some(33)
        );

        let evm = client.account_info("evm").await.unwrap();
        assert_eq!(evm.account_number, 8);
        assert_eq!(evm.public_key, None);

        let plain = client.account_info("plain").await.unwrap();
        assert_eq!(plain.sequence, 1);
        assert_eq!(plain.public_key, None);

        assert!(matches!(
            client.account_info("missing").await,
            Err(Error::AccountNotFound { .. })
        ));
        assert!(matches!(
            client.account_info("").await,
            Err(Error::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn create_fills_sequence_from_chain() {
        let mock = chain(|| Ok(found_response()));
        let client = client(&mock);
        let mut options = send_options();
        options
            .set_fee(Fee::new(100_000, Coins::single("axpla", 1)))
            .set_timeout_height(99u64);
        let tx = client
            .create(&[SignerOptions::new(ADDRESS)], &options)
            .await
            .unwrap();
        assert_eq!(tx.body.messages.len(), 1);
        assert_eq!(tx.body.timeout_height, 99);
        assert_eq!(tx.auth_info.fee.gas_limit, 100_000);
        assert!(!tx.is_signed());
        assert_eq!(mock.count("cosmos/auth/v1beta1/accounts"), 1);
        assert_eq!(mock.count(SIMULATE_PATH), 0);
    }
}

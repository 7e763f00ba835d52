//! Error types exposed by this package.

use std::{fmt::Display, time::Duration};

use crate::result::TxCode;

/// Which wire form a codec operation was working with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Legacy `{type, value}` JSON.
    Amino,
    /// JSON with an `@type` URL field.
    Data,
    /// Binary protobuf.
    Proto,
}

impl Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Representation::Amino => "Amino",
            Representation::Data => "Data",
            Representation::Proto => "Proto",
        })
    }
}

/// Errors converting messages between their in-memory and wire forms.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("{type_name} does not support the {representation} representation")]
    UnsupportedRepresentation {
        type_name: &'static str,
        representation: Representation,
    },
    #[error("Message {type_url} has no codec and cannot be converted to {representation}")]
    Opaque {
        type_url: String,
        representation: Representation,
    },
    #[error("Unknown {representation} type tag {tag:?}")]
    UnknownType {
        representation: Representation,
        tag: String,
    },
    #[error("Expected {representation} type tag {expected:?}, got {actual:?}")]
    WrongType {
        representation: Representation,
        expected: String,
        actual: String,
    },
    #[error("Missing {representation} type tag")]
    MissingType { representation: Representation },
    #[error("Invalid {representation} JSON for {type_name}: {source}")]
    Json {
        type_name: &'static str,
        representation: Representation,
        source: serde_json::Error,
    },
    #[error("Unable to decode protobuf for {type_url}: {source}")]
    Proto {
        type_url: String,
        source: prost::DecodeError,
    },
    #[error("Invalid field {field} on {type_name}: {message}")]
    InvalidField {
        type_name: &'static str,
        field: &'static str,
        message: String,
    },
}

impl CodecError {
    pub(crate) fn unsupported(type_name: &'static str, representation: Representation) -> Self {
        CodecError::UnsupportedRepresentation {
            type_name,
            representation,
        }
    }

    pub(crate) fn invalid_field(
        type_name: &'static str,
        field: &'static str,
        message: impl Display,
    ) -> Self {
        CodecError::InvalidField {
            type_name,
            field,
            message: message.to_string(),
        }
    }
}

/// Errors parsing or combining coin amounts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinError {
    #[error("Could not parse coin value {input:?}: {message}")]
    Parse { input: String, message: String },
    #[error("Duplicate denomination {denom}")]
    DuplicateDenom { denom: String },
    #[error("Amount overflow for denomination {denom}")]
    Overflow { denom: String },
}

/// The request being made when a network level error occurred.
#[derive(Clone, Debug)]
pub enum Action {
    GetAccount(String),
    Simulate,
    Broadcast(crate::BroadcastMode),
    GetTx(String),
    GetBlock(Option<u64>),
    SearchTxs,
    GetBalance(String),
    GetSupply,
    GetBankParams,
    GetStakingParams,
    GetStakingPool,
    GetDelegations {
        delegator: Option<String>,
        validator: Option<String>,
    },
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::GetAccount(address) => write!(f, "get account {address}"),
            Action::Simulate => f.write_str("simulate transaction"),
            Action::Broadcast(mode) => write!(f, "broadcast transaction ({mode})"),
            Action::GetTx(txhash) => write!(f, "get transaction {txhash}"),
            Action::GetBlock(Some(height)) => write!(f, "get block {height}"),
            Action::GetBlock(None) => f.write_str("get latest block"),
            Action::SearchTxs => f.write_str("search transactions"),
            Action::GetBalance(address) => write!(f, "get balance of {address}"),
            Action::GetSupply => f.write_str("get total supply"),
            Action::GetBankParams => f.write_str("get bank parameters"),
            Action::GetStakingParams => f.write_str("get staking parameters"),
            Action::GetStakingPool => f.write_str("get staking pool"),
            Action::GetDelegations {
                delegator,
                validator,
            } => write!(
                f,
                "get delegations (delegator {}, validator {})",
                delegator.as_deref().unwrap_or("any"),
                validator.as_deref().unwrap_or("any")
            ),
        }
    }
}

/// Errors from the underlying HTTP transport.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error("Invalid request URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("HTTP request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },
    #[error("{url} responded with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Unable to parse JSON response from {url}: {source}. Body: {body}")]
    Json {
        url: String,
        body: String,
        source: serde_json::Error,
    },
}

/// Top level error type for this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid request: {message}")]
    Validation { message: String },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Coin(#[from] CoinError),
    #[error("Error during {action}: {source}")]
    Query { action: Action, source: QueryError },
    #[error("Account {address} not found")]
    AccountNotFound { address: String },
    #[error("Chain rejected the request during {action} with code {code} (codespace {codespace:?}): {raw_log}")]
    ChainRejection {
        action: Action,
        code: TxCode,
        codespace: String,
        raw_log: String,
    },
    #[error("Transaction {txhash} was not included in a block before timeout of {}ms", .timeout.as_millis())]
    ConfirmationTimeout { txhash: String, timeout: Duration },
    #[error("Unable to get the TxInfo of {txhash}: code {code}, {message}")]
    TxLookupFailed {
        txhash: String,
        code: TxCode,
        message: String,
    },
    #[error("Response during {action} matched neither the success nor the error shape: {body}")]
    AmbiguousResponse { action: Action, body: String },
    #[error("Invalid base64 transaction: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Unable to decode protobuf transaction: {0}")]
    ProtoDecode(#[from] prost::DecodeError),
    #[error("Signer produced {signatures} signatures for {signer_infos} signer infos")]
    SignatureMismatch {
        signatures: usize,
        signer_infos: usize,
    },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn ambiguous(action: Action, body: &serde_json::Value) -> Self {
        Error::AmbiguousResponse {
            action,
            body: body.to_string(),
        }
    }

    /// Did the chain reject the request, as opposed to a network or client problem?
    pub fn is_chain_rejection(&self) -> bool {
        matches!(self, Error::ChainRejection { .. })
    }

    /// Did we give up waiting for a transaction to land?
    pub fn is_confirmation_timeout(&self) -> bool {
        matches!(self, Error::ConfirmationTimeout { .. })
    }
}

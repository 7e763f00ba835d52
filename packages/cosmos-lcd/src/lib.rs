pub use client::{BroadcastMode, LcdClient, SearchEvent, TxSearchOptions};
pub use client::{AccountInfo, HttpTransport, Params, Transport};
pub use client::{BankParams, Delegation, SendEnabled, StakingParams, StakingPool};
pub use coins::{Coin, Coins, DecCoins};
pub use cosmos_sdk_proto as proto;
pub use error::{Action, CodecError, CoinError, Error, QueryError, Representation};
pub use lcd_builder::LcdBuilder;
pub use network::LcdNetwork;
pub use poll::Poller;
pub use result::{
    is_tx_error, AsyncTxBroadcastResult, BlockTxBroadcastResult, Event, EventAttribute, GasInfo,
    Pagination, SimulateResponse, SyncTxBroadcastResult, TxCode, TxInfo, TxLog, TxLookup,
    TxLookupError, TxOutcome, TxSearchResult, WaitTxBroadcastResult,
};
pub use tx::{hash_tx_bytes, AuthInfo, Fee, PublicKey, SignerInfo, Tx, TxBody, SIGN_MODE_DIRECT};
pub use txbuilder::{CreateTxOptions, SignOptions, SignerData, SignerOptions, TxSigner};

#[cfg(feature = "clap")]
pub use crate::clap::LcdOpt;

#[cfg(feature = "clap")]
mod clap;
mod client;
mod coins;
mod error;
mod lcd_builder;
pub mod msgs;
mod network;
mod poll;
mod result;
mod tx;
mod txbuilder;
mod wire;

pub type Result<T, E = Error> = std::result::Result<T, E>;

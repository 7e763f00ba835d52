use std::fmt::Display;

use async_trait::async_trait;

use crate::{
    coins::DecCoins,
    msgs::Msg,
    tx::{Fee, PublicKey, Tx},
    Result,
};

/// Options for building a transaction with [crate::LcdClient::create].
///
/// Anything left unset falls back to the client configuration.
#[derive(Default, Clone, Debug)]
pub struct CreateTxOptions {
    pub(crate) msgs: Vec<Msg>,
    pub(crate) fee: Option<Fee>,
    pub(crate) memo: Option<String>,
    pub(crate) gas: Option<u64>,
    pub(crate) gas_prices: Option<DecCoins>,
    pub(crate) gas_adjustment: Option<f64>,
    pub(crate) fee_denoms: Option<Vec<String>>,
    pub(crate) timeout_height: Option<u64>,
}

impl Display for CreateTxOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} message(s)", self.msgs.len())?;
        for msg in &self.msgs {
            write!(f, ", {}", msg.type_url().unwrap_or("EVM message"))?;
        }
        if let Some(memo) = &self.memo {
            write!(f, ", memo {memo:?}")?;
        }
        Ok(())
    }
}

impl CreateTxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to this transaction.
    pub fn add_message(&mut self, msg: impl Into<Msg>) -> &mut Self {
        self.msgs.push(msg.into());
        self
    }

    pub fn messages(&self) -> &[Msg] {
        &self.msgs
    }

    /// Use this fee instead of estimating one.
    pub fn set_fee(&mut self, fee: impl Into<Option<Fee>>) -> &mut Self {
        self.fee = fee.into();
        self
    }

    /// Set the memo field.
    pub fn set_memo(&mut self, memo: impl Into<String>) -> &mut Self {
        self.memo = Some(memo.into());
        self
    }

    /// Clear the memo field
    pub fn clear_memo(&mut self) -> &mut Self {
        self.memo = None;
        self
    }

    /// Either set or clear the memo field.
    pub fn set_optional_memo(&mut self, memo: impl Into<Option<String>>) -> &mut Self {
        self.memo = memo.into();
        self
    }

    /// Fixed gas limit. [None] or zero means simulate.
    pub fn set_gas(&mut self, gas: impl Into<Option<u64>>) -> &mut Self {
        self.gas = gas.into();
        self
    }

    pub fn set_gas_prices(&mut self, gas_prices: impl Into<Option<DecCoins>>) -> &mut Self {
        self.gas_prices = gas_prices.into();
        self
    }

    pub fn set_gas_adjustment(&mut self, gas_adjustment: impl Into<Option<f64>>) -> &mut Self {
        self.gas_adjustment = gas_adjustment.into();
        self
    }

    /// Only pay fees in these denominations, where gas prices allow it.
    pub fn set_fee_denoms(&mut self, fee_denoms: impl Into<Option<Vec<String>>>) -> &mut Self {
        self.fee_denoms = fee_denoms.into();
        self
    }

    pub fn set_timeout_height(&mut self, timeout_height: impl Into<Option<u64>>) -> &mut Self {
        self.timeout_height = timeout_height.into();
        self
    }

    /// Gas limit requested by the caller, if simulation should be skipped.
    pub(crate) fn fixed_gas(&self) -> Option<u64> {
        self.gas.filter(|gas| *gas > 0)
    }

    /// Whether this transaction is empty or carries an EVM payload.
    ///
    /// Only the first message is checked.
    pub(crate) fn is_evm_or_empty(&self) -> bool {
        self.msgs.first().map_or(true, Msg::is_evm)
    }
}

/// A signer as passed to [crate::LcdClient::create].
///
/// Missing fields are looked up from the chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignerOptions {
    pub address: String,
    pub sequence: Option<u64>,
    pub public_key: Option<PublicKey>,
}

impl SignerOptions {
    pub fn new(address: impl Into<String>) -> Self {
        SignerOptions {
            address: address.into(),
            sequence: None,
            public_key: None,
        }
    }
}

/// A signer with its account metadata resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignerData {
    pub sequence: u64,
    pub public_key: Option<PublicKey>,
}

/// Everything a signer needs besides the transaction itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignOptions {
    pub chain_id: String,
    pub account_number: u64,
    pub sequence: u64,
    pub is_classic: bool,
}

/// Key management lives outside this crate. Implementations sign the
/// [Tx::sign_doc_bytes] and append their signature with [Tx::append_signature].
#[async_trait]
pub trait TxSigner: Send + Sync {
    fn address(&self) -> &str;

    /// Known public key, if any. Otherwise it is read from the chain.
    fn public_key(&self) -> Option<PublicKey> {
        None
    }

    async fn sign_tx(&self, tx: Tx, options: &SignOptions) -> Result<Tx>;
}

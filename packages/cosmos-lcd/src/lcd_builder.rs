use std::{sync::Arc, time::Duration};

use crate::{DecCoins, HttpTransport, LcdClient, Poller, Result, Transport};

/// Used to build an [LcdClient].
#[derive(Clone, Debug)]
pub struct LcdBuilder {
    url: String,
    chain_id: String,

    // Values with defaults
    is_classic: Option<bool>,
    gas_prices: Option<DecCoins>,
    gas_adjustment: Option<f64>,
    fee_denoms: Option<Vec<String>>,
    poll_interval: Option<Duration>,
    broadcast_timeout: Option<Duration>,
    block_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    referer_header: Option<String>,
}

impl LcdBuilder {
    /// Create a new [LcdBuilder] with default options where possible.
    pub fn new(url: impl Into<String>, chain_id: impl Into<String>) -> LcdBuilder {
        Self {
            url: url.into(),
            chain_id: chain_id.into(),
            is_classic: None,
            gas_prices: None,
            gas_adjustment: None,
            fee_denoms: None,
            poll_interval: None,
            broadcast_timeout: None,
            block_timeout: None,
            request_timeout: None,
            referer_header: None,
        }
    }

    /// Connect over HTTP.
    pub fn build(self) -> Result<LcdClient> {
        let transport = HttpTransport::new(&self)?;
        Ok(self.build_with_transport(Arc::new(transport)))
    }

    /// Use a custom [Transport], such as a mock in tests.
    pub fn build_with_transport(self, transport: Arc<dyn Transport>) -> LcdClient {
        LcdClient::new(Arc::new(self), transport)
    }

    /// Base URL of the LCD REST server
    pub fn url(&self) -> &str {
        self.url.as_ref()
    }

    /// See [Self::url]
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Chain ID we want to communicate with
    pub fn chain_id(&self) -> &str {
        self.chain_id.as_ref()
    }

    /// See [Self::chain_id]
    pub fn set_chain_id(&mut self, chain_id: impl Into<String>) {
        self.chain_id = chain_id.into();
    }

    /// Whether the chain uses the legacy Amino type namespaces, such as
    /// `bank/MsgSend` instead of `cosmos-sdk/MsgSend`.
    ///
    /// Default: false
    pub fn is_classic(&self) -> bool {
        self.is_classic.unwrap_or(false)
    }

    /// See [Self::is_classic]
    pub fn set_is_classic(&mut self, is_classic: impl Into<Option<bool>>) {
        self.is_classic = is_classic.into();
    }

    /// Price per unit of gas, per denomination.
    ///
    /// When unset, estimated fees carry a zero amount.
    pub fn gas_prices(&self) -> Option<&DecCoins> {
        self.gas_prices.as_ref()
    }

    /// See [Self::gas_prices]
    pub fn set_gas_prices(&mut self, gas_prices: Option<DecCoins>) {
        self.gas_prices = gas_prices;
    }

    /// Multiplier applied to simulated gas usage.
    ///
    /// Default: 2.0
    pub fn gas_adjustment(&self) -> f64 {
        self.gas_adjustment.unwrap_or(2.0)
    }

    /// See [Self::gas_adjustment]
    pub fn set_gas_adjustment(&mut self, gas_adjustment: Option<f64>) {
        self.gas_adjustment = gas_adjustment;
    }

    /// Denominations fees should be paid in.
    ///
    /// Default: `axpla`
    pub fn fee_denoms(&self) -> Vec<String> {
        self.fee_denoms
            .clone()
            .unwrap_or_else(|| vec!["axpla".to_owned()])
    }

    /// See [Self::fee_denoms]
    pub fn set_fee_denoms(&mut self, fee_denoms: Option<Vec<String>>) {
        self.fee_denoms = fee_denoms;
    }

    /// Delay between lookups while waiting for a transaction.
    ///
    /// Default: 500ms
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval.unwrap_or(Poller::DEFAULT_INTERVAL)
    }

    /// See [Self::poll_interval]
    pub fn set_poll_interval(&mut self, poll_interval: Option<Duration>) {
        self.poll_interval = poll_interval;
    }

    /// How long [LcdClient::broadcast] waits for inclusion in a block.
    ///
    /// Default: 60 seconds
    pub fn broadcast_timeout(&self) -> Duration {
        self.broadcast_timeout
            .unwrap_or_else(|| Duration::from_secs(60))
    }

    /// See [Self::broadcast_timeout]
    pub fn set_broadcast_timeout(&mut self, broadcast_timeout: Option<Duration>) {
        self.broadcast_timeout = broadcast_timeout;
    }

    /// How long [LcdClient::tx_infos_by_height] waits for a block to be indexed.
    ///
    /// Default: 30 seconds
    pub fn block_timeout(&self) -> Duration {
        self.block_timeout.unwrap_or_else(|| Duration::from_secs(30))
    }

    /// See [Self::block_timeout]
    pub fn set_block_timeout(&mut self, block_timeout: Option<Duration>) {
        self.block_timeout = block_timeout;
    }

    /// Timeout for a single HTTP request
    ///
    /// Defaults to 10 seconds
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
            .unwrap_or_else(|| Duration::from_secs(10))
    }

    /// See [Self::request_timeout]
    pub fn set_request_timeout(&mut self, request_timeout: Option<Duration>) {
        self.request_timeout = request_timeout;
    }

    /// Referrer header sent to the server
    pub fn referer_header(&self) -> Option<&str> {
        self.referer_header.as_deref()
    }

    /// See [Self::referer_header]
    pub fn set_referer_header(&mut self, referer_header: Option<String>) {
        self.referer_header = referer_header;
    }

    pub(crate) fn broadcast_poller(&self) -> Poller {
        Poller::with_timeout(self.poll_interval(), self.broadcast_timeout())
    }
}

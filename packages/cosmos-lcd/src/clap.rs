use crate::{DecCoins, Error, LcdBuilder, LcdClient, LcdNetwork, Result};

/// Command line options for connecting to an LCD endpoint
#[derive(clap::Parser, Clone, Debug)]
pub struct LcdOpt {
    /// Which network preset to start from
    #[clap(long, env = "COSMOS_NETWORK", global = true)]
    pub network: Option<LcdNetwork>,
    /// Optional LCD URL override
    #[clap(long, env = "COSMOS_LCD", global = true)]
    pub lcd_url: Option<String>,
    /// Optional chain ID override
    #[clap(long, env = "COSMOS_CHAIN_ID", global = true)]
    pub chain_id: Option<String>,
    /// Gas prices override, e.g. 850000000000axpla
    #[clap(long, env = "COSMOS_GAS_PRICES", global = true)]
    pub gas_prices: Option<DecCoins>,
    /// Optional gas adjustment override
    #[clap(long, env = "COSMOS_GAS_ADJUSTMENT", global = true)]
    pub gas_adjustment: Option<f64>,
    /// Use the legacy Amino type namespaces
    #[clap(long, global = true)]
    pub classic: bool,
    /// Referer header
    #[clap(long, short, global = true, env = "COSMOS_REFERER_HEADER")]
    referer_header: Option<String>,
}

impl LcdOpt {
    pub fn builder(&self) -> Result<LcdBuilder> {
        self.clone().into_builder()
    }

    pub fn into_builder(self) -> Result<LcdBuilder> {
        let LcdOpt {
            network,
            lcd_url,
            chain_id,
            gas_prices,
            gas_adjustment,
            classic,
            referer_header,
        } = self;

        let mut builder = match (network, lcd_url) {
            (Some(network), lcd_url) => {
                let mut builder = network.builder();
                if let Some(lcd_url) = lcd_url {
                    builder.set_url(lcd_url);
                }
                builder
            }
            (None, Some(lcd_url)) => LcdBuilder::new(
                lcd_url,
                chain_id.clone().ok_or_else(|| {
                    Error::validation("--chain-id is required when no network is specified")
                })?,
            ),
            (None, None) => return Err(Error::validation(
                "No network specified, either provide the COSMOS_NETWORK env var or --network option",
            )),
        };
        if let Some(chain_id) = chain_id {
            builder.set_chain_id(chain_id);
        }
        if classic {
            builder.set_is_classic(true);
        }
        if gas_prices.is_some() {
            builder.set_gas_prices(gas_prices);
        }
        if gas_adjustment.is_some() {
            builder.set_gas_adjustment(gas_adjustment);
        }
        builder.set_referer_header(referer_header);

        Ok(builder)
    }

    pub fn build(&self) -> Result<LcdClient> {
        self.builder()?.build()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn network_with_overrides() {
        let opt = LcdOpt::try_parse_from([
            "test",
            "--network",
            "xpla-testnet",
            "--lcd-url",
            "http://localhost:1317",
            "--gas-prices",
            "0.15axpla",
        ])
        .unwrap();
        let builder = opt.into_builder().unwrap();
        assert_eq!(builder.url(), "http://localhost:1317");
        assert_eq!(builder.chain_id(), "cube_47-5");
        assert_eq!(builder.gas_prices().map(ToString::to_string).as_deref(), Some("0.15axpla"));
    }

    #[test]
    fn url_needs_chain_id() {
        let opt = LcdOpt::try_parse_from(["test", "--lcd-url", "http://localhost:1317"]).unwrap();
        assert!(matches!(opt.into_builder(), Err(Error::Validation { .. })));
    }
}

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::de::Visitor;

use crate::{DecCoins, LcdBuilder};

/// Well known networks with a public LCD endpoint.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum LcdNetwork {
    XplaMainnet,
    XplaTestnet,
    XplaLocal,
    TerraClassic,
}

impl LcdNetwork {
    pub fn as_str(self) -> &'static str {
        match self {
            LcdNetwork::XplaMainnet => "xpla-mainnet",
            LcdNetwork::XplaTestnet => "xpla-testnet",
            LcdNetwork::XplaLocal => "xpla-local",
            LcdNetwork::TerraClassic => "terra-classic",
        }
    }

    pub fn all() -> [LcdNetwork; 4] {
        [
            LcdNetwork::XplaMainnet,
            LcdNetwork::XplaTestnet,
            LcdNetwork::XplaLocal,
            LcdNetwork::TerraClassic,
        ]
    }

    /// Configuration for connecting to this network.
    pub fn builder(self) -> LcdBuilder {
        match self {
            LcdNetwork::XplaMainnet => {
                xpla_builder("https://dimension-lcd.xpla.dev", "dimension_37-1")
            }
            LcdNetwork::XplaTestnet => xpla_builder("https://cube-lcd.xpla.dev", "cube_47-5"),
            LcdNetwork::XplaLocal => {
                let mut builder = xpla_builder("http://localhost:1317", "localxpla");
                // fail faster during testing
                builder.set_broadcast_timeout(Some(std::time::Duration::from_secs(10)));
                builder
            }
            LcdNetwork::TerraClassic => {
                let mut builder =
                    LcdBuilder::new("https://terra-classic-lcd.publicnode.com", "columbus-5");
                builder.set_is_classic(true);
                builder.set_gas_prices(Some(DecCoins::single("uluna", Decimal::new(28325, 3))));
                builder.set_fee_denoms(Some(vec!["uluna".to_owned()]));
                builder
            }
        }
    }
}

fn xpla_builder(url: &str, chain_id: &str) -> LcdBuilder {
    let mut builder = LcdBuilder::new(url, chain_id);
    builder.set_gas_prices(Some(DecCoins::single(
        "axpla",
        Decimal::from(850_000_000_000u64),
    )));
    builder
}

impl Display for LcdNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LcdNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LcdNetwork::all()
            .into_iter()
            .find(|network| network.as_str() == s)
            .ok_or_else(|| format!("Unknown network: {s}"))
    }
}

impl serde::Serialize for LcdNetwork {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for LcdNetwork {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(LcdNetworkVisitor)
    }
}

struct LcdNetworkVisitor;

impl<'de> Visitor<'de> for LcdNetworkVisitor {
    type Value = LcdNetwork;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("LcdNetwork")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        LcdNetwork::from_str(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for network in LcdNetwork::all() {
            assert_eq!(network.as_str().parse::<LcdNetwork>(), Ok(network));
            let json = serde_json::to_string(&network).unwrap();
            assert_eq!(serde_json::from_str::<LcdNetwork>(&json).unwrap(), network);
        }
        assert!("juno-mainnet".parse::<LcdNetwork>().is_err());
    }

    #[test]
    fn presets() {
        let testnet = LcdNetwork::XplaTestnet.builder();
        assert_eq!(testnet.chain_id(), "cube_47-5");
        assert!(!testnet.is_classic());
        assert_eq!(testnet.fee_denoms(), ["axpla".to_owned()]);

        let classic = LcdNetwork::TerraClassic.builder();
        assert!(classic.is_classic());
        assert_eq!(
            classic.gas_prices().and_then(|prices| prices.get("uluna")),
            Some(Decimal::new(28325, 3))
        );
    }
}

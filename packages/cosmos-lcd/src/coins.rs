//! Multi-denomination amounts: integer [Coins] for fees and transfers, and
//! decimal [DecCoins] for gas prices.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use cosmos_sdk_proto::cosmos::base::v1beta1::Coin as ProtoCoin;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};

use crate::error::CoinError;

/// A single integer amount of one denomination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "crate::wire::int_string")]
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Coin {
            denom: denom.into(),
            amount,
        }
    }

    pub fn to_proto(&self) -> ProtoCoin {
        ProtoCoin {
            denom: self.denom.clone(),
            amount: self.amount.to_string(),
        }
    }

    pub fn from_proto(ProtoCoin { denom, amount }: &ProtoCoin) -> Result<Self, CoinError> {
        let parsed = amount.parse().map_err(|e| CoinError::Parse {
            input: format!("{amount}{denom}"),
            message: format!("{e}"),
        })?;
        Ok(Coin::new(denom.clone(), parsed))
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of integer amounts, at most one per denomination.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coins(BTreeMap<String, u128>);

impl Coins {
    /// An empty set of coins.
    pub fn new() -> Self {
        Coins::default()
    }

    /// A single coin.
    pub fn single(denom: impl Into<String>, amount: u128) -> Self {
        let mut coins = Coins::new();
        coins.0.insert(denom.into(), amount);
        coins
    }

    /// Insert a new denomination, failing if it is already present.
    pub fn insert(&mut self, denom: impl Into<String>, amount: u128) -> Result<(), CoinError> {
        let denom = denom.into();
        if self.0.contains_key(&denom) {
            return Err(CoinError::DuplicateDenom { denom });
        }
        self.0.insert(denom, amount);
        Ok(())
    }

    /// Add to the amount of a denomination, creating it if missing.
    pub fn add(&mut self, denom: impl Into<String>, amount: u128) -> Result<(), CoinError> {
        let denom = denom.into();
        let entry = self.0.entry(denom.clone()).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or(CoinError::Overflow { denom })?;
        Ok(())
    }

    pub fn get(&self, denom: &str) -> Option<u128> {
        self.0.get(denom).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in denomination order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u128)> {
        self.0.iter().map(|(denom, amount)| (denom.as_str(), *amount))
    }

    pub fn to_proto(&self) -> Vec<ProtoCoin> {
        self.iter()
            .map(|(denom, amount)| ProtoCoin {
                denom: denom.to_owned(),
                amount: amount.to_string(),
            })
            .collect()
    }

    pub fn from_proto(coins: &[ProtoCoin]) -> Result<Self, CoinError> {
        let mut res = Coins::new();
        for coin in coins {
            let Coin { denom, amount } = Coin::from_proto(coin)?;
            res.insert(denom, amount)?;
        }
        Ok(res)
    }
}

impl FromIterator<(String, u128)> for Coins {
    /// Later duplicates replace earlier ones.
    fn from_iter<T: IntoIterator<Item = (String, u128)>>(iter: T) -> Self {
        Coins(iter.into_iter().collect())
    }
}

impl Display for Coins {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (idx, (denom, amount)) in self.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{amount}{denom}")?;
        }
        Ok(())
    }
}

impl FromStr for Coins {
    type Err = CoinError;

    /// Parses `100axpla,5uatom`. An empty string is an empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut coins = Coins::new();
        for (amount, denom) in split_coins(s)? {
            let amount = amount.parse().map_err(|e| CoinError::Parse {
                input: s.to_owned(),
                message: format!("{e}"),
            })?;
            coins.insert(denom, amount)?;
        }
        Ok(coins)
    }
}

impl Serialize for Coins {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter().map(|(denom, amount)| Coin::new(denom, amount)))
    }
}

impl<'de> Deserialize<'de> for Coins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut coins = Coins::new();
        for Coin { denom, amount } in Vec::<Coin>::deserialize(deserializer)? {
            coins
                .insert(denom, amount)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(coins)
    }
}

/// Decimal amounts per denomination, used for gas prices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecCoins(BTreeMap<String, Decimal>);

impl DecCoins {
    pub fn new() -> Self {
        DecCoins::default()
    }

    pub fn single(denom: impl Into<String>, amount: Decimal) -> Self {
        DecCoins([(denom.into(), amount)].into_iter().collect())
    }

    pub fn get(&self, denom: &str) -> Option<Decimal> {
        self.0.get(denom).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(denom, amount)| (denom.as_str(), *amount))
    }

    /// Keep only the given denominations.
    ///
    /// If none of our denominations are in the list, the original set is
    /// returned unchanged, so filtering can never throw away every price.
    pub fn filter_denoms(&self, denoms: &[String]) -> DecCoins {
        if denoms.is_empty() {
            return self.clone();
        }
        let filtered: BTreeMap<_, _> = self
            .0
            .iter()
            .filter(|(denom, _)| denoms.contains(denom))
            .map(|(denom, amount)| (denom.clone(), *amount))
            .collect();
        if filtered.is_empty() {
            log::warn!(
                "None of the gas prices {self} match fee denominations {denoms:?}, using all gas prices"
            );
            self.clone()
        } else {
            DecCoins(filtered)
        }
    }

    /// Multiply each price by the given gas, rounding every amount up.
    pub fn mul_ceil(&self, gas: u64) -> Result<Coins, CoinError> {
        let gas = Decimal::from(gas);
        let mut coins = Coins::new();
        for (denom, price) in self.iter() {
            let amount = price
                .checked_mul(gas)
                .map(|x| x.ceil())
                .and_then(|x| x.to_u128())
                .ok_or_else(|| CoinError::Overflow {
                    denom: denom.to_owned(),
                })?;
            coins.insert(denom, amount)?;
        }
        Ok(coins)
    }
}

impl Display for DecCoins {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (idx, (denom, amount)) in self.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{amount}{denom}")?;
        }
        Ok(())
    }
}

impl FromStr for DecCoins {
    type Err = CoinError;

    /// Parses `0.15axpla,0.01uatom`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut coins = BTreeMap::new();
        for (amount, denom) in split_coins(s)? {
            let amount = Decimal::from_str(amount).map_err(|e| CoinError::Parse {
                input: s.to_owned(),
                message: format!("{e}"),
            })?;
            if amount.is_sign_negative() {
                return Err(CoinError::Parse {
                    input: s.to_owned(),
                    message: "Amounts must not be negative".to_owned(),
                });
            }
            if coins.insert(denom.to_owned(), amount).is_some() {
                return Err(CoinError::DuplicateDenom {
                    denom: denom.to_owned(),
                });
            }
        }
        Ok(DecCoins(coins))
    }
}

impl<'de> Deserialize<'de> for DecCoins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

impl Serialize for DecCoins {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Split `100axpla,5uatom` into `(amount, denom)` pairs.
fn split_coins(s: &str) -> Result<Vec<(&str, &str)>, CoinError> {
    let err = |message: &str| CoinError::Parse {
        input: s.to_owned(),
        message: message.to_owned(),
    };
    let mut res = vec![];
    for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let idx = part
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(|| err("Missing denomination"))?;
        let (amount, denom) = part.split_at(idx);
        if amount.is_empty() {
            return Err(err("Must not have an empty amount"));
        }
        if !denom
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'/' || b == b'-' || b == b'_')
        {
            return Err(err("Invalid characters in denomination"));
        }
        res.push((amount, denom));
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use quickcheck::Arbitrary;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_coins() {
        let coins: Coins = "100axpla,5uatom".parse().unwrap();
        assert_eq!(coins.get("axpla"), Some(100));
        assert_eq!(coins.get("uatom"), Some(5));
        assert_eq!(coins.to_string(), "100axpla,5uatom");
        assert!("".parse::<Coins>().unwrap().is_empty());
        "1.5axpla".parse::<Coins>().unwrap_err();
        "axpla".parse::<Coins>().unwrap_err();
        "5".parse::<Coins>().unwrap_err();
        assert_eq!(
            "1axpla,2axpla".parse::<Coins>().unwrap_err(),
            CoinError::DuplicateDenom {
                denom: "axpla".to_owned()
            }
        );
    }

    #[test]
    fn fee_rounding_never_undercharges() {
        let prices: DecCoins = "0.15axpla".parse().unwrap();
        assert_eq!(prices.mul_ceil(1000).unwrap(), Coins::single("axpla", 150));
        assert_eq!(prices.mul_ceil(1001).unwrap(), Coins::single("axpla", 151));
        let prices = DecCoins::single("uatom", dec!(0.0001));
        assert_eq!(prices.mul_ceil(1).unwrap(), Coins::single("uatom", 1));
        assert_eq!(prices.mul_ceil(0).unwrap(), Coins::single("uatom", 0));
    }

    #[test]
    fn filter_never_discards_everything() {
        let prices: DecCoins = "0.15axpla,0.01uatom".parse().unwrap();
        let only_xpla = prices.filter_denoms(&["axpla".to_owned()]);
        assert_eq!(only_xpla, DecCoins::single("axpla", dec!(0.15)));
        assert_eq!(prices.filter_denoms(&["uluna".to_owned()]), prices);
        assert_eq!(prices.filter_denoms(&[]), prices);
    }

    #[test]
    fn json_form() {
        let coins: Coins =
            serde_json::from_str(r#"[{"denom":"axpla","amount":"8102024952"}]"#).unwrap();
        assert_eq!(coins, Coins::single("axpla", 8102024952));
        assert_eq!(
            serde_json::to_value(&coins).unwrap(),
            serde_json::json!([{"denom": "axpla", "amount": "8102024952"}])
        );
        serde_json::from_str::<Coins>(
            r#"[{"denom":"axpla","amount":"1"},{"denom":"axpla","amount":"2"}]"#,
        )
        .unwrap_err();
    }

    #[derive(Clone, Debug)]
    struct DenomString(String);

    impl Arbitrary for DenomString {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let sizes = (3..20).collect::<Vec<_>>();
            let letters = ('a'..='z').collect::<Vec<_>>();
            DenomString(
                (1..*g.choose(&sizes).unwrap())
                    .map(|_| *g.choose(&letters).unwrap())
                    .collect(),
            )
        }
    }

    quickcheck::quickcheck! {
        fn parse_display(amount: u128, denom: DenomString) -> bool {
            let coins = Coins::single(denom.0, amount);
            coins.to_string().parse::<Coins>().unwrap() == coins
        }

        fn ceiling_covers_exact_product(micro_price: u32, gas: u32) -> bool {
            let price = Decimal::new(micro_price.into(), 6);
            let prices = DecCoins::single("axpla", price);
            let fee = prices.mul_ceil(gas.into()).unwrap().get("axpla").unwrap();
            let exact = price * Decimal::from(gas);
            Decimal::from(fee) >= exact && Decimal::from(fee) - exact < Decimal::ONE
        }
    }
}

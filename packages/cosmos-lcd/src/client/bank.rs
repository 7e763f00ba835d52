use serde::Deserialize;

use crate::{error::Action, Coins, Pagination, Result};

use super::{parse_body, LcdClient, Params};

/// Whether transfers of one denomination are enabled.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SendEnabled {
    pub denom: String,
    pub enabled: bool,
}

/// Parameters of the bank module.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BankParams {
    /// Per-denomination overrides of [Self::default_send_enabled].
    #[serde(default)]
    pub send_enabled: Vec<SendEnabled>,
    pub default_send_enabled: bool,
}

#[derive(Deserialize)]
struct BalancesResponse {
    balances: Coins,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct SupplyResponse {
    supply: Coins,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct ParamsResponse {
    params: BankParams,
}

impl LcdClient {
    /// Balances of an account, one page at a time.
    ///
    /// `params` is passed through, e.g. `pagination.key`.
    pub async fn balance(&self, address: &str, params: &Params) -> Result<(Coins, Pagination)> {
        let action = Action::GetBalance(address.to_owned());
        let path = format!("cosmos/bank/v1beta1/balances/{address}");
        let body = self
            .get_for_address(action.clone(), address, &path, params)
            .await?;
        let res: BalancesResponse = parse_body(action, body)?;
        Ok((res.balances, res.pagination.unwrap_or_default()))
    }

    /// Total supply of every denomination.
    pub async fn total(&self, params: &Params) -> Result<(Coins, Pagination)> {
        let body = self
            .get(Action::GetSupply, "cosmos/bank/v1beta1/supply", params)
            .await?;
        let res: SupplyResponse = parse_body(Action::GetSupply, body)?;
        Ok((res.supply, res.pagination.unwrap_or_default()))
    }

    pub async fn bank_parameters(&self) -> Result<BankParams> {
        let body = self
            .get(Action::GetBankParams, "cosmos/bank/v1beta1/params", &[])
            .await?;
        let res: ParamsResponse = parse_body(Action::GetBankParams, body)?;
        Ok(res.params)
    }
}

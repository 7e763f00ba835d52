use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    error::Action,
    wire::{decimal_string, duration_string, int_string},
    Coin, Error, Pagination, Result,
};

use super::{parse_body, LcdClient, Params};

/// Parameters of the staking module.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StakingParams {
    #[serde(with = "duration_string")]
    pub unbonding_time: Duration,
    #[serde(with = "int_string")]
    pub max_validators: u32,
    #[serde(with = "int_string")]
    pub max_entries: u32,
    #[serde(with = "int_string")]
    pub historical_entries: u32,
    pub bond_denom: String,
}

/// Tokens bonded to validators and tokens that are not.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StakingPool {
    #[serde(with = "int_string")]
    pub bonded_tokens: u128,
    #[serde(with = "int_string")]
    pub not_bonded_tokens: u128,
}

/// Stake of one delegator with one validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delegation {
    pub delegator_address: String,
    pub validator_address: String,
    pub shares: Decimal,
    /// Tokens the shares are currently worth.
    pub balance: Coin,
}

#[derive(Deserialize)]
struct DelegationData {
    delegator_address: String,
    validator_address: String,
    #[serde(with = "decimal_string")]
    shares: Decimal,
}

#[derive(Deserialize)]
struct DelegationResponse {
    delegation: DelegationData,
    balance: Coin,
}

impl From<DelegationResponse> for Delegation {
    fn from(DelegationResponse { delegation, balance }: DelegationResponse) -> Self {
        Delegation {
            delegator_address: delegation.delegator_address,
            validator_address: delegation.validator_address,
            shares: delegation.shares,
            balance,
        }
    }
}

#[derive(Deserialize)]
struct DelegationsResponse {
    delegation_responses: Vec<DelegationResponse>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct SingleDelegationResponse {
    delegation_response: DelegationResponse,
}

#[derive(Deserialize)]
struct ParamsResponse {
    params: StakingParams,
}

#[derive(Deserialize)]
struct PoolResponse {
    pool: StakingPool,
}

impl LcdClient {
    pub async fn staking_parameters(&self) -> Result<StakingParams> {
        let body = self
            .get(Action::GetStakingParams, "cosmos/staking/v1beta1/params", &[])
            .await?;
        let res: ParamsResponse = parse_body(Action::GetStakingParams, body)?;
        Ok(res.params)
    }

    pub async fn staking_pool(&self) -> Result<StakingPool> {
        let body = self
            .get(Action::GetStakingPool, "cosmos/staking/v1beta1/pool", &[])
            .await?;
        let res: PoolResponse = parse_body(Action::GetStakingPool, body)?;
        Ok(res.pool)
    }

    /// Delegations of a delegator, to a validator, or between the two.
    ///
    /// At least one of the addresses is required. With both, the result holds
    /// the single matching delegation and an empty pagination.
    pub async fn delegations(
        &self,
        delegator: Option<&str>,
        validator: Option<&str>,
        params: &Params,
    ) -> Result<(Vec<Delegation>, Pagination)> {
        let action = Action::GetDelegations {
            delegator: delegator.map(ToOwned::to_owned),
            validator: validator.map(ToOwned::to_owned),
        };
        match (delegator, validator) {
            (Some(delegator), Some(validator)) => {
                let path = format!(
                    "cosmos/staking/v1beta1/validators/{validator}/delegations/{delegator}"
                );
                let body = self
                    .get_for_address(action.clone(), delegator, &path, params)
                    .await?;
                let res: SingleDelegationResponse = parse_body(action, body)?;
                Ok((vec![res.delegation_response.into()], Pagination::default()))
            }
            (Some(address), None) | (None, Some(address)) => {
                let path = match delegator {
                    Some(_) => format!("cosmos/staking/v1beta1/delegations/{address}"),
                    None => format!("cosmos/staking/v1beta1/validators/{address}/delegations"),
                };
                let body = self
                    .get_for_address(action.clone(), address, &path, params)
                    .await?;
                let res: DelegationsResponse = parse_body(action, body)?;
                Ok((
                    res.delegation_responses
                        .into_iter()
                        .map(Delegation::from)
                        .collect(),
                    res.pagination.unwrap_or_default(),
                ))
            }
            (None, None) => Err(Error::validation(
                "Delegations require a delegator or validator address",
            )),
        }
    }
}

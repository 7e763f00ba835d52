use cosmos_sdk_proto::cosmos::staking::v1beta1::{
    MsgDelegate as ProtoMsgDelegate, MsgUndelegate as ProtoMsgUndelegate,
};
use serde::{Deserialize, Serialize};

use crate::{coins::Coin, error::CodecError};

use super::MsgCodec;

/// Delegate coins to a validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDelegate {
    pub delegator_address: String,
    pub validator_address: String,
    pub amount: Coin,
}

/// Begin unbonding coins from a validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUndelegate {
    pub delegator_address: String,
    pub validator_address: String,
    pub amount: Coin,
}

fn amount_from_proto(
    type_name: &'static str,
    amount: Option<cosmos_sdk_proto::cosmos::base::v1beta1::Coin>,
) -> Result<Coin, CodecError> {
    let amount =
        amount.ok_or_else(|| CodecError::invalid_field(type_name, "amount", "missing"))?;
    Coin::from_proto(&amount).map_err(|e| CodecError::invalid_field(type_name, "amount", e))
}

impl MsgCodec for MsgDelegate {
    const TYPE_NAME: &'static str = "MsgDelegate";
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgDelegate";
    type Proto = ProtoMsgDelegate;

    fn amino_type(is_classic: bool) -> Option<&'static str> {
        Some(if is_classic {
            "staking/MsgDelegate"
        } else {
            "cosmos-sdk/MsgDelegate"
        })
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(ProtoMsgDelegate {
            delegator_address: self.delegator_address.clone(),
            validator_address: self.validator_address.clone(),
            amount: Some(self.amount.to_proto()),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgDelegate {
            amount: amount_from_proto(Self::TYPE_NAME, proto.amount)?,
            delegator_address: proto.delegator_address,
            validator_address: proto.validator_address,
        })
    }
}

impl MsgCodec for MsgUndelegate {
    const TYPE_NAME: &'static str = "MsgUndelegate";
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgUndelegate";
    type Proto = ProtoMsgUndelegate;

    fn amino_type(is_classic: bool) -> Option<&'static str> {
        Some(if is_classic {
            "staking/MsgUndelegate"
        } else {
            "cosmos-sdk/MsgUndelegate"
        })
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(ProtoMsgUndelegate {
            delegator_address: self.delegator_address.clone(),
            validator_address: self.validator_address.clone(),
            amount: Some(self.amount.to_proto()),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgUndelegate {
            amount: amount_from_proto(Self::TYPE_NAME, proto.amount)?,
            delegator_address: proto.delegator_address,
            validator_address: proto.validator_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn undelegate() -> MsgUndelegate {
        MsgUndelegate {
            delegator_address: "xpla1dcegyrekltswvyy0xy69ydgxn9x8x32zdtapd8".to_owned(),
            validator_address: "xplavaloper1gtw2uxdkdt3tvq790ckjz8jm8qgwkdw3uptstn".to_owned(),
            amount: Coin::new("axpla", 104_784_006),
        }
    }

    #[test]
    fn undelegate_amino_tags() {
        let value = json!({
            "delegator_address": "xpla1dcegyrekltswvyy0xy69ydgxn9x8x32zdtapd8",
            "validator_address": "xplavaloper1gtw2uxdkdt3tvq790ckjz8jm8qgwkdw3uptstn",
            "amount": {"denom": "axpla", "amount": "104784006"}
        });
        for (is_classic, tag) in [
            (true, "staking/MsgUndelegate"),
            (false, "cosmos-sdk/MsgUndelegate"),
        ] {
            let amino = json!({"type": tag, "value": value});
            assert_eq!(undelegate().to_amino(is_classic).unwrap(), amino);
            assert_eq!(MsgUndelegate::from_amino(amino, is_classic).unwrap(), undelegate());
        }
        let classic = undelegate().to_amino(true).unwrap();
        assert!(matches!(
            MsgUndelegate::from_amino(classic, false).unwrap_err(),
            CodecError::WrongType { .. }
        ));
    }

    #[test]
    fn undelegate_data_and_proto() {
        for is_classic in [true, false] {
            let data = undelegate().to_data(is_classic).unwrap();
            assert_eq!(data["@type"], "/cosmos.staking.v1beta1.MsgUndelegate");
            assert_eq!(MsgUndelegate::from_data(data, is_classic).unwrap(), undelegate());
            let any = undelegate().pack_any(is_classic).unwrap();
            assert_eq!(any.type_url, "/cosmos.staking.v1beta1.MsgUndelegate");
            assert_eq!(MsgUndelegate::unpack_any(&any, is_classic).unwrap(), undelegate());
        }
    }

    #[test]
    fn missing_amount_rejected() {
        let proto = ProtoMsgUndelegate {
            delegator_address: "xpla1delegator".to_owned(),
            validator_address: "xplavaloper1validator".to_owned(),
            amount: None,
        };
        assert!(matches!(
            MsgUndelegate::from_proto(proto, false).unwrap_err(),
            CodecError::InvalidField { field: "amount", .. }
        ));
        let delegate = ProtoMsgDelegate::default();
        assert!(MsgDelegate::from_proto(delegate, true).is_err());
    }
}

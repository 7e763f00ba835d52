use cosmos_sdk_proto::cosmos::bank::v1beta1::MsgSend as ProtoMsgSend;
use serde::{Deserialize, Serialize};

use crate::{coins::Coins, error::CodecError};

use super::MsgCodec;

/// Transfer coins from one account to another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Coins,
}

impl MsgCodec for MsgSend {
    const TYPE_NAME: &'static str = "MsgSend";
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSend";
    type Proto = ProtoMsgSend;

    fn amino_type(is_classic: bool) -> Option<&'static str> {
        Some(if is_classic {
            "bank/MsgSend"
        } else {
            "cosmos-sdk/MsgSend"
        })
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(ProtoMsgSend {
            from_address: self.from_address.clone(),
            to_address: self.to_address.clone(),
            amount: self.amount.to_proto(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgSend {
            amount: Coins::from_proto(&proto.amount)
                .map_err(|e| CodecError::invalid_field(Self::TYPE_NAME, "amount", e))?,
            from_address: proto.from_address,
            to_address: proto.to_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn msg() -> MsgSend {
        MsgSend {
            from_address: "xpla1dcegyrekltswvyy0xy69ydgxn9x8x32zdtapd8".to_owned(),
            to_address: "xpla1k2ncgpj9w8s9txhfrhvp5nf5dfc9zsmsk7wusm".to_owned(),
            amount: "8102024952axpla".parse().unwrap(),
        }
    }

    #[test]
    fn amino_form() {
        let amino = json!({
            "type": "cosmos-sdk/MsgSend",
            "value": {
                "from_address": "xpla1dcegyrekltswvyy0xy69ydgxn9x8x32zdtapd8",
                "to_address": "xpla1k2ncgpj9w8s9txhfrhvp5nf5dfc9zsmsk7wusm",
                "amount": [{"denom": "axpla", "amount": "8102024952"}]
            }
        });
        assert_eq!(MsgSend::from_amino(amino.clone(), false).unwrap(), msg());
        assert_eq!(msg().to_amino(false).unwrap(), amino);
    }

    #[test]
    fn data_form() {
        let data = json!({
            "@type": "/cosmos.bank.v1beta1.MsgSend",
            "from_address": "xpla1dcegyrekltswvyy0xy69ydgxn9x8x32zdtapd8",
            "to_address": "xpla1k2ncgpj9w8s9txhfrhvp5nf5dfc9zsmsk7wusm",
            "amount": [{"denom": "axpla", "amount": "8102024952"}]
        });
        assert_eq!(MsgSend::from_data(data.clone(), true).unwrap(), msg());
        assert_eq!(msg().to_data(true).unwrap(), data);
    }

    #[test]
    fn wrong_type_rejected() {
        let amino = msg().to_amino(true).unwrap();
        let err = MsgSend::from_amino(amino, false).unwrap_err();
        assert!(matches!(err, CodecError::WrongType { .. }));
    }
}

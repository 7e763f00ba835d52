use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    MsgExecuteContract as ProtoMsgExecuteContract,
    MsgInstantiateContract as ProtoMsgInstantiateContract,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    coins::Coins,
    error::{CodecError, Representation},
    wire::int_string,
};

use super::{serde_helpers, to_json, MsgCodec};

/// Instantiate a contract from uploaded code.
///
/// An absent admin is written as `""` in the Data and Proto forms and left
/// out entirely in Amino.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgInstantiateContract {
    pub sender: String,
    #[serde(default, with = "serde_helpers::empty_as_none")]
    pub admin: Option<String>,
    #[serde(with = "int_string")]
    pub code_id: u64,
    pub label: String,
    /// Instantiate message, stored as serialized JSON in protobuf.
    pub msg: Value,
    pub funds: Coins,
}

impl MsgCodec for MsgInstantiateContract {
    const TYPE_NAME: &'static str = "MsgInstantiateContract";
    const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgInstantiateContract";
    type Proto = ProtoMsgInstantiateContract;

    fn amino_type(_is_classic: bool) -> Option<&'static str> {
        Some("wasm/MsgInstantiateContract")
    }

    fn amino_value(&self, _is_classic: bool) -> Result<Value, CodecError> {
        let mut value = to_json(self, Self::TYPE_NAME, Representation::Amino)?;
        if self.admin.is_none() {
            if let Some(fields) = value.as_object_mut() {
                fields.remove("admin");
            }
        }
        Ok(value)
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(ProtoMsgInstantiateContract {
            sender: self.sender.clone(),
            admin: self.admin.clone().unwrap_or_default(),
            code_id: self.code_id,
            label: self.label.clone(),
            msg: contract_msg_bytes(Self::TYPE_NAME, &self.msg)?,
            funds: self.funds.to_proto(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgInstantiateContract {
            msg: contract_msg_json(Self::TYPE_NAME, &proto.msg)?,
            funds: Coins::from_proto(&proto.funds)
                .map_err(|e| CodecError::invalid_field(Self::TYPE_NAME, "funds", e))?,
            sender: proto.sender,
            admin: serde_helpers::none_if_empty(proto.admin),
            code_id: proto.code_id,
            label: proto.label,
        })
    }
}

/// Execute a message on an instantiated contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExecuteContract {
    pub sender: String,
    pub contract: String,
    pub msg: Value,
    pub funds: Coins,
}

impl MsgCodec for MsgExecuteContract {
    const TYPE_NAME: &'static str = "MsgExecuteContract";
    const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgExecuteContract";
    type Proto = ProtoMsgExecuteContract;

    fn amino_type(_is_classic: bool) -> Option<&'static str> {
        Some("wasm/MsgExecuteContract")
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(ProtoMsgExecuteContract {
            sender: self.sender.clone(),
            contract: self.contract.clone(),
            msg: contract_msg_bytes(Self::TYPE_NAME, &self.msg)?,
            funds: self.funds.to_proto(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgExecuteContract {
            msg: contract_msg_json(Self::TYPE_NAME, &proto.msg)?,
            funds: Coins::from_proto(&proto.funds)
                .map_err(|e| CodecError::invalid_field(Self::TYPE_NAME, "funds", e))?,
            sender: proto.sender,
            contract: proto.contract,
        })
    }
}

/// A string message is serialized as a JSON string, like any other value.
fn contract_msg_bytes(type_name: &'static str, msg: &Value) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(msg).map_err(|e| CodecError::invalid_field(type_name, "msg", e))
}

fn contract_msg_json(type_name: &'static str, bytes: &[u8]) -> Result<Value, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::invalid_field(type_name, "msg", e))
}

#[cfg(test)]
mod tests {
    use prost::Message;
    use serde_json::json;

    use super::*;

    fn instantiate(admin: Option<&str>, msg: Value) -> MsgInstantiateContract {
        MsgInstantiateContract {
            sender: "xpla1sender".to_owned(),
            admin: admin.map(ToOwned::to_owned),
            code_id: 1234,
            label: "init".to_owned(),
            msg,
            funds: "1234axpla".parse().unwrap(),
        }
    }

    #[test]
    fn absent_admin_per_form() {
        let msg = instantiate(None, json!({"some": "value"}));
        let amino = msg.to_amino(false).unwrap();
        assert_eq!(amino["type"], "wasm/MsgInstantiateContract");
        assert!(amino["value"].get("admin").is_none());
        assert_eq!(amino["value"]["code_id"], "1234");
        let data = msg.to_data(false).unwrap();
        assert_eq!(data["admin"], "");
        assert_eq!(msg.to_proto(false).unwrap().admin, "");
        assert_eq!(MsgInstantiateContract::from_amino(amino, false).unwrap(), msg);
        assert_eq!(MsgInstantiateContract::from_data(data, false).unwrap(), msg);
    }

    #[test]
    fn admin_present_in_every_form() {
        let msg = instantiate(Some("xpla1admin"), json!({"some": "value"}));
        assert_eq!(msg.to_amino(true).unwrap()["value"]["admin"], "xpla1admin");
        assert_eq!(msg.to_data(true).unwrap()["admin"], "xpla1admin");
        let any = msg.pack_any(true).unwrap();
        assert_eq!(MsgInstantiateContract::unpack_any(&any, true).unwrap(), msg);
    }

    #[test]
    fn string_message_is_json_encoded_in_proto() {
        let msg = instantiate(None, json!("plain string"));
        let proto = msg.to_proto(false).unwrap();
        assert_eq!(proto.msg, br#""plain string""#.to_vec());
        let bytes = proto.encode_to_vec();
        let decoded = ProtoMsgInstantiateContract::decode(bytes.as_slice()).unwrap();
        assert_eq!(
            MsgInstantiateContract::from_proto(decoded, false).unwrap(),
            msg
        );
    }

    #[test]
    fn execute_round_trip() {
        let msg = MsgExecuteContract {
            sender: "xpla1sender".to_owned(),
            contract: "xpla1contract".to_owned(),
            msg: json!({"transfer": {"amount": "1", "recipient": "xpla1r"}}),
            funds: Coins::new(),
        };
        let any = msg.pack_any(false).unwrap();
        assert_eq!(any.type_url, "/cosmwasm.wasm.v1.MsgExecuteContract");
        assert_eq!(MsgExecuteContract::unpack_any(&any, false).unwrap(), msg);
        let amino = msg.to_amino(true).unwrap();
        assert_eq!(MsgExecuteContract::from_amino(amino, true).unwrap(), msg);
    }
}

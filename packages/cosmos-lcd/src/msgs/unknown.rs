use cosmos_sdk_proto::Any;
use serde_json::Value;

use crate::error::{CodecError, Representation};

/// A message of a type this crate has no codec for, such as
/// `/ethermint.evm.v1.MsgEthereumTx`.
///
/// Only produced while reading transactions back from the chain. The message
/// is kept exactly as it was read and can be written out again in that same
/// representation. Converting to any other representation fails.
#[derive(Clone, Debug, PartialEq)]
pub enum UnknownMsg {
    /// Data JSON, including the `@type` field.
    Data(Value),
    /// Packed protobuf.
    Proto(Any),
}

impl UnknownMsg {
    pub fn type_url(&self) -> &str {
        match self {
            UnknownMsg::Data(json) => json.get("@type").and_then(Value::as_str).unwrap_or_default(),
            UnknownMsg::Proto(any) => &any.type_url,
        }
    }

    fn opaque(&self, representation: Representation) -> CodecError {
        CodecError::Opaque {
            type_url: self.type_url().to_owned(),
            representation,
        }
    }

    pub fn to_amino(&self) -> Result<Value, CodecError> {
        Err(self.opaque(Representation::Amino))
    }

    pub fn to_data(&self) -> Result<Value, CodecError> {
        match self {
            UnknownMsg::Data(json) => Ok(json.clone()),
            UnknownMsg::Proto(_) => Err(self.opaque(Representation::Data)),
        }
    }

    pub fn pack_any(&self) -> Result<Any, CodecError> {
        match self {
            UnknownMsg::Proto(any) => Ok(any.clone()),
            UnknownMsg::Data(_) => Err(self.opaque(Representation::Proto)),
        }
    }
}

//! Transaction messages and their three wire representations.
//!
//! Every message converts to and from:
//!
//! * Amino: legacy `{"type": ..., "value": ...}` JSON, whose type tags depend
//!   on whether the chain uses the classic namespaces
//! * Data: JSON with an `@type` field holding the protobuf type URL
//! * Proto: binary protobuf, packed into an `Any` inside a transaction body
//!
//! The [Msg] and [Proposal] enums dispatch over all supported types, using
//! registries keyed by type URL and Amino tag.

use std::collections::HashMap;

use cosmos_sdk_proto::Any;
use once_cell::sync::Lazy;
use prost::Message;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{CodecError, Representation};

mod bank;
mod evm;
mod gov;
pub mod ibc;
mod staking;
mod unknown;
mod wasm;

pub use bank::MsgSend;
pub use evm::EvmMessage;
pub use gov::{MsgDeposit, MsgSubmitProposal, MsgVote, TextProposal, VoteOption};
pub use ibc::{
    ClientUpdateProposal, MsgChannelCloseConfirm, MsgChannelCloseInit, MsgConnectionOpenInit,
    MsgTimeout, MsgTimeoutOnClose,
};
pub use staking::{MsgDelegate, MsgUndelegate};
pub use unknown::UnknownMsg;
pub use wasm::{MsgExecuteContract, MsgInstantiateContract};

/// Conversion between a message and its wire representations.
///
/// Implementors provide the type tags and the protobuf mapping. The JSON forms
/// default to the serde representation of the type, which uses the LCD field
/// names, and can be overridden where Amino and Data differ.
pub trait MsgCodec: Serialize + DeserializeOwned + Sized {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;
    /// Protobuf type URL, also used as the Data `@type`.
    const TYPE_URL: &'static str;
    type Proto: Message + Default;

    /// Amino type tag, or [None] if there is no Amino form.
    fn amino_type(is_classic: bool) -> Option<&'static str>;

    fn to_proto(&self, is_classic: bool) -> Result<Self::Proto, CodecError>;

    fn from_proto(proto: Self::Proto, is_classic: bool) -> Result<Self, CodecError>;

    /// Contents of the Amino `value` field.
    fn amino_value(&self, _is_classic: bool) -> Result<Value, CodecError> {
        to_json(self, Self::TYPE_NAME, Representation::Amino)
    }

    fn from_amino_value(value: Value, _is_classic: bool) -> Result<Self, CodecError> {
        from_json(value, Self::TYPE_NAME, Representation::Amino)
    }

    /// Data fields, without the `@type` tag.
    fn data_value(&self, _is_classic: bool) -> Result<Value, CodecError> {
        to_json(self, Self::TYPE_NAME, Representation::Data)
    }

    fn from_data_value(value: Value, _is_classic: bool) -> Result<Self, CodecError> {
        from_json(value, Self::TYPE_NAME, Representation::Data)
    }

    fn to_amino(&self, is_classic: bool) -> Result<Value, CodecError> {
        let tag = Self::amino_type(is_classic)
            .ok_or_else(|| CodecError::unsupported(Self::TYPE_NAME, Representation::Amino))?;
        Ok(serde_json::json!({
            "type": tag,
            "value": self.amino_value(is_classic)?,
        }))
    }

    fn from_amino(json: Value, is_classic: bool) -> Result<Self, CodecError> {
        let expected = Self::amino_type(is_classic)
            .ok_or_else(|| CodecError::unsupported(Self::TYPE_NAME, Representation::Amino))?;
        let (tag, value) = split_amino(json)?;
        if tag != expected {
            return Err(CodecError::WrongType {
                representation: Representation::Amino,
                expected: expected.to_owned(),
                actual: tag,
            });
        }
        Self::from_amino_value(value, is_classic)
    }

    fn to_data(&self, is_classic: bool) -> Result<Value, CodecError> {
        let fields = match self.data_value(is_classic)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(CodecError::invalid_field(
                    Self::TYPE_NAME,
                    "@type",
                    "Data form must be a JSON object",
                ))
            }
        };
        let mut data = Map::new();
        data.insert("@type".to_owned(), Value::String(Self::TYPE_URL.to_owned()));
        data.extend(fields);
        Ok(Value::Object(data))
    }

    fn from_data(json: Value, is_classic: bool) -> Result<Self, CodecError> {
        let (type_url, fields) = split_data(json)?;
        if type_url != Self::TYPE_URL {
            return Err(CodecError::WrongType {
                representation: Representation::Data,
                expected: Self::TYPE_URL.to_owned(),
                actual: type_url,
            });
        }
        Self::from_data_value(fields, is_classic)
    }

    fn pack_any(&self, is_classic: bool) -> Result<Any, CodecError> {
        Ok(Any {
            type_url: Self::TYPE_URL.to_owned(),
            value: self.to_proto(is_classic)?.encode_to_vec(),
        })
    }

    fn unpack_any(any: &Any, is_classic: bool) -> Result<Self, CodecError> {
        if any.type_url != Self::TYPE_URL {
            return Err(CodecError::WrongType {
                representation: Representation::Proto,
                expected: Self::TYPE_URL.to_owned(),
                actual: any.type_url.clone(),
            });
        }
        let proto = Self::Proto::decode(any.value.as_slice()).map_err(|source| {
            CodecError::Proto {
                type_url: any.type_url.clone(),
                source,
            }
        })?;
        Self::from_proto(proto, is_classic)
    }
}

pub(crate) fn to_json<T: Serialize>(
    value: &T,
    type_name: &'static str,
    representation: Representation,
) -> Result<Value, CodecError> {
    serde_json::to_value(value).map_err(|source| CodecError::Json {
        type_name,
        representation,
        source,
    })
}

pub(crate) fn from_json<T: DeserializeOwned>(
    value: Value,
    type_name: &'static str,
    representation: Representation,
) -> Result<T, CodecError> {
    serde_json::from_value(value).map_err(|source| CodecError::Json {
        type_name,
        representation,
        source,
    })
}

/// Split Amino JSON into its type tag and value.
fn split_amino(json: Value) -> Result<(String, Value), CodecError> {
    let missing = || CodecError::MissingType {
        representation: Representation::Amino,
    };
    let mut fields = match json {
        Value::Object(fields) => fields,
        _ => return Err(missing()),
    };
    let tag = match fields.remove("type") {
        Some(Value::String(tag)) => tag,
        _ => return Err(missing()),
    };
    let value = fields
        .remove("value")
        .unwrap_or_else(|| Value::Object(Map::new()));
    Ok((tag, value))
}

/// Split Data JSON into its type URL and remaining fields.
fn split_data(json: Value) -> Result<(String, Value), CodecError> {
    let missing = || CodecError::MissingType {
        representation: Representation::Data,
    };
    let mut fields = match json {
        Value::Object(fields) => fields,
        _ => return Err(missing()),
    };
    match fields.remove("@type") {
        Some(Value::String(type_url)) => Ok((type_url, Value::Object(fields))),
        _ => Err(missing()),
    }
}

type AnyDecoder<M> = fn(&Any, bool) -> Result<M, CodecError>;
type JsonDecoder<M> = fn(Value, bool) -> Result<M, CodecError>;

/// Reverse dispatch tables for a family of types.
pub(crate) struct Registry<M> {
    any: HashMap<&'static str, AnyDecoder<M>>,
    data: HashMap<&'static str, JsonDecoder<M>>,
    amino_classic: HashMap<&'static str, JsonDecoder<M>>,
    amino: HashMap<&'static str, JsonDecoder<M>>,
}

impl<M> Registry<M> {
    fn new() -> Self {
        Registry {
            any: HashMap::new(),
            data: HashMap::new(),
            amino_classic: HashMap::new(),
            amino: HashMap::new(),
        }
    }

    fn register<T: MsgCodec + Into<M>>(&mut self) -> &mut Self {
        fn any<T: MsgCodec + Into<M>, M>(any: &Any, is_classic: bool) -> Result<M, CodecError> {
            T::unpack_any(any, is_classic).map(Into::into)
        }
        fn data<T: MsgCodec + Into<M>, M>(json: Value, is_classic: bool) -> Result<M, CodecError> {
            T::from_data(json, is_classic).map(Into::into)
        }
        fn amino<T: MsgCodec + Into<M>, M>(json: Value, is_classic: bool) -> Result<M, CodecError> {
            T::from_amino(json, is_classic).map(Into::into)
        }

        self.any.insert(T::TYPE_URL, any::<T, M>);
        self.data.insert(T::TYPE_URL, data::<T, M>);
        if let Some(tag) = T::amino_type(true) {
            self.amino_classic.insert(tag, amino::<T, M>);
        }
        if let Some(tag) = T::amino_type(false) {
            self.amino.insert(tag, amino::<T, M>);
        }
        self
    }

    pub(crate) fn unpack_any(&self, any: &Any, is_classic: bool) -> Result<M, CodecError> {
        let decoder = self
            .any
            .get(any.type_url.as_str())
            .ok_or_else(|| CodecError::UnknownType {
                representation: Representation::Proto,
                tag: any.type_url.clone(),
            })?;
        decoder(any, is_classic)
    }

    pub(crate) fn from_data(&self, json: Value, is_classic: bool) -> Result<M, CodecError> {
        let type_url = json
            .get("@type")
            .and_then(Value::as_str)
            .ok_or(CodecError::MissingType {
                representation: Representation::Data,
            })?;
        let decoder = self
            .data
            .get(type_url)
            .ok_or_else(|| CodecError::UnknownType {
                representation: Representation::Data,
                tag: type_url.to_owned(),
            })?;
        decoder(json, is_classic)
    }

    pub(crate) fn from_amino(&self, json: Value, is_classic: bool) -> Result<M, CodecError> {
        let tag = json
            .get("type")
            .and_then(Value::as_str)
            .ok_or(CodecError::MissingType {
                representation: Representation::Amino,
            })?;
        let decoders = if is_classic {
            &self.amino_classic
        } else {
            &self.amino
        };
        let decoder = decoders
            .get(tag)
            .ok_or_else(|| CodecError::UnknownType {
                representation: Representation::Amino,
                tag: tag.to_owned(),
            })?;
        decoder(json, is_classic)
    }
}

/// Any message that can appear in a transaction body.
#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    Send(MsgSend),
    Delegate(MsgDelegate),
    Undelegate(MsgUndelegate),
    Deposit(MsgDeposit),
    Vote(MsgVote),
    SubmitProposal(MsgSubmitProposal),
    InstantiateContract(MsgInstantiateContract),
    ExecuteContract(MsgExecuteContract),
    ChannelCloseInit(MsgChannelCloseInit),
    ChannelCloseConfirm(MsgChannelCloseConfirm),
    Timeout(MsgTimeout),
    TimeoutOnClose(MsgTimeoutOnClose),
    ConnectionOpenInit(MsgConnectionOpenInit),
    /// EVM transaction routed through the same builder. Has no Cosmos wire form.
    Evm(EvmMessage),
    /// Read from the chain with a type URL this crate does not know.
    Unknown(UnknownMsg),
}

macro_rules! msg_variants {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Msg {
                fn from(msg: $ty) -> Self {
                    Msg::$variant(msg)
                }
            }
        )*

        static MSG_REGISTRY: Lazy<Registry<Msg>> = Lazy::new(|| {
            let mut registry = Registry::new();
            $(registry.register::<$ty>();)*
            registry
        });

        impl Msg {
            /// Protobuf type URL, or [None] for EVM messages.
            pub fn type_url(&self) -> Option<&str> {
                match self {
                    $(Msg::$variant(_) => Some(<$ty as MsgCodec>::TYPE_URL),)*
                    Msg::Evm(_) => None,
                    Msg::Unknown(msg) => Some(msg.type_url()),
                }
            }

            pub fn to_amino(&self, is_classic: bool) -> Result<Value, CodecError> {
                match self {
                    $(Msg::$variant(msg) => msg.to_amino(is_classic),)*
                    Msg::Evm(_) => Err(EvmMessage::unsupported(Representation::Amino)),
                    Msg::Unknown(msg) => msg.to_amino(),
                }
            }

            pub fn to_data(&self, is_classic: bool) -> Result<Value, CodecError> {
                match self {
                    $(Msg::$variant(msg) => msg.to_data(is_classic),)*
                    Msg::Evm(_) => Err(EvmMessage::unsupported(Representation::Data)),
                    Msg::Unknown(msg) => msg.to_data(),
                }
            }

            pub fn pack_any(&self, is_classic: bool) -> Result<Any, CodecError> {
                match self {
                    $(Msg::$variant(msg) => msg.pack_any(is_classic),)*
                    Msg::Evm(_) => Err(EvmMessage::unsupported(Representation::Proto)),
                    Msg::Unknown(msg) => msg.pack_any(),
                }
            }
        }
    };
}

msg_variants! {
    Send(MsgSend),
    Delegate(MsgDelegate),
    Undelegate(MsgUndelegate),
    Deposit(MsgDeposit),
    Vote(MsgVote),
    SubmitProposal(MsgSubmitProposal),
    InstantiateContract(MsgInstantiateContract),
    ExecuteContract(MsgExecuteContract),
    ChannelCloseInit(MsgChannelCloseInit),
    ChannelCloseConfirm(MsgChannelCloseConfirm),
    Timeout(MsgTimeout),
    TimeoutOnClose(MsgTimeoutOnClose),
    ConnectionOpenInit(MsgConnectionOpenInit),
}

impl From<EvmMessage> for Msg {
    fn from(msg: EvmMessage) -> Self {
        Msg::Evm(msg)
    }
}

impl Msg {
    pub fn from_amino(json: Value, is_classic: bool) -> Result<Self, CodecError> {
        MSG_REGISTRY.from_amino(json, is_classic)
    }

    pub fn from_data(json: Value, is_classic: bool) -> Result<Self, CodecError> {
        MSG_REGISTRY.from_data(json, is_classic)
    }

    pub fn unpack_any(any: &Any, is_classic: bool) -> Result<Self, CodecError> {
        MSG_REGISTRY.unpack_any(any, is_classic)
    }

    /// Like [Self::from_data], but keeps messages of unregistered types as
    /// [Msg::Unknown] instead of failing.
    pub fn from_data_or_unknown(json: Value, is_classic: bool) -> Result<Self, CodecError> {
        let known = json
            .get("@type")
            .and_then(Value::as_str)
            .map_or(true, |type_url| MSG_REGISTRY.data.contains_key(type_url));
        if known {
            Self::from_data(json, is_classic)
        } else {
            Ok(Msg::Unknown(UnknownMsg::Data(json)))
        }
    }

    /// Like [Self::unpack_any], but keeps messages of unregistered types as
    /// [Msg::Unknown] instead of failing.
    pub fn unpack_any_or_unknown(any: &Any, is_classic: bool) -> Result<Self, CodecError> {
        if MSG_REGISTRY.any.contains_key(any.type_url.as_str()) {
            Self::unpack_any(any, is_classic)
        } else {
            Ok(Msg::Unknown(UnknownMsg::Proto(any.clone())))
        }
    }

    pub fn is_evm(&self) -> bool {
        matches!(self, Msg::Evm(_))
    }
}

/// Governance proposal content, carried inside [MsgSubmitProposal].
#[derive(Clone, Debug, PartialEq)]
pub enum Proposal {
    Text(TextProposal),
    ClientUpdate(ClientUpdateProposal),
}

impl From<TextProposal> for Proposal {
    fn from(proposal: TextProposal) -> Self {
        Proposal::Text(proposal)
    }
}

impl From<ClientUpdateProposal> for Proposal {
    fn from(proposal: ClientUpdateProposal) -> Self {
        Proposal::ClientUpdate(proposal)
    }
}

static PROPOSAL_REGISTRY: Lazy<Registry<Proposal>> = Lazy::new(|| {
    let mut registry = Registry::new();
    registry
        .register::<TextProposal>()
        .register::<ClientUpdateProposal>();
    registry
});

impl Proposal {
    pub fn type_url(&self) -> &'static str {
        match self {
            Proposal::Text(_) => TextProposal::TYPE_URL,
            Proposal::ClientUpdate(_) => ClientUpdateProposal::TYPE_URL,
        }
    }

    pub fn to_amino(&self, is_classic: bool) -> Result<Value, CodecError> {
        match self {
            Proposal::Text(p) => p.to_amino(is_classic),
            Proposal::ClientUpdate(p) => p.to_amino(is_classic),
        }
    }

    pub fn to_data(&self, is_classic: bool) -> Result<Value, CodecError> {
        match self {
            Proposal::Text(p) => p.to_data(is_classic),
            Proposal::ClientUpdate(p) => p.to_data(is_classic),
        }
    }

    pub fn pack_any(&self, is_classic: bool) -> Result<Any, CodecError> {
        match self {
            Proposal::Text(p) => p.pack_any(is_classic),
            Proposal::ClientUpdate(p) => p.pack_any(is_classic),
        }
    }

    pub fn from_amino(json: Value, is_classic: bool) -> Result<Self, CodecError> {
        PROPOSAL_REGISTRY.from_amino(json, is_classic)
    }

    pub fn from_data(json: Value, is_classic: bool) -> Result<Self, CodecError> {
        PROPOSAL_REGISTRY.from_data(json, is_classic)
    }

    pub fn unpack_any(any: &Any, is_classic: bool) -> Result<Self, CodecError> {
        PROPOSAL_REGISTRY.unpack_any(any, is_classic)
    }
}

/// Serde helpers shared by the message definitions.
pub(crate) mod serde_helpers {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Optional addresses that appear as `""` when absent.
    pub(crate) mod empty_as_none {
        use super::*;

        pub(crate) fn serialize<S: Serializer>(
            value: &Option<String>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(value.as_deref().unwrap_or_default())
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<String>, D::Error> {
            Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
        }
    }

    pub(crate) fn none_if_empty(s: String) -> Option<String> {
        Some(s).filter(|s| !s.is_empty())
    }
}

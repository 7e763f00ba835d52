//! Transactions and their protobuf and JSON forms.

use cosmos_sdk_proto::{
    cosmos::{
        crypto::secp256k1::PubKey,
        tx::v1beta1::{
            mode_info::{Single, Sum},
            AuthInfo as ProtoAuthInfo, Fee as ProtoFee, ModeInfo as ProtoModeInfo, SignDoc,
            SignerInfo as ProtoSignerInfo, Tx as ProtoTx, TxBody as ProtoTxBody,
        },
    },
    Any,
};
use prost::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::{
    coins::Coins,
    error::{CodecError, Representation},
    msgs::{from_json, to_json, Msg},
    txbuilder::SignerData,
    wire::{self, base64_bytes, int_string},
    Error, Result,
};

const TX_TYPE_URL: &str = "/cosmos.tx.v1beta1.Tx";

/// Public key of a transaction signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    Secp256k1(Vec<u8>),
    /// Ethermint key, used by EVM-compatible chains.
    EthSecp256k1(Vec<u8>),
}

impl PublicKey {
    const SECP256K1: &'static str = "/cosmos.crypto.secp256k1.PubKey";
    const ETH_SECP256K1: &'static str = "/ethermint.crypto.v1.ethsecp256k1.PubKey";

    pub fn type_url(&self) -> &'static str {
        match self {
            PublicKey::Secp256k1(_) => Self::SECP256K1,
            PublicKey::EthSecp256k1(_) => Self::ETH_SECP256K1,
        }
    }

    pub fn key_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Secp256k1(key) | PublicKey::EthSecp256k1(key) => key,
        }
    }

    fn from_parts(type_url: &str, key: Vec<u8>, representation: Representation) -> Result<Self, CodecError> {
        match type_url {
            Self::SECP256K1 => Ok(PublicKey::Secp256k1(key)),
            Self::ETH_SECP256K1 => Ok(PublicKey::EthSecp256k1(key)),
            _ => Err(CodecError::UnknownType {
                representation,
                tag: type_url.to_owned(),
            }),
        }
    }

    pub fn pack_any(&self) -> Any {
        Any {
            type_url: self.type_url().to_owned(),
            value: PubKey {
                key: self.key_bytes().to_owned(),
            }
            .encode_to_vec(),
        }
    }

    pub fn unpack_any(any: &Any) -> Result<Self, CodecError> {
        let PubKey { key } =
            PubKey::decode(any.value.as_slice()).map_err(|source| CodecError::Proto {
                type_url: any.type_url.clone(),
                source,
            })?;
        Self::from_parts(&any.type_url, key, Representation::Proto)
    }

    pub fn to_data(&self) -> Value {
        serde_json::json!({
            "@type": self.type_url(),
            "key": wire::encode(self.key_bytes()),
        })
    }

    pub fn from_data(json: Value) -> Result<Self, CodecError> {
        #[derive(Deserialize)]
        struct KeyData {
            #[serde(rename = "@type")]
            type_url: String,
            #[serde(with = "base64_bytes")]
            key: Vec<u8>,
        }
        let KeyData { type_url, key } = from_json(json, "PublicKey", Representation::Data)?;
        Self::from_parts(&type_url, key, Representation::Data)
    }
}

/// `SIGN_MODE_DIRECT`, the only mode this library prepares transactions for.
pub const SIGN_MODE_DIRECT: i32 = 1;

fn sign_mode_name(mode: i32) -> Option<&'static str> {
    Some(match mode {
        0 => "SIGN_MODE_UNSPECIFIED",
        1 => "SIGN_MODE_DIRECT",
        2 => "SIGN_MODE_TEXTUAL",
        3 => "SIGN_MODE_DIRECT_AUX",
        127 => "SIGN_MODE_LEGACY_AMINO_JSON",
        191 => "SIGN_MODE_EIP_191",
        _ => return None,
    })
}

fn sign_mode_from_name(name: &str) -> Option<i32> {
    [0, 1, 2, 3, 127, 191]
        .into_iter()
        .find(|mode| sign_mode_name(*mode) == Some(name))
}

/// Signature metadata for one signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignerInfo {
    pub public_key: Option<PublicKey>,
    /// Sign mode of a single-key signer.
    pub sign_mode: i32,
    pub sequence: u64,
}

impl SignerInfo {
    /// Placeholder used for simulation. A missing key is sent as an empty
    /// secp256k1 key.
    pub(crate) fn simulation(signer: &SignerData) -> Self {
        SignerInfo {
            public_key: Some(
                signer
                    .public_key
                    .clone()
                    .unwrap_or_else(|| PublicKey::Secp256k1(vec![])),
            ),
            sign_mode: SIGN_MODE_DIRECT,
            sequence: signer.sequence,
        }
    }

    fn to_proto(&self) -> ProtoSignerInfo {
        ProtoSignerInfo {
            public_key: self.public_key.as_ref().map(PublicKey::pack_any),
            mode_info: Some(ProtoModeInfo {
                sum: Some(Sum::Single(Single {
                    mode: self.sign_mode,
                })),
            }),
            sequence: self.sequence,
        }
    }

    fn from_proto(proto: ProtoSignerInfo) -> Result<Self, CodecError> {
        let sign_mode = match proto.mode_info.and_then(|info| info.sum) {
            Some(Sum::Single(Single { mode })) => mode,
            Some(Sum::Multi(_)) => {
                return Err(CodecError::invalid_field(
                    "SignerInfo",
                    "mode_info",
                    "multisig signers are not supported",
                ))
            }
            None => return Err(CodecError::invalid_field("SignerInfo", "mode_info", "missing")),
        };
        Ok(SignerInfo {
            public_key: proto
                .public_key
                .as_ref()
                .map(PublicKey::unpack_any)
                .transpose()?,
            sign_mode,
            sequence: proto.sequence,
        })
    }
}

/// Gas limit and fee amount for a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Coins,
    #[serde(with = "int_string")]
    pub gas_limit: u64,
    #[serde(default)]
    pub payer: String,
    #[serde(default)]
    pub granter: String,
}

impl Fee {
    pub fn new(gas_limit: u64, amount: Coins) -> Self {
        Fee {
            amount,
            gas_limit,
            payer: String::new(),
            granter: String::new(),
        }
    }

    fn to_proto(&self) -> ProtoFee {
        ProtoFee {
            amount: self.amount.to_proto(),
            gas_limit: self.gas_limit,
            payer: self.payer.clone(),
            granter: self.granter.clone(),
        }
    }

    fn from_proto(proto: ProtoFee) -> Result<Self, CodecError> {
        Ok(Fee {
            amount: Coins::from_proto(&proto.amount)
                .map_err(|e| CodecError::invalid_field("Fee", "amount", e))?,
            gas_limit: proto.gas_limit,
            payer: proto.payer,
            granter: proto.granter,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TxBody {
    pub messages: Vec<Msg>,
    pub memo: String,
    pub timeout_height: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthInfo {
    pub signer_infos: Vec<SignerInfo>,
    pub fee: Fee,
}

/// A transaction, signed or not.
///
/// Signatures are positionally aligned with `auth_info.signer_infos`, so they
/// can only be added together with their signer info.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tx {
    pub body: TxBody,
    pub auth_info: AuthInfo,
    signatures: Vec<Vec<u8>>,
}

impl Tx {
    /// An unsigned transaction.
    pub fn new(body: TxBody, fee: Fee) -> Self {
        Tx {
            body,
            auth_info: AuthInfo {
                signer_infos: vec![],
                fee,
            },
            signatures: vec![],
        }
    }

    pub fn signatures(&self) -> &[Vec<u8>] {
        &self.signatures
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    pub fn append_signature(&mut self, signer_info: SignerInfo, signature: Vec<u8>) {
        self.auth_info.signer_infos.push(signer_info);
        self.signatures.push(signature);
    }

    /// Add placeholder signer infos and empty signatures for simulation.
    pub fn append_empty_signatures(&mut self, signers: &[SignerData]) {
        for signer in signers {
            self.append_signature(SignerInfo::simulation(signer), vec![]);
        }
    }

    pub fn to_proto(&self, is_classic: bool) -> Result<ProtoTx, CodecError> {
        Ok(ProtoTx {
            body: Some(ProtoTxBody {
                messages: self
                    .body
                    .messages
                    .iter()
                    .map(|msg| msg.pack_any(is_classic))
                    .collect::<Result<_, _>>()?,
                memo: self.body.memo.clone(),
                timeout_height: self.body.timeout_height,
                ..Default::default()
            }),
            auth_info: Some(ProtoAuthInfo {
                signer_infos: self
                    .auth_info
                    .signer_infos
                    .iter()
                    .map(SignerInfo::to_proto)
                    .collect(),
                fee: Some(self.auth_info.fee.to_proto()),
                ..Default::default()
            }),
            signatures: self.signatures.clone(),
        })
    }

    pub fn from_proto(proto: ProtoTx, is_classic: bool) -> Result<Self, CodecError> {
        let body = proto.body.unwrap_or_default();
        let auth_info = proto.auth_info.unwrap_or_default();
        let signer_infos = auth_info
            .signer_infos
            .into_iter()
            .map(SignerInfo::from_proto)
            .collect::<Result<Vec<_>, _>>()?;
        if signer_infos.len() != proto.signatures.len() && !proto.signatures.is_empty() {
            return Err(CodecError::invalid_field(
                "Tx",
                "signatures",
                format!(
                    "{} signatures for {} signer infos",
                    proto.signatures.len(),
                    signer_infos.len()
                ),
            ));
        }
        Ok(Tx {
            body: TxBody {
                messages: body
                    .messages
                    .iter()
                    .map(|any| Msg::unpack_any_or_unknown(any, is_classic))
                    .collect::<Result<_, _>>()?,
                memo: body.memo,
                timeout_height: body.timeout_height,
            },
            auth_info: AuthInfo {
                signer_infos,
                fee: auth_info
                    .fee
                    .map(Fee::from_proto)
                    .transpose()?
                    .unwrap_or_default(),
            },
            signatures: proto.signatures,
        })
    }

    /// `SIGN_MODE_DIRECT` sign bytes, once the signer info for the new
    /// signature has been added to `auth_info`.
    pub fn sign_doc_bytes(
        &self,
        chain_id: &str,
        account_number: u64,
        is_classic: bool,
    ) -> Result<Vec<u8>, CodecError> {
        let ProtoTx {
            body, auth_info, ..
        } = self.to_proto(is_classic)?;
        Ok(SignDoc {
            body_bytes: body.unwrap_or_default().encode_to_vec(),
            auth_info_bytes: auth_info.unwrap_or_default().encode_to_vec(),
            chain_id: chain_id.to_owned(),
            account_number,
        }
        .encode_to_vec())
    }

    pub fn to_bytes(&self, is_classic: bool) -> Result<Vec<u8>, CodecError> {
        Ok(self.to_proto(is_classic)?.encode_to_vec())
    }

    pub fn from_bytes(bytes: &[u8], is_classic: bool) -> Result<Self> {
        let proto = ProtoTx::decode(bytes)?;
        Ok(Self::from_proto(proto, is_classic)?)
    }

    /// Base64 of the protobuf encoding, as sent to the LCD.
    pub fn encode(&self, is_classic: bool) -> Result<String, CodecError> {
        Ok(wire::encode(&self.to_bytes(is_classic)?))
    }

    pub fn decode(encoded: &str, is_classic: bool) -> Result<Self> {
        let bytes = wire::decode(encoded.trim())?;
        Self::from_bytes(&bytes, is_classic)
    }

    /// Upper case hex SHA-256 of the encoded transaction.
    pub fn hash(&self, is_classic: bool) -> Result<String, CodecError> {
        Ok(hash_tx_bytes(&self.to_bytes(is_classic)?))
    }

    pub fn to_data(&self, is_classic: bool) -> Result<Value, CodecError> {
        let data = TxData {
            type_url: Some(TX_TYPE_URL.to_owned()),
            body: TxBodyData {
                messages: self
                    .body
                    .messages
                    .iter()
                    .map(|msg| msg.to_data(is_classic))
                    .collect::<Result<_, _>>()?,
                memo: self.body.memo.clone(),
                timeout_height: self.body.timeout_height,
            },
            auth_info: AuthInfoData {
                signer_infos: self
                    .auth_info
                    .signer_infos
                    .iter()
                    .map(|info| SignerInfoData {
                        public_key: info.public_key.as_ref().map(PublicKey::to_data),
                        mode_info: ModeInfoData {
                            single: SingleData {
                                mode: sign_mode_name(info.sign_mode)
                                    .map(|name| Value::String(name.to_owned()))
                                    .unwrap_or_else(|| info.sign_mode.into()),
                            },
                        },
                        sequence: info.sequence,
                    })
                    .collect(),
                fee: self.auth_info.fee.clone(),
            },
            signatures: self.signatures.iter().map(|sig| wire::encode(sig)).collect(),
        };
        to_json(&data, "Tx", Representation::Data)
    }

    pub fn from_data(json: Value, is_classic: bool) -> Result<Self> {
        let data: TxData = from_json(json, "Tx", Representation::Data)?;
        let mut signer_infos = vec![];
        for info in data.auth_info.signer_infos {
            let mode = &info.mode_info.single.mode;
            let sign_mode = mode
                .as_str()
                .and_then(sign_mode_from_name)
                .or_else(|| mode.as_i64().and_then(|x| i32::try_from(x).ok()))
                .ok_or_else(|| {
                    CodecError::invalid_field("SignerInfo", "mode_info", format!("unknown mode {mode}"))
                })?;
            signer_infos.push(SignerInfo {
                public_key: info.public_key.map(PublicKey::from_data).transpose()?,
                sign_mode,
                sequence: info.sequence,
            });
        }
        let signatures = data
            .signatures
            .iter()
            .map(|sig| wire::decode(sig))
            .collect::<Result<Vec<_>, _>>()?;
        if !signatures.is_empty() && signatures.len() != signer_infos.len() {
            return Err(Error::SignatureMismatch {
                signatures: signatures.len(),
                signer_infos: signer_infos.len(),
            });
        }
        Ok(Tx {
            body: TxBody {
                messages: data
                    .body
                    .messages
                    .into_iter()
                    .map(|msg| Msg::from_data_or_unknown(msg, is_classic))
                    .collect::<Result<_, _>>()?,
                memo: data.body.memo,
                timeout_height: data.body.timeout_height,
            },
            auth_info: AuthInfo {
                signer_infos,
                fee: data.auth_info.fee,
            },
            signatures,
        })
    }
}

/// Hash of raw transaction bytes, as used for transaction IDs.
pub fn hash_tx_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode_upper(hasher.finalize())
}

#[derive(Serialize, Deserialize)]
struct TxData {
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    type_url: Option<String>,
    body: TxBodyData,
    auth_info: AuthInfoData,
    #[serde(default)]
    signatures: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct TxBodyData {
    #[serde(default)]
    messages: Vec<Value>,
    #[serde(default)]
    memo: String,
    #[serde(with = "int_string", default)]
    timeout_height: u64,
}

#[derive(Serialize, Deserialize)]
struct AuthInfoData {
    #[serde(default)]
    signer_infos: Vec<SignerInfoData>,
    fee: Fee,
}

#[derive(Serialize, Deserialize)]
struct SignerInfoData {
    #[serde(default)]
    public_key: Option<Value>,
    mode_info: ModeInfoData,
    #[serde(with = "int_string")]
    sequence: u64,
}

#[derive(Serialize, Deserialize)]
struct ModeInfoData {
    single: SingleData,
}

#[derive(Serialize, Deserialize)]
struct SingleData {
    mode: Value,
}

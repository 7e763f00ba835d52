//! IBC channel and connection control messages, plus the client update
//! proposal.
//!
//! The control messages are only ever produced by relayers and have no Amino
//! form.

use serde::{Deserialize, Serialize};

use crate::{
    error::CodecError,
    wire::{base64_bytes, int_string},
};

use super::MsgCodec;

pub mod proto;

/// Revision-aware block height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Height {
    #[serde(with = "int_string")]
    pub revision_number: u64,
    #[serde(with = "int_string")]
    pub revision_height: u64,
}

impl From<proto::Height> for Height {
    fn from(proto: proto::Height) -> Self {
        Height {
            revision_number: proto.revision_number,
            revision_height: proto.revision_height,
        }
    }
}

impl From<Height> for proto::Height {
    fn from(height: Height) -> Self {
        proto::Height {
            revision_number: height.revision_number,
            revision_height: height.revision_height,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    #[serde(with = "int_string")]
    pub sequence: u64,
    pub source_port: String,
    pub source_channel: String,
    pub destination_port: String,
    pub destination_channel: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_height: Option<Height>,
    /// Nanoseconds since the epoch, zero for no timestamp timeout.
    #[serde(with = "int_string")]
    pub timeout_timestamp: u64,
}

impl From<proto::Packet> for Packet {
    fn from(proto: proto::Packet) -> Self {
        Packet {
            sequence: proto.sequence,
            source_port: proto.source_port,
            source_channel: proto.source_channel,
            destination_port: proto.destination_port,
            destination_channel: proto.destination_channel,
            data: proto.data,
            timeout_height: proto.timeout_height.map(Into::into),
            timeout_timestamp: proto.timeout_timestamp,
        }
    }
}

impl From<Packet> for proto::Packet {
    fn from(packet: Packet) -> Self {
        proto::Packet {
            sequence: packet.sequence,
            source_port: packet.source_port,
            source_channel: packet.source_channel,
            destination_port: packet.destination_port,
            destination_channel: packet.destination_channel,
            data: packet.data,
            timeout_height: packet.timeout_height.map(Into::into),
            timeout_timestamp: packet.timeout_timestamp,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePrefix {
    #[serde(with = "base64_bytes")]
    pub key_prefix: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub client_id: String,
    #[serde(default)]
    pub connection_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<MerklePrefix>,
}

impl From<proto::Counterparty> for Counterparty {
    fn from(proto: proto::Counterparty) -> Self {
        Counterparty {
            client_id: proto.client_id,
            connection_id: proto.connection_id,
            prefix: proto.prefix.map(|prefix| MerklePrefix {
                key_prefix: prefix.key_prefix,
            }),
        }
    }
}

impl From<Counterparty> for proto::Counterparty {
    fn from(counterparty: Counterparty) -> Self {
        proto::Counterparty {
            client_id: counterparty.client_id,
            connection_id: counterparty.connection_id,
            prefix: counterparty.prefix.map(|prefix| proto::MerklePrefix {
                key_prefix: prefix.key_prefix,
            }),
        }
    }
}

/// Connection version offered during the handshake.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub identifier: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl From<proto::Version> for Version {
    fn from(proto: proto::Version) -> Self {
        Version {
            identifier: proto.identifier,
            features: proto.features,
        }
    }
}

impl From<Version> for proto::Version {
    fn from(version: Version) -> Self {
        proto::Version {
            identifier: version.identifier,
            features: version.features,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgChannelCloseInit {
    pub port_id: String,
    pub channel_id: String,
    pub signer: String,
}

impl MsgCodec for MsgChannelCloseInit {
    const TYPE_NAME: &'static str = "MsgChannelCloseInit";
    const TYPE_URL: &'static str = "/ibc.core.channel.v1.MsgChannelCloseInit";
    type Proto = proto::MsgChannelCloseInit;

    fn amino_type(_is_classic: bool) -> Option<&'static str> {
        None
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(proto::MsgChannelCloseInit {
            port_id: self.port_id.clone(),
            channel_id: self.channel_id.clone(),
            signer: self.signer.clone(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgChannelCloseInit {
            port_id: proto.port_id,
            channel_id: proto.channel_id,
            signer: proto.signer,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgChannelCloseConfirm {
    pub port_id: String,
    pub channel_id: String,
    #[serde(with = "base64_bytes")]
    pub proof_init: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_height: Option<Height>,
    pub signer: String,
}

impl MsgCodec for MsgChannelCloseConfirm {
    const TYPE_NAME: &'static str = "MsgChannelCloseConfirm";
    const TYPE_URL: &'static str = "/ibc.core.channel.v1.MsgChannelCloseConfirm";
    type Proto = proto::MsgChannelCloseConfirm;

    fn amino_type(_is_classic: bool) -> Option<&'static str> {
        None
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(proto::MsgChannelCloseConfirm {
            port_id: self.port_id.clone(),
            channel_id: self.channel_id.clone(),
            proof_init: self.proof_init.clone(),
            proof_height: self.proof_height.map(Into::into),
            signer: self.signer.clone(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgChannelCloseConfirm {
            port_id: proto.port_id,
            channel_id: proto.channel_id,
            proof_init: proto.proof_init,
            proof_height: proto.proof_height.map(Into::into),
            signer: proto.signer,
        })
    }
}

/// Prove that a packet was never received before its timeout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTimeout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet: Option<Packet>,
    #[serde(with = "base64_bytes")]
    pub proof_unreceived: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_height: Option<Height>,
    #[serde(with = "int_string")]
    pub next_sequence_recv: u64,
    pub signer: String,
}

impl MsgCodec for MsgTimeout {
    const TYPE_NAME: &'static str = "MsgTimeout";
    const TYPE_URL: &'static str = "/ibc.core.channel.v1.MsgTimeout";
    type Proto = proto::MsgTimeout;

    fn amino_type(_is_classic: bool) -> Option<&'static str> {
        None
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(proto::MsgTimeout {
            packet: self.packet.clone().map(Into::into),
            proof_unreceived: self.proof_unreceived.clone(),
            proof_height: self.proof_height.map(Into::into),
            next_sequence_recv: self.next_sequence_recv,
            signer: self.signer.clone(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgTimeout {
            packet: proto.packet.map(Into::into),
            proof_unreceived: proto.proof_unreceived,
            proof_height: proto.proof_height.map(Into::into),
            next_sequence_recv: proto.next_sequence_recv,
            signer: proto.signer,
        })
    }
}

/// Time out a packet because the counterparty channel closed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTimeoutOnClose {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet: Option<Packet>,
    #[serde(with = "base64_bytes")]
    pub proof_unreceived: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub proof_close: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_height: Option<Height>,
    #[serde(with = "int_string")]
    pub next_sequence_recv: u64,
    pub signer: String,
}

impl MsgCodec for MsgTimeoutOnClose {
    const TYPE_NAME: &'static str = "MsgTimeoutOnClose";
    const TYPE_URL: &'static str = "/ibc.core.channel.v1.MsgTimeoutOnClose";
    type Proto = proto::MsgTimeoutOnClose;

    fn amino_type(_is_classic: bool) -> Option<&'static str> {
        None
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(proto::MsgTimeoutOnClose {
            packet: self.packet.clone().map(Into::into),
            proof_unreceived: self.proof_unreceived.clone(),
            proof_close: self.proof_close.clone(),
            proof_height: self.proof_height.map(Into::into),
            next_sequence_recv: self.next_sequence_recv,
            signer: self.signer.clone(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgTimeoutOnClose {
            packet: proto.packet.map(Into::into),
            proof_unreceived: proto.proof_unreceived,
            proof_close: proto.proof_close,
            proof_height: proto.proof_height.map(Into::into),
            next_sequence_recv: proto.next_sequence_recv,
            signer: proto.signer,
        })
    }
}

/// Start a connection handshake with another chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgConnectionOpenInit {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<Counterparty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    #[serde(with = "int_string")]
    pub delay_period: u64,
    pub signer: String,
}

impl MsgCodec for MsgConnectionOpenInit {
    const TYPE_NAME: &'static str = "MsgConnectionOpenInit";
    const TYPE_URL: &'static str = "/ibc.core.connection.v1.MsgConnectionOpenInit";
    type Proto = proto::MsgConnectionOpenInit;

    fn amino_type(_is_classic: bool) -> Option<&'static str> {
        None
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(proto::MsgConnectionOpenInit {
            client_id: self.client_id.clone(),
            counterparty: self.counterparty.clone().map(Into::into),
            version: self.version.clone().map(Into::into),
            delay_period: self.delay_period,
            signer: self.signer.clone(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgConnectionOpenInit {
            client_id: proto.client_id,
            counterparty: proto.counterparty.map(Into::into),
            version: proto.version.map(Into::into),
            delay_period: proto.delay_period,
            signer: proto.signer,
        })
    }
}

/// Governance proposal to replace an expired or frozen client with a substitute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientUpdateProposal {
    pub title: String,
    pub description: String,
    pub subject_client_id: String,
    pub substitute_client_id: String,
}

impl MsgCodec for ClientUpdateProposal {
    const TYPE_NAME: &'static str = "ClientUpdateProposal";
    const TYPE_URL: &'static str = "/ibc.core.client.v1.ClientUpdateProposal";
    type Proto = proto::ClientUpdateProposal;

    fn amino_type(_is_classic: bool) -> Option<&'static str> {
        Some("ibc/ClientUpdateProposal")
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(proto::ClientUpdateProposal {
            title: self.title.clone(),
            description: self.description.clone(),
            subject_client_id: self.subject_client_id.clone(),
            substitute_client_id: self.substitute_client_id.clone(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(ClientUpdateProposal {
            title: proto.title,
            description: proto.description,
            subject_client_id: proto.subject_client_id,
            substitute_client_id: proto.substitute_client_id,
        })
    }
}

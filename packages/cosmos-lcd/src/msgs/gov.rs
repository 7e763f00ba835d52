use cosmos_sdk_proto::cosmos::gov::v1beta1::{
    MsgDeposit as ProtoMsgDeposit, MsgSubmitProposal as ProtoMsgSubmitProposal,
    MsgVote as ProtoMsgVote, TextProposal as ProtoTextProposal,
};
use serde::{de::Visitor, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    coins::Coins,
    error::{CodecError, Representation},
    wire::int_string,
};

use super::{from_json, to_json, MsgCodec, Proposal};

/// Add a deposit to an open proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeposit {
    #[serde(with = "int_string")]
    pub proposal_id: u64,
    pub depositor: String,
    pub amount: Coins,
}

impl MsgCodec for MsgDeposit {
    const TYPE_NAME: &'static str = "MsgDeposit";
    const TYPE_URL: &'static str = "/cosmos.gov.v1beta1.MsgDeposit";
    type Proto = ProtoMsgDeposit;

    fn amino_type(is_classic: bool) -> Option<&'static str> {
        Some(if is_classic {
            "gov/MsgDeposit"
        } else {
            "cosmos-sdk/MsgDeposit"
        })
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(ProtoMsgDeposit {
            proposal_id: self.proposal_id,
            depositor: self.depositor.clone(),
            amount: self.amount.to_proto(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(MsgDeposit {
            proposal_id: proto.proposal_id,
            amount: Coins::from_proto(&proto.amount)
                .map_err(|e| CodecError::invalid_field(Self::TYPE_NAME, "amount", e))?,
            depositor: proto.depositor,
        })
    }
}

/// A governance vote choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoteOption {
    Unspecified,
    Yes,
    Abstain,
    No,
    NoWithVeto,
}

impl VoteOption {
    const ALL: [VoteOption; 5] = [
        VoteOption::Unspecified,
        VoteOption::Yes,
        VoteOption::Abstain,
        VoteOption::No,
        VoteOption::NoWithVeto,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VoteOption::Unspecified => "VOTE_OPTION_UNSPECIFIED",
            VoteOption::Yes => "VOTE_OPTION_YES",
            VoteOption::Abstain => "VOTE_OPTION_ABSTAIN",
            VoteOption::No => "VOTE_OPTION_NO",
            VoteOption::NoWithVeto => "VOTE_OPTION_NO_WITH_VETO",
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            VoteOption::Unspecified => 0,
            VoteOption::Yes => 1,
            VoteOption::Abstain => 2,
            VoteOption::No => 3,
            VoteOption::NoWithVeto => 4,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.as_i32() == value)
    }
}

impl Serialize for VoteOption {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VoteOption {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(VoteOptionVisitor)
    }
}

struct VoteOptionVisitor;

impl<'de> Visitor<'de> for VoteOptionVisitor {
    type Value = VoteOption;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a vote option name or number")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        VoteOption::ALL
            .into_iter()
            .find(|x| x.as_str() == v)
            .or_else(|| v.parse().ok().and_then(VoteOption::from_i32))
            .ok_or_else(|| E::custom(format!("Unknown vote option {v:?}")))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        i32::try_from(v)
            .ok()
            .and_then(VoteOption::from_i32)
            .ok_or_else(|| E::custom(format!("Unknown vote option {v}")))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        i32::try_from(v)
            .ok()
            .and_then(VoteOption::from_i32)
            .ok_or_else(|| E::custom(format!("Unknown vote option {v}")))
    }
}

/// Vote on an open proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVote {
    #[serde(with = "int_string")]
    pub proposal_id: u64,
    pub voter: String,
    pub option: VoteOption,
}

impl MsgCodec for MsgVote {
    const TYPE_NAME: &'static str = "MsgVote";
    const TYPE_URL: &'static str = "/cosmos.gov.v1beta1.MsgVote";
    type Proto = ProtoMsgVote;

    fn amino_type(is_classic: bool) -> Option<&'static str> {
        Some(if is_classic {
            "gov/MsgVote"
        } else {
            "cosmos-sdk/MsgVote"
        })
    }

    /// Amino carries the option as its enum number.
    fn amino_value(&self, _is_classic: bool) -> Result<Value, CodecError> {
        let mut value = to_json(self, Self::TYPE_NAME, Representation::Amino)?;
        value["option"] = self.option.as_i32().into();
        Ok(value)
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(ProtoMsgVote {
            proposal_id: self.proposal_id,
            voter: self.voter.clone(),
            option: self.option.as_i32(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        let option = VoteOption::from_i32(proto.option).ok_or_else(|| {
            CodecError::invalid_field(
                Self::TYPE_NAME,
                "option",
                format!("unknown vote option {}", proto.option),
            )
        })?;
        Ok(MsgVote {
            proposal_id: proto.proposal_id,
            voter: proto.voter,
            option,
        })
    }
}

/// Plain text governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextProposal {
    pub title: String,
    pub description: String,
}

impl MsgCodec for TextProposal {
    const TYPE_NAME: &'static str = "TextProposal";
    const TYPE_URL: &'static str = "/cosmos.gov.v1beta1.TextProposal";
    type Proto = ProtoTextProposal;

    fn amino_type(is_classic: bool) -> Option<&'static str> {
        Some(if is_classic {
            "gov/TextProposal"
        } else {
            "cosmos-sdk/TextProposal"
        })
    }

    fn to_proto(&self, _is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(ProtoTextProposal {
            title: self.title.clone(),
            description: self.description.clone(),
        })
    }

    fn from_proto(proto: Self::Proto, _is_classic: bool) -> Result<Self, CodecError> {
        Ok(TextProposal {
            title: proto.title,
            description: proto.description,
        })
    }
}

/// Submit a governance proposal with an initial deposit.
///
/// The serde form is the Data form, with the content as Data JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MsgSubmitProposal {
    pub content: Proposal,
    pub initial_deposit: Coins,
    pub proposer: String,
}

impl Serialize for Proposal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_data(false)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Proposal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Proposal::from_data(Value::deserialize(deserializer)?, false)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
struct AminoSubmitProposal {
    content: Value,
    initial_deposit: Coins,
    proposer: String,
}

impl MsgCodec for MsgSubmitProposal {
    const TYPE_NAME: &'static str = "MsgSubmitProposal";
    const TYPE_URL: &'static str = "/cosmos.gov.v1beta1.MsgSubmitProposal";
    type Proto = ProtoMsgSubmitProposal;

    fn amino_type(is_classic: bool) -> Option<&'static str> {
        Some(if is_classic {
            "gov/MsgSubmitProposal"
        } else {
            "cosmos-sdk/MsgSubmitProposal"
        })
    }

    fn amino_value(&self, is_classic: bool) -> Result<Value, CodecError> {
        to_json(
            &AminoSubmitProposal {
                content: self.content.to_amino(is_classic)?,
                initial_deposit: self.initial_deposit.clone(),
                proposer: self.proposer.clone(),
            },
            Self::TYPE_NAME,
            Representation::Amino,
        )
    }

    fn from_amino_value(value: Value, is_classic: bool) -> Result<Self, CodecError> {
        let AminoSubmitProposal {
            content,
            initial_deposit,
            proposer,
        } = from_json(value, Self::TYPE_NAME, Representation::Amino)?;
        Ok(MsgSubmitProposal {
            content: Proposal::from_amino(content, is_classic)?,
            initial_deposit,
            proposer,
        })
    }

    fn data_value(&self, is_classic: bool) -> Result<Value, CodecError> {
        Ok(serde_json::json!({
            "content": self.content.to_data(is_classic)?,
            "initial_deposit": to_json(&self.initial_deposit, Self::TYPE_NAME, Representation::Data)?,
            "proposer": self.proposer,
        }))
    }

    fn to_proto(&self, is_classic: bool) -> Result<Self::Proto, CodecError> {
        Ok(ProtoMsgSubmitProposal {
            content: Some(self.content.pack_any(is_classic)?),
            initial_deposit: self.initial_deposit.to_proto(),
            proposer: self.proposer.clone(),
        })
    }

    fn from_proto(proto: Self::Proto, is_classic: bool) -> Result<Self, CodecError> {
        let content = proto
            .content
            .ok_or_else(|| CodecError::invalid_field(Self::TYPE_NAME, "content", "missing"))?;
        Ok(MsgSubmitProposal {
            content: Proposal::unpack_any(&content, is_classic)?,
            initial_deposit: Coins::from_proto(&proto.initial_deposit)
                .map_err(|e| CodecError::invalid_field(Self::TYPE_NAME, "initial_deposit", e))?,
            proposer: proto.proposer,
        })
    }
}

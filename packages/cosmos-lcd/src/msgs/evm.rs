use crate::error::{CodecError, Representation};

/// An EVM call submitted alongside Cosmos messages.
///
/// Transactions whose first message is an EVM call are signed and sent
/// through the EVM JSON-RPC, so this type has no Cosmos wire form. It exists
/// so the builder can recognise such payloads and skip fee simulation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvmMessage {
    pub from: String,
    pub to: Option<String>,
    /// Value in the native denomination's smallest unit.
    pub value: u128,
    /// Call data.
    pub data: Vec<u8>,
}

impl EvmMessage {
    pub(crate) fn unsupported(representation: Representation) -> CodecError {
        CodecError::unsupported("EvmMessage", representation)
    }
}

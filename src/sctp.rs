use serde::{Deserialize, Serialize};

/// Capabilities of an SCTP association described by a data media section.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SctpCapabilities {
    pub max_message_size: u64,
}

/// Used when a data section carries no `a=max-message-size`.
pub const DEFAULT_MAX_MESSAGE_SIZE: u64 = 65_535;

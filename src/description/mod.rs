//! The public session description: the normalized object model handed to
//! the rest of the media stack once an SDP blob has been ingested.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dtls::DtlsParameters;
use crate::ice::{IceCandidate, IceParameters};
use crate::rtp::{Capabilities, RtpParameters};
use crate::sctp::SctpCapabilities;
use crate::srtp::SrtpSdesParameters;

/// Connection endpoint details from an `o=`, `c=` or `a=rtcp` line.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetails {
    pub net_type: Option<String>,
    pub addr_type: Option<String>,
    pub connection_address: Option<String>,
    pub port: Option<u16>,
}

/// RTP and RTCP endpoints of one connection.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionData {
    pub rtp: Option<ConnectionDetails>,
    pub rtcp: Option<ConnectionDetails>,
}

/// Session-level facts from the `o=`, `s=`, `t=` and `c=` lines.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    pub username: String,
    pub session_id: u64,
    pub session_version: u64,
    pub session_name: String,
    pub start_time: u64,
    pub end_time: u64,
    pub unicast_address: Option<ConnectionDetails>,
    pub connection_data: Option<ConnectionData>,
}

/// ICE/DTLS/SRTP material for one leg (RTP or RTCP) of a transport.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportParameters {
    pub ice_parameters: Option<IceParameters>,
    pub ice_candidates: Vec<IceCandidate>,
    pub dtls_parameters: Option<DtlsParameters>,
    pub srtp_sdes_parameters: Option<SrtpSdesParameters>,
    pub end_of_candidates: bool,
}

/// One transport a media section runs over. `rtcp` is absent when RTCP is
/// multiplexed onto the RTP leg.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub id: String,
    pub rtp: TransportParameters,
    pub rtcp: Option<TransportParameters>,
}

/// The media direction a section was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaDirection {
    SendReceive,
    SendOnly,
    ReceiveOnly,
    Inactive,
}

/// Shared per-media-line facts.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLineDetails {
    pub internal_index: Option<usize>,
    /// The transport this line would use were it not bundled; cleared when
    /// it equals the effective transport.
    pub private_transport_id: Option<String>,
    pub protocol: String,
    pub connection_data: Option<ConnectionData>,
    pub media_direction: Option<MediaDirection>,
}

/// One lowered RTP media section.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtpMediaLine {
    pub id: String,
    pub transport_id: String,
    pub details: MediaLineDetails,
    pub media_type: String,
    pub sender_capabilities: Capabilities,
    pub receiver_capabilities: Capabilities,
}

/// One lowered SCTP (data channel) media section.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SctpMediaLine {
    pub id: String,
    pub transport_id: String,
    pub details: MediaLineDetails,
    pub port: Option<u16>,
    pub capabilities: SctpCapabilities,
}

/// One RTP sender description derived from a media section that carries
/// outbound traffic.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtpSender {
    pub id: String,
    pub rtp_media_line_id: String,
    pub internal_rtp_media_line_index: Option<usize>,
    pub parameters: RtpParameters,
    pub media_stream_ids: BTreeSet<String>,
    pub media_stream_track_id: Option<String>,
}

/// The structured session description produced from a parsed SDP document.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub details: Option<Details>,
    pub transports: Vec<Transport>,
    pub rtp_media_lines: Vec<RtpMediaLine>,
    pub sctp_media_lines: Vec<SctpMediaLine>,
    pub rtp_senders: Vec<RtpSender>,
}

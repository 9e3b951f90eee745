//! RTP codec and parameter types filled in by the description translator,
//! plus the codec tables used to resolve payload types.

use serde::{Deserialize, Serialize};

use crate::error::{parse_num, Error, Result};
use crate::lines::Fmtp;

#[cfg(test)]
mod rtp_test;

pub const FEC_MECHANISM_RED: &str = "red";
pub const FEC_MECHANISM_RED_ULPFEC: &str = "red+ulpfec";
pub const FEC_MECHANISM_FLEXFEC: &str = "flexfec";

/// The media kind a codec belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    Unknown,
    Audio,
    Video,
    AudioVideo,
    Rtx,
    Fec,
    Data,
}

impl CodecKind {
    /// The kind of an `m=` media token.
    pub fn from_media(media: &str) -> CodecKind {
        if media.eq_ignore_ascii_case("audio") {
            CodecKind::Audio
        } else if media.eq_ignore_ascii_case("video") {
            CodecKind::Video
        } else if media.eq_ignore_ascii_case("application") {
            CodecKind::Data
        } else {
            CodecKind::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CodecKind::Unknown => "",
            CodecKind::Audio => "audio",
            CodecKind::Video => "video",
            CodecKind::AudioVideo => "av",
            CodecKind::Rtx => "rtx",
            CodecKind::Fec => "fec",
            CodecKind::Data => "data",
        }
    }
}

/// The codecs the engine understands well enough to build capabilities for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedCodec {
    Unknown,
    Opus,
    Isac,
    G722,
    Ilbc,
    Pcmu,
    Pcma,
    Vp8,
    Vp9,
    H264,
    Rtx,
    Red,
    UlpFec,
    FlexFec,
    Cn,
    TelephoneEvent,
}

impl SupportedCodec {
    /// Resolves an rtpmap encoding name, case-insensitively.
    pub fn from_encoding_name(name: &str) -> SupportedCodec {
        let all = [
            SupportedCodec::Opus,
            SupportedCodec::Isac,
            SupportedCodec::G722,
            SupportedCodec::Ilbc,
            SupportedCodec::Pcmu,
            SupportedCodec::Pcma,
            SupportedCodec::Vp8,
            SupportedCodec::Vp9,
            SupportedCodec::H264,
            SupportedCodec::Rtx,
            SupportedCodec::Red,
            SupportedCodec::UlpFec,
            SupportedCodec::FlexFec,
            SupportedCodec::Cn,
            SupportedCodec::TelephoneEvent,
        ];
        for codec in all {
            if name.eq_ignore_ascii_case(codec.as_str()) {
                return codec;
            }
        }
        SupportedCodec::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SupportedCodec::Unknown => "",
            SupportedCodec::Opus => "opus",
            SupportedCodec::Isac => "ISAC",
            SupportedCodec::G722 => "G722",
            SupportedCodec::Ilbc => "iLBC",
            SupportedCodec::Pcmu => "PCMU",
            SupportedCodec::Pcma => "PCMA",
            SupportedCodec::Vp8 => "VP8",
            SupportedCodec::Vp9 => "VP9",
            SupportedCodec::H264 => "H264",
            SupportedCodec::Rtx => "rtx",
            SupportedCodec::Red => "red",
            SupportedCodec::UlpFec => "ulpfec",
            SupportedCodec::FlexFec => "flexfec",
            SupportedCodec::Cn => "CN",
            SupportedCodec::TelephoneEvent => "telephone-event",
        }
    }

    pub fn kind(self) -> CodecKind {
        match self {
            SupportedCodec::Unknown => CodecKind::Unknown,
            SupportedCodec::Opus
            | SupportedCodec::Isac
            | SupportedCodec::G722
            | SupportedCodec::Ilbc
            | SupportedCodec::Pcmu
            | SupportedCodec::Pcma
            | SupportedCodec::Cn
            | SupportedCodec::TelephoneEvent => CodecKind::Audio,
            SupportedCodec::Vp8 | SupportedCodec::Vp9 | SupportedCodec::H264 => CodecKind::Video,
            SupportedCodec::Rtx => CodecKind::Rtx,
            SupportedCodec::Red | SupportedCodec::UlpFec | SupportedCodec::FlexFec => {
                CodecKind::Fec
            }
        }
    }

    /// Codecs that cannot be used without their format parameters.
    pub fn requires_parameters(self) -> bool {
        matches!(self, SupportedCodec::Rtx | SupportedCodec::FlexFec)
    }

    pub fn default_clock_rate(self) -> Option<u32> {
        match self {
            SupportedCodec::Unknown => None,
            SupportedCodec::Opus => Some(48_000),
            SupportedCodec::Isac => Some(16_000),
            SupportedCodec::G722
            | SupportedCodec::Ilbc
            | SupportedCodec::Pcmu
            | SupportedCodec::Pcma
            | SupportedCodec::Cn
            | SupportedCodec::TelephoneEvent => Some(8_000),
            SupportedCodec::Vp8
            | SupportedCodec::Vp9
            | SupportedCodec::H264
            | SupportedCodec::Rtx
            | SupportedCodec::Red
            | SupportedCodec::UlpFec
            | SupportedCodec::FlexFec => Some(90_000),
        }
    }
}

/// Maps a statically-assigned payload type to its codec, for media lines
/// that list a reserved payload without an `a=rtpmap`.
pub fn reserved_codec(payload_type: u8) -> SupportedCodec {
    match payload_type {
        0 => SupportedCodec::Pcmu,
        8 => SupportedCodec::Pcma,
        9 => SupportedCodec::G722,
        13 => SupportedCodec::Cn,
        _ => SupportedCodec::Unknown,
    }
}

/// One rtcp-fb entry attached to a codec.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcpFeedback {
    pub kind: String,
    pub parameter: Option<String>,
}

/// Opus format parameters (RFC 7587 §6.1).
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpusCodecParameters {
    pub max_playback_rate: Option<u32>,
    pub sprop_max_capture_rate: Option<u32>,
    pub max_average_bitrate: Option<u32>,
    pub stereo: Option<bool>,
    pub sprop_stereo: Option<bool>,
    pub cbr: Option<bool>,
    pub use_inband_fec: Option<bool>,
    pub use_dtx: Option<bool>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vp8CodecParameters {
    pub max_fr: Option<u32>,
    pub max_fs: Option<u32>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct H264CodecParameters {
    pub packetization_modes: Vec<u16>,
    /// Hexadecimal `profile-level-id`.
    pub profile_level_id: Option<u32>,
    pub max_mbps: Option<u32>,
    pub max_smbps: Option<u32>,
    pub max_fs: Option<u32>,
    pub max_cpb: Option<u32>,
    pub max_dpb: Option<u32>,
    pub max_br: Option<u32>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtxCodecParameters {
    /// The associated payload type being retransmitted.
    pub apt: u8,
    pub rtx_time: Option<u64>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexFecCodecParameters {
    pub top: Option<u8>,
    pub l: Option<u32>,
    pub d: Option<u32>,
    /// Microseconds; required by the grammar.
    pub repair_window: u64,
}

/// RED payload list from the red format's fmtp (e.g. `96/97`).
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedCodecParameters {
    pub payload_types: Vec<u8>,
}

/// Codec-specific format parameters, tagged by codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodecParameters {
    Opus(OpusCodecParameters),
    Vp8(Vp8CodecParameters),
    H264(H264CodecParameters),
    Rtx(RtxCodecParameters),
    FlexFec(FlexFecCodecParameters),
    Red(RedCodecParameters),
}

fn parse_flag(value: &str, what: &str) -> Result<bool> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(Error::MalformedAttribute(format!(
            "{what} is not valid: {value}"
        ))),
    }
}

/// Interprets a format's key/value pairs for the given codec. Unknown keys
/// are ignored. Opus `ptime`/`maxptime` land on the capability itself.
pub(crate) fn parse_format_parameters(
    codec: SupportedCodec,
    fmtp: &Fmtp,
    capability: &mut CodecCapability,
) -> Result<()> {
    let key_values = fmtp.key_values();

    match codec {
        SupportedCodec::Opus => {
            let mut params = OpusCodecParameters::default();
            for (key, value) in &key_values {
                if key.eq_ignore_ascii_case("maxplaybackrate") {
                    params.max_playback_rate = Some(parse_num(value, "opus max playback rate")?);
                } else if key.eq_ignore_ascii_case("sprop-maxcapturerate") {
                    params.sprop_max_capture_rate =
                        Some(parse_num(value, "opus sprop max capture rate")?);
                } else if key.eq_ignore_ascii_case("maxptime") {
                    capability.max_ptime = Some(parse_num(value, "maxptime")?);
                } else if key.eq_ignore_ascii_case("ptime") {
                    capability.ptime = Some(parse_num(value, "ptime")?);
                } else if key.eq_ignore_ascii_case("maxaveragebitrate") {
                    params.max_average_bitrate =
                        Some(parse_num(value, "opus max average bitrate")?);
                } else if key.eq_ignore_ascii_case("stereo") {
                    params.stereo = Some(parse_flag(value, "opus stereo")?);
                } else if key.eq_ignore_ascii_case("sprop-stereo") {
                    params.sprop_stereo = Some(parse_flag(value, "opus sprop-stereo")?);
                } else if key.eq_ignore_ascii_case("cbr") {
                    params.cbr = Some(parse_flag(value, "opus cbr")?);
                } else if key.eq_ignore_ascii_case("useinbandfec") {
                    params.use_inband_fec = Some(parse_flag(value, "opus useinbandfec")?);
                } else if key.eq_ignore_ascii_case("usedtx") {
                    params.use_dtx = Some(parse_flag(value, "opus usedtx")?);
                }
            }
            capability.parameters = Some(CodecParameters::Opus(params));
        }
        SupportedCodec::Vp8 => {
            let mut params = Vp8CodecParameters::default();
            for (key, value) in &key_values {
                if key.eq_ignore_ascii_case("max-fr") {
                    params.max_fr = Some(parse_num(value, "vp8 max-fr")?);
                } else if key.eq_ignore_ascii_case("max-fs") {
                    params.max_fs = Some(parse_num(value, "vp8 max-fs")?);
                }
            }
            capability.parameters = Some(CodecParameters::Vp8(params));
        }
        SupportedCodec::H264 => {
            let mut params = H264CodecParameters::default();
            for (key, value) in &key_values {
                if key.eq_ignore_ascii_case("packetization-mode") {
                    params
                        .packetization_modes
                        .push(parse_num(value, "h264 packetization mode")?);
                } else if key.eq_ignore_ascii_case("profile-level-id") {
                    let id = u32::from_str_radix(value, 16).map_err(|_| {
                        Error::MalformedAttribute(format!(
                            "h264 profile level id is not valid: {value}"
                        ))
                    })?;
                    params.profile_level_id = Some(id);
                } else if key.eq_ignore_ascii_case("max-mbps") {
                    params.max_mbps = Some(parse_num(value, "h264 max-mbps")?);
                } else if key.eq_ignore_ascii_case("max-smbps") {
                    params.max_smbps = Some(parse_num(value, "h264 max-smbps")?);
                } else if key.eq_ignore_ascii_case("max-fs") {
                    params.max_fs = Some(parse_num(value, "h264 max-fs")?);
                } else if key.eq_ignore_ascii_case("max-cpb") {
                    params.max_cpb = Some(parse_num(value, "h264 max-cpb")?);
                } else if key.eq_ignore_ascii_case("max-dpb") {
                    params.max_dpb = Some(parse_num(value, "h264 max-dpb")?);
                } else if key.eq_ignore_ascii_case("max-br") {
                    params.max_br = Some(parse_num(value, "h264 max-br")?);
                }
            }
            capability.parameters = Some(CodecParameters::H264(params));
        }
        SupportedCodec::Rtx => {
            let mut apt = None;
            let mut rtx_time = None;
            for (key, value) in &key_values {
                if key.eq_ignore_ascii_case("apt") {
                    apt = Some(parse_num(value, "rtx apt")?);
                } else if key.eq_ignore_ascii_case("rtx-time") {
                    rtx_time = Some(parse_num(value, "rtx time")?);
                }
            }
            let apt = apt.ok_or_else(|| {
                Error::MissingRequired(format!(
                    "rtx format {} has no apt",
                    capability.preferred_payload_type
                ))
            })?;
            capability.parameters = Some(CodecParameters::Rtx(RtxCodecParameters {
                apt,
                rtx_time,
            }));
        }
        SupportedCodec::FlexFec => {
            let mut params = FlexFecCodecParameters::default();
            let mut found_repair_window = false;
            for (key, value) in &key_values {
                if key.eq_ignore_ascii_case("ToP") {
                    params.top = Some(parse_num(value, "flexfec ToP")?);
                } else if key.eq_ignore_ascii_case("L") {
                    params.l = Some(parse_num(value, "flexfec L")?);
                } else if key.eq_ignore_ascii_case("D") {
                    params.d = Some(parse_num(value, "flexfec D")?);
                } else if key.eq_ignore_ascii_case("repair-window") {
                    params.repair_window = parse_num(value, "flexfec repair window")?;
                    found_repair_window = true;
                }
            }
            if !found_repair_window {
                return Err(Error::MissingRequired(format!(
                    "flexfec format {} has no repair-window",
                    capability.preferred_payload_type
                )));
            }
            capability.parameters = Some(CodecParameters::FlexFec(params));
        }
        _ => {}
    }

    Ok(())
}

/// One RTP header extension a media section offers.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderExtension {
    pub kind: String,
    pub uri: String,
    pub preferred_id: u16,
    pub preferred_encrypt: bool,
}

/// One codec a media section can send or receive.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecCapability {
    pub name: String,
    pub kind: String,
    pub clock_rate: Option<u32>,
    pub preferred_payload_type: u8,
    pub ptime: Option<u64>,
    pub max_ptime: Option<u64>,
    pub num_channels: Option<u32>,
    pub rtcp_feedback: Vec<RtcpFeedback>,
    pub parameters: Option<CodecParameters>,
}

/// Everything one side of a media section can do.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub codecs: Vec<CodecCapability>,
    pub header_extensions: Vec<HeaderExtension>,
    pub fec_mechanisms: Vec<String>,
}

/// One codec entry inside sender parameters.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtpCodecParameters {
    pub name: String,
    pub payload_type: u8,
    pub clock_rate: Option<u32>,
    pub num_channels: Option<u32>,
    pub ptime: Option<u64>,
    pub max_ptime: Option<u64>,
    pub rtcp_feedback: Vec<RtcpFeedback>,
    pub parameters: Option<CodecParameters>,
}

/// One activated header extension inside sender parameters.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderExtensionParameters {
    pub uri: String,
    pub id: u16,
    pub encrypt: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtxEncodingParameters {
    pub ssrc: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FecEncodingParameters {
    pub ssrc: u32,
    pub mechanism: Option<String>,
}

/// How one encoding of a sender is transmitted.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingParameters {
    pub ssrc: Option<u32>,
    pub rtx: Option<RtxEncodingParameters>,
    pub fec: Option<FecEncodingParameters>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcpParameters {
    pub cname: Option<String>,
    pub reduced_size: bool,
    pub mux: bool,
}

/// Parameters a sender is configured with.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtpParameters {
    pub mux_id: String,
    pub codecs: Vec<RtpCodecParameters>,
    pub header_extensions: Vec<HeaderExtensionParameters>,
    pub encodings: Vec<EncodingParameters>,
    pub rtcp: RtcpParameters,
}

/// Turns a capability set into concrete parameters: each codec keeps its
/// preferred payload type and every header extension is activated at its
/// preferred id.
pub fn capabilities_to_parameters(capabilities: &Capabilities) -> RtpParameters {
    RtpParameters {
        mux_id: String::new(),
        codecs: capabilities
            .codecs
            .iter()
            .map(|codec| RtpCodecParameters {
                name: codec.name.clone(),
                payload_type: codec.preferred_payload_type,
                clock_rate: codec.clock_rate,
                num_channels: codec.num_channels,
                ptime: codec.ptime,
                max_ptime: codec.max_ptime,
                rtcp_feedback: codec.rtcp_feedback.clone(),
                parameters: codec.parameters.clone(),
            })
            .collect(),
        header_extensions: capabilities
            .header_extensions
            .iter()
            .map(|ext| HeaderExtensionParameters {
                uri: ext.uri.clone(),
                id: ext.preferred_id,
                encrypt: ext.preferred_encrypt,
            })
            .collect(),
        encodings: vec![],
        rtcp: RtcpParameters::default(),
    }
}

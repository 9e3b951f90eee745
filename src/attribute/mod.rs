use std::fmt;

use crate::error::{Error, Result};

#[cfg(test)]
mod attribute_test;

pub const ATTR_KEY_GROUP: &str = "group";
pub const ATTR_KEY_BUNDLE_ONLY: &str = "bundle-only";
pub const ATTR_KEY_MSID: &str = "msid";
pub const ATTR_KEY_MSID_SEMANTIC: &str = "msid-semantic";
pub const ATTR_KEY_ICE_UFRAG: &str = "ice-ufrag";
pub const ATTR_KEY_ICE_PWD: &str = "ice-pwd";
pub const ATTR_KEY_ICE_OPTIONS: &str = "ice-options";
pub const ATTR_KEY_ICE_LITE: &str = "ice-lite";
pub const ATTR_KEY_CANDIDATE: &str = "candidate";
pub const ATTR_KEY_END_OF_CANDIDATES: &str = "end-of-candidates";
pub const ATTR_KEY_FINGERPRINT: &str = "fingerprint";
pub const ATTR_KEY_CRYPTO: &str = "crypto";
pub const ATTR_KEY_SETUP: &str = "setup";
pub const ATTR_KEY_MID: &str = "mid";
pub const ATTR_KEY_EXTMAP: &str = "extmap";
pub const ATTR_KEY_SEND_RECV: &str = "sendrecv";
pub const ATTR_KEY_SEND_ONLY: &str = "sendonly";
pub const ATTR_KEY_RECV_ONLY: &str = "recvonly";
pub const ATTR_KEY_INACTIVE: &str = "inactive";
pub const ATTR_KEY_RTPMAP: &str = "rtpmap";
pub const ATTR_KEY_FMTP: &str = "fmtp";
pub const ATTR_KEY_RTCP: &str = "rtcp";
pub const ATTR_KEY_RTCP_MUX: &str = "rtcp-mux";
pub const ATTR_KEY_RTCP_FB: &str = "rtcp-fb";
pub const ATTR_KEY_RTCP_RSIZE: &str = "rtcp-rsize";
pub const ATTR_KEY_PTIME: &str = "ptime";
pub const ATTR_KEY_MAX_PTIME: &str = "maxptime";
pub const ATTR_KEY_SSRC: &str = "ssrc";
pub const ATTR_KEY_SSRC_GROUP: &str = "ssrc-group";
pub const ATTR_KEY_SIMULCAST: &str = "simulcast";
pub const ATTR_KEY_RID: &str = "rid";
pub const ATTR_KEY_SCTP_PORT: &str = "sctp-port";
pub const ATTR_KEY_MAX_MESSAGE_SIZE: &str = "max-message-size";

/// LineType is the single-letter tag of a recognized SDP line. Lines with
/// any other tag are dropped during tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Version,
    Origin,
    SessionName,
    Bandwidth,
    Timing,
    Attribute,
    Media,
    Connection,
}

impl LineType {
    pub fn from_byte(b: u8) -> Option<LineType> {
        match b {
            b'v' => Some(LineType::Version),
            b'o' => Some(LineType::Origin),
            b's' => Some(LineType::SessionName),
            b'b' => Some(LineType::Bandwidth),
            b't' => Some(LineType::Timing),
            b'a' => Some(LineType::Attribute),
            b'm' => Some(LineType::Media),
            b'c' => Some(LineType::Connection),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            LineType::Version => 'v',
            LineType::Origin => 'o',
            LineType::SessionName => 's',
            LineType::Bandwidth => 'b',
            LineType::Timing => 't',
            LineType::Attribute => 'a',
            LineType::Media => 'm',
            LineType::Connection => 'c',
        }
    }

    /// The levels at which this line type is legal.
    pub fn allowed_scopes(self) -> ScopeMask {
        match self {
            LineType::Version
            | LineType::Origin
            | LineType::SessionName
            | LineType::Timing
            | LineType::Media => ScopeMask::SESSION,
            LineType::Bandwidth | LineType::Connection => ScopeMask::SESSION_AND_MEDIA,
            LineType::Attribute => ScopeMask::ALL,
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Attribute identifies a recognized `a=` name. Names are matched
/// case-sensitively; anything else becomes [`Attribute::Unknown`] and is
/// ignored with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Unknown,
    Group,
    BundleOnly,
    Msid,
    MsidSemantic,
    IceUfrag,
    IcePwd,
    IceOptions,
    IceLite,
    Candidate,
    EndOfCandidates,
    Fingerprint,
    Crypto,
    Setup,
    Mid,
    Extmap,
    SendRecv,
    SendOnly,
    RecvOnly,
    Inactive,
    RtpMap,
    Fmtp,
    Rtcp,
    RtcpMux,
    RtcpFb,
    RtcpRsize,
    PTime,
    MaxPTime,
    Ssrc,
    SsrcGroup,
    Simulcast,
    Rid,
    SctpPort,
    MaxMessageSize,
}

impl Attribute {
    pub fn from_name(name: &str) -> Attribute {
        match name {
            ATTR_KEY_GROUP => Attribute::Group,
            ATTR_KEY_BUNDLE_ONLY => Attribute::BundleOnly,
            ATTR_KEY_MSID => Attribute::Msid,
            ATTR_KEY_MSID_SEMANTIC => Attribute::MsidSemantic,
            ATTR_KEY_ICE_UFRAG => Attribute::IceUfrag,
            ATTR_KEY_ICE_PWD => Attribute::IcePwd,
            ATTR_KEY_ICE_OPTIONS => Attribute::IceOptions,
            ATTR_KEY_ICE_LITE => Attribute::IceLite,
            ATTR_KEY_CANDIDATE => Attribute::Candidate,
            ATTR_KEY_END_OF_CANDIDATES => Attribute::EndOfCandidates,
            ATTR_KEY_FINGERPRINT => Attribute::Fingerprint,
            ATTR_KEY_CRYPTO => Attribute::Crypto,
            ATTR_KEY_SETUP => Attribute::Setup,
            ATTR_KEY_MID => Attribute::Mid,
            ATTR_KEY_EXTMAP => Attribute::Extmap,
            ATTR_KEY_SEND_RECV => Attribute::SendRecv,
            ATTR_KEY_SEND_ONLY => Attribute::SendOnly,
            ATTR_KEY_RECV_ONLY => Attribute::RecvOnly,
            ATTR_KEY_INACTIVE => Attribute::Inactive,
            ATTR_KEY_RTPMAP => Attribute::RtpMap,
            ATTR_KEY_FMTP => Attribute::Fmtp,
            ATTR_KEY_RTCP => Attribute::Rtcp,
            ATTR_KEY_RTCP_MUX => Attribute::RtcpMux,
            ATTR_KEY_RTCP_FB => Attribute::RtcpFb,
            ATTR_KEY_RTCP_RSIZE => Attribute::RtcpRsize,
            ATTR_KEY_PTIME => Attribute::PTime,
            ATTR_KEY_MAX_PTIME => Attribute::MaxPTime,
            ATTR_KEY_SSRC => Attribute::Ssrc,
            ATTR_KEY_SSRC_GROUP => Attribute::SsrcGroup,
            ATTR_KEY_SIMULCAST => Attribute::Simulcast,
            ATTR_KEY_RID => Attribute::Rid,
            ATTR_KEY_SCTP_PORT => Attribute::SctpPort,
            ATTR_KEY_MAX_MESSAGE_SIZE => Attribute::MaxMessageSize,
            _ => Attribute::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Unknown => "",
            Attribute::Group => ATTR_KEY_GROUP,
            Attribute::BundleOnly => ATTR_KEY_BUNDLE_ONLY,
            Attribute::Msid => ATTR_KEY_MSID,
            Attribute::MsidSemantic => ATTR_KEY_MSID_SEMANTIC,
            Attribute::IceUfrag => ATTR_KEY_ICE_UFRAG,
            Attribute::IcePwd => ATTR_KEY_ICE_PWD,
            Attribute::IceOptions => ATTR_KEY_ICE_OPTIONS,
            Attribute::IceLite => ATTR_KEY_ICE_LITE,
            Attribute::Candidate => ATTR_KEY_CANDIDATE,
            Attribute::EndOfCandidates => ATTR_KEY_END_OF_CANDIDATES,
            Attribute::Fingerprint => ATTR_KEY_FINGERPRINT,
            Attribute::Crypto => ATTR_KEY_CRYPTO,
            Attribute::Setup => ATTR_KEY_SETUP,
            Attribute::Mid => ATTR_KEY_MID,
            Attribute::Extmap => ATTR_KEY_EXTMAP,
            Attribute::SendRecv => ATTR_KEY_SEND_RECV,
            Attribute::SendOnly => ATTR_KEY_SEND_ONLY,
            Attribute::RecvOnly => ATTR_KEY_RECV_ONLY,
            Attribute::Inactive => ATTR_KEY_INACTIVE,
            Attribute::RtpMap => ATTR_KEY_RTPMAP,
            Attribute::Fmtp => ATTR_KEY_FMTP,
            Attribute::Rtcp => ATTR_KEY_RTCP,
            Attribute::RtcpMux => ATTR_KEY_RTCP_MUX,
            Attribute::RtcpFb => ATTR_KEY_RTCP_FB,
            Attribute::RtcpRsize => ATTR_KEY_RTCP_RSIZE,
            Attribute::PTime => ATTR_KEY_PTIME,
            Attribute::MaxPTime => ATTR_KEY_MAX_PTIME,
            Attribute::Ssrc => ATTR_KEY_SSRC,
            Attribute::SsrcGroup => ATTR_KEY_SSRC_GROUP,
            Attribute::Simulcast => ATTR_KEY_SIMULCAST,
            Attribute::Rid => ATTR_KEY_RID,
            Attribute::SctpPort => ATTR_KEY_SCTP_PORT,
            Attribute::MaxMessageSize => ATTR_KEY_MAX_MESSAGE_SIZE,
        }
    }

    /// True when the attribute must carry a value after the `:`.
    pub fn requires_value(self) -> bool {
        !matches!(
            self,
            Attribute::Unknown
                | Attribute::BundleOnly
                | Attribute::IceLite
                | Attribute::EndOfCandidates
                | Attribute::SendRecv
                | Attribute::SendOnly
                | Attribute::RecvOnly
                | Attribute::Inactive
                | Attribute::RtcpMux
                | Attribute::RtcpRsize
        )
    }

    /// True when the attribute is a bare flag and must not carry a value.
    pub fn requires_empty_value(self) -> bool {
        matches!(
            self,
            Attribute::BundleOnly
                | Attribute::IceLite
                | Attribute::EndOfCandidates
                | Attribute::SendRecv
                | Attribute::SendOnly
                | Attribute::RecvOnly
                | Attribute::Inactive
                | Attribute::RtcpMux
                | Attribute::RtcpRsize
        )
    }

    /// The levels at which this attribute is legal.
    pub fn allowed_scopes(self) -> ScopeMask {
        match self {
            Attribute::Unknown => ScopeMask::ALL,
            Attribute::Group
            | Attribute::IceOptions
            | Attribute::IceLite
            | Attribute::MsidSemantic => ScopeMask::SESSION,
            Attribute::IceUfrag
            | Attribute::IcePwd
            | Attribute::Fingerprint
            | Attribute::Setup
            | Attribute::Extmap
            | Attribute::SendRecv
            | Attribute::SendOnly
            | Attribute::RecvOnly
            | Attribute::Inactive => ScopeMask::SESSION_AND_MEDIA,
            Attribute::Fmtp => ScopeMask::MEDIA_AND_SOURCE,
            _ => ScopeMask::MEDIA,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Scope is the level an individual line was found at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Session,
    Media,
    Source,
}

impl Scope {
    fn bit(self) -> u8 {
        match self {
            Scope::Session => 0b001,
            Scope::Media => 0b010,
            Scope::Source => 0b100,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Scope::Session => "session",
            Scope::Media => "media",
            Scope::Source => "source",
        };
        write!(f, "{s}")
    }
}

/// ScopeMask is the set of levels a line type or attribute is legal at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeMask(u8);

impl ScopeMask {
    pub const SESSION: ScopeMask = ScopeMask(0b001);
    pub const MEDIA: ScopeMask = ScopeMask(0b010);
    pub const SOURCE: ScopeMask = ScopeMask(0b100);
    pub const SESSION_AND_MEDIA: ScopeMask = ScopeMask(0b011);
    pub const MEDIA_AND_SOURCE: ScopeMask = ScopeMask(0b110);
    pub const ALL: ScopeMask = ScopeMask(0b111);

    pub fn allows(self, scope: Scope) -> bool {
        self.0 & scope.bit() != 0
    }
}

/// Splits an `a=` line value into `(name, value)` at the first `:`.
///
/// Whitespace terminates the name; stray whitespace around the `:` is
/// tolerated, and leading whitespace in the value is skipped. A name
/// followed by non-whitespace garbage instead of a `:` is malformed.
pub fn split_attribute(raw: &str) -> Result<(&str, Option<&str>)> {
    let name_end = raw
        .find(|c: char| c == ':' || c.is_whitespace())
        .unwrap_or(raw.len());
    let name = &raw[..name_end];
    let mut rest = raw[name_end..].trim_start();

    if rest.is_empty() {
        return Ok((name, None));
    }
    if !rest.starts_with(':') {
        return Err(Error::MalformedAttribute(format!(
            "attribute name is not followed by a value: {raw}"
        )));
    }
    rest = rest[1..].trim_start();
    if rest.is_empty() {
        Ok((name, None))
    } else {
        Ok((name, Some(rest)))
    }
}

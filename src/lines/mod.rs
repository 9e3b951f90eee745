//! Typed values for each recognized SDP line and `a=` attribute.
//!
//! Every parser takes the raw value text (everything after `x=` or after the
//! attribute `:`) and produces an owned value object, or a
//! [`MalformedAttribute`](crate::Error::MalformedAttribute) naming the
//! offending token. Splitting is on whitespace unless the grammar says
//! otherwise; consecutive separators collapse.

use std::fmt;

use url::Url;

use crate::direction::Direction;
use crate::error::{parse_num, Error, Result};

#[cfg(test)]
mod lines_test;

/// A parsed line value, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum LineValue {
    Version(u64),
    Origin(Origin),
    SessionName(String),
    Timing(Timing),
    Connection(Connection),
    Bandwidth(Bandwidth),
    /// Index of the media line in the document arena.
    Media(usize),
    Group(Group),
    MsidSemantic(Group),
    Msid(Msid),
    IceUfrag(String),
    IcePwd(String),
    IceOptions(IceOptions),
    Candidate(Candidate),
    Fingerprint(Fingerprint),
    Crypto(Crypto),
    Setup(String),
    Mid(String),
    Extmap(Extmap),
    Direction(Direction),
    RtpMap(RtpMap),
    Fmtp(Fmtp),
    Rtcp(Rtcp),
    RtcpFb(RtcpFb),
    PTime(u64),
    MaxPTime(u64),
    Ssrc(Ssrc),
    SsrcGroup(SsrcGroup),
    Simulcast(Simulcast),
    Rid(Rid),
    SctpPort(u16),
    MaxMessageSize(u64),
}

/// `v=0`
///
/// Any other version may not be correctly understood and fails the parse.
pub fn parse_version(value: &str) -> Result<u64> {
    let trimmed = value.trim();
    let version: u64 = trimmed
        .parse()
        .map_err(|_| Error::UnsupportedVersion(trimmed.to_owned()))?;
    if version != 0 {
        return Err(Error::UnsupportedVersion(trimmed.to_owned()));
    }
    Ok(version)
}

/// `o=<username> <sess-id> <sess-version> <nettype> <addrtype> <unicast-address>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub username: String,
    pub session_id: u64,
    pub session_version: u64,
    pub net_type: String,
    pub addr_type: String,
    pub unicast_address: String,
}

impl Origin {
    pub fn parse(value: &str) -> Result<Origin> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() != 6 {
            return Err(Error::MalformedAttribute(format!(
                "origin line needs 6 fields: {value}"
            )));
        }
        Ok(Origin {
            username: split[0].to_owned(),
            session_id: parse_num(split[1], "session id")?,
            session_version: parse_num(split[2], "session version")?,
            net_type: split[3].to_owned(),
            addr_type: split[4].to_owned(),
            unicast_address: split[5].to_owned(),
        })
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.username,
            self.session_id,
            self.session_version,
            self.net_type,
            self.addr_type,
            self.unicast_address,
        )
    }
}

/// `t=<start-time> <stop-time>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub start_time: u64,
    pub end_time: u64,
}

impl Timing {
    pub fn parse(value: &str) -> Result<Timing> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() != 2 {
            return Err(Error::MalformedAttribute(format!(
                "timing line needs 2 fields: {value}"
            )));
        }
        Ok(Timing {
            start_time: parse_num(split[0], "start time")?,
            end_time: parse_num(split[1], "end time")?,
        })
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.start_time, self.end_time)
    }
}

/// `c=<nettype> <addrtype> <connection-address>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub net_type: String,
    pub addr_type: String,
    pub connection_address: String,
}

impl Connection {
    pub fn parse(value: &str) -> Result<Connection> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() != 3 {
            return Err(Error::MalformedAttribute(format!(
                "connection line needs 3 fields: {value}"
            )));
        }
        Ok(Connection {
            net_type: split[0].to_owned(),
            addr_type: split[1].to_owned(),
            connection_address: split[2].to_owned(),
        })
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.net_type, self.addr_type, self.connection_address
        )
    }
}

/// `b=<bwtype>:<bandwidth>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bandwidth {
    pub bw_type: String,
    pub bandwidth: u64,
}

impl Bandwidth {
    pub fn parse(value: &str) -> Result<Bandwidth> {
        let split: Vec<&str> = value.split(':').map(str::trim).collect();
        if split.len() != 2 {
            return Err(Error::MalformedAttribute(format!(
                "bandwidth line needs type:value: {value}"
            )));
        }
        Ok(Bandwidth {
            bw_type: split[0].to_owned(),
            bandwidth: parse_num(split[1], "bandwidth")?,
        })
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.bw_type, self.bandwidth)
    }
}

/// ProtocolType classifies a media line's transport protocol token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolType {
    Unknown,
    Rtp,
    Sctp,
}

impl ProtocolType {
    /// Derives the protocol type from a proto token such as
    /// `UDP/TLS/RTP/SAVPF` or `UDP/DTLS/SCTP`. Fewer than two `/`-separated
    /// parts is malformed; unrecognized combinations are `Unknown`.
    pub fn from_proto(proto: &str) -> Result<ProtocolType> {
        let split: Vec<&str> = proto.split('/').collect();
        if split.len() < 2 {
            return Err(Error::MalformedAttribute(format!(
                "protocol needs at least 2 parts: {proto}"
            )));
        }

        if split[0].eq_ignore_ascii_case("RTP") {
            let known = ["AVP", "SAVP", "AVPF", "SAVPF"]
                .iter()
                .any(|p| split[1].eq_ignore_ascii_case(p));
            return Ok(if known {
                ProtocolType::Rtp
            } else {
                ProtocolType::Unknown
            });
        }
        if split[0].eq_ignore_ascii_case("DTLS") {
            return Ok(if split[1].eq_ignore_ascii_case("SCTP") {
                ProtocolType::Sctp
            } else {
                ProtocolType::Unknown
            });
        }

        if split.len() < 3 {
            return Ok(ProtocolType::Unknown);
        }
        if !split[0].eq_ignore_ascii_case("UDP") && !split[0].eq_ignore_ascii_case("TCP") {
            return Ok(ProtocolType::Unknown);
        }
        if split[1].eq_ignore_ascii_case("DTLS") {
            return Ok(if split[2].eq_ignore_ascii_case("SCTP") {
                ProtocolType::Sctp
            } else {
                ProtocolType::Unknown
            });
        }

        if split.len() < 4 {
            return Ok(ProtocolType::Unknown);
        }
        let secure = split[3].eq_ignore_ascii_case("SAVP") || split[3].eq_ignore_ascii_case("SAVPF");
        Ok(if secure {
            ProtocolType::Rtp
        } else {
            ProtocolType::Unknown
        })
    }
}

/// `m=<media> <port>[/<number of ports>] <proto> <fmt> ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaName {
    pub media: String,
    pub port: u16,
    pub port_count: Option<u16>,
    pub proto_str: String,
    pub proto: ProtocolType,
    pub formats: Vec<String>,
}

impl MediaName {
    pub fn parse(value: &str) -> Result<MediaName> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 4 {
            return Err(Error::MalformedAttribute(format!(
                "media line needs at least 4 fields: {value}"
            )));
        }

        let port_split: Vec<&str> = split[1].split('/').collect();
        if port_split.is_empty() || port_split.len() > 2 {
            return Err(Error::MalformedAttribute(format!(
                "media port is not valid: {}",
                split[1]
            )));
        }
        let port = parse_num(port_split[0], "port")?;
        let port_count = if port_split.len() > 1 {
            Some(parse_num(port_split[1], "port count")?)
        } else {
            None
        };

        Ok(MediaName {
            media: split[0].to_owned(),
            port,
            port_count,
            proto_str: split[2].to_owned(),
            proto: ProtocolType::from_proto(split[2])?,
            formats: split[3..].iter().map(|s| (*s).to_owned()).collect(),
        })
    }
}

impl fmt::Display for MediaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.media, self.port)?;
        if let Some(count) = self.port_count {
            write!(f, "/{count}")?;
        }
        write!(f, " {}", self.proto_str)?;
        for format in &self.formats {
            write!(f, " {format}")?;
        }
        Ok(())
    }
}

/// `a=group:<semantics> <identification-tag> ...`, also the shape of
/// `a=msid-semantic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub semantic: String,
    pub identification_tags: Vec<String>,
}

impl Group {
    pub fn parse(value: &str) -> Result<Group> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.is_empty() {
            return Err(Error::MalformedAttribute(format!(
                "group needs a semantic: {value}"
            )));
        }
        Ok(Group {
            semantic: split[0].to_owned(),
            identification_tags: split[1..].iter().map(|s| (*s).to_owned()).collect(),
        })
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.semantic)?;
        for tag in &self.identification_tags {
            write!(f, " {tag}")?;
        }
        Ok(())
    }
}

/// `a=msid:<id> [<app-data>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Msid {
    pub id: String,
    pub app_data: Option<String>,
}

impl Msid {
    pub fn parse(value: &str) -> Result<Msid> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.is_empty() || split.len() > 2 {
            return Err(Error::MalformedAttribute(format!(
                "msid needs 1 or 2 fields: {value}"
            )));
        }
        Ok(Msid {
            id: split[0].to_owned(),
            app_data: split.get(1).map(|s| (*s).to_owned()),
        })
    }
}

impl fmt::Display for Msid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(app_data) = &self.app_data {
            write!(f, " {app_data}")?;
        }
        Ok(())
    }
}

/// `a=ice-options:<tag> ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceOptions {
    pub tags: Vec<String>,
}

impl IceOptions {
    pub fn parse(value: &str) -> Result<IceOptions> {
        let tags: Vec<String> = value.split_whitespace().map(str::to_owned).collect();
        if tags.is_empty() {
            return Err(Error::MalformedAttribute(format!(
                "ice-options needs at least one tag: {value}"
            )));
        }
        Ok(IceOptions { tags })
    }
}

impl fmt::Display for IceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.join(" "))
    }
}

/// `a=candidate:<foundation> <component-id> <transport> <priority>
/// <connection-address> <port> typ <candidate-type>
/// [raddr <address>] [rport <port>] *(<ext-name> <ext-value>)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub foundation: String,
    pub component_id: u32,
    pub transport: String,
    pub priority: u64,
    pub connection_address: String,
    pub port: u16,
    pub candidate_type: String,
    pub rel_addr: Option<String>,
    pub rel_port: Option<u16>,
    pub extension_pairs: Vec<(String, String)>,
}

impl Candidate {
    pub fn parse(value: &str) -> Result<Candidate> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 8 {
            return Err(Error::MalformedAttribute(format!(
                "candidate needs at least 8 fields: {value}"
            )));
        }
        if !split[6].eq_ignore_ascii_case("typ") {
            return Err(Error::MalformedAttribute(format!(
                "candidate is missing the typ keyword: {value}"
            )));
        }

        let mut candidate = Candidate {
            foundation: split[0].to_owned(),
            component_id: parse_num(split[1], "component id")?,
            transport: split[2].to_owned(),
            priority: parse_num(split[3], "priority")?,
            connection_address: split[4].to_owned(),
            port: parse_num(split[5], "port")?,
            candidate_type: split[7].to_owned(),
            rel_addr: None,
            rel_port: None,
            extension_pairs: vec![],
        };

        let mut index = 8;
        if index + 1 < split.len() && split[index].eq_ignore_ascii_case("raddr") {
            candidate.rel_addr = Some(split[index + 1].to_owned());
            index += 2;
        }
        if index + 1 < split.len() && split[index].eq_ignore_ascii_case("rport") {
            candidate.rel_port = Some(parse_num(split[index + 1], "rel port")?);
            index += 2;
        }

        let trailing = &split[index..];
        if trailing.len() % 2 != 0 {
            return Err(Error::MalformedAttribute(format!(
                "candidate extensions do not pair up: {value}"
            )));
        }
        for pair in trailing.chunks(2) {
            candidate
                .extension_pairs
                .push((pair[0].to_owned(), pair[1].to_owned()));
        }

        Ok(candidate)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} typ {}",
            self.foundation,
            self.component_id,
            self.transport,
            self.priority,
            self.connection_address,
            self.port,
            self.candidate_type,
        )?;
        if let Some(rel_addr) = &self.rel_addr {
            write!(f, " raddr {rel_addr}")?;
        }
        if let Some(rel_port) = self.rel_port {
            write!(f, " rport {rel_port}")?;
        }
        for (key, val) in &self.extension_pairs {
            write!(f, " {key} {val}")?;
        }
        Ok(())
    }
}

/// `a=fingerprint:<hash-func> <fingerprint>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub hash_func: String,
    pub fingerprint: String,
}

impl Fingerprint {
    pub fn parse(value: &str) -> Result<Fingerprint> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() != 2 {
            return Err(Error::MalformedAttribute(format!(
                "fingerprint needs 2 fields: {value}"
            )));
        }
        Ok(Fingerprint {
            hash_func: split[0].to_owned(),
            fingerprint: split[1].to_owned(),
        })
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.hash_func, self.fingerprint)
    }
}

/// `a=crypto:<tag> <crypto-suite> <key-params>[;<key-params>] [<session-param> ...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crypto {
    pub tag: u64,
    pub suite: String,
    /// `(key-method, key-info)` pairs split at the `:`.
    pub key_params: Vec<(String, String)>,
    pub session_params: Vec<String>,
}

impl Crypto {
    pub fn parse(value: &str) -> Result<Crypto> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 3 {
            return Err(Error::MalformedAttribute(format!(
                "crypto needs at least 3 fields: {value}"
            )));
        }

        let mut key_params = Vec::new();
        for key_param in split[2].split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let method_info: Vec<&str> = key_param.splitn(2, ':').collect();
            if method_info.len() != 2 || method_info[1].is_empty() {
                return Err(Error::MalformedAttribute(format!(
                    "crypto key param needs method:info: {key_param}"
                )));
            }
            key_params.push((method_info[0].to_owned(), method_info[1].to_owned()));
        }
        if key_params.is_empty() {
            return Err(Error::MalformedAttribute(format!(
                "crypto needs at least one key param: {value}"
            )));
        }

        Ok(Crypto {
            tag: parse_num(split[0], "tag")?,
            suite: split[1].to_owned(),
            key_params,
            session_params: split[3..].iter().map(|s| (*s).to_owned()).collect(),
        })
    }
}

impl fmt::Display for Crypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_params: Vec<String> = self
            .key_params
            .iter()
            .map(|(method, info)| format!("{method}:{info}"))
            .collect();
        write!(f, "{} {} {}", self.tag, self.suite, key_params.join(";"))?;
        for param in &self.session_params {
            write!(f, " {param}")?;
        }
        Ok(())
    }
}

/// `a=extmap:<id>[/<direction>] <uri> [<ext-attributes>]`
#[derive(Debug, Clone, PartialEq)]
pub struct Extmap {
    pub id: u32,
    pub direction: Direction,
    pub uri: Url,
    pub ext_attributes: Option<String>,
}

impl Extmap {
    pub fn parse(value: &str) -> Result<Extmap> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 2 {
            return Err(Error::MalformedAttribute(format!(
                "extmap needs at least 2 fields: {value}"
            )));
        }

        let entry: Vec<&str> = split[0].split('/').collect();
        let id = parse_num(entry[0], "extmap id")?;
        let direction = if entry.len() > 1 {
            // inactive makes no sense on a header extension
            Direction::parse_restricted(entry[1], false, true)?
        } else {
            Direction::SendRecv
        };

        let uri = Url::parse(split[1])
            .map_err(|_| Error::MalformedAttribute(format!("extmap uri is not valid: {}", split[1])))?;

        let ext_attributes = if split.len() > 2 {
            Some(split[2..].join(" "))
        } else {
            None
        };

        Ok(Extmap {
            id,
            direction,
            uri,
            ext_attributes,
        })
    }
}

impl fmt::Display for Extmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if self.direction != Direction::SendRecv {
            write!(f, "/{}", self.direction)?;
        }
        write!(f, " {}", self.uri)?;
        if let Some(attrs) = &self.ext_attributes {
            write!(f, " {attrs}")?;
        }
        Ok(())
    }
}

/// `a=rtpmap:<payload type> <encoding name>[/<clock rate>[/<encoding parameters>]]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpMap {
    pub payload_type: u8,
    pub encoding_name: String,
    pub clock_rate: Option<u32>,
    pub encoding_params: Option<u32>,
}

impl RtpMap {
    pub fn parse(value: &str) -> Result<RtpMap> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() != 2 {
            return Err(Error::MalformedAttribute(format!(
                "rtpmap needs 2 fields: {value}"
            )));
        }

        let encoding: Vec<&str> = split[1].split('/').collect();
        if encoding.is_empty() || encoding[0].is_empty() {
            return Err(Error::MalformedAttribute(format!(
                "rtpmap encoding is not valid: {}",
                split[1]
            )));
        }

        Ok(RtpMap {
            payload_type: parse_num(split[0], "payload type")?,
            encoding_name: encoding[0].to_owned(),
            clock_rate: if encoding.len() > 1 {
                Some(parse_num(encoding[1], "clock rate")?)
            } else {
                None
            },
            encoding_params: if encoding.len() > 2 {
                Some(parse_num(encoding[2], "encoding parameters")?)
            } else {
                None
            },
        })
    }
}

impl fmt::Display for RtpMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.payload_type, self.encoding_name)?;
        if let Some(clock_rate) = self.clock_rate {
            write!(f, "/{clock_rate}")?;
        }
        if let Some(params) = self.encoding_params {
            write!(f, "/{params}")?;
        }
        Ok(())
    }
}

/// `a=fmtp:<format> <format specific parameters>`
///
/// The parameters are kept as the raw whitespace-separated tokens; codec
/// specific interpretation happens during lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fmtp {
    pub format: u8,
    pub format_specific: Vec<String>,
}

impl Fmtp {
    pub fn parse(value: &str) -> Result<Fmtp> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 2 {
            return Err(Error::MalformedAttribute(format!(
                "fmtp needs a format and parameters: {value}"
            )));
        }
        Ok(Fmtp {
            format: parse_num(split[0], "format")?,
            format_specific: split[1..].iter().map(|s| (*s).to_owned()).collect(),
        })
    }

    /// The parameter tokens re-joined and split into `key[=value]` pairs on
    /// `;`. Unknown keys are left for the caller to ignore.
    pub fn key_values(&self) -> Vec<(String, String)> {
        self.format_specific
            .join(";")
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|kv| {
                let mut it = kv.splitn(2, '=');
                let key = it.next().unwrap_or_default().trim().to_owned();
                let val = it.next().unwrap_or_default().trim().to_owned();
                (key, val)
            })
            .collect()
    }
}

impl fmt::Display for Fmtp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.format, self.format_specific.join(" "))
    }
}

/// `a=rtcp:<port> [<nettype> <addrtype> <connection-address>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rtcp {
    pub port: u16,
    pub net_type: Option<String>,
    pub addr_type: Option<String>,
    pub connection_address: Option<String>,
}

impl Rtcp {
    pub fn parse(value: &str) -> Result<Rtcp> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.is_empty() {
            return Err(Error::MalformedAttribute(format!(
                "rtcp needs a port: {value}"
            )));
        }
        if split.len() != 1 && split.len() != 4 {
            return Err(Error::MalformedAttribute(format!(
                "rtcp connection data needs 3 fields: {value}"
            )));
        }
        Ok(Rtcp {
            port: parse_num(split[0], "rtcp port")?,
            net_type: split.get(1).map(|s| (*s).to_owned()),
            addr_type: split.get(2).map(|s| (*s).to_owned()),
            connection_address: split.get(3).map(|s| (*s).to_owned()),
        })
    }
}

impl fmt::Display for Rtcp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.port)?;
        if let (Some(net), Some(addr), Some(conn)) =
            (&self.net_type, &self.addr_type, &self.connection_address)
        {
            write!(f, " {net} {addr} {conn}")?;
        }
        Ok(())
    }
}

/// `a=rtcp-fb:<payload type|*> <id> [<param1> [<param2>]]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtcpFb {
    /// `None` for the wildcard `*`.
    pub payload_type: Option<u8>,
    pub id: String,
    pub param1: Option<String>,
    pub param2: Option<String>,
}

impl RtcpFb {
    pub fn parse(value: &str) -> Result<RtcpFb> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 2 || split.len() > 4 {
            return Err(Error::MalformedAttribute(format!(
                "rtcp-fb needs 2 to 4 fields: {value}"
            )));
        }

        let payload_type = if split[0] == "*" {
            None
        } else {
            Some(parse_num(split[0], "rtcp-fb payload type")?)
        };

        Ok(RtcpFb {
            payload_type,
            id: split[1].to_owned(),
            param1: split.get(2).map(|s| (*s).to_owned()),
            param2: split.get(3).map(|s| (*s).to_owned()),
        })
    }
}

impl fmt::Display for RtcpFb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload_type {
            Some(pt) => write!(f, "{pt}")?,
            None => write!(f, "*")?,
        }
        write!(f, " {}", self.id)?;
        if let Some(param1) = &self.param1 {
            write!(f, " {param1}")?;
        }
        if let Some(param2) = &self.param2 {
            write!(f, " {param2}")?;
        }
        Ok(())
    }
}

/// `a=ssrc:<ssrc-id> <attribute>[:<value>] ...`
///
/// The attribute token is split at its first `:`; any colon value plus the
/// remaining whitespace-separated fields form the value list. Source-level
/// `a=fmtp` lines that follow are folded into [`Ssrc::fmtps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ssrc {
    pub ssrc: u32,
    pub attribute: String,
    colon_value: Option<String>,
    trailing_values: Vec<String>,
    pub fmtps: Vec<Fmtp>,
}

impl Ssrc {
    pub fn new(ssrc: u32, attribute: &str, values: &[String]) -> Ssrc {
        Ssrc {
            ssrc,
            attribute: attribute.to_owned(),
            colon_value: values.first().cloned(),
            trailing_values: values.iter().skip(1).cloned().collect(),
            fmtps: vec![],
        }
    }

    pub fn parse(value: &str) -> Result<Ssrc> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 2 {
            return Err(Error::MalformedAttribute(format!(
                "ssrc needs at least 2 fields: {value}"
            )));
        }

        let mut attr_split = split[1].splitn(2, ':');
        let attribute = attr_split.next().unwrap_or_default().to_owned();
        let colon_value = attr_split.next().map(str::to_owned);

        Ok(Ssrc {
            ssrc: parse_num(split[0], "ssrc")?,
            attribute,
            colon_value,
            trailing_values: split[2..].iter().map(|s| (*s).to_owned()).collect(),
            fmtps: vec![],
        })
    }

    /// The attribute values: the colon value (if any) followed by the
    /// trailing fields.
    pub fn attribute_values(&self) -> Vec<&str> {
        self.colon_value
            .iter()
            .map(String::as_str)
            .chain(self.trailing_values.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Ssrc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ssrc, self.attribute)?;
        if let Some(colon_value) = &self.colon_value {
            write!(f, ":{colon_value}")?;
        }
        for value in &self.trailing_values {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

/// `a=ssrc-group:<semantics> <ssrc-id> ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsrcGroup {
    pub semantics: String,
    pub ssrcs: Vec<u32>,
}

impl SsrcGroup {
    pub fn parse(value: &str) -> Result<SsrcGroup> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 2 {
            return Err(Error::MalformedAttribute(format!(
                "ssrc-group needs at least 2 fields: {value}"
            )));
        }
        let mut ssrcs = Vec::with_capacity(split.len() - 1);
        for token in &split[1..] {
            ssrcs.push(parse_num(token, "ssrc-group ssrc")?);
        }
        Ok(SsrcGroup {
            semantics: split[0].to_owned(),
            ssrcs,
        })
    }
}

impl fmt::Display for SsrcGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.semantics)?;
        for ssrc in &self.ssrcs {
            write!(f, " {ssrc}")?;
        }
        Ok(())
    }
}

/// One stream identifier inside a simulcast alternative, optionally paused
/// with a `~` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulcastStream {
    pub rid: String,
    pub paused: bool,
}

/// One direction entry of a simulcast line: `;`-separated alternatives,
/// each a `,`-separated list of stream ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulcastEntry {
    pub direction: Direction,
    pub alternatives: Vec<Vec<SimulcastStream>>,
}

/// `a=simulcast:<direction> <alt-list> [<direction> <alt-list>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulcast {
    pub entries: Vec<SimulcastEntry>,
}

impl Simulcast {
    pub fn parse(value: &str) -> Result<Simulcast> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 2 || split.len() % 2 != 0 {
            return Err(Error::MalformedAttribute(format!(
                "simulcast needs direction/list pairs: {value}"
            )));
        }

        let mut entries = Vec::with_capacity(split.len() / 2);
        for pair in split.chunks(2) {
            let direction = Direction::parse_restricted(pair[0], false, false)?;

            let mut alternatives = Vec::new();
            for alt in pair[1].split(';').map(str::trim).filter(|s| !s.is_empty()) {
                let mut streams = Vec::new();
                for scid in alt.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    if let Some(rid) = scid.strip_prefix('~') {
                        streams.push(SimulcastStream {
                            rid: rid.to_owned(),
                            paused: true,
                        });
                    } else {
                        streams.push(SimulcastStream {
                            rid: scid.to_owned(),
                            paused: false,
                        });
                    }
                }
                if streams.is_empty() {
                    return Err(Error::MalformedAttribute(format!(
                        "simulcast alternative is empty: {value}"
                    )));
                }
                alternatives.push(streams);
            }
            if alternatives.is_empty() {
                return Err(Error::MalformedAttribute(format!(
                    "simulcast list is empty: {value}"
                )));
            }

            entries.push(SimulcastEntry {
                direction,
                alternatives,
            });
        }

        Ok(Simulcast { entries })
    }
}

impl fmt::Display for Simulcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            if !first {
                write!(f, " ")?;
            }
            first = false;

            let alts: Vec<String> = entry
                .alternatives
                .iter()
                .map(|streams| {
                    streams
                        .iter()
                        .map(|s| {
                            if s.paused {
                                format!("~{}", s.rid)
                            } else {
                                s.rid.clone()
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .collect();
            write!(f, "{} {}", entry.direction, alts.join(";"))?;
        }
        Ok(())
    }
}

/// `a=rid:<id> <direction> <restriction>[;<restriction>]`
///
/// A `pt=` restriction carries a comma-separated payload type list; every
/// other restriction is kept as a key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rid {
    pub id: String,
    pub direction: Direction,
    pub params: Vec<(String, String)>,
    pub payload_types: Vec<u8>,
}

impl Rid {
    pub fn parse(value: &str) -> Result<Rid> {
        let split: Vec<&str> = value.split_whitespace().collect();
        if split.len() < 3 {
            return Err(Error::MalformedAttribute(format!(
                "rid needs id, direction and restrictions: {value}"
            )));
        }

        let direction = Direction::parse_restricted(split[1], false, false)?;

        let mut params = Vec::new();
        let mut payload_types = Vec::new();
        for param in split[2].split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let key_value: Vec<&str> = param.splitn(2, '=').map(str::trim).collect();
            if key_value[0] == "pt" {
                if key_value.len() < 2 || key_value[1].is_empty() {
                    return Err(Error::MalformedAttribute(format!(
                        "rid pt restriction needs payload types: {value}"
                    )));
                }
                for pt in key_value[1].split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    payload_types.push(parse_num(pt, "rid payload type")?);
                }
            } else {
                params.push((
                    key_value[0].to_owned(),
                    key_value.get(1).unwrap_or(&"").to_string(),
                ));
            }
        }

        if params.is_empty() && payload_types.is_empty() {
            return Err(Error::MalformedAttribute(format!(
                "rid needs at least one restriction: {value}"
            )));
        }

        Ok(Rid {
            id: split[0].to_owned(),
            direction,
            params,
            payload_types,
        })
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.id, self.direction)?;
        let mut restrictions: Vec<String> = Vec::new();
        if !self.payload_types.is_empty() {
            let pts: Vec<String> = self.payload_types.iter().map(u8::to_string).collect();
            restrictions.push(format!("pt={}", pts.join(",")));
        }
        for (key, val) in &self.params {
            if val.is_empty() {
                restrictions.push(key.clone());
            } else {
                restrictions.push(format!("{key}={val}"));
            }
        }
        write!(f, "{}", restrictions.join(";"))
    }
}

/// `a=ptime:<ms>` / `a=maxptime:<ms>`
pub fn parse_millis(value: &str, what: &str) -> Result<u64> {
    parse_num(value.trim(), what)
}

/// `a=sctp-port:<port>`
pub fn parse_sctp_port(value: &str) -> Result<u16> {
    parse_num(value.trim(), "sctp port")
}

/// `a=max-message-size:<bytes>`
pub fn parse_max_message_size(value: &str) -> Result<u64> {
    parse_num(value.trim(), "max message size")
}

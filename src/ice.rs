use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// IceParameters are the ICE username fragment and password extracted for
/// one transport.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceParameters {
    pub username_fragment: String,
    pub password: String,
    pub ice_lite: bool,
}

/// The transport protocol of an ICE candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IceProtocol {
    Udp,
    Tcp,
}

impl IceProtocol {
    pub fn parse(token: &str) -> Result<IceProtocol> {
        if token.eq_ignore_ascii_case("udp") {
            Ok(IceProtocol::Udp)
        } else if token.eq_ignore_ascii_case("tcp") {
            Ok(IceProtocol::Tcp)
        } else {
            Err(Error::MalformedAttribute(format!(
                "unknown candidate transport: {token}"
            )))
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IceProtocol::Udp => "udp",
            IceProtocol::Tcp => "tcp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IceCandidateType {
    Host,
    Srflx,
    Prflx,
    Relay,
}

impl IceCandidateType {
    pub fn parse(token: &str) -> Result<IceCandidateType> {
        match token.to_lowercase().as_str() {
            "host" => Ok(IceCandidateType::Host),
            "srflx" => Ok(IceCandidateType::Srflx),
            "prflx" => Ok(IceCandidateType::Prflx),
            "relay" => Ok(IceCandidateType::Relay),
            _ => Err(Error::MalformedAttribute(format!(
                "unknown candidate type: {token}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IceCandidateType::Host => "host",
            IceCandidateType::Srflx => "srflx",
            IceCandidateType::Prflx => "prflx",
            IceCandidateType::Relay => "relay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IceTcpCandidateType {
    Active,
    Passive,
    So,
}

impl IceTcpCandidateType {
    pub fn parse(token: &str) -> Result<IceTcpCandidateType> {
        match token.to_lowercase().as_str() {
            "active" => Ok(IceTcpCandidateType::Active),
            "passive" => Ok(IceTcpCandidateType::Passive),
            "so" => Ok(IceTcpCandidateType::So),
            _ => Err(Error::MalformedAttribute(format!(
                "unknown tcp candidate type: {token}"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IceTcpCandidateType::Active => "active",
            IceTcpCandidateType::Passive => "passive",
            IceTcpCandidateType::So => "so",
        }
    }
}

/// IceCandidate is one lowered `a=candidate` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceCandidate {
    pub foundation: String,
    pub priority: u64,
    pub protocol: IceProtocol,
    pub ip: String,
    pub port: u16,
    pub candidate_type: IceCandidateType,
    pub tcp_type: Option<IceTcpCandidateType>,
    pub related_address: Option<String>,
    pub related_port: Option<u16>,
    pub unfreeze_priority: Option<u64>,
    pub interface_type: Option<String>,
}

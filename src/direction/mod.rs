use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};


/// Direction is a transmission direction expressed as a send/recv bitmask,
/// so that `SendRecv` contains both `Send` and `Recv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// No transmission ("inactive").
    Inactive = 0,
    Send = 1,
    Recv = 2,
    SendRecv = 3,
}

impl Direction {
    pub fn has_send(self) -> bool {
        matches!(self, Direction::Send | Direction::SendRecv)
    }

    pub fn has_recv(self) -> bool {
        matches!(self, Direction::Recv | Direction::SendRecv)
    }

    /// Parses a direction token. Both the long media-level attribute forms
    /// (`sendonly`, `recvonly`) and the short forms used inside `a=extmap`,
    /// `a=rid` and `a=simulcast` (`send`, `recv`) are accepted,
    /// case-insensitively. An empty token means inactive.
    pub fn parse(token: &str) -> Result<Direction> {
        let lower = token.trim().to_lowercase();
        match lower.as_str() {
            "" | "inactive" => Ok(Direction::Inactive),
            "send" | "sendonly" => Ok(Direction::Send),
            "recv" | "recvonly" => Ok(Direction::Recv),
            "sendrecv" => Ok(Direction::SendRecv),
            _ => Err(Error::MalformedAttribute(format!(
                "unknown direction: {token}"
            ))),
        }
    }

    /// Parses a direction and rejects values outside the allowed set.
    pub fn parse_restricted(
        token: &str,
        allow_inactive: bool,
        allow_sendrecv: bool,
    ) -> Result<Direction> {
        let direction = Direction::parse(token)?;
        if (!allow_inactive && direction == Direction::Inactive)
            || (!allow_sendrecv && direction == Direction::SendRecv)
        {
            return Err(Error::MalformedAttribute(format!(
                "direction not allowed here: {token}"
            )));
        }
        Ok(direction)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Inactive => "inactive",
            Direction::Send => "send",
            Direction::Recv => "recv",
            Direction::SendRecv => "sendrecv",
        };
        write!(f, "{s}")
    }
}

/// ActorRole distinguishes which side of an RTP pipe a capability set or
/// parameter set is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Sender,
    Receiver,
    Transceiver,
}

/// Location indicates whose point of view a description is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Local,
    Remote,
}

/// Whether a media section with the given direction is relevant for the
/// given role at the given location. A local sender needs the send bit, a
/// remote sender needs the recv bit (the remote peer receives what we
/// send), and a transceiver needs both.
pub fn is_applicable(role: ActorRole, location: Location, direction: Direction) -> bool {
    match (role, location) {
        (ActorRole::Sender, Location::Local) => direction.has_send(),
        (ActorRole::Sender, Location::Remote) => direction.has_recv(),
        (ActorRole::Receiver, Location::Local) => direction.has_recv(),
        (ActorRole::Receiver, Location::Remote) => direction.has_send(),
        (ActorRole::Transceiver, _) => direction.has_send() && direction.has_recv(),
    }
}

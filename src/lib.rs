//! SDP ingestion for ORTC-style media stacks.
//!
//! The engine parses an SDP blob from a remote peer into a typed document
//! ([`SdpDoc`]) and lowers it into a structured [`Description`]: transports
//! with their ICE/DTLS/SRTP parameters and candidates, RTP media lines with
//! sender and receiver capabilities, SCTP data channel media lines, and RTP
//! sender descriptions.
//!
//! ```
//! use rtc_sdp::{create_description, parse, Location};
//!
//! let blob = "v=0\r\n\
//! o=- 1 2 IN IP4 0.0.0.0\r\n\
//! s=-\r\n\
//! t=0 0\r\n\
//! m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
//! a=mid:a1\r\n\
//! a=ice-ufrag:xy\r\n\
//! a=ice-pwd:0123456789abcdef\r\n\
//! a=rtcp-mux\r\n\
//! a=rtpmap:111 opus/48000/2\r\n";
//!
//! let doc = parse(blob)?;
//! let description = create_description(Location::Remote, &doc)?;
//! assert_eq!("a1", description.rtp_media_lines[0].transport_id);
//! # Ok::<(), rtc_sdp::Error>(())
//! ```

#![warn(rust_2018_idioms)]

pub mod attribute;
pub mod description;
pub mod direction;
pub mod document;
pub mod dtls;
pub mod error;
pub mod generator;
pub mod ice;
pub mod lexer;
pub mod lines;
pub mod rtp;
pub mod sctp;
pub mod srtp;
pub mod translator;

mod ids;

pub use description::Description;
pub use direction::{ActorRole, Direction, Location};
pub use document::SdpDoc;
pub use error::{Error, Result};

pub use document::parse;
pub use generator::{create_sdp, generate};
pub use translator::create_description;

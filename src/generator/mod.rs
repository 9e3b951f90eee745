//! Emits a parsed document back to SDP text, and rebuilds a document from
//! a session description.

use std::fmt::Write;

use url::Url;

use crate::description::{Description, MediaDirection, Transport};
use crate::direction::{Direction, Location};
use crate::document::{MediaLine, SdpDoc};
use crate::dtls::DtlsRole;
use crate::error::Result;
use crate::ice::IceCandidate;
use crate::lines::{
    Candidate, Connection, Extmap, Fingerprint, MediaName, Msid, Origin, ProtocolType, RtcpFb,
    RtpMap, Ssrc, Timing,
};
use crate::rtp::Capabilities;


const END_LINE: &str = "\r\n";

fn direction_attr(direction: Direction) -> &'static str {
    match direction {
        Direction::Inactive => "inactive",
        Direction::Send => "sendonly",
        Direction::Recv => "recvonly",
        Direction::SendRecv => "sendrecv",
    }
}

fn write_line(out: &mut String, key: char, value: impl std::fmt::Display) {
    let _ = write!(out, "{key}={value}{END_LINE}");
}

fn write_attr(out: &mut String, name: &str, value: impl std::fmt::Display) {
    let _ = write!(out, "a={name}:{value}{END_LINE}");
}

fn write_flag(out: &mut String, name: &str) {
    let _ = write!(out, "a={name}{END_LINE}");
}

/// Renders the document as SDP text. Lines come out in a canonical order;
/// feeding the result back through the parser yields an equal document.
pub fn generate(doc: &SdpDoc) -> String {
    let mut out = String::new();

    if let Some(version) = doc.version {
        write_line(&mut out, 'v', version);
    }
    if let Some(origin) = &doc.origin {
        write_line(&mut out, 'o', origin);
    }
    if let Some(session_name) = &doc.session_name {
        write_line(&mut out, 's', session_name);
    }
    if let Some(timing) = &doc.timing {
        write_line(&mut out, 't', timing);
    }
    if let Some(connection) = &doc.connection {
        write_line(&mut out, 'c', connection);
    }

    for group in &doc.groups {
        write_attr(&mut out, "group", group);
    }
    for semantic in &doc.msid_semantics {
        write_attr(&mut out, "msid-semantic", semantic);
    }
    if doc.ice_lite {
        write_flag(&mut out, "ice-lite");
    }
    if let Some(ufrag) = &doc.ice_ufrag {
        write_attr(&mut out, "ice-ufrag", ufrag);
    }
    if let Some(pwd) = &doc.ice_pwd {
        write_attr(&mut out, "ice-pwd", pwd);
    }
    if let Some(options) = &doc.ice_options {
        write_attr(&mut out, "ice-options", options);
    }
    if let Some(setup) = &doc.setup {
        write_attr(&mut out, "setup", setup);
    }
    for fingerprint in &doc.fingerprints {
        write_attr(&mut out, "fingerprint", fingerprint);
    }
    for extmap in &doc.extmaps {
        write_attr(&mut out, "extmap", extmap);
    }
    if let Some(direction) = doc.direction {
        write_flag(&mut out, direction_attr(direction));
    }

    for media in &doc.media {
        write_media(&mut out, media);
    }

    out
}

fn write_media(out: &mut String, media: &MediaLine) {
    write_line(out, 'm', &media.media_name);
    if let Some(connection) = &media.connection {
        write_line(out, 'c', connection);
    }
    for bandwidth in &media.bandwidths {
        write_line(out, 'b', bandwidth);
    }

    if let Some(mid) = &media.mid {
        write_attr(out, "mid", mid);
    }
    if media.bundle_only {
        write_flag(out, "bundle-only");
    }
    if let Some(direction) = media.direction {
        write_flag(out, direction_attr(direction));
    }
    if let Some(ufrag) = &media.ice_ufrag {
        write_attr(out, "ice-ufrag", ufrag);
    }
    if let Some(pwd) = &media.ice_pwd {
        write_attr(out, "ice-pwd", pwd);
    }
    for candidate in &media.candidates {
        write_attr(out, "candidate", candidate);
    }
    if media.end_of_candidates {
        write_flag(out, "end-of-candidates");
    }
    for fingerprint in &media.fingerprints {
        write_attr(out, "fingerprint", fingerprint);
    }
    for crypto in &media.cryptos {
        write_attr(out, "crypto", crypto);
    }
    if let Some(setup) = &media.setup {
        write_attr(out, "setup", setup);
    }
    for extmap in &media.extmaps {
        write_attr(out, "extmap", extmap);
    }
    for rtpmap in &media.rtpmaps {
        write_attr(out, "rtpmap", rtpmap);
    }
    for fmtp in &media.fmtps {
        write_attr(out, "fmtp", fmtp);
    }
    if let Some(ptime) = media.ptime {
        write_attr(out, "ptime", ptime);
    }
    if let Some(max_ptime) = media.max_ptime {
        write_attr(out, "maxptime", max_ptime);
    }
    if let Some(rtcp) = &media.rtcp {
        write_attr(out, "rtcp", rtcp);
    }
    if media.rtcp_mux {
        write_flag(out, "rtcp-mux");
    }
    if media.rtcp_rsize {
        write_flag(out, "rtcp-rsize");
    }
    for fb in &media.rtcp_fbs {
        write_attr(out, "rtcp-fb", fb);
    }
    for msid in &media.msids {
        write_attr(out, "msid", msid);
    }
    for rid in &media.rids {
        write_attr(out, "rid", rid);
    }
    if let Some(simulcast) = &media.simulcast {
        write_attr(out, "simulcast", simulcast);
    }
    for group in &media.ssrc_groups {
        write_attr(out, "ssrc-group", group);
    }
    for ssrc in &media.ssrcs {
        write_attr(out, "ssrc", ssrc);
        for fmtp in &ssrc.fmtps {
            write_attr(out, "fmtp", fmtp);
        }
    }
    if let Some(port) = media.sctp_port {
        write_attr(out, "sctp-port", port);
    }
    if let Some(size) = media.max_message_size {
        write_attr(out, "max-message-size", size);
    }
}

fn setup_from_role(role: DtlsRole) -> &'static str {
    match role {
        DtlsRole::Auto => "actpass",
        DtlsRole::Client => "active",
        DtlsRole::Server => "passive",
    }
}

fn candidate_line(component_id: u32, candidate: &IceCandidate) -> Candidate {
    let mut line = Candidate {
        foundation: candidate.foundation.clone(),
        component_id,
        transport: candidate.protocol.as_str().to_owned(),
        priority: candidate.priority,
        connection_address: candidate.ip.clone(),
        port: candidate.port,
        candidate_type: candidate.candidate_type.as_str().to_owned(),
        rel_addr: candidate.related_address.clone(),
        rel_port: candidate.related_port,
        extension_pairs: vec![],
    };
    if let Some(tcp_type) = candidate.tcp_type {
        line.extension_pairs
            .push(("tcptype".to_owned(), tcp_type.as_str().to_owned()));
    }
    if let Some(priority) = candidate.unfreeze_priority {
        line.extension_pairs
            .push(("unfreezepriority".to_owned(), priority.to_string()));
    }
    if let Some(interface_type) = &candidate.interface_type {
        line.extension_pairs
            .push(("interfacetype".to_owned(), interface_type.clone()));
    }
    line
}

fn apply_transport(media: &mut MediaLine, transport: &Transport) {
    if let Some(ice) = &transport.rtp.ice_parameters {
        media.ice_ufrag = Some(ice.username_fragment.clone());
        media.ice_pwd = Some(ice.password.clone());
    }
    if let Some(dtls) = &transport.rtp.dtls_parameters {
        media.setup = Some(setup_from_role(dtls.role).to_owned());
        for fingerprint in &dtls.fingerprints {
            media.fingerprints.push(Fingerprint {
                hash_func: fingerprint.algorithm.clone(),
                fingerprint: fingerprint.value.clone(),
            });
        }
    }
    for candidate in &transport.rtp.ice_candidates {
        media.candidates.push(candidate_line(1, candidate));
    }
    if let Some(rtcp) = &transport.rtcp {
        for candidate in &rtcp.ice_candidates {
            media.candidates.push(candidate_line(2, candidate));
        }
    }
    media.end_of_candidates = transport.rtp.end_of_candidates;
    media.rtcp_mux = transport.rtcp.is_none();
}

fn apply_capabilities(media: &mut MediaLine, capabilities: &Capabilities) {
    for codec in &capabilities.codecs {
        media.media_name.formats.push(codec.preferred_payload_type.to_string());
        media.rtpmaps.push(RtpMap {
            payload_type: codec.preferred_payload_type,
            encoding_name: codec.name.clone(),
            clock_rate: codec.clock_rate,
            encoding_params: codec.num_channels,
        });
        for fb in &codec.rtcp_feedback {
            media.rtcp_fbs.push(RtcpFb {
                payload_type: Some(codec.preferred_payload_type),
                id: fb.kind.clone(),
                param1: fb.parameter.clone(),
                param2: None,
            });
        }
    }
    for extension in &capabilities.header_extensions {
        let Ok(uri) = Url::parse(&extension.uri) else {
            log::warn!("header extension uri is not valid: {}", extension.uri);
            continue;
        };
        media.extmaps.push(Extmap {
            id: extension.preferred_id as u32,
            direction: Direction::SendRecv,
            uri,
            ext_attributes: None,
        });
    }
}

fn base_media_line(description_protocol: &str, media_type: &str, port: u16) -> MediaLine {
    let proto = ProtocolType::from_proto(description_protocol).unwrap_or(ProtocolType::Unknown);
    let media_name = MediaName {
        media: media_type.to_owned(),
        port,
        port_count: None,
        proto_str: description_protocol.to_owned(),
        proto,
        formats: vec![],
    };
    MediaLine::new(media_name)
}

/// Rebuilds a document from a session description, the inverse of
/// [`create_description`](crate::translator::create_description). The
/// capability set matching the location is advertised.
pub fn create_sdp(location: Location, description: &Description) -> Result<SdpDoc> {
    let mut doc = SdpDoc {
        version: Some(0),
        ..Default::default()
    };

    if let Some(details) = &description.details {
        let unicast = details.unicast_address.clone().unwrap_or_default();
        doc.origin = Some(Origin {
            username: if details.username.is_empty() {
                "-".to_owned()
            } else {
                details.username.clone()
            },
            session_id: details.session_id,
            session_version: details.session_version,
            net_type: unicast.net_type.unwrap_or_else(|| "IN".to_owned()),
            addr_type: unicast.addr_type.unwrap_or_else(|| "IP4".to_owned()),
            unicast_address: unicast
                .connection_address
                .unwrap_or_else(|| "0.0.0.0".to_owned()),
        });
        doc.session_name = Some(if details.session_name.is_empty() {
            "-".to_owned()
        } else {
            details.session_name.clone()
        });
        doc.timing = Some(Timing {
            start_time: details.start_time,
            end_time: details.end_time,
        });
        if let Some(connection) = details.connection_data.as_ref().and_then(|c| c.rtp.as_ref()) {
            doc.connection = Some(Connection {
                net_type: connection.net_type.clone().unwrap_or_else(|| "IN".to_owned()),
                addr_type: connection.addr_type.clone().unwrap_or_else(|| "IP4".to_owned()),
                connection_address: connection
                    .connection_address
                    .clone()
                    .unwrap_or_else(|| "0.0.0.0".to_owned()),
            });
        }
    }

    for media_line in &description.rtp_media_lines {
        let port = media_line
            .details
            .connection_data
            .as_ref()
            .and_then(|c| c.rtp.as_ref())
            .and_then(|rtp| rtp.port)
            .unwrap_or(9);
        let mut media = base_media_line(&media_line.details.protocol, &media_line.media_type, port);
        media.mid = Some(media_line.id.clone());

        media.direction = media_line.details.media_direction.map(|d| match d {
            MediaDirection::SendReceive => Direction::SendRecv,
            MediaDirection::SendOnly => Direction::Send,
            MediaDirection::ReceiveOnly => Direction::Recv,
            MediaDirection::Inactive => Direction::Inactive,
        });

        if let Some(transport) = description
            .transports
            .iter()
            .find(|t| t.id == media_line.transport_id)
        {
            apply_transport(&mut media, transport);
        }

        let capabilities = match location {
            Location::Local => &media_line.receiver_capabilities,
            Location::Remote => &media_line.sender_capabilities,
        };
        apply_capabilities(&mut media, capabilities);

        for sender in &description.rtp_senders {
            if sender.rtp_media_line_id != media_line.id {
                continue;
            }
            for stream_id in &sender.media_stream_ids {
                media.msids.push(Msid {
                    id: stream_id.clone(),
                    app_data: sender.media_stream_track_id.clone(),
                });
            }
            for encoding in &sender.parameters.encodings {
                let (Some(ssrc), Some(cname)) = (encoding.ssrc, &sender.parameters.rtcp.cname)
                else {
                    continue;
                };
                media
                    .ssrcs
                    .push(Ssrc::new(ssrc, "cname", &[cname.clone()]));
            }
        }

        doc.media.push(media);
    }

    for media_line in &description.sctp_media_lines {
        let mut media = base_media_line(&media_line.details.protocol, "application", 9);
        media.media_name.formats.push("webrtc-datachannel".to_owned());
        media.mid = Some(media_line.id.clone());
        media.sctp_port = media_line.port;
        media.max_message_size = Some(media_line.capabilities.max_message_size);

        if let Some(transport) = description
            .transports
            .iter()
            .find(|t| t.id == media_line.transport_id)
        {
            apply_transport(&mut media, transport);
        }

        doc.media.push(media);
    }

    Ok(doc)
}

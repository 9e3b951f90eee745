//! Lowers a parsed [`SdpDoc`] into the public [`Description`]: transports
//! first, then RTP and SCTP media lines that reference them, then sender
//! descriptions derived from the media lines.

use crate::description::{
    ConnectionData, ConnectionDetails, Description, Details, MediaDirection, MediaLineDetails,
    RtpMediaLine, RtpSender, SctpMediaLine, Transport, TransportParameters,
};
use crate::direction::{is_applicable, ActorRole, Direction, Location};
use crate::document::{MediaLine, SdpDoc};
use crate::dtls::{DtlsFingerprint, DtlsParameters, DtlsRole};
use crate::error::{parse_num, Error, Result};
use crate::ice::{IceCandidate, IceCandidateType, IceParameters, IceProtocol, IceTcpCandidateType};
use crate::ids::{hash_id, MEDIA_LINE_INDEX_TAG, SENDER_INDEX_TAG, TRANSPORT_INDEX_TAG};
use crate::lines::{Candidate, Crypto, ProtocolType};
use crate::rtp::{
    capabilities_to_parameters, parse_format_parameters, reserved_codec, Capabilities,
    CodecCapability, CodecKind, CodecParameters, EncodingParameters, FecEncodingParameters,
    HeaderExtension, RedCodecParameters, RtcpFeedback, RtpParameters, RtxEncodingParameters,
    SupportedCodec, FEC_MECHANISM_FLEXFEC, FEC_MECHANISM_RED, FEC_MECHANISM_RED_ULPFEC,
};
use crate::sctp::{SctpCapabilities, DEFAULT_MAX_MESSAGE_SIZE};
use crate::srtp::{SrtpCryptoParameters, SrtpKeyParameters, SrtpSdesParameters};


/// Builds the session description for the given point of view.
pub fn create_description(location: Location, doc: &SdpDoc) -> Result<Description> {
    let mut description = Description::default();

    create_details(doc, &mut description);
    create_transports(doc, &mut description)?;
    create_rtp_media_lines(location, doc, &mut description)?;
    create_sctp_media_lines(doc, &mut description)?;
    create_rtp_senders(doc, &mut description)?;

    Ok(description)
}

fn create_details(doc: &SdpDoc, description: &mut Description) {
    let needs_details = doc.origin.is_some()
        || doc.session_name.is_some()
        || doc.timing.is_some()
        || doc.connection.is_some();
    if !needs_details {
        return;
    }

    let mut details = Details {
        username: doc
            .origin
            .as_ref()
            .map(|o| o.username.clone())
            .unwrap_or_default(),
        session_id: doc.origin.as_ref().map(|o| o.session_id).unwrap_or_default(),
        session_version: doc
            .origin
            .as_ref()
            .map(|o| o.session_version)
            .unwrap_or_default(),
        session_name: doc.session_name.clone().unwrap_or_default(),
        start_time: doc.timing.map(|t| t.start_time).unwrap_or_default(),
        end_time: doc.timing.map(|t| t.end_time).unwrap_or_default(),
        unicast_address: None,
        connection_data: None,
    };

    if let Some(origin) = &doc.origin {
        details.unicast_address = Some(ConnectionDetails {
            net_type: Some(origin.net_type.clone()),
            addr_type: Some(origin.addr_type.clone()),
            connection_address: Some(origin.unicast_address.clone()),
            port: None,
        });
    }

    if let Some(connection) = &doc.connection {
        details.connection_data = Some(ConnectionData {
            rtp: Some(ConnectionDetails {
                net_type: Some(connection.net_type.clone()),
                addr_type: Some(connection.addr_type.clone()),
                connection_address: Some(connection.connection_address.clone()),
                port: None,
            }),
            rtcp: None,
        });
    }

    description.details = Some(details);
}

fn convert_crypto(cryptos: &[Crypto]) -> Result<SrtpSdesParameters> {
    let mut parameters = SrtpSdesParameters::default();

    for crypto in cryptos {
        let mut crypto_params = SrtpCryptoParameters {
            tag: crypto.tag,
            crypto_suite: crypto.suite.clone(),
            key_params: vec![],
            session_params: crypto.session_params.clone(),
        };

        for (method, info) in &crypto.key_params {
            let info_split: Vec<&str> = info.split('|').map(str::trim).collect();
            if info_split.is_empty() || info_split[0].is_empty() {
                return Err(Error::MalformedAttribute(format!(
                    "crypto key info is empty: {info}"
                )));
            }

            let mut key_params = SrtpKeyParameters {
                key_method: method.clone(),
                key_salt: info_split[0].to_owned(),
                lifetime: info_split.get(1).map(|s| (*s).to_owned()),
                mki_value: None,
                mki_length: None,
            };

            if let Some(mki) = info_split.get(2) {
                let mki_split: Vec<&str> = mki.split(':').map(str::trim).collect();
                if mki_split.len() != 2 {
                    return Err(Error::MalformedAttribute(format!(
                        "crypto mki needs value:length: {mki}"
                    )));
                }
                key_params.mki_value = Some(mki_split[0].to_owned());
                key_params.mki_length = Some(parse_num(mki_split[1], "mki length")?);
            }

            crypto_params.key_params.push(key_params);
        }

        parameters.crypto_params.push(crypto_params);
    }

    Ok(parameters)
}

fn convert_candidates(
    candidates: &[Candidate],
    rtp: &mut TransportParameters,
    rtcp: &mut Option<TransportParameters>,
) -> Result<()> {
    for line in candidates {
        let mut candidate = IceCandidate {
            foundation: line.foundation.clone(),
            priority: line.priority,
            protocol: IceProtocol::parse(&line.transport)?,
            ip: line.connection_address.clone(),
            port: line.port,
            candidate_type: IceCandidateType::parse(&line.candidate_type)?,
            tcp_type: None,
            related_address: line.rel_addr.clone(),
            related_port: line.rel_port,
            unfreeze_priority: None,
            interface_type: None,
        };

        for (key, value) in &line.extension_pairs {
            if key.eq_ignore_ascii_case("tcptype") {
                candidate.tcp_type = Some(IceTcpCandidateType::parse(value)?);
            } else if key.eq_ignore_ascii_case("unfreezepriority") {
                candidate.unfreeze_priority = Some(parse_num(value, "unfreeze priority")?);
            } else if key.eq_ignore_ascii_case("interfacetype") {
                candidate.interface_type = Some(value.clone());
            } else {
                log::warn!("candidate extension is not understood: {key}");
            }
        }

        // component 1 is RTP, higher components carry RTCP
        if line.component_id <= 1 {
            rtp.ice_candidates.push(candidate);
        } else {
            rtcp.get_or_insert_with(TransportParameters::default)
                .ice_candidates
                .push(candidate);
        }
    }
    Ok(())
}

fn create_transports(doc: &SdpDoc, description: &mut Description) -> Result<()> {
    for (index, media) in doc.media.iter().enumerate() {
        // no ice, no transport
        let Some(ice_ufrag) = &media.ice_ufrag else {
            continue;
        };

        let mut transport = Transport {
            id: match &media.mid {
                Some(mid) => mid.clone(),
                None => hash_id(TRANSPORT_INDEX_TAG, index as u64),
            },
            rtp: TransportParameters::default(),
            rtcp: None,
        };

        if !media.rtcp_mux {
            transport.rtcp = Some(TransportParameters::default());
        }

        transport.rtp.ice_parameters = Some(IceParameters {
            username_fragment: ice_ufrag.clone(),
            password: media.ice_pwd.clone().unwrap_or_default(),
            ice_lite: doc.ice_lite,
        });

        if !media.fingerprints.is_empty() {
            let mut dtls = DtlsParameters {
                role: media
                    .setup
                    .as_deref()
                    .map(DtlsRole::from_setup)
                    .unwrap_or_default(),
                fingerprints: vec![],
            };
            for fingerprint in &media.fingerprints {
                dtls.fingerprints.push(DtlsFingerprint {
                    algorithm: fingerprint.hash_func.clone(),
                    value: fingerprint.fingerprint.clone(),
                });
            }
            transport.rtp.dtls_parameters = Some(dtls);
        }

        if !media.cryptos.is_empty() {
            transport.rtp.srtp_sdes_parameters = Some(convert_crypto(&media.cryptos)?);
        }

        convert_candidates(&media.candidates, &mut transport.rtp, &mut transport.rtcp)?;

        if media.end_of_candidates {
            transport.rtp.end_of_candidates = true;
            if let Some(rtcp) = &mut transport.rtcp {
                rtcp.end_of_candidates = true;
            }
        }

        description.transports.push(transport);
    }
    Ok(())
}

fn to_media_direction(direction: Direction) -> MediaDirection {
    match direction {
        Direction::Inactive => MediaDirection::Inactive,
        Direction::Send => MediaDirection::SendOnly,
        Direction::Recv => MediaDirection::ReceiveOnly,
        Direction::SendRecv => MediaDirection::SendReceive,
    }
}

/// Fills the per-media-line facts shared by RTP and SCTP lowering and
/// resolves which transport the line uses, honoring BUNDLE groups.
/// Returns `(id, transport_id, details)`; `transport_id` is `None` when no
/// transport could be matched.
fn fill_media_line(
    index: usize,
    doc: &SdpDoc,
    media: &MediaLine,
    description: &Description,
) -> (String, Option<String>, MediaLineDetails) {
    let mut details = MediaLineDetails {
        internal_index: Some(index),
        private_transport_id: None,
        protocol: media.media_name.proto_str.clone(),
        connection_data: None,
        media_direction: media
            .direction
            .or(doc.direction)
            .map(to_media_direction),
    };

    let mut rtp_details = ConnectionDetails {
        net_type: None,
        addr_type: None,
        connection_address: None,
        port: Some(media.media_name.port),
    };
    if let Some(connection) = &media.connection {
        rtp_details.net_type = Some(connection.net_type.clone());
        rtp_details.addr_type = Some(connection.addr_type.clone());
        rtp_details.connection_address = Some(connection.connection_address.clone());
    }
    let rtcp_details = media.rtcp.as_ref().map(|rtcp| ConnectionDetails {
        net_type: rtcp.net_type.clone(),
        addr_type: rtcp.addr_type.clone(),
        connection_address: rtcp.connection_address.clone(),
        port: Some(rtcp.port),
    });
    details.connection_data = Some(ConnectionData {
        rtp: Some(rtp_details),
        rtcp: rtcp_details,
    });

    let id;
    let search_for_transport_id;
    let mut found_bundle_id: Option<String> = None;

    if let Some(mid) = &media.mid {
        id = mid.clone();
        search_for_transport_id = mid.clone();

        // the first mid of a BUNDLE group is the bundle's transport
        'groups: for group in &doc.groups {
            if !group.semantic.eq_ignore_ascii_case("BUNDLE") {
                continue;
            }
            let first = group.identification_tags.first();
            for tag in &group.identification_tags {
                if tag == mid {
                    found_bundle_id = first.cloned();
                    break 'groups;
                }
            }
        }
    } else {
        id = hash_id(MEDIA_LINE_INDEX_TAG, index as u64);
        search_for_transport_id = hash_id(TRANSPORT_INDEX_TAG, index as u64);
    }

    if description
        .transports
        .iter()
        .any(|t| t.id == search_for_transport_id)
    {
        details.private_transport_id = Some(search_for_transport_id);
    }

    let mut transport_id = found_bundle_id
        .filter(|bundle| description.transports.iter().any(|t| &t.id == bundle));
    if transport_id.is_none() {
        transport_id = details.private_transport_id.clone();
    }
    if transport_id == details.private_transport_id {
        details.private_transport_id = None;
    }

    (id, transport_id, details)
}

fn fill_capabilities(
    location: Location,
    media: &MediaLine,
    sender: &mut Capabilities,
    receiver: &mut Capabilities,
) -> Result<()> {
    let match_kind = CodecKind::from_media(&media.media_name.media);
    if match_kind != CodecKind::Audio && match_kind != CodecKind::Video {
        log::warn!(
            "unable to understand media kind: {}",
            media.media_name.media
        );
        return Ok(());
    }

    let mut found_red = false;
    let mut found_ulpfec = false;
    let mut found_flexfec = false;

    for payload_str in &media.media_name.formats {
        let payload_type: u8 = parse_num(payload_str, "media line payload type")?;

        let rtpmap = media
            .rtpmaps
            .iter()
            .find(|r| r.payload_type == payload_type);
        let format = media.fmtps.iter().find(|f| f.format == payload_type);

        let (encoding_name, clock_rate, encoding_params) = match rtpmap {
            Some(rtpmap) => (
                rtpmap.encoding_name.clone(),
                rtpmap.clock_rate,
                rtpmap.encoding_params,
            ),
            None => {
                let reserved = reserved_codec(payload_type);
                if reserved == SupportedCodec::Unknown {
                    log::warn!("codec payload type is not understood: {payload_type}");
                    continue;
                }
                (
                    reserved.as_str().to_owned(),
                    reserved.default_clock_rate(),
                    None,
                )
            }
        };

        let supported = SupportedCodec::from_encoding_name(&encoding_name);
        if supported == SupportedCodec::Unknown {
            log::warn!("codec is not supported: {encoding_name}");
            continue;
        }

        let codec_kind = supported.kind();
        let mut fill_kind = false;
        if codec_kind == CodecKind::Audio {
            if match_kind == CodecKind::Video {
                return Err(Error::MalformedAttribute(format!(
                    "audio codec on a video line: {encoding_name}"
                )));
            }
            fill_kind = true;
        } else if codec_kind == CodecKind::Video {
            if match_kind == CodecKind::Audio {
                return Err(Error::MalformedAttribute(format!(
                    "video codec on an audio line: {encoding_name}"
                )));
            }
            fill_kind = true;
        }

        let mut capability = CodecCapability {
            name: encoding_name,
            kind: if fill_kind {
                codec_kind.as_str().to_owned()
            } else {
                String::new()
            },
            clock_rate,
            preferred_payload_type: payload_type,
            ptime: media.ptime,
            max_ptime: None,
            num_channels: if codec_kind == CodecKind::Audio {
                encoding_params
            } else {
                None
            },
            rtcp_feedback: vec![],
            parameters: None,
        };

        if let Some(format) = format {
            parse_format_parameters(supported, format, &mut capability)?;
        }
        if supported.requires_parameters() && capability.parameters.is_none() {
            return Err(Error::MissingRequired(format!(
                "{} format requires parameters",
                capability.name
            )));
        }

        match supported {
            SupportedCodec::Red => found_red = true,
            SupportedCodec::UlpFec => found_ulpfec = true,
            SupportedCodec::FlexFec => found_flexfec = true,
            _ => {}
        }

        for fb in &media.rtcp_fbs {
            if let Some(fb_payload) = fb.payload_type {
                if fb_payload != capability.preferred_payload_type {
                    continue;
                }
            }
            capability.rtcp_feedback.push(RtcpFeedback {
                kind: fb.id.clone(),
                parameter: fb.param1.clone(),
            });
        }

        sender.codecs.push(capability.clone());
        receiver.codecs.push(capability);
    }

    if found_red {
        let mechanism = if found_ulpfec {
            FEC_MECHANISM_RED_ULPFEC
        } else {
            FEC_MECHANISM_RED
        };
        sender.fec_mechanisms.push(mechanism.to_owned());
        receiver.fec_mechanisms.push(mechanism.to_owned());
    }
    if found_flexfec {
        sender.fec_mechanisms.push(FEC_MECHANISM_FLEXFEC.to_owned());
        receiver
            .fec_mechanisms
            .push(FEC_MECHANISM_FLEXFEC.to_owned());
    }

    for extmap in &media.extmaps {
        let preferred_id = u16::try_from(extmap.id).map_err(|_| {
            Error::MalformedAttribute(format!("extmap id out of range: {}", extmap.id))
        })?;
        let extension = HeaderExtension {
            kind: match_kind.as_str().to_owned(),
            uri: extmap.uri.to_string(),
            preferred_id,
            preferred_encrypt: false,
        };

        if is_applicable(ActorRole::Sender, location, extmap.direction) {
            sender.header_extensions.push(extension.clone());
        }
        if is_applicable(ActorRole::Receiver, location, extmap.direction) {
            receiver.header_extensions.push(extension);
        }
    }

    Ok(())
}

fn create_rtp_media_lines(
    location: Location,
    doc: &SdpDoc,
    description: &mut Description,
) -> Result<()> {
    for (index, media) in doc.media.iter().enumerate() {
        if media.media_name.proto != ProtocolType::Rtp {
            continue;
        }

        let (id, transport_id, details) = fill_media_line(index, doc, media, description);
        let Some(transport_id) = transport_id else {
            log::warn!("could not match RTP media line to a transport: {id}");
            continue;
        };

        let mut media_line = RtpMediaLine {
            id,
            transport_id,
            details,
            media_type: media.media_name.media.clone(),
            sender_capabilities: Capabilities::default(),
            receiver_capabilities: Capabilities::default(),
        };

        fill_capabilities(
            location,
            media,
            &mut media_line.sender_capabilities,
            &mut media_line.receiver_capabilities,
        )?;

        description.rtp_media_lines.push(media_line);
    }
    Ok(())
}

fn create_sctp_media_lines(doc: &SdpDoc, description: &mut Description) -> Result<()> {
    for (index, media) in doc.media.iter().enumerate() {
        if media.media_name.proto != ProtocolType::Sctp {
            continue;
        }

        let (id, transport_id, details) = fill_media_line(index, doc, media, description);
        let Some(transport_id) = transport_id else {
            log::warn!("could not match SCTP media line to a transport: {id}");
            continue;
        };

        description.sctp_media_lines.push(SctpMediaLine {
            id,
            transport_id,
            details,
            port: media.sctp_port,
            capabilities: SctpCapabilities {
                max_message_size: media.max_message_size.unwrap_or(DEFAULT_MAX_MESSAGE_SIZE),
            },
        });
    }
    Ok(())
}

fn fill_red_format_parameters(media: &MediaLine, parameters: &mut RtpParameters) {
    for codec in &mut parameters.codecs {
        if !codec.name.eq_ignore_ascii_case(SupportedCodec::Red.as_str()) {
            continue;
        }
        let Some(format) = media.fmtps.iter().find(|f| f.format == codec.payload_type) else {
            continue;
        };

        let mut payload_types = Vec::new();
        for token in format
            .format_specific
            .join("/")
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            match token.parse::<u8>() {
                Ok(pt) => payload_types.push(pt),
                Err(_) => {
                    log::warn!("red payload list is not valid: {token}");
                    payload_types.clear();
                    break;
                }
            }
        }
        if !payload_types.is_empty() {
            codec.parameters = Some(CodecParameters::Red(RedCodecParameters { payload_types }));
        }
    }
}

fn fill_stream_ids(media: &MediaLine, sender: &mut RtpSender) {
    for msid in &media.msids {
        if sender.media_stream_track_id.is_none() {
            sender.media_stream_track_id = msid.app_data.clone();
        }
        if !msid.id.is_empty() {
            sender.media_stream_ids.insert(msid.id.clone());
        }
    }
    if !sender.media_stream_ids.is_empty() {
        return;
    }

    for ssrc in &media.ssrcs {
        if !ssrc.attribute.eq_ignore_ascii_case("msid") {
            continue;
        }
        let values = ssrc.attribute_values();
        let Some(id) = values.first() else {
            continue;
        };
        if sender.media_stream_track_id.is_none() {
            sender.media_stream_track_id = values.get(1).map(|s| (*s).to_owned());
        }
        if !id.is_empty() {
            sender.media_stream_ids.insert((*id).to_owned());
        }
    }
}

fn create_rtp_senders(doc: &SdpDoc, description: &mut Description) -> Result<()> {
    for (index, media) in doc.media.iter().enumerate() {
        if media.media_name.proto != ProtocolType::Rtp {
            continue;
        }

        if let Some(direction) = media.direction {
            if !is_applicable(ActorRole::Sender, Location::Local, direction) {
                continue;
            }
        }

        // without stream identity there is nothing to send
        if media.msids.is_empty() && media.ssrcs.is_empty() {
            log::debug!("media line carries no stream identity, no sender emitted");
            continue;
        }

        let mid = media.mid.clone();
        let mut sender = RtpSender {
            id: mid
                .clone()
                .unwrap_or_else(|| hash_id(SENDER_INDEX_TAG, index as u64)),
            rtp_media_line_id: mid
                .clone()
                .unwrap_or_else(|| hash_id(MEDIA_LINE_INDEX_TAG, index as u64)),
            internal_rtp_media_line_index: Some(index),
            parameters: Default::default(),
            media_stream_ids: Default::default(),
            media_stream_track_id: None,
        };

        let Some(media_line) = description
            .rtp_media_lines
            .iter()
            .find(|m| m.id == sender.rtp_media_line_id)
        else {
            log::warn!(
                "did not find associated media line: {}",
                sender.rtp_media_line_id
            );
            continue;
        };
        let sender_capabilities = media_line.sender_capabilities.clone();

        sender.parameters = capabilities_to_parameters(&sender_capabilities);
        sender.parameters.mux_id = mid.unwrap_or_default();
        sender.parameters.rtcp.mux = media.rtcp_mux;
        sender.parameters.rtcp.reduced_size = media.rtcp_rsize;
        fill_red_format_parameters(media, &mut sender.parameters);
        fill_stream_ids(media, &mut sender);

        let mut encoding = EncodingParameters::default();

        for ssrc in &media.ssrcs {
            if !ssrc.attribute.eq_ignore_ascii_case("cname") {
                continue;
            }
            let values = ssrc.attribute_values();
            let Some(cname) = values.first() else {
                return Err(Error::MalformedAttribute(format!(
                    "ssrc cname has no value: {}",
                    ssrc.ssrc
                )));
            };
            sender.parameters.rtcp.cname = Some((*cname).to_owned());
            encoding.ssrc = Some(ssrc.ssrc);
            break;
        }

        for group in &media.ssrc_groups {
            if !group.semantics.eq_ignore_ascii_case("FID") {
                continue;
            }
            if group.ssrcs.len() < 2 {
                return Err(Error::MalformedAttribute(format!(
                    "FID group needs two ssrcs: {}",
                    group.semantics
                )));
            }
            if encoding.ssrc.is_none() {
                encoding.ssrc = Some(group.ssrcs[0]);
            }
            encoding.rtx = Some(RtxEncodingParameters {
                ssrc: group.ssrcs[1],
            });
            break;
        }

        for group in &media.ssrc_groups {
            if !group.semantics.eq_ignore_ascii_case("FEC-FR") {
                continue;
            }
            if group.ssrcs.len() < 2 {
                return Err(Error::MalformedAttribute(format!(
                    "FEC-FR group needs two ssrcs: {}",
                    group.semantics
                )));
            }
            if encoding.ssrc.is_none() {
                encoding.ssrc = Some(group.ssrcs[0]);
            }
            encoding.fec = Some(FecEncodingParameters {
                ssrc: group.ssrcs[1],
                mechanism: sender_capabilities.fec_mechanisms.first().cloned(),
            });
            break;
        }

        sender.parameters.encodings.push(encoding);
        description.rtp_senders.push(sender);
    }
    Ok(())
}

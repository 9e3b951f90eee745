use super::*;
use crate::error::Error;

#[test]
fn test_parse_version() {
    assert_eq!(0, parse_version("0").unwrap());
    assert_eq!(0, parse_version(" 0 ").unwrap());
    assert_eq!(
        Err(Error::UnsupportedVersion("1".to_owned())),
        parse_version("1")
    );
    assert!(parse_version("x").is_err());
}

#[test]
fn test_parse_origin() {
    let origin = Origin::parse("- 4596489990601351948 2 IN IP4 127.0.0.1").unwrap();
    assert_eq!("-", origin.username);
    assert_eq!(4596489990601351948, origin.session_id);
    assert_eq!(2, origin.session_version);
    assert_eq!("IN", origin.net_type);
    assert_eq!("IP4", origin.addr_type);
    assert_eq!("127.0.0.1", origin.unicast_address);
    assert_eq!(
        "- 4596489990601351948 2 IN IP4 127.0.0.1",
        origin.to_string()
    );

    assert!(Origin::parse("- 1 2 IN IP4").is_err());
    assert!(Origin::parse("- x 2 IN IP4 127.0.0.1").is_err());
}

#[test]
fn test_parse_timing_connection_bandwidth() {
    let timing = Timing::parse("0 0").unwrap();
    assert_eq!(0, timing.start_time);
    assert_eq!(0, timing.end_time);
    assert!(Timing::parse("0").is_err());

    let conn = Connection::parse("IN IP4 224.2.17.12").unwrap();
    assert_eq!("IN", conn.net_type);
    assert_eq!("IP4", conn.addr_type);
    assert_eq!("224.2.17.12", conn.connection_address);
    assert!(Connection::parse("IN IP4").is_err());

    // value is the token after the colon
    let bw = Bandwidth::parse("AS:128").unwrap();
    assert_eq!("AS", bw.bw_type);
    assert_eq!(128, bw.bandwidth);
    assert_eq!("AS:128", bw.to_string());
    assert!(Bandwidth::parse("AS").is_err());
    assert!(Bandwidth::parse("AS:x").is_err());
}

#[test]
fn test_protocol_type() {
    let tests = [
        ("UDP/TLS/RTP/SAVPF", ProtocolType::Rtp),
        ("TCP/TLS/RTP/SAVPF", ProtocolType::Rtp),
        ("UDP/TLS/RTP/SAVP", ProtocolType::Rtp),
        ("RTP/AVP", ProtocolType::Rtp),
        ("RTP/AVPF", ProtocolType::Rtp),
        ("RTP/SAVPF", ProtocolType::Rtp),
        ("DTLS/SCTP", ProtocolType::Sctp),
        ("UDP/DTLS/SCTP", ProtocolType::Sctp),
        ("TCP/DTLS/SCTP", ProtocolType::Sctp),
        ("udp/tls/rtp/savpf", ProtocolType::Rtp),
        ("RTP/XYZ", ProtocolType::Unknown),
        ("FOO/BAR", ProtocolType::Unknown),
        ("UDP/TLS/RTP/AVP", ProtocolType::Unknown),
    ];
    for (proto, expected) in tests {
        assert_eq!(expected, ProtocolType::from_proto(proto).unwrap(), "{proto}");
    }

    assert!(ProtocolType::from_proto("RTP").is_err());
}

#[test]
fn test_parse_media_name() {
    let media = MediaName::parse("audio 9 UDP/TLS/RTP/SAVPF 111 103 104").unwrap();
    assert_eq!("audio", media.media);
    assert_eq!(9, media.port);
    assert_eq!(None, media.port_count);
    assert_eq!("UDP/TLS/RTP/SAVPF", media.proto_str);
    assert_eq!(ProtocolType::Rtp, media.proto);
    assert_eq!(vec!["111", "103", "104"], media.formats);
    assert_eq!("audio 9 UDP/TLS/RTP/SAVPF 111 103 104", media.to_string());

    let ranged = MediaName::parse("video 49170/2 RTP/AVP 31").unwrap();
    assert_eq!(49170, ranged.port);
    assert_eq!(Some(2), ranged.port_count);
    assert_eq!(vec!["31"], ranged.formats);

    assert!(MediaName::parse("audio 9 UDP/TLS/RTP/SAVPF").is_err());
    assert!(MediaName::parse("audio 9/2/3 RTP/AVP 0").is_err());
    assert!(MediaName::parse("audio x RTP/AVP 0").is_err());
}

#[test]
fn test_parse_group_and_msid() {
    let group = Group::parse("BUNDLE v0 a0").unwrap();
    assert_eq!("BUNDLE", group.semantic);
    assert_eq!(vec!["v0", "a0"], group.identification_tags);
    assert_eq!("BUNDLE v0 a0", group.to_string());

    let semantic_only = Group::parse("LS").unwrap();
    assert!(semantic_only.identification_tags.is_empty());
    assert!(Group::parse("  ").is_err());

    let msid = Msid::parse("stream-id track-id").unwrap();
    assert_eq!("stream-id", msid.id);
    assert_eq!(Some("track-id".to_owned()), msid.app_data);

    let msid = Msid::parse("stream-id").unwrap();
    assert_eq!(None, msid.app_data);
    assert!(Msid::parse("a b c").is_err());
}

#[test]
fn test_parse_ice_options() {
    let options = IceOptions::parse("trickle ice2").unwrap();
    assert_eq!(vec!["trickle", "ice2"], options.tags);
    assert!(IceOptions::parse(" ").is_err());
}

#[test]
fn test_parse_candidate() {
    let candidate =
        Candidate::parse("udpcandidate 1 udp 2130706431 10.0.1.1 53165 typ host").unwrap();
    assert_eq!("udpcandidate", candidate.foundation);
    assert_eq!(1, candidate.component_id);
    assert_eq!("udp", candidate.transport);
    assert_eq!(2130706431, candidate.priority);
    assert_eq!("10.0.1.1", candidate.connection_address);
    assert_eq!(53165, candidate.port);
    assert_eq!("host", candidate.candidate_type);
    assert_eq!(None, candidate.rel_addr);
    assert_eq!(None, candidate.rel_port);
    assert!(candidate.extension_pairs.is_empty());
    assert_eq!(
        "udpcandidate 1 udp 2130706431 10.0.1.1 53165 typ host",
        candidate.to_string()
    );
}

#[test]
fn test_parse_candidate_related_and_extensions() {
    let candidate = Candidate::parse(
        "1 2 UDP 1685987071 192.0.2.3 45664 typ srflx raddr 10.0.1.1 rport 8998 tcptype active generation 0",
    )
    .unwrap();
    assert_eq!(2, candidate.component_id);
    assert_eq!("srflx", candidate.candidate_type);
    assert_eq!(Some("10.0.1.1".to_owned()), candidate.rel_addr);
    assert_eq!(Some(8998), candidate.rel_port);
    assert_eq!(
        vec![
            ("tcptype".to_owned(), "active".to_owned()),
            ("generation".to_owned(), "0".to_owned()),
        ],
        candidate.extension_pairs
    );

    // round trip
    let text = candidate.to_string();
    assert_eq!(candidate, Candidate::parse(&text).unwrap());
}

#[test]
fn test_parse_candidate_failures() {
    // too short
    assert!(Candidate::parse("1 1 udp 1 10.0.1.1 1234 typ").is_err());
    // missing typ keyword
    assert!(Candidate::parse("1 1 udp 1 10.0.1.1 1234 xyz host").is_err());
    // odd number of trailing extension fields
    assert!(Candidate::parse(
        "1 1 udp 1 10.0.1.1 1234 typ host a 1 b 2 c 3 d 4 e"
    )
    .is_err());
    // bad numerics
    assert!(Candidate::parse("1 x udp 1 10.0.1.1 1234 typ host").is_err());
    assert!(Candidate::parse("1 1 udp 1 10.0.1.1 99999 typ host").is_err());
}

#[test]
fn test_parse_fingerprint_and_setup() {
    let fingerprint = Fingerprint::parse("sha-256 AA:BB:CC").unwrap();
    assert_eq!("sha-256", fingerprint.hash_func);
    assert_eq!("AA:BB:CC", fingerprint.fingerprint);
    assert!(Fingerprint::parse("sha-256").is_err());
    assert!(Fingerprint::parse("sha-256 AA BB").is_err());
}

#[test]
fn test_parse_crypto() {
    let crypto = Crypto::parse(
        "1 AES_CM_128_HMAC_SHA1_80 inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR|2^20|1:32 KDR=1",
    )
    .unwrap();
    assert_eq!(1, crypto.tag);
    assert_eq!("AES_CM_128_HMAC_SHA1_80", crypto.suite);
    assert_eq!(1, crypto.key_params.len());
    assert_eq!("inline", crypto.key_params[0].0);
    assert_eq!(
        "PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR|2^20|1:32",
        crypto.key_params[0].1
    );
    assert_eq!(vec!["KDR=1"], crypto.session_params);

    // multiple key params separated by ';'
    let crypto = Crypto::parse("2 F8_128_HMAC_SHA1_80 inline:abc;inline:def").unwrap();
    assert_eq!(2, crypto.key_params.len());

    assert!(Crypto::parse("1 AES_CM_128_HMAC_SHA1_80").is_err());
    assert!(Crypto::parse("x AES_CM_128_HMAC_SHA1_80 inline:abc").is_err());
    assert!(Crypto::parse("1 AES_CM_128_HMAC_SHA1_80 noinlinekey").is_err());
}

#[test]
fn test_parse_extmap() {
    let extmap = Extmap::parse("1 urn:ietf:params:rtp-hdrext:ssrc-audio-level").unwrap();
    assert_eq!(1, extmap.id);
    assert_eq!(Direction::SendRecv, extmap.direction);
    assert_eq!(
        "urn:ietf:params:rtp-hdrext:ssrc-audio-level",
        extmap.uri.as_str()
    );
    assert_eq!(None, extmap.ext_attributes);

    let extmap = Extmap::parse("2/recvonly urn:ietf:params:rtp-hdrext:toffset").unwrap();
    assert_eq!(2, extmap.id);
    assert_eq!(Direction::Recv, extmap.direction);

    let extmap = Extmap::parse("3 http://example.com/082005/ext.htm#xmeta short").unwrap();
    assert_eq!(Some("short".to_owned()), extmap.ext_attributes);

    assert!(Extmap::parse("1/inactive urn:ietf:params:rtp-hdrext:toffset").is_err());
    assert!(Extmap::parse("x urn:ietf:params:rtp-hdrext:toffset").is_err());
    assert!(Extmap::parse("1").is_err());
}

#[test]
fn test_parse_rtpmap() {
    let rtpmap = RtpMap::parse("111 opus/48000/2").unwrap();
    assert_eq!(111, rtpmap.payload_type);
    assert_eq!("opus", rtpmap.encoding_name);
    assert_eq!(Some(48000), rtpmap.clock_rate);
    assert_eq!(Some(2), rtpmap.encoding_params);
    assert_eq!("111 opus/48000/2", rtpmap.to_string());

    let rtpmap = RtpMap::parse("96 VP8/90000").unwrap();
    assert_eq!("VP8", rtpmap.encoding_name);
    assert_eq!(Some(90000), rtpmap.clock_rate);
    assert_eq!(None, rtpmap.encoding_params);

    assert!(RtpMap::parse("96").is_err());
    assert!(RtpMap::parse("300 opus/48000").is_err());
    assert!(RtpMap::parse("96 opus/x").is_err());
}

#[test]
fn test_parse_fmtp() {
    // the payload type is not part of the parameter list
    let fmtp = Fmtp::parse("96 apt=100").unwrap();
    assert_eq!(96, fmtp.format);
    assert_eq!(vec!["apt=100"], fmtp.format_specific);
    assert_eq!(
        vec![("apt".to_owned(), "100".to_owned())],
        fmtp.key_values()
    );

    // parameters may be split across whitespace
    let fmtp = Fmtp::parse("97 profile-level-id=42e01f; packetization-mode=1").unwrap();
    assert_eq!(
        vec![
            ("profile-level-id".to_owned(), "42e01f".to_owned()),
            ("packetization-mode".to_owned(), "1".to_owned()),
        ],
        fmtp.key_values()
    );

    // bare keys get an empty value
    let fmtp = Fmtp::parse("101 0-16").unwrap();
    assert_eq!(vec![("0-16".to_owned(), String::new())], fmtp.key_values());

    assert!(Fmtp::parse("96").is_err());
    assert!(Fmtp::parse("x apt=100").is_err());
}

#[test]
fn test_parse_rtcp() {
    let rtcp = Rtcp::parse("53020").unwrap();
    assert_eq!(53020, rtcp.port);
    assert_eq!(None, rtcp.net_type);

    let rtcp = Rtcp::parse("53020 IN IP4 126.16.64.4").unwrap();
    assert_eq!(Some("IN".to_owned()), rtcp.net_type);
    assert_eq!(Some("IP4".to_owned()), rtcp.addr_type);
    assert_eq!(Some("126.16.64.4".to_owned()), rtcp.connection_address);
    assert_eq!("53020 IN IP4 126.16.64.4", rtcp.to_string());

    assert!(Rtcp::parse("53020 IN IP4").is_err());
    assert!(Rtcp::parse("").is_err());
}

#[test]
fn test_parse_rtcp_fb() {
    let fb = RtcpFb::parse("96 nack pli").unwrap();
    assert_eq!(Some(96), fb.payload_type);
    assert_eq!("nack", fb.id);
    assert_eq!(Some("pli".to_owned()), fb.param1);
    assert_eq!(None, fb.param2);

    let fb = RtcpFb::parse("* ccm fir").unwrap();
    assert_eq!(None, fb.payload_type);
    assert_eq!("ccm", fb.id);

    let fb = RtcpFb::parse("96 goog-remb").unwrap();
    assert_eq!(None, fb.param1);

    assert!(RtcpFb::parse("96").is_err());
    assert!(RtcpFb::parse("96 a b c d").is_err());
}

#[test]
fn test_parse_ssrc() {
    let ssrc = Ssrc::parse("2231627014 cname:Yv2Gies2").unwrap();
    assert_eq!(2231627014, ssrc.ssrc);
    assert_eq!("cname", ssrc.attribute);
    assert_eq!(vec!["Yv2Gies2"], ssrc.attribute_values());
    assert_eq!("2231627014 cname:Yv2Gies2", ssrc.to_string());

    let ssrc = Ssrc::parse("1234 msid:stream track").unwrap();
    assert_eq!("msid", ssrc.attribute);
    assert_eq!(vec!["stream", "track"], ssrc.attribute_values());
    assert_eq!("1234 msid:stream track", ssrc.to_string());

    let ssrc = Ssrc::parse("1234 somename").unwrap();
    assert_eq!("somename", ssrc.attribute);
    assert!(ssrc.attribute_values().is_empty());

    assert!(Ssrc::parse("1234").is_err());
    assert!(Ssrc::parse("notanumber cname:x").is_err());
}

#[test]
fn test_parse_ssrc_group() {
    let group = SsrcGroup::parse("FID 2231627014 632943048").unwrap();
    assert_eq!("FID", group.semantics);
    assert_eq!(vec![2231627014, 632943048], group.ssrcs);
    assert_eq!("FID 2231627014 632943048", group.to_string());

    assert!(SsrcGroup::parse("FID").is_err());
    assert!(SsrcGroup::parse("FID x").is_err());
}

#[test]
fn test_parse_simulcast() {
    let simulcast = Simulcast::parse("send 1;~2,3 recv 4").unwrap();
    assert_eq!(2, simulcast.entries.len());

    let send = &simulcast.entries[0];
    assert_eq!(Direction::Send, send.direction);
    assert_eq!(2, send.alternatives.len());
    assert_eq!(1, send.alternatives[0].len());
    assert_eq!("1", send.alternatives[0][0].rid);
    assert!(!send.alternatives[0][0].paused);
    assert_eq!(2, send.alternatives[1].len());
    assert_eq!("2", send.alternatives[1][0].rid);
    assert!(send.alternatives[1][0].paused);
    assert_eq!("3", send.alternatives[1][1].rid);
    assert!(!send.alternatives[1][1].paused);

    let recv = &simulcast.entries[1];
    assert_eq!(Direction::Recv, recv.direction);
    assert_eq!(vec![vec![SimulcastStream {
        rid: "4".to_owned(),
        paused: false
    }]], recv.alternatives);

    assert_eq!("send 1;~2,3 recv 4", simulcast.to_string());

    assert!(Simulcast::parse("send").is_err());
    assert!(Simulcast::parse("send 1 recv").is_err());
    assert!(Simulcast::parse("sendrecv 1").is_err());
    assert!(Simulcast::parse("inactive 1").is_err());
}

#[test]
fn test_parse_rid() {
    let rid = Rid::parse("hi send pt=96,97;max-width=1280").unwrap();
    assert_eq!("hi", rid.id);
    assert_eq!(Direction::Send, rid.direction);
    assert_eq!(vec![96, 97], rid.payload_types);
    assert_eq!(
        vec![("max-width".to_owned(), "1280".to_owned())],
        rid.params
    );
    assert_eq!("hi send pt=96,97;max-width=1280", rid.to_string());

    let rid = Rid::parse("lo recv max-width=640").unwrap();
    assert!(rid.payload_types.is_empty());

    assert!(Rid::parse("hi send").is_err());
    assert!(Rid::parse("hi sendrecv pt=96").is_err());
    assert!(Rid::parse("hi inactive pt=96").is_err());
    assert!(Rid::parse("hi send pt=").is_err());
    assert!(Rid::parse("hi send pt=x").is_err());
}

#[test]
fn test_parse_scalar_attributes() {
    assert_eq!(20, parse_millis("20", "ptime").unwrap());
    assert!(parse_millis("x", "ptime").is_err());

    assert_eq!(5000, parse_sctp_port("5000").unwrap());
    assert!(parse_sctp_port("70000").is_err());

    assert_eq!(262144, parse_max_message_size("262144").unwrap());
    assert!(parse_max_message_size("x").is_err());
}

use super::*;
use crate::direction::Direction;

const MINIMAL: &str = "v=0\r\n\
o=- 1 2 IN IP4 0.0.0.0\r\n\
s=-\r\n\
t=0 0\r\n";

#[test]
fn test_parse_minimal_session() {
    let doc = parse(MINIMAL).unwrap();
    assert_eq!(Some(0), doc.version);
    let origin = doc.origin.unwrap();
    assert_eq!(1, origin.session_id);
    assert_eq!(2, origin.session_version);
    assert_eq!(Some("-".to_owned()), doc.session_name);
    assert_eq!(0, doc.timing.unwrap().start_time);
    assert!(doc.media.is_empty());
}

#[test]
fn test_parse_media_section() {
    let blob = format!(
        "{MINIMAL}\
m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
c=IN IP4 1.2.3.4\r\n\
b=AS:128\r\n\
a=mid:a1\r\n\
a=ice-ufrag:xy\r\n\
a=ice-pwd:0123456789abcdef\r\n\
a=rtpmap:111 opus/48000/2\r\n\
a=fmtp:111 useinbandfec=1\r\n\
a=rtcp-mux\r\n\
a=sendrecv\r\n"
    );
    let doc = parse(&blob).unwrap();
    assert_eq!(1, doc.media.len());

    let media = &doc.media[0];
    assert_eq!("audio", media.media_name.media);
    assert_eq!(Some("a1".to_owned()), media.mid);
    assert_eq!(Some("xy".to_owned()), media.ice_ufrag);
    assert_eq!(Some("1.2.3.4".to_owned()), media.connection.as_ref().map(|c| c.connection_address.clone()));
    assert_eq!(1, media.bandwidths.len());
    assert_eq!(1, media.rtpmaps.len());
    assert_eq!(1, media.fmtps.len());
    assert!(media.rtcp_mux);
    assert_eq!(Some(Direction::SendRecv), media.direction);
    assert_eq!(None, doc.direction);
}

#[test]
fn test_session_level_bandwidth_is_ignored() {
    let blob = format!("{MINIMAL}b=AS:128\r\n");
    let doc = parse(&blob).unwrap();
    assert!(doc.media.is_empty());
}

#[test]
fn test_session_direction_and_ice_lite() {
    let blob = format!("{MINIMAL}a=ice-lite\r\na=recvonly\r\n");
    let doc = parse(&blob).unwrap();
    assert!(doc.ice_lite);
    assert_eq!(Some(Direction::Recv), doc.direction);
}

#[test]
fn test_duplicate_single_valued_fails() {
    let tests = [
        format!("{MINIMAL}s=-\r\n"),
        format!("{MINIMAL}t=0 0\r\n"),
        format!("{MINIMAL}a=sendrecv\r\na=sendonly\r\n"),
        format!("{MINIMAL}m=audio 9 UDP/TLS/RTP/SAVPF 0\r\na=mid:a\r\na=mid:b\r\n"),
        format!("{MINIMAL}m=audio 9 UDP/TLS/RTP/SAVPF 0\r\na=ptime:20\r\na=ptime:30\r\n"),
        format!("{MINIMAL}m=audio 9 UDP/TLS/RTP/SAVPF 0\r\nc=IN IP4 0.0.0.0\r\nc=IN IP4 0.0.0.0\r\n"),
    ];

    for blob in tests {
        match parse(&blob) {
            Err(Error::DuplicateSingleValued(_)) => {}
            other => panic!("expected DuplicateSingleValued, got {other:?} for {blob}"),
        }
    }
}

#[test]
fn test_scope_violations() {
    let tests = [
        // mid before any media line
        format!("{MINIMAL}a=mid:a1\r\n"),
        // group at media level
        format!("{MINIMAL}m=audio 9 UDP/TLS/RTP/SAVPF 0\r\na=group:BUNDLE a1\r\n"),
        // ice-options is session only
        format!("{MINIMAL}m=audio 9 UDP/TLS/RTP/SAVPF 0\r\na=ice-options:trickle\r\n"),
        // v= inside a media section
        format!("{MINIMAL}m=audio 9 UDP/TLS/RTP/SAVPF 0\r\nv=0\r\n"),
    ];

    for blob in tests {
        match parse(&blob) {
            Err(Error::ScopeViolation(_)) => {}
            other => panic!("expected ScopeViolation, got {other:?} for {blob}"),
        }
    }
}

#[test]
fn test_flag_with_value_fails() {
    let blob = format!("{MINIMAL}m=audio 9 UDP/TLS/RTP/SAVPF 0\r\na=rtcp-mux:yes\r\n");
    match parse(&blob) {
        Err(Error::MalformedAttribute(_)) => {}
        other => panic!("expected MalformedAttribute, got {other:?}"),
    }

    let blob = format!("{MINIMAL}m=audio 9 UDP/TLS/RTP/SAVPF 0\r\na=mid\r\n");
    match parse(&blob) {
        Err(Error::MalformedAttribute(_)) => {}
        other => panic!("expected MalformedAttribute, got {other:?}"),
    }
}

#[test]
fn test_unknown_attributes_are_dropped() {
    let blob = format!(
        "{MINIMAL}\
a=unknown-thing:whatever\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 0\r\n\
a=another-unknown\r\n"
    );
    let doc = parse(&blob).unwrap();
    assert_eq!(1, doc.media.len());
}

#[test]
fn test_source_level_fmtp_attaches_to_ssrc() {
    let blob = format!(
        "{MINIMAL}\
m=video 9 UDP/TLS/RTP/SAVPF 96\r\n\
a=rtpmap:96 VP8/90000\r\n\
a=ssrc:1111 cname:first\r\n\
a=fmtp:96 max-fr=30\r\n\
a=ssrc:2222 cname:second\r\n\
a=fmtp:96 max-fr=15\r\n"
    );
    let doc = parse(&blob).unwrap();
    let media = &doc.media[0];

    // the media line keeps no fmtp of its own, each source owns one
    assert!(media.fmtps.is_empty());
    assert_eq!(2, media.ssrcs.len());
    assert_eq!(1, media.ssrcs[0].fmtps.len());
    assert_eq!(vec!["max-fr=30"], media.ssrcs[0].fmtps[0].format_specific);
    assert_eq!(1, media.ssrcs[1].fmtps.len());
    assert_eq!(vec!["max-fr=15"], media.ssrcs[1].fmtps[0].format_specific);
}

#[test]
fn test_source_level_falls_back_to_media() {
    // rtcp-mux is not legal at source level, so the ssrc scope ends there
    let blob = format!(
        "{MINIMAL}\
m=video 9 UDP/TLS/RTP/SAVPF 96\r\n\
a=ssrc:1111 cname:first\r\n\
a=rtcp-mux\r\n\
a=fmtp:96 max-fr=30\r\n"
    );
    let doc = parse(&blob).unwrap();
    let media = &doc.media[0];
    assert!(media.rtcp_mux);
    // once back at media level the fmtp belongs to the media line
    assert_eq!(1, media.fmtps.len());
    assert!(media.ssrcs[0].fmtps.is_empty());
}

#[test]
fn test_media_resets_source_scope() {
    let blob = format!(
        "{MINIMAL}\
m=video 9 UDP/TLS/RTP/SAVPF 96\r\n\
a=ssrc:1111 cname:first\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 0\r\n\
a=mid:a1\r\n"
    );
    let doc = parse(&blob).unwrap();
    assert_eq!(2, doc.media.len());
    assert_eq!(Some("a1".to_owned()), doc.media[1].mid);
}

#[test]
fn test_version_must_be_zero() {
    match parse("v=1\r\n") {
        Err(Error::UnsupportedVersion(token)) => assert_eq!("1", token),
        other => panic!("expected UnsupportedVersion, got {other:?}"),
    }
}

#[test]
fn test_parse_is_deterministic() {
    let blob = format!(
        "{MINIMAL}\
a=group:BUNDLE a1\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
a=mid:a1\r\n\
a=ice-ufrag:xy\r\n\
a=ice-pwd:pw\r\n\
a=rtpmap:111 opus/48000/2\r\n"
    );
    let first = parse(&blob).unwrap();
    let second = parse(&blob).unwrap();
    assert_eq!(first, second);
}

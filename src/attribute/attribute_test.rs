use super::*;

#[test]
fn test_attribute_round_trip() {
    let names = [
        "group",
        "bundle-only",
        "msid",
        "msid-semantic",
        "ice-ufrag",
        "ice-pwd",
        "ice-options",
        "ice-lite",
        "candidate",
        "end-of-candidates",
        "fingerprint",
        "crypto",
        "setup",
        "mid",
        "extmap",
        "sendrecv",
        "sendonly",
        "recvonly",
        "inactive",
        "rtpmap",
        "fmtp",
        "rtcp",
        "rtcp-mux",
        "rtcp-fb",
        "rtcp-rsize",
        "ptime",
        "maxptime",
        "ssrc",
        "ssrc-group",
        "simulcast",
        "rid",
        "sctp-port",
        "max-message-size",
    ];

    for name in names {
        let attribute = Attribute::from_name(name);
        assert_ne!(Attribute::Unknown, attribute, "{name}");
        assert_eq!(name, attribute.name());
    }

    assert_eq!(Attribute::Unknown, Attribute::from_name("no-such-attr"));
    // lookup is case sensitive
    assert_eq!(Attribute::Unknown, Attribute::from_name("Mid"));
}

#[test]
fn test_value_predicates() {
    let flags = [
        Attribute::BundleOnly,
        Attribute::IceLite,
        Attribute::EndOfCandidates,
        Attribute::SendRecv,
        Attribute::SendOnly,
        Attribute::RecvOnly,
        Attribute::Inactive,
        Attribute::RtcpMux,
        Attribute::RtcpRsize,
    ];
    for attribute in flags {
        assert!(attribute.requires_empty_value(), "{attribute}");
        assert!(!attribute.requires_value(), "{attribute}");
    }

    let valued = [
        Attribute::Group,
        Attribute::Mid,
        Attribute::Candidate,
        Attribute::RtpMap,
        Attribute::Fmtp,
        Attribute::Ssrc,
        Attribute::MaxMessageSize,
    ];
    for attribute in valued {
        assert!(attribute.requires_value(), "{attribute}");
        assert!(!attribute.requires_empty_value(), "{attribute}");
    }
}

#[test]
fn test_allowed_scopes() {
    assert!(LineType::Version.allowed_scopes().allows(Scope::Session));
    assert!(!LineType::Version.allowed_scopes().allows(Scope::Media));
    assert!(LineType::Bandwidth.allowed_scopes().allows(Scope::Media));
    assert!(LineType::Connection.allowed_scopes().allows(Scope::Session));
    assert!(!LineType::Media.allowed_scopes().allows(Scope::Media));

    assert!(Attribute::Group.allowed_scopes().allows(Scope::Session));
    assert!(!Attribute::Group.allowed_scopes().allows(Scope::Media));
    assert!(Attribute::Mid.allowed_scopes().allows(Scope::Media));
    assert!(!Attribute::Mid.allowed_scopes().allows(Scope::Session));
    assert!(Attribute::Fmtp.allowed_scopes().allows(Scope::Media));
    assert!(Attribute::Fmtp.allowed_scopes().allows(Scope::Source));
    assert!(!Attribute::Fmtp.allowed_scopes().allows(Scope::Session));
    assert!(Attribute::Setup.allowed_scopes().allows(Scope::Session));
    assert!(Attribute::Setup.allowed_scopes().allows(Scope::Media));
    assert!(!Attribute::Ssrc.allowed_scopes().allows(Scope::Source));
}

#[test]
fn test_split_attribute() {
    let tests: Vec<(&str, (&str, Option<&str>))> = vec![
        ("mid:a1", ("mid", Some("a1"))),
        ("sendrecv", ("sendrecv", None)),
        ("mid : a1", ("mid", Some("a1"))),
        ("mid:", ("mid", None)),
        ("msid:stream track", ("msid", Some("stream track"))),
        ("ssrc:1234 cname:foo", ("ssrc", Some("1234 cname:foo"))),
    ];

    for (raw, expected) in tests {
        let got = split_attribute(raw).unwrap();
        assert_eq!(expected, got, "{raw}");
    }

    // name followed by garbage instead of a colon
    assert!(split_attribute("mid a1").is_err());
}

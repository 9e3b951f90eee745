use super::*;
use crate::lines::Fmtp;

fn capability_for(pt: u8) -> CodecCapability {
    CodecCapability {
        preferred_payload_type: pt,
        ..Default::default()
    }
}

#[test]
fn test_supported_codec_lookup() {
    let tests = [
        ("opus", SupportedCodec::Opus),
        ("OPUS", SupportedCodec::Opus),
        ("VP8", SupportedCodec::Vp8),
        ("vp8", SupportedCodec::Vp8),
        ("H264", SupportedCodec::H264),
        ("rtx", SupportedCodec::Rtx),
        ("red", SupportedCodec::Red),
        ("ulpfec", SupportedCodec::UlpFec),
        ("flexfec", SupportedCodec::FlexFec),
        ("PCMU", SupportedCodec::Pcmu),
        ("telephone-event", SupportedCodec::TelephoneEvent),
        ("nonsense", SupportedCodec::Unknown),
    ];
    for (name, expected) in tests {
        assert_eq!(expected, SupportedCodec::from_encoding_name(name), "{name}");
    }
}

#[test]
fn test_codec_kinds() {
    assert_eq!(CodecKind::Audio, SupportedCodec::Opus.kind());
    assert_eq!(CodecKind::Audio, SupportedCodec::Pcmu.kind());
    assert_eq!(CodecKind::Video, SupportedCodec::Vp8.kind());
    assert_eq!(CodecKind::Rtx, SupportedCodec::Rtx.kind());
    assert_eq!(CodecKind::Fec, SupportedCodec::Red.kind());
    assert_eq!(CodecKind::Audio, CodecKind::from_media("audio"));
    assert_eq!(CodecKind::Video, CodecKind::from_media("video"));
    assert_eq!(CodecKind::Data, CodecKind::from_media("application"));
    assert_eq!(CodecKind::Unknown, CodecKind::from_media("text"));
}

#[test]
fn test_reserved_codecs() {
    assert_eq!(SupportedCodec::Pcmu, reserved_codec(0));
    assert_eq!(SupportedCodec::Pcma, reserved_codec(8));
    assert_eq!(SupportedCodec::G722, reserved_codec(9));
    assert_eq!(SupportedCodec::Cn, reserved_codec(13));
    assert_eq!(SupportedCodec::Unknown, reserved_codec(96));
    assert_eq!(Some(8000), SupportedCodec::Pcmu.default_clock_rate());
    assert_eq!(Some(48000), SupportedCodec::Opus.default_clock_rate());
    assert_eq!(Some(90000), SupportedCodec::Vp8.default_clock_rate());
}

#[test]
fn test_opus_format_parameters() {
    let fmtp = Fmtp::parse(
        "111 maxplaybackrate=16000;stereo=1;useinbandfec=1;maxptime=40;ptime=20",
    )
    .unwrap();
    let mut capability = capability_for(111);
    parse_format_parameters(SupportedCodec::Opus, &fmtp, &mut capability).unwrap();

    // ptime and maxptime land on the capability, not on the codec params
    assert_eq!(Some(20), capability.ptime);
    assert_eq!(Some(40), capability.max_ptime);
    let Some(CodecParameters::Opus(params)) = capability.parameters else {
        panic!("expected opus parameters");
    };
    assert_eq!(Some(16000), params.max_playback_rate);
    assert_eq!(Some(true), params.stereo);
    assert_eq!(Some(true), params.use_inband_fec);
    assert_eq!(None, params.use_dtx);

    let fmtp = Fmtp::parse("111 stereo=2").unwrap();
    let mut capability = capability_for(111);
    assert!(parse_format_parameters(SupportedCodec::Opus, &fmtp, &mut capability).is_err());
}

#[test]
fn test_h264_format_parameters() {
    let fmtp = Fmtp::parse(
        "97 profile-level-id=42e01f;packetization-mode=1;max-mbps=108000",
    )
    .unwrap();
    let mut capability = capability_for(97);
    parse_format_parameters(SupportedCodec::H264, &fmtp, &mut capability).unwrap();

    let Some(CodecParameters::H264(params)) = capability.parameters else {
        panic!("expected h264 parameters");
    };
    assert_eq!(Some(0x42e01f), params.profile_level_id);
    assert_eq!(vec![1], params.packetization_modes);
    assert_eq!(Some(108000), params.max_mbps);

    let fmtp = Fmtp::parse("97 profile-level-id=zzz").unwrap();
    let mut capability = capability_for(97);
    assert!(parse_format_parameters(SupportedCodec::H264, &fmtp, &mut capability).is_err());
}

#[test]
fn test_rtx_requires_apt() {
    let fmtp = Fmtp::parse("96 apt=100;rtx-time=200").unwrap();
    let mut capability = capability_for(96);
    parse_format_parameters(SupportedCodec::Rtx, &fmtp, &mut capability).unwrap();
    let Some(CodecParameters::Rtx(params)) = capability.parameters else {
        panic!("expected rtx parameters");
    };
    assert_eq!(100, params.apt);
    assert_eq!(Some(200), params.rtx_time);

    let fmtp = Fmtp::parse("96 rtx-time=200").unwrap();
    let mut capability = capability_for(96);
    match parse_format_parameters(SupportedCodec::Rtx, &fmtp, &mut capability) {
        Err(Error::MissingRequired(_)) => {}
        other => panic!("expected MissingRequired, got {other:?}"),
    }
}

#[test]
fn test_flexfec_requires_repair_window() {
    let fmtp = Fmtp::parse("98 L=5;D=10;ToP=2;repair-window=200000").unwrap();
    let mut capability = capability_for(98);
    parse_format_parameters(SupportedCodec::FlexFec, &fmtp, &mut capability).unwrap();
    let Some(CodecParameters::FlexFec(params)) = capability.parameters else {
        panic!("expected flexfec parameters");
    };
    assert_eq!(Some(5), params.l);
    assert_eq!(Some(10), params.d);
    assert_eq!(Some(2), params.top);
    assert_eq!(200000, params.repair_window);

    let fmtp = Fmtp::parse("98 L=5").unwrap();
    let mut capability = capability_for(98);
    match parse_format_parameters(SupportedCodec::FlexFec, &fmtp, &mut capability) {
        Err(Error::MissingRequired(_)) => {}
        other => panic!("expected MissingRequired, got {other:?}"),
    }
}

#[test]
fn test_unknown_keys_are_ignored() {
    let fmtp = Fmtp::parse("96 max-fr=30;future-knob=7").unwrap();
    let mut capability = capability_for(96);
    parse_format_parameters(SupportedCodec::Vp8, &fmtp, &mut capability).unwrap();
    let Some(CodecParameters::Vp8(params)) = capability.parameters else {
        panic!("expected vp8 parameters");
    };
    assert_eq!(Some(30), params.max_fr);
}

#[test]
fn test_capabilities_to_parameters() {
    let capabilities = Capabilities {
        codecs: vec![CodecCapability {
            name: "opus".to_owned(),
            kind: "audio".to_owned(),
            clock_rate: Some(48000),
            preferred_payload_type: 111,
            num_channels: Some(2),
            rtcp_feedback: vec![RtcpFeedback {
                kind: "nack".to_owned(),
                parameter: None,
            }],
            ..Default::default()
        }],
        header_extensions: vec![HeaderExtension {
            kind: "audio".to_owned(),
            uri: "urn:ietf:params:rtp-hdrext:ssrc-audio-level".to_owned(),
            preferred_id: 1,
            preferred_encrypt: false,
        }],
        fec_mechanisms: vec![],
    };

    let parameters = capabilities_to_parameters(&capabilities);
    assert_eq!(1, parameters.codecs.len());
    assert_eq!(111, parameters.codecs[0].payload_type);
    assert_eq!("opus", parameters.codecs[0].name);
    assert_eq!(Some(48000), parameters.codecs[0].clock_rate);
    assert_eq!(1, parameters.header_extensions.len());
    assert_eq!(1, parameters.header_extensions[0].id);
    assert!(parameters.encodings.is_empty());
    assert!(parameters.mux_id.is_empty());
}

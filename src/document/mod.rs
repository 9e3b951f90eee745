//! The working document: an ordered record list that the pipeline stages
//! narrow and the fold passes drain into a session object with media-line
//! children.

use crate::attribute::{split_attribute, Attribute, LineType, Scope};
use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::lexer::{tokenize, LineRecord};
use crate::lines::{
    parse_max_message_size, parse_millis, parse_sctp_port, parse_version, Bandwidth, Candidate,
    Connection, Crypto, Extmap, Fingerprint, Fmtp, Group, IceOptions, LineValue, MediaName, Msid,
    Origin, Rid, Rtcp, RtcpFb, RtpMap, Simulcast, Ssrc, SsrcGroup, Timing,
};

#[cfg(test)]
mod document_test;

/// One `m=` section and everything folded into it.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaLine {
    pub media_name: MediaName,
    pub bandwidths: Vec<Bandwidth>,
    pub connection: Option<Connection>,
    pub msids: Vec<Msid>,
    pub ice_ufrag: Option<String>,
    pub ice_pwd: Option<String>,
    pub candidates: Vec<Candidate>,
    pub fingerprints: Vec<Fingerprint>,
    pub cryptos: Vec<Crypto>,
    pub setup: Option<String>,
    pub mid: Option<String>,
    pub extmaps: Vec<Extmap>,
    pub rtpmaps: Vec<RtpMap>,
    pub fmtps: Vec<Fmtp>,
    pub rtcp: Option<Rtcp>,
    pub rtcp_fbs: Vec<RtcpFb>,
    pub ptime: Option<u64>,
    pub max_ptime: Option<u64>,
    pub ssrcs: Vec<Ssrc>,
    pub ssrc_groups: Vec<SsrcGroup>,
    pub simulcast: Option<Simulcast>,
    pub rids: Vec<Rid>,
    pub sctp_port: Option<u16>,
    pub max_message_size: Option<u64>,
    pub bundle_only: bool,
    pub end_of_candidates: bool,
    pub rtcp_mux: bool,
    pub rtcp_rsize: bool,
    pub direction: Option<Direction>,
}

impl MediaLine {
    pub(crate) fn new(media_name: MediaName) -> Self {
        MediaLine {
            media_name,
            bandwidths: vec![],
            connection: None,
            msids: vec![],
            ice_ufrag: None,
            ice_pwd: None,
            candidates: vec![],
            fingerprints: vec![],
            cryptos: vec![],
            setup: None,
            mid: None,
            extmaps: vec![],
            rtpmaps: vec![],
            fmtps: vec![],
            rtcp: None,
            rtcp_fbs: vec![],
            ptime: None,
            max_ptime: None,
            ssrcs: vec![],
            ssrc_groups: vec![],
            simulcast: None,
            rids: vec![],
            sctp_port: None,
            max_message_size: None,
            bundle_only: false,
            end_of_candidates: false,
            rtcp_mux: false,
            rtcp_rsize: false,
            direction: None,
        }
    }
}

/// The parsed SDP document: session-level values plus the ordered media
/// sections. Produced by [`parse`]; consumed by the description translator
/// and the generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SdpDoc {
    pub(crate) records: Vec<LineRecord>,
    pub version: Option<u64>,
    pub origin: Option<Origin>,
    pub session_name: Option<String>,
    pub timing: Option<Timing>,
    pub connection: Option<Connection>,
    pub groups: Vec<Group>,
    pub msid_semantics: Vec<Group>,
    pub fingerprints: Vec<Fingerprint>,
    pub extmaps: Vec<Extmap>,
    pub ice_ufrag: Option<String>,
    pub ice_pwd: Option<String>,
    pub ice_options: Option<IceOptions>,
    pub setup: Option<String>,
    pub ice_lite: bool,
    pub direction: Option<Direction>,
    pub media: Vec<MediaLine>,
}

/// What a fold handler decided to do with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FoldAction {
    Keep,
    Remove,
}

/// Parses an SDP blob into an [`SdpDoc`].
///
/// The pipeline tokenizes the text, resolves and validates attributes,
/// assigns each line its level, parses typed values, then folds every
/// record into the session or its media sections. Unknown line types and
/// attributes are dropped with a warning; grammar violations abort.
pub fn parse(blob: &str) -> Result<SdpDoc> {
    let mut doc = SdpDoc {
        records: tokenize(blob),
        ..Default::default()
    };

    doc.split_attributes()?;
    doc.validate_scopes()?;
    doc.parse_line_values()?;
    doc.fold_flags()?;
    doc.fold_session()?;
    doc.fold_media()?;
    doc.fold_source()?;

    debug_assert!(
        doc.records.is_empty(),
        "records survived every fold: {:?}",
        doc.records
    );
    doc.records.clear();

    Ok(doc)
}

impl SdpDoc {
    /// Resolves `a=` names and enforces the value predicates.
    fn split_attributes(&mut self) -> Result<()> {
        for record in &mut self.records {
            if record.line_type != LineType::Attribute {
                continue;
            }

            let (name, value) = split_attribute(&record.raw_value)?;
            let attribute = Attribute::from_name(name);
            if attribute == Attribute::Unknown {
                log::warn!("attribute is not understood: {name}");
                record.attribute = Some(attribute);
                continue;
            }

            match value {
                Some(value) => {
                    if attribute.requires_empty_value() {
                        return Err(Error::MalformedAttribute(format!(
                            "{name} must not carry a value: {value}"
                        )));
                    }
                    record.attr_value = Some(value.to_owned());
                }
                None => {
                    if attribute.requires_value() {
                        return Err(Error::MalformedAttribute(format!(
                            "{name} requires a value"
                        )));
                    }
                }
            }
            record.attribute = Some(attribute);
        }
        Ok(())
    }

    /// Walks the records assigning each its level and rejecting lines that
    /// appear at an illegal one.
    fn validate_scopes(&mut self) -> Result<()> {
        let mut current = Scope::Session;

        for record in &mut self.records {
            // an m= line is a session-level construct that opens a new
            // media section
            if record.line_type == LineType::Media {
                current = Scope::Session;
            }

            if record.line_type == LineType::Attribute
                && record.attribute == Some(Attribute::Unknown)
            {
                continue;
            }

            let allowed = match (record.line_type, record.attribute) {
                (LineType::Attribute, Some(attribute)) => attribute.allowed_scopes(),
                _ => record.line_type.allowed_scopes(),
            };

            // source level ends at the first line that is not legal there
            if current == Scope::Source
                && !allowed.allows(Scope::Source)
                && allowed.allows(Scope::Media)
            {
                current = Scope::Media;
            }

            if !allowed.allows(current) {
                let what = match record.attribute {
                    Some(attribute) => format!("a={attribute}"),
                    None => format!("{}=", record.line_type),
                };
                return Err(Error::ScopeViolation(format!(
                    "{what} is not legal at {current} level"
                )));
            }

            record.scope = current;

            if record.line_type == LineType::Media {
                current = Scope::Media;
            } else if record.attribute == Some(Attribute::Ssrc) {
                current = Scope::Source;
            }
        }
        Ok(())
    }

    /// Runs the per-line value parsers, building the media arena and
    /// recording which media section / source each record belongs to.
    fn parse_line_values(&mut self) -> Result<()> {
        let mut current_media: Option<usize> = None;
        let mut ssrcs_in_media = 0usize;
        let mut discard = Vec::new();

        // take the records out so the media arena stays reachable
        let mut records = std::mem::take(&mut self.records);
        let result = self.parse_line_values_into(
            &mut records,
            &mut current_media,
            &mut ssrcs_in_media,
            &mut discard,
        );
        for index in discard.into_iter().rev() {
            records.remove(index);
        }
        self.records = records;
        result
    }

    fn parse_line_values_into(
        &mut self,
        records: &mut [LineRecord],
        current_media: &mut Option<usize>,
        ssrcs_in_media: &mut usize,
        discard: &mut Vec<usize>,
    ) -> Result<()> {
        for (index, record) in records.iter_mut().enumerate() {
            if record.scope == Scope::Session {
                *current_media = None;
            }

            record.media_index = *current_media;

            let value = match record.line_type {
                LineType::Version => LineValue::Version(parse_version(&record.raw_value)?),
                LineType::Origin => LineValue::Origin(Origin::parse(&record.raw_value)?),
                LineType::SessionName => LineValue::SessionName(record.raw_value.clone()),
                LineType::Timing => LineValue::Timing(Timing::parse(&record.raw_value)?),
                LineType::Connection => {
                    LineValue::Connection(Connection::parse(&record.raw_value)?)
                }
                LineType::Bandwidth => {
                    if record.scope == Scope::Session {
                        // JSEP 5.2.1: session level bandwidth is ignored
                        discard.push(index);
                        continue;
                    }
                    LineValue::Bandwidth(Bandwidth::parse(&record.raw_value)?)
                }
                LineType::Media => {
                    self.media
                        .push(MediaLine::new(MediaName::parse(&record.raw_value)?));
                    *current_media = Some(self.media.len() - 1);
                    *ssrcs_in_media = 0;
                    LineValue::Media(self.media.len() - 1)
                }
                LineType::Attribute => {
                    let Some(attribute) = record.attribute else {
                        continue;
                    };
                    let value = record.attr_value.as_deref().unwrap_or_default();
                    match attribute {
                        Attribute::Unknown => continue,
                        Attribute::Group => LineValue::Group(Group::parse(value)?),
                        Attribute::MsidSemantic => LineValue::MsidSemantic(Group::parse(value)?),
                        Attribute::Msid => LineValue::Msid(Msid::parse(value)?),
                        Attribute::IceUfrag => LineValue::IceUfrag(value.trim().to_owned()),
                        Attribute::IcePwd => LineValue::IcePwd(value.trim().to_owned()),
                        Attribute::IceOptions => LineValue::IceOptions(IceOptions::parse(value)?),
                        Attribute::Candidate => LineValue::Candidate(Candidate::parse(value)?),
                        Attribute::Fingerprint => {
                            LineValue::Fingerprint(Fingerprint::parse(value)?)
                        }
                        Attribute::Crypto => LineValue::Crypto(Crypto::parse(value)?),
                        Attribute::Setup => LineValue::Setup(value.trim().to_owned()),
                        Attribute::Mid => LineValue::Mid(value.trim().to_owned()),
                        Attribute::Extmap => LineValue::Extmap(Extmap::parse(value)?),
                        Attribute::SendRecv => LineValue::Direction(Direction::SendRecv),
                        Attribute::SendOnly => LineValue::Direction(Direction::Send),
                        Attribute::RecvOnly => LineValue::Direction(Direction::Recv),
                        Attribute::Inactive => LineValue::Direction(Direction::Inactive),
                        Attribute::RtpMap => LineValue::RtpMap(RtpMap::parse(value)?),
                        Attribute::Fmtp => {
                            if record.scope == Scope::Source {
                                if *ssrcs_in_media == 0 {
                                    return Err(Error::ScopeViolation(format!(
                                        "fmtp at source level without a source: {value}"
                                    )));
                                }
                                record.source_index = Some(*ssrcs_in_media - 1);
                            }
                            LineValue::Fmtp(Fmtp::parse(value)?)
                        }
                        Attribute::Rtcp => LineValue::Rtcp(Rtcp::parse(value)?),
                        Attribute::RtcpFb => LineValue::RtcpFb(RtcpFb::parse(value)?),
                        Attribute::PTime => LineValue::PTime(parse_millis(value, "ptime")?),
                        Attribute::MaxPTime => {
                            LineValue::MaxPTime(parse_millis(value, "maxptime")?)
                        }
                        Attribute::Ssrc => {
                            *ssrcs_in_media += 1;
                            LineValue::Ssrc(Ssrc::parse(value)?)
                        }
                        Attribute::SsrcGroup => LineValue::SsrcGroup(SsrcGroup::parse(value)?),
                        Attribute::Simulcast => LineValue::Simulcast(Simulcast::parse(value)?),
                        Attribute::Rid => LineValue::Rid(Rid::parse(value)?),
                        Attribute::SctpPort => LineValue::SctpPort(parse_sctp_port(value)?),
                        Attribute::MaxMessageSize => {
                            LineValue::MaxMessageSize(parse_max_message_size(value)?)
                        }
                        Attribute::BundleOnly
                        | Attribute::IceLite
                        | Attribute::EndOfCandidates
                        | Attribute::RtcpMux
                        | Attribute::RtcpRsize => continue,
                    }
                }
            };

            record.parsed = Some(value);
        }

        Ok(())
    }

    fn fold<F>(&mut self, mut handler: F) -> Result<()>
    where
        F: FnMut(&mut SdpDoc, &mut LineRecord) -> Result<FoldAction>,
    {
        let records = std::mem::take(&mut self.records);
        let mut kept = Vec::with_capacity(records.len());
        for mut record in records {
            match handler(self, &mut record) {
                Ok(FoldAction::Keep) => kept.push(record),
                Ok(FoldAction::Remove) => {}
                Err(err) => {
                    self.records = kept;
                    return Err(err);
                }
            }
        }
        self.records = kept;
        Ok(())
    }

    fn media_mut(&mut self, index: Option<usize>, what: &str) -> Result<&mut MediaLine> {
        index
            .and_then(|i| self.media.get_mut(i))
            .ok_or_else(|| Error::ScopeViolation(format!("{what} without a media line")))
    }

    /// Folds the bare flag attributes into their targets.
    fn fold_flags(&mut self) -> Result<()> {
        self.fold(|doc, record| {
            if record.line_type != LineType::Attribute {
                return Ok(FoldAction::Keep);
            }
            let Some(attribute) = record.attribute else {
                return Ok(FoldAction::Keep);
            };
            if !attribute.requires_empty_value() {
                return Ok(FoldAction::Keep);
            }

            match attribute {
                Attribute::IceLite => {
                    doc.ice_lite = true;
                }
                Attribute::SendRecv
                | Attribute::SendOnly
                | Attribute::RecvOnly
                | Attribute::Inactive => {
                    let Some(LineValue::Direction(direction)) = record.parsed.take() else {
                        return Ok(FoldAction::Remove);
                    };
                    match record.media_index {
                        Some(index) => {
                            let media = doc.media_mut(Some(index), "direction")?;
                            if media.direction.is_some() {
                                return Err(Error::DuplicateSingleValued(format!(
                                    "media direction set twice: {attribute}"
                                )));
                            }
                            media.direction = Some(direction);
                        }
                        None => {
                            if doc.direction.is_some() {
                                return Err(Error::DuplicateSingleValued(format!(
                                    "session direction set twice: {attribute}"
                                )));
                            }
                            doc.direction = Some(direction);
                        }
                    }
                }
                Attribute::BundleOnly => {
                    doc.media_mut(record.media_index, "bundle-only")?.bundle_only = true;
                }
                Attribute::EndOfCandidates => {
                    doc.media_mut(record.media_index, "end-of-candidates")?
                        .end_of_candidates = true;
                }
                Attribute::RtcpMux => {
                    doc.media_mut(record.media_index, "rtcp-mux")?.rtcp_mux = true;
                }
                Attribute::RtcpRsize => {
                    doc.media_mut(record.media_index, "rtcp-rsize")?.rtcp_rsize = true;
                }
                _ => return Ok(FoldAction::Keep),
            }
            Ok(FoldAction::Remove)
        })
    }

    /// Routes each session-level record into its `SdpDoc` slot.
    fn fold_session(&mut self) -> Result<()> {
        fn set_single<T>(slot: &mut Option<T>, value: T, what: &str) -> Result<()> {
            if slot.is_some() {
                return Err(Error::DuplicateSingleValued(format!(
                    "second {what} at session level"
                )));
            }
            *slot = Some(value);
            Ok(())
        }

        self.fold(|doc, record| {
            if record.scope != Scope::Session {
                return Ok(FoldAction::Keep);
            }

            match record.parsed.take() {
                Some(LineValue::Version(version)) => {
                    set_single(&mut doc.version, version, "v= line")?
                }
                Some(LineValue::Origin(origin)) => set_single(&mut doc.origin, origin, "o= line")?,
                Some(LineValue::SessionName(name)) => {
                    set_single(&mut doc.session_name, name, "s= line")?
                }
                Some(LineValue::Timing(timing)) => set_single(&mut doc.timing, timing, "t= line")?,
                Some(LineValue::Connection(connection)) => {
                    set_single(&mut doc.connection, connection, "c= line")?
                }
                Some(LineValue::Media(_)) => {} // already in the arena
                Some(LineValue::Group(group)) => doc.groups.push(group),
                Some(LineValue::MsidSemantic(semantic)) => doc.msid_semantics.push(semantic),
                Some(LineValue::Fingerprint(fingerprint)) => doc.fingerprints.push(fingerprint),
                Some(LineValue::Extmap(extmap)) => doc.extmaps.push(extmap),
                Some(LineValue::IceUfrag(ufrag)) => {
                    set_single(&mut doc.ice_ufrag, ufrag, "ice-ufrag")?
                }
                Some(LineValue::IcePwd(pwd)) => set_single(&mut doc.ice_pwd, pwd, "ice-pwd")?,
                Some(LineValue::IceOptions(options)) => {
                    set_single(&mut doc.ice_options, options, "ice-options")?
                }
                Some(LineValue::Setup(setup)) => set_single(&mut doc.setup, setup, "setup")?,
                Some(other) => {
                    // not a session-level construct; leave it for later folds
                    record.parsed = Some(other);
                    return Ok(FoldAction::Keep);
                }
                None => {} // unknown attribute: drop
            }
            Ok(FoldAction::Remove)
        })
    }

    /// Distributes each media-level record onto the media line it follows.
    fn fold_media(&mut self) -> Result<()> {
        fn set_single<T>(slot: &mut Option<T>, value: T, what: &str) -> Result<()> {
            if slot.is_some() {
                return Err(Error::DuplicateSingleValued(format!(
                    "second {what} on one media line"
                )));
            }
            *slot = Some(value);
            Ok(())
        }

        self.fold(|doc, record| {
            if record.scope != Scope::Media {
                return Ok(FoldAction::Keep);
            }

            let media_index = record.media_index;
            let parsed = record.parsed.take();
            let media = doc.media_mut(media_index, "media level attribute")?;

            match parsed {
                Some(LineValue::Bandwidth(bandwidth)) => media.bandwidths.push(bandwidth),
                Some(LineValue::Connection(connection)) => {
                    set_single(&mut media.connection, connection, "c= line")?
                }
                Some(LineValue::Msid(msid)) => media.msids.push(msid),
                Some(LineValue::IceUfrag(ufrag)) => {
                    set_single(&mut media.ice_ufrag, ufrag, "ice-ufrag")?
                }
                Some(LineValue::IcePwd(pwd)) => set_single(&mut media.ice_pwd, pwd, "ice-pwd")?,
                Some(LineValue::Candidate(candidate)) => media.candidates.push(candidate),
                Some(LineValue::Fingerprint(fingerprint)) => {
                    media.fingerprints.push(fingerprint)
                }
                Some(LineValue::Crypto(crypto)) => media.cryptos.push(crypto),
                Some(LineValue::Setup(setup)) => set_single(&mut media.setup, setup, "setup")?,
                Some(LineValue::Mid(mid)) => {
                    // a=mid is technically repeatable, but everything
                    // downstream keys off a single value
                    set_single(&mut media.mid, mid, "mid")?
                }
                Some(LineValue::Extmap(extmap)) => media.extmaps.push(extmap),
                Some(LineValue::RtpMap(rtpmap)) => media.rtpmaps.push(rtpmap),
                Some(LineValue::Fmtp(fmtp)) => media.fmtps.push(fmtp),
                Some(LineValue::Rtcp(rtcp)) => set_single(&mut media.rtcp, rtcp, "rtcp")?,
                Some(LineValue::RtcpFb(fb)) => media.rtcp_fbs.push(fb),
                Some(LineValue::PTime(ptime)) => set_single(&mut media.ptime, ptime, "ptime")?,
                Some(LineValue::MaxPTime(max_ptime)) => {
                    set_single(&mut media.max_ptime, max_ptime, "maxptime")?
                }
                Some(LineValue::Ssrc(ssrc)) => media.ssrcs.push(ssrc),
                Some(LineValue::SsrcGroup(group)) => media.ssrc_groups.push(group),
                Some(LineValue::Simulcast(simulcast)) => {
                    set_single(&mut media.simulcast, simulcast, "simulcast")?
                }
                Some(LineValue::Rid(rid)) => media.rids.push(rid),
                Some(LineValue::SctpPort(port)) => {
                    set_single(&mut media.sctp_port, port, "sctp-port")?
                }
                Some(LineValue::MaxMessageSize(size)) => {
                    set_single(&mut media.max_message_size, size, "max-message-size")?
                }
                Some(other) => {
                    record.parsed = Some(other);
                    return Ok(FoldAction::Keep);
                }
                None => {} // unknown attribute: drop
            }
            Ok(FoldAction::Remove)
        })
    }

    /// Attaches source-level `a=fmtp` records to the `a=ssrc` line that
    /// opened the source.
    fn fold_source(&mut self) -> Result<()> {
        self.fold(|doc, record| {
            if record.scope != Scope::Source {
                return Ok(FoldAction::Keep);
            }

            let media_index = record.media_index;
            let source_index = record.source_index;
            match record.parsed.take() {
                Some(LineValue::Fmtp(fmtp)) => {
                    let media = doc.media_mut(media_index, "source level fmtp")?;
                    let ssrc = source_index
                        .and_then(|i| media.ssrcs.get_mut(i))
                        .ok_or_else(|| {
                            Error::ScopeViolation("fmtp without a source line".to_owned())
                        })?;
                    ssrc.fmtps.push(fmtp);
                }
                Some(other) => {
                    record.parsed = Some(other);
                    return Ok(FoldAction::Keep);
                }
                None => {} // unknown attribute: drop
            }
            Ok(FoldAction::Remove)
        })
    }
}

use crate::attribute::{Attribute, LineType, Scope};
use crate::lines::LineValue;


/// One recognized line of the input document. Records are produced in
/// document order and consumed by the fold passes; a record that survives
/// every fold is a bug.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub line_type: LineType,
    /// Resolved `a=` name; `None` until the attribute split pass runs and
    /// for non-attribute lines.
    pub attribute: Option<Attribute>,
    /// Everything between `x=` and the line terminator.
    pub raw_value: String,
    /// The attribute value after the `:`, once split.
    pub attr_value: Option<String>,
    /// Level assigned by the scope validator.
    pub scope: Scope,
    /// Typed value produced by the line parsers.
    pub parsed: Option<LineValue>,
    /// Ordinal of the `m=` line this record belongs to, if any.
    pub media_index: Option<usize>,
    /// Ordinal (within its media section) of the `a=ssrc` line a
    /// source-level record belongs to.
    pub source_index: Option<usize>,
}

impl LineRecord {
    fn new(line_type: LineType, raw_value: &str) -> Self {
        LineRecord {
            line_type,
            attribute: None,
            raw_value: raw_value.to_owned(),
            attr_value: None,
            scope: Scope::Session,
            parsed: None,
            media_index: None,
            source_index: None,
        }
    }
}

/// Splits the blob into recognized `<letter>=<value>` lines.
///
/// Any run of `\r` / `\n` terminates a line. A line whose tag letter is not
/// recognized, or that does not have `=` as its second byte, is skipped
/// without producing a record; so is any garbage that does not start
/// directly after a separator.
pub fn tokenize(blob: &str) -> Vec<LineRecord> {
    let mut records = Vec::new();

    for line in blob.split(['\r', '\n']) {
        if line.is_empty() {
            continue;
        }
        let bytes = line.as_bytes();
        if bytes.len() < 2 || bytes[1] != b'=' {
            continue;
        }
        let Some(line_type) = LineType::from_byte(bytes[0]) else {
            continue;
        };
        records.push(LineRecord::new(line_type, &line[2..]));
    }

    records
}

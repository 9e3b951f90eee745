use sha1::{Digest, Sha1};

/// Derives a stable identifier from an ordinal index: hex-encoded SHA-1
/// over the tag bytes followed by the index in host byte order. Used for
/// transport, media line and sender ids whenever a mid is absent.
pub(crate) fn hash_id(tag: &str, index: u64) -> String {
    let mut hasher = Sha1::new();
    hasher.update(tag.as_bytes());
    hasher.update(index.to_ne_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

pub(crate) const TRANSPORT_INDEX_TAG: &str = "transport_index:";
pub(crate) const MEDIA_LINE_INDEX_TAG: &str = "media_line_index:";
pub(crate) const SENDER_INDEX_TAG: &str = "sender_index:";

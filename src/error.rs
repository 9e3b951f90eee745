use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A recognized attribute whose value does not match its grammar:
    /// wrong field count, numeric overflow, missing keyword or bad enum
    /// token. The message echoes the offending token.
    #[error("SdpMalformedAttribute: {0}")]
    MalformedAttribute(String),

    /// A line or attribute appeared at a level where it is not legal,
    /// e.g. `a=mid` before the first `m=` line.
    #[error("SdpScopeViolation: {0}")]
    ScopeViolation(String),

    /// A second occurrence of a slot that must be unique within its
    /// scope, e.g. two `s=` lines or two `a=mid` on one media section.
    #[error("SdpDuplicateSingleValued: {0}")]
    DuplicateSingleValued(String),

    /// `v=` carried anything other than `0`.
    #[error("SdpUnsupportedVersion: {0}")]
    UnsupportedVersion(String),

    /// A required child value is absent, e.g. an rtx format without `apt`.
    #[error("SdpMissingRequired: {0}")]
    MissingRequired(String),
}

/// Parses a numeric token, mapping failure to [`Error::MalformedAttribute`]
/// with the offending token echoed.
pub(crate) fn parse_num<T: std::str::FromStr>(token: &str, what: &str) -> Result<T> {
    token
        .parse::<T>()
        .map_err(|_| Error::MalformedAttribute(format!("{what} value out of range: {token}")))
}

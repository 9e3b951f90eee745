use serde::{Deserialize, Serialize};

/// DtlsRole indicates which side starts the DTLS handshake for a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DtlsRole {
    /// The role follows the ICE roles: controlled acts as client,
    /// controlling as server.
    Auto,
    Client,
    Server,
}

impl DtlsRole {
    /// Maps an `a=setup` value to a role. `active` starts the handshake,
    /// `passive` waits for it; `actpass` and `holdconn` (and anything
    /// unrecognized) leave the decision open.
    pub fn from_setup(setup: &str) -> DtlsRole {
        if setup.eq_ignore_ascii_case("active") {
            DtlsRole::Client
        } else if setup.eq_ignore_ascii_case("passive") {
            DtlsRole::Server
        } else {
            DtlsRole::Auto
        }
    }
}

impl Default for DtlsRole {
    fn default() -> Self {
        DtlsRole::Auto
    }
}

/// One certificate digest from an `a=fingerprint` line.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtlsFingerprint {
    pub algorithm: String,
    pub value: String,
}

/// DtlsParameters carry the role plus every fingerprint on a transport.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtlsParameters {
    pub role: DtlsRole,
    pub fingerprints: Vec<DtlsFingerprint>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_role_from_setup() {
        let tests = [
            ("active", DtlsRole::Client),
            ("passive", DtlsRole::Server),
            ("actpass", DtlsRole::Auto),
            ("holdconn", DtlsRole::Auto),
            ("ACTIVE", DtlsRole::Client),
            ("anything", DtlsRole::Auto),
            ("", DtlsRole::Auto),
        ];
        for (setup, expected) in tests {
            assert_eq!(expected, DtlsRole::from_setup(setup), "{setup}");
        }
    }
}

use serde::{Deserialize, Serialize};

/// Key material from one `inline:` key parameter of an `a=crypto` line:
/// `key||salt [| lifetime [| MKI:length]]`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrtpKeyParameters {
    pub key_method: String,
    pub key_salt: String,
    pub lifetime: Option<String>,
    pub mki_value: Option<String>,
    pub mki_length: Option<u32>,
}

/// One lowered `a=crypto` line.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrtpCryptoParameters {
    pub tag: u64,
    pub crypto_suite: String,
    pub key_params: Vec<SrtpKeyParameters>,
    pub session_params: Vec<String>,
}

/// SrtpSdesParameters collect every crypto line of a media section.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrtpSdesParameters {
    pub crypto_params: Vec<SrtpCryptoParameters>,
}

use thiserror::Error;

/// Top-level error type for the `cloudcontrol-api` crate.
///
/// Covers every failure mode of the CaaS transport: no response, non-200
/// status, malformed or incomplete bodies, and command envelopes that
/// report a non-OK `responseCode`. `cloudcontrol-core` maps these into
/// its user-facing taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response from the API (connection refused, DNS failure, timeout).
    #[error("No response from the API: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// The API answered with something other than HTTP 200.
    ///
    /// `message` is the provider's own `message` field when the error body
    /// parses, otherwise a truncated preview of the raw body.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        response_code: Option<String>,
    },

    // ── Envelopes ───────────────────────────────────────────────────
    /// HTTP 200 with a command envelope whose `responseCode` is not OK,
    /// or which carries an `error` field.
    #[error("{operation} rejected ({response_code}): {message}")]
    Rejected {
        operation: String,
        response_code: String,
        message: String,
    },

    /// An accepted envelope lacked the tracking id or `info[0].value`.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Regions ─────────────────────────────────────────────────────
    /// The region key is not in the endpoint table.
    #[error("Unknown region '{0}'")]
    UnknownRegion(String),
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Http { status: 404, .. } => true,
            Self::Http {
                response_code: Some(code),
                ..
            } => code == "RESOURCE_NOT_FOUND",
            Self::Rejected { response_code, .. } => response_code == "RESOURCE_NOT_FOUND",
            _ => false,
        }
    }

    /// Extract the provider's `responseCode`, if available.
    pub fn response_code(&self) -> Option<&str> {
        match self {
            Self::Http { response_code, .. } => response_code.as_deref(),
            Self::Rejected { response_code, .. } => Some(response_code),
            _ => None,
        }
    }
}

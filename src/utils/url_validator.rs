//! Validation of redirect target URLs.

use url::Url;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must not contain whitespace or control characters")]
    InvalidCharacters,

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// The URL is not rewritten: a short code resolves to exactly what was submitted.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidCharacters`] for whitespace or control
/// characters (the stored target must be usable as a `Location` header),
/// [`UrlValidationError::InvalidFormat`] for malformed URLs,
/// [`UrlValidationError::UnsupportedProtocol`] for schemes such as `javascript:`,
/// `data:` or `ftp:`, and [`UrlValidationError::MissingHost`] when no host is present.
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlValidationError::InvalidCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

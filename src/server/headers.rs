//! Headers used in the docserve server.

/// Asks the front-end server to transfer the file at the given internal
/// location instead of the (empty) response body.
///
/// Example:
///
/// For a URL request: `/docs/pip/en/latest/usage.html`
/// the header will be set as:
///
/// `X-Accel-Redirect: /user_builds/pip/rtd-builds/latest/usage.html`
pub const HTTP_X_ACCEL_REDIRECT: &str = "X-Accel-Redirect";

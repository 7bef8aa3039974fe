//! The http module helper functions useful for serving http content
use actix_web::http::header::HeaderValue;
use mime::Mime;

/// Compression suffixes and the content encoding they stand for.
const ENCODINGS: [(&str, &str); 5] = [
    (".gz", "gzip"),
    (".Z", "compress"),
    (".bz2", "bzip2"),
    (".xz", "xz"),
    (".br", "br"),
];

/// `guess_type` uses the file extension to return the MIME type of the
/// content at `path`, and its content encoding if the file is compressed.
/// `foo.tar.gz` is an `application/x-tar` archive with `gzip` encoding.
/// Unknown extensions are served as octet stream.
#[must_use]
pub fn guess_type(path: &str) -> (Mime, Option<&'static str>) {
    let (stem, encoding) = ENCODINGS
        .iter()
        .find_map(|&(suffix, encoding)| {
            path.strip_suffix(suffix)
                .map(|stem| (stem, Some(encoding)))
        })
        .unwrap_or((path, None));
    let mime = mime_guess::from_path(stem).first_or_octet_stream();
    (mime, encoding)
}

/// Header value asking the front-end server to transfer `internal_path`.
///
/// Returns `None` when the path can't be sent as a plain ASCII header.
#[must_use]
pub fn accel_redirect_value(internal_path: &str) -> Option<HeaderValue> {
    if !internal_path.is_ascii() {
        return None;
    }
    HeaderValue::from_str(internal_path).ok()
}

//! Text decoding with legacy charset transcoding.
//!
//! Decoding order:
//! - BOM wins when present.
//! - Otherwise a `charset` parameter on the Content-Type header is used
//!   (e.g. `gbk`, `shift_jis`, `windows-1252`).
//! - Otherwise UTF-8.

use encoding_rs::{Encoding, UTF_8};

/// Decode a response body into a UTF-8 `String`.
///
/// Malformed sequences are replaced rather than rejected.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    if let Some((enc, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = enc.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    let encoding = content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = encoding.name(), "replaced malformed sequences while decoding");
    }
    text.into_owned()
}

/// Extract the `charset` parameter of a Content-Type value.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}

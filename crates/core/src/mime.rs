//! Image MIME classification for the cache admission gate.
//!
//! Only payloads whose declared content-type maps to an [`ImageKind`] may be
//! written to the icon store.

use serde::{Deserialize, Serialize};

/// Image formats admitted into the icon cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
    Avif,
    Bmp,
    Svg,
    Icon,
}

impl ImageKind {
    /// Classify a bare MIME essence such as `image/x-icon`.
    pub fn from_mime(essence: &str) -> Option<Self> {
        let kind = match essence {
            "image/png" | "image/apng" => ImageKind::Png,
            "image/jpeg" | "image/jpg" | "image/pjpeg" => ImageKind::Jpeg,
            "image/gif" => ImageKind::Gif,
            "image/webp" => ImageKind::Webp,
            "image/avif" => ImageKind::Avif,
            "image/bmp" | "image/x-ms-bmp" => ImageKind::Bmp,
            "image/svg+xml" => ImageKind::Svg,
            "image/x-icon" | "image/vnd.microsoft.icon" | "image/ico" | "image/icon" => ImageKind::Icon,
            _ => return None,
        };
        Some(kind)
    }

    /// Classify a full `Content-Type` header value, ignoring parameters.
    ///
    /// ```
    /// use favcache_core::ImageKind;
    ///
    /// assert_eq!(ImageKind::from_content_type("image/PNG; charset=binary"), Some(ImageKind::Png));
    /// assert_eq!(ImageKind::from_content_type("text/html"), None);
    /// ```
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        Self::from_mime(&essence)
    }

    /// Canonical MIME type for this kind.
    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
            ImageKind::Webp => "image/webp",
            ImageKind::Avif => "image/avif",
            ImageKind::Bmp => "image/bmp",
            ImageKind::Svg => "image/svg+xml",
            ImageKind::Icon => "image/x-icon",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_aliases() {
        assert_eq!(ImageKind::from_content_type("image/x-icon"), Some(ImageKind::Icon));
        assert_eq!(ImageKind::from_content_type("image/vnd.microsoft.icon"), Some(ImageKind::Icon));
    }

    #[test]
    fn test_parameters_and_case_ignored() {
        assert_eq!(ImageKind::from_content_type(" Image/SVG+XML ; charset=utf-8"), Some(ImageKind::Svg));
    }

    #[test]
    fn test_non_images_rejected() {
        assert_eq!(ImageKind::from_content_type("text/html"), None);
        assert_eq!(ImageKind::from_content_type("application/octet-stream"), None);
        assert_eq!(ImageKind::from_content_type(""), None);
    }

    #[test]
    fn test_substring_is_not_enough() {
        assert_eq!(ImageKind::from_content_type("text/html; note=image/png"), None);
        assert_eq!(ImageKind::from_content_type("image/pngx"), None);
    }

    #[test]
    fn test_mime_is_admitted() {
        for kind in [ImageKind::Png, ImageKind::Jpeg, ImageKind::Svg, ImageKind::Icon] {
            assert_eq!(ImageKind::from_mime(kind.mime()), Some(kind));
        }
    }
}

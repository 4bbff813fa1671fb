//! Media type detection for registered resources
//!
//! Types are resolved from the file extension with `mime_guess`, adjusted
//! where EPUB names a type differently: mp4 audio, javascript, and the
//! legacy font types superseded by the `font/*` registrations.

use std::{ffi::OsStr, path::Path};

/// Core media types of EPUB 3
///
/// Resources with any other type are foreign resources and need a fallback
/// to be rendered by every reading system.
const CORE_MEDIA_TYPES: &[&str] = &[
    // Images
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/svg+xml",
    "image/webp",
    // Audio
    "audio/mpeg",
    "audio/mp4",
    "audio/ogg",
    // Style
    "text/css",
    // Fonts
    "font/ttf",
    "font/otf",
    "font/woff",
    "font/woff2",
    // Other
    "application/xhtml+xml",
    "application/javascript",
    "application/x-dtbncx+xml",
    "application/smil+xml",
];

/// Detects the media type of a resource from its path
///
/// Returns `None` when the extension is not recognized.
pub fn resolve<P: AsRef<Path>>(path: P) -> Option<String> {
    let path = path.as_ref();
    let guessed = mime_guess::from_path(path).first_raw()?;
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);

    let mime = match (guessed, extension.as_deref()) {
        ("video/mp4", _) => "audio/mp4",
        ("text/javascript", _) => "application/javascript",
        ("application/font-woff" | "application/x-font-woff", _) => "font/woff",
        ("application/x-font-ttf" | "application/x-font-truetype", _) => "font/ttf",
        ("application/x-font-otf" | "application/x-font-opentype", _) => "font/otf",
        // sfnt covers both outline formats
        ("application/font-sfnt" | "font/sfnt", Some("ttf")) => "font/ttf",
        ("application/font-sfnt" | "font/sfnt", _) => "font/otf",
        (other, _) => other,
    };

    Some(mime.to_string())
}

/// Checks whether a media type is one of the EPUB core media types
pub fn is_core_media_type(mime: Option<&str>) -> bool {
    mime.is_some_and(|mime| CORE_MEDIA_TYPES.contains(&mime))
}

#[cfg(test)]
mod tests {
    use crate::mime::{is_core_media_type, resolve};

    #[test]
    fn test_resolve_common_types() {
        assert_eq!(resolve("chapter1.xhtml").as_deref(), Some("application/xhtml+xml"));
        assert_eq!(resolve("styles/main.css").as_deref(), Some("text/css"));
        assert_eq!(resolve("images/cover.png").as_deref(), Some("image/png"));
        assert_eq!(resolve("images/photo.JPG").as_deref(), Some("image/jpeg"));
    }

    /// EPUB names mp4 audio and javascript differently from the registry
    #[test]
    fn test_resolve_remapped_types() {
        assert_eq!(resolve("audio/track.mp4").as_deref(), Some("audio/mp4"));
        assert_eq!(resolve("scripts/app.js").as_deref(), Some("application/javascript"));
    }

    /// Fonts resolve to their `font/*` types, never the legacy application types
    #[test]
    fn test_resolve_font_types() {
        assert_eq!(resolve("fonts/body.woff").as_deref(), Some("font/woff"));
        assert_eq!(resolve("fonts/body.woff2").as_deref(), Some("font/woff2"));
        assert_eq!(resolve("fonts/head.otf").as_deref(), Some("font/otf"));
        assert_eq!(resolve("fonts/mono.ttf").as_deref(), Some("font/ttf"));
        assert_eq!(resolve("fonts/HEAD.OTF").as_deref(), Some("font/otf"));

        for href in ["a.woff", "a.woff2", "a.otf", "a.ttf"] {
            assert!(is_core_media_type(resolve(href).as_deref()), "{} is not core", href);
        }
    }

    #[test]
    fn test_resolve_unknown_extension() {
        assert_eq!(resolve("data/blob.notarealextension"), None);
        assert_eq!(resolve("README"), None);
    }

    #[test]
    fn test_is_core_media_type() {
        assert!(is_core_media_type(Some("image/png")));
        assert!(is_core_media_type(Some("font/woff2")));
        assert!(is_core_media_type(Some("application/x-dtbncx+xml")));
        assert!(!is_core_media_type(Some("application/pdf")));
        assert!(!is_core_media_type(Some("video/webm")));
        assert!(!is_core_media_type(None));
    }
}

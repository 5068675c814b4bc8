//! Image sources: `data:` URIs are decoded for embedding, everything else is
//! linked.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Embedded {
        extension: &'static str,
        bytes: Vec<u8>,
    },
    Linked(String),
    /// A data URI that is not base64 or not an image
    Unsupported,
}

pub fn classify(source: &str) -> ImageSource {
    let source = source.trim();
    let Some(rest) = source.strip_prefix("data:") else {
        return ImageSource::Linked(source.to_string());
    };

    let Some((header, payload)) = rest.split_once(',') else {
        return ImageSource::Unsupported;
    };
    let Some(mime) = header.strip_suffix(";base64") else {
        return ImageSource::Unsupported;
    };
    let Some(extension) = extension_from_mime(mime) else {
        return ImageSource::Unsupported;
    };

    match decode_base64(payload) {
        Some(bytes) if !bytes.is_empty() => ImageSource::Embedded { extension, bytes },
        _ => ImageSource::Unsupported,
    }
}

fn extension_from_mime(mime: &str) -> Option<&'static str> {
    match mime.trim().to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpeg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "image/bmp" => Some("bmp"),
        _ => None,
    }
}

pub fn mime_from_extension(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Standard alphabet first, then the URL-safe and unpadded variants.
/// Whitespace inside the payload is ignored.
fn decode_base64(input: &str) -> Option<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    STANDARD
        .decode(&compact)
        .or_else(|_| STANDARD_NO_PAD.decode(compact.trim_end_matches('=')))
        .or_else(|_| URL_SAFE_NO_PAD.decode(compact.trim_end_matches('=')))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_base64() {
        assert_eq!(decode_base64("aGk=").unwrap(), b"hi");
        assert_eq!(decode_base64("aGVs\nbG8").unwrap(), b"hello");
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), b"hello");
        // URL-safe alphabet: 0xfb 0xff
        assert_eq!(decode_base64("-_8").unwrap(), [0xfb, 0xff]);
        assert!(decode_base64("a*b").is_none());
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("data:image/png;base64,aGk="),
            ImageSource::Embedded {
                extension: "png",
                bytes: b"hi".to_vec()
            }
        );
        assert_eq!(
            classify("https://images.example/a.jpg"),
            ImageSource::Linked("https://images.example/a.jpg".into())
        );
        assert_eq!(classify("data:text/plain;base64,aGk="), ImageSource::Unsupported);
        assert_eq!(classify("data:image/svg+xml,<svg/>"), ImageSource::Unsupported);
    }
}

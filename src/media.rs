//! Inline images arrive as `data:` URLs produced by the client.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATA_URL_RE: Regex =
        Regex::new(r"^data:(?P<mime>[a-zA-Z0-9.+-]+/[a-zA-Z0-9.+-]+);base64,[A-Za-z0-9+/]+=*$").unwrap();
}

/// Mime type of a base64 `data:` URL, if it is one.
pub fn data_url_mime(url: &str) -> Option<&str> {
    DATA_URL_RE
        .captures(url)
        .and_then(|c| c.name("mime"))
        .map(|m| m.as_str())
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

/// True for a base64 data URL carrying one of the accepted image types.
pub fn is_image_data_url(url: &str) -> bool {
    data_url_mime(url)
        .map(|mime| ext_from_mime(&mime.to_ascii_lowercase()).is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn accepts_image_data_urls_only() {
        assert!(is_image_data_url("data:image/png;base64,iVBORw0KGgo="));
        assert!(is_image_data_url("data:image/JPEG;base64,/9j/4AAQ"));
        assert!(!is_image_data_url("data:text/plain;base64,aGVsbG8="));
        assert!(!is_image_data_url("data:image/png;base64,"));
        assert!(!is_image_data_url("/static/run.jpeg"));
        assert!(!is_image_data_url(""));
    }

    #[test]
    fn extracts_mime() {
        assert_eq!(data_url_mime("data:image/webp;base64,UklGR"), Some("image/webp"));
        assert_eq!(data_url_mime("https://x/y.png"), None);
    }
}

// ABOUTME: MIME type lookup for uploaded website assets.
// ABOUTME: Unregistered extensions return None so the header is omitted.

/// Resolve the Content-Type for a file by its extension.
///
/// Returns `None` when the extension is not registered; the upload then
/// omits the Content-Type header rather than guessing.
pub fn content_type_for(path: &str) -> Option<&'static str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = file_name.rsplit_once('.')?;

    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => Some("text/html"),
        "css" => Some("text/css"),
        "js" | "mjs" => Some("text/javascript"),
        "json" | "map" => Some("application/json"),
        "svg" => Some("image/svg+xml"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "ico" => Some("image/x-icon"),
        "webp" => Some("image/webp"),
        "txt" => Some("text/plain"),
        "xml" => Some("application/xml"),
        "pdf" => Some("application/pdf"),
        "woff" => Some("font/woff"),
        "woff2" => Some("font/woff2"),
        "wasm" => Some("application/wasm"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_variants() {
        assert_eq!(content_type_for("index.html"), Some("text/html"));
        assert_eq!(content_type_for("legacy.htm"), Some("text/html"));
    }

    #[test]
    fn styles_and_scripts() {
        assert_eq!(content_type_for("assets/site.css"), Some("text/css"));
        assert_eq!(content_type_for("app.js"), Some("text/javascript"));
        assert_eq!(content_type_for("app.mjs"), Some("text/javascript"));
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(content_type_for("LOGO.PNG"), Some("image/png"));
    }

    #[test]
    fn unknown_extension_is_omitted() {
        assert_eq!(content_type_for("binary.dat"), None);
        assert_eq!(content_type_for("archive.tgz"), None);
    }

    #[test]
    fn no_extension_is_omitted() {
        assert_eq!(content_type_for("CNAME"), None);
        assert_eq!(content_type_for("v2.prod/CNAME"), None);
    }

    #[test]
    fn dotfile_uses_trailing_segment() {
        // ".well-known" style names resolve on whatever follows the dot
        assert_eq!(content_type_for(".htaccess"), None);
    }
}

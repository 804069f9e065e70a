use url::Url;

/// Extension to MIME type table for the link-extraction gate
///
/// Only types a crawler is likely to meet in hyperlinks are listed;
/// anything unrecognized falls back to text/html.
const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("xhtml", "application/xhtml+xml"),
    ("txt", "text/plain"),
    ("xml", "text/xml"),
    ("rss", "application/rss+xml"),
    ("json", "application/json"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("doc", "application/msword"),
    ("xls", "application/vnd.ms-excel"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
];

/// Guesses the MIME type of a URL's target from its path extension
///
/// URLs without an extension (directory pages, clean URLs) are assumed
/// to be text/html, so extension-less pages are always scanned for
/// links.
///
/// # Examples
///
/// ```
/// use gossamer::url::guess_mime_type;
/// use url::Url;
///
/// let page = Url::parse("http://example.com/photo.jpg").unwrap();
/// assert_eq!(guess_mime_type(&page), "image/jpeg");
///
/// let clean = Url::parse("http://example.com/about").unwrap();
/// assert_eq!(guess_mime_type(&clean), "text/html");
/// ```
pub fn guess_mime_type(url: &Url) -> &'static str {
    let path = url.path();

    let extension = path
        .rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    if let Some(ext) = extension {
        for (candidate, mime) in MIME_TYPES {
            if *candidate == ext {
                return mime;
            }
        }
    }

    "text/html"
}

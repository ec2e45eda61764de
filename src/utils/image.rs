//! Receipt images are kept inline as `data:` URIs.

use std::{fs, io, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine};

const FALLBACK_MIME: &str = "application/octet-stream";

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("bmp") => "image/bmp",
        _ => FALLBACK_MIME,
    }
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Reads the file at `path` and embeds it as a `data:<mime>;base64,...` URI.
pub fn data_uri_from_path(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(encode_data_uri(mime_for_path(path), &bytes))
}

/// Size in bytes of the payload carried by a base64 data URI.
pub fn data_uri_payload_len(uri: &str) -> Option<usize> {
    let (_, payload) = uri.strip_prefix("data:")?.split_once(";base64,")?;
    STANDARD.decode(payload).ok().map(|bytes| bytes.len())
}

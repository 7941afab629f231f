// src/fetch/encoding.rs

use tracing::warn;

const BOM: char = '\u{feff}';

/// Encode `text` as UTF-16LE bytes, no byte-order mark.
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Decode a UTF-16LE body, dropping a leading byte-order mark if present.
///
/// Lossy: unpaired surrogates become U+FFFD and a trailing odd byte is
/// ignored, so the rest of the reply still decodes.
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let pairs = bytes.chunks_exact(2);
    if !pairs.remainder().is_empty() {
        warn!(len = bytes.len(), "odd reply length, dropping last byte");
    }
    let units: Vec<u16> = pairs
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let text = String::from_utf16_lossy(&units);
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

//! Text decoding with a Latin-1 fallback.

use serde::{Deserialize, Serialize};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding a text file was successfully decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: each byte is the code point of the same value.
    Latin1,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode as UTF-8, or as Latin-1 when the bytes are not valid UTF-8.
///
/// Latin-1 accepts every byte sequence, so this cannot fail. Files in other
/// encodings (UTF-16 for instance) come out as garbage and are rejected later
/// by the header check.
pub fn decode_text(bytes: &[u8]) -> (String, TextEncoding) {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => (text.to_owned(), TextEncoding::Utf8),
        Err(e) => {
            tracing::warn!(
                valid_up_to = e.valid_up_to(),
                "input is not valid utf-8, retrying as latin-1"
            );
            (body.iter().map(|&b| char::from(b)).collect(), TextEncoding::Latin1)
        }
    }
}

//! Byte decoding under a declared text encoding.

use crate::error::{AnalysisError, Result};
use encoding_rs::Encoding;
use std::path::Path;

/// Labels decoded as ISO-8859-1, one code point per byte.
const LATIN1_LABELS: [&str; 4] = ["latin1", "iso-8859-1", "iso8859-1", "l1"];

/// A resolved text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// ISO-8859-1. Bytes 0x80-0x9F map to the C1 controls.
    Latin1,
    /// Any other encoding known to `encoding_rs`.
    Whatwg(&'static Encoding),
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Latin1 => "ISO-8859-1",
            Self::Whatwg(encoding) => encoding.name(),
        }
    }
}

/// Resolve an encoding label ("latin1", "utf-8", "windows-1252", ...).
///
/// The Latin-1 labels resolve to true ISO-8859-1. Everything else follows
/// the WHATWG Encoding Standard.
pub fn resolve_encoding(label: &str) -> Result<TextEncoding> {
    let label = label.trim();
    if LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
        return Ok(TextEncoding::Latin1);
    }

    Encoding::for_label(label.as_bytes())
        .map(TextEncoding::Whatwg)
        .ok_or_else(|| AnalysisError::UnknownEncoding(label.to_string()))
}

/// Decode file bytes, failing on any malformed sequence.
///
/// A byte order mark matching the encoding is stripped. No replacement
/// characters are ever produced.
pub fn decode(bytes: &[u8], encoding: TextEncoding, path: &Path) -> Result<String> {
    let encoding = match encoding {
        TextEncoding::Latin1 => return Ok(encoding_rs::mem::decode_latin1(bytes).into_owned()),
        TextEncoding::Whatwg(encoding) => encoding,
    };

    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(AnalysisError::Decode {
            encoding: encoding.name().to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(text.into_owned())
}

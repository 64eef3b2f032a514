//! MIME type detection.
//!
//! Extension lookup via `mime_guess` comes first; when that is
//! inconclusive, a bounded prefix of the file is sniffed for well-known
//! magic numbers, falling back to a text/binary heuristic.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Upper bound on how much of a file is read for content sniffing.
pub const SNIFF_LEN: usize = 512;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

/// Detect a MIME type for the file at `path`.
///
/// Opens the file only when the extension table has no answer.
pub fn detect(path: &Path) -> io::Result<&'static str> {
    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        return Ok(mime);
    }

    let mut file = File::open(path)?;
    let mut buf = [0u8; SNIFF_LEN];
    let mut filled = 0;
    while filled < SNIFF_LEN {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(sniff(&buf[..filled]))
}

/// Classify a content prefix by magic number, then by a NUL-byte text
/// heuristic. An empty prefix is reported as plain text.
pub fn sniff(data: &[u8]) -> &'static str {
    const MAGIC: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"%PDF-", "application/pdf"),
        (b"PK\x03\x04", "application/zip"),
        (b"\x1f\x8b", "application/gzip"),
        (b"\0asm", "application/wasm"),
        (b"\x7fELF", "application/octet-stream"),
    ];

    for (magic, mime) in MAGIC {
        if data.starts_with(magic) {
            return mime;
        }
    }

    if data.contains(&0) {
        OCTET_STREAM
    } else {
        TEXT_PLAIN
    }
}

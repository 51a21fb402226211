//! Content classifier.
//!
//! Streams a file exactly once: every chunk feeds a SHA-256 hasher
//! while only the first [`PREFIX_BYTES`] are retained for the
//! text/binary decision. Memory use is bounded by the read buffer
//! plus the prefix, whatever the file size.

use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::core::types::Analysis;

/// Leading bytes retained for classification and excerpt
pub const PREFIX_BYTES: usize = 512;

const READ_BUFFER_BYTES: usize = 64 * 1024;

/// Analyze a file: hash, text/binary class, and excerpt
///
/// Never fails. An I/O error yields [`Analysis::unreadable`] so the
/// caller can log and move on.
pub async fn analyze(path: &Path) -> Analysis {
    match stream_file(path).await {
        Ok((hash, prefix)) => {
            let is_text_file = is_text(&prefix);
            let content = if is_text_file {
                decode_prefix(&prefix)
            } else {
                String::new()
            };

            Analysis {
                content_hash: Some(hash),
                is_text_file,
                content,
            }
        }
        Err(e) => {
            tracing::warn!("Failed to analyze {:?}: {}", path, e);
            Analysis::unreadable()
        }
    }
}

async fn stream_file(path: &Path) -> std::io::Result<(String, Vec<u8>)> {
    let mut file = File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut prefix = Vec::with_capacity(PREFIX_BYTES);
    let mut buf = vec![0u8; READ_BUFFER_BYTES];

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let chunk = &buf[..n];
        hasher.update(chunk);

        if prefix.len() < PREFIX_BYTES {
            let take = (PREFIX_BYTES - prefix.len()).min(n);
            prefix.extend_from_slice(&chunk[..take]);
        }
    }

    Ok((hex::encode(hasher.finalize()), prefix))
}

/// SHA-256 hex digest of an in-memory buffer
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}


/// Decide whether a byte prefix is text
///
/// Binary if it contains a byte in `0x00..=0x08` or an invalid
/// UTF-8 sequence. A multi-byte character cut off by the end of the
/// prefix does not count as invalid.
pub fn is_text(prefix: &[u8]) -> bool {
    if prefix.iter().any(|&b| b <= 0x08) {
        return false;
    }

    match std::str::from_utf8(prefix) {
        Ok(_) => true,
        // error_len() is None when the input simply ends mid-character
        Err(e) => e.error_len().is_none(),
    }
}

fn decode_prefix(prefix: &[u8]) -> String {
    match std::str::from_utf8(prefix) {
        Ok(s) => s.to_string(),
        Err(e) if e.error_len().is_none() => {
            String::from_utf8_lossy(&prefix[..e.valid_up_to()]).into_owned()
        }
        Err(_) => String::from_utf8_lossy(prefix).into_owned(),
    }
}

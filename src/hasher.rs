//! Content hashing for duplicate detection.
//!
//! Files are streamed through SHA-256 in 8 KiB blocks, so memory use does not
//! grow with file size. The hex digest is stable for identical bytes on every
//! platform.

use crate::error::{OrganizeError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Block size for streaming reads (8 KiB).
pub const BLOCK_SIZE: usize = 8192;

/// A 256-bit content fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Computes the SHA-256 digest of a file's bytes.
///
/// Fails with [`OrganizeError::Read`] when the file cannot be opened or read
/// (permission denied, vanished file, broken symlink).
pub fn digest(path: &Path) -> Result<ContentDigest> {
    let read_error = |source| OrganizeError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_error)?;
    digest_reader(&mut file).map_err(read_error)
}

/// Streams any reader through the hasher in [`BLOCK_SIZE`] blocks.
pub fn digest_reader<R: Read>(reader: &mut R) -> std::io::Result<ContentDigest> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BLOCK_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentDigest(hasher.finalize().into()))
}

//! Digest primitives: hashing bytes, strings, streams and files, and folding
//! many digests into one.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use kiln_common::ContentHash;
use xxhash_rust::xxh3::Xxh3;

/// Read buffer size for streamed hashing.
const CHUNK_SIZE: usize = 64 * 1024;

/// Stateless digest helpers shared by the fingerprinter and module identity.
pub struct GenericHasher;

impl GenericHasher {
    /// Hashes a byte slice.
    pub fn hash_bytes(data: &[u8]) -> ContentHash {
        ContentHash::from_bytes(data)
    }

    /// Hashes the UTF-8 bytes of a string.
    pub fn hash_str(s: &str) -> ContentHash {
        ContentHash::from_bytes(s.as_bytes())
    }

    /// Hashes everything readable from `reader`, in fixed-size chunks.
    pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<ContentHash> {
        let mut state = Xxh3::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => state.update(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(ContentHash::from_u128(state.digest128()))
    }

    /// Hashes the content of the file at `path`.
    pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
        let file = File::open(path)?;
        Self::hash_reader(file)
    }

    /// Folds a sequence of digests into one.
    ///
    /// No digests yield [`ContentHash::PLACEHOLDER`]; a single digest is
    /// returned unchanged. Otherwise every digest is fed, in order, into one
    /// running hash state that is finalized once, so the result depends on
    /// the order of `digests`.
    pub fn combine(digests: &[ContentHash]) -> ContentHash {
        match digests {
            [] => ContentHash::PLACEHOLDER,
            [single] => *single,
            _ => {
                let mut state = Xxh3::new();
                for digest in digests {
                    state.update(digest.as_bytes());
                }
                ContentHash::from_u128(state.digest128())
            }
        }
    }
}

use std::io::{self, Read};

use crate::{Hasher, Result};

/// Streaming reader that hashes data as it passes through.
pub struct VerifiedReader<R, H> {
    reader: R,
    hasher: H,
}

impl<R, H> VerifiedReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self { Self { reader, hasher } }
}

impl<R: Read, H: Hasher> Read for VerifiedReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
        }
        Ok(n)
    }
}

impl<R: Read, H: Hasher> VerifiedReader<R, H> {
    /// Give back the hasher, fed with everything read so far.
    pub fn into_hasher(self) -> H { self.hasher }
}

/// Drain `reader` into `sink` while hashing, returning the digest.
pub fn copy_hashed<R: Read, H: Hasher, W: io::Write>(
    reader: R,
    hasher: H,
    sink: &mut W,
) -> Result<Vec<u8>> {
    let mut verified = VerifiedReader::new(reader, hasher);
    io::copy(&mut verified, sink)?;
    Ok(verified.into_hasher().finalize())
}

#[cfg(all(test, feature = "md5"))]
mod tests {
    use super::*;
    use crate::{Md5Hasher, VerificationError};
    use std::io::Cursor;

    #[test]
    fn test_verified_reader_passes_bytes_through() {
        let data = b"test data for verification";

        let mut verified = VerifiedReader::new(Cursor::new(data), Md5Hasher::new());
        let mut buffer = Vec::new();
        verified.read_to_end(&mut buffer).unwrap();

        assert_eq!(buffer, data);
        assert_eq!(verified.into_hasher().finalize(), Md5Hasher::digest(data));
    }

    #[test]
    fn test_verified_reader_then_verify_hex() {
        let mut verified = VerifiedReader::new(Cursor::new(b"test data"), Md5Hasher::new());
        io::copy(&mut verified, &mut io::sink()).unwrap();

        let err = verified
            .into_hasher()
            .verify_hex(&"0".repeat(32))
            .unwrap_err();
        assert!(matches!(err, VerificationError::Mismatch { .. }));
    }

    #[test]
    fn test_copy_hashed() {
        let mut out = Vec::new();
        let digest = copy_hashed(Cursor::new(b"payload"), Md5Hasher::new(), &mut out).unwrap();
        assert_eq!(out, b"payload");
        assert_eq!(digest, Md5Hasher::digest(b"payload"));
    }
}

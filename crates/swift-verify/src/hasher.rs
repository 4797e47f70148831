#[cfg(feature = "md5")]
use digest::Digest;

use crate::{Result, VerificationError};

pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;

    /// Lowercase hex of the final digest, the form servers put in `ETag`.
    fn finalize_hex(self) -> String
    where
        Self: Sized,
    {
        hex::encode(self.finalize())
    }

    /// Finalize and compare with a hex digest, ignoring case. Returns the
    /// lowercase hex of the actual digest on success.
    fn verify_hex(self, expected: &str) -> Result<String>
    where
        Self: Sized,
    {
        let actual = self.finalize_hex();
        if actual.eq_ignore_ascii_case(expected) {
            Ok(actual)
        } else {
            Err(VerificationError::Mismatch {
                expected: expected.to_string(),
                actual,
            })
        }
    }
}

#[cfg(feature = "md5")]
pub struct Md5Hasher(md5::Md5);

#[cfg(feature = "md5")]
impl Hasher for Md5Hasher {
    fn update(&mut self, data: &[u8]) { Digest::update(&mut self.0, data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

#[cfg(feature = "md5")]
impl Default for Md5Hasher {
    fn default() -> Self { Self::new() }
}

#[cfg(feature = "md5")]
impl Md5Hasher {
    pub fn new() -> Self { Self(md5::Md5::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { md5::Md5::digest(data).to_vec() }

    pub fn hex_digest(data: &[u8]) -> String { hex::encode(Self::digest(data)) }
}

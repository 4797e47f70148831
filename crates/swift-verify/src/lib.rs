//! Content verification primitives for object transfers.
//!
//! Provides incremental hashing without enforcing a verification policy. The
//! default hasher is MD5, the digest object stores publish in `ETag`.
//!
//! # Example
//!
//! ```
//! use swift_verify::{Hasher, Md5Hasher, copy_hashed};
//!
//! let mut copy = Vec::new();
//! let digest = copy_hashed(&b"hello world"[..], Md5Hasher::new(), &mut copy).unwrap();
//! assert_eq!(hex::encode(digest), "5eb63bbbe01eeed093cb22bb8f5acdc3");
//!
//! let mut hasher = Md5Hasher::new();
//! hasher.update(&copy);
//! hasher.verify_hex("5EB63BBBE01EEED093CB22BB8F5ACDC3").unwrap();
//! ```

pub use self::error::{Result, VerificationError};
pub use self::hasher::Hasher;
pub use self::reader::{VerifiedReader, copy_hashed};

#[cfg(feature = "md5")]
pub use self::hasher::Md5Hasher;

mod error;
mod hasher;
mod reader;

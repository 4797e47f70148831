//! Atomic whole-file primitives.
//!
//! State files in this workspace are small and rewritten as a unit; these
//! helpers make each rewrite atomic with respect to concurrent readers.

mod error;
mod rw;

pub use error::{Error, Result};
pub use rw::{Options, atomic_read, atomic_write, read_optional};

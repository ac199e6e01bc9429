//! # Replica Serde
//! Positional, length-prefixed byte codec shared by the replica crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bytable;
mod byte_reader;
mod byte_writer;
mod error;
mod serde;

pub use bytable::Bytable;
pub use byte_reader::{ByteReader, MAX_NESTING_DEPTH};
pub use byte_writer::{ByteCounter, ByteWrite, ByteWriter};
pub use error::SerdeErr;
pub use serde::{check_length, write_length, Serde};

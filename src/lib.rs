//! In-memory key/value records parsed from and serialized to delimited text.
//!
//! See [`kv::KvStore`] for the store itself and [`strutil`] for the string
//! primitives it is built on.

pub mod error;
pub mod kv;
pub mod strutil;

pub use error::Error;
pub use kv::{Entry, KvStore};

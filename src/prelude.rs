//! Derive macros shared by the crate's types.

pub use derive_more::{Display, Into};

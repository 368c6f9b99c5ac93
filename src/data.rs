//! Data entities and the generators that produce them.

pub mod generators;
pub mod image;

//! Platform speech backends

pub mod native;
pub mod null;

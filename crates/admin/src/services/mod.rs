//! Admin services.

pub mod media;

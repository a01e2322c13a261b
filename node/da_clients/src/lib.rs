//! Implementations of the DA capability interface.

pub mod sunrise;

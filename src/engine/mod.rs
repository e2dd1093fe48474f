//! The spectral fingerprinting and matching engine.
//!
//! Pipeline: sample files are reduced to quantized magnitude spectra
//! ([`spectrum`]), a shared baseline is derived across all of them
//! ([`baseline`]), each sample keeps what remains after subtracting it
//! ([`residual`]), and queries are scored against those residuals by
//! cosine similarity ([`matcher`]). [`session::Session`] owns the state
//! and exposes the operations the shell calls.

pub mod baseline;
pub mod catalog;
pub mod matcher;
pub mod residual;
pub mod session;
pub mod spectrum;

use thiserror::Error;

/// Errors produced by the fingerprinting engine.
///
/// Per-file decode failures during a batch load are recovered by the session
/// (file skipped, warning accumulated); the variants here surface when an
/// operation as a whole cannot proceed.
#[derive(Debug, Error)]
pub enum RunError {
    /// The input file could not be decoded as PCM audio.
    #[error("failed to decode {file}: {reason}")]
    Decode { file: String, reason: String },

    /// The decoded buffer contained no samples; the FFT of an empty buffer
    /// is undefined.
    #[error("audio buffer is empty")]
    EmptyBuffer,

    /// The loaded samples share no frequency bins after quantization, so no
    /// baseline spectrum can be formed.
    #[error("no frequencies are common to all loaded samples")]
    NoCommonFrequencies,

    /// A baseline over a single sample is degenerate; at least two are
    /// required.
    #[error("need at least 2 sample files to form a baseline, got {0}")]
    InsufficientSamples(usize),

    /// `compare` was called before any successful `load_samples`.
    #[error("no baseline spectrum computed yet; load samples first")]
    NoBaseline,

    /// The catalog holds no fingerprints to compare against.
    #[error("fingerprint catalog is empty; load samples first")]
    EmptyCatalog,
}

use thiserror::Error;

/// Errors that can abort a [`diff`](crate::diff::diff) or
/// [`merge`](crate::merge::merge) invocation.
///
/// No error is ever recovered locally: algorithms unwind to the caller
/// without producing partial output.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The caller's [`CancellationToken`](crate::cancel::CancellationToken)
    /// tripped while a diff or merge was in progress.
    #[error("diff or merge was cancelled")]
    Interrupted,
    /// Line indexing was asked to treat a buffer as text, but it contains a
    /// NUL byte or a lone `CR` not followed by `LF`.
    #[error("input buffer looks like binary data, not text")]
    BinaryBlob,
    /// A Histogram region's element positions no longer fit in the packed
    /// record's pointer field.
    #[error("sequence exceeds the maximum size supported by the histogram index")]
    SequenceTooLarge,
    /// An [`Edit`](crate::edit::Edit) was passed to an operation with
    /// out-of-range or inverted bounds.
    #[error("invalid edit bounds")]
    InvalidInput,
}

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

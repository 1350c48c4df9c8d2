use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Errors raised by calibration lookup and colormap generation.
///
/// Nothing is retried and no partial results are returned; every failure is
/// raised to the caller immediately.
#[derive(Debug, Error)]
pub enum Error {
    /// The `VAR_KEYS` header value does not match the expected
    /// `extname;key1,key2,...` grammar, or it names zero or several
    /// radiometric-calibration columns.
    #[error("malformed VAR_KEYS value: {0}")]
    VarKeys(String),

    /// The selected window HDU cannot be used for a calibration lookup
    /// (it is the variable-keywords table itself, or not an image HDU).
    #[error("invalid window selection: {0}")]
    InvalidWindow(String),

    /// The window header does not describe a usable spectral axis.
    #[error("spectral WCS: {0}")]
    SpectralWcs(String),

    /// Error from the underlying cfitsio wrapper (file open, keyword read,
    /// column read). Propagated unmodified.
    #[error(transparent)]
    Fits(#[from] fitsio::errors::Error),
}

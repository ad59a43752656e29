//! Error types for the ccparse-core library.
//!
//! Only collaborator failures and configuration mistakes are errors. A missing
//! issuer or field is an ordinary outcome and is represented by `None` values on
//! [`ExtractionResult`](crate::ExtractionResult), never by an `Err`.

use thiserror::Error;

/// Main error type for the ccparse library.
#[derive(Error, Debug)]
pub enum StatementError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Issuer registry is malformed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to extract images from PDF.
    #[error("failed to extract images: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to the OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No usable tesseract binary could be located.
    #[error("tesseract not found; install it or set TESSERACT_CMD")]
    NotFound,

    /// The OCR process could not be spawned or exited with a failure.
    #[error("OCR invocation failed: {0}")]
    Invocation(String),

    /// The page image could not be handed to the OCR process.
    #[error("failed to prepare image: {0}")]
    Image(String),
}

/// Errors raised while building an issuer registry.
///
/// These are fatal configuration errors and are reported before any
/// statement is processed.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// An issuer was declared without a name.
    #[error("issuer name must not be empty")]
    EmptyName,

    /// Two issuers share the same name.
    #[error("duplicate issuer: {0}")]
    DuplicateIssuer(String),

    /// A field pattern does not compile.
    #[error("invalid {field} pattern for {issuer}: {source}")]
    InvalidPattern {
        issuer: String,
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    /// A field pattern has the wrong number of capture groups.
    #[error("{field} pattern for {issuer} must have {expected} capture group(s), found {found}")]
    GroupCount {
        issuer: String,
        field: &'static str,
        expected: &'static str,
        found: usize,
    },

    /// The registry definition document is malformed.
    #[error("malformed issuer definitions: {0}")]
    Definition(String),
}

/// Result type for the ccparse library.
pub type Result<T> = std::result::Result<T, StatementError>;

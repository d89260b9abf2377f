use thiserror::Error;

/// Everything that can stop a split or merge request.
///
/// Every variant is terminal for the call that produced it; nothing is
/// retried and no partial output accompanies an error.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("{file} is not a PDF file")]
    NotAPdf { file: String },

    #[error("{} is not a parseable PDF: {source}", .file.as_deref().unwrap_or("input"))]
    Format {
        file: Option<String>,
        #[source]
        source: lopdf::Error,
    },

    #[error("ranges parameter is required in range mode")]
    EmptyRanges,

    #[error("Unable to parse page range: {token:?}")]
    MalformedToken { token: String },

    #[error("Invalid page range: {token} (document has {total_pages} pages)")]
    InvalidRange { token: String, total_pages: u32 },

    #[error("Unsupported split mode: {mode}")]
    UnsupportedMode { mode: String },

    #[error("At least 2 PDF files are required to merge, got {count}")]
    TooFewFiles { count: usize },

    #[error("Failed to write {name}: {reason}")]
    Write { name: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PdfError {
    /// Stable name of the error kind, as reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            PdfError::NotAPdf { .. } => "NotAPdfError",
            PdfError::Format { .. } => "FormatError",
            PdfError::EmptyRanges => "EmptyRangesError",
            PdfError::MalformedToken { .. } => "MalformedTokenError",
            PdfError::InvalidRange { .. } => "InvalidRangeError",
            PdfError::UnsupportedMode { .. } => "UnsupportedModeError",
            PdfError::TooFewFiles { .. } => "TooFewFilesError",
            PdfError::Write { .. } => "WriteError",
            PdfError::Io(_) => "IoError",
        }
    }

    /// True when the caller can fix the request; false for internal faults.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PdfError::Write { .. } | PdfError::Io(_))
    }

    /// Attach the name of the input that failed to parse.
    pub fn in_file(self, name: &str) -> Self {
        match self {
            PdfError::Format { source, .. } => PdfError::Format {
                file: Some(name.to_string()),
                source,
            },
            other => other,
        }
    }
}

//! Uploaded-file ingestion: format checks, scoped temporary storage and per-format loaders.

mod docx;
mod pdf;
mod text;

use core::fmt;
use core::str;
use std::io::Write as _;
use std::path::Path;

use docqa_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tempfile::Builder as TempBuilder;
use tokio::fs;

pub use docx::DocxLoader;
pub use pdf::PdfLoader;
pub use text::TextLoader;

/// Declared format of a batch of uploaded files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    /// PDF document, one extracted document per page
    #[default]
    Pdf,
    /// Word document
    Docx,
    /// UTF-8 plain text
    Text,
}

impl DocumentFormat {
    /// Every selectable format, in selector order.
    pub const ALL: [Self; 3] = [Self::Pdf, Self::Docx, Self::Text];

    /// Label shown in the file-type selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Text => "Text",
        }
    }

    /// Suffix given to the temporary file handed to the loader.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
            Self::Text => ".txt",
        }
    }

    /// Next format in selector order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Pdf => Self::Docx,
            Self::Docx => Self::Text,
            Self::Text => Self::Pdf,
        }
    }

    /// Previous format in selector order, wrapping around.
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Self::Pdf => Self::Text,
            Self::Docx => Self::Pdf,
            Self::Text => Self::Docx,
        }
    }

    /// Whether the raw bytes look like this format.
    pub fn matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Pdf => bytes.starts_with(b"%PDF-"),
            Self::Docx => {
                bytes.starts_with(b"PK\x03\x04")
                    && bytes
                        .windows(b"word/document.xml".len())
                        .any(|window| window == b"word/document.xml")
            }
            Self::Text => str::from_utf8(bytes).is_ok(),
        }
    }

    /// Parses a CLI-style name (`pdf`, `docx`, `text`/`txt`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" | "word" => Some(Self::Docx),
            "text" | "txt" => Some(Self::Text),
            _ => None,
        }
    }

    fn loader(self) -> &'static dyn DocumentLoader {
        match self {
            Self::Pdf => &PdfLoader,
            Self::Docx => &DocxLoader,
            Self::Text => &TextLoader,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Display name, used as the document source
    pub name: String,
    /// Raw contents
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Creates an upload from in-memory bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads an upload from disk, named after the file name.
    ///
    /// # Errors
    /// Returns `Error::Read` if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).await.map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self { name, bytes })
    }
}

/// A unit of extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Uploaded file the text came from
    pub source: String,
    /// 1-based page number, for paged formats
    pub page: Option<usize>,
    /// Extracted text
    pub text: String,
}

/// Format-specific text extractor.
pub trait DocumentLoader: Send + Sync {
    /// Format handled by this loader.
    fn format(&self) -> DocumentFormat;

    /// Extracts documents from the file at `path`, labelling them with `source`.
    ///
    /// # Errors
    /// Returns `Error::Parse` if the file cannot be parsed.
    fn load(&self, path: &Path, source: &str) -> Result<Vec<SourceDocument>>;
}

/// Extracts the text of every uploaded file, in upload order.
///
/// Each file is checked against the declared format, written to a scoped
/// temporary file and parsed by the format's loader. The temporary file is
/// removed as soon as the loader returns. Documents with no text are dropped.
///
/// # Errors
/// Returns `Error::FormatMismatch` if a file does not match `format`,
/// `Error::Parse` if a loader fails, and `Error::EmptyDocuments` if no text
/// was extracted at all.
pub fn load_documents(files: &[UploadedFile], format: DocumentFormat) -> Result<Vec<SourceDocument>> {
    load_with(files, format.loader())
}

fn load_with(files: &[UploadedFile], loader: &dyn DocumentLoader) -> Result<Vec<SourceDocument>> {
    let format = loader.format();
    let mut documents = Vec::new();

    for file in files {
        if !format.matches(&file.bytes) {
            return Err(Error::FormatMismatch {
                file: file.name.clone(),
                expected: format.label().to_owned(),
            });
        }

        let mut temp_file = TempBuilder::new()
            .prefix("docqa-")
            .suffix(format.suffix())
            .tempfile()?;
        temp_file.write_all(&file.bytes)?;
        temp_file.flush()?;

        let loaded = loader.load(temp_file.path(), &file.name)?;
        drop(temp_file);

        let before = loaded.len();
        documents.extend(loaded.into_iter().filter(|doc| !doc.text.trim().is_empty()));
        tracing::debug!(
            file = %file.name,
            format = %format,
            extracted = before,
            "Loaded uploaded file"
        );
    }

    if documents.is_empty() {
        if !files.is_empty() {
            tracing::warn!("No text extracted from {} file(s)", files.len());
        }
        return Err(Error::EmptyDocuments);
    }

    Ok(documents)
}

use std::fs;
use std::path::Path;

use docqa_core::{Error, Result};

use super::{DocumentFormat, DocumentLoader, SourceDocument};

/// UTF-8 plain text loader. One document per file.
pub struct TextLoader;

impl DocumentLoader for TextLoader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Text
    }

    fn load(&self, path: &Path, source: &str) -> Result<Vec<SourceDocument>> {
        let text = fs::read_to_string(path).map_err(|err| Error::Parse {
            file: source.to_owned(),
            message: err.to_string(),
        })?;

        Ok(vec![SourceDocument {
            source: source.to_owned(),
            page: None,
            text,
        }])
    }
}

//! PDF loader using the `pdf-extract` crate.
//!
//! `pdf-extract` returns the whole document as one string with form feeds
//! between pages, so pages are recovered by splitting on `\x0C`. It panics on
//! some malformed fonts and encodings; those panics are caught and reported
//! as parse errors.

use std::any::Any;
use std::panic;
use std::path::Path;

use docqa_core::{Error, Result};

use super::{DocumentFormat, DocumentLoader, SourceDocument};

/// PDF loader producing one document per non-blank page.
pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn load(&self, path: &Path, source: &str) -> Result<Vec<SourceDocument>> {
        let parse_error = |message: String| Error::Parse {
            file: source.to_owned(),
            message,
        };
        let text = panic::catch_unwind(|| pdf_extract::extract_text(path))
            .map_err(|payload| parse_error(panic_message(payload.as_ref())))?
            .map_err(|err| parse_error(err.to_string()))?;

        Ok(split_pages(&text, source))
    }
}

/// Message carried by a caught parser panic.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "PDF parser panicked".to_owned())
}

/// Splits extracted text into page documents, numbering pages from 1.
fn split_pages(text: &str, source: &str) -> Vec<SourceDocument> {
    if !text.contains('\x0C') {
        return vec![SourceDocument {
            source: source.to_owned(),
            page: None,
            text: text.trim().to_owned(),
        }];
    }

    text.split('\x0C')
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(index, page)| SourceDocument {
            source: source.to_owned(),
            page: Some(index + 1),
            text: page.trim().to_owned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::Builder;

    #[test]
    fn test_split_pages_numbers_from_one() {
        let pages = split_pages("first page\x0Csecond page\x0C", "r.pdf");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, Some(1));
        assert_eq!(pages[0].text, "first page");
        assert_eq!(pages[1].page, Some(2));
        assert_eq!(pages[1].source, "r.pdf");
    }

    #[test]
    fn test_split_pages_skips_blank_pages_keeping_numbers() {
        let pages = split_pages("one\x0C  \n \x0Cthree", "r.pdf");
        let numbers: Vec<_> = pages.iter().map(|page| page.page).collect();
        assert_eq!(numbers, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_text_without_form_feeds_is_one_document() {
        let pages = split_pages("\n all of it \n", "r.pdf");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page, None);
        assert_eq!(pages[0].text, "all of it");
    }

    #[test]
    fn test_corrupt_pdf_is_a_parse_error() {
        let mut file = Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4\nthis is not really a pdf").unwrap();

        let error = PdfLoader.load(file.path(), "broken.pdf").unwrap_err();
        assert!(matches!(error, Error::Parse { .. }));
    }

    #[test]
    fn test_panic_message_from_payload() {
        let text: Box<dyn Any + Send> = Box::new("Descendant fonts required");
        assert_eq!(panic_message(text.as_ref()), "Descendant fonts required");

        let owned: Box<dyn Any + Send> = Box::new("unexpected encoding".to_owned());
        assert_eq!(panic_message(owned.as_ref()), "unexpected encoding");

        let other: Box<dyn Any + Send> = Box::new(7);
        assert_eq!(panic_message(other.as_ref()), "PDF parser panicked");
    }
}

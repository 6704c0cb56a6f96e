//! DOCX loader.
//!
//! A `.docx` file is a ZIP archive; the body text lives in `word/document.xml`.
//! Paragraphs are `<w:p>` elements and their text is carried by `<w:t>` runs.

use std::fs::File;
use std::io::Read as _;
use std::path::Path;
use std::sync::LazyLock;

use docqa_core::{Error, Result};
use regex::{Captures, Regex};
use zip::ZipArchive;

use super::{DocumentFormat, DocumentLoader, SourceDocument};

/// Archive member holding the document body.
const DOCUMENT_PART: &str = "word/document.xml";

static PARAGRAPH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"(?s)<w:p(?:\s[^>]*[^/])?>(.*?)</w:p>") {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid paragraph regex: {err}"),
    }
});

static RUN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(
        r"(?s)<w:t(?:\s[^>]*[^/])?>(?P<text>.*?)</w:t>|(?P<tab><w:tab\s*/>)|(?P<br><w:(?:br|cr)(?:\s[^>]*)?/>)",
    ) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid run regex: {err}"),
    }
});

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);") {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid entity regex: {err}"),
    }
});

/// Word document loader. One document per file, paragraphs separated by blank lines.
pub struct DocxLoader;

impl DocumentLoader for DocxLoader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn load(&self, path: &Path, source: &str) -> Result<Vec<SourceDocument>> {
        let parse_error = |message: String| Error::Parse {
            file: source.to_owned(),
            message,
        };

        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|err| parse_error(err.to_string()))?;
        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|err| parse_error(format!("{DOCUMENT_PART}: {err}")))?
            .read_to_string(&mut xml)
            .map_err(|err| parse_error(format!("{DOCUMENT_PART}: {err}")))?;

        Ok(vec![SourceDocument {
            source: source.to_owned(),
            page: None,
            text: extract_text(&xml),
        }])
    }
}

/// Pulls paragraph text out of a `document.xml` body.
fn extract_text(xml: &str) -> String {
    let paragraphs: Vec<String> = PARAGRAPH_PATTERN
        .captures_iter(xml)
        .filter_map(|paragraph| {
            let body = paragraph.get(1)?.as_str();
            let text = paragraph_text(body);
            (!text.trim().is_empty()).then_some(text)
        })
        .collect();

    paragraphs.join("\n\n")
}

fn paragraph_text(body: &str) -> String {
    let mut text = String::new();
    for run in RUN_PATTERN.captures_iter(body) {
        if let Some(content) = run.name("text") {
            text.push_str(&decode_entities(content.as_str()));
        } else if run.name("tab").is_some() {
            text.push('\t');
        } else if run.name("br").is_some() {
            text.push('\n');
        }
    }
    text
}

fn decode_entities(text: &str) -> String {
    ENTITY_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .map_or_else(
                        || entity.strip_prefix('#').and_then(|dec| dec.parse::<u32>().ok()),
                        |hex| u32::from_str_radix(hex, 16).ok(),
                    )
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}

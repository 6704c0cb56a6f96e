use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use docqa_context::DocumentFormat;

/// Document type accepted by `--type`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FileType {
    /// PDF documents
    #[default]
    Pdf,
    /// Word documents
    Docx,
    /// UTF-8 text files
    #[value(alias = "txt")]
    Text,
}

impl From<FileType> for DocumentFormat {
    fn from(file_type: FileType) -> Self {
        match file_type {
            FileType::Pdf => Self::Pdf,
            FileType::Docx => Self::Docx,
            FileType::Text => Self::Text,
        }
    }
}

/// Command-line arguments for docqa
#[derive(Debug, Parser)]
#[command(
    name = "docqa",
    version,
    about = "Talk to your data: upload documents and ask questions about them"
)]
pub struct Cli {
    /// Configuration file [default: ~/.docqa/config.toml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug log file [default: ~/.docqa/debug.log]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Type of the documents to process
    #[arg(long = "type", value_enum, default_value_t = FileType::Pdf)]
    pub file_type: FileType,

    /// Documents to pre-fill in the file field
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// File paths joined the way the file field expects them.
    pub fn file_field(&self) -> String {
        self.files
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

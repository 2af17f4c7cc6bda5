//! Intermediate and export datasets
//!
//! **Intermediate** (`output.tsv`): tab-separated with a header row,
//! `word pos ipa translation audio image`. The first four columns are the
//! contract the export pass depends on; readers find columns by header name.
//!
//! **Export** (`anki.tsv`): tab-separated, no header,
//! `word pos ipa translation image_html audio`, ready for flashcard import.
//!
//! Both writers append one row per record and flush immediately, so an
//! interrupted run leaves every earlier row intact.

use crate::types::EnrichmentRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Intermediate dataset header, in column order
pub const INTERMEDIATE_COLUMNS: [&str; 6] = ["word", "pos", "ipa", "translation", "audio", "image"];

/// Columns every intermediate dataset must carry
const REQUIRED_COLUMNS: usize = 4;

/// Separator for several audio files in one field
const AUDIO_SEPARATOR: &str = ";";

/// Dataset errors
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset {} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Malformed row {line} in {}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// One row of the intermediate dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateRow {
    pub word: String,
    pub pos: String,
    pub ipa: String,
    pub translation: String,
    pub audio: Vec<String>,
    pub image: Option<String>,
}

impl From<&EnrichmentRecord> for IntermediateRow {
    fn from(record: &EnrichmentRecord) -> Self {
        Self {
            word: record.term.to_string(),
            pos: record.pronunciation.category.render(),
            ipa: record.pronunciation.transcription.render().to_string(),
            translation: record.translation.clone(),
            audio: record.media.audio.clone(),
            image: record.media.image.clone(),
        }
    }
}

impl IntermediateRow {
    fn to_line(&self) -> String {
        [
            sanitize_field(&self.word),
            sanitize_field(&self.pos),
            sanitize_field(&self.ipa),
            sanitize_field(&self.translation),
            sanitize_field(&self.audio.join(AUDIO_SEPARATOR)),
            sanitize_field(self.image.as_deref().unwrap_or("")),
        ]
        .join("\t")
    }

    /// Export row: `word pos ipa translation image_html audio`
    pub fn to_export_line(&self) -> String {
        let image_html = self
            .image
            .as_deref()
            .map(|file| format!("<img src=\"{}\">", file))
            .unwrap_or_default();

        let audio: String = self
            .audio
            .iter()
            .map(|file| format!("[sound:{}]", file))
            .collect();

        [
            sanitize_field(&self.word),
            sanitize_field(&self.pos),
            sanitize_field(&self.ipa),
            sanitize_field(&self.translation),
            sanitize_field(&image_html),
            sanitize_field(&audio),
        ]
        .join("\t")
    }
}

/// Replace tabs and line breaks so a value stays inside its cell
pub fn sanitize_field(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => ' ',
            c => c,
        })
        .collect()
}

// ============================================================================
// Writers
// ============================================================================

/// Destination for assembled records
pub trait RecordSink {
    fn write_record(&mut self, record: &EnrichmentRecord) -> Result<(), DatasetError>;
}

/// Intermediate dataset writer (truncates, writes the header, then appends rows)
pub struct IntermediateWriter {
    writer: BufWriter<File>,
}

impl IntermediateWriter {
    pub fn create(path: &Path) -> Result<Self, DatasetError> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", INTERMEDIATE_COLUMNS.join("\t"))?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn append(&mut self, row: &IntermediateRow) -> Result<(), DatasetError> {
        writeln!(self.writer, "{}", row.to_line())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Export dataset writer (truncates, then appends header-less rows)
pub struct ExportWriter {
    writer: BufWriter<File>,
}

impl ExportWriter {
    pub fn create(path: &Path) -> Result<Self, DatasetError> {
        let writer = BufWriter::new(File::create(path)?);
        Ok(Self { writer })
    }

    pub fn append(&mut self, row: &IntermediateRow) -> Result<(), DatasetError> {
        writeln!(self.writer, "{}", row.to_export_line())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes every record to both datasets
pub struct DatasetSink {
    intermediate: IntermediateWriter,
    export: ExportWriter,
}

impl DatasetSink {
    pub fn create(intermediate_path: &Path, export_path: &Path) -> Result<Self, DatasetError> {
        Ok(Self {
            intermediate: IntermediateWriter::create(intermediate_path)?,
            export: ExportWriter::create(export_path)?,
        })
    }
}

impl RecordSink for DatasetSink {
    fn write_record(&mut self, record: &EnrichmentRecord) -> Result<(), DatasetError> {
        let row = IntermediateRow::from(record);
        self.intermediate.append(&row)?;
        self.export.append(&row)?;
        Ok(())
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Read an intermediate dataset written by this tool (or edited by hand)
///
/// Columns are located by header name. `audio` and `image` are optional;
/// blank lines are skipped.
pub fn read_intermediate(path: &Path) -> Result<Vec<IntermediateRow>, DatasetError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(DatasetError::MissingColumn {
                path: path.to_path_buf(),
                column: INTERMEDIATE_COLUMNS[0].to_string(),
            })
        }
    };
    let header: Vec<String> = header
        .trim_start_matches('\u{feff}')
        .split('\t')
        .map(|h| h.trim().to_lowercase())
        .collect();

    let index_of = |column: &str| header.iter().position(|h| h == column);

    let mut required = [0usize; REQUIRED_COLUMNS];
    for (slot, column) in required.iter_mut().zip(INTERMEDIATE_COLUMNS.iter()) {
        *slot = index_of(*column).ok_or_else(|| DatasetError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })?;
    }
    let audio_index = index_of(INTERMEDIATE_COLUMNS[4]);
    let image_index = index_of(INTERMEDIATE_COLUMNS[5]);

    let mut rows = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();
        let field = |index: usize| fields.get(index).map(|f| f.trim()).unwrap_or("");

        if required.iter().any(|&index| index >= fields.len()) {
            return Err(DatasetError::Malformed {
                path: path.to_path_buf(),
                line: offset + 2,
                reason: format!("expected at least {} fields, found {}", REQUIRED_COLUMNS, fields.len()),
            });
        }

        let audio = audio_index
            .map(field)
            .unwrap_or("")
            .split(AUDIO_SEPARATOR)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        let image = image_index
            .map(field)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        rows.push(IntermediateRow {
            word: field(required[0]).to_string(),
            pos: field(required[1]).to_string(),
            ipa: field(required[2]).to_string(),
            translation: field(required[3]).to_string(),
            audio,
            image,
        });
    }

    Ok(rows)
}

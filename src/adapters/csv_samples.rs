//! CSV historical data in the UCI tic-tac-toe endgame layout.
//!
//! Each row holds nine cell symbols (top-left to bottom-right) followed by a
//! class label:
//!
//! ```text
//! x,x,x,x,o,o,x,o,o,positive
//! x,o,x,x,o,o,o,x,b,negative
//! ```
//!
//! `x` is the first player, `o` the second, `b` (or `?`, or nothing) an empty
//! cell. `positive` means the first player won.

use std::{fs::File, path::PathBuf};

use super::atomic::write_atomically;
use crate::{
    Error, Result,
    ports::{HistoricalSample, SampleLabel, SampleSource},
    tictactoe::{Board, Cell},
};

/// Map a cell symbol to a cell; unknown symbols read as empty.
pub fn decode_symbol(symbol: &str) -> Cell {
    match symbol.trim().to_ascii_lowercase().as_str() {
        "x" => Cell::X,
        "o" => Cell::O,
        _ => Cell::Empty,
    }
}

/// Map a class label; anything but a first-player win is `negative`.
pub fn decode_label(label: &str) -> SampleLabel {
    match label.trim().to_ascii_lowercase().as_str() {
        "positive" | "win" => SampleLabel::Win,
        _ => SampleLabel::Negative,
    }
}

fn encode_cell(cell: Cell) -> &'static str {
    match cell {
        Cell::X => "x",
        Cell::O => "o",
        Cell::Empty => "b",
    }
}

fn encode_label(label: SampleLabel) -> &'static str {
    match label {
        SampleLabel::Win => "positive",
        SampleLabel::Negative => "negative",
    }
}

/// Headerless CSV file of historical positions
#[derive(Debug, Clone)]
pub struct CsvSampleSource {
    path: PathBuf,
}

impl CsvSampleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Write `samples` in the same layout this source reads.
    ///
    /// The file is replaced atomically.
    pub fn write_samples(&self, samples: &[HistoricalSample]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for sample in samples {
            let mut record: Vec<&str> =
                sample.board.cells().iter().map(|&c| encode_cell(c)).collect();
            record.push(encode_label(sample.label));
            writer.write_record(&record)?;
        }
        let bytes = writer.into_inner().map_err(|e| Error::Io {
            operation: "flush CSV buffer".to_string(),
            source: std::io::Error::new(e.error().kind(), e.error().to_string()),
        })?;
        write_atomically(&self.path, &bytes)
    }
}

impl SampleSource for CsvSampleSource {
    fn load_samples(&self) -> Result<Vec<HistoricalSample>> {
        let file = File::open(&self.path).map_err(|source| Error::DataSourceUnavailable {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut samples = Vec::new();
        for record in reader.records() {
            // Unreadable or short rows are skipped
            let Ok(record) = record else { continue };
            if record.len() < 10 {
                continue;
            }

            let mut cells = [Cell::Empty; 9];
            for (idx, cell) in cells.iter_mut().enumerate() {
                *cell = decode_symbol(&record[idx]);
            }
            samples.push(HistoricalSample {
                board: Board::from_cells(cells),
                label: decode_label(&record[9]),
            });
        }

        Ok(samples)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

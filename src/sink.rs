use crate::{
    errors::ExportError,
    row::CsvRow,
};
use metrics_export_config::{
    LineEnding,
    WriteMode,
};
use std::{
    fs::{
        File,
        OpenOptions,
    },
    path::Path,
};

/// Headerless CSV output. The file handle lives as long as the sink and is closed on drop.
pub struct CsvSink {
    path: String,
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Opens `path` according to `mode`, creating it if needed. Every row ends with `line_ending`.
    pub fn open(path: &Path, mode: WriteMode, line_ending: LineEnding) -> Result<Self, ExportError> {
        let mut options = OpenOptions::new();
        match mode {
            WriteMode::Truncate => options.write(true).create(true).truncate(true),
            WriteMode::Append => options.append(true).create(true),
        };
        let file = options.open(path).map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let terminator = match line_ending {
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
            LineEnding::Crlf => csv::Terminator::CRLF,
        };
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(terminator)
            .from_writer(file);

        Ok(Self {
            path: path.display().to_string(),
            writer,
        })
    }

    pub fn write(&mut self, row: &CsvRow) -> Result<(), ExportError> {
        self.writer.write_record(row.fields()).map_err(|e| self.io_error(e.into()))
    }

    /// Writes all rows and flushes. Returns the number of rows written.
    pub fn write_all<'a>(mut self, rows: impl IntoIterator<Item = &'a CsvRow>) -> Result<usize, ExportError> {
        let mut written = 0;
        for row in rows {
            self.write(row)?;
            written += 1;
        }
        self.writer.flush().map_err(|e| self.io_error(e))?;
        Ok(written)
    }

    fn io_error(&self, source: std::io::Error) -> ExportError {
        ExportError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

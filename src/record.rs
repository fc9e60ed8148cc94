//! Flat records exported after every accepted move, and the sinks receiving them.
//!
//! A record maps field names (`A1_x`, `B2_dj`, `Ld_3`, ...) to values and keeps insertion
//! order, so the header row of a table destination is stable across runs.

use crate::geometry_error::GeometryError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, f64)>,
}

impl Record {
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Adds the field, or overwrites its value if the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(field) => field.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn extend(&mut self, other: Record) {
        for (name, value) in other.fields {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.fields.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Destination for exported records. The first record written to a fresh destination
/// also writes the header of field names.
pub trait RecordSink: Send {
    fn append(&mut self, record: &Record) -> Result<(), GeometryError>;
}

/// Keeps records in memory. Useful for tests and for callers post-processing a run.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<f64>>,
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &Record) -> Result<(), GeometryError> {
        if self.header.is_none() {
            self.header = Some(record.names().map(str::to_string).collect());
        }
        self.rows.push(record.values().collect());
        Ok(())
    }
}

#[cfg(feature = "allow_filesystem")]
pub use csv_sink::CsvSink;

#[cfg(feature = "allow_filesystem")]
mod csv_sink {
    use std::fs::{File, OpenOptions};
    use std::path::{Path, PathBuf};

    use csv::{Writer, WriterBuilder};

    use super::{Record, RecordSink};
    use crate::geometry_error::GeometryError;

    /// Appends records to a CSV file. The header row is written only if the file did not
    /// exist when the sink was opened.
    pub struct CsvSink {
        path: PathBuf,
        writer: Writer<File>,
        needs_header: bool,
    }

    impl CsvSink {
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GeometryError> {
            let path = path.as_ref().to_path_buf();
            let needs_header = !path.exists();
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let writer = WriterBuilder::new().has_headers(false).from_writer(file);
            Ok(CsvSink { path, writer, needs_header })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl RecordSink for CsvSink {
        fn append(&mut self, record: &Record) -> Result<(), GeometryError> {
            if self.needs_header {
                self.writer.write_record(record.names())?;
                self.needs_header = false;
            }
            self.writer.write_record(record.values().map(|v| v.to_string()))?;
            self.writer.flush()?;
            Ok(())
        }
    }
}

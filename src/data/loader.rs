use crate::data::bar::Bar;
use crate::data::diagnostics::{Diagnostics, LoadError, RowWarning};
use crate::data::schema::Schema;
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

//bars from one file plus the non-fatal diagnostics raised while reading it
#[derive(Debug)]
pub struct LoadedBars {
    pub schema: Schema,
    pub bars: Vec<Bar>,
    pub diagnostics: Diagnostics,
}

impl LoadedBars {
    //most recent warning, if any row was defective
    pub fn warning(&self) -> Option<RowWarning> {
        self.diagnostics.last_warning
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

//loads bars from a csv file, detecting the schema from its header
pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadedBars, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let loaded = load_from_reader(file).map_err(|err| match err {
        LoadError::EmptyFile(_) => LoadError::EmptyFile(path.to_path_buf()),
        other => other,
    })?;

    debug!(
        path = %path.display(),
        schema = loaded.schema.name(),
        bars = loaded.bars.len(),
        warnings = loaded.diagnostics.warning_count,
        "loaded bars"
    );
    if let Some(warning) = loaded.warning() {
        warn!(path = %path.display(), %warning, count = loaded.diagnostics.warning_count, "defective rows in input");
    }

    Ok(loaded)
}

//loads bars from any reader, the first line must be the header
pub fn load_from_reader<R: Read>(reader: R) -> Result<LoadedBars, LoadError> {
    let mut lines = BufReader::new(reader).split(b'\n');

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(LoadError::EmptyFile(Default::default())),
    };
    let header_text = String::from_utf8_lossy(trim_cr(&header)).into_owned();

    let schema = Schema::detect(&header_text)
        .ok_or_else(|| LoadError::UnrecognizedHeader(header_text.clone()))?;

    //line numbers are 1-based physical lines, the header is line 1
    let splitter = field_splitter();
    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line?;
        let line = trim_cr(&line);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        rows.push((index as u64 + 2, split_fields(&splitter, line)?));
    }

    let parsed = schema.parse(rows);

    Ok(LoadedBars {
        schema,
        bars: parsed.bars,
        diagnostics: parsed.diagnostics,
    })
}

//csv splitting for a single line, quoted fields may contain commas
fn field_splitter() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).flexible(true).buffer_capacity(1024);
    builder
}

fn split_fields(splitter: &ReaderBuilder, line: &[u8]) -> Result<ByteRecord, csv::Error> {
    let mut record = ByteRecord::new();
    splitter.from_reader(line).read_byte_record(&mut record)?;
    Ok(record)
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

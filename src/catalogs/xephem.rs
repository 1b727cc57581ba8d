//! Reader for XEphem database (`.edb`) star catalogs.
//!
//! Each line is one comma-separated record. Only four columns matter here:
//!
//! | column | content |
//! |--------|---------|
//! | 0 | name |
//! | 2 | right ascension, hours (`h:m:s` or decimal) |
//! | 3 | declination, degrees (`d:m:s` or decimal) |
//! | 4 | visual magnitude |
//!
//! Column 1 (object type) and anything past column 4 (epoch, size, ...) are
//! ignored. Any text column may hold several `|`-separated alternates; the
//! segment before the first pipe is the one used.
//!
//! The format is described at
//! <http://www.clearskyinstitute.com/xephem/help/xephem.html#mozTocId468501>.

use std::path::Path;

use crate::error::{SkyError, SkyResult};

/// Names are kept as a fixed-width code of at most this many characters.
///
/// The limit counts `char`s, not bytes, so a multi-byte UTF-8 name is never
/// cut inside a code point. For ASCII names the two are the same.
pub const NAME_WIDTH: usize = 20;

/// One catalog line, with text fields reduced to their first alternate.
#[derive(Debug, Clone, PartialEq)]
pub struct XephemRecord {
    /// 1-based line number in the source text.
    pub line: usize,
    pub name: String,
    pub ra: String,
    pub dec: String,
    pub mag: f64,
}

fn first_alternate(field: &str) -> &str {
    field.split('|').next().unwrap_or(field).trim()
}

fn truncate_name(name: &str) -> String {
    name.chars().take(NAME_WIDTH).collect()
}

fn parse_xephem_record(record: &csv::StringRecord, line: usize) -> SkyResult<XephemRecord> {
    if record.len() < 5 {
        return Err(SkyError::malformed(
            line,
            format!("expected at least 5 fields, found {}", record.len()),
        ));
    }

    let mag_text = first_alternate(&record[4]);
    let mag: f64 = mag_text
        .parse()
        .map_err(|_| SkyError::malformed(line, format!("invalid magnitude '{}'", mag_text)))?;

    Ok(XephemRecord {
        line,
        name: truncate_name(first_alternate(&record[0])),
        ra: first_alternate(&record[2]).to_string(),
        dec: first_alternate(&record[3]).to_string(),
        mag,
    })
}

/// Load an XEphem catalog from an in-memory string.
///
/// Blank lines and lines starting with `#` are skipped. The first bad
/// record aborts the load.
pub fn load_xephem_catalog(data: &str) -> SkyResult<Vec<XephemRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(data.as_bytes());

    rdr.records()
        .map(|result| {
            let record = result?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
            parse_xephem_record(&record, line)
        })
        .collect()
}

/// Load an XEphem catalog from a file.
pub fn load_xephem_catalog_from_file<P: AsRef<Path>>(path: P) -> SkyResult<Vec<XephemRecord>> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SkyError::ResourceNotFound {
            path: path.to_path_buf(),
        },
        _ => SkyError::Io(e),
    })?;
    load_xephem_catalog(&data)
}

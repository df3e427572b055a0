//! Comma-separated output. Fields are quoted only when they contain a
//! separator, a quote, or a line break.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use councilvote_core::AssembledTable;

const SEP: char = ',';

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one record, terminated by CRLF.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{SEP}")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}

pub fn write_table<W: Write>(mut w: W, table: &AssembledTable) -> io::Result<()> {
    for line in table.lines() {
        write_row(&mut w, line)?;
    }
    w.flush()
}

/// Create (or truncate) `path` and write the table as UTF-8.
pub fn write_file(path: &Path, table: &AssembledTable) -> io::Result<()> {
    let file = File::create(path)?;
    write_table(BufWriter::new(file), table)
}

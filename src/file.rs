// src/file.rs
//! Export of the snapshot table to CSV/TSV files and clipboard text.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::config::options::{ExportFormat, ExportOptions};
use crate::error::ExportError;
use crate::table::Table;

fn writer_for<W: Write>(out: W, format: ExportFormat) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(format.delim())
        .flexible(true)
        .from_writer(out)
}

/// Write grid rows to any writer.
pub fn write_grid<W: Write>(out: W, grid: &[Vec<String>], format: ExportFormat) -> Result<(), ExportError> {
    let mut w = writer_for(out, format);
    for row in grid {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Render the table as export text (used for copy-to-clipboard).
pub fn to_export_string(table: &Table, include_headers: bool, format: ExportFormat) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_grid(&mut buf, &table.to_grid(include_headers), format)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the table to `export.out_path()`, creating the directory as needed.
/// Returns the final path written to.
pub fn write_export(export: &ExportOptions, table: &Table) -> Result<PathBuf, ExportError> {
    let path = export.out_path();
    write_export_to(&path, table, export.include_headers, export.format)?;
    Ok(path)
}

pub fn write_export_to(
    path: &Path,
    table: &Table,
    include_headers: bool,
    format: ExportFormat,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    write_grid(std::io::BufWriter::new(file), &table.to_grid(include_headers), format)?;
    logf!("Export: {} column(s) → {}", table.ncols(), path.display());
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchState;

    fn state() -> BatchState {
        serde_json::from_str(r#"{"completed_keys":["USD"],"cursor":2,"results":{
            "USD":{"avg7":{"value":1234.5,"text":"1,234.5"},"avg30":null,"avg90":{"value":0.73,"text":"0.73"}},
            "JPY":{"avg7":null,"avg30":null,"avg90":null}}}"#).unwrap()
    }

    #[test]
    fn csv_quotes_separator_in_cells() {
        let text = to_export_string(&state().snapshot(), true, ExportFormat::Csv).unwrap();
        assert_eq!(text, ",JPY,USD\n7days,,\"1,234.5\"\n30days,,\n90days,,0.73\n");
    }

    #[test]
    fn tsv_without_headers() {
        let text = to_export_string(&state().snapshot(), false, ExportFormat::Tsv).unwrap();
        assert_eq!(text, "7days\t\t1,234.5\n30days\t\t\n90days\t\t0.73\n");
    }

    #[test]
    fn ensure_directory_rejects_file() {
        let dir = tempfile::tempdir().unwrap();
        let f = dir.path().join("f");
        fs::write(&f, "x").unwrap();
        assert!(matches!(ensure_directory(&f), Err(ExportError::NotADirectory(_))));
    }
}

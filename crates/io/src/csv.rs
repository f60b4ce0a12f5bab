//! CSV export. Quoting and escaping follow RFC 4180 via the csv crate.

use std::io::Write;
use std::path::Path;

use formgrid_engine::Sheet;

pub fn export(sheet: &Sheet, path: &Path) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| e.to_string())?;
    write_rows(sheet, &mut writer)?;
    writer.flush().map_err(|e| e.to_string())
}

pub fn export_string(sheet: &Sheet) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_rows(sheet, &mut writer)?;
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Only the used extent is written, so a mostly-empty million-row sheet
/// produces a small file. Merge-hidden cells export as empty fields.
fn write_rows<W: Write>(sheet: &Sheet, writer: &mut csv::Writer<W>) -> Result<(), String> {
    let (rows, cols) = sheet.used_extent();
    for row in 0..rows {
        let record: Vec<String> = (0..cols)
            .map(|col| {
                if sheet.is_merge_hidden(row, col) {
                    String::new()
                } else {
                    sheet.get_display(row, col)
                }
            })
            .collect();
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }
    Ok(())
}

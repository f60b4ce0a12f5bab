//! JSON export: an array of rows, each an array of display strings.

use std::fs;
use std::path::Path;

use formgrid_engine::Sheet;
use serde_json::Value;

pub fn export(sheet: &Sheet, path: &Path) -> Result<(), String> {
    let json = export_value(sheet);
    let text = serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?;
    fs::write(path, text).map_err(|e| e.to_string())
}

pub fn export_value(sheet: &Sheet) -> Value {
    let (rows, cols) = sheet.used_extent();
    let data: Vec<Value> = (0..rows)
        .map(|row| {
            let line: Vec<Value> = (0..cols)
                .map(|col| Value::String(sheet.get_display(row, col)))
                .collect();
            Value::Array(line)
        })
        .collect();
    Value::Array(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgrid_engine::SheetId;
    use serde_json::json;

    #[test]
    fn test_export_value_shape() {
        let mut s = Sheet::new(SheetId(0), "Data", 100, 26);
        s.set_value(0, 0, "a");
        s.set_value(1, 1, "4");
        assert_eq!(
            export_value(&s),
            json!([["a", ""], ["", "4"]])
        );
    }

    #[test]
    fn test_export_to_file() {
        let mut s = Sheet::new(SheetId(0), "Data", 100, 26);
        s.set_value(0, 0, "x");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        export(&s, &path).unwrap();
        let parsed: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, json!([["x"]]));
    }
}

//! Building a sheet from record data: one header row from the first
//! record's keys, then one row per record.

use formgrid_engine::{Sheet, SheetId};
use serde_json::{Map, Value};

/// Turn a list of JSON objects into a sheet. Key order of the first
/// record fixes the columns; later records contribute only the keys the
/// header has. Missing keys leave blank cells.
pub fn sheet_from_records(id: SheetId, name: &str, records: &[Map<String, Value>]) -> Sheet {
    let headers: Vec<String> = records
        .first()
        .map(|r| r.keys().cloned().collect())
        .unwrap_or_default();
    let rows = (records.len() + 1).max(1);
    let cols = headers.len().max(1);
    let mut sheet = Sheet::new(id, name, rows, cols);

    for (col, header) in headers.iter().enumerate() {
        sheet.set_value(0, col, header);
    }
    for (i, record) in records.iter().enumerate() {
        for (col, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(header) {
                sheet.set_value(i + 1, col, &stringify(value));
            }
        }
    }
    sheet
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Map<String, Value>> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_header_from_first_record() {
        let recs = records(json!([
            {"name": "alice", "score": 91},
            {"name": "bob", "score": 84.5}
        ]));
        let sheet = sheet_from_records(SheetId(0), "Results", &recs);
        assert_eq!(sheet.rows, 3);
        assert_eq!(sheet.get_display(0, 0), "name");
        assert_eq!(sheet.get_display(0, 1), "score");
        assert_eq!(sheet.get_display(1, 0), "alice");
        assert_eq!(sheet.get_display(2, 1), "84.5");
    }

    #[test]
    fn test_missing_keys_leave_blanks() {
        let recs = records(json!([
            {"a": 1, "b": 2},
            {"a": 3}
        ]));
        let sheet = sheet_from_records(SheetId(0), "Partial", &recs);
        assert_eq!(sheet.get_display(2, 0), "3");
        assert_eq!(sheet.get_display(2, 1), "");
    }

    #[test]
    fn test_null_and_bool_values() {
        let recs = records(json!([{"a": null, "b": true}]));
        let sheet = sheet_from_records(SheetId(0), "Types", &recs);
        assert_eq!(sheet.get_display(1, 0), "");
        assert_eq!(sheet.get_display(1, 1), "true");
    }

    #[test]
    fn test_empty_records() {
        let sheet = sheet_from_records(SheetId(0), "Empty", &[]);
        assert_eq!(sheet.rows, 1);
        assert_eq!(sheet.cols, 1);
        assert_eq!(sheet.get_display(0, 0), "");
    }
}

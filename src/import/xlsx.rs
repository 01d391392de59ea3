//! XLSX Reader
//!
//! Delegates to the SheetJS `XLSX` global loaded by `index.html`.

use js_sys::{Reflect, Uint8Array};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use super::{ImportError, SourceRow};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = XLSX, js_name = read, catch)]
    fn xlsx_read(data: &Uint8Array, opts: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["XLSX", "utils"], js_name = sheet_to_json, catch)]
    fn sheet_to_json(sheet: &JsValue, opts: &JsValue) -> Result<JsValue, JsValue>;
}

fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "unreadable workbook".to_string())
}

fn object(pairs: &[(&str, JsValue)]) -> Result<JsValue, ImportError> {
    let obj = js_sys::Object::new();
    for (key, value) in pairs {
        Reflect::set(&obj, &JsValue::from_str(key), value).map_err(|e| ImportError::Read(js_message(&e)))?;
    }
    Ok(obj.into())
}

/// Sheet row number of the top-left cell of a used range such as `B3:F20`
pub fn range_start_row(range: &str) -> usize {
    let start = range.split(':').next().unwrap_or_default();
    start
        .trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == '$')
        .parse()
        .unwrap_or(1)
}

/// Rows of the first sheet, every cell as text, tagged with the sheet row they came from
pub fn parse_xlsx(bytes: &Uint8Array) -> Result<Vec<SourceRow>, ImportError> {
    let loaded = Reflect::has(&js_sys::global(), &JsValue::from_str("XLSX")).unwrap_or(false);
    if !loaded {
        return Err(ImportError::XlsxUnavailable);
    }

    let workbook = xlsx_read(bytes, &object(&[("type", "array".into())])?).map_err(|e| ImportError::Read(js_message(&e)))?;
    let names = Reflect::get(&workbook, &"SheetNames".into()).map_err(|e| ImportError::Read(js_message(&e)))?;
    let first = Reflect::get_u32(&names, 0).map_err(|e| ImportError::Read(js_message(&e)))?;
    if first.is_undefined() {
        return Err(ImportError::Empty);
    }
    let sheets = Reflect::get(&workbook, &"Sheets".into()).map_err(|e| ImportError::Read(js_message(&e)))?;
    let sheet = Reflect::get(&sheets, &first).map_err(|e| ImportError::Read(js_message(&e)))?;

    let first_row = Reflect::get(&sheet, &"!ref".into())
        .ok()
        .and_then(|r| r.as_string())
        .map(|r| range_start_row(&r))
        .unwrap_or(1);

    // blankrows keeps empty rows in place so indices map back to sheet rows
    let opts = object(&[
        ("header", 1.into()),
        ("raw", false.into()),
        ("defval", "".into()),
        ("blankrows", true.into()),
    ])?;
    let rows = sheet_to_json(&sheet, &opts).map_err(|e| ImportError::Read(js_message(&e)))?;
    let rows: Vec<Vec<Value>> = serde_wasm_bindgen::from_value(rows).map_err(|e| ImportError::Read(e.to_string()))?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| SourceRow {
            line: first_row + index,
            cells: row.iter().map(cell_to_string).collect(),
        })
        .filter(|row| row.cells.iter().any(|cell| !cell.trim().is_empty()))
        .collect())
}

pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            // Whole numbers lose the ".0" spreadsheets add
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&json!(null)), "");
        assert_eq!(cell_to_string(&json!("Tips")), "Tips");
        assert_eq!(cell_to_string(&json!(3.0)), "3");
        assert_eq!(cell_to_string(&json!(12.5)), "12.5");
        assert_eq!(cell_to_string(&json!(true)), "true");
    }

    #[test]
    fn test_range_start_row() {
        assert_eq!(range_start_row("A1:E12"), 1);
        assert_eq!(range_start_row("B3:F20"), 3);
        assert_eq!(range_start_row("$C$4:$D$9"), 4);
        assert_eq!(range_start_row("A7"), 7);
        assert_eq!(range_start_row(""), 1);
    }
}

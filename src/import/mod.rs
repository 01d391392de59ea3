//! Request Import
//!
//! CSV/XLSX file → header mapping → per-row validation → preview.
//! Only the valid rows of a preview are ever submitted.

mod csv;
mod headers;
mod validate;
mod xlsx;

use js_sys::Uint8Array;
use thiserror::Error;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::models::{Fund, NewRequest};

pub use csv::parse_csv;
pub use headers::{canonical_column, normalize_header, Column, HeaderMap};
pub use validate::validate_row;
pub use xlsx::parse_xlsx;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("The file has no rows")]
    Empty,

    #[error("Unclosed quote starting on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("Unsupported file type \"{0}\"; use .csv or .xlsx")]
    UnsupportedFile(String),

    #[error("Spreadsheet support did not load; save the sheet as CSV instead")]
    XlsxUnavailable,

    #[error("Could not read file: {0}")]
    Read(String),
}

/// One non-blank row of the picked file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based line (CSV) or sheet row (XLSX) the row starts on
    pub line: usize,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidRow {
    /// Where the row sits in the source file, as the user sees it
    pub row_number: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPreview {
    pub total_rows: usize,
    pub valid_rows: Vec<NewRequest>,
    pub invalid_rows: Vec<InvalidRow>,
    /// Headers that matched no field and were ignored
    pub unknown_columns: Vec<String>,
}

impl ImportPreview {
    pub fn can_submit(&self) -> bool {
        !self.valid_rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

impl FileKind {
    pub fn from_name(name: &str) -> Result<Self, ImportError> {
        let lower = name.to_lowercase();
        if lower.ends_with(".csv") {
            Ok(Self::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(Self::Xlsx)
        } else {
            let ext = lower.rsplit_once('.').map(|(_, e)| e.to_string()).unwrap_or(lower);
            Err(ImportError::UnsupportedFile(ext))
        }
    }
}

/// Split header from data rows and validate each data row
pub fn build_preview(rows: &[SourceRow], funds: &[Fund]) -> Result<ImportPreview, ImportError> {
    let (header, data) = rows.split_first().ok_or(ImportError::Empty)?;
    let headers = HeaderMap::from_row(&header.cells);

    let missing: Vec<&'static str> = [Column::ItemName, Column::Quantity]
        .into_iter()
        .filter(|c| headers.index(*c).is_none())
        .map(|c| c.key())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut preview = ImportPreview {
        total_rows: data.len(),
        unknown_columns: headers.unknown.clone(),
        ..Default::default()
    };
    for row in data {
        match validate_row(&headers, &row.cells, funds) {
            Ok(request) => preview.valid_rows.push(request),
            Err(errors) => preview.invalid_rows.push(InvalidRow { row_number: row.line, errors }),
        }
    }
    log::info!(
        "[IMPORT] {} rows: {} valid, {} invalid",
        preview.total_rows,
        preview.valid_rows.len(),
        preview.invalid_rows.len()
    );
    Ok(preview)
}

/// Read a picked file into rows
pub async fn read_import_file(file: &File) -> Result<Vec<SourceRow>, ImportError> {
    let read_err = |e: wasm_bindgen::JsValue| ImportError::Read(format!("{:?}", e));
    match FileKind::from_name(&file.name())? {
        FileKind::Csv => {
            let text = JsFuture::from(file.text()).await.map_err(read_err)?;
            parse_csv(&text.as_string().unwrap_or_default())
        }
        FileKind::Xlsx => {
            let buffer = JsFuture::from(file.array_buffer()).await.map_err(read_err)?;
            parse_xlsx(&Uint8Array::new(&buffer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "Item,Qty,Unit Price,Fund,Notes\n\
                         Pipette tips,4,$12.50,SU-1,\n\
                         ,2,3.00,,missing name\n\
                         Ethanol,0,,,\n\
                         Gloves,10,\"1,200.00\",startup,\"box of 100\"\n\
                         Agar,1,,NSF,\n";

    fn funds() -> Vec<Fund> {
        vec![Fund { id: 7, name: "Startup".into(), code: Some("SU-1".into()), remaining_budget: None }]
    }

    #[test]
    fn test_preview_counts_add_up() {
        let rows = parse_csv(SHEET).unwrap();
        let preview = build_preview(&rows, &funds()).unwrap();
        assert_eq!(preview.total_rows, 5);
        assert_eq!(preview.valid_rows.len() + preview.invalid_rows.len(), preview.total_rows);
        assert_eq!(preview.valid_rows.len(), 2);
        assert_eq!(
            preview.invalid_rows.iter().map(|r| r.row_number).collect::<Vec<_>>(),
            vec![3, 4, 6]
        );
    }

    #[test]
    fn test_only_valid_rows_are_submittable() {
        let rows = parse_csv(SHEET).unwrap();
        let preview = build_preview(&rows, &funds()).unwrap();
        let names: Vec<&str> = preview.valid_rows.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, vec!["Pipette tips", "Gloves"]);
        assert_eq!(preview.valid_rows[1].unit_price, Some(1200.0));
        assert!(preview.can_submit());
    }

    #[test]
    fn test_missing_required_columns() {
        let rows = parse_csv("Name,Vendor\nTips,Sigma\n").unwrap();
        assert_eq!(build_preview(&rows, &[]), Err(ImportError::MissingColumns(vec!["quantity"])));
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(build_preview(&[], &[]), Err(ImportError::Empty));
        let header_only = build_preview(&parse_csv("item,qty").unwrap(), &[]).unwrap();
        assert_eq!(header_only.total_rows, 0);
        assert!(!header_only.can_submit());
    }

    #[test]
    fn test_invalid_rows_report_file_lines() {
        let text = "item,qty,notes\nTips,1,\"two\nlines\"\n\nBad,0,\n";
        let preview = build_preview(&parse_csv(text).unwrap(), &[]).unwrap();
        assert_eq!(preview.total_rows, 2);
        assert_eq!(preview.invalid_rows.len(), 1);
        assert_eq!(preview.invalid_rows[0].row_number, 5);
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::from_name("orders.CSV"), Ok(FileKind::Csv));
        assert_eq!(FileKind::from_name("orders.xlsx"), Ok(FileKind::Xlsx));
        assert_eq!(FileKind::from_name("orders.pdf"), Err(ImportError::UnsupportedFile("pdf".into())));
    }
}

//! Row Validation

use super::headers::{Column, HeaderMap};
use crate::models::{Fund, NewRequest};
use crate::validation::{find_fund, optional_text, parse_positive_int, parse_price};

/// Turn one data row into a request, or list everything wrong with it
pub fn validate_row(headers: &HeaderMap, row: &[String], funds: &[Fund]) -> Result<NewRequest, Vec<String>> {
    let mut errors = Vec::new();

    let item_name = headers.cell(row, Column::ItemName);
    if item_name.is_empty() {
        errors.push("item_name: required".to_string());
    }
    let quantity = parse_positive_int(headers.cell(row, Column::Quantity))
        .map_err(|e| errors.push(format!("quantity: {}", e)))
        .unwrap_or(0);
    let unit_price = parse_price(headers.cell(row, Column::UnitPrice))
        .map_err(|e| errors.push(format!("unit_price: {}", e)))
        .unwrap_or(None);
    let fund = match headers.cell(row, Column::Fund) {
        "" => None,
        raw => match find_fund(funds, raw) {
            Some(f) => Some(f.id),
            None => {
                errors.push(format!("fund: unknown fund \"{}\"", raw));
                None
            }
        },
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(NewRequest {
        item_name: item_name.to_string(),
        catalog_number: optional_text(headers.cell(row, Column::CatalogNumber)),
        vendor: optional_text(headers.cell(row, Column::Vendor)),
        quantity,
        unit_price,
        fund,
        notes: optional_text(headers.cell(row, Column::Notes)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn funds() -> Vec<Fund> {
        vec![Fund { id: 7, name: "Startup".into(), code: Some("SU-1".into()), remaining_budget: Some(1000.0) }]
    }

    #[test]
    fn test_valid_row() {
        let headers = HeaderMap::from_row(&strings(&["Item", "Qty", "Price", "Fund", "Supplier"]));
        let request = validate_row(&headers, &strings(&["Tips", "4", "$12.00", "su-1", "Sigma"]), &funds()).unwrap();
        assert_eq!(request.item_name, "Tips");
        assert_eq!(request.quantity, 4);
        assert_eq!(request.unit_price, Some(12.0));
        assert_eq!(request.fund, Some(7));
        assert_eq!(request.vendor.as_deref(), Some("Sigma"));
    }

    #[test]
    fn test_row_errors_are_collected() {
        let headers = HeaderMap::from_row(&strings(&["Item", "Qty", "Price", "Fund"]));
        let errors = validate_row(&headers, &strings(&["", "zero", "-4", "NSF"]), &funds()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[3].contains("NSF"));
    }

    #[test]
    fn test_short_row_reads_missing_cells_as_empty() {
        let headers = HeaderMap::from_row(&strings(&["Item", "Qty", "Notes"]));
        let request = validate_row(&headers, &strings(&["Gloves", "2"]), &[]).unwrap();
        assert_eq!(request.notes, None);
    }
}

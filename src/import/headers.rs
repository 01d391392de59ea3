//! Header Normalization
//!
//! Maps spreadsheet column titles onto request fields.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ItemName,
    CatalogNumber,
    Vendor,
    Quantity,
    UnitPrice,
    Fund,
    Notes,
}

impl Column {
    pub fn key(&self) -> &'static str {
        match self {
            Self::ItemName => "item_name",
            Self::CatalogNumber => "catalog_number",
            Self::Vendor => "vendor",
            Self::Quantity => "quantity",
            Self::UnitPrice => "unit_price",
            Self::Fund => "fund",
            Self::Notes => "notes",
        }
    }
}

/// Trim, lowercase, collapse runs of non-alphanumerics to `_`
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;
    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Resolve a header (aliases included) to its column
pub fn canonical_column(raw: &str) -> Option<Column> {
    let column = match normalize_header(raw).as_str() {
        "item_name" | "item" | "name" | "product" => Column::ItemName,
        "catalog_number" | "catalog" | "cat_no" | "catalog_no" => Column::CatalogNumber,
        "vendor" | "supplier" => Column::Vendor,
        "quantity" | "qty" | "amount" => Column::Quantity,
        "unit_price" | "price" | "unit_cost" => Column::UnitPrice,
        "fund" | "fund_code" => Column::Fund,
        "notes" | "comment" | "comments" => Column::Notes,
        _ => return None,
    };
    Some(column)
}

/// Column index per known field; the first occurrence wins
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMap {
    slots: Vec<(Column, usize)>,
    pub unknown: Vec<String>,
}

impl HeaderMap {
    pub fn from_row(row: &[String]) -> Self {
        let mut map = Self::default();
        for (index, title) in row.iter().enumerate() {
            match canonical_column(title) {
                Some(column) if map.index(column).is_none() => map.slots.push((column, index)),
                Some(_) => {}
                None if !title.trim().is_empty() => map.unknown.push(title.trim().to_string()),
                None => {}
            }
        }
        map
    }

    pub fn index(&self, column: Column) -> Option<usize> {
        self.slots.iter().find(|(c, _)| *c == column).map(|(_, i)| *i)
    }

    /// Trimmed cell for a column, empty when absent
    pub fn cell<'a>(&self, row: &'a [String], column: Column) -> &'a str {
        self.index(column).and_then(|i| row.get(i)).map(|s| s.trim()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Unit Price ($) "), "unit_price");
        assert_eq!(normalize_header("Cat. No."), "cat_no");
        assert_eq!(normalize_header("ITEM-NAME"), "item_name");
        assert_eq!(normalize_header("***"), "");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(canonical_column("Product"), Some(Column::ItemName));
        assert_eq!(canonical_column("Qty"), Some(Column::Quantity));
        assert_eq!(canonical_column("Supplier"), Some(Column::Vendor));
        assert_eq!(canonical_column("Fund Code"), Some(Column::Fund));
        assert_eq!(canonical_column("Comments"), Some(Column::Notes));
        assert_eq!(canonical_column("Color"), None);
    }

    #[test]
    fn test_header_map_first_wins() {
        let row: Vec<String> = ["Name", "Qty", "Item", "Color"].iter().map(|s| s.to_string()).collect();
        let map = HeaderMap::from_row(&row);
        assert_eq!(map.index(Column::ItemName), Some(0));
        assert_eq!(map.index(Column::Quantity), Some(1));
        assert_eq!(map.index(Column::Vendor), None);
        assert_eq!(map.unknown, vec!["Color".to_string()]);

        let data: Vec<String> = [" Tips ", "2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(map.cell(&data, Column::ItemName), "Tips");
        assert_eq!(map.cell(&data, Column::Vendor), "");
    }
}

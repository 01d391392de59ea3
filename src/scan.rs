//! Scan Lookup
//!
//! Decides what the scanner shows after the server answers a barcode
//! lookup.

use crate::models::Item;

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// "No item found"; nothing to confirm
    NotFound,
    /// Best match is archived; confirmation disabled
    AlreadyCheckedOut(Item),
    /// Ready for explicit confirmation
    Found(Item),
}

impl LookupOutcome {
    pub fn can_confirm(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn item(&self) -> Option<&Item> {
        match self {
            Self::NotFound => None,
            Self::AlreadyCheckedOut(item) | Self::Found(item) => Some(item),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NotFound => "No item found".to_string(),
            Self::AlreadyCheckedOut(item) => format!("{} is already checked out", item.name),
            Self::Found(item) => format!("Found {}", item.name),
        }
    }
}

/// Pick the item a scanned code refers to
///
/// Exact barcode matches (trimmed, case-insensitive) win, and among those
/// an active item beats an archived one. Without an exact match, a single
/// search result is accepted as-is.
pub fn resolve_lookup(code: &str, items: Vec<Item>) -> LookupOutcome {
    let wanted = code.trim().to_lowercase();
    let is_exact = |item: &Item| {
        item.barcode.as_deref().is_some_and(|b| b.trim().to_lowercase() == wanted)
    };

    let mut exact: Vec<Item> = items.iter().filter(|i| is_exact(i)).cloned().collect();
    let best = if !exact.is_empty() {
        exact.sort_by_key(|i| i.is_archived);
        exact.into_iter().next()
    } else if items.len() == 1 {
        items.into_iter().next()
    } else {
        None
    };

    match best {
        None => LookupOutcome::NotFound,
        Some(item) if item.is_archived => LookupOutcome::AlreadyCheckedOut(item),
        Some(item) => LookupOutcome::Found(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, barcode: Option<&str>, archived: bool) -> Item {
        Item {
            id,
            name: format!("Item {}", id),
            barcode: barcode.map(String::from),
            catalog_number: None,
            vendor: None,
            quantity: 1.0,
            unit: None,
            location: None,
            expiration_date: None,
            is_archived: archived,
        }
    }

    #[test]
    fn test_no_results_is_not_found() {
        let outcome = resolve_lookup("4006381333931", vec![]);
        assert_eq!(outcome, LookupOutcome::NotFound);
        assert_eq!(outcome.message(), "No item found");
        assert!(!outcome.can_confirm());
        assert!(outcome.item().is_none());
    }

    #[test]
    fn test_archived_match_blocks_confirmation() {
        let outcome = resolve_lookup("4006381333931", vec![item(1, Some("4006381333931"), true)]);
        assert!(matches!(outcome, LookupOutcome::AlreadyCheckedOut(_)));
        assert!(outcome.message().contains("already checked out"));
        assert!(!outcome.can_confirm());
    }

    #[test]
    fn test_exact_match_prefers_active_duplicate() {
        let items = vec![
            item(1, Some("ABC-1"), true),
            item(2, Some("zzz"), false),
            item(3, Some(" abc-1 "), false),
        ];
        assert_eq!(resolve_lookup("abc-1", items), LookupOutcome::Found(item(3, Some(" abc-1 "), false)));
    }

    #[test]
    fn test_single_fuzzy_result_is_accepted() {
        let outcome = resolve_lookup("CAT-99", vec![item(5, None, false)]);
        assert_eq!(outcome.item().map(|i| i.id), Some(5));
        assert!(outcome.can_confirm());
    }

    #[test]
    fn test_many_inexact_results_are_not_a_match() {
        let outcome = resolve_lookup("CAT-99", vec![item(5, None, false), item(6, Some("other"), false)]);
        assert_eq!(outcome, LookupOutcome::NotFound);
    }
}

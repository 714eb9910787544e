//! Caller-side validation.
//!
//! The store accepts whatever it is given; screens run these checks first so
//! the user gets a message instead of a half-filled record.

use chrono::{DateTime, Utc};

use kitshelf_core::{DomainError, DomainResult, ItemId};

use crate::item::{Item, LoanTerms};
use crate::state::InventoryState;
use crate::taxonomy::{Named, find_by_name};

/// Check a new category/location name against the existing list.
///
/// Returns the trimmed name on success.
pub fn validate_taxonomy_name<T: Named>(existing: &[T], candidate: &str) -> DomainResult<String> {
    let name = candidate.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if find_by_name(existing, name).is_some() {
        return Err(DomainError::conflict(format!("'{name}' already exists")));
    }
    Ok(name.to_string())
}

/// Raw input of the "add item" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub barcode: String,
    pub category: String,
    pub location: String,
    /// Free text as typed; see [`ItemDraft::into_item`] for how it is read.
    pub quantity: String,
    pub description: String,
    pub image: Option<String>,
}

impl ItemDraft {
    /// Validate the draft and build a new, available item created at `now`.
    ///
    /// Quantity is the leading integer of the field (`"4 pcs"` is 4, `"3.5"` is
    /// 3) and falls back to 1 when there is none or it is zero.
    pub fn into_item(self, now: DateTime<Utc>) -> DomainResult<Item> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("item name is required"));
        }
        let barcode = self.barcode.trim();
        if barcode.is_empty() {
            return Err(DomainError::validation("barcode is required"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("category is required"));
        }
        if self.location.trim().is_empty() {
            return Err(DomainError::validation("location is required"));
        }

        let quantity = match leading_integer(&self.quantity) {
            Some(0) | None => 1,
            Some(q) => q,
        };

        let mut item = Item::new(
            ItemId::generate(),
            name,
            barcode,
            self.category,
            self.location,
            quantity,
            now,
        );

        let description = self.description.trim();
        if !description.is_empty() {
            item.description = Some(description.to_string());
        }
        item.image = self.image.filter(|uri| !uri.is_empty());

        Ok(item)
    }
}

/// Integer prefix of `raw` after leading whitespace, with an optional sign.
/// Values past the `i64` range saturate.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for d in digits[..end].bytes() {
        let d = i64::from(d - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }
    Some(value)
}

/// Raw input of the "lend item" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LendRequest {
    pub item_id: ItemId,
    pub borrower: String,
    pub expected_return: String,
    pub notes: String,
}

impl LendRequest {
    /// Check the request against the current state.
    ///
    /// The loan location is the item's current location.
    pub fn validate(&self, state: &InventoryState) -> DomainResult<LoanTerms> {
        let item = state.item(&self.item_id).ok_or_else(DomainError::not_found)?;

        if let Some(info) = item.lending_info() {
            return Err(DomainError::conflict(format!(
                "{} is currently lent to {}",
                item.name, info.borrower
            )));
        }

        let borrower = self.borrower.trim();
        if borrower.is_empty() {
            return Err(DomainError::validation("borrower name is required"));
        }

        let expected_return = self.expected_return.trim();
        let notes = self.notes.trim();
        Ok(LoanTerms {
            borrower: borrower.to_string(),
            location: item.location.clone(),
            expected_return: (!expected_return.is_empty()).then(|| expected_return.to_string()),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Category;
    use kitshelf_core::Entity;

    fn draft() -> ItemDraft {
        ItemDraft {
            name: "  Label Printer ".to_string(),
            barcode: " 0123456789012 ".to_string(),
            category: "Electronics".to_string(),
            location: "Main Office".to_string(),
            quantity: "".to_string(),
            description: "   ".to_string(),
            image: None,
        }
    }

    #[test]
    fn taxonomy_name_is_trimmed() {
        let existing = vec![Category::new("1", "Electronics")];
        assert_eq!(validate_taxonomy_name(&existing, "  Garden "), Ok("Garden".to_string()));
    }

    #[test]
    fn taxonomy_name_rejects_empty() {
        let existing: Vec<Category> = vec![];
        assert!(matches!(validate_taxonomy_name(&existing, "  "), Err(DomainError::Validation(_))));
    }

    #[test]
    fn taxonomy_name_rejects_case_insensitive_duplicate() {
        let existing = vec![Category::new("1", "Electronics")];
        assert!(matches!(
            validate_taxonomy_name(&existing, "ELECTRONICS "),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn draft_builds_trimmed_item_with_default_quantity() {
        let now = Utc::now();
        let item = draft().into_item(now).unwrap();

        assert_eq!(item.name, "Label Printer");
        assert_eq!(item.barcode, "0123456789012");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.description, None);
        assert_eq!(item.date_added(), now);
        assert!(!item.is_lent());
        assert!(!item.id().as_str().is_empty());
    }

    #[test]
    fn draft_quantity_parsing() {
        let now = Utc::now();
        for (raw, expected) in [
            ("4", 4),
            (" 12 ", 12),
            ("0", 1),
            ("lots", 1),
            ("", 1),
            ("3.5", 3),
            ("4 pcs", 4),
            ("-2", -2),
            ("+7", 7),
            ("x9", 1),
            ("99999999999999999999", i64::MAX),
        ] {
            let mut d = draft();
            d.quantity = raw.to_string();
            assert_eq!(d.into_item(now).unwrap().quantity, expected, "quantity {raw:?}");
        }
    }

    #[test]
    fn draft_requires_fields() {
        let now = Utc::now();

        let mut d = draft();
        d.name = " ".to_string();
        assert!(matches!(d.into_item(now), Err(DomainError::Validation(_))));

        let mut d = draft();
        d.barcode.clear();
        assert!(matches!(d.into_item(now), Err(DomainError::Validation(_))));

        let mut d = draft();
        d.category.clear();
        assert!(matches!(d.into_item(now), Err(DomainError::Validation(_))));

        let mut d = draft();
        d.location.clear();
        assert!(matches!(d.into_item(now), Err(DomainError::Validation(_))));
    }

    fn lend_state() -> InventoryState {
        let mut state = InventoryState::default();
        state.add_item(Item::new(ItemId::from("1"), "Drill", "123", "Tools", "Warehouse", 1, Utc::now()));
        state
    }

    fn request(borrower: &str) -> LendRequest {
        LendRequest {
            item_id: ItemId::from("1"),
            borrower: borrower.to_string(),
            expected_return: " ".to_string(),
            notes: "  ".to_string(),
        }
    }

    #[test]
    fn lend_request_uses_item_location() {
        let terms = request(" Alice ").validate(&lend_state()).unwrap();
        assert_eq!(terms, LoanTerms::new("Alice", "Warehouse"));
    }

    #[test]
    fn lend_request_keeps_return_date_as_typed() {
        let mut req = request("Alice");
        req.expected_return = "  next friday ".to_string();
        let terms = req.validate(&lend_state()).unwrap();
        assert_eq!(terms, LoanTerms::new("Alice", "Warehouse").expected_return("next friday"));
    }

    #[test]
    fn lend_request_rejects_missing_item_and_borrower() {
        let state = lend_state();

        let mut missing = request("Alice");
        missing.item_id = ItemId::from("2");
        assert_eq!(missing.validate(&state), Err(DomainError::NotFound));

        assert!(matches!(request("   ").validate(&state), Err(DomainError::Validation(_))));
    }

    #[test]
    fn lend_request_rejects_already_lent_item() {
        let mut state = lend_state();
        state.lend_item(&ItemId::from("1"), LoanTerms::new("Bob", "Warehouse"), Utc::now());

        match request("Alice").validate(&state) {
            Err(DomainError::Conflict(msg)) => assert_eq!(msg, "Drill is currently lent to Bob"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }
}

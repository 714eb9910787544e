use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kitshelf_core::{Entity, ItemId};

/// Who has an item, where it went and when it is due back.
///
/// Owned by exactly one [`Item`]; created when lending starts and dropped on return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LendingInfo {
    pub borrower: String,
    /// Where the item is while lent (independent of the item's home location).
    pub location: String,
    pub date_lent: DateTime<Utc>,
    /// Free text as entered ("2024-06-14", "next friday"); never parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_return: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The caller-supplied part of a loan; `date_lent` is stamped when it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanTerms {
    pub borrower: String,
    pub location: String,
    pub expected_return: Option<String>,
    pub notes: Option<String>,
}

impl LoanTerms {
    pub fn new(borrower: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            borrower: borrower.into(),
            location: location.into(),
            expected_return: None,
            notes: None,
        }
    }

    pub fn expected_return(mut self, when: impl Into<String>) -> Self {
        self.expected_return = Some(when.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn into_info(self, date_lent: DateTime<Utc>) -> LendingInfo {
        LendingInfo {
            borrower: self.borrower,
            location: self.location,
            date_lent,
            expected_return: self.expected_return,
            notes: self.notes,
        }
    }
}

/// A tracked inventory item.
///
/// `category` and `location` are plain name references; nothing keeps them in
/// step with the taxonomy lists. The lent flag is derived from the presence of
/// [`LendingInfo`], so "lent iff lending info is set" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    id: ItemId,
    pub name: String,
    pub barcode: String,
    pub category: String,
    pub location: String,
    pub quantity: i64,
    pub description: Option<String>,
    date_added: DateTime<Utc>,
    lending: Option<LendingInfo>,
    /// Opaque image handle (URI) from the image source.
    pub image: Option<String>,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        barcode: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
        quantity: i64,
        date_added: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            barcode: barcode.into(),
            category: category.into(),
            location: location.into(),
            quantity,
            description: None,
            date_added,
            lending: None,
            image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn id_typed(&self) -> &ItemId {
        &self.id
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    pub fn is_lent(&self) -> bool {
        self.lending.is_some()
    }

    pub fn lending_info(&self) -> Option<&LendingInfo> {
        self.lending.as_ref()
    }

    /// Start (or restart) a loan. Any previous lending info is replaced.
    pub fn lend(&mut self, info: LendingInfo) {
        self.lending = Some(info);
    }

    /// End the loan, if any. Returns the lending info that was cleared.
    pub fn mark_returned(&mut self) -> Option<LendingInfo> {
        self.lending.take()
    }

    /// Keep the creation timestamp of `previous` (it never changes after creation).
    pub(crate) fn keep_date_added_of(&mut self, previous: &Item) {
        self.date_added = previous.date_added;
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Stored shape of an item: an explicit `isLent` flag next to the optional
/// lending record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: ItemId,
    name: String,
    barcode: String,
    category: String,
    location: String,
    quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    date_added: DateTime<Utc>,
    #[serde(default)]
    is_lent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lending_info: Option<LendingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let lending = match (record.is_lent, record.lending_info) {
            (true, Some(info)) => Some(info),
            (true, None) => {
                tracing::warn!(item_id = %record.id, "item flagged as lent without lending info; loading as available");
                None
            }
            (false, Some(_)) => {
                tracing::warn!(item_id = %record.id, "dropping lending info on item not flagged as lent");
                None
            }
            (false, None) => None,
        };

        Self {
            id: record.id,
            name: record.name,
            barcode: record.barcode,
            category: record.category,
            location: record.location,
            quantity: record.quantity,
            description: record.description,
            date_added: record.date_added,
            lending,
            image: record.image,
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        Self {
            is_lent: item.lending.is_some(),
            id: item.id,
            name: item.name,
            barcode: item.barcode,
            category: item.category,
            location: item.location,
            quantity: item.quantity,
            description: item.description,
            date_added: item.date_added,
            lending_info: item.lending,
            image: item.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn drill() -> Item {
        Item::new(ItemId::from("1"), "Drill", "123", "Tools", "Warehouse", 2, t0())
    }

    fn loan(borrower: &str) -> LendingInfo {
        LendingInfo {
            borrower: borrower.to_string(),
            location: "Site B".to_string(),
            date_lent: t0(),
            expected_return: None,
            notes: None,
        }
    }

    #[test]
    fn new_item_is_available() {
        let item = drill();
        assert!(!item.is_lent());
        assert!(item.lending_info().is_none());
    }

    #[test]
    fn lend_then_return_clears_lending_info() {
        let mut item = drill();
        item.lend(loan("Alice"));
        assert!(item.is_lent());
        assert_eq!(item.lending_info().unwrap().borrower, "Alice");

        let cleared = item.mark_returned().unwrap();
        assert_eq!(cleared.borrower, "Alice");
        assert!(!item.is_lent());
        assert_eq!(item, drill());
    }

    #[test]
    fn serializes_with_camel_case_and_lent_flag() {
        let mut item = drill().with_image("file:///photos/drill.jpg");
        item.lend(loan("Bob"));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["isLent"], true);
        assert_eq!(json["dateAdded"], "2024-03-01T09:30:00Z");
        assert_eq!(json["lendingInfo"]["borrower"], "Bob");
        assert_eq!(json["lendingInfo"]["dateLent"], "2024-03-01T09:30:00Z");
        assert_eq!(json["image"], "file:///photos/drill.jpg");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn reads_timestamps_written_with_milliseconds() {
        let json = r#"{
            "id": "1718000000000",
            "name": "Stapler",
            "barcode": "999",
            "category": "Office Supplies",
            "location": "Main Office",
            "quantity": 1,
            "description": "",
            "dateAdded": "2024-06-10T08:13:20.000Z",
            "isLent": false
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id_typed().as_str(), "1718000000000");
        assert_eq!(item.description.as_deref(), Some(""));
        assert!(!item.is_lent());
    }

    #[test]
    fn lent_flag_without_info_loads_as_available() {
        let json = r#"{
            "id": "7", "name": "Saw", "barcode": "1", "category": "Tools",
            "location": "Warehouse", "quantity": 1,
            "dateAdded": "2024-03-01T09:30:00Z", "isLent": true
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert!(!item.is_lent());
    }

    #[test]
    fn lending_info_without_flag_is_dropped() {
        let json = r#"{
            "id": "7", "name": "Saw", "barcode": "1", "category": "Tools",
            "location": "Warehouse", "quantity": 1,
            "dateAdded": "2024-03-01T09:30:00Z", "isLent": false,
            "lendingInfo": {"borrower": "Eve", "location": "Home", "dateLent": "2024-03-02T00:00:00Z"}
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.lending_info().is_none());
    }
}

//! Categories and locations: flat, user-managed name lists.

use serde::{Deserialize, Serialize};

use kitshelf_core::{CategoryId, Entity, LocationId};

/// Anything with a display name that must stay unique at creation time.
pub trait Named {
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Location {
    pub fn new(id: impl Into<LocationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Named for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Location {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Categories offered on a fresh install.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("1", "Electronics"),
        Category::new("2", "Office Supplies"),
        Category::new("3", "Tools"),
    ]
}

/// Locations offered on a fresh install.
pub fn default_locations() -> Vec<Location> {
    vec![
        Location::new("1", "Main Office"),
        Location::new("2", "Warehouse"),
        Location::new("3", "Storage Room"),
    ]
}

/// Case-insensitive lookup by display name.
pub fn find_by_name<'a, T: Named>(entries: &'a [T], name: &str) -> Option<&'a T> {
    let wanted = name.trim().to_lowercase();
    entries.iter().find(|e| e.name().to_lowercase() == wanted)
}

//! Static catalog of product categories and the store collections that hold them.

/// One selectable product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryEntry {
    /// Label shown in the category selector.
    pub display_name: &'static str,
    /// Collection name in the document store.
    pub collection_id: &'static str,
}

const fn entry(display_name: &'static str, collection_id: &'static str) -> CategoryEntry {
    CategoryEntry {
        display_name,
        collection_id,
    }
}

const CATEGORIES: &[CategoryEntry] = &[
    entry("Appliances", "Appliances"),
    entry("Automobiles & Motorcycles", "Automobiles_n_Motorcycles"),
    entry("Bags", "Bags"),
    entry("Beauty & Health", "Beauty_n_Health"),
    entry("Computer", "Computer"),
    entry("Consumer Electronics", "Consumer_Electronics"),
    entry("Hair", "Hair"),
    entry("Home Improvement", "Home_Improvement"),
    entry("Home", "Home"),
    entry("Jewelry", "Jewelry"),
    entry("Kids & Babies", "Kids_n_Babies"),
    entry("Men's Fashion", "Mens_Fashion"),
    entry("Office", "Office"),
    entry("Outdoor, Fun & Sports", "Outdoor_Fun_n_Sports"),
    entry("Pet", "Pet"),
    entry("Phones & Telecommunications", "Phones_n_Telecommunications"),
    entry("Security", "Security"),
    entry("Shoes", "Shoes"),
    entry("Tools", "Tools"),
    entry("Toys", "Toys"),
    entry("Watches", "Watches"),
    entry("Women's Fashion", "Womens_Fashion"),
];

/// All categories in selector order.
pub fn categories() -> &'static [CategoryEntry] {
    CATEGORIES
}

/// Category preselected when the dashboard opens.
pub fn default_category() -> &'static CategoryEntry {
    &CATEGORIES[0]
}

/// Look up a category by its display name.
pub fn find_by_display_name(display_name: &str) -> Option<&'static CategoryEntry> {
    CATEGORIES
        .iter()
        .find(|entry| entry.display_name == display_name)
}

/// Look up a category by its collection id.
pub fn find_by_collection(collection_id: &str) -> Option<&'static CategoryEntry> {
    CATEGORIES
        .iter()
        .find(|entry| entry.collection_id == collection_id)
}

/// Resolve the collection that backs a display name.
pub fn collection_for(display_name: &str) -> Option<&'static str> {
    find_by_display_name(display_name).map(|entry| entry.collection_id)
}

/// Resolve the display name for a collection id.
pub fn display_name_for(collection_id: &str) -> Option<&'static str> {
    find_by_collection(collection_id).map(|entry| entry.display_name)
}

/// Accepts either a display name or a collection id, in that order.
pub fn resolve(name: &str) -> Option<&'static CategoryEntry> {
    find_by_display_name(name).or_else(|| find_by_collection(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn display_names_and_collections_are_unique() {
        let names: HashSet<_> = categories().iter().map(|e| e.display_name).collect();
        let ids: HashSet<_> = categories().iter().map(|e| e.collection_id).collect();
        assert_eq!(names.len(), categories().len());
        assert_eq!(ids.len(), categories().len());
        assert_eq!(categories().len(), 22);
    }

    #[test]
    fn lookups_resolve_both_directions() {
        assert_eq!(collection_for("Men's Fashion"), Some("Mens_Fashion"));
        assert_eq!(
            display_name_for("Outdoor_Fun_n_Sports"),
            Some("Outdoor, Fun & Sports")
        );
        assert_eq!(collection_for("Garden"), None);
        assert_eq!(display_name_for("Garden"), None);
    }

    #[test]
    fn resolve_accepts_either_form() {
        assert_eq!(
            resolve("Kids_n_Babies").map(|e| e.display_name),
            Some("Kids & Babies")
        );
        assert_eq!(resolve("Toys").map(|e| e.collection_id), Some("Toys"));
        assert_eq!(default_category().display_name, "Appliances");
    }
}

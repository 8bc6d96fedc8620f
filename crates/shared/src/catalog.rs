//! Static option lists offered by the registration form, and the label
//! lookups the intake uses when rendering notification emails.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub label: &'static str,
}

pub const EXPERIENCE_LEVELS: &[CatalogEntry] = &[
    CatalogEntry {
        code: "none",
        label: "No prior experience",
    },
    CatalogEntry {
        code: "1-2",
        label: "1-2 conferences",
    },
    CatalogEntry {
        code: "3-5",
        label: "3-5 conferences",
    },
    CatalogEntry {
        code: "5+",
        label: "5+ conferences",
    },
];

pub const COMMITTEES: &[CatalogEntry] = &[
    CatalogEntry {
        code: "unep",
        label: "UN Environment Programme (UNEP)",
    },
    CatalogEntry {
        code: "unfpa",
        label: "UN Population Fund (UNFPA)",
    },
];

pub fn find<'a>(catalog: &'a [CatalogEntry], code: &str) -> Option<&'a CatalogEntry> {
    catalog.iter().find(|entry| entry.code == code)
}

pub fn contains(catalog: &[CatalogEntry], code: &str) -> bool {
    find(catalog, code).is_some()
}

/// Label for `code`, or `code` itself when the catalog has no entry.
pub fn label_or_code<'a>(catalog: &[CatalogEntry], code: &'a str) -> &'a str {
    match find(catalog, code) {
        Some(entry) => entry.label,
        None => code,
    }
}

pub fn experience_label(code: &str) -> &str {
    label_or_code(EXPERIENCE_LEVELS, code)
}

pub fn committee_label(code: &str) -> &str {
    label_or_code(COMMITTEES, code)
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;

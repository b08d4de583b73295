//! Built-in document catalog.
//!
//! The fixed set of product documents a packet can include. Entries
//! carry their static-asset locator; the catalog endpoint serves them
//! to the client, and `to_document_ref` normalizes an entry into the
//! canonical [`DocumentRef`] shape the engine consumes.

use serde::Serialize;

use crate::model::DocumentRef;

/// One catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub file_size: &'static str,
    pub file_size_bytes: u64,
    pub storage_path: &'static str,
    pub category: &'static str,
}

impl CatalogEntry {
    pub fn to_document_ref(&self) -> DocumentRef {
        DocumentRef {
            id: self.id.to_string(),
            name: self.name.to_string(),
            storage_path: Some(self.storage_path.to_string()),
            category: Some(self.category.to_string()),
        }
    }
}

/// The fixed product-document catalog, in display order.
pub const AVAILABLE_DOCUMENTS: &[CatalogEntry] = &[
    CatalogEntry {
        id: "tds-maxterra",
        name: "TDS - MAXTERRA\u{AE} MgO Non-Combustible Board",
        description: "Technical data sheet with product specifications and performance characteristics",
        file_size: "2 MB",
        file_size_bytes: 2_097_152,
        storage_path: "/documents/TDS-MAXTERRA-MgO.pdf",
        category: "Technical Data Sheet",
    },
    CatalogEntry {
        id: "esr-5194",
        name: "ESR-5194 - MAXTERRA\u{AE} MgO",
        description: "Evaluation service report for building code compliance",
        file_size: "645 KB",
        file_size_bytes: 660_480,
        storage_path: "/documents/ESR-5194-MAXTERRA-MgO.pdf",
        category: "Evaluation Report",
    },
    CatalogEntry {
        id: "msds-maxterra",
        name: "MSDS - MAXTERRA\u{2122} MgO",
        description: "Material safety data sheet with health and safety information",
        file_size: "293 KB",
        file_size_bytes: 300_032,
        storage_path: "/documents/MSDS-MAXTERRA-MgO.pdf",
        category: "Safety Data Sheet",
    },
    CatalogEntry {
        id: "leed-credit-guide",
        name: "LEED Credit Guide",
        description: "Environmental credit guide for LEED certification",
        file_size: "510 KB",
        file_size_bytes: 522_240,
        storage_path: "/documents/LEED-Credit-Guide-7-16-25.pdf",
        category: "LEED Guide",
    },
    CatalogEntry {
        id: "installation-guide",
        name: "Installation Guide - MAXTERRA",
        description: "Comprehensive product installation guide with step-by-step instructions",
        file_size: "3 MB",
        file_size_bytes: 3_145_728,
        storage_path: "/documents/Installation-Guide-MAXTERRA.pdf",
        category: "Installation Guide",
    },
    CatalogEntry {
        id: "limited-warranty",
        name: "Limited Warranty",
        description: "Product warranty terms and conditions",
        file_size: "120 KB",
        file_size_bytes: 122_880,
        storage_path: "/documents/Limited-Warranty-8-31-2023.pdf",
        category: "Warranty",
    },
    CatalogEntry {
        id: "esl-1645",
        name: "ESL-1645 Certified Floor/Ceiling",
        description: "Certification report for floor and ceiling assemblies",
        file_size: "522 KB",
        file_size_bytes: 534_528,
        storage_path: "/documents/ESL-1645-Certified-FloorCeiling.pdf",
        category: "Certification",
    },
];

/// Product sizes offered on the submittal form.
pub const PRODUCT_SIZES: &[&str] = &["1/2 in (12mm)", "5/8 in (16mm)", "Custom"];

/// Look up a catalog entry by its id.
pub fn find_document(id: &str) -> Option<&'static CatalogEntry> {
    AVAILABLE_DOCUMENTS.iter().find(|entry| entry.id == id)
}

/// Fill locator-less refs from the catalog at the request boundary.
///
/// A client may send just `{ id, name }` for a catalog document; the
/// ref is replaced by the canonical catalog shape. Unknown ids and
/// refs that already carry a locator are left alone.
pub fn normalize_document_refs(documents: &mut [DocumentRef]) {
    for document in documents {
        if document.storage_path.is_none() {
            if let Some(entry) = find_document(&document.id) {
                *document = entry.to_document_ref();
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries_are_static_assets() {
        for entry in AVAILABLE_DOCUMENTS {
            assert!(
                crate::resolver::is_static_asset(entry.storage_path),
                "{} should be a static asset",
                entry.id
            );
        }
    }

    #[test]
    fn lookup_by_id() {
        let entry = find_document("limited-warranty").unwrap();
        assert_eq!(entry.category, "Warranty");
        assert!(find_document("nope").is_none());
    }

    #[test]
    fn bare_catalog_ids_are_filled_from_the_catalog() {
        let mut documents = vec![
            DocumentRef {
                id: "tds-maxterra".to_string(),
                name: "TDS".to_string(),
                storage_path: None,
                category: None,
            },
            DocumentRef {
                id: "not-in-catalog".to_string(),
                name: "Custom Upload".to_string(),
                storage_path: Some("uploads/custom.pdf".to_string()),
                category: None,
            },
        ];

        normalize_document_refs(&mut documents);

        assert_eq!(
            documents[0].storage_path.as_deref(),
            Some("/documents/TDS-MAXTERRA-MgO.pdf")
        );
        assert_eq!(documents[0].category_label(), "Technical Data Sheet");
        // Refs with their own locator pass through untouched
        assert_eq!(
            documents[1].storage_path.as_deref(),
            Some("uploads/custom.pdf")
        );
        assert_eq!(documents[1].category_label(), "Document");
    }

    #[test]
    fn normalization_produces_canonical_ref() {
        let doc = find_document("tds-maxterra").unwrap().to_document_ref();
        assert_eq!(doc.category_label(), "Technical Data Sheet");
        assert_eq!(
            doc.storage_path.as_deref(),
            Some("/documents/TDS-MAXTERRA-MgO.pdf")
        );
    }
}

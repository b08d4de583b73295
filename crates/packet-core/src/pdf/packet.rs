//! In-memory packet accumulation and finalization.
//!
//! One [`MergedPacket`] is owned by exactly one build. Pages are
//! appended in call order: synthesized pages bring their own content
//! stream and share the build's font resources; source pages are
//! spliced in by renumbering the source document's objects into the
//! output object space and keeping everything but its structural nodes.
//! `finalize` assembles the page tree, catalog, and Info dictionary and
//! yields the serializable document.

use chrono::{DateTime, Utc};
use lopdf::{Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};

use super::canvas::{PAGE_HEIGHT, PAGE_WIDTH, PageCanvas};
use super::font::FontResources;

/// Document-level metadata stamped into the Info dictionary.
#[derive(Debug, Clone)]
pub struct PacketMeta {
    pub title: String,
    pub author: String,
    pub created: DateTime<Utc>,
}

/// Build-scoped accumulating page sequence.
pub struct MergedPacket {
    doc: Document,
    /// Output page order; positions are final once appended.
    page_ids: Vec<ObjectId>,
    fonts: FontResources,
    meta: PacketMeta,
}

impl MergedPacket {
    /// Create an empty packet and embed the synthesis fonts once.
    pub fn new(meta: PacketMeta) -> Self {
        let mut doc = Document::with_version("1.5");
        let fonts = FontResources::embed(&mut doc);
        Self {
            doc,
            page_ids: Vec::new(),
            fonts,
            meta,
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append one synthesized page.
    pub fn push_synthesized(&mut self, canvas: PageCanvas) {
        let content_id = self
            .doc
            .add_object(Object::Stream(Stream::new(lopdf::Dictionary::new(), canvas.into_content())));

        let page_id = self.doc.add_object(lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Contents", Object::Reference(content_id)),
            ("Resources", self.fonts.resources_ref()),
            (
                "MediaBox",
                Object::Array(vec![
                    0.into(),
                    0.into(),
                    Object::Real(PAGE_WIDTH),
                    Object::Real(PAGE_HEIGHT),
                ]),
            ),
        ]));

        self.page_ids.push(page_id);
    }

    /// Parse a source PDF and append every page in its original order.
    ///
    /// Returns the number of pages appended. A parse failure leaves the
    /// packet exactly as it was; `name` travels with the error for the
    /// merge loop's skip log.
    pub fn append_source(&mut self, name: &str, bytes: &[u8]) -> Result<usize> {
        let mut source = Document::load_mem(bytes).map_err(|e| Error::Parse {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        source.renumber_objects_with(self.doc.max_id + 1);
        self.doc.max_id = source.max_id;

        let source_pages = source.get_pages();
        if source_pages.is_empty() {
            return Err(Error::Parse {
                name: name.to_string(),
                reason: "document has no pages".to_string(),
            });
        }

        flatten_inherited_attributes(&mut source, source_pages.values().copied());

        // Carry over every object except the source's own structure;
        // pages get re-parented into the output tree at finalize.
        for (object_id, object) in source.objects {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Outlines" | b"Outline" => {}
                _ => {
                    self.doc.objects.insert(object_id, object);
                }
            }
        }

        let appended = source_pages.len();
        self.page_ids.extend(source_pages.into_values());
        Ok(appended)
    }

    /// Assemble the page tree, catalog, and metadata.
    pub fn finalize(mut self) -> Result<FinalizedPacket> {
        let pages_id = self.doc.new_object_id();

        for &page_id in &self.page_ids {
            let page = self.doc.get_object_mut(page_id).map_err(|e| {
                Error::Lopdf(format!("Failed to get page object: {e}"))
            })?;
            if let Object::Dictionary(dict) = page {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let page_count = self.page_ids.len();
        let pages_dict = lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(i64::try_from(page_count).unwrap_or(0))),
        ]);
        self.doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.new_object_id();
        let catalog_dict = lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        self.doc.objects.insert(catalog_id, Object::Dictionary(catalog_dict));

        let info_dict = lopdf::Dictionary::from_iter([
            ("Title", Object::string_literal(self.meta.title.as_str())),
            ("Author", Object::string_literal(self.meta.author.as_str())),
            (
                "CreationDate",
                Object::string_literal(self.meta.created.format("D:%Y%m%d%H%M%SZ").to_string()),
            ),
        ]);
        let info_id = self.doc.add_object(Object::Dictionary(info_dict));

        self.doc.trailer.set("Root", Object::Reference(catalog_id));
        self.doc.trailer.set("Info", Object::Reference(info_id));

        let new_max_id = u32::try_from(self.doc.objects.len()).unwrap_or(u32::MAX);
        self.doc.max_id = new_max_id;
        self.doc.renumber_objects();
        self.doc.compress();

        Ok(FinalizedPacket {
            doc: self.doc,
            page_count,
        })
    }
}

/// Page attributes a PDF may store on the page tree instead of the
/// page itself (PDF 32000-1 7.7.3.4).
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Pin inheritable attributes onto each page dictionary.
///
/// The splice discards the source's page tree, so anything a page
/// inherits from it would otherwise be lost and the page would render
/// blank in the packet.
fn flatten_inherited_attributes(
    source: &mut Document,
    page_ids: impl Iterator<Item = ObjectId>,
) {
    let mut pinned = Vec::new();
    for page_id in page_ids {
        let Ok(page) = source.get_object(page_id).and_then(Object::as_dict) else {
            continue;
        };
        for key in INHERITABLE_PAGE_KEYS {
            if !page.has(key) {
                if let Some(value) = inherited_page_value(source, page, key) {
                    pinned.push((page_id, key, value));
                }
            }
        }
    }

    for (page_id, key, value) in pinned {
        if let Ok(Object::Dictionary(page)) = source.get_object_mut(page_id) {
            page.set(key, value);
        }
    }
}

/// Walk the Parent chain looking for an inheritable attribute.
fn inherited_page_value(source: &Document, page: &lopdf::Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent_id = page.get(b"Parent").ok()?.as_reference().ok()?;
    loop {
        let node = source.get_object(parent_id).ok()?.as_dict().ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent_id = node.get(b"Parent").ok()?.as_reference().ok()?;
    }
}

impl std::fmt::Debug for MergedPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergedPacket")
            .field("page_count", &self.page_ids.len())
            .field("title", &self.meta.title)
            .finish()
    }
}

/// A finalized packet, ready for serialization.
pub struct FinalizedPacket {
    doc: Document,
    page_count: usize,
}

impl FinalizedPacket {
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// Serialize to bytes. One packet is serialized exactly once per
    /// build; a failure here is fatal.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| Error::PdfSave(format!("Failed to save packet: {e}")))?;
        Ok(output)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};

    fn test_meta() -> PacketMeta {
        PacketMeta {
            title: "MAXTERRA Submittal - Test".to_string(),
            author: "Tester".to_string(),
            created: Utc::now(),
        }
    }

    /// Build a minimal n-page PDF for splice tests.
    pub(crate) fn source_pdf(page_texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let page_tree_id = doc.new_object_id();

        let font_id = doc.add_object(lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]));

        let resources_id = doc.add_object(lopdf::Dictionary::from_iter([(
            "Font",
            Object::Dictionary(lopdf::Dictionary::from_iter([(
                "F1",
                Object::Reference(font_id),
            )])),
        )]));

        let mut kids = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_bytes = content.encode().unwrap_or_default();
            let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content_bytes));

            let page_id = doc.add_object(lopdf::Dictionary::from_iter([
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(page_tree_id)),
                ("Contents", Object::Reference(content_id)),
                ("Resources", Object::Reference(resources_id)),
                (
                    "MediaBox",
                    Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
                ),
            ]));
            kids.push(Object::Reference(page_id));
        }

        let page_tree = lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(i64::try_from(kids.len()).unwrap())),
            ("Kids", Object::Array(kids)),
        ]);
        doc.objects.insert(page_tree_id, Object::Dictionary(page_tree));

        let catalog_id = doc.add_object(lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(page_tree_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut output = Vec::new();
        doc.save_to(&mut output).unwrap();
        output
    }

    /// Build a PDF whose pages inherit Resources and MediaBox from the
    /// page tree instead of carrying their own.
    fn source_pdf_with_tree_attributes(page_count: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let page_tree_id = doc.new_object_id();

        let font_id = doc.add_object(lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]));

        let mut kids = Vec::new();
        for index in 0..page_count {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::string_literal(format!("Page {index}"))],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_bytes = content.encode().unwrap_or_default();
            let content_id =
                doc.add_object(Stream::new(lopdf::Dictionary::new(), content_bytes));

            let page_id = doc.add_object(lopdf::Dictionary::from_iter([
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(page_tree_id)),
                ("Contents", Object::Reference(content_id)),
            ]));
            kids.push(Object::Reference(page_id));
        }

        let page_tree = lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(i64::try_from(kids.len()).unwrap())),
            ("Kids", Object::Array(kids)),
            (
                "Resources",
                Object::Dictionary(lopdf::Dictionary::from_iter([(
                    "Font",
                    Object::Dictionary(lopdf::Dictionary::from_iter([(
                        "F1",
                        Object::Reference(font_id),
                    )])),
                )])),
            ),
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
            ),
        ]);
        doc.objects.insert(page_tree_id, Object::Dictionary(page_tree));

        let catalog_id = doc.add_object(lopdf::Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(page_tree_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut output = Vec::new();
        doc.save_to(&mut output).unwrap();
        output
    }

    #[test]
    fn synthesized_pages_accumulate_in_order() {
        let mut packet = MergedPacket::new(test_meta());
        packet.push_synthesized(PageCanvas::new());
        packet.push_synthesized(PageCanvas::new());
        assert_eq!(packet.page_count(), 2);
    }

    #[test]
    fn append_source_splices_all_pages() {
        let mut packet = MergedPacket::new(test_meta());
        packet.push_synthesized(PageCanvas::new());
        let appended = packet
            .append_source("fixture", &source_pdf(&["One", "Two", "Three"]))
            .unwrap();
        assert_eq!(appended, 3);
        assert_eq!(packet.page_count(), 4);
    }

    #[test]
    fn append_source_rejects_garbage_bytes() {
        let mut packet = MergedPacket::new(test_meta());
        packet.push_synthesized(PageCanvas::new());
        let err = packet.append_source("bad", b"not a pdf").unwrap_err();
        assert!(err.is_per_document());
        assert_eq!(err.document_name(), Some("bad"));
        // Failure must leave the packet untouched
        assert_eq!(packet.page_count(), 1);
    }

    #[test]
    fn inherited_page_attributes_survive_the_splice() {
        let mut packet = MergedPacket::new(test_meta());
        packet
            .append_source("inherits", &source_pdf_with_tree_attributes(2))
            .unwrap();

        let bytes = packet.finalize().unwrap().to_bytes().unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        let pages = reloaded.get_pages();
        assert_eq!(pages.len(), 2);

        for page_id in pages.into_values() {
            let page = reloaded.get_object(page_id).unwrap().as_dict().unwrap();
            assert!(page.has(b"Resources"), "inherited Resources lost");
            assert!(page.has(b"MediaBox"), "inherited MediaBox lost");
        }
    }

    #[test]
    fn finalized_packet_round_trips_through_lopdf() {
        let mut packet = MergedPacket::new(test_meta());
        packet.push_synthesized(PageCanvas::new());
        packet.append_source("fixture", &source_pdf(&["A", "B"])).unwrap();

        let mut finalized = packet.finalize().unwrap();
        assert_eq!(finalized.page_count(), 3);

        let bytes = finalized.to_bytes().unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 3);
    }

    #[test]
    fn metadata_lands_in_info_dictionary() {
        let mut packet = MergedPacket::new(test_meta());
        packet.push_synthesized(PageCanvas::new());
        let bytes = packet.finalize().unwrap().to_bytes().unwrap();

        let reloaded = Document::load_mem(&bytes).unwrap();
        let info_ref = reloaded.trailer.get(b"Info").unwrap();
        let Object::Reference(info_id) = info_ref else {
            panic!("Info should be a reference");
        };
        let Object::Dictionary(info) = reloaded.get_object(*info_id).unwrap() else {
            panic!("Info should be a dictionary");
        };
        let Object::String(title, _) = info.get(b"Title").unwrap() else {
            panic!("Title should be a string");
        };
        assert_eq!(title.as_slice(), b"MAXTERRA Submittal - Test");
    }
}

//! Assembling output documents.
//!
//! [`DocumentWriter`] starts from an empty document and receives pages either
//! copied out of decoded sources or built from images. Copying is a deep copy:
//! every object a page reaches is duplicated under a fresh id, so pages from
//! any number of sources can share one output without id collisions.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions,
    Stream, StringFormat, dictionary,
};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::config::{CompressionLevel, WriteOptions};
use crate::error::{PdfSmithError, Result};
use crate::io::reader::{DEFAULT_MEDIA_BOX, SourceDocument, inherited_attribute};
use crate::ops::images::NormalizedImage;
use crate::request::Credential;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// PDF version written into new documents.
const OUTPUT_VERSION: &str = "1.5";

/// Builds one output document.
#[derive(Debug)]
pub struct DocumentWriter {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    hasher: Sha256,
}

impl DocumentWriter {
    /// Start an empty document.
    pub fn new() -> Self {
        let mut document = Document::with_version(OUTPUT_VERSION);
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
            hasher: Sha256::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Copy the 1-based `pages` of `source`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::PageOutOfRange`] for a page the source does
    /// not have and [`PdfSmithError::CorruptedPdf`] if a page object is not a
    /// dictionary.
    #[instrument(skip_all, fields(source = source.name(), pages = pages.len()))]
    pub fn append_pages(&mut self, source: &SourceDocument, pages: &[u32]) -> Result<()> {
        let page_ids = pages
            .iter()
            .map(|&number| source.page_id(number))
            .collect::<Result<Vec<_>>>()?;

        // Ids are assigned up front so links between selected pages survive.
        let mut ids: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
        for &old_id in &page_ids {
            ids.entry(old_id)
                .or_insert_with(|| self.document.new_object_id());
        }

        let doc = source.document();
        for &old_id in &page_ids {
            let page = doc
                .get_dictionary(old_id)
                .map_err(|e| PdfSmithError::corrupted_pdf(source.name(), e.to_string()))?;

            let mut page = page.clone();
            for key in INHERITABLE {
                if !page.has(key)
                    && let Some(value) = inherited_attribute(doc, &page, key)
                {
                    let value = value.clone();
                    page.set(key.to_vec(), value);
                }
            }
            page.remove(b"Parent");

            let mut copied = self.copy_dictionary(doc, &page, &mut ids);
            copied.set("Parent", self.pages_id);
            if !copied.has(b"MediaBox") {
                copied.set("MediaBox", media_box(DEFAULT_MEDIA_BOX));
            }

            let new_id = ids[&old_id];
            self.document.objects.insert(new_id, Object::Dictionary(copied));
            self.kids.push(new_id);
        }

        self.hasher.update(source.fingerprint());
        self.hasher.update((pages.len() as u64).to_be_bytes());
        for &number in pages {
            self.hasher.update(number.to_be_bytes());
        }

        debug!(
            copied_objects = ids.len(),
            total_pages = self.kids.len(),
            "Pages appended"
        );
        Ok(())
    }

    /// Add one page showing `image` at its native size.
    pub fn append_image(&mut self, image: &NormalizedImage) -> Result<()> {
        let (width, height) = image.page_size();

        let image_id = self.document.add_object(image.to_xobject());

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.into(),
                        0.into(),
                        height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content = content
            .encode()
            .map_err(|e| PdfSmithError::build_failed(format!("Failed to encode page content: {e}")))?;
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), content));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box([0.0, 0.0, width, height]),
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        self.kids.push(page_id);

        self.hasher.update(image.fingerprint());
        Ok(())
    }

    /// Finish the page tree and serialize.
    ///
    /// With a credential the output is locked with the standard security
    /// handler (RC4, 128-bit key); the credential is both the user and the
    /// owner password.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSmithError::BuildFailed`] if no page was appended or
    /// serialization fails, and [`PdfSmithError::EncryptionFailed`] if the
    /// document cannot be locked.
    #[instrument(skip_all, fields(pages = self.kids.len(), compression = ?options.compression, locked = credential.is_some()))]
    pub fn finish(mut self, options: &WriteOptions, credential: Option<&Credential>) -> Result<Vec<u8>> {
        if self.kids.is_empty() {
            return Err(PdfSmithError::build_failed("Output document has no pages"));
        }

        let count = self.kids.len() as i64;
        let kids: Vec<Object> = self.kids.iter().copied().map(Object::Reference).collect();
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        match options.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => {
                self.document.compress();
            }
            CompressionLevel::Maximum => {
                self.document.prune_objects();
                self.document.compress();
            }
        }

        self.document.renumber_objects();

        // Identical inputs always produce the same identifier.
        let file_id = self.hasher.finalize()[..16].to_vec();
        self.document.trailer.set(
            "ID",
            Object::Array(vec![
                Object::String(file_id.clone(), StringFormat::Hexadecimal),
                Object::String(file_id, StringFormat::Hexadecimal),
            ]),
        );

        if let Some(credential) = credential {
            lock(&mut self.document, credential)?;
        }

        let mut bytes = Vec::new();
        self.document
            .save_to(&mut bytes)
            .map_err(|e| PdfSmithError::build_failed(format!("Failed to serialize document: {e}")))?;

        debug!(bytes = bytes.len(), "Document serialized");
        Ok(bytes)
    }

    /// Copy `object` from `source`, remapping every reference it contains.
    fn copy_object(
        &mut self,
        source: &Document,
        object: &Object,
        ids: &mut BTreeMap<ObjectId, ObjectId>,
    ) -> Object {
        match object {
            Object::Reference(id) => self
                .copy_reference(source, *id, ids)
                .map_or(Object::Null, Object::Reference),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(source, dict, ids)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(source, item, ids))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let mut copied = stream.clone();
                copied.dict = self.copy_dictionary(source, &stream.dict, ids);
                Object::Stream(copied)
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(
        &mut self,
        source: &Document,
        dict: &Dictionary,
        ids: &mut BTreeMap<ObjectId, ObjectId>,
    ) -> Dictionary {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            let value = self.copy_object(source, value, ids);
            copied.set(key.clone(), value);
        }
        copied
    }

    /// New id for the source object `id`, copying it on first sight.
    ///
    /// Pages and page-tree nodes that were not selected are not copied, and
    /// neither are dangling references; both resolve to `None`.
    fn copy_reference(
        &mut self,
        source: &Document,
        id: ObjectId,
        ids: &mut BTreeMap<ObjectId, ObjectId>,
    ) -> Option<ObjectId> {
        if let Some(&new_id) = ids.get(&id) {
            return Some(new_id);
        }

        let target = source.get_object(id).ok()?;
        if is_page_node(target) {
            return None;
        }

        let new_id = self.document.new_object_id();
        ids.insert(id, new_id);
        let copied = self.copy_object(source, target, ids);
        self.document.objects.insert(new_id, copied);
        Some(new_id)
    }
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(document: &mut Document, credential: &Credential) -> Result<()> {
    let version = EncryptionVersion::V2 {
        document: &*document,
        owner_password: credential.expose(),
        user_password: credential.expose(),
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).map_err(|e| PdfSmithError::EncryptionFailed {
        reason: e.to_string(),
    })?;

    document
        .encrypt(&state)
        .map_err(|e| PdfSmithError::EncryptionFailed {
            reason: e.to_string(),
        })
}

fn is_page_node(object: &Object) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .is_ok_and(|name| name == b"Page" || name == b"Pages")
}

fn media_box(rect: [f32; 4]) -> Object {
    Object::Array(rect.into_iter().map(Object::Real).collect())
}

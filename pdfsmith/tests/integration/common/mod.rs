//! Fixtures shared by the integration tests.
//!
//! PDFs are generated in memory with labelled pages so page identity can be
//! checked after a transformation without any files on disk.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::content::Content;
use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions, Stream,
    StringFormat, dictionary,
};
use pdfsmith::request::InputFile;

fn label_stream(doc: &mut Document, label: &str) -> ObjectId {
    let content = format!("BT /F1 24 Tf 72 720 Td ({label}) Tj ET");
    doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()))
}

fn finish(mut doc: Document, root_pages: ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => root_pages,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A PDF with `pages` pages; page `n` shows `"{prefix}-{n}"`.
pub fn labelled_pdf(prefix: &str, pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let content_id = label_stream(&mut doc, &format!("{prefix}-{n}"));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => i64::from(pages),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }
        .into(),
    );
    finish(doc, pages_id)
}

/// A three-page PDF with a two-level page tree.
///
/// Pages 1 and 2 sit under an intermediate node that sets `Rotate 90`; the
/// root node carries a 300x400 MediaBox. Page 3 is a direct child of the root
/// and overrides the MediaBox with 100x100.
pub fn nested_pdf(prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let root_id = doc.new_object_id();
    let middle_id = doc.new_object_id();

    let page = |doc: &mut Document, n: u32, parent: ObjectId, own: Dictionary| {
        let content_id = label_stream(doc, &format!("{prefix}-{n}"));
        let mut dict = dictionary! {
            "Type" => "Page",
            "Parent" => parent,
            "Contents" => content_id,
        };
        for (key, value) in own.iter() {
            dict.set(key.clone(), value.clone());
        }
        doc.add_object(dict)
    };

    let p1 = page(&mut doc, 1, middle_id, Dictionary::new());
    let p2 = page(&mut doc, 2, middle_id, Dictionary::new());
    let p3 = page(
        &mut doc,
        3,
        root_id,
        dictionary! { "MediaBox" => vec![0.into(), 0.into(), 100.into(), 100.into()] },
    );

    doc.objects.insert(
        middle_id,
        dictionary! {
            "Type" => "Pages",
            "Parent" => root_id,
            "Kids" => vec![p1.into(), p2.into()],
            "Count" => 2,
            "Rotate" => 90,
        }
        .into(),
    );
    doc.objects.insert(
        root_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => vec![middle_id.into(), p3.into()],
            "Count" => 3,
            "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
        }
        .into(),
    );
    finish(doc, root_id)
}

/// A labelled PDF that opens without a password but carries an owner
/// password.
pub fn owner_locked_pdf(prefix: &str, pages: u32) -> Vec<u8> {
    let mut doc = Document::load_mem(&labelled_pdf(prefix, pages)).unwrap();
    let file_id = Object::String(b"fedcba9876543210".to_vec(), StringFormat::Hexadecimal);
    doc.trailer.set("ID", Object::Array(vec![file_id.clone(), file_id]));

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password: "",
        key_length: 128,
        permissions: Permissions::all(),
    })
    .unwrap();
    doc.encrypt(&state).unwrap();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Open a password-protected PDF with `password`.
///
/// `Document::load_mem` keeps no objects of a file it cannot decrypt, so the
/// trailer's `/Encrypt` key is renamed while loading and restored before
/// decrypting.
pub fn open_locked(bytes: &[u8], password: &str) -> lopdf::Result<Document> {
    let mut hidden = bytes.to_vec();
    let at = hidden
        .windows(8)
        .rposition(|window| window == b"/Encrypt")
        .expect("document has no /Encrypt entry");
    hidden[at + 7] = b'_';

    let mut doc = Document::load_mem(&hidden)?;
    let encrypt = doc.trailer.remove(b"Encryp_").expect("trailer lost /Encrypt");
    doc.trailer.set("Encrypt", encrypt);
    doc.decrypt(password)?;
    Ok(doc)
}

/// A labelled PDF wrapped as an upload.
pub fn pdf_input(name: &str, prefix: &str, pages: u32) -> InputFile {
    InputFile::new(name, labelled_pdf(prefix, pages))
}

/// The label shown on each page of `doc`, in page order.
pub fn page_labels(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            Content::decode(&content)
                .unwrap()
                .operations
                .into_iter()
                .find(|op| op.operator == "Tj")
                .and_then(|op| match op.operands.first() {
                    Some(Object::String(text, _)) => {
                        Some(String::from_utf8_lossy(text).into_owned())
                    }
                    _ => None,
                })
                .unwrap_or_default()
        })
        .collect()
}

/// Decode `bytes` and return its page labels.
pub fn labels_of(bytes: &[u8]) -> Vec<String> {
    page_labels(&Document::load_mem(bytes).unwrap())
}

/// Page dictionaries of `bytes`, in page order.
pub fn pages_of(bytes: &[u8]) -> (Document, Vec<ObjectId>) {
    let doc = Document::load_mem(bytes).unwrap();
    let ids = doc.get_pages().into_values().collect();
    (doc, ids)
}

/// Width and height of every page's own MediaBox.
pub fn page_sizes(bytes: &[u8]) -> Vec<(f32, f32)> {
    let (doc, ids) = pages_of(bytes);
    ids.into_iter()
        .map(|id| {
            let page = doc.get_dictionary(id).unwrap();
            let values = page.get(b"MediaBox").unwrap().as_array().unwrap();
            let numbers: Vec<f32> = values.iter().map(|v| v.as_float().unwrap()).collect();
            (numbers[2] - numbers[0], numbers[3] - numbers[1])
        })
        .collect()
}

/// Image XObjects anywhere in `doc`.
pub fn image_streams(doc: &Document) -> Vec<&Stream> {
    doc.objects
        .values()
        .filter_map(|object| match object {
            Object::Stream(stream)
                if stream
                    .dict
                    .get(b"Subtype")
                    .and_then(Object::as_name)
                    .is_ok_and(|name| name == b"Image".as_slice()) =>
            {
                Some(stream)
            }
            _ => None,
        })
        .collect()
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).unwrap();
    bytes.into_inner()
}

/// A single-colour RGBA PNG.
pub fn png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color)),
        ImageFormat::Png,
    )
}

/// A single-colour RGB JPEG.
pub fn jpeg(width: u32, height: u32, color: Rgb<u8>) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, color)),
        ImageFormat::Jpeg,
    )
}

/// Write `bytes` to `dir/name`.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Byte-level substring search.
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

//! Helpers for building small PDFs in unit tests.
//!
//! Every page gets a MediaBox whose width is the number passed in, so a test
//! can tell pages apart after a merge by reading the widths back.

use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream, StringFormat,
    dictionary,
};
use std::path::Path;

/// Build an in-memory document with one page per entry in `widths`.
pub(crate) fn build_test_document(widths: &[i64]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(widths.len());
    for &width in widths {
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"q Q".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(842),
            ],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => widths.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Write a test document to `path`.
pub(crate) fn write_test_pdf(path: &Path, widths: &[i64]) -> lopdf::Result<()> {
    let mut doc = build_test_document(widths);
    doc.save(path)?;
    Ok(())
}

/// Write a test document that can only be opened with `user_password`.
pub(crate) fn write_encrypted_test_pdf(
    path: &Path,
    widths: &[i64],
    user_password: &str,
) -> lopdf::Result<()> {
    let mut doc = build_test_document(widths);
    let file_id = Object::String(b"pdfmerge-test-id".to_vec(), StringFormat::Literal);
    doc.trailer.set("ID", vec![file_id.clone(), file_id]);

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).expect("encryption state");
    doc.encrypt(&state).expect("encrypt test document");
    doc.save(path)?;
    Ok(())
}

/// MediaBox widths of every page, in page order.
pub(crate) fn page_widths(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc
                .get_object(page_id)
                .and_then(Object::as_dict)
                .expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("page has its own MediaBox");
            match &media_box[2] {
                Object::Integer(width) => *width,
                Object::Real(width) => *width as i64,
                other => panic!("unexpected MediaBox entry: {other:?}"),
            }
        })
        .collect()
}

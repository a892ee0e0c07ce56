//! Shared helpers for the integration tests.
//!
//! Test PDFs are generated on the fly. Each page's MediaBox width is chosen by
//! the test, so the page order of a merged file can be read back as a list of
//! widths.

use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream, StringFormat,
    dictionary,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a PDF with one page per entry in `widths`.
pub fn write_pdf(path: &Path, widths: &[i64]) {
    let mut doc = build_pdf(widths);
    doc.save(path).expect("Failed to write test PDF");
}

/// Write a PDF that only opens with `user_password`.
pub fn write_encrypted_pdf(path: &Path, widths: &[i64], user_password: &str) {
    let mut doc = build_pdf(widths);
    let file_id = Object::String(b"pdfmerge-integration".to_vec(), StringFormat::Literal);
    doc.trailer.set("ID", vec![file_id.clone(), file_id]);

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .expect("Failed to set up encryption");
    doc.encrypt(&state).expect("Failed to encrypt test PDF");
    doc.save(path).expect("Failed to write encrypted test PDF");
}

fn build_pdf(widths: &[i64]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = widths
        .iter()
        .map(|&width| {
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
            Object::Reference(page_id)
        })
        .collect();

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

/// Create `name` inside `dir` with the given page widths and return its path.
pub fn pdf_in(dir: &TempDir, name: &str, widths: &[i64]) -> PathBuf {
    let path = dir.path().join(name);
    write_pdf(&path, widths);
    path
}

/// MediaBox widths of every page of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load merged PDF");
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc
                .get_object(id)
                .and_then(Object::as_dict)
                .expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("MediaBox");
            match &media_box[2] {
                Object::Integer(width) => *width,
                other => panic!("unexpected MediaBox width: {other:?}"),
            }
        })
        .collect()
}

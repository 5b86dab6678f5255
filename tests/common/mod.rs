// Helpers for building small PDFs on disk
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// A document with `pages` Letter-sized pages, each showing "Page N"
pub fn build_pdf(pages: u32) -> (Document, Vec<ObjectId>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();
    for number in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", number))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    (doc, page_ids)
}

/// Attach a flat outline with one entry per `(title, page index)`
pub fn add_outline(
    doc: &mut Document,
    page_ids: &[ObjectId],
    entries: &[(&str, usize)],
) -> Vec<ObjectId> {
    let items = entries
        .iter()
        .map(|(title, page)| {
            dictionary! {
                "Title" => Object::string_literal(*title),
                "Dest" => fit_dest(page_ids[*page]),
            }
        })
        .collect();
    add_outline_items(doc, items)
}

/// Link `items` as top-level siblings under a new /Outlines dictionary
pub fn add_outline_items(doc: &mut Document, items: Vec<Dictionary>) -> Vec<ObjectId> {
    let outlines_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();

    for (i, mut item) in items.into_iter().enumerate() {
        item.set("Parent", outlines_id);
        if i > 0 {
            item.set("Prev", item_ids[i - 1]);
        }
        if i + 1 < item_ids.len() {
            item.set("Next", item_ids[i + 1]);
        }
        doc.objects.insert(item_ids[i], Object::Dictionary(item));
    }

    let mut outlines = dictionary! {
        "Type" => "Outlines",
        "Count" => item_ids.len() as i64,
    };
    if let (Some(first), Some(last)) = (item_ids.first(), item_ids.last()) {
        outlines.set("First", *first);
        outlines.set("Last", *last);
    }
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));
    catalog_mut(doc).set("Outlines", outlines_id);

    item_ids
}

/// `[page /Fit]` destination array
pub fn fit_dest(page: ObjectId) -> Object {
    Object::Array(vec![Object::Reference(page), "Fit".into()])
}

pub fn catalog_mut(doc: &mut Document) -> &mut Dictionary {
    let root = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    doc.get_dictionary_mut(root).unwrap()
}

/// Save a plain `pages`-page PDF as `dir/name`
pub fn write_pdf(dir: &Path, name: &str, pages: u32) -> PathBuf {
    let (mut doc, _) = build_pdf(pages);
    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

use std::collections::{HashMap, HashSet};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::document::{decode_pdf_string, PdfDocument};

/// Deeper nesting than this is treated as a malformed outline
const MAX_DEPTH: u32 = 64;

/// One entry of the document outline (the PDF "bookmarks" tree)
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode {
    pub title: String,
    /// 1-indexed target page, when the destination resolves to a page
    pub page: Option<u32>,
    /// 1 for top-level entries
    pub level: u32,
    pub children: Vec<OutlineNode>,
}

/// A row of the flattened outline, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRow {
    pub level: u32,
    pub title: String,
    pub page: Option<u32>,
}

impl OutlineRow {
    /// 0-based index of the target page, as used for navigation
    pub fn page_index(&self) -> Option<usize> {
        self.page.and_then(|p| p.checked_sub(1)).map(|p| p as usize)
    }
}

/// Read the outline tree. Documents without one yield an empty list.
pub fn read_outline(doc: &PdfDocument) -> Vec<OutlineNode> {
    read_outline_from(doc.inner())
}

pub fn read_outline_from(doc: &Document) -> Vec<OutlineNode> {
    let Some(catalog) = catalog(doc) else {
        return Vec::new();
    };
    let outlines = match catalog.get(b"Outlines") {
        Ok(Object::Reference(id)) => match doc.get_dictionary(*id) {
            Ok(dict) => dict,
            Err(_) => return Vec::new(),
        },
        Ok(Object::Dictionary(dict)) => dict,
        _ => return Vec::new(),
    };
    let first = match outlines.get(b"First") {
        Ok(Object::Reference(id)) => *id,
        _ => return Vec::new(),
    };

    let reader = OutlineReader {
        doc,
        pages: doc
            .get_pages()
            .into_iter()
            .map(|(num, id)| (id, num))
            .collect(),
    };
    let mut visited = HashSet::new();
    reader.read_siblings(first, 1, &mut visited)
}

/// Flatten the tree depth-first into display rows
pub fn flatten(nodes: &[OutlineNode]) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    flatten_into(nodes, &mut rows);
    rows
}

fn flatten_into(nodes: &[OutlineNode], rows: &mut Vec<OutlineRow>) {
    for node in nodes {
        rows.push(OutlineRow {
            level: node.level,
            title: node.title.clone(),
            page: node.page,
        });
        flatten_into(&node.children, rows);
    }
}

struct OutlineReader<'a> {
    doc: &'a Document,
    pages: HashMap<ObjectId, u32>,
}

impl<'a> OutlineReader<'a> {
    fn read_siblings(
        &self,
        first: ObjectId,
        level: u32,
        visited: &mut HashSet<ObjectId>,
    ) -> Vec<OutlineNode> {
        let mut nodes = Vec::new();
        if level > MAX_DEPTH {
            return nodes;
        }

        let mut current = Some(first);
        while let Some(id) = current {
            // Broken files can link items in a loop
            if !visited.insert(id) {
                break;
            }
            let Ok(item) = self.doc.get_dictionary(id) else {
                break;
            };

            let title = match item.get(b"Title") {
                Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
                _ => "Untitled".to_string(),
            };
            let children = match item.get(b"First") {
                Ok(Object::Reference(child)) => self.read_siblings(*child, level + 1, visited),
                _ => Vec::new(),
            };

            nodes.push(OutlineNode {
                title,
                page: self.item_page(item),
                level,
                children,
            });

            current = match item.get(b"Next") {
                Ok(Object::Reference(next)) => Some(*next),
                _ => None,
            };
        }

        nodes
    }

    fn item_page(&self, item: &Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve(dest, 0);
        }

        let action = match item.get(b"A") {
            Ok(Object::Reference(id)) => self.doc.get_dictionary(*id).ok()?,
            Ok(Object::Dictionary(dict)) => dict,
            _ => return None,
        };
        match action.get(b"S") {
            Ok(Object::Name(kind)) if kind == b"GoTo" => self.resolve(action.get(b"D").ok()?, 0),
            _ => None,
        }
    }

    fn resolve(&self, dest: &Object, depth: u32) -> Option<u32> {
        if depth > 8 {
            return None;
        }
        match dest {
            Object::Array(items) => match items.first() {
                Some(Object::Reference(page)) => self.pages.get(page).copied(),
                // Remote-style destinations carry a 0-based page number
                Some(Object::Integer(index)) => u32::try_from(*index)
                    .ok()
                    .and_then(|i| i.checked_add(1))
                    .filter(|page| *page as usize <= self.pages.len()),
                _ => None,
            },
            Object::Dictionary(dict) => self.resolve(dict.get(b"D").ok()?, depth + 1),
            Object::Reference(id) => self.resolve(self.doc.get_object(*id).ok()?, depth + 1),
            Object::String(name, _) | Object::Name(name) => {
                let target = self.named_destination(name)?;
                self.resolve(target, depth + 1)
            }
            _ => None,
        }
    }

    fn named_destination(&self, name: &[u8]) -> Option<&'a Object> {
        let catalog = catalog(self.doc)?;

        // PDF 1.2+: name tree under /Names /Dests
        if let Some(names) = catalog.get(b"Names").ok().and_then(|o| self.dictionary(o)) {
            if let Some(tree) = names.get(b"Dests").ok().and_then(|d| self.dictionary(d)) {
                let mut visited = HashSet::new();
                if let Some(found) = self.search_name_tree(tree, name, &mut visited) {
                    return Some(found);
                }
            }
        }

        // PDF 1.1: plain /Dests dictionary
        let dests = self.dictionary(catalog.get(b"Dests").ok()?)?;
        dests.get(name).ok()
    }

    fn search_name_tree(
        &self,
        node: &'a Dictionary,
        name: &[u8],
        visited: &mut HashSet<ObjectId>,
    ) -> Option<&'a Object> {
        if let Ok(Object::Array(names)) = node.get(b"Names") {
            for pair in names.chunks_exact(2) {
                if let Object::String(key, _) = &pair[0] {
                    if key.as_slice() == name {
                        return Some(&pair[1]);
                    }
                }
            }
        }

        if let Ok(Object::Array(kids)) = node.get(b"Kids") {
            for kid in kids {
                if let Object::Reference(id) = kid {
                    if !visited.insert(*id) {
                        continue;
                    }
                    let Ok(child) = self.doc.get_dictionary(*id) else {
                        continue;
                    };
                    if let Some(found) = self.search_name_tree(child, name, visited) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }

    fn dictionary(&self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Dictionary(dict) => Some(dict),
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            _ => None,
        }
    }
}

fn catalog(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Root") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(title: &str, page: u32, level: u32, children: Vec<OutlineNode>) -> OutlineNode {
        OutlineNode {
            title: title.to_string(),
            page: Some(page),
            level,
            children,
        }
    }

    #[test]
    fn flatten_is_depth_first() {
        let tree = vec![
            node("Intro", 1, 1, vec![node("Motivation", 2, 2, vec![])]),
            node("Body", 3, 1, vec![]),
        ];
        let rows = flatten(&tree);
        let titles: Vec<_> = rows.iter().map(|r| (r.level, r.title.as_str())).collect();
        assert_eq!(titles, vec![(1, "Intro"), (2, "Motivation"), (1, "Body")]);
        assert_eq!(rows[1].page_index(), Some(1));
    }

    #[test]
    fn document_without_outline_is_empty() {
        assert!(read_outline_from(&Document::new()).is_empty());
    }
}

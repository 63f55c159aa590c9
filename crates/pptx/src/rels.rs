//! Package relationships (`*.rels`) and part-name resolution.

use crate::xml::{attr_value, is_prefixed_id};
use pdfconv_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// One `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// Parse the relationships of one part.
pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut rels = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel = Relationship {
                    id: String::new(),
                    rel_type: String::new(),
                    target: String::new(),
                    external: false,
                };

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => rel.id = attr_value(&attr),
                        b"Type" => rel.rel_type = attr_value(&attr),
                        b"Target" => rel.target = attr_value(&attr),
                        b"TargetMode" => rel.external = attr_value(&attr) == "External",
                        _ => {}
                    }
                }

                if !rel.id.is_empty() {
                    rels.push(rel);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Find a relationship by id.
pub fn find_by_id<'a>(rels: &'a [Relationship], id: &str) -> Option<&'a Relationship> {
    rels.iter().find(|r| r.id == id)
}

/// Find the first relationship whose type URI ends with `/{kind}`.
pub fn find_by_type<'a>(rels: &'a [Relationship], kind: &str) -> Option<&'a Relationship> {
    rels.iter().find(|r| {
        r.rel_type
            .rsplit_once('/')
            .map(|(_, last)| last == kind)
            .unwrap_or(false)
    })
}

/// The relationships part that belongs to `part`.
///
/// `ppt/slides/slide1.xml` maps to `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that declared it.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = source_part
        .rsplit_once('/')
        .map(|(dir, _)| dir.split('/').collect())
        .unwrap_or_default();

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    segments.join("/")
}

/// Relationship id referenced by an element such as `<p:sldId r:id="rId2"/>`.
pub(crate) fn referenced_id(e: &quick_xml::events::BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(is_prefixed_id)
        .map(|attr| attr_value(&attr))
}

//! Extractor: read a `.pptx` package and produce per-slide text blocks.
//!
//! ## What gets read
//!
//! A `.pptx` is a zip of XML parts. Slide order is authoritative in
//! `ppt/presentation.xml` (`<p:sldIdLst>`), with each entry resolved to a
//! slide part through `ppt/_rels/presentation.xml.rels`. Within a slide,
//! every shape that carries a text body (`<p:txBody>`) contributes its
//! text; shapes without text (pictures, connectors) are ignored.
//!
//! Absence of text is not an error: a slide with no textual shapes still
//! yields its index label, so downstream blocks always line up 1:1 with
//! source slides.

use crate::error::UpliftError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// OOXML packages are plain zip archives.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Read the source deck and produce one text block per slide, in source
/// order, each prefixed with its 1-based index label.
///
/// Pure read; the input file is never modified. Fails only on unreadable
/// or non-conforming input — before any external service is contacted.
pub fn extract_slide_blocks(path: &Path) -> Result<Vec<String>, UpliftError> {
    let mut file = open_validated(path)?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| UpliftError::Internal(format!("seek: {e}")))?;

    let mut archive = ZipArchive::new(file).map_err(|e| UpliftError::DeckParse {
        path: path.to_path_buf(),
        detail: format!("not a readable zip archive: {e}"),
    })?;

    let slide_paths = slide_paths_in_order(&mut archive, path)?;
    debug!("Source deck has {} slides", slide_paths.len());

    let mut blocks = Vec::with_capacity(slide_paths.len());
    for (i, slide_path) in slide_paths.iter().enumerate() {
        let xml = read_part(&mut archive, slide_path, path)?;
        let text = shape_texts(&xml).join("\n");
        let label = format!("Slide {}:", i + 1);
        let block = if text.trim().is_empty() {
            label
        } else {
            format!("{label}\n{text}")
        };
        blocks.push(block.trim_end().to_string());
    }

    Ok(blocks)
}

/// Open the file, mapping I/O failures to the input-error taxonomy and
/// checking the zip magic so a non-pptx file fails with a meaningful error
/// rather than a parse failure deep inside the archive reader.
fn open_validated(path: &Path) -> Result<File, UpliftError> {
    if !path.exists() {
        return Err(UpliftError::DeckNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(UpliftError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(UpliftError::DeckNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() || magic != ZIP_MAGIC {
        return Err(UpliftError::NotAPptx {
            path: path.to_path_buf(),
            magic,
        });
    }

    Ok(file)
}

/// Resolve slide part paths in presentation order.
///
/// `<p:sldIdLst>` lists relationship ids in display order; the `.rels` part
/// maps each id to a target like `slides/slide1.xml`. Decks written by
/// minimal tools occasionally omit the id list, in which case we fall back
/// to the relationship targets sorted by their slide number.
fn slide_paths_in_order<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    deck_path: &Path,
) -> Result<Vec<String>, UpliftError> {
    let rels_xml = read_part(archive, "ppt/_rels/presentation.xml.rels", deck_path)?;
    let rel_targets = slide_relationships(&rels_xml, deck_path)?;

    let pres_xml = read_part(archive, "ppt/presentation.xml", deck_path)?;
    let ordered_ids = slide_id_list(&pres_xml, deck_path)?;

    let mut paths = Vec::new();
    if ordered_ids.is_empty() {
        let mut targets: Vec<(Option<usize>, String)> = rel_targets
            .into_iter()
            .map(|(_, target)| (trailing_number(&target), target))
            .collect();
        targets.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        paths.extend(targets.into_iter().map(|(_, t)| t));
    } else {
        for rid in &ordered_ids {
            if let Some((_, target)) = rel_targets.iter().find(|(id, _)| id == rid) {
                paths.push(target.clone());
            }
        }
    }

    Ok(paths)
}

/// Parse the package relationships, keeping only slide targets
/// (not layouts or masters), normalised to full part paths.
fn slide_relationships(
    rels_xml: &str,
    deck_path: &Path,
) -> Result<Vec<(String, String)>, UpliftError> {
    let mut reader = Reader::from_str(rels_xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Type" => rel_type = value,
                        b"Target" => target = value,
                        b"Id" => id = value,
                        _ => {}
                    }
                }
                if rel_type.ends_with("/slide") {
                    let full = if let Some(stripped) = target.strip_prefix('/') {
                        stripped.to_string()
                    } else {
                        format!("ppt/{target}")
                    };
                    rels.push((id, full));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(UpliftError::DeckParse {
                    path: deck_path.to_path_buf(),
                    detail: format!("presentation relationships: {e}"),
                });
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Collect the relationship ids inside `<p:sldIdLst>`, in document order.
fn slide_id_list(pres_xml: &str, deck_path: &Path) -> Result<Vec<String>, UpliftError> {
    let mut reader = Reader::from_str(pres_xml);
    reader.trim_text(true);
    let mut in_list = false;
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = true;
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = false;
            }
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if in_list && local_name(e.name().as_ref()) == b"sldId" =>
            {
                for attr in e.attributes().flatten() {
                    // The relationship reference is the namespaced r:id, as
                    // opposed to the plain numeric id on the same element.
                    if attr.key.as_ref() == b"r:id" {
                        ids.push(String::from_utf8_lossy(&attr.value).to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(UpliftError::DeckParse {
                    path: deck_path.to_path_buf(),
                    detail: format!("presentation.xml: {e}"),
                });
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Extract the text of every shape in a slide, one string per shape.
///
/// Paragraphs within a shape are joined with newlines; empty shapes are
/// dropped. Event-driven rather than tree-built: slide XML is namespaced
/// and deeply nested, and all we want is the `<a:t>` runs grouped by shape.
fn shape_texts(slide_xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(slide_xml);
    reader.trim_text(false);

    let mut shapes = Vec::new();
    let mut shape_depth = 0usize;
    let mut in_text_run = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    shape_depth += 1;
                    if shape_depth == 1 {
                        current.clear();
                    }
                }
                b"p" if shape_depth > 0 && !current.is_empty() => current.push('\n'),
                b"t" if shape_depth > 0 => in_text_run = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text_run => {
                current.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    shape_depth = shape_depth.saturating_sub(1);
                    if shape_depth == 0 {
                        let text = current.trim().to_string();
                        if !text.is_empty() {
                            shapes.push(text);
                        }
                        current.clear();
                    }
                }
                b"t" => in_text_run = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                // Keep whatever was readable; a damaged slide part should
                // not sink the whole extraction.
                tracing::warn!("Slide XML parse error (continuing): {e}");
                break;
            }
            _ => {}
        }
    }

    shapes
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    part: &str,
    deck_path: &Path,
) -> Result<String, UpliftError> {
    let mut file = archive.by_name(part).map_err(|e| UpliftError::DeckParse {
        path: deck_path.to_path_buf(),
        detail: format!("missing part '{part}': {e}"),
    })?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| UpliftError::DeckParse {
            path: deck_path.to_path_buf(),
            detail: format!("reading part '{part}': {e}"),
        })?;
    Ok(content)
}

/// Strip the namespace prefix from an XML element or attribute name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Trailing digits of a part name like "ppt/slides/slide12.xml" → 12.
fn trailing_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml");
    let digits: String = s
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    digits.parse().ok()
}

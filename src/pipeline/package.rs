//! Package writer: materialise rendered slides into a `.pptx` in memory.
//!
//! A `.pptx` is a zip of XML parts wired together by relationship files.
//! The writer emits the minimal valid skeleton — content types, package
//! relationships, presentation, one blank master/layout/theme — plus one
//! slide part per [`RenderedSlide`]. Each slide gets a title text box and
//! a body text box; when media was found, an image part placed beside the
//! body and/or a hyperlinked caption carrying the video URL.
//!
//! Everything is assembled through a `zip::ZipWriter` over an in-memory
//! buffer. No temporary file is involved; the caller decides what to do
//! with the returned bytes (the top-level entry point writes them to the
//! output path atomically).
//!
//! Geometry is in EMUs (914 400 per inch) on a 16:9 canvas. The numbers
//! below mirror the stock "title and content" arrangement closely enough
//! that decks open looking ordinary in PowerPoint and LibreOffice.

use crate::error::UpliftError;
use crate::output::{RenderedSlide, SlideImage};
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

// ── Canvas geometry (EMU, 16:9) ──────────────────────────────────────────

const SLIDE_CX: u64 = 12_192_000;
const SLIDE_CY: u64 = 6_858_000;

const TITLE_OFF: (u64, u64) = (457_200, 274_638);
const TITLE_EXT: (u64, u64) = (11_277_600, 1_143_000);

const BODY_OFF: (u64, u64) = (457_200, 1_600_200);
const BODY_EXT_FULL: (u64, u64) = (11_277_600, 4_525_963);
const BODY_EXT_SPLIT: (u64, u64) = (6_400_800, 4_525_963);

/// Box the image is fitted into when a slide has one (right half).
const IMAGE_BOX_OFF: (u64, u64) = (7_086_600, 1_600_200);
const IMAGE_BOX_EXT: (u64, u64) = (4_648_200, 4_525_963);

const CAPTION_OFF: (u64, u64) = (457_200, 6_263_400);
const CAPTION_EXT: (u64, u64) = (11_277_600, 457_200);

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// Write the output deck into an in-memory `.pptx` package.
pub fn write_package(slides: &[RenderedSlide]) -> Result<Vec<u8>, UpliftError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions = FileOptions::default();

    let add = |zip: &mut ZipWriter<Cursor<Vec<u8>>>,
                   name: &str,
                   data: &[u8]|
     -> Result<(), UpliftError> {
        zip.start_file(name, options)
            .map_err(|e| UpliftError::Internal(format!("zip entry '{name}': {e}")))?;
        zip.write_all(data)
            .map_err(|e| UpliftError::Internal(format!("zip write '{name}': {e}")))?;
        Ok(())
    };

    add(&mut zip, "[Content_Types].xml", content_types(slides).as_bytes())?;
    add(&mut zip, "_rels/.rels", package_rels().as_bytes())?;
    add(&mut zip, "ppt/presentation.xml", presentation(slides.len()).as_bytes())?;
    add(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels(slides.len()).as_bytes(),
    )?;
    add(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes())?;
    add(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        master_rels().as_bytes(),
    )?;
    add(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes())?;
    add(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        layout_rels().as_bytes(),
    )?;
    add(&mut zip, "ppt/theme/theme1.xml", THEME.as_bytes())?;

    for slide in slides {
        let n = slide.index;
        add(
            &mut zip,
            &format!("ppt/slides/slide{n}.xml"),
            slide_xml(slide).as_bytes(),
        )?;
        add(
            &mut zip,
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            slide_rels(slide).as_bytes(),
        )?;
        if let Some(img) = &slide.image {
            add(
                &mut zip,
                &format!("ppt/media/image{n}.{}", img.ext),
                &img.bytes,
            )?;
        }
    }

    let cursor = zip
        .finish()
        .map_err(|e| UpliftError::Internal(format!("zip finish: {e}")))?;
    Ok(cursor.into_inner())
}

// ── Part builders ────────────────────────────────────────────────────────

fn content_types(slides: &[RenderedSlide]) -> String {
    let mut overrides = String::new();
    for slide in slides {
        overrides.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{}.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>",
            slide.index
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Default Extension=\"png\" ContentType=\"image/png\"/>\
         <Default Extension=\"jpeg\" ContentType=\"image/jpeg\"/>\
         <Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\
         <Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\
         <Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\
         <Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>\
         {overrides}</Types>"
    )
}

fn package_rels() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_OFFICE_DOCUMENT}\" Target=\"ppt/presentation.xml\"/>\
         </Relationships>"
    )
}

fn presentation(slide_count: usize) -> String {
    let mut sld_ids = String::new();
    for i in 0..slide_count {
        // rId1 is the master; slides start at rId2.
        sld_ids.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            256 + i,
            i + 2
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <p:presentation xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>{sld_ids}</p:sldIdLst>\
         <p:sldSz cx=\"{SLIDE_CX}\" cy=\"{SLIDE_CY}\"/>\
         <p:notesSz cx=\"6858000\" cy=\"9144000\"/>\
         </p:presentation>"
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let mut rels = format!(
        "<Relationship Id=\"rId1\" Type=\"{REL_SLIDE_MASTER}\" Target=\"slideMasters/slideMaster1.xml\"/>"
    );
    for i in 0..slide_count {
        rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{REL_SLIDE}\" Target=\"slides/slide{}.xml\"/>",
            i + 2,
            i + 1
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         {rels}</Relationships>"
    )
}

fn master_rels() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_SLIDE_LAYOUT}\" Target=\"../slideLayouts/slideLayout1.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"{REL_THEME}\" Target=\"../theme/theme1.xml\"/>\
         </Relationships>"
    )
}

fn layout_rels() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{REL_SLIDE_MASTER}\" Target=\"../slideMasters/slideMaster1.xml\"/>\
         </Relationships>"
    )
}

fn slide_rels(slide: &RenderedSlide) -> String {
    let mut rels = format!(
        "<Relationship Id=\"rId1\" Type=\"{REL_SLIDE_LAYOUT}\" Target=\"../slideLayouts/slideLayout1.xml\"/>"
    );
    if let Some(img) = &slide.image {
        rels.push_str(&format!(
            "<Relationship Id=\"rId2\" Type=\"{REL_IMAGE}\" Target=\"../media/image{}.{}\"/>",
            slide.index, img.ext
        ));
    }
    if let Some(url) = &slide.video_url {
        rels.push_str(&format!(
            "<Relationship Id=\"rId3\" Type=\"{REL_HYPERLINK}\" Target=\"{}\" TargetMode=\"External\"/>",
            escape(url)
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         {rels}</Relationships>"
    )
}

fn slide_xml(slide: &RenderedSlide) -> String {
    let body_ext = if slide.image.is_some() {
        BODY_EXT_SPLIT
    } else {
        BODY_EXT_FULL
    };

    let mut shapes = String::new();
    shapes.push_str(&text_box(
        2,
        "Title",
        &slide.title,
        TITLE_OFF,
        TITLE_EXT,
        3200,
        true,
        None,
    ));
    shapes.push_str(&text_box(
        3,
        "Body",
        &slide.body,
        BODY_OFF,
        body_ext,
        1800,
        false,
        None,
    ));

    if let Some(img) = &slide.image {
        shapes.push_str(&picture(4, img));
    }
    if let Some(url) = &slide.video_url {
        shapes.push_str(&text_box(
            5,
            "Video link",
            &format!("Watch: {url}"),
            CAPTION_OFF,
            CAPTION_EXT,
            1200,
            false,
            Some("rId3"),
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <p:sld xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr/>\
         {shapes}\
         </p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:sld>"
    )
}

/// A plain text box: one paragraph per input line, bold for titles, an
/// optional hyperlink on every run (used for the video caption).
#[allow(clippy::too_many_arguments)]
fn text_box(
    id: u32,
    name: &str,
    text: &str,
    off: (u64, u64),
    ext: (u64, u64),
    font_size: u32,
    bold: bool,
    hyperlink_rid: Option<&str>,
) -> String {
    let bold_attr = if bold { " b=\"1\"" } else { "" };
    let hlink = hyperlink_rid
        .map(|rid| format!("<a:hlinkClick r:id=\"{rid}\"/>"))
        .unwrap_or_default();

    let mut paragraphs = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            paragraphs.push_str("<a:p><a:endParaRPr lang=\"en-US\"/></a:p>");
        } else {
            paragraphs.push_str(&format!(
                "<a:p><a:r>\
                 <a:rPr lang=\"en-US\" sz=\"{font_size}\"{bold_attr}>{hlink}</a:rPr>\
                 <a:t>{}</a:t></a:r></a:p>",
                escape(line)
            ));
        }
    }
    if paragraphs.is_empty() {
        paragraphs.push_str("<a:p><a:endParaRPr lang=\"en-US\"/></a:p>");
    }

    format!(
        "<p:sp>\
         <p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/>\
         <p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr><a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
         <p:txBody><a:bodyPr wrap=\"square\"/><a:lstStyle/>{paragraphs}</p:txBody>\
         </p:sp>",
        off.0, off.1, ext.0, ext.1
    )
}

fn picture(id: u32, img: &SlideImage) -> String {
    let (cx, cy) = fit_box(
        img.width_px,
        img.height_px,
        IMAGE_BOX_EXT.0,
        IMAGE_BOX_EXT.1,
    );
    // Centre the fitted image inside its box.
    let x = IMAGE_BOX_OFF.0 + (IMAGE_BOX_EXT.0 - cx) / 2;
    let y = IMAGE_BOX_OFF.1 + (IMAGE_BOX_EXT.1 - cy) / 2;

    format!(
        "<p:pic>\
         <p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Illustration\"/>\
         <p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
         <p:blipFill><a:blip r:embed=\"rId2\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
         <p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
         </p:pic>"
    )
}

/// Scale pixel dimensions to fit a box, preserving aspect ratio.
fn fit_box(width_px: u32, height_px: u32, box_cx: u64, box_cy: u64) -> (u64, u64) {
    if width_px == 0 || height_px == 0 {
        return (box_cx, box_cy);
    }
    let scale_x = box_cx as f64 / width_px as f64;
    let scale_y = box_cy as f64 / height_px as f64;
    let scale = scale_x.min(scale_y);
    (
        (width_px as f64 * scale).round() as u64,
        (height_px as f64 * scale).round() as u64,
    )
}

// ── Static parts ─────────────────────────────────────────────────────────

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Uplift"><a:themeElements><a:clrScheme name="Uplift"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Uplift"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Uplift"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn slide(index: usize, title: &str, body: &str) -> RenderedSlide {
        RenderedSlide {
            index,
            label: "Entry".to_string(),
            title: title.to_string(),
            body: body.to_string(),
            image: None,
            video_url: None,
        }
    }

    fn part_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut s = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn package_contains_skeleton_and_slides() {
        let bytes = write_package(&[
            slide(1, "Title A", "Body line 1"),
            slide(2, "Title B", "Body line 2"),
        ])
        .unwrap();

        let names = part_names(&bytes);
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn slide_text_is_escaped() {
        let bytes = write_package(&[slide(1, "Salt & acid", "A < B > C")]).unwrap();
        let xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(xml.contains("Salt &amp; acid"));
        assert!(xml.contains("A &lt; B &gt; C"));
        assert!(!xml.contains("Salt & acid"));
    }

    #[test]
    fn video_link_becomes_external_relationship() {
        let mut s = slide(1, "Title", "Body");
        s.video_url = Some("https://www.youtube.com/watch?v=abc123".to_string());
        let bytes = write_package(&[s]).unwrap();

        let rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains("TargetMode=\"External\""));
        assert!(rels.contains("watch?v=abc123"));

        let xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(xml.contains("hlinkClick"));
        assert!(xml.contains("Watch: https://www.youtube.com/watch?v=abc123"));
    }

    #[test]
    fn image_adds_media_part_and_pic_element() {
        let mut s = slide(1, "Title", "Body");
        s.image = Some(SlideImage {
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
            ext: "png",
            content_type: "image/png",
            width_px: 640,
            height_px: 480,
        });
        let bytes = write_package(&[s]).unwrap();

        assert!(part_names(&bytes).iter().any(|n| n == "ppt/media/image1.png"));
        let xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(xml.contains("<p:pic>"));
        assert!(xml.contains("r:embed=\"rId2\""));
    }

    #[test]
    fn presentation_lists_every_slide_in_order() {
        let bytes = write_package(&[
            slide(1, "A", "a"),
            slide(2, "B", "b"),
            slide(3, "C", "c"),
        ])
        .unwrap();
        let pres = read_part(&bytes, "ppt/presentation.xml");
        let pos2 = pres.find("r:id=\"rId2\"").unwrap();
        let pos3 = pres.find("r:id=\"rId3\"").unwrap();
        let pos4 = pres.find("r:id=\"rId4\"").unwrap();
        assert!(pos2 < pos3 && pos3 < pos4);
    }

    #[test]
    fn fit_box_preserves_aspect() {
        // Wide image limited by width.
        let (cx, cy) = fit_box(2000, 1000, 1_000_000, 1_000_000);
        assert_eq!((cx, cy), (1_000_000, 500_000));
        // Tall image limited by height.
        let (cx, cy) = fit_box(500, 1000, 1_000_000, 1_000_000);
        assert_eq!((cx, cy), (500_000, 1_000_000));
    }
}

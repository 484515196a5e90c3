//! Minimal OOXML writer for widescreen .pptx decks.
//!
//! The package carries exactly what the deck needs: content types, package
//! rels, the presentation part, one blank master/layout/theme, one slide
//! part per slide and the embedded media. Slide XML is assembled from
//! templates with all user text escaped.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::layout::geometry::{
    accent_bar, fit_image, title_box, Rect, SLIDE_HEIGHT, SLIDE_WIDTH, TextBand,
};
use crate::layout::theme::Theme;

/// Image bytes ready for embedding, with sniffed format and dimensions.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub data: Vec<u8>,
    /// "png" or "jpg" — the only formats the package embeds.
    pub extension: &'static str,
    pub width_px: u32,
    pub height_px: u32,
}

/// One slide after bullet preparation and band selection.
#[derive(Debug, Clone)]
pub struct RenderedSlide {
    pub title: String,
    pub bullets: Vec<String>,
    pub band: TextBand,
    pub image: Option<EmbeddedImage>,
}

const TITLE_FONT_SIZE_PT: u32 = 34;

// ────────────────────────────────────────────────────────────────────────────
// Package assembly
// ────────────────────────────────────────────────────────────────────────────

/// Serializes the deck into a complete .pptx package.
pub fn build_pptx(
    theme: &Theme,
    bullet_font_size_pt: u32,
    slides: &[RenderedSlide],
) -> Result<Vec<u8>> {
    let mut package = PackageBuilder::new();

    package.add_file("[Content_Types].xml", content_types_xml(slides).as_bytes())?;
    package.add_file("_rels/.rels", ROOT_RELS.as_bytes())?;
    package.add_file("ppt/presentation.xml", presentation_xml(slides.len()).as_bytes())?;
    package.add_file(
        "ppt/_rels/presentation.xml.rels",
        presentation_rels_xml(slides.len()).as_bytes(),
    )?;
    package.add_file("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes())?;
    package.add_file(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        MASTER_RELS.as_bytes(),
    )?;
    package.add_file("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes())?;
    package.add_file(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        LAYOUT_RELS.as_bytes(),
    )?;
    package.add_file("ppt/theme/theme1.xml", THEME_XML.as_bytes())?;

    let mut media_index = 0usize;
    for (i, slide) in slides.iter().enumerate() {
        let slide_no = i + 1;

        let media_name = slide.image.as_ref().map(|img| {
            media_index += 1;
            format!("image{media_index}.{}", img.extension)
        });

        package.add_file(
            &format!("ppt/slides/slide{slide_no}.xml"),
            slide_xml(slide, theme, bullet_font_size_pt).as_bytes(),
        )?;
        package.add_file(
            &format!("ppt/slides/_rels/slide{slide_no}.xml.rels"),
            slide_rels_xml(media_name.as_deref()).as_bytes(),
        )?;

        if let (Some(name), Some(img)) = (media_name, &slide.image) {
            package.add_file(&format!("ppt/media/{name}"), &img.data)?;
        }
    }

    package.finish()
}

/// Thin wrapper around `ZipWriter` producing the package in memory.
struct PackageBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl PackageBuilder {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn add_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip
            .start_file(path, options)
            .with_context(|| format!("Failed to start package entry '{path}'"))?;
        self.zip
            .write_all(content)
            .with_context(|| format!("Failed to write package entry '{path}'"))?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(self
            .zip
            .finish()
            .context("Failed to finalize package archive")?
            .into_inner())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed parts
// ────────────────────────────────────────────────────────────────────────────

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_REL_PKG: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

/// Empty shape-tree scaffold shared by master, layout and every slide.
const EMPTY_TREE_HEADER: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

// ────────────────────────────────────────────────────────────────────────────
// Generated parts
// ────────────────────────────────────────────────────────────────────────────

fn content_types_xml(slides: &[RenderedSlide]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
    xml.push_str(r#"<Default Extension="jpg" ContentType="image/jpeg"/>"#);
    xml.push_str(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    for i in 1..=slides.len() {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn presentation_xml(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for i in 0..slide_count {
        // Slide ids start at 256 by convention; rId1 is the master.
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            i + 2
        ));
    }

    format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{SLIDE_WIDTH}" cy="{SLIDE_HEIGHT}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = format!(
        r#"<Relationship Id="rId1" Type="{REL_SLIDE_MASTER}" Target="slideMasters/slideMaster1.xml"/>"#
    );
    for i in 0..slide_count {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{REL_SLIDE}" Target="slides/slide{}.xml"/>"#,
            i + 2,
            i + 1
        ));
    }
    format!(r#"{XML_DECL}<Relationships xmlns="{NS_REL_PKG}">{rels}</Relationships>"#)
}

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgPr><a:solidFill><a:schemeClr val="lt1"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="EduDeck"><a:themeElements><a:clrScheme name="EduDeck"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="EduDeck"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="EduDeck"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

fn slide_rels_xml(media_name: Option<&str>) -> String {
    let mut rels = format!(
        r#"<Relationship Id="rId1" Type="{REL_SLIDE_LAYOUT}" Target="../slideLayouts/slideLayout1.xml"/>"#
    );
    if let Some(name) = media_name {
        rels.push_str(&format!(
            r#"<Relationship Id="rId2" Type="{REL_IMAGE}" Target="../media/{name}"/>"#
        ));
    }
    format!(r#"{XML_DECL}<Relationships xmlns="{NS_REL_PKG}">{rels}</Relationships>"#)
}

// ────────────────────────────────────────────────────────────────────────────
// Slide XML
// ────────────────────────────────────────────────────────────────────────────

fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

fn xfrm(rect: Rect) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        rect.x, rect.y, rect.w, rect.h
    )
}

fn slide_xml(slide: &RenderedSlide, theme: &Theme, bullet_font_size_pt: u32) -> String {
    let mut shapes = String::new();

    // Title strip, bold, theme-colored.
    shapes.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{frame}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" sz="{sz}" b="1"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill></a:rPr><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        frame = xfrm(title_box()),
        sz = TITLE_FONT_SIZE_PT * 100,
        color = theme.title.hex(),
        text = escape(&slide.title),
    ));

    // Accent bar under the title.
    shapes.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Accent Bar"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{frame}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:ln><a:noFill/></a:ln></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody></p:sp>"#,
        frame = xfrm(accent_bar()),
        color = theme.accent.hex(),
    ));

    // Bullet column in the band chosen for this slide.
    shapes.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="4" name="Content"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{frame}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        frame = xfrm(slide.band.rect()),
        paragraphs = bullet_paragraphs(&slide.bullets, &theme.body.hex(), bullet_font_size_pt),
    ));

    // Image on the right, scaled into the reserved band.
    if let Some(img) = &slide.image {
        let placed = fit_image(img.width_px, img.height_px);
        shapes.push_str(&format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="5" name="Slide Image"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{frame}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
            frame = xfrm(placed),
        ));
    }

    format!(
        r#"{XML_DECL}<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{bg}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree>{EMPTY_TREE_HEADER}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        bg = theme.background.hex(),
    )
}

fn bullet_paragraphs(bullets: &[String], body_hex: &str, font_size_pt: u32) -> String {
    if bullets.is_empty() {
        return "<a:p/>".to_string();
    }

    bullets
        .iter()
        .map(|bullet| {
            format!(
                r#"<a:p><a:pPr><a:lnSpc><a:spcPct val="115000"/></a:lnSpc><a:spcBef><a:spcPts val="100"/></a:spcBef><a:spcAft><a:spcPts val="400"/></a:spcAft><a:buNone/></a:pPr><a:r><a:rPr lang="en-US" sz="{sz}"><a:solidFill><a:srgbClr val="{body_hex}"/></a:solidFill></a:rPr><a:t>• {text}</a:t></a:r></a:p>"#,
                sz = font_size_pt * 100,
                text = escape(bullet),
            )
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! PowerPoint (OOXML) package writer.
//!
//! A deck is written as a minimal presentation package: one master, one
//! blank layout, one theme and a slide part per slide. Data-URI images are
//! embedded under `ppt/media/`; any other image source is linked
//! externally.

use std::collections::BTreeSet;
use std::io::{Cursor, Write};

use arnika_model::TextAlign;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::deck::{Deck, DeckShape, DeckSlide, Frame};
use crate::error::ExportResult;
use crate::media::{self, ImageSource};

const EMU_PER_INCH: f64 = 914_400.0;
/// 16:9 slide, 10 × 5.625 in
const SLIDE_CX: i64 = 9_144_000;
const SLIDE_CY: i64 = 5_143_500;
/// Text boxes have no height in the deck; give them one line's worth
const TEXT_BOX_HEIGHT: f64 = 1.0;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// A file embedded into the package
#[derive(Debug, Clone, PartialEq)]
struct MediaPart {
    file_name: String,
    extension: &'static str,
    bytes: Vec<u8>,
}

/// Relationship entry of a part's `.rels`
#[derive(Debug, Clone, PartialEq)]
struct Relationship {
    id: String,
    kind: &'static str,
    target: String,
    external: bool,
}

/// Per-slide relationship and shape-id bookkeeping
struct SlideContext<'a> {
    rels: Vec<Relationship>,
    media: &'a mut Vec<MediaPart>,
    next_shape_id: u32,
    buffer: String,
}

impl<'a> SlideContext<'a> {
    fn new(media: &'a mut Vec<MediaPart>) -> Self {
        Self {
            rels: vec![Relationship {
                id: "rId1".to_string(),
                kind: REL_LAYOUT,
                target: "../slideLayouts/slideLayout1.xml".to_string(),
                external: false,
            }],
            media,
            // 1 is the shape tree itself
            next_shape_id: 2,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    fn relate(&mut self, kind: &'static str, target: String, external: bool) -> String {
        let id = format!("rId{}", self.rels.len() + 1);
        self.rels.push(Relationship {
            id: id.clone(),
            kind,
            target,
            external,
        });
        id
    }

    fn embed(&mut self, extension: &'static str, bytes: Vec<u8>) -> String {
        let file_name = format!("image{}.{}", self.media.len() + 1, extension);
        let target = format!("../media/{}", file_name);
        self.media.push(MediaPart {
            file_name,
            extension,
            bytes,
        });
        self.relate(REL_IMAGE, target, false)
    }
}

/// Render a deck as `.pptx` bytes
pub fn write_pptx(deck: &Deck, theme_primary: &str, theme_secondary: &str) -> ExportResult<Vec<u8>> {
    let mut media = Vec::new();
    let mut slides = Vec::with_capacity(deck.slides.len());
    for slide in &deck.slides {
        slides.push(slide_part(slide, &mut media));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut put = |name: &str, bytes: &[u8]| -> ExportResult<()> {
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
        Ok(())
    };

    put("[Content_Types].xml", content_types_xml(slides.len(), &media).as_bytes())?;
    put("_rels/.rels", root_rels_xml().as_bytes())?;
    put("docProps/core.xml", core_xml(&deck.title).as_bytes())?;
    put("ppt/presentation.xml", presentation_xml(slides.len()).as_bytes())?;
    put(
        "ppt/_rels/presentation.xml.rels",
        presentation_rels_xml(slides.len()).as_bytes(),
    )?;
    put("ppt/slideMasters/slideMaster1.xml", MASTER_XML.as_bytes())?;
    put(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        rels_xml(&[
            local_rel("rId1", REL_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            local_rel("rId2", REL_THEME, "../theme/theme1.xml"),
        ])
        .as_bytes(),
    )?;
    put("ppt/slideLayouts/slideLayout1.xml", LAYOUT_XML.as_bytes())?;
    put(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        rels_xml(&[local_rel(
            "rId1",
            REL_MASTER,
            "../slideMasters/slideMaster1.xml",
        )])
        .as_bytes(),
    )?;
    put(
        "ppt/theme/theme1.xml",
        theme_xml(theme_primary, theme_secondary).as_bytes(),
    )?;

    for (i, (xml, rels)) in slides.iter().enumerate() {
        put(&format!("ppt/slides/slide{}.xml", i + 1), xml.as_bytes())?;
        put(
            &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
            rels_xml(rels).as_bytes(),
        )?;
    }

    for part in &media {
        put(&format!("ppt/media/{}", part.file_name), &part.bytes)?;
    }

    let cursor = zip.finish()?;
    debug!(
        slides = deck.slides.len(),
        media = media.len(),
        "wrote presentation package"
    );
    Ok(cursor.into_inner())
}

fn slide_part(slide: &DeckSlide, media: &mut Vec<MediaPart>) -> (String, Vec<Relationship>) {
    let mut ctx = SlideContext::new(media);

    ctx.add(XML_DECL);
    ctx.add(&format!(
        "<p:sld xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">",
        NS_DRAWING, NS_REL, NS_MAIN
    ));
    ctx.add("<p:cSld>");
    if let Some(color) = slide.background.as_deref().and_then(hex_color) {
        ctx.add(&format!(
            "<p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>",
            color
        ));
    }
    ctx.add("<p:spTree>");
    ctx.add(GROUP_HEADER);

    for shape in &slide.shapes {
        match shape {
            DeckShape::Text {
                frame,
                text,
                font_size,
                color,
                align,
                hyperlink,
            } => {
                let link = hyperlink
                    .as_ref()
                    .map(|url| ctx.relate(REL_HYPERLINK, url.clone(), true));
                let run = RunStyle {
                    size: *font_size,
                    color: hex_color(color).unwrap_or_else(|| "333333".to_string()),
                    link,
                };
                text_shape(&mut ctx, frame, text, *align, &run, None);
            }
            DeckShape::Button { frame, text, fill } => {
                let run = RunStyle {
                    size: 18.0,
                    color: "FFFFFF".to_string(),
                    link: None,
                };
                let fill = hex_color(fill);
                text_shape(
                    &mut ctx,
                    frame,
                    text,
                    TextAlign::Center,
                    &run,
                    Some(fill.as_deref().unwrap_or("4F46E5")),
                );
            }
            DeckShape::Image { frame, source } => picture(&mut ctx, frame, source),
        }
    }

    ctx.add("</p:spTree></p:cSld>");
    ctx.add("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");

    let SlideContext { rels, buffer, .. } = ctx;
    (buffer, rels)
}

struct RunStyle {
    /// Points
    size: f64,
    color: String,
    link: Option<String>,
}

/// Text box, or a filled rounded rectangle when `fill` is given
fn text_shape(
    ctx: &mut SlideContext<'_>,
    frame: &Frame,
    text: &str,
    align: TextAlign,
    run: &RunStyle,
    fill: Option<&str>,
) {
    let id = ctx.shape_id();
    let (geometry, name, tx_box) = match fill {
        Some(_) => ("roundRect", "Button", ""),
        None => ("rect", "Text", " txBox=\"1\""),
    };

    ctx.add(&format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name} {id}\"/><p:cNvSpPr{tx_box}/><p:nvPr/></p:nvSpPr>"
    ));
    ctx.add("<p:spPr>");
    ctx.add(&xfrm(frame, TEXT_BOX_HEIGHT));
    ctx.add(&format!("<a:prstGeom prst=\"{}\"><a:avLst/></a:prstGeom>", geometry));
    match fill {
        Some(color) => ctx.add(&format!(
            "<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>",
            color
        )),
        None => ctx.add("<a:noFill/>"),
    }
    ctx.add("</p:spPr>");

    let anchor = if fill.is_some() { " anchor=\"ctr\"" } else { "" };
    ctx.add(&format!(
        "<p:txBody><a:bodyPr wrap=\"square\" rtlCol=\"0\"{}/><a:lstStyle/>",
        anchor
    ));

    let size = (run.size * 100.0).round().clamp(100.0, 400_000.0) as i64;
    for line in text.split('\n') {
        ctx.add(&format!("<a:p><a:pPr algn=\"{}\"/>", paragraph_align(align)));
        ctx.add(&format!(
            "<a:r><a:rPr lang=\"en-US\" sz=\"{}\" dirty=\"0\"><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>",
            size, run.color
        ));
        if let Some(rel) = &run.link {
            ctx.add(&format!("<a:hlinkClick r:id=\"{}\"/>", rel));
        }
        ctx.add(&format!("</a:rPr><a:t>{}</a:t></a:r></a:p>", escape_xml(line)));
    }
    ctx.add("</p:txBody></p:sp>");
}

fn picture(ctx: &mut SlideContext<'_>, frame: &Frame, source: &str) {
    let blip = match media::classify(source) {
        ImageSource::Embedded { extension, bytes } => {
            format!("r:embed=\"{}\"", ctx.embed(extension, bytes))
        }
        ImageSource::Linked(url) => {
            format!("r:link=\"{}\"", ctx.relate(REL_IMAGE, url, true))
        }
        ImageSource::Unsupported => {
            debug!(source_len = source.len(), "skipping undecodable image");
            return;
        }
    };

    let id = ctx.shape_id();
    ctx.add(&format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Picture {id}\"/><p:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"
    ));
    ctx.add(&format!(
        "<p:blipFill><a:blip {}/><a:stretch><a:fillRect/></a:stretch></p:blipFill>",
        blip
    ));
    ctx.add("<p:spPr>");
    ctx.add(&xfrm(frame, TEXT_BOX_HEIGHT));
    ctx.add("<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>");
}

fn xfrm(frame: &Frame, default_height: f64) -> String {
    format!(
        "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        emu(frame.x),
        emu(frame.y),
        emu(frame.w),
        emu(frame.h.unwrap_or(default_height))
    )
}

fn emu(inches: f64) -> i64 {
    if inches.is_finite() {
        (inches * EMU_PER_INCH).round() as i64
    } else {
        0
    }
}

fn paragraph_align(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "l",
        TextAlign::Center => "ctr",
        TextAlign::Right => "r",
    }
}

/// Normalize `#abc`, `abc`, `aabbcc` or `#aabbcc` to `AABBCC`. Anything else
/// (`rgb(...)`, names, gradients) has no srgb form.
pub fn hex_color(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(hex.to_ascii_uppercase()),
        3 => Some(
            hex.chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_uppercase(),
        ),
        _ => None,
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn local_rel(id: &str, kind: &'static str, target: &str) -> Relationship {
    Relationship {
        id: id.to_string(),
        kind,
        target: target.to_string(),
        external: false,
    }
}

fn rels_xml(rels: &[Relationship]) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(&format!("<Relationships xmlns=\"{}\">", NS_PACKAGE_REL));
    for rel in rels {
        let mode = if rel.external {
            " TargetMode=\"External\""
        } else {
            ""
        };
        out.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
            rel.id,
            rel.kind,
            escape_xml(&rel.target),
            mode
        ));
    }
    out.push_str("</Relationships>");
    out
}

fn root_rels_xml() -> String {
    rels_xml(&[
        local_rel("rId1", REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
        local_rel("rId2", REL_CORE, "docProps/core.xml"),
    ])
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = vec![local_rel(
        "rId1",
        REL_MASTER,
        "slideMasters/slideMaster1.xml",
    )];
    for i in 1..=slide_count {
        rels.push(Relationship {
            id: format!("rId{}", i + 1),
            kind: REL_SLIDE,
            target: format!("slides/slide{}.xml", i),
            external: false,
        });
    }
    rels.push(Relationship {
        id: format!("rId{}", slide_count + 2),
        kind: REL_THEME,
        target: "theme/theme1.xml".to_string(),
        external: false,
    });
    rels_xml(&rels)
}

fn presentation_xml(slide_count: usize) -> String {
    let slide_ids: String = (1..=slide_count)
        .map(|i| format!("<p:sldId id=\"{}\" r:id=\"rId{}\"/>", 255 + i, i + 1))
        .collect();

    format!(
        "{XML_DECL}<p:presentation xmlns:a=\"{NS_DRAWING}\" xmlns:r=\"{NS_REL}\" xmlns:p=\"{NS_MAIN}\" saveSubsetFonts=\"1\">\
<p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
<p:sldIdLst>{slide_ids}</p:sldIdLst>\
<p:sldSz cx=\"{SLIDE_CX}\" cy=\"{SLIDE_CY}\"/><p:notesSz cx=\"6858000\" cy=\"9144000\"/>\
</p:presentation>"
    )
}

fn content_types_xml(slide_count: usize, media: &[MediaPart]) -> String {
    let extensions: BTreeSet<&'static str> = media.iter().map(|m| m.extension).collect();

    let mut out = String::from(XML_DECL);
    out.push_str("<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">");
    out.push_str("<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>");
    out.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");
    for ext in extensions {
        out.push_str(&format!(
            "<Default Extension=\"{}\" ContentType=\"{}\"/>",
            ext,
            media::mime_from_extension(ext)
        ));
    }

    let overrides = [
        ("/ppt/presentation.xml", "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"),
        ("/ppt/slideMasters/slideMaster1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"),
        ("/ppt/slideLayouts/slideLayout1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"),
        ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml"),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
    ];
    for (part, kind) in overrides {
        out.push_str(&format!(
            "<Override PartName=\"{}\" ContentType=\"{}\"/>",
            part, kind
        ));
    }
    for i in 1..=slide_count {
        out.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>",
            i
        ));
    }
    out.push_str("</Types>");
    out
}

fn core_xml(title: &str) -> String {
    format!(
        "{XML_DECL}<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" \
xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
<dc:title>{}</dc:title><dc:creator>Arnika</dc:creator></cp:coreProperties>",
        escape_xml(title)
    )
}

fn theme_xml(primary: &str, secondary: &str) -> String {
    let accent1 = hex_color(primary).unwrap_or_else(|| "4F46E5".to_string());
    let accent2 = hex_color(secondary).unwrap_or_else(|| "818CF8".to_string());
    let line = |w: u32| {
        format!(
            "<a:ln w=\"{}\" cap=\"flat\" cmpd=\"sng\" algn=\"ctr\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill><a:prstDash val=\"solid\"/></a:ln>",
            w
        )
    };
    let fill = "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>";
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        "{XML_DECL}<a:theme xmlns:a=\"{NS_DRAWING}\" name=\"Arnika\"><a:themeElements>\
<a:clrScheme name=\"Arnika\">\
<a:dk1><a:srgbClr val=\"1E293B\"/></a:dk1><a:lt1><a:srgbClr val=\"FFFFFF\"/></a:lt1>\
<a:dk2><a:srgbClr val=\"0F172A\"/></a:dk2><a:lt2><a:srgbClr val=\"F8FAFC\"/></a:lt2>\
<a:accent1><a:srgbClr val=\"{accent1}\"/></a:accent1><a:accent2><a:srgbClr val=\"{accent2}\"/></a:accent2>\
<a:accent3><a:srgbClr val=\"10B981\"/></a:accent3><a:accent4><a:srgbClr val=\"F59E0B\"/></a:accent4>\
<a:accent5><a:srgbClr val=\"EF4444\"/></a:accent5><a:accent6><a:srgbClr val=\"64748B\"/></a:accent6>\
<a:hlink><a:srgbClr val=\"{accent1}\"/></a:hlink><a:folHlink><a:srgbClr val=\"{accent2}\"/></a:folHlink>\
</a:clrScheme>\
<a:fontScheme name=\"Arnika\"><a:majorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
<a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont></a:fontScheme>\
<a:fmtScheme name=\"Arnika\">\
<a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst>\
<a:lnStyleLst>{l1}{l2}{l3}</a:lnStyleLst>\
<a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>\
<a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst>\
</a:fmtScheme></a:themeElements></a:theme>",
        l1 = line(6350),
        l2 = line(12700),
        l3 = line(19050),
    )
}

const GROUP_HEADER: &str = "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>";

const MASTER_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<p:sldMaster xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
<p:cSld><p:bg><p:bgRef idx=\"1001\"><a:schemeClr val=\"bg1\"/></p:bgRef></p:bg><p:spTree>\
<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
</p:spTree></p:cSld>\
<p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" accent3=\"accent3\" \
accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
<p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
<p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles>\
</p:sldMaster>";

const LAYOUT_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
<p:sldLayout xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" type=\"blank\" preserve=\"1\">\
<p:cSld name=\"Blank\"><p:spTree>\
<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
<p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/><a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#0f172a").as_deref(), Some("0F172A"));
        assert_eq!(hex_color("fff").as_deref(), Some("FFFFFF"));
        assert_eq!(hex_color("rgb(0,0,0)"), None);
        assert_eq!(hex_color("#12345"), None);
    }

    #[test]
    fn test_emu() {
        assert_eq!(emu(1.0), 914_400);
        assert_eq!(emu(10.0), SLIDE_CX);
        assert_eq!(emu(f64::NAN), 0);
    }

    #[test]
    fn test_relationship_ids_follow_layout() {
        let mut media = Vec::new();
        let mut ctx = SlideContext::new(&mut media);
        assert_eq!(ctx.relate(REL_HYPERLINK, "https://x".into(), true), "rId2");
        assert_eq!(ctx.embed("png", vec![1, 2, 3]), "rId3");
        assert_eq!(ctx.shape_id(), 2);
        drop(ctx);
        assert_eq!(media[0].file_name, "image1.png");
    }

    #[test]
    fn test_escaped_text_and_targets() {
        let xml = rels_xml(&[Relationship {
            id: "rId2".into(),
            kind: REL_HYPERLINK,
            target: "https://x.io/?a=1&b=2".into(),
            external: true,
        }]);
        assert!(xml.contains("Target=\"https://x.io/?a=1&amp;b=2\" TargetMode=\"External\""));
        assert_eq!(escape_xml("<b>\"R&D\"</b>"), "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;");
    }
}

//! Builders for small in-memory slide decks, used by tests.

use std::io::{Cursor, Write};
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::ZipWriter;

const NAMESPACES: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Relationship id the fixture slides use for their chart.
pub const CHART_REL_ID: &str = "rIdChart1";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wrap shape XML into a complete slide part.
pub fn slide_xml(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {ns}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld></p:sld>"#,
        ns = NAMESPACES,
        shapes = shapes
    )
}

/// A text box with one paragraph per entry.
pub fn text_shape(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", escape(p)))
        .collect();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="TextBox"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>"#,
        body
    )
}

/// A table graphic frame with the given cell texts.
pub fn table_shape(rows: &[&[&str]]) -> String {
    let grid: String = rows
        .first()
        .map(|r| r.iter().map(|_| "<a:gridCol w=\"1000\"/>").collect())
        .unwrap_or_default();
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| {
                    format!(
                        "<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>",
                        escape(cell)
                    )
                })
                .collect();
            format!("<a:tr h=\"370840\">{}</a:tr>", cells)
        })
        .collect();
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="4" name="Table"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr/><a:tblGrid>{}</a:tblGrid>{}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#,
        grid, body
    )
}

/// A chart graphic frame pointing at relationship `rel_id`.
pub fn chart_shape(rel_id: &str) -> String {
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="5" name="Chart"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="{}"/></a:graphicData></a:graphic></p:graphicFrame>"#,
        rel_id
    )
}

/// A picture shape.
pub fn picture_shape() -> String {
    r#"<p:pic><p:nvPicPr><p:cNvPr id="6" name="Picture"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId9"/></p:blipFill><p:spPr/></p:pic>"#.to_string()
}

/// A chart part, optionally titled.
pub fn chart_xml(title: Option<&str>) -> String {
    let title = match title {
        Some(t) => format!(
            "<c:title><c:tx><c:rich><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></c:rich></c:tx><c:overlay val=\"0\"/></c:title>",
            escape(t)
        ),
        None => "<c:autoTitleDeleted val=\"1\"/>".to_string(),
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><c:chart>{}<c:plotArea><c:layout/></c:plotArea></c:chart></c:chartSpace>"#,
        title
    )
}

#[derive(Debug, Clone)]
struct FixtureSlide {
    shapes: String,
    chart_title: Option<Option<String>>,
}

/// Builds a minimal but well-formed `.pptx` package in memory.
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    slides: Vec<FixtureSlide>,
    reverse: bool,
    presentation: bool,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            reverse: false,
            presentation: true,
        }
    }

    /// Append a slide made of the given shapes.
    pub fn slide(mut self, shapes: &[String]) -> Self {
        self.slides.push(FixtureSlide {
            shapes: shapes.concat(),
            chart_title: None,
        });
        self
    }

    /// Append a slide whose shapes are followed by a chart.
    pub fn slide_with_chart(mut self, shapes: &[String], title: Option<&str>) -> Self {
        self.slides.push(FixtureSlide {
            shapes: format!("{}{}", shapes.concat(), chart_shape(CHART_REL_ID)),
            chart_title: Some(title.map(str::to_string)),
        });
        self
    }

    /// List the slides in reverse part order in the presentation.
    pub fn reverse_order(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Leave out the presentation part, producing a broken package.
    pub fn without_presentation(mut self) -> Self {
        self.presentation = false;
        self
    }

    /// Write the package.
    pub fn build(&self) -> ZipResult<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(self.content_types().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{}/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#,
                REL_BASE
            )
            .as_bytes(),
        )?;

        if self.presentation {
            let mut order: Vec<usize> = (1..=self.slides.len()).collect();
            if self.reverse {
                order.reverse();
            }

            let ids: String = order
                .iter()
                .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 1))
                .collect();
            zip.start_file("ppt/presentation.xml", options)?;
            zip.write_all(
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {}><p:sldMasterIdLst/><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#,
                    NAMESPACES, ids
                )
                .as_bytes(),
            )?;

            let rels: String = (1..=self.slides.len())
                .map(|n| {
                    format!(
                        r#"<Relationship Id="rId{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
                        n + 1,
                        REL_BASE,
                        n
                    )
                })
                .collect();
            zip.start_file("ppt/_rels/presentation.xml.rels", options)?;
            zip.write_all(
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{}/slideMaster" Target="slideMasters/slideMaster1.xml"/>{}</Relationships>"#,
                    REL_BASE, rels
                )
                .as_bytes(),
            )?;
        }

        for (idx, slide) in self.slides.iter().enumerate() {
            let n = idx + 1;
            zip.start_file(format!("ppt/slides/slide{}.xml", n), options)?;
            zip.write_all(slide_xml(&slide.shapes).as_bytes())?;

            if let Some(title) = &slide.chart_title {
                zip.start_file(format!("ppt/slides/_rels/slide{}.xml.rels", n), options)?;
                zip.write_all(
                    format!(
                        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="{}" Type="{}/chart" Target="../charts/chart{}.xml"/></Relationships>"#,
                        CHART_REL_ID, REL_BASE, n
                    )
                    .as_bytes(),
                )?;

                zip.start_file(format!("ppt/charts/chart{}.xml", n), options)?;
                zip.write_all(chart_xml(title.as_deref()).as_bytes())?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }

    fn content_types(&self) -> String {
        let overrides: String = (1..=self.slides.len())
            .map(|n| {
                format!(
                    r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                    n
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>{}</Types>"#,
            overrides
        )
    }
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

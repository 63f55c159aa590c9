//! Chart parts: reading the chart title.

use crate::text::TextCollector;
use crate::xml::local_name;
use pdfconv_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Read the title of a chart part (`ppt/charts/chartN.xml`).
///
/// Only the chart's own `<c:title>` (a direct child of `<c:chart>`) counts;
/// axis titles are ignored. Returns `None` when the chart has no title and
/// an empty string for a title without rich text.
pub fn parse_chart_title(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut title: Option<TextCollector> = None;
    let mut title_depth = 0;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref()).to_vec();

                if let Some(text) = title.as_mut() {
                    match local.as_slice() {
                        b"p" => text.start_paragraph(),
                        b"br" => text.line_break(),
                        b"t" => in_text = true,
                        _ => {}
                    }
                } else if local == b"title" && parent_is_chart(&stack) {
                    title = Some(TextCollector::new());
                    title_depth = stack.len() + 1;
                }

                stack.push(local);
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                if let Some(text) = title.as_mut() {
                    match local {
                        b"p" => text.start_paragraph(),
                        b"br" => text.line_break(),
                        _ => {}
                    }
                } else if local == b"title" && parent_is_chart(&stack) {
                    return Ok(Some(String::new()));
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(text) = title.as_mut() {
                        let unescaped = e
                            .unescape()
                            .map_err(|e| Error::XmlError(format!("Bad chart text: {}", e)))?;
                        text.push_str(&unescaped);
                    }
                }
            }
            Ok(Event::End(_)) => {
                let depth = stack.len();
                if let Some(local) = stack.pop() {
                    if local == b"t" {
                        in_text = false;
                    }
                }
                if title.is_some() && depth == title_depth {
                    return Ok(title.map(TextCollector::into_text));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing chart: {}", e)));
            }
            _ => {}
        }
    }

    Ok(title.map(TextCollector::into_text))
}

fn parent_is_chart(stack: &[Vec<u8>]) -> bool {
    matches!(stack, [.., grandparent, parent] if parent == b"chart" && grandparent == b"chartSpace")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_WITH_TITLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <c:chart>
    <c:title>
      <c:tx><c:rich><a:bodyPr/><a:p><a:r><a:t>Sales &amp; </a:t></a:r><a:r><a:t>Returns</a:t></a:r></a:p><a:p><a:r><a:t>2024</a:t></a:r></a:p></c:rich></c:tx>
      <c:overlay val="0"/>
    </c:title>
    <c:plotArea>
      <c:valAx><c:title><c:tx><c:rich><a:p><a:r><a:t>Units</a:t></a:r></a:p></c:rich></c:tx></c:title></c:valAx>
    </c:plotArea>
  </c:chart>
</c:chartSpace>"#;

    const CHART_WITHOUT_TITLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <c:chart>
    <c:autoTitleDeleted val="1"/>
    <c:plotArea>
      <c:valAx><c:title><c:tx><c:rich><a:p><a:r><a:t>Units</a:t></a:r></a:p></c:rich></c:tx></c:title></c:valAx>
    </c:plotArea>
  </c:chart>
</c:chartSpace>"#;

    #[test]
    fn test_chart_title() {
        let title = parse_chart_title(CHART_WITH_TITLE).unwrap();
        assert_eq!(title.as_deref(), Some("Sales & Returns\n2024"));
    }

    #[test]
    fn test_axis_title_is_not_chart_title() {
        assert_eq!(parse_chart_title(CHART_WITHOUT_TITLE).unwrap(), None);
    }

    #[test]
    fn test_title_without_rich_text() {
        let xml = r#"<c:chartSpace xmlns:c="urn:c"><c:chart><c:title/></c:chart></c:chartSpace>"#;
        assert_eq!(parse_chart_title(xml).unwrap().as_deref(), Some(""));
    }
}

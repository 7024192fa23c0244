//! Askama templates for the Atom document. Values are XML-escaped by the
//! template engine; the image URL inside CDATA is only escaped in standard
//! mode.

use askama::Template;

use crate::errors::PlanFeedResult;

#[derive(Template)]
#[template(path = "atom_header.xml")]
pub struct HeaderTemplate<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub feed_url: &'a str,
    pub updated: String,
    pub author_name: &'a str,
    pub author_email: &'a str,
    pub id: &'a str,
}

/// `<gml:pos>` is written latitude first
pub struct GmlPoint {
    pub srs: &'static str,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Template)]
#[template(path = "atom_entry.xml")]
pub struct EntryTemplate<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub id: String,
    pub updated: String,
    pub image_src: Option<String>,
    /// Write `image_src` without entity escaping
    pub raw_src: bool,
    pub point: Option<GmlPoint>,
}

/// Render one block of the feed, ending in a newline.
///
/// Askama drops the final newline of a template file.
pub fn render_block<T: Template>(template: &T) -> PlanFeedResult<String> {
    let mut block = template.render()?;
    if !block.ends_with('\n') {
        block.push('\n');
    }
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry<'a>(title: &'a str, link: &'a str) -> EntryTemplate<'a> {
        EntryTemplate {
            title,
            link,
            id: "urn:publicmapping:plan:1".to_string(),
            updated: "2011-05-01T10:00:00Z".to_string(),
            image_src: None,
            raw_src: false,
            point: None,
        }
    }

    #[test]
    fn test_entry_text_is_escaped() {
        let block = render_block(&entry("A & B <test>", "https://example.org/?a=1&b=\"2\"")).unwrap();

        assert!(block.contains("<title>A &amp; B &lt;test&gt;</title>"));
        assert!(block.contains("<link href=\"https://example.org/?a=1&amp;b=&quot;2&quot;\"/>"));
    }

    #[test]
    fn test_bare_entry_has_no_optional_elements() {
        let block = render_block(&entry("Plan", "https://example.org/")).unwrap();

        assert_eq!(
            block,
            "  <entry>\n    <title>Plan</title>\n    <link href=\"https://example.org/\"/>\n    \
             <id>urn:publicmapping:plan:1</id>\n    <updated>2011-05-01T10:00:00Z</updated>\n  </entry>\n"
        );
    }

    #[test]
    fn test_image_src_escaping_follows_raw_flag() {
        let mut template = entry("Plan", "https://example.org/");
        template.image_src = Some("http://maps/wms?a=1&b=2".to_string());

        let escaped = render_block(&template).unwrap();
        assert!(escaped.contains(
            "    <content type=\"html\"><![CDATA[<img src=\"http://maps/wms?a=1&amp;b=2\" />]]></content>\n"
        ));

        template.raw_src = true;
        let raw = render_block(&template).unwrap();
        assert!(raw.contains("<img src=\"http://maps/wms?a=1&b=2\" />"));
    }

    #[test]
    fn test_point_is_latitude_first() {
        let mut template = entry("Plan", "https://example.org/");
        template.point = Some(GmlPoint {
            srs: "urn:ogc:def:crs:EPSG::3785",
            lat: 32.7,
            lon: -96.8,
        });

        let block = render_block(&template).unwrap();
        assert!(block.contains("      <gml:Point srsName=\"urn:ogc:def:crs:EPSG::3785\">\n"));
        assert!(block.contains("        <gml:pos>32.7 -96.8</gml:pos>\n"));
        assert!(block.ends_with("    </georss:where>\n  </entry>\n"));
    }
}

use crate::fetch;
use scraper::{Html, Selector};

/// Class-name markers that identify the info-box table on a detail page.
pub const INFOBOX_CLASS_MARKERS: &[&str] = &["infobox", "roundy"];

/// Fetches a detail page and returns the info-box image URL, if any. Detail
/// pages are best-effort: fetch failures of any kind degrade to `None`
/// rather than aborting the run.
pub fn locate_creature_image(agent: &ureq::Agent, detail_url: &str) -> Option<String> {
    let document = fetch::fetch_html(agent, detail_url).ok()?;
    find_infobox_image(&document)
}

/// Finds the first image inside the first info-box-like table. A
/// scheme-relative `//host/...` source is made absolute with `https:`; any
/// other value is returned untouched.
pub fn find_infobox_image(document: &Html) -> Option<String> {
    let table_selector = Selector::parse("table").expect("table selector");
    let img_selector = Selector::parse("img").expect("img selector");

    let info_table = document.select(&table_selector).find(|table| {
        class_matches_any(table.value().attr("class").unwrap_or(""), INFOBOX_CLASS_MARKERS)
    })?;

    let src = info_table
        .select(&img_selector)
        .next()?
        .value()
        .attr("src")?;
    if src.is_empty() {
        return None;
    }
    Some(absolutize_scheme_relative(src))
}

pub(crate) fn class_matches_any(class_attr: &str, markers: &[&str]) -> bool {
    let lowered = class_attr.to_ascii_lowercase();
    markers.iter().any(|marker| lowered.contains(marker))
}

fn absolutize_scheme_relative(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else {
        src.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_infobox_table_yields_none() {
        let html = r#"
        <html><body>
          <table class="navigation"><tr><td><img src="/nav.png" /></td></tr></table>
        </body></html>
        "#;
        let doc = Html::parse_document(html);
        assert!(find_infobox_image(&doc).is_none());
    }

    #[test]
    fn scheme_relative_src_becomes_https() {
        let html = r#"
        <html><body>
          <table class="roundy infobox">
            <tr><td><img src="//upload.example/x.png" /></td></tr>
          </table>
        </body></html>
        "#;
        let doc = Html::parse_document(html);
        assert_eq!(
            find_infobox_image(&doc).as_deref(),
            Some("https://upload.example/x.png")
        );
    }

    #[test]
    fn absolute_src_is_returned_as_is() {
        let html = r#"
        <html><body>
          <table class="infobox"><tr><td><img src="https://cdn.example/a.jpg" /></td></tr></table>
        </body></html>
        "#;
        let doc = Html::parse_document(html);
        assert_eq!(
            find_infobox_image(&doc).as_deref(),
            Some("https://cdn.example/a.jpg")
        );
    }

    #[test]
    fn infobox_without_image_yields_none() {
        let html = r#"
        <html><body>
          <table class="infobox"><tr><td>stats only</td></tr></table>
        </body></html>
        "#;
        let doc = Html::parse_document(html);
        assert!(find_infobox_image(&doc).is_none());
    }

    #[test]
    fn image_without_src_yields_none() {
        let html = r#"
        <html><body>
          <table class="infobox"><tr><td><img alt="missing" /></td></tr></table>
        </body></html>
        "#;
        let doc = Html::parse_document(html);
        assert!(find_infobox_image(&doc).is_none());
    }

    #[test]
    fn first_matching_table_wins() {
        let html = r#"
        <html><body>
          <table class="roundy"><tr><td><img src="//one.example/1.png" /></td></tr></table>
          <table class="infobox"><tr><td><img src="//two.example/2.png" /></td></tr></table>
        </body></html>
        "#;
        let doc = Html::parse_document(html);
        assert_eq!(
            find_infobox_image(&doc).as_deref(),
            Some("https://one.example/1.png")
        );
    }
}

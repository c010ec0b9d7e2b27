use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use url::Url;

/// One entity extracted from a listing row. The index is whatever numeric
/// token the source prints in the first cell; it is not guaranteed unique or
/// contiguous.
#[derive(Debug, Clone, Serialize)]
pub struct CreatureRecord {
    pub index: u32,
    pub name: String,
    pub detail_url: String,
}

/// Extracts a record from one `tr` node, or `None` for anything that is not
/// a data row (header rows, rows without a numeric first cell, rows without
/// a link). Absence here is a normal skip outcome, not an error.
pub fn extract_creature_record(row: &ElementRef<'_>, base_url: &Url) -> Option<CreatureRecord> {
    let cell_selector = Selector::parse("td").expect("td selector");
    let link_selector = Selector::parse("a[href]").expect("anchor selector");

    let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
    if cells.len() < 3 {
        return None;
    }

    let index_re = Regex::new(r"\d+").expect("digit regex");
    let first_cell = element_text(&cells[0]);
    let index = index_re
        .find(&first_cell)
        .and_then(|m| m.as_str().parse::<u32>().ok())?;

    let link = row.select(&link_selector).next()?;
    let href = link.value().attr("href")?;
    let detail_url = base_url.join(href).ok()?.to_string();

    Some(CreatureRecord {
        index,
        name: element_text(&link),
        detail_url,
    })
}

pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

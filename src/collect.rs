use crate::listing::{extract_creature_record, CreatureRecord};
use crate::locate::{class_matches_any, locate_creature_image};
use crate::sanitize::sanitize_filename;
use crate::{download, fetch, Result, ScrapeError};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use url::Url;

pub const BASE_URL: &str = "https://bulbapedia.bulbagarden.net";
pub const LIST_URL: &str =
    "https://bulbapedia.bulbagarden.net/wiki/List_of_Pok%C3%A9mon_by_National_Pok%C3%A9dex_number";

/// Class-name markers that identify data tables on the listing page.
pub const LISTING_TABLE_MARKERS: &[&str] = &["roundy", "sortable"];

pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_OUTPUT_DIR: &str = "collected_data";
pub const DEFAULT_DELAY_MS: u64 = 1_000;
const MAX_DELAY_MS: u64 = 60_000;
const DEFAULT_IMAGE_EXT: &str = ".png";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectRequest {
    pub list_url: String,
    pub base_url: String,
    pub output_dir: PathBuf,
    /// Maximum number of records to process; `None` means unlimited.
    pub limit: Option<usize>,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectSummary {
    /// Valid records extracted from listing rows.
    pub records_seen: usize,
    pub images_saved: usize,
    pub missing_images: usize,
    pub failed_downloads: usize,
    pub output_dir: String,
}

pub fn build_collect_request(
    list_url: &str,
    base_url: &str,
    output_dir: PathBuf,
    limit: Option<usize>,
    delay_ms: u64,
) -> Result<CollectRequest> {
    validate_http_url(list_url)?;
    validate_http_url(base_url)?;

    Ok(CollectRequest {
        list_url: list_url.to_string(),
        base_url: base_url.to_string(),
        output_dir,
        limit: limit.filter(|v| *v > 0),
        delay_ms: delay_ms.min(MAX_DELAY_MS),
    })
}

/// Runs the whole pass: listing fetch, per-row extraction, image location,
/// download, pacing. Only the listing fetch itself can fail the run; every
/// per-record failure is logged through `log_line` and skipped.
///
/// A record counts toward the limit once its image URL has been resolved
/// (i.e. a download was attempted, successful or not). Records with no
/// locatable image are logged and still pace the run, but never consume the
/// limit.
pub fn run_collection<FLog>(request: &CollectRequest, mut log_line: FLog) -> Result<CollectSummary>
where
    FLog: FnMut(&str, &str, serde_json::Value),
{
    std::fs::create_dir_all(&request.output_dir)?;

    let base_url = Url::parse(&request.base_url)
        .map_err(|_| ScrapeError::InvalidUrl(request.base_url.clone()))?;
    let agent = fetch::build_agent();

    let listing = fetch::fetch_html(&agent, &request.list_url)?;
    let table_selector = Selector::parse("table").expect("table selector");
    let row_selector = Selector::parse("tr").expect("tr selector");

    let mut records_seen = 0_usize;
    let mut images_saved = 0_usize;
    let mut missing_images = 0_usize;
    let mut failed_downloads = 0_usize;
    let mut attempted = 0_usize;

    for table in listing.select(&table_selector).filter(|table| {
        class_matches_any(
            table.value().attr("class").unwrap_or(""),
            LISTING_TABLE_MARKERS,
        )
    }) {
        for row in table.select(&row_selector) {
            let Some(record) = extract_creature_record(&row, &base_url) else {
                continue;
            };
            records_seen += 1;

            log_line(
                "info",
                "processing_record",
                serde_json::json!({
                    "index": record.index,
                    "name": record.name,
                }),
            );

            let Some(image_url) = locate_creature_image(&agent, &record.detail_url) else {
                log_line(
                    "warn",
                    "no_image_found",
                    serde_json::json!({
                        "index": record.index,
                        "name": record.name,
                        "detail_url": record.detail_url,
                    }),
                );
                missing_images += 1;
                pace(request.delay_ms);
                continue;
            };

            let out_path = request
                .output_dir
                .join(image_filename(&record, &image_url));
            match download::save_image(&agent, &image_url, &out_path) {
                Ok(()) => {
                    images_saved += 1;
                    log_line(
                        "info",
                        "image_saved",
                        serde_json::json!({
                            "index": record.index,
                            "path": out_path.to_string_lossy(),
                        }),
                    );
                }
                Err(err) => {
                    failed_downloads += 1;
                    log_line(
                        "error",
                        "image_download_failed",
                        serde_json::json!({
                            "index": record.index,
                            "image_url": image_url,
                            "error": err.to_string(),
                        }),
                    );
                }
            }

            attempted += 1;
            if let Some(limit) = request.limit {
                if attempted >= limit {
                    log_line(
                        "info",
                        "limit_reached",
                        serde_json::json!({ "limit": limit }),
                    );
                    return Ok(summary(
                        records_seen,
                        images_saved,
                        missing_images,
                        failed_downloads,
                        &request.output_dir,
                    ));
                }
            }

            pace(request.delay_ms);
        }
    }

    Ok(summary(
        records_seen,
        images_saved,
        missing_images,
        failed_downloads,
        &request.output_dir,
    ))
}

fn summary(
    records_seen: usize,
    images_saved: usize,
    missing_images: usize,
    failed_downloads: usize,
    output_dir: &Path,
) -> CollectSummary {
    CollectSummary {
        records_seen,
        images_saved,
        missing_images,
        failed_downloads,
        output_dir: output_dir.to_string_lossy().to_string(),
    }
}

fn pace(delay_ms: u64) {
    if delay_ms > 0 {
        thread::sleep(Duration::from_millis(delay_ms));
    }
}

/// `<4-digit zero-padded index>_<sanitized name><ext>`. Naming is a pure
/// function of the record, so re-runs overwrite rather than duplicate.
pub fn image_filename(record: &CreatureRecord, image_url: &str) -> String {
    format!(
        "{:04}_{}{}",
        record.index,
        sanitize_filename(&record.name),
        image_extension(image_url)
    )
}

fn image_extension(image_url: &str) -> String {
    let path = Url::parse(image_url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| image_url.to_string());
    match Path::new(&path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_ascii_lowercase()),
        _ => DEFAULT_IMAGE_EXT.to_string(),
    }
}

fn validate_http_url(value: &str) -> Result<()> {
    let parsed = Url::parse(value).map_err(|_| ScrapeError::InvalidUrl(value.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScrapeError::InvalidUrl(value.to_string()));
    }
    if parsed.host_str().is_none() {
        return Err(ScrapeError::InvalidUrl(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: u32, name: &str) -> CreatureRecord {
        CreatureRecord {
            index,
            name: name.to_string(),
            detail_url: "https://wiki.example/wiki/x".to_string(),
        }
    }

    #[test]
    fn filename_pads_index_and_sanitizes_name() {
        assert_eq!(
            image_filename(&record(4, "Charmander"), "https://cdn.example/char.png"),
            "0004_Charmander.png"
        );
        assert_eq!(
            image_filename(&record(29, "Nidoran\u{2640}"), "https://cdn.example/n.jpg"),
            "0029_Nidoran.jpg"
        );
    }

    #[test]
    fn extension_defaults_to_png_when_path_has_none() {
        assert_eq!(image_extension("https://cdn.example/sprite"), ".png");
        assert_eq!(image_extension("https://cdn.example/a.JPG?x=1"), ".jpg");
        assert_eq!(image_extension("https://cdn.example/dir/"), ".png");
    }

    #[test]
    fn build_request_validates_urls() {
        assert!(build_collect_request(
            "ftp://example.com/list",
            BASE_URL,
            PathBuf::from("out"),
            None,
            0,
        )
        .is_err());
        assert!(build_collect_request(
            LIST_URL,
            "not a url",
            PathBuf::from("out"),
            None,
            0,
        )
        .is_err());
    }

    #[test]
    fn build_request_clamps_delay_and_drops_zero_limit() {
        let request = build_collect_request(
            LIST_URL,
            BASE_URL,
            PathBuf::from("out"),
            Some(0),
            999_999,
        )
        .expect("request");
        assert_eq!(request.limit, None);
        assert_eq!(request.delay_ms, MAX_DELAY_MS);
    }
}

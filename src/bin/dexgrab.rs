use std::path::PathBuf;

use dexgrab::collect::{
    self, BASE_URL, DEFAULT_DELAY_MS, DEFAULT_LIMIT, DEFAULT_OUTPUT_DIR, LIST_URL,
};

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return Ok(());
    }

    let mut limit: usize = DEFAULT_LIMIT;
    let mut output = PathBuf::from(DEFAULT_OUTPUT_DIR);
    let mut delay_ms: u64 = DEFAULT_DELAY_MS;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| "--limit requires a value".to_string())?;
                limit = v
                    .parse::<usize>()
                    .map_err(|_| format!("--limit expects an integer, got {v}"))?;
            }
            "--output" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| "--output requires a value".to_string())?;
                output = PathBuf::from(v);
            }
            "--delay" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| "--delay requires a value".to_string())?;
                let seconds = v
                    .parse::<f64>()
                    .map_err(|_| format!("--delay expects seconds, got {v}"))?;
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(format!("--delay must be non-negative, got {v}"));
                }
                delay_ms = (seconds * 1000.0) as u64;
            }
            other => return Err(format!("unknown arg: {other} (try --help)")),
        }
        i += 1;
    }

    let request = collect::build_collect_request(
        LIST_URL,
        BASE_URL,
        output,
        Some(limit),
        delay_ms,
    )
    .map_err(|e| e.to_string())?;

    let summary = collect::run_collection(&request, console_log).map_err(|e| e.to_string())?;

    println!(
        "done: {} records, {} saved, {} missing image, {} failed (output: {})",
        summary.records_seen,
        summary.images_saved,
        summary.missing_images,
        summary.failed_downloads,
        summary.output_dir,
    );

    Ok(())
}

fn console_log(level: &str, event: &str, payload: serde_json::Value) {
    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
    eprintln!("{ts} {:<5} {event} {payload}", level.to_uppercase());
}

fn print_help() {
    println!(
        r#"dexgrab

Downloads creature images from the National Pokedex listing: fetches the
listing page, follows each entry's detail link, and saves the info-box image
under <output>/<4-digit index>_<name><ext>.

Usage:
  dexgrab [--limit 5] [--output collected_data] [--delay 1.0]

Options:
  --limit <int>     Maximum records to process; 0 means no limit (default: 5)
  --output <path>   Output directory, created if absent (default: collected_data)
  --delay <secs>    Pause after each record, in seconds (default: 1.0)
"#
    );
}

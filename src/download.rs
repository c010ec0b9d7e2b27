use crate::fetch;
use crate::Result;
use std::path::Path;

/// Downloads `url` and writes the full body to `dest`, overwriting any
/// existing file. The write only happens after a fully successful response,
/// so a failure never leaves a partial file behind. The containing directory
/// is created once by the orchestrator, not here.
pub fn save_image(agent: &ureq::Agent, url: &str, dest: &Path) -> Result<()> {
    let bytes = fetch::fetch_bytes(agent, url)?;
    std::fs::write(dest, bytes)?;
    Ok(())
}

//! `wbm --jsonmap URL` – one JSON object per captured URL.

use anyhow::Result;
use wbm_core::client::ArchiveClient;
use wbm_core::timemap::TimeRange;

pub fn run_jsonmap(client: &ArchiveClient, url: &str, range: &TimeRange) -> Result<()> {
    let mut count = 0usize;
    for record in client.jsonmap(url, range)? {
        println!("{}", serde_json::to_string(&record?)?);
        count += 1;
    }
    tracing::info!("jsonmap for {} listed {} records", url, count);
    Ok(())
}

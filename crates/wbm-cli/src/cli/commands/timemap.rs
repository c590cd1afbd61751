//! `wbm --timemap URL` – list the relations of the link timemap.

use anyhow::Result;
use wbm_core::client::ArchiveClient;
use wbm_core::timemap::TimemapRecord;

pub fn run_timemap(client: &ArchiveClient, url: &str) -> Result<()> {
    for record in client.timemap(url)? {
        println!("{}", timemap_line(&record));
    }
    Ok(())
}

fn timemap_line(record: &TimemapRecord) -> String {
    format!(
        "{:<20} {:<30} {}",
        record.relation,
        record.datetime.as_deref().unwrap_or("-"),
        record.target
    )
}

//! `wbm --printtime URL` – fetch and print every memento of a URL.

use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use wbm_core::client::ArchiveClient;
use wbm_core::mirror::fetch_mementos;

pub fn run_printtime(client: &ArchiveClient, url: &str, interval: Duration) -> Result<()> {
    let stdout = std::io::stdout();
    let count = fetch_mementos(client, url, interval, |record, response| {
        let mut out = stdout.lock();
        writeln!(out, "==> {} <==", record.target)?;
        out.write_all(&response.body)?;
        writeln!(out)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    })?;
    tracing::info!("printed {} mementos of {}", count, url);
    Ok(())
}

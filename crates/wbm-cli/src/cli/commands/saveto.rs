//! `wbm --saveto DIR URL` – mirror every capture under the URL prefix.

use anyhow::Result;
use wbm_core::client::ArchiveClient;
use wbm_core::mirror::{Mirror, MirrorEvent, MirrorOptions};
use wbm_core::timemap::TimeRange;

pub fn run_saveto(
    client: &ArchiveClient,
    url: &str,
    range: &TimeRange,
    options: MirrorOptions,
) -> Result<()> {
    let summary = Mirror::new(client, options).run(url, range, |event| match event {
        MirrorEvent::Saving {
            timestamp,
            original,
            ..
        } => println!("saving {}: {}", timestamp, original),
        MirrorEvent::AlreadyPresent { original, .. } => println!("{} already there", original),
        MirrorEvent::Saved { .. } => {}
    })?;

    println!(
        "saved {}, skipped {}, http errors {}",
        summary.saved, summary.skipped, summary.http_errors
    );
    Ok(())
}

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Run one scoring pass over an activity feed from disk
//!
//! The in-process equivalent of a sync request: the activities file holds
//! the provider-shaped JSON array, the optional profile file holds the
//! athlete state a storage layer would supply, and the output is the
//! scoring outcome plus the updated profile for that layer to persist.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde_json::json;
use tracing::info;

use stride_score::logging;
use stride_score::models::{parse_activity_feed, AthleteProfile};
use stride_score::scoring::run_scoring_pass;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the activity feed (JSON array of provider records)
    activities: PathBuf,

    /// Path to a previously persisted athlete profile (JSON); a fresh
    /// profile is used when omitted
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Override the clock (RFC 3339) for reproducible runs
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_from_env()?;

    let args = Args::parse();

    let raw = fs::read_to_string(&args.activities)
        .with_context(|| format!("Failed to read {}", args.activities.display()))?;
    let activities = parse_activity_feed(&raw).context("Failed to decode activity feed")?;

    let mut profile = match &args.profile {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw).context("Failed to decode athlete profile")?
        }
        None => AthleteProfile::new("Unknown Runner", "runner"),
    };

    let now = args.now.unwrap_or_else(Utc::now);
    info!(feed_size = activities.len(), %now, "Running scoring pass");

    let output = match run_scoring_pass(&mut profile, &activities, now) {
        Some(outcome) => json!({
            "outcome": outcome,
            "profile": profile,
        }),
        None => json!({
            "message": "No running activities found",
            "profile": profile,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

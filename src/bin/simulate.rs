//! One-shot scenario run.
//!
//! Usage: simulate [--duration H] [--intensity MM_HR] [--magnitude M]
//!                 [--soil PCT] [--wind KMH] [--zones]

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rockguard::dashboard::RiskMapPage;
use rockguard::scenario::{Param, ScenarioInputs};
use serde_json::json;

fn main() -> Result<()> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut show_zones = false;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        if arg == "--zones" {
            show_zones = true;
            continue;
        }
        let Some(key) = arg.strip_prefix("--") else {
            bail!("unexpected argument {:?}", arg);
        };
        if Param::parse(key).is_none() {
            bail!("unknown input --{}", key);
        }
        let value = it.next().with_context(|| format!("--{} needs a value", key))?;
        pairs.push((key.to_string(), value));
    }

    let inputs = ScenarioInputs::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    let now = Utc::now();
    let mut page = RiskMapPage::with_inputs(inputs, now);
    let result = page.run(now)?.clone();

    let out = if show_zones {
        json!({
            "result": result,
            "zone_counts": page.zone_counts(),
            "zones": page.zones(),
        })
    } else {
        serde_json::to_value(&result)?
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

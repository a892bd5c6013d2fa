//! Command line of the `rockguard` dashboard.
//!
//! Flags map onto page actions: scenario inputs go through the risk map
//! setters, `--run` runs the simulation, month and task flags drive the
//! maintenance page.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use crate::content::AlertAction;
use crate::dashboard::Pages;
use crate::i18n::Locale;
use crate::maintenance::MonthCursor;
use crate::scenario::{Param, ScenarioInputs};

pub const USAGE: &str = "\
Usage: rockguard [ROUTE] [--locale en|hi]
                 [--duration H] [--intensity MM_HR] [--magnitude M] [--soil PCT] [--wind KMH] [--run]
                 [--month YYYY-MM] [--prev-month] [--next-month] [--task ID]
                 [--alert ack|share]
Routes: / /risk-map /explainable-ai /incidents /maintenance";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardArgs {
    pub path: String,
    pub locale: Option<Locale>,
    /// Scenario inputs in the order given.
    pub inputs: Vec<(Param, f64)>,
    pub run: bool,
    pub month: Option<MonthCursor>,
    /// Net months to move after `month` is applied.
    pub month_steps: i32,
    pub task: Option<String>,
    pub alert: Option<AlertAction>,
    pub help: bool,
}

pub fn parse_month(raw: &str) -> Result<MonthCursor> {
    let (y, m) = raw
        .trim()
        .split_once('-')
        .with_context(|| format!("month must be YYYY-MM, got {:?}", raw))?;
    let year: i32 = y.parse().with_context(|| format!("invalid year in {:?}", raw))?;
    let month: u32 = m.parse().with_context(|| format!("invalid month in {:?}", raw))?;
    MonthCursor::new(year, month)
}

impl DashboardArgs {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut out = Self {
            path: "/".to_string(),
            ..Self::default()
        };
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            let mut value = |flag: &str| it.next().with_context(|| format!("{} needs a value", flag));
            match arg.as_str() {
                "--locale" => {
                    let raw = value("--locale")?;
                    match Locale::parse(&raw) {
                        Some(l) => out.locale = Some(l),
                        None => bail!("unsupported locale {:?} (expected en or hi)", raw),
                    }
                }
                "--run" => out.run = true,
                "--month" => out.month = Some(parse_month(&value("--month")?)?),
                "--prev-month" => out.month_steps -= 1,
                "--next-month" => out.month_steps += 1,
                "--task" => out.task = Some(value("--task")?),
                "--alert" => {
                    let raw = value("--alert")?;
                    match AlertAction::parse(&raw) {
                        Some(a) => out.alert = Some(a),
                        None => bail!("unknown alert action {:?} (expected ack or share)", raw),
                    }
                }
                "--help" | "-h" => out.help = true,
                flag if flag.starts_with("--") => {
                    let key = &flag[2..];
                    if Param::parse(key).is_none() {
                        bail!("unknown flag {}", flag);
                    }
                    pairs.push((key.to_string(), value(flag)?));
                }
                route => out.path = route.to_string(),
            }
        }

        // validation shared with the simulate tool
        let parsed = ScenarioInputs::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        out.inputs = pairs
            .iter()
            .filter_map(|(k, _)| Param::parse(k))
            .map(|p| (p, parsed.get(p)))
            .collect();
        Ok(out)
    }

    /// Apply page actions in a fixed order: inputs, run, month, task, alert.
    pub fn apply(&self, pages: &mut Pages, now: DateTime<Utc>) -> Result<()> {
        for &(param, value) in &self.inputs {
            pages.risk_map.set(param, value);
        }
        if self.run {
            pages.risk_map.run(now)?;
        }

        if let Some(month) = self.month {
            pages.maintenance.show_month(month);
        }
        for _ in 0..self.month_steps.unsigned_abs() {
            if self.month_steps < 0 {
                pages.maintenance.prev_month();
            } else {
                pages.maintenance.next_month();
            }
        }

        if let Some(id) = &self.task {
            if pages.maintenance.select(id).is_none() {
                bail!("unknown task {:?}", id);
            }
        }
        if let Some(action) = self.alert {
            pages.take_alert_action(action);
        }
        Ok(())
    }
}

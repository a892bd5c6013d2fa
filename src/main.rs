use anyhow::{Context, Result};
use chrono::Utc;
use rockguard::cli::{DashboardArgs, USAGE};
use rockguard::dashboard::{home_summary, render_path, schedule_home_refresh, Pages};
use rockguard::i18n::I18n;
use rockguard::logging::{log, obj, run_id, v_str, Domain, Level};
use rockguard::state::Config;
use rockguard::storage::SettingsStore;
use serde_json::json;
use tokio::time::{interval, MissedTickBehavior};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let args = DashboardArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }
    let store = SettingsStore::open(&cfg.db_path)
        .with_context(|| format!("opening settings at {}", cfg.db_path))?;
    let mut i18n = I18n::load(store)?;
    if let Some(locale) = args.locale {
        i18n.set_locale(locale)?;
    }

    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("run_id", v_str(run_id())),
            ("route", v_str(&args.path)),
            ("locale", v_str(i18n.locale().as_str())),
            ("refresh_secs", json!(cfg.refresh_secs)),
        ]),
    );

    let mut pages = Pages::mount(Utc::now(), cfg.display_offset());
    args.apply(&mut pages, Utc::now())?;
    let tasks = schedule_home_refresh(&pages.home, cfg.refresh_period());

    let mut ticker = interval(cfg.refresh_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut drawn = 0u64;
    loop {
        ticker.tick().await;
        print!("\x1b[2J\x1b[H{}", render_path(&args.path, &i18n, &pages)?);
        drawn += 1;
        if cfg.render_ticks > 0 && drawn >= cfg.render_ticks {
            break;
        }
    }

    for task in tasks {
        task.cancel();
    }
    let summary = match pages.home.lock() {
        Ok(home) => home_summary(&home),
        Err(_) => json!(null),
    };
    log(
        Level::Info,
        Domain::System,
        "shutdown",
        obj(&[("frames", json!(drawn)), ("home", summary)]),
    );
    Ok(())
}

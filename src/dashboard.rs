//! Page state and text rendering.
//!
//! Each page owns its derived state. The home page is refreshed by two
//! periodic tasks (sectors, series); every refresh replaces the previous
//! value under one lock, so a render never sees half an update.

use std::fmt::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde_json::json;

use crate::chart::{draw_risk_series, draw_series};
use crate::content::{self, AlertAction};
use crate::forecast::{build_series, RiskSeries};
use crate::i18n::I18n;
use crate::logging::{
    log, log_audit, log_refresh, log_route_miss, obj, params_hash, v_num, v_str, Domain, Level,
    ProfileScope,
};
use crate::maintenance::{
    build_calendar, calendar_title, seed_tasks, tasks_on, MonthCursor, Task, WEEKDAY_HEADERS,
};
use crate::routes::{Route, NAV_ITEMS};
use crate::scenario::{run_simulation, zone_counts, zone_field, Param, ScenarioInputs, SimulationResult, Zone, ZoneCounts};
use crate::scheduler::PeriodicTask;
use crate::sectors::{generate_sectors, hour_bucket, sectors_at_level, RiskCounts, RiskLevel, Sector};
use crate::storage::KeyValueStore;

// =============================================================================
// Home
// =============================================================================

#[derive(Debug, Clone)]
pub struct HomePage {
    offset: FixedOffset,
    sectors: Vec<Sector>,
    counts: RiskCounts,
    series: RiskSeries,
}

impl HomePage {
    /// Initial state, computed synchronously.
    pub fn mount(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let sectors = generate_sectors(now);
        let counts = RiskCounts::from_sectors(&sectors);
        Self {
            series: build_series(now, &offset),
            offset,
            sectors,
            counts,
        }
    }

    pub fn refresh_sectors(&mut self, now: DateTime<Utc>) {
        let _scope = ProfileScope::new("refresh_sectors");
        let sectors = generate_sectors(now);
        self.counts = RiskCounts::from_sectors(&sectors);
        self.sectors = sectors;
        log_refresh("sectors", self.sectors.len(), hour_bucket(now));
    }

    pub fn refresh_series(&mut self, now: DateTime<Utc>) {
        let _scope = ProfileScope::new("refresh_series");
        self.series = build_series(now, &self.offset);
        log_refresh("series", self.series.len(), hour_bucket(now));
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn counts(&self) -> RiskCounts {
        self.counts
    }

    pub fn series(&self) -> &RiskSeries {
        &self.series
    }

    /// Detail list for one stat card, highest score first.
    pub fn details(&self, level: RiskLevel) -> Vec<&Sector> {
        sectors_at_level(&self.sectors, level)
    }
}

pub type SharedHome = Arc<Mutex<HomePage>>;

/// Register the two home refresh timers. Dropping the tasks stops them.
pub fn schedule_home_refresh(home: &SharedHome, period: Duration) -> Vec<PeriodicTask> {
    let sectors_home = Arc::clone(home);
    let series_home = Arc::clone(home);
    vec![
        PeriodicTask::spawn("sectors", period, move || {
            if let Ok(mut page) = sectors_home.lock() {
                page.refresh_sectors(Utc::now());
            }
        }),
        PeriodicTask::spawn("series", period, move || {
            if let Ok(mut page) = series_home.lock() {
                page.refresh_series(Utc::now());
            }
        }),
    ]
}

// =============================================================================
// Risk map
// =============================================================================

#[derive(Debug, Clone)]
pub struct RiskMapPage {
    inputs: ScenarioInputs,
    zones: Vec<Zone>,
    result: Option<SimulationResult>,
    last_run: DateTime<Utc>,
}

impl RiskMapPage {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_inputs(ScenarioInputs::default(), now)
    }

    pub fn with_inputs(inputs: ScenarioInputs, now: DateTime<Utc>) -> Self {
        let inputs = inputs.clamped();
        Self {
            zones: zone_field(&inputs),
            inputs,
            result: None,
            last_run: now,
        }
    }

    /// Move one input; the zone field follows immediately.
    pub fn set(&mut self, param: Param, value: f64) {
        self.inputs.set(param, value);
        self.zones = zone_field(&self.inputs);
    }

    pub fn inputs(&self) -> &ScenarioInputs {
        &self.inputs
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone_counts(&self) -> ZoneCounts {
        zone_counts(&self.inputs)
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn last_run(&self) -> DateTime<Utc> {
        self.last_run
    }

    /// Explicit run; replaces the previous result.
    pub fn run(&mut self, now: DateTime<Utc>) -> Result<&SimulationResult> {
        let result = run_simulation(&self.inputs, now);
        let out = serde_json::to_string(&(
            result.high_risk_areas,
            result.evacuation_minutes,
            result.incident_probability,
            result.confidence,
            result.driver,
        ))?;
        log_audit(
            "simulation",
            &params_hash(&self.inputs.canonical()),
            &params_hash(&out),
        );
        log(
            Level::Info,
            Domain::Model,
            "simulation_completed",
            obj(&[
                ("driver", v_str(result.driver.label())),
                ("high_risk_areas", v_num(result.high_risk_areas as f64)),
                ("incident_probability", v_num(result.incident_probability as f64)),
                ("msg", v_str(&format!("Simulation completed. Dominant driver: {}.", result.driver))),
            ]),
        );
        self.last_run = now;
        let stored: &SimulationResult = self.result.insert(result);
        Ok(stored)
    }
}

// =============================================================================
// Maintenance
// =============================================================================

#[derive(Debug, Clone)]
pub struct MaintenancePage {
    tasks: Vec<Task>,
    cursor: MonthCursor,
    selected: Option<String>,
}

impl MaintenancePage {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            tasks: seed_tasks(),
            cursor: MonthCursor::containing(today),
            selected: None,
        }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn prev_month(&mut self) {
        self.cursor = self.cursor.prev();
    }

    pub fn next_month(&mut self) {
        self.cursor = self.cursor.next();
    }

    pub fn show_month(&mut self, cursor: MonthCursor) {
        self.cursor = cursor;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Select a task by id; unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: &str) -> Option<&Task> {
        if self.tasks.iter().any(|t| t.id == id) {
            self.selected = Some(id.to_string());
        }
        self.selected()
    }

    pub fn selected(&self) -> Option<&Task> {
        let id = self.selected.as_deref()?;
        self.tasks.iter().find(|t| t.id == id)
    }
}

// =============================================================================
// Pages + rendering
// =============================================================================

pub struct Pages {
    pub home: SharedHome,
    pub risk_map: RiskMapPage,
    pub maintenance: MaintenancePage,
    pub today: NaiveDate,
    /// Last action taken on the evacuation alert.
    pub alert: Option<AlertAction>,
}

impl Pages {
    pub fn mount(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = now.with_timezone(&offset).date_naive();
        Self {
            home: Arc::new(Mutex::new(HomePage::mount(now, offset))),
            risk_map: RiskMapPage::new(now),
            maintenance: MaintenancePage::new(today),
            today,
            alert: None,
        }
    }

    /// Take an alert action and return its confirmation.
    pub fn take_alert_action(&mut self, action: AlertAction) -> &'static str {
        log(
            Level::Info,
            Domain::Audit,
            "alert_action",
            obj(&[
                ("action", json!(action)),
                ("sector", v_str(content::FOCUS_SECTOR)),
                ("msg", v_str(action.confirmation())),
            ]),
        );
        self.alert = Some(action);
        action.confirmation()
    }
}

/// Render the page for `path`. Unknown paths log a warning and render 404.
pub fn render_path<S: KeyValueStore>(path: &str, i18n: &I18n<S>, pages: &Pages) -> Result<String> {
    let route = Route::resolve(path);
    if route == Route::NotFound {
        log_route_miss(path);
    }
    let mut out = String::new();
    render_header(&mut out, i18n, route)?;
    match route {
        Route::Dashboard => {
            let home = pages
                .home
                .lock()
                .map_err(|_| anyhow!("home page state poisoned"))?;
            render_home(&mut out, i18n, &home)?
        }
        Route::RiskMap => render_risk_map(&mut out, &pages.risk_map)?,
        Route::ExplainableAi => render_explainable_ai(&mut out, pages.alert)?,
        Route::Incidents => render_incidents(&mut out)?,
        Route::Maintenance => render_maintenance(&mut out, &pages.maintenance, pages.today)?,
        Route::NotFound => render_not_found(&mut out)?,
    }
    Ok(out)
}

fn render_header<S: KeyValueStore>(out: &mut String, i18n: &I18n<S>, active: Route) -> std::fmt::Result {
    write!(out, "RockGuard AI |")?;
    for item in NAV_ITEMS {
        let label = item.nav_key().map(|k| i18n.t(k)).unwrap_or("");
        if item == active {
            write!(out, " [{}]", label)?;
        } else {
            write!(out, " {}", label)?;
        }
    }
    writeln!(out, " | {}", i18n.locale().as_str())?;
    writeln!(out, "{}", "=".repeat(72))
}

pub fn render_home<S: KeyValueStore>(out: &mut String, i18n: &I18n<S>, home: &HomePage) -> std::fmt::Result {
    writeln!(out, "{} {}", i18n.t("heroTitle"), i18n.t("heroPredictive"))?;
    writeln!(out, "{}", i18n.t("heroSubtitle"))?;
    writeln!(out, "{}", i18n.t("predictPreventProtect"))?;
    writeln!(out, "-> {} (/risk-map)", i18n.t("viewRiskMap"))?;
    writeln!(out)?;

    let counts = home.counts();
    let (online, total) = content::systems_online();
    writeln!(
        out,
        "High Risk Areas: {}  Moderate Risk: {}  Low Risk: {}  Systems Online: {}/{}",
        counts.high, counts.moderate, counts.low, online, total
    )?;
    writeln!(out)?;

    for level in RiskLevel::ALL {
        let list = home.details(level);
        writeln!(out, "{} risk areas:", level.as_str().to_uppercase())?;
        if list.is_empty() {
            writeln!(out, "  No areas in this category right now.")?;
        }
        for s in list {
            writeln!(
                out,
                "  {:<10} {} • {:>3}  Reason: {}",
                s.name,
                s.risk.as_str().to_uppercase(),
                s.score,
                s.reason
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "Recent Incidents")?;
    for inc in &content::RECENT_INCIDENTS {
        writeln!(out, "  {} - {} • {} [{:?}]", inc.title, inc.location, inc.date, inc.status)?;
    }
    writeln!(out)?;

    writeln!(out, "24h Past + 24h Forecast")?;
    draw_risk_series(Some(&mut *out), home.series())?;
    writeln!(out)?;

    render_systems_status(out)?;
    writeln!(out)?;

    writeln!(out, "Unique Features")?;
    for f in &content::FEATURES {
        writeln!(out, "  {:<24} {:<16} {}", f.title, f.path, f.desc)?;
    }
    Ok(())
}

pub fn render_systems_status(out: &mut String) -> std::fmt::Result {
    let (online, total) = content::systems_online();
    writeln!(out, "Systems Status ({}/{})", online, total)?;
    for g in &content::SYSTEM_GROUPS {
        writeln!(
            out,
            "  {:<18} {}/{} online  [{}]",
            g.label,
            g.online,
            g.total,
            g.health.as_str()
        )?;
    }
    Ok(())
}

pub fn render_risk_map(out: &mut String, page: &RiskMapPage) -> std::fmt::Result {
    writeln!(out, "Simulated Risk Map")?;
    writeln!(out, "Last simulation: {}", page.last_run().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out)?;

    writeln!(out, "Climate Scenario Simulation")?;
    for p in Param::ALL {
        let b = p.bounds();
        writeln!(out, "  {:<26} {:>6} [{}..{}]", p.label(), page.inputs().get(p), b.min, b.max)?;
    }
    writeln!(out)?;

    let c = page.zone_counts();
    writeln!(
        out,
        "Zones: {} high, {} medium, {} low, {} safe",
        c.high, c.medium, c.low, c.safe
    )?;
    for z in page.zones() {
        writeln!(
            out,
            "  {:<10} at ({:5.1}%, {:5.1}%) size {:5.1}px  {}",
            z.id,
            z.left,
            z.top,
            z.size,
            z.tooltip()
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Simulation Results")?;
    match page.result() {
        Some(r) => {
            writeln!(out, "  Predicted High Risk Areas: {}", r.high_risk_areas)?;
            writeln!(out, "  Estimated Evacuation Time: {} min", r.evacuation_minutes)?;
            writeln!(out, "  Probability of Incident:   {}%", r.incident_probability)?;
            writeln!(out, "  Forecast Confidence:       {}%", r.confidence)?;
            writeln!(out, "  Dominant Driver:           {}", r.driver)
        }
        None => writeln!(out, "  Run simulation to see results"),
    }
}

pub fn render_explainable_ai(out: &mut String, alert: Option<AlertAction>) -> std::fmt::Result {
    writeln!(out, "Explainable AI & Action Recommendations")?;
    writeln!(
        out,
        "Detailed breakdown of risk factors and recommended actions for {}.",
        content::FOCUS_SECTOR
    )?;
    writeln!(out)?;
    writeln!(out, "Evacuation Guidance")?;
    for (i, step) in content::EVACUATION_STEPS.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, step.title)?;
        writeln!(out, "     {}", step.detail)?;
    }
    writeln!(out)?;
    writeln!(out, "Contributing Factors")?;
    for f in &content::CONTRIBUTING_FACTORS {
        writeln!(out, "  {:<24} {:<9} {:<24} [{}]", f.title, f.level, f.note, f.severity.as_str())?;
    }
    writeln!(out)?;
    writeln!(out, "Recommended Safety Measures")?;
    for m in &content::SAFETY_MEASURES {
        let mark = if m.checked { "x" } else { " " };
        writeln!(out, "  [{}] {} ({})", mark, m.label, m.priority.label())?;
    }
    writeln!(out)?;
    writeln!(out, "Evacuation Alert")?;
    for action in AlertAction::ALL {
        writeln!(out, "  ( {} )", action.label())?;
    }
    if let Some(action) = alert {
        writeln!(out, "  {}", action.confirmation())?;
    }
    Ok(())
}

pub fn render_incidents(out: &mut String) -> std::fmt::Result {
    writeln!(out, "Reports")?;
    for r in &content::INCIDENT_REPORTS {
        writeln!(out, "  {}  {}", r.title(), r.date)?;
    }
    writeln!(out)?;
    let featured = &content::INCIDENT_REPORTS[0];
    writeln!(out, "{}", featured.title())?;
    writeln!(out, "Generated on {}", featured.date)?;
    writeln!(out)?;
    writeln!(out, "Incident Summary")?;
    for (field, value) in &content::INCIDENT_SUMMARY {
        writeln!(out, "  {:<14} {}", field, value)?;
    }
    writeln!(out)?;
    writeln!(out, "AI Prediction vs. Actual Outcome")?;
    draw_series(
        Some(&mut *out),
        "Conveyor Belt System Performance %",
        &content::PERFORMANCE_LABELS,
        &content::PERFORMANCE_PCT,
        75,
        100,
    )?;
    writeln!(out, "  {}", content::PREDICTION_NOTE)?;
    writeln!(out)?;
    writeln!(out, "Recommendations")?;
    for rec in &content::RECOMMENDATIONS {
        writeln!(out, "  [ ] {}", rec)?;
    }
    Ok(())
}

pub fn render_maintenance(out: &mut String, page: &MaintenancePage, today: NaiveDate) -> std::fmt::Result {
    writeln!(out, "Predictive Maintenance Scheduler")?;
    writeln!(out, "{}", page.cursor().title())?;
    for h in WEEKDAY_HEADERS {
        write!(out, "{:<18}", h)?;
    }
    writeln!(out)?;

    for week in build_calendar(page.cursor()).chunks(7) {
        for cell in week {
            let marker = if cell.date == today {
                '*'
            } else if cell.in_month {
                ' '
            } else {
                '.'
            };
            let titles: Vec<String> = tasks_on(page.tasks(), cell.date)
                .iter()
                .map(|t| calendar_title(&t.title))
                .collect();
            let cell_text = format!("{}{:>2} {}", marker, cell.date.format("%d"), titles.join(","));
            write!(out, "{:<18}", cell_text)?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    writeln!(out, "Upcoming Tasks")?;
    for t in page.tasks() {
        writeln!(out, "  #{} {} (Due: {}) [{}]", t.id, t.title, t.due.format("%a %b %d %Y"), t.status.as_str())?;
    }
    writeln!(out)?;
    writeln!(out, "Task Details")?;
    match page.selected() {
        Some(t) => {
            writeln!(out, "  {}", t.title)?;
            writeln!(out, "  Due: {}", t.due.format("%a %b %d %Y"))?;
            writeln!(out, "  {}", t.detail)?;
            writeln!(out, "  Status: {}", t.status.as_str())
        }
        None => writeln!(out, "  Select a task to view details"),
    }
}

pub fn render_not_found(out: &mut String) -> std::fmt::Result {
    writeln!(out, "404")?;
    writeln!(out, "Oops! Page not found")?;
    writeln!(out, "Return to Home (/)")
}

/// Summary of the home page as JSON, for the shutdown log.
pub fn home_summary(home: &HomePage) -> serde_json::Value {
    let c = home.counts();
    json!({
        "high": c.high,
        "moderate": c.moderate,
        "low": c.low,
        "now": home.series().now_value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::scenario::Driver;
    use crate::state::utc_offset;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 20, 10, 15, 0).unwrap()
    }

    #[test]
    fn test_home_refresh_replaces_state() {
        let mut home = HomePage::mount(now(), utc_offset());
        let before = home.sectors().to_vec();
        home.refresh_sectors(now() + chrono::Duration::minutes(10));
        assert_eq!(home.sectors(), &before[..]);
        home.refresh_sectors(now() + chrono::Duration::hours(1));
        assert_ne!(home.sectors(), &before[..]);
        assert_eq!(home.counts().total(), 36);
    }

    #[test]
    fn test_risk_map_zones_follow_inputs() {
        let mut page = RiskMapPage::new(now());
        let before = page.zones().to_vec();
        page.set(Param::Wind, 110.0);
        assert_ne!(page.zones(), &before[..]);
        assert_eq!(page.zones().len(), page.zone_counts().total());
        assert!(page.result().is_none());
    }

    #[test]
    fn test_risk_map_run_replaces_result() {
        let mut page = RiskMapPage::new(now());
        let driver = page.run(now()).unwrap().driver;
        assert_eq!(driver, Driver::Seismic);
        page.set(Param::Intensity, 200.0);
        page.set(Param::Magnitude, 1.0);
        // result is only recomputed on run
        assert_eq!(page.result().unwrap().driver, Driver::Seismic);
        let later = now() + chrono::Duration::minutes(5);
        assert_eq!(page.run(later).unwrap().driver, Driver::Rainfall);
        assert_eq!(page.last_run(), later);
    }

    #[test]
    fn test_maintenance_navigation_and_selection() {
        let mut page = MaintenancePage::new(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        page.prev_month();
        assert_eq!(page.cursor(), MonthCursor::new(2024, 12).unwrap());
        assert!(page.select("missing").is_none());
        assert_eq!(page.select("2").unwrap().title, "Equipment safety checks");
        assert!(page.select("nope").is_some());
    }

    #[test]
    fn test_render_every_route() {
        let pages = Pages::mount(now(), utc_offset());
        let i18n = I18n::load(MemoryStore::default()).unwrap();
        for path in ["/", "/risk-map", "/explainable-ai", "/incidents", "/maintenance", "/missing"] {
            let page = render_path(path, &i18n, &pages).unwrap();
            assert!(page.starts_with("RockGuard AI"), "{}", path);
        }
        let missing = render_path("/missing", &i18n, &pages).unwrap();
        assert!(missing.contains("Oops! Page not found"));
    }

    #[test]
    fn test_header_follows_locale() {
        let pages = Pages::mount(now(), utc_offset());
        let mut i18n = I18n::load(MemoryStore::default()).unwrap();
        let en = render_path("/risk-map", &i18n, &pages).unwrap();
        assert!(en.contains("[Risk Map]"));
        i18n.set_locale(Locale::Hi).unwrap();
        let hi = render_path("/risk-map", &i18n, &pages).unwrap();
        assert!(hi.contains("[जोखिम मानचित्र]"));
    }

    #[test]
    fn test_home_lists_features_and_systems() {
        let home = HomePage::mount(now(), utc_offset());
        let i18n = I18n::load(MemoryStore::default()).unwrap();
        let mut out = String::new();
        render_home(&mut out, &i18n, &home).unwrap();
        assert!(out.contains("Unique Features"));
        for f in &content::FEATURES {
            assert!(out.contains(f.title), "{}", f.title);
        }
        assert!(out.contains("Systems Status (24/24)"));
        assert!(out.contains("Seismic Sensors"));
        assert!(out.contains("6/6 online"));
    }

    #[test]
    fn test_alert_action_confirms_on_page() {
        let mut pages = Pages::mount(now(), utc_offset());
        let i18n = I18n::load(MemoryStore::default()).unwrap();
        let before = render_path("/explainable-ai", &i18n, &pages).unwrap();
        assert!(before.contains("Acknowledge Evacuation Alert"));
        assert!(before.contains("Share Alert"));
        assert!(before.contains("[high]"));
        assert!(!before.contains("Safety protocols activated."));

        let msg = pages.take_alert_action(AlertAction::Acknowledge);
        let after = render_path("/explainable-ai", &i18n, &pages).unwrap();
        assert!(after.contains(msg));
        pages.take_alert_action(AlertAction::Share);
        let shared = render_path("/explainable-ai", &i18n, &pages).unwrap();
        assert!(shared.contains("Alert shared with all relevant personnel."));
    }

    #[test]
    fn test_maintenance_render_shows_tasks_in_august() {
        let mut pages = Pages::mount(now(), utc_offset());
        pages.maintenance.show_month(MonthCursor::new(2024, 8).unwrap());
        let mut out = String::new();
        render_maintenance(&mut out, &pages.maintenance, pages.today).unwrap();
        assert!(out.contains("August 2024"));
        assert!(out.contains("Equipment safety…"));
        assert!(out.contains("*20"));
    }
}

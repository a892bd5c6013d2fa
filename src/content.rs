//! Static page content: evacuation guidance, contributing factors,
//! incident reports and system status.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High Priority",
            Priority::Medium => "Medium Priority",
            Priority::Low => "Low Priority",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GuidanceStep {
    pub title: &'static str,
    pub detail: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributingFactor {
    pub title: &'static str,
    pub level: &'static str,
    pub note: &'static str,
    pub severity: Priority,
}

#[derive(Debug, Clone, Serialize)]
pub struct SafetyMeasure {
    pub label: &'static str,
    pub priority: Priority,
    pub checked: bool,
}

pub const FOCUS_SECTOR: &str = "Sector 7G";

pub const EVACUATION_STEPS: [GuidanceStep; 3] = [
    GuidanceStep {
        title: "Immediate Evacuation from Sector 7G",
        detail: "Proceed calmly and quickly to the nearest designated escape route.",
    },
    GuidanceStep {
        title: "Follow Primary Escape Route",
        detail: "Use the southern ramp, marked in blue on the map. Avoid northern shafts.",
    },
    GuidanceStep {
        title: "Shelter and Rally Points",
        detail: "Check map for designated safe zones and high-risk areas.",
    },
];

pub const CONTRIBUTING_FACTORS: [ContributingFactor; 3] = [
    ContributingFactor {
        title: "Seismic Activity",
        level: "High",
        note: "Recent tremors detected",
        severity: Priority::High,
    },
    ContributingFactor {
        title: "Water Saturation",
        level: "Moderate",
        note: "Increased pore pressure",
        severity: Priority::Medium,
    },
    ContributingFactor {
        title: "Geological Composition",
        level: "Stable",
        note: "Competent rock mass",
        severity: Priority::Low,
    },
];

pub const SAFETY_MEASURES: [SafetyMeasure; 3] = [
    SafetyMeasure {
        label: "Increase monitoring frequency in Sector 7G",
        priority: Priority::High,
        checked: true,
    },
    SafetyMeasure {
        label: "Review and reinforce ground support",
        priority: Priority::Medium,
        checked: false,
    },
    SafetyMeasure {
        label: "Conduct scheduled geological survey",
        priority: Priority::Low,
        checked: false,
    },
];

/// Actions offered under the evacuation alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    Acknowledge,
    Share,
}

impl AlertAction {
    pub const ALL: [AlertAction; 2] = [AlertAction::Acknowledge, AlertAction::Share];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ack" | "acknowledge" => Some(AlertAction::Acknowledge),
            "share" => Some(AlertAction::Share),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertAction::Acknowledge => "Acknowledge Evacuation Alert",
            AlertAction::Share => "Share Alert",
        }
    }

    /// Confirmation shown once the action is taken.
    pub fn confirmation(&self) -> &'static str {
        match self {
            AlertAction::Acknowledge => "Evacuation alert acknowledged. Safety protocols activated.",
            AlertAction::Share => "Alert shared with all relevant personnel.",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentReport {
    pub id: u32,
    pub date: &'static str,
}

impl IncidentReport {
    pub fn title(&self) -> String {
        format!("Incident Report #{}", self.id)
    }
}

pub const INCIDENT_REPORTS: [IncidentReport; 3] = [
    IncidentReport { id: 12345, date: "2024-03-15" },
    IncidentReport { id: 12344, date: "2024-03-10" },
    IncidentReport { id: 12343, date: "2024-03-05" },
];

/// Summary rows of the featured report, as (field, value).
pub const INCIDENT_SUMMARY: [(&str, &str); 6] = [
    ("Date", "2024-03-15"),
    ("Time", "14:30"),
    ("Location", "Section 7, Level 3"),
    ("Incident Type", "Equipment Malfunction"),
    ("Severity", "Moderate"),
    (
        "Description",
        "Malfunction of conveyor belt system, causing a temporary halt in operations. No injuries reported.",
    ),
];

pub const PREDICTION_NOTE: &str = "The AI predicted a potential malfunction with the conveyor belt system within the next 24 hours based on performance data from the previous week. The actual malfunction occurred at 14:30 on 2024-03-15, aligning with the predicted timeframe.";

pub const RECOMMENDATIONS: [&str; 2] = [
    "Conduct a thorough inspection of the conveyor belt system.",
    "Implement a preventative maintenance schedule based on AI predictions.",
];

/// Conveyor belt performance (%), last 7 days.
pub const PERFORMANCE_LABELS: [&str; 7] = ["Day 1", "Day 2", "Day 3", "Day 4", "Day 5", "Day 6", "Day 7"];
pub const PERFORMANCE_PCT: [u8; 7] = [92, 88, 85, 90, 87, 83, 80];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Resolved,
    Monitoring,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentIncident {
    pub title: &'static str,
    pub location: &'static str,
    pub date: &'static str,
    pub status: IncidentStatus,
}

pub const RECENT_INCIDENTS: [RecentIncident; 2] = [
    RecentIncident {
        title: "Conveyor Belt Malfunction",
        location: "Section 7, Level 3",
        date: "2024-03-15",
        status: IncidentStatus::Resolved,
    },
    RecentIncident {
        title: "Increased Seismic Activity",
        location: "Sector 4G",
        date: "2024-03-12",
        status: IncidentStatus::Monitoring,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemHealth {
    Ok,
    Warn,
    Down,
}

impl SystemHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemHealth::Ok => "ok",
            SystemHealth::Warn => "warn",
            SystemHealth::Down => "down",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemGroup {
    pub label: &'static str,
    pub online: u32,
    pub total: u32,
    pub health: SystemHealth,
}

pub const SYSTEM_GROUPS: [SystemGroup; 4] = [
    SystemGroup { label: "Edge Gateways", online: 8, total: 8, health: SystemHealth::Ok },
    SystemGroup { label: "Weather Stations", online: 5, total: 5, health: SystemHealth::Ok },
    SystemGroup { label: "Seismic Sensors", online: 6, total: 6, health: SystemHealth::Ok },
    SystemGroup { label: "CCTV & Lidar", online: 5, total: 5, health: SystemHealth::Ok },
];

/// (online, total) across all monitoring groups.
pub fn systems_online() -> (u32, u32) {
    SYSTEM_GROUPS
        .iter()
        .fold((0, 0), |(on, tot), g| (on + g.online, tot + g.total))
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureTile {
    pub title: &'static str,
    pub path: &'static str,
    pub desc: &'static str,
}

pub const FEATURES: [FeatureTile; 8] = [
    FeatureTile { title: "AI Risk Prediction", path: "/risk-map", desc: "Uses DEMs, sensors, and weather to predict rockfall risk." },
    FeatureTile { title: "Risk Map", path: "/risk-map", desc: "Real-time visualization of risk zones with overlays." },
    FeatureTile { title: "Explainable AI + Alerts", path: "/explainable-ai", desc: "Clear reasons, evacuation guidance, and Live Alerts." },
    FeatureTile { title: "Predictive Maintenance", path: "/maintenance", desc: "Auto-schedule tasks and sync with calendar." },
    FeatureTile { title: "Climate Simulator", path: "/risk-map", desc: "Simulate rainfall and seismic scenarios." },
    FeatureTile { title: "Evacuation Guidance", path: "/explainable-ai", desc: "Routes and safe zones mapped visually." },
    FeatureTile { title: "Multilingual UI", path: "/", desc: "English and Hindi supported; extendable." },
    FeatureTile { title: "Hazard Timeline", path: "/risk-map", desc: "Interactive timeline for past and future forecasts." },
];

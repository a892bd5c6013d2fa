//! Client route table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Dashboard,
    RiskMap,
    ExplainableAi,
    Incidents,
    Maintenance,
    NotFound,
}

/// Navigation bar entries, in display order.
pub const NAV_ITEMS: [Route; 5] = [
    Route::Dashboard,
    Route::RiskMap,
    Route::ExplainableAi,
    Route::Incidents,
    Route::Maintenance,
];

impl Route {
    /// Match a path. Query strings, fragments and trailing slashes are ignored;
    /// anything else unmatched is `NotFound`.
    pub fn resolve(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .trim();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Dashboard,
            "/risk-map" => Route::RiskMap,
            "/explainable-ai" => Route::ExplainableAi,
            "/incidents" => Route::Incidents,
            "/maintenance" => Route::Maintenance,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> Option<&'static str> {
        match self {
            Route::Dashboard => Some("/"),
            Route::RiskMap => Some("/risk-map"),
            Route::ExplainableAi => Some("/explainable-ai"),
            Route::Incidents => Some("/incidents"),
            Route::Maintenance => Some("/maintenance"),
            Route::NotFound => None,
        }
    }

    /// Translation key of the navigation label.
    pub fn nav_key(&self) -> Option<&'static str> {
        match self {
            Route::Dashboard => Some("dashboard"),
            Route::RiskMap => Some("riskMap"),
            Route::ExplainableAi => Some("explainableAI"),
            Route::Incidents => Some("incidents"),
            Route::Maintenance => Some("maintenance"),
            Route::NotFound => None,
        }
    }
}

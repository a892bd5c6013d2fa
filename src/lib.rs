pub mod chart;
pub mod cli;
pub mod content;
pub mod dashboard;
pub mod factors;
pub mod forecast;
pub mod i18n;
pub mod logging;
pub mod maintenance;
pub mod routes;
pub mod scenario;
pub mod scheduler;
pub mod sectors;
pub mod seeded;
pub mod state;
pub mod storage;

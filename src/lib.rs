// DSS Dashboard - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod dashboard;  // Endpoint services: store -> engine -> payload
pub mod db;
pub mod entities;
pub mod error;
pub mod import;
pub mod kpi;
pub mod logging;
pub mod money;      // Clamp, parse and format TL amounts
pub mod ranking;
pub mod resolver;   // Latest forecast per firm
pub mod returns;
pub mod scoring;    // Entrepreneur DSS score

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::Config;
pub use db::setup_database;
pub use entities::{
    EntrepreneurRecord, Firm, FirmId, FirmRecycling, FirmSustainability,
    ForecastRecord, ScoringParameters, Settings,
};
pub use error::{DssError, Result};
pub use kpi::{compute_kpi, KpiResult};
pub use money::{clamp_money, format_money, format_percent, MAX_MONEY_TL};
pub use ranking::{top_n, TopN};
pub use resolver::resolve_latest;
pub use returns::{aggregate_returns, FirmReturn};
pub use scoring::{rank_entrepreneurs, score_entrepreneur, EntrepreneurRanking, ScoredEntrepreneur};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

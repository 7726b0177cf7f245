//! # Housing Dashboard
//!
//! US housing market dashboard: price returns by property type, price
//! trends against the national average, mortgage payments by state and
//! renting vs. owning, served as JSON view-models over HTTP and WebSocket.
//!
//! ## Features
//!
//! - **Memoized loading**: CSV tables cached until their file changes
//! - **Pure rendering**: one function from tables and widget values to a view
//! - **Live updates**: WebSocket re-render on every widget change
//! - **Exports**: filtered table as JSON or CSV
//!
//! ## Modules
//!
//! - [`data`]: Record types, CSV loaders and the dataset cache
//! - [`dashboard`]: Filtering, metrics, pivots, charts and rendering
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Live re-rendering over WebSocket
//! - [`config`]: TOML + environment configuration and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use housing_dashboard::config::Config;
//! use housing_dashboard::dashboard::Dashboard;
//!
//! let config = Config::load_default();
//! let dashboard = Dashboard::new(config.data, config.cache);
//!
//! let options = dashboard.options()?;
//! let mut selection = options.default_selection();
//! selection.state = "TX".to_string();
//!
//! let view = dashboard.render(&selection)?;
//! println!("{}", view.housing.table_caption);
//! # Ok::<(), housing_dashboard::dashboard::DashboardError>(())
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod websocket;

// Re-export top-level types for convenience
pub use data::{
    DataError, DataResult, DatasetCache, DateRange, FilterSelection, HousingRecord,
    MortgageRecord, RentRecord,
};

pub use dashboard::{
    render, Dashboard, DashboardError, DashboardResult, DashboardView, FilterOptions, MetricCard,
    Tables,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{websocket_handler, ClientMessage, ServerMessage};

pub use config::{ApiConfig, CacheConfig, Config, ConfigError, DataConfig, LoggingConfig};

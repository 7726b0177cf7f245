//! Dashboard Engine
//!
//! Turns the loaded tables and a `FilterSelection` into a view-model:
//!
//! - **filter**: widget options, selection validation, row filtering
//! - **metrics**: per-type return cards and number formatting
//! - **pivot**: price by date and type plus the national average
//! - **choropleth**: mean mortgage payment per state
//! - **rent**: payment vs. rent series for the selected state
//! - **render**: the pure render function and the file-backed `Dashboard`
//!
//! # Example
//!
//! ```rust,no_run
//! use housing_dashboard::config::{CacheConfig, DataConfig};
//! use housing_dashboard::dashboard::Dashboard;
//!
//! let dashboard = Dashboard::new(DataConfig::default(), CacheConfig::default());
//! let view = dashboard.render_default()?;
//! for card in &view.metric_cards {
//!     println!("{}", card.label());
//! }
//! # Ok::<(), housing_dashboard::dashboard::DashboardError>(())
//! ```

pub mod choropleth;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod pivot;
pub mod render;
pub mod rent;

pub use choropleth::{average_payment_by_state, build_choropleth, Choropleth, StatePayment};
pub use error::{DashboardError, DashboardResult};
pub use filter::{filter_housing, FilterOptions};
pub use metrics::{compute_return, format_delta, format_number, metric_cards, MetricCard, ReturnMetric};
pub use pivot::{national_average, pivot_by_type, price_by_type, PriceRow, PriceTable, NATIONAL_AVERAGE_LABEL};
pub use render::{render, Dashboard, DashboardView, HousingPanel, PageMeta, RentPanel, Tables};
pub use rent::{build_rent_comparison, RentComparison, RentPoint};

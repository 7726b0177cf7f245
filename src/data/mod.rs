//! Housing Data Layer
//!
//! Reading and memoizing the three input tables:
//!
//! - **types**: Record types (HousingRecord, MortgageRecord, RentRecord, FilterSelection)
//! - **loader**: CSV readers with date parsing and index-column dropping
//! - **cache**: Path + mtime keyed memoization with explicit invalidation
//! - **error**: Error types
//!
//! All tables are read-only once loaded; nothing in the crate writes them back.
//!
//! # Example
//!
//! ```rust,no_run
//! use housing_dashboard::data::{load_housing, DatasetCache};
//! use std::path::Path;
//!
//! let cache = DatasetCache::new();
//! let rows = cache.get_or_load(Path::new("df_merged.csv"), load_housing)?;
//! println!("{} rows", rows.len());
//! # Ok::<(), housing_dashboard::data::DataError>(())
//! ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod types;

pub use cache::DatasetCache;
pub use error::{DataError, DataResult};
pub use loader::{
    load_housing, load_mortgage_rates, load_rents, parse_date, read_housing,
    read_mortgage_rates, read_rents,
};
pub use types::{DateRange, FilterSelection, HousingRecord, MortgageRecord, RentRecord};

//! Render Pipeline
//!
//! `render` is a pure function from (tables, selection) to the dashboard
//! view-model. `Dashboard` wraps it with the loading policy: the primary
//! table is always memoized, the auxiliary tables only when configured.
//!
//! ```text
//! Load → Validate selection → Filter → Metrics → Pivot → Choropleth → Rent → View
//! ```

use super::choropleth::{build_choropleth, Choropleth};
use super::error::DashboardResult;
use super::filter::{filter_housing, FilterOptions};
use super::metrics::{metric_cards, MetricCard};
use super::pivot::{price_by_type, PriceTable};
use super::rent::{build_rent_comparison, RentComparison};
use crate::config::{CacheConfig, DataConfig};
use crate::data::{
    load_housing, load_mortgage_rates, load_rents, DataResult, DatasetCache, FilterSelection,
    HousingRecord, MortgageRecord, RentRecord,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Page-level labels
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub icon: String,
    pub layout: String,
    pub sidebar_title: String,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            title: "US Housing Dashboard".to_string(),
            icon: "🏠".to_string(),
            layout: "wide".to_string(),
            sidebar_title: "User Input Features".to_string(),
        }
    }
}

/// Left column: filtered table and price chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HousingPanel {
    pub heading: String,
    pub table_caption: String,
    pub table: Vec<HousingRecord>,
    pub chart_title: String,
    pub price_chart: PriceTable,
}

/// Right column: mortgage map and rent comparison
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RentPanel {
    pub heading: String,
    pub choropleth: Choropleth,
    pub rent_comparison: RentComparison,
}

/// Everything one render produces
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub page: PageMeta,
    pub options: FilterOptions,
    pub selection: FilterSelection,
    pub metric_cards: Vec<MetricCard>,
    pub housing: HousingPanel,
    pub renting: RentPanel,
}

/// Borrowed view of the three loaded tables
#[derive(Debug, Clone, Copy)]
pub struct Tables<'a> {
    pub housing: &'a [HousingRecord],
    pub mortgage: &'a [MortgageRecord],
    pub rents: &'a [RentRecord],
}

/// Build the view-model for a selection
///
/// Pure: the same tables and selection always produce the same view.
/// The selection is not validated here; see [`FilterOptions::validate`].
pub fn render(tables: Tables<'_>, options: &FilterOptions, selection: &FilterSelection) -> DashboardView {
    let filtered = filter_housing(tables.housing, selection);
    let cards = metric_cards(&filtered, &selection.property_types);
    let price_chart = price_by_type(&filtered);

    DashboardView {
        page: PageMeta::default(),
        options: options.clone(),
        selection: selection.clone(),
        metric_cards: cards,
        housing: HousingPanel {
            heading: "Housing Data".to_string(),
            table_caption: format!("Filtered Data for {}", selection.state),
            table: filtered,
            chart_title: "Housing Price by Type".to_string(),
            price_chart,
        },
        renting: RentPanel {
            heading: "Renting vs Owning".to_string(),
            choropleth: build_choropleth(tables.mortgage),
            rent_comparison: build_rent_comparison(tables.rents, &selection.state),
        },
    }
}

/// Dashboard backed by files on disk
pub struct Dashboard {
    data: DataConfig,
    cache: CacheConfig,
    housing: DatasetCache<HousingRecord>,
    mortgage: DatasetCache<MortgageRecord>,
    rents: DatasetCache<RentRecord>,
}

impl Dashboard {
    pub fn new(data: DataConfig, cache: CacheConfig) -> Self {
        Self {
            data,
            cache,
            housing: DatasetCache::new(),
            mortgage: DatasetCache::new(),
            rents: DatasetCache::new(),
        }
    }

    pub fn data_config(&self) -> &DataConfig {
        &self.data
    }

    /// Primary table, memoized until the file changes or `invalidate` is called
    pub fn housing(&self) -> DataResult<Arc<Vec<HousingRecord>>> {
        self.housing.get_or_load(Path::new(&self.data.housing_path), load_housing)
    }

    /// Mortgage table; re-read on every call unless auxiliary memoization is on
    pub fn mortgage_rates(&self) -> DataResult<Arc<Vec<MortgageRecord>>> {
        let path = Path::new(&self.data.mortgage_path);
        if self.cache.memoize_auxiliary {
            self.mortgage.get_or_load(path, load_mortgage_rates)
        } else {
            load_mortgage_rates(path).map(Arc::new)
        }
    }

    /// Rent table; re-read on every call unless auxiliary memoization is on
    pub fn rents(&self) -> DataResult<Arc<Vec<RentRecord>>> {
        let path = Path::new(&self.data.rents_path);
        if self.cache.memoize_auxiliary {
            self.rents.get_or_load(path, load_rents)
        } else {
            load_rents(path).map(Arc::new)
        }
    }

    /// Widget options derived from the primary table
    pub fn options(&self) -> DashboardResult<FilterOptions> {
        let housing = self.housing()?;
        FilterOptions::from_records(&housing)
    }

    /// Rows of the primary table matching a validated selection
    pub fn filtered_table(&self, selection: &FilterSelection) -> DashboardResult<Vec<HousingRecord>> {
        let options = self.options()?;
        self.filtered_table_with(&options, selection)
    }

    /// Like [`Dashboard::filtered_table`], validating against options the caller already holds
    pub fn filtered_table_with(
        &self,
        options: &FilterOptions,
        selection: &FilterSelection,
    ) -> DashboardResult<Vec<HousingRecord>> {
        options.validate(selection)?;
        let housing = self.housing()?;
        Ok(filter_housing(&housing, selection))
    }

    /// Full render for a selection
    pub fn render(&self, selection: &FilterSelection) -> DashboardResult<DashboardView> {
        let options = self.options()?;
        self.render_with(&options, selection)
    }

    /// Like [`Dashboard::render`], reusing options the caller already derived
    pub fn render_with(
        &self,
        options: &FilterOptions,
        selection: &FilterSelection,
    ) -> DashboardResult<DashboardView> {
        let started = Instant::now();

        options.validate(selection)?;
        let housing = self.housing()?;
        let mortgage = self.mortgage_rates()?;
        let rents = self.rents()?;

        let view = render(
            Tables {
                housing: &housing,
                mortgage: &mortgage,
                rents: &rents,
            },
            options,
            selection,
        );

        tracing::debug!(
            state = %selection.state,
            types = selection.property_types.len(),
            rows = view.housing.table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered dashboard"
        );

        Ok(view)
    }

    /// Render with the widgets' initial values
    pub fn render_default(&self) -> DashboardResult<DashboardView> {
        let options = self.options()?;
        let selection = options.default_selection();
        self.render_with(&options, &selection)
    }

    /// Drop every memoized table
    pub fn invalidate(&self) {
        self.housing.invalidate();
        self.mortgage.invalidate();
        self.rents.invalidate();
        tracing::info!("Dashboard caches invalidated");
    }

    /// Whether the primary table is currently memoized
    pub fn is_loaded(&self) -> bool {
        self.housing.is_loaded()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::{CacheConfig, DataConfig};
    use tempfile::TempDir;

    pub const HOUSING_CSV: &str = ",Abbrev,Date,Type,AvgPrice
0,CA,2020-01-31,Condo,200000
1,CA,2020-01-31,Single Family,600000
2,CA,2020-02-29,Condo,220000
3,CA,2020-02-29,Single Family,640000
4,TX,2020-01-31,Condo,150000
5,TX,2020-02-29,Condo,165000
";

    pub const MORTGAGE_CSV: &str = ",Abbrev,MonthlyPayment
0,CA,1000
1,CA,2000
2,TX,1500
";

    pub const RENTS_CSV: &str = "Abbrev,Date,MonthlyPayment,AvgRent
CA,2020-02-01,2500,2200
CA,2020-01-01,2400,2100
TX,2020-01-01,1500,1300
";

    /// Write the three fixture files into a temp dir and point configs at them
    pub fn write_fixture_files(memoize_auxiliary: bool) -> (TempDir, DataConfig, CacheConfig) {
        let dir = tempfile::tempdir().unwrap();
        let housing = dir.path().join("df_merged.csv");
        let mortgage = dir.path().join("df_mortgage_rates.csv");
        let rents = dir.path().join("rents_payments.csv");
        std::fs::write(&housing, HOUSING_CSV).unwrap();
        std::fs::write(&mortgage, MORTGAGE_CSV).unwrap();
        std::fs::write(&rents, RENTS_CSV).unwrap();

        let data = DataConfig {
            housing_path: housing.to_string_lossy().to_string(),
            mortgage_path: mortgage.to_string_lossy().to_string(),
            rents_path: rents.to_string_lossy().to_string(),
        };
        let cache = CacheConfig { memoize_auxiliary };

        (dir, data, cache)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::write_fixture_files;
    use super::*;
    use crate::dashboard::error::DashboardError;
    use crate::dashboard::pivot::NATIONAL_AVERAGE_LABEL;
    use crate::data::DateRange;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_render() {
        let (_dir, data, cache) = write_fixture_files(false);
        let dashboard = Dashboard::new(data, cache);

        let view = dashboard.render_default().unwrap();

        assert_eq!(view.page.title, "US Housing Dashboard");
        assert_eq!(view.selection.state, "CA");
        assert_eq!(view.selection.property_types, vec!["Condo", "Single Family"]);
        assert_eq!(view.housing.table_caption, "Filtered Data for CA");
        assert_eq!(view.housing.table.len(), 4);

        assert_eq!(view.metric_cards.len(), 2);
        let condo = view.metric_cards[0].metric().unwrap();
        assert_eq!(condo.returns, 20_000.0);
        assert_eq!(condo.return_pct, Some(10.0));

        let chart = &view.housing.price_chart;
        assert_eq!(chart.get(date(2020, 1, 31), NATIONAL_AVERAGE_LABEL), Some(400_000.0));

        assert_eq!(view.renting.choropleth.payment_for("CA"), Some(1500.0));
        assert_eq!(view.renting.rent_comparison.points.len(), 2);
        assert_eq!(view.renting.rent_comparison.points[0].date, date(2020, 1, 1));
    }

    #[test]
    fn test_render_narrow_selection() {
        let (_dir, data, cache) = write_fixture_files(false);
        let dashboard = Dashboard::new(data, cache);

        let selection = FilterSelection::new(
            "TX",
            vec!["Condo".to_string(), "Single Family".to_string()],
            DateRange::new(date(2020, 1, 31), date(2020, 2, 29)),
        );
        let view = dashboard.render(&selection).unwrap();

        assert_eq!(view.housing.table.len(), 2);
        assert!(view.metric_cards[0].metric().is_some());
        assert!(matches!(view.metric_cards[1], MetricCard::NoData { .. }));
        // the map ignores the selection
        assert_eq!(view.renting.choropleth.states.len(), 2);
        assert_eq!(view.renting.rent_comparison.points.len(), 1);
    }

    #[test]
    fn test_render_rejects_unknown_state() {
        let (_dir, data, cache) = write_fixture_files(false);
        let dashboard = Dashboard::new(data, cache);

        let selection = FilterSelection::new(
            "ZZ",
            vec![],
            DateRange::new(date(2020, 1, 31), date(2020, 2, 29)),
        );
        assert!(matches!(
            dashboard.render(&selection),
            Err(DashboardError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_missing_file_surfaces_error() {
        let (dir, data, cache) = write_fixture_files(false);
        std::fs::remove_file(dir.path().join("rents_payments.csv")).unwrap();
        let dashboard = Dashboard::new(data, cache);

        assert!(matches!(
            dashboard.render_default(),
            Err(DashboardError::Data(_))
        ));
    }

    #[test]
    fn test_with_variants_validate_against_given_options() {
        let (_dir, data, cache) = write_fixture_files(false);
        let dashboard = Dashboard::new(data, cache);
        let options = dashboard.options().unwrap();

        let selection = FilterSelection::new(
            "TX",
            vec!["Single Family".to_string()],
            DateRange::new(date(2020, 1, 31), date(2020, 2, 29)),
        );
        assert!(dashboard.filtered_table_with(&options, &selection).unwrap().is_empty());
        assert_eq!(
            dashboard.render_with(&options, &selection).unwrap(),
            dashboard.render(&selection).unwrap()
        );

        let mut narrowed = options.clone();
        narrowed.states.retain(|s| s == "CA");
        assert!(matches!(
            dashboard.filtered_table_with(&narrowed, &selection),
            Err(DashboardError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_housing_is_memoized() {
        let (_dir, data, cache) = write_fixture_files(false);
        let dashboard = Dashboard::new(data, cache);

        let first = dashboard.housing().unwrap();
        let second = dashboard.housing().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        dashboard.invalidate();
        assert!(!dashboard.is_loaded());
        let third = dashboard.housing().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_auxiliary_memoization_toggle() {
        let (_dir, data, cache) = write_fixture_files(false);
        let fresh = Dashboard::new(data, cache);
        let a = fresh.mortgage_rates().unwrap();
        let b = fresh.mortgage_rates().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        let (_dir, data, cache) = write_fixture_files(true);
        let memoized = Dashboard::new(data, cache);
        let a = memoized.rents().unwrap();
        let b = memoized.rents().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_pure_render_with_empty_tables() {
        let housing = vec![HousingRecord::new("CA", date(2020, 1, 31), "Condo", 1.0)];
        let options = FilterOptions::from_records(&housing).unwrap();
        let selection = FilterSelection::new(
            "CA",
            vec!["Condo".to_string()],
            DateRange::new(date(2020, 1, 31), date(2020, 1, 31)),
        );

        let view = render(
            Tables {
                housing: &housing,
                mortgage: &[],
                rents: &[],
            },
            &options,
            &selection,
        );

        assert!(view.renting.choropleth.states.is_empty());
        assert!(view.renting.rent_comparison.is_empty());
        assert_eq!(view.metric_cards[0].metric().unwrap().returns, 0.0);
    }
}

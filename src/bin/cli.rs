//! Housing Dashboard CLI
//!
//! Command-line interface over the same view-model the server renders:
//! - Show widget options
//! - Render the dashboard for a selection
//! - Export the filtered table
//! - Generate a config file

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use housing_dashboard::api::dto::SelectionParams;
use housing_dashboard::api::routes::table::rows_to_csv;
use housing_dashboard::config::{generate_default_config, init_logging, Config};
use housing_dashboard::dashboard::{format_number, Dashboard, DashboardView, MetricCard};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "housing-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "US housing market dashboard in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./housing.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show selectable states, property types and date bounds
    Options,

    /// Render the dashboard for a selection
    Render {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Export the filtered table as CSV
    Export {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Widget values; omitted flags take the initial widget values
#[derive(Args)]
pub struct SelectionArgs {
    /// State abbreviation (e.g. CA)
    #[arg(short, long)]
    state: Option<String>,
    /// Property types, comma-separated
    #[arg(short, long)]
    types: Option<String>,
    /// Range start (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,
    /// Range end (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,
}

impl From<SelectionArgs> for SelectionParams {
    fn from(args: SelectionArgs) -> Self {
        SelectionParams {
            state: args.state,
            types: args.types,
            start: args.start,
            end: args.end,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Options => {
            let dashboard = load_dashboard(cli.config.as_deref())?;
            let options = dashboard.options()?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                println!("States ({}):", options.states.len());
                println!("  {}", options.states.join(", "));
                println!();
                println!("Property types ({}):", options.property_types.len());
                for property_type in &options.property_types {
                    println!("  {}", property_type);
                }
                println!();
                println!("Dates: {}", options.date_bounds);
            }
        }

        Commands::Render { selection } => {
            let dashboard = load_dashboard(cli.config.as_deref())?;
            let options = dashboard.options()?;
            let selection = SelectionParams::from(selection).resolve(&options)?;
            let view = dashboard.render_with(&options, &selection)?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view(&view);
            }
        }

        Commands::Export { selection, output } => {
            let dashboard = load_dashboard(cli.config.as_deref())?;
            let options = dashboard.options()?;
            let selection = SelectionParams::from(selection).resolve(&options)?;
            let rows = dashboard.filtered_table_with(&options, &selection)?;
            let data = rows_to_csv(&rows)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &data)?;
                    println!("Exported {} rows to {:?}", rows.len(), path);
                }
                None => {
                    print!("{}", data);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Load config, install logging and build a local dashboard
fn load_dashboard(config_path: Option<&Path>) -> anyhow::Result<Dashboard> {
    let config = Config::resolve(config_path).context("Failed to load config")?;
    init_logging(&config.logging);
    Ok(Dashboard::new(config.data, config.cache))
}

fn print_view(view: &DashboardView) {
    println!("{} {}", view.page.icon, view.page.title);
    println!(
        "{} | {} | {}",
        view.selection.state,
        view.selection.property_types.join(", "),
        view.selection.date_range
    );
    println!();

    // Metric cards
    for card in &view.metric_cards {
        match card {
            MetricCard::Computed { label, value, delta, .. } => {
                println!("{:<32} {:>10} {:>8}", label, value, delta);
            }
            MetricCard::NoData { label, .. } => {
                println!("{:<32} {:>10}", label, "no data");
            }
        }
    }
    println!();

    println!("== {} ==", view.housing.heading);
    println!("{}", view.housing.table_caption);
    if view.housing.table.is_empty() {
        println!("No rows for the selected filters");
    } else {
        println!("{:<12} {:<24} {:>14}", "Date", "Type", "AvgPrice");
        println!("{}", "-".repeat(52));
        for row in &view.housing.table {
            println!(
                "{:<12} {:<24} {:>14.2}",
                row.date.format("%Y-%m-%d"),
                row.property_type,
                row.average_price
            );
        }
    }
    println!();

    println!("{}", view.housing.chart_title);
    let chart = &view.housing.price_chart;
    if chart.is_empty() {
        println!("No data");
    } else {
        print!("{:<12}", "Date");
        for column in &chart.columns {
            print!(" | {:>14}", column);
        }
        println!();
        for row in &chart.rows {
            print!("{:<12}", row.date.format("%Y-%m-%d"));
            for value in &row.values {
                let cell = value.map(format_number).unwrap_or_else(|| "-".to_string());
                print!(" | {:>14}", cell);
            }
            println!();
        }
    }
    println!();

    println!("== {} ==", view.renting.heading);
    let map = &view.renting.choropleth;
    println!("{} ({})", map.title, map.color_label);
    for entry in &map.states {
        println!("  {:<4} {:>10.2}", entry.state, entry.monthly_payment);
    }
    println!();

    let rent = &view.renting.rent_comparison;
    println!("{} [{}]", rent.title, rent.state);
    if rent.is_empty() {
        println!("No rent data for {}", rent.state);
    } else {
        println!("{:<12} {:>14} {:>14}", "Date", rent.series[0], rent.series[1]);
        for point in &rent.points {
            println!(
                "{:<12} {:>14.2} {:>14.2}",
                point.date.format("%Y-%m-%d"),
                point.monthly_payment,
                point.avg_rent
            );
        }
    }
}

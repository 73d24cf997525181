use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use dss_dashboard::dashboard;
use dss_dashboard::import::{import_csv, ImportKind};
use dss_dashboard::logging::init_logging;
use dss_dashboard::{format_money, format_percent, setup_database, Config, ScoringParameters};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dss-dashboard", version, about = "DSS dashboard data tools")]
struct Cli {
    /// SQLite database (overrides DSS_DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the schema in an empty database
    Init,

    /// Load a CSV export into one table
    Import {
        /// firms, forecasts, entrepreneurs or settings
        table: ImportKind,
        csv: PathBuf,
    },

    /// Print the dashboard figures to the terminal
    Report {
        #[arg(long)]
        ref_kadin: Option<f64>,
        #[arg(long)]
        ref_engelli: Option<f64>,
        #[arg(long)]
        ref_min_yil: Option<i32>,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let db_path = cli.database.unwrap_or(config.database_path);

    let conn = Connection::open(&db_path)
        .with_context(|| format!("Failed to open database {:?}", db_path))?;
    setup_database(&conn).context("Failed to initialize database schema")?;

    match cli.command {
        Command::Init => {
            println!("✓ Database initialized with WAL mode: {:?}", db_path);
        }
        Command::Import { table, csv } => run_import(&conn, table, &csv)?,
        Command::Report {
            ref_kadin,
            ref_engelli,
            ref_min_yil,
        } => {
            let defaults = ScoringParameters::default();
            let params = ScoringParameters {
                ref_female_ratio: ref_kadin.unwrap_or(defaults.ref_female_ratio),
                ref_disabled_ratio: ref_engelli.unwrap_or(defaults.ref_disabled_ratio),
                ref_min_year: ref_min_yil.unwrap_or(defaults.ref_min_year),
            };
            run_report(&conn, params)?;
        }
    }

    Ok(())
}

fn run_import(conn: &Connection, table: ImportKind, csv: &Path) -> Result<()> {
    println!("📂 Importing {} from {:?}...", table.as_str(), csv);

    let written = import_csv(conn, table, csv)?;

    println!("✓ {} {} row(s) written", written, table.as_str());
    Ok(())
}

fn run_report(conn: &Connection, params: ScoringParameters) -> Result<()> {
    println!("📊 DSS Dashboard Report");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let overview = dashboard::all_returns(conn)?;
    println!(
        "\n💰 Estimated returns (women's budget share {})",
        format_percent(Some(overview.budget_share * 100.0))
    );
    for firm in &overview.firms {
        let flag = if firm.is_consistent() { "" } else { "  ⚠️" };
        println!(
            "   {:<30} {:>14} {:>14}{}",
            firm.name,
            format_money(Some(firm.estimated_return)),
            format_money(Some(firm.women_budget)),
            flag
        );
    }

    let sustainability = dashboard::sustainability_top7(conn)?;
    println!("\n🌱 Sustainability top {}", sustainability.labels.len());
    for (rank, (label, value)) in sustainability.labels.iter().zip(&sustainability.values).enumerate() {
        println!("   {:>2}. {:<30} {:>6.1}", rank + 1, label, value);
    }

    let recycling = dashboard::recycling_top10(conn)?;
    println!("\n♻️  Recycling top {}", recycling.labels.len());
    for (rank, (label, value)) in recycling.labels.iter().zip(&recycling.values).enumerate() {
        println!("   {:>2}. {:<30} {:>6}", rank + 1, label, format_percent(Some(*value)));
    }

    let ranking = dashboard::entrepreneur_top10(conn, params, Utc::now().year())?;
    println!(
        "\n👩‍💼 Entrepreneurs (ref female {}%, ref disabled {}%, since {})",
        params.ref_female_ratio, params.ref_disabled_ratio, params.ref_min_year
    );
    for (rank, (label, value)) in ranking.labels.iter().zip(&ranking.values).enumerate() {
        println!("   {:>2}. {:<30} {:>5.1}", rank + 1, label, value);
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    Ok(())
}

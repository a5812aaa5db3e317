mod cleaner;
mod config;
mod engine;
mod loader;
mod models;
mod sample;
mod utils;
mod webhook;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;
use crate::engine::{DateRange, aggregate, normalize_status};
use crate::models::{DashboardData, Deal};
use crate::webhook::{DealSource, WebhookSource};

#[derive(Parser)]
#[command(name = "sales-perf", about = "Sales pipeline KPI report", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Webhook URL to fetch deal records from
    #[arg(long, global = true)]
    url: Option<String>,

    /// Local snapshot to load instead of the webhook (.json or .csv)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Start of the date window, inclusive (YYYY-MM-DD)
    #[arg(long, global = true)]
    from: Option<String>,

    /// End of the date window, inclusive (YYYY-MM-DD)
    #[arg(long, global = true)]
    to: Option<String>,

    /// Emit JSON instead of the text report
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Full report: KPIs, daily timeline, advisor and program breakdowns
    Dashboard,

    /// Detail table of deals relevant to the window
    Deals {
        /// Keep only rows where some field contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Dump the normalized deal list as JSON (reusable later with --file)
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "sales_perf=info,warn",
        1 => "sales_perf=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;
    let deals = load_deals(&cli, &config).await?;
    let range = DateRange::new(cli.from.as_deref(), cli.to.as_deref());

    match cli.command {
        Command::Dashboard => {
            let data = aggregate::dashboard(
                &deals,
                &range,
                &config.report.unknown_advisor_label,
                &config.report.no_program_label,
            );
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                render_dashboard(&data, &range);
            }
        }

        Command::Deals { search } => {
            let mut rows = aggregate::filter_deals(&deals, &range);
            if let Some(term) = search {
                let term = term.to_lowercase();
                rows.retain(|d| matches_search(d, &term));
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                render_deals(&rows);
            }
        }

        Command::Export => {
            println!("{}", serde_json::to_string_pretty(&deals)?);
        }
    }

    Ok(())
}

// ── Source selection ──────────────────────────────────────────────────────────

/// Precedence: --url, then --file, then the configured webhook, then the
/// built-in sample pipeline.
async fn load_deals(cli: &Cli, config: &AppConfig) -> Result<Vec<Deal>> {
    if let Some(url) = &cli.url {
        let _t = utils::Timer::start("Webhook fetch");
        let source = WebhookSource::new(&config.webhook, url)?;
        return Ok(source.fetch_deals().await?);
    }

    if let Some(path) = &cli.file {
        return loader::load_file(path);
    }

    if !config.webhook.url.is_empty() {
        let _t = utils::Timer::start("Webhook fetch");
        let source = WebhookSource::new(&config.webhook, &config.webhook.url)?;
        return Ok(source.fetch_deals().await?);
    }

    info!("No source given — using built-in sample data");
    sample::deals().context("Sample data failed to load")
}

// ── Text rendering ────────────────────────────────────────────────────────────

fn window_label(range: &DateRange) -> String {
    if range.is_unbounded() {
        "all time".to_string()
    } else {
        format!(
            "{} → {}",
            range.start().unwrap_or("…"),
            range.end().unwrap_or("…")
        )
    }
}

fn render_dashboard(data: &DashboardData, range: &DateRange) {
    let s = &data.stats;
    println!("─────────────────────────────────────────");
    println!("  Sales Performance — {}", window_label(range));
    println!("─────────────────────────────────────────");
    println!("  Deals created : {}", utils::fmt_number(s.total_deals));
    println!("  Won           : {}", utils::fmt_number(s.won));
    println!("  Lost          : {}", utils::fmt_number(s.lost));
    println!("  In progress   : {}", utils::fmt_number(s.contact));
    println!("  Other         : {}", utils::fmt_number(s.other));
    println!("  Conversion    : {}", utils::fmt_pct(s.conversion_rate));
    println!("  Loss rate     : {}", utils::fmt_pct(s.loss_rate));
    println!("─────────────────────────────────────────");

    if !data.timeline.is_empty() {
        println!("\n  Daily activity (created / won):");
        for point in &data.timeline {
            println!("    {}  {:>4} / {:<4}", point.date, point.created, point.won);
        }
    }

    if !data.advisors.is_empty() {
        println!("\n  {:<34} {:>6} {:>5} {:>5} {:>8}", "Advisor", "total", "won", "lost", "conv");
        for m in &data.advisors {
            println!(
                "  {:<34} {:>6} {:>5} {:>5} {:>8}",
                trunc(&m.name, 34),
                m.total,
                m.won,
                m.lost,
                utils::fmt_pct(m.conversion_rate)
            );
        }
    }

    if !data.programs.is_empty() {
        println!("\n  {:<34} {:>6} {:>5} {:>8}", "Program", "count", "won", "conv");
        for m in &data.programs {
            println!(
                "  {:<34} {:>6} {:>5} {:>8}",
                trunc(&m.name, 34),
                m.count,
                m.won,
                utils::fmt_pct(m.conversion_rate)
            );
        }
    }
}

fn render_deals(rows: &[Deal]) {
    if rows.is_empty() {
        println!("No deals match.");
        return;
    }

    println!(
        "{:<26} {:<26} {:<26} {:<16} {:<10} {:<10}",
        "Deal", "Advisor", "Program", "Status", "Created", "Closed"
    );
    for deal in rows {
        println!(
            "{:<26} {:<26} {:<26} {:<16} {:<10} {:<10}",
            trunc(&deal.deal_name, 26),
            trunc(deal.advisor_name.as_deref().unwrap_or("—"), 26),
            trunc(deal.program.as_deref().unwrap_or("—"), 26),
            normalize_status(deal.status.as_deref()).to_string(),
            deal.creation_date().unwrap_or("—"),
            deal.closing_date().unwrap_or("—"),
        );
    }
    println!("{} rows", rows.len());
}

fn trunc(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Display-layer search: case-insensitive substring over every visible field.
fn matches_search(deal: &Deal, term: &str) -> bool {
    let fields = [
        Some(deal.deal_name.as_str()),
        deal.advisor_name.as_deref(),
        deal.program.as_deref(),
        deal.status.as_deref(),
        deal.creation_date(),
        deal.closing_date(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_matches_any_field() {
        let deal = Deal {
            deal_name: "Mabel".into(),
            advisor_name: Some("Luz Karime".into()),
            program: Some("COSMETOLOGÍA".into()),
            status: Some("Contacto".into()),
            contact_date: Some("2025-11-19".into()),
            ..Default::default()
        };
        assert!(matches_search(&deal, "karime"));
        assert!(matches_search(&deal, "cosmeto"));
        assert!(matches_search(&deal, "2025-11"));
        assert!(!matches_search(&deal, "zzz"));
    }

    #[test]
    fn trunc_is_char_safe() {
        assert_eq!(trunc("corto", 10), "corto");
        assert_eq!(trunc("COSMETOLOGÍA", 5), "COSM…");
    }
}

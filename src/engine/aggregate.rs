//! The five derived views, each a single pass over the same snapshot.
//!
//! Counting rules (easy to get wrong, keep them consistent):
//!   * inflow metrics (`total_deals`, `created`, advisor `total`, program
//!     `count`) attribute a record by its CREATION date;
//!   * outcome metrics (`won`, `lost`) attribute by CLOSURE date, over the
//!     full list — a deal created long before the window still counts as won
//!     if it closed inside it. The two attributions overlap on purpose, which
//!     is why `conversion_rate` may exceed 100 and `other` needs a clamp.

use std::collections::{BTreeMap, HashMap};

use crate::engine::range::DateRange;
use crate::engine::status::normalize_status;
use crate::models::{AdvisorMetric, AggregatedStats, DashboardData, Deal, ProgramMetric, TimelinePoint};

// ── Global stats ──────────────────────────────────────────────────────────────

pub fn stats(deals: &[Deal], range: &DateRange) -> AggregatedStats {
    let mut total_deals = 0usize;
    let mut contact = 0usize;
    let mut won = 0usize;
    let mut lost = 0usize;

    for deal in deals {
        let status = normalize_status(deal.status.as_deref());

        if range.contains(deal.creation_date()) {
            total_deals += 1;
            if !status.is_closed() {
                contact += 1;
            }
        }

        if status.is_closed() && range.contains(deal.closing_date()) {
            if status.is_won() {
                won += 1;
            } else {
                lost += 1;
            }
        }
    }

    // Residual: created in-period but closed outside it. The signed
    // intermediate can go negative when out-of-period deals close in-period.
    let other = (total_deals as i64 - won as i64 - lost as i64 - contact as i64).max(0) as usize;

    let rate = |n: usize| {
        if total_deals > 0 {
            n as f64 / total_deals as f64 * 100.0
        } else {
            0.0
        }
    };

    AggregatedStats {
        total_deals,
        won,
        lost,
        contact,
        other,
        conversion_rate: rate(won),
        loss_rate: rate(lost),
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

/// Daily activity series. A record's `created` and `won` increments may land
/// on different days; a day exists iff something landed on it. BTreeMap keys
/// keep the output strictly ascending with no duplicates.
pub fn timeline(deals: &[Deal], range: &DateRange) -> Vec<TimelinePoint> {
    let mut buckets: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for deal in deals {
        if let Some(created) = deal.creation_date()
            && range.contains(Some(created))
        {
            buckets.entry(created).or_default().0 += 1;
        }

        if normalize_status(deal.status.as_deref()).is_won()
            && let Some(closed) = deal.closing_date()
            && range.contains(Some(closed))
        {
            buckets.entry(closed).or_default().1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, (created, won))| TimelinePoint {
            date: date.to_string(),
            created,
            won,
        })
        .collect()
}

// ── Per-advisor metrics ───────────────────────────────────────────────────────

/// Breakdown per salesperson. `fallback` labels records with no advisor.
/// Encounter order is kept for ties; the final sort (descending by `won`)
/// is stable.
pub fn advisor_metrics(deals: &[Deal], range: &DateRange, fallback: &str) -> Vec<AdvisorMetric> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut metrics: Vec<AdvisorMetric> = Vec::new();

    for deal in deals {
        let name = deal.advisor_name.as_deref().unwrap_or(fallback);
        let slot = match index.get(name) {
            Some(&i) => i,
            None => {
                let i = metrics.len();
                index.insert(name.to_string(), i);
                metrics.push(AdvisorMetric {
                    name: name.to_string(),
                    total: 0,
                    won: 0,
                    lost: 0,
                    conversion_rate: 0.0,
                    loss_rate: 0.0,
                });
                i
            }
        };
        let metric = &mut metrics[slot];

        let status = normalize_status(deal.status.as_deref());

        if range.contains(deal.creation_date()) {
            metric.total += 1;
        }
        if status.is_closed() && range.contains(deal.closing_date()) {
            if status.is_won() {
                metric.won += 1;
            } else {
                metric.lost += 1;
            }
        }
    }

    for metric in &mut metrics {
        if metric.total > 0 {
            metric.conversion_rate = metric.won as f64 / metric.total as f64 * 100.0;
            metric.loss_rate = metric.lost as f64 / metric.total as f64 * 100.0;
        }
    }

    metrics.retain(|m| m.total > 0 || m.won > 0 || m.lost > 0);
    metrics.sort_by(|a, b| b.won.cmp(&a.won));
    metrics
}

// ── Per-program metrics ───────────────────────────────────────────────────────

/// Breakdown per product line, same attribution rules as the advisor view.
pub fn program_metrics(deals: &[Deal], range: &DateRange, fallback: &str) -> Vec<ProgramMetric> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut metrics: Vec<ProgramMetric> = Vec::new();

    for deal in deals {
        let name = deal.program.as_deref().unwrap_or(fallback);
        let slot = match index.get(name) {
            Some(&i) => i,
            None => {
                let i = metrics.len();
                index.insert(name.to_string(), i);
                metrics.push(ProgramMetric {
                    name: name.to_string(),
                    count: 0,
                    won: 0,
                    conversion_rate: 0.0,
                });
                i
            }
        };
        let metric = &mut metrics[slot];

        if range.contains(deal.creation_date()) {
            metric.count += 1;
        }
        if normalize_status(deal.status.as_deref()).is_won() && range.contains(deal.closing_date())
        {
            metric.won += 1;
        }
    }

    for metric in &mut metrics {
        if metric.count > 0 {
            metric.conversion_rate = metric.won as f64 / metric.count as f64 * 100.0;
        }
    }

    metrics.retain(|m| m.count > 0 || m.won > 0);
    metrics.sort_by(|a, b| b.count.cmp(&a.count));
    metrics
}

// ── Filtered detail list ──────────────────────────────────────────────────────

/// The table view: records created in the window, plus Won/Lost records that
/// closed in it. With no window at all the raw snapshot comes back untouched,
/// in source order.
pub fn filter_deals(deals: &[Deal], range: &DateRange) -> Vec<Deal> {
    if range.is_unbounded() {
        return deals.to_vec();
    }

    let mut kept: Vec<Deal> = deals
        .iter()
        .filter(|deal| {
            if range.contains(deal.creation_date()) {
                return true;
            }
            normalize_status(deal.status.as_deref()).is_closed()
                && range.contains(deal.closing_date())
        })
        .cloned()
        .collect();

    // Most recently relevant first: closure date when present, else creation.
    let sort_key = |d: &Deal| {
        d.closing_date()
            .or_else(|| d.creation_date())
            .unwrap_or_default()
            .to_string()
    };
    kept.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
    kept
}

// ── All five at once ──────────────────────────────────────────────────────────

pub fn dashboard(
    deals: &[Deal],
    range: &DateRange,
    unknown_advisor: &str,
    no_program: &str,
) -> DashboardData {
    DashboardData {
        stats: stats(deals, range),
        timeline: timeline(deals, range),
        advisors: advisor_metrics(deals, range, unknown_advisor),
        programs: program_metrics(deals, range, no_program),
        deals: filter_deals(deals, range),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Weight-trend statistics and chart geometry over a user's weight entries.
//!
//! Everything here is pure: callers fetch entries, these functions only
//! order and measure them. Chronological order is by date, with entries on
//! the same date kept in insertion order.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::progress::WeightEntry;

/// Padding added above and below the weight range on the chart's y axis.
const CHART_MARGIN_KG: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub start_weight: Option<f64>,
    pub current_weight: Option<f64>,
    pub goal_weight: Option<f64>,
    /// Positive when weight was lost.
    pub total_lost: Option<f64>,
    pub remaining_to_goal: Option<f64>,
    /// 0–100. `None` when the start weight already equals the goal.
    pub progress_percentage: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Weight went down.
    Positive,
    /// Weight went up.
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(flatten)]
    pub entry: WeightEntry,
    /// Difference to the chronologically preceding entry; `None` for the first one.
    pub change: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("a chart needs at least 2 weight entries, found {found}")]
    NotEnoughEntries { found: usize },
}

/// Entries oldest first. The sort is stable, so same-day entries keep input order.
pub fn chronological(entries: &[WeightEntry]) -> Vec<&WeightEntry> {
    let mut sorted: Vec<&WeightEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);
    sorted
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn summarize(
    entries: &[WeightEntry],
    fallback_weight: Option<f64>,
    goal_weight: Option<f64>,
) -> Summary {
    let sorted = chronological(entries);
    let start_weight = sorted.first().map(|e| e.weight).or(fallback_weight);
    let current_weight = sorted.last().map(|e| e.weight).or(fallback_weight);

    let total_lost = match (start_weight, current_weight) {
        (Some(start), Some(current)) => Some(round1(start - current)),
        _ => None,
    };
    let remaining_to_goal = match (current_weight, goal_weight) {
        (Some(current), Some(goal)) => Some(round1(current - goal)),
        _ => None,
    };
    let progress_percentage = match (start_weight, current_weight, goal_weight) {
        (Some(start), Some(current), Some(goal)) if (start - goal).abs() > f64::EPSILON => {
            Some(((start - current) / (start - goal) * 100.0).clamp(0.0, 100.0))
        }
        _ => None,
    };

    Summary {
        start_weight,
        current_weight,
        goal_weight,
        total_lost,
        remaining_to_goal,
        progress_percentage,
    }
}

/// Entries newest first, each annotated with its change from the previous weigh-in.
pub fn history(entries: &[WeightEntry]) -> Vec<HistoryItem> {
    let sorted = chronological(entries);
    let mut items: Vec<HistoryItem> = sorted
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let change = i
                .checked_sub(1)
                .map(|prev| round1(entry.weight - sorted[prev].weight));
            let trend = match change {
                Some(c) if c < 0.0 => Trend::Positive,
                Some(c) if c > 0.0 => Trend::Negative,
                _ => Trend::Neutral,
            };
            HistoryItem {
                entry: (*entry).clone(),
                change,
                trend,
            }
        })
        .collect();
    items.reverse();
    items
}

/// Screen coordinates for a line chart of the entries, oldest on the left.
///
/// x is spread evenly over `[padding, width - padding]`; y maps
/// `[min - 2, max + 2]` kg onto `[height - padding, padding]`, so heavier
/// weigh-ins sit higher.
pub fn chart_points(
    entries: &[WeightEntry],
    width: f64,
    height: f64,
    padding: f64,
) -> Result<Vec<ChartPoint>, ChartError> {
    if entries.len() < 2 {
        return Err(ChartError::NotEnoughEntries {
            found: entries.len(),
        });
    }

    let sorted = chronological(entries);
    let (min, max) = weight_bounds(&sorted);
    let range = max - min;
    let last = (sorted.len() - 1) as f64;
    let plot_width = width - padding * 2.0;
    let plot_height = height - padding * 2.0;

    Ok(sorted
        .iter()
        .enumerate()
        .map(|(i, entry)| ChartPoint {
            x: padding + (i as f64 / last) * plot_width,
            y: height - padding - ((entry.weight - min) / range) * plot_height,
            weight: entry.weight,
            date: entry.date,
        })
        .collect())
}

/// The chart's y-axis range: observed weights widened by the margin on both sides.
pub fn weight_bounds(entries: &[&WeightEntry]) -> (f64, f64) {
    let min = entries.iter().map(|e| e.weight).fold(f64::INFINITY, f64::min);
    let max = entries
        .iter()
        .map(|e| e.weight)
        .fold(f64::NEG_INFINITY, f64::max);
    (min - CHART_MARGIN_KG, max + CHART_MARGIN_KG)
}

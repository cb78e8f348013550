//! Derived statistics over the entry list: calorie targets, daily totals,
//! rolling averages, and the cumulative intake series used by the chart.

use crate::models::{CumulativePoint, CumulativeSeries, DailyReport, DayPoint, Entry, Targets};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Window for the rolling daily average, in days.
const ROLLING_WINDOW: usize = 7;

/// Conventional estimate of calories per pound of body weight.
const CALORIES_PER_LB: f64 = 3500.0;

/// Sedentary maintenance is estimated at 14 kcal per pound of body weight.
/// The weekly-loss targets subtract 500 and 1000 kcal/day and never go below
/// a 1200 kcal floor.
pub fn targets_for_weight(weight: f64) -> Targets {
    let maintenance = (weight * 14.0).round() as i64;
    Targets {
        maintenance,
        one_lb: (maintenance - 500).max(1200),
        two_lb: (maintenance - 1000).max(1200),
    }
}

/// Sums calories per UTC calendar date, ascending. ISO date strings sort
/// lexicographically in chronological order, so a BTreeMap does the work.
pub fn daily_totals(entries: &[Entry]) -> Vec<(String, i64)> {
    let mut days: BTreeMap<String, i64> = BTreeMap::new();
    for entry in entries {
        let Some(time) = DateTime::<Utc>::from_timestamp_millis(entry.timestamp) else {
            continue;
        };
        *days.entry(time.date_naive().to_string()).or_default() += entry.calories;
    }
    days.into_iter().collect()
}

/// For each index, the mean of the totals over the up-to-`window` values
/// ending there, rounded to the nearest integer.
pub fn rolling_average(totals: &[i64], window: usize) -> Vec<i64> {
    (0..totals.len())
        .map(|i| {
            let start = i.saturating_sub(window - 1);
            let slice = &totals[start..=i];
            let sum: i64 = slice.iter().sum();
            (sum as f64 / slice.len() as f64).round() as i64
        })
        .collect()
}

pub fn build_daily_report(entries: &[Entry], targets: &Targets) -> DailyReport {
    let totals = daily_totals(entries);
    if totals.is_empty() {
        return DailyReport::NoData;
    }

    let values: Vec<i64> = totals.iter().map(|(_, total)| *total).collect();
    let averages = rolling_average(&values, ROLLING_WINDOW);
    let days = totals
        .into_iter()
        .zip(averages)
        .map(|((date, total), rolling_avg)| DayPoint {
            date,
            total,
            rolling_avg,
        })
        .collect();

    let sum: i64 = values.iter().sum();
    let overall_average = (sum as f64 / values.len() as f64).round() as i64;

    DailyReport::Ready {
        days,
        overall_average,
        projected_monthly_change: projected_monthly_change(targets.maintenance, overall_average),
    }
}

/// Projected pounds gained or lost over 30 days at the current average
/// intake. Positive means loss, negative means gain.
pub fn projected_monthly_change(maintenance: i64, overall_average: i64) -> f64 {
    (maintenance - overall_average) as f64 * 30.0 / CALORIES_PER_LB
}

/// Running sum over the timestamp-sorted entries, prefixed with a zero
/// "Start" point. The target lines ride along as constants so the chart can
/// draw them across the whole series.
pub fn build_cumulative_series(entries: &[Entry], targets: &Targets) -> CumulativeSeries {
    let mut points = Vec::with_capacity(entries.len() + 1);
    points.push(CumulativePoint {
        label: "Start".to_string(),
        total: 0,
    });

    let mut running = 0i64;
    for entry in entries {
        running += entry.calories;
        points.push(CumulativePoint {
            label: point_label(entry.timestamp),
            total: running,
        });
    }

    CumulativeSeries {
        points,
        maintenance: targets.maintenance,
        one_lb: targets.one_lb,
        two_lb: targets.two_lb,
    }
}

/// Total calories logged on one UTC calendar date.
pub fn total_for_date(entries: &[Entry], date: &str) -> i64 {
    entries
        .iter()
        .filter(|entry| {
            DateTime::<Utc>::from_timestamp_millis(entry.timestamp)
                .is_some_and(|time| time.date_naive().to_string() == date)
        })
        .map(|entry| entry.calories)
        .sum()
}

fn point_label(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp) {
        Some(time) => time.format("%m-%d %H:%M").to_string(),
        None => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, calories: i64, timestamp: i64) -> Entry {
        Entry::new(name, calories, timestamp)
    }

    const DAY_MS: i64 = 86_400_000;

    #[test]
    fn targets_for_normal_weight() {
        let targets = targets_for_weight(180.0);
        assert_eq!(targets.maintenance, 2520);
        assert_eq!(targets.one_lb, 2020);
        assert_eq!(targets.two_lb, 1520);
    }

    #[test]
    fn targets_floor_engages_at_low_weight() {
        let targets = targets_for_weight(50.0);
        assert_eq!(targets.maintenance, 700);
        assert_eq!(targets.one_lb, 1200);
        assert_eq!(targets.two_lb, 1200);
    }

    #[test]
    fn rolling_average_short_series() {
        assert_eq!(rolling_average(&[100, 200, 300], 7), vec![100, 150, 200]);
    }

    #[test]
    fn rolling_average_window_slides() {
        let totals = [700, 700, 700, 700, 700, 700, 700, 1400];
        let averages = rolling_average(&totals, 7);
        assert_eq!(averages[6], 700);
        // Window for the last index is days 1..=7: six 700s and one 1400.
        assert_eq!(averages[7], 800);
    }

    #[test]
    fn daily_totals_group_by_utc_date() {
        let entries = vec![
            entry("breakfast", 300, 0),
            entry("late snack", 100, DAY_MS - 1),
            entry("next day", 500, DAY_MS),
        ];
        let totals = daily_totals(&entries);
        assert_eq!(
            totals,
            vec![
                ("1970-01-01".to_string(), 400),
                ("1970-01-02".to_string(), 500),
            ]
        );
    }

    #[test]
    fn report_overall_average_and_projection() {
        let entries = vec![entry("day one", 1000, 0), entry("day two", 2000, DAY_MS)];
        let targets = Targets {
            maintenance: 1700,
            one_lb: 1200,
            two_lb: 1200,
        };

        match build_daily_report(&entries, &targets) {
            DailyReport::Ready {
                overall_average,
                projected_monthly_change,
                days,
            } => {
                assert_eq!(overall_average, 1500);
                assert_eq!(days.len(), 2);
                assert!((projected_monthly_change - 200.0 * 30.0 / 3500.0).abs() < 1e-9);
            }
            DailyReport::NoData => panic!("expected data"),
        }
    }

    #[test]
    fn report_with_no_entries_is_no_data() {
        let targets = targets_for_weight(150.0);
        assert!(matches!(
            build_daily_report(&[], &targets),
            DailyReport::NoData
        ));
    }

    #[test]
    fn cumulative_series_starts_at_zero_and_accumulates() {
        let entries = vec![entry("a", 200, 0), entry("b", 300, 60_000)];
        let targets = targets_for_weight(180.0);
        let series = build_cumulative_series(&entries, &targets);

        assert_eq!(series.points.len(), 3);
        assert_eq!(series.points[0].label, "Start");
        assert_eq!(series.points[0].total, 0);
        assert_eq!(series.points[1].total, 200);
        assert_eq!(series.points[2].total, 500);
        assert_eq!(series.maintenance, 2520);
    }

    #[test]
    fn total_for_date_only_counts_that_day() {
        let entries = vec![
            entry("a", 200, 0),
            entry("b", 300, DAY_MS),
            entry("c", 50, DAY_MS + 1),
        ];
        assert_eq!(total_for_date(&entries, "1970-01-01"), 200);
        assert_eq!(total_for_date(&entries, "1970-01-02"), 350);
        assert_eq!(total_for_date(&entries, "1970-01-03"), 0);
    }
}

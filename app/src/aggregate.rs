//! Period aggregation: turn a flat list of date-stamped entries into a
//! dense per-day series for the weekly and monthly views.
//!
//! The reductions work over bucket keys produced by
//! [`crate::dates::local_date_key`]; the store query that fetched the
//! entries filtered on the same keys, so every entry lands in exactly
//! one bucket of the enumerated range.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use shared::{DaySummary, MealEntry, WeightDaySummary, WeightEntry};

use crate::dates::{day_of_week_label, days_in_range, local_date_key};

/// Sum same-day meal entries into a sparse date-key -> calories map.
pub fn daily_calorie_totals(meals: &[MealEntry]) -> HashMap<String, i64> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for meal in meals {
        *totals.entry(meal.date.clone()).or_insert(0) += meal.calories;
    }
    totals
}

/// Average same-day weight measurements into a sparse date-key -> mean
/// map. Days with no measurements are simply absent here; the dense
/// series below turns absence into the `None` sentinel.
pub fn daily_weight_averages(entries: &[WeightEntry]) -> HashMap<String, f64> {
    let mut by_day: HashMap<String, (f64, u32)> = HashMap::new();
    for entry in entries {
        let slot = by_day.entry(entry.date.clone()).or_insert((0.0, 0));
        slot.0 += entry.weight;
        slot.1 += 1;
    }
    by_day
        .into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f64))
        .collect()
}

/// Dense calorie series over the inclusive range: one entry per
/// calendar day, ascending, 0 for days with no meals.
pub fn calorie_day_series(
    start: NaiveDate,
    end: NaiveDate,
    totals: &HashMap<String, i64>,
) -> Vec<DaySummary> {
    days_in_range(start, end)
        .into_iter()
        .map(|day| {
            let date = local_date_key(day);
            let calories = totals.get(&date).copied().unwrap_or(0);
            DaySummary {
                day: day.day(),
                day_of_week: day_of_week_label(day).to_string(),
                calories,
                date,
            }
        })
        .collect()
}

/// Dense weight series over the inclusive range: one entry per calendar
/// day, ascending, `None` for days with no measurement.
pub fn weight_day_series(
    start: NaiveDate,
    end: NaiveDate,
    averages: &HashMap<String, f64>,
) -> Vec<WeightDaySummary> {
    days_in_range(start, end)
        .into_iter()
        .map(|day| {
            let date = local_date_key(day);
            let weight = averages.get(&date).copied();
            WeightDaySummary {
                day: day.day(),
                day_of_week: day_of_week_label(day).to_string(),
                weight,
                date,
            }
        })
        .collect()
}

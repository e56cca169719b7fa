//! Domain services: validate input, call the store, keep the cached
//! aggregate views consistent.
//!
//! Validation failures return [`AppError::Validation`] before any store
//! call. Store failures propagate untouched; a period view is either
//! computed from a complete fetch or not at all.

use chrono::NaiveDate;
use shared::{DaySummary, MealDay, MealEntry, MealPatch, MealType, NewMeal, NewWeight, WeightDay, WeightDaySummary, WeightEntry};
use tracing::info;

use crate::aggregate::{calorie_day_series, daily_calorie_totals, daily_weight_averages, weight_day_series};
use crate::cache::{CachedSeries, EntryKind, QueryCache, QueryKey, View};
use crate::dates::{local_date_key, month_bounds, week_bounds};
use crate::error::AppError;
use crate::store::{MealStore, WeightStore};

fn validate_meal_fields(name: &str, calories: i64) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(
            "meal name must not be blank".to_string(),
        ));
    }
    if calories <= 0 {
        return Err(AppError::Validation(
            "calories must be a positive number".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Meal logging and period summaries.
pub struct MealService<S: MealStore> {
    store: S,
    cache: QueryCache,
}

impl<S: MealStore> MealService<S> {
    pub fn new(store: S, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    /// Log a meal on `today`'s local calendar day. Rejects a blank name
    /// or non-positive calories without contacting the store.
    pub async fn add_meal(
        &self,
        today: NaiveDate,
        name: &str,
        calories: i64,
        meal_type: MealType,
    ) -> Result<MealEntry, AppError> {
        let name = validate_meal_fields(name, calories)?;
        let meal = self
            .store
            .insert_meal(NewMeal {
                name,
                calories,
                meal_type,
                date: local_date_key(today),
            })
            .await?;
        info!("added meal {} ({} kcal) on {}", meal.id, meal.calories, meal.date);
        self.cache.invalidate_kind(EntryKind::Meals);
        Ok(meal)
    }

    /// Everything logged on one day, newest first, with the summed
    /// total for the day-summary header.
    pub async fn meal_day(&self, day: NaiveDate) -> Result<MealDay, AppError> {
        let date = local_date_key(day);
        let meals = self.store.meals_by_date(&date).await?;
        let total_calories = meals.iter().map(|m| m.calories).sum();
        Ok(MealDay {
            date,
            meals,
            total_calories,
        })
    }

    pub async fn get_meal(&self, id: i64) -> Result<MealEntry, AppError> {
        self.store.get_meal(id).await?.ok_or(AppError::NotFound(id))
    }

    /// Dense calorie series for the Sun-Sat week containing `today`.
    pub async fn week_summary(&self, today: NaiveDate) -> Result<Vec<DaySummary>, AppError> {
        let (start, end) = week_bounds(today);
        self.period_summary(View::Weekly, start, end).await
    }

    /// Dense calorie series for the calendar month containing `today`.
    pub async fn month_summary(&self, today: NaiveDate) -> Result<Vec<DaySummary>, AppError> {
        let (start, end) = month_bounds(today);
        self.period_summary(View::Monthly, start, end).await
    }

    async fn period_summary(
        &self,
        view: View,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DaySummary>, AppError> {
        let key = QueryKey {
            kind: EntryKind::Meals,
            view,
        };
        if let Some(CachedSeries::Calories(series)) = self.cache.get(&key) {
            return Ok(series);
        }
        let meals = self
            .store
            .meals_in_range(&local_date_key(start), &local_date_key(end))
            .await?;
        let totals = daily_calorie_totals(&meals);
        let series = calorie_day_series(start, end, &totals);
        self.cache.put(key, CachedSeries::Calories(series.clone()));
        Ok(series)
    }

    /// Full-record overwrite of a meal's editable fields.
    pub async fn update_meal(
        &self,
        id: i64,
        name: &str,
        calories: i64,
        meal_type: MealType,
    ) -> Result<(), AppError> {
        let name = validate_meal_fields(name, calories)?;
        self.store
            .update_meal(
                id,
                MealPatch {
                    name,
                    calories,
                    meal_type,
                },
            )
            .await?;
        info!("updated meal {}", id);
        self.cache.invalidate_kind(EntryKind::Meals);
        Ok(())
    }

    /// Irreversible delete, gated behind an explicit confirmation the
    /// presentation layer collects first.
    pub async fn delete_meal(&self, id: i64, confirmed: bool) -> Result<(), AppError> {
        if !confirmed {
            return Err(AppError::Validation(
                "deleting a meal requires confirmation".to_string(),
            ));
        }
        self.store.delete_meal(id).await?;
        info!("deleted meal {}", id);
        self.cache.invalidate_kind(EntryKind::Meals);
        Ok(())
    }
}

/// Weight logging and period summaries.
pub struct WeightService<S: WeightStore> {
    store: S,
    cache: QueryCache,
}

impl<S: WeightStore> WeightService<S> {
    pub fn new(store: S, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    /// Log a measurement on `today`'s local calendar day.
    pub async fn add_weight(&self, today: NaiveDate, weight: f64) -> Result<WeightEntry, AppError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(AppError::Validation(
                "weight must be a positive number".to_string(),
            ));
        }
        let entry = self
            .store
            .insert_weight(NewWeight {
                weight,
                date: local_date_key(today),
            })
            .await?;
        info!("added weight {} ({} kg) on {}", entry.id, entry.weight, entry.date);
        self.cache.invalidate_kind(EntryKind::Weights);
        Ok(entry)
    }

    /// Measurements for one day, newest first.
    pub async fn weight_day(&self, day: NaiveDate) -> Result<WeightDay, AppError> {
        let date = local_date_key(day);
        let entries = self.store.weights_by_date(&date).await?;
        Ok(WeightDay { date, entries })
    }

    /// Dense weight series for the Sun-Sat week containing `today`.
    pub async fn week_summary(&self, today: NaiveDate) -> Result<Vec<WeightDaySummary>, AppError> {
        let (start, end) = week_bounds(today);
        self.period_summary(View::Weekly, start, end).await
    }

    /// Dense weight series for the calendar month containing `today`.
    pub async fn month_summary(&self, today: NaiveDate) -> Result<Vec<WeightDaySummary>, AppError> {
        let (start, end) = month_bounds(today);
        self.period_summary(View::Monthly, start, end).await
    }

    async fn period_summary(
        &self,
        view: View,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WeightDaySummary>, AppError> {
        let key = QueryKey {
            kind: EntryKind::Weights,
            view,
        };
        if let Some(CachedSeries::Weights(series)) = self.cache.get(&key) {
            return Ok(series);
        }
        let entries = self
            .store
            .weights_in_range(&local_date_key(start), &local_date_key(end))
            .await?;
        let averages = daily_weight_averages(&entries);
        let series = weight_day_series(start, end, &averages);
        self.cache.put(key, CachedSeries::Weights(series.clone()));
        Ok(series)
    }

    /// Irreversible delete, gated behind explicit confirmation.
    pub async fn delete_weight(&self, id: i64, confirmed: bool) -> Result<(), AppError> {
        if !confirmed {
            return Err(AppError::Validation(
                "deleting a weight entry requires confirmation".to_string(),
            ));
        }
        self.store.delete_weight(id).await?;
        info!("deleted weight entry {}", id);
        self.cache.invalidate_kind(EntryKind::Weights);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn meal_service(store: &MemoryStore) -> MealService<MemoryStore> {
        MealService::new(store.clone(), QueryCache::new())
    }

    async fn seed_meal(store: &MemoryStore, date: &str, calories: i64) {
        store
            .insert_meal(NewMeal {
                name: format!("{} kcal", calories),
                calories,
                meal_type: MealType::Lunch,
                date: date.to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_meal_never_reaches_the_store() {
        let store = MemoryStore::new();
        let service = meal_service(&store);
        let today = d(2024, 6, 3);

        let err = service
            .add_meal(today, "lunch", -5, MealType::Lunch)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.meal_count(), 0);

        let err = service
            .add_meal(today, "   ", 300, MealType::Snack)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.meal_count(), 0);
    }

    #[tokio::test]
    async fn added_meal_is_trimmed_and_dated_today() {
        let store = MemoryStore::new();
        let service = meal_service(&store);

        let meal = service
            .add_meal(d(2024, 6, 3), "  toast  ", 150, MealType::Breakfast)
            .await
            .unwrap();
        assert_eq!(meal.name, "toast");
        assert_eq!(meal.date, "2024-06-03");
    }

    #[tokio::test]
    async fn week_summary_matches_the_logged_days() {
        let store = MemoryStore::new();
        let service = meal_service(&store);
        seed_meal(&store, "2024-06-03", 500).await;
        seed_meal(&store, "2024-06-03", 300).await;
        seed_meal(&store, "2024-06-04", 200).await;

        // June 5th 2024 was a Wednesday; its week is June 2nd-8th.
        let series = service.week_summary(d(2024, 6, 5)).await.unwrap();

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, "2024-06-02");
        assert_eq!(series[1].calories, 800);
        assert_eq!(series[2].calories, 200);
        assert_eq!(series.iter().filter(|s| s.calories == 0).count(), 5);
    }

    #[tokio::test]
    async fn month_summary_covers_every_day() {
        let store = MemoryStore::new();
        let service = meal_service(&store);
        seed_meal(&store, "2024-06-01", 400).await;
        seed_meal(&store, "2024-06-30", 600).await;

        let series = service.month_summary(d(2024, 6, 15)).await.unwrap();
        assert_eq!(series.len(), 30);
        assert_eq!(series[0].calories, 400);
        assert_eq!(series[29].calories, 600);
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let store = MemoryStore::new();
        let service = meal_service(&store);
        seed_meal(&store, "2024-06-03", 500).await;

        let first = service.week_summary(d(2024, 6, 5)).await.unwrap();
        let second = service.week_summary(d(2024, 6, 5)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.range_query_count(), 1);
    }

    #[tokio::test]
    async fn mutation_invalidates_period_views() {
        let store = MemoryStore::new();
        let service = meal_service(&store);

        service.week_summary(d(2024, 6, 5)).await.unwrap();
        service.month_summary(d(2024, 6, 5)).await.unwrap();
        assert_eq!(store.range_query_count(), 2);

        service
            .add_meal(d(2024, 6, 5), "dinner", 700, MealType::Dinner)
            .await
            .unwrap();

        // Both views recompute from a fresh fetch and see the new meal.
        let week = service.week_summary(d(2024, 6, 5)).await.unwrap();
        assert_eq!(store.range_query_count(), 3);
        assert_eq!(week[3].calories, 700);
    }

    #[tokio::test]
    async fn update_is_a_full_overwrite_and_invalidates() {
        let store = MemoryStore::new();
        let service = meal_service(&store);
        let meal = service
            .add_meal(d(2024, 6, 5), "soup", 250, MealType::Lunch)
            .await
            .unwrap();
        service.week_summary(d(2024, 6, 5)).await.unwrap();

        service
            .update_meal(meal.id, "big soup", 400, MealType::Dinner)
            .await
            .unwrap();

        let updated = service.get_meal(meal.id).await.unwrap();
        assert_eq!(updated.name, "big soup");
        assert_eq!(updated.calories, 400);
        assert_eq!(updated.meal_type, MealType::Dinner);

        let week = service.week_summary(d(2024, 6, 5)).await.unwrap();
        assert_eq!(week[3].calories, 400);
    }

    #[tokio::test]
    async fn unconfirmed_delete_is_refused() {
        let store = MemoryStore::new();
        let service = meal_service(&store);
        let meal = service
            .add_meal(d(2024, 6, 5), "cake", 350, MealType::Snack)
            .await
            .unwrap();

        let err = service.delete_meal(meal.id, false).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.meal_count(), 1);

        service.delete_meal(meal.id, true).await.unwrap();
        assert_eq!(store.meal_count(), 0);
    }

    /// Store stub whose every fetch fails, for the whole-period-unavailable contract.
    #[derive(Clone)]
    struct BrokenStore;

    impl MealStore for BrokenStore {
        async fn meals_by_date(&self, _: &str) -> Result<Vec<MealEntry>, AppError> {
            Err(AppError::Store { status: 500, message: "backend down".into() })
        }
        async fn meals_in_range(&self, _: &str, _: &str) -> Result<Vec<MealEntry>, AppError> {
            Err(AppError::Store { status: 500, message: "backend down".into() })
        }
        async fn get_meal(&self, _: i64) -> Result<Option<MealEntry>, AppError> {
            Err(AppError::Store { status: 500, message: "backend down".into() })
        }
        async fn insert_meal(&self, _: NewMeal) -> Result<MealEntry, AppError> {
            Err(AppError::Store { status: 500, message: "backend down".into() })
        }
        async fn update_meal(&self, _: i64, _: MealPatch) -> Result<(), AppError> {
            Err(AppError::Store { status: 500, message: "backend down".into() })
        }
        async fn delete_meal(&self, _: i64) -> Result<(), AppError> {
            Err(AppError::Store { status: 500, message: "backend down".into() })
        }
    }

    #[tokio::test]
    async fn failed_fetch_yields_no_partial_series() {
        let cache = QueryCache::new();
        let service = MealService::new(BrokenStore, cache.clone());

        let err = service.week_summary(d(2024, 6, 5)).await.unwrap_err();
        assert!(matches!(err, AppError::Store { status: 500, .. }));
        // Nothing was cached for the failed period.
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn meal_day_sums_and_orders_newest_first() {
        let store = MemoryStore::new();
        let service = meal_service(&store);
        seed_meal(&store, "2024-06-03", 500).await;
        seed_meal(&store, "2024-06-03", 300).await;
        seed_meal(&store, "2024-06-04", 200).await;

        let day = service.meal_day(d(2024, 6, 3)).await.unwrap();
        assert_eq!(day.total_calories, 800);
        assert_eq!(day.meals.len(), 2);
        assert!(day.meals[0].id > day.meals[1].id);
    }

    fn weight_service(store: &MemoryStore) -> WeightService<MemoryStore> {
        WeightService::new(store.clone(), QueryCache::new())
    }

    #[tokio::test]
    async fn rejected_weight_never_reaches_the_store() {
        let store = MemoryStore::new();
        let service = weight_service(&store);
        let today = d(2024, 6, 3);

        for bad in [0.0, -70.0, f64::NAN, f64::INFINITY] {
            let err = service.add_weight(today, bad).await.unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(store.weight_count(), 0);
    }

    #[tokio::test]
    async fn weight_week_averages_same_day_entries() {
        let store = MemoryStore::new();
        let service = weight_service(&store);
        store
            .insert_weight(NewWeight { weight: 70.0, date: "2024-06-03".into() })
            .await
            .unwrap();
        store
            .insert_weight(NewWeight { weight: 72.0, date: "2024-06-03".into() })
            .await
            .unwrap();

        let series = service.week_summary(d(2024, 6, 5)).await.unwrap();
        assert_eq!(series.len(), 7);
        assert_eq!(series[1].date, "2024-06-03");
        assert_eq!(series[1].weight, Some(71.0));
        assert_eq!(series.iter().filter(|s| s.weight.is_none()).count(), 6);
    }

    #[tokio::test]
    async fn weight_mutation_invalidates_weight_views_only() {
        let store = MemoryStore::new();
        let cache = QueryCache::new();
        let meals = MealService::new(store.clone(), cache.clone());
        let weights = WeightService::new(store.clone(), cache.clone());

        meals.week_summary(d(2024, 6, 5)).await.unwrap();
        weights.week_summary(d(2024, 6, 5)).await.unwrap();
        assert_eq!(store.range_query_count(), 2);

        weights.add_weight(d(2024, 6, 5), 70.5).await.unwrap();

        // Meal view still cached, weight view refetches.
        meals.week_summary(d(2024, 6, 5)).await.unwrap();
        weights.week_summary(d(2024, 6, 5)).await.unwrap();
        assert_eq!(store.range_query_count(), 3);
    }
}

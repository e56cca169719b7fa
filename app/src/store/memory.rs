//! In-memory store used by the test suite and by `--demo` runs. Mirrors
//! the remote store's observable behavior: assigned integer ids,
//! newest-first day listings, inclusive string-compare date ranges.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use shared::{MealEntry, MealPatch, NewMeal, NewWeight, WeightEntry};

use crate::error::AppError;
use crate::store::{MealStore, WeightStore};

#[derive(Default)]
struct Inner {
    meals: Vec<MealEntry>,
    weights: Vec<WeightEntry>,
    next_id: i64,
    range_queries: usize,
}

impl Inner {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared-handle in-memory row store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meal rows currently stored.
    pub fn meal_count(&self) -> usize {
        self.inner.lock().unwrap().meals.len()
    }

    /// Number of weight rows currently stored.
    pub fn weight_count(&self) -> usize {
        self.inner.lock().unwrap().weights.len()
    }

    /// How many range fetches have hit this store. Lets tests observe
    /// whether a period view was answered from cache or refetched.
    pub fn range_query_count(&self) -> usize {
        self.inner.lock().unwrap().range_queries
    }
}

impl MealStore for MemoryStore {
    async fn meals_by_date(&self, date_key: &str) -> Result<Vec<MealEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<MealEntry> = inner
            .meals
            .iter()
            .filter(|m| m.date == date_key)
            .cloned()
            .collect();
        // Ids are assigned in insertion order, so id-descending is
        // created_at-descending.
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn meals_in_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Vec<MealEntry>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.range_queries += 1;
        // Plain string comparison is correct because date keys are
        // zero-padded.
        Ok(inner
            .meals
            .iter()
            .filter(|m| m.date.as_str() >= start_key && m.date.as_str() <= end_key)
            .cloned()
            .collect())
    }

    async fn get_meal(&self, id: i64) -> Result<Option<MealEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.meals.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_meal(&self, meal: NewMeal) -> Result<MealEntry, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let entry = MealEntry {
            id: inner.assign_id(),
            name: meal.name,
            calories: meal.calories,
            meal_type: meal.meal_type,
            date: meal.date,
            created_at: Utc::now().to_rfc3339(),
        };
        inner.meals.push(entry.clone());
        Ok(entry)
    }

    async fn update_meal(&self, id: i64, patch: MealPatch) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let meal = inner
            .meals
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AppError::NotFound(id))?;
        meal.name = patch.name;
        meal.calories = patch.calories;
        meal.meal_type = patch.meal_type;
        Ok(())
    }

    async fn delete_meal(&self, id: i64) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.meals.len();
        inner.meals.retain(|m| m.id != id);
        if inner.meals.len() == before {
            return Err(AppError::NotFound(id));
        }
        Ok(())
    }
}

impl WeightStore for MemoryStore {
    async fn weights_by_date(&self, date_key: &str) -> Result<Vec<WeightEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<WeightEntry> = inner
            .weights
            .iter()
            .filter(|w| w.date == date_key)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn weights_in_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Vec<WeightEntry>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.range_queries += 1;
        Ok(inner
            .weights
            .iter()
            .filter(|w| w.date.as_str() >= start_key && w.date.as_str() <= end_key)
            .cloned()
            .collect())
    }

    async fn insert_weight(&self, entry: NewWeight) -> Result<WeightEntry, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let row = WeightEntry {
            id: inner.assign_id(),
            weight: entry.weight,
            date: entry.date,
            created_at: Utc::now().to_rfc3339(),
        };
        inner.weights.push(row.clone());
        Ok(row)
    }

    async fn delete_weight(&self, id: i64) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.weights.len();
        inner.weights.retain(|w| w.id != id);
        if inner.weights.len() == before {
            return Err(AppError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MealType;

    fn new_meal(name: &str, calories: i64, date: &str) -> NewMeal {
        NewMeal {
            name: name.to_string(),
            calories,
            meal_type: MealType::Lunch,
            date: date.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let first = store.insert_meal(new_meal("a", 100, "2024-06-03")).await.unwrap();
        let second = store.insert_meal(new_meal("b", 200, "2024-06-03")).await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(store.meal_count(), 2);
    }

    #[tokio::test]
    async fn day_listing_is_newest_first() {
        let store = MemoryStore::new();
        store.insert_meal(new_meal("older", 100, "2024-06-03")).await.unwrap();
        store.insert_meal(new_meal("newer", 200, "2024-06-03")).await.unwrap();
        store.insert_meal(new_meal("other day", 300, "2024-06-04")).await.unwrap();

        let rows = store.meals_by_date("2024-06-03").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "newer");
        assert_eq!(rows[1].name, "older");
    }

    #[tokio::test]
    async fn range_filter_is_inclusive_on_both_ends() {
        let store = MemoryStore::new();
        for day in ["2024-05-31", "2024-06-01", "2024-06-15", "2024-06-30", "2024-07-01"] {
            store.insert_meal(new_meal(day, 100, day)).await.unwrap();
        }
        let rows = store.meals_in_range("2024-06-01", "2024-06-30").await.unwrap();
        let mut dates: Vec<&str> = rows.iter().map(|m| m.date.as_str()).collect();
        dates.sort();
        assert_eq!(dates, vec!["2024-06-01", "2024-06-15", "2024-06-30"]);
    }

    #[tokio::test]
    async fn update_overwrites_every_editable_field() {
        let store = MemoryStore::new();
        let meal = store.insert_meal(new_meal("toast", 150, "2024-06-03")).await.unwrap();

        store
            .update_meal(
                meal.id,
                MealPatch {
                    name: "toast with jam".to_string(),
                    calories: 220,
                    meal_type: MealType::Breakfast,
                },
            )
            .await
            .unwrap();

        let updated = store.get_meal(meal.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "toast with jam");
        assert_eq!(updated.calories, 220);
        assert_eq!(updated.meal_type, MealType::Breakfast);
        // Store-owned fields are untouched
        assert_eq!(updated.date, meal.date);
        assert_eq!(updated.created_at, meal.created_at);
    }

    #[tokio::test]
    async fn delete_of_missing_id_reports_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_meal(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(99)));
    }
}

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single logged meal as stored in the remote `meals` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    /// Store-assigned identifier, immutable once created
    pub id: i64,
    /// Human-readable meal name (non-blank after trimming)
    pub name: String,
    /// Calorie count for this meal (always positive)
    pub calories: i64,
    /// Which meal of the day this was
    #[serde(rename = "type")]
    pub meal_type: MealType,
    /// Local calendar day the meal belongs to, "YYYY-MM-DD"
    pub date: String,
    /// Store-assigned creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Fixed set of meal categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Snack,
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// All variants in picker order.
    pub const ALL: [MealType; 4] = [
        MealType::Snack,
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
    ];
}

impl Default for MealType {
    fn default() -> Self {
        MealType::Snack
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MealType::Snack => "Snack",
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snack" => Ok(MealType::Snack),
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            other => Err(format!("unknown meal type: {}", other)),
        }
    }
}

/// A single logged body weight as stored in the remote `weight_entries`
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Store-assigned identifier
    pub id: i64,
    /// Body weight in kilograms (always positive)
    pub weight: f64,
    /// Local calendar day the measurement belongs to, "YYYY-MM-DD"
    pub date: String,
    /// Store-assigned creation timestamp (RFC 3339)
    pub created_at: String,
}

impl WeightEntry {
    /// Creation timestamp parsed for display, `None` if the store sent
    /// something unparseable.
    pub fn created_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_at).ok()
    }
}

/// Insert payload for a meal. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeal {
    pub name: String,
    pub calories: i64,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub date: String,
}

/// Full-record update payload for a meal. There are no partial-patch
/// semantics; the edit screen always sends every editable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPatch {
    pub name: String,
    pub calories: i64,
    #[serde(rename = "type")]
    pub meal_type: MealType,
}

/// Insert payload for a weight measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWeight {
    pub weight: f64,
    pub date: String,
}

/// One day's calorie bucket in a weekly or monthly series. A day with no
/// logged meals still appears, with `calories` = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Bucket key, "YYYY-MM-DD"
    pub date: String,
    /// Day of month (1-31), for the card header
    pub day: u32,
    /// Short weekday label ("Sun".."Sat")
    pub day_of_week: String,
    /// Summed calories for that day
    pub calories: i64,
}

/// One day's weight bucket. `weight` is `None` when nothing was logged
/// that day; a real measurement of zero never occurs (weights are
/// validated positive), so the sentinel is unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightDaySummary {
    pub date: String,
    pub day: u32,
    pub day_of_week: String,
    /// Arithmetic mean of the day's measurements, or `None` for no data
    pub weight: Option<f64>,
}

/// Listing for a single day: the entries newest-first plus the summed
/// total shown in the day-summary header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDay {
    pub date: String,
    pub meals: Vec<MealEntry>,
    pub total_calories: i64,
}

/// Listing of one day's weight measurements, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightDay {
    pub date: String,
    pub entries: Vec<WeightEntry>,
}

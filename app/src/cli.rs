//! Terminal presentation layer. Renders the services' output and
//! collects input; no business logic lives here.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use shared::{DaySummary, MealEntry, MealType, WeightDaySummary};

use crate::cache::QueryCache;
use crate::config::Config;
use crate::dates::{parse_date_key, today};
use crate::error::AppError;
use crate::service::{MealService, WeightService};
use crate::store::{MealStore, WeightStore};

#[derive(Parser)]
#[command(
    name = "diet-tracker",
    version,
    about = "Personal diet and weight tracker backed by a hosted store"
)]
pub struct Cli {
    /// Run against an empty in-memory store instead of the remote one
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log and review meals
    #[command(subcommand)]
    Meals(MealCommand),

    /// Log and review body weight
    #[command(subcommand)]
    Weight(WeightCommand),

    /// Show everything logged on one day (YYYY-MM-DD)
    Day { date: String },
}

#[derive(Subcommand)]
pub enum MealCommand {
    /// Log a meal for today
    Add {
        name: String,
        calories: i64,
        /// Meal category: snack, breakfast, lunch or dinner
        #[arg(long = "type", default_value = "snack")]
        meal_type: String,
    },
    /// List today's meals, or another day's with --date
    List {
        #[arg(long)]
        date: Option<String>,
    },
    /// Edit a meal; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        calories: Option<i64>,
        #[arg(long = "type")]
        meal_type: Option<String>,
    },
    /// Delete a meal (asks for confirmation unless --yes)
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Weekly progress, Sunday through Saturday
    Week,
    /// Progress for the current calendar month
    Month,
}

#[derive(Subcommand)]
pub enum WeightCommand {
    /// Log a weight measurement (kg) for today
    Add { kg: f64 },
    /// List today's measurements, or another day's with --date
    List {
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a measurement (asks for confirmation unless --yes)
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Weekly progress, Sunday through Saturday
    Week,
    /// Progress for the current calendar month
    Month,
}

/// Dispatch a parsed command against the given store.
pub async fn run<S>(command: Command, store: S, config: &Config) -> anyhow::Result<()>
where
    S: MealStore + WeightStore + Clone,
{
    let cache = QueryCache::new();
    let meals = MealService::new(store.clone(), cache.clone());
    let weights = WeightService::new(store, cache);

    match command {
        Command::Meals(cmd) => run_meal_command(cmd, &meals, config).await,
        Command::Weight(cmd) => run_weight_command(cmd, &weights).await,
        Command::Day { date } => {
            let day = parse_date_key(&date)
                .ok_or_else(|| anyhow::anyhow!("invalid date (expected YYYY-MM-DD): {}", date))?;
            let listing = meals.meal_day(day).await?;
            println!("Meals on {}", listing.date);
            render_meal_list(&listing.meals);
            render_day_total(listing.total_calories, config.calorie_goal);
            Ok(())
        }
    }
}

async fn run_meal_command<S: MealStore>(
    command: MealCommand,
    meals: &MealService<S>,
    config: &Config,
) -> anyhow::Result<()> {
    match command {
        MealCommand::Add {
            name,
            calories,
            meal_type,
        } => {
            let meal_type: MealType = meal_type.parse().map_err(AppError::Validation)?;
            let meal = meals.add_meal(today(), &name, calories, meal_type).await?;
            println!(
                "Logged \"{}\" ({}, {} kcal) for {}",
                meal.name, meal.meal_type, meal.calories, meal.date
            );
        }
        MealCommand::List { date } => {
            let day = resolve_day(date)?;
            let listing = meals.meal_day(day).await?;
            println!("Meals on {}", listing.date);
            render_meal_list(&listing.meals);
            render_day_total(listing.total_calories, config.calorie_goal);
        }
        MealCommand::Edit {
            id,
            name,
            calories,
            meal_type,
        } => {
            // Full-record overwrite: start from the stored meal and
            // apply whichever fields were given.
            let current = meals.get_meal(id).await?;
            let name = name.unwrap_or(current.name);
            let calories = calories.unwrap_or(current.calories);
            let meal_type = match meal_type {
                Some(raw) => raw.parse().map_err(AppError::Validation)?,
                None => current.meal_type,
            };
            meals.update_meal(id, &name, calories, meal_type).await?;
            println!("Updated meal {}", id);
        }
        MealCommand::Delete { id, yes } => {
            let meal = meals.get_meal(id).await?;
            let confirmed = yes || confirm(&format!("Delete \"{}\"?", meal.name))?;
            if !confirmed {
                println!("Cancelled.");
                return Ok(());
            }
            meals.delete_meal(id, confirmed).await?;
            println!("Deleted \"{}\"", meal.name);
        }
        MealCommand::Week => {
            println!("Weekly progress");
            render_calorie_series(&meals.week_summary(today()).await?, config.calorie_goal);
        }
        MealCommand::Month => {
            println!("Monthly progress");
            render_calorie_series(&meals.month_summary(today()).await?, config.calorie_goal);
        }
    }
    Ok(())
}

async fn run_weight_command<S: WeightStore>(
    command: WeightCommand,
    weights: &WeightService<S>,
) -> anyhow::Result<()> {
    match command {
        WeightCommand::Add { kg } => {
            let entry = weights.add_weight(today(), kg).await?;
            println!("Logged {} kg for {}", entry.weight, entry.date);
        }
        WeightCommand::List { date } => {
            let day = resolve_day(date)?;
            let listing = weights.weight_day(day).await?;
            println!("Weight on {}", listing.date);
            if listing.entries.is_empty() {
                println!("  (nothing logged)");
            }
            for entry in &listing.entries {
                let logged_at = entry
                    .created_time()
                    .map(|t| t.format("%H:%M").to_string())
                    .unwrap_or_default();
                println!("  #{:<5} {:>6.1} kg  {}", entry.id, entry.weight, logged_at);
            }
        }
        WeightCommand::Delete { id, yes } => {
            let confirmed = yes || confirm("Delete this weight entry?")?;
            if !confirmed {
                println!("Cancelled.");
                return Ok(());
            }
            weights.delete_weight(id, confirmed).await?;
            println!("Deleted weight entry {}", id);
        }
        WeightCommand::Week => {
            println!("Weekly weight progress");
            render_weight_series(&weights.week_summary(today()).await?);
        }
        WeightCommand::Month => {
            println!("Monthly weight progress");
            render_weight_series(&weights.month_summary(today()).await?);
        }
    }
    Ok(())
}

fn resolve_day(date: Option<String>) -> anyhow::Result<chrono::NaiveDate> {
    match date {
        Some(raw) => parse_date_key(&raw)
            .ok_or_else(|| anyhow::anyhow!("invalid date (expected YYYY-MM-DD): {}", raw)),
        None => Ok(today()),
    }
}

/// Ask a yes/no question on stdin; anything but y/yes cancels.
fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} This cannot be undone. [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn render_meal_list(meals: &[MealEntry]) {
    if meals.is_empty() {
        println!("  (nothing logged)");
        return;
    }
    for meal in meals {
        println!(
            "  #{:<5} {:>5} kcal  {:<9} {}",
            meal.id, meal.calories, meal.meal_type.to_string(), meal.name
        );
    }
}

fn render_day_total(total: i64, goal: i64) {
    println!("  Total: {} / {} kcal [{}]", total, goal, calorie_band(total, goal));
}

/// The original app's three color bands, keyed off the daily goal:
/// under goal is fine, up to 500 over is a warning, beyond that is over.
fn calorie_band(total: i64, goal: i64) -> &'static str {
    if total == 0 {
        "none"
    } else if total < goal {
        "ok"
    } else if total <= goal + 500 {
        "high"
    } else {
        "over"
    }
}

fn render_calorie_series(series: &[DaySummary], goal: i64) {
    for summary in series {
        println!(
            "  {} {:>2}  {:>5} kcal [{}]",
            summary.day_of_week,
            summary.day,
            summary.calories,
            calorie_band(summary.calories, goal)
        );
    }
}

fn render_weight_series(series: &[WeightDaySummary]) {
    for summary in series {
        match summary.weight {
            Some(kg) => println!("  {} {:>2}  {:>6.1} kg", summary.day_of_week, summary.day, kg),
            None => println!("  {} {:>2}     --- ", summary.day_of_week, summary.day),
        }
    }
}

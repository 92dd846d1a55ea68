//! Itinerary generation
//!
//! Packs catalog destinations into one plan per day with a single greedy pass:
//! visits are laid end to end from the day start, meal windows are skipped and
//! a destination that no longer fits before the day end is dropped for that day.
//!
//! The order destinations are tried in comes from a [`DayOrdering`]. Production
//! wiring shuffles the whole catalog independently for every day; tests plug in
//! [`IdentityOrdering`] to pin the exact slot sequence.

use chrono::{NaiveTime, Timelike};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use crate::models::{
    destination::Destination,
    itinerary::{DayPlan, ScheduleSlot},
};

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("number of days must be a positive integer")]
    InvalidDayCount,
    #[error("destination catalog is empty")]
    EmptyCatalog,
    #[error("invalid schedule configuration: {0}")]
    InvalidConfig(String),
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn minute_of_day(time: NaiveTime) -> u64 {
    u64::from(time.num_seconds_from_midnight() / 60)
}

fn time_at(minutes: u64) -> Option<NaiveTime> {
    let seconds = u32::try_from(minutes.checked_mul(60)?).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

/// A half-open interval `[start, end)` in which no visit may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl MealWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.contains_minute(minute_of_day(time))
    }

    fn bounds(&self) -> (u64, u64) {
        (minute_of_day(self.start), minute_of_day(self.end))
    }

    fn contains_minute(&self, minute: u64) -> bool {
        let (start, end) = self.bounds();
        minute >= start && minute < end
    }

    /// A visit straddles the window when it starts before the window opens and
    /// ends after it opens. Ending exactly when the window closes is allowed.
    /// Both ends are minutes since midnight; `end` may lie past midnight.
    fn is_straddled_by_minutes(&self, start: u64, end: u64) -> bool {
        let (window_start, window_end) = self.bounds();
        start < window_start && end > window_start && end != window_end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    /// Checked in order, so lunch should come before dinner.
    pub meal_windows: Vec<MealWindow>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_start: hm(8, 0),
            day_end: hm(22, 0),
            meal_windows: vec![
                MealWindow::new(hm(11, 0), hm(13, 0)),
                MealWindow::new(hm(17, 0), hm(19, 0)),
            ],
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.day_start >= self.day_end {
            return Err(ScheduleError::InvalidConfig(format!(
                "day start {} must be before day end {}",
                self.day_start.format("%H:%M"),
                self.day_end.format("%H:%M")
            )));
        }
        if let Some(window) = self.meal_windows.iter().find(|w| w.start >= w.end) {
            return Err(ScheduleError::InvalidConfig(format!(
                "meal window {}-{} is empty",
                window.start.format("%H:%M"),
                window.end.format("%H:%M")
            )));
        }
        Ok(())
    }
}

/// Decides the order destinations are tried in for a given day.
pub trait DayOrdering {
    fn order<'a>(&mut self, day: u32, destinations: &'a [Destination]) -> Vec<&'a Destination>;
}

/// Full random permutation of the catalog, drawn fresh for every day.
pub struct RandomOrdering<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomOrdering<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DayOrdering for RandomOrdering<R> {
    fn order<'a>(&mut self, _day: u32, destinations: &'a [Destination]) -> Vec<&'a Destination> {
        let mut ordered: Vec<&Destination> = destinations.iter().collect();
        ordered.shuffle(&mut self.rng);
        ordered
    }
}

/// Catalog order, every day.
pub struct IdentityOrdering;

impl DayOrdering for IdentityOrdering {
    fn order<'a>(&mut self, _day: u32, destinations: &'a [Destination]) -> Vec<&'a Destination> {
        destinations.iter().collect()
    }
}

pub struct ItineraryGenerator {
    config: ScheduleConfig,
}

impl Default for ItineraryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ItineraryGenerator {
    pub fn new() -> Self {
        Self {
            config: ScheduleConfig::default(),
        }
    }

    pub fn with_config(config: ScheduleConfig) -> Result<Self, ScheduleError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Generate one plan per day, numbered from 1.
    pub fn generate<O: DayOrdering>(
        &self,
        destinations: &[Destination],
        num_days: u32,
        ordering: &mut O,
    ) -> Result<Vec<DayPlan>, ScheduleError> {
        if num_days == 0 {
            return Err(ScheduleError::InvalidDayCount);
        }
        if destinations.is_empty() {
            return Err(ScheduleError::EmptyCatalog);
        }

        let plans = (1..=num_days)
            .map(|day| {
                let ordered = ordering.order(day, destinations);
                let schedule = self.schedule_day(&ordered);
                log::debug!(
                    "Day {}: scheduled {} of {} destinations",
                    day,
                    schedule.len(),
                    ordered.len()
                );
                DayPlan { day, schedule }
            })
            .collect();

        Ok(plans)
    }

    /// Greedy single pass over `ordered`; skipped destinations are not retried.
    ///
    /// The cursor is kept in minutes since midnight so a visit that would run
    /// past midnight still goes through the meal-window check before it is
    /// rejected for ending after the day end.
    pub fn schedule_day(&self, ordered: &[&Destination]) -> Vec<ScheduleSlot> {
        let mut schedule = Vec::new();
        let day_end = minute_of_day(self.config.day_end);
        let mut cursor = minute_of_day(self.config.day_start);
        let mut index = 0;

        while cursor < day_end && index < ordered.len() {
            if let Some(window) = self
                .config
                .meal_windows
                .iter()
                .find(|w| w.contains_minute(cursor))
            {
                cursor = window.bounds().1;
                continue;
            }

            let destination = ordered[index];
            let projected_end = cursor + u64::from(destination.duration_minutes);

            if let Some(window) = self
                .config
                .meal_windows
                .iter()
                .find(|w| w.is_straddled_by_minutes(cursor, projected_end))
            {
                cursor = window.bounds().1;
                continue;
            }

            if projected_end > day_end {
                index += 1;
                continue;
            }

            // Both ends are at or before the day end, so they are valid times of day.
            if let (Some(start), Some(end)) = (time_at(cursor), time_at(projected_end)) {
                schedule.push(ScheduleSlot::for_destination(destination, start, end));
            }
            cursor = projected_end;
            index += 1;
        }

        schedule
    }
}

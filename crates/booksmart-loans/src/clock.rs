//! # Clock
//!
//! Source of "today" for the loan workflow.
//!
//! Due dates, fines and days-remaining all depend on the current date.
//! The workflow never calls the system clock directly; it asks a
//! [`Clock`], so tests pin a fixed date and assert exact amounts.

use chrono::{Local, NaiveDate};

/// Where the workflow gets the current date from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// The machine's local date. Used in production.
    System,

    /// A frozen date. Used in tests and simulations.
    Fixed(NaiveDate),
}

impl Clock {
    /// The current date according to this clock.
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::System
    }
}

//! Calendar dates
//!
//! Leaderboard entries record the UTC calendar date they were set on.

use chrono::NaiveDate;

/// Source of "today"
pub trait Calendar {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock calendar (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    #[cfg(target_arch = "wasm32")]
    fn today(&self) -> NaiveDate {
        let now = js_sys::Date::new_0();
        NaiveDate::from_ymd_opt(
            now.get_utc_full_year() as i32,
            now.get_utc_month() + 1,
            now.get_utc_date(),
        )
        .unwrap_or(NaiveDate::MIN)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// Calendar pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedCalendar(pub NaiveDate);

impl Calendar for FixedCalendar {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

use chrono::{Datelike, Days, Local, NaiveDate};

/// Months shown on one calendar page.
pub const CALENDAR_PAGE_MONTHS: i32 = 12;

/// Error type for date arguments
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),
}

// ---------------------------------------------------------------------------
// Date cursor
// ---------------------------------------------------------------------------

/// The local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// Day heading, e.g. "January 10, 2024".
pub fn heading(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| DateError::InvalidDate(s.into()))
}

// ---------------------------------------------------------------------------
// Months
// ---------------------------------------------------------------------------

/// A calendar month, held as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthRef(NaiveDate);

impl MonthRef {
    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        MonthRef(date.with_day(1).unwrap_or(date))
    }

    /// Parse a `YYYY-MM` argument.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let first = format!("{}-01", s.trim());
        NaiveDate::parse_from_str(&first, "%Y-%m-%d")
            .map(MonthRef)
            .map_err(|_| DateError::InvalidMonth(s.into()))
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Move by `months` (negative goes back).
    pub fn shift(self, months: i32) -> Self {
        let index = self.year() * 12 + self.month0() as i32 + months;
        NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
            .map_or(self, MonthRef)
    }

    pub fn days_in_month(self) -> u32 {
        let next = self.shift(1).first_day();
        next.signed_duration_since(self.0).num_days() as u32
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        MonthRef::of(date) == self
    }

    /// Month heading, e.g. "January 2024".
    pub fn label(self) -> String {
        self.0.format("%B %Y").to_string()
    }

    fn month0(self) -> u32 {
        self.0.month0()
    }
}

/// One week row of a month grid; `None` cells fall outside the month.
pub type Week = [Option<NaiveDate>; 7];

/// Weeks of a month starting on Sunday.
pub fn month_grid(month: MonthRef) -> Vec<Week> {
    let lead = month.first_day().weekday().num_days_from_sunday() as usize;
    let mut weeks = Vec::new();
    let mut week: Week = [None; 7];
    let mut slot = lead;
    for day in 1..=month.days_in_month() {
        week[slot] = NaiveDate::from_ymd_opt(month.year(), month.month(), day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    weeks
}

/// Twelve consecutive months starting at `anchor`.
pub fn calendar_page(anchor: MonthRef) -> Vec<MonthRef> {
    (0..CALENDAR_PAGE_MONTHS).map(|i| anchor.shift(i)).collect()
}

// ---------------------------------------------------------------------------
// Calendar picker state
// ---------------------------------------------------------------------------

/// Cursor state for the calendar picker.
///
/// The page always contains the cursor: moving the cursor past either end of
/// the page turns the page by a full twelve months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    pub anchor: MonthRef,
    pub cursor: NaiveDate,
}

impl CalendarState {
    /// Open on the page starting at the current month, cursor on `selected`
    /// if it is on that page.
    pub fn open(selected: NaiveDate, today: NaiveDate) -> Self {
        let mut state = CalendarState {
            anchor: MonthRef::of(today),
            cursor: selected,
        };
        state.follow_cursor();
        state
    }

    pub fn months(&self) -> Vec<MonthRef> {
        calendar_page(self.anchor)
    }

    /// Move the cursor by whole days (negative goes back).
    pub fn move_days(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.cursor.checked_add_days(Days::new(days as u64))
        } else {
            self.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.cursor = date;
            self.follow_cursor();
        }
    }

    /// Turn the page by `pages` (each page is twelve months). The cursor
    /// keeps its day of month where possible.
    pub fn page(&mut self, pages: i32) {
        let months = pages * CALENDAR_PAGE_MONTHS;
        self.anchor = self.anchor.shift(months);
        let target = MonthRef::of(self.cursor).shift(months);
        let day = self.cursor.day().min(target.days_in_month());
        if let Some(date) = NaiveDate::from_ymd_opt(target.year(), target.month(), day) {
            self.cursor = date;
        }
    }

    fn follow_cursor(&mut self) {
        let cursor_month = MonthRef::of(self.cursor);
        while cursor_month < self.anchor {
            self.anchor = self.anchor.shift(-CALENDAR_PAGE_MONTHS);
        }
        while cursor_month > self.anchor.shift(CALENDAR_PAGE_MONTHS - 1) {
            self.anchor = self.anchor.shift(CALENDAR_PAGE_MONTHS);
        }
    }
}

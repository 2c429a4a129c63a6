use crate::models::{ParticipantType, Submission};
use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error;

pub const CELL_SIZE: u32 = 12;
pub const NO_ACTIVITY: &str = "#ebedf0";
pub const PALETTE: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapFilter {
    #[default]
    All,
    Contest,
    Practice,
    Virtual,
}

impl HeatmapFilter {
    pub fn admits(&self, participant_type: ParticipantType) -> bool {
        match self {
            HeatmapFilter::All => true,
            HeatmapFilter::Contest => participant_type == ParticipantType::Contest,
            HeatmapFilter::Practice => participant_type == ParticipantType::Practice,
            HeatmapFilter::Virtual => participant_type == ParticipantType::Virtual,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown heatmap filter `{0}`, expected one of all, contest, practice, virtual")]
pub struct ParseFilterError(String);

impl FromStr for HeatmapFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "all" => Ok(HeatmapFilter::All),
            "c" | "contest" => Ok(HeatmapFilter::Contest),
            "p" | "practice" => Ok(HeatmapFilter::Practice),
            "v" | "virtual" => Ok(HeatmapFilter::Virtual),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

impl fmt::Display for HeatmapFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HeatmapFilter::All => write!(f, "all"),
            HeatmapFilter::Contest => write!(f, "contest"),
            HeatmapFilter::Practice => write!(f, "practice"),
            HeatmapFilter::Virtual => write!(f, "virtual"),
        }
    }
}

/// `YYYYMMDD` → accepted submissions on that UTC day.
pub type DayCounts = BTreeMap<String, u32>;

pub fn day_key(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

pub fn day_counts(submissions: &[Submission], year: i32, filter: HeatmapFilter) -> DayCounts {
    let mut counts = DayCounts::new();

    for submission in submissions.iter() {
        if !submission.is_accepted() || !filter.admits(submission.participant_type) {
            continue;
        }
        let Some(date) = submission.submitted_at().map(|time| time.date_naive()) else {
            continue;
        };
        if date.year() != year {
            continue;
        }
        *counts.entry(day_key(date)).or_insert(0) += 1;
    }

    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapSummary {
    pub sum: u32,
    pub numdays: usize,
    pub avg: String,
    pub max: u32,
}

pub fn summarize(days: &DayCounts) -> HeatmapSummary {
    let sum: u32 = days.values().sum();
    let numdays = days.len();
    let avg = if numdays > 0 {
        format!("{:.2}", sum as f64 / numdays as f64)
    } else {
        String::from("0")
    };
    let max = days.values().copied().max().unwrap_or(0);

    HeatmapSummary {
        sum,
        numdays,
        avg,
        max,
    }
}

/// Quantizes `[0, max]` onto the five-step palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScale {
    upper: u32,
}

impl ColorScale {
    pub fn new(max_count: u32) -> Self {
        Self {
            upper: max_count.max(1),
        }
    }

    pub fn color(&self, count: u32) -> &'static str {
        if count == 0 {
            return NO_ACTIVITY;
        }
        let steps = PALETTE.len() as u64;
        let index = (count as u64 * steps / self.upper as u64).min(steps - 1);
        PALETTE[index as usize]
    }
}

/// Week-of-year with Sunday as the first day, days before the first Sunday
/// falling in week 0.
pub fn week_of_year(date: NaiveDate) -> u32 {
    (date.ordinal0() + 7 - date.weekday().num_days_from_sunday()) / 7
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub key: String,
    pub week: u32,
    pub weekday: u32,
    pub x: u32,
    pub y: u32,
    pub count: u32,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub year: i32,
    pub cell_size: u32,
    pub cells: Vec<CalendarCell>,
    pub month_paths: Vec<String>,
}

fn month_path(first: NaiveDate, last: NaiveDate) -> String {
    let c = CELL_SIZE;
    let (d0, w0) = (first.weekday().num_days_from_sunday(), week_of_year(first));
    let (d1, w1) = (last.weekday().num_days_from_sunday(), week_of_year(last));
    format!(
        "M{},{}H{}V{}H{}V{}H{}V0H{}Z",
        (w0 + 1) * c,
        d0 * c,
        w0 * c,
        7 * c,
        w1 * c,
        (d1 + 1) * c,
        (w1 + 1) * c,
        (w0 + 1) * c
    )
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// Lays out every day from Jan 1 to Dec 31 of `year`. Years outside the
/// calendar range produce an empty grid.
pub fn calendar(year: i32, days: &DayCounts) -> CalendarGrid {
    let scale = ColorScale::new(days.values().copied().max().unwrap_or(0));
    let mut cells = Vec::with_capacity(366);
    let mut month_paths = Vec::with_capacity(12);

    if let Some((first, last)) = year_bounds(year) {
        for date in first.iter_days().take_while(|date| *date <= last) {
            let key = day_key(date);
            let count = days.get(&key).copied().unwrap_or(0);
            let week = week_of_year(date);
            let weekday = date.weekday().num_days_from_sunday();
            let title = days.get(&key).map(|count| {
                format!("{}/{}/{}: {} submissions", &key[6..8], &key[4..6], &key[0..4], count)
            });

            cells.push(CalendarCell {
                key,
                week,
                weekday,
                x: week * CELL_SIZE,
                y: weekday * CELL_SIZE,
                count,
                color: scale.color(count),
                title,
            });
        }

        for month in 1..=12 {
            let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
                continue;
            };
            let last = NaiveDate::from_ymd_opt(year, month + 1, 1)
                .and_then(|next| next.pred_opt())
                .unwrap_or(last);
            month_paths.push(month_path(first, last));
        }
    }

    CalendarGrid {
        year,
        cell_size: CELL_SIZE,
        cells,
        month_paths,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub year: i32,
    pub filter: HeatmapFilter,
    pub days: DayCounts,
    pub summary: HeatmapSummary,
}

impl Heatmap {
    pub fn build(submissions: &[Submission], year: i32, filter: HeatmapFilter) -> Self {
        let days = day_counts(submissions, year, filter);
        let summary = summarize(&days);
        Self {
            year,
            filter,
            days,
            summary,
        }
    }

    pub fn grid(&self) -> CalendarGrid {
        calendar(self.year, &self.days)
    }

    pub fn stats_line(&self) -> String {
        format!(
            "Submissions: {} over {} days, Average: {} submissions/day, Max: {} submissions",
            self.summary.sum, self.summary.numdays, self.summary.avg, self.summary.max
        )
    }

    /// Standalone SVG of the calendar, 53 weeks wide.
    pub fn to_svg(&self) -> String {
        let (width, height) = (900, 120);
        let c = CELL_SIZE;
        let grid = self.grid();
        let offset_x = (width - c * 53) / 2;
        let offset_y = height - c * 7 - 16;

        let weekday_labels = WEEKDAYS
            .iter()
            .enumerate()
            .map(|(i, day)| {
                format!(
                    r##"<text transform="translate(-5,{})" text-anchor="end" dy="-.25em" font-size="10" fill="#666">{}</text>"##,
                    c * (i as u32 + 1),
                    day
                )
            })
            .join("");
        let month_labels = MONTHS
            .iter()
            .enumerate()
            .map(|(i, month)| {
                format!(
                    r##"<text x="{:.1}" y="-10" text-anchor="middle" font-size="10" fill="#333">{}</text>"##,
                    (i as f64 + 1.0) * 53.0 / 12.0 * c as f64 - c as f64 * 2.0,
                    month
                )
            })
            .join("");
        let cells = grid
            .cells
            .iter()
            .map(|cell| {
                let title = cell
                    .title
                    .as_ref()
                    .map(|title| format!("<title>{}</title>", title))
                    .unwrap_or_default();
                format!(
                    r##"<rect class="day" x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="#fff">{}</rect>"##,
                    cell.x, cell.y, c, c, cell.color, title
                )
            })
            .join("");
        let months = grid
            .month_paths
            .iter()
            .map(|path| {
                format!(
                    r##"<path class="month" d="{}" fill="none" stroke="#999" stroke-width="1"/>"##,
                    path
                )
            })
            .join("");

        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{total}" viewBox="0 0 {width} {total}"><g transform="translate({offset_x},{offset_y})"><text transform="translate(-38,{year_y})rotate(-90)" text-anchor="middle" font-size="12" fill="#333">{year}</text>{weekday_labels}{month_labels}{cells}{months}</g><text x="{center}" y="{stats_y}" text-anchor="middle" font-size="11" fill="#666">{stats}</text></svg>"##,
            width = width,
            total = height + 20,
            offset_x = offset_x,
            offset_y = offset_y,
            year_y = c as f64 * 3.5,
            year = self.year,
            weekday_labels = weekday_labels,
            month_labels = month_labels,
            cells = cells,
            months = months,
            center = width / 2,
            stats_y = height + 12,
            stats = self.stats_line(),
        )
    }
}

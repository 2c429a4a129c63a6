use crate::models::{ProblemKey, RatingChange, Submission};
use chrono::{Datelike, SecondsFormat};
use serde::Serialize;
use serde_with::serde_as;
use std::collections::BTreeMap;

pub const RATING_BUCKET_WIDTH: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolvedProblem {
    /// Rating of the first accepted submission, 0 when unrated.
    pub rating: i32,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde_as(as = "Vec<(_, _)>")]
    pub solved_problems: BTreeMap<ProblemKey, SolvedProblem>,
    pub verdict_distribution: BTreeMap<String, usize>,
    pub solved_by_rating: BTreeMap<i32, usize>,
    pub submissions_by_month: BTreeMap<String, usize>,
}

impl Statistics {
    pub fn solved_count(&self) -> usize {
        self.solved_problems.len()
    }

    pub fn submission_count(&self) -> usize {
        self.verdict_distribution.values().sum()
    }
}

pub fn rating_bucket(rating: i32) -> i32 {
    rating.div_euclid(RATING_BUCKET_WIDTH) * RATING_BUCKET_WIDTH
}

pub fn rating_range_label(bucket: i32) -> String {
    format!("{}-{}", bucket, bucket + RATING_BUCKET_WIDTH - 1)
}

pub fn percentage(count: usize, total: usize) -> String {
    if total == 0 {
        String::from("0%")
    } else {
        format!("{:.1}%", count as f64 / total as f64 * 100.0)
    }
}

/// Folds a submission list, in input order, into the per-student aggregates.
pub fn aggregate(submissions: &[Submission]) -> Statistics {
    let mut stats = Statistics::default();

    for submission in submissions.iter() {
        *stats
            .verdict_distribution
            .entry(submission.verdict.clone())
            .or_insert(0) += 1;

        if let Some(month) = submission
            .submitted_at()
            .map(|time| time.format("%Y-%m").to_string())
        {
            *stats.submissions_by_month.entry(month).or_insert(0) += 1;
        }

        if !submission.is_accepted() || stats.solved_problems.contains_key(&submission.key) {
            continue;
        }

        stats.solved_problems.insert(
            submission.key.clone(),
            SolvedProblem {
                rating: submission.problem_rating.unwrap_or(0),
            },
        );
        if let Some(rating) = submission.problem_rating {
            *stats
                .solved_by_rating
                .entry(rating_bucket(rating))
                .or_insert(0) += 1;
        }
    }

    stats
}

/// Smallest and largest UTC year among the submissions.
pub fn year_range(submissions: &[Submission], fallback_year: i32) -> (i32, i32) {
    let years = submissions
        .iter()
        .filter_map(|submission| submission.submitted_at())
        .map(|time| time.year());

    years.fold(None, |range: Option<(i32, i32)>, year| match range {
        Some((min, max)) => Some((min.min(year), max.max(year))),
        None => Some((year, year)),
    })
    .unwrap_or((fallback_year, fallback_year))
}

/// The `count` most recent submissions, newest first. Equal timestamps keep
/// their input order.
pub fn recent_submissions(submissions: &[Submission], count: usize) -> Vec<&Submission> {
    let mut sorted: Vec<&Submission> = submissions.iter().collect();
    sorted.sort_by(|a, b| b.creation_time_seconds.cmp(&a.creation_time_seconds));
    sorted.truncate(count);
    sorted
}

pub fn recent_contests(contests: &[RatingChange], count: usize) -> Vec<&RatingChange> {
    let mut sorted: Vec<&RatingChange> = contests.iter().collect();
    sorted.sort_by(|a, b| {
        b.rating_update_time_seconds
            .cmp(&a.rating_update_time_seconds)
    });
    sorted.truncate(count);
    sorted
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPoint {
    pub label: String,
    pub updated_at: String,
    pub rating: i32,
    pub rank: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingHistory {
    pub points: Vec<RatingPoint>,
    pub axis_min: i32,
    pub axis_max: i32,
}

/// Chart series for the contest rating line, in input order, with the rating
/// axis padded by 200 on both sides.
pub fn rating_history(contests: &[RatingChange]) -> RatingHistory {
    let points = contests
        .iter()
        .map(|contest| {
            let updated_at = contest.updated_at();
            RatingPoint {
                label: updated_at
                    .map(|time| time.format("%b %Y").to_string())
                    .unwrap_or_default(),
                updated_at: updated_at
                    .map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true))
                    .unwrap_or_default(),
                rating: contest.new_rating,
                rank: contest.rank,
            }
        })
        .collect::<Vec<_>>();

    let axis_min = points
        .iter()
        .map(|point| point.rating)
        .min()
        .map(|min| (min - 200).max(0))
        .unwrap_or(0);
    let axis_max = points
        .iter()
        .map(|point| point.rating)
        .max()
        .filter(|max| *max > 0)
        .map(|max| max + 200)
        .unwrap_or(1000);

    RatingHistory {
        points,
        axis_min,
        axis_max,
    }
}

use crate::{
    color::{rating_color, verdict_color, Rgb},
    export::layout::{Document, Highlight, Layout},
    models::{RatingChange, Student, Submission},
    narrative::{self, NO_RESPONSE},
    stats::{self, percentage, rating_range_label, Statistics},
    table::Table,
    TableRow, ToCell,
};
use chrono::{DateTime, Utc};

const RECENT_SUBMISSIONS: usize = 10;
const RECENT_CONTESTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, TableRow)]
pub struct OverviewRow {
    #[column("Metric")]
    pub metric: String,
    #[column("Value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, TableRow)]
pub struct VerdictRow {
    #[column("Verdict")]
    pub verdict: String,
    #[column("Count")]
    pub count: usize,
    #[column("Percentage")]
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, TableRow)]
pub struct RatingRangeRow {
    #[column("Rating Range")]
    pub range: String,
    #[column("Solved")]
    pub solved: usize,
    #[column("Percentage")]
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, TableRow)]
pub struct RecentSubmissionRow {
    #[column("Problem")]
    pub problem: String,
    #[column("Rating")]
    pub rating: Option<i32>,
    #[column("Verdict")]
    pub verdict: String,
    #[column("Date")]
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, TableRow)]
pub struct RecentContestRow {
    #[column("Contest")]
    pub contest: String,
    #[column("Rank")]
    pub rank: String,
    #[column("Rating Change")]
    pub rating_change: String,
    #[column("Date")]
    pub date: String,
}

/// Inputs of a student report. `analysis` and `daily` are the coach texts;
/// `generated_at` stamps the footer.
pub struct ReportInput<'a> {
    pub student: &'a Student,
    pub analysis: Option<&'a str>,
    pub daily: Option<&'a str>,
    pub generated_at: DateTime<Utc>,
}

fn or_na(value: Option<i32>) -> String {
    value.to_cell()
}

pub fn overview_rows(student: &Student, statistics: &Statistics) -> Vec<OverviewRow> {
    let last_synced = student
        .last_synced
        .map(|time| time.format("%b %d, %Y %H:%M").to_string())
        .unwrap_or(String::from("Never"));

    [
        ("Name", student.name.clone()),
        ("Email", student.email.clone()),
        ("Codeforces Handle", student.codeforces_handle.clone()),
        ("Current Rating", or_na(student.current_rating)),
        ("Max Rating", or_na(student.max_rating)),
        ("Problems Solved", statistics.solved_count().to_string()),
        ("Total Submissions", student.submissions.len().to_string()),
        (
            "Contests Participated",
            student.contest_history.len().to_string(),
        ),
        ("Last Synced", last_synced),
    ]
    .into_iter()
    .map(|(metric, value)| OverviewRow {
        metric: metric.to_string(),
        value,
    })
    .collect()
}

pub fn verdict_rows(statistics: &Statistics) -> Vec<VerdictRow> {
    let total = statistics.submission_count();
    statistics
        .verdict_distribution
        .iter()
        .map(|(verdict, count)| VerdictRow {
            verdict: verdict.clone(),
            count: *count,
            percentage: percentage(*count, total),
        })
        .collect()
}

pub fn rating_range_rows(statistics: &Statistics) -> Vec<RatingRangeRow> {
    let total = statistics.solved_count();
    statistics
        .solved_by_rating
        .iter()
        .map(|(bucket, solved)| RatingRangeRow {
            range: rating_range_label(*bucket),
            solved: *solved,
            percentage: percentage(*solved, total),
        })
        .collect()
}

pub fn recent_submission_rows(submissions: &[Submission]) -> Vec<RecentSubmissionRow> {
    stats::recent_submissions(submissions, RECENT_SUBMISSIONS)
        .into_iter()
        .map(|submission| RecentSubmissionRow {
            problem: submission.display_name(),
            rating: submission.problem_rating,
            verdict: submission.verdict.clone(),
            date: submission
                .submitted_at()
                .map(|time| time.format("%b %d, %H:%M").to_string())
                .unwrap_or_default(),
        })
        .collect()
}

pub fn recent_contest_rows(contests: &[RatingChange]) -> Vec<RecentContestRow> {
    stats::recent_contests(contests, RECENT_CONTESTS)
        .into_iter()
        .map(|contest| RecentContestRow {
            contest: if contest.contest_name.is_empty() {
                String::from("Unknown Contest")
            } else {
                contest.contest_name.clone()
            },
            rank: if contest.rank > 0 {
                format!("#{}", contest.rank)
            } else {
                String::from("#N/A")
            },
            rating_change: format!("{:+}", contest.delta()),
            date: contest
                .updated_at()
                .map(|time| time.format("%b %d, %Y").to_string())
                .unwrap_or_default(),
        })
        .collect()
}

fn rating_range_highlight(value: &str) -> Option<Rgb> {
    value
        .split('-')
        .next()
        .and_then(|lower| lower.parse::<i32>().ok())
        .map(rating_color)
}

fn verdict_highlight(value: &str) -> Option<Rgb> {
    Some(verdict_color(value))
}

/// Lays out the full coaching report of one student.
pub fn student_report(input: &ReportInput) -> Document {
    let student = input.student;
    let submissions = student.resolved_submissions();
    let statistics = stats::aggregate(&submissions);

    let mut layout = Layout::new(&format!("{} Codeforces Report", student.name));

    layout.cover(
        &format!("{}'s Competitive Programming Report", student.name),
        &format!("Codeforces Handle: {}", student.codeforces_handle),
    );

    layout.section("AI Performance Analysis");
    let analysis = narrative::paragraphs(input.analysis.unwrap_or(NO_RESPONSE));
    if analysis.is_empty() {
        layout.paragraph(NO_RESPONSE);
    }
    for paragraph in analysis.iter() {
        layout.paragraph(paragraph);
    }

    layout.section("Today's Recommended Problem Set");
    let daily = input.daily.unwrap_or(NO_RESPONSE);
    let recommendations = narrative::parse_recommendations(daily);
    if recommendations.is_empty() {
        let fallback = narrative::plain_text(daily).replace("\n\n", "\n");
        layout.paragraph(if fallback.is_empty() {
            NO_RESPONSE
        } else {
            &fallback
        });
    } else {
        layout.table(&Table::from_rows(&recommendations), &[]);
    }

    layout.section("Student Overview");
    layout.table(&Table::from_rows(&overview_rows(student, &statistics)), &[]);

    layout.section("Performance Statistics");
    layout.subheading("Verdict Distribution");
    layout.table(&Table::from_rows(&verdict_rows(&statistics)), &[]);
    layout.subheading("Solved Problems by Rating");
    layout.table(
        &Table::from_rows(&rating_range_rows(&statistics)),
        &[Highlight {
            column: 0,
            color: rating_range_highlight,
        }],
    );

    layout.section("Recent Activity");
    if !submissions.is_empty() {
        layout.subheading("Recent Submissions (Last 10)");
        layout.table(
            &Table::from_rows(&recent_submission_rows(&submissions)),
            &[Highlight {
                column: 2,
                color: verdict_highlight,
            }],
        );
    }
    if !student.contest_history.is_empty() {
        layout.subheading("Recent Contests (Last 5)");
        layout.table(
            &Table::from_rows(&recent_contest_rows(&student.contest_history)),
            &[],
        );
    }

    layout.footer(&format!(
        "Generated by CF Coach on {}",
        input.generated_at.format("%b %d, %Y %H:%M")
    ));

    layout.finish()
}

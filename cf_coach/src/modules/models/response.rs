use cf_coach_libs::{
    heatmap::{DayCounts, Heatmap, HeatmapFilter, HeatmapSummary},
    models::Student,
    stats::{self, RatingHistory, Statistics},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Roster entry without the synchronized payload.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub codeforces_handle: String,
    pub current_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub submissions: usize,
    pub last_synced: Option<DateTime<Utc>>,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            name: student.name.clone(),
            email: student.email.clone(),
            codeforces_handle: student.codeforces_handle.clone(),
            current_rating: student.current_rating,
            max_rating: student.max_rating,
            submissions: student.submissions.len(),
            last_synced: student.last_synced,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub handle: String,
    pub solved_count: usize,
    pub submission_count: usize,
    pub min_year: i32,
    pub max_year: i32,
    pub statistics: Statistics,
    pub rating_history: RatingHistory,
}

impl StatsResponse {
    pub fn new(student: &Student, current_year: i32) -> Self {
        let submissions = student.resolved_submissions();
        let statistics = stats::aggregate(&submissions);
        let (min_year, max_year) = stats::year_range(&submissions, current_year);

        Self {
            handle: student.codeforces_handle.clone(),
            solved_count: statistics.solved_count(),
            submission_count: statistics.submission_count(),
            min_year,
            max_year,
            statistics,
            rating_history: stats::rating_history(&student.contest_history),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapResponse {
    pub handle: String,
    pub year: i32,
    pub filter: HeatmapFilter,
    pub min_year: i32,
    pub max_year: i32,
    pub days: DayCounts,
    pub summary: HeatmapSummary,
}

impl HeatmapResponse {
    /// `year` defaults to the latest year with a submission.
    pub fn new(
        student: &Student,
        year: Option<i32>,
        filter: HeatmapFilter,
        current_year: i32,
    ) -> (Self, Heatmap) {
        let submissions = student.resolved_submissions();
        let (min_year, max_year) = stats::year_range(&submissions, current_year);
        let heatmap = Heatmap::build(&submissions, year.unwrap_or(max_year), filter);

        (
            Self {
                handle: student.codeforces_handle.clone(),
                year: heatmap.year,
                filter,
                min_year,
                max_year,
                days: heatmap.days.clone(),
                summary: heatmap.summary.clone(),
            },
            heatmap,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cf_coach_libs::models::{StudentForm, SubmissionRecord};

    fn student() -> Student {
        let mut student = Student::new(StudentForm {
            name: String::from("Alice"),
            email: String::from("alice@example.com"),
            codeforces_handle: String::from("alice_cf"),
        });
        student.submissions = vec![
            SubmissionRecord {
                contest_id: Some(1),
                problem_index: Some(String::from("A")),
                creation_time_seconds: Some(1_609_459_200),
                verdict: Some(String::from("OK")),
                ..Default::default()
            },
            SubmissionRecord {
                contest_id: Some(2),
                problem_index: Some(String::from("B")),
                creation_time_seconds: Some(1_686_830_400),
                verdict: Some(String::from("OK")),
                participant_type: Some(String::from("CONTESTANT")),
                ..Default::default()
            },
        ];
        student
    }

    #[test]
    fn test_stats_response() {
        let response = StatsResponse::new(&student(), 2024);
        assert_eq!(response.solved_count, 2);
        assert_eq!((response.min_year, response.max_year), (2021, 2023));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["handle"], "alice_cf");
        assert_eq!(json["ratingHistory"]["axisMax"], 1000);
    }

    #[test]
    fn test_heatmap_response_defaults_to_latest_year() {
        let (response, heatmap) = HeatmapResponse::new(&student(), None, HeatmapFilter::All, 2024);
        assert_eq!(response.year, 2023);
        assert_eq!(response.days.get("20230615"), Some(&1));
        assert_eq!(heatmap.summary.sum, 1);

        let (practice, _) =
            HeatmapResponse::new(&student(), Some(2023), HeatmapFilter::Practice, 2024);
        assert!(practice.days.is_empty());
        assert_eq!(practice.summary.avg, "0");
    }

    #[test]
    fn test_student_summary() {
        let summary = StudentSummary::from(&student());
        assert_eq!(summary.submissions, 2);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["codeforcesHandle"], "alice_cf");
    }
}

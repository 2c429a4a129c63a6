use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const ACCEPTED: &str = "OK";
pub const UNKNOWN_VERDICT: &str = "UNKNOWN";

/// A submission as it is stored in the roster or returned by the upstream
/// backend. Every field may be missing.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub submission_id: Option<i64>,
    pub contest_id: Option<i64>,
    pub problem_index: Option<String>,
    pub problem_name: Option<String>,
    pub problem_rating: Option<i32>,
    pub creation_time_seconds: Option<i64>,
    pub verdict: Option<String>,
    pub participant_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParticipantType {
    Contest,
    Practice,
    Virtual,
    Other,
}

impl ParticipantType {
    pub fn resolve(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            None | Some("") => ParticipantType::Practice,
            Some("CONTEST") | Some("CONTESTANT") => ParticipantType::Contest,
            Some("PRACTICE") => ParticipantType::Practice,
            Some("VIRTUAL") => ParticipantType::Virtual,
            Some(_) => ParticipantType::Other,
        }
    }
}

/// Identifies a problem within a contest, e.g. `1328` + `A`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemKey {
    pub contest_id: i64,
    pub index: String,
}

impl fmt::Display for ProblemKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.contest_id, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub submission_id: Option<i64>,
    pub key: ProblemKey,
    pub problem_name: Option<String>,
    /// `None` for unrated problems. A stored rating of 0 is unrated too.
    pub problem_rating: Option<i32>,
    pub creation_time_seconds: i64,
    pub verdict: String,
    pub participant_type: ParticipantType,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.verdict == ACCEPTED
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.creation_time_seconds, 0).single()
    }

    pub fn display_name(&self) -> String {
        self.problem_name
            .clone()
            .unwrap_or_else(|| format!("Problem {}", self.key.index))
    }
}

impl From<&SubmissionRecord> for Submission {
    fn from(record: &SubmissionRecord) -> Self {
        Self {
            submission_id: record.submission_id,
            key: ProblemKey {
                contest_id: record.contest_id.unwrap_or(0),
                index: record.problem_index.clone().unwrap_or_default(),
            },
            problem_name: record.problem_name.clone(),
            problem_rating: record.problem_rating.filter(|rating| *rating > 0),
            creation_time_seconds: record.creation_time_seconds.unwrap_or(0),
            verdict: record
                .verdict
                .clone()
                .filter(|verdict| !verdict.is_empty())
                .unwrap_or(String::from(UNKNOWN_VERDICT)),
            participant_type: ParticipantType::resolve(record.participant_type.as_deref()),
        }
    }
}

pub fn resolve_submissions(records: &[SubmissionRecord]) -> Vec<Submission> {
    records.iter().map(Submission::from).collect()
}

/// One entry of a contestant's rating history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RatingChange {
    pub contest_id: i64,
    pub contest_name: String,
    pub rank: i64,
    pub rating_update_time_seconds: i64,
    pub old_rating: i32,
    pub new_rating: i32,
}

impl RatingChange {
    pub fn delta(&self) -> i32 {
        self.new_rating - self.old_rating
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.rating_update_time_seconds, 0).single()
    }
}

/// Everything the synchronizer pulls for a single handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub current_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub contest_history: Vec<RatingChange>,
    pub submissions: Vec<SubmissionRecord>,
}

static HANDLE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,24}$").unwrap());

fn validate_handle(value: &str) -> Result<(), ValidationError> {
    if HANDLE_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid codeforces handle"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_handle")]
    pub codeforces_handle: String,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub codeforces_handle: String,
    pub current_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub last_synced: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contest_history: Vec<RatingChange>,
    #[serde(default)]
    pub submissions: Vec<SubmissionRecord>,
}

impl Student {
    pub fn new(form: StudentForm) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: form.name,
            email: form.email,
            codeforces_handle: form.codeforces_handle,
            current_rating: None,
            max_rating: None,
            last_synced: None,
            contest_history: Vec::new(),
            submissions: Vec::new(),
        }
    }

    /// Overwrites the editable fields. Synchronized data is dropped when the
    /// handle changes since it belongs to another account.
    pub fn apply(&mut self, form: StudentForm) {
        if !self
            .codeforces_handle
            .eq_ignore_ascii_case(&form.codeforces_handle)
        {
            self.current_rating = None;
            self.max_rating = None;
            self.last_synced = None;
            self.contest_history.clear();
            self.submissions.clear();
        }
        self.name = form.name;
        self.email = form.email;
        self.codeforces_handle = form.codeforces_handle;
    }

    pub fn record_sync(&mut self, profile: Profile, now: DateTime<Utc>) {
        self.current_rating = profile.current_rating;
        self.max_rating = profile.max_rating;
        self.contest_history = profile.contest_history;
        self.submissions = profile.submissions;
        self.last_synced = Some(now);
    }

    pub fn resolved_submissions(&self) -> Vec<Submission> {
        resolve_submissions(&self.submissions)
    }
}

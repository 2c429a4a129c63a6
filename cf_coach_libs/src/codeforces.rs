use crate::models::{Profile, RatingChange, SubmissionRecord};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use thiserror::Error;

type Result<T> = std::result::Result<T, CodeforcesError>;

pub const DEFAULT_API_URL: &str = "https://codeforces.com/api/";

#[derive(Debug, Error)]
pub enum CodeforcesError {
    #[error("failed to request to Codeforces API")]
    RequestError(#[from] reqwest::Error),
    #[error("invalid Codeforces API url given")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("Codeforces API returned an error: {0}")]
    ApiError(String),
    #[error("user {0} not found")]
    UserNotFoundError(String),
}

/// Common wrapper of every Codeforces API response.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    pub comment: Option<String>,
    pub result: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self) -> Result<T> {
        if self.status != "OK" {
            return Err(CodeforcesError::ApiError(
                self.comment.unwrap_or(self.status),
            ));
        }
        self.result.ok_or(CodeforcesError::ApiError(String::from(
            "response without result",
        )))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub handle: String,
    pub rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub rank: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiProblem {
    pub contest_id: Option<i64>,
    pub index: Option<String>,
    pub name: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiParty {
    pub participant_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiSubmission {
    pub id: i64,
    pub contest_id: Option<i64>,
    pub creation_time_seconds: i64,
    #[serde(default)]
    pub problem: ApiProblem,
    #[serde(default)]
    pub author: ApiParty,
    pub verdict: Option<String>,
}

impl From<ApiSubmission> for SubmissionRecord {
    fn from(submission: ApiSubmission) -> Self {
        SubmissionRecord {
            submission_id: Some(submission.id),
            contest_id: submission.contest_id.or(submission.problem.contest_id),
            problem_index: submission.problem.index,
            problem_name: submission.problem.name,
            problem_rating: submission.problem.rating,
            creation_time_seconds: Some(submission.creation_time_seconds),
            verdict: submission.verdict,
            participant_type: submission.author.participant_type,
        }
    }
}

/// Where the synchronizer pulls a handle's profile from.
#[async_trait]
pub trait ProfileSource {
    async fn user_info(&self, handle: &str) -> Result<ApiUser>;
    async fn rating_history(&self, handle: &str) -> Result<Vec<RatingChange>>;
    async fn submissions(&self, handle: &str) -> Result<Vec<SubmissionRecord>>;

    async fn profile(&self, handle: &str) -> Result<Profile> {
        let (user, contest_history, submissions) = futures::try_join!(
            self.user_info(handle),
            self.rating_history(handle),
            self.submissions(handle)
        )?;

        Ok(Profile {
            current_rating: user.rating,
            max_rating: user.max_rating,
            contest_history,
            submissions,
        })
    }
}

pub struct CodeforcesClient {
    base_url: Url,
    client: Client,
}

impl CodeforcesClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let api_url = if api_url.ends_with('/') {
            api_url.to_string()
        } else {
            format!("{}/", api_url)
        };
        let base_url = Url::parse(&api_url)?;
        let client = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(30))
            .user_agent("cf_coach")
            .build()?;

        Ok(Self { base_url, client })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.base_url.join(method)?;
        tracing::debug!("GET {} {:?}", url, query);

        let res = self.client.get(url).query(query).send().await?;
        let status = res.status();
        let envelope: ApiEnvelope<T> = match res.json().await {
            Ok(envelope) => envelope,
            Err(e) if !status.is_success() => {
                return Err(CodeforcesError::ApiError(format!(
                    "unexpected status [{}] cause [{}]",
                    status, e
                )))
            }
            Err(e) => return Err(e.into()),
        };

        envelope.into_result()
    }
}

#[async_trait]
impl ProfileSource for CodeforcesClient {
    async fn user_info(&self, handle: &str) -> Result<ApiUser> {
        let users: Vec<ApiUser> = self.call("user.info", &[("handles", handle)]).await?;
        users
            .into_iter()
            .next()
            .ok_or(CodeforcesError::UserNotFoundError(handle.to_string()))
    }

    async fn rating_history(&self, handle: &str) -> Result<Vec<RatingChange>> {
        self.call("user.rating", &[("handle", handle)]).await
    }

    async fn submissions(&self, handle: &str) -> Result<Vec<SubmissionRecord>> {
        let submissions: Vec<ApiSubmission> =
            self.call("user.status", &[("handle", handle)]).await?;
        Ok(submissions
            .into_iter()
            .map(SubmissionRecord::from)
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deserialize_user_info() {
        let raw = r#"{"status":"OK","result":[{"handle":"tourist","rating":3757,"maxRating":4229,"rank":"legendary grandmaster","contribution":0}]}"#;
        let envelope: ApiEnvelope<Vec<ApiUser>> = serde_json::from_str(raw).unwrap();
        let users = envelope.into_result().unwrap();
        assert_eq!(users[0].handle, "tourist");
        assert_eq!(users[0].max_rating, Some(4229));
    }

    #[test]
    fn test_deserialize_unrated_user() {
        let raw = r#"{"status":"OK","result":[{"handle":"newbie"}]}"#;
        let envelope: ApiEnvelope<Vec<ApiUser>> = serde_json::from_str(raw).unwrap();
        let users = envelope.into_result().unwrap();
        assert_eq!(users[0].rating, None);
    }

    #[test]
    fn test_failed_envelope() {
        let raw = r#"{"status":"FAILED","comment":"handle: User with handle nobody not found"}"#;
        let envelope: ApiEnvelope<Vec<ApiUser>> = serde_json::from_str(raw).unwrap();
        match envelope.into_result() {
            Err(CodeforcesError::ApiError(comment)) => assert!(comment.contains("not found")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_rating_history() {
        let raw = r#"{"status":"OK","result":[{"contestId":1,"contestName":"Codeforces Beta Round #1","handle":"tourist","rank":1,"ratingUpdateTimeSeconds":1266588000,"oldRating":0,"newRating":1602}]}"#;
        let envelope: ApiEnvelope<Vec<RatingChange>> = serde_json::from_str(raw).unwrap();
        let history = envelope.into_result().unwrap();
        assert_eq!(history[0].delta(), 1602);
        assert_eq!(history[0].contest_name, "Codeforces Beta Round #1");
    }

    #[test]
    fn test_submission_to_record() {
        let raw = r#"{"status":"OK","result":[{"id":1,"contestId":1328,"creationTimeSeconds":1585233000,"relativeTimeSeconds":2147483647,"problem":{"contestId":1328,"index":"A","name":"Divisibility Problem","type":"PROGRAMMING","rating":800,"tags":["math"]},"author":{"contestId":1328,"members":[{"handle":"tourist"}],"participantType":"PRACTICE","ghost":false,"startTimeSeconds":1585233000},"programmingLanguage":"GNU C++17","verdict":"OK","testset":"TESTS","passedTestCount":10,"timeConsumedMillis":15,"memoryConsumedBytes":0}]}"#;
        let envelope: ApiEnvelope<Vec<ApiSubmission>> = serde_json::from_str(raw).unwrap();
        let record = SubmissionRecord::from(envelope.into_result().unwrap().remove(0));
        assert_eq!(
            record,
            SubmissionRecord {
                submission_id: Some(1),
                contest_id: Some(1328),
                problem_index: Some(String::from("A")),
                problem_name: Some(String::from("Divisibility Problem")),
                problem_rating: Some(800),
                creation_time_seconds: Some(1585233000),
                verdict: Some(String::from("OK")),
                participant_type: Some(String::from("PRACTICE")),
            }
        );
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = CodeforcesClient::new("https://codeforces.com/api").unwrap();
        assert_eq!(
            client.base_url.join("user.info").unwrap().as_str(),
            "https://codeforces.com/api/user.info"
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_profile() {
        let client = CodeforcesClient::new(DEFAULT_API_URL).unwrap();
        let profile = client.profile("tourist").await.unwrap();
        assert!(profile.max_rating.is_some());
        assert!(!profile.submissions.is_empty());
    }
}

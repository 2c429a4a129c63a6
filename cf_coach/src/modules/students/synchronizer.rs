use anyhow::Result;
use cf_coach_libs::{codeforces::ProfileSource, models::Student, store::RosterStore};
use chrono::Utc;
use tokio::time::{self, Duration};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
}

/// Pulls Codeforces profiles into the roster.
pub struct Synchronizer<'a, S: ProfileSource> {
    store: &'a RosterStore,
    source: &'a S,
}

impl<'a, S: ProfileSource + Sync> Synchronizer<'a, S> {
    pub fn new(store: &'a RosterStore, source: &'a S) -> Self {
        Self { store, source }
    }

    /// Fetches the profile of one student and persists it.
    ///
    /// Only the id and handle of `student` are used. The profile is applied to
    /// the record as stored when the fetch completes, so roster edits made in
    /// the meantime survive.
    pub async fn sync_student(&self, student: &Student) -> Result<Student> {
        tracing::info!("Synchronize {}", student.codeforces_handle);
        let profile = self.source.profile(&student.codeforces_handle).await?;
        let student = self
            .store
            .record_sync(student.id, profile, Utc::now())
            .await?;

        tracing::info!(
            "{} synchronized: rating={:?}, {} contests, {} submissions",
            student.codeforces_handle,
            student.current_rating,
            student.contest_history.len(),
            student.submissions.len()
        );
        Ok(student)
    }

    pub async fn sync_handle(&self, handle: &str) -> Result<Student> {
        let student = self.store.find_by_handle(handle).await?;
        self.sync_student(&student).await
    }

    /// Synchronizes the whole roster, one student at a time.
    ///
    /// A failing student is logged and skipped. `interval` is slept between
    /// two students to stay under the Codeforces rate limit.
    pub async fn sync_all(&self, interval: Duration) -> Result<SyncReport> {
        let students = self.store.list().await?;
        tracing::info!("Start to synchronize {} students.", students.len());

        let mut report = SyncReport::default();
        for (i, student) in students.iter().enumerate() {
            if i > 0 {
                time::sleep(interval).await;
            }

            match self.sync_student(student).await {
                Ok(_) => report.synced += 1,
                Err(e) => {
                    tracing::error!(
                        "An error occurred at {}: {:?}",
                        student.codeforces_handle,
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Synchronization finished: {} synced, {} failed.",
            report.synced,
            report.failed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::async_trait;
    use cf_coach_libs::{
        codeforces::{ApiUser, CodeforcesError},
        models::{RatingChange, StudentForm, SubmissionRecord},
    };
    use std::path::PathBuf;
    use uuid::Uuid;

    struct MockSource;

    #[async_trait]
    impl ProfileSource for MockSource {
        async fn user_info(&self, handle: &str) -> Result<ApiUser, CodeforcesError> {
            if handle == "ghost" {
                return Err(CodeforcesError::UserNotFoundError(handle.to_string()));
            }
            Ok(ApiUser {
                handle: handle.to_string(),
                rating: Some(1500),
                max_rating: Some(1650),
                rank: Some(String::from("specialist")),
            })
        }

        async fn rating_history(&self, _handle: &str) -> Result<Vec<RatingChange>, CodeforcesError> {
            Ok(vec![RatingChange {
                contest_id: 1800,
                contest_name: String::from("Codeforces Round 1"),
                rating_update_time_seconds: 1_686_830_400,
                old_rating: 1400,
                new_rating: 1500,
                ..Default::default()
            }])
        }

        async fn submissions(&self, _handle: &str) -> Result<Vec<SubmissionRecord>, CodeforcesError> {
            Ok(vec![SubmissionRecord {
                contest_id: Some(1800),
                problem_index: Some(String::from("A")),
                creation_time_seconds: Some(1_686_830_400),
                verdict: Some(String::from("OK")),
                ..Default::default()
            }])
        }
    }

    async fn store(handles: &[&str]) -> (RosterStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("cf_coach_sync_{}", Uuid::new_v4()));
        let store = RosterStore::new(&dir);
        for handle in handles {
            store
                .create(StudentForm {
                    name: handle.to_string(),
                    email: format!("{}@example.com", handle),
                    codeforces_handle: handle.to_string(),
                })
                .await
                .unwrap();
        }
        (store, dir)
    }

    #[tokio::test]
    async fn test_sync_handle() {
        let (store, dir) = store(&["alice_cf"]).await;
        let synchronizer = Synchronizer::new(&store, &MockSource);

        let student = synchronizer.sync_handle("alice_cf").await.unwrap();
        assert_eq!(student.current_rating, Some(1500));
        assert_eq!(student.max_rating, Some(1650));
        assert!(student.last_synced.is_some());

        let stored = store.find_by_handle("alice_cf").await.unwrap();
        assert_eq!(stored.contest_history.len(), 1);
        assert_eq!(stored.submissions.len(), 1);
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_sync_keeps_edits_made_after_snapshot() {
        let (store, dir) = store(&["alice_cf"]).await;
        let synchronizer = Synchronizer::new(&store, &MockSource);

        let snapshot = store.find_by_handle("alice_cf").await.unwrap();
        store
            .update(
                snapshot.id,
                StudentForm {
                    name: String::from("Alicia Renamed"),
                    email: String::from("new@example.com"),
                    codeforces_handle: String::from("alice_cf"),
                },
            )
            .await
            .unwrap();

        let synced = synchronizer.sync_student(&snapshot).await.unwrap();
        assert_eq!(synced.name, "Alicia Renamed");
        assert_eq!(synced.current_rating, Some(1500));

        let stored = store.get(snapshot.id).await.unwrap();
        assert_eq!(stored.name, "Alicia Renamed");
        assert_eq!(stored.email, "new@example.com");
        assert_eq!(stored.submissions.len(), 1);
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_sync_all_skips_failing_students() {
        let (store, dir) = store(&["alice_cf", "ghost", "bob_cf"]).await;
        let synchronizer = Synchronizer::new(&store, &MockSource);

        let report = synchronizer
            .sync_all(Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(report, SyncReport { synced: 2, failed: 1 });

        let ghost = store.find_by_handle("ghost").await.unwrap();
        assert!(ghost.last_synced.is_none());
        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}

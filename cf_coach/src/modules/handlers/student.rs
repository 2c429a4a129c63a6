use crate::modules::models::{
    request::{HeatmapQueryParameters, ValidatedQuery},
    response::{ErrorResponse, HeatmapResponse, StatsResponse, StudentSummary},
};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use cf_coach_libs::{
    models::Student,
    store::{RosterStore, StoreError},
};
use chrono::{Datelike, Utc};
use std::sync::Arc;
use tokio::time::Instant;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::NotFoundError(handle) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("student {} not found", handle))),
        ),
        e => {
            tracing::error!("roster access failed cause: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("unexpected error")),
            )
        }
    }
}

async fn find_student(store: &RosterStore, handle: &str) -> Result<Student, ApiError> {
    store.find_by_handle(handle).await.map_err(store_error)
}

pub async fn list_students(
    Extension(store): Extension<Arc<RosterStore>>,
) -> Result<Json<Vec<StudentSummary>>, ApiError> {
    let students = store.list().await.map_err(store_error)?;
    Ok(Json(students.iter().map(StudentSummary::from).collect()))
}

pub async fn student_stats(
    Path(handle): Path<String>,
    Extension(store): Extension<Arc<RosterStore>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let start_process = Instant::now();
    let student = find_student(&store, &handle).await?;
    let response = StatsResponse::new(&student, Utc::now().year());

    tracing::info!(
        target: "querylog",
        "elapsed_time={} handle={} submissions={}",
        Instant::now().duration_since(start_process).as_millis(),
        handle,
        response.submission_count
    );

    Ok(Json(response))
}

pub async fn student_heatmap(
    Path(handle): Path<String>,
    ValidatedQuery(params): ValidatedQuery<HeatmapQueryParameters>,
    Extension(store): Extension<Arc<RosterStore>>,
) -> Result<Json<HeatmapResponse>, ApiError> {
    let start_process = Instant::now();
    let student = find_student(&store, &handle).await?;
    let (response, _) =
        HeatmapResponse::new(&student, params.year, params.filter(), Utc::now().year());

    tracing::info!(
        target: "querylog",
        "elapsed_time={} handle={} year={} filter={}",
        Instant::now().duration_since(start_process).as_millis(),
        handle,
        response.year,
        response.filter
    );

    Ok(Json(response))
}

#[cfg(test)]
mod test {
    use super::*;
    use cf_coach_libs::models::{StudentForm, SubmissionRecord};
    use std::path::PathBuf;
    use uuid::Uuid;

    async fn store_with_student() -> (Arc<RosterStore>, PathBuf) {
        let dir = std::env::temp_dir().join(format!("cf_coach_handlers_{}", Uuid::new_v4()));
        let store = RosterStore::new(&dir);
        let mut student = store
            .create(StudentForm {
                name: String::from("Alice"),
                email: String::from("alice@example.com"),
                codeforces_handle: String::from("alice_cf"),
            })
            .await
            .unwrap();
        student.submissions = vec![SubmissionRecord {
            contest_id: Some(1),
            problem_index: Some(String::from("A")),
            creation_time_seconds: Some(1_686_830_400),
            verdict: Some(String::from("OK")),
            ..Default::default()
        }];
        store.replace(&student).await.unwrap();
        (Arc::new(store), dir)
    }

    #[tokio::test]
    async fn test_list_students() {
        let (store, dir) = store_with_student().await;
        let Json(students) = list_students(Extension(store)).await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].submissions, 1);
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_student_stats() {
        let (store, dir) = store_with_student().await;
        let Json(response) = student_stats(Path(String::from("ALICE_CF")), Extension(store))
            .await
            .unwrap();
        assert_eq!(response.solved_count, 1);
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_unknown_student_is_not_found() {
        let (store, dir) = store_with_student().await;
        let result = student_stats(Path(String::from("nobody")), Extension(store)).await;
        assert!(matches!(result, Err((StatusCode::NOT_FOUND, _))));
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_student_heatmap() {
        let (store, dir) = store_with_student().await;
        let Json(response) = student_heatmap(
            Path(String::from("alice_cf")),
            ValidatedQuery(HeatmapQueryParameters {
                year: Some(2023),
                filter: Some(String::from("P")),
            }),
            Extension(store),
        )
        .await
        .unwrap();
        assert_eq!(response.summary.sum, 1);
        assert_eq!(response.summary.avg, "1.00");
        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}

use crate::{
    fs::write_atomically,
    models::{Profile, Student, StudentForm},
};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

type Result<T> = std::result::Result<T, StoreError>;

pub const ROSTER_FILE_NAME: &str = "students.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access roster file")]
    IoError(#[from] std::io::Error),
    #[error("roster file is not valid JSON")]
    SerdeError(#[from] serde_json::Error),
    #[error("invalid student form: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("handle {0} is already registered")]
    DuplicateHandleError(String),
    #[error("student {0} not found")]
    NotFoundError(String),
}

/// The roster persisted as a JSON array. Every mutation rewrites the whole
/// file; the mutex serializes read-modify-write cycles within the process.
pub struct RosterStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RosterStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(ROSTER_FILE_NAME),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Student>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, students: &[Student]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(students)?;
        write_atomically(&self.path, &bytes).await?;
        tracing::debug!("{} students saved to {}", students.len(), self.path.display());
        Ok(())
    }

    fn ensure_unique(students: &[Student], handle: &str, except: Option<Uuid>) -> Result<()> {
        let taken = students.iter().any(|student| {
            Some(student.id) != except && student.codeforces_handle.eq_ignore_ascii_case(handle)
        });
        if taken {
            Err(StoreError::DuplicateHandleError(handle.to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn list(&self) -> Result<Vec<Student>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Student> {
        self.list()
            .await?
            .into_iter()
            .find(|student| student.id == id)
            .ok_or(StoreError::NotFoundError(id.to_string()))
    }

    pub async fn find_by_handle(&self, handle: &str) -> Result<Student> {
        self.list()
            .await?
            .into_iter()
            .find(|student| student.codeforces_handle.eq_ignore_ascii_case(handle))
            .ok_or(StoreError::NotFoundError(handle.to_string()))
    }

    pub async fn create(&self, form: StudentForm) -> Result<Student> {
        form.validate()?;

        let _guard = self.lock.lock().await;
        let mut students = self.load().await?;
        Self::ensure_unique(&students, &form.codeforces_handle, None)?;

        let student = Student::new(form);
        students.push(student.clone());
        self.persist(&students).await?;

        tracing::info!("Student {} ({}) added", student.name, student.codeforces_handle);
        Ok(student)
    }

    pub async fn update(&self, id: Uuid, form: StudentForm) -> Result<Student> {
        form.validate()?;

        let _guard = self.lock.lock().await;
        let mut students = self.load().await?;
        Self::ensure_unique(&students, &form.codeforces_handle, Some(id))?;

        let student = students
            .iter_mut()
            .find(|student| student.id == id)
            .ok_or(StoreError::NotFoundError(id.to_string()))?;
        student.apply(form);
        let updated = student.clone();
        self.persist(&students).await?;

        tracing::info!("Student {} updated", id);
        Ok(updated)
    }

    pub async fn remove(&self, id: Uuid) -> Result<Student> {
        let _guard = self.lock.lock().await;
        let mut students = self.load().await?;

        let position = students
            .iter()
            .position(|student| student.id == id)
            .ok_or(StoreError::NotFoundError(id.to_string()))?;
        let removed = students.remove(position);
        self.persist(&students).await?;

        tracing::info!("Student {} removed", id);
        Ok(removed)
    }

    /// Applies a freshly fetched profile to the stored record of `id`.
    /// Name and email edits made while the profile was in flight are kept.
    pub async fn record_sync(
        &self,
        id: Uuid,
        profile: Profile,
        now: DateTime<Utc>,
    ) -> Result<Student> {
        let _guard = self.lock.lock().await;
        let mut students = self.load().await?;

        let student = students
            .iter_mut()
            .find(|student| student.id == id)
            .ok_or(StoreError::NotFoundError(id.to_string()))?;
        student.record_sync(profile, now);
        let synced = student.clone();
        self.persist(&students).await?;

        Ok(synced)
    }

    /// Stores a student record as a whole, typically after a sync.
    pub async fn replace(&self, student: &Student) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut students = self.load().await?;

        let slot = students
            .iter_mut()
            .find(|stored| stored.id == student.id)
            .ok_or(StoreError::NotFoundError(student.id.to_string()))?;
        *slot = student.clone();
        self.persist(&students).await
    }
}

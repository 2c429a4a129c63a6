use std::{
    io,
    path::{Path, PathBuf},
};

fn temporary_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// Writes `bytes` next to `path` and renames it into place, so readers see
/// either the old file or the complete new one.
pub async fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temporary = temporary_sibling(path);
    if let Err(e) = tokio::fs::write(&temporary, bytes).await {
        tokio::fs::remove_file(&temporary).await.ok();
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&temporary, path).await {
        tokio::fs::remove_file(&temporary).await.ok();
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_write_atomically_replaces_content() {
        let dir = std::env::temp_dir().join(format!("cf_coach_fs_{}", Uuid::new_v4()));
        let path = dir.join("nested").join("out.txt");

        write_atomically(&path, b"first").await.unwrap();
        write_atomically(&path, b"second").await.unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");
        assert!(!temporary_sibling(&path).exists());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_nothing_behind() {
        let dir = std::env::temp_dir().join(format!("cf_coach_fs_{}", Uuid::new_v4()));
        let path = dir.join("occupied");
        tokio::fs::create_dir_all(path.join("inner")).await.unwrap();

        assert!(write_atomically(&path, b"content").await.is_err());
        assert!(path.is_dir());
        assert!(path.join("inner").is_dir());
        assert!(!temporary_sibling(&path).exists());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[test]
    fn test_temporary_sibling() {
        assert_eq!(
            temporary_sibling(Path::new("data/students.json")),
            PathBuf::from("data/.students.json.tmp")
        );
    }
}

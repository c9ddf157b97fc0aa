use crate::error::{AppError, Result};
use crate::SceneState;
use chrono::{Duration, Local, NaiveDateTime};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const SCENE_FILE: &str = "scene_state.json";

/// File-backed scene header, `static/logs/scene_state.json`
#[derive(Clone)]
pub struct SceneStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the scene file
    write_lock: Arc<Mutex<()>>,
}

impl SceneStore {
    pub fn new(log_root: impl AsRef<Path>) -> Self {
        Self {
            path: log_root.as_ref().join(SCENE_FILE),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default scene if no scene file exists yet.
    ///
    /// Returns `true` when the file was created. An existing file is never
    /// touched, whatever it contains.
    pub async fn seed(&self) -> Result<bool> {
        if fs::try_exists(&self.path).await? {
            tracing::debug!("Scene state already present: {}", self.path.display());
            return Ok(false);
        }

        let staged = self.stage(&SceneState::default()).await?;

        // A hard link never replaces an existing target, so a file that
        // appeared since the check above wins
        let linked = fs::hard_link(&staged, &self.path).await;
        let _ = fs::remove_file(&staged).await;

        match linked {
            Ok(()) => {
                tracing::info!("🌱 Seeded default scene state: {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(AppError::ServerError(format!(
                "Failed to create {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Current scene; the default scene when the file has not been written
    pub async fn load(&self) -> Result<SceneState> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SceneState::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Move the scene clock to local wall-clock time plus `hours`
    pub async fn advance_time(&self, hours: i64) -> Result<SceneState> {
        self.advance_from(Local::now().naive_local(), hours).await
    }

    pub(crate) async fn advance_from(&self, now: NaiveDateTime, hours: i64) -> Result<SceneState> {
        let target = Duration::try_hours(hours)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| AppError::BadRequest(format!("Cannot advance by {} hours", hours)))?;

        let _guard = self.write_lock.lock().await;
        let scene = stamp_clock(self.load().await?, target);
        self.save(&scene).await?;

        tracing::info!("⏩ Advanced scene clock to {} {}", scene.date, scene.time);
        Ok(scene)
    }

    /// Replace the scene file atomically: readers see the old or the new
    /// contents, never a partial write
    async fn save(&self, scene: &SceneState) -> Result<()> {
        let staged = self.stage(scene).await?;
        if let Err(e) = fs::rename(&staged, &self.path).await {
            let _ = fs::remove_file(&staged).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Write `scene` to a uniquely named sibling of the scene file, synced
    /// to disk
    async fn stage(&self, scene: &SceneState) -> Result<PathBuf> {
        let payload = serde_json::to_string_pretty(scene)?;
        let staged = self
            .path
            .with_file_name(format!("{}.{}.tmp", SCENE_FILE, Uuid::new_v4().simple()));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staged)
            .await?;
        file.write_all(payload.as_bytes()).await?;
        file.sync_all().await?;

        Ok(staged)
    }
}

/// Replace the display date and time, e.g. `March 05, 2024` / `07:30 PM`
pub fn stamp_clock(scene: SceneState, at: NaiveDateTime) -> SceneState {
    SceneState {
        date: at.format("%B %d, %Y").to_string(),
        time: at.format("%I:%M %p").to_string(),
        ..scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_seed_writes_default_scene() {
        let temp_dir = TempDir::new().unwrap();
        let store = SceneStore::new(temp_dir.path());

        assert!(store.seed().await.unwrap());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "date": "January 1, 2000",
                "time": "12:00 AM",
                "location": "Unknown",
                "funds": "$0.00"
            })
        );
    }

    #[tokio::test]
    async fn test_seed_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = SceneStore::new(temp_dir.path());
        let custom = r#"{"date": "x", "time": "y", "location": "Harbor", "funds": "$7.00"}"#;
        std::fs::write(store.path(), custom).unwrap();

        assert!(!store.seed().await.unwrap());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), custom);
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = SceneStore::new(temp_dir.path());

        assert_eq!(store.load().await.unwrap(), SceneState::default());
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = SceneStore::new(temp_dir.path());
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load().await, Err(AppError::JsonError(_))));
    }

    #[tokio::test]
    async fn test_advance_keeps_location_and_funds() {
        let temp_dir = TempDir::new().unwrap();
        let store = SceneStore::new(temp_dir.path());
        std::fs::write(
            store.path(),
            r#"{"date": "a", "time": "b", "location": "Desolate Highway", "funds": "$42.00"}"#,
        )
        .unwrap();

        let scene = store
            .advance_from(at(1999, 10, 31, 23, 59), 3)
            .await
            .unwrap();

        assert_eq!(scene.date, "November 01, 1999");
        assert_eq!(scene.time, "02:59 AM");
        assert_eq!(scene.location, "Desolate Highway");
        assert_eq!(scene.funds, "$42.00");
        assert_eq!(store.load().await.unwrap(), scene);
    }

    #[tokio::test]
    async fn test_advance_rejects_out_of_range_hours() {
        let temp_dir = TempDir::new().unwrap();
        let store = SceneStore::new(temp_dir.path());

        let result = store.advance_from(at(2000, 1, 1, 0, 0), i64::MAX).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(!store.path().exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_load_never_sees_partial_write() {
        let temp_dir = TempDir::new().unwrap();
        let store = SceneStore::new(temp_dir.path());
        store.seed().await.unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for hours in 0..500 {
                    store.advance_time(hours).await.unwrap();
                }
            })
        };

        let mut reads = 0;
        while !writer.is_finished() {
            let scene = store.load().await.unwrap();
            assert_eq!(scene.location, "Unknown");
            reads += 1;
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();

        assert!(reads > 0);
    }

    #[tokio::test]
    async fn test_writes_leave_no_staged_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = SceneStore::new(temp_dir.path());

        store.seed().await.unwrap();
        store.seed().await.unwrap();
        store.advance_time(1).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, [SCENE_FILE]);
    }

    #[test]
    fn test_stamp_clock_formats() {
        let scene = stamp_clock(SceneState::default(), at(2024, 3, 5, 19, 30));
        assert_eq!(scene.date, "March 05, 2024");
        assert_eq!(scene.time, "07:30 PM");
        assert_eq!(scene.location, "Unknown");
    }
}

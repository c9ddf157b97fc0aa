//! Startup preparation that must finish before the listener binds.
//!
//! 1. ensure `<static>/logs/` exists
//! 2. seed `<static>/logs/scene_state.json` if absent
//!
//! Both steps are idempotent, so restarting the server never disturbs an
//! existing world.

use crate::config::Config;
use crate::error::Result;
use crate::log_storage::LogStorage;
use crate::scene::SceneStore;

pub async fn prepare(config: &Config) -> Result<(LogStorage, SceneStore)> {
    let logs = LogStorage::new(config.log_dir());
    logs.init().await?;

    let scenes = SceneStore::new(logs.log_root());
    scenes.seed().await?;

    Ok((logs, scenes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_for(static_dir: &Path) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            port: 10000,
            static_dir: static_dir.to_path_buf(),
            base_url: None,
        }
    }

    #[tokio::test]
    async fn test_prepare_from_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir.path().join("static"));

        let (logs, scenes) = prepare(&config).await.unwrap();

        assert!(config.log_dir().is_dir());
        assert_eq!(logs.log_root(), config.log_dir());
        assert_eq!(scenes.path(), config.log_dir().join("scene_state.json"));

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(scenes.path()).unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(object["date"], "January 1, 2000");
        assert_eq!(object["time"], "12:00 AM");
        assert_eq!(object["location"], "Unknown");
        assert_eq!(object["funds"], "$0.00");
    }

    #[tokio::test]
    async fn test_prepare_twice_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());

        let (_, scenes) = prepare(&config).await.unwrap();
        let first = std::fs::read(scenes.path()).unwrap();

        prepare(&config).await.unwrap();
        let second = std::fs::read(scenes.path()).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_prepare_keeps_existing_scene() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(temp_dir.path());
        std::fs::create_dir_all(config.log_dir()).unwrap();

        let custom = "{\"date\": \"October 31, 1999\", \"time\": \"11:59 PM\", \"location\": \"Desolate Highway\", \"funds\": \"$42.00\"}\n";
        let scene_path = config.log_dir().join("scene_state.json");
        std::fs::write(&scene_path, custom).unwrap();

        prepare(&config).await.unwrap();

        assert_eq!(std::fs::read_to_string(&scene_path).unwrap(), custom);
    }

    #[tokio::test]
    async fn test_prepare_fails_when_static_dir_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let static_dir = temp_dir.path().join("static");
        std::fs::write(&static_dir, b"").unwrap();

        assert!(prepare(&config_for(&static_dir)).await.is_err());
    }
}

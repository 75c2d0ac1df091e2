//! File-backed configuration store.
//!
//! Two JSON documents: the settings (read-only at runtime) and the privilege
//! grants (rewritten whole on every change). Writes go to a temporary
//! sibling that is renamed into place, so a crash never leaves a truncated
//! document behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use herald_framework::{ConfigStore, PrivilegeGrant, Settings, StoreError, StoreResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info};

/// A [`ConfigStore`] over two JSON files.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    settings_path: PathBuf,
    privilege_path: PathBuf,
}

impl JsonConfigStore {
    /// Creates a store for the given documents. Nothing is read yet.
    pub fn new(settings_path: impl Into<PathBuf>, privilege_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            privilege_path: privilege_path.into(),
        }
    }

    /// Returns the settings document path.
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Returns the privilege document path.
    pub fn privilege_path(&self) -> &Path {
        &self.privilege_path
    }
}

/// Serializes `value` with 4-space indentation and non-ASCII left as is.
fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let mut file = fs::File::create(&tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, path)
}

impl ConfigStore for JsonConfigStore {
    fn load_settings(&self) -> StoreResult<Settings> {
        let path = &self.settings_path;
        let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| StoreError::json(path, e))
    }

    fn load_privilege(&self) -> StoreResult<PrivilegeGrant> {
        let path = &self.privilege_path;
        if !path.exists() {
            info!(path = %path.display(), "Privilege document missing, creating an empty one");
            let empty = PrivilegeGrant::new();
            self.save_privilege(&empty)?;
            return Ok(empty);
        }
        let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| StoreError::json(path, e))
    }

    fn save_privilege(&self, privilege: &PrivilegeGrant) -> StoreResult<()> {
        let path = &self.privilege_path;
        let bytes = to_pretty_json(privilege).map_err(|e| StoreError::json(path, e))?;
        write_atomic(path, &bytes).map_err(|e| StoreError::io(path, e))?;
        debug!(path = %path.display(), "Privilege document saved");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("herald-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub(crate) fn write_settings(dir: &Path) -> PathBuf {
        let path = dir.join("init.json");
        let doc = json!({
            "owner_qq_account_uid": "10001",
            "managers_qq_account_uid": ["10002"],
            "bot_qq_account_uid": "30003",
            "bot_name": "小助手",
            "http_service_listening_socke": "127.0.0.1:3000",
            "http_app_host": "127.0.0.1",
            "http_app_port": 0
        });
        fs::write(&path, serde_json::to_vec_pretty(&doc).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_load_settings() {
        let dir = temp_dir();
        let store = JsonConfigStore::new(write_settings(&dir), dir.join("privilege.json"));
        let settings = store.load_settings().unwrap();
        assert_eq!(settings.owner_id, 10001);
        assert!(settings.is_manager(10002));
        assert_eq!(settings.bot_name, "小助手");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_settings_is_io_error() {
        let dir = temp_dir();
        let store = JsonConfigStore::new(dir.join("absent.json"), dir.join("privilege.json"));
        assert!(matches!(store.load_settings(), Err(StoreError::Io { .. })));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_privilege_created_when_missing() {
        let dir = temp_dir();
        let path = dir.join("nested").join("privilege.json");
        let store = JsonConfigStore::new(dir.join("init.json"), &path);

        assert!(store.load_privilege().unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_privilege_round_trip() {
        let dir = temp_dir();
        let path = dir.join("privilege.json");
        fs::write(&path, r#"{"42": ["/system", "/echo"], "7": ["/num"]}"#).unwrap();
        let store = JsonConfigStore::new(dir.join("init.json"), &path);

        let loaded = store.load_privilege().unwrap();
        store.save_privilege(&loaded).unwrap();
        assert_eq!(store.load_privilege().unwrap(), loaded);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n    \"42\": [\n        \"/echo\""));
        assert!(!dir.join("privilege.json.tmp").exists());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_invalid_privilege_is_json_error() {
        let dir = temp_dir();
        let path = dir.join("privilege.json");
        fs::write(&path, "[1, 2]").unwrap();
        let store = JsonConfigStore::new(dir.join("init.json"), &path);
        assert!(matches!(store.load_privilege(), Err(StoreError::Json { .. })));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_non_ascii_written_verbatim() {
        let mut grants = PrivilegeGrant::new();
        grants.grant(1, "/抽样");
        let bytes = to_pretty_json(&grants).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("/抽样"));
    }
}

//! Session store backed by a single JSON map file on the local filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::session_record::{SessionStore, SessionStoreFuture};

type RecordMap = BTreeMap<String, String>;

const SESSION_FILE_NAME: &str = "session.json";

fn read_map_text(path: &Path) -> Result<Option<String>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    Ok(Some(raw).filter(|raw| !raw.trim().is_empty()))
}

fn parse_record_map(path: &Path, raw: &str) -> Result<RecordMap, String> {
    serde_json::from_str(raw)
        .map_err(|err| format!("failed to parse session map {}: {err}", path.display()))
}

fn load_record_map(path: &Path) -> Result<RecordMap, String> {
    match read_map_text(path)? {
        Some(raw) => parse_record_map(path, &raw),
        None => Ok(RecordMap::new()),
    }
}

// Writers start over from an empty map when the file is unreadable JSON; the bad file is kept
// next to it as `session.json.corrupt`.
fn load_record_map_for_write(path: &Path) -> Result<RecordMap, String> {
    let Some(raw) = read_map_text(path)? else {
        return Ok(RecordMap::new());
    };
    match parse_record_map(path, &raw) {
        Ok(map) => Ok(map),
        Err(err) => {
            let quarantine = path.with_extension("json.corrupt");
            log::warn!("{err}; moving it to {}", quarantine.display());
            if let Err(rename_err) = fs::rename(path, &quarantine) {
                log::warn!("could not move corrupt session map aside: {rename_err}");
            }
            Ok(RecordMap::new())
        }
    }
}

fn save_record_map(path: &Path, map: &RecordMap) -> Result<(), String> {
    let serialized = serde_json::to_string(map)
        .map_err(|err| format!("failed to serialize session map: {err}"))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serialized)
        .map_err(|err| format!("failed to write {}: {err}", tmp.display()))?;
    fs::rename(&tmp, path).map_err(|err| format!("failed to replace {}: {err}", path.display()))
}

fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        Err("Session key must not be empty".to_string())
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Durable session store keeping every key in one `session.json` file.
pub struct FileSessionStore {
    file: PathBuf,
}

impl FileSessionStore {
    /// Creates a store rooted at `root`, creating the directory when missing.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, String> {
        let root = root.as_ref();
        fs::create_dir_all(root)
            .map_err(|err| format!("failed to create session dir {}: {err}", root.display()))?;
        Ok(Self {
            file: root.join(SESSION_FILE_NAME),
        })
    }

    /// Creates a store under the platform data directory, in a folder named `app_name`.
    pub fn in_data_dir(app_name: &str) -> Result<Self, String> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| "failed to resolve local data dir".to_string())?;
        Self::from_root(base.join(app_name))
    }

    /// Path of the backing JSON file.
    pub fn file_path(&self) -> &Path {
        &self.file
    }

    fn load(&self, key: &str) -> Result<Option<String>, String> {
        validate_key(key)?;
        let map = load_record_map(&self.file)?;
        Ok(map.get(key).cloned())
    }

    fn save(&self, key: &str, raw_json: &str) -> Result<(), String> {
        validate_key(key)?;
        let mut map = load_record_map_for_write(&self.file)?;
        map.insert(key.to_string(), raw_json.to_string());
        save_record_map(&self.file, &map)
    }

    fn delete(&self, key: &str) -> Result<(), String> {
        validate_key(key)?;
        let mut map = load_record_map_for_write(&self.file)?;
        if map.remove(key).is_none() {
            return Ok(());
        }
        save_record_map(&self.file, &map)
    }
}

impl SessionStore for FileSessionStore {
    fn load_record<'a>(
        &'a self,
        key: &'a str,
    ) -> SessionStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { self.load(key) })
    }

    fn save_record<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> SessionStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { self.save(key, raw_json) })
    }

    fn delete_record<'a>(&'a self, key: &'a str) -> SessionStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { self.delete(key) })
    }
}

#[cfg(test)]
mod tests {
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn temp_dir_path() -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("platform_host_session_{}_{}", process::id(), now))
    }

    #[test]
    fn file_store_round_trips_and_survives_reopen() {
        let root = temp_dir_path();
        let store = FileSessionStore::from_root(&root).expect("create store");
        block_on(store.save_record("desktop", "[{\"id\":1}]")).expect("save");

        let reopened = FileSessionStore::from_root(&root).expect("reopen store");
        assert_eq!(
            block_on(reopened.load_record("desktop")).expect("load"),
            Some("[{\"id\":1}]".to_string())
        );

        block_on(reopened.delete_record("desktop")).expect("delete");
        assert_eq!(block_on(store.load_record("desktop")).expect("load"), None);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn file_store_keeps_other_keys_on_delete() {
        let root = temp_dir_path();
        let store = FileSessionStore::from_root(&root).expect("create store");
        block_on(store.save_record("a", "1")).expect("save a");
        block_on(store.save_record("b", "2")).expect("save b");
        block_on(store.delete_record("a")).expect("delete a");
        block_on(store.delete_record("missing")).expect("delete missing");

        assert_eq!(block_on(store.load_record("a")).expect("load"), None);
        assert_eq!(
            block_on(store.load_record("b")).expect("load"),
            Some("2".to_string())
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn file_store_rejects_empty_keys_and_corrupt_maps() {
        let root = temp_dir_path();
        let store = FileSessionStore::from_root(&root).expect("create store");
        assert!(block_on(store.save_record("", "1")).is_err());

        fs::write(store.file_path(), "{broken").expect("write corrupt map");
        let err = block_on(store.load_record("desktop")).expect_err("corrupt map");
        assert!(err.contains("failed to parse session map"));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn file_store_replaces_a_corrupt_map_on_the_next_write() {
        let root = temp_dir_path();
        let store = FileSessionStore::from_root(&root).expect("create store");
        fs::write(store.file_path(), "{broken").expect("write corrupt map");

        block_on(store.save_record("desktop", "[]")).expect("save over corrupt map");
        assert_eq!(
            block_on(store.load_record("desktop")).expect("load"),
            Some("[]".to_string())
        );
        let kept = fs::read_to_string(store.file_path().with_extension("json.corrupt"))
            .expect("corrupt map kept aside");
        assert_eq!(kept, "{broken");
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn deleting_from_a_corrupt_map_clears_it() {
        let root = temp_dir_path();
        let store = FileSessionStore::from_root(&root).expect("create store");
        fs::write(store.file_path(), "not json").expect("write corrupt map");

        block_on(store.delete_record("desktop")).expect("delete");
        assert_eq!(block_on(store.load_record("desktop")).expect("load"), None);
        let _ = fs::remove_dir_all(root);
    }
}

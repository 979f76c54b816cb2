//! Flat-file persistence: subscribers as pretty-printed JSON, dedup
//! state as one entry id per line. Writes go through a temp file and
//! rename so a crash mid-write never truncates existing state.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::Result;
use crate::domain::Subscriber;
use crate::store::Store;

const SUBSCRIBERS_FILE: &str = "subscribers.json";
const DEDUP_FILE: &str = "seen_entries.txt";

pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn subscribers_path(&self) -> PathBuf {
        self.dir.join(SUBSCRIBERS_FILE)
    }

    fn dedup_path(&self) -> PathBuf {
        self.dir.join(DEDUP_FILE)
    }

    fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Store for JsonStore {
    fn load_subscribers(&self) -> Result<Vec<Subscriber>> {
        let path = self.subscribers_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_subscribers(&self, subscribers: &[Subscriber]) -> Result<()> {
        let contents = serde_json::to_string_pretty(subscribers)?;
        Self::write_atomic(&self.subscribers_path(), contents.as_bytes())
    }

    fn load_dedup(&self) -> Result<HashSet<String>> {
        let path = self.dedup_path();
        if !path.exists() {
            return Ok(HashSet::new());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn save_dedup(&self, ids: &HashSet<String>) -> Result<()> {
        let mut contents = String::new();
        for id in ids {
            contents.push_str(id);
            contents.push('\n');
        }
        Self::write_atomic(&self.dedup_path(), contents.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;

    #[test]
    fn missing_files_load_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();
        assert!(store.load_subscribers().unwrap().is_empty());
        assert!(store.load_dedup().unwrap().is_empty());
    }

    #[test]
    fn subscribers_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();

        let mut sub = Subscriber::new("12345");
        let mut source = Source::new("https://rss.example.com/feed");
        source.add_keyword("+vps+优惠-免费");
        source.add_regex(r"\d+GB").unwrap();
        sub.add_source(source);

        store.save_subscribers(&[sub]).unwrap();

        let loaded = store.load_subscribers().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "12345");
        assert_eq!(loaded[0].sources[0].keywords, vec!["+vps+优惠-免费"]);
        assert_eq!(loaded[0].sources[0].regexes, vec![r"\d+GB"]);
    }

    #[test]
    fn dedup_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();

        let ids: HashSet<String> = ["guid-1", "https://example.com/post-2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        store.save_dedup(&ids).unwrap();

        assert_eq!(store.load_dedup().unwrap(), ids);
    }

    #[test]
    fn dedup_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path()).unwrap();

        let mut ids = HashSet::new();
        ids.insert("a".to_string());
        store.save_dedup(&ids).unwrap();
        ids.insert("b".to_string());
        store.save_dedup(&ids).unwrap();

        assert_eq!(store.load_dedup().unwrap().len(), 2);
    }
}

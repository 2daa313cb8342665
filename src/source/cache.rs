use std::fs;
use std::path::PathBuf;

/// Flat directory of downloaded item lists, keyed by sanitized name.
pub struct DiskCache {
    base_dir: PathBuf,
}

impl DiskCache {
    pub fn new(subdir: &str) -> Option<Self> {
        let base = dirs::data_dir()?.join("dailyword").join(subdir);
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base: PathBuf) -> Option<Self> {
        fs::create_dir_all(&base).ok()?;
        Some(Self { base_dir: base })
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.base_dir.join(Self::sanitize_key(key));
        fs::read(path).ok()
    }

    /// True when `content` differs from what is stored under `key`, including
    /// when nothing is stored yet.
    pub fn differs(&self, key: &str, content: &[u8]) -> bool {
        self.get(key).as_deref() != Some(content)
    }

    pub fn put(&self, key: &str, content: &[u8]) -> bool {
        let path = self.base_dir.join(Self::sanitize_key(key));
        fs::write(path, content).is_ok()
    }

    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[cfg(feature = "network")]
pub fn fetch_url(url: &str) -> Result<Vec<u8>, String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .user_agent(concat!("dailyword/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| e.to_string())?;
    let response = client.get(url).send().map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {status} from {url}"));
    }
    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| e.to_string())
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(url: &str) -> Result<Vec<u8>, String> {
    Err(format!("built without network support, cannot fetch {url}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::with_base_dir(dir.path().join("items")).unwrap();
        assert!(cache.get("n5.json").is_none());
        assert!(cache.put("n5.json", b"[]"));
        assert_eq!(cache.get("n5.json").as_deref(), Some(&b"[]"[..]));
    }

    #[test]
    fn differs_tracks_stored_content() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert!(cache.differs("n3.json", b"[]"));
        cache.put("n3.json", b"[]");
        assert!(!cache.differs("n3.json", b"[]"));
        assert!(cache.differs("n3.json", br#"[{"word": "w", "meaning": "m"}]"#));
    }

    #[test]
    fn keys_cannot_escape_base_dir() {
        assert_eq!(DiskCache::sanitize_key("../n5.json"), ".._n5.json");
        assert_eq!(DiskCache::sanitize_key("a/b c"), "a_b_c");
    }
}

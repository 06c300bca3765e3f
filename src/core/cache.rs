//! Response cache keyed by a hash of the outgoing prompt text.
//!
//! The key covers only the prompt, not the conversation it is asked in, so the
//! same question asked in a different context replays the earlier answer. Entries
//! never expire.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const FILE_PREFIX: &str = "gptcli-";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Stable key for a prompt: the hex MD5 digest of its exact text.
    pub fn for_prompt(prompt: &str) -> Self {
        Self(format!("{:x}", md5::compute(prompt.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub trait ResponseCache: Send + Sync {
    /// Raw response body previously stored under `key`, or `None` on a miss.
    fn lookup(&self, key: &CacheKey) -> Option<Vec<u8>>;

    fn store(&self, key: &CacheKey, body: &[u8]) -> io::Result<()>;
}

/// One file per entry in a shared directory, the system temp dir by default.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{}", key.as_str()))
    }
}

impl ResponseCache for FileCache {
    fn lookup(&self, key: &CacheKey) -> Option<Vec<u8>> {
        fs::read(self.entry_path(key)).ok()
    }

    fn store(&self, key: &CacheKey, body: &[u8]) -> io::Result<()> {
        fs::write(self.entry_path(key), body)
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for MemoryCache {
    fn lookup(&self, key: &CacheKey) -> Option<Vec<u8>> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: &CacheKey, body: &[u8]) -> io::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "cache lock poisoned"))?;
        entries.insert(key.clone(), body.to_vec());
        Ok(())
    }
}

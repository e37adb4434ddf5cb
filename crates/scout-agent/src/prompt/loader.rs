//! Base system prompt file loading.
//!
//! Reads a single markdown file and caches it. With hot reload on, the file
//! is re-read whenever its modification time changes; any stat or read
//! failure keeps serving the last good content.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct Cached {
    content: Option<String>,
    modified: Option<SystemTime>,
}

/// Cached reader for the base system prompt.
#[derive(Debug)]
pub struct SystemPromptLoader {
    path: PathBuf,
    hot_reload: Mutex<bool>,
    cache: Mutex<Cached>,
}

impl SystemPromptLoader {
    pub fn new(path: impl Into<PathBuf>, hot_reload: bool) -> Self {
        Self {
            path: path.into(),
            hot_reload: Mutex::new(hot_reload),
            cache: Mutex::new(Cached::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn hot_reload(&self) -> bool {
        *self.hot_reload.lock()
    }

    pub fn set_hot_reload(&self, enabled: bool) {
        *self.hot_reload.lock() = enabled;
    }

    /// Drop the cached content; the next [`read`](Self::read) loads from disk.
    pub fn invalidate(&self) {
        *self.cache.lock() = Cached::default();
    }

    /// Current prompt text. A missing file yields `""`.
    pub fn read(&self) -> String {
        let hot_reload = self.hot_reload();
        let mut cache = self.cache.lock();

        let Some(content) = cache.content.clone() else {
            return self.load_into(&mut cache).unwrap_or_default();
        };
        if !hot_reload {
            return content;
        }

        match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) if cache.modified == Some(modified) => content,
            Ok(_) => self.load_into(&mut cache).unwrap_or(content),
            Err(_) => content,
        }
    }

    fn load_into(&self, cache: &mut Cached) -> Option<String> {
        if !self.path.is_file() {
            return cache.content.clone();
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => {
                cache.modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
                cache.content = Some(content.clone());
                debug!(path = %self.path.display(), chars = content.chars().count(), "System prompt loaded");
                Some(content)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read system prompt");
                cache.content.clone()
            }
        }
    }
}

//! Output write cache.
//!
//! `watch` regenerates the page after every changed poll round, and most of
//! the output (copied assets, often the page itself) is byte-identical to
//! the previous run. This module skips rewriting those files so static hosts
//! and sync tools only see real changes.
//!
//! # Design
//!
//! The manifest maps each output path (relative to the output directory) to
//! the SHA-256 of the contents last written there. A write is skipped when
//! the new contents hash to the recorded value **and** the file still exists.
//!
//! The manifest lives at `<output_dir>/.write-cache.json`. A missing,
//! corrupt or version-mismatched manifest loads as empty, which just means
//! everything is written once.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

/// Name of the cache manifest file within the output directory.
const MANIFEST_FILENAME: &str = ".write-cache.json";

/// Bump to invalidate existing manifests when the format changes.
const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WriteCache {
    pub version: u32,
    /// Relative output path → hex SHA-256 of its contents.
    pub entries: HashMap<String, String>,
}

impl WriteCache {
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the output directory; anything unreadable yields an empty cache.
    pub fn load(output_dir: &Path) -> Self {
        let content = match std::fs::read_to_string(output_dir.join(MANIFEST_FILENAME)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(m) if m.version == MANIFEST_VERSION => m,
            _ => Self::empty(),
        }
    }

    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_dir.join(MANIFEST_FILENAME), json)
    }

    /// Write `contents` to `output_dir/rel_path` unless it is already there.
    pub fn write(
        &mut self,
        output_dir: &Path,
        rel_path: &str,
        contents: &[u8],
    ) -> io::Result<WriteStatus> {
        let hash = hash_bytes(contents);
        let target = output_dir.join(rel_path);
        if self.entries.get(rel_path) == Some(&hash) && target.exists() {
            return Ok(WriteStatus::Unchanged);
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, contents)?;
        self.entries.insert(rel_path.to_string(), hash);
        Ok(WriteStatus::Written)
    }
}

/// SHA-256 of a byte slice as lowercase hex.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Summary of a generate run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    pub written: u32,
    pub unchanged: u32,
}

impl WriteStats {
    pub fn record(&mut self, status: &WriteStatus) {
        match status {
            WriteStatus::Written => self.written += 1,
            WriteStatus::Unchanged => self.unchanged += 1,
        }
    }
}

impl fmt::Display for WriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unchanged > 0 {
            write!(
                f,
                "{} written, {} unchanged ({} total)",
                self.written,
                self.unchanged,
                self.written + self.unchanged
            )
        } else {
            write!(f, "{} written", self.written)
        }
    }
}

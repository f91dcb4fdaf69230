//! JSON snapshot of session progress and every cached level, keyed by an optional profile.
//!
//! The file is written to `<name>.json.tmp` and renamed over the target so a crash mid-write
//! never leaves a truncated save behind. Malformed JSON loads as `InvalidData`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::levelgen::LevelState;

pub const PROGRESS_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProgressFile {
    pub format_version: u32,
    pub run_seed: u64,
    pub max_level_reached: u32,
    pub total_coins: u64,
    pub levels: BTreeMap<u32, LevelState>,
}

impl ProgressFile {
    /// `progress.json` for anonymous play, `progress_<profile>.json` otherwise.
    pub fn file_name(profile: Option<&str>) -> String {
        match profile {
            Some(profile) => format!("progress_{}.json", sanitize_profile(profile)),
            None => "progress.json".to_string(),
        }
    }

    pub fn path_in(dir: &Path, profile: Option<&str>) -> PathBuf {
        dir.join(Self::file_name(profile))
    }

    pub fn write_atomic(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let progress: Self = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if progress.format_version != PROGRESS_FORMAT_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported progress format version {}", progress.format_version),
            ));
        }
        Ok(progress)
    }

    /// Like [`ProgressFile::load`], but a missing file is not an error.
    pub fn load_if_exists(path: &Path) -> io::Result<Option<Self>> {
        match Self::load(path) {
            Ok(progress) => Ok(Some(progress)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn sanitize_profile(profile: &str) -> String {
    profile
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

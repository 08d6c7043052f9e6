//! File enumeration under a canonical template root.

use crate::core::error::KindredError;
use std::fs;
use std::path::{Path, PathBuf};

/// Every file under `root`, recursively, in a stable sorted order.
/// A root that does not exist reads as an empty tree.
pub fn all_files(root: &Path) -> Result<Vec<PathBuf>, KindredError> {
    fn recurse(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), KindredError> {
        let mut entries = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, std::io::Error>>()?;
        entries.sort();
        for path in entries {
            if path.is_dir() {
                recurse(&path, out)?;
            } else if path.is_file() {
                out.push(path);
            }
        }
        Ok(())
    }

    let mut out = Vec::new();
    if root.is_dir() {
        recurse(root, &mut out)?;
    }
    Ok(out)
}

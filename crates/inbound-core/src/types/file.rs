//! References to bytes resident on local storage.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A file already written to local storage, addressed relative to the
/// storage root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    /// Reference a path relative to the storage root.
    pub fn new(relative: impl Into<String>) -> Self {
        Self(relative.into())
    }

    /// The relative path as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component, used as the upload file name.
    pub fn file_name(&self) -> &str {
        Path::new(&self.0)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.0)
    }

    /// Join onto `root`, refusing absolute paths and parent traversal.
    pub fn resolve(&self, root: &Path) -> Option<PathBuf> {
        let rel = Path::new(&self.0);
        let mut out = root.to_path_buf();
        let mut pushed = false;
        for component in rel.components() {
            match component {
                Component::Normal(part) => {
                    out.push(part);
                    pushed = true;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        pushed.then_some(out)
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

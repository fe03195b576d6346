//! In-memory view of the files a fix may touch.
//!
//! A `Workspace` is an immutable map of path to source text. Edits never
//! mutate in place: `with_file` returns a new workspace and the caller drops
//! stale references (and any syntax trees derived from the old text). Disk is
//! only written by `commit`, after every edit of a fix batch has been
//! computed, so a multi-file rename lands whole or not at all.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{LintError, Result};

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    files: BTreeMap<PathBuf, String>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every C# file under `root` (or the single file itself).
    pub fn load(root: &Path, skip_patterns: &[String]) -> Result<Self> {
        let paths = if root.is_file() {
            vec![root.to_path_buf()]
        } else {
            crate::find_csharp_files(root, skip_patterns)
        };

        let mut files = BTreeMap::new();
        for path in paths {
            let text = fs::read_to_string(&path).map_err(|e| LintError::io(&path, e))?;
            files.insert(path, text);
        }
        Ok(Self { files })
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    pub fn text(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &String)> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Persistent-style update: returns a new workspace with one file's text
    /// replaced; `self` is untouched.
    pub fn with_file(&self, path: &Path, text: String) -> Workspace {
        let mut files = self.files.clone();
        files.insert(path.to_path_buf(), text);
        Workspace { files }
    }

    /// Paths whose text differs from `baseline` (or are new in `self`).
    pub fn changed_files(&self, baseline: &Workspace) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|(path, text)| baseline.text(path) != Some(text.as_str()))
            .map(|(path, _)| path.as_path())
            .collect()
    }

    /// Write every file that differs from `baseline` to disk. Returns the
    /// paths written.
    pub fn commit(&self, baseline: &Workspace) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for path in self.changed_files(baseline) {
            fs::write(path, self.files[path].as_bytes()).map_err(|e| LintError::io(path, e))?;
            written.push(path.to_path_buf());
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_file_leaves_original_untouched() {
        let mut ws = Workspace::new();
        ws.insert("a.cs", "class A { }");

        let edited = ws.with_file(Path::new("a.cs"), "class B { }".to_string());
        assert_eq!(ws.text(Path::new("a.cs")), Some("class A { }"));
        assert_eq!(edited.text(Path::new("a.cs")), Some("class B { }"));
    }

    #[test]
    fn test_changed_files() {
        let mut baseline = Workspace::new();
        baseline.insert("a.cs", "one");
        baseline.insert("b.cs", "two");

        let edited = baseline.with_file(Path::new("b.cs"), "three".to_string());
        let changed = edited.changed_files(&baseline);
        assert_eq!(changed, vec![Path::new("b.cs")]);
    }

    #[test]
    fn test_commit_writes_only_changes() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.cs");
        let b = dir.path().join("b.cs");
        std::fs::write(&a, "class A { }").unwrap();
        std::fs::write(&b, "class B { }").unwrap();

        let baseline = Workspace::load(dir.path(), &[]).unwrap();
        assert_eq!(baseline.len(), 2);

        let edited = baseline.with_file(&b, "class Renamed { }".to_string());
        let written = edited.commit(&baseline).unwrap();
        assert_eq!(written, vec![b.clone()]);
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "class Renamed { }");
        assert_eq!(std::fs::read_to_string(&a).unwrap(), "class A { }");
    }
}

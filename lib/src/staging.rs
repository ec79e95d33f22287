use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Error;

/// A file materialized for the duration of one send call.
#[derive(Debug)]
pub struct StagedFile {
    pub name: String,
    pub path: PathBuf,
}

/// Call-scoped staging directory for attachment files.
///
/// Each area lives in its own UUID-named directory, so concurrent send
/// calls can stage attachments with the same name without interfering.
/// Dropping the area removes the directory and anything left inside it.
#[derive(Debug)]
pub struct StagingArea {
    root: PathBuf,
    staged: Vec<StagedFile>,
}

impl StagingArea {
    pub fn new(parent: &Path) -> Result<Self, Error> {
        let root = parent.join(format!("courier-{}", Uuid::new_v4()));

        fs::create_dir_all(&root).map_err(|e| Error::FileWrite(e.to_string()))?;

        Ok(StagingArea {
            root,
            staged: Vec::new(),
        })
    }

    /// Materializes `payload` as a file named `name` in the call directory
    /// and returns its path.
    ///
    /// Fails with `FileExists` if the path is already taken within this
    /// call. The existing file is left untouched.
    pub fn stage(&mut self, name: &str, payload: &str) -> Result<PathBuf, Error> {
        let path = self.root.join(name);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => Error::FileExists(name.to_string()),
                _ => Error::FileWrite(format!("{}: {}", name, e)),
            })?;

        file.write_all(payload.as_bytes())
            .map_err(|e| Error::FileWrite(format!("{}: {}", name, e)))?;

        log::info!("File created: {}", path.display());

        self.staged.push(StagedFile {
            name: name.to_string(),
            path: path.clone(),
        });

        Ok(path)
    }

    /// Deletes the staged file for `name`.
    ///
    /// A missing or undeletable file is reported as `Cleanup`; callers log
    /// it and move on, since cleanup must not mask the send outcome.
    pub fn unstage(&mut self, name: &str) -> Result<(), Error> {
        let pos = match self.staged.iter().position(|s| s.name == name) {
            Some(pos) => pos,
            None => return Err(Error::Cleanup(format!("{}: no staged file", name))),
        };

        let file = self.staged.remove(pos);

        log::info!("Deleting file {}", file.path.display());

        fs::remove_file(&file.path).map_err(|e| Error::Cleanup(format!("{}: {}", file.name, e)))
    }

    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn names(&self) -> Vec<String> {
        self.staged.iter().map(|s| s.name.clone()).collect()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.root) {
            log::error!(
                "Staging directory {} wasn't removed: {}",
                self.root.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("courier-test-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn stage_writes_payload() {
        let parent = scratch_dir();
        let mut area = StagingArea::new(&parent).unwrap();

        let path = area.stage("report.txt", "hello").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        assert_eq!(area.staged().len(), 1);
        assert_eq!(area.staged()[0].name, "report.txt");

        drop(area);
        fs::remove_dir_all(&parent).unwrap();
    }

    #[test]
    fn stage_rejects_existing_path() {
        let parent = scratch_dir();
        let mut area = StagingArea::new(&parent).unwrap();

        let path = area.stage("report.txt", "first").unwrap();
        let err = area.stage("report.txt", "second").unwrap_err();

        assert!(matches!(err, Error::FileExists(ref name) if name == "report.txt"));
        // Fail-fast must not clobber the file that is already staged.
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        drop(area);
        fs::remove_dir_all(&parent).unwrap();
    }

    #[test]
    fn unstage_removes_file() {
        let parent = scratch_dir();
        let mut area = StagingArea::new(&parent).unwrap();

        let path = area.stage("report.txt", "hello").unwrap();
        area.unstage("report.txt").unwrap();

        assert!(!path.exists());
        assert!(area.staged().is_empty());

        drop(area);
        fs::remove_dir_all(&parent).unwrap();
    }

    #[test]
    fn unstage_twice_reports_cleanup() {
        let parent = scratch_dir();
        let mut area = StagingArea::new(&parent).unwrap();

        area.stage("report.txt", "hello").unwrap();
        area.unstage("report.txt").unwrap();

        let err = area.unstage("report.txt").unwrap_err();
        assert!(matches!(err, Error::Cleanup(_)));

        drop(area);
        fs::remove_dir_all(&parent).unwrap();
    }

    #[test]
    fn drop_removes_remaining_files() {
        let parent = scratch_dir();
        let mut area = StagingArea::new(&parent).unwrap();

        let first = area.stage("a.txt", "a").unwrap();
        let second = area.stage("b.txt", "b").unwrap();
        let root = area.root().to_path_buf();

        drop(area);

        assert!(!first.exists());
        assert!(!second.exists());
        assert!(!root.exists());

        fs::remove_dir_all(&parent).unwrap();
    }

    #[test]
    fn areas_with_same_names_do_not_collide() {
        let parent = scratch_dir();
        let mut one = StagingArea::new(&parent).unwrap();
        let mut two = StagingArea::new(&parent).unwrap();

        let first = one.stage("report.txt", "one").unwrap();
        let second = two.stage("report.txt", "two").unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(&first).unwrap(), "one");
        assert_eq!(fs::read_to_string(&second).unwrap(), "two");

        drop(one);
        drop(two);
        fs::remove_dir_all(&parent).unwrap();
    }
}

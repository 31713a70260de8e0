use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, info, warn};

use crate::error::CliError;

/// Output files staged next to their destination.
///
/// Nothing under the output directory is created or replaced until
/// [`StagedOutputs::commit`], which installs either every staged file or
/// none; dropping the stage removes the temporaries.
pub struct StagedOutputs {
    dir:    PathBuf,
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedOutputs {
    /// Creates `dir` if needed.
    pub fn new(dir: &Path) -> Result<Self, CliError> {
        fs::create_dir_all(dir).map_err(|e| CliError::io(dir, e))?;
        Ok(StagedOutputs {
            dir:    dir.to_path_buf(),
            staged: Vec::new(),
        })
    }

    pub fn stage(&mut self, file_name: &str, contents: &str) -> Result<(), CliError> {
        let target = self.dir.join(file_name);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| CliError::io(&self.dir, e))?;
        if let Err(e) = tmp.write_all(contents.as_bytes()).and_then(|()| tmp.flush()) {
            return Err(CliError::io(tmp.path(), e));
        }
        debug!(target = %target.display(), bytes = contents.len(), "staged output");
        self.staged.push((tmp, target));
        Ok(())
    }

    /// Renames every staged file onto its destination.
    ///
    /// Existing destinations are moved aside first. If any rename fails,
    /// the files installed so far are removed and the old ones put back.
    pub fn commit(self) -> Result<Vec<PathBuf>, CliError> {
        let mut backups = Vec::new();
        let mut written = Vec::with_capacity(self.staged.len());
        for (tmp, target) in self.staged {
            if let Err(e) = install(&self.dir, tmp, &target, &mut backups) {
                roll_back(&written, backups);
                return Err(e);
            }
            written.push(target);
        }
        // Dropping the backups deletes the replaced files.
        drop(backups);
        for path in &written {
            info!(path = %path.display(), "wrote");
        }
        Ok(written)
    }
}

fn install(
    dir: &Path,
    tmp: NamedTempFile,
    target: &Path,
    backups: &mut Vec<(TempPath, PathBuf)>,
) -> Result<(), CliError> {
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.is_dir() => {
            return Err(CliError::io(
                target,
                io::Error::new(io::ErrorKind::Other, "destination is a directory"),
            ));
        }
        Ok(_) => {
            let backup = NamedTempFile::new_in(dir)
                .map_err(|e| CliError::io(dir, e))?
                .into_temp_path();
            fs::rename(target, &backup).map_err(|e| CliError::io(target, e))?;
            backups.push((backup, target.to_path_buf()));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(CliError::io(target, e)),
    }
    tmp.persist(target).map_err(|e| CliError::io(target, e.error))?;
    Ok(())
}

fn roll_back(written: &[PathBuf], backups: Vec<(TempPath, PathBuf)>) {
    for path in written {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "cannot remove output during rollback");
        }
    }
    for (backup, target) in backups {
        if let Err(e) = fs::rename(&backup, &target) {
            warn!(path = %target.display(), error = %e, "cannot restore previous output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_lands_before_commit() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("gen");

        let mut stage = StagedOutputs::new(&out).unwrap();
        stage.stage("a.h", "header\n").unwrap();
        assert!(out.is_dir());
        assert!(!out.join("a.h").exists());

        let written = stage.commit().unwrap();
        assert_eq!(written, vec![out.join("a.h")]);
        assert_eq!(fs::read_to_string(out.join("a.h")).unwrap(), "header\n");
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn commit_replaces_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.c"), "old\n").unwrap();

        let mut stage = StagedOutputs::new(dir.path()).unwrap();
        stage.stage("a.c", "new\n").unwrap();
        stage.commit().unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("a.c")).unwrap(), "new\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_commit_installs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.c"), "old\n").unwrap();
        fs::create_dir_all(dir.path().join("a.h").join("keep")).unwrap();

        let mut stage = StagedOutputs::new(dir.path()).unwrap();
        stage.stage("a.c", "new\n").unwrap();
        stage.stage("a.h", "header\n").unwrap();
        let err = stage.commit().unwrap_err();

        assert!(matches!(&err, CliError::Io { path, .. } if path == &dir.path().join("a.h")));
        assert_eq!(fs::read_to_string(dir.path().join("a.c")).unwrap(), "old\n");
        assert!(dir.path().join("a.h").join("keep").is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn failed_commit_removes_new_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b.h")).unwrap();

        let mut stage = StagedOutputs::new(dir.path()).unwrap();
        stage.stage("b.c", "source\n").unwrap();
        stage.stage("b.h", "header\n").unwrap();
        assert!(stage.commit().is_err());

        assert!(!dir.path().join("b.c").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn dropped_stage_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut stage = StagedOutputs::new(dir.path()).unwrap();
            stage.stage("a.c", "source\n").unwrap();
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

//! Writing generated sources to disk.
//!
//! Every conflict is decided before any file is touched. Each file is
//! first written to a `.partial` sibling; once all are written, existing
//! targets are moved to `.backup` siblings and the staged files renamed
//! into place. A failure at any step removes what was staged and restores
//! the backups, so an error never leaves a mix of old and new sources.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{EmitConfig, OverwritePolicy};
use crate::error::EmitError;
use crate::GeneratedSources;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> EmitError + '_ {
    move |source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

fn partial_path(path: &Path) -> PathBuf {
    sibling(path, "partial")
}

fn backup_path(path: &Path) -> PathBuf {
    sibling(path, "backup")
}

/// Undo a partial install: drop new files and staged files, then put the
/// backups back.
fn roll_back(
    staged: &[(PathBuf, PathBuf)],
    installed: &[&PathBuf],
    backups: &[(PathBuf, &PathBuf)],
) {
    for path in installed {
        let _ = fs::remove_file(path);
    }
    for (partial, _) in staged {
        let _ = fs::remove_file(partial);
    }
    for (backup, path) in backups {
        if let Err(e) = fs::rename(backup, path) {
            warn!(path = %path.display(), error = %e, "could not restore previous file");
        }
    }
}

/// Move staged `(partial, target)` files into place, all or nothing.
fn install(staged: &[(PathBuf, PathBuf)]) -> Result<(), EmitError> {
    let mut backups: Vec<(PathBuf, &PathBuf)> = Vec::new();
    for (_, path) in staged {
        if path.exists() {
            let backup = backup_path(path);
            if let Err(e) = fs::rename(path, &backup) {
                roll_back(staged, &[], &backups);
                return Err(io_error(path)(e));
            }
            backups.push((backup, path));
        }
    }

    let mut installed: Vec<&PathBuf> = Vec::new();
    for (partial, path) in staged {
        if let Err(e) = fs::rename(partial, path) {
            roll_back(staged, &installed, &backups);
            return Err(io_error(path)(e));
        }
        installed.push(path);
    }

    for (backup, _) in &backups {
        let _ = fs::remove_file(backup);
    }
    Ok(())
}

fn write_file(path: &Path, text: &str) -> Result<(), EmitError> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut out = BufWriter::new(file);
    out.write_all(text.as_bytes()).map_err(io_error(path))?;
    out.flush().map_err(io_error(path))?;
    Ok(())
}

/// Write both sources into `config.output_dir`.
///
/// When a target exists and the policy is [`OverwritePolicy::Refuse`],
/// `confirm` is asked once per existing file; declining fails with
/// [`EmitError::OutputConflict`] before anything is written.
/// Returns the written paths.
pub fn write_sources<F>(
    sources: &GeneratedSources,
    config: &EmitConfig,
    mut confirm: F,
) -> Result<Vec<PathBuf>, EmitError>
where
    F: FnMut(&Path) -> bool,
{
    config.validate()?;
    let targets = [
        (config.lattice_path(), sources.lattice.as_str()),
        (config.proclist_path(), sources.proclist.as_str()),
    ];

    for (path, _) in &targets {
        if !path.exists() {
            continue;
        }
        if !path.is_file() {
            return Err(EmitError::Io {
                path: path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "output target exists and is not a regular file",
                ),
            });
        }
        match config.overwrite {
            OverwritePolicy::Force => {
                warn!(path = %path.display(), "overwriting existing file");
            }
            OverwritePolicy::Refuse => {
                if !confirm(path) {
                    return Err(EmitError::OutputConflict { path: path.clone() });
                }
            }
        }
    }

    fs::create_dir_all(&config.output_dir).map_err(io_error(&config.output_dir))?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(targets.len());
    for (path, text) in &targets {
        let partial = partial_path(path);
        if let Err(e) = write_file(&partial, text) {
            let _ = fs::remove_file(&partial);
            for (done, _) in &staged {
                let _ = fs::remove_file(done);
            }
            return Err(e);
        }
        staged.push((partial, path.clone()));
    }
    install(&staged)?;

    let written: Vec<PathBuf> = targets.into_iter().map(|(p, _)| p).collect();
    for (path, text) in written.iter().zip([&sources.lattice, &sources.proclist]) {
        info!(path = %path.display(), bytes = text.len(), "wrote generated source");
    }
    Ok(written)
}

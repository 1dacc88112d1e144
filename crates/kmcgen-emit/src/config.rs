//! Emission configuration.

use std::path::{Path, PathBuf};

use crate::error::EmitError;

/// What to do when an output file already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Ask the confirmation callback; fail with
    /// [`EmitError::OutputConflict`] if it declines.
    #[default]
    Refuse,
    /// Overwrite without asking.
    Force,
}

/// Where and how generated sources are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitConfig {
    /// Directory receiving both files. Default: `.`.
    pub output_dir: PathBuf,
    /// File name of the index-mapping source. Default: `lattice.f90`.
    pub lattice_file: String,
    /// File name of the process-list source. Default: `proclist.f90`.
    pub proclist_file: String,
    /// Existing-file policy. Default: [`OverwritePolicy::Refuse`].
    pub overwrite: OverwritePolicy,
    /// Spaces per indentation level. Default: 4.
    pub indent: usize,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            lattice_file: "lattice.f90".to_string(),
            proclist_file: "proclist.f90".to_string(),
            overwrite: OverwritePolicy::Refuse,
            indent: 4,
        }
    }
}

impl EmitConfig {
    /// Largest accepted indentation width.
    pub const MAX_INDENT: usize = 8;

    /// Default configuration writing into `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the index-mapping source.
    pub fn lattice_path(&self) -> PathBuf {
        self.output_dir.join(&self.lattice_file)
    }

    /// Full path of the process-list source.
    pub fn proclist_path(&self) -> PathBuf {
        self.output_dir.join(&self.proclist_file)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), EmitError> {
        for (what, name) in [
            ("lattice file", &self.lattice_file),
            ("proclist file", &self.proclist_file),
        ] {
            let plain = Path::new(name)
                .file_name()
                .is_some_and(|f| f == name.as_str());
            if name.is_empty() || !plain {
                return Err(EmitError::Config {
                    reason: format!("{what} name '{name}' must be a plain file name"),
                });
            }
        }
        if self.lattice_file == self.proclist_file {
            return Err(EmitError::Config {
                reason: format!(
                    "lattice and proclist files are both named '{}'",
                    self.lattice_file
                ),
            });
        }
        if self.indent == 0 || self.indent > Self::MAX_INDENT {
            return Err(EmitError::Config {
                reason: format!(
                    "indent must be between 1 and {}, got {}",
                    Self::MAX_INDENT,
                    self.indent
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let c = EmitConfig::default();
        c.validate().unwrap();
        assert_eq!(c.lattice_path(), Path::new("./lattice.f90"));
        assert_eq!(c.overwrite, OverwritePolicy::Refuse);
    }

    #[test]
    fn rejects_paths_as_file_names() {
        let c = EmitConfig {
            lattice_file: "sub/lattice.f90".to_string(),
            ..EmitConfig::default()
        };
        assert!(matches!(c.validate(), Err(EmitError::Config { .. })));
    }

    #[test]
    fn rejects_identical_file_names() {
        let c = EmitConfig {
            proclist_file: "lattice.f90".to_string(),
            ..EmitConfig::default()
        };
        assert!(matches!(c.validate(), Err(EmitError::Config { .. })));
    }

    #[test]
    fn rejects_zero_indent() {
        let c = EmitConfig {
            indent: 0,
            ..EmitConfig::default()
        };
        assert!(c.validate().is_err());
    }
}

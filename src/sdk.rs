//! SDK archive installer
//!
//! Walks the manifest of an extracted SDK tarball and dispatches each
//! "atom" of content to a type-named installer. A frontend implements
//! installers for the atom types it cares about; anything else is
//! reported as ignored. Archives are unpacked with the system `tar`
//! into a temporary directory that lives only for the duration of the
//! run, and the `source`/`dest` path helpers are scoped to that
//! lifetime.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use crate::error::{Error, Result};

/// Receives atoms as the unpacker walks the manifest.
///
/// `install_atom` returns `true` when the frontend handled the atom's
/// type; unhandled types fall back to an "ignored" notice.
pub trait Frontend {
    /// Called once before any atom is processed
    fn prepare(&mut self, _arch: &Value, _ctx: &InstallContext) -> Result<()> {
        Ok(())
    }

    /// Handle one atom; return `false` to leave it to the default notice
    fn install_atom(&mut self, atom_type: &str, atom: &Value, ctx: &InstallContext) -> Result<bool>;

    /// Called once after every atom has been processed
    fn finalize(&mut self, _arch: &Value, _ctx: &InstallContext) -> Result<()> {
        Ok(())
    }
}

/// Path helpers valid only while the unpacker is running.
pub struct InstallContext {
    source_dir: PathBuf,
    output: PathBuf,
}

impl InstallContext {
    /// Build a path to a file inside the extracted archive.
    pub fn source<I, P>(&self, parts: I) -> PathBuf
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut path = self.source_dir.clone();
        for part in parts {
            path.push(part);
        }
        path
    }

    /// Build a path in the output directory, creating the directory
    /// hierarchy for it. A first component already inside the output
    /// directory is used as-is.
    pub fn dest<I, P>(&self, parts: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut iter = parts.into_iter();
        let mut path = match iter.next() {
            Some(first) if first.as_ref().starts_with(&self.output) => {
                first.as_ref().to_path_buf()
            }
            Some(first) => self.output.join(first.as_ref()),
            None => self.output.clone(),
        };
        for part in iter {
            path.push(part);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}

/// Processes the contents of an SDK archive or pre-extracted directory.
pub struct SdkUnpacker {
    archive: Option<PathBuf>,
    directory: Option<PathBuf>,
    output: PathBuf,
}

impl SdkUnpacker {
    /// Unpack from a tarball
    pub fn from_archive(archive: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            archive: Some(archive.into()),
            directory: None,
            output: output.into(),
        }
    }

    /// Walk an already-extracted directory
    pub fn from_directory(directory: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            archive: None,
            directory: Some(directory.into()),
            output: output.into(),
        }
    }

    /// Run the frontend over every atom in the manifest.
    pub fn run(&self, frontend: &mut dyn Frontend) -> Result<()> {
        // keep the temp dir alive for the whole walk
        let (source_dir, _extracted) = self.archive_dir()?;
        let ctx = InstallContext {
            source_dir,
            output: self.output.clone(),
        };

        let manifest = load_metadata(&ctx.source(["meta", "manifest.json"]))?;
        let arch = manifest.get("arch").cloned().unwrap_or(Value::Null);

        frontend.prepare(&arch, &ctx)?;

        for part in manifest
            .get("parts")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            let Some(rel_path) = part.as_str() else {
                continue;
            };
            let atom = load_metadata(&ctx.source([rel_path]))?;
            let atom_type = atom.get("type").and_then(Value::as_str).unwrap_or("");
            if !frontend.install_atom(atom_type, &atom, &ctx)? {
                let name = atom.get("name").and_then(Value::as_str).unwrap_or("?");
                info!("Ignored {} ({})", name, atom_type);
            }
        }

        frontend.finalize(&arch, &ctx)
    }

    /// The directory holding the archive contents, extracting first if
    /// needed. The returned guard removes the extraction when dropped.
    fn archive_dir(&self) -> Result<(PathBuf, Option<tempfile::TempDir>)> {
        if let Some(directory) = &self.directory {
            return Ok((directory.clone(), None));
        }
        let Some(archive) = &self.archive else {
            return Err(Error::NoSdkSource);
        };

        let temp_dir = tempfile::tempdir()?;
        // extracting the whole tarball at once is vastly cheaper than
        // reading members one by one
        let status = Command::new("tar")
            .arg("xf")
            .arg(archive)
            .arg("-C")
            .arg(temp_dir.path())
            .status()
            .map_err(|e| Error::ArchiveExtractFailed {
                archive: archive.clone(),
                reason: e.to_string(),
            })?;
        if !status.success() {
            return Err(Error::ArchiveExtractFailed {
                archive: archive.clone(),
                reason: format!("tar exited with {}", status),
            });
        }
        Ok((temp_dir.path().to_path_buf(), Some(temp_dir)))
    }
}

fn load_metadata(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).map_err(|e| Error::ManifestLoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| Error::ManifestLoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

use flowpack_core::ErrorKind;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Suffix appended to a bundle path to name its archive.
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Archive path for a bundle directory: `<bundle><ARCHIVE_SUFFIX>`, next to
/// the bundle. Trailing separators on `bundle_dir` are ignored.
pub fn archive_path(bundle_dir: &Path) -> Result<PathBuf, ArchiveError> {
    let (parent, name) = split_bundle_path(bundle_dir)?;
    let mut file_name = name.to_owned();
    file_name.push(ARCHIVE_SUFFIX);
    Ok(parent.join(file_name))
}

/// Parent directory and final component of a bundle path.
fn split_bundle_path(bundle_dir: &Path) -> Result<(&Path, &std::ffi::OsStr), ArchiveError> {
    let name = bundle_dir
        .file_name()
        .ok_or_else(|| ArchiveError::InvalidBundlePath(bundle_dir.to_path_buf()))?;
    let parent = bundle_dir
        .parent()
        .ok_or_else(|| ArchiveError::InvalidBundlePath(bundle_dir.to_path_buf()))?;
    Ok((parent, name))
}

/// Zips a bundle directory next to itself.
///
/// Entry names are relative to the bundle's parent directory, so extracting
/// the archive recreates the bundle directory itself. Files are added in
/// sorted order with a fixed timestamp; an existing archive at the target
/// path is replaced.
pub fn create_archive(bundle_dir: &Path) -> Result<PathBuf, ArchiveError> {
    if !bundle_dir.is_dir() {
        return Err(ArchiveError::MissingBundle(bundle_dir.to_path_buf()));
    }
    let (base, _) = split_bundle_path(bundle_dir)?;
    let zip_path = archive_path(bundle_dir)?;

    let mut files = Vec::new();
    collect_files(bundle_dir, &mut files)?;
    // A stray archive left inside the bundle must not archive itself.
    files.retain(|path| !is_same_file(path, &zip_path));
    files.sort();

    let file = File::create(&zip_path).map_err(|e| ArchiveError::Write {
        path: zip_path.clone(),
        source: e,
    })?;
    let mut writer = ZipWriter::new(file);

    for path in &files {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        let name = entry_name(base, path)?;
        let bytes = std::fs::read(path).map_err(|e| ArchiveError::Read {
            path: path.clone(),
            source: e,
        })?;
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| ArchiveError::Zip {
                path: zip_path.clone(),
                source: e,
            })?;
        writer.write_all(&bytes).map_err(|e| ArchiveError::Write {
            path: zip_path.clone(),
            source: e,
        })?;
        tracing::debug!(entry = %name, bytes = bytes.len(), "archived file");
    }

    writer.finish().map_err(|e| ArchiveError::Zip {
        path: zip_path.clone(),
        source: e,
    })?;

    tracing::info!(archive = %zip_path.display(), entries = files.len(), "created archive");
    Ok(zip_path)
}

/// Unpacks `archive` into `dest`, returning the extracted file paths.
///
/// Entries whose names would land outside `dest` are rejected.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let file = File::open(archive).map_err(|e| ArchiveError::Read {
        path: archive.to_path_buf(),
        source: e,
    })?;
    let mut zip = ZipArchive::new(file).map_err(|e| ArchiveError::Zip {
        path: archive.to_path_buf(),
        source: e,
    })?;

    let mut extracted = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| ArchiveError::Zip {
            path: archive.to_path_buf(),
            source: e,
        })?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ArchiveError::UnsafeEntry(entry.name().to_owned()))?;
        let target = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| ArchiveError::Write {
                path: target.clone(),
                source: e,
            })?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ArchiveError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| ArchiveError::Read {
                path: archive.to_path_buf(),
                source: e,
            })?;
        std::fs::write(&target, &bytes).map_err(|e| ArchiveError::Write {
            path: target.clone(),
            source: e,
        })?;
        extracted.push(target);
    }

    Ok(extracted)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ArchiveError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ArchiveError::Read {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ArchiveError::Read {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| ArchiveError::Read {
            path: path.clone(),
            source: e,
        })?;
        if file_type.is_dir() {
            collect_files(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
    }

    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Zip entry name for `path`: relative to `base`, `/`-separated.
fn entry_name(base: &Path, path: &Path) -> Result<String, ArchiveError> {
    let relative = path
        .strip_prefix(base)
        .map_err(|_| ArchiveError::UnsafeEntry(path.display().to_string()))?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return Err(ArchiveError::UnsafeEntry(path.display().to_string())),
        }
    }
    Ok(parts.join("/"))
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("bundle directory {0} does not exist")]
    MissingBundle(PathBuf),

    #[error("cannot derive an archive name from bundle path {0}")]
    InvalidBundlePath(PathBuf),

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("zip error in {path}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("archive entry {0:?} escapes the archive root")]
    UnsafeEntry(String),
}

impl ArchiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsafeEntry(_) | Self::InvalidBundlePath(_) => ErrorKind::Validation,
            _ => ErrorKind::Io,
        }
    }
}

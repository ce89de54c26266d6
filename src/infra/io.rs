use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::warn;

const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1 MiB

/// File bytes, mapped for large files and buffered otherwise.
pub enum FileContent {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl AsRef<[u8]> for FileContent {
    fn as_ref(&self) -> &[u8] {
        match self {
            FileContent::Mapped(mmap) => &mmap[..],
            FileContent::Buffered(bytes) => bytes.as_slice(),
        }
    }
}

pub fn read_file_smart<P: AsRef<Path>>(path: P) -> Result<FileContent> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;

    if metadata.len() > MMAP_THRESHOLD {
        let file = File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?;

        // Safety: read-only mapping; the file is replaced by rename, never written in place
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to memory-map {}", path.display()))?;

        Ok(FileContent::Mapped(mmap))
    } else {
        let content =
            fs::read(path).with_context(|| format!("Failed to read file {}", path.display()))?;

        Ok(FileContent::Buffered(content))
    }
}

/// Replace `path` with `data` through a same-directory temp file and one rename.
///
/// Readers observe either the old or the new content, never a missing or
/// half-written file. Original permissions are carried over.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let perms = fs::metadata(path)
        .map(|m| m.permissions())
        .with_context(|| format!("stat original: {}", path.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;

    tmp.write_all(data)
        .with_context(|| format!("write temp file for {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .context("sync temp file")?;

    fs::set_permissions(tmp.path(), perms).context("set temp permissions")?;

    match tmp.persist(path) {
        Ok(_) => {}
        Err(e) => {
            // Rename refused (e.g. cross-device); copy over as a last resort
            fs::copy(e.file.path(), path).with_context(|| {
                format!("replace {} after failed rename: {}", path.display(), e.error)
            })?;
        }
    }

    // fsync parent dir so the rename itself is durable
    #[cfg(unix)]
    {
        if let Err(e) = File::open(dir).and_then(|parent| parent.sync_all()) {
            warn!(error = %e, dir = %dir.display(), "fsync of parent dir failed");
        }
    }

    Ok(())
}

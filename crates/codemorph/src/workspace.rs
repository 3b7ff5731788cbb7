use crate::prelude::*;
use codemorph_core::update::TextEdit;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Tells which file the user is currently looking at.
pub trait TargetResolver: Send + Sync {
    fn active_target(&self) -> Option<PathBuf>;
}

/// The active file handed over by the host editor, if any.
#[derive(Debug, Clone, Default)]
pub struct ActiveFile(pub Option<PathBuf>);

impl TargetResolver for ActiveFile {
    fn active_target(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Documents that can be read, edited and saved.
#[async_trait::async_trait]
pub trait Workspace: Send + Sync {
    /// Open `path` and return its full text.
    async fn open(&self, path: &Path) -> Result<String>;

    /// Apply `edit` to the open document as a single operation.
    async fn apply_edit(&self, path: &Path, edit: &TextEdit) -> Result<()>;

    /// Persist the open document to its backing store.
    async fn save(&self, path: &Path) -> Result<()>;
}

#[derive(Debug)]
struct Buffer {
    text: String,
    dirty: bool,
}

/// Files on disk, edited through in-memory buffers.
///
/// Edits only touch the buffer; `save` writes it back atomically.
#[derive(Debug, Default)]
pub struct FsWorkspace {
    buffers: Mutex<HashMap<PathBuf, Buffer>>,
}

impl FsWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers with edits that were never saved.
    pub fn unsaved(&self) -> Vec<(PathBuf, String)> {
        let buffers = self.buffers.lock().unwrap_or_else(|e| e.into_inner());
        let mut unsaved: Vec<_> = buffers
            .iter()
            .filter(|(_, buffer)| buffer.dirty)
            .map(|(path, buffer)| (path.clone(), buffer.text.clone()))
            .collect();
        unsaved.sort_by(|a, b| a.0.cmp(&b.0));
        unsaved
    }

    fn with_buffer<T>(&self, path: &Path, f: impl FnOnce(&mut Buffer) -> Result<T>) -> Result<T> {
        let mut buffers = self.buffers.lock().unwrap_or_else(|e| e.into_inner());
        let buffer = buffers
            .get_mut(path)
            .ok_or_else(|| eyre!("{} is not open", path.display()))?;
        f(buffer)
    }
}

#[async_trait::async_trait]
impl Workspace for FsWorkspace {
    async fn open(&self, path: &Path) -> Result<String> {
        if let Ok(text) = self.with_buffer(path, |buffer| Ok(buffer.text.clone())) {
            return Ok(text);
        }

        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file '{}'", path.display()))?;

        let mut buffers = self.buffers.lock().unwrap_or_else(|e| e.into_inner());
        let buffer = buffers.entry(path.to_path_buf()).or_insert(Buffer {
            text,
            dirty: false,
        });

        Ok(buffer.text.clone())
    }

    async fn apply_edit(&self, path: &Path, edit: &TextEdit) -> Result<()> {
        self.with_buffer(path, |buffer| {
            edit.apply(&mut buffer.text)
                .map_err(|e| Error::Edit(e.to_string()))?;
            buffer.dirty = true;
            Ok(())
        })
    }

    async fn save(&self, path: &Path) -> Result<()> {
        let text = self.with_buffer(path, |buffer| Ok(buffer.text.clone()))?;

        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || write_atomically(&target, &text)).await??;

        self.with_buffer(path, |buffer| {
            buffer.dirty = false;
            Ok(())
        })
    }
}

/// Write through a temporary file in the same directory, then rename over
/// `path`, so readers never see a half-written file.
fn write_atomically(path: &Path, text: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let permissions = std::fs::metadata(path).map(|m| m.permissions()).ok();

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(text.as_bytes())
        .context("Failed to write temporary file")?;

    if let Some(permissions) = permissions {
        file.as_file()
            .set_permissions(permissions)
            .context("Failed to copy file permissions")?;
    }

    file.persist(path)
        .map_err(|e| eyre!("Failed to replace {}: {}", path.display(), e))?;

    Ok(())
}

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::foundation::error::{FramecueError, FramecueResult};

/// Counts outstanding render-blocking loads.
///
/// Rendering may start only once [`ReadinessGate::is_ready`] holds. Each load holds a
/// [`BlockHandle`] which releases its block when dropped, whether the load succeeded or not.
#[derive(Clone, Debug, Default)]
pub struct ReadinessGate {
    pending: Arc<AtomicUsize>,
}

/// Scoped render block acquired from a [`ReadinessGate`].
#[derive(Debug)]
#[must_use = "dropping the handle releases the block immediately"]
pub struct BlockHandle {
    pending: Arc<AtomicUsize>,
    label: String,
}

impl ReadinessGate {
    /// Gate with no outstanding blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block rendering until the returned handle is dropped.
    pub fn acquire(&self, label: impl Into<String>) -> BlockHandle {
        let label = label.into();
        let n = self.pending.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(%label, pending = n, "render blocked");
        BlockHandle {
            pending: Arc::clone(&self.pending),
            label,
        }
    }

    /// Number of outstanding blocks.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// `true` when no block is outstanding.
    pub fn is_ready(&self) -> bool {
        self.pending() == 0
    }
}

impl BlockHandle {
    /// Label given at acquisition.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Release the block now.
    pub fn release(self) {}
}

impl Drop for BlockHandle {
    fn drop(&mut self) {
        let left = self.pending.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::trace!(label = %self.label, pending = left, "render unblocked");
    }
}

/// Normalize and validate composition-relative asset paths.
///
/// The result uses `/` separators, drops `.` segments and rejects absolute paths or parent
/// traversals (`..`).
pub fn normalize_rel_path(source: &str) -> FramecueResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(FramecueError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(FramecueError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(FramecueError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(FramecueError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Map an authored source to a path relative to the asset root.
///
/// Remote sources are rejected. A leading `public/` (or `/public/`) prefix, the conventional
/// static-file directory, is stripped before normalization.
pub fn resolve_source(source: &str) -> FramecueResult<String> {
    let trimmed = source.trim();
    if trimmed.starts_with("http") {
        return Err(FramecueError::asset(format!(
            "remote asset source '{trimmed}' is not supported; vendor it under the asset root"
        )));
    }
    let local = trimmed
        .strip_prefix("/public/")
        .or_else(|| trimmed.strip_prefix("public/"))
        .unwrap_or(trimmed);
    normalize_rel_path(local).map_err(|e| FramecueError::asset(format!("'{source}': {e}")))
}

/// Load and parse one JSON asset while holding a render block.
///
/// Every failure is a fatal [`FramecueError::Asset`]; nothing is retried. Only files under
/// `root` are read: remote (`http…`) sources are refused and must be vendored locally.
#[tracing::instrument(skip(gate, root), fields(root = %root.display()))]
pub fn load_json_asset(
    gate: &ReadinessGate,
    root: &Path,
    source: &str,
) -> FramecueResult<serde_json::Value> {
    let _block = gate.acquire(format!("json asset '{source}'"));

    let norm = resolve_source(source)?;
    let path = root.join(Path::new(&norm));
    let bytes = std::fs::read(&path).map_err(|e| {
        FramecueError::asset(format!("read json asset '{}': {e}", path.display()))
    })?;
    let value = serde_json::from_slice(&bytes).map_err(|e| {
        FramecueError::asset(format!("parse json asset '{}': {e}", path.display()))
    })?;
    tracing::debug!(path = %norm, bytes = bytes.len(), "loaded json asset");
    Ok(value)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;

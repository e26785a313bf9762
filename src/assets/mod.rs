pub(crate) mod loader;
pub(crate) mod lottie;

use std::{collections::BTreeMap, path::Path, sync::Arc};

use crate::{
    assets::loader::{ReadinessGate, load_json_asset, resolve_source},
    assets::lottie::LottieMeta,
    foundation::error::{FramecueError, FramecueResult},
};

#[derive(Clone, Debug, PartialEq)]
/// A JSON asset loaded during composition setup.
pub struct PreparedJson {
    /// Normalized path relative to the asset root.
    pub norm_path: String,
    /// Parsed document.
    pub data: Arc<serde_json::Value>,
    /// Lottie header, when the document carries one.
    pub lottie: Option<LottieMeta>,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Immutable store of assets prepared before the first frame is rendered.
pub struct PreparedAssets {
    by_key: BTreeMap<String, PreparedJson>,
}

impl PreparedAssets {
    /// Load every `key -> source` entry from `root`.
    ///
    /// Fails on the first asset that cannot be loaded.
    pub fn prepare(sources: &BTreeMap<String, String>, root: &Path) -> FramecueResult<Self> {
        Self::prepare_with_gate(&ReadinessGate::new(), sources, root)
    }

    /// Like [`PreparedAssets::prepare`], blocking `gate` while each asset loads.
    ///
    /// A host holding a clone of `gate` sees it ready again once this returns, whether loading
    /// succeeded or not.
    pub fn prepare_with_gate(
        gate: &ReadinessGate,
        sources: &BTreeMap<String, String>,
        root: &Path,
    ) -> FramecueResult<Self> {
        let mut by_key = BTreeMap::new();
        for (key, source) in sources {
            let data = load_json_asset(gate, root, source)?;
            let lottie = if data.get("fr").is_some() {
                Some(LottieMeta::from_json(&data)?)
            } else {
                None
            };
            by_key.insert(
                key.clone(),
                PreparedJson {
                    norm_path: resolve_source(source)?,
                    data: Arc::new(data),
                    lottie,
                },
            );
        }
        Ok(Self { by_key })
    }

    /// Prepared asset by key.
    pub fn get(&self, key: &str) -> Option<&PreparedJson> {
        self.by_key.get(key)
    }

    /// Lottie header of a prepared asset.
    pub fn lottie(&self, key: &str) -> FramecueResult<&LottieMeta> {
        let asset = self
            .get(key)
            .ok_or_else(|| FramecueError::validation(format!("unknown asset key '{key}'")))?;
        asset.lottie.as_ref().ok_or_else(|| {
            FramecueError::validation(format!("asset '{key}' is not a lottie animation"))
        })
    }

    /// Asset keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    /// Number of prepared assets.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// `true` when nothing was prepared.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/prepared.rs"]
mod tests;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{
    environment::model::{EnvironmentAsset, EnvironmentCategory, EnvironmentMeta, EnvironmentRequest},
    foundation::error::{MockupError, MockupResult},
};

/// Anything that can supply a background for a request.
///
/// Failures surface as [`MockupError::EnvironmentSource`] and are the only retryable errors.
pub trait EnvironmentSource: Send + Sync {
    /// Produce one background suited to `request`.
    fn acquire(&self, request: &EnvironmentRequest) -> MockupResult<EnvironmentAsset>;
}

/// Persistence capability for previously saved environments.
pub trait AssetCatalog: Send + Sync {
    /// Load a saved environment by id.
    fn load(&self, id: &str) -> MockupResult<EnvironmentAsset>;

    /// Note that `id` was used for a mockup.
    fn record_use(&self, id: &str) -> MockupResult<()>;
}

/// Source that always hands out the same asset.
#[derive(Clone, Debug)]
pub struct InMemorySource {
    asset: EnvironmentAsset,
}

impl InMemorySource {
    /// Serve `asset` for every request.
    pub fn new(asset: EnvironmentAsset) -> Self {
        Self { asset }
    }
}

impl EnvironmentSource for InMemorySource {
    fn acquire(&self, _request: &EnvironmentRequest) -> MockupResult<EnvironmentAsset> {
        Ok(self.asset.clone())
    }
}

/// Source backed by an [`AssetCatalog`]; requests must name an environment id.
pub struct SavedEnvironmentSource<C: AssetCatalog> {
    catalog: C,
}

impl<C: AssetCatalog> SavedEnvironmentSource<C> {
    /// Wrap a catalog.
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Underlying catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}

impl<C: AssetCatalog> EnvironmentSource for SavedEnvironmentSource<C> {
    fn acquire(&self, request: &EnvironmentRequest) -> MockupResult<EnvironmentAsset> {
        let id = request
            .environment_id
            .as_deref()
            .ok_or_else(|| MockupError::validation("saved environment requests need an environment_id"))?;
        let asset = self.catalog.load(id)?;
        // usage bookkeeping never blocks a mockup
        if let Err(err) = self.catalog.record_use(id) {
            tracing::warn!(id, error = %err, "failed to record environment use");
        }
        Ok(asset)
    }
}

/// Manifest file name inside a template directory.
pub const TEMPLATE_MANIFEST: &str = "templates.json";

/// One entry of a template manifest.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateEntry {
    /// Stable identifier.
    pub id: String,
    /// Image path relative to the manifest.
    pub file: PathBuf,
    /// Descriptive metadata.
    #[serde(flatten)]
    pub meta: EnvironmentMeta,
}

#[derive(serde::Deserialize)]
struct Manifest {
    templates: Vec<TemplateEntry>,
}

/// Directory of ready-made backgrounds described by `templates.json`.
///
/// Selection is deterministic: by id when the request names one, otherwise the first entry (in id
/// order) matching the requested category and orientation, then orientation alone.
#[derive(Debug)]
pub struct TemplateCatalog {
    root: PathBuf,
    templates: Vec<TemplateEntry>,
    uses: Mutex<BTreeMap<String, u64>>,
}

impl TemplateCatalog {
    /// Read the manifest under `root`.
    pub fn open(root: impl AsRef<Path>) -> MockupResult<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(TEMPLATE_MANIFEST);
        let text = std::fs::read_to_string(&manifest_path).map_err(|e| {
            MockupError::environment_source(format!("read {}: {e}", manifest_path.display()))
        })?;
        Self::from_manifest_str(root, &text)
    }

    /// Build from manifest text with image paths resolved against `root`.
    pub fn from_manifest_str(root: impl Into<PathBuf>, manifest: &str) -> MockupResult<Self> {
        let Manifest { mut templates } = serde_json::from_str(manifest)
            .map_err(|e| MockupError::validation(format!("template manifest: {e}")))?;
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(dup) = templates.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(MockupError::validation(format!(
                "duplicate template id '{}'",
                dup[0].id
            )));
        }
        Ok(Self {
            root: root.into(),
            templates,
            uses: Mutex::new(BTreeMap::new()),
        })
    }

    /// Entries sorted by id.
    pub fn templates(&self) -> &[TemplateEntry] {
        &self.templates
    }

    /// How many times `id` has been used since the catalog was opened.
    pub fn usage(&self, id: &str) -> u64 {
        self.uses
            .lock()
            .map(|m| m.get(id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn select(&self, request: &EnvironmentRequest) -> MockupResult<&TemplateEntry> {
        if let Some(id) = request.environment_id.as_deref() {
            return self
                .templates
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| MockupError::environment_source(format!("no template '{id}'")));
        }
        let orientation = request.orientation();
        let by_category = |c: EnvironmentCategory| {
            self.templates
                .iter()
                .find(|t| t.meta.category == c && t.meta.orientation == orientation)
        };
        request
            .category
            .and_then(by_category)
            .or_else(|| {
                self.templates
                    .iter()
                    .find(|t| t.meta.orientation == orientation)
            })
            .ok_or_else(|| {
                MockupError::environment_source(format!(
                    "no {orientation:?} template available"
                ))
            })
    }

    fn read(&self, entry: &TemplateEntry) -> MockupResult<EnvironmentAsset> {
        let path = self.root.join(&entry.file);
        let bytes = std::fs::read(&path).map_err(|e| {
            MockupError::environment_source(format!("read {}: {e}", path.display()))
        })?;
        Ok(EnvironmentAsset {
            bytes,
            meta: entry.meta.clone(),
        })
    }
}

impl EnvironmentSource for TemplateCatalog {
    #[tracing::instrument(level = "debug", skip(self, request))]
    fn acquire(&self, request: &EnvironmentRequest) -> MockupResult<EnvironmentAsset> {
        let entry = self.select(request)?;
        tracing::debug!(id = %entry.id, "template selected");
        let asset = self.read(entry)?;
        if let Err(err) = self.record_use(&entry.id) {
            tracing::warn!(id = %entry.id, error = %err, "failed to record template use");
        }
        Ok(asset)
    }
}

impl AssetCatalog for TemplateCatalog {
    fn load(&self, id: &str) -> MockupResult<EnvironmentAsset> {
        let entry = self
            .templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| MockupError::environment_source(format!("no template '{id}'")))?;
        self.read(entry)
    }

    fn record_use(&self, id: &str) -> MockupResult<()> {
        let mut uses = self
            .uses
            .lock()
            .map_err(|_| MockupError::environment_source("usage counter poisoned"))?;
        *uses.entry(id.to_owned()).or_insert(0) += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/environment/source.rs"]
mod tests;

//! Process-wide taxonomy cache, shared read-only by every task.

use std::sync::Arc;

use tokio::sync::RwLock;

use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::taxonomy::TaxonomyIndex;

use crate::ports::DeviceRepository;

/// Lazily builds the [`TaxonomyIndex`] from the repository and hands out
/// shared snapshots of it.
///
/// A snapshot stays valid for as long as a caller holds it, even after
/// [`invalidate`](Self::invalidate) triggers a rebuild for later callers.
pub struct TaxonomyCache<R> {
    repo: R,
    index: RwLock<Option<Arc<TaxonomyIndex>>>,
}

impl<R: DeviceRepository> TaxonomyCache<R> {
    #[must_use]
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            index: RwLock::new(None),
        }
    }

    /// The repository the cache loads from.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Current index, building it first if needed.
    ///
    /// # Errors
    ///
    /// Propagates repository failures, and [`ScriptEnvError::MalformedInput`]
    /// when the snapshot contains duplicate ids.
    pub async fn index(&self) -> Result<Arc<TaxonomyIndex>, ScriptEnvError> {
        if let Some(index) = self.index.read().await.as_ref() {
            return Ok(Arc::clone(index));
        }
        let mut slot = self.index.write().await;
        if let Some(index) = slot.as_ref() {
            return Ok(Arc::clone(index));
        }
        let snapshot = self.repo.load_taxonomy().await?;
        let index = Arc::new(TaxonomyIndex::from_snapshot(snapshot)?);
        tracing::debug!(
            aspect_nodes = index.aspect_nodes().len(),
            functions = index.functions().len(),
            device_types = index.device_types().len(),
            "taxonomy index built"
        );
        *slot = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Drop the current index; the next [`index`](Self::index) call rebuilds it.
    pub async fn invalidate(&self) {
        self.index.write().await.take();
        tracing::debug!("taxonomy index invalidated");
    }
}

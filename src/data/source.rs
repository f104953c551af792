use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

use super::loader;
use super::model::Dataset;

/// The dataset shared by every view, loaded at most once per process.
static DATASET: OnceLock<Dataset> = OnceLock::new();

#[derive(Debug, Error)]
#[error("failed to load dataset from {}", .path.display())]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: anyhow::Error,
}

/// Load the dataset on first use and hand out the same instance afterwards.
///
/// Once a dataset is held, `path` is ignored. A failed load leaves nothing
/// behind, so the next call tries again.
pub fn load(path: &Path) -> Result<&'static Dataset, LoadError> {
    if let Some(dataset) = DATASET.get() {
        return Ok(dataset);
    }

    let dataset = loader::load_file(path).map_err(|source| LoadError {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "Loaded {} rows with schema {:?} from {}",
        dataset.len(),
        dataset.schema(),
        path.display()
    );

    Ok(DATASET.get_or_init(|| dataset))
}

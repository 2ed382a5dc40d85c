//! Catalog trait for enumerating the sectoral index universe.

use async_trait::async_trait;

use crate::{IndexRef, Result};

/// A lookup of the sectoral indices to score.
///
/// Implementations must exclude the two benchmark identifiers from the
/// returned set — benchmarks are denominators, never scored against
/// themselves.
#[async_trait]
pub trait IndexCatalog: Send + Sync {
    /// All sectoral indices, excluding the benchmarks.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read; the pipeline
    /// treats this as fatal since there is nothing to iterate.
    async fn sectoral_indices(&self) -> Result<Vec<IndexRef>>;
}

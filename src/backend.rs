//! Optional accelerated MetaImage backend.

use std::path::Path;

use crate::error::Result;
use crate::volume::ScalarBuffer;

/// A natively accelerated MetaImage reader.
///
/// The loader works without one: backends are injected via
/// [`StackLoader::with_backend`], probed once per call, and the built-in
/// header/raw reader takes over whenever none is present. The trait mirrors
/// the native reader surface this wraps: point it at a file, then query
/// dimensions, the scalar buffer and the physical spacing.
///
/// Implementations that discover at call time that their native library is
/// missing should return [`StackLoaderError::BackendUnavailable`]; the
/// loader treats that exactly like an absent backend.
///
/// [`StackLoader::with_backend`]: crate::stack_loader::StackLoader::with_backend
/// [`StackLoaderError::BackendUnavailable`]: crate::error::StackLoaderError::BackendUnavailable
pub trait MetaImageBackend {
    /// Volume dimensions in the order the native reader reports them:
    /// `(rows, cols, layers)`.
    fn dimensions(&self, path: &Path) -> Result<(usize, usize, usize)>;

    /// The flat scalar buffer for the whole volume.
    fn read_scalars(&self, path: &Path) -> Result<ScalarBuffer>;

    /// Physical per-axis voxel spacing; three values when the file carries
    /// spacing metadata, fewer (or none) when it does not.
    fn spacing(&self, path: &Path) -> Result<Vec<f64>>;
}

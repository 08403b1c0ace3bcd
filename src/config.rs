//! Loader configuration.

/// Configuration injected into [`StackLoader`].
///
/// [`StackLoader`]: crate::stack_loader::StackLoader
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Axis ratio triple used whenever spacing metadata is unavailable.
    /// Mirrors the viewer preference `defaultAxisRatios`.
    pub default_axis_ratios: [f64; 3],
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            // Square voxels unless metadata says otherwise.
            default_axis_ratios: [1.0, 1.0, 1.0],
        }
    }
}

//! Axis ratio derivation from physical voxel spacing.

/// Derives the three display axis ratios from a physical spacing triple.
///
/// The pairing is cross-axis on purpose: the first ratio relates x to y
/// spacing, the second z to x, the third y to z. Each projection view
/// locks its aspect to a different axis pair.
///
/// Returns `None` unless exactly three spacing values are given.
pub(crate) fn ratios_from_spacing(spacing: &[f64]) -> Option<[f64; 3]> {
    match spacing {
        [x, y, z] => Some([x / y, z / x, y / z]),
        _ => None,
    }
}

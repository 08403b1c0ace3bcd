//! Voxel array storage.

use ndarray::Array3;

use crate::error::Result;

/// A dense 3-D voxel array in `(z, y, x)` axis order.
///
/// Every loading path in this crate, whatever the source format or element
/// type, produces one of these. The caller owns the array for the lifetime
/// of the loaded layer.
#[derive(Clone, Debug, PartialEq)]
pub enum VoxelData {
    I8(Array3<i8>),
    U8(Array3<u8>),
    I16(Array3<i16>),
    U16(Array3<u16>),
    I32(Array3<i32>),
    U32(Array3<u32>),
    I64(Array3<i64>),
    U64(Array3<u64>),
    F32(Array3<f32>),
    F64(Array3<f64>),
}

impl VoxelData {
    /// Dimensions of the volume as `(layers, rows, cols)`.
    pub fn dim(&self) -> (usize, usize, usize) {
        match self {
            Self::I8(a) => a.dim(),
            Self::U8(a) => a.dim(),
            Self::I16(a) => a.dim(),
            Self::U16(a) => a.dim(),
            Self::I32(a) => a.dim(),
            Self::U32(a) => a.dim(),
            Self::I64(a) => a.dim(),
            Self::U64(a) => a.dim(),
            Self::F32(a) => a.dim(),
            Self::F64(a) => a.dim(),
        }
    }

    /// Total number of voxels.
    pub fn len(&self) -> usize {
        let (z, y, x) = self.dim();
        z * y * x
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A flat, decoded scalar buffer that has not been given its 3-D shape yet.
///
/// Produced by the raw payload decoder, the TIFF page reader and accelerated
/// backends; [`ScalarBuffer::into_volume`] turns it into [`VoxelData`].
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarBuffer {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl ScalarBuffer {
    /// Number of scalar elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reshapes the flat buffer into a volume with the given
    /// `(layers, rows, cols)` axis lengths.
    ///
    /// # Errors
    /// Returns an error if the buffer length does not match the shape.
    pub fn into_volume(self, shape: (usize, usize, usize)) -> Result<VoxelData> {
        Ok(match self {
            Self::I8(v) => VoxelData::I8(Array3::from_shape_vec(shape, v)?),
            Self::U8(v) => VoxelData::U8(Array3::from_shape_vec(shape, v)?),
            Self::I16(v) => VoxelData::I16(Array3::from_shape_vec(shape, v)?),
            Self::U16(v) => VoxelData::U16(Array3::from_shape_vec(shape, v)?),
            Self::I32(v) => VoxelData::I32(Array3::from_shape_vec(shape, v)?),
            Self::U32(v) => VoxelData::U32(Array3::from_shape_vec(shape, v)?),
            Self::I64(v) => VoxelData::I64(Array3::from_shape_vec(shape, v)?),
            Self::U64(v) => VoxelData::U64(Array3::from_shape_vec(shape, v)?),
            Self::F32(v) => VoxelData::F32(Array3::from_shape_vec(shape, v)?),
            Self::F64(v) => VoxelData::F64(Array3::from_shape_vec(shape, v)?),
        })
    }
}

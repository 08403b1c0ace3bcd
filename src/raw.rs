//! Raw payload decoding for MHD headers.

use std::fs;

use rayon::prelude::*;

use crate::enums::{ByteOrder, ElementType};
use crate::error::{Result, StackLoaderError};
use crate::header::MhdHeader;
use crate::volume::{ScalarBuffer, VoxelData};

/// Decodes the raw payload referenced by an MHD header into a voxel array.
///
/// The header must declare `dimsize`, `elementdatafile` and `datatype`;
/// `byteorder` and `headersize` are honored when present. The payload is a
/// flat element sequence in the header's declared (X, Y, Z) order and comes
/// back reshaped to `(z, y, x)`.
///
/// # Errors
///
/// Returns an error when a required field is missing, the data type is
/// unsupported, the raw file carries an embedded header, or the payload
/// length does not match the declared dimensions.
pub fn decode_raw(header: &MhdHeader) -> Result<VoxelData> {
    let dims = dim_size(header)?;

    let Some(data_file) = header.text("elementdatafile") else {
        return Err(StackLoaderError::MissingField("elementdatafile"));
    };

    if let Some(header_size) = header.scalar("headersize") {
        if header_size > 0.0 {
            return Err(StackLoaderError::HeaderedRawFile(header_size));
        }
    }

    let order = byte_order(header);
    let element = element_type(header)?;

    // The file name is opened exactly as written in the header; it is not
    // resolved against the header file's own directory.
    let payload = fs::read(data_file)?;

    let expected = dims[0]
        .checked_mul(dims[1])
        .and_then(|n| n.checked_mul(dims[2]))
        .and_then(|n| n.checked_mul(element.byte_width()))
        .ok_or(StackLoaderError::MissingField("dimsize"))?;
    if payload.len() != expected {
        return Err(StackLoaderError::PayloadSizeMismatch {
            expected,
            actual: payload.len(),
        });
    }

    let scalars = unpack_scalars(element, &payload, order);
    scalars.into_volume((dims[2], dims[1], dims[0]))
}

fn dim_size(header: &MhdHeader) -> Result<[usize; 3]> {
    let Some(dims) = header.list("dimsize") else {
        return Err(StackLoaderError::MissingField("dimsize"));
    };
    if dims.len() != 3 || dims.iter().any(|&d| d.fract() != 0.0) {
        return Err(StackLoaderError::MissingField("dimsize"));
    }
    Ok([dims[0] as usize, dims[1] as usize, dims[2] as usize])
}

/// Big-endian only when the header value reads `"true"`, in any casing.
fn byte_order(header: &MhdHeader) -> ByteOrder {
    match header.text("byteorder") {
        Some(value) if value.eq_ignore_ascii_case("true") => ByteOrder::Big,
        _ => ByteOrder::Little,
    }
}

fn element_type(header: &MhdHeader) -> Result<ElementType> {
    let tag = header.text("datatype").unwrap_or_default();
    ElementType::from_tag(tag).ok_or_else(|| StackLoaderError::UnsupportedDataType(tag.to_string()))
}

/// Unpacks the payload bytes into a typed flat buffer, honoring the
/// declared byte order.
fn unpack_scalars(element: ElementType, bytes: &[u8], order: ByteOrder) -> ScalarBuffer {
    use ByteOrder::{Big, Little};

    match element {
        ElementType::Char => ScalarBuffer::I8(bytemuck::cast_slice(bytes).to_vec()),
        ElementType::UChar => ScalarBuffer::U8(bytes.to_vec()),
        ElementType::Short => ScalarBuffer::I16(match order {
            Little => unpack(bytes, i16::from_le_bytes),
            Big => unpack(bytes, i16::from_be_bytes),
        }),
        ElementType::UShort => ScalarBuffer::U16(match order {
            Little => unpack(bytes, u16::from_le_bytes),
            Big => unpack(bytes, u16::from_be_bytes),
        }),
        ElementType::Int | ElementType::Long => ScalarBuffer::I32(match order {
            Little => unpack(bytes, i32::from_le_bytes),
            Big => unpack(bytes, i32::from_be_bytes),
        }),
        ElementType::UInt | ElementType::ULong => ScalarBuffer::U32(match order {
            Little => unpack(bytes, u32::from_le_bytes),
            Big => unpack(bytes, u32::from_be_bytes),
        }),
        ElementType::Float => ScalarBuffer::F32(match order {
            Little => unpack(bytes, f32::from_le_bytes),
            Big => unpack(bytes, f32::from_be_bytes),
        }),
        ElementType::Double => ScalarBuffer::F64(match order {
            Little => unpack(bytes, f64::from_le_bytes),
            Big => unpack(bytes, f64::from_be_bytes),
        }),
    }
}

/// Converts fixed-width chunks in parallel.
///
/// # Panics
/// The `try_into` is infallible: `par_chunks_exact` guarantees every chunk
/// is exactly `WIDTH` bytes.
fn unpack<T: Send, const WIDTH: usize>(bytes: &[u8], convert: fn([u8; WIDTH]) -> T) -> Vec<T> {
    bytes
        .par_chunks_exact(WIDTH)
        .map(|chunk| convert(chunk.try_into().unwrap()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Writes a raw payload plus a header referring to it by absolute path
    /// and returns the header path.
    fn write_stack(dir: &Path, header_body: &str, payload: &[u8]) -> PathBuf {
        let raw_path = dir.join("volume.raw");
        fs::write(&raw_path, payload).unwrap();

        let header_path = dir.join("volume.mhd");
        let contents = format!("{header_body}ElementDataFile = {}\n", raw_path.display());
        fs::write(&header_path, contents).unwrap();
        header_path
    }

    fn decode(header_body: &str, payload: &[u8]) -> Result<VoxelData> {
        let dir = TempDir::new().unwrap();
        let path = write_stack(dir.path(), header_body, payload);
        let header = MhdHeader::parse(&path).unwrap();
        decode_raw(&header)
    }

    #[test]
    fn round_trips_a_little_endian_uint_volume() {
        let values: Vec<u32> = (0..24).collect();
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

        let volume = decode("DimSize = 2 3 4\nDataType = uint\n", &payload).unwrap();
        let VoxelData::U32(array) = volume else {
            panic!("expected a u32 volume");
        };

        assert_eq!(array.dim(), (4, 3, 2));
        for z in 0..4 {
            for y in 0..3 {
                for x in 0..2 {
                    assert_eq!(array[[z, y, x]], (z * 6 + y * 2 + x) as u32);
                }
            }
        }
    }

    #[test]
    fn byte_order_declaration_selects_the_decode_order() {
        let values: Vec<u16> = (1..=6).collect();
        let le: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let be: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();

        let from_le = decode("DimSize = 3 2 1\nDataType = ushort\nByteOrder = False\n", &le).unwrap();
        let from_be = decode("DimSize = 3 2 1\nDataType = ushort\nByteOrder = True\n", &be).unwrap();
        assert_eq!(from_le, from_be);

        // Declaring the wrong order decodes different values.
        let mismatched = decode("DimSize = 3 2 1\nDataType = ushort\n", &be).unwrap();
        assert_ne!(from_le, mismatched);
    }

    #[test]
    fn byte_order_defaults_to_little_endian() {
        let payload = 0x0102u16.to_le_bytes();
        let volume = decode("DimSize = 1 1 1\nDataType = ushort\n", &payload).unwrap();
        assert_eq!(
            volume,
            VoxelData::U16(ndarray::Array3::from_elem((1, 1, 1), 0x0102))
        );
    }

    #[test]
    fn decodes_double_elements() {
        let values = [0.5f64, 1.5, 2.5, 3.5];
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

        let volume = decode("DimSize = 2 2 1\nDataType = double\n", &payload).unwrap();
        let VoxelData::F64(array) = volume else {
            panic!("expected an f64 volume");
        };
        assert_eq!(array.dim(), (1, 2, 2));
        assert_eq!(array[[0, 1, 0]], 2.5);
    }

    #[test]
    fn long_elements_decode_as_four_byte_ints() {
        let payload: Vec<u8> = [7i32, -7].iter().flat_map(|v| v.to_le_bytes()).collect();

        let volume = decode("DimSize = 2 1 1\nDataType = long\n", &payload).unwrap();
        let VoxelData::I32(array) = volume else {
            panic!("expected an i32 volume");
        };
        assert_eq!(array[[0, 0, 0]], 7);
        assert_eq!(array[[0, 0, 1]], -7);
    }

    #[test]
    fn truncated_payload_is_a_size_mismatch() {
        let result = decode("DimSize = 2 3 4\nDataType = uchar\n", &[0u8; 10]);
        assert!(matches!(
            result,
            Err(StackLoaderError::PayloadSizeMismatch {
                expected: 24,
                actual: 10,
            })
        ));
    }

    #[test]
    fn embedded_header_is_refused() {
        let result = decode(
            "DimSize = 2 3 4\nDataType = uchar\nHeaderSize = 100\n",
            &[0u8; 24],
        );
        assert!(matches!(result, Err(StackLoaderError::HeaderedRawFile(_))));
    }

    #[test]
    fn zero_header_size_is_accepted() {
        let result = decode(
            "DimSize = 2 3 4\nDataType = uchar\nHeaderSize = 0\n",
            &[0u8; 24],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn unsupported_data_type_is_reported() {
        let result = decode("DimSize = 2 3 4\nDataType = complex\n", &[0u8; 24]);
        let Err(StackLoaderError::UnsupportedDataType(tag)) = result else {
            panic!("expected an unsupported data type error");
        };
        assert_eq!(tag, "complex");
    }

    #[test]
    fn missing_data_type_is_reported() {
        let result = decode("DimSize = 2 3 4\n", &[0u8; 24]);
        assert!(matches!(
            result,
            Err(StackLoaderError::UnsupportedDataType(_))
        ));
    }

    #[test]
    fn missing_dimsize_is_reported() {
        let result = decode("DataType = uchar\n", &[0u8; 24]);
        assert!(matches!(
            result,
            Err(StackLoaderError::MissingField("dimsize"))
        ));
    }

    #[test]
    fn missing_element_data_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("volume.mhd");
        fs::write(&path, "DimSize = 2 3 4\nDataType = uchar\n").unwrap();

        let header = MhdHeader::parse(&path).unwrap();
        assert!(matches!(
            decode_raw(&header),
            Err(StackLoaderError::MissingField("elementdatafile"))
        ));
    }
}

//! Format detection and stack loading.

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult, Limits};

use crate::backend::MetaImageBackend;
use crate::config::LoaderConfig;
use crate::error::{Result, StackLoaderError};
use crate::header::MhdHeader;
use crate::raw;
use crate::spacing;
use crate::volume::{ScalarBuffer, VoxelData};

/// File-type filter string for callers building file-open dialogs.
pub fn image_filter() -> &'static str {
    "Images (*.mhd *.mha *.tiff *.tif)"
}

/// Loads volumetric image stacks, dispatching on file extension.
///
/// TIFF stacks are read page by page with the built-in decoder. MHD volumes
/// go through the accelerated backend when one is registered, falling back
/// to the header/raw reader otherwise.
pub struct StackLoader {
    config: LoaderConfig,
    backend: Option<Box<dyn MetaImageBackend>>,
}

impl StackLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            backend: None,
        }
    }

    /// Registers an accelerated MetaImage backend.
    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn MetaImageBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Loads the stack at `path`, choosing the reader from the file
    /// extension (case-insensitive): `.tif`/`.tiff` or `.mhd`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown extensions or when the chosen reader
    /// fails.
    pub fn load_stack(&self, path: impl AsRef<Path>) -> Result<VoxelData> {
        let path = path.as_ref();
        match extension(path).as_str() {
            "tif" | "tiff" => Self::load_tiff_stack(path),
            "mhd" => self.load_mhd(path, false),
            _ => Err(StackLoaderError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// Loads an MHD volume.
    ///
    /// Uses the accelerated backend when one is registered, unless
    /// `force_fallback` demands the built-in reader. A backend reporting
    /// itself unavailable also falls back; backend absence is never fatal.
    ///
    /// # Errors
    ///
    /// Returns an error when the header or its raw payload cannot be
    /// decoded.
    pub fn load_mhd(&self, path: impl AsRef<Path>, force_fallback: bool) -> Result<VoxelData> {
        let path = path.as_ref();

        if !force_fallback {
            if let Some(backend) = self.backend.as_deref() {
                match Self::load_mhd_accelerated(backend, path) {
                    Err(StackLoaderError::BackendUnavailable) => {
                        log::warn!(
                            "accelerated backend unavailable, falling back to built-in MHD reader"
                        );
                    }
                    result => return result,
                }
            } else {
                log::debug!("no accelerated backend registered, using built-in MHD reader");
            }
        }

        self.load_mhd_fallback(path)
    }

    /// Resolves the per-axis display ratios for the stack at `path`.
    ///
    /// Only MHD files carry spacing metadata, and only the accelerated
    /// backend exposes it; every other case resolves to the configured
    /// default ratios. Never fails.
    pub fn voxel_spacing(&self, path: impl AsRef<Path>, force_fallback: bool) -> [f64; 3] {
        let path = path.as_ref();
        let defaults = self.config.default_axis_ratios;

        if extension(path) != "mhd" || force_fallback {
            return defaults;
        }
        let Some(backend) = self.backend.as_deref() else {
            log::debug!("no accelerated backend registered, using default axis ratios");
            return defaults;
        };
        let spacing = match backend.spacing(path) {
            Ok(spacing) => spacing,
            Err(err) => {
                log::warn!("failed to read voxel spacing: {err}, using default axis ratios");
                return defaults;
            }
        };

        spacing::ratios_from_spacing(&spacing).unwrap_or(defaults)
    }

    fn load_mhd_accelerated(backend: &dyn MetaImageBackend, path: &Path) -> Result<VoxelData> {
        let (rows, cols, layers) = backend.dimensions(path)?;
        let scalars = backend.read_scalars(path)?;
        log::info!("backend read MHD image of size rows: {rows}, cols: {cols}, layers: {layers}");

        // The backend reports (rows, cols, layers); the flat buffer is
        // reinterpreted as (layers, cols, rows) so both MHD strategies
        // produce the same (z, y, x) volume.
        scalars.into_volume((layers, cols, rows))
    }

    fn load_mhd_fallback(&self, path: &Path) -> Result<VoxelData> {
        let header = MhdHeader::parse(path)?;
        if header.is_empty() {
            return Err(StackLoaderError::EmptyHeader(path.to_path_buf()));
        }
        raw::decode_raw(&header)
    }

    /// Reads a multi-page TIFF container as a `(layers, rows, cols)` stack.
    ///
    /// Every page must share the dimensions and sample type of the first.
    fn load_tiff_stack(path: &Path) -> Result<VoxelData> {
        let file = File::open(path)?;
        let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());

        let (cols, rows) = decoder.dimensions()?;
        let mut stack = page_scalars(decoder.read_image()?)?;
        let mut layers = 1usize;

        while decoder.more_images() {
            decoder.next_image()?;
            if decoder.dimensions()? != (cols, rows) {
                return Err(StackLoaderError::InconsistentPages);
            }
            stack = append_page(stack, page_scalars(decoder.read_image()?)?)?;
            layers += 1;
        }

        log::info!("read TIFF image of size rows: {rows}, cols: {cols}, layers: {layers}");
        stack.into_volume((layers, rows as usize, cols as usize))
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

fn page_scalars(page: DecodingResult) -> Result<ScalarBuffer> {
    Ok(match page {
        DecodingResult::I8(v) => ScalarBuffer::I8(v),
        DecodingResult::U8(v) => ScalarBuffer::U8(v),
        DecodingResult::I16(v) => ScalarBuffer::I16(v),
        DecodingResult::U16(v) => ScalarBuffer::U16(v),
        DecodingResult::I32(v) => ScalarBuffer::I32(v),
        DecodingResult::U32(v) => ScalarBuffer::U32(v),
        DecodingResult::I64(v) => ScalarBuffer::I64(v),
        DecodingResult::U64(v) => ScalarBuffer::U64(v),
        DecodingResult::F32(v) => ScalarBuffer::F32(v),
        DecodingResult::F64(v) => ScalarBuffer::F64(v),
        _ => {
            return Err(StackLoaderError::UnsupportedDataType(
                "unsupported TIFF sample format".into(),
            ));
        }
    })
}

fn append_page(mut stack: ScalarBuffer, page: ScalarBuffer) -> Result<ScalarBuffer> {
    use ScalarBuffer::*;

    match (&mut stack, page) {
        (I8(stack), I8(page)) => stack.extend_from_slice(&page),
        (U8(stack), U8(page)) => stack.extend_from_slice(&page),
        (I16(stack), I16(page)) => stack.extend_from_slice(&page),
        (U16(stack), U16(page)) => stack.extend_from_slice(&page),
        (I32(stack), I32(page)) => stack.extend_from_slice(&page),
        (U32(stack), U32(page)) => stack.extend_from_slice(&page),
        (I64(stack), I64(page)) => stack.extend_from_slice(&page),
        (U64(stack), U64(page)) => stack.extend_from_slice(&page),
        (F32(stack), F32(page)) => stack.extend_from_slice(&page),
        (F64(stack), F64(page)) => stack.extend_from_slice(&page),
        _ => return Err(StackLoaderError::InconsistentPages),
    }
    Ok(stack)
}

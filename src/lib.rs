//! # stack-volume library
//!
//! This crate loads volumetric microscopy image stacks into dense 3-D
//! arrays for slice viewers.
//!
//! Two container formats are supported, chosen by file extension:
//!  - MHD: a plain-text `key = value` header next to a raw binary payload
//!  - TIFF: a multi-page container, one page per layer
//!
//! Whatever the source, the loaded volume comes back in `(z, y, x)` axis
//! order, ready to be sliced along the three medical axes. MHD volumes can
//! additionally be read through an optional accelerated backend
//! ([`MetaImageBackend`]); the built-in header/raw reader takes over
//! whenever no backend is registered, so the accelerated path is never
//! required. Voxel spacing metadata, where available, resolves into the
//! per-axis display ratios a viewer needs to keep anatomy proportional.
//!
//! All failures are reported through [`StackLoaderError`]; partial problems
//! such as a malformed header line are logged via the `log` facade and do
//! not abort a load.
//!
//! # Examples
//!
//! ## Reading an MHD volume and its axis ratios
//!
//! ```no_run
//! # use stack_volume::{LoaderConfig, StackLoader};
//! let loader = StackLoader::new(LoaderConfig::default());
//! let volume = loader
//!     .load_stack("brain.mhd")
//!     .expect("should have loaded the image stack");
//! let ratios = loader.voxel_spacing("brain.mhd", false);
//! let (layers, rows, cols) = volume.dim();
//! println!("{layers} x {rows} x {cols}, axis ratios {ratios:?}");
//! ```

pub mod backend;
pub mod config;
pub mod enums;
pub mod error;
pub mod header;
pub mod raw;
mod spacing;
pub mod stack_loader;
pub mod volume;

pub use backend::MetaImageBackend;
pub use config::LoaderConfig;
pub use enums::{ByteOrder, ElementType};
pub use error::{Result, StackLoaderError};
pub use header::{HeaderValue, MhdHeader};
pub use stack_loader::{StackLoader, image_filter};
pub use volume::{ScalarBuffer, VoxelData};

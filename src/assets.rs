use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

/// A decoded-enough user image: raw bytes plus pixel size.
#[derive(Debug)]
pub struct Asset {
    pub source: PathBuf,
    pub data: Arc<Vec<u8>>,
    pub format: ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Holds user-supplied binaries between acquire and release.
#[derive(Debug, Default)]
pub struct AssetStore {
    assets: HashMap<AssetId, Asset>,
    next_id: u64,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, path: &Path) -> Result<AssetId, Error> {
        let data = std::fs::read(path).map_err(|e| {
            Error::Asset(format!("{}: {e}", path.display()))
        })?;
        self.acquire_bytes(path.to_path_buf(), data)
    }

    /// Registers in-memory image bytes. `source` is only used for diagnostics.
    pub fn acquire_bytes(&mut self, source: PathBuf, data: Vec<u8>) -> Result<AssetId, Error> {
        let format = match image::guess_format(&data) {
            Ok(image::ImageFormat::Png) => ImageFormat::Png,
            Ok(image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
            Ok(other) => {
                return Err(Error::Asset(format!(
                    "{}: unsupported image format {other:?}",
                    source.display()
                )));
            }
            Err(e) => return Err(Error::Asset(format!("{}: {e}", source.display()))),
        };
        let reader = image::ImageReader::with_format(
            std::io::Cursor::new(data.as_slice()),
            match format {
                ImageFormat::Png => image::ImageFormat::Png,
                ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            },
        );
        let (pixel_width, pixel_height) = reader
            .into_dimensions()
            .map_err(|e| Error::Asset(format!("{}: {e}", source.display())))?;

        self.next_id += 1;
        let id = AssetId(self.next_id);
        log::debug!(
            "Acquired {id}: {} ({format:?} {pixel_width}x{pixel_height})",
            source.display()
        );
        self.assets.insert(
            id,
            Asset {
                source,
                data: Arc::new(data),
                format,
                pixel_width,
                pixel_height,
            },
        );
        Ok(id)
    }

    pub fn release(&mut self, id: AssetId) -> Result<(), Error> {
        match self.assets.remove(&id) {
            Some(asset) => {
                log::debug!("Released {id}: {}", asset.source.display());
                Ok(())
            }
            None => Err(Error::Asset(format!("{id} is not held"))),
        }
    }

    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Drop for AssetStore {
    fn drop(&mut self) {
        if !self.assets.is_empty() {
            log::debug!("Releasing {} assets on teardown", self.assets.len());
            self.assets.clear();
        }
    }
}

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbaImage;

/// Stable identity of a placed piece, handed out by the store on insert.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u32);

impl PieceId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Unscaled source bitmap of a piece.
///
/// Cloning shares the pixels; many pieces usually point at a handful of assets.
#[derive(Debug, Clone)]
pub struct PieceAsset(Arc<RgbaImage>);

impl PieceAsset {
    pub fn from_image(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Decodes an encoded image (PNG) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("failed to decode piece asset")?;
        Ok(Self::from_image(image.to_rgba8()))
    }

    /// Loads an encoded image from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to open piece asset {}", path.display()))?;
        Ok(Self::from_image(image.to_rgba8()))
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    /// True when both handles share the same pixels.
    #[inline]
    pub fn ptr_eq(&self, other: &PieceAsset) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A piece placed on the board.
///
/// `row`/`col` are stored as given; the renderer clamps them into the board
/// when drawing, so game logic may park a piece off-board without breaking a frame.
#[derive(Debug, Clone)]
pub struct GamePiece {
    pub(crate) id: PieceId,
    pub(crate) row: i32,
    pub(crate) col: i32,
    pub(crate) asset: PieceAsset,
}

impl GamePiece {
    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[inline]
    pub fn col(&self) -> i32 {
        self.col
    }

    #[inline]
    pub fn asset(&self) -> &PieceAsset {
        &self.asset
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba};

    use super::*;

    #[test]
    fn decode_reads_png_bytes() {
        let src = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        src.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();

        let asset = PieceAsset::decode(&bytes).unwrap();
        assert_eq!(asset.image().dimensions(), (3, 2));
        assert_eq!(*asset.image().get_pixel(2, 1), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn decode_rejects_garbage_with_context() {
        let err = PieceAsset::decode(b"not an image").unwrap_err();
        assert!(format!("{err:#}").contains("failed to decode piece asset"));
    }

    #[test]
    fn open_missing_file_names_the_path() {
        let err = PieceAsset::open("/definitely/missing/king.png").unwrap_err();
        assert!(format!("{err:#}").contains("king.png"));
    }

    #[test]
    fn clones_share_pixels() {
        let a = PieceAsset::from_image(RgbaImage::new(1, 1));
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&PieceAsset::from_image(RgbaImage::new(1, 1))));
    }
}

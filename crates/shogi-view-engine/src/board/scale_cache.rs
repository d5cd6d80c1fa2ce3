use image::RgbaImage;
use image::imageops::{self, FilterType};

use super::store::PieceList;

/// Piece bitmaps resized to the current cell size.
///
/// Entry `i` belongs to piece `i` of the [`PieceList`] it was built from. The
/// cache remembers the side length, piece count and asset epoch of that build;
/// if any of them differs from the current frame, every entry is rebuilt.
/// Otherwise [`ensure_fresh`](ScaleCache::ensure_fresh) costs three comparisons.
#[derive(Debug, Default)]
pub struct ScaleCache {
    entries: Vec<RgbaImage>,
    side: Option<u32>,
    epoch: u64,
    rebuilds: u64,
}

impl ScaleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the cache can be paired with `pieces` at `side × side` as is.
    pub fn is_fresh(&self, side: u32, pieces: &PieceList) -> bool {
        self.side == Some(side)
            && self.epoch == pieces.asset_epoch()
            && self.entries.len() == pieces.len()
    }

    /// Rebuilds the cache if it is stale. Returns `true` when it rebuilt.
    ///
    /// The caller must hold the store lock across this call and the paired
    /// iteration that follows.
    pub fn ensure_fresh(&mut self, side: u32, pieces: &PieceList) -> bool {
        if self.is_fresh(side, pieces) {
            return false;
        }

        log::debug!("rebuilding scale cache: {} pieces at {side}x{side}", pieces.len());

        self.entries.clear();
        self.entries.extend(pieces.iter().map(|p| scale_to_cell(p.asset().image(), side)));
        self.side = Some(side);
        self.epoch = pieces.asset_epoch();
        self.rebuilds += 1;
        true
    }

    /// Entries in piece order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &RgbaImage> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Side length of the current entries, `None` before the first build.
    #[inline]
    pub fn side(&self) -> Option<u32> {
        self.side
    }

    /// Number of full rebuilds performed so far.
    #[inline]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

/// Stretches `source` to exactly `side × side`; aspect ratio is not kept.
fn scale_to_cell(source: &RgbaImage, side: u32) -> RgbaImage {
    let (w, h) = source.dimensions();
    if side == 0 || w == 0 || h == 0 {
        // Degenerate cell or asset: keep the index slot, draw nothing visible.
        return RgbaImage::new(side, side);
    }
    imageops::resize(source, side, side, FilterType::Triangle)
}

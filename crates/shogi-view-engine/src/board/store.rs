use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::piece::{GamePiece, PieceAsset, PieceId};

/// Ordered piece list guarded by the [`PieceStore`] lock.
///
/// Order is paint order (later pieces draw on top) and is what the scale
/// cache pairs with index-for-index.
#[derive(Debug, Default)]
pub struct PieceList {
    pieces: Vec<GamePiece>,
    next_id: u32,
    /// Advances whenever index pairing with cached bitmaps may break:
    /// insert, remove, asset swap, clear. Moves do not touch it.
    asset_epoch: u64,
}

impl PieceList {
    /// Appends a piece on top of the paint order.
    pub fn insert(&mut self, row: i32, col: i32, asset: PieceAsset) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pieces.push(GamePiece { id, row, col, asset });
        self.bump_epoch();
        id
    }

    /// Moves a piece. Returns `false` for an unknown id.
    pub fn move_piece(&mut self, id: PieceId, row: i32, col: i32) -> bool {
        match self.find_mut(id) {
            Some(p) => {
                p.row = row;
                p.col = col;
                true
            }
            None => false,
        }
    }

    /// Replaces a piece's bitmap (e.g. promotion). Returns `false` for an unknown id.
    pub fn set_asset(&mut self, id: PieceId, asset: PieceAsset) -> bool {
        let Some(p) = self.find_mut(id) else {
            return false;
        };
        p.asset = asset;
        self.bump_epoch();
        true
    }

    /// Removes a piece, keeping the relative order of the others.
    pub fn remove(&mut self, id: PieceId) -> Option<GamePiece> {
        let idx = self.pieces.iter().position(|p| p.id == id)?;
        let piece = self.pieces.remove(idx);
        self.bump_epoch();
        Some(piece)
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
        self.bump_epoch();
    }

    pub fn get(&self, id: PieceId) -> Option<&GamePiece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Pieces in paint order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &GamePiece> {
        self.pieces.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[inline]
    pub fn asset_epoch(&self) -> u64 {
        self.asset_epoch
    }

    fn find_mut(&mut self, id: PieceId) -> Option<&mut GamePiece> {
        self.pieces.iter_mut().find(|p| p.id == id)
    }

    fn bump_epoch(&mut self) {
        self.asset_epoch = self.asset_epoch.wrapping_add(1);
    }
}

/// Shared handle to the piece list.
///
/// Every mutation and every render traversal goes through the same lock, so a
/// frame always sees the list as it was at one instant. Clones share the list.
#[derive(Debug, Clone, Default)]
pub struct PieceStore {
    list: Arc<Mutex<PieceList>>,
}

impl PieceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the list for batch mutation or iteration.
    ///
    /// Keep the guard short-lived: the render thread takes it for every frame.
    pub fn lock(&self) -> MutexGuard<'_, PieceList> {
        self.list.lock()
    }

    pub fn insert(&self, row: i32, col: i32, asset: PieceAsset) -> PieceId {
        self.lock().insert(row, col, asset)
    }

    pub fn move_piece(&self, id: PieceId, row: i32, col: i32) -> bool {
        self.lock().move_piece(id, row, col)
    }

    pub fn set_asset(&self, id: PieceId, asset: PieceAsset) -> bool {
        self.lock().set_asset(id, asset)
    }

    pub fn remove(&self, id: PieceId) -> Option<GamePiece> {
        self.lock().remove(id)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of the piece with `id`, if present.
    pub fn get(&self, id: PieceId) -> Option<GamePiece> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

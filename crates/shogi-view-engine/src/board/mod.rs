//! Board model and frame production.
//!
//! - [`store`]: the shared, lock-guarded piece list mutated by game logic
//! - [`layout`]: surface size → cell metrics
//! - [`scale_cache`]: per-piece bitmaps resized to the current cell
//! - [`frame`]: draws one complete frame from the above

pub mod frame;
pub mod layout;
pub mod piece;
pub mod scale_cache;
pub mod store;

pub use frame::FrameRenderer;
pub use layout::{BOARD_SIZE, GridLayout, TRAY_COLUMNS};
pub use piece::{GamePiece, PieceAsset, PieceId};
pub use scale_cache::ScaleCache;
pub use store::{PieceList, PieceStore};

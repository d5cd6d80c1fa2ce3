//! Procedural piece bitmaps and the standard opening setup.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};
use shogi_view_engine::board::{BOARD_SIZE, PieceAsset, PieceId, PieceStore};

const SIDE_PX: u32 = 64;

const WOOD: Rgba<u8> = Rgba([236, 196, 122, 255]);
const INK: Rgba<u8> = Rgba([30, 20, 10, 255]);
const KING_INK: Rgba<u8> = Rgba([170, 20, 20, 255]);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    /// Moves up the board; bottom three rows at the start.
    Sente,
    /// Moves down the board; drawn upside down.
    Gote,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    King,
    Rook,
    Bishop,
    Gold,
    Silver,
    Knight,
    Lance,
    Pawn,
}

impl Kind {
    /// Number of ink marks on the face; stands in for the kanji.
    fn marks(self) -> u32 {
        match self {
            Kind::Pawn => 1,
            Kind::Lance => 2,
            Kind::Knight => 3,
            Kind::Silver => 4,
            Kind::Gold => 5,
            Kind::Bishop => 6,
            Kind::Rook => 7,
            Kind::King => 8,
        }
    }
}

/// A pawn placed by [`seed_opening`], for the game logic to push around.
#[derive(Debug, Copy, Clone)]
pub struct Pawn {
    pub side: Side,
    pub id: PieceId,
    pub col: i32,
}

const BACK_RANK: [Kind; BOARD_SIZE as usize] = [
    Kind::Lance,
    Kind::Knight,
    Kind::Silver,
    Kind::Gold,
    Kind::King,
    Kind::Gold,
    Kind::Silver,
    Kind::Knight,
    Kind::Lance,
];

/// Places the 40 pieces of the opening position and returns the pawns.
pub fn seed_opening(store: &PieceStore) -> Vec<Pawn> {
    let mut assets = HashMap::new();
    let mut asset = |kind: Kind, side: Side| {
        assets
            .entry((kind, side))
            .or_insert_with(|| PieceAsset::from_image(piece_bitmap(kind, side)))
            .clone()
    };

    let mut pawns = Vec::with_capacity(2 * BOARD_SIZE as usize);
    for (side, back, minor, pawn_row) in [(Side::Gote, 0, 1, 2), (Side::Sente, 8, 7, 6)] {
        for (col, kind) in BACK_RANK.iter().enumerate() {
            store.insert(back, col as i32, asset(*kind, side));
        }

        // Rook on the player's right, bishop on the left.
        let (rook_col, bishop_col) = match side {
            Side::Sente => (7, 1),
            Side::Gote => (1, 7),
        };
        store.insert(minor, rook_col, asset(Kind::Rook, side));
        store.insert(minor, bishop_col, asset(Kind::Bishop, side));

        for col in 0..BOARD_SIZE as i32 {
            let id = store.insert(pawn_row, col, asset(Kind::Pawn, side));
            pawns.push(Pawn { side, id, col });
        }
    }
    pawns
}

/// Draws a pentagon piece pointing toward the opponent with `kind.marks()` ticks.
pub fn piece_bitmap(kind: Kind, side: Side) -> RgbaImage {
    let mut img = RgbaImage::new(SIDE_PX, SIDE_PX);
    let s = SIDE_PX as f32;
    let (tip, shoulder, base) = (0.06 * s, 0.28 * s, 0.96 * s);
    let (shoulder_half, base_half) = (0.38 * s, 0.44 * s);
    let centre = s / 2.0;

    for y in 0..SIDE_PX {
        // Gote pieces face down the board.
        let fy = match side {
            Side::Sente => y as f32 + 0.5,
            Side::Gote => s - (y as f32 + 0.5),
        };
        let half = if fy < tip || fy > base {
            continue;
        } else if fy < shoulder {
            shoulder_half * (fy - tip) / (shoulder - tip)
        } else {
            shoulder_half + (base_half - shoulder_half) * (fy - shoulder) / (base - shoulder)
        };
        for x in 0..SIDE_PX {
            if (x as f32 + 0.5 - centre).abs() <= half {
                img.put_pixel(x, y, WOOD);
            }
        }
    }

    let ink = if kind == Kind::King { KING_INK } else { INK };
    let marks = kind.marks();
    let pitch = (base - shoulder) / (marks as f32 + 1.0);
    for m in 1..=marks {
        let fy = shoulder + pitch * m as f32;
        let y = match side {
            Side::Sente => fy,
            Side::Gote => s - fy,
        } as u32;
        for x in (0.35 * s) as u32..(0.65 * s) as u32 {
            img.put_pixel(x, y.min(SIDE_PX - 1), ink);
        }
    }
    img
}

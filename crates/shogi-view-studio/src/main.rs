mod pieces;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use shogi_view_engine::board::{FrameRenderer, PieceStore};
use shogi_view_engine::config::RenderConfig;
use shogi_view_engine::device::MemorySurface;
use shogi_view_engine::logging::{LoggingConfig, init_logging};
use shogi_view_engine::scheduler::RenderScheduler;

use pieces::{Side, seed_opening};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("board.png"));

    let surface = MemorySurface::new(1100, 900);
    let store = PieceStore::new();
    let pawns = seed_opening(&store);
    log::info!("seeded {} pieces", store.len());

    let scheduler = Arc::new(RenderScheduler::new(
        surface.clone(),
        FrameRenderer::new(store.clone(), RenderConfig::default()),
    ));
    scheduler.start()?;
    scheduler.request_redraw();

    // ── game logic ────────────────────────────────────────────────────────
    // Every other pawn advances one square; each move requests a redraw.
    let game = {
        let store = store.clone();
        let scheduler = Arc::clone(&scheduler);
        thread::Builder::new()
            .name("game-logic".to_string())
            .spawn(move || {
                for pawn in pawns.into_iter().filter(|p| p.col % 2 == 0) {
                    let row = match pawn.side {
                        Side::Sente => 5,
                        Side::Gote => 3,
                    };
                    store.move_piece(pawn.id, row, pawn.col);
                    log::debug!("{:?} pawn on column {} advanced to row {row}", pawn.side, pawn.col);
                    scheduler.request_redraw();
                    thread::sleep(Duration::from_millis(10));
                }
            })
            .context("failed to spawn game-logic thread")?
    };
    if game.join().is_err() {
        bail!("game-logic thread panicked");
    }

    // ── resize ────────────────────────────────────────────────────────────
    let before = scheduler.frames_presented();
    surface.resize(880, 720);
    scheduler.request_redraw();
    wait_for_frame(&scheduler, before)?;
    log::info!(
        "resized to 880x720: cell {}x{}",
        scheduler.cell_width(),
        scheduler.cell_height()
    );

    scheduler.stop();
    scheduler.join();

    let frame = surface.last_frame().context("no frame was presented")?;
    frame
        .as_image()
        .save(&out)
        .with_context(|| format!("failed to write {}", out.display()))?;

    log::info!(
        "{} frames presented, {} skipped; wrote {}",
        scheduler.frames_presented(),
        scheduler.frames_skipped(),
        out.display()
    );
    Ok(())
}

fn wait_for_frame(scheduler: &RenderScheduler<MemorySurface>, after: u64) -> Result<()> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while scheduler.frames_presented() <= after {
        if Instant::now() >= deadline {
            bail!("timed out waiting for a frame");
        }
        thread::sleep(Duration::from_millis(1));
    }
    Ok(())
}

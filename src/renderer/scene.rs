//! Frame scene assembly
//!
//! Walks the game state once per frame and emits the full vertex list in
//! world pixels, back to front. Only geometry near the camera is emitted.

use super::shapes::{push_rect, push_tri};
use super::vertex::{colors, Vertex};
use crate::consts::*;
use crate::sim::state::{BlockKind, DecoKind, GameState, PowerupKind, SizeTier, TileKind, World};

/// Horizontal slack around the viewport before geometry is culled
const CULL_MARGIN: f32 = 2.0 * TILE;

fn visible(camera_x: f32, x: f32, w: f32) -> bool {
    x + w > camera_x - CULL_MARGIN && x < camera_x + VIEW_WIDTH + CULL_MARGIN
}

/// Build the vertex list for one frame
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(2048);
    match &state.world {
        Some(world) => emit_world(&mut out, state, world),
        None => emit_backdrop(&mut out),
    }
    out
}

/// Static backdrop behind the title screen
fn emit_backdrop(out: &mut Vec<Vertex>) {
    for wx in [120.0, 420.0, 660.0] {
        emit_cloud(out, wx);
    }
    emit_hill(out, 300.0);
    let ground_y = GROUND_ROW as f32 * TILE;
    push_rect(out, 0.0, ground_y, VIEW_WIDTH, 6.0, colors::GROUND_TOP);
    push_rect(
        out,
        0.0,
        ground_y + 6.0,
        VIEW_WIDTH,
        VIEW_HEIGHT - ground_y - 6.0,
        colors::GROUND_SOIL,
    );
}

fn emit_world(out: &mut Vec<Vertex>, state: &GameState, world: &World) {
    let cam = state.camera_x;

    for deco in &world.decos {
        if !visible(cam, deco.wx - 60.0, 160.0) {
            continue;
        }
        match deco.kind {
            DecoKind::Cloud => emit_cloud(out, deco.wx),
            DecoKind::Hill => emit_hill(out, deco.wx),
        }
    }

    for tile in &world.tiles {
        let x = tile.tx as f32 * TILE;
        if !visible(cam, x, TILE) {
            continue;
        }
        let y = tile.ty as f32 * TILE;
        match tile.kind {
            TileKind::Top => {
                push_rect(out, x, y, TILE, 6.0, colors::GROUND_TOP);
                push_rect(out, x, y + 6.0, TILE, TILE - 6.0, colors::GROUND_SOIL);
            }
            TileKind::Body => push_rect(out, x, y, TILE, TILE, colors::GROUND_DEEP),
        }
    }

    for pipe in &world.pipes {
        let x = pipe.tx as f32 * TILE;
        if !visible(cam, x, 2.0 * TILE) {
            continue;
        }
        let top = (GROUND_ROW - pipe.height) as f32 * TILE;
        let body_h = pipe.height as f32 * TILE;
        push_rect(out, x + 4.0, top + 10.0, 2.0 * TILE - 8.0, body_h - 10.0, colors::PIPE);
        push_rect(out, x + 4.0, top + 10.0, 8.0, body_h - 10.0, colors::PIPE_SHADE);
        // Lip
        push_rect(out, x, top, 2.0 * TILE, 12.0, colors::PIPE);
        push_rect(out, x, top, 6.0, 12.0, colors::PIPE_SHADE);
    }

    for block in &world.blocks {
        if block.broken {
            continue;
        }
        let x = block.tx as f32 * TILE;
        if !visible(cam, x, TILE) {
            continue;
        }
        let mut y = block.ty as f32 * TILE;
        match block.kind {
            BlockKind::Reward(_) => {
                if block.hit {
                    push_rect(out, x, y, TILE, TILE, colors::DEAD_BOX);
                } else {
                    push_rect(out, x, y, TILE, TILE, colors::REWARD_BOX);
                    push_rect(out, x + 12.0, y + 8.0, 8.0, 16.0, colors::REWARD_DOT);
                }
            }
            BlockKind::Brick => {
                // Bounce while non-reactive
                if block.hit {
                    y -= 3.0;
                }
                push_rect(out, x, y, TILE, TILE, colors::BRICK);
                push_rect(out, x, y + 14.0, TILE, 3.0, colors::BRICK_MORTAR);
                push_rect(out, x + 14.0, y, 3.0, 14.0, colors::BRICK_MORTAR);
            }
        }
    }

    for coin in &world.coins {
        if coin.got || !visible(cam, coin.pos.x, coin.size.x) {
            continue;
        }
        // Spin by squeezing the width
        let w = coin.phase.cos().abs() * 12.0 + 2.0;
        let cx = coin.pos.x + coin.size.x / 2.0;
        push_rect(out, cx - w / 2.0, coin.pos.y, w, coin.size.y, colors::COIN);
        push_rect(
            out,
            cx - w / 2.0,
            coin.pos.y + coin.size.y - 3.0,
            w,
            3.0,
            colors::COIN_EDGE,
        );
    }

    for pu in &world.powerups {
        let b = &pu.body;
        if !visible(cam, b.pos.x, b.size.x) {
            continue;
        }
        match pu.kind {
            PowerupKind::Mushroom => {
                push_rect(out, b.pos.x, b.pos.y, b.size.x, 14.0, colors::MUSHROOM_CAP);
                push_rect(
                    out,
                    b.pos.x + 6.0,
                    b.pos.y + 14.0,
                    b.size.x - 12.0,
                    b.size.y - 14.0,
                    colors::MUSHROOM_STEM,
                );
            }
            PowerupKind::Star => {
                let cx = b.pos.x + b.size.x / 2.0;
                push_tri(
                    out,
                    (cx, b.pos.y),
                    (b.pos.x + b.size.x, b.bottom()),
                    (b.pos.x, b.bottom()),
                    colors::STAR,
                );
            }
        }
    }

    if visible(cam, world.flag_x(), 32.0) {
        emit_flag(out, world);
    }

    for enemy in &world.enemies {
        let b = &enemy.body;
        if !visible(cam, b.pos.x, b.size.x) {
            continue;
        }
        if enemy.squashed {
            push_rect(
                out,
                b.pos.x,
                b.bottom() - 10.0,
                b.size.x,
                10.0,
                colors::ENEMY_BODY,
            );
        } else {
            push_rect(out, b.pos.x, b.pos.y, b.size.x, b.size.y - 6.0, colors::ENEMY_BODY);
            push_rect(out, b.pos.x, b.bottom() - 6.0, b.size.x, 6.0, colors::ENEMY_FEET);
        }
    }

    for p in &world.particles {
        let mut color = p.color;
        color[3] = p.life.clamp(0.0, 1.0);
        push_rect(out, p.pos.x, p.pos.y, p.size, p.size, color);
    }

    emit_player(out, state, world);
}

fn emit_player(out: &mut Vec<Vertex>, state: &GameState, world: &World) {
    let player = &world.player;
    // Blink while invulnerable
    if player.invulnerable() && (state.time_ticks / 4) % 2 == 1 {
        return;
    }
    let b = &player.body;
    let suit = if player.has_star() {
        // Rapid tint cycle while the star is active
        match (state.time_ticks / 3) % 3 {
            0 => colors::STAR,
            1 => colors::PLAYER_OVERALLS,
            _ => colors::PLAYER_SUIT,
        }
    } else {
        colors::PLAYER_SUIT
    };
    let torso = if player.size_tier == SizeTier::Big {
        24.0
    } else {
        16.0
    };
    push_rect(out, b.pos.x, b.pos.y, b.size.x, torso, suit);
    push_rect(
        out,
        b.pos.x,
        b.pos.y + torso,
        b.size.x,
        b.size.y - torso,
        colors::PLAYER_OVERALLS,
    );
}

fn emit_flag(out: &mut Vec<Vertex>, world: &World) {
    let x = world.flag_x();
    let top = (GROUND_ROW - 8) as f32 * TILE;
    let ground = GROUND_ROW as f32 * TILE;
    push_rect(out, x, top, 4.0, ground - top, colors::FLAG_POLE);
    push_tri(
        out,
        (x + 4.0, top),
        (x + 4.0 + 28.0, top + 12.0),
        (x + 4.0, top + 24.0),
        colors::FLAG_CLOTH,
    );
}

fn emit_cloud(out: &mut Vec<Vertex>, wx: f32) {
    push_rect(out, wx - 40.0, 70.0, 80.0, 24.0, colors::CLOUD);
    push_rect(out, wx - 20.0, 56.0, 48.0, 20.0, colors::CLOUD);
}

fn emit_hill(out: &mut Vec<Vertex>, wx: f32) {
    let base = GROUND_ROW as f32 * TILE;
    push_tri(
        out,
        (wx, base - 90.0),
        (wx + 110.0, base),
        (wx - 110.0, base),
        colors::HILL,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{tick, TickInput};

    #[test]
    fn title_scene_has_backdrop_geometry() {
        let state = GameState::new(1);
        let verts = build_scene(&state);
        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 3, 0);
    }

    #[test]
    fn play_scene_culls_far_geometry() {
        let mut state = GameState::new(1);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..TickInput::default()
            },
        );
        let verts = build_scene(&state);
        assert!(!verts.is_empty());
        // Camera sits at the level start; nothing from the far end of the
        // world should be emitted
        let max_x = verts
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert!(max_x < 2.0 * VIEW_WIDTH);
    }

    #[test]
    fn visibility_window_tracks_camera() {
        assert!(visible(0.0, 100.0, 32.0));
        assert!(!visible(0.0, VIEW_WIDTH + CULL_MARGIN + 1.0, 32.0));
        assert!(visible(1000.0, 1100.0, 32.0));
        assert!(!visible(1000.0, 100.0, 32.0));
    }
}

//! Axis-aligned collision detection and resolution
//!
//! Movement is resolved one axis at a time: the horizontal pass fully
//! completes before the vertical pass begins. This prevents diagonal
//! tunneling at the cost of the occasional corner snag, which is accepted
//! behavior. Speed caps stay well under one tile per tick, so an entity
//! can never pass through a single-tile-thick wall.

use super::state::{Body, World};
use crate::consts::*;

/// An axis-aligned box that entities cannot pass through
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// A full tile at grid position (tx, ty)
    pub fn tile(tx: i32, ty: i32) -> Self {
        Self::new(tx as f32 * TILE, ty as f32 * TILE, TILE, TILE)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    #[inline]
    pub fn of(body: &Body) -> Self {
        Self::new(body.pos.x, body.pos.y, body.size.x, body.size.y)
    }
}

/// A solid rectangle, optionally backed by a hittable block
#[derive(Debug, Clone, Copy)]
pub struct Solid {
    pub aabb: Aabb,
    /// Index into `world.blocks` when this solid is an unbroken block
    pub block: Option<usize>,
}

/// Flatten the world's static geometry into the solid set for this frame:
/// ground tiles, pipe segments, and unbroken blocks. Rebuilt per frame;
/// fine at this world size.
pub fn collect_solids(world: &World) -> Vec<Solid> {
    let mut solids = Vec::with_capacity(world.tiles.len() + world.blocks.len() + 32);

    for tile in &world.tiles {
        solids.push(Solid {
            aabb: Aabb::tile(tile.tx, tile.ty),
            block: None,
        });
    }

    for pipe in &world.pipes {
        for i in 0..pipe.height {
            let ty = GROUND_ROW - i - 1;
            solids.push(Solid {
                aabb: Aabb::tile(pipe.tx, ty),
                block: None,
            });
            solids.push(Solid {
                aabb: Aabb::tile(pipe.tx + 1, ty),
                block: None,
            });
        }
    }

    for (idx, block) in world.blocks.iter().enumerate() {
        if block.is_solid() {
            solids.push(Solid {
                aabb: Aabb::tile(block.tx, block.ty),
                block: Some(idx),
            });
        }
    }

    solids
}

/// Outcome of one resolver pass over an entity
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveResult {
    /// Horizontal velocity was zeroed by a wall
    pub blocked_horizontal: bool,
    /// Block index struck from below this frame, if any
    pub hit_block: Option<usize>,
}

/// Move a body by its velocity and resolve against the solid set.
///
/// Horizontal first: displace to the colliding rectangle's near edge and
/// zero vx. Then gravity clamp-accumulates vy to the terminal fall speed,
/// the body moves vertically, and floor/ceiling contacts zero vy. A floor
/// contact grounds the body; a ceiling contact reports the struck block
/// (at most one per upward contact event).
pub fn move_entity(body: &mut Body, solids: &[Solid]) -> MoveResult {
    let mut result = MoveResult::default();

    // Horizontal pass. Direction is captured up front so later overlaps in
    // the same pass resolve consistently after vx has been zeroed.
    let moving_right = body.vel.x > 0.0;
    body.pos.x += body.vel.x;
    for solid in solids {
        if Aabb::of(body).overlaps(&solid.aabb) {
            body.pos.x = if moving_right {
                solid.aabb.x - body.size.x
            } else {
                solid.aabb.right()
            };
            if body.vel.x != 0.0 {
                result.blocked_horizontal = true;
            }
            body.vel.x = 0.0;
        }
    }

    // Vertical pass
    body.vel.y = (body.vel.y + GRAVITY).min(TERMINAL_FALL);
    body.on_ground = false;
    let falling = body.vel.y >= 0.0;
    body.pos.y += body.vel.y;
    for solid in solids {
        if Aabb::of(body).overlaps(&solid.aabb) {
            if falling {
                body.pos.y = solid.aabb.y - body.size.y;
                body.vel.y = 0.0;
                body.on_ground = true;
            } else {
                body.pos.y = solid.aabb.bottom();
                body.vel.y = 0.0;
                if result.hit_block.is_none() {
                    result.hit_block = solid.block;
                }
            }
        }
    }

    result
}

/// Forward ground-sensor probe for ledge detection: a point just past the
/// leading edge and just below the feet. Returns true when a solid supports
/// that point.
pub fn probe_ground(body: &Body, moving_right: bool, solids: &[Solid]) -> bool {
    let fx = if moving_right {
        body.right() + 2.0
    } else {
        body.pos.x - 2.0
    };
    let fy = body.bottom() + 2.0;
    solids.iter().any(|s| {
        fx >= s.aabb.x && fx <= s.aabb.right() && fy >= s.aabb.y && fy <= s.aabb.bottom() + 2.0
    })
}

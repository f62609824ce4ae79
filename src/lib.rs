//! Tile Dash - a side-scrolling tile platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Web Audio sound synthesis
//! - `settings`: User preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per wall-clock second
    pub const TICKS_PER_SECOND: u64 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Viewport dimensions in world pixels
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 450.0;

    /// Tile edge length in pixels
    pub const TILE: f32 = 32.0;
    /// Ground row index (0 = top of screen). Ground top sits at GROUND_ROW * TILE.
    pub const GROUND_ROW: i32 = 12;
    /// Total world width in pixels
    pub const WORLD_WIDTH: f32 = 6400.0;

    /// Gravity in px/tick², accumulated each frame up to TERMINAL_FALL
    pub const GRAVITY: f32 = 0.65;
    /// Terminal fall speed in px/tick
    pub const TERMINAL_FALL: f32 = 16.0;

    /// Player movement tuning (px/tick)
    pub const WALK_MAX_SPEED: f32 = 3.2;
    pub const RUN_MAX_SPEED: f32 = 5.5;
    pub const GROUND_ACCEL: f32 = 0.45;
    /// Multiplicative slowdown when no direction is held
    pub const FRICTION: f32 = 0.72;
    pub const JUMP_SPEED: f32 = -13.0;
    pub const RUN_JUMP_SPEED: f32 = -14.0;
    /// Upward kick when bouncing off a stomped enemy
    pub const STOMP_BOUNCE: f32 = -8.0;

    /// Enemy patrol speed (px/tick)
    pub const ENEMY_SPEED: f32 = 1.4;
    /// Enemies farther than this from the player are not simulated
    pub const ENEMY_ACTIVE_RANGE: f32 = VIEW_WIDTH * 1.5;
    /// Ticks a squashed enemy stays visible before removal
    pub const SQUASH_TICKS: u32 = 28;

    /// Power-up entity walk speed (px/tick)
    pub const POWERUP_SPEED: f32 = 1.5;

    /// Session defaults
    pub const START_LIVES: u32 = 3;
    pub const START_TIME: u32 = 400;

    /// Post-damage invulnerability window in ticks
    pub const INVULN_TICKS: u32 = 160;
    /// Star invincibility duration in ticks
    pub const STAR_TICKS: u32 = 600;

    /// Delay between death and respawn/game-over (2.5s)
    pub const RESPAWN_DELAY_TICKS: u64 = 150;
    /// Delay between flag crossing and the win screen (2.2s)
    pub const WIN_DELAY_TICKS: u64 = 132;
    /// Non-reactive cooldown after a small-player brick bounce (~160ms)
    pub const BRICK_BOUNCE_TICKS: u64 = 10;

    /// The flag sits this many tiles before the right edge of the world
    pub const FLAG_OFFSET_TILES: f32 = 5.0;
    /// Falling below this y is instant death
    pub const FALL_DEATH_Y: f32 = VIEW_HEIGHT + 200.0;
    /// Power-ups below this y are discarded
    pub const POWERUP_DISCARD_Y: f32 = VIEW_HEIGHT + 100.0;

    /// Score values
    pub const SCORE_COIN: u32 = 200;
    pub const SCORE_STOMP: u32 = 200;
    pub const SCORE_STAR_KILL: u32 = 500;
    pub const SCORE_BRICK: u32 = 50;
    pub const SCORE_POWERUP: u32 = 1000;
    pub const SCORE_FLAG: u32 = 5000;
}

/// Camera x for a given player x: keep the player a third of the way into
/// the view, clamped to the world bounds.
#[inline]
pub fn camera_for(player_x: f32) -> f32 {
    (player_x - consts::VIEW_WIDTH / 3.0).clamp(0.0, consts::WORLD_WIDTH - consts::VIEW_WIDTH)
}

//! Game state and core simulation types
//!
//! Everything the tick function mutates lives here, owned by a single
//! [`GameState`] so no session data leaks into globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No world loaded; renderer shows the static backdrop
    Title,
    /// World simulation active, countdown running
    Playing,
    /// Player falling under gravity only, waiting on the respawn delay
    Dead,
    /// Terminal: out of lives
    GameOver,
    /// Terminal: level complete
    Win,
}

/// Static ground tile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// Grass-topped surface tile
    Top,
    /// Dirt fill below the surface
    Body,
}

/// A static ground tile at grid position (tx, ty)
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub tx: i32,
    pub ty: i32,
    pub kind: TileKind,
}

/// A pipe obstacle: two tiles wide, `height` tiles tall, standing on the ground
#[derive(Debug, Clone, Copy)]
pub struct Pipe {
    pub tx: i32,
    pub height: i32,
}

/// Power-up kinds released by reward boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    /// Grows the player to the big size tier
    Mushroom,
    /// Fixed-duration invincibility
    Star,
}

/// What a reward box releases on its single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReward {
    Coin,
    Powerup(PowerupKind),
}

/// Block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// One-shot reward box; becomes a dead box after its payload is granted
    Reward(BlockReward),
    /// Breakable only by the big player; bounces otherwise
    Brick,
}

/// A hittable block at grid position (tx, ty)
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub tx: i32,
    pub ty: i32,
    pub kind: BlockKind,
    /// Reward granted / brick currently bouncing. Latched permanently for
    /// reward boxes; reset by a scheduled event for bricks.
    pub hit: bool,
    /// Broken bricks stop being solid and are no longer drawn
    pub broken: bool,
}

impl Block {
    /// Solid rectangles exclude broken bricks
    pub fn is_solid(&self) -> bool {
        !self.broken
    }
}

/// Shared movable-entity state: position, extent, velocity, ground contact.
///
/// Player, enemies and power-ups all move through the same axis-separated
/// resolver, so they share this body.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    /// Top-left corner in world pixels
    pub pos: Vec2,
    /// Width and height of the bounding box
    pub size: Vec2,
    /// Velocity in px/tick
    pub vel: Vec2,
    /// Last vertical resolution ended on a floor
    pub on_ground: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            on_ground: false,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// Player size tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Small,
    Big,
}

/// The player entity
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// Facing direction: -1 left, 1 right
    pub dir: i8,
    pub size_tier: SizeTier,
    /// Remaining post-damage invulnerability ticks
    pub invuln_ticks: u32,
    /// Remaining star invincibility ticks
    pub star_ticks: u32,
    /// Set on fatal damage; the body then falls without input or collision
    pub dead: bool,
}

impl Player {
    /// Spawn at the level start, small
    pub fn spawn() -> Self {
        let pos = Vec2::new(80.0, (GROUND_ROW - 2) as f32 * TILE);
        Self {
            body: Body::new(pos, Vec2::new(24.0, 32.0)),
            dir: 1,
            size_tier: SizeTier::Small,
            invuln_ticks: 0,
            star_ticks: 0,
            dead: false,
        }
    }

    #[inline]
    pub fn is_big(&self) -> bool {
        self.size_tier == SizeTier::Big
    }

    #[inline]
    pub fn invulnerable(&self) -> bool {
        self.invuln_ticks > 0
    }

    #[inline]
    pub fn has_star(&self) -> bool {
        self.star_ticks > 0
    }

    /// Grow to the big tier, keeping the feet in place
    pub fn grow(&mut self) {
        if self.size_tier == SizeTier::Small {
            self.size_tier = SizeTier::Big;
            self.body.pos.y -= 16.0;
            self.body.size.y = 48.0;
        }
    }

    /// Shrink to small after damage, keeping the feet in place
    pub fn shrink(&mut self) {
        if self.size_tier == SizeTier::Big {
            self.size_tier = SizeTier::Small;
            self.body.pos.y += 16.0;
            self.body.size.y = 32.0;
        }
    }
}

/// A patrolling enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub alive: bool,
    /// Stomped enemies linger squashed for a few ticks before removal
    pub squashed: bool,
    pub squash_ticks: u32,
}

impl Enemy {
    pub fn at(pos: Vec2) -> Self {
        let mut body = Body::new(pos, Vec2::new(24.0, 24.0));
        body.vel.x = -ENEMY_SPEED;
        Self {
            body,
            alive: true,
            squashed: false,
            squash_ticks: 0,
        }
    }
}

/// A collectible coin placed in the open
#[derive(Debug, Clone)]
pub struct FreeCoin {
    pub pos: Vec2,
    pub size: Vec2,
    /// Latched on first overlap; never collected twice
    pub got: bool,
    /// Bob animation phase, advanced per tick (cosmetic)
    pub phase: f32,
}

/// A walking power-up entity released by a reward box
#[derive(Debug, Clone)]
pub struct Powerup {
    pub body: Body,
    pub kind: PowerupKind,
}

/// A cosmetic particle; no gameplay effect
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases over time
    pub life: f32,
    pub color: [f32; 4],
    pub size: f32,
}

/// Background decoration kinds (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoKind {
    Cloud,
    Hill,
}

/// A background decoration at world x
#[derive(Debug, Clone, Copy)]
pub struct Deco {
    pub wx: f32,
    pub kind: DecoKind,
}

/// The mutable world aggregate for one session: static geometry plus the
/// dynamic entity lists. Rebuilt fresh on every (re)spawn.
#[derive(Debug, Clone)]
pub struct World {
    pub tiles: Vec<Tile>,
    pub pipes: Vec<Pipe>,
    pub blocks: Vec<Block>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<FreeCoin>,
    pub decos: Vec<Deco>,
    pub player: Player,
    pub powerups: Vec<Powerup>,
    pub particles: Vec<Particle>,
    /// End-of-level marker latched; the bonus is awarded at most once
    pub flag_reached: bool,
}

impl World {
    /// World x of the end-of-level flag
    pub fn flag_x(&self) -> f32 {
        WORLD_WIDTH - FLAG_OFFSET_TILES * TILE
    }
}

/// Actions deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// End of the death delay: decrement lives, respawn or game over
    Respawn,
    /// End of the flag celebration delay
    EnterWin,
    /// Make a bounced brick reactive again
    ResetBrickBounce { block_index: usize },
}

/// A deferred action tagged with the session epoch it belongs to.
/// Firing against a stale epoch is a no-op by construction.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEvent {
    pub at_tick: u64,
    pub epoch: u32,
    pub action: DeferredAction,
}

/// Named audio cues, fire-and-forget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Jump,
    Coin,
    Stomp,
    Die,
    BrickBreak,
    PowerUp,
    Flag,
}

/// Outputs for presentation collaborators, drained by the host each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    /// Floating score popup at a world position
    ScorePopup { value: u32, x: f32, y: f32 },
}

/// Complete game state owned by the simulation step
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
    /// Remaining play time in whole seconds
    pub time_left: u32,
    /// Simulation tick counter, monotonic across sessions
    pub time_ticks: u64,
    /// Session generation; bumped on every session start so stale
    /// scheduled events become no-ops
    pub epoch: u32,
    /// Ticks accumulated toward the next one-second countdown step
    pub timer_accum: u64,
    pub camera_x: f32,
    /// None on the title screen
    pub world: Option<World>,
    pub scheduled: Vec<ScheduledEvent>,
    events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Fresh state on the title screen
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Title,
            score: 0,
            coins: 0,
            lives: START_LIVES,
            time_left: START_TIME,
            time_ticks: 0,
            epoch: 0,
            timer_accum: 0,
            camera_x: 0.0,
            world: None,
            scheduled: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Queue an output event for the host
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Add to the score and emit a popup at a world position
    pub fn add_score(&mut self, value: u32, x: f32, y: f32) {
        self.score += value;
        self.emit(GameEvent::ScorePopup { value, x, y });
    }

    /// Schedule a deferred action `delay` ticks from now, tagged with the
    /// current epoch
    pub fn schedule(&mut self, delay: u64, action: DeferredAction) {
        self.scheduled.push(ScheduledEvent {
            at_tick: self.time_ticks + delay,
            epoch: self.epoch,
            action,
        });
    }

    /// Take all pending output events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_grow_shrink_keeps_feet() {
        let mut p = Player::spawn();
        let feet = p.body.bottom();
        p.grow();
        assert_eq!(p.size_tier, SizeTier::Big);
        assert!((p.body.bottom() - feet).abs() < f32::EPSILON);
        p.shrink();
        assert_eq!(p.size_tier, SizeTier::Small);
        assert!((p.body.bottom() - feet).abs() < f32::EPSILON);
    }

    #[test]
    fn grow_is_idempotent() {
        let mut p = Player::spawn();
        p.grow();
        let pos = p.body.pos;
        p.grow();
        assert_eq!(p.body.pos, pos);
        assert_eq!(p.body.size.y, 48.0);
    }

    #[test]
    fn add_score_emits_popup() {
        let mut state = GameState::new(1);
        state.add_score(200, 64.0, 128.0);
        assert_eq!(state.score, 200);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ScorePopup {
                value: 200,
                x: 64.0,
                y: 128.0
            }]
        );
        assert!(state.drain_events().is_empty());
    }
}

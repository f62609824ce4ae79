//! Deterministic game simulation
//!
//! The simulation advances in fixed 60 Hz ticks and owns all gameplay
//! state. Rendering, audio and the DOM HUD consume it read-only (plus a
//! drained event queue), so the same state can be driven headless in
//! tests.

pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use state::{GameEvent, GamePhase, GameState, SoundCue};
pub use tick::{tick, TickInput};

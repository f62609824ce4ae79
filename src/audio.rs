//! Audio system using Web Audio API
//!
//! Procedurally generated chiptune effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::SoundCue;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound cue
    pub fn play(&self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Jump => self.play_jump(ctx, vol),
            SoundCue::Coin => self.play_coin(ctx, vol),
            SoundCue::Stomp => self.play_stomp(ctx, vol),
            SoundCue::Die => self.play_die(ctx, vol),
            SoundCue::BrickBreak => self.play_brick(ctx, vol),
            SoundCue::PowerUp => self.play_power_up(ctx, vol),
            SoundCue::Flag => self.play_flag(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short ascending note ladder, one oscillator per step
    fn play_ladder(
        &self,
        ctx: &AudioContext,
        vol: f32,
        freqs: &[f32],
        step: f64,
        osc_type: OscillatorType,
    ) {
        for (i, freq) in freqs.iter().enumerate() {
            let delay = i as f64 * step;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + step + 0.08)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + step + 0.1).ok();
            }
        }
    }

    /// Jump - quick rising chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 523.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(523.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(784.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Coin - bright two-note ding
    fn play_coin(&self, ctx: &AudioContext, vol: f32) {
        self.play_ladder(ctx, vol, &[988.0, 1319.0], 0.07, OscillatorType::Square);
    }

    /// Stomp - dull descending thud
    fn play_stomp(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(110.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Death - slow falling notes
    fn play_die(&self, ctx: &AudioContext, vol: f32) {
        self.play_ladder(
            ctx,
            vol,
            &[440.0, 330.0, 220.0, 110.0],
            0.12,
            OscillatorType::Triangle,
        );
    }

    /// Brick bounce/break - short rattle
    fn play_brick(&self, ctx: &AudioContext, vol: f32) {
        self.play_ladder(
            ctx,
            vol,
            &[300.0, 200.0, 150.0],
            0.04,
            OscillatorType::Sawtooth,
        );
    }

    /// Power-up - happy ascending arpeggio
    fn play_power_up(&self, ctx: &AudioContext, vol: f32) {
        self.play_ladder(
            ctx,
            vol,
            &[523.0, 659.0, 784.0, 1047.0],
            0.07,
            OscillatorType::Square,
        );
    }

    /// Flag - triumphant fanfare
    fn play_flag(&self, ctx: &AudioContext, vol: f32) {
        self.play_ladder(
            ctx,
            vol,
            &[784.0, 880.0, 988.0, 1047.0, 1175.0],
            0.09,
            OscillatorType::Triangle,
        );
    }
}

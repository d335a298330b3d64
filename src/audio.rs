//! Audio system using Web Audio API
//!
//! Procedurally generated cues keyed by the sim's string sound ids, plus
//! two looping voices (thruster, charging) that are faded in and out.

use std::collections::HashMap;

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::present::AudioSink;

/// Fade time for looping voices (s)
const LOOP_FADE: f64 = 0.08;

/// A looping voice kept alive between fades
struct Voice {
    osc: OscillatorNode,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
    loops: HashMap<String, Voice>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            muted: false,
            loops: HashMap::new(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            let ids: Vec<String> = self.loops.keys().cloned().collect();
            for id in ids {
                self.fade(&id, 0.0);
            }
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Context ready to play, resumed if the browser suspended it
    fn live_context(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
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

    /// Short pitch-swept blip
    fn blip(ctx: &AudioContext, vol: f32, from: f32, to: f32, len: f64, osc_type: OscillatorType) {
        let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + len)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + len)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + len + 0.02).ok();
    }

    /// Eat - a gulp whose pitch depends on the variant
    fn play_eat(ctx: &AudioContext, vol: f32, variant: u32) {
        let base = 180.0 + variant as f32 * 30.0;
        Self::blip(ctx, vol * 0.5, base, base * 0.4, 0.15, OscillatorType::Sine);
    }

    /// Damage - harsh downward buzz
    fn play_damage(ctx: &AudioContext, vol: f32, variant: u32) {
        let base = 260.0 - variant as f32 * 60.0;
        Self::blip(ctx, vol * 0.35, base, 50.0, 0.25, OscillatorType::Sawtooth);
        Self::blip(ctx, vol * 0.2, base * 4.0, base, 0.1, OscillatorType::Square);
    }

    /// Evolve - rising arpeggio
    fn play_evolve(ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [262.0, 330.0, 392.0, 523.0].into_iter().enumerate() {
            let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Triangle) else {
                continue;
            };
            let start = t + i as f64 * 0.09;
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().set_value_at_time(vol * 0.3, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(start + 0.35).ok();
        }
    }

    /// Loop voice parameters per id
    fn loop_voice(id: &str) -> Option<(f32, OscillatorType, f32)> {
        match id {
            "thruster" => Some((55.0, OscillatorType::Sawtooth, 0.15)),
            "charging" => Some((220.0, OscillatorType::Square, 0.08)),
            _ => None,
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, id: &str) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.live_context() else { return };

        if let Some(n) = id.strip_prefix("eat_").and_then(|n| n.parse().ok()) {
            Self::play_eat(ctx, vol, n);
            return;
        }
        if let Some(n) = id.strip_prefix("damage_").and_then(|n| n.parse().ok()) {
            Self::play_damage(ctx, vol, n);
            return;
        }

        match id {
            "kick" => Self::blip(ctx, vol * 0.6, 150.0, 60.0, 0.1, OscillatorType::Sine),
            "pickup" => Self::blip(ctx, vol * 0.3, 600.0, 1400.0, 0.15, OscillatorType::Triangle),
            "charging" => Self::blip(ctx, vol * 0.2, 880.0, 1320.0, 0.06, OscillatorType::Square),
            "evolve" => Self::play_evolve(ctx, vol),
            other => log::warn!("Unknown sound id {}", other),
        }
    }

    fn fade(&mut self, id: &str, volume: f32) {
        let Some((freq, osc_type, level)) = Self::loop_voice(id) else {
            log::warn!("Unknown loop id {}", id);
            return;
        };
        let target = volume.clamp(0.0, 1.0) * level * self.effective_volume();
        let Some(ctx) = self.live_context().cloned() else { return };
        let t = ctx.current_time();

        if target <= 0.0 {
            if let Some(voice) = self.loops.remove(id) {
                voice.gain.gain().set_value_at_time(voice.gain.gain().value(), t).ok();
                voice.gain.gain().linear_ramp_to_value_at_time(0.0, t + LOOP_FADE).ok();
                voice.osc.stop_with_when(t + LOOP_FADE + 0.02).ok();
            }
            return;
        }

        if let Some(voice) = self.loops.get(id) {
            voice.gain.gain().linear_ramp_to_value_at_time(target, t + LOOP_FADE).ok();
            return;
        }

        let Some((osc, gain)) = Self::create_osc(&ctx, freq, osc_type) else {
            return;
        };
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().linear_ramp_to_value_at_time(target, t + LOOP_FADE).ok();
        osc.start().ok();
        self.loops.insert(id.to_string(), Voice { osc, gain });
    }
}

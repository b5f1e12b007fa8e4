//! Audio output
//!
//! The simulation only decides *which* tone or effect plays and *when*.
//! Backends turn that into sound: Web Audio oscillators in the browser,
//! nothing (but a debug log) on native.

/// Tone table shared by every palette (C major pentatonic, two octaves)
pub const TONE_FREQUENCIES: [f32; 9] = [
    261.63, 293.66, 329.63, 392.00, 440.00, 523.25, 587.33, 659.25, 783.99,
];

/// Named sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Round reproduced
    Correct,
    /// Zen mistake, sequence will replay
    Mistake,
    /// Classic run ended
    GameOver,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Correct => "correct",
            SoundEffect::Mistake => "mistake",
            SoundEffect::GameOver => "gameover",
        }
    }
}

/// Fire-and-forget sound sink
pub trait AudioOutput {
    fn play_tone(&self, tone: usize);
    fn play_effect(&self, effect: SoundEffect);
    fn set_muted(&mut self, muted: bool);
}

/// Silent backend
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio {
    muted: bool,
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioOutput for NullAudio {
    fn play_tone(&self, tone: usize) {
        if !self.muted {
            log::debug!("tone {}", tone);
        }
    }

    fn play_effect(&self, effect: SoundEffect) {
        if !self.muted {
            log::debug!("effect {}", effect.as_str());
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioOutput, SoundEffect, TONE_FREQUENCIES};

    /// Web Audio API backend with procedurally generated sounds
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn context(&self) -> Option<&AudioContext> {
            if self.muted || self.volume <= 0.0 {
                return None;
            }
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

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

        /// Short notes, one after another
        fn play_arpeggio(&self, ctx: &AudioContext, freqs: &[f32], spacing: f64, osc_type: OscillatorType) {
            for (i, freq) in freqs.iter().enumerate() {
                let delay = i as f64 * spacing;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(self.volume * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + spacing * 1.5)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + spacing * 2.0).ok();
                }
            }
        }

        /// Mistake - low detuned buzz
        fn play_mistake(&self, ctx: &AudioContext) {
            let t = ctx.current_time();
            for freq in [110.0, 116.5] {
                if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sawtooth) {
                    gain.gain().set_value_at_time(self.volume * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                        .ok();
                    osc.start().ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }
    }

    impl AudioOutput for WebAudio {
        fn play_tone(&self, tone: usize) {
            let Some(ctx) = self.context() else { return };
            let freq = TONE_FREQUENCIES[tone % TONE_FREQUENCIES.len()];
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(self.volume * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        fn play_effect(&self, effect: SoundEffect) {
            let Some(ctx) = self.context() else { return };
            match effect {
                SoundEffect::Correct => {
                    self.play_arpeggio(ctx, &[523.25, 659.25, 783.99], 0.08, OscillatorType::Triangle)
                }
                SoundEffect::Mistake => self.play_mistake(ctx),
                SoundEffect::GameOver => {
                    self.play_arpeggio(ctx, &[400.0, 350.0, 300.0, 200.0], 0.2, OscillatorType::Sine)
                }
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }
}

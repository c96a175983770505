//! Audio system using Web Audio API
//!
//! One-shot effects are generated procedurally. The background loop is an
//! `<audio>` element; if its file is missing the game simply runs silent.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::platform::{AudioOut, SoundEffect};
use crate::settings::Settings;

/// Background music file, relative to the page
const MUSIC_SRC: &str = "assets/bgm.mp3";

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music: Option<HtmlAudioElement>,
    sfx_volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound effects disabled");
        }

        let music = HtmlAudioElement::new_with_src(MUSIC_SRC).ok();
        match &music {
            Some(el) => el.set_loop(true),
            None => log::warn!("Background music unavailable"),
        }

        let mut audio = Self {
            ctx,
            music,
            sfx_volume: 0.0,
        };
        audio.apply_settings(settings);
        audio
    }

    /// Take the volumes from `settings`; music changes take effect mid-song
    pub fn apply_settings(&mut self, settings: &Settings) {
        let settings = settings.clone().sanitized();
        self.sfx_volume = settings.sfx_volume;
        if let Some(music) = &self.music {
            music.set_volume(settings.music_volume as f64);
        }
    }

    fn play_music(&self) {
        if let Some(music) = &self.music {
            // Rejected when autoplay is blocked; the next user gesture retries
            if music.play().is_err() {
                log::debug!("Background music blocked");
            }
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

    /// Hit - low crunch with a falling pitch
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.45, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }
    }

    /// Item - quick two-note blip
    fn play_item(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [700.0, 1050.0].iter().enumerate() {
            let delay = i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }
    }

    /// Powerup - rising arpeggio
    fn play_powerup(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 750.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}

impl AudioOut for AudioManager {
    fn play_one_shot(&mut self, effect: SoundEffect) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Hit => self.play_hit(ctx, vol),
            SoundEffect::Item => self.play_item(ctx, vol),
            SoundEffect::Powerup => self.play_powerup(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    fn play_loop(&mut self) {
        if let Some(music) = &self.music {
            music.set_current_time(0.0);
        }
        self.play_music();
    }

    fn pause(&mut self) {
        if let Some(music) = &self.music {
            let _ = music.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
        self.play_music();
    }

    fn stop(&mut self) {
        if let Some(music) = &self.music {
            let _ = music.pause();
            music.set_current_time(0.0);
        }
    }
}

//! Microphone volume normalization
//!
//! Capture happens outside the core. Callers hand over one frame of
//! spectrum magnitudes per display refresh and read back a smoothed volume
//! in `[0, 1]` that drives the body's audio scale.

use crate::appearance::AppearanceConfig;

/// Magnitude treated as silence
const NOISE_FLOOR: f32 = 10.0;

/// Magnitude span above the floor that maps to full volume
const FULL_SCALE_SPAN: f32 = 100.0;

/// Weight of the previous value when smoothing
const SMOOTHING: f32 = 0.8;

/// Extra body scale at full volume
pub const AUDIO_SCALE_GAIN: f32 = 0.2;

/// Smoothed volume from spectrum frames
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VolumeMeter {
    volume: f32,
}

impl VolumeMeter {
    /// A silent meter
    #[must_use]
    pub const fn new() -> Self {
        Self { volume: 0.0 }
    }

    /// Feed one frame of byte magnitudes and return the smoothed volume
    ///
    /// An empty frame counts as silence.
    pub fn push_frame(&mut self, magnitudes: &[u8]) -> f32 {
        let average = if magnitudes.is_empty() {
            0.0
        } else {
            let sum: u32 = magnitudes.iter().map(|&m| u32::from(m)).sum();
            #[allow(clippy::cast_precision_loss)]
            let average = sum as f32 / magnitudes.len() as f32;
            average
        };
        let level = ((average - NOISE_FLOOR) / FULL_SCALE_SPAN).clamp(0.0, 1.0);
        self.volume = self.volume * SMOOTHING + level * (1.0 - SMOOTHING);
        self.volume
    }

    /// Current smoothed volume
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Back to silence
    pub fn reset(&mut self) {
        self.volume = 0.0;
    }
}

/// Body scale multiplier for the current volume
///
/// Multiplies on top of the pose's own scale. Always `1.0` when audio
/// reactivity is off.
#[must_use]
pub fn audio_scale(config: &AppearanceConfig, volume: f32) -> f32 {
    if config.audio_reactive {
        1.0 + AUDIO_SCALE_GAIN * volume.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_frames_stay_silent() {
        let mut meter = VolumeMeter::new();
        assert!(meter.push_frame(&[5; 64]).abs() < f32::EPSILON);
        assert!(meter.push_frame(&[]).abs() < f32::EPSILON);
    }

    #[test]
    fn test_loud_frame_is_smoothed() {
        let mut meter = VolumeMeter::new();
        // average 60 -> level 0.5 -> 0.5 * 0.2
        let v = meter.push_frame(&[60; 32]);
        assert!((v - 0.1).abs() < 1e-6);
        let v = meter.push_frame(&[60; 32]);
        assert!((v - 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_level_caps_at_one() {
        let mut meter = VolumeMeter::new();
        for _ in 0..200 {
            meter.push_frame(&[255; 16]);
        }
        assert!(meter.volume() <= 1.0);
        assert!(meter.volume() > 0.99);
        meter.reset();
        assert!(meter.volume().abs() < f32::EPSILON);
    }

    #[test]
    fn test_audio_scale() {
        let reactive = AppearanceConfig::default().with_audio_reactive(true);
        assert!((audio_scale(&reactive, 0.5) - 1.1).abs() < 1e-6);
        assert!((audio_scale(&reactive, 3.0) - 1.2).abs() < 1e-6);
        assert!((audio_scale(&AppearanceConfig::default(), 0.5) - 1.0).abs() < f32::EPSILON);
    }
}

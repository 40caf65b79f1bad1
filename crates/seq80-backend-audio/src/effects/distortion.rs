//! Waveshaper distortion.

use seq80_spec::DistortionCurve;

use crate::buffer::SampleBuffer;
use crate::error::AudioResult;

use super::check_range;

/// Waveshaping distortion with drive-compensating makeup gain.
#[derive(Debug, Clone)]
pub struct Distortion {
    drive: f64,
    curve: DistortionCurve,
    output_gain: f64,
}

impl Distortion {
    /// Creates a distortion stage.
    ///
    /// # Arguments
    /// * `drive` - Drive amount (0.0-100.0); input gain is `1 + drive`
    /// * `curve` - Waveshaping curve
    /// * `output_gain` - Linear output gain (0.0-4.0)
    pub fn new(drive: f64, curve: DistortionCurve, output_gain: f64) -> AudioResult<Self> {
        check_range("distortion.drive", drive, 0.0, 100.0)?;
        check_range("distortion.output_gain", output_gain, 0.0, 4.0)?;
        Ok(Self {
            drive,
            curve,
            output_gain,
        })
    }

    /// Processes a buffer. A drive of zero bypasses the stage entirely,
    /// output gain included.
    pub fn process(&mut self, mut buffer: SampleBuffer) -> SampleBuffer {
        if self.drive == 0.0 {
            return buffer;
        }

        let gain = 1.0 + self.drive;
        // Compensate for drive
        let makeup = self.output_gain / gain.sqrt();

        for sample in buffer.samples_mut() {
            *sample = apply_curve(*sample * gain, self.curve) * makeup;
        }

        buffer
    }

    /// Distortion is stateless; present for a uniform effect interface.
    pub fn reset(&mut self) {}
}

/// Applies a waveshaping curve to a sample.
fn apply_curve(sample: f64, curve: DistortionCurve) -> f64 {
    match curve {
        DistortionCurve::Tanh => sample.tanh(),
        DistortionCurve::Soft => {
            // Cubic soft clip, flat beyond +/-1
            if sample > 1.0 {
                2.0 / 3.0
            } else if sample < -1.0 {
                -2.0 / 3.0
            } else {
                sample - (sample * sample * sample) / 3.0
            }
        }
        DistortionCurve::Hard => sample.clamp(-1.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> SampleBuffer {
        SampleBuffer::mono((-10..=10).map(|i| i as f64 / 10.0).collect(), 8000)
    }

    #[test]
    fn test_zero_drive_is_identity() {
        let mut dist = Distortion::new(0.0, DistortionCurve::Hard, 3.0).unwrap();
        assert_eq!(dist.process(ramp()), ramp());
    }

    #[test]
    fn test_validation() {
        assert!(Distortion::new(-1.0, DistortionCurve::Soft, 1.0).is_err());
        assert!(Distortion::new(101.0, DistortionCurve::Soft, 1.0).is_err());
        assert!(Distortion::new(10.0, DistortionCurve::Soft, 4.5).is_err());
        assert!(Distortion::new(f64::NAN, DistortionCurve::Soft, 1.0).is_err());
    }

    #[test]
    fn test_curves() {
        assert_eq!(apply_curve(2.0, DistortionCurve::Hard), 1.0);
        assert_eq!(apply_curve(-2.0, DistortionCurve::Soft), -2.0 / 3.0);
        assert!((apply_curve(0.5, DistortionCurve::Soft) - (0.5 - 0.125 / 3.0)).abs() < 1e-12);
        assert!((apply_curve(0.3, DistortionCurve::Tanh) - 0.3f64.tanh()).abs() < 1e-12);
    }

    #[test]
    fn test_hard_clip_bounds_output() {
        // Gain 16, makeup 1/4: clipped peak lands at 0.25
        let mut dist = Distortion::new(15.0, DistortionCurve::Hard, 1.0).unwrap();
        let out = dist.process(ramp());
        assert!((out.peak() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_is_odd_symmetric() {
        for curve in [
            DistortionCurve::Soft,
            DistortionCurve::Hard,
            DistortionCurve::Tanh,
        ] {
            let mut dist = Distortion::new(7.0, curve, 1.0).unwrap();
            let out = dist.process(ramp());
            let s = out.samples();
            for i in 0..s.len() {
                assert!((s[i] + s[s.len() - 1 - i]).abs() < 1e-12);
            }
        }
    }
}

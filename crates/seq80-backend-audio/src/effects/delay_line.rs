//! Ring buffer shared by the delay, chorus and flanger effects.

/// A ring buffer for delay lines with fractional (interpolated) reads.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f64>,
    write_pos: usize,
}

impl DelayLine {
    /// Creates a delay line holding at least `max_samples` samples.
    pub fn new(max_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_samples.max(4)],
            write_pos: 0,
        }
    }

    /// Capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Writes a sample and advances the write position.
    pub fn write(&mut self, sample: f64) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Reads the sample written `delay_samples` writes ago (1 = most recent).
    pub fn read(&self, delay_samples: usize) -> f64 {
        let len = self.buffer.len();
        let read_pos = (self.write_pos + len - delay_samples % len) % len;
        self.buffer[read_pos]
    }

    /// Reads at a fractional delay using linear interpolation.
    ///
    /// The delay is kept within `1..=capacity - 2` so a read never returns the
    /// slot about to be overwritten.
    pub fn read_interpolated(&self, delay_samples: f64) -> f64 {
        let max_delay = (self.capacity() - 2) as f64;
        let delay = delay_samples.clamp(1.0, max_delay);
        let delay_int = delay.floor() as usize;
        let delay_frac = delay - delay_int as f64;

        let sample1 = self.read(delay_int);
        let sample2 = self.read(delay_int + 1);

        sample1 * (1.0 - delay_frac) + sample2 * delay_frac
    }

    /// Zeroes the buffer and rewinds the write position.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_line_basic() {
        let mut dl = DelayLine::new(10);

        for i in 0..5 {
            dl.write(i as f64);
        }

        assert!((dl.read(1) - 4.0).abs() < 1e-10);
        assert!((dl.read(5) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_delay_line_interpolation() {
        let mut dl = DelayLine::new(10);

        dl.write(0.0);
        dl.write(1.0);
        dl.write(2.0);

        // Halfway between delay 1 (2.0) and delay 2 (1.0)
        let val = dl.read_interpolated(1.5);
        assert!((val - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_interpolated_read_clamps_delay() {
        let mut dl = DelayLine::new(6);
        for i in 0..6 {
            dl.write(i as f64);
        }
        // Below one sample reads the newest value
        assert!((dl.read_interpolated(0.2) - 5.0).abs() < 1e-10);
        // Past the end stops at capacity - 2
        assert!((dl.read_interpolated(100.0) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_capacity_has_a_floor() {
        assert_eq!(DelayLine::new(0).capacity(), 4);
        assert_eq!(DelayLine::new(4410).capacity(), 4410);
        // The smallest line still interpolates between two stored samples
        let mut dl = DelayLine::new(1);
        dl.write(1.0);
        dl.write(3.0);
        assert!((dl.read_interpolated(1.5) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_delay_line_wrap_around() {
        let mut dl = DelayLine::new(4);

        for i in 0..10 {
            dl.write(i as f64);
        }

        assert!((dl.read(1) - 9.0).abs() < 1e-10);
        assert!((dl.read(4) - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_clear() {
        let mut dl = DelayLine::new(8);
        dl.write(1.0);
        dl.clear();
        assert!((0..8).all(|d| dl.read(d) == 0.0));
    }
}

//! Sample value bounds.

/// Bytes per sample of the output container (signed 16-bit PCM).
pub const SAMPLE_BYTES: u16 = 2;

/// Most samples a single WAV data chunk can hold.
pub const MAX_SAMPLES: u64 = u32::MAX as u64 / SAMPLE_BYTES as u64;

/// Largest value a sample of `bytes` bytes can hold.
pub fn max_value_from_bytes(bytes: u16, signed: bool) -> i64 {
    let bits = u32::from(bytes) * 8;
    match signed {
        true => (1i64 << (bits - 1)) - 1,
        false => (1i64 << bits) - 1,
    }
}

/// Smallest value a sample of `bytes` bytes can hold.
pub fn min_value_from_bytes(bytes: u16, signed: bool) -> i64 {
    match signed {
        true => -(1i64 << (u32::from(bytes) * 8 - 1)),
        false => 0,
    }
}

/// Inclusive bounds of the output container.
pub fn container_bounds() -> (i32, i32) {
    (
        min_value_from_bytes(SAMPLE_BYTES, true) as i32,
        max_value_from_bytes(SAMPLE_BYTES, true) as i32,
    )
}

/// Effective bounds every normalized sample lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRange {
    pub min: i32,
    pub max: i32,
    /// `|min| + |max|`
    pub width: i64,
}

impl SampleRange {
    /// Narrows `[lower, upper]` to `[-A, A]` where `A = floor(amplitude * adjustment)`.
    ///
    /// `lower`/`upper` are expected to already sit inside the container; the
    /// amplitude can only pull the range toward zero, never past them.
    pub fn from_amplitude(amplitude: f64, adjustment: f64, lower: i32, upper: i32) -> Self {
        // Saturating cast; anything beyond the container is clamped away below.
        let effective = (amplitude * adjustment).floor() as i64;
        let min = (-effective).max(i64::from(lower));
        let max = effective.min(i64::from(upper));
        Self::new(min as i32, max as i32)
    }

    pub fn new(min: i32, max: i32) -> Self {
        let width = i64::from(min).abs() + i64::from(max).abs();
        Self { min, max, width }
    }

    /// Saturates `value` to the range. NaN passes through untouched.
    pub fn limit(&self, value: f64) -> f64 {
        if value >= f64::from(self.max) {
            return f64::from(self.max);
        }
        if value <= f64::from(self.min) {
            return f64::from(self.min);
        }
        value
    }

    pub fn contains(&self, sample: i32) -> bool {
        (self.min..=self.max).contains(&sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_limits() {
        assert_eq!(max_value_from_bytes(2, true), 32767);
        assert_eq!(min_value_from_bytes(2, true), -32768);
        assert_eq!(max_value_from_bytes(1, false), 255);
        assert_eq!(min_value_from_bytes(1, false), 0);
        assert_eq!(container_bounds(), (i16::MIN as i32, i16::MAX as i32));
    }

    #[test]
    fn default_amplitude_spans_the_container() {
        let range = SampleRange::from_amplitude(32767.0, 1.0, -32767, 32767);
        assert_eq!(range, SampleRange { min: -32767, max: 32767, width: 65534 });
    }

    #[test]
    fn amplitude_cannot_exceed_bounds() {
        let range = SampleRange::from_amplitude(100_000.0, 2.0, -32768, 32767);
        assert_eq!((range.min, range.max), (-32768, 32767));
        assert_eq!(range.width, 65535);
    }

    #[test]
    fn adjustment_narrows_and_floors() {
        let range = SampleRange::from_amplitude(1001.0, 0.5, -32767, 32767);
        assert_eq!((range.min, range.max, range.width), (-500, 500, 1000));
    }

    #[test]
    fn zero_amplitude_is_silence() {
        let range = SampleRange::from_amplitude(32767.0, 0.0, -32767, 32767);
        assert_eq!((range.min, range.max, range.width), (0, 0, 0));
        assert_eq!(range.limit(1234.5), 0.0);
        assert_eq!(range.limit(-1234.5), 0.0);
    }

    #[test]
    fn limit_saturates_at_both_ends() {
        let range = SampleRange::new(-10, 10);
        assert_eq!(range.limit(10.0), 10.0);
        assert_eq!(range.limit(11.5), 10.0);
        assert_eq!(range.limit(-99.0), -10.0);
        assert_eq!(range.limit(3.25), 3.25);
        assert!(range.contains(-10) && range.contains(10) && !range.contains(11));
    }
}

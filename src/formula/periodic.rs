use std::f64::consts::PI;

use tracing::debug;

use super::SampleFormula;
use crate::params::WaveParameters;

/// A single-frequency tone: `y = A sin(2πfx)`, with the phase reset every cycle.
#[derive(Debug, Clone)]
pub struct SineWave {
    params: WaveParameters,
}

impl SineWave {
    pub fn new(params: &WaveParameters) -> Self {
        Self {
            params: params.clone(),
        }
    }
}

impl SampleFormula for SineWave {
    fn raw_value(&mut self, index: u64) -> f64 {
        let phase = self.params.phase(index);
        let amplitude = f64::from(self.params.max_value());
        let value = amplitude * (2.0 * PI * phase).sin();
        if self.params.debug {
            debug!("{}: {} * sin(2π{}) = {}", index, amplitude, phase, value);
        }
        value
    }
}

/// A ramp climbing one unit per sample from `min`, wrapped by the value range.
///
/// The period depends on the amplitude bounds only, not on the frequency.
#[derive(Debug, Clone)]
pub struct SawtoothWave {
    min: i64,
    width: i64,
    debug: bool,
}

impl SawtoothWave {
    pub fn new(params: &WaveParameters) -> Self {
        Self {
            min: i64::from(params.min_value()),
            width: params.value_range(),
            debug: params.debug,
        }
    }
}

impl SampleFormula for SawtoothWave {
    fn raw_value(&mut self, index: u64) -> f64 {
        if self.width == 0 {
            return self.min as f64;
        }
        let index = index as i64;
        let cycle = index / self.width;
        let value = index + self.min - cycle * self.width;
        if self.debug {
            debug!(
                "{}: {} + {} - {} * {} = {}",
                index, index, self.min, cycle, self.width, value
            );
        }
        value as f64
    }
}

/// `a(x + b)² + c`: a parabola per cycle, `max` at the cycle edges and `min`
/// at its midpoint.
#[derive(Debug, Clone)]
pub struct QuadraticWave {
    a: f64,
    b: f64,
    c: f64,
    samples_per_cycle: u64,
    debug: bool,
}

impl QuadraticWave {
    pub fn new(params: &WaveParameters) -> Self {
        let samples_per_cycle = params.samples_per_cycle as f64;
        let spread = f64::from(params.max_value()) - f64::from(params.min_value());
        Self {
            a: 4.0 * spread / samples_per_cycle.powi(2),
            b: -samples_per_cycle / 2.0,
            c: f64::from(params.min_value()),
            samples_per_cycle: params.samples_per_cycle,
            debug: params.debug,
        }
    }
}

impl SampleFormula for QuadraticWave {
    fn raw_value(&mut self, index: u64) -> f64 {
        let x = (index % self.samples_per_cycle) as f64;
        let value = self.a * (x + self.b).powi(2) + self.c;
        if self.debug {
            debug!(
                "{}: {} * ({} + {})^2 + {} = {}",
                index, self.a, x, self.b, self.c, value
            );
        }
        value
    }
}

use tracing::debug;

use super::expr::{Expression, FormulaInputs};
use super::SampleFormula;
use crate::error::{Result, WaveError};
use crate::params::WaveParameters;

/// A caller-supplied arithmetic template, evaluated per sample.
///
/// `{x}` is the position inside the current cycle (`index mod samples_per_cycle`).
#[derive(Debug, Clone)]
pub struct CustomWave {
    expression: Expression,
    inputs: FormulaInputs,
    samples_per_cycle: u64,
    debug: bool,
}

impl CustomWave {
    pub fn new(params: &WaveParameters) -> Result<Self> {
        let source = params
            .custom_formula
            .as_deref()
            .ok_or(WaveError::MissingCustomFormula)?;
        Ok(Self {
            expression: Expression::compile(source)?,
            inputs: FormulaInputs {
                x: 0.0,
                min_sample: f64::from(params.min_value()),
                max_sample: f64::from(params.max_value()),
                sample_range: params.value_range() as f64,
                samples_per_cycle: params.samples_per_cycle as f64,
            },
            samples_per_cycle: params.samples_per_cycle,
            debug: params.debug,
        })
    }
}

impl SampleFormula for CustomWave {
    fn raw_value(&mut self, index: u64) -> f64 {
        self.inputs.x = (index % self.samples_per_cycle) as f64;
        let value = self.expression.eval(&self.inputs);
        if self.debug {
            debug!("{}: {} = {}", index, self.expression.substitute(&self.inputs), value);
        }
        value
    }
}

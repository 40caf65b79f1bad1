//! Ordered effect chains.

use seq80_spec::EffectSpec;
use tracing::trace;

use super::Effect;
use crate::buffer::SampleBuffer;
use crate::error::AudioResult;

/// An ordered list of effects applied left to right.
#[derive(Debug, Clone, Default)]
pub struct EffectChain {
    effects: Vec<Effect>,
}

impl EffectChain {
    /// Creates an empty chain. An empty chain passes buffers through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chain from effect specs.
    ///
    /// Every effect is validated before anything is returned; a parameter
    /// error names its position, e.g. `effects[1].delay.feedback`.
    pub fn from_specs(specs: &[EffectSpec], sample_rate: u32) -> AudioResult<Self> {
        let effects = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                Effect::from_spec(spec, sample_rate)
                    .map_err(|e| e.with_param_prefix(&format!("effects[{}]", i)))
            })
            .collect::<AudioResult<Vec<_>>>()?;
        Ok(Self { effects })
    }

    /// Appends an effect.
    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Appends an effect, builder style.
    pub fn with(mut self, effect: Effect) -> Self {
        self.push(effect);
        self
    }

    /// Runs the buffer through every effect in order.
    pub fn process(&mut self, buffer: SampleBuffer) -> SampleBuffer {
        self.effects.iter_mut().fold(buffer, |buffer, effect| {
            trace!(
                effect = effect.name(),
                frames = buffer.frames(),
                channels = buffer.channels(),
                "applying effect"
            );
            effect.process(buffer)
        })
    }

    /// Clears the state of every effect.
    pub fn reset(&mut self) {
        for effect in &mut self.effects {
            effect.reset();
        }
    }

    /// Number of effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Returns true if the chain has no effects.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Names of the effects, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(Effect::name).collect()
    }
}

use log::info;

use super::state::{FrameOutput, SimulationState};
use crate::api::config::EngineConfig;
use crate::core::time::{ProgressThrottle, TickThrottle};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::traits::{DrawTiming, Renderer};
use crate::selection::picking::{RayCaster, SphereCaster};

/// Result of an animation callback that ran a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub frame: FrameOutput,
    /// Progress fraction to push to the scrubber, when one is due.
    pub progress: Option<f32>,
}

/// Wires the step function to a frame-driven host loop.
///
/// Animation callbacks arrive at display rate; the driver ticks the
/// simulation at most once per configured interval, buffers input between
/// ticks, rate-limits scrubber updates, and refuses all work after teardown.
pub struct SimulationDriver {
    state: SimulationState,
    input: InputQueue,
    throttle: TickThrottle,
    progress: ProgressThrottle,
    caster: Box<dyn RayCaster>,
    frame_counter: u64,
    torn_down: bool,
}

impl SimulationDriver {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_caster(config, Box::new(SphereCaster))
    }

    /// Use a renderer-supplied ray caster instead of the sphere default.
    pub fn with_caster(config: EngineConfig, caster: Box<dyn RayCaster>) -> Self {
        let throttle = TickThrottle::new(config.tick_interval, config.max_tick_dt);
        let progress = ProgressThrottle::new(config.progress_interval);
        Self {
            state: SimulationState::new(config),
            input: InputQueue::new(),
            throttle,
            progress,
            caster,
            frame_counter: 0,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable engine state, for fetch results and direct setters.
    /// `None` after teardown.
    pub fn state_mut(&mut self) -> Option<&mut SimulationState> {
        (!self.torn_down).then_some(&mut self.state)
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Queue an input event for the next tick. Dropped after teardown.
    pub fn push_input(&mut self, event: InputEvent) {
        if !self.torn_down {
            self.input.push(event);
        }
    }

    /// Animation callback. Runs a tick when one is due.
    pub fn on_animation_frame(&mut self, frame_dt: f32) -> Option<TickReport> {
        if self.torn_down {
            return None;
        }
        let dt = self.throttle.accumulate(frame_dt)?;
        let events = self.input.drain();
        let frame = self.state.advance(dt, &events, self.caster.as_ref());
        self.frame_counter += 1;
        let progress = self.progress.poll(dt, frame.progress);
        Some(TickReport { frame, progress })
    }

    /// Hand the last tick to a renderer.
    pub fn render(&self, renderer: &mut dyn Renderer) -> Option<DrawTiming> {
        if self.torn_down {
            return None;
        }
        Some(renderer.draw(&self.state.frame_data()))
    }

    /// Stop ticking and drop pending input. Call before releasing renderer
    /// resources; afterwards every entry point is a no-op.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.input.clear();
        self.throttle.reset();
        info!("driver: torn down after {} ticks", self.frame_counter);
    }
}

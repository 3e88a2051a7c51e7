//! Interaction state machine.
//!
//! `Interaction` owns the face model and reject counter and decides what each
//! click, pointer event and frame does. It never touches the DOM directly:
//! visual effects go through a [`Surface`] and loop start/stop requests are
//! returned as [`LoopControl`] for the controller that owns the frame loop.
//!
//! ```text
//!            happy click                       unhappy click (count < max)
//!   Animating ─────────────► Settled(Happy)     ┌──────────┐
//!       ▲  │ unhappy click (count == max)       │  evade   │
//!       │  └──────────────► Settled(Unhappy)    └──► Animating
//!       └──── any click while Settled (count := 0, normal preset)
//! ```

use log::{debug, info};

use crate::config::{NamedState, WidgetConfig};
use crate::face::FaceParameters;
use crate::pointer::{self, PointerSample};
use crate::presentation::{self, Button, Surface};
use crate::random::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Buttons live, face tracks the pointer, frame loop running.
    Animating,
    /// Terminal display for `happy` or `unhappy`; loop stopped, one button hidden.
    Settled(NamedState),
}

/// What the frame loop owner must do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Keep,
    Start,
    Stop,
}

#[derive(Clone, Debug)]
pub struct Interaction {
    config: WidgetConfig,
    current: FaceParameters,
    target: FaceParameters,
    reject_count: u32,
    phase: Phase,
}

impl Interaction {
    /// Starts in `Animating` with both faces at the normal preset.
    pub fn new(config: WidgetConfig) -> Self {
        let normal = config.normal.face;
        Self {
            config,
            current: normal,
            target: normal,
            reject_count: 0,
            phase: Phase::Animating,
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn current(&self) -> &FaceParameters {
        &self.current
    }

    pub fn target(&self) -> &FaceParameters {
        &self.target
    }

    pub fn reject_count(&self) -> u32 {
        self.reject_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == Phase::Animating
    }

    /// One animation frame. Syncs the surface only if something moved.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let changed = self.current.ease_toward(
            &self.target,
            self.config.animation_speed,
            self.config.snap_epsilon,
        );
        if changed {
            presentation::sync_face(surface, &self.current);
        }
        changed
    }

    pub fn on_pointer_move(&mut self, sample: &PointerSample) {
        self.target = pointer::track(sample, self.config.proximity_exponent);
    }

    pub fn on_pointer_leave(&mut self) {
        self.target = self.config.normal.face;
    }

    pub fn on_happy_click<S: Surface + ?Sized>(&mut self, surface: &mut S) -> LoopControl {
        match self.phase {
            Phase::Animating => {
                surface.set_happy_scale(1.0);
                self.settle(surface, NamedState::Happy, Button::Unhappy);
                LoopControl::Stop
            }
            Phase::Settled(_) => self.resume(surface),
        }
    }

    pub fn on_unhappy_click<S, R>(&mut self, surface: &mut S, rng: &mut R) -> LoopControl
    where
        S: Surface + ?Sized,
        R: RandomSource + ?Sized,
    {
        if let Phase::Settled(_) = self.phase {
            return self.resume(surface);
        }

        self.reject_count += 1;
        if self.reject_count >= self.config.max_unhappy_count {
            self.settle(surface, NamedState::Unhappy, Button::Happy);
            return LoopControl::Stop;
        }

        let range = self.config.evade_range_percent;
        let left = rng.next_unit() * range;
        let top = rng.next_unit() * range;
        surface.place_unhappy(left, top);
        self.target.happiness =
            (self.target.happiness - self.config.happiness_step).max(self.config.happiness_floor);
        let scale = 1.0 + f64::from(self.reject_count) * self.config.happy_scale_step;
        surface.set_happy_scale(scale);
        debug!(
            "reject {} of {}: evaded to ({left:.1}%, {top:.1}%), happy scale {scale:.2}",
            self.reject_count, self.config.max_unhappy_count
        );
        LoopControl::Keep
    }

    fn settle<S: Surface + ?Sized>(&mut self, surface: &mut S, state: NamedState, hide: Button) {
        self.phase = Phase::Settled(state);
        self.apply_preset(surface, state);
        surface.set_visible(hide, false);
        presentation::sync_face(surface, &self.current);
        info!("settled: {} after {} rejects", state.name(), self.reject_count);
    }

    fn resume<S: Surface + ?Sized>(&mut self, surface: &mut S) -> LoopControl {
        self.reject_count = 0;
        self.phase = Phase::Animating;
        self.apply_preset(surface, NamedState::Normal);
        presentation::reset_buttons(surface);
        presentation::sync_face(surface, &self.current);
        info!("back to normal");
        LoopControl::Start
    }

    /// Snap the rendered pose to the preset and swap in its text.
    fn apply_preset<S: Surface + ?Sized>(&mut self, surface: &mut S, state: NamedState) {
        let preset = self.config.preset(state);
        self.current = preset.face;
        presentation::apply_ui_text(surface, &preset.ui);
    }
}

//! Face model: the four visual parameters and the per-frame easing rule.
//!
//! Two `FaceParameters` live in the widget: `current` (what is rendered) and
//! `target` (what the pointer / state machine wants). Each frame moves
//! `current` a fixed fraction of the remaining distance toward `target`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fraction of the remaining distance covered per frame.
pub const ANIMATION_SPEED: f64 = 0.1;
/// Below this gap a parameter snaps to its target instead of easing forever.
pub const SNAP_EPSILON: f64 = 0.01;

/// Visual pose of the face. All fields are nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceParameters {
    pub happiness: f64,
    pub derp: f64,
    pub px: f64,
    pub py: f64,
}

/// Names a single field of [`FaceParameters`]; doubles as the CSS variable name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceParam {
    Happiness,
    Derp,
    Px,
    Py,
}

impl FaceParam {
    pub const ALL: [FaceParam; 4] = [
        FaceParam::Happiness,
        FaceParam::Derp,
        FaceParam::Px,
        FaceParam::Py,
    ];

    /// Custom property written on the face element, e.g. `--happiness`.
    pub fn css_var(self) -> &'static str {
        match self {
            FaceParam::Happiness => "--happiness",
            FaceParam::Derp => "--derp",
            FaceParam::Px => "--px",
            FaceParam::Py => "--py",
        }
    }
}

impl FaceParameters {
    pub const fn new(happiness: f64, derp: f64, px: f64, py: f64) -> Self {
        Self { happiness, derp, px, py }
    }

    pub fn get(&self, param: FaceParam) -> f64 {
        match param {
            FaceParam::Happiness => self.happiness,
            FaceParam::Derp => self.derp,
            FaceParam::Px => self.px,
            FaceParam::Py => self.py,
        }
    }

    pub fn get_mut(&mut self, param: FaceParam) -> &mut f64 {
        match param {
            FaceParam::Happiness => &mut self.happiness,
            FaceParam::Derp => &mut self.derp,
            FaceParam::Px => &mut self.px,
            FaceParam::Py => &mut self.py,
        }
    }

    /// Iterate `(param, value)` pairs in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (FaceParam, f64)> + '_ {
        FaceParam::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// Ease every field one frame toward `target`. Returns true if any field moved.
    pub fn ease_toward(&mut self, target: &FaceParameters, speed: f64, epsilon: f64) -> bool {
        let mut changed = false;
        for param in FaceParam::ALL {
            let goal = target.get(param);
            let value = self.get_mut(param);
            if *value == goal {
                continue;
            }
            changed = true;
            *value = ease_value(*value, goal, speed, epsilon);
        }
        changed
    }
}

/// One easing step for a single scalar.
pub fn ease_value(current: f64, target: f64, speed: f64, epsilon: f64) -> f64 {
    let gap = target - current;
    if gap.abs() < epsilon {
        target
    } else {
        current + gap * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_when_gap_below_epsilon() {
        let mut cur = FaceParameters::new(0.995, 0.0, 0.5, 0.5);
        let target = FaceParameters::new(1.0, 0.0, 0.5, 0.5);
        assert!(cur.ease_toward(&target, ANIMATION_SPEED, SNAP_EPSILON));
        assert_eq!(cur.happiness, 1.0);
    }

    #[test]
    fn gap_shrinks_without_overshoot() {
        let mut value: f64 = 0.0;
        let target: f64 = 1.0;
        let mut gap = (target - value).abs();
        for _ in 0..200 {
            value = ease_value(value, target, ANIMATION_SPEED, SNAP_EPSILON);
            let next_gap = (target - value).abs();
            assert!(value <= target, "overshot: {value}");
            if next_gap == 0.0 {
                return;
            }
            assert!(next_gap < gap);
            gap = next_gap;
        }
        panic!("did not converge in 200 frames");
    }

    #[test]
    fn converges_downward_too() {
        let mut cur = FaceParameters::new(0.9, 1.0, 0.5, 0.5);
        let target = FaceParameters::new(0.1, 0.0, 0.2, 0.8);
        let mut frames = 0;
        while cur.ease_toward(&target, ANIMATION_SPEED, SNAP_EPSILON) {
            frames += 1;
            assert!(frames < 200);
        }
        assert_eq!(cur, target);
    }

    #[test]
    fn no_change_reported_when_equal() {
        let mut cur = FaceParameters::new(0.9, 1.0, 0.5, 0.5);
        let target = cur;
        assert!(!cur.ease_toward(&target, ANIMATION_SPEED, SNAP_EPSILON));
    }

    #[test]
    fn css_var_names() {
        let names: Vec<_> = FaceParam::ALL.iter().map(|p| p.css_var()).collect();
        assert_eq!(names, ["--happiness", "--derp", "--px", "--py"]);
    }
}

//! Widget configuration: presets for each named state plus the tuning knobs
//! of the interaction. `Default` reproduces the original page.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::face::{ANIMATION_SPEED, FaceParameters, SNAP_EPSILON};

/// The three named presets the widget moves between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NamedState {
    Normal,
    Happy,
    Unhappy,
}

impl NamedState {
    pub fn name(self) -> &'static str {
        match self {
            NamedState::Normal => "normal",
            NamedState::Happy => "happy",
            NamedState::Unhappy => "unhappy",
        }
    }
}

/// Partial text override. `None` leaves the element's current text in place.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct UiText {
    pub btn_happy_text: Option<String>,
    pub btn_unhappy_text: Option<String>,
    pub title_text: Option<String>,
    pub subtitle_text: Option<String>,
}

impl UiText {
    /// Fill every `None` field from `fallback`, keeping fields already set.
    pub fn or_fill(mut self, fallback: UiText) -> UiText {
        self.btn_happy_text = self.btn_happy_text.or(fallback.btn_happy_text);
        self.btn_unhappy_text = self.btn_unhappy_text.or(fallback.btn_unhappy_text);
        self.title_text = self.title_text.or(fallback.title_text);
        self.subtitle_text = self.subtitle_text.or(fallback.subtitle_text);
        self
    }
}

/// Face pose and text applied together on a state transition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct Preset {
    pub face: FaceParameters,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ui: UiText,
}

/// CSS selectors used to locate the widget's elements on the page.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Selectors {
    pub container: String,
    pub face: String,
    pub btn_happy: String,
    pub btn_unhappy: String,
    pub title: String,
    pub subtitle: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            container: ".container".into(),
            face: ".face-slider".into(),
            btn_happy: ".button-happy".into(),
            btn_unhappy: ".button-unhappy".into(),
            title: ".title".into(),
            subtitle: ".subtitle".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct WidgetConfig {
    /// Unhappy clicks (while animating) that settle into the unhappy state.
    pub max_unhappy_count: u32,
    pub animation_speed: f64,
    pub snap_epsilon: f64,
    /// The evasive button lands within this percentage of its container on each axis.
    pub evade_range_percent: f64,
    /// Target happiness lost per non-settling unhappy click.
    pub happiness_step: f64,
    pub happiness_floor: f64,
    /// Happy button grows by this much per reject.
    pub happy_scale_step: f64,
    /// Exponent of the proximity curve; below 1 pushes values toward the extremes.
    pub proximity_exponent: f64,
    pub normal: Preset,
    pub happy: Preset,
    pub unhappy: Preset,
    pub selectors: Selectors,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            max_unhappy_count: 3,
            animation_speed: ANIMATION_SPEED,
            snap_epsilon: SNAP_EPSILON,
            evade_range_percent: 80.0,
            happiness_step: 0.1,
            happiness_floor: 0.1,
            happy_scale_step: 0.2,
            proximity_exponent: 0.75,
            // Normal text is captured from the page markup at mount.
            normal: Preset {
                face: FaceParameters::new(0.9, 1.0, 0.5, 0.5),
                ui: UiText::default(),
            },
            happy: Preset {
                face: FaceParameters::new(1.0, 0.0, 0.5, 0.5),
                ui: UiText {
                    btn_happy_text: Some("❤️".into()),
                    btn_unhappy_text: None,
                    title_text: Some("太好了！".into()),
                    subtitle_text: Some("我们在一起吧！".into()),
                },
            },
            unhappy: Preset {
                face: FaceParameters::new(0.2, 0.0, 0.5, 0.5),
                ui: UiText {
                    btn_happy_text: None,
                    btn_unhappy_text: Some("再考虑一下".into()),
                    title_text: Some("不要拒绝我嘛".into()),
                    subtitle_text: Some("再给我一次机会好不好".into()),
                },
            },
            selectors: Selectors::default(),
        }
    }
}

impl WidgetConfig {
    pub fn preset(&self, state: NamedState) -> &Preset {
        match state {
            NamedState::Normal => &self.normal,
            NamedState::Happy => &self.happy,
            NamedState::Unhappy => &self.unhappy,
        }
    }

    /// Parse and validate a JSON config; missing fields take their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WidgetConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stop the face from snapping, make it overshoot,
    /// or push a target outside `[0, 1]`. NaN fails every check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("animation_speed", "in (0, 1]", self.animation_speed, |v| v > 0.0 && v <= 1.0)?;
        check("snap_epsilon", "> 0", self.snap_epsilon, |v| v > 0.0 && v.is_finite())?;
        check(
            "max_unhappy_count",
            ">= 1",
            f64::from(self.max_unhappy_count),
            |v| v >= 1.0,
        )?;
        check("evade_range_percent", "in [0, 100]", self.evade_range_percent, |v| {
            (0.0..=100.0).contains(&v)
        })?;
        check("happiness_step", "in [0, 1]", self.happiness_step, unit)?;
        check("happiness_floor", "in [0, 1]", self.happiness_floor, unit)?;
        check("happy_scale_step", ">= 0", self.happy_scale_step, |v| {
            v >= 0.0 && v.is_finite()
        })?;
        check("proximity_exponent", "> 0", self.proximity_exponent, |v| {
            v > 0.0 && v.is_finite()
        })?;
        for state in [NamedState::Normal, NamedState::Happy, NamedState::Unhappy] {
            let face = &self.preset(state).face;
            let fields = preset_fields(state);
            check(fields[0], "in [0, 1]", face.happiness, unit)?;
            check(fields[1], "in [0, 1]", face.derp, unit)?;
            check(fields[2], "in [0, 1]", face.px, unit)?;
            check(fields[3], "in [0, 1]", face.py, unit)?;
        }
        Ok(())
    }
}

fn unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

fn check(
    field: &'static str,
    rule: &'static str,
    value: f64,
    ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
    if ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, rule, value })
    }
}

fn preset_fields(state: NamedState) -> [&'static str; 4] {
    match state {
        NamedState::Normal => [
            "normal.face.happiness",
            "normal.face.derp",
            "normal.face.px",
            "normal.face.py",
        ],
        NamedState::Happy => [
            "happy.face.happiness",
            "happy.face.derp",
            "happy.face.px",
            "happy.face.py",
        ],
        NamedState::Unhappy => [
            "unhappy.face.happiness",
            "unhappy.face.derp",
            "unhappy.face.px",
            "unhappy.face.py",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_presets_match_page() {
        let cfg = WidgetConfig::default();
        assert_eq!(cfg.max_unhappy_count, 3);
        assert_eq!(cfg.preset(NamedState::Normal).face, FaceParameters::new(0.9, 1.0, 0.5, 0.5));
        assert_eq!(cfg.preset(NamedState::Happy).face.happiness, 1.0);
        assert_eq!(cfg.preset(NamedState::Unhappy).face.happiness, 0.2);
        assert!(cfg.happy.ui.btn_unhappy_text.is_none());
        assert!(cfg.unhappy.ui.btn_happy_text.is_none());
    }

    #[test]
    fn or_fill_keeps_explicit_fields() {
        let explicit = UiText {
            title_text: Some("mine".into()),
            ..UiText::default()
        };
        let page = UiText {
            btn_happy_text: Some("yes".into()),
            btn_unhappy_text: Some("no".into()),
            title_text: Some("page title".into()),
            subtitle_text: Some("page sub".into()),
        };
        let filled = explicit.or_fill(page);
        assert_eq!(filled.title_text.as_deref(), Some("mine"));
        assert_eq!(filled.btn_happy_text.as_deref(), Some("yes"));
        assert_eq!(filled.subtitle_text.as_deref(), Some("page sub"));
    }

    fn rejected_field(cfg: &WidgetConfig) -> &'static str {
        match cfg.validate() {
            Err(ConfigError::OutOfRange { field, .. }) => field,
            other => panic!("expected a range error, got {other:?}"),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(WidgetConfig::default().validate().is_ok());
    }

    #[test]
    fn speed_must_be_a_fraction() {
        for speed in [0.0, -0.1, 1.9, f64::NAN] {
            let cfg = WidgetConfig {
                animation_speed: speed,
                ..WidgetConfig::default()
            };
            assert_eq!(rejected_field(&cfg), "animation_speed");
        }
        let cfg = WidgetConfig {
            animation_speed: 1.0,
            ..WidgetConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn epsilon_must_be_positive() {
        for eps in [0.0, -0.01, f64::INFINITY] {
            let cfg = WidgetConfig {
                snap_epsilon: eps,
                ..WidgetConfig::default()
            };
            assert_eq!(rejected_field(&cfg), "snap_epsilon");
        }
    }

    #[test]
    fn at_least_one_reject_required() {
        let cfg = WidgetConfig {
            max_unhappy_count: 0,
            ..WidgetConfig::default()
        };
        assert_eq!(rejected_field(&cfg), "max_unhappy_count");
    }

    #[test]
    fn floor_and_step_stay_in_unit_range() {
        let cfg = WidgetConfig {
            happiness_floor: 1.5,
            ..WidgetConfig::default()
        };
        assert_eq!(rejected_field(&cfg), "happiness_floor");
        let cfg = WidgetConfig {
            happiness_step: -0.1,
            ..WidgetConfig::default()
        };
        assert_eq!(rejected_field(&cfg), "happiness_step");
    }

    #[test]
    fn other_knobs_are_checked() {
        let cfg = WidgetConfig {
            evade_range_percent: 120.0,
            ..WidgetConfig::default()
        };
        assert_eq!(rejected_field(&cfg), "evade_range_percent");
        let cfg = WidgetConfig {
            happy_scale_step: -1.0,
            ..WidgetConfig::default()
        };
        assert_eq!(rejected_field(&cfg), "happy_scale_step");
        let cfg = WidgetConfig {
            proximity_exponent: 0.0,
            ..WidgetConfig::default()
        };
        assert_eq!(rejected_field(&cfg), "proximity_exponent");
    }

    #[test]
    fn preset_faces_stay_in_unit_range() {
        let mut cfg = WidgetConfig::default();
        cfg.happy.face.happiness = 1.2;
        assert_eq!(rejected_field(&cfg), "happy.face.happiness");
        let mut cfg = WidgetConfig::default();
        cfg.unhappy.face.derp = -0.5;
        assert_eq!(rejected_field(&cfg), "unhappy.face.derp");
        let mut cfg = WidgetConfig::default();
        cfg.normal.face.py = 2.0;
        assert_eq!(rejected_field(&cfg), "normal.face.py");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_values_are_validated() {
        for (json, field) in [
            (r#"{"snap_epsilon":0}"#, "snap_epsilon"),
            (r#"{"animation_speed":1.9}"#, "animation_speed"),
            (r#"{"max_unhappy_count":0}"#, "max_unhappy_count"),
            (r#"{"happiness_floor":-1}"#, "happiness_floor"),
        ] {
            match WidgetConfig::from_json(json) {
                Err(ConfigError::OutOfRange { field: got, .. }) => assert_eq!(got, field),
                other => panic!("{json} should be rejected, got {other:?}"),
            }
        }
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_overrides_merge_with_defaults() {
        let cfg = WidgetConfig::from_json(r#"{"max_unhappy_count":5,"selectors":{"title":"h1"}}"#)
            .expect("valid json");
        assert_eq!(cfg.max_unhappy_count, 5);
        assert_eq!(cfg.selectors.title, "h1");
        assert_eq!(cfg.selectors.container, ".container");
        assert_eq!(cfg.happy, WidgetConfig::default().happy);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_rejects_unknown_fields() {
        assert!(matches!(
            WidgetConfig::from_json(r#"{"max_unhapy_count":5}"#),
            Err(ConfigError::Json(_))
        ));
    }
}

//! Presentation sync: pushes face parameters and preset text onto a [`Surface`].
//!
//! The browser implementation lives in `dom`; tests use an in-memory surface.

use crate::config::UiText;
use crate::face::{FaceParam, FaceParameters};

/// One of the two interactive controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Happy,
    Unhappy,
}

/// One of the four text slots a preset may override.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSlot {
    HappyButton,
    UnhappyButton,
    Title,
    Subtitle,
}

/// Rendering target the widget writes into.
pub trait Surface {
    fn set_face_var(&mut self, param: FaceParam, value: f64);
    fn set_text(&mut self, slot: TextSlot, text: &str);
    fn set_visible(&mut self, button: Button, visible: bool);
    /// Take the unhappy button out of flow at `left%`/`top%` of its container.
    fn place_unhappy(&mut self, left_percent: f64, top_percent: f64);
    /// Put the unhappy button back into static flow.
    fn restore_unhappy(&mut self);
    fn set_happy_scale(&mut self, scale: f64);
}

pub fn sync_face<S: Surface + ?Sized>(surface: &mut S, face: &FaceParameters) {
    for (param, value) in face.entries() {
        surface.set_face_var(param, value);
    }
}

/// Overwrite only the slots the preset defines.
pub fn apply_ui_text<S: Surface + ?Sized>(surface: &mut S, ui: &UiText) {
    let slots = [
        (TextSlot::HappyButton, &ui.btn_happy_text),
        (TextSlot::UnhappyButton, &ui.btn_unhappy_text),
        (TextSlot::Title, &ui.title_text),
        (TextSlot::Subtitle, &ui.subtitle_text),
    ];
    for (slot, text) in slots {
        if let Some(text) = text {
            surface.set_text(slot, text);
        }
    }
}

/// Both buttons visible, unhappy button back in flow, happy button unscaled.
pub fn reset_buttons<S: Surface + ?Sized>(surface: &mut S) {
    surface.set_visible(Button::Happy, true);
    surface.set_visible(Button::Unhappy, true);
    surface.restore_unhappy();
    surface.set_happy_scale(1.0);
}

/// Surface that records the last value written to every slot.
#[derive(Clone, Debug, PartialEq)]
pub struct MemorySurface {
    pub face: FaceParameters,
    pub face_writes: usize,
    pub happy_text: String,
    pub unhappy_text: String,
    pub title: String,
    pub subtitle: String,
    pub happy_visible: bool,
    pub unhappy_visible: bool,
    /// `Some((left%, top%))` while the unhappy button is out of flow.
    pub unhappy_position: Option<(f64, f64)>,
    pub happy_scale: f64,
}

impl MemorySurface {
    pub fn new(initial: &UiText, face: FaceParameters) -> Self {
        let text = |t: &Option<String>| t.clone().unwrap_or_default();
        Self {
            face,
            face_writes: 0,
            happy_text: text(&initial.btn_happy_text),
            unhappy_text: text(&initial.btn_unhappy_text),
            title: text(&initial.title_text),
            subtitle: text(&initial.subtitle_text),
            happy_visible: true,
            unhappy_visible: true,
            unhappy_position: None,
            happy_scale: 1.0,
        }
    }
}

impl Surface for MemorySurface {
    fn set_face_var(&mut self, param: FaceParam, value: f64) {
        *self.face.get_mut(param) = value;
        self.face_writes += 1;
    }

    fn set_text(&mut self, slot: TextSlot, text: &str) {
        let field = match slot {
            TextSlot::HappyButton => &mut self.happy_text,
            TextSlot::UnhappyButton => &mut self.unhappy_text,
            TextSlot::Title => &mut self.title,
            TextSlot::Subtitle => &mut self.subtitle,
        };
        *field = text.to_owned();
    }

    fn set_visible(&mut self, button: Button, visible: bool) {
        match button {
            Button::Happy => self.happy_visible = visible,
            Button::Unhappy => self.unhappy_visible = visible,
        }
    }

    fn place_unhappy(&mut self, left_percent: f64, top_percent: f64) {
        self.unhappy_position = Some((left_percent, top_percent));
    }

    fn restore_unhappy(&mut self) {
        self.unhappy_position = None;
    }

    fn set_happy_scale(&mut self, scale: f64) {
        self.happy_scale = scale;
    }
}

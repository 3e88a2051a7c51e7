//! Browser wiring: finds the page elements, implements [`Surface`] over them
//! and attaches the pointer / click listeners that drive the state machine.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, MouseEvent, window};

use crate::config::{UiText, WidgetConfig};
use crate::error::{MountError, js_message};
use crate::face::FaceParam;
use crate::frame::FrameLoop;
use crate::machine::{Interaction, LoopControl};
use crate::pointer::{PointerSample, Rect};
use crate::presentation::{self, Button, Surface, TextSlot};
use crate::random::BrowserRandom;

/// The six elements the widget reads from and writes to.
#[derive(Clone)]
struct Elements {
    container: HtmlElement,
    face: HtmlElement,
    btn_happy: HtmlElement,
    btn_unhappy: HtmlElement,
    title: HtmlElement,
    subtitle: HtmlElement,
}

impl Elements {
    fn find(doc: &Document, config: &WidgetConfig) -> Result<Self, MountError> {
        let s = &config.selectors;
        Ok(Self {
            container: query(doc, &s.container)?,
            face: query(doc, &s.face)?,
            btn_happy: query(doc, &s.btn_happy)?,
            btn_unhappy: query(doc, &s.btn_unhappy)?,
            title: query(doc, &s.title)?,
            subtitle: query(doc, &s.subtitle)?,
        })
    }

    /// Text currently in the page; becomes the normal preset's text.
    fn capture_text(&self) -> UiText {
        UiText {
            btn_happy_text: Some(self.btn_happy.inner_html()),
            btn_unhappy_text: Some(self.btn_unhappy.inner_html()),
            title_text: Some(self.title.inner_html()),
            subtitle_text: Some(self.subtitle.inner_html()),
        }
    }

    fn sample(&self, evt: &MouseEvent) -> PointerSample {
        PointerSample {
            x: f64::from(evt.client_x()),
            y: f64::from(evt.client_y()),
            container: rect(&self.container),
            happy: rect(&self.btn_happy),
            unhappy: rect(&self.btn_unhappy),
        }
    }
}

fn query(doc: &Document, selector: &str) -> Result<HtmlElement, MountError> {
    let found = doc
        .query_selector(selector)
        .map_err(|e| MountError::BadSelector {
            selector: selector.to_owned(),
            message: js_message(&e),
        })?
        .ok_or_else(|| MountError::MissingElement(selector.to_owned()))?;
    found
        .dyn_into::<HtmlElement>()
        .map_err(|_| MountError::NotHtmlElement(selector.to_owned()))
}

fn rect(el: &HtmlElement) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.x(), r.y(), r.width(), r.height())
}

/// [`Surface`] backed by live DOM elements.
pub struct DomSurface {
    elements: Elements,
}

impl DomSurface {
    fn style(el: &HtmlElement, property: &str, value: &str) {
        if let Err(err) = el.style().set_property(property, value) {
            log::warn!("failed to set {property}={value}: {}", js_message(&err));
        }
    }

    fn clear_style(el: &HtmlElement, property: &str) {
        if let Err(err) = el.style().remove_property(property) {
            log::warn!("failed to clear {property}: {}", js_message(&err));
        }
    }

    fn button(&self, button: Button) -> &HtmlElement {
        match button {
            Button::Happy => &self.elements.btn_happy,
            Button::Unhappy => &self.elements.btn_unhappy,
        }
    }
}

impl Surface for DomSurface {
    fn set_face_var(&mut self, param: FaceParam, value: f64) {
        Self::style(&self.elements.face, param.css_var(), &value.to_string());
    }

    fn set_text(&mut self, slot: TextSlot, text: &str) {
        let el = match slot {
            TextSlot::HappyButton => &self.elements.btn_happy,
            TextSlot::UnhappyButton => &self.elements.btn_unhappy,
            TextSlot::Title => &self.elements.title,
            TextSlot::Subtitle => &self.elements.subtitle,
        };
        el.set_inner_html(text);
    }

    fn set_visible(&mut self, button: Button, visible: bool) {
        let value = if visible { "visible" } else { "hidden" };
        Self::style(self.button(button), "visibility", value);
    }

    fn place_unhappy(&mut self, left_percent: f64, top_percent: f64) {
        let el = &self.elements.btn_unhappy;
        Self::style(el, "position", "absolute");
        Self::style(el, "left", &format!("{left_percent}%"));
        Self::style(el, "top", &format!("{top_percent}%"));
    }

    fn restore_unhappy(&mut self) {
        let el = &self.elements.btn_unhappy;
        Self::style(el, "position", "static");
        Self::clear_style(el, "left");
        Self::clear_style(el, "top");
    }

    fn set_happy_scale(&mut self, scale: f64) {
        Self::style(&self.elements.btn_happy, "transform", &format!("scale({scale})"));
    }
}

/// Everything a listener needs; shared between the closures and the frame loop.
struct Widget {
    interaction: Interaction,
    surface: DomSurface,
    rng: BrowserRandom,
}

impl Widget {
    fn tick(&mut self) {
        self.interaction.tick(&mut self.surface);
    }
}

/// A mounted widget. The page's listeners keep it alive; dropping the handle
/// does not unmount anything.
pub struct Mounted {
    widget: Rc<RefCell<Widget>>,
    frames: Rc<FrameLoop>,
}

#[allow(dead_code)]
impl Mounted {
    fn loop_running(&self) -> bool {
        self.frames.is_running()
    }

    fn phase(&self) -> crate::machine::Phase {
        self.widget.borrow().interaction.phase()
    }
}

/// Locate the elements, attach listeners and start the frame loop.
pub fn mount(mut config: WidgetConfig) -> Result<Mounted, MountError> {
    config.validate()?;
    let win = window().ok_or(MountError::NoWindow)?;
    let doc = win.document().ok_or(MountError::NoDocument)?;
    let elements = Elements::find(&doc, &config)?;

    config.normal.ui = std::mem::take(&mut config.normal.ui).or_fill(elements.capture_text());

    let widget = Rc::new(RefCell::new(Widget {
        interaction: Interaction::new(config),
        surface: DomSurface {
            elements: elements.clone(),
        },
        rng: BrowserRandom::new(),
    }));

    let frames = {
        let widget = widget.clone();
        Rc::new(FrameLoop::new(move |_ts: f64| {
            if let Ok(mut w) = widget.try_borrow_mut() {
                w.tick();
            }
        }))
    };

    // Pointer movement over the container retargets the face.
    {
        let widget = widget.clone();
        let els = elements.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let sample = els.sample(&evt);
            widget.borrow_mut().interaction.on_pointer_move(&sample);
        }) as Box<dyn FnMut(_)>);
        listen(&elements.container, "mousemove", closure)?;
    }
    {
        let widget = widget.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            widget.borrow_mut().interaction.on_pointer_leave();
        }) as Box<dyn FnMut(_)>);
        listen(&elements.container, "mouseleave", closure)?;
    }

    // Button clicks
    {
        let widget = widget.clone();
        let frames = frames.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            let control = {
                let mut w = widget.borrow_mut();
                let Widget { interaction, surface, .. } = &mut *w;
                interaction.on_happy_click(surface)
            };
            drive(&widget, &frames, control);
        }) as Box<dyn FnMut(_)>);
        listen(&elements.btn_happy, "click", closure)?;
    }
    {
        let widget = widget.clone();
        let frames = frames.clone();
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            let control = {
                let mut w = widget.borrow_mut();
                let Widget { interaction, surface, rng } = &mut *w;
                interaction.on_unhappy_click(surface, rng)
            };
            drive(&widget, &frames, control);
        }) as Box<dyn FnMut(_)>);
        listen(&elements.btn_unhappy, "click", closure)?;
    }

    {
        let mut w = widget.borrow_mut();
        let Widget { interaction, surface, .. } = &mut *w;
        presentation::sync_face(surface, interaction.current());
    }
    drive(&widget, &frames, LoopControl::Start);
    log::info!("mounted on `{}`", widget.borrow().interaction.config().selectors.container);
    Ok(Mounted { widget, frames })
}

/// Apply a loop request from the state machine. A (re)start runs the first
/// frame immediately, then hands over to the display refresh.
fn drive(widget: &Rc<RefCell<Widget>>, frames: &FrameLoop, control: LoopControl) {
    match control {
        LoopControl::Keep => {}
        LoopControl::Stop => frames.stop(),
        LoopControl::Start => {
            widget.borrow_mut().tick();
            frames.start();
        }
    }
}

fn listen(
    target: &HtmlElement,
    event: &'static str,
    closure: Closure<dyn FnMut(MouseEvent)>,
) -> Result<(), MountError> {
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| MountError::Listener {
            event,
            message: js_message(&e),
        })?;
    // Listeners live for the page lifetime.
    closure.forget();
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::config::NamedState;
    use crate::machine::Phase;
    use wasm_bindgen_test::*;

    const MARKUP: &str = r#"
<div class="container" style="position:relative;width:600px;height:400px">
  <div class="face-slider"></div>
  <h1 class="title">Will you?</h1>
  <p class="subtitle">think carefully</p>
  <button class="button-happy">Yes</button>
  <button class="button-unhappy">No</button>
</div>
"#;

    fn fresh_page() -> Document {
        let doc = window().unwrap().document().unwrap();
        doc.body().unwrap().set_inner_html(MARKUP);
        doc
    }

    fn button(doc: &Document, selector: &str) -> HtmlElement {
        doc.query_selector(selector)
            .unwrap()
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn loop_stops_on_settle_and_restarts_on_resume() {
        let doc = fresh_page();
        let mounted = mount(WidgetConfig::default()).expect("mount");
        assert!(mounted.loop_running());

        let happy = button(&doc, ".button-happy");
        happy.click();
        assert_eq!(mounted.phase(), Phase::Settled(NamedState::Happy));
        assert!(!mounted.loop_running());

        happy.click();
        assert_eq!(mounted.phase(), Phase::Animating);
        assert!(mounted.loop_running());
        let pending = mounted.frames.pending_id();

        // A reject that does not settle leaves the single pending frame alone.
        button(&doc, ".button-unhappy").click();
        assert_eq!(mounted.frames.pending_id(), pending);
        mounted.frames.stop();
    }

    #[wasm_bindgen_test]
    fn invalid_config_is_refused_before_touching_the_page() {
        fresh_page();
        let config = WidgetConfig {
            snap_epsilon: 0.0,
            ..WidgetConfig::default()
        };
        assert!(matches!(mount(config), Err(MountError::Config(_))));
    }
}

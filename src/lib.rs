//! Mood Face core crate.
//!
//! An animated face sits between a "happy" and an "unhappy" button and leans
//! toward whichever one the cursor is closer to. The unhappy button dodges
//! clicks while the happy one grows; enough rejects (or one accept) settle the
//! widget into a terminal display until the next click.
//!
//! The face itself is drawn by the host page's stylesheet from four CSS
//! custom properties (`--happiness`, `--derp`, `--px`, `--py`) written on the
//! face element every frame they change.
//!
//! Everything except `dom`, `frame` and `logging` is plain Rust and runs under
//! native `cargo test`.

use wasm_bindgen::prelude::*;

pub mod config;
mod dom;
pub mod error;
pub mod face;
mod frame;
mod logging;
pub mod machine;
pub mod pointer;
pub mod presentation;
pub mod random;

pub use config::{NamedState, Preset, Selectors, UiText, WidgetConfig};
pub use error::{ConfigError, MountError};
pub use face::{FaceParam, FaceParameters};
pub use machine::{Interaction, LoopControl, Phase};
pub use pointer::{PointerSample, Rect};
pub use presentation::{Button, MemorySurface, Surface, TextSlot};
pub use random::{BrowserRandom, FixedRandom, RandomSource};

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Mount the widget on the page using the default selectors and presets.
#[wasm_bindgen]
pub fn start_widget() -> Result<(), JsValue> {
    dom::mount(WidgetConfig::default())?;
    Ok(())
}

/// Mount with a JSON [`WidgetConfig`]; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_widget_with_config(json: &str) -> Result<(), JsValue> {
    let config = WidgetConfig::from_json(json).map_err(MountError::from)?;
    dom::mount(config)?;
    Ok(())
}

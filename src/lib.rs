use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Math;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub mod config;
pub mod constants;
pub mod dom;
pub mod driver;
pub mod error;
pub mod logging;
pub mod page;
pub mod particle;
pub mod resume;
pub mod scheduler;
pub mod spatial_grid;
pub mod surface;

use config::SceneConfig;
use driver::{FrameDriver, Scene};
use error::{ConfigError, WebError};
use scheduler::{animate, AnimationFrameLoop, ScheduledLoop};
use surface::CanvasSurface;

fn viewport(window: &web_sys::Window) -> Result<(f64, f64), WebError> {
    let width = window.inner_width().map_err(WebError::js)?;
    let height = window.inner_height().map_err(WebError::js)?;
    Ok((width.as_f64().unwrap_or(0.0), height.as_f64().unwrap_or(0.0)))
}

fn resize_listener(scene: Rc<RefCell<Scene<CanvasSurface>>>) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        match viewport(&window) {
            Ok((width, height)) => scene.borrow_mut().resize(width, height),
            Err(err) => log::warn!("could not read viewport size: {err}"),
        }
    }) as Box<dyn FnMut()>)
}

fn detach_resize(on_resize: Closure<dyn FnMut()>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) =
        window.remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
    {
        log::warn!("could not remove resize listener: {:?}", err);
    }
}

// --- THE BACKGROUND ---
#[wasm_bindgen]
pub struct ParticleBackground {
    scene: Rc<RefCell<Scene<CanvasSurface>>>,
    frames: ScheduledLoop<AnimationFrameLoop, Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl ParticleBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<ParticleBackground, JsValue> {
        ParticleBackground::build(canvas_id, SceneConfig::default())
    }

    /// `options` is a partial `SceneConfig` in camelCase.
    pub fn with_config(canvas_id: &str, options: JsValue) -> Result<ParticleBackground, JsValue> {
        let config = if options.is_undefined() || options.is_null() {
            SceneConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(|e| ConfigError::Options(e.to_string()))?
        };
        ParticleBackground::build(canvas_id, config)
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let scene = self.scene.clone();

        self.frames.start(
            |frames| animate(scene.clone(), frames),
            || {
                let on_resize = resize_listener(scene.clone());
                window
                    .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
                    .map_err(WebError::js)?;
                Ok(on_resize)
            },
            detach_resize,
        )?;
        Ok(())
    }

    /// Cancels the pending frame and detaches the resize listener. `start`
    /// resumes from the current particle state.
    pub fn stop(&mut self) {
        self.frames.stop(detach_resize);
    }

    /// Final teardown; the background cannot be restarted afterwards.
    pub fn destroy(&mut self) {
        self.stop();
        self.scene.borrow_mut().driver.stop();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.scene.borrow_mut().resize(width, height);
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        let stats = self.scene.borrow().driver.stats();
        Ok(serde_wasm_bindgen::to_value(&stats)?)
    }
}

impl ParticleBackground {
    fn build(canvas_id: &str, config: SceneConfig) -> Result<ParticleBackground, JsValue> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let surface = CanvasSurface::from_element_id(&document, canvas_id)?;
        let (width, height) = viewport(&window)?;

        let seed = config.seed.unwrap_or_else(|| (Math::random() * u64::MAX as f64) as u64);
        let driver = FrameDriver::seeded(config, width, height, seed)?;
        log::info!(
            "particle background on #{canvas_id}: {} particles, {width}x{height}",
            driver.store().len()
        );

        Ok(ParticleBackground {
            scene: Rc::new(RefCell::new(Scene::new(driver, surface))),
            frames: ScheduledLoop::new(AnimationFrameLoop::new()),
        })
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fetches the resume YAML (default `data.yaml`) and fills the page.
#[wasm_bindgen(js_name = loadResume)]
pub async fn load_resume(url: Option<String>) {
    dom::load_resume(url.as_deref().unwrap_or(constants::DATA_URL)).await;
}

/// Starts the background on the default canvas and loads the resume. Keep the
/// returned handle alive; dropping it stops the animation.
#[wasm_bindgen]
pub fn boot() -> Result<ParticleBackground, JsValue> {
    let mut background = ParticleBackground::new(constants::CANVAS_ID)?;
    background.start()?;
    wasm_bindgen_futures::spawn_local(dom::load_resume(constants::DATA_URL));
    Ok(background)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // Already installed when the module is re-initialised.
    let _ = logging::init(log::LevelFilter::Info);
    Ok(())
}

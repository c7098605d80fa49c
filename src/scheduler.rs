use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::driver::{LoopControl, Scene};
use crate::error::WebError;
use crate::surface::Surface;

pub type FrameCallback = Box<dyn FnMut() -> LoopControl>;

/// Decides when the next frame runs.
pub trait Scheduler {
    fn start(&mut self, frame: FrameCallback) -> Result<(), WebError>;
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Runs frames only when asked to.
#[derive(Default)]
pub struct ManualScheduler {
    frame: Option<FrameCallback>,
}

impl ManualScheduler {
    pub fn new() -> ManualScheduler {
        ManualScheduler::default()
    }

    /// Returns how many frames actually ran.
    pub fn run_frames(&mut self, count: usize) -> usize {
        let mut ran = 0;
        while ran < count {
            let Some(frame) = self.frame.as_mut() else {
                break;
            };
            ran += 1;
            if frame() == LoopControl::Stop {
                self.frame = None;
            }
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, frame: FrameCallback) -> Result<(), WebError> {
        self.frame = Some(frame);
        Ok(())
    }

    fn stop(&mut self) {
        self.frame = None;
    }

    fn is_running(&self) -> bool {
        self.frame.is_some()
    }
}

/// `requestAnimationFrame` loop that re-arms itself after every frame that
/// returns [`LoopControl::Continue`].
#[derive(Default)]
pub struct AnimationFrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl AnimationFrameLoop {
    pub fn new() -> AnimationFrameLoop {
        AnimationFrameLoop::default()
    }
}

fn request_frame(window: &web_sys::Window, callback: &Closure<dyn FnMut()>) -> Result<i32, WebError> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(WebError::js)
}

impl Scheduler for AnimationFrameLoop {
    fn start(&mut self, mut frame: FrameCallback) -> Result<(), WebError> {
        self.stop();
        let window = web_sys::window().ok_or(WebError::NoWindow)?;

        let handle = self.handle.clone();
        let callback = self.callback.clone();
        let frame_window = window.clone();
        let closure = Closure::wrap(Box::new(move || {
            handle.set(None);
            if frame() == LoopControl::Stop {
                log::debug!("animation loop finished");
                return;
            }
            if let Some(next) = callback.borrow().as_ref() {
                match request_frame(&frame_window, next) {
                    Ok(id) => handle.set(Some(id)),
                    Err(err) => log::error!("could not schedule next frame: {err}"),
                }
            }
        }) as Box<dyn FnMut()>);

        let id = request_frame(&window, &closure)?;
        self.handle.set(Some(id));
        *self.callback.borrow_mut() = Some(closure);
        log::info!("animation loop started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                if let Err(err) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {:?}", err);
                }
            }
            log::debug!("animation loop cancelled");
        }
        // Drops the closure, breaking its self-reference.
        self.callback.borrow_mut().take();
    }

    fn is_running(&self) -> bool {
        self.handle.get().is_some()
    }
}

/// A scheduler together with a host listener that must be attached exactly
/// while the loop is started, such as a window resize handler.
pub struct ScheduledLoop<R, L> {
    scheduler: R,
    listener: Option<L>,
}

impl<R: Scheduler, L> ScheduledLoop<R, L> {
    pub fn new(scheduler: R) -> ScheduledLoop<R, L> {
        ScheduledLoop {
            scheduler,
            listener: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn listener(&self) -> Option<&L> {
        self.listener.as_ref()
    }

    pub fn scheduler_mut(&mut self) -> &mut R {
        &mut self.scheduler
    }

    /// No-op while running. Otherwise detaches any listener left over from a
    /// loop that ended on its own, then starts the loop and attaches a fresh
    /// listener. If attaching fails the loop is stopped again.
    pub fn start<S, A, D>(&mut self, start: S, attach: A, detach: D) -> Result<(), WebError>
    where
        S: FnOnce(&mut R) -> Result<(), WebError>,
        A: FnOnce() -> Result<L, WebError>,
        D: FnOnce(L),
    {
        if self.scheduler.is_running() {
            return Ok(());
        }
        self.stop(detach);

        start(&mut self.scheduler)?;
        match attach() {
            Ok(listener) => {
                self.listener = Some(listener);
                Ok(())
            }
            Err(err) => {
                self.scheduler.stop();
                Err(err)
            }
        }
    }

    pub fn stop<D: FnOnce(L)>(&mut self, detach: D) {
        self.scheduler.stop();
        if let Some(listener) = self.listener.take() {
            detach(listener);
        }
    }
}

/// Hands a shared scene to `scheduler`, one `Scene::frame` per scheduled frame.
pub fn animate<S, R>(scene: Rc<RefCell<Scene<S>>>, scheduler: &mut R) -> Result<(), WebError>
where
    S: Surface + 'static,
    R: Scheduler + ?Sized,
{
    scheduler.start(Box::new(move || scene.borrow_mut().frame()))
}

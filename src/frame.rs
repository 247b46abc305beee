use crate::constants::*;
use crate::distortion::DistortionState;
use crate::dom::{self, GridDom, ImagePixels};
use crate::events::{self, EventRegistry};
use crate::focus::{FocusAction, FocusTracker};
use crate::projection::Projector;
use crate::render;
use crate::scroll::{DragController, ScrollState};
use crate::tracker::{InstanceSynchronizer, SlotKey};
use crate::virtualizer::CellPool;
use fnv::FnvHashMap;
use glam::Vec2;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub grid: GridDom,
    pub pool: CellPool,

    pub scroll: Rc<RefCell<ScrollState>>,
    pub drag: Rc<RefCell<DragController>>,
    pub hovered_slot: Rc<Cell<Option<usize>>>,
    pub pending_toggle: Rc<RefCell<Option<usize>>>,
    pub resize_pending: Rc<Cell<bool>>,
    pub escape_pending: Rc<Cell<bool>>,

    pub tracker: InstanceSynchronizer,
    pub focus: FocusTracker<SlotKey>,
    /// Inline style saved when a cell is promoted to the focus overlay,
    /// restored verbatim on exit.
    pub saved_styles: FnvHashMap<SlotKey, String>,
    pub distortion: DistortionState,

    pub ornament_pixels: Rc<RefCell<Option<ImagePixels>>>,
    pub ornaments_loaded: bool,

    pub gpu: Option<render::GpuState<'a>>,
    pub input_registry: EventRegistry,
    pub cell_registry: EventRegistry,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        // Clamp so a background tab does not teleport the grid on return.
        let dt_sec = dt.as_secs_f32().min(FRAME_DT_MAX_SEC);

        if self.resize_pending.take() {
            self.rebuild_for_viewport();
        }

        if self.escape_pending.take() {
            if let Some(key) = self.focus.escape() {
                self.exit_overlay(key);
                self.tracker.fade_in_all();
            }
        }

        self.consume_pending_toggle();

        // Retire finished exit transitions and release their slots.
        for key in self.focus.step(dt_sec) {
            self.pool.unpin(key.1);
            self.saved_styles.remove(&key);
        }

        let dragging = self.drag.borrow().dragging;
        let (offset, speed) = {
            let mut scroll = self.scroll.borrow_mut();
            scroll.step(dragging, dt_sec);
            (scroll.offset, scroll.velocity.length())
        };

        let container = self.grid.container_rect();
        let viewport = Vec2::new(container.width, container.height);
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.pool.virtualize(offset, viewport);
        }
        self.grid.apply_transforms(&self.pool);

        // Upload the ornament sprite the first frame its pixels are ready.
        if !self.ornaments_loaded {
            if let Some(pixels) = self.ornament_pixels.borrow_mut().take() {
                if let Some(g) = &mut self.gpu {
                    g.set_ornament_texture(&pixels);
                }
                self.ornaments_loaded = true;
            }
        }

        let aspect = if container.height > 0.0 {
            container.width / container.height
        } else {
            1.0
        };
        let projector = Projector::new(CAMERA_FOV_DEG, aspect, CAMERA_Z);
        let draws = self.tracker.update(
            &self.pool,
            &self.grid,
            &projector,
            container,
            self.hovered_slot.get(),
            self.ornaments_loaded,
            dt_sec,
        );

        self.distortion.set_dragging(dragging);
        self.distortion.update(dt_sec, speed);

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render(&draws, self.distortion.strength, self.distortion.aberration) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    /// Viewport changed: resize the canvas backing store, rebuild the slot
    /// pool and the DOM cells behind it, and drop focus state wholesale
    /// (the generation bump retires all keyed instances).
    fn rebuild_for_viewport(&mut self) {
        dom::sync_canvas_backing_size(&self.canvas);
        let container = self.grid.container_rect();
        let viewport = Vec2::new(container.width, container.height);
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        self.pool.rebuild(viewport);
        if let Err(e) = self.grid.sync_pool(&self.document, self.pool.slots.len()) {
            log::error!("cell pool sync: {e}");
        }
        self.cell_registry.dispose();
        events::wire_cell_handlers(
            &mut self.cell_registry,
            &self.grid,
            &self.hovered_slot,
            &self.pending_toggle,
        );
        self.focus = FocusTracker::new();
        self.saved_styles.clear();
    }

    fn consume_pending_toggle(&mut self) {
        let Some(index) = self.pending_toggle.borrow_mut().take() else {
            return;
        };
        // A click that ends a real drag is not a focus toggle.
        if self.drag.borrow().travel_px > CLICK_DRAG_SUPPRESS_PX {
            return;
        }
        let key = (self.pool.generation, index);
        match self.focus.toggle(key) {
            FocusAction::Enter(enter) => {
                self.enter_overlay(enter);
                self.tracker.fade_out_all_except(enter);
            }
            FocusAction::Exit(exit) => {
                self.exit_overlay(exit);
                self.tracker.fade_in_all();
            }
            FocusAction::Replace { exit, enter } => {
                self.exit_overlay(exit);
                self.enter_overlay(enter);
                self.tracker.fade_out_all_except(enter);
            }
        }
    }

    fn enter_overlay(&mut self, key: SlotKey) {
        self.pool.pin(key.1);
        let saved = self.grid.promote_to_overlay(key.1);
        self.saved_styles.insert(key, saved);
    }

    fn exit_overlay(&mut self, key: SlotKey) {
        if let Some(saved) = self.saved_styles.get(&key) {
            self.grid.restore_from_overlay(key.1, saved);
        }
        // Slot stays pinned until focus.step retires the transition.
    }

    pub fn dispose(&mut self) {
        self.input_registry.dispose();
        self.cell_registry.dispose();
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    document: &web::Document,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, document).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Handle for the requestAnimationFrame loop. The pending callback id is
/// retained so [`cancel`](Self::cancel) can stop the loop cleanly.
pub struct FrameLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
    _tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
    pub fn cancel(&self) {
        self.running.set(false);
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) -> FrameLoop {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let running = Rc::new(Cell::new(true));

    let tick_clone = tick.clone();
    let raf_id_clone = raf_id.clone();
    let running_clone = running.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !running_clone.get() {
            return;
        }
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    raf_id_clone.set(Some(id));
                }
            }
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            if let Ok(id) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                raf_id.set(Some(id));
            }
        }
    }
    FrameLoop {
        raf_id,
        running,
        _tick: tick,
    }
}

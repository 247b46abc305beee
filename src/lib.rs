#![cfg(target_arch = "wasm32")]
use fnv::FnvHashMap;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod distortion;
mod dom;
mod events;
mod focus;
mod frame;
mod math;
mod ornament;
mod projection;
mod render;
mod scroll;
mod tracker;
mod tween;
mod virtualizer;

use constants::{CELL_SIZE_PX, POOL_BUFFER_CELLS};

const ORNAMENT_IMAGE_URL: &str = "assets/ornament.png";

struct App {
    frame_loop: frame::FrameLoop,
    ctx: Rc<RefCell<frame::FrameContext<'static>>>,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("grid-web starting");

    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stop the frame loop and detach every listener. The DOM cells are left
/// in place; a page owning the module removes them as it sees fit.
#[wasm_bindgen]
pub fn dispose() {
    APP.with(|app| {
        if let Some(app) = app.borrow_mut().take() {
            app.frame_loop.cancel();
            app.ctx.borrow_mut().dispose();
            log::info!("grid-web disposed");
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let container: web::HtmlElement = document
        .get_element_by_id("grid")
        .ok_or_else(|| anyhow::anyhow!("missing #grid"))?
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("#grid is not an html element"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("scene-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #scene-canvas"))?
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("#scene-canvas is not a canvas"))?;
    dom::sync_canvas_backing_size(&canvas);

    dom::set_cursor(&container, false);

    let mut grid = dom::GridDom::new(container.clone(), CELL_SIZE_PX);
    let container_rect = grid.container_rect();
    let mut pool = virtualizer::CellPool::new(CELL_SIZE_PX, POOL_BUFFER_CELLS);
    pool.rebuild(glam::Vec2::new(container_rect.width, container_rect.height));
    grid.sync_pool(&document, pool.slots.len())?;

    // Shared state written by the input closures, read by the frame loop
    let scroll = Rc::new(RefCell::new(scroll::ScrollState::default()));
    let drag = Rc::new(RefCell::new(scroll::DragController::default()));
    let hovered_slot = Rc::new(Cell::new(None));
    let pending_toggle = Rc::new(RefCell::new(None));
    let resize_pending = Rc::new(Cell::new(false));
    let escape_pending = Rc::new(Cell::new(false));

    let mut input_registry = events::EventRegistry::new();
    events::wire_input_handlers(
        &mut input_registry,
        &events::InputWiring {
            container: container.clone(),
            scroll: scroll.clone(),
            drag: drag.clone(),
            hovered_slot: hovered_slot.clone(),
            pending_toggle: pending_toggle.clone(),
            resize_pending: resize_pending.clone(),
            escape_pending: escape_pending.clone(),
        },
    );
    let mut cell_registry = events::EventRegistry::new();
    events::wire_cell_handlers(&mut cell_registry, &grid, &hovered_slot, &pending_toggle);

    // The ornament sprite decodes in the background; frames render without
    // ornaments until its pixels land here.
    let ornament_pixels: Rc<RefCell<Option<dom::ImagePixels>>> = Rc::new(RefCell::new(None));
    {
        let slot = ornament_pixels.clone();
        let document = document.clone();
        spawn_local(async move {
            match dom::load_image_pixels(&document, ORNAMENT_IMAGE_URL).await {
                Ok(pixels) => *slot.borrow_mut() = Some(pixels),
                Err(e) => log::warn!("ornament image unavailable: {e}"),
            }
        });
    }

    let gpu = frame::init_gpu(&canvas, &document).await;

    let ctx = Rc::new(RefCell::new(frame::FrameContext {
        document,
        canvas,
        grid,
        pool,
        scroll,
        drag,
        hovered_slot,
        pending_toggle,
        resize_pending,
        escape_pending,
        tracker: tracker::InstanceSynchronizer::new(),
        focus: focus::FocusTracker::new(),
        saved_styles: FnvHashMap::default(),
        distortion: distortion::DistortionState::default(),
        ornament_pixels,
        ornaments_loaded: false,
        gpu,
        input_registry,
        cell_registry,
        last_instant: Instant::now(),
    }));
    let frame_loop = frame::start_loop(ctx.clone());
    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            frame_loop,
            ctx: ctx.clone(),
        });
    });

    Ok(())
}

//! Event listener registry and input wiring.
//!
//! Handlers mutate shared state synchronously and return; the frame loop
//! picks the new targets up on its next tick. Every listener is recorded so
//! `dispose` can remove it — a torn-down app must not keep reacting to
//! input.

use crate::dom;
use crate::scroll::{DragController, ScrollState};
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Listener {
    target: web::EventTarget,
    name: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

/// Keeps registered listeners alive and removes them all on dispose.
#[derive(Default)]
pub struct EventRegistry {
    listeners: Vec<Listener>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        target: &web::EventTarget,
        name: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let _ = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        self.listeners.push(Listener {
            target: target.clone(),
            name,
            closure,
        });
    }

    pub fn dispose(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.name,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

impl Drop for EventRegistry {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Shared state the input handlers write into.
#[derive(Clone)]
pub struct InputWiring {
    pub container: web::HtmlElement,
    pub scroll: Rc<RefCell<ScrollState>>,
    pub drag: Rc<RefCell<DragController>>,
    pub hovered_slot: Rc<Cell<Option<usize>>>,
    pub pending_toggle: Rc<RefCell<Option<usize>>>,
    pub resize_pending: Rc<Cell<bool>>,
    pub escape_pending: Rc<Cell<bool>>,
}

#[inline]
fn pointer_pos(ev: &web::PointerEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

/// Wire drag, keyboard and resize handlers. Pointer events cover mouse and
/// touch uniformly; move/up land on the window so a drag survives leaving
/// the container.
pub fn wire_input_handlers(registry: &mut EventRegistry, w: &InputWiring) {
    let Some(window) = web::window() else {
        return;
    };

    // pointerdown starts a drag anchored at the current offset
    {
        let w = w.clone();
        registry.add(&w.container.clone().into(), "pointerdown", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let offset = w.scroll.borrow().offset;
            w.drag
                .borrow_mut()
                .begin(pointer_pos(ev), offset, ev.time_stamp());
            dom::set_cursor(&w.container, true);
            ev.prevent_default();
        });
    }

    // pointermove feeds velocity and the absolute target offset
    {
        let w = w.clone();
        registry.add(&window.clone().into(), "pointermove", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let mut drag = w.drag.borrow_mut();
            if !drag.dragging {
                return;
            }
            let mut scroll = w.scroll.borrow_mut();
            drag.update(&mut scroll, pointer_pos(ev), ev.time_stamp());
            ev.prevent_default();
        });
    }

    // pointerup ends the drag; velocity resets, no fling
    {
        let w = w.clone();
        registry.add(&window.clone().into(), "pointerup", move |ev| {
            let _ = ev;
            let mut drag = w.drag.borrow_mut();
            if drag.dragging {
                let mut scroll = w.scroll.borrow_mut();
                drag.end(&mut scroll);
                dom::set_cursor(&w.container, false);
            }
        });
    }

    // Escape exits focus mode; other keys are ignored
    {
        let w = w.clone();
        registry.add(&window.clone().into(), "keydown", move |ev| {
            let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() else {
                return;
            };
            if ev.key() == "Escape" {
                w.escape_pending.set(true);
            }
        });
    }

    // resize invalidates the pool sizing; handled at the next frame start
    {
        let w = w.clone();
        registry.add(&window.into(), "resize", move |_| {
            w.resize_pending.set(true);
        });
    }
}

/// Per-cell hover and click handlers. Rewired whenever the pool is rebuilt.
pub fn wire_cell_handlers(
    registry: &mut EventRegistry,
    grid: &dom::GridDom,
    hovered_slot: &Rc<Cell<Option<usize>>>,
    pending_toggle: &Rc<RefCell<Option<usize>>>,
) {
    for index in 0..grid.cell_count() {
        let Some(cell) = grid.cell(index) else {
            continue;
        };
        let target: web::EventTarget = cell.clone().into();

        let hovered = hovered_slot.clone();
        registry.add(&target, "pointerenter", move |_| {
            hovered.set(Some(index));
        });

        let hovered = hovered_slot.clone();
        registry.add(&target, "pointerleave", move |_| {
            if hovered.get() == Some(index) {
                hovered.set(None);
            }
        });

        let pending = pending_toggle.clone();
        registry.add(&target, "click", move |_| {
            *pending.borrow_mut() = Some(index);
        });
    }
}

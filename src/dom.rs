//! DOM plumbing: the grid cell pool elements, rect/style queries and the
//! focus overlay restyle.

use crate::constants::FOCUS_TRANSITION_SEC;
use crate::projection::Rect;
use crate::virtualizer::CellPool;
use anyhow::anyhow;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

#[inline]
pub fn client_rect(el: &web::Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    )
}

/// Computed text color and font size (px) of an element.
pub fn computed_text_style(el: &web::Element) -> ([f32; 3], f32) {
    let mut color = [1.0, 1.0, 1.0];
    let mut font_px = 16.0;
    if let Some(window) = web::window() {
        if let Ok(Some(style)) = window.get_computed_style(el) {
            if let Ok(c) = style.get_property_value("color") {
                if let Some(parsed) = parse_css_color(&c) {
                    color = parsed;
                }
            }
            if let Ok(f) = style.get_property_value("font-size") {
                if let Some(px) = f.strip_suffix("px").and_then(|v| v.parse::<f32>().ok()) {
                    font_px = px;
                }
            }
        }
    }
    (color, font_px)
}

/// Parse `rgb(r, g, b)` / `rgba(r, g, b, a)` as returned by computed style.
pub fn parse_css_color(value: &str) -> Option<[f32; 3]> {
    let inner = value
        .trim()
        .strip_prefix("rgba")
        .or_else(|| value.trim().strip_prefix("rgb"))?
        .trim()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<f32>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    Some([r / 255.0, g / 255.0, b / 255.0])
}

/// Owns the pool's DOM cells: one absolutely positioned rectangle per slot
/// with a hidden label span (the label is drawn in the scene instead).
pub struct GridDom {
    container: web::HtmlElement,
    cells: Vec<web::HtmlElement>,
    labels: Vec<web::HtmlElement>,
    cell_size: f32,
}

impl GridDom {
    pub fn new(container: web::HtmlElement, cell_size: f32) -> Self {
        Self {
            container,
            cells: Vec::new(),
            labels: Vec::new(),
            cell_size,
        }
    }

    pub fn container(&self) -> &web::HtmlElement {
        &self.container
    }

    pub fn container_rect(&self) -> Rect {
        client_rect(&self.container)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, index: usize) -> Option<&web::HtmlElement> {
        self.cells.get(index)
    }

    pub fn label(&self, index: usize) -> Option<&web::HtmlElement> {
        self.labels.get(index)
    }

    pub fn label_text(&self, index: usize) -> String {
        self.labels
            .get(index)
            .map(|l| l.inner_text())
            .unwrap_or_default()
    }

    /// Grow or shrink the cell elements to match the pool size. New cells
    /// get a slot-stable `XZ-<id>` label.
    pub fn sync_pool(&mut self, document: &web::Document, count: usize) -> anyhow::Result<()> {
        while self.cells.len() > count {
            if let (Some(cell), Some(_)) = (self.cells.pop(), self.labels.pop()) {
                cell.remove();
            }
        }
        while self.cells.len() < count {
            let index = self.cells.len();
            let cell: web::HtmlElement = document
                .create_element("div")
                .map_err(js_err)?
                .dyn_into()
                .map_err(|_| anyhow!("grid cell is not an HtmlElement"))?;
            let label: web::HtmlElement = document
                .create_element("span")
                .map_err(js_err)?
                .dyn_into()
                .map_err(|_| anyhow!("grid label is not an HtmlElement"))?;
            cell.set_class_name("grid-cell");
            label.set_class_name("grid-cell-label");
            label.set_inner_text(&format!("XZ-{}", index));
            cell.append_child(&label).map_err(js_err)?;
            self.container.append_child(&cell).map_err(js_err)?;
            let _ = cell.set_attribute("style", &self.hidden_style());
            self.cells.push(cell);
            self.labels.push(label);
        }
        Ok(())
    }

    /// Translate every live, unpinned slot; hide slots with no assignment.
    /// Transforms are applied as translations, never re-layout.
    pub fn apply_transforms(&self, pool: &CellPool) {
        for (i, slot) in pool.slots.iter().enumerate() {
            if pool.is_pinned(i) {
                continue;
            }
            let Some(cell) = self.cells.get(i) else {
                continue;
            };
            let style = match slot.assigned {
                Some(_) => format!(
                    "{}transform:translate({}px,{}px);",
                    self.base_style(),
                    slot.screen_pos.x,
                    slot.screen_pos.y
                ),
                None => self.hidden_style(),
            };
            let _ = cell.set_attribute("style", &style);
        }
    }

    /// Restyle a cell into the full-viewport focus overlay; returns the
    /// style attribute to restore on exit.
    pub fn promote_to_overlay(&self, index: usize) -> String {
        let Some(cell) = self.cells.get(index) else {
            return String::new();
        };
        let saved = cell.get_attribute("style").unwrap_or_default();
        let overlay = format!(
            "position:fixed;top:50%;left:50%;width:100vw;height:100vh;\
             transform:translate(-50%,-50%);z-index:1000;{}",
            self.transition_style()
        );
        let _ = cell.set_attribute("style", &overlay);
        saved
    }

    /// Reverse of [`promote_to_overlay`]: the saved style plus the same
    /// transition, so the cell glides back into the grid.
    pub fn restore_from_overlay(&self, index: usize, saved: &str) {
        if let Some(cell) = self.cells.get(index) {
            let _ = cell.set_attribute("style", &format!("{}{}", saved, self.transition_style()));
        }
    }

    fn base_style(&self) -> String {
        format!(
            "position:absolute;top:0;left:0;width:{0}px;height:{0}px;",
            self.cell_size
        )
    }

    fn hidden_style(&self) -> String {
        format!("{}visibility:hidden;", self.base_style())
    }

    fn transition_style(&self) -> String {
        format!(
            "transition:all {}s cubic-bezier(0.45,0,0.55,1);",
            FOCUS_TRANSITION_SEC
        )
    }
}

/// Set only the cursor property so any other inline style on the element
/// survives. Called on drag-state transitions, not per frame.
pub fn set_cursor(el: &web::HtmlElement, grabbing: bool) {
    let cursor = if grabbing { "grabbing" } else { "grab" };
    let _ = el.style().set_property("cursor", cursor);
}

/// RGBA pixel block decoded from an image asset.
pub struct ImagePixels {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode an image URL into raw RGBA pixels via an offscreen 2D canvas.
pub async fn load_image_pixels(document: &web::Document, url: &str) -> anyhow::Result<ImagePixels> {
    let image = web::HtmlImageElement::new().map_err(js_err)?;
    image.set_src(url);
    wasm_bindgen_futures::JsFuture::from(image.decode())
        .await
        .map_err(js_err)?;
    let width = image.natural_width().max(1);
    let height = image.natural_height().max(1);

    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| anyhow!("not a canvas"))?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: web::CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| anyhow!("no 2d context"))?
        .dyn_into()
        .map_err(|_| anyhow!("not a 2d context"))?;
    ctx.draw_image_with_html_image_element(&image, 0.0, 0.0)
        .map_err(js_err)?;
    let data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(js_err)?
        .data()
        .0;
    Ok(ImagePixels {
        data,
        width,
        height,
    })
}

pub(crate) fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

use super::shelf::ShelfPacker;
use crate::constants::LABEL_ATLAS_SIZE;
use crate::dom::js_err;
use anyhow::{anyhow, Result};
use fnv::FnvHashMap;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Placement of a rasterized label inside the atlas texture.
pub(crate) struct AtlasEntry {
    /// uv min x/y, uv max x/y
    pub(crate) uv_rect: [f32; 4],
    /// rasterized size in atlas pixels
    pub(crate) px: Vec2,
}

/// Canvas2D shelf atlas for label text. Glyphs are drawn white and
/// tinted per instance in the shader, so entries are keyed by text and
/// font size only.
pub(crate) struct LabelAtlas {
    ctx: web::CanvasRenderingContext2d,
    entries: FnvHashMap<(String, u32), AtlasEntry>,
    packer: ShelfPacker,
    dirty: bool,
    was_reset: bool,
}

const PAD_PX: u32 = 2;

impl LabelAtlas {
    pub(crate) fn new(document: &web::Document) -> Result<Self> {
        let canvas: web::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| anyhow!("atlas element is not a canvas"))?;
        canvas.set_width(LABEL_ATLAS_SIZE);
        canvas.set_height(LABEL_ATLAS_SIZE);
        let ctx: web::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| anyhow!("no 2d context for label atlas"))?
            .dyn_into()
            .map_err(|_| anyhow!("unexpected 2d context type"))?;
        Ok(Self {
            ctx,
            entries: FnvHashMap::default(),
            packer: ShelfPacker::new(LABEL_ATLAS_SIZE, PAD_PX),
            dirty: false,
            was_reset: false,
        })
    }

    pub(crate) fn entry(&self, text: &str, font_px: u32) -> Option<&AtlasEntry> {
        self.entries.get(&(text.to_owned(), font_px))
    }

    /// Rasterize `text` into the atlas if it is not already present.
    pub(crate) fn ensure(&mut self, text: &str, font_px: u32) -> Result<()> {
        let key = (text.to_owned(), font_px);
        if self.entries.contains_key(&key) {
            return Ok(());
        }
        self.ctx
            .set_font(&format!("{font_px}px 'Geist Mono', monospace"));
        let width = self
            .ctx
            .measure_text(text)
            .map_err(js_err)?
            .width()
            .ceil() as u32;
        // Measured ascent/descent varies across browsers; a fixed ratio
        // of the font size leaves enough room for monospace glyphs.
        let height = (font_px as f32 * 1.3).ceil() as u32;
        if width + PAD_PX > LABEL_ATLAS_SIZE {
            return Err(anyhow!("label too wide for atlas: {text:?}"));
        }
        let (x, y) = match self.packer.place(width, height) {
            Some(pos) => pos,
            None => {
                // Atlas full. Visible labels are a small working set, so a
                // reset and re-rasterize of the live entries recovers; the
                // caller re-runs its ensure pass when `take_was_reset`
                // reports the reset, so entries dropped here come back
                // within the same frame.
                self.reset();
                self.packer
                    .place(width, height)
                    .ok_or_else(|| anyhow!("label does not fit the atlas: {text:?}"))?
            }
        };
        self.ctx
            .set_font(&format!("{font_px}px 'Geist Mono', monospace"));
        self.ctx.set_fill_style_str("#ffffff");
        self.ctx.set_text_baseline("top");
        self.ctx
            .fill_text(text, x as f64, y as f64)
            .map_err(js_err)?;
        let size = LABEL_ATLAS_SIZE as f32;
        let entry = AtlasEntry {
            uv_rect: [
                x as f32 / size,
                y as f32 / size,
                (x + width) as f32 / size,
                (y + height) as f32 / size,
            ],
            px: Vec2::new(width as f32, height as f32),
        };
        self.entries.insert(key, entry);
        self.dirty = true;
        Ok(())
    }

    fn reset(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            LABEL_ATLAS_SIZE as f64,
            LABEL_ATLAS_SIZE as f64,
        );
        self.entries.clear();
        self.packer.clear();
        self.dirty = true;
        self.was_reset = true;
        log::info!("label atlas reset");
    }

    /// True once per batch of new rasterizations; clears the flag.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True when [`ensure`](Self::ensure) had to reset the atlas since the
    /// last call; clears the flag. Entries ensured before the reset are
    /// gone and must be ensured again.
    pub(crate) fn take_was_reset(&mut self) -> bool {
        std::mem::take(&mut self.was_reset)
    }

    /// Read the whole atlas back as RGBA bytes for texture upload.
    pub(crate) fn pixels(&self) -> Result<Vec<u8>> {
        let image = self
            .ctx
            .get_image_data(0.0, 0.0, LABEL_ATLAS_SIZE as f64, LABEL_ATLAS_SIZE as f64)
            .map_err(js_err)?;
        Ok(image.data().0)
    }
}

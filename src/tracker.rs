//! Keeps a 1:1 map from live screen elements to scene instances.
//!
//! Each pool slot carries three roles: a border plane, a label quad and an
//! ornament. Every frame the maps are diffed against the pool's live slot
//! set: new slots get instances, surviving slots are re-read and
//! repositioned through the projector, vanished slots release theirs. Cost
//! is bounded by changes; instances are never duplicated or leaked while
//! the pool reassigns slots to new logical cells.

use crate::constants::{BORDER_COLOR, GRID_PLANE_Z, ORNAMENT_CELL_FRACTION};
use crate::dom::{self, GridDom};
use crate::ornament::{random_shade, Ornament};
use crate::projection::{Projector, Rect};
use crate::tween::Fader;
use crate::virtualizer::CellPool;
use fnv::FnvHashMap;
use glam::Vec2;

/// A slot identity that survives nothing but its own pool generation.
pub type SlotKey = (u64, usize);

/// Label raster parameters; a changed spec re-rasterizes the atlas entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelSpec {
    pub text: String,
    /// Color quantized to 8-bit channels so it can key the atlas cache.
    pub color: [u8; 3],
    pub font_px: u32,
}

struct BorderInstance {
    fader: Fader,
}

struct LabelInstance {
    fader: Fader,
    spec: LabelSpec,
}

struct OrnamentInstance {
    ornament: Ornament,
}

/// One border plane to draw this frame, in world units on the grid plane.
pub struct BorderDraw {
    pub center: Vec2,
    pub size: Vec2,
    pub rect_px: Vec2,
    pub color: [f32; 3],
    pub opacity: f32,
}

pub struct LabelDraw {
    pub center: Vec2,
    pub size: Vec2,
    pub color: [f32; 3],
    pub opacity: f32,
    pub spec: LabelSpec,
}

pub struct OrnamentDraw {
    pub center: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    pub shade: f32,
    pub opacity: f32,
}

/// Everything the renderer needs for one frame.
#[derive(Default)]
pub struct SceneDraws {
    pub borders: Vec<BorderDraw>,
    pub labels: Vec<LabelDraw>,
    pub ornaments: Vec<OrnamentDraw>,
}

#[derive(Default)]
pub struct InstanceSynchronizer {
    borders: FnvHashMap<SlotKey, BorderInstance>,
    labels: FnvHashMap<SlotKey, LabelInstance>,
    ornaments: FnvHashMap<SlotKey, OrnamentInstance>,
}

impl InstanceSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff instance maps against the pool's live slots, update every
    /// surviving instance from the DOM, and emit this frame's draw lists.
    pub fn update(
        &mut self,
        pool: &CellPool,
        grid: &GridDom,
        projector: &Projector,
        container: Rect,
        hovered: Option<usize>,
        ornaments_loaded: bool,
        dt_sec: f32,
    ) -> SceneDraws {
        let generation = pool.generation;
        let mut draws = SceneDraws::default();
        let live: Vec<usize> = pool.live_indices().collect();

        for &index in &live {
            let key = (generation, index);
            let Some(cell) = grid.cell(index) else {
                continue;
            };
            let cell_rect = dom::client_rect(cell);

            // Border plane follows the cell rect exactly.
            let border = self
                .borders
                .entry(key)
                .or_insert_with(|| BorderInstance {
                    fader: Fader::default(),
                });
            let opacity = border.fader.step(dt_sec);
            draws.borders.push(BorderDraw {
                center: projector.element_to_world(cell_rect, container, GRID_PLANE_Z),
                size: projector.pixels_to_world(
                    container,
                    Vec2::new(cell_rect.width, cell_rect.height),
                    GRID_PLANE_Z,
                ),
                rect_px: Vec2::new(cell_rect.width, cell_rect.height),
                color: BORDER_COLOR,
                opacity,
            });

            // Label quad re-reads text and computed style each frame.
            if let Some(label_el) = grid.label(index) {
                let label_rect = dom::client_rect(label_el);
                let (color, font_px) = dom::computed_text_style(label_el);
                let spec = LabelSpec {
                    text: grid.label_text(index),
                    color: [
                        (color[0] * 255.0) as u8,
                        (color[1] * 255.0) as u8,
                        (color[2] * 255.0) as u8,
                    ],
                    font_px: font_px.round().max(1.0) as u32,
                };
                let label = self.labels.entry(key).or_insert_with(|| LabelInstance {
                    fader: Fader::default(),
                    spec: spec.clone(),
                });
                label.spec = spec;
                let opacity = label.fader.step(dt_sec);
                if label_rect.width > 0.0 && label_rect.height > 0.0 {
                    draws.labels.push(LabelDraw {
                        center: projector.element_to_world(label_rect, container, GRID_PLANE_Z),
                        size: projector.pixels_to_world(
                            container,
                            Vec2::new(label_rect.width, label_rect.height),
                            GRID_PLANE_Z,
                        ),
                        color,
                        opacity,
                        spec: label.spec.clone(),
                    });
                }
            }

            // Ornament tracks the cell center; no-op until the asset loads.
            let entry = self.ornaments.entry(key).or_insert_with(|| {
                OrnamentInstance {
                    ornament: Ornament::new(random_shade(rand::random::<f32>())),
                }
            });
            if ornaments_loaded && !entry.ornament.loaded {
                entry.ornament.set_loaded();
            }
            let center = projector.element_to_world(cell_rect, container, GRID_PLANE_Z);
            entry.ornament.set_target_position(center.x, center.y);
            entry.ornament.set_hovered(hovered == Some(index));
            entry.ornament.update(dt_sec);
            if entry.ornament.loaded {
                let edge_px = cell_rect.width.min(cell_rect.height) * ORNAMENT_CELL_FRACTION;
                let size =
                    projector.pixels_to_world(container, Vec2::splat(edge_px), GRID_PLANE_Z);
                draws.ornaments.push(OrnamentDraw {
                    center: entry.ornament.position,
                    size,
                    rotation: entry.ornament.rotation,
                    shade: entry.ornament.shade,
                    opacity: entry.ornament.opacity(),
                });
            }
        }

        // Release instances whose element disappeared (stale generation or
        // a slot that fell out of the live set).
        let is_live = |key: &SlotKey| key.0 == generation && live.contains(&key.1);
        self.borders.retain(|key, _| is_live(key));
        self.labels.retain(|key, _| is_live(key));
        self.ornaments.retain(|key, _| is_live(key));

        draws
    }

    /// Focus enter: suppress every instance that does not belong to the
    /// focused slot.
    pub fn fade_out_all_except(&mut self, kept: SlotKey) {
        for (key, instance) in self.borders.iter_mut() {
            if *key != kept {
                instance.fader.fade_out();
            }
        }
        for (key, instance) in self.labels.iter_mut() {
            if *key != kept {
                instance.fader.fade_out();
            }
        }
        for (key, instance) in self.ornaments.iter_mut() {
            if *key != kept {
                instance.ornament.fade_out();
            }
        }
    }

    /// Focus exit: bring everything back (delayed, so the overlay clears
    /// first).
    pub fn fade_in_all(&mut self) {
        for instance in self.borders.values_mut() {
            instance.fader.fade_in();
        }
        for instance in self.labels.values_mut() {
            instance.fader.fade_in();
        }
        for instance in self.ornaments.values_mut() {
            instance.ornament.fade_in();
        }
    }
}

// Row-based rectangle placement over a fixed square page.

/// Shelf packer cursor. Rectangles go left to right on the current shelf;
/// one that does not fit opens the next shelf below.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShelfPacker {
    size: u32,
    pad: u32,
    cursor_x: u32,
    cursor_y: u32,
    shelf_height: u32,
}

impl ShelfPacker {
    pub fn new(size: u32, pad: u32) -> Self {
        Self {
            size,
            pad,
            cursor_x: 0,
            cursor_y: 0,
            shelf_height: 0,
        }
    }

    /// Place a `w × h` rectangle; returns its top-left corner, or `None`
    /// when the page is full and must be cleared before retrying.
    pub fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + self.pad > self.size {
            return None;
        }
        if self.cursor_x + w + self.pad > self.size {
            self.cursor_x = 0;
            self.cursor_y += self.shelf_height + self.pad;
            self.shelf_height = 0;
        }
        if self.cursor_y + h + self.pad > self.size {
            return None;
        }
        let pos = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.pad;
        self.shelf_height = self.shelf_height.max(h);
        Some(pos)
    }

    /// Forget every placement; the page starts empty again.
    pub fn clear(&mut self) {
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.shelf_height = 0;
    }
}

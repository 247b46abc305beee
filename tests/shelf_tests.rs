// Host-side tests for the label atlas shelf packer. The main crate is
// wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod shelf {
    include!("../src/render/shelf.rs");
}

use shelf::ShelfPacker;

#[test]
fn places_left_to_right_with_padding() {
    let mut packer = ShelfPacker::new(128, 2);
    assert_eq!(packer.place(40, 20), Some((0, 0)));
    assert_eq!(packer.place(40, 20), Some((42, 0)));
    assert_eq!(packer.place(40, 20), Some((84, 0)));
}

#[test]
fn wraps_onto_the_next_shelf() {
    let mut packer = ShelfPacker::new(128, 2);
    packer.place(100, 30);
    // Does not fit beside the first rectangle; opens a new shelf below
    // the tallest rectangle placed so far.
    assert_eq!(packer.place(100, 10), Some((0, 32)));
}

#[test]
fn returns_none_when_the_page_is_full() {
    let mut packer = ShelfPacker::new(64, 2);
    // Each shelf holds one 60-wide rectangle; 20 + 2 pad per shelf.
    assert!(packer.place(60, 20).is_some());
    assert!(packer.place(60, 20).is_some());
    assert_eq!(packer.place(60, 20), None);
    // Too-wide rectangles never fit regardless of fill level.
    assert_eq!(ShelfPacker::new(64, 2).place(64, 8), None);
}

#[test]
fn clearing_a_full_page_recovers_the_working_set() {
    let mut packer = ShelfPacker::new(64, 2);
    while packer.place(60, 20).is_some() {}
    packer.clear();
    // The same rectangles place again from the top-left corner, so a
    // caller that re-runs its fill pass after a reset loses nothing.
    assert_eq!(packer.place(60, 20), Some((0, 0)));
    assert_eq!(packer.place(60, 20), Some((0, 22)));
}

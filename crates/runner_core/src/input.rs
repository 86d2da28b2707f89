//! Keyboard state with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   physically down. Jumping and fast-falling read this.
//!
//! - **Edge-triggered (just_pressed):** true only during the frame the key
//!   went down. Cleared by `end_frame()`, which the main
//!   loop calls only after at least one fixed step has consumed them, so a
//!   press landing on a frame with zero steps is not lost.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Up,
    Down,
    Escape,
    F3,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Forget everything, e.g. when the window loses focus and key-up
    /// events may never arrive.
    pub fn clear(&mut self) {
        self.held.clear();
        self.end_frame();
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

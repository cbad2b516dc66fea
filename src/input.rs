//! Logical keys, per-frame input snapshots, and the winit event tracker that
//! produces them.

use std::collections::HashSet;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Named logical keys the frame loop reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Ride forward.
    Up,
    /// Ride backward.
    Down,
    /// Steer left.
    Left,
    /// Steer right.
    Right,
    /// Orbit the camera about world Z, negative direction.
    OrbitLeft,
    /// Orbit the camera about world Z, positive direction.
    OrbitRight,
    /// Orbit the camera about world X, positive direction.
    OrbitUp,
    /// Orbit the camera about world X, negative direction.
    OrbitDown,
    /// Move the camera away from the origin.
    ZoomOut,
    /// Move the camera toward the origin.
    ZoomIn,
}

impl Key {
    /// Maps a physical key to its logical key. Unbound keys map to `None`.
    pub fn from_key_code(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::ArrowUp => Some(Key::Up),
            KeyCode::ArrowDown => Some(Key::Down),
            KeyCode::ArrowLeft => Some(Key::Left),
            KeyCode::ArrowRight => Some(Key::Right),
            KeyCode::KeyA => Some(Key::OrbitLeft),
            KeyCode::KeyD => Some(Key::OrbitRight),
            KeyCode::KeyW => Some(Key::OrbitUp),
            KeyCode::KeyS => Some(Key::OrbitDown),
            KeyCode::KeyV => Some(Key::ZoomOut),
            KeyCode::KeyB => Some(Key::ZoomIn),
            _ => None,
        }
    }

    /// Maps a key name (`"Up"`, `"ArrowUp"`, `"KeyA"`, ...) to its logical key.
    ///
    /// Unrecognized names map to `None`.
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "Up" | "ArrowUp" => Some(Key::Up),
            "Down" | "ArrowDown" => Some(Key::Down),
            "Left" | "ArrowLeft" => Some(Key::Left),
            "Right" | "ArrowRight" => Some(Key::Right),
            "OrbitLeft" | "KeyA" => Some(Key::OrbitLeft),
            "OrbitRight" | "KeyD" => Some(Key::OrbitRight),
            "OrbitUp" | "KeyW" => Some(Key::OrbitUp),
            "OrbitDown" | "KeyS" => Some(Key::OrbitDown),
            "ZoomOut" | "KeyV" => Some(Key::ZoomOut),
            "ZoomIn" | "KeyB" => Some(Key::ZoomIn),
            _ => None,
        }
    }
}

/// The physical key that requests a flatpack toggle.
pub const TOGGLE_FLATPACK_KEY: KeyCode = KeyCode::KeyF;

/// Held keys plus the edge-triggered flatpack toggle for one frame.
///
/// Read-only to the animation and camera once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: HashSet<Key>,
    toggle_flatpack: bool,
}

impl InputSnapshot {
    /// A snapshot with nothing held and no toggle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from key names; unrecognized names are ignored.
    ///
    /// ```
    /// use flatpack::{InputSnapshot, Key};
    ///
    /// let snapshot = InputSnapshot::from_names(["ArrowUp", "Left", "Escape"]);
    /// assert!(snapshot.is_held(Key::Up));
    /// assert!(snapshot.is_held(Key::Left));
    /// assert_eq!(snapshot.held().count(), 2);
    /// ```
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            held: names.into_iter().filter_map(Key::from_name).collect(),
            toggle_flatpack: false,
        }
    }

    /// Adds a held key.
    pub fn with_key(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    /// Marks this frame as carrying a flatpack toggle request.
    pub fn with_toggle(mut self) -> Self {
        self.toggle_flatpack = true;
        self
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn held(&self) -> impl Iterator<Item = Key> + '_ {
        self.held.iter().copied()
    }

    /// Whether a flatpack toggle was requested this frame.
    pub fn toggle_flatpack(&self) -> bool {
        self.toggle_flatpack
    }
}

/// Tracks keyboard state from window events.
#[derive(Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the end of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(key) = event.physical_key {
                self.handle_key(key, event.state);
            }
        }
    }

    /// Records a key transition.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_down.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_down.insert(key);
            }
            ElementState::Released => {
                self.keys_down.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Captures the logical view of this frame's keyboard state.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            held: self
                .keys_down
                .iter()
                .filter_map(|&code| Key::from_key_code(code))
                .collect(),
            toggle_flatpack: self.key_pressed(TOGGLE_FLATPACK_KEY),
        }
    }
}

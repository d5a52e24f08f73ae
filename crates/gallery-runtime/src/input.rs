//! Keyboard and mouse state, queried through named actions

use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

/// Names of the actions the gallery binds by default
pub mod actions {
    pub const MOVE_FORWARD: &str = "move_forward";
    pub const MOVE_BACKWARD: &str = "move_backward";
    pub const STRAFE_LEFT: &str = "strafe_left";
    pub const STRAFE_RIGHT: &str = "strafe_right";
    pub const FIRE: &str = "fire";
    pub const QUIT: &str = "quit";
}

/// A physical control an action can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Key(KeyCode),
    /// Mouse button index, 0 is the left button
    Mouse(u32),
}

/// Held and freshly pressed controls plus cursor motion for the current frame
#[derive(Debug)]
pub struct InputState {
    held: HashSet<Binding>,
    pressed_this_frame: HashSet<Binding>,
    cursor: Option<(f64, f64)>,
    cursor_motion: (f64, f64),
    bindings: HashMap<String, Vec<Binding>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        let bindings = [
            (actions::MOVE_FORWARD, Binding::Key(KeyCode::KeyW)),
            (actions::MOVE_BACKWARD, Binding::Key(KeyCode::KeyS)),
            (actions::STRAFE_LEFT, Binding::Key(KeyCode::KeyA)),
            (actions::STRAFE_RIGHT, Binding::Key(KeyCode::KeyD)),
            (actions::FIRE, Binding::Mouse(0)),
            (actions::QUIT, Binding::Key(KeyCode::Escape)),
        ]
        .into_iter()
        .map(|(action, binding)| (action.to_string(), vec![binding]))
        .collect();

        Self {
            held: HashSet::new(),
            pressed_this_frame: HashSet::new(),
            cursor: None,
            cursor_motion: (0.0, 0.0),
            bindings,
        }
    }

    /// Replace every binding of `action`
    pub fn bind_action(&mut self, action: impl Into<String>, bindings: Vec<Binding>) {
        let action = action.into();
        tracing::debug!(%action, ?bindings, "rebinding action");
        self.bindings.insert(action, bindings);
    }

    fn press(&mut self, binding: Binding) {
        if self.held.insert(binding) {
            self.pressed_this_frame.insert(binding);
        }
    }

    fn release(&mut self, binding: Binding) {
        self.held.remove(&binding);
    }

    pub fn process_key_down(&mut self, key: KeyCode) {
        self.press(Binding::Key(key));
    }

    pub fn process_key_up(&mut self, key: KeyCode) {
        self.release(Binding::Key(key));
    }

    pub fn process_mouse_button_down(&mut self, button: u32) {
        self.press(Binding::Mouse(button));
    }

    pub fn process_mouse_button_up(&mut self, button: u32) {
        self.release(Binding::Mouse(button));
    }

    /// Record a cursor position. The first one after a reset only seeds the tracker.
    pub fn process_mouse_move(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.cursor.replace((x, y)) {
            self.cursor_motion.0 += x - last_x;
            self.cursor_motion.1 += y - last_y;
        }
    }

    /// Forget the cursor position, e.g. when it leaves the window
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Clear per-frame state; held controls stay held
    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
        self.cursor_motion = (0.0, 0.0);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.held.contains(&Binding::Key(key))
    }

    fn any_bound_in(&self, action: &str, set: &HashSet<Binding>) -> bool {
        self.bindings
            .get(action)
            .is_some_and(|bound| bound.iter().any(|b| set.contains(b)))
    }

    /// True while any control bound to `action` is held
    pub fn is_action_pressed(&self, action: &str) -> bool {
        self.any_bound_in(action, &self.held)
    }

    pub fn is_action_just_pressed(&self, action: &str) -> bool {
        self.any_bound_in(action, &self.pressed_this_frame)
    }

    /// +1 when `positive` is held, -1 when `negative` is held, 0 for both or neither
    pub fn axis(&self, negative: &str, positive: &str) -> f32 {
        let signed = |action, sign: f32| if self.is_action_pressed(action) { sign } else { 0.0 };
        signed(positive, 1.0) + signed(negative, -1.0)
    }

    /// Cursor movement this frame in pixels
    pub fn mouse_delta(&self) -> (f64, f64) {
        self.cursor_motion
    }
}

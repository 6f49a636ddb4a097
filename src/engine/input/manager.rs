// Input manager - turns key events into per-frame action state

use super::action::Action;
use super::config::InputConfig;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Held-key snapshot consumed by the player once per frame.
///
/// Level-triggered: a flag is true for as long as its key is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub crouch: bool,
    pub dash: bool,
    pub attack: bool,
}

/// Tracks which actions are held and which were pressed this frame
#[derive(Debug)]
pub struct InputManager {
    config: InputConfig,
    pressed: HashSet<Action>,
    just_pressed: HashSet<Action>,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only process physical keys
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state, event.repeat);
        }
    }

    /// Process a single key transition
    pub fn process_key(&mut self, key: KeyCode, state: ElementState, repeat: bool) {
        let Some(action) = self.config.action_for(key) else {
            return;
        };

        match state {
            ElementState::Pressed => {
                if !repeat {
                    self.press(action);
                }
            }
            ElementState::Released => self.release(action),
        }
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    /// Check if an action is currently held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was pressed since the last `end_frame`
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Gameplay intents for this frame
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            move_left: self.is_pressed(Action::MoveLeft),
            move_right: self.is_pressed(Action::MoveRight),
            jump: self.is_pressed(Action::Jump),
            crouch: self.is_pressed(Action::Crouch),
            dash: self.is_pressed(Action::Dash),
            attack: self.is_pressed(Action::Attack),
        }
    }

    /// Clear edge-triggered state; call once per rendered frame
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }

    /// Release everything (e.g. when the window loses focus)
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Swap bindings, keeping nothing held across the change
    pub fn set_config(&mut self, config: InputConfig) {
        self.config = config;
        self.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_maps_to_action() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::ArrowLeft, ElementState::Pressed, false);

        assert!(manager.is_pressed(Action::MoveLeft));
        assert!(manager.snapshot().move_left);
    }

    #[test]
    fn test_release() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::Space, ElementState::Pressed, false);
        manager.process_key(KeyCode::Space, ElementState::Released, false);

        assert!(!manager.snapshot().jump);
    }

    #[test]
    fn test_snapshot_is_level_triggered() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::KeyZ, ElementState::Pressed, false);
        manager.end_frame();

        // Still held on later frames
        assert!(manager.snapshot().attack);
        assert!(!manager.just_pressed(Action::Attack));
    }

    #[test]
    fn test_repeat_does_not_retrigger() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::F1, ElementState::Pressed, false);
        manager.end_frame();
        manager.process_key(KeyCode::F1, ElementState::Pressed, true);

        assert!(!manager.just_pressed(Action::ToggleDebug));
    }

    #[test]
    fn test_just_pressed_cleared_at_end_of_frame() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::Escape, ElementState::Pressed, false);
        assert!(manager.just_pressed(Action::Quit));

        manager.end_frame();
        assert!(!manager.just_pressed(Action::Quit));
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut manager = InputManager::default();
        manager.process_key(KeyCode::KeyQ, ElementState::Pressed, false);
        assert_eq!(manager.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_set_config_resets_state() {
        let mut manager = InputManager::default();
        manager.press(Action::MoveRight);

        let mut config = InputConfig::default();
        config.rebind(Action::MoveRight, KeyCode::KeyD);
        manager.set_config(config);

        assert!(!manager.is_pressed(Action::MoveRight));
        manager.process_key(KeyCode::KeyD, ElementState::Pressed, false);
        assert!(manager.snapshot().move_right);
    }
}

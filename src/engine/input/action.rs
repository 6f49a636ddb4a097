// Game action definitions and default key bindings

use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Jump,
    Crouch,
    Dash,

    // Combat
    Attack,

    // Meta actions (edge-triggered, not part of the gameplay snapshot)
    Quit,
    ToggleDebug,
    ToggleFullscreen,
}

impl Action {
    /// Actions that feed the player's intent flags
    pub const GAMEPLAY: [Action; 6] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Crouch,
        Action::Dash,
        Action::Attack,
    ];

    /// Whether this action drives gameplay (as opposed to session control)
    pub fn is_gameplay(&self) -> bool {
        Self::GAMEPLAY.contains(self)
    }
}

/// Default gameplay bindings (arrow keys, space, shift, Z, X)
pub fn default_bindings() -> Vec<(KeyCode, Action)> {
    vec![
        (KeyCode::ArrowLeft, Action::MoveLeft),
        (KeyCode::ArrowRight, Action::MoveRight),
        (KeyCode::Space, Action::Jump),
        (KeyCode::ShiftLeft, Action::Crouch),
        (KeyCode::KeyZ, Action::Attack),
        (KeyCode::KeyX, Action::Dash),
    ]
}

/// Global bindings (not remappable from settings)
pub fn global_bindings() -> Vec<(KeyCode, Action)> {
    vec![
        (KeyCode::Escape, Action::Quit),
        (KeyCode::F1, Action::ToggleDebug),
        (KeyCode::F11, Action::ToggleFullscreen),
    ]
}

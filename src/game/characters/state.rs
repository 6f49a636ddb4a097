// Player state machine states

/// Discrete player state, resolved once per frame after physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    /// Standing still on ground
    #[default]
    Idle,
    /// Moving horizontally on ground
    Running,
    /// In the air, moving upward
    Jumping,
    /// In the air, moving downward
    Falling,
    /// Crouching in place
    Crouch,
    /// Moving while crouched
    CrouchWalking,
    /// Grounded attack combo
    GroundAttacking,
    /// Airborne attack combo
    AirAttacking,
    /// Reserved, never entered
    Rolling,
}

/// Inputs to the per-frame state resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct StateInputs {
    pub on_ground: bool,
    pub velocity_y: f32,
    pub moving: bool,
    pub crouching: bool,
    pub attacking: bool,
}

impl PlayerState {
    /// Pick the state for this frame, first match wins:
    /// attack (ground, then air), rising, falling, crouch-walk, crouch, run, idle.
    ///
    /// Airborne with zero vertical velocity falls through to the grounded rules.
    pub fn resolve(inputs: StateInputs) -> Self {
        let airborne = !inputs.on_ground;

        if inputs.attacking && inputs.on_ground {
            Self::GroundAttacking
        } else if inputs.attacking {
            Self::AirAttacking
        } else if airborne && inputs.velocity_y < 0.0 {
            Self::Jumping
        } else if airborne && inputs.velocity_y > 0.0 {
            Self::Falling
        } else if inputs.crouching && inputs.moving {
            Self::CrouchWalking
        } else if inputs.crouching {
            Self::Crouch
        } else if inputs.moving {
            Self::Running
        } else {
            Self::Idle
        }
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self, Self::GroundAttacking | Self::AirAttacking)
    }

    /// Attack definition played on entry to an attack state
    pub fn attack_name(&self) -> Option<&'static str> {
        match self {
            Self::GroundAttacking => Some("ground_slash"),
            Self::AirAttacking => Some("air_slash"),
            _ => None,
        }
    }

    /// State to fall back to when the attack definition is missing
    pub fn attack_fallback(&self) -> Self {
        match self {
            Self::AirAttacking => Self::Falling,
            _ => Self::Idle,
        }
    }

    /// Movement animation played on entry to this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Jumping => "jump",
            Self::Falling => "fall",
            Self::Crouch => "crouch",
            Self::CrouchWalking => "crouch-walk",
            Self::Running => "run",
            Self::Idle | Self::Rolling | Self::GroundAttacking | Self::AirAttacking => "idle",
        }
    }
}

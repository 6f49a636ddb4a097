// Character animation model and playback

use super::attack::AttackDef;
use crate::core::Rect;
use crate::engine::assets::TextureHandle;
use crate::engine::game_loop::FIXED_TIMESTEP;
use crate::engine::physics::PhysicsBody;
use crate::engine::renderer::{entity_dest_rect, Sprite};
use glam::Vec2;

/// Event name that arms an attack stage's hitbox
pub const HITBOX_EVENT: &str = "hitbox";

/// A sprite sheet of equally sized frames
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub name: String,
    pub path: String,
    pub texture: TextureHandle,
    pub frame_width: u32,
    pub frame_height: u32,
}

/// Collision rectangle relative to the raw frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionProfile {
    /// Collision width as a fraction of the scaled frame width
    pub width_scale: f32,
    /// Collision height as a fraction of the scaled frame height
    pub height_scale: f32,
    /// Sprite placement offset in unscaled frame pixels
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for CollisionProfile {
    fn default() -> Self {
        Self {
            width_scale: 1.0,
            height_scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl CollisionProfile {
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }
}

/// Named trigger on a frame of an animation
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationEvent {
    pub frame_index: usize,
    pub name: String,
    pub value: Option<String>,
}

/// A sequence of frames on one sprite sheet.
///
/// Immutable once loaded; playback state lives in an `AnimationCursor` so one
/// definition can be shared by any number of entities.
#[derive(Debug, Clone)]
pub struct Animation {
    pub name: String,
    /// Index into the owning catalogue's sheets
    pub sheet: usize,
    /// Source rectangles in sheet pixels
    pub frames: Vec<Rect>,
    /// Seconds per frame
    pub frame_duration: f32,
    pub looping: bool,
    pub collision_profile: Option<CollisionProfile>,
    pub events: Vec<AnimationEvent>,
    pub invulnerable: bool,
    pub can_be_interrupted: bool,
}

impl Animation {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame duration with non-positive values replaced by one simulation tick
    pub fn effective_frame_duration(&self) -> f32 {
        if self.frame_duration > 0.0 {
            self.frame_duration
        } else {
            FIXED_TIMESTEP
        }
    }

    /// Length of one pass through all frames
    pub fn total_duration(&self) -> f32 {
        self.effective_frame_duration() * self.frame_count().max(1) as f32
    }

    /// Source rectangle of a frame, clamped to the last frame
    pub fn frame(&self, index: usize) -> Option<Rect> {
        let last = self.frames.len().checked_sub(1)?;
        self.frames.get(index.min(last)).copied()
    }

    /// Collision profile, falling back to the 1:1 default
    pub fn profile(&self) -> CollisionProfile {
        self.collision_profile.unwrap_or_default()
    }

    pub fn events_at(&self, frame: usize) -> impl Iterator<Item = &AnimationEvent> {
        self.events.iter().filter(move |e| e.frame_index == frame)
    }
}

/// Playback position inside an animation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationCursor {
    frame: usize,
    timer: f32,
    /// Set when a frame is entered, cleared when its events are taken
    entered: bool,
}

impl AnimationCursor {
    pub fn new() -> Self {
        Self {
            frame: 0,
            timer: 0.0,
            entered: true,
        }
    }

    /// Back to frame 0 with an empty timer
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Frames remaining in the animation, counting the current one
    pub fn frames_left(&self, animation: &Animation) -> usize {
        animation.frame_count().saturating_sub(self.frame)
    }

    /// Accumulate `dt` and move forward one frame per elapsed frame duration.
    ///
    /// The frame index is not wrapped; callers that need the end-of-animation
    /// point (attack stages) compare it with the frame count. Returns the
    /// number of frames advanced.
    pub fn step(&mut self, animation: &Animation, dt: f32) -> usize {
        let duration = animation.effective_frame_duration();
        self.timer += dt;

        let mut advanced = 0;
        while self.timer >= duration {
            self.timer -= duration;
            self.frame += 1;
            advanced += 1;
        }

        if advanced > 0 {
            self.entered = true;
        }
        advanced
    }

    /// Advance playback: wrap to 0 at the end of a looping animation, hold the
    /// last frame otherwise
    pub fn advance(&mut self, animation: &Animation, dt: f32) {
        let count = animation.frame_count();
        if count == 0 {
            return;
        }

        let duration = animation.effective_frame_duration();
        self.timer += dt;

        while self.timer >= duration {
            self.timer -= duration;

            if self.frame + 1 < count {
                self.frame += 1;
            } else if animation.looping {
                self.frame = 0;
            } else {
                // Holding the last frame is not a new entry
                continue;
            }
            self.entered = true;
        }
    }

    /// Events of the current frame, once per entry into that frame
    pub fn take_entered_events<'a>(&mut self, animation: &'a Animation) -> Vec<&'a AnimationEvent> {
        if !std::mem::take(&mut self.entered) {
            return Vec::new();
        }
        animation.events_at(self.frame).collect()
    }
}

/// Everything a character can play, loaded once and shared read-only
#[derive(Debug, Clone, Default)]
pub struct CharacterAnimations {
    pub sheets: Vec<SpriteSheet>,
    pub sprite_scale: f32,
    pub movements: Vec<Animation>,
    pub attacks: Vec<AttackDef>,
}

impl CharacterAnimations {
    pub fn find_movement(&self, name: &str) -> Option<usize> {
        self.movements.iter().position(|a| a.name == name)
    }

    pub fn find_attack(&self, name: &str) -> Option<usize> {
        self.attacks.iter().position(|a| a.name == name)
    }

    pub fn movement(&self, index: usize) -> Option<&Animation> {
        self.movements.get(index)
    }

    pub fn attack(&self, index: usize) -> Option<&AttackDef> {
        self.attacks.get(index)
    }

    pub fn sheet(&self, index: usize) -> Option<&SpriteSheet> {
        self.sheets.get(index)
    }

    pub fn textures(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        self.sheets.iter().map(|s| s.texture)
    }

    /// Collision size of a frame: frame size x sprite scale x profile scale
    pub fn collision_size(&self, animation: &Animation, frame: usize) -> Option<Vec2> {
        let source = animation.frame(frame)?;
        let profile = animation.profile();
        Some(Vec2::new(
            source.w * self.sprite_scale * profile.width_scale,
            source.h * self.sprite_scale * profile.height_scale,
        ))
    }

    /// Sprite of `frame` drawn over `body`, camera-relative
    pub fn sprite(
        &self,
        animation: &Animation,
        frame: usize,
        body: &PhysicsBody,
        camera: Vec2,
    ) -> Option<Sprite> {
        let sheet = self.sheet(animation.sheet)?;
        let source = animation.frame(frame)?;
        let dest = entity_dest_rect(
            body.collision_rect(),
            source.size(),
            self.sprite_scale,
            animation.profile().offset(),
            body.facing,
            camera,
        );

        Some(Sprite {
            texture: sheet.texture,
            source: Some(source),
            dest,
            flip_x: body.facing.is_left(),
        })
    }
}

//! Moving inhabitants of the playfield.

use invaders_core::{
    AlienId, BulletId, Canvas, InputEvent, Key, Rect, ScreenPoint, SpriteHandle, Velocity,
    ALIEN_DESCENT, ALIEN_LEFT_LIMIT, ALIEN_RIGHT_LIMIT, BULLET_SPEED, PLAYER_STEP,
};

/// Shared capability of everything the world moves and draws.
pub trait Actor {
    /// Advances the actor by one tick using the tick's input batch.
    fn update(&mut self, input: &[InputEvent]);

    /// Draws the actor at its current position.
    fn draw(&self, canvas: &mut dyn Canvas);

    /// Bounding rectangle at the current position.
    fn bounding_box(&self) -> Rect;
}

/// Ship steered by the keyboard.
#[derive(Clone, Debug)]
pub struct Player {
    position: ScreenPoint,
    velocity: Velocity,
    sprite: SpriteHandle,
}

impl Player {
    /// Creates a stationary player at `position`.
    #[must_use]
    pub const fn new(position: ScreenPoint, sprite: SpriteHandle) -> Self {
        Self {
            position,
            velocity: Velocity::ZERO,
            sprite,
        }
    }

    /// Current top-left corner.
    #[must_use]
    pub const fn position(&self) -> ScreenPoint {
        self.position
    }

    /// Velocity accumulated from key edges.
    #[must_use]
    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }
}

impl Actor for Player {
    fn update(&mut self, input: &[InputEvent]) {
        for event in input {
            match event {
                InputEvent::KeyDown(Key::Left) | InputEvent::KeyUp(Key::Right) => {
                    self.velocity.dx -= PLAYER_STEP;
                }
                InputEvent::KeyDown(Key::Right) | InputEvent::KeyUp(Key::Left) => {
                    self.velocity.dx += PLAYER_STEP;
                }
                _ => {}
            }
        }
        self.position = self.position.offset(self.velocity);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.blit(&self.sprite, self.position);
    }

    fn bounding_box(&self) -> Rect {
        self.sprite.rect_at(self.position)
    }
}

/// Whether an alien crossed one of its bounds during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// The alien stayed within its bounds.
    Steady,
    /// The alien overshot a bound, reversed and descended.
    Reversed,
}

/// Enemy that zig-zags down the screen.
#[derive(Clone, Debug)]
pub struct Alien {
    id: AlienId,
    position: ScreenPoint,
    speed: i32,
    sprite: SpriteHandle,
    last_motion: Motion,
}

impl Alien {
    /// Creates an alien that zig-zags between the fixed horizontal limits.
    #[must_use]
    pub const fn new(id: AlienId, position: ScreenPoint, speed: i32, sprite: SpriteHandle) -> Self {
        Self {
            id,
            position,
            speed,
            sprite,
            last_motion: Motion::Steady,
        }
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> AlienId {
        self.id
    }

    /// Current top-left corner.
    #[must_use]
    pub const fn position(&self) -> ScreenPoint {
        self.position
    }

    /// Signed horizontal speed.
    #[must_use]
    pub const fn speed(&self) -> i32 {
        self.speed
    }

    /// Outcome of the most recent update.
    #[must_use]
    pub const fn last_motion(&self) -> Motion {
        self.last_motion
    }
}

impl Actor for Alien {
    fn update(&mut self, _input: &[InputEvent]) {
        self.position.x += self.speed;
        // Checked after the move, so the alien may overshoot by one speed unit.
        let outside = self.position.x < ALIEN_LEFT_LIMIT || self.position.x > ALIEN_RIGHT_LIMIT;
        self.last_motion = if outside {
            self.speed = -self.speed;
            self.position.y += ALIEN_DESCENT;
            Motion::Reversed
        } else {
            Motion::Steady
        };
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.blit(&self.sprite, self.position);
    }

    fn bounding_box(&self) -> Rect {
        self.sprite.rect_at(self.position)
    }
}

/// Projectile travelling straight up.
#[derive(Clone, Debug)]
pub struct Bullet {
    id: BulletId,
    position: ScreenPoint,
    sprite: SpriteHandle,
}

impl Bullet {
    /// Creates a bullet at `position`.
    #[must_use]
    pub const fn new(id: BulletId, position: ScreenPoint, sprite: SpriteHandle) -> Self {
        Self {
            id,
            position,
            sprite,
        }
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> BulletId {
        self.id
    }

    /// Current top-left corner.
    #[must_use]
    pub const fn position(&self) -> ScreenPoint {
        self.position
    }
}

impl Actor for Bullet {
    fn update(&mut self, _input: &[InputEvent]) {
        self.position.y -= BULLET_SPEED;
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.blit(&self.sprite, self.position);
    }

    fn bounding_box(&self) -> Rect {
        self.sprite.rect_at(self.position)
    }
}

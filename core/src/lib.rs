#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Space Invaders workspace.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters collect [`InputEvent`]
//! batches, the session forwards them to the world as [`Command`] values via
//! its `apply` entry point, and the world broadcasts [`Event`] values that
//! describe what changed. Systems read immutable snapshots and respond
//! exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Caption shown by windowed adapters.
pub const WINDOW_TITLE: &str = "Space Invaders!";

/// Width of the playfield in screen pixels.
pub const SCREEN_WIDTH: u32 = 600;

/// Height of the playfield in screen pixels.
pub const SCREEN_HEIGHT: u32 = 600;

/// Number of simulation ticks scheduled per second.
pub const TARGET_TICK_RATE: u32 = 60;

/// Location where the player appears when a session starts.
pub const PLAYER_START: ScreenPoint = ScreenPoint::new(100, 500);

/// Horizontal velocity change applied per key edge.
pub const PLAYER_STEP: i32 = 10;

/// Location of the alien created when a session starts.
pub const ALIEN_START: ScreenPoint = ScreenPoint::new(100, 100);

/// Initial horizontal speed of the starting alien.
pub const ALIEN_SPEED: i32 = 5;

/// Leftmost x coordinate an alien may occupy before reversing.
pub const ALIEN_LEFT_LIMIT: i32 = 50;

/// Rightmost x coordinate an alien may occupy before reversing.
pub const ALIEN_RIGHT_LIMIT: i32 = 500;

/// Distance an alien descends every time it reverses direction.
pub const ALIEN_DESCENT: i32 = 10;

/// Distance a bullet travels upward every tick.
pub const BULLET_SPEED: i32 = 10;

/// Row at which fired bullets appear.
pub const BULLET_SPAWN_ROW: i32 = 500;

/// Position in screen pixels. The origin is the top-left corner and y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal offset from the left edge.
    pub x: i32,
    /// Vertical offset from the top edge.
    pub y: i32,
}

impl ScreenPoint {
    /// Creates a new screen position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position displaced by the provided velocity.
    #[must_use]
    pub const fn offset(self, velocity: Velocity) -> Self {
        Self {
            x: self.x + velocity.dx,
            y: self.y + velocity.dy,
        }
    }
}

/// Displacement applied to a position once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Velocity {
    /// Horizontal displacement per tick.
    pub dx: i32,
    /// Vertical displacement per tick.
    pub dy: i32,
}

impl Velocity {
    /// Velocity that leaves positions unchanged.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new velocity.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Pixel dimensions of a drawable sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteSize {
    width: u32,
    height: u32,
}

impl SpriteSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Axis-aligned rectangle expressed in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    origin: ScreenPoint,
    size: SpriteSize,
}

impl Rect {
    /// Constructs a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: ScreenPoint, size: SpriteSize) -> Self {
        Self { origin, size }
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> ScreenPoint {
        self.origin
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> SpriteSize {
        self.size
    }

    /// Leftmost covered column.
    #[must_use]
    pub const fn left(&self) -> i64 {
        self.origin.x as i64
    }

    /// Column just past the rightmost covered column.
    #[must_use]
    pub const fn right(&self) -> i64 {
        self.origin.x as i64 + self.size.width as i64
    }

    /// Topmost covered row.
    #[must_use]
    pub const fn top(&self) -> i64 {
        self.origin.y as i64
    }

    /// Row just past the bottommost covered row.
    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.origin.y as i64 + self.size.height as i64
    }

    /// Reports whether the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }

    /// Reports whether the two rectangles overlap.
    ///
    /// Ranges are half-open, so rectangles that merely share an edge do not
    /// intersect, and an empty rectangle never intersects anything.
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Moves the player toward decreasing x.
    Left,
    /// Moves the player toward increasing x.
    Right,
    /// Fires a bullet.
    Space,
    /// Ends the session when released.
    Escape,
}

/// Input observed by a platform since the previous poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// A key transitioned to the pressed state.
    KeyDown(Key),
    /// A key transitioned to the released state.
    KeyUp(Key),
    /// The platform asked the game to close.
    Quit,
}

/// Identifies the image resource backing a sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpriteKey {
    /// Full-screen backdrop drawn first every frame.
    Background,
    /// Player ship.
    Player,
    /// Descending alien.
    Alien,
    /// Player projectile.
    Bullet,
}

impl SpriteKey {
    /// Every sprite key in canonical load order.
    pub const ALL: [SpriteKey; 4] = [Self::Background, Self::Player, Self::Alien, Self::Bullet];
}

/// Opaque reference to a loaded, ready-to-draw image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteHandle {
    key: SpriteKey,
    size: SpriteSize,
}

impl SpriteHandle {
    /// Creates a handle referencing the image registered under `key`.
    #[must_use]
    pub const fn new(key: SpriteKey, size: SpriteSize) -> Self {
        Self { key, size }
    }

    /// Image resource the handle refers to.
    #[must_use]
    pub const fn key(&self) -> SpriteKey {
        self.key
    }

    /// Dimensions the image is drawn at.
    #[must_use]
    pub const fn size(&self) -> SpriteSize {
        self.size
    }

    /// Bounding rectangle of the image when drawn at `origin`.
    #[must_use]
    pub const fn rect_at(&self, origin: ScreenPoint) -> Rect {
        Rect::from_origin_and_size(origin, self.size)
    }
}

/// Handles for every sprite the world draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteSet {
    /// Backdrop, already scaled to the screen.
    pub background: SpriteHandle,
    /// Player ship.
    pub player: SpriteHandle,
    /// Alien.
    pub alien: SpriteHandle,
    /// Bullet.
    pub bullet: SpriteHandle,
}

/// Drawing surface that accepts sprite blits.
pub trait Canvas {
    /// Draws `sprite` with its top-left corner at `at`.
    fn blit(&mut self, sprite: &SpriteHandle, at: ScreenPoint);
}

/// Unique identifier assigned to an alien.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlienId(u32);

impl AlienId {
    /// Creates a new alien identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Bullet and alien whose rectangles overlapped during a collision scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hit {
    /// Bullet that struck the alien.
    pub bullet: BulletId,
    /// Alien that was struck.
    pub alien: AlienId,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves the player, every alien and every bullet by one tick.
    AdvanceActors {
        /// Input batch observed this tick, handed unmodified to every actor.
        input: Vec<InputEvent>,
    },
    /// Adds an alien to the active collection.
    SpawnAlien {
        /// Top-left corner of the new alien.
        origin: ScreenPoint,
        /// Signed horizontal speed of the new alien.
        speed: i32,
    },
    /// Adds a bullet to the active collection at an explicit position.
    SpawnBullet {
        /// Top-left corner of the new bullet.
        origin: ScreenPoint,
    },
    /// Fires a bullet from the player's current column at the spawn row.
    FireBullet,
    /// Removes every bullet and alien named by the hits.
    DestroyCollided {
        /// Pairs produced by the collision scan.
        hits: Vec<Hit>,
    },
    /// Removes bullets that left the playfield.
    ExpireBullets {
        /// Bullets to remove.
        bullets: Vec<BulletId>,
    },
    /// Stops the session. Stopping is terminal.
    Stop,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Every actor moved by one tick.
    ActorsAdvanced {
        /// Player position after the move.
        player: ScreenPoint,
    },
    /// An alien crossed a bound, reversed direction and descended one row.
    AlienReversed {
        /// Alien that reversed.
        alien: AlienId,
        /// Speed after the reversal.
        speed: i32,
        /// Position after the descent.
        position: ScreenPoint,
    },
    /// An alien joined the active collection.
    AlienSpawned {
        /// Identifier assigned to the alien.
        alien: AlienId,
        /// Position of the new alien.
        position: ScreenPoint,
    },
    /// A bullet joined the active collection.
    BulletSpawned {
        /// Identifier assigned to the bullet.
        bullet: BulletId,
        /// Position of the new bullet.
        position: ScreenPoint,
    },
    /// An alien was removed after being struck.
    AlienDestroyed {
        /// Alien that was removed.
        alien: AlienId,
    },
    /// A bullet was removed after striking an alien.
    BulletDestroyed {
        /// Bullet that was removed.
        bullet: BulletId,
    },
    /// A bullet was removed after leaving the playfield.
    BulletExpired {
        /// Bullet that was removed.
        bullet: BulletId,
    },
    /// The session transitioned to the stopped state.
    Stopped,
}

/// Immutable representation of a single alien used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlienSnapshot {
    /// Unique identifier assigned to the alien.
    pub id: AlienId,
    /// Top-left corner of the alien.
    pub position: ScreenPoint,
    /// Signed horizontal speed.
    pub speed: i32,
    /// Bounding rectangle at the current position.
    pub rect: Rect,
}

/// Read-only snapshot describing all active aliens.
#[derive(Clone, Debug, Default)]
pub struct AlienView {
    snapshots: Vec<AlienSnapshot>,
}

impl AlienView {
    /// Creates a new alien view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AlienSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &AlienSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured aliens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no aliens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AlienSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single bullet used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BulletSnapshot {
    /// Unique identifier assigned to the bullet.
    pub id: BulletId,
    /// Top-left corner of the bullet.
    pub position: ScreenPoint,
    /// Bounding rectangle at the current position.
    pub rect: Rect,
}

/// Read-only snapshot describing all active bullets.
#[derive(Clone, Debug, Default)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new bullet view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured bullets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no bullets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BulletSnapshot> {
        self.snapshots
    }
}

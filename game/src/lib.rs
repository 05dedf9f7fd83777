#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestration for Space Invaders.
//!
//! A [`Session`] owns the world and the pure systems and drives them one tick
//! at a time against an injected [`Platform`]. The order of the steps inside
//! [`Session::tick`] is part of the game's behavior:
//!
//! 1. wait for the tick boundary;
//! 2. poll input once;
//! 3. move the player, then the aliens, then the bullets;
//! 4. expire off-screen bullets (when culling is enabled);
//! 5. remove colliding bullet and alien pairs;
//! 6. fire a bullet if requested;
//! 7. render and present;
//! 8. stop if the batch asked to quit.

use std::fmt;

use invaders_core::{
    Canvas, Command, Event, SpriteKey, SpriteSet, SpriteSize, SCREEN_HEIGHT, SCREEN_WIDTH,
    TARGET_TICK_RATE,
};
use invaders_rendering::{Platform, ResourceLoadError};
use invaders_system_collision::Collisions;
use invaders_system_controls::Controls;
use invaders_system_culling::Culling;
use invaders_world::{self as world, query, World};

/// Whether a session keeps ticking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// The session accepts further ticks.
    Running,
    /// The session ended. Stopping is terminal.
    Stopped,
}

/// Tunables that are chosen when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Ticks scheduled per second.
    pub target_hz: u32,
    /// Whether bullets that leave the top of the screen are removed.
    pub cull_offscreen_bullets: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_hz: TARGET_TICK_RATE,
            cull_offscreen_bullets: true,
        }
    }
}

/// Summary of a finished or interrupted session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionReport {
    /// Ticks executed.
    pub ticks: u64,
    /// Aliens still active.
    pub aliens_remaining: usize,
    /// Bullets still active.
    pub bullets_active: usize,
    /// State the session ended in.
    pub state: RunState,
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            RunState::Running => "running",
            RunState::Stopped => "stopped",
        };
        write!(
            f,
            "ticks={} aliens={} bullets={} state={state}",
            self.ticks, self.aliens_remaining, self.bullets_active
        )
    }
}

/// Loads every sprite the world draws, scaling the background to the screen.
///
/// # Errors
///
/// Returns the first [`ResourceLoadError`] reported by the platform.
pub fn load_sprites<P: Platform>(platform: &mut P) -> Result<SpriteSet, ResourceLoadError> {
    let background = platform.load_image(SpriteKey::Background)?;
    let background =
        platform.scale_image(background, SpriteSize::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let sprites = SpriteSet {
        background,
        player: platform.load_image(SpriteKey::Player)?,
        alien: platform.load_image(SpriteKey::Alien)?,
        bullet: platform.load_image(SpriteKey::Bullet)?,
    };
    log::debug!("loaded sprites: {sprites:?}");
    Ok(sprites)
}

/// Game session: the world, its systems and the tick schedule.
#[derive(Debug)]
pub struct Session {
    world: World,
    config: SessionConfig,
    controls: Controls,
    collisions: Collisions,
    culling: Culling,
    commands: Vec<Command>,
    events: Vec<Event>,
    ticks: u64,
}

impl Session {
    /// Loads sprites through `platform` and creates the starting world.
    ///
    /// # Errors
    ///
    /// Fails before any tick runs when a sprite cannot be loaded.
    pub fn new<P: Platform>(
        platform: &mut P,
        config: SessionConfig,
    ) -> Result<Self, ResourceLoadError> {
        let sprites = load_sprites(platform)?;
        Ok(Self::from_world(World::new(sprites), config))
    }

    /// Wraps an already constructed world.
    #[must_use]
    pub fn from_world(world: World, config: SessionConfig) -> Self {
        Self {
            world,
            config,
            controls: Controls::new(),
            collisions: Collisions::new(),
            culling: Culling::new(),
            commands: Vec::new(),
            events: Vec::new(),
            ticks: 0,
        }
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of ticks executed so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current run state.
    #[must_use]
    pub fn run_state(&self) -> RunState {
        if query::is_running(&self.world) {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    /// Applies a command to the world immediately, outside the tick schedule.
    pub fn submit(&mut self, command: Command) {
        self.commands.push(command);
        self.flush();
    }

    /// Runs one complete tick against `platform`.
    pub fn tick<P: Platform>(&mut self, platform: &mut P) -> RunState {
        if self.run_state() == RunState::Stopped {
            return RunState::Stopped;
        }

        platform.sleep_until_next_tick(self.config.target_hz);
        let input = platform.poll_events();
        if !input.is_empty() {
            log::trace!("tick {} input: {input:?}", self.ticks);
        }

        self.commands.push(Command::AdvanceActors {
            input: input.clone(),
        });
        self.flush();

        if self.config.cull_offscreen_bullets {
            self.culling
                .handle(&query::bullet_view(&self.world), &mut self.commands);
            self.flush();
        }

        self.collisions.handle(
            &query::bullet_view(&self.world),
            &query::alien_view(&self.world),
            &mut self.commands,
        );
        self.flush();

        self.controls.handle_fire(&input, &mut self.commands);
        self.flush();

        self.render(platform);
        platform.present();

        self.controls.handle_quit(&input, &mut self.commands);
        self.flush();

        self.ticks = self.ticks.saturating_add(1);
        self.run_state()
    }

    /// Draws the current world without advancing it.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        world::render(&self.world, canvas);
    }

    /// Ticks until the session stops.
    pub fn run<P: Platform>(&mut self, platform: &mut P) -> SessionReport {
        log::info!("session started at {} ticks per second", self.config.target_hz);
        while self.tick(platform) == RunState::Running {}
        let report = self.report();
        log::info!("session finished: {report}");
        report
    }

    /// Ticks until the session stops or `max_ticks` ticks have run.
    pub fn run_for<P: Platform>(&mut self, platform: &mut P, max_ticks: u64) -> SessionReport {
        log::info!(
            "session started at {} ticks per second, limited to {max_ticks} ticks",
            self.config.target_hz
        );
        for _ in 0..max_ticks {
            if self.tick(platform) == RunState::Stopped {
                break;
            }
        }
        let report = self.report();
        log::info!("session finished: {report}");
        report
    }

    /// Summarises the session so far.
    #[must_use]
    pub fn report(&self) -> SessionReport {
        SessionReport {
            ticks: self.ticks,
            aliens_remaining: query::alien_view(&self.world).len(),
            bullets_active: query::bullet_view(&self.world).len(),
            state: self.run_state(),
        }
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        for event in self.events.drain(..) {
            log_event(&event);
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::ActorsAdvanced { .. } | Event::AlienReversed { .. } => {
            log::trace!("{event:?}");
        }
        Event::AlienDestroyed { alien } => log::debug!("alien {} destroyed", alien.get()),
        Event::BulletDestroyed { bullet } => log::debug!("bullet {} destroyed", bullet.get()),
        Event::BulletExpired { bullet } => log::debug!("bullet {} left the screen", bullet.get()),
        Event::AlienSpawned { alien, position } => {
            log::debug!("alien {} spawned at {position:?}", alien.get());
        }
        Event::BulletSpawned { bullet, position } => {
            log::debug!("bullet {} fired from {position:?}", bullet.get());
        }
        Event::Stopped => log::info!("quit requested"),
    }
}

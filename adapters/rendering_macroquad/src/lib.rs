#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed window for Space Invaders.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! [`MacroquadPlatform`] implements the shared [`Platform`] contract on top of
//! macroquad's texture, input and window calls. [`MacroquadBackend`] opens the
//! window and drives a [`Session`] once per displayed frame.

mod sprites;

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::mpsc,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use invaders_core::{
    Canvas, InputEvent, Key, ScreenPoint, SpriteHandle, SpriteKey, SpriteSize, SCREEN_HEIGHT,
    SCREEN_WIDTH, WINDOW_TITLE,
};
use invaders_game::{RunState, Session, SessionConfig, SessionReport};
use invaders_rendering::{FrameClock, Platform, ResourceLoadError};
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::{
    color::{BLACK, WHITE},
    input::{is_key_pressed, is_key_released, is_quit_requested, prevent_quit, KeyCode},
    texture::{draw_texture_ex, DrawTextureParams},
};

use self::sprites::SpriteAtlas;

/// Default location of the sprite manifest.
pub const DEFAULT_MANIFEST_PATH: &str = "assets/manifest.toml";

const KEY_BINDINGS: [(KeyCode, Key); 4] = [
    (KeyCode::Left, Key::Left),
    (KeyCode::Right, Key::Right),
    (KeyCode::Space, Key::Space),
    (KeyCode::Escape, Key::Escape),
];

/// Translates one frame of keyboard edges into input events.
///
/// Presses come before releases for the same key so a tap inside one frame
/// still reaches the game. A close request is reported last.
fn translate_input(
    pressed: impl Fn(KeyCode) -> bool,
    released: impl Fn(KeyCode) -> bool,
    quit_requested: bool,
) -> Vec<InputEvent> {
    let mut events = Vec::new();
    for (code, key) in KEY_BINDINGS {
        if pressed(code) {
            events.push(InputEvent::KeyDown(key));
        }
        if released(code) {
            events.push(InputEvent::KeyUp(key));
        }
    }
    if quit_requested {
        events.push(InputEvent::Quit);
    }
    events
}

/// Top-left corner and destination size of a sprite on screen.
fn sprite_placement(sprite: &SpriteHandle, at: ScreenPoint) -> (Vec2, Vec2) {
    let size = sprite.size();
    (
        Vec2::new(at.x as f32, at.y as f32),
        Vec2::new(size.width() as f32, size.height() as f32),
    )
}

/// Whether presentation already waits for the vertical blank.
fn synchronised_to_display(swap_interval: Option<i32>) -> bool {
    matches!(swap_interval, Some(interval) if interval > 0)
}

fn to_macroquad_vec(value: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(value.x, value.y)
}

/// [`Platform`] implementation backed by macroquad.
///
/// Textures are loaded lazily through the sprite manifest, which requires a
/// live graphics context: construct the platform inside the window future.
#[derive(Debug)]
pub struct MacroquadPlatform {
    atlas: SpriteAtlas,
    clock: Option<FrameClock>,
}

impl MacroquadPlatform {
    /// Reads the sprite manifest at `manifest_path`.
    ///
    /// Ticks are paced by a [`FrameClock`] unless `swap_interval` already
    /// blocks on the display's vertical blank.
    ///
    /// # Errors
    ///
    /// Fails when the manifest is unreadable or does not name every sprite.
    pub fn from_manifest(
        manifest_path: &Path,
        swap_interval: Option<i32>,
    ) -> Result<Self, ResourceLoadError> {
        Ok(Self {
            atlas: SpriteAtlas::from_manifest_path(manifest_path)?,
            clock: (!synchronised_to_display(swap_interval)).then(FrameClock::new),
        })
    }
}

impl Canvas for MacroquadPlatform {
    fn blit(&mut self, sprite: &SpriteHandle, at: ScreenPoint) {
        let Some(texture) = self.atlas.texture(sprite.key()) else {
            log::warn!("sprite {:?} drawn before it was loaded", sprite.key());
            return;
        };
        let (position, dest_size) = sprite_placement(sprite, at);
        let params = DrawTextureParams {
            dest_size: Some(to_macroquad_vec(dest_size)),
            ..DrawTextureParams::default()
        };
        draw_texture_ex(texture, position.x, position.y, WHITE, params);
    }
}

impl Platform for MacroquadPlatform {
    fn load_image(&mut self, key: SpriteKey) -> Result<SpriteHandle, ResourceLoadError> {
        let texture = self.atlas.load(key)?;
        let size = SpriteSize::new(texture.width() as u32, texture.height() as u32);
        Ok(SpriteHandle::new(key, size))
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        translate_input(is_key_pressed, is_key_released, is_quit_requested())
    }

    fn present(&mut self) {
        // The backend awaits `next_frame` once the tick returns.
    }

    fn sleep_until_next_tick(&mut self, target_hz: u32) {
        if let Some(clock) = self.clock.as_mut() {
            clock.wait(target_hz);
        }
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a presented frame and returns the per-second and trailing
    /// ten-second averages once one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

/// Opens the game window and runs a session inside it.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or present as fast as the tick clock allows.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Reads sprites from the manifest at `path`.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Runs a session in a new window until it stops.
    ///
    /// # Errors
    ///
    /// Fails when the sprite manifest or any sprite cannot be loaded. The
    /// window closes before the error is returned.
    pub fn run(self, config: SessionConfig) -> Result<SessionReport> {
        let Self {
            swap_interval,
            show_fps,
            manifest_path,
        } = self;

        let mut window = macroquad::window::Conf {
            window_title: WINDOW_TITLE.to_owned(),
            window_width: SCREEN_WIDTH as i32,
            window_height: SCREEN_HEIGHT as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            window.platform.swap_interval = Some(swap_interval);
        }

        let (report_sender, report_receiver) = mpsc::channel::<Result<SessionReport>>();

        macroquad::Window::from_config(window, async move {
            let started = MacroquadPlatform::from_manifest(&manifest_path, swap_interval)
                .and_then(|mut platform| {
                    Session::new(&mut platform, config).map(|session| (platform, session))
                })
                .with_context(|| {
                    format!("failed to load sprites from {}", manifest_path.display())
                });
            let (mut platform, mut session) = match started {
                Ok(started) => started,
                Err(error) => {
                    let _ = report_sender.send(Err(error));
                    return;
                }
            };

            prevent_quit();
            log::info!("window opened at {SCREEN_WIDTH}x{SCREEN_HEIGHT}");

            let mut fps_counter = FpsCounter::default();
            let mut last_frame = Instant::now();
            loop {
                macroquad::window::clear_background(BLACK);
                let state = session.tick(&mut platform);

                let now = Instant::now();
                let metrics = fps_counter.record_frame(now.saturating_duration_since(last_frame));
                last_frame = now;
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                    }) = metrics
                    {
                        log::info!("FPS: {per_second:.2} (10s avg: {trailing_ten_seconds:.2})");
                    }
                }

                if state == RunState::Stopped {
                    break;
                }
                macroquad::window::next_frame().await;
            }

            let _ = report_sender.send(Ok(session.report()));
        });

        report_receiver
            .recv()
            .map_err(|_| anyhow!("window closed before the session finished"))?
    }
}

//! Platform that renders into memory and replays scripted input.

use std::collections::{BTreeMap, BTreeSet};

use invaders_core::{
    Canvas, InputEvent, ScreenPoint, SpriteHandle, SpriteKey, SpriteSize, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};

use crate::{Color, FrameBuffer, FrameClock, InputScript, Platform, ResourceLoadError};

/// Native size and flat fill color standing in for an image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteStyle {
    /// Size reported by `load_image`.
    pub size: SpriteSize,
    /// Color painted over the sprite's rectangle.
    pub color: Color,
}

impl SpriteStyle {
    /// Creates a new sprite style.
    #[must_use]
    pub const fn new(size: SpriteSize, color: Color) -> Self {
        Self { size, color }
    }
}

fn default_styles() -> BTreeMap<SpriteKey, SpriteStyle> {
    BTreeMap::from([
        (
            SpriteKey::Background,
            SpriteStyle::new(SpriteSize::new(800, 800), Color::from_rgb_u8(8, 8, 32)),
        ),
        (
            SpriteKey::Player,
            SpriteStyle::new(SpriteSize::new(50, 40), Color::from_rgb_u8(64, 220, 96)),
        ),
        (
            SpriteKey::Alien,
            SpriteStyle::new(SpriteSize::new(48, 32), Color::from_rgb_u8(220, 64, 200)),
        ),
        (
            SpriteKey::Bullet,
            SpriteStyle::new(SpriteSize::new(6, 16), Color::from_rgb_u8(250, 230, 80)),
        ),
    ])
}

/// Platform without a window.
///
/// Every sprite is drawn as a filled rectangle in its style color, input comes
/// from an [`InputScript`], and pacing is off unless requested.
#[derive(Debug)]
pub struct HeadlessPlatform {
    frame: FrameBuffer,
    presented: Option<FrameBuffer>,
    frames_presented: u64,
    styles: BTreeMap<SpriteKey, SpriteStyle>,
    missing: BTreeSet<SpriteKey>,
    script: InputScript,
    polls: u64,
    clock: Option<FrameClock>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self {
            frame: FrameBuffer::new(SpriteSize::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
            presented: None,
            frames_presented: 0,
            styles: default_styles(),
            missing: BTreeSet::new(),
            script: InputScript::new(),
            polls: 0,
            clock: None,
        }
    }
}

impl HeadlessPlatform {
    /// Creates a screen-sized, unpaced platform with default sprite styles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays `script` from the next poll onward.
    #[must_use]
    pub fn with_script(mut self, script: InputScript) -> Self {
        self.script = script;
        self
    }

    /// Overrides the style used for `key`.
    #[must_use]
    pub fn with_sprite(mut self, key: SpriteKey, style: SpriteStyle) -> Self {
        let _ = self.styles.insert(key, style);
        let _ = self.missing.remove(&key);
        self
    }

    /// Makes loading `key` fail as if its image were absent.
    #[must_use]
    pub fn without_sprite(mut self, key: SpriteKey) -> Self {
        let _ = self.missing.insert(key);
        self
    }

    /// Enables or disables real-time pacing.
    #[must_use]
    pub fn with_pacing(mut self, enabled: bool) -> Self {
        self.clock = enabled.then(FrameClock::new);
        self
    }

    /// Pixels drawn since the last presentation.
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Most recently presented frame.
    #[must_use]
    pub fn last_presented(&self) -> Option<&FrameBuffer> {
        self.presented.as_ref()
    }

    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Number of times input was polled.
    #[must_use]
    pub const fn polls(&self) -> u64 {
        self.polls
    }

    /// Style used for `key`, if the sprite is available.
    #[must_use]
    pub fn style(&self, key: SpriteKey) -> Option<SpriteStyle> {
        if self.missing.contains(&key) {
            return None;
        }
        self.styles.get(&key).copied()
    }
}

impl Canvas for HeadlessPlatform {
    fn blit(&mut self, sprite: &SpriteHandle, at: ScreenPoint) {
        if let Some(style) = self.style(sprite.key()) {
            self.frame.fill_rect(sprite.rect_at(at), style.color);
        }
    }
}

impl Platform for HeadlessPlatform {
    fn load_image(&mut self, key: SpriteKey) -> Result<SpriteHandle, ResourceLoadError> {
        self.style(key)
            .map(|style| SpriteHandle::new(key, style.size))
            .ok_or(ResourceLoadError::Missing { key })
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let batch = self.script.batch(self.polls);
        self.polls = self.polls.saturating_add(1);
        batch
    }

    fn present(&mut self) {
        self.presented = Some(self.frame.clone());
        self.frames_presented = self.frames_presented.saturating_add(1);
    }

    fn sleep_until_next_tick(&mut self, target_hz: u32) {
        if let Some(clock) = self.clock.as_mut() {
            clock.wait(target_hz);
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared platform contracts for Space Invaders adapters.
//!
//! A [`Platform`] is everything the session needs from the outside world:
//! image loading, drawing, presentation, input polling and frame pacing. The
//! windowed backend lives in its own crate; [`HeadlessPlatform`] renders into
//! a software [`FrameBuffer`] and replays an [`InputScript`], which lets the
//! per-tick logic run without any windowing system.

mod clock;
mod frame_buffer;
mod headless;
mod script;

use std::path::PathBuf;

use invaders_core::{Canvas, InputEvent, SpriteHandle, SpriteKey, SpriteSize};
use thiserror::Error;

pub use self::{
    clock::{next_deadline, tick_interval, FrameClock},
    frame_buffer::FrameBuffer,
    headless::{HeadlessPlatform, SpriteStyle},
    script::InputScript,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Packs the color into a `0xAARRGGBB` pixel.
    #[must_use]
    pub fn to_argb(self) -> u32 {
        (channel_to_u8(self.alpha) << 24)
            | (channel_to_u8(self.red) << 16)
            | (channel_to_u8(self.green) << 8)
            | channel_to_u8(self.blue)
    }
}

fn channel_to_u8(channel: f32) -> u32 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u32
}

/// Environment the game runs in.
///
/// Implementations own the window (or its stand-in), the loaded images and the
/// input source. The session drives them through one tick at a time.
pub trait Platform: Canvas {
    /// Loads the image registered for `key` at its native size.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceLoadError`] when the image is missing or unreadable.
    fn load_image(&mut self, key: SpriteKey) -> Result<SpriteHandle, ResourceLoadError>;

    /// Returns a handle that draws the same image at `size`.
    fn scale_image(&mut self, handle: SpriteHandle, size: SpriteSize) -> SpriteHandle {
        SpriteHandle::new(handle.key(), size)
    }

    /// Drains the input observed since the previous call, oldest first.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Shows everything drawn since the previous presentation.
    fn present(&mut self);

    /// Blocks until the next tick boundary of a `target_hz` schedule.
    fn sleep_until_next_tick(&mut self, target_hz: u32);
}

/// Failure to obtain a required image. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ResourceLoadError {
    /// No image is registered for the sprite.
    #[error("no image registered for sprite {key:?}")]
    Missing {
        /// Sprite that has no image.
        key: SpriteKey,
    },
    /// The image file could not be read.
    #[error("failed to read image for sprite {key:?} from {}", path.display())]
    Unreadable {
        /// Sprite whose image failed to load.
        key: SpriteKey,
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The sprite manifest is malformed or incomplete.
    #[error("invalid sprite manifest: {reason}")]
    Manifest {
        /// Description of the problem.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_pack_into_argb_pixels() {
        assert_eq!(Color::from_rgb_u8(0x12, 0x34, 0x56).to_argb(), 0xff12_3456);
        assert_eq!(Color::new(0.0, 0.0, 0.0, 0.0).to_argb(), 0);
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(Color::new(2.0, -1.0, 1.0, 1.0).to_argb(), 0xffff_00ff);
    }

    #[test]
    fn missing_sprite_error_names_the_sprite() {
        let error = ResourceLoadError::Missing {
            key: SpriteKey::Alien,
        };
        assert_eq!(error.to_string(), "no image registered for sprite Alien");
    }
}

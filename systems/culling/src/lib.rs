#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that expires bullets once they leave the top of the screen.

use invaders_core::{BulletId, BulletView, Command};

/// Culling system that queues expiry of bullets above the playfield.
#[derive(Debug, Default)]
pub struct Culling {
    scratch: Vec<BulletId>,
}

impl Culling {
    /// Creates a new culling system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::ExpireBullets` for bullets drawn entirely above row zero.
    ///
    /// Bullets only travel upward, so a bullet that cleared the top edge can
    /// never become visible again.
    pub fn handle(&mut self, bullets: &BulletView, out: &mut Vec<Command>) {
        self.scratch.clear();
        self.scratch.extend(
            bullets
                .iter()
                .filter(|bullet| bullet.rect.bottom() <= 0)
                .map(|bullet| bullet.id),
        );

        if self.scratch.is_empty() {
            return;
        }

        out.push(Command::ExpireBullets {
            bullets: std::mem::take(&mut self.scratch),
        });
    }
}

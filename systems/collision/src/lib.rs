#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that pairs bullets with the aliens they strike.
//!
//! The scan never mutates the world. It walks bullets and aliens in ascending
//! id order and records at most one hit per bullet and per alien. The world
//! removes every recorded pair in a single compaction when it applies the
//! emitted [`Command::DestroyCollided`].

use std::collections::BTreeSet;

use invaders_core::{AlienId, AlienView, BulletView, Command, Hit};

/// Collision system that queues removal of overlapping bullet and alien pairs.
#[derive(Debug, Default)]
pub struct Collisions {
    claimed: BTreeSet<AlienId>,
    scratch: Vec<Hit>,
}

impl Collisions {
    /// Creates a new collision system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a `Command::DestroyCollided` naming every hit found this tick.
    ///
    /// The first alien a bullet overlaps, in ascending id order, wins. Once a
    /// pair is recorded neither member takes part in later comparisons, so a
    /// bullet overlapping two aliens removes only the lower id and two bullets
    /// overlapping one alien spend only the lower-id bullet.
    pub fn handle(&mut self, bullets: &BulletView, aliens: &AlienView, out: &mut Vec<Command>) {
        if bullets.is_empty() || aliens.is_empty() {
            return;
        }

        self.claimed.clear();
        self.scratch.clear();

        for bullet in bullets.iter() {
            let struck = aliens
                .iter()
                .filter(|alien| !self.claimed.contains(&alien.id))
                .find(|alien| bullet.rect.intersects(&alien.rect));

            if let Some(alien) = struck {
                let _ = self.claimed.insert(alien.id);
                self.scratch.push(Hit {
                    bullet: bullet.id,
                    alien: alien.id,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.push(Command::DestroyCollided {
            hits: std::mem::take(&mut self.scratch),
        });
    }
}

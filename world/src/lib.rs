#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Space Invaders.

mod actors;

use std::collections::BTreeSet;

use invaders_core::{
    AlienId, BulletId, Canvas, Command, Event, InputEvent, ScreenPoint, SpriteSet, ALIEN_SPEED,
    ALIEN_START, BULLET_SPAWN_ROW, PLAYER_START,
};

pub use actors::{Actor, Alien, Bullet, Motion, Player};

/// Represents the authoritative Space Invaders world state.
#[derive(Debug)]
pub struct World {
    sprites: SpriteSet,
    player: Player,
    aliens: Vec<Alien>,
    bullets: Vec<Bullet>,
    running: bool,
    next_alien_id: AlienId,
    next_bullet_id: BulletId,
}

impl World {
    /// Creates the starting world: the player and a single alien.
    #[must_use]
    pub fn new(sprites: SpriteSet) -> Self {
        let mut world = Self::empty(sprites);
        let _ = world.spawn_alien(ALIEN_START, ALIEN_SPEED);
        world
    }

    /// Creates a world holding only the player.
    #[must_use]
    pub fn empty(sprites: SpriteSet) -> Self {
        Self {
            player: Player::new(PLAYER_START, sprites.player),
            sprites,
            aliens: Vec::new(),
            bullets: Vec::new(),
            running: true,
            next_alien_id: AlienId::new(0),
            next_bullet_id: BulletId::new(0),
        }
    }

    fn spawn_alien(&mut self, origin: ScreenPoint, speed: i32) -> AlienId {
        let id = self.next_alien_id;
        self.next_alien_id = AlienId::new(id.get().saturating_add(1));
        self.aliens.push(Alien::new(id, origin, speed, self.sprites.alien));
        id
    }

    fn spawn_bullet(&mut self, origin: ScreenPoint) -> BulletId {
        let id = self.next_bullet_id;
        self.next_bullet_id = BulletId::new(id.get().saturating_add(1));
        self.bullets.push(Bullet::new(id, origin, self.sprites.bullet));
        id
    }

    fn advance_actors(&mut self, input: &[InputEvent], out_events: &mut Vec<Event>) {
        self.player.update(input);
        for alien in &mut self.aliens {
            alien.update(input);
            if alien.last_motion() == Motion::Reversed {
                out_events.push(Event::AlienReversed {
                    alien: alien.id(),
                    speed: alien.speed(),
                    position: alien.position(),
                });
            }
        }
        for bullet in &mut self.bullets {
            bullet.update(input);
        }
        out_events.push(Event::ActorsAdvanced {
            player: self.player.position(),
        });
    }

    fn remove_bullets(
        &mut self,
        doomed: &BTreeSet<BulletId>,
        announce: fn(BulletId) -> Event,
        out_events: &mut Vec<Event>,
    ) {
        out_events.extend(
            self.bullets
                .iter()
                .filter(|bullet| doomed.contains(&bullet.id()))
                .map(|bullet| announce(bullet.id())),
        );
        self.bullets.retain(|bullet| !doomed.contains(&bullet.id()));
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if !world.running {
        return;
    }

    match command {
        Command::AdvanceActors { input } => world.advance_actors(&input, out_events),
        Command::SpawnAlien { origin, speed } => {
            let alien = world.spawn_alien(origin, speed);
            out_events.push(Event::AlienSpawned {
                alien,
                position: origin,
            });
        }
        Command::SpawnBullet { origin } => {
            let bullet = world.spawn_bullet(origin);
            out_events.push(Event::BulletSpawned {
                bullet,
                position: origin,
            });
        }
        Command::FireBullet => {
            let origin = ScreenPoint::new(world.player.position().x, BULLET_SPAWN_ROW);
            let bullet = world.spawn_bullet(origin);
            out_events.push(Event::BulletSpawned {
                bullet,
                position: origin,
            });
        }
        Command::DestroyCollided { hits } => {
            if hits.is_empty() {
                return;
            }

            let doomed_aliens: BTreeSet<AlienId> = hits.iter().map(|hit| hit.alien).collect();
            let doomed_bullets: BTreeSet<BulletId> = hits.iter().map(|hit| hit.bullet).collect();

            for alien in world
                .aliens
                .iter()
                .filter(|alien| doomed_aliens.contains(&alien.id()))
            {
                out_events.push(Event::AlienDestroyed { alien: alien.id() });
            }
            world
                .aliens
                .retain(|alien| !doomed_aliens.contains(&alien.id()));

            world.remove_bullets(
                &doomed_bullets,
                |bullet| Event::BulletDestroyed { bullet },
                out_events,
            );
        }
        Command::ExpireBullets { bullets } => {
            if bullets.is_empty() {
                return;
            }

            let doomed: BTreeSet<BulletId> = bullets.into_iter().collect();
            world.remove_bullets(&doomed, |bullet| Event::BulletExpired { bullet }, out_events);
        }
        Command::Stop => {
            world.running = false;
            out_events.push(Event::Stopped);
        }
    }
}

/// Draws the background, the player, every alien and every bullet, back to front.
pub fn render(world: &World, canvas: &mut dyn Canvas) {
    canvas.blit(&world.sprites.background, ScreenPoint::new(0, 0));
    world.player.draw(canvas);
    for alien in &world.aliens {
        alien.draw(canvas);
    }
    for bullet in &world.bullets {
        bullet.draw(canvas);
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Actor, World};
    use invaders_core::{
        AlienSnapshot, AlienView, BulletSnapshot, BulletView, ScreenPoint, Velocity,
    };

    /// Reports whether the world still accepts commands.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.running
    }

    /// Current top-left corner of the player.
    #[must_use]
    pub fn player_position(world: &World) -> ScreenPoint {
        world.player.position()
    }

    /// Velocity currently accumulated by the player.
    #[must_use]
    pub fn player_velocity(world: &World) -> Velocity {
        world.player.velocity()
    }

    /// Captures a read-only view of the active aliens.
    #[must_use]
    pub fn alien_view(world: &World) -> AlienView {
        AlienView::from_snapshots(
            world
                .aliens
                .iter()
                .map(|alien| AlienSnapshot {
                    id: alien.id(),
                    position: alien.position(),
                    speed: alien.speed(),
                    rect: alien.bounding_box(),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the active bullets.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        BulletView::from_snapshots(
            world
                .bullets
                .iter()
                .map(|bullet| BulletSnapshot {
                    id: bullet.id(),
                    position: bullet.position(),
                    rect: bullet.bounding_box(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invaders_core::{Hit, Key, SpriteHandle, SpriteKey, SpriteSize};

    fn sprites() -> SpriteSet {
        SpriteSet {
            background: SpriteHandle::new(SpriteKey::Background, SpriteSize::new(600, 600)),
            player: SpriteHandle::new(SpriteKey::Player, SpriteSize::new(40, 30)),
            alien: SpriteHandle::new(SpriteKey::Alien, SpriteSize::new(40, 30)),
            bullet: SpriteHandle::new(SpriteKey::Bullet, SpriteSize::new(6, 14)),
        }
    }

    #[derive(Default)]
    struct RecordingCanvas {
        blits: Vec<(SpriteKey, ScreenPoint)>,
    }

    impl Canvas for RecordingCanvas {
        fn blit(&mut self, sprite: &SpriteHandle, at: ScreenPoint) {
            self.blits.push((sprite.key(), at));
        }
    }

    #[test]
    fn render_draws_background_player_aliens_then_bullets() {
        let mut world = World::empty(sprites());
        let mut events = Vec::new();
        for origin in [ScreenPoint::new(300, 200), ScreenPoint::new(100, 50)] {
            apply(&mut world, Command::SpawnAlien { origin, speed: 5 }, &mut events);
        }
        for origin in [ScreenPoint::new(20, 20), ScreenPoint::new(10, 10)] {
            apply(&mut world, Command::SpawnBullet { origin }, &mut events);
        }

        let mut canvas = RecordingCanvas::default();
        render(&world, &mut canvas);

        assert_eq!(
            canvas.blits,
            vec![
                (SpriteKey::Background, ScreenPoint::new(0, 0)),
                (SpriteKey::Player, PLAYER_START),
                (SpriteKey::Alien, ScreenPoint::new(300, 200)),
                (SpriteKey::Alien, ScreenPoint::new(100, 50)),
                (SpriteKey::Bullet, ScreenPoint::new(20, 20)),
                (SpriteKey::Bullet, ScreenPoint::new(10, 10)),
            ]
        );
    }

    #[test]
    fn render_keeps_id_order_after_removals() {
        let mut world = World::empty(sprites());
        let mut events = Vec::new();
        for x in [100, 200, 300] {
            apply(
                &mut world,
                Command::SpawnAlien {
                    origin: ScreenPoint::new(x, 100),
                    speed: 0,
                },
                &mut events,
            );
        }
        apply(
            &mut world,
            Command::SpawnBullet {
                origin: ScreenPoint::new(200, 100),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::DestroyCollided {
                hits: vec![Hit {
                    bullet: BulletId::new(0),
                    alien: AlienId::new(1),
                }],
            },
            &mut events,
        );

        let mut canvas = RecordingCanvas::default();
        render(&world, &mut canvas);

        let aliens: Vec<ScreenPoint> = canvas
            .blits
            .iter()
            .filter(|(key, _)| *key == SpriteKey::Alien)
            .map(|(_, at)| *at)
            .collect();
        assert_eq!(
            aliens,
            vec![ScreenPoint::new(100, 100), ScreenPoint::new(300, 100)]
        );
        assert_eq!(canvas.blits.last().map(|(key, _)| *key), Some(SpriteKey::Alien));
    }

    #[test]
    fn new_world_holds_one_alien_and_no_bullets() {
        let world = World::new(sprites());
        let aliens = query::alien_view(&world).into_vec();
        assert_eq!(aliens.len(), 1);
        assert_eq!(aliens[0].position, ALIEN_START);
        assert_eq!(aliens[0].speed, ALIEN_SPEED);
        assert!(query::bullet_view(&world).is_empty());
        assert_eq!(query::player_position(&world), PLAYER_START);
        assert!(query::is_running(&world));
    }

    #[test]
    fn fire_spawns_bullet_at_player_column() {
        let mut world = World::empty(sprites());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AdvanceActors {
                input: vec![InputEvent::KeyDown(Key::Right)],
            },
            &mut events,
        );
        apply(&mut world, Command::FireBullet, &mut events);

        let bullets = query::bullet_view(&world).into_vec();
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].position, ScreenPoint::new(110, BULLET_SPAWN_ROW));
        assert!(events.contains(&Event::BulletSpawned {
            bullet: BulletId::new(0),
            position: ScreenPoint::new(110, BULLET_SPAWN_ROW),
        }));
    }

    #[test]
    fn advance_reports_alien_reversals() {
        let mut world = World::empty(sprites());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnAlien {
                origin: ScreenPoint::new(498, 40),
                speed: 5,
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::AdvanceActors { input: Vec::new() }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::AlienReversed {
                    alien: AlienId::new(0),
                    speed: -5,
                    position: ScreenPoint::new(503, 50),
                },
                Event::ActorsAdvanced {
                    player: PLAYER_START,
                },
            ]
        );
    }

    #[test]
    fn destroy_collided_compacts_both_collections_once() {
        let mut world = World::empty(sprites());
        let mut events = Vec::new();
        for x in [100, 200, 300] {
            apply(
                &mut world,
                Command::SpawnAlien {
                    origin: ScreenPoint::new(x, 100),
                    speed: 5,
                },
                &mut events,
            );
            apply(
                &mut world,
                Command::SpawnBullet {
                    origin: ScreenPoint::new(x, 400),
                },
                &mut events,
            );
        }
        events.clear();

        apply(
            &mut world,
            Command::DestroyCollided {
                hits: vec![
                    Hit {
                        bullet: BulletId::new(0),
                        alien: AlienId::new(2),
                    },
                    Hit {
                        bullet: BulletId::new(2),
                        alien: AlienId::new(0),
                    },
                ],
            },
            &mut events,
        );

        let aliens: Vec<_> = query::alien_view(&world).iter().map(|a| a.id).collect();
        let bullets: Vec<_> = query::bullet_view(&world).iter().map(|b| b.id).collect();
        assert_eq!(aliens, vec![AlienId::new(1)]);
        assert_eq!(bullets, vec![BulletId::new(1)]);
        assert_eq!(
            events,
            vec![
                Event::AlienDestroyed {
                    alien: AlienId::new(0)
                },
                Event::AlienDestroyed {
                    alien: AlienId::new(2)
                },
                Event::BulletDestroyed {
                    bullet: BulletId::new(0)
                },
                Event::BulletDestroyed {
                    bullet: BulletId::new(2)
                },
            ]
        );
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let mut world = World::new(sprites());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DestroyCollided {
                hits: vec![Hit {
                    bullet: BulletId::new(7),
                    alien: AlienId::new(0),
                }],
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnAlien {
                origin: ALIEN_START,
                speed: ALIEN_SPEED,
            },
            &mut events,
        );

        let ids: Vec<_> = query::alien_view(&world).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![AlienId::new(1)]);
    }

    #[test]
    fn expire_ignores_unknown_bullets() {
        let mut world = World::empty(sprites());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnBullet {
                origin: ScreenPoint::new(0, 0),
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::ExpireBullets {
                bullets: vec![BulletId::new(0), BulletId::new(9)],
            },
            &mut events,
        );

        assert!(query::bullet_view(&world).is_empty());
        assert_eq!(
            events,
            vec![Event::BulletExpired {
                bullet: BulletId::new(0)
            }]
        );
    }

    #[test]
    fn stop_is_terminal() {
        let mut world = World::new(sprites());
        let mut events = Vec::new();
        apply(&mut world, Command::Stop, &mut events);
        apply(&mut world, Command::FireBullet, &mut events);
        apply(&mut world, Command::Stop, &mut events);

        assert!(!query::is_running(&world));
        assert!(query::bullet_view(&world).is_empty());
        assert_eq!(events, vec![Event::Stopped]);
    }
}

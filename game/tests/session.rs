use invaders_core::{
    Command, InputEvent, Key, ScreenPoint, SpriteKey, ALIEN_START, PLAYER_START,
};
use invaders_game::{load_sprites, RunState, Session, SessionConfig};
use invaders_rendering::{HeadlessPlatform, InputScript, ResourceLoadError};
use invaders_world::{query, World};

fn empty_session(platform: &mut HeadlessPlatform, config: SessionConfig) -> Session {
    let sprites = load_sprites(platform).expect("default sprites load");
    Session::from_world(World::empty(sprites), config)
}

fn pixel_color(platform: &HeadlessPlatform, key: SpriteKey) -> u32 {
    platform
        .style(key)
        .expect("sprite has a style")
        .color
        .to_argb()
}

#[test]
fn new_session_starts_with_player_and_one_alien() {
    let mut platform = HeadlessPlatform::new();
    let session = Session::new(&mut platform, SessionConfig::default()).expect("session starts");

    assert_eq!(query::player_position(session.world()), PLAYER_START);
    let aliens = query::alien_view(session.world()).into_vec();
    assert_eq!(aliens.len(), 1);
    assert_eq!(aliens[0].position, ALIEN_START);
    assert_eq!(session.run_state(), RunState::Running);
}

#[test]
fn missing_sprite_aborts_before_the_loop() {
    let mut platform = HeadlessPlatform::new().without_sprite(SpriteKey::Alien);

    let error = Session::new(&mut platform, SessionConfig::default())
        .expect_err("alien sprite is missing");

    assert!(matches!(
        error,
        ResourceLoadError::Missing {
            key: SpriteKey::Alien
        }
    ));
    assert_eq!(platform.polls(), 0);
    assert_eq!(platform.frames_presented(), 0);
}

#[test]
fn empty_world_only_moves_the_player() {
    let script = InputScript::new()
        .with_batch(0, [InputEvent::KeyDown(Key::Right)])
        .with_batch(3, [InputEvent::KeyUp(Key::Right)]);
    let mut platform = HeadlessPlatform::new().with_script(script);
    let mut session = empty_session(&mut platform, SessionConfig::default());

    let report = session.run_for(&mut platform, 10);

    assert_eq!(report.ticks, 10);
    assert_eq!(report.state, RunState::Running);
    assert_eq!(report.aliens_remaining, 0);
    assert_eq!(report.bullets_active, 0);
    assert_eq!(
        query::player_position(session.world()),
        ScreenPoint::new(PLAYER_START.x + 30, PLAYER_START.y)
    );
    assert_eq!(query::player_velocity(session.world()).dx, 0);
    assert_eq!(platform.frames_presented(), 10);
}

#[test]
fn coincident_bullet_and_alien_vanish_in_one_tick() {
    let mut platform = HeadlessPlatform::new();
    let mut session = empty_session(&mut platform, SessionConfig::default());
    session.submit(Command::SpawnBullet {
        origin: ScreenPoint::new(100, 500),
    });
    session.submit(Command::SpawnAlien {
        origin: ScreenPoint::new(100, 500),
        speed: 5,
    });

    let state = session.tick(&mut platform);

    assert_eq!(state, RunState::Running);
    assert!(query::alien_view(session.world()).is_empty());
    assert!(query::bullet_view(session.world()).is_empty());
}

#[test]
fn fired_bullet_appears_at_player_column_and_then_rises() {
    let script = InputScript::new()
        .with_batch(0, [InputEvent::KeyDown(Key::Left)])
        .with_batch(1, [InputEvent::KeyUp(Key::Left), InputEvent::KeyDown(Key::Space)]);
    let mut platform = HeadlessPlatform::new().with_script(script);
    let mut session = empty_session(&mut platform, SessionConfig::default());

    let _ = session.tick(&mut platform);
    let _ = session.tick(&mut platform);

    let bullets = query::bullet_view(session.world()).into_vec();
    assert_eq!(bullets.len(), 1);
    assert_eq!(bullets[0].position, ScreenPoint::new(90, 500));

    let _ = session.tick(&mut platform);
    let bullets = query::bullet_view(session.world()).into_vec();
    assert_eq!(bullets[0].position, ScreenPoint::new(90, 490));
}

#[test]
fn escape_release_stops_after_presenting_the_tick() {
    let script = InputScript::new()
        .with_batch(1, [InputEvent::KeyDown(Key::Escape)])
        .with_batch(2, [InputEvent::KeyUp(Key::Escape)]);
    let mut platform = HeadlessPlatform::new().with_script(script);
    let mut session =
        Session::new(&mut platform, SessionConfig::default()).expect("session starts");

    let report = session.run(&mut platform);

    assert_eq!(report.ticks, 3);
    assert_eq!(report.state, RunState::Stopped);
    assert_eq!(platform.frames_presented(), 3);

    assert_eq!(session.tick(&mut platform), RunState::Stopped);
    assert_eq!(platform.polls(), 3);
    assert_eq!(session.ticks(), 3);
}

#[test]
fn quit_tick_still_fires_and_draws_the_bullet() {
    let script = InputScript::new().with_batch(0, [InputEvent::KeyDown(Key::Space), InputEvent::Quit]);
    let mut platform = HeadlessPlatform::new().with_script(script);
    let mut session = empty_session(&mut platform, SessionConfig::default());

    let state = session.tick(&mut platform);

    assert_eq!(state, RunState::Stopped);
    assert_eq!(query::bullet_view(session.world()).len(), 1);
    let frame = platform.last_presented().expect("frame was presented");
    assert_eq!(frame.pixel(101, 501), Some(pixel_color(&platform, SpriteKey::Bullet)));
    assert_eq!(frame.pixel(140, 501), Some(pixel_color(&platform, SpriteKey::Player)));
    assert_eq!(frame.pixel(0, 0), Some(pixel_color(&platform, SpriteKey::Background)));
}

#[test]
fn render_without_update_is_idempotent() {
    let script = InputScript::new().with_batch(0, [InputEvent::KeyDown(Key::Space)]);
    let mut platform = HeadlessPlatform::new().with_script(script);
    let mut session =
        Session::new(&mut platform, SessionConfig::default()).expect("session starts");
    for _ in 0..5 {
        let _ = session.tick(&mut platform);
    }

    session.render(&mut platform);
    let first = platform.frame().clone();
    session.render(&mut platform);
    let second = platform.frame().clone();

    assert_eq!(first, second);
    assert_eq!(Some(&first), platform.last_presented());
}

#[test]
fn offscreen_bullets_are_culled_by_default() {
    let script = InputScript::new().with_batch(0, [InputEvent::KeyDown(Key::Space)]);
    let mut platform = HeadlessPlatform::new().with_script(script);
    let mut session = empty_session(&mut platform, SessionConfig::default());

    let report = session.run_for(&mut platform, 60);

    assert_eq!(report.bullets_active, 0);
}

#[test]
fn offscreen_bullets_persist_when_culling_is_disabled() {
    let script = InputScript::new().with_batch(0, [InputEvent::KeyDown(Key::Space)]);
    let mut platform = HeadlessPlatform::new().with_script(script);
    let config = SessionConfig {
        cull_offscreen_bullets: false,
        ..SessionConfig::default()
    };
    let mut session = empty_session(&mut platform, config);

    let report = session.run_for(&mut platform, 60);

    assert_eq!(report.bullets_active, 1);
    let bullets = query::bullet_view(session.world()).into_vec();
    assert_eq!(bullets[0].position, ScreenPoint::new(100, 500 - 59 * 10));
}

#[test]
fn bullet_fired_under_the_alien_destroys_it() {
    let mut platform = HeadlessPlatform::new();
    let mut session = empty_session(&mut platform, SessionConfig::default());
    session.submit(Command::SpawnAlien {
        origin: ScreenPoint::new(80, 300),
        speed: 0,
    });
    session.submit(Command::FireBullet);

    let report = session.run_for(&mut platform, 30);

    assert_eq!(report.aliens_remaining, 0);
    assert_eq!(report.bullets_active, 0);
    assert_eq!(report.state, RunState::Running);
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that maps a tick's input batch to game actions.

use invaders_core::{Command, InputEvent, Key};

/// Actions requested by a single input batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Actions {
    /// A fire key-down edge was observed.
    pub fire: bool,
    /// An escape key-up edge or a platform quit request was observed.
    pub quit: bool,
}

/// Input-to-action mapping.
#[derive(Debug, Default)]
pub struct Controls;

impl Controls {
    /// Creates a new controls system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Scans the batch for fire and quit actions.
    #[must_use]
    pub fn actions(&self, input: &[InputEvent]) -> Actions {
        input
            .iter()
            .fold(Actions::default(), |actions, event| match event {
                InputEvent::KeyDown(Key::Space) => Actions {
                    fire: true,
                    ..actions
                },
                InputEvent::KeyUp(Key::Escape) | InputEvent::Quit => Actions {
                    quit: true,
                    ..actions
                },
                _ => actions,
            })
    }

    /// Emits `Command::FireBullet` once when the batch holds a fire edge.
    pub fn handle_fire(&self, input: &[InputEvent], out: &mut Vec<Command>) {
        if self.actions(input).fire {
            out.push(Command::FireBullet);
        }
    }

    /// Emits `Command::Stop` when the batch asks the session to end.
    pub fn handle_quit(&self, input: &[InputEvent], out: &mut Vec<Command>) {
        if self.actions(input).quit {
            out.push(Command::Stop);
        }
    }
}

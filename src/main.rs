use beacon_course::game::collision::CollisionEvent;
use beacon_course::input::{InputState, Keys};
use beacon_course::GameState;
use glam::Vec2;

/// Simulated clock step; finer than the frame cap so some ticks are skipped.
const CLOCK_STEP: f64 = 1.0 / 60.0;
const SESSION_SECONDS: f64 = 30.0;

/// Input held at `t` seconds into the scripted session.
fn scripted_input(t: f64) -> InputState {
    let mut input = InputState::default();
    if t < 20.0 {
        input.keys |= Keys::FORWARD;
    }
    if (5.0..5.2).contains(&t) || (12.0..12.2).contains(&t) {
        input.keys |= Keys::JUMP;
    }
    if (8.0..10.0).contains(&t) {
        input.look_delta = Vec2::new(4.0, 0.0);
    }
    if (20.0..25.0).contains(&t) {
        input.keys |= Keys::LEFT | Keys::TURN_RIGHT;
    }
    input
}

fn main() {
    let mut game = match beacon_course::run("settings.json") {
        Ok(game) => game,
        Err(err) => {
            eprintln!("Failed to set up the course: {err}");
            std::process::exit(1);
        }
    };

    let mut now = 0.0;
    let mut frames = 0usize;
    while now < SESSION_SECONDS && game.state() == GameState::Running {
        now += CLOCK_STEP;
        let Some(events) = game.frame(now, &scripted_input(now)) else {
            continue;
        };
        frames += 1;
        for event in events {
            if let CollisionEvent::BeaconReached { index } = event {
                log::info!("Passed beacon {} at t={:.2}s", index, now);
            }
        }
    }

    let level = game.active_level();
    let lives = level
        .scene
        .flags(level.player)
        .map(|f| f.lives)
        .unwrap_or_default();
    log::info!(
        "Session over after {} frames: {:?}, {} of {} beacons, {} lives, camera at {:?}",
        frames,
        game.state(),
        level.active_beacon_index,
        level.beacons.len(),
        lives,
        game.camera().eye
    );
}

//! Single-frame simulation step
//!
//! Core game loop body: applies queued input, spawns, moves, collides and
//! scores. Scheduling lives in `run_loop`.

use super::collision::{Collision, classify};
use super::difficulty::speed;
use super::rng::ColorSource;
use super::state::{Player, RunConfig, RunState};
use super::viewport::Viewport;

/// Input gathered between frames, applied at the start of the next tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Color cycle presses (key or pointer) since the last tick
    pub color_cycles: u32,
}

/// What the caller should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Schedule another frame
    Continue,
    /// A mismatch ended the run this frame
    GameOver { score: u32 },
    /// The session had already ended; nothing was touched
    Halted,
}

/// Advance the run by one frame
pub fn tick(
    state: &mut RunState,
    input: &TickInput,
    config: &RunConfig,
    viewport: &Viewport,
    rng: &mut dyn ColorSource,
) -> TickOutcome {
    if !state.running {
        return TickOutcome::Halted;
    }

    // Input lands before any obstacle is looked at
    let palette_size = state.color.palette_size() as u32;
    for _ in 0..input.color_cycles % palette_size {
        state.color.cycle();
    }

    state.frame_count += 1;

    if config.spawn.fires(state.frame_count, state.score) {
        state
            .obstacles
            .spawn(viewport, config.palette_size, rng);
    }

    let speed = speed(state.score, config.difficulty, viewport);
    let player = Player::from_viewport(viewport);
    let threshold = viewport.cleanup_threshold();
    let active = state.color.index();

    let obstacles = state.obstacles.as_mut_vec();
    let mut i = 0;
    while i < obstacles.len() {
        let obstacle = &mut obstacles[i];
        obstacle.advance(speed);

        // Once scored, an obstacle is safe to overlap in any color
        if !obstacle.passed() {
            let bounds = obstacle.rect(player.center.y);
            match classify(
                player.center,
                player.radius,
                &bounds,
                obstacle.color_index(),
                active,
            ) {
                Collision::Mismatch => {
                    state.running = false;
                    return TickOutcome::GameOver { score: state.score };
                }
                Collision::Match => {
                    if obstacle.mark_passed() {
                        state.score += 1;
                    }
                }
                Collision::None => {}
            }
        }

        if obstacle.is_expired(threshold) {
            obstacles.remove(i);
        } else {
            i += 1;
        }
    }

    TickOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Difficulty;
    use crate::sim::obstacle::Obstacle;
    use crate::sim::rng::{SequenceSource, seeded};
    use crate::sim::state::SpawnCadence;
    use proptest::prelude::*;

    fn easy() -> RunConfig {
        RunConfig::new(Difficulty::Easy)
    }

    fn reference() -> Viewport {
        Viewport::from_surface(600.0, 1.0)
    }

    /// Obstacle that overlaps the reference player after one frame of travel
    fn overlapping(color: usize) -> Obstacle {
        Obstacle::new(130.0, 40.0, 80.0, color)
    }

    #[test]
    fn test_matching_overlap_scores_once() {
        let config = easy();
        let vp = reference();
        let mut rng = SequenceSource::default();
        let mut state = RunState::new(&config);
        state.push_obstacle(overlapping(1));
        state.set_color(1);

        let outcome = tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(state.score(), 1);
        assert!(state.obstacles().get(0).is_some_and(Obstacle::passed));

        // Still overlapping on later frames: no extra points
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        }
        assert_eq!(state.score(), 1);
        assert!(state.is_running());
    }

    #[test]
    fn test_mismatch_ends_run_with_score_so_far() {
        let config = easy();
        let vp = reference();
        let mut rng = SequenceSource::default();
        let mut state = RunState::new(&config);
        state.score = 3;
        state.push_obstacle(overlapping(2));

        let outcome = tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        assert_eq!(outcome, TickOutcome::GameOver { score: 3 });
        assert!(!state.is_running());

        let frames = state.frame_count();
        let before = state.obstacles().clone();
        let outcome = tick(
            &mut state,
            &TickInput { color_cycles: 2 },
            &config,
            &vp,
            &mut rng,
        );
        assert_eq!(outcome, TickOutcome::Halted);
        assert_eq!(state.frame_count(), frames);
        assert_eq!(state.score(), 3);
        assert_eq!(state.active_color(), 0);
        assert_eq!(state.obstacles().iter().collect::<Vec<_>>(), before.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_first_spawned_mismatch_wins() {
        let config = easy();
        let vp = reference();
        let mut rng = SequenceSource::default();
        let mut state = RunState::new(&config);
        state.push_obstacle(overlapping(2));
        state.push_obstacle(Obstacle::new(120.0, 40.0, 80.0, 0));

        let outcome = tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        assert_eq!(outcome, TickOutcome::GameOver { score: 0 });
        // Second obstacle was never moved or scored
        let second = state.obstacles().get(1).cloned();
        assert_eq!(second.as_ref().map(|o| o.x), Some(120.0));
        assert!(second.is_some_and(|o| !o.passed()));
    }

    #[test]
    fn test_queued_cycle_applies_before_collision() {
        let config = easy();
        let vp = reference();
        let mut rng = SequenceSource::default();
        let mut state = RunState::new(&config);
        state.push_obstacle(overlapping(1));

        let outcome = tick(
            &mut state,
            &TickInput { color_cycles: 1 },
            &config,
            &vp,
            &mut rng,
        );
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_passed_obstacle_ignores_later_color_change() {
        let config = easy();
        let vp = reference();
        let mut rng = SequenceSource::default();
        let mut state = RunState::new(&config);
        state.push_obstacle(overlapping(0));

        tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        let outcome = tick(
            &mut state,
            &TickInput { color_cycles: 1 },
            &config,
            &vp,
            &mut rng,
        );
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_expired_obstacle_removed_same_tick() {
        let config = easy();
        let vp = reference();
        let mut rng = SequenceSource::default();
        let mut state = RunState::new(&config);
        // Threshold is -30; after moving 4 the right edge sits at -31
        state.push_obstacle(Obstacle::new(-67.0, 40.0, 80.0, 3));
        // Right edge lands exactly on the threshold: kept
        state.push_obstacle(Obstacle::new(-66.0, 40.0, 80.0, 3));

        tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        assert_eq!(state.obstacles().len(), 1);
        assert_eq!(state.obstacles().get(0).map(|o| o.x), Some(-70.0));

        tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        assert!(state.obstacles().is_empty());
    }

    #[test]
    fn test_spawns_on_interval() {
        let config = easy();
        let vp = reference();
        let mut rng = SequenceSource::new([3]);
        let mut state = RunState::new(&config);

        for _ in 0..99 {
            tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        }
        assert!(state.obstacles().is_empty());

        tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        assert_eq!(state.obstacles().len(), 1);
        let spawned = state.obstacles().get(0).cloned();
        assert_eq!(spawned.as_ref().map(Obstacle::color_index), Some(3));
        // Moved once in the frame it spawned
        let expected = vp.spawn_x() - 4.0;
        assert!(spawned.is_some_and(|o| (o.x - expected).abs() < 1e-4));
    }

    #[test]
    fn test_score_scaled_cadence_spawns_sooner() {
        let config = RunConfig {
            spawn: SpawnCadence::ScoreScaled {
                interval: 100,
                min_interval: 20,
                frames_per_point: 10,
            },
            ..easy()
        };
        let vp = reference();
        let mut rng = SequenceSource::default();
        let mut state = RunState::new(&config);
        state.score = 5;

        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        }
        assert_eq!(state.obstacles().len(), 1);
    }

    #[test]
    fn test_hard_speeds_up_with_score() {
        let config = RunConfig::new(Difficulty::Hard);
        let vp = reference();
        let mut rng = SequenceSource::default();
        let mut state = RunState::new(&config);
        state.score = 8;
        state.push_obstacle(Obstacle::new(500.0, 40.0, 80.0, 0));

        tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
        // 4.0 + 0.25 * 8
        assert_eq!(state.obstacles().get(0).map(|o| o.x), Some(494.0));
    }

    #[test]
    fn test_capped_speed_cannot_skip_the_player() {
        let config = RunConfig::new(Difficulty::Hard);
        let vp = reference();
        assert_eq!(speed(u32::MAX, config.difficulty, &vp), crate::consts::MAX_SPEED);

        // Overlap needs 20 <= x <= 140; try every whole starting offset across one frame
        for offset in 0..=crate::consts::MAX_SPEED as u32 {
            let mut rng = SequenceSource::default();
            let mut state = RunState::new(&config);
            state.score = u32::MAX;
            state.push_obstacle(Obstacle::new(141.0 + offset as f32, 40.0, 80.0, 1));

            let mut outcome = TickOutcome::Continue;
            for _ in 0..4 {
                outcome = tick(&mut state, &TickInput::default(), &config, &vp, &mut rng);
                if outcome != TickOutcome::Continue {
                    break;
                }
            }
            assert_eq!(outcome, TickOutcome::GameOver { score: u32::MAX }, "offset {offset}");
        }
    }

    fn passed_count<'a>(obstacles: impl IntoIterator<Item = &'a Obstacle>) -> u32 {
        obstacles.into_iter().filter(|o| o.passed()).count() as u32
    }

    proptest! {
        #[test]
        fn prop_score_counts_newly_passed_obstacles(
            seed in any::<u64>(),
            cycles in proptest::collection::vec(0u32..3, 1..1500),
            hard in any::<bool>(),
        ) {
            let config = RunConfig::new(if hard { Difficulty::Hard } else { Difficulty::Normal });
            let vp = reference();
            let mut rng = seeded(seed);
            let mut state = RunState::new(&config);

            for c in cycles {
                let before = state.clone();
                let outcome = tick(&mut state, &TickInput { color_cycles: c }, &config, &vp, &mut rng);
                let after_score = state.score();

                if !before.is_running() {
                    prop_assert_eq!(outcome, TickOutcome::Halted);
                    prop_assert_eq!(after_score, before.score());
                    prop_assert_eq!(state.frame_count(), before.frame_count());
                    continue;
                }

                // Same speed and width for everyone, so expiry removes a prefix
                let spawned = config.spawn.fires(state.frame_count(), before.score()) as usize;
                let removed = before.obstacles().len() + spawned - state.obstacles().len();
                let old: Vec<&Obstacle> = before.obstacles().iter().collect();
                let survivors = &old[removed..];

                for (prev, now) in survivors.iter().zip(state.obstacles().iter()) {
                    prop_assert_eq!(prev.color_index(), now.color_index());
                    prop_assert!(!prev.passed() || now.passed());
                }
                let newly_passed = passed_count(state.obstacles().iter())
                    - passed_count(survivors.iter().copied());
                prop_assert_eq!(after_score, before.score() + newly_passed);
                prop_assert!(newly_passed <= 1);
                if let TickOutcome::GameOver { score } = outcome {
                    prop_assert_eq!(score, after_score);
                    prop_assert!(!state.is_running());
                }
                prop_assert!(state.obstacles().iter().all(|o| !o.is_expired(vp.cleanup_threshold())));
            }
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that steers active enemies towards the player and decides
//! when they strike.

use gloom_core::{
    tuning::{ENEMY_ATTACK_RANGE, ENEMY_MIN_PURSUIT_DISTANCE, ENEMY_SIGHT_RANGE},
    Command, EnemyView, PlayerSnapshot,
};

/// Pursuit system emitting per-enemy steering and strike commands.
#[derive(Debug, Default)]
pub struct Pursuit {
    scratch: Vec<Command>,
}

impl Pursuit {
    /// Creates a new pursuit system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one `PursuePlayer` per active enemy and a `StrikePlayer` for every
    /// enemy that is within reach with its cooldown expired.
    ///
    /// Distances are measured against the enemy positions captured in `enemies`,
    /// i.e. before any of this tick's pursuit steps are applied.
    pub fn handle(&mut self, player: &PlayerSnapshot, enemies: &EnemyView, out: &mut Vec<Command>) {
        self.scratch.clear();

        for enemy in enemies.active() {
            let distance = enemy.position.distance_to(player.position);
            let heading = enemy.position.bearing_to(player.position);
            let advance = distance > ENEMY_MIN_PURSUIT_DISTANCE && distance < ENEMY_SIGHT_RANGE;
            self.scratch.push(Command::PursuePlayer {
                enemy: enemy.id,
                heading,
                advance,
            });

            if distance < ENEMY_ATTACK_RANGE && enemy.attack_cooldown <= 0 {
                self.scratch.push(Command::StrikePlayer { enemy: enemy.id });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloom_core::{EnemyId, EnemySnapshot, Position};

    fn player_at(x: f32, y: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            position: Position::new(x, y),
            angle: 0.0,
            health: 100,
            ammo: 50,
            speed: 0.05,
        }
    }

    fn enemy(id: u32, x: f32, y: f32, cooldown: i32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position: Position::new(x, y),
            angle: 0.0,
            health: 100,
            active: true,
            attack_cooldown: cooldown,
        }
    }

    fn pursue_flags(out: &[Command]) -> Vec<(u32, bool)> {
        out.iter()
            .filter_map(|command| match command {
                Command::PursuePlayer { enemy, advance, .. } => Some((enemy.get(), *advance)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn advance_window_is_exclusive_on_both_ends() {
        let mut system = Pursuit::new();
        let view = EnemyView::from_snapshots(vec![
            enemy(0, 2.4, 2.0, 10),
            enemy(1, 5.0, 2.0, 10),
            enemy(2, 12.0, 2.0, 10),
        ]);
        let mut out = Vec::new();

        system.handle(&player_at(2.0, 2.0), &view, &mut out);

        assert_eq!(pursue_flags(&out), vec![(0, false), (1, true), (2, false)]);
    }

    #[test]
    fn heading_points_at_player() {
        let mut system = Pursuit::new();
        let view = EnemyView::from_snapshots(vec![enemy(0, 2.0, 6.0, 10)]);
        let mut out = Vec::new();

        system.handle(&player_at(2.0, 2.0), &view, &mut out);

        let Some(Command::PursuePlayer { heading, .. }) = out.first() else {
            panic!("expected a pursuit command");
        };
        assert!((heading + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn strike_requires_reach_and_expired_cooldown() {
        let mut system = Pursuit::new();
        let view = EnemyView::from_snapshots(vec![
            enemy(0, 3.0, 2.0, 0),
            enemy(1, 2.0, 3.0, 5),
            enemy(2, 2.0, 4.0, -3),
        ]);
        let mut out = Vec::new();

        system.handle(&player_at(2.0, 2.0), &view, &mut out);

        let strikes: Vec<_> = out
            .iter()
            .filter_map(|command| match command {
                Command::StrikePlayer { enemy } => Some(enemy.get()),
                _ => None,
            })
            .collect();
        assert_eq!(strikes, vec![0]);
    }

    #[test]
    fn inactive_enemies_are_ignored() {
        let mut system = Pursuit::new();
        let mut dormant = enemy(0, 3.0, 2.0, 0);
        dormant.active = false;
        let view = EnemyView::from_snapshots(vec![dormant]);
        let mut out = Vec::new();

        system.handle(&player_at(2.0, 2.0), &view, &mut out);

        assert!(out.is_empty());
    }
}

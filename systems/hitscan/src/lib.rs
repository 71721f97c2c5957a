#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves fired shots into enemy damage.

use gloom_core::{
    tuning::{WEAPON_CONE, WEAPON_DAMAGE, WEAPON_RANGE},
    wrap_angle, Command, EnemyView, Event, Position,
};

/// Hit-scan system that damages every active enemy inside the firing cone.
#[derive(Debug, Default)]
pub struct Hitscan {
    scratch: Vec<Command>,
}

impl Hitscan {
    /// Creates a new hit-scan system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::DamageEnemy` for each enemy hit by a `ShotFired` event.
    ///
    /// A single shot may hit several enemies; walls do not stop it.
    pub fn handle(&mut self, events: &[Event], enemies: &EnemyView, out: &mut Vec<Command>) {
        self.scratch.clear();

        for event in events {
            if let Event::ShotFired { origin, angle, .. } = event {
                self.resolve_shot(*origin, *angle, enemies);
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn resolve_shot(&mut self, origin: Position, angle: f32, enemies: &EnemyView) {
        for enemy in enemies.active() {
            let distance = origin.distance_to(enemy.position);
            let deviation = wrap_angle(origin.bearing_to(enemy.position) - angle);
            if distance < WEAPON_RANGE && deviation.abs() < WEAPON_CONE {
                self.scratch.push(Command::DamageEnemy {
                    enemy: enemy.id,
                    amount: WEAPON_DAMAGE,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloom_core::{EnemyId, EnemySnapshot};
    use std::f32::consts::PI;

    fn enemy(id: u32, x: f32, y: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position: Position::new(x, y),
            angle: 0.0,
            health: 100,
            active: true,
            attack_cooldown: 0,
        }
    }

    fn shot(x: f32, y: f32, angle: f32) -> Event {
        Event::ShotFired {
            origin: Position::new(x, y),
            angle,
            ammo: 49,
        }
    }

    fn damaged(out: &[Command]) -> Vec<u32> {
        out.iter()
            .filter_map(|command| match command {
                Command::DamageEnemy { enemy, .. } => Some(enemy.get()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn no_shot_no_damage() {
        let mut system = Hitscan::new();
        let view = EnemyView::from_snapshots(vec![enemy(0, 5.0, 2.0)]);
        let mut out = Vec::new();

        system.handle(&[Event::TimeAdvanced { tick: 1 }], &view, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn cone_and_range_select_targets() {
        let mut system = Hitscan::new();
        let view = EnemyView::from_snapshots(vec![
            enemy(0, 5.0, 2.0),
            enemy(1, 6.0, 2.5),
            enemy(2, 5.0, 4.0),
            enemy(3, 13.0, 2.0),
        ]);
        let mut out = Vec::new();

        system.handle(&[shot(2.0, 2.0, 0.0)], &view, &mut out);

        assert_eq!(damaged(&out), vec![0, 1]);
        assert!(out.iter().all(|command| matches!(
            command,
            Command::DamageEnemy {
                amount: WEAPON_DAMAGE,
                ..
            }
        )));
    }

    #[test]
    fn deviation_wraps_across_the_seam() {
        let mut system = Hitscan::new();
        let view = EnemyView::from_snapshots(vec![enemy(0, 1.0, 2.05)]);
        let mut out = Vec::new();

        system.handle(&[shot(4.0, 2.0, -PI + 0.01)], &view, &mut out);

        assert_eq!(damaged(&out), vec![0]);
    }

    #[test]
    fn inactive_enemies_absorb_nothing() {
        let mut system = Hitscan::new();
        let mut dead = enemy(0, 5.0, 2.0);
        dead.active = false;
        let view = EnemyView::from_snapshots(vec![dead]);
        let mut out = Vec::new();

        system.handle(&[shot(2.0, 2.0, 0.0)], &view, &mut out);

        assert!(out.is_empty());
    }
}

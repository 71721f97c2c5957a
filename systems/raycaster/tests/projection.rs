use gloom_core::{
    EnemyId, EnemySnapshot, EnemyView, PlayerSnapshot, Position, RayColumn, TileKind,
};
use gloom_system_raycaster::{RaycastConfig, Raycaster};
use gloom_world::TileMap;

fn corridor(rows: [[u8; 8]; 3]) -> TileMap {
    TileMap::from_rows(&rows).expect("corridor is valid")
}

fn open_corridor() -> TileMap {
    corridor([
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 2, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ])
}

fn player_at(x: f32, y: f32) -> PlayerSnapshot {
    PlayerSnapshot {
        position: Position::new(x, y),
        angle: 0.0,
        health: 100,
        ammo: 50,
        speed: 0.05,
    }
}

fn enemy_at(x: f32, y: f32) -> EnemyView {
    EnemyView::from_snapshots(vec![EnemySnapshot {
        id: EnemyId::new(0),
        position: Position::new(x, y),
        angle: 0.0,
        health: 100,
        active: true,
        attack_cooldown: 0,
    }])
}

fn center(columns: &[RayColumn]) -> &RayColumn {
    &columns[columns.len() / 2]
}

#[test]
fn corridor_wall_is_measured_at_its_distance() {
    let raycaster = Raycaster::default();
    let frame = raycaster.cast(
        &open_corridor(),
        &player_at(1.0, 1.5),
        &EnemyView::default(),
        0,
    );

    assert_eq!(frame.columns.len(), 400);
    let column = center(&frame.columns);
    assert_eq!(column.wall, Some(TileKind::Brick));
    assert_eq!(column.wall_code(), 2);
    assert!(
        (column.distance - 5.0).abs() < 0.051,
        "measured {}",
        column.distance
    );
    assert!((column.wall_height - 60.0).abs() < 1.0);
    assert!((column.brightness - 0.5).abs() < 0.01);
    assert!(frame
        .columns
        .iter()
        .all(|column| column.wall.is_some() && column.brightness >= 0.2));
}

#[test]
fn recoil_lifts_walls_only() {
    let raycaster = Raycaster::default();
    let view = enemy_at(4.0, 1.5);
    let steady = raycaster.cast(&open_corridor(), &player_at(1.0, 1.5), &view, 0);
    let kicked = raycaster.cast(&open_corridor(), &player_at(1.0, 1.5), &view, 10);

    let steady = center(&steady.columns);
    let kicked = center(&kicked.columns);
    assert!((steady.wall_top - kicked.wall_top - 10.0).abs() < 1e-3);
    assert_eq!(steady.sprite, kicked.sprite);
}

#[test]
fn visible_enemy_covers_the_center_column() {
    let raycaster = Raycaster::default();
    let frame = raycaster.cast(
        &open_corridor(),
        &player_at(1.0, 1.5),
        &enemy_at(4.0, 1.5),
        0,
    );

    let sprite = center(&frame.columns)
        .sprite
        .expect("enemy straight ahead is drawn");
    assert_eq!(sprite.enemy, EnemyId::new(0));
    assert!((sprite.size - 60.0).abs() < 1e-3);
    assert!((sprite.top - 270.0).abs() < 1e-3);
    assert!(frame.columns[0].sprite.is_none());
    assert!(frame.columns[399].sprite.is_none());
}

#[test]
fn walls_hide_enemies_behind_them() {
    let map = corridor([
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 2, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ]);
    let raycaster = Raycaster::default();
    let frame = raycaster.cast(&map, &player_at(1.0, 1.5), &enemy_at(5.0, 1.5), 0);

    assert!(frame.columns.iter().all(|column| column.sprite.is_none()));
}

#[test]
fn enemies_behind_the_player_are_culled() {
    let raycaster = Raycaster::default();
    let frame = raycaster.cast(
        &open_corridor(),
        &player_at(4.0, 1.5),
        &enemy_at(2.0, 1.5),
        0,
    );

    assert!(frame.columns.iter().all(|column| column.sprite.is_none()));
}

#[test]
fn narrow_viewport_changes_column_count() {
    let config = RaycastConfig {
        width: 320.0,
        height: 200.0,
        column_width: 4.0,
        ..RaycastConfig::default()
    };
    let raycaster = Raycaster::new(config).expect("valid config");
    let frame = raycaster.cast(
        &open_corridor(),
        &player_at(1.0, 1.5),
        &EnemyView::default(),
        0,
    );

    assert_eq!(frame.columns.len(), 80);
    assert!((frame.columns[1].screen_x - 4.0).abs() < f32::EPSILON);
}

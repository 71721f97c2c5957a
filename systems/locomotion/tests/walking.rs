use gloom_core::{Command, Event, InputFrame};
use gloom_system_locomotion::Locomotion;
use gloom_world::{self as world, query, World};

fn playing_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::BeginSession, &mut events);
    world
}

fn pump(world: &mut World, locomotion: &mut Locomotion, input: &InputFrame) -> Vec<Event> {
    let mut commands = Vec::new();
    locomotion.handle(input, &mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn diagonal_input_combines_both_strides() {
    let mut world = playing_world();
    let mut locomotion = Locomotion::new();
    let input = InputFrame {
        forward: true,
        strafe_right: true,
        ..InputFrame::default()
    };

    let events = pump(&mut world, &mut locomotion, &input);

    let moves = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerMoved { .. }))
        .count();
    assert_eq!(moves, 2);
    let player = query::player(&world);
    assert!((player.position.x() - 2.05).abs() < 1e-5);
    assert!((player.position.y() - 2.05).abs() < 1e-5);
}

#[test]
fn holding_forward_never_leaves_walkable_space() {
    let mut world = playing_world();
    let mut locomotion = Locomotion::new();
    let input = InputFrame {
        forward: true,
        pointer_dx: 3.0,
        ..InputFrame::default()
    };

    for _ in 0..600 {
        let _ = pump(&mut world, &mut locomotion, &input);
        let player = query::player(&world);
        assert!(
            query::tile_map(&world).is_walkable(player.position.x(), player.position.y()),
            "player left walkable space at {:?}",
            player.position
        );
    }
}

#[test]
fn keyboard_turn_accumulates_per_tick() {
    let mut world = playing_world();
    let mut locomotion = Locomotion::new();
    let input = InputFrame {
        turn_left: true,
        ..InputFrame::default()
    };

    for _ in 0..10 {
        let _ = pump(&mut world, &mut locomotion, &input);
    }

    assert!((query::player(&world).angle + 0.5).abs() < 1e-5);
}

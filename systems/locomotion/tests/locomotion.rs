use std::time::Duration;

use glam::Vec2;
use quiver_core::{AnimationFlags, Command, EntityId, Event, InputSnapshot, LayerMask, Side};
use quiver_system_locomotion::{Config, Jump, Locomotion};
use quiver_world::{self as world, query, World};

const DT: Duration = Duration::from_micros(15_625);

struct Harness {
    world: World,
    player: EntityId,
    locomotion: Locomotion,
    flags: AnimationFlags,
}

impl Harness {
    fn new(solids: &[(Vec2, Vec2)], spawn: Vec2) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        for &(min, max) in solids {
            world::apply(
                &mut world,
                Command::AddSolid {
                    min,
                    max,
                    layers: LayerMask::GROUND,
                },
                &mut events,
            );
        }
        world::apply(
            &mut world,
            Command::SpawnPlayer {
                position: spawn,
                half_extents: Vec2::splat(0.5),
            },
            &mut events,
        );
        let player = events
            .iter()
            .find_map(|event| match event {
                Event::PlayerSpawned { player } => Some(*player),
                _ => None,
            })
            .expect("player spawned");

        Self {
            world,
            player,
            locomotion: Locomotion::new(Config::default()),
            flags: AnimationFlags::default(),
        }
    }

    fn step(&mut self, input: InputSnapshot) -> Option<Jump> {
        let contacts = {
            let oracle = query::player_contacts(&self.world).expect("player contacts");
            self.locomotion.probe(&oracle)
        };
        let mut body = query::player_body(&self.world).expect("player body");
        let jump = self
            .locomotion
            .tick(DT, &input, &contacts, &mut body, &mut self.flags);

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SetVelocity {
                entity: self.player,
                velocity: body.velocity,
            },
            &mut events,
        );
        world::apply(
            &mut self.world,
            Command::SetFacing {
                entity: self.player,
                facing: self.locomotion.facing(),
            },
            &mut events,
        );
        world::apply(&mut self.world, Command::Tick { dt: DT }, &mut events);
        jump
    }

    fn height(&self) -> f32 {
        query::player_body(&self.world).expect("player body").position.y
    }
}

fn floor() -> (Vec2, Vec2) {
    (Vec2::new(-20.0, -1.0), Vec2::new(20.0, 0.0))
}

fn held(horizontal: f32) -> InputSnapshot {
    InputSnapshot {
        horizontal,
        jump_held: true,
        ..InputSnapshot::default()
    }
}

#[test]
fn grounded_jump_is_capped_by_max_height() {
    let mut harness = Harness::new(&[floor()], Vec2::new(0.0, 0.5));
    for _ in 0..8 {
        let _ = harness.step(InputSnapshot::default());
    }
    assert!(harness.flags.grounded);

    let jump = harness.step(InputSnapshot {
        jump_pressed: true,
        jump_held: true,
        ..InputSnapshot::default()
    });
    assert_eq!(jump, Some(Jump::Ground));

    let mut peak = harness.height();
    for _ in 0..120 {
        let _ = harness.step(held(0.0));
        peak = peak.max(harness.height());
    }

    assert!(peak >= 2.5, "peak = {peak}");
    assert!(peak < 2.8, "peak = {peak}");
    assert!(harness.flags.grounded);
}

#[test]
fn running_into_a_wall_mid_air_slides_then_wall_jumps_away() {
    let wall = (Vec2::new(1.0, -1.0), Vec2::new(2.0, 20.0));
    let mut harness = Harness::new(&[floor(), wall], Vec2::new(0.0, 8.0));

    let mut slid = false;
    for _ in 0..20 {
        let _ = harness.step(held(1.0));
        slid |= harness.flags.wall_sliding;
    }
    assert!(slid);
    assert!(harness.locomotion.state().wall_jump_ready);
    assert_eq!(harness.locomotion.facing(), Side::Right);

    let jump = harness.step(InputSnapshot {
        horizontal: 1.0,
        jump_pressed: true,
        jump_held: true,
        ..InputSnapshot::default()
    });
    assert_eq!(
        jump,
        Some(Jump::Wall {
            wall: Side::Right,
            vertical: 15.0
        })
    );
    assert_eq!(harness.locomotion.facing(), Side::Left);

    let body = query::player_body(&harness.world).expect("player body");
    assert!(body.velocity.x < 0.0);
    assert!(body.velocity.y > 0.0);
}

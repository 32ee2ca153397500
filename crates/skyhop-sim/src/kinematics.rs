//! Per-entity motion: player input, the jump state machine, integration and
//! world-bound clamping

use crate::entity::{Entity, RigidBody};
use crate::player::{Player, StatusFlags, MAX_JUMPS, MAX_JUMP_TIME, MAX_STOP_TIME, QUICK_FALL_FACTOR};
use crate::shape::{Aabb, Shape};
use glam::Vec2;
use skyhop_input::{Action, InputState};

/// Advance one movable entity by `dt`
pub(crate) fn step_entity(
    entity: &mut Entity,
    shape: Option<Shape>,
    input: &InputState,
    half_world: Vec2,
    dt: f32,
) {
    let (position, body, mut player) = entity.parts_mut();
    let Some(body) = body else {
        return;
    };

    if let Some(player) = player.as_deref_mut() {
        drive_player(player, body, input, dt);
    }

    integrate(position, body, dt);

    let bounds = clamp_to_bounds(position, body, shape, half_world);
    if let Some(player) = player {
        if bounds.lower_y {
            player.land();
        } else if bounds.x {
            player.jump.reset();
        }
    }
}

/// Semi-implicit Euler with constant acceleration over the step
pub fn integrate(position: &mut Vec2, body: &mut RigidBody, dt: f32) {
    *position += body.velocity * dt + 0.5 * body.acceleration * dt * dt;
    body.velocity += body.acceleration * dt;
}

/// Horizontal input plus the jump state machine; sets velocity and acceleration
pub(crate) fn drive_player(player: &mut Player, body: &mut RigidBody, input: &InputState, dt: f32) {
    player.status.remove(StatusFlags::LANDED);
    let rooted = player.status.contains(StatusFlags::ROOTED);
    let controller = player.controller;

    // Left and right both add; holding both cancels out.
    body.velocity.x = 0.0;
    if !rooted {
        if input.is_pressed(controller, Action::Left) {
            body.velocity.x -= player.tuning.move_speed;
        }
        if input.is_pressed(controller, Action::Right) {
            body.velocity.x += player.tuning.move_speed;
        }
    }

    let jump = &mut player.jump;
    if input.is_pressed(controller, Action::Jump) {
        let may_jump = !jump.already_jumping || (jump.new_jump && jump.nb_jumps < MAX_JUMPS);
        if may_jump && !rooted {
            jump.already_jumping = true;
            jump.new_jump = false;
            jump.jump_time = 0.0;
            jump.quick_fall = false;
            jump.quick_fall_time = 0.0;
            jump.nb_jumps += 1;
            body.velocity.y = player.initial_jump_velocity;
        } else {
            if rooted {
                // The press is spent even though it was refused
                jump.new_jump = false;
            }
            jump.jump_time += dt;
        }
    } else {
        jump.new_jump = true;
        // Early release cuts the jump short with heavy gravity.
        if jump.already_jumping && !jump.quick_fall && jump.jump_time < MAX_JUMP_TIME {
            jump.quick_fall = true;
            jump.quick_fall_time = 0.0;
        }
    }

    let mut gravity = player.gravity;
    if jump.quick_fall {
        gravity *= QUICK_FALL_FACTOR;
        jump.quick_fall_time += dt;
        if jump.quick_fall_time >= MAX_STOP_TIME {
            jump.quick_fall = false;
            jump.jump_time = MAX_JUMP_TIME;
        }
    }
    body.acceleration = Vec2::new(0.0, gravity);
}

/// Which world bounds an entity was pushed back from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsHit {
    pub x: bool,
    pub lower_y: bool,
    pub upper_y: bool,
}

/// Keep the entity's box inside `±half_world`, stopping motion into a bound
pub fn clamp_to_bounds(
    position: &mut Vec2,
    body: &mut RigidBody,
    shape: Option<Shape>,
    half_world: Vec2,
) -> BoundsHit {
    let (half, offset) = match shape {
        Some(s) => (s.size * 0.5, s.offset),
        None => (Vec2::ZERO, Vec2::ZERO),
    };
    let aabb = Aabb {
        center: *position + offset,
        half,
    };
    let mut hit = BoundsHit::default();

    if aabb.min().x < -half_world.x {
        position.x = -half_world.x + half.x - offset.x;
        body.velocity.x = 0.0;
        hit.x = true;
    } else if aabb.max().x > half_world.x {
        position.x = half_world.x - half.x - offset.x;
        body.velocity.x = 0.0;
        hit.x = true;
    }

    if aabb.min().y < -half_world.y {
        position.y = -half_world.y + half.y - offset.y;
        body.velocity.y = 0.0;
        hit.lower_y = true;
    } else if aabb.max().y > half_world.y {
        position.y = half_world.y - half.y - offset.y;
        body.velocity.y = 0.0;
        hit.upper_y = true;
    }

    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityFlags, EntityKind};
    use crate::player::PlayerTuning;
    use crate::world::World;
    use skyhop_core::{ControllerId, EntityId};
    use skyhop_input::Controller;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (World, InputState, ControllerId) {
        let mut input = InputState::new();
        let kb = input.add_controller(Controller::keyboard()).unwrap();
        (World::new(Vec2::new(100.0, 100.0)), input, kb)
    }

    fn player_at(world: &mut World, kb: ControllerId, position: Vec2) -> EntityId {
        let p = world
            .create_player(position, PlayerTuning::default(), kb)
            .unwrap();
        let s = world
            .create_shape(Shape::new(Vec2::new(2.0, 2.0)))
            .unwrap();
        world.attach_shape(p, s).unwrap();
        p
    }

    fn press(input: &mut InputState, kb: ControllerId, action: Action, down: bool) {
        input.set_action(kb, action, down);
        input.refresh();
    }

    #[test]
    fn integrate_constant_acceleration() {
        let mut pos = Vec2::ZERO;
        let mut body = RigidBody {
            velocity: Vec2::new(1.0, 0.0),
            acceleration: Vec2::new(0.0, -2.0),
        };
        integrate(&mut pos, &mut body, 1.0);
        assert!((pos - Vec2::new(1.0, -1.0)).length() < 1e-6);
        assert!((body.velocity - Vec2::new(1.0, -2.0)).length() < 1e-6);
    }

    #[test]
    fn split_step_matches_single_step() {
        // Two halves of dt land where one full dt does, for a player in the air
        let (mut w1, mut input, kb) = setup();
        let (mut w2, _, _) = setup();
        let p1 = player_at(&mut w1, kb, Vec2::new(0.0, 20.0));
        let p2 = player_at(&mut w2, kb, Vec2::new(0.0, 20.0));
        for w in [&mut w1, &mut w2] {
            w.entity_mut(EntityId::from_raw(0)).unwrap().body_mut().unwrap().velocity.y = 3.0;
        }
        input.refresh();

        let dt = 0.1;
        w1.integrate(&input, dt);
        w2.integrate(&input, dt / 2.0);
        w2.integrate(&input, dt / 2.0);

        let a = w1.entity(p1).unwrap();
        let b = w2.entity(p2).unwrap();
        assert!((a.position - b.position).length() < 1e-4);
        assert!((a.velocity() - b.velocity()).length() < 1e-4);
    }

    #[test]
    fn split_step_matches_for_plain_bodies() {
        let mut w1 = World::new(Vec2::new(1000.0, 1000.0));
        let input = InputState::new();
        let e = w1.create_entity(EntityKind::Solid, Vec2::ZERO).unwrap();
        w1.attach_rigid_body(e, Vec2::new(2.0, 5.0), Vec2::new(1.0, -3.0))
            .unwrap();
        let mut w2 = World::new(Vec2::new(1000.0, 1000.0));
        let e2 = w2.create_entity(EntityKind::Solid, Vec2::ZERO).unwrap();
        w2.attach_rigid_body(e2, Vec2::new(2.0, 5.0), Vec2::new(1.0, -3.0))
            .unwrap();

        w1.integrate(&input, 0.5);
        w2.integrate(&input, 0.25);
        w2.integrate(&input, 0.25);
        let (a, b) = (w1.entity(e).unwrap(), w2.entity(e2).unwrap());
        assert!((a.position - b.position).length() < 1e-5);
        assert!((a.velocity() - b.velocity()).length() < 1e-5);
    }

    #[test]
    fn no_input_means_no_horizontal_velocity() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::ZERO);
        w.entity_mut(p).unwrap().body_mut().unwrap().velocity.x = 42.0;
        input.refresh();
        w.integrate(&input, DT);
        assert_eq!(w.entity(p).unwrap().velocity().x, 0.0);
    }

    #[test]
    fn left_and_right_cancel() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::ZERO);
        input.set_action(kb, Action::Left, true);
        input.set_action(kb, Action::Right, true);
        input.refresh();
        w.integrate(&input, DT);
        assert_eq!(w.entity(p).unwrap().velocity().x, 0.0);

        input.set_action(kb, Action::Left, false);
        input.refresh();
        w.integrate(&input, DT);
        assert_eq!(w.entity(p).unwrap().velocity().x, 8.0);
    }

    #[test]
    fn rooted_players_ignore_movement() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::ZERO);
        w.entity_mut(p)
            .unwrap()
            .player_mut()
            .unwrap()
            .status
            .insert(StatusFlags::ROOTED);
        input.set_action(kb, Action::Right, true);
        input.set_action(kb, Action::Jump, true);
        input.refresh();
        w.integrate(&input, DT);
        let e = w.entity(p).unwrap();
        assert_eq!(e.velocity().x, 0.0);
        assert_eq!(e.player().unwrap().jump.nb_jumps, 0);
    }

    #[test]
    fn jump_launches_with_initial_velocity() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::ZERO);
        press(&mut input, kb, Action::Jump, true);
        w.integrate(&input, DT);

        let e = w.entity(p).unwrap();
        let player = e.player().unwrap();
        assert!(player.jump.already_jumping);
        assert_eq!(player.jump.nb_jumps, 1);
        let expected = player.initial_jump_velocity + player.gravity * DT;
        assert!((e.velocity().y - expected).abs() < 1e-4);
        assert!(e.position.y > 0.0);
    }

    #[test]
    fn holding_jump_does_not_double_jump() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::ZERO);
        press(&mut input, kb, Action::Jump, true);
        for _ in 0..5 {
            w.integrate(&input, DT);
            input.refresh();
        }
        let player = w.entity(p).unwrap().player().unwrap();
        assert_eq!(player.jump.nb_jumps, 1);
        assert!((player.jump.jump_time - 4.0 * DT).abs() < 1e-5);
    }

    #[test]
    fn second_press_double_jumps_but_third_does_not() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::ZERO);
        for _ in 0..3 {
            press(&mut input, kb, Action::Jump, true);
            w.integrate(&input, DT);
            press(&mut input, kb, Action::Jump, false);
            w.integrate(&input, DT);
        }
        let player = w.entity(p).unwrap().player().unwrap();
        assert_eq!(player.jump.nb_jumps, MAX_JUMPS);
    }

    #[test]
    fn jump_refused_while_rooted_needs_a_fresh_press() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::ZERO);
        press(&mut input, kb, Action::Jump, true);
        w.integrate(&input, DT);
        press(&mut input, kb, Action::Jump, false);
        w.integrate(&input, DT);

        let set_rooted = |w: &mut World, rooted: bool| {
            let status = &mut w.entity_mut(p).unwrap().player_mut().unwrap().status;
            status.set(StatusFlags::ROOTED, rooted);
        };
        set_rooted(&mut w, true);
        press(&mut input, kb, Action::Jump, true);
        w.integrate(&input, DT);
        assert_eq!(w.entity(p).unwrap().player().unwrap().jump.nb_jumps, 1);

        // Still held once the root ends: no jump without a new press
        set_rooted(&mut w, false);
        input.refresh();
        w.integrate(&input, DT);
        assert_eq!(w.entity(p).unwrap().player().unwrap().jump.nb_jumps, 1);

        press(&mut input, kb, Action::Jump, false);
        w.integrate(&input, DT);
        press(&mut input, kb, Action::Jump, true);
        w.integrate(&input, DT);
        assert_eq!(w.entity(p).unwrap().player().unwrap().jump.nb_jumps, 2);
    }

    #[test]
    fn early_release_enters_quick_fall() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::ZERO);
        press(&mut input, kb, Action::Jump, true);
        w.integrate(&input, DT);
        press(&mut input, kb, Action::Jump, false);
        w.integrate(&input, DT);

        let e = w.entity(p).unwrap();
        let player = e.player().unwrap();
        assert!(player.jump.quick_fall);
        assert!(player.jump.new_jump);
        let body = e.body().unwrap();
        assert!((body.acceleration.y - player.gravity * QUICK_FALL_FACTOR).abs() < 1e-3);

        // Quick fall lasts MAX_STOP_TIME and is not re-entered afterwards
        let steps = (MAX_STOP_TIME / DT).ceil() as usize + 1;
        for _ in 0..steps {
            w.integrate(&input, DT);
        }
        let e = w.entity(p).unwrap();
        let player = e.player().unwrap();
        assert!(!player.jump.quick_fall);
        assert!((e.body().unwrap().acceleration.y - player.gravity).abs() < 1e-3);
    }

    #[test]
    fn late_release_keeps_normal_gravity() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::ZERO);
        press(&mut input, kb, Action::Jump, true);
        w.integrate(&input, DT);
        // Hold past MAX_JUMP_TIME, high in a tall world so we never land
        let steps = (MAX_JUMP_TIME / DT) as usize + 2;
        for _ in 0..steps {
            w.integrate(&input, DT);
        }
        press(&mut input, kb, Action::Jump, false);
        w.integrate(&input, DT);
        assert!(!w.entity(p).unwrap().player().unwrap().jump.quick_fall);
    }

    #[test]
    fn left_bound_clamps_exactly_and_resets_jump() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::new(-48.95, 10.0));
        {
            let player = w.entity_mut(p).unwrap().player_mut().unwrap();
            player.jump.already_jumping = true;
            player.jump.nb_jumps = 2;
            player.jump.jump_time = 0.2;
        }
        press(&mut input, kb, Action::Left, true);
        w.integrate(&input, DT);

        let e = w.entity(p).unwrap();
        let left_edge = e.position.x - 1.0;
        assert_eq!(left_edge, -50.0);
        let jump = e.player().unwrap().jump;
        assert!(!jump.already_jumping);
        assert_eq!(jump.nb_jumps, 0);
        assert_eq!(jump.jump_time, 0.0);
    }

    #[test]
    fn floor_lands_the_player() {
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::new(0.0, -49.0));
        input.refresh();
        w.integrate(&input, DT);
        let e = w.entity(p).unwrap();
        assert_eq!(e.position.y, -49.0);
        assert_eq!(e.velocity().y, 0.0);
        assert!(e.player().unwrap().status.contains(StatusFlags::LANDED));
    }

    #[test]
    fn ceiling_stops_but_keeps_jump_state() {
        // Upper bound zeroes vertical velocity without resetting the jump
        let (mut w, mut input, kb) = setup();
        let p = player_at(&mut w, kb, Vec2::new(0.0, 48.9));
        press(&mut input, kb, Action::Jump, true);
        w.integrate(&input, DT);

        let e = w.entity(p).unwrap();
        assert_eq!(e.position.y, 49.0);
        assert_eq!(e.velocity().y, 0.0);
        let player = e.player().unwrap();
        assert!(player.jump.already_jumping);
        assert_eq!(player.jump.nb_jumps, 1);
        assert!(!player.status.contains(StatusFlags::LANDED));
    }

    #[test]
    fn static_entities_do_not_move() {
        let (mut w, mut input, _) = setup();
        let e = w.create_entity(EntityKind::Solid, Vec2::new(3.0, 3.0)).unwrap();
        input.refresh();
        w.integrate(&input, 1.0);
        assert_eq!(w.entity(e).unwrap().position, Vec2::new(3.0, 3.0));
        assert!(!w.entity_has_flag(e, EntityFlags::MOVABLE));
    }
}

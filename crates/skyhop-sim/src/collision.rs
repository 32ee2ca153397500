//! AABB intersection, minimum translation and pairwise resolution

use crate::entity::{Entity, EntityFlags};
use crate::shape::Aabb;
use glam::Vec2;
use skyhop_core::EntityId;

/// Penetration below this on either axis does not count as contact
pub const COLLISION_EPSILON: f32 = 0.01;

/// One solved collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub first: EntityId,
    pub second: EntityId,
    /// Translation separating `first` from `second` before it was split
    pub correction: Vec2,
}

/// Both axes must penetrate by more than `COLLISION_EPSILON`
pub fn intersects(a: &Aabb, b: &Aabb) -> bool {
    let distance = (b.center - a.center).abs();
    let reach = a.half + b.half;
    reach.x - distance.x > COLLISION_EPSILON && reach.y - distance.y > COLLISION_EPSILON
}

/// Does `top` rest on `base`: overlapping horizontally with its bottom within
/// `COLLISION_EPSILON` of the base's top
pub fn rests_on(top: &Aabb, base: &Aabb) -> bool {
    let reach = top.half.x + base.half.x - (base.center.x - top.center.x).abs();
    reach > COLLISION_EPSILON && (top.min().y - base.max().y).abs() <= COLLISION_EPSILON
}

/// Smallest translation that moves `a` out of `b`, along the axis of least
/// penetration. The sign pushes `a` away from `b`'s centre.
pub fn overlap(a: &Aabb, b: &Aabb) -> Vec2 {
    let delta = b.center - a.center;
    let penetration = (a.half + b.half) - delta.abs();
    if penetration.x < penetration.y {
        let x = if delta.x > 0.0 {
            -penetration.x
        } else {
            penetration.x
        };
        Vec2::new(x, 0.0)
    } else {
        let y = if delta.y > 0.0 {
            -penetration.y
        } else {
            penetration.y
        };
        Vec2::new(0.0, y)
    }
}

/// Apply `correction` (the translation separating `first` from `second`).
///
/// Two movable bodies each take half, a single movable body takes all of it,
/// and two static bodies are left alone.
pub(crate) fn separate(first: &mut Entity, second: &mut Entity, correction: Vec2) -> Option<Contact> {
    let first_movable = first.has_flag(EntityFlags::MOVABLE);
    let second_movable = second.has_flag(EntityFlags::MOVABLE);
    match (first_movable, second_movable) {
        (true, true) => {
            push(first, correction * 0.5);
            push(second, -correction * 0.5);
        }
        (true, false) => push(first, correction),
        (false, true) => push(second, -correction),
        (false, false) => return None,
    }
    Some(Contact {
        first: first.id(),
        second: second.id(),
        correction,
    })
}

fn push(entity: &mut Entity, delta: Vec2) {
    let (position, body, player) = entity.parts_mut();
    *position += delta;
    if let Some(body) = body {
        // Stop motion into the obstacle
        if body.velocity.x * delta.x < 0.0 {
            body.velocity.x = 0.0;
        }
        if body.velocity.y * delta.y < 0.0 {
            body.velocity.y = 0.0;
        }
    }
    if delta.y > 0.0 {
        if let Some(player) = player {
            player.land();
        }
    }
}

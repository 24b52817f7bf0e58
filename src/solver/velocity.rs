//! Impulse-based velocity response with Coulomb friction.

use super::{pair_mut, SolverConfig};
use crate::collision::Contact;
use crate::dynamics::RigidPolygon;
use crate::math::Vec2;

/// Degenerate-tangent cutoff for the friction pass
const EPSILON: f32 = 1e-9;

/// Cancels closing relative velocity at each contact point.
///
/// The normal impulse includes the angular contribution of both lever
/// arms and is scaled by restitution; contacts that are already
/// separating are left alone. Friction is an impulse along the tangent,
/// clamped to the Coulomb cone of the normal impulse, computed from the
/// linear velocity difference only.
pub fn solve(bodies: &mut [Option<RigidPolygon>], contacts: &[Contact], config: &SolverConfig) {
    for contact in contacts {
        let (a, b) = pair_mut(bodies, contact.pair);
        let normal = contact.normal;

        let r_a = contact.point - a.position;
        let r_b = contact.point - b.position;
        let v_a = a.linear_velocity + r_a.perp() * a.angular_velocity;
        let v_b = b.linear_velocity + r_b.perp() * b.angular_velocity;

        // Positive while the bodies approach along the normal
        let closing = (v_a - v_b).dot(normal);
        if closing < 0.0 {
            continue;
        }

        let lever_a = r_a.cross(normal);
        let lever_b = r_b.cross(normal);
        let effective_mass =
            contact.inv_mass_sum + a.inv_inertia * lever_a * lever_a + b.inv_inertia * lever_b * lever_b;
        if effective_mass <= 0.0 {
            continue;
        }

        let j = -(1.0 + config.restitution) * closing / effective_mass;

        apply_friction(a, b, contact, j, config);

        if !a.is_static() {
            a.linear_velocity += normal * (j * a.inv_mass);
            a.angular_velocity += a.inv_inertia * lever_a * j;
        }
        if !b.is_static() {
            b.linear_velocity -= normal * (j * b.inv_mass);
            b.angular_velocity -= b.inv_inertia * lever_b * j;
        }
    }
}

/// Tangential impulse clamped to `±|normal impulse| × friction`.
///
/// Works on the linear velocity difference only; near-zero tangential
/// motion makes the pass a no-op rather than a numerical hazard.
fn apply_friction(
    a: &mut RigidPolygon,
    b: &mut RigidPolygon,
    contact: &Contact,
    normal_impulse: f32,
    config: &SolverConfig,
) {
    if contact.inv_mass_sum <= 0.0 {
        return;
    }

    let diff = a.linear_velocity - b.linear_velocity;
    let side = diff.cross(contact.normal);
    if side * side <= EPSILON {
        return;
    }

    let Some(tangent) = (contact.normal.perp() * side).try_normalize() else {
        return;
    };
    let tangent_velocity = diff.dot(tangent);

    let limit = normal_impulse.abs() * config.friction;
    let j = (-tangent_velocity / contact.inv_mass_sum).clamp(-limit, limit);

    if !a.is_static() {
        a.linear_velocity += tangent * (j * a.inv_mass);
    }
    if !b.is_static() {
        b.linear_velocity -= tangent * (j * b.inv_mass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{BodyHandle, ContactPair};
    use approx::assert_relative_eq;

    /// Two unit squares in glancing contact at the origin, A moving right
    /// and B moving left.
    fn head_on_scene(speed: f32) -> (Vec<Option<RigidPolygon>>, Vec<Contact>) {
        let mut a = RigidPolygon::rect(1.0, 1.0)
            .with_position(Vec2::new(-0.49, 0.0))
            .with_linear_velocity(Vec2::new(speed, 0.0));
        let mut b = RigidPolygon::rect(1.0, 1.0)
            .with_position(Vec2::new(0.49, 0.0))
            .with_linear_velocity(Vec2::new(-speed, 0.0));
        a.handle = BodyHandle::new(0);
        b.handle = BodyHandle::new(1);

        let inv_mass_sum = a.inv_mass + b.inv_mass;
        let contact = Contact {
            pair: ContactPair::new(a.handle, b.handle),
            point: Vec2::ZERO,
            normal: Vec2::X,
            depth: 0.02,
            inv_mass_sum,
        };
        (vec![Some(a), Some(b)], vec![contact])
    }

    fn momentum(bodies: &[Option<RigidPolygon>]) -> Vec2 {
        bodies
            .iter()
            .flatten()
            .map(|b| b.linear_velocity * (1.0 / b.inv_mass))
            .fold(Vec2::ZERO, |acc, p| acc + p)
    }

    fn kinetic_energy(bodies: &[Option<RigidPolygon>]) -> f32 {
        bodies
            .iter()
            .flatten()
            .map(|b| 0.5 * (1.0 / b.inv_mass) * b.linear_velocity.length_squared())
            .sum()
    }

    #[test]
    fn test_elastic_head_on_exchanges_velocities() {
        let (mut bodies, contacts) = head_on_scene(2.0);
        let config = SolverConfig {
            restitution: 1.0,
            friction: 0.0,
            ..SolverConfig::default()
        };

        let p_before = momentum(&bodies);
        let e_before = kinetic_energy(&bodies);
        solve(&mut bodies, &contacts, &config);

        let va = bodies[0].as_ref().unwrap().linear_velocity;
        let vb = bodies[1].as_ref().unwrap().linear_velocity;
        assert_relative_eq!(va.x, -2.0, epsilon = 1e-5);
        assert_relative_eq!(vb.x, 2.0, epsilon = 1e-5);

        let p_after = momentum(&bodies);
        assert_relative_eq!(p_before.x, p_after.x, epsilon = 1e-5);
        assert_relative_eq!(e_before, kinetic_energy(&bodies), epsilon = 1e-4);
    }

    #[test]
    fn test_inelastic_head_on_kills_closing_velocity() {
        let (mut bodies, contacts) = head_on_scene(2.0);
        let config = SolverConfig {
            restitution: 0.0,
            friction: 0.0,
            ..SolverConfig::default()
        };

        solve(&mut bodies, &contacts, &config);
        let va = bodies[0].as_ref().unwrap().linear_velocity;
        let vb = bodies[1].as_ref().unwrap().linear_velocity;
        assert_relative_eq!((va - vb).dot(Vec2::X), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_separating_contact_is_untouched() {
        let (mut bodies, contacts) = head_on_scene(-1.0);
        solve(&mut bodies, &contacts, &SolverConfig::default());

        assert_relative_eq!(bodies[0].as_ref().unwrap().linear_velocity.x, -1.0);
        assert_relative_eq!(bodies[1].as_ref().unwrap().linear_velocity.x, 1.0);
    }

    #[test]
    fn test_static_body_receives_nothing() {
        let (mut bodies, mut contacts) = head_on_scene(2.0);
        {
            let b = bodies[1].as_mut().unwrap();
            b.set_density(0.0);
            b.linear_velocity = Vec2::ZERO;
        }
        contacts[0].inv_mass_sum = bodies[0].as_ref().unwrap().inv_mass;

        let config = SolverConfig {
            restitution: 1.0,
            friction: 0.0,
            ..SolverConfig::default()
        };
        solve(&mut bodies, &contacts, &config);

        // A bounces straight back off the immovable B
        assert_relative_eq!(
            bodies[0].as_ref().unwrap().linear_velocity.x,
            -2.0,
            epsilon = 1e-5
        );
        assert_eq!(bodies[1].as_ref().unwrap().linear_velocity, Vec2::ZERO);
        assert_eq!(bodies[1].as_ref().unwrap().angular_velocity, 0.0);
    }

    #[test]
    fn test_off_center_contact_induces_spin() {
        // A hits an immovable B above its center line: the lever arm
        // feeds part of the impulse into rotation
        let mut a = RigidPolygon::rect(1.0, 1.0).with_linear_velocity(Vec2::new(2.0, 0.0));
        let mut b = RigidPolygon::rect(1.0, 1.0)
            .with_position(Vec2::new(1.0, 0.4))
            .with_density(0.0);
        a.handle = BodyHandle::new(0);
        b.handle = BodyHandle::new(1);

        let contact = Contact {
            pair: ContactPair::new(a.handle, b.handle),
            point: Vec2::new(0.5, 0.4),
            normal: Vec2::X,
            depth: 0.01,
            inv_mass_sum: a.inv_mass,
        };
        let mut bodies = vec![Some(a), Some(b)];
        let config = SolverConfig {
            restitution: 1.0,
            friction: 0.0,
            ..SolverConfig::default()
        };
        solve(&mut bodies, &[contact], &config);

        // lever = r x n = -0.4, effective mass = 1 + 6 * 0.16 = 1.96
        let j = 4.0 / 1.96;
        let a = bodies[0].as_ref().unwrap();
        assert_relative_eq!(a.linear_velocity.x, 2.0 - j, epsilon = 1e-4);
        assert_relative_eq!(a.angular_velocity, 6.0 * 0.4 * j, epsilon = 1e-3);
        // Weaker linear bounce than a centered elastic hit
        assert!(a.linear_velocity.x.abs() < 2.0);

        let b = bodies[1].as_ref().unwrap();
        assert_eq!(b.linear_velocity, Vec2::ZERO);
        assert_eq!(b.angular_velocity, 0.0);
    }

    #[test]
    fn test_friction_clamped_by_coulomb_cone() {
        // A slides along B's face: closing velocity small, tangential
        // velocity large
        let (mut bodies, mut contacts) = head_on_scene(0.1);
        bodies[0].as_mut().unwrap().linear_velocity = Vec2::new(0.1, 3.0);
        contacts[0].depth = 0.01;

        let config = SolverConfig {
            restitution: 0.0,
            friction: 0.1,
            ..SolverConfig::default()
        };
        solve(&mut bodies, &contacts, &config);

        let va = bodies[0].as_ref().unwrap().linear_velocity;
        // Tangential speed reduced, but no more than the cone allows
        assert!(va.y < 3.0);
        assert!(va.y > 2.9);
    }
}

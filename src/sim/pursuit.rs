//! Closed-form pursuit solver
//!
//! A pursuer with fixed speed `s` starts at `P`; a target starts at `T` and moves
//! with constant velocity `V`. The pursuer catches it at time `t` when
//! `|R + V t| = s t` with `R = T - P`, i.e.
//!
//! `(|V|² - s²) t² + 2 (R·V) t + |R|² = 0`

use glam::Vec2;

/// Leading coefficients below this are solved as the linear equation
const DEGENERATE_EPS: f32 = 1e-6;

/// Earliest time (in steps) at which the pursuer can reach the moving target.
///
/// Returns `f32::INFINITY` when no intercept exists. Never negative, never NaN.
pub fn intercept_time(
    pursuer_start: Vec2,
    pursuer_speed: f32,
    target_start: Vec2,
    target_velocity: Vec2,
) -> f32 {
    let r = target_start - pursuer_start;
    let c = r.length_squared();
    if c == 0.0 {
        return 0.0;
    }

    if target_velocity == Vec2::ZERO {
        return if pursuer_speed > 0.0 {
            r.length() / pursuer_speed
        } else {
            f32::INFINITY
        };
    }

    let a = target_velocity.length_squared() - pursuer_speed * pursuer_speed;
    let b = 2.0 * r.dot(target_velocity);

    // Pursuer speed equals target speed: b t + c = 0. Only a target closing the
    // gap can be reached, and then exactly once.
    if a.abs() <= DEGENERATE_EPS {
        if b >= 0.0 {
            return f32::INFINITY;
        }
        return sanitize(-c / b);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return f32::INFINITY;
    }

    // Numerically stable roots: q = -(b + sign(b) sqrt(D)) / 2, roots q/a and c/q
    let sqrt_d = discriminant.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_d);
    let t1 = q / a;
    let t2 = if q != 0.0 { c / q } else { f32::INFINITY };

    smallest_positive(t1, t2)
}

/// Where the target will be when the pursuer reaches it, if it can
pub fn intercept_point(
    pursuer_start: Vec2,
    pursuer_speed: f32,
    target_start: Vec2,
    target_velocity: Vec2,
) -> Option<Vec2> {
    let t = intercept_time(pursuer_start, pursuer_speed, target_start, target_velocity);
    t.is_finite().then(|| target_start + target_velocity * t)
}

fn smallest_positive(t1: f32, t2: f32) -> f32 {
    let t1 = sanitize(t1);
    let t2 = sanitize(t2);
    match (t1 > 0.0, t2 > 0.0) {
        (true, true) => t1.min(t2),
        (true, false) => t1,
        (false, true) => t2,
        (false, false) => f32::INFINITY,
    }
}

/// Map NaN and negative times to "no intercept"
fn sanitize(t: f32) -> f32 {
    if t.is_nan() || t < 0.0 {
        f32::INFINITY
    } else {
        t
    }
}

//! Bézier evaluation, generic over `Vec2` and `Vec3`.
//!
//! Fillets use the quadratic form in 2D; turn curves through junctions use
//! the cubic form on 3D lane waypoints.

use std::ops::{Add, Mul};

pub fn quadratic_bezier<T>(p0: T, p1: T, p2: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

pub fn cubic_bezier<T>(p0: T, p1: T, p2: T, p3: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// `segments + 1` points at uniform parameter steps, endpoints included.
pub fn sample_quadratic<T>(p0: T, p1: T, p2: T, segments: usize) -> Vec<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let n = segments.max(1);
    (0..=n)
        .map(|i| quadratic_bezier(p0, p1, p2, i as f32 / n as f32))
        .collect()
}

/// `segments + 1` points at uniform parameter steps, endpoints included.
pub fn sample_cubic<T>(p0: T, p1: T, p2: T, p3: T, segments: usize) -> Vec<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let n = segments.max(1);
    (0..=n)
        .map(|i| cubic_bezier(p0, p1, p2, p3, i as f32 / n as f32))
        .collect()
}

// src/utils/geometry.rs

pub type Point3 = [f64; 3];

/// Calculates distance between two points (Angstroms)
pub fn calculate_distance(p1: Point3, p2: Point3) -> f64 {
    len(sub(p1, p2))
}

/// Midpoint of the segment p1-p2
pub fn midpoint(p1: Point3, p2: Point3) -> Point3 {
    [
        (p1[0] + p2[0]) / 2.0,
        (p1[1] + p2[1]) / 2.0,
        (p1[2] + p2[2]) / 2.0,
    ]
}

/// Unit vector from p1 towards p2, `None` when the points coincide.
pub fn direction(p1: Point3, p2: Point3) -> Option<Point3> {
    let d = sub(p2, p1);
    let l = len(d);
    if l < f64::EPSILON {
        None
    } else {
        Some(scale(d, 1.0 / l))
    }
}

/// Two unit vectors spanning the plane perpendicular to `normal` (assumed unit).
///
/// The first axis is the component of whichever world axis is least aligned
/// with `normal`, so the frame is stable for a given direction.
pub fn perpendicular_basis(normal: Point3) -> (Point3, Point3) {
    let candidates = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    let mut seed = candidates[0];
    let mut best = f64::MAX;
    for c in candidates {
        let d = dot(c, normal).abs();
        if d < best {
            best = d;
            seed = c;
        }
    }
    let x_axis = normalize(sub(seed, scale(normal, dot(seed, normal))));
    let y_axis = cross(normal, x_axis);
    (x_axis, y_axis)
}

pub fn is_finite(p: Point3) -> bool {
    p.iter().all(|v| v.is_finite())
}

// --- Math Helpers for [f64; 3] ---

pub fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: Point3, s: f64) -> Point3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn len(a: Point3) -> f64 {
    dot(a, a).sqrt()
}

pub fn normalize(a: Point3) -> Point3 {
    let l = len(a);
    if l == 0.0 { [0.0, 0.0, 0.0] } else { [a[0] / l, a[1] / l, a[2] / l] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_and_distance() {
        let m = midpoint([0.0, 0.0, 0.0], [0.0, 0.0, 0.74]);
        assert_eq!(m, [0.0, 0.0, 0.37]);
        assert!((calculate_distance([0.0; 3], [3.0, 4.0, 0.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_direction_of_coincident_points() {
        assert!(direction([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]).is_none());
        let d = direction([0.0; 3], [0.0, 2.0, 0.0]).unwrap();
        assert_eq!(d, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_perpendicular_basis_is_orthonormal() {
        for n in [[0.0, 0.0, 1.0], normalize([1.0, 1.0, 1.0]), normalize([0.3, -2.0, 0.1])] {
            let (u, v) = perpendicular_basis(n);
            assert!(dot(u, n).abs() < 1e-12);
            assert!(dot(v, n).abs() < 1e-12);
            assert!(dot(u, v).abs() < 1e-12);
            assert!((len(u) - 1.0).abs() < 1e-12);
            assert!((len(v) - 1.0).abs() < 1e-12);
        }
    }
}

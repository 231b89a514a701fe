// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

/// Lattice below this volume (Å³) is treated as singular.
pub const MIN_CELL_VOLUME: f64 = 1e-6;

/// Lattice rows [[ax, ay, az], [bx, by, bz], [cx, cy, cz]] as a row matrix.
pub fn lattice_matrix(lattice: [[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ])
}

/// Signed cell volume (a · (b × c)).
pub fn cell_volume(lattice: [[f64; 3]; 3]) -> f64 {
  lattice_matrix(lattice).determinant()
}

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Formula
/// ```text
/// Cartesian = Lattice^T × Fractional
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let cart_vec = lattice_matrix(lattice).transpose() * Vector3::from(frac);
  [cart_vec.x, cart_vec.y, cart_vec.z]
}

/// Convert Cartesian coordinates to fractional using lattice matrix
///
/// Returns `None` if the lattice is singular.
///
/// # Formula
/// ```text
/// Fractional = (Lattice^T)^-1 × Cartesian
/// ```
pub fn cart_to_frac(cart: [f64; 3], lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  if cell_volume(lattice).abs() < MIN_CELL_VOLUME {
    return None;
  }
  let inv_lat = lattice_matrix(lattice).transpose().try_inverse()?;
  let frac_vec = inv_lat * Vector3::from(cart);
  Some([frac_vec.x, frac_vec.y, frac_vec.z])
}

/// Lengths of the reciprocal vectors b_k (no 2π factor).
///
/// `1 / |b_k|` is the spacing between lattice planes k, so a sphere of radius
/// `r` spans at most `r * |b_k|` cells along axis k.
pub fn reciprocal_lengths(lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  if cell_volume(lattice).abs() < MIN_CELL_VOLUME {
    return None;
  }
  // Rows of (L^-1)^T are the reciprocal vectors.
  let recip = lattice_matrix(lattice).try_inverse()?.transpose();
  Some([
    recip.row(0).norm(),
    recip.row(1).norm(),
    recip.row(2).norm(),
  ])
}

/// Lattice vectors from cell parameters (lengths in Å, angles in degrees),
/// a along x and b in the xy plane.
pub fn lattice_from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> [[f64; 3]; 3] {
  let (alpha_r, beta_r, gamma_r) = (alpha.to_radians(), beta.to_radians(), gamma.to_radians());
  let v = (1.0 - alpha_r.cos().powi(2) - beta_r.cos().powi(2) - gamma_r.cos().powi(2)
    + 2.0 * alpha_r.cos() * beta_r.cos() * gamma_r.cos())
  .max(0.0)
  .sqrt();

  [
    [a, 0.0, 0.0],
    [b * gamma_r.cos(), b * gamma_r.sin(), 0.0],
    [
      c * beta_r.cos(),
      c * (alpha_r.cos() - beta_r.cos() * gamma_r.cos()) / gamma_r.sin(),
      c * v / gamma_r.sin(),
    ],
  ]
}

//! Synthetic spectral-element data.
//!
//! Real solver output stores one value per GLL node of every element, so
//! nodes on shared element edges appear more than once. The generators here
//! reproduce that layout on a regular grid of square elements.

use field_common::SampledField;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// GLL node positions on `[-1, 1]` for `ngll` points per direction.
///
/// Supports 2 to 5 points (5 is the usual choice for seismic meshes).
pub fn gll_points_1d(ngll: usize) -> Vec<f64> {
    match ngll {
        2 => vec![-1.0, 1.0],
        3 => vec![-1.0, 0.0, 1.0],
        4 => {
            let a = (1.0f64 / 5.0).sqrt();
            vec![-1.0, -a, a, 1.0]
        }
        5 => {
            let a = (3.0f64 / 7.0).sqrt();
            vec![-1.0, -a, 0.0, a, 1.0]
        }
        other => panic!("unsupported GLL order: {} points", other),
    }
}

/// Node coordinates of an `nex` x `nez` element mesh covering
/// `[0, width] x [-depth, 0]`, element by element.
pub fn gll_mesh(nex: usize, nez: usize, ngll: usize, width: f64, depth: f64) -> (Vec<f32>, Vec<f32>) {
    let nodes = gll_points_1d(ngll);
    let dx = width / nex as f64;
    let dz = depth / nez as f64;

    let capacity = nex * nez * ngll * ngll;
    let mut x = Vec::with_capacity(capacity);
    let mut z = Vec::with_capacity(capacity);

    for ez in 0..nez {
        for ex in 0..nex {
            for &xi in &nodes {
                for &eta in &nodes {
                    x.push((dx * (ex as f64 + (xi + 1.0) / 2.0)) as f32);
                    z.push((-depth + dz * (ez as f64 + (eta + 1.0) / 2.0)) as f32);
                }
            }
        }
    }
    (x, z)
}

/// A velocity model increasing linearly with depth (m/s).
pub fn velocity_field(nex: usize, nez: usize, ngll: usize) -> SampledField {
    let (x, z) = gll_mesh(nex, nez, ngll, 4000.0, 2000.0);
    let v = z.iter().map(|&z| 1500.0 - z * 1.5).collect();
    field(x, z, v)
}

/// A signed wavefield snapshot: a ring of positive and negative lobes
/// around the domain center.
pub fn wavefield_snapshot(nex: usize, nez: usize, ngll: usize) -> SampledField {
    let (x, z) = gll_mesh(nex, nez, ngll, 4000.0, 2000.0);
    let v = x
        .iter()
        .zip(&z)
        .map(|(&x, &z)| {
            let dx = (x - 2000.0) / 400.0;
            let dz = (z + 1000.0) / 400.0;
            let r = (dx * dx + dz * dz).sqrt();
            (r * 3.0).sin() * (-r * 0.5).exp() * 1e-3
        })
        .collect();
    field(x, z, v)
}

/// Uniform random points in the unit square with values `x + y`.
pub fn random_field(n: usize, seed: u64) -> SampledField {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let y: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let v = x.iter().zip(&y).map(|(a, b)| a + b).collect();
    field(x, y, v)
}

/// Points on the line `y = 2x`.
pub fn collinear_field(n: usize) -> SampledField {
    let x: Vec<f32> = (0..n).map(|i| i as f32).collect();
    let y = x.iter().map(|&x| 2.0 * x).collect();
    let v = (0..n).map(|i| i as f32).collect();
    field(x, y, v)
}

/// A `cols` x `rows` grid of unit-spaced points with values `col + row`.
pub fn grid_field(cols: usize, rows: usize) -> SampledField {
    let mut x = Vec::with_capacity(cols * rows);
    let mut y = Vec::with_capacity(cols * rows);
    let mut v = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            x.push(col as f32);
            y.push(row as f32);
            v.push((col + row) as f32);
        }
    }
    field(x, y, v)
}

fn field(x: Vec<f32>, y: Vec<f32>, v: Vec<f32>) -> SampledField {
    SampledField::new(x, y, v).expect("generators build equal-length arrays")
}

//! Exact Euclidean distance transform.
//!
//! Implements the Felzenszwalb–Huttenlocher separable transform: squared
//! distances are propagated along columns, then the lower envelope of
//! parabolas is computed along each row. Two linear passes give the exact
//! Euclidean metric in O(W·H); chamfer or Manhattan approximations are not
//! acceptable here because metric error shows up as directional banding in
//! the feather ramp.

use crate::mask::BinaryMask;

const INF: f64 = f64::INFINITY;

/// Distance from every pixel to the nearest set pixel of `mask`, row-major.
///
/// Set pixels read 0.0; if the mask has no set pixels every entry is
/// infinite. Only exterior values are meaningful to the feathering engine.
#[must_use]
pub fn exterior_distance(mask: &BinaryMask) -> Vec<f64> {
    let width = mask.width() as usize;
    let height = mask.height() as usize;

    // Seed squared distances: 0 on the object, +inf elsewhere.
    let mut sq = vec![INF; width * height];
    for (i, &inside) in mask.as_slice().iter().enumerate() {
        if inside {
            sq[i] = 0.0;
        }
    }

    // Pass 1: 1-D transform down each column.
    let mut column = vec![0.0; height];
    let mut out = vec![0.0; height.max(width)];
    let mut v = vec![0usize; height.max(width)];
    let mut z = vec![0.0f64; height.max(width) + 1];
    for x in 0..width {
        for y in 0..height {
            column[y] = sq[y * width + x];
        }
        envelope_1d(&column, &mut out[..height], &mut v, &mut z);
        for y in 0..height {
            sq[y * width + x] = out[y];
        }
    }

    // Pass 2: 1-D transform along each row.
    let mut row = vec![0.0; width];
    for y in 0..height {
        row.copy_from_slice(&sq[y * width..(y + 1) * width]);
        envelope_1d(&row, &mut out[..width], &mut v, &mut z);
        sq[y * width..(y + 1) * width].copy_from_slice(&out[..width]);
    }

    for d in &mut sq {
        *d = d.sqrt();
    }
    sq
}

/// One-dimensional squared-distance transform of sampled function `f`:
/// `out[q] = min_p ((q - p)² + f[p])`, via the lower envelope of the
/// parabolas rooted at each `(p, f[p])`.
///
/// `v` holds the parabola sites of the envelope, `z` the boundaries between
/// consecutive parabolas; both are caller-provided scratch to avoid
/// reallocating per row.
#[allow(clippy::cast_precision_loss)]
fn envelope_1d(f: &[f64], out: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    debug_assert!(out.len() == n && v.len() >= n && z.len() >= n + 1);

    let mut k = 0usize;
    v[0] = 0;
    z[0] = -INF;
    z[1] = INF;

    for q in 1..n {
        let fq = f[q];
        if fq == INF {
            // Infinite parabolas never enter the lower envelope.
            continue;
        }
        loop {
            let p = v[k];
            // Intersection of the parabolas rooted at p and q.
            let s = intersect(p, f[p], q, fq);
            if s <= z[k] {
                if k == 0 {
                    v[0] = q;
                    z[0] = -INF;
                    z[1] = INF;
                    break;
                }
                k -= 1;
            } else {
                k += 1;
                v[k] = q;
                z[k] = s;
                z[k + 1] = INF;
                break;
            }
        }
    }

    let mut k = 0usize;
    for (q, o) in out.iter_mut().enumerate() {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let p = v[k];
        let dq = q as f64 - p as f64;
        *o = dq * dq + f[p];
    }
}

/// Horizontal coordinate where the parabola rooted at `(q, fq)` overtakes the
/// one rooted at `(p, fp)`. An infinite `fp` (the initial anchor over a run
/// of empty samples) is overtaken everywhere.
#[allow(clippy::cast_precision_loss)]
fn intersect(p: usize, fp: f64, q: usize, fq: f64) -> f64 {
    if fp == INF {
        return -INF;
    }
    let (p, q) = (p as f64, q as f64);
    ((fq + q * q) - (fp + p * p)) / (2.0 * (q - p))
}

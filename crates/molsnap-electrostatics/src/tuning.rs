//! Derived numerical tuning for P3M.
//!
//! Everything here is a pure function of [`P3mParams`]. It is computed
//! when parameters are set or imported and is never serialized: the
//! same tunables always regenerate the same tuning on the executing build.
//!
//! ## Error model
//!
//! - Real space (Kolafa–Perram):
//!   `ΔF_r = 2 exp(-(α r_c)²) / sqrt(r_c V)`
//! - k space (Hockney–Eastwood aliasing sums, ik-differentiation):
//!   `ΔF_k = 2 sqrt(Σ_n d(n)) / V`
//!
//! Both are normalized per unit `Q²/√N`. α is chosen so that
//! `ΔF_r = accuracy / √2`; the tuning is accepted only if
//! `sqrt(ΔF_r² + ΔF_k²) <= accuracy`.

use std::f64::consts::{PI, SQRT_2};

use molsnap_types::constants::ROUND_ERROR_PREC;
use molsnap_types::{MolsnapError, MolsnapResult, SubsystemId};

use crate::params::P3mParams;

/// Fallback splitting parameter when the real-space error is below the
/// target for any α.
const FALLBACK_ALPHA: f64 = 0.1;

/// Values derived from the tunables. Never stored in a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTuning {
    /// Ewald splitting parameter.
    pub alpha: f64,
    pub real_space_error: f64,
    pub k_space_error: f64,
    /// `sqrt(real² + k²)`.
    pub estimated_error: f64,
    /// Optimal influence function, one value per mesh point (x-fastest).
    influence: Vec<f64>,
}

impl DerivedTuning {
    /// Influence function values in x-fastest mesh order.
    pub fn influence_function(&self) -> &[f64] {
        &self.influence
    }

    /// Returns true if the estimate meets `accuracy`.
    pub fn satisfies(&self, accuracy: f64) -> bool {
        self.estimated_error <= accuracy
    }
}

/// Derives tuning for `params`, rejecting unreachable accuracy targets.
///
/// Blocking and CPU-bound; cost grows with the number of mesh points.
pub fn tune(params: &P3mParams) -> MolsnapResult<DerivedTuning> {
    params.validate()?;

    let volume: f64 = params.box_l.iter().product();
    let alpha = alpha_for_real_space(params.accuracy / SQRT_2, params.r_cut, volume);
    let real = real_space_error(alpha, params.r_cut, volume);
    let kspace = k_space_error(params, alpha, volume);
    let estimated = real.hypot(kspace);

    if !(estimated <= params.accuracy) {
        return Err(MolsnapError::validation(
            SubsystemId::LongRangeSolver,
            "accuracy",
            format!(
                "target {:.3e} not reachable with mesh {:?}, cao {}, r_cut {} (estimated {:.3e})",
                params.accuracy, params.mesh, params.cao, params.r_cut, estimated
            ),
        ));
    }

    let influence = influence_function(params, alpha);

    tracing::debug!(
        alpha,
        real_space_error = real,
        k_space_error = kspace,
        mesh_points = influence.len(),
        "p3m tuned"
    );

    Ok(DerivedTuning {
        alpha,
        real_space_error: real,
        k_space_error: kspace,
        estimated_error: estimated,
        influence,
    })
}

/// Normalized real-space RMS force error.
pub fn real_space_error(alpha: f64, r_cut: f64, volume: f64) -> f64 {
    2.0 * (-(alpha * r_cut).powi(2)).exp() / (r_cut * volume).sqrt()
}

/// Inverts [`real_space_error`] for the target error.
fn alpha_for_real_space(target: f64, r_cut: f64, volume: f64) -> f64 {
    let at_zero = real_space_error(0.0, r_cut, volume);
    if at_zero <= target {
        return FALLBACK_ALPHA;
    }
    (at_zero / target).ln().sqrt() / r_cut
}

/// Normalized k-space RMS force error.
pub fn k_space_error(params: &P3mParams, alpha: f64, volume: f64) -> f64 {
    let mut he_q = 0.0;
    for_each_mesh_point(params, |n| {
        let n2 = norm2(&n, &params.box_l);
        if n2 == 0.0 {
            return;
        }
        let cs = cotangent_sum(&n, params);
        let (alias1, alias2) = aliasing_sums(&n, params, alpha);
        let d = alias1 - (alias2 / cs).powi(2) / n2;
        if d > 0.0 && (d / alias1).abs() > ROUND_ERROR_PREC {
            he_q += d;
        }
    });
    2.0 * he_q.sqrt() / volume
}

/// Optimal influence function for the principal Brillouin zone.
fn influence_function(params: &P3mParams, alpha: f64) -> Vec<f64> {
    let volume: f64 = params.box_l.iter().product();
    let factor = (PI / alpha).powi(2);
    let mut out = Vec::with_capacity(params.mesh_size().unwrap_or_default());
    for_each_mesh_point(params, |n| {
        let n2 = norm2(&n, &params.box_l);
        if n2 == 0.0 {
            out.push(0.0);
            return;
        }
        let u2 = sinc_product(&n, params).powi(2 * params.cao as i32);
        let cs = cotangent_sum(&n, params);
        out.push(u2 * (-factor * n2).exp() / (n2 * cs * cs) / (PI * volume));
    });
    out
}

/// Visits all mesh points in x-fastest order with shifted (signed) indices.
fn for_each_mesh_point(params: &P3mParams, mut f: impl FnMut([i64; 3])) {
    let [mx, my, mz] = params.mesh.map(i64::from);
    for z in 0..mz {
        for y in 0..my {
            for x in 0..mx {
                f([shift(x, mx), shift(y, my), shift(z, mz)]);
            }
        }
    }
}

#[inline]
fn shift(n: i64, mesh: i64) -> i64 {
    if 2 * n >= mesh {
        n - mesh
    } else {
        n
    }
}

/// Squared reciprocal-space norm Σ (n_d / L_d)².
#[inline]
fn norm2(n: &[i64; 3], box_l: &[f64; 3]) -> f64 {
    (0..3).map(|d| (n[d] as f64 / box_l[d]).powi(2)).sum()
}

#[inline]
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

fn sinc_product(n: &[i64; 3], params: &P3mParams) -> f64 {
    (0..3)
        .map(|d| sinc(n[d] as f64 / params.mesh[d] as f64))
        .product()
}

/// Aliasing sums for the principal Brillouin zone only.
fn aliasing_sums(n: &[i64; 3], params: &P3mParams, alpha: f64) -> (f64, f64) {
    let factor = (PI / alpha).powi(2);
    let nm2 = norm2(n, &params.box_l);
    let ex = (-factor * nm2).exp();
    let u2 = sinc_product(n, params).powi(2 * params.cao as i32);
    // With no aliased images nm == n, so n·nm equals |n|².
    let alias1 = ex * ex / nm2;
    let alias2 = u2 * ex;
    (alias1, alias2)
}

/// Product over axes of the closed-form aliased sum Σ_m sinc^(2·cao).
fn cotangent_sum(n: &[i64; 3], params: &P3mParams) -> f64 {
    (0..3)
        .map(|d| analytic_cotangent_sum(n[d], params.mesh[d], params.cao))
        .product()
}

fn analytic_cotangent_sum(n: i64, mesh: u32, cao: u32) -> f64 {
    let c = (PI * n as f64 / mesh as f64).cos().powi(2);
    match cao {
        1 => 1.0,
        2 => (1.0 + c * 2.0) / 3.0,
        3 => (2.0 + c * (11.0 + c * 2.0)) / 15.0,
        4 => (17.0 + c * (180.0 + c * (114.0 + c * 4.0))) / 315.0,
        5 => (62.0 + c * (1072.0 + c * (1452.0 + c * (247.0 + c * 2.0)))) / 2835.0,
        6 => {
            (1382.0 + c * (35396.0 + c * (83021.0 + c * (34096.0 + c * (2026.0 + c * 4.0)))))
                / 155925.0
        }
        7 => {
            (21844.0
                + c * (776661.0
                    + c * (2801040.0 + c * (2123860.0 + c * (349500.0 + c * (8166.0 + c * 4.0))))))
                / 6081075.0
        }
        // validate() bounds cao to 1..=7
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cotangent_sum_is_one_at_origin() {
        for cao in 1..=7 {
            assert!((analytic_cotangent_sum(0, 8, cao) - 1.0).abs() < 1e-12, "cao {cao}");
        }
    }

    #[test]
    fn cotangent_sum_bounds_principal_term() {
        // The aliased sum is never smaller than its m = 0 term.
        for cao in 1..=7 {
            for n in 1..4 {
                let principal = sinc(n as f64 / 8.0).powi(2 * cao as i32);
                assert!(analytic_cotangent_sum(n, 8, cao) >= principal - 1e-12);
            }
        }
    }

    #[test]
    fn alpha_hits_real_space_target() {
        let target = 5e-3;
        let alpha = alpha_for_real_space(target, 3.0, 1000.0);
        assert!((real_space_error(alpha, 3.0, 1000.0) - target).abs() < 1e-12);
    }

    #[test]
    fn shift_is_signed() {
        assert_eq!(shift(3, 8), 3);
        assert_eq!(shift(4, 8), -4);
        assert_eq!(shift(7, 8), -1);
    }
}

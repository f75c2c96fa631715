//! Pure gate arithmetic: inversion, U3 composition, and a conservative
//! commutation check. None of this touches the allocator or the control
//! context — it operates only on gates, params, and already-lowered
//! [`GateCommand`]s.

use num_complex::Complex64;

use crate::command::GateCommand;
use crate::error::IrError;
use crate::gate::BuiltinGate;

/// Tolerance used to decide whether a complex amplitude is effectively zero.
const EPSILON: f64 = 1e-9;

/// The adjoint of a primitive gate application.
///
/// `X, Y, Z, H` are self-inverse and must carry no parameters. `U3(θ, φ, λ)`
/// inverts to `U3(-θ, -λ, -φ)` — the Qiskit-compatible adjoint (note φ and λ
/// swap as well as negate).
pub fn invert_gate(gate: BuiltinGate, params: &[f64]) -> Result<(BuiltinGate, Vec<f64>), IrError> {
    match gate {
        BuiltinGate::X | BuiltinGate::Y | BuiltinGate::Z | BuiltinGate::H => {
            if !params.is_empty() {
                return Err(IrError::ParamArityMismatch { gate, expected: 0, got: params.len() });
            }
            Ok((gate, Vec::new()))
        }
        BuiltinGate::U3 => {
            if params.len() != 3 {
                return Err(IrError::ParamArityMismatch { gate, expected: 3, got: params.len() });
            }
            let (theta, phi, lambda) = (params[0], params[1], params[2]);
            Ok((BuiltinGate::U3, vec![-theta, -lambda, -phi]))
        }
    }
}

/// Conservative commutation check: `true` only when swapping the two
/// commands is *provably* a no-op. Must never falsely return `true` — a
/// missed commutation just means a missed optimisation, a false positive
/// means a miscompiled circuit.
pub fn commutes(a: &GateCommand, b: &GateCommand) -> bool {
    if a == b {
        return true;
    }
    if a.support().is_disjoint(&b.support()) {
        return true;
    }
    if a.gate == BuiltinGate::Z && b.gate == BuiltinGate::Z && a.support() == b.support() {
        return true;
    }
    if a.gate == BuiltinGate::X && b.gate == BuiltinGate::X {
        if a.controls.contains(&b.target) || b.controls.contains(&a.target) {
            return false;
        }
        return true;
    }
    false
}

/// Composes two consecutive `U3` gates, `U3(a,b,c) * U3(x,y,z)`, into a
/// global phase and a single equivalent `U3(alpha, beta, gamma)` such that
/// `e^{i*phi} * U3(alpha, beta, gamma)` equals the product.
pub fn reduce_consecutive_u3(a: f64, b: f64, c: f64, x: f64, y: f64, z: f64) -> (f64, f64, f64, f64) {
    let expcy = Complex64::from_polar(1.0, c + y);

    let s_sum = Complex64::new(((a + x) / 2.0).sin(), 0.0) * (Complex64::new(1.0, 0.0) + expcy) / 2.0;
    let s_sub = Complex64::new(((a - x) / 2.0).sin(), 0.0) * (Complex64::new(1.0, 0.0) - expcy) / 2.0;
    let c_sum = Complex64::new(((a + x) / 2.0).cos(), 0.0) * (Complex64::new(1.0, 0.0) + expcy) / 2.0;
    let c_sub = Complex64::new(((a - x) / 2.0).cos(), 0.0) * (Complex64::new(1.0, 0.0) - expcy) / 2.0;

    let e1 = c_sum + c_sub;
    let e2 = s_sum - s_sub;
    let e3 = s_sum + s_sub;
    let e4 = c_sum - c_sub;

    let phi = e1.arg();
    let alpha = 2.0 * e1.norm().acos();

    let (beta, gamma) = if e2.norm() < EPSILON {
        (0.0, e4.arg() + b + z - phi)
    } else {
        (e3.arg() + b - phi, e2.arg() + z - phi)
    };

    (phi, alpha, beta, gamma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::qubit::QubitId;

    #[test]
    fn self_inverse_gates_round_trip() {
        for gate in [BuiltinGate::X, BuiltinGate::Y, BuiltinGate::Z, BuiltinGate::H] {
            let (g, p) = invert_gate(gate, &[]).unwrap();
            assert_eq!(g, gate);
            assert!(p.is_empty());
        }
    }

    #[test]
    fn u3_inversion_swaps_and_negates() {
        let (gate, params) = invert_gate(BuiltinGate::U3, &[0.3, 0.4, 0.5]).unwrap();
        assert_eq!(gate, BuiltinGate::U3);
        assert_eq!(params, vec![-0.3, -0.5, -0.4]);
    }

    #[test]
    fn disjoint_commands_commute() {
        let a = GateCommand::uncontrolled(BuiltinGate::X, QubitId(0), vec![]);
        let b = GateCommand::uncontrolled(BuiltinGate::X, QubitId(1), vec![]);
        assert!(commutes(&a, &b));
    }

    #[test]
    fn x_target_in_other_controls_does_not_commute() {
        let mut controls = BTreeSet::new();
        controls.insert(QubitId(0));
        let a = GateCommand::uncontrolled(BuiltinGate::X, QubitId(0), vec![]);
        let b = GateCommand::new(BuiltinGate::X, QubitId(1), controls, vec![]);
        assert!(!commutes(&a, &b));
    }

    /// `U3(a,b,c) . U3(x,y,z)` matches `e^{i phi} U3(alpha,beta,gamma)`
    /// entry-wise, matrix-multiplying the two known-good U3 matrices
    /// directly rather than trusting the closed form circularly.
    #[test]
    fn reduce_consecutive_u3_matches_matrix_product() {
        fn u3_matrix(theta: f64, phi: f64, lambda: f64) -> [Complex64; 4] {
            let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
            [
                Complex64::new(c, 0.0),
                -Complex64::from_polar(1.0, lambda) * s,
                Complex64::from_polar(1.0, phi) * s,
                Complex64::from_polar(1.0, phi + lambda) * c,
            ]
        }

        fn mul(m: [Complex64; 4], n: [Complex64; 4]) -> [Complex64; 4] {
            [
                m[0] * n[0] + m[1] * n[2],
                m[0] * n[1] + m[1] * n[3],
                m[2] * n[0] + m[3] * n[2],
                m[2] * n[1] + m[3] * n[3],
            ]
        }

        let (a, b, c, x, y, z) = (0.3, 0.7, -0.2, 1.1, -0.4, 0.25);
        let expected = mul(u3_matrix(a, b, c), u3_matrix(x, y, z));

        let (phi, alpha, beta, gamma) = reduce_consecutive_u3(a, b, c, x, y, z);
        let actual_raw = u3_matrix(alpha, beta, gamma);
        let phase = Complex64::from_polar(1.0, phi);
        for i in 0..4 {
            let actual = phase * actual_raw[i];
            assert!((actual - expected[i]).norm() < 1e-7, "entry {i}: {actual} vs {}", expected[i]);
        }
    }

    #[test]
    fn reduce_consecutive_u3_identity_times_identity() {
        let (phi, alpha, beta, gamma) = reduce_consecutive_u3(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(phi.abs() < 1e-9);
        assert!(alpha.abs() < 1e-9);
        assert!(beta.abs() < 1e-9 && gamma.abs() < 1e-9);
    }

    proptest::proptest! {
        /// The closed form must agree with direct 2x2 matrix multiplication
        /// across the whole parameter space, not just the hand-picked values
        /// above.
        #[test]
        fn reduce_consecutive_u3_matches_matrix_product_for_any_angles(
            a in -10.0f64..10.0, b in -10.0f64..10.0, c in -10.0f64..10.0,
            x in -10.0f64..10.0, y in -10.0f64..10.0, z in -10.0f64..10.0,
        ) {
            fn u3_matrix(theta: f64, phi: f64, lambda: f64) -> [Complex64; 4] {
                let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
                [
                    Complex64::new(c, 0.0),
                    -Complex64::from_polar(1.0, lambda) * s,
                    Complex64::from_polar(1.0, phi) * s,
                    Complex64::from_polar(1.0, phi + lambda) * c,
                ]
            }

            fn mul(m: [Complex64; 4], n: [Complex64; 4]) -> [Complex64; 4] {
                [
                    m[0] * n[0] + m[1] * n[2],
                    m[0] * n[1] + m[1] * n[3],
                    m[2] * n[0] + m[3] * n[2],
                    m[2] * n[1] + m[3] * n[3],
                ]
            }

            let expected = mul(u3_matrix(a, b, c), u3_matrix(x, y, z));
            let (phi, alpha, beta, gamma) = reduce_consecutive_u3(a, b, c, x, y, z);
            let actual_raw = u3_matrix(alpha, beta, gamma);
            let phase = Complex64::from_polar(1.0, phi);
            for i in 0..4 {
                let actual = phase * actual_raw[i];
                prop_assert!((actual - expected[i]).norm() < 1e-6);
            }
        }
    }
}

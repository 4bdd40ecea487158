//! Hashed linear cost regressor over action-dependent features.

use crate::example::{AdfExample, Namespace};

/// Hash of the per-action constant feature.
const CONSTANT_HASH: u64 = 11_650_396;
const INTERACTION_PRIME: u64 = 0x0100_0000_01b3;

pub struct LinearModel {
    weights: Vec<f32>,
    mask: u64,
}

impl LinearModel {
    pub fn new(bits: u32) -> Self {
        let size = 1usize << bits;
        Self {
            weights: vec![0.0; size],
            mask: (size as u64) - 1,
        }
    }

    /// Expand an action (plus the optional shared line) into weight-slot
    /// features: raw namespaces, the constant, and the requested crosses.
    pub fn features(
        &self,
        shared: Option<&AdfExample>,
        action: &AdfExample,
        quadratic: &[(char, char)],
    ) -> Vec<(usize, f32)> {
        let namespaces: Vec<&Namespace> = shared
            .into_iter()
            .flat_map(|s| s.namespaces.iter())
            .chain(action.namespaces.iter())
            .collect();

        let mut out: Vec<(usize, f32)> = namespaces
            .iter()
            .flat_map(|ns| ns.features.iter())
            .map(|f| (self.slot(f.hash), f.value))
            .collect();
        out.push((self.slot(CONSTANT_HASH), 1.0));

        for &(a, b) in quadratic {
            for (i, left) in namespaces.iter().enumerate() {
                if left.index != a {
                    continue;
                }
                for (j, right) in namespaces.iter().enumerate() {
                    if right.index != b || i == j || (a == b && j < i) {
                        continue;
                    }
                    for lf in &left.features {
                        for rf in &right.features {
                            let hash = lf.hash.wrapping_mul(INTERACTION_PRIME) ^ rf.hash;
                            out.push((self.slot(hash), lf.value * rf.value));
                        }
                    }
                }
            }
        }

        out
    }

    pub fn predict(&self, features: &[(usize, f32)]) -> f32 {
        features.iter().map(|&(i, v)| self.weights[i] * v).sum()
    }

    /// Normalised squared-loss step moving the prediction a fraction `eta`
    /// of the way towards `target`.
    pub fn update(&mut self, features: &[(usize, f32)], target: f32, eta: f32) {
        let norm: f32 = features.iter().map(|&(_, v)| v * v).sum();
        if norm <= 0.0 {
            return;
        }
        let delta = eta * (target - self.predict(features)) / norm;
        for &(i, v) in features {
            self.weights[i] += delta * v;
        }
    }

    fn slot(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example::parse_line;

    #[test]
    fn test_fresh_model_predicts_zero() {
        let model = LinearModel::new(10);
        let action = parse_line("|Action id=a").unwrap();
        let features = model.features(None, &action, &[]);
        assert_eq!(model.predict(&features), 0.0);
    }

    #[test]
    fn test_update_moves_towards_target() {
        let mut model = LinearModel::new(18);
        let shared = parse_line("shared |User usr=tom").unwrap();
        let action = parse_line("|Action id=a").unwrap();
        let features = model.features(Some(&shared), &action, &[('U', 'A')]);

        model.update(&features, -1.0, 1.0);
        assert!((model.predict(&features) + 1.0).abs() < 1e-5);

        model.update(&features, 0.0, 0.5);
        assert!((model.predict(&features) + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_quadratic_crosses_shared_and_action() {
        let model = LinearModel::new(18);
        let shared = parse_line("shared |User usr=tom time=mon").unwrap();
        let action = parse_line("|Action id=a").unwrap();

        let plain = model.features(Some(&shared), &action, &[]);
        let crossed = model.features(Some(&shared), &action, &[('U', 'A')]);
        // 3 raw + constant, then 2 user×action crosses
        assert_eq!(plain.len(), 4);
        assert_eq!(crossed.len(), 6);
    }
}

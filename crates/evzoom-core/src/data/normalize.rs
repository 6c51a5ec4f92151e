//! Normalization
//!
//! Run once after loading. Afterwards coupling scores lie in `[0, 1]`, matrix
//! values in `[-1, 1]`, couplings are ordered by descending score and every logo
//! column is stacked by class total then by letter height.
use super::groups::AaGroup;
use super::model::{Coupling, LogoColumn, ZoomData};
use itertools::Itertools;
use log::{debug, warn};
use std::collections::HashSet;

/// Normalizes couplings and logo in place and logs any inconsistencies found.
pub fn normalize(data: &mut ZoomData) {
    let issues = check(data);
    if issues > 0 {
        warn!("Input data has {} inconsistencies; continuing", issues);
    }
    prepare_logo(&mut data.logo);
    prepare_couplings(&mut data.couplings);
    debug!(
        "Normalized {} couplings over {} positions",
        data.couplings.len(),
        data.len()
    );
}

/// A divisor that never produces NaN or infinities.
fn safe_divisor(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max
    } else {
        1.0
    }
}

pub fn prepare_couplings(couplings: &mut [Coupling]) {
    couplings.sort_by(|a, b| b.score.total_cmp(&a.score));

    let max_score = safe_divisor(couplings.iter().map(|c| c.score).fold(0.0, f64::max));
    let max_value = safe_divisor(
        couplings
            .iter()
            .flat_map(|c| c.matrix.iter().flatten())
            .map(|v| v.abs())
            .fold(0.0, f64::max),
    );

    for coupling in couplings.iter_mut() {
        coupling.score /= max_score;
        coupling
            .matrix
            .iter_mut()
            .flatten()
            .for_each(|v| *v /= max_value);
    }
}

pub fn prepare_logo(logo: &mut [LogoColumn]) {
    for column in logo.iter_mut() {
        let totals = column
            .iter()
            .map(|e| (AaGroup::of(e.code), e.bits))
            .into_grouping_map()
            .sum();
        column.entries.sort_by(|a, b| {
            let ta = totals[&AaGroup::of(a.code)];
            let tb = totals[&AaGroup::of(b.code)];
            ta.total_cmp(&tb).then(a.bits.total_cmp(&b.bits))
        });
    }
}

/// Logs every inconsistency in `data` and returns how many were found.
/// None of them are fatal.
pub fn check(data: &ZoomData) -> usize {
    let length = data.len();
    let mut issues = 0;

    for c in &data.couplings {
        if c.i == c.j {
            warn!("Coupling {}-{} couples a position with itself", c.i, c.j);
            issues += 1;
        }
        if c.i == 0 || c.j == 0 || c.i > length || c.j > length {
            warn!("Coupling {}-{} is outside 1..={}", c.i, c.j, length);
            issues += 1;
        }
    }

    for (k, column) in data.logo.iter().enumerate() {
        let mut seen = HashSet::new();
        for entry in column.iter() {
            if !seen.insert(entry.code) {
                warn!("Logo column {} repeats code {}", k, entry.code);
                issues += 1;
            }
            if entry.bits < 0.0 {
                warn!("Logo column {} has negative bits for {}", k, entry.code);
                issues += 1;
            }
        }
    }

    if data.map.indices.len() != length || data.map.letters.len() != length {
        warn!(
            "Position map has {} indices and {} letters for {} positions",
            data.map.indices.len(),
            data.map.letters.len(),
            length
        );
        issues += 1;
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LogoEntry;

    fn coupling(i: usize, j: usize, score: f64, matrix: Vec<Vec<f64>>) -> Coupling {
        Coupling {
            i,
            j,
            score,
            matrix,
            i_labels: vec![],
            j_labels: vec![],
        }
    }

    fn entry(code: char, bits: f64) -> LogoEntry {
        LogoEntry { code, bits }
    }

    #[test]
    fn test_prepare_couplings_scenario() {
        let mut couplings = vec![
            coupling(2, 5, 10.0, vec![vec![1.0]]),
            coupling(3, 9, 5.0, vec![vec![2.0]]),
        ];
        prepare_couplings(&mut couplings);
        let order: Vec<_> = couplings.iter().map(|c| (c.i, c.j)).collect();
        assert_eq!(order, vec![(2, 5), (3, 9)]);
        assert_eq!(couplings[0].score, 1.0);
        assert_eq!(couplings[1].score, 0.5);
        assert_eq!(couplings[0].matrix, vec![vec![0.5]]);
        assert_eq!(couplings[1].matrix, vec![vec![1.0]]);
    }

    #[test]
    fn test_prepare_couplings_sorts_descending() {
        let mut couplings = vec![
            coupling(1, 4, 0.1, vec![vec![-4.0, 1.0]]),
            coupling(2, 8, 0.4, vec![vec![2.0, 0.5]]),
            coupling(3, 7, 0.2, vec![vec![0.0, -1.0]]),
        ];
        prepare_couplings(&mut couplings);
        let scores: Vec<_> = couplings.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![1.0, 0.5, 0.25]);
        assert!(couplings
            .iter()
            .flat_map(|c| c.matrix.iter().flatten())
            .all(|v| (-1.0..=1.0).contains(v)));
        assert_eq!(couplings[2].matrix, vec![vec![-1.0, 0.25]]);
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut empty: Vec<Coupling> = vec![];
        prepare_couplings(&mut empty);
        assert!(empty.is_empty());

        let mut zeros = vec![coupling(1, 3, 0.0, vec![vec![0.0, 0.0]])];
        prepare_couplings(&mut zeros);
        assert_eq!(zeros[0].score, 0.0);
        assert_eq!(zeros[0].matrix, vec![vec![0.0, 0.0]]);
        assert!(zeros[0].score.is_finite());
    }

    #[test]
    fn test_prepare_logo_orders_by_group_total() {
        // hydrophobic total 0.9, positive total 0.6, aromatic 0.05
        let mut logo = vec![LogoColumn::new(vec![
            entry('L', 0.6),
            entry('K', 0.4),
            entry('A', 0.3),
            entry('W', 0.05),
            entry('R', 0.2),
        ])];
        prepare_logo(&mut logo);
        let codes: String = logo[0].iter().map(|e| e.code).collect();
        assert_eq!(codes, "WRKAL");
    }

    #[test]
    fn test_check_counts_issues() {
        let data = ZoomData {
            couplings: vec![coupling(2, 2, 1.0, vec![]), coupling(1, 9, 1.0, vec![])],
            logo: vec![
                LogoColumn::new(vec![entry('A', 0.1), entry('A', 0.2)]),
                LogoColumn::new(vec![entry('C', -0.1)]),
            ],
            map: Default::default(),
        };
        // self coupling, out of range, repeated code, negative bits, map length
        assert_eq!(check(&data), 5);
    }
}

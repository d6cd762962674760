use std::hash::Hash;

use num::Num;

use crate::recommender::matrix::PreferenceMatrix;
use crate::utils::math::pearson;

/// Similarity given to pairs without a single shared counterpart.
/// It is at the floor, so such pairs never contribute to a recommendation.
pub const NO_OVERLAP_SIMILARITY: f64 = 0.0;

/// Correlation substituted when it is undefined (zero variance)
pub const MIN_CORRELATION: f64 = -1.0;

/// Map a correlation coefficient in [-1, 1] onto a similarity in [0, 1]
/// sim = (c + 1) / 2
#[inline]
pub fn correlation_to_similarity(c: f64) -> f64 {
    (c + 1.0) / 2.0
}

/// Similarity of two paired score vectors.
/// `v1[i]` and `v2[i]` must refer to the same counterpart.
///
/// identical → 1.0, anti-correlated → 0.0, uncorrelated → 0.5.
/// Undefined correlation is treated as `MIN_CORRELATION` → 0.0.
pub fn pearson_similarity<N>(v1: &[N], v2: &[N]) -> f64
where
    N: Copy + Into<f64>,
{
    let c = match pearson(v1, v2) {
        Some(c) => c,
        None => MIN_CORRELATION,
    };
    correlation_to_similarity(c)
}

/// Collect the scores of `p1` and `p2` over the counterparts both rated.
/// Pairing order follows `p1`'s row.
pub fn shared_vectors<R, C, N>(matrix: &PreferenceMatrix<R, C, N>, p1: &R, p2: &R) -> (Vec<N>, Vec<N>)
where
    R: Eq + Hash,
    C: Eq + Hash,
    N: Copy,
{
    let (row1, row2) = match (matrix.row(p1), matrix.row(p2)) {
        (Some(r1), Some(r2)) => (r1, r2),
        _ => return (Vec::new(), Vec::new()),
    };
    let cap = row1.len().min(row2.len());
    let mut v1 = Vec::with_capacity(cap);
    let mut v2 = Vec::with_capacity(cap);
    for (col, rec) in row1.iter() {
        if let Some(other) = row2.get(col) {
            v1.push(rec.score);
            v2.push(other.score);
        }
    }
    (v1, v2)
}

/// Similarity in [0, 1] between two rows of the matrix.
///
/// Rows are compared only over their shared counterparts; without any
/// overlap (or with a missing row) the result is `NO_OVERLAP_SIMILARITY`.
/// Comparing a row with at least one record to itself is always exactly 1.0.
pub fn similarity<R, C, N>(matrix: &PreferenceMatrix<R, C, N>, p1: &R, p2: &R) -> f64
where
    R: Eq + Hash,
    C: Eq + Hash,
    N: Num + Copy + Into<f64>,
{
    if p1 == p2 {
        return match matrix.row(p1) {
            Some(row) if !row.is_empty() => 1.0,
            _ => NO_OVERLAP_SIMILARITY,
        };
    }
    let (v1, v2) = shared_vectors(matrix, p1, p2);
    if v1.is_empty() {
        return NO_OVERLAP_SIMILARITY;
    }
    pearson_similarity(&v1, &v2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn prefs() -> PreferenceMatrix<&'static str, &'static str, i32> {
        let rows: [(&str, [i32; 5]); 4] = [
            ("p1", [0, 0, 10, 10, 0]),
            ("p2", [10, 10, 0, 0, 10]),
            ("p3", [0, 10, 0, 0, 10]),
            ("p4", [0, 0, 0, 0, 10]),
        ];
        let items = ["item1", "item2", "item3", "item4", "item5"];
        rows.iter()
            .flat_map(|(p, scores)| items.iter().zip(scores.iter()).map(move |(i, s)| (*p, *i, *s)))
            .collect()
    }

    #[test]
    fn reference_vectors() {
        let v1 = [0, 10, 10, 0, 10];
        assert_eq!(pearson_similarity(&v1, &[10, 0, 0, 10, 0]), 0.0);
        assert_eq!(pearson_similarity(&v1, &v1), 1.0);
        assert!((pearson_similarity(&v1, &[0, 10, 0, 10, 0]) - 0.41666666666666669).abs() < EPS);
    }

    #[test]
    fn degenerate_vectors_fall_to_zero() {
        assert_eq!(pearson_similarity(&[5.0_f64, 5.0, 5.0], &[1.0, 2.0, 3.0]), 0.0);
        let empty: [f64; 0] = [];
        assert_eq!(pearson_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn named_preference_sets() {
        let m = prefs();
        assert_eq!(similarity(&m, &"p1", &"p1"), 1.0);
        assert_eq!(similarity(&m, &"p1", &"p2"), 0.0);
        assert!((similarity(&m, &"p1", &"p3") - 0.16666666666666669).abs() < EPS);
        assert!((similarity(&m, &"p1", &"p4") - 0.29587585476806849).abs() < EPS);
        assert!((similarity(&m, &"p2", &"p4") - 0.70412414523193156).abs() < EPS);
        assert!((similarity(&m, &"p2", &"p3") - 0.83333333333333326).abs() < EPS);
    }

    #[test]
    fn symmetric_and_bounded() {
        let m = prefs();
        let keys = ["p1", "p2", "p3", "p4"];
        for a in keys.iter() {
            for b in keys.iter() {
                let ab = similarity(&m, a, b);
                let ba = similarity(&m, b, a);
                assert!((ab - ba).abs() < EPS, "{a} {b}: {ab} != {ba}");
                assert!((0.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn no_overlap_and_missing_rows() {
        let m: PreferenceMatrix<&str, &str, i32> =
            [("a", "x", 1), ("a", "y", 5), ("b", "z", 3), ("b", "w", 4)].into_iter().collect();
        assert_eq!(similarity(&m, &"a", &"b"), NO_OVERLAP_SIMILARITY);
        assert_eq!(similarity(&m, &"a", &"nobody"), NO_OVERLAP_SIMILARITY);
        assert_eq!(similarity(&m, &"nobody", &"nobody"), NO_OVERLAP_SIMILARITY);
    }

    #[test]
    fn self_similarity_with_single_preference() {
        let m: PreferenceMatrix<u32, u32, f32> = [(1, 10, 4.0)].into_iter().collect();
        assert_eq!(similarity(&m, &1, &1), 1.0);
    }

    #[test]
    fn shared_vectors_keep_pairing() {
        let m: PreferenceMatrix<&str, &str, i32> = [
            ("a", "x", 1), ("a", "y", 2), ("a", "z", 3),
            ("b", "z", 30), ("b", "x", 10), ("b", "q", 99),
        ]
        .into_iter()
        .collect();
        let (v1, v2) = shared_vectors(&m, &"a", &"b");
        assert_eq!(v1, vec![1, 3]);
        assert_eq!(v2, vec![10, 30]);
    }
}

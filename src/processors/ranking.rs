use crate::utils::constants::RANK_SCALE;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Smallest value gets rank 1
    Ascending,
    /// Largest value gets rank 1
    Descending,
}

/// 1-based ranks with ties sharing the mean of the positions they span.
///
/// `[10, 20, 20, 30]` ascending ranks as `[1, 2.5, 2.5, 4]`.
pub fn average_rank(values: &[f64], order: RankOrder) -> Vec<f64> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| {
        let cmp = values[a].total_cmp(&values[b]);
        match order {
            RankOrder::Ascending => cmp,
            RankOrder::Descending => cmp.reverse(),
        }
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < indices.len() {
        let mut end = start + 1;
        while end < indices.len()
            && values[indices[end]].total_cmp(&values[indices[start]]) == Ordering::Equal
        {
            end += 1;
        }

        // Positions start+1 ..= end share their mean
        let shared = (start + 1 + end) as f64 / 2.0;
        for &index in &indices[start..end] {
            ranks[index] = shared;
        }
        start = end;
    }

    ranks
}

/// Scale ranks so the largest becomes 100
pub fn normalize(ranks: &[f64]) -> Vec<f64> {
    let max = ranks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 {
        return vec![0.0; ranks.len()];
    }
    ranks.iter().map(|r| r / max * RANK_SCALE).collect()
}

/// Rank then normalise, the pairing used for every RFM dimension
pub fn normalized_rank(values: &[f64], order: RankOrder) -> Vec<f64> {
    normalize(&average_rank(values, order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_ranks_with_ties() {
        let ranks = average_rank(&[10.0, 20.0, 20.0, 30.0], RankOrder::Ascending);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn test_descending_ranks() {
        let ranks = average_rank(&[3.0, 1.0, 2.0], RankOrder::Descending);
        assert_eq!(ranks, vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_all_tied() {
        let ranks = average_rank(&[7.0, 7.0], RankOrder::Ascending);
        assert_eq!(ranks, vec![1.5, 1.5]);
        assert_eq!(normalize(&ranks), vec![100.0, 100.0]);
    }

    #[test]
    fn test_rank_independent_of_input_order() {
        let forward = average_rank(&[5.0, 1.0, 5.0, 3.0], RankOrder::Ascending);
        let backward = average_rank(&[3.0, 5.0, 1.0, 5.0], RankOrder::Ascending);

        assert_eq!(forward, vec![3.5, 1.0, 3.5, 2.0]);
        assert_eq!(backward, vec![2.0, 3.5, 1.0, 3.5]);
    }

    #[test]
    fn test_normalized_rank() {
        let scaled = normalized_rank(&[1.0, 2.0, 4.0, 3.0], RankOrder::Ascending);
        assert_eq!(scaled, vec![25.0, 50.0, 100.0, 75.0]);
        assert!(normalize(&[]).is_empty());
    }
}

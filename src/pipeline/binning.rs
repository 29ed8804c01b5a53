//! Equal-frequency binning with a minimum bin population
//!
//! A row of `n` values is cut into `n / min_per_bin` quantile bins. Cuts are
//! moved past runs of equal values so a tie never straddles two bins, and
//! any bin left under the minimum population is merged into a neighbour.
//! Rows that cannot keep two bins are degenerate.

use std::cmp::Ordering;

/// Discretization of one row into bins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinAssignment {
    /// Bin label of every data point, in data point order
    labels: Vec<usize>,
    /// Number of data points in every bin
    counts: Vec<usize>,
}

impl BinAssignment {
    /// Build an assignment from raw labels (labels must be `0..bin_count`).
    ///
    /// Returns None when a label leaves a gap or fewer than two bins are used.
    pub fn from_labels(labels: Vec<usize>) -> Option<Self> {
        let bin_count = labels.iter().max().map(|m| m + 1)?;
        let mut counts = vec![0usize; bin_count];
        for &label in &labels {
            counts[label] += 1;
        }
        if bin_count < 2 || counts.iter().any(|&c| c == 0) {
            return None;
        }
        Some(Self { labels, counts })
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Discretize `values` into bins holding at least `min_per_bin` points each.
///
/// Returns None for degenerate rows (constant rows, rows dominated by a
/// single value, or rows shorter than two minimum bins).
pub fn assign_bins(values: &[f64], min_per_bin: usize) -> Option<BinAssignment> {
    let n = values.len();
    if min_per_bin == 0 || n < 2 * min_per_bin {
        return None;
    }

    // Stable sort keeps equal values in data point order
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let target_bins = n / min_per_bin;
    let mut cuts: Vec<usize> = Vec::with_capacity(target_bins);
    for j in 1..target_bins {
        let last = cuts.last().copied().unwrap_or(0);
        let mut cut = j * n / target_bins;
        if cut <= last {
            continue;
        }
        while cut < n && values[order[cut]] == values[order[cut - 1]] {
            cut += 1;
        }
        if cut >= n {
            break;
        }
        cuts.push(cut);
    }

    let mut sizes = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in &cuts {
        sizes.push(cut - start);
        start = cut;
    }
    sizes.push(n - start);

    let plan = merge_plan(&sizes, min_per_bin);
    let bin_count = plan.iter().max().map(|m| m + 1).unwrap_or(0);
    if bin_count < 2 {
        return None;
    }

    let mut labels = vec![0usize; n];
    let mut counts = vec![0usize; bin_count];
    let mut position = 0;
    for (bin, &size) in sizes.iter().enumerate() {
        let merged = plan[bin];
        for &point in &order[position..position + size] {
            labels[point] = merged;
        }
        counts[merged] += size;
        position += size;
    }

    Some(BinAssignment { labels, counts })
}

/// Plan the merging of adjacent groups until each holds `min_size` or only
/// one group is left.
///
/// Returns the merged group id of every original group; ids are contiguous
/// and keep the original left-to-right order. The smallest under-populated
/// group (first on ties) is merged into its smaller neighbour (left on ties).
pub fn merge_plan(sizes: &[usize], min_size: usize) -> Vec<usize> {
    // Each merged group: (total size, original members)
    let mut groups: Vec<(usize, Vec<usize>)> = sizes
        .iter()
        .enumerate()
        .map(|(i, &s)| (s, vec![i]))
        .collect();

    while groups.len() > 1 {
        let smallest = groups
            .iter()
            .enumerate()
            .filter(|(_, (size, _))| *size < min_size)
            .min_by_key(|(i, (size, _))| (*size, *i))
            .map(|(i, _)| i);

        let Some(idx) = smallest else {
            break;
        };

        let neighbour = if idx == 0 {
            1
        } else if idx == groups.len() - 1 {
            idx - 1
        } else if groups[idx + 1].0 < groups[idx - 1].0 {
            idx + 1
        } else {
            idx - 1
        };

        let (left, right) = if neighbour < idx {
            (neighbour, idx)
        } else {
            (idx, neighbour)
        };
        let (size, members) = groups.remove(right);
        groups[left].0 += size;
        groups[left].1.extend(members);
    }

    let mut plan = vec![0usize; sizes.len()];
    for (group_id, (_, members)) in groups.iter().enumerate() {
        for &member in members {
            plan[member] = group_id;
        }
    }
    plan
}

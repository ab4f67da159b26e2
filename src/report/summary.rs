//! Count of rows per predicted technique, plus a fixed-width text bar chart of it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Sorted by count descending, ties by label ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSummary {
    pub total: usize,
    pub counts: Vec<LabelCount>,
}

impl LabelSummary {
    pub fn from_labels(labels: &[String]) -> Self {
        let mut by_label: HashMap<&str, usize> = HashMap::new();
        for l in labels {
            *by_label.entry(l.as_str()).or_insert(0) += 1;
        }
        let mut counts: Vec<LabelCount> = by_label
            .into_iter()
            .map(|(label, count)| LabelCount {
                label: label.to_string(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        Self {
            total: labels.len(),
            counts,
        }
    }

    pub fn count_of(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// One line per label: padded label, bar scaled so the largest count spans `width`, count.
    pub fn bar_chart(&self, width: usize) -> String {
        let max = self.counts.first().map(|c| c.count).unwrap_or(0);
        let label_w = self.counts.iter().map(|c| c.label.len()).max().unwrap_or(0);
        let mut out = String::new();
        for c in &self.counts {
            let bar = if max == 0 {
                0
            } else {
                ((c.count * width) as f64 / max as f64).round().max(1.0) as usize
            };
            let _ = writeln!(out, "{:<label_w$} | {} {}", c.label, "#".repeat(bar), c.count);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn counts_sorted_by_frequency_then_label() {
        let s = LabelSummary::from_labels(&labels(&["T1110", "T1046", "T1046", "T1498", "T1110", "T1046"]));
        assert_eq!(s.total, 6);
        let order: Vec<_> = s.counts.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(order, vec![("T1046", 3), ("T1110", 2), ("T1498", 1)]);
        assert_eq!(s.count_of("T1110"), 2);
        assert_eq!(s.count_of("T9999"), 0);
    }

    #[test]
    fn chart_scales_to_width() {
        let s = LabelSummary::from_labels(&labels(&["A", "A", "A", "A", "BB"]));
        let chart = s.bar_chart(8);
        let lines: Vec<_> = chart.lines().collect();
        assert_eq!(lines[0], "A  | ######## 4");
        assert_eq!(lines[1], "BB | ## 1");
    }
}

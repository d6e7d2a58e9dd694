//! Term-frequency vectors and cosine similarity.
//!
//! Stands in for embedding similarity: a chunk scores by how many query
//! terms it shares, weighted by frequency and normalized by length.

use std::collections::HashMap;

/// Sparse term-frequency vector
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: HashMap<String, f64>,
    norm: f64,
}

impl TermVector {
    pub fn from_text(text: &str) -> Self {
        let mut weights: HashMap<String, f64> = HashMap::new();
        for term in tokenize(text) {
            *weights.entry(term).or_insert(0.0) += 1.0;
        }
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        Self { weights, norm }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Cosine similarity in `[0, 1]`; 0 when either vector is empty.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };
        let dot: f64 = small
            .weights
            .iter()
            .filter_map(|(term, w)| large.weights.get(term).map(|v| w * v))
            .sum();
        dot / (self.norm * other.norm)
    }
}

/// Lowercased alphanumeric runs. Works for any script with alphanumeric chars.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let terms: Vec<String> = tokenize("Pump-Manual, v2: 적산 전력량!").collect();
        assert_eq!(terms, vec!["pump", "manual", "v2", "적산", "전력량"]);
    }

    #[test]
    fn test_identical_texts() {
        let a = TermVector::from_text("water level report");
        let b = TermVector::from_text("Report: water LEVEL");
        assert!((a.cosine(&b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_texts() {
        let a = TermVector::from_text("water level");
        let b = TermVector::from_text("pump manual");
        assert_eq!(a.cosine(&b), 0.0);
    }

    #[test]
    fn test_partial_overlap_ranks_between() {
        let query = TermVector::from_text("pump pressure");
        let close = TermVector::from_text("pump pressure settings");
        let far = TermVector::from_text("pump maintenance schedule for winter");
        assert!(query.cosine(&close) > query.cosine(&far));
        assert!(query.cosine(&far) > 0.0);
    }

    #[test]
    fn test_empty_vector() {
        let empty = TermVector::from_text("  ,,, ");
        assert!(empty.is_empty());
        assert_eq!(empty.cosine(&TermVector::from_text("anything")), 0.0);
    }
}

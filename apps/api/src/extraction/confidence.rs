//! Confidence markers for the review step.

/// Scores at or above this are trusted; below it the field is flagged for human review.
pub const REVIEW_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    /// Truncated whole percentage, e.g. 0.849 -> 84.
    Low { percent: u32 },
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= REVIEW_THRESHOLD {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Low {
                percent: (score.max(0.0) * 100.0) as u32,
            }
        }
    }

    pub fn label(self) -> String {
        match self {
            ConfidenceLevel::High => "✓ High".to_string(),
            ConfidenceLevel::Low { percent } => format!("⚠ Low ({percent}%)"),
        }
    }

    /// CSS class used by the review form.
    pub fn css_class(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "confidence-high",
            ConfidenceLevel::Low { .. } => "confidence-low",
        }
    }

    pub fn needs_review(self) -> bool {
        matches!(self, ConfidenceLevel::Low { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(ConfidenceLevel::from_score(0.85), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(1.0), ConfidenceLevel::High);
    }

    #[test]
    fn test_low_percentage_is_truncated() {
        assert_eq!(
            ConfidenceLevel::from_score(0.849),
            ConfidenceLevel::Low { percent: 84 }
        );
        assert_eq!(ConfidenceLevel::from_score(0.849).label(), "⚠ Low (84%)");
        assert_eq!(
            ConfidenceLevel::from_score(0.0),
            ConfidenceLevel::Low { percent: 0 }
        );
    }

    #[test]
    fn test_labels_and_classes() {
        let high = ConfidenceLevel::from_score(0.95);
        assert_eq!(high.label(), "✓ High");
        assert_eq!(high.css_class(), "confidence-high");
        assert!(!high.needs_review());

        let low = ConfidenceLevel::from_score(0.6);
        assert_eq!(low.css_class(), "confidence-low");
        assert!(low.needs_review());
    }
}

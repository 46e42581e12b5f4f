use serde::{Deserialize, Serialize};

use crate::shared::constants::{HIGH_SIMILARITY, MEDIUM_SIMILARITY, UNKNOWN_NAME};

/// One face the backend found in an analyzed frame.
///
/// `bbox` is `[x1, y1, x2, y2]` in pixels of the source frame's native
/// resolution; callers map it into widget space themselves. `similarity`
/// is only meaningful when the face matched a registered identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub bbox: [f32; 4],
    pub name: String,
    /// Detector confidence, 0..=1.
    #[serde(default)]
    pub score: f32,
    /// Embedding similarity against the matched identity, 0..=1.
    #[serde(default)]
    pub similarity: f32,
}

/// Coarse similarity band used for the level bar in the faces panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimilarityLevel {
    High,
    Medium,
    Low,
}

impl DetectionResult {
    /// Whether the face matched a registered identity (the backend sends
    /// a sentinel name for everything below its threshold).
    pub fn is_known(&self) -> bool {
        self.name != UNKNOWN_NAME
    }

    /// Caption drawn in the overlay pill: `"Alice  82.0%"` for matches,
    /// the bare sentinel for strangers.
    pub fn label(&self) -> String {
        if self.is_known() {
            format!("{}  {:.1}%", self.name, self.similarity * 100.0)
        } else {
            UNKNOWN_NAME.to_string()
        }
    }

    pub fn similarity_level(&self) -> SimilarityLevel {
        if self.similarity >= HIGH_SIMILARITY {
            SimilarityLevel::High
        } else if self.similarity >= MEDIUM_SIMILARITY {
            SimilarityLevel::Medium
        } else {
            SimilarityLevel::Low
        }
    }

    pub fn width(&self) -> f32 {
        self.bbox[2] - self.bbox[0]
    }

    pub fn height(&self) -> f32 {
        self.bbox[3] - self.bbox[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn result(name: &str, similarity: f32) -> DetectionResult {
        DetectionResult {
            bbox: [10.0, 20.0, 110.0, 170.0],
            name: name.to_string(),
            score: 0.95,
            similarity,
        }
    }

    #[test]
    fn test_known_face_label_has_one_decimal_percent() {
        assert_eq!(result("Alice", 0.82).label(), "Alice  82.0%");
    }

    #[test]
    fn test_unknown_face_label_is_bare_sentinel() {
        let r = result("Unknown", 0.12);
        assert!(!r.is_known());
        assert_eq!(r.label(), "Unknown");
    }

    #[test]
    fn test_label_rounds_similarity() {
        assert_eq!(result("Bob", 0.4567).label(), "Bob  45.7%");
    }

    #[test]
    fn test_dimensions_from_corners() {
        let r = result("Alice", 0.8);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 150.0);
    }

    #[rstest]
    #[case(0.95, SimilarityLevel::High)]
    #[case(0.6, SimilarityLevel::High)]
    #[case(0.59, SimilarityLevel::Medium)]
    #[case(0.4, SimilarityLevel::Medium)]
    #[case(0.39, SimilarityLevel::Low)]
    #[case(0.0, SimilarityLevel::Low)]
    fn test_similarity_bands(#[case] similarity: f32, #[case] expected: SimilarityLevel) {
        assert_eq!(result("Alice", similarity).similarity_level(), expected);
    }

    #[test]
    fn test_deserializes_backend_shape() {
        let json = r#"{"bbox": [120, 80, 260, 240], "name": "Alice", "score": 0.97, "similarity": 0.82}"#;
        let r: DetectionResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.bbox, [120.0, 80.0, 260.0, 240.0]);
        assert_eq!(r.name, "Alice");
        assert!(r.is_known());
    }
}

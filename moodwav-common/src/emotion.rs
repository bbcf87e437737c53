//! Emotion label domain
//!
//! The classifiers are trained on an 8-class emotional speech corpus; their
//! class indices map onto the labels below in this exact order. Reordering
//! breaks every shipped artifact, so the order is part of the wire contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of emotion classes the classifiers are trained on.
pub const EMOTION_CLASSES: usize = 8;

/// Emotion labels in classifier output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Calm,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgusted,
    Surprised,
}

impl Emotion {
    /// All labels in class-index order.
    pub const ALL: [Emotion; EMOTION_CLASSES] = [
        Emotion::Neutral,
        Emotion::Calm,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Surprised,
    ];

    /// Map a classifier class index to its label.
    pub fn from_index(index: usize) -> Option<Emotion> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase wire label, matching the classifier training labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Calm => "calm",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
            Emotion::Surprised => "surprised",
        }
    }

    /// Video suggested for this mood.
    pub fn suggested_video(&self) -> &'static str {
        match self {
            Emotion::Neutral => "https://www.youtube.com/watch?v=kRauhbZqJCY",
            Emotion::Calm => "https://www.youtube.com/watch?v=Zljg2ptExHc",
            Emotion::Happy => "https://www.youtube.com/watch?v=srYPJYgDaj8",
            Emotion::Sad => "https://www.youtube.com/watch?v=EvDQBIisG7c",
            Emotion::Angry => "https://www.youtube.com/watch?v=7D3zpOBRN9c",
            Emotion::Fearful => "https://www.youtube.com/watch?v=fcLl-DZGLZ8",
            Emotion::Disgusted => "https://www.youtube.com/watch?v=UM7ydNEK68w",
            Emotion::Surprised => "https://www.youtube.com/watch?v=JNQU-4YEnm4",
        }
    }

    /// Video served when no usable label exists, e.g. when the primary
    /// model failed.
    pub fn fallback_video() -> &'static str {
        Emotion::Neutral.suggested_video()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order_matches_training_labels() {
        let labels: Vec<&str> = Emotion::ALL.iter().map(|e| e.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "neutral",
                "calm",
                "happy",
                "sad",
                "angry",
                "fearful",
                "disgusted",
                "surprised"
            ]
        );
    }

    #[test]
    fn test_from_index_round_trip() {
        for (index, emotion) in Emotion::ALL.iter().enumerate() {
            assert_eq!(Emotion::from_index(index), Some(*emotion));
        }
        assert_eq!(Emotion::from_index(EMOTION_CLASSES), None);
    }

    #[test]
    fn test_every_label_has_a_video() {
        for emotion in Emotion::ALL {
            let url = emotion.suggested_video();
            assert!(url.starts_with("https://www.youtube.com/watch?v="), "{url}");
        }
    }

    #[test]
    fn test_fallback_is_the_neutral_video() {
        assert_eq!(Emotion::fallback_video(), Emotion::Neutral.suggested_video());
    }

    #[test]
    fn test_happy_video_link() {
        assert_eq!(
            Emotion::Happy.suggested_video(),
            "https://www.youtube.com/watch?v=srYPJYgDaj8"
        );
    }

    #[test]
    fn test_serde_uses_lowercase_labels() {
        let value = serde_json::to_value(Emotion::Fearful).unwrap();
        assert_eq!(value, serde_json::json!("fearful"));
        let parsed: Emotion = serde_json::from_value(serde_json::json!("calm")).unwrap();
        assert_eq!(parsed, Emotion::Calm);
    }

    #[test]
    fn test_display_matches_wire_label() {
        assert_eq!(Emotion::Disgusted.to_string(), "disgusted");
    }
}

use std::fmt;

/// Qualitative performance tier derived from final accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    NeedsImprovement,
    Average,
    Good,
    Excellent,
}

impl Rank {
    /// Classify an accuracy percentage (0..=100) into a rank.
    #[must_use]
    pub fn from_accuracy(accuracy: u8) -> Self {
        match accuracy {
            90..=u8::MAX => Rank::Excellent,
            75..=89 => Rank::Good,
            60..=74 => Rank::Average,
            _ => Rank::NeedsImprovement,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Excellent => "excellent",
            Rank::Good => "good",
            Rank::Average => "average",
            Rank::NeedsImprovement => "needs-improvement",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

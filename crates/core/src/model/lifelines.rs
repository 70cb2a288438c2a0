use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seconds the extra-time lifeline adds to the current question's timer.
pub const EXTRA_TIME_SECS: u32 = 30;

/// A single-use power-up available once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifeline {
    FiftyFifty,
    SkipQuestion,
    DoubleChance,
    ExtraTime,
    Hint,
}

/// Declaration order, used for stable listings of consumed lifelines.
pub const ALL_LIFELINES: [Lifeline; 5] = [
    Lifeline::FiftyFifty,
    Lifeline::SkipQuestion,
    Lifeline::DoubleChance,
    Lifeline::ExtraTime,
    Lifeline::Hint,
];

impl Lifeline {
    /// Wire name, matching the category content and score history format.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "fiftyFifty",
            Lifeline::SkipQuestion => "skipQuestion",
            Lifeline::DoubleChance => "doubleChance",
            Lifeline::ExtraTime => "extraTime",
            Lifeline::Hint => "hint",
        }
    }
}

impl fmt::Display for Lifeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLifelineError(pub String);

impl fmt::Display for ParseLifelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lifeline: {}", self.0)
    }
}

impl std::error::Error for ParseLifelineError {}

impl FromStr for Lifeline {
    type Err = ParseLifelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fiftyFifty" => Ok(Lifeline::FiftyFifty),
            "skipQuestion" => Ok(Lifeline::SkipQuestion),
            "doubleChance" => Ok(Lifeline::DoubleChance),
            "extraTime" => Ok(Lifeline::ExtraTime),
            "hint" => Ok(Lifeline::Hint),
            other => Err(ParseLifelineError(other.to_string())),
        }
    }
}

/// Per-session availability of the five lifelines.
///
/// Flags only ever transition available -> consumed; nothing replenishes
/// within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LifelineSet {
    fifty_fifty: bool,
    skip_question: bool,
    double_chance: bool,
    extra_time: bool,
    hint: bool,
}

impl LifelineSet {
    /// A fresh set with every lifeline still available.
    #[must_use]
    pub fn all_available() -> Self {
        Self {
            fifty_fifty: true,
            skip_question: true,
            double_chance: true,
            extra_time: true,
            hint: true,
        }
    }

    #[must_use]
    pub fn is_available(&self, lifeline: Lifeline) -> bool {
        *self.flag(lifeline)
    }

    /// Consume a lifeline. Returns `false` without changing anything when it
    /// was already spent.
    pub fn consume(&mut self, lifeline: Lifeline) -> bool {
        let flag = self.flag_mut(lifeline);
        if *flag {
            *flag = false;
            true
        } else {
            false
        }
    }

    /// Lifelines consumed so far, in declaration order.
    #[must_use]
    pub fn consumed(&self) -> Vec<Lifeline> {
        ALL_LIFELINES
            .into_iter()
            .filter(|l| !self.is_available(*l))
            .collect()
    }

    fn flag(&self, lifeline: Lifeline) -> &bool {
        match lifeline {
            Lifeline::FiftyFifty => &self.fifty_fifty,
            Lifeline::SkipQuestion => &self.skip_question,
            Lifeline::DoubleChance => &self.double_chance,
            Lifeline::ExtraTime => &self.extra_time,
            Lifeline::Hint => &self.hint,
        }
    }

    fn flag_mut(&mut self, lifeline: Lifeline) -> &mut bool {
        match lifeline {
            Lifeline::FiftyFifty => &mut self.fifty_fifty,
            Lifeline::SkipQuestion => &mut self.skip_question,
            Lifeline::DoubleChance => &mut self.double_chance,
            Lifeline::ExtraTime => &mut self.extra_time,
            Lifeline::Hint => &mut self.hint,
        }
    }
}

impl Default for LifelineSet {
    fn default() -> Self {
        Self::all_available()
    }
}

//! The six scoring dimensions and their valid ranges.

use std::fmt;

/// A named numeric dimension with a fixed, inclusive valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Skill,
    Experience,
    Achievement,
    Communication,
    Education,
    OverallFit,
}

impl Criterion {
    /// Every criterion, in the order they are reported and summed.
    pub const ALL: [Criterion; 6] = [
        Criterion::Skill,
        Criterion::Experience,
        Criterion::Achievement,
        Criterion::Communication,
        Criterion::Education,
        Criterion::OverallFit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Criterion::Skill => "skill",
            Criterion::Experience => "experience",
            Criterion::Achievement => "achievement",
            Criterion::Communication => "communication",
            Criterion::Education => "education",
            Criterion::OverallFit => "overall_fit",
        }
    }

    pub fn min(self) -> f64 {
        0.0
    }

    pub fn max(self) -> f64 {
        match self {
            Criterion::Skill
            | Criterion::Experience
            | Criterion::Achievement
            | Criterion::Communication => 20.0,
            Criterion::Education | Criterion::OverallFit => 10.0,
        }
    }

    /// Human description sent to the oracle alongside the range.
    pub fn description(self) -> &'static str {
        match self {
            Criterion::Skill => "Relevant Technical Skills",
            Criterion::Experience => "Experience in Similar Roles",
            Criterion::Achievement => "Achievements and Impact",
            Criterion::Communication => "Communication & Presentation",
            Criterion::Education => "Educational Background",
            Criterion::OverallFit => "Overall Role Fit",
        }
    }

    pub fn contains(self, value: f64) -> bool {
        (self.min()..=self.max()).contains(&value)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

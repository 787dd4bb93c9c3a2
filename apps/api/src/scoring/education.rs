//! Education Analyzer — highest degree mentioned, for the requirement and for the candidate.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Points lost per ordinal level short of the requirement.
pub const LEVEL_PENALTY: f64 = 25.0;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    #[default]
    None,
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Human-readable name with its article, for recommendation text.
    pub fn display_name(self) -> &'static str {
        match self {
            EducationLevel::None => "no formal degree",
            EducationLevel::HighSchool => "a high school diploma",
            EducationLevel::Associate => "an associate degree",
            EducationLevel::Bachelor => "a bachelor's degree",
            EducationLevel::Master => "a master's degree",
            EducationLevel::Doctorate => "a doctorate",
        }
    }
}

/// Degree names and abbreviations per level, lowercase. Apostrophes are stripped from the
/// text before lookup, so "bachelor's" is matched as "bachelors". Bare "master" is a job
/// title word ("Scrum Master"), so master's degrees need degree context.
const DEGREE_SYNONYMS: &[(EducationLevel, &[&str])] = &[
    (
        EducationLevel::Doctorate,
        &["phd", "ph.d", "ph.d.", "doctorate", "doctoral", "doctor of philosophy", "edd", "dphil"],
    ),
    (
        EducationLevel::Master,
        &[
            "masters degree", "master degree", "masters in", "master of", "masters of",
            "masters program", "msc", "m.sc", "m.s.", "ms degree", "mba", "m.b.a", "meng",
            "m.eng", "ma degree", "postgraduate", "graduate degree",
        ],
    ),
    (
        EducationLevel::Bachelor,
        &[
            "bachelor", "bachelors", "bsc", "b.sc", "b.s.", "bs degree", "ba degree", "b.a.",
            "beng", "b.eng", "btech", "b.tech", "undergraduate degree", "four-year degree",
            "4-year degree",
        ],
    ),
    (
        EducationLevel::Associate,
        &["associate degree", "associates degree", "associate of", "a.a.s", "two-year degree"],
    ),
    (
        EducationLevel::HighSchool,
        &["high school", "secondary school", "ged", "hsc"],
    ),
];

pub struct EducationAnalyzer {
    patterns: Vec<(EducationLevel, Regex)>,
}

impl EducationAnalyzer {
    pub fn new() -> Self {
        let patterns = DEGREE_SYNONYMS
            .iter()
            .map(|(level, names)| {
                let alternatives = names
                    .iter()
                    .map(|n| regex::escape(n))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern = format!(r"(?:^|[^a-z0-9])(?:{alternatives})(?:$|[^a-z0-9])");
                (
                    *level,
                    Regex::new(&pattern).expect("static degree synonym pattern"),
                )
            })
            .collect();
        Self { patterns }
    }

    /// Highest level mentioned anywhere in `text`; `None` level when nothing matches.
    pub fn highest_level(&self, text: &str) -> EducationLevel {
        let lowered = text.to_lowercase().replace(['\'', '’'], "");
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(&lowered))
            .map(|(level, _)| *level)
            .unwrap_or_default()
    }
}

/// 100 when nothing is required or the requirement is met; minus `LEVEL_PENALTY` per level
/// short, floored at 0.
pub fn education_score(required: EducationLevel, attained: EducationLevel) -> f64 {
    if required == EducationLevel::None || attained >= required {
        return 100.0;
    }
    let gap = f64::from(required.rank() - attained.rank());
    (100.0 - LEVEL_PENALTY * gap).max(0.0)
}

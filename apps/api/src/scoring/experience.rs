//! Experience Analyzer — required years from the job description, attained years from the
//! resume, and a linear alignment score.
//!
//! Year mentions are read by a fixed list of named recognizers tried in order; the first
//! recognizer that finds anything wins, and it reports the largest value it saw. Resume date
//! ranges are merged before they are summed so overlapping roles are not double counted.

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
    Entry,
    Mid,
    Senior,
    Principal,
}

impl Seniority {
    /// Canonical minimum years for a seniority tier.
    pub fn canonical_years(self) -> u32 {
        match self {
            Seniority::Entry => 0,
            Seniority::Mid => 3,
            Seniority::Senior => 5,
            Seniority::Principal => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRequirement {
    pub min_years: Option<u32>,
    pub seniority: Option<Seniority>,
}

impl ExperienceRequirement {
    /// Explicit minimum if stated, otherwise the seniority threshold.
    pub fn required_years(&self) -> u32 {
        self.min_years
            .or(self.seniority.map(Seniority::canonical_years))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceAttainment {
    pub years: u32,
    /// Largest explicit "N years" mention.
    pub stated_years: Option<u32>,
    /// Merged length of all parsed date ranges, in months.
    pub range_months: u32,
}

/// A resume date range that could not be turned into a valid interval.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Malformed date range '{text}': {reason}")]
pub struct MalformedDateRange {
    pub text: String,
    pub reason: String,
}

struct Recognizer {
    name: &'static str,
    pattern: &'static str,
}

/// Tried in order, first match wins. Group 1 carries the number of years.
const YEAR_RECOGNIZERS: &[Recognizer] = &[
    Recognizer {
        name: "plus_years",
        pattern: r"\b(\d{1,2})\s*\+\s*(?:years?|yrs?)\b",
    },
    Recognizer {
        name: "minimum_years",
        pattern: r"\b(?:minimum(?:\s+of)?|at\s+least|min\.?)\s+(\d{1,2})\s*(?:years?|yrs?)\b",
    },
    Recognizer {
        name: "range_years",
        pattern: r"\b(\d{1,2})\s*(?:-|–|—|to)\s*\d{1,2}\s*(?:years?|yrs?)\b",
    },
    Recognizer {
        name: "plain_years",
        pattern: r"\b(\d{1,2})\s*(?:years?|yrs?)\b",
    },
];

/// Highest tier first; the first tier mentioned wins.
const SENIORITY_PATTERNS: &[(Seniority, &str)] = &[
    (Seniority::Principal, r"\b(?:principal|staff|architect|expert)\b"),
    (Seniority::Senior, r"\b(?:senior|sr|lead)\b"),
    (Seniority::Mid, r"\b(?:mid[\s-]?level|intermediate)\b"),
    (Seniority::Entry, r"\b(?:entry[\s-]level|junior|jr|graduate|intern(?:ship)?)\b"),
];

const MONTH: &str = r"jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

/// A clause mentioning schooling carries a study period, not work experience. Bare "master"
/// is left out: it is a job title word too.
const EDUCATION_CONTEXT: &str = r"\b(?:university|college|school|institute|academy|degree|bachelor|master(?:['’]?s)?\s+(?:degree|in|of)|mba|msc|m\.sc|bsc|b\.sc|phd|ph\.d|diploma|gpa)\b";

const EARLIEST_YEAR: i32 = 1950;

pub struct ExperienceAnalyzer {
    recognizers: Vec<(&'static str, Regex)>,
    seniority: Vec<(Seniority, Regex)>,
    date_range: Regex,
    education_context: Regex,
}

impl ExperienceAnalyzer {
    pub fn new() -> Self {
        let date_range = format!(
            r"(?x)
            \b(?:(?P<sm>{MONTH})[a-z]*\.?\s+|(?P<smn>\d{{1,2}})/)?(?P<sy>\d{{4}})
            \s*(?:-|–|—|to|until)\s*
            (?:(?P<ongoing>present|current|now|today)
              |(?:(?P<em>{MONTH})[a-z]*\.?\s+|(?P<emn>\d{{1,2}})/)?(?P<ey>\d{{4}}))"
        );

        Self {
            recognizers: YEAR_RECOGNIZERS
                .iter()
                .map(|r| (r.name, Regex::new(r.pattern).expect("static year recognizer")))
                .collect(),
            seniority: SENIORITY_PATTERNS
                .iter()
                .map(|(tier, p)| (*tier, Regex::new(p).expect("static seniority pattern")))
                .collect(),
            date_range: Regex::new(&date_range).expect("static date range pattern"),
            education_context: Regex::new(EDUCATION_CONTEXT)
                .expect("static education context pattern"),
        }
    }

    /// Largest year count found by the first recognizer that matches anything.
    pub fn stated_years(&self, text: &str) -> Option<u32> {
        let lowered = text.to_lowercase();
        self.recognizers.iter().find_map(|(name, re)| {
            let years = re
                .captures_iter(&lowered)
                .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
                .max()?;
            debug!("Year recognizer '{name}' matched: {years} years");
            Some(years)
        })
    }

    pub fn seniority(&self, text: &str) -> Option<Seniority> {
        let lowered = text.to_lowercase();
        self.seniority
            .iter()
            .find(|(_, re)| re.is_match(&lowered))
            .map(|(tier, _)| *tier)
    }

    /// `None` when the job description states neither a year count nor a seniority tier.
    pub fn requirement(&self, job_description: &str) -> Option<ExperienceRequirement> {
        let min_years = self.stated_years(job_description);
        let seniority = self.seniority(job_description);
        if min_years.is_none() && seniority.is_none() {
            return None;
        }
        Some(ExperienceRequirement {
            min_years,
            seniority,
        })
    }

    pub fn attainment(&self, resume_text: &str, today: NaiveDate) -> ExperienceAttainment {
        let stated_years = self.stated_years(resume_text);
        let range_months = merged_months(self.date_ranges(resume_text, today));
        let years = stated_years.unwrap_or(0).max(range_months / 12);
        ExperienceAttainment {
            years,
            stated_years,
            range_months,
        }
    }

    /// Work-history ranges found in the resume. Malformed ranges and ranges whose clause
    /// mentions schooling are skipped.
    pub fn date_ranges(&self, resume_text: &str, today: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
        let lowered = resume_text.to_lowercase();
        let mut ranges = Vec::new();

        for caps in self.date_range.captures_iter(&lowered) {
            let Some(found) = caps.get(0) else { continue };
            let clause = clause_around(&lowered, found.start(), found.end());
            if self.education_context.is_match(clause) {
                debug!("Skipping study period '{}'", found.as_str());
                continue;
            }
            match parse_range(&caps, today) {
                Ok(range) => ranges.push(range),
                Err(e) => debug!("Skipping date range: {e}"),
            }
        }
        ranges
    }
}

/// 100 when nothing (or zero years) is required or the requirement is met; otherwise the
/// attained fraction of the requirement. Overqualification is never penalized.
pub fn experience_score(requirement: Option<&ExperienceRequirement>, attained_years: u32) -> f64 {
    let required = match requirement {
        Some(req) => req.required_years(),
        None => return 100.0,
    };
    if required == 0 || attained_years >= required {
        return 100.0;
    }
    (100.0 * f64::from(attained_years) / f64::from(required)).clamp(0.0, 100.0)
}

/// Clause separators: `,` `;` `|`, line breaks, and a period that ends a sentence. The
/// closing period of a dotted abbreviation ("b.sc.", "ph.d.") does not.
fn is_delimiter(text: &str, at: usize, c: char) -> bool {
    match c {
        ',' | ';' | '|' | '\n' => true,
        '.' => {
            let word = text[..at].rsplit(char::is_whitespace).next().unwrap_or_default();
            text[at + 1..].starts_with(char::is_whitespace) && !word.contains('.')
        }
        _ => false,
    }
}

fn clause_start(text: &str, before: usize) -> usize {
    text[..before]
        .char_indices()
        .rev()
        .find(|&(i, c)| is_delimiter(text, i, c))
        .map_or(0, |(i, _)| i + 1)
}

fn clause_end(text: &str, after: usize) -> usize {
    text[after..]
        .char_indices()
        .find(|&(i, c)| is_delimiter(text, after + i, c))
        .map_or(text.len(), |(i, _)| after + i)
}

/// The clause holding `text[start..end]`. A range that opens its clause ("Acme | 2015 - 2018")
/// belongs with the clause before it.
fn clause_around(text: &str, start: usize, end: usize) -> &str {
    let mut from = clause_start(text, start);
    if from > 0 && !text[from..start].chars().any(char::is_alphabetic) {
        from = clause_start(text, from - 1);
    }
    &text[from..clause_end(text, end)]
}

fn parse_range(caps: &Captures, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), MalformedDateRange> {
    let text = caps.get(0).map(|m| m.as_str()).unwrap_or_default().to_string();
    let malformed = |reason: &str| MalformedDateRange {
        text: text.clone(),
        reason: reason.to_string(),
    };

    let start = date_from(caps, "sm", "smn", "sy", today).map_err(|r| malformed(&r))?;
    let end = if caps.name("ongoing").is_some() {
        today
    } else {
        date_from(caps, "em", "emn", "ey", today).map_err(|r| malformed(&r))?
    };

    if end < start {
        return Err(malformed("end date precedes start date"));
    }
    Ok((start, end))
}

fn date_from(
    caps: &Captures,
    month_name: &str,
    month_number: &str,
    year: &str,
    today: NaiveDate,
) -> Result<NaiveDate, String> {
    let year: i32 = caps
        .name(year)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| "missing year".to_string())?;
    if year < EARLIEST_YEAR || year > today.year() + 1 {
        return Err(format!("year {year} out of range"));
    }

    let month = if let Some(name) = caps.name(month_name) {
        month_from_name(name.as_str()).ok_or_else(|| format!("unknown month '{}'", name.as_str()))?
    } else if let Some(number) = caps.name(month_number) {
        number
            .as_str()
            .parse::<u32>()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| format!("month {} out of range", number.as_str()))?
    } else {
        1
    };

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| "invalid calendar date".to_string())
}

fn month_from_name(name: &str) -> Option<u32> {
    MONTH
        .split('|')
        .position(|m| name.starts_with(m))
        .map(|i| i as u32 + 1)
}

/// Sum of interval lengths after merging overlaps, in whole months.
fn merged_months(mut ranges: Vec<(NaiveDate, NaiveDate)>) -> u32 {
    ranges.sort();
    let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
        .iter()
        .map(|(start, end)| months_between(*start, *end))
        .sum()
}

fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let years = end.year() - start.year();
    let months = end.month() as i32 - start.month() as i32;
    (years * 12 + months).max(0) as u32
}

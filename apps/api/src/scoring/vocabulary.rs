//! Skill vocabulary and synonym table.
//!
//! Both tables are reviewable data: bump `VOCABULARY_VERSION` whenever an entry is added,
//! removed, or remapped so score drift can be traced back to a vocabulary change.
//! Entries are stored in lemma form (lowercase, singular) because they are compared against
//! normalized tokens.

use std::collections::{HashMap, HashSet};

pub const VOCABULARY_VERSION: &str = "2024.2";

/// Curated domain skills, grouped the way recruiters group them.
const SKILL_GROUPS: &[(&str, &[&str])] = &[
    (
        "programming",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "php", "go",
            "rust", "swift", "kotlin", "scala", "perl", "sql", "bash", "html", "css",
        ],
    ),
    (
        "databases",
        &[
            "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "oracle", "sql server",
            "sqlite", "cassandra", "dynamodb", "snowflake",
        ],
    ),
    (
        "frameworks",
        &[
            "django", "flask", "react", "angular", "vue", "spring", "spring boot", "express",
            "fastapi", "node.js", "next.js", "rails", ".net", "graphql", "restful api",
            "rest api", "microservice",
        ],
    ),
    (
        "cloud",
        &[
            "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "jenkins", "ansible",
            "ci/cd", "linux", "serverless", "google cloud",
        ],
    ),
    (
        "data",
        &[
            "pandas", "numpy", "spark", "hadoop", "kafka", "airflow", "big data", "etl",
            "data engineering", "data science", "data analysis",
        ],
    ),
    (
        "ml_ai",
        &[
            "machine learning", "deep learning", "tensorflow", "pytorch", "scikit-learn",
            "nlp", "natural language processing", "computer vision", "keras",
        ],
    ),
    (
        "tools",
        &[
            "git", "jira", "confluence", "slack", "postman", "figma", "tableau", "power bi",
            "excel", "version control",
        ],
    ),
    ("practices", &["agile", "scrum", "unit testing", "devops", "tdd"]),
];

/// Alias → canonical term. Applied to whole keywords and to individual words when building
/// equivalence keys.
const SYNONYMS: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("golang", "go"),
    ("py", "python"),
    ("postgres", "postgresql"),
    ("k8s", "kubernetes"),
    ("nodejs", "node.js"),
    ("node", "node.js"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("vue.js", "vue"),
    ("vuejs", "vue"),
    ("ml", "machine learning"),
    ("dl", "deep learning"),
    ("amazon web services", "aws"),
    ("google cloud platform", "gcp"),
    ("google cloud", "gcp"),
    ("sklearn", "scikit-learn"),
    ("natural language processing", "nlp"),
    ("restful api", "rest api"),
    ("continuous integration", "ci/cd"),
    ("microsoft azure", "azure"),
];

/// Skill vocabulary plus synonym table, built once per engine and shared read-only.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    skills: HashSet<String>,
    synonyms: HashMap<String, String>,
    protected_words: HashSet<String>,
    max_skill_words: usize,
}

impl Vocabulary {
    /// The built-in, versioned vocabulary.
    pub fn builtin() -> Self {
        Self::with_additional_skills(Vec::<String>::new())
    }

    /// Built-in vocabulary extended with caller-provided skills.
    pub fn with_additional_skills<I, S>(additional: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut skills: HashSet<String> = SKILL_GROUPS
            .iter()
            .flat_map(|(_, terms)| terms.iter().map(|t| t.to_string()))
            .collect();
        skills.extend(
            additional
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        );

        let synonyms: HashMap<String, String> = SYNONYMS
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();

        // Words of known terms are never lemmatized ("kubernetes" must not lose its "s").
        let protected_words = skills
            .iter()
            .chain(synonyms.keys())
            .chain(synonyms.values())
            .flat_map(|term| term.split(' ').map(str::to_string).collect::<Vec<_>>())
            .collect();

        let max_skill_words = skills
            .iter()
            .chain(synonyms.keys())
            .map(|term| term.split(' ').count())
            .max()
            .unwrap_or(1);

        Self {
            skills,
            synonyms,
            protected_words,
            max_skill_words,
        }
    }

    /// True when `term` is a recognized skill, either directly or through an alias.
    pub fn is_skill(&self, term: &str) -> bool {
        self.skills.contains(term) || self.synonyms.contains_key(term)
    }

    /// Resolves an alias to its canonical term; unknown terms are returned unchanged.
    pub fn canonical<'a>(&'a self, term: &'a str) -> &'a str {
        self.synonyms.get(term).map(String::as_str).unwrap_or(term)
    }

    pub fn protected_words(&self) -> impl Iterator<Item = &str> {
        self.protected_words.iter().map(String::as_str)
    }

    /// Longest skill or alias, in words. Bounds the vocabulary scan window.
    pub fn max_skill_words(&self) -> usize {
        self.max_skill_words
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }
}

//! Fixed vocabularies and patterns used by the extractor, scorers and rules.

use lazy_static::lazy_static;
use regex::Regex;

/// Curated technical-skill vocabulary, matched as plain substrings of the
/// lowercased job text. No one- or two-letter names.
pub const TECH_SKILLS: &[&str] = &[
    // Languages
    "python",
    "java",
    "javascript",
    "typescript",
    "golang",
    "rust",
    "c++",
    "c#",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "scala",
    "sql",
    "html",
    "css",
    "bash",
    // Frameworks & libraries
    "react",
    "angular",
    "vue",
    "node.js",
    "next.js",
    "express",
    "django",
    "flask",
    "fastapi",
    "spring",
    "rails",
    ".net",
    "graphql",
    "rest",
    "tensorflow",
    "pytorch",
    "pandas",
    "numpy",
    "spark",
    "hadoop",
    // Data stores
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "elasticsearch",
    "kafka",
    "dynamodb",
    "snowflake",
    // Cloud & ops
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "ansible",
    "jenkins",
    "ci/cd",
    "linux",
    "git",
    "microservices",
    "serverless",
    "devops",
    // Practices & domains
    "agile",
    "scrum",
    "machine learning",
    "data analysis",
    "tableau",
    "power bi",
    "excel",
    "figma",
    "api",
    "security",
    "testing",
];

/// Action-verb stems. A bullet "starts with an action verb" when its first
/// word begins with one of these.
pub const ACTION_VERB_STEMS: &[&str] = &[
    "accelerat", "achiev", "administ", "analy", "architect", "automat", "boost", "built",
    "build", "championed", "collaborat", "conceiv", "consolidat", "coordinat", "creat",
    "cut", "decreas", "defin", "deliver", "deploy", "design", "develop", "devis", "direct",
    "drove", "driv", "elevat", "eliminat", "enabl", "engineer", "establish", "exceed",
    "execut", "expand", "facilitat", "founded", "generat", "grew", "grow", "guided",
    "headed", "implement", "improv", "increas", "initiat", "innovat", "instituted",
    "integrat", "introduc", "launch", "led", "lead", "maintain", "manag", "maximi",
    "mentor", "migrat", "minimi", "moderniz", "negotiat", "optimi", "orchestrat",
    "organi", "overhaul", "oversaw", "oversee", "pioneer", "planned", "produc", "programm",
    "ran", "redesign", "reduc", "refactor", "resolv", "restructur", "revamp", "saved",
    "scaled", "secured", "shipped", "simplif", "spearhead", "streamlin", "strengthen",
    "supervis", "supported", "tested", "trained", "transform", "tripled", "doubled",
    "upgrad", "won", "wrote",
];

/// Weak lead-ins stripped from bullets before a strong verb is substituted.
/// Longest phrases first so "helped with" wins over "helped".
pub const WEAK_LEAD_INS: &[&str] = &[
    "was responsible for",
    "responsible for",
    "duties included",
    "in charge of",
    "tasked with",
    "worked on",
    "worked with",
    "worked in",
    "helped with",
    "helped to",
    "helped",
    "assisted with",
    "assisted in",
    "assisted",
    "participated in",
    "involved in",
    "was part of",
    "part of",
    "handled",
    "did",
];

/// Gerunds that commonly follow a weak lead-in, mapped to past-tense verbs.
pub const GERUND_TO_PAST: &[(&str, &str)] = &[
    ("leading", "Led"),
    ("managing", "Managed"),
    ("developing", "Developed"),
    ("building", "Built"),
    ("creating", "Created"),
    ("designing", "Designed"),
    ("maintaining", "Maintained"),
    ("implementing", "Implemented"),
    ("coordinating", "Coordinated"),
    ("supporting", "Supported"),
    ("writing", "Wrote"),
    ("testing", "Tested"),
    ("running", "Ran"),
    ("improving", "Improved"),
    ("analyzing", "Analyzed"),
    ("overseeing", "Oversaw"),
    ("handling", "Managed"),
    ("training", "Trained"),
    ("planning", "Planned"),
    ("deploying", "Deployed"),
];

/// Skill-group labels that count as a technical section.
pub const TECHNICAL_GROUP_HINTS: &[&str] = &["technical", "programming"];

pub const DEFAULT_TECHNICAL_GROUP: &str = "Technical Skills";

/// Groups suggested when a résumé has fewer than three skill groups.
pub const SUPPLEMENTARY_GROUPS: &[(&str, &[&str])] = &[
    (
        "Soft Skills",
        &["Communication", "Leadership", "Problem Solving", "Cross-functional Collaboration"],
    ),
    (
        "Tools & Platforms",
        &["Git", "Jira", "Confluence", "CI/CD"],
    ),
    (
        "Methodologies",
        &["Agile", "Scrum", "Code Review", "Test-Driven Development"],
    ),
];

pub const DEFAULT_TECHNICAL_ITEMS: &[&str] = &["Git", "SQL", "REST APIs"];

/// Title fallback chain: the first group with a hint present in the skills wins.
pub const TITLE_FALLBACKS: &[(&[&str], &str)] = &[
    (
        &["python", "java", "javascript", "typescript", "rust", "c++", "c#", "golang", "ruby", "kotlin", "swift"],
        "Software Engineer",
    ),
    (
        &["react", "vue", "angular", "html", "css", "figma", "tailwind"],
        "Frontend Developer",
    ),
    (
        &["docker", "kubernetes", "aws", "terraform", "azure", "gcp", "jenkins", "ansible"],
        "DevOps Engineer",
    ),
    (
        &["sql", "excel", "tableau", "power bi", "pandas", "statistics", "analytics"],
        "Data Analyst",
    ),
];

pub const FALLBACK_TITLE: &str = "Professional";

/// Titles shorter than this are treated as missing.
pub const MIN_TITLE_LEN: usize = 2;

lazy_static! {
    /// Quantified-outcome patterns: percentages, currency, "N+", multipliers,
    /// counted units, and finally any bare number.
    pub static ref METRIC_PATTERN: Regex = Regex::new(
        r"(?i)(\d+(?:\.\d+)?\s*%|\$\s?\d|\d+\+|\b\d+(?:\.\d+)?x\b|\b\d+\s+(?:users|customers|clients|team|projects|features|products)\b|\d)"
    )
    .unwrap();

    /// Keyword tokenizer: runs of characters outside `[a-z0-9+.#/]` separate tokens.
    pub static ref TOKEN_SEPARATOR: Regex = Regex::new(r"[^a-z0-9+.#/]+").unwrap();

    static ref FIRST_WORD: Regex = Regex::new(r"[A-Za-z][A-Za-z'-]*").unwrap();
}

/// Returns true when the bullet contains a quantifying pattern.
pub fn has_metric(text: &str) -> bool {
    METRIC_PATTERN.is_match(text)
}

/// First alphabetic word of a bullet, lowercased. Leading glyphs such as
/// "•" or "-" are skipped.
pub fn first_word(text: &str) -> Option<String> {
    FIRST_WORD.find(text).map(|m| m.as_str().to_lowercase())
}

/// Returns true when the bullet opens with a recognized action verb.
pub fn starts_with_action_verb(text: &str) -> bool {
    match first_word(text) {
        Some(word) => ACTION_VERB_STEMS.iter().any(|stem| word.starts_with(stem)),
        None => false,
    }
}

/// Substring search that refuses hits glued to a neighbouring letter or digit,
/// so `rust` does not match inside `trust`.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    let bytes = haystack.as_bytes();
    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
        before_ok && after_ok
    })
}

pub fn is_technical_group(label: &str) -> bool {
    let label = label.to_lowercase();
    TECHNICAL_GROUP_HINTS.iter().any(|h| label.contains(h))
}

//! Section Scorers and the Aggregate Scorer.
//!
//! Every scorer is a pure function of the résumé (and, for keyword-aware facets,
//! the keyword set). Empty sections score low instead of failing.

use crate::ats::keywords::KeywordSet;
use crate::ats::vocabulary::{has_metric, starts_with_action_verb};
use crate::models::ats::{Facet, ScoreBreakdown, SectionScore};
use crate::models::resume::{PersonalInfo, ResumeSnapshot};

/// Fixed aggregate weights. Sum to 1.00.
pub const SCORE_WEIGHTS: [(Facet, f64); 7] = [
    (Facet::KeywordMatch, 0.25),
    (Facet::Formatting, 0.15),
    (Facet::Experience, 0.20),
    (Facet::Skills, 0.15),
    (Facet::Education, 0.05),
    (Facet::Summary, 0.10),
    (Facet::Contact, 0.10),
];

/// keyword_match when there is no job text to match against.
pub const GENERAL_MODE_KEYWORD_SCORE: u32 = 50;
/// Education is not modeled; every résumé gets the same value.
pub const EDUCATION_PLACEHOLDER: u32 = 75;

/// Runs all seven scorers.
pub fn score_breakdown(resume: &ResumeSnapshot, keywords: &KeywordSet) -> ScoreBreakdown {
    let corpus = resume.corpus();
    let (_, missing) = keywords.partition(&corpus);

    ScoreBreakdown {
        keyword_match: score_keyword_match(&corpus, keywords),
        formatting: score_formatting(resume),
        experience: score_experience(resume),
        skills: score_skills(resume, &missing),
        education: EDUCATION_PLACEHOLDER,
        summary: score_summary(&resume.summary),
        contact: score_contact(&resume.personal),
    }
}

/// Weighted sum of the breakdown, rounded and clamped to [0, 100].
pub fn aggregate_score(breakdown: &ScoreBreakdown) -> u32 {
    let weighted = SCORE_WEIGHTS
        .iter()
        .fold(0.0_f64, |acc, (facet, weight)| {
            acc + weight * breakdown.get(*facet) as f64
        });
    (weighted.round() as u32).min(100)
}

/// Percentage of keywords present as substrings of the lowercased corpus.
pub fn score_keyword_match(corpus_lower: &str, keywords: &KeywordSet) -> u32 {
    if keywords.is_empty() {
        return GENERAL_MODE_KEYWORD_SCORE;
    }
    let found = keywords
        .iter()
        .filter(|kw| corpus_lower.contains(kw))
        .count();
    percent(found, keywords.len())
}

pub fn score_formatting(resume: &ResumeSnapshot) -> u32 {
    let mut score = 60;

    let avg_bullets = average_bullets_per_role(resume);
    if (3.0..=5.0).contains(&avg_bullets) {
        score += 20;
    } else if avg_bullets >= 2.0 {
        score += 10;
    }
    if !resume.experience.is_empty() {
        score += 10;
    }
    if !resume.skills.is_empty() {
        score += 10;
    }

    score.min(100)
}

pub fn score_experience(resume: &ResumeSnapshot) -> u32 {
    let total = resume.bullet_count();
    let (verb_fraction, metric_fraction) = if total == 0 {
        (0.0, 0.0)
    } else {
        let verbs = resume
            .all_bullets()
            .filter(|b| starts_with_action_verb(b))
            .count();
        let metrics = resume.all_bullets().filter(|b| has_metric(b)).count();
        (verbs as f64 / total as f64, metrics as f64 / total as f64)
    };

    let mut score = 30.0 + 30.0 * verb_fraction + 30.0 * metric_fraction;
    if has_experience_depth(resume) {
        score += 10.0;
    }
    (score.round() as u32).min(100)
}

/// Depth bonus: several roles, or one role described in full.
fn has_experience_depth(resume: &ResumeSnapshot) -> bool {
    resume.experience.len() >= 2 || resume.bullet_count() >= 5
}

pub fn score_skills(resume: &ResumeSnapshot, missing_keywords: &[String]) -> u32 {
    let groups = resume.skills.len();
    let mut score = 50.0;
    if groups >= 2 {
        score += 15.0;
    }
    if groups >= 3 {
        score += 10.0;
    }

    let items = resume.skill_items_lower();
    let coverage = if missing_keywords.is_empty() {
        if items.is_empty() {
            0.0
        } else {
            1.0
        }
    } else {
        let covered = missing_keywords
            .iter()
            .filter(|kw| is_covered_by_skills(kw, &items))
            .count();
        covered as f64 / missing_keywords.len() as f64
    };
    score += 25.0 * coverage;

    (score.round() as u32).min(100)
}

/// A keyword counts as covered when it and some skill item contain one another.
pub fn is_covered_by_skills(keyword: &str, skill_items_lower: &[String]) -> bool {
    let keyword = keyword.to_lowercase();
    skill_items_lower
        .iter()
        .filter(|item| item.len() >= 2)
        .any(|item| keyword.contains(item.as_str()) || item.contains(keyword.as_str()))
}

pub fn score_summary(summary: &str) -> u32 {
    let text = summary.trim();
    if text.is_empty() {
        return 0;
    }

    let len = text.chars().count();
    let mut score = 30;
    if len >= 50 {
        score += 20;
    }
    if len >= 100 {
        score += 20;
    }
    if len >= 150 {
        score += 15;
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        score += 5;
    }
    if text.to_lowercase().contains("year") {
        score += 5;
    }
    if text.split_whitespace().count() >= 20 {
        score += 5;
    }
    score.min(100)
}

pub fn score_contact(personal: &PersonalInfo) -> u32 {
    let present = |s: &str| !s.trim().is_empty();
    let mut score = 0;
    if present(&personal.email) {
        score += 25;
    }
    if present(&personal.phone) {
        score += 25;
    }
    if present(&personal.link) {
        score += 20;
    }
    if present(&personal.location) {
        score += 15;
    }
    if present(&personal.title) {
        score += 15;
    }
    score.min(100)
}

pub fn average_bullets_per_role(resume: &ResumeSnapshot) -> f64 {
    if resume.experience.is_empty() {
        return 0.0;
    }
    resume.bullet_count() as f64 / resume.experience.len() as f64
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round().min(100.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Section feedback
// ────────────────────────────────────────────────────────────────────────────

/// Builds the per-facet {label, score, feedback} rows shown alongside the score.
pub fn section_scores(breakdown: &ScoreBreakdown, general_mode: bool) -> Vec<SectionScore> {
    Facet::ALL
        .iter()
        .map(|&facet| {
            let score = breakdown.get(facet);
            SectionScore {
                facet,
                label: facet.label().to_string(),
                score,
                feedback: section_feedback(facet, score, general_mode),
            }
        })
        .collect()
}

fn section_feedback(facet: Facet, score: u32, general_mode: bool) -> String {
    if facet == Facet::KeywordMatch && general_mode {
        return "No job description provided. Paste one to measure keyword coverage.".to_string();
    }

    let band = if score >= 80 {
        0
    } else if score >= 60 {
        1
    } else {
        2
    };

    let (strong, moderate, weak) = match facet {
        Facet::KeywordMatch => (
            "Your résumé covers most of the job's keywords.",
            "Some job keywords are missing. Work them into your skills and bullets.",
            "Many job keywords are missing. Tailor your résumé to this posting.",
        ),
        Facet::Formatting => (
            "Clean, scannable structure.",
            "Aim for 3–5 bullets per role and a dedicated skills section.",
            "Add experience entries, skill groups and 3–5 bullets per role.",
        ),
        Facet::Experience => (
            "Bullets lead with action verbs and show measurable results.",
            "Start more bullets with action verbs and add numbers.",
            "Rewrite bullets to open with strong verbs and quantify outcomes.",
        ),
        Facet::Skills => (
            "Well-organized skills that match the role.",
            "Group your skills and add the ones this job asks for.",
            "Add skill groups covering the technologies in the job description.",
        ),
        Facet::Summary => (
            "Strong, specific professional summary.",
            "Lengthen your summary and mention years of experience.",
            "Write a 2–3 sentence summary with your title, experience and key skills.",
        ),
        Facet::Contact => (
            "Contact details are complete.",
            "Fill in the missing contact details.",
            "Add email, phone, location, title and a profile link.",
        ),
        Facet::Education => return "Education is scored at a fixed baseline.".to_string(),
    };

    match band {
        0 => strong,
        1 => moderate,
        _ => weak,
    }
    .to_string()
}

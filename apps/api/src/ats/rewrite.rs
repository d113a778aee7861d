//! Text rewrites shared by the improvement generator and the apply engine.
//!
//! Every rewrite is deterministic and idempotent on already-good input, so the
//! apply engine can re-run one against a bullet that changed since generation.

use crate::ats::vocabulary::{
    contains_term, first_word, has_metric, starts_with_action_verb, FALLBACK_TITLE,
    GERUND_TO_PAST, MIN_TITLE_LEN, TITLE_FALLBACKS, WEAK_LEAD_INS,
};
use crate::models::resume::ResumeSnapshot;

const BULLET_GLYPHS: &[char] = &['•', '-', '*', '–', '·', '>'];

/// Strips weak lead-ins ("Responsible for", "Worked on", ...) and opens the
/// bullet with a strong past-tense verb.
pub fn strengthen_bullet(text: &str) -> String {
    let trimmed = strip_glyph(text);
    if trimmed.is_empty() || starts_with_action_verb(trimmed) {
        return trimmed.to_string();
    }

    let rest = strip_weak_lead_in(trimmed);
    if rest.is_empty() {
        return "Delivered key initiatives".to_string();
    }

    if let Some(word) = first_word(rest) {
        let leads_rest = rest
            .get(..word.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&word));
        if let Some((_, past)) = GERUND_TO_PAST.iter().find(|(g, _)| *g == word) {
            if leads_rest {
                return format!("{past}{}", &rest[word.len()..]);
            }
        }
    }

    format!("{} {}", pick_verb(rest), lowercase_first(rest))
}

/// Appends a plausible quantifier chosen from the bullet's content.
pub fn quantify_bullet(text: &str) -> String {
    let trimmed = strip_glyph(text);
    if has_metric(trimmed) {
        return trimmed.to_string();
    }

    let base = trim_terminal_punctuation(trimmed);
    if base.is_empty() {
        return "Improved team efficiency by 25%.".to_string();
    }

    let lower = base.to_lowercase();
    let team_like = ["team", "led ", "lead", "managed", "mentor", "supervis", "coordinat", "staff"];
    let value_like = ["project", "budget", "revenue", "sales", "contract", "client", "deal", "cost"];

    if team_like.iter().any(|w| lower.contains(w)) {
        format!("{base}, supporting a team of 6 people.")
    } else if value_like.iter().any(|w| lower.contains(w)) {
        format!("{base}, contributing to projects valued at $250K+.")
    } else {
        format!("{base}, improving efficiency by 25%.")
    }
}

/// True when `text` is `original` or a rewrite of it: strengthened, quantified,
/// both, or extended by a trailing clause such as a keyword weave.
pub fn derives_from(text: &str, original: &str) -> bool {
    let strengthened = strengthen_bullet(original);
    let quantified = quantify_bullet(original);
    let lineage = [
        quantify_bullet(&strengthened),
        strengthen_bullet(&quantified),
        strengthened,
        quantified,
        original.to_string(),
    ];
    let current = strip_glyph(text);
    lineage.iter().any(|ancestor| {
        let stem = trim_terminal_punctuation(strip_glyph(ancestor));
        !stem.is_empty() && current.starts_with(stem)
    })
}

/// Appends "using {keywords} methodologies." to a bullet.
pub fn weave_keywords(text: &str, keywords: &[String]) -> String {
    if keywords.is_empty() {
        return text.to_string();
    }
    let base = trim_terminal_punctuation(strip_glyph(text));
    let clause = format!("using {} methodologies.", join_with_and(keywords));
    if base.is_empty() {
        return format!("Delivered results {clause}");
    }
    let lower = clause.to_lowercase();
    if base.to_lowercase().contains(lower.trim_end_matches('.')) {
        return format!("{base}.");
    }
    format!("{base} {clause}")
}

/// Builds a fresh summary from the title, role count and highlighted skills.
pub fn synthesize_summary(resume: &ResumeSnapshot, highlights: &[String]) -> String {
    let title = match resume.personal.title.trim() {
        t if t.chars().count() >= MIN_TITLE_LEN => t.to_string(),
        _ => infer_title(resume),
    };

    let experience_phrase = match resume.experience.len() {
        0 => "eager to contribute from day one".to_string(),
        1 => "with hands-on professional experience".to_string(),
        n => format!("with experience across {n} roles"),
    };

    let mut summary = format!(
        "Results-driven {title} {experience_phrase}, delivering measurable impact through \
         ownership, collaboration, and continuous improvement."
    );

    let skills: Vec<String> = if highlights.is_empty() {
        resume
            .skills
            .iter()
            .flat_map(|g| g.items.iter())
            .filter(|s| !s.trim().is_empty())
            .take(3)
            .cloned()
            .collect()
    } else {
        highlights.iter().take(3).cloned().collect()
    };

    if skills.is_empty() {
        summary.push_str(
            " Known for turning requirements into reliable, well-tested solutions and \
             communicating clearly with stakeholders.",
        );
    } else {
        summary.push_str(&format!(
            " Skilled in {}, with a track record of turning requirements into reliable, \
             well-tested solutions.",
            join_with_and(&skills)
        ));
    }
    summary
}

/// Appends a sentence naming the given keywords to an existing summary.
pub fn enhance_summary(summary: &str, keywords: &[String]) -> String {
    if keywords.is_empty() {
        return summary.trim_end().to_string();
    }
    append_sentence(summary, &keyword_sentence(keywords))
}

pub fn keyword_sentence(keywords: &[String]) -> String {
    format!("Experienced with {}.", join_with_and(keywords))
}

/// Appends `sentence` unless the text already contains it.
pub fn append_sentence(text: &str, sentence: &str) -> String {
    let base = text.trim_end();
    if base.is_empty() {
        return sentence.to_string();
    }
    if base.contains(sentence) {
        return base.to_string();
    }
    let separator = if base.ends_with(['.', '!', '?']) { " " } else { ". " };
    format!("{base}{separator}{sentence}")
}

/// Latest role title, else a title inferred from skills, else "Professional".
pub fn infer_title(resume: &ResumeSnapshot) -> String {
    if let Some(latest) = resume.experience.first() {
        let title = latest.title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
    }

    let skills = resume.skill_items_lower().join(" ");
    TITLE_FALLBACKS
        .iter()
        .find(|(hints, _)| hints.iter().any(|h| contains_term(&skills, h)))
        .map(|(_, title)| title.to_string())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// Profile URL guess built from the candidate's name.
pub fn suggest_profile_link(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "linkedin.com/in/your-name".to_string()
    } else {
        format!("linkedin.com/in/{slug}")
    }
}

/// "a", "a and b", "a, b, and c".
pub fn join_with_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

fn strip_glyph(text: &str) -> &str {
    text.trim().trim_start_matches(BULLET_GLYPHS).trim_start()
}

fn trim_terminal_punctuation(text: &str) -> &str {
    text.trim_end_matches(['.', ';', ',', ' '])
}

fn strip_weak_lead_in(text: &str) -> &str {
    for lead in WEAK_LEAD_INS {
        let matches = text
            .get(..lead.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(lead));
        let at_boundary = text
            .get(lead.len()..)
            .and_then(|rest| rest.chars().next())
            .map_or(true, |c| !c.is_alphanumeric());
        if matches && at_boundary {
            return text[lead.len()..].trim_start_matches([' ', ':', ',', '-']);
        }
    }
    text
}

fn pick_verb(rest: &str) -> &'static str {
    let lower = rest.to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if any(&["team", "mentor", "engineers", "staff", "people", "intern"]) {
        "Led"
    } else if any(&[
        "api", "service", "system", "app", "feature", "platform", "tool", "dashboard",
        "pipeline", "website", "code",
    ]) {
        "Developed"
    } else if any(&["process", "workflow", "operation", "onboarding"]) {
        "Streamlined"
    } else if any(&["data", "report", "analysis", "metric"]) {
        "Analyzed"
    } else if any(&["customer", "client", "account"]) {
        "Managed"
    } else {
        "Delivered"
    }
}

/// Lowercases the first letter unless the first word looks like an acronym.
fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a.is_uppercase() && b.is_uppercase() => text.to_string(),
        (Some(a), _) => {
            let mut out: String = a.to_lowercase().collect();
            out.push_str(&text[a.len_utf8()..]);
            out
        }
        _ => String::new(),
    }
}

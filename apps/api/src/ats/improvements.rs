//! Improvement Generator: a fixed rule table over the résumé and its keyword gap.
//!
//! Every rule is independent and total: it inspects the snapshot, and emits zero,
//! one, or one-per-sub-item [`Improvement`]s carrying the exact [`Change`] the
//! apply engine will perform. The list is then ordered by priority, ties broken
//! by impact (highest first).

use rand::Rng;
use tracing::debug;

use crate::ats::rewrite::{
    enhance_summary, infer_title, keyword_sentence, quantify_bullet, strengthen_bullet,
    suggest_profile_link, synthesize_summary, weave_keywords,
};
use crate::ats::scorers::is_covered_by_skills;
use crate::ats::templates::generate_bullets;
use crate::ats::vocabulary::{
    has_metric, is_technical_group, starts_with_action_verb, DEFAULT_TECHNICAL_GROUP,
    DEFAULT_TECHNICAL_ITEMS, MIN_TITLE_LEN, SUPPLEMENTARY_GROUPS,
};
use crate::models::ats::{Change, ContactField, Improvement, Priority};
use crate::models::resume::{ExperienceEntry, ResumeSnapshot};

/// Summaries shorter than this are replaced outright rather than enhanced.
pub const MIN_SUMMARY_LEN: usize = 100;
/// Roles with fewer bullets than this get template bullets.
pub const MIN_BULLETS_PER_ROLE: usize = 3;
const MAX_SKILL_SUGGESTIONS: usize = 5;
const MAX_WOVEN_KEYWORDS: usize = 2;
const SUMMARY_HIGHLIGHTS: usize = 3;
/// formatting/enhance fires when more than this many bullets lack a metric.
const UNQUANTIFIED_BULLET_LIMIT: usize = 3;

const IMPACT_PROFILE_LINK: u32 = 5;
const IMPACT_SUMMARY_REPLACE: u32 = 15;
const IMPACT_SUMMARY_ENHANCE: u32 = 10;
const IMPACT_MISSING_SKILLS: u32 = 12;
const IMPACT_SKILL_GROUPS: u32 = 8;
const IMPACT_ACTION_VERB: u32 = 3;
const IMPACT_QUANTIFY: u32 = 4;
const IMPACT_WEAVE: u32 = 6;
const IMPACT_PER_BULLET: u32 = 5;
const IMPACT_TITLE: u32 = 8;
const IMPACT_TECHNICAL_GROUP: u32 = 6;
const IMPACT_QUANTIFY_ALL: u32 = 10;

/// Runs every rule and returns the ordered improvement list.
///
/// `missing` is the keyword gap (job keywords absent from the résumé corpus), in
/// keyword-set order. It is empty in general mode.
pub fn generate_improvements<R: Rng + ?Sized>(
    resume: &ResumeSnapshot,
    missing: &[String],
    rng: &mut R,
) -> Vec<Improvement> {
    let mut out = Vec::new();

    profile_link(resume, &mut out);
    summary(resume, missing, &mut out);
    missing_skills(resume, missing, &mut out);
    skill_groups(resume, &mut out);
    for entry in &resume.experience {
        bullets(entry, &mut out);
        weave(entry, missing, &mut out);
        fill_thin_entry(entry, rng, &mut out);
    }
    professional_title(resume, &mut out);
    technical_group(resume, &mut out);
    quantify_all(resume, &mut out);

    sort_improvements(&mut out);
    debug!(count = out.len(), "Generated improvements");
    out
}

/// Priority first (critical → low), then impact descending. Stable.
pub fn sort_improvements(improvements: &mut [Improvement]) {
    improvements.sort_by(|a, b| a.priority.cmp(&b.priority).then(b.impact.cmp(&a.impact)));
}

// ────────────────────────────────────────────────────────────────────────────
// Contact
// ────────────────────────────────────────────────────────────────────────────

fn profile_link(resume: &ResumeSnapshot, out: &mut Vec<Improvement>) {
    if !resume.personal.link.trim().is_empty() {
        return;
    }
    let value = suggest_profile_link(&resume.personal.name);
    debug!(rule = "profile_link", "Rule fired");
    out.push(
        Improvement::new(
            Change::SetContactField {
                field: ContactField::Link,
                value: value.clone(),
            },
            Priority::High,
            IMPACT_PROFILE_LINK,
            "Add a professional profile link",
            "Recruiters expect a LinkedIn or portfolio URL in the contact block.",
        )
        .with_values(None, Some(value)),
    );
}

fn professional_title(resume: &ResumeSnapshot, out: &mut Vec<Improvement>) {
    let current = resume.personal.title.trim();
    if current.chars().count() >= MIN_TITLE_LEN {
        return;
    }
    let value = infer_title(resume);
    debug!(rule = "professional_title", title = %value, "Rule fired");
    out.push(
        Improvement::new(
            Change::SetContactField {
                field: ContactField::Title,
                value: value.clone(),
            },
            Priority::High,
            IMPACT_TITLE,
            "Add a professional title",
            "A headline title helps ATS systems match you to the right roles.",
        )
        .with_values(non_empty(current), Some(value)),
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Summary
// ────────────────────────────────────────────────────────────────────────────

fn summary(resume: &ResumeSnapshot, missing: &[String], out: &mut Vec<Improvement>) {
    let current = resume.summary.trim();
    let highlights: Vec<String> = missing.iter().take(SUMMARY_HIGHLIGHTS).cloned().collect();

    if current.chars().count() < MIN_SUMMARY_LEN {
        let text = synthesize_summary(resume, &highlights);
        debug!(rule = "summary_replace", "Rule fired");
        let description = if current.is_empty() {
            "Add a professional summary; it is the first thing recruiters read."
        } else {
            "Your summary is too short. Expand it with your title, experience and key skills."
        };
        out.push(
            Improvement::new(
                Change::ReplaceSummary { text: text.clone() },
                Priority::Critical,
                IMPACT_SUMMARY_REPLACE,
                "Write a stronger professional summary",
                description,
            )
            .with_values(non_empty(current), Some(text)),
        );
    } else if missing.len() > SUMMARY_HIGHLIGHTS {
        let sentence = keyword_sentence(&highlights);
        debug!(rule = "summary_enhance", "Rule fired");
        out.push(
            Improvement::new(
                Change::EnhanceSummary { text: sentence },
                Priority::High,
                IMPACT_SUMMARY_ENHANCE,
                "Mention key job keywords in your summary",
                format!("Work {} into your summary.", highlights.join(", ")),
            )
            .with_values(
                Some(current.to_string()),
                Some(enhance_summary(current, &highlights)),
            ),
        );
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

fn missing_skills(resume: &ResumeSnapshot, missing: &[String], out: &mut Vec<Improvement>) {
    let items = resume.skill_items_lower();
    let uncovered: Vec<String> = missing
        .iter()
        .filter(|kw| !is_covered_by_skills(kw, &items))
        .take(MAX_SKILL_SUGGESTIONS)
        .cloned()
        .collect();
    if uncovered.is_empty() {
        return;
    }

    let group_label = resume
        .skills
        .iter()
        .find(|g| is_technical_group(&g.label))
        .map(|g| g.label.clone())
        .unwrap_or_else(|| DEFAULT_TECHNICAL_GROUP.to_string());

    debug!(rule = "missing_skills", count = uncovered.len(), "Rule fired");
    let suggested = uncovered.join(", ");
    out.push(
        Improvement::new(
            Change::AddSkills {
                group_label,
                items: uncovered,
            },
            Priority::Critical,
            IMPACT_MISSING_SKILLS,
            "Add missing skills from the job description",
            "These job keywords do not appear anywhere in your skills section.",
        )
        .with_values(None, Some(suggested)),
    );
}

fn skill_groups(resume: &ResumeSnapshot, out: &mut Vec<Improvement>) {
    if resume.skills.len() >= 3 {
        return;
    }
    let existing: Vec<String> = resume.skills.iter().map(|g| g.label.to_lowercase()).collect();
    let Some((label, items)) = SUPPLEMENTARY_GROUPS
        .iter()
        .find(|(label, _)| !existing.contains(&label.to_lowercase()))
    else {
        return;
    };

    debug!(rule = "skill_groups", group = label, "Rule fired");
    let items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
    let suggested = format!("{label}: {}", items.join(", "));
    out.push(
        Improvement::new(
            Change::AddSkills {
                group_label: label.to_string(),
                items,
            },
            Priority::Medium,
            IMPACT_SKILL_GROUPS,
            "Organize skills into more groups",
            "Three or more labelled skill groups scan better than a single list.",
        )
        .with_values(None, Some(suggested)),
    );
}

fn technical_group(resume: &ResumeSnapshot, out: &mut Vec<Improvement>) {
    if resume.skills.iter().any(|g| is_technical_group(&g.label)) {
        return;
    }
    debug!(rule = "technical_group", "Rule fired");
    let items: Vec<String> = DEFAULT_TECHNICAL_ITEMS.iter().map(|s| s.to_string()).collect();
    let suggested = format!("{DEFAULT_TECHNICAL_GROUP}: {}", items.join(", "));
    out.push(
        Improvement::new(
            Change::AddSkills {
                group_label: DEFAULT_TECHNICAL_GROUP.to_string(),
                items,
            },
            Priority::Medium,
            IMPACT_TECHNICAL_GROUP,
            "Add a technical skills section",
            "ATS filters often look for a dedicated technical or programming skills group.",
        )
        .with_values(None, Some(suggested)),
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

/// Per-bullet action-verb and quantifier rules.
fn bullets(entry: &ExperienceEntry, out: &mut Vec<Improvement>) {
    for (index, bullet) in entry.bullets.iter().enumerate() {
        if bullet.trim().is_empty() {
            continue;
        }

        if !starts_with_action_verb(bullet) {
            let rewritten = strengthen_bullet(bullet);
            debug!(rule = "action_verb", entry = %entry.id, index, "Rule fired");
            out.push(
                Improvement::new(
                    Change::StrengthenBullet {
                        experience_id: entry.id.clone(),
                        bullet_index: index,
                        original: bullet.clone(),
                        rewritten: rewritten.clone(),
                    },
                    Priority::High,
                    IMPACT_ACTION_VERB,
                    "Start with an action verb",
                    format!("Lead this {} bullet with a strong verb.", role_label(entry)),
                )
                .with_values(Some(bullet.clone()), Some(rewritten)),
            );
        }

        if !has_metric(bullet) {
            let rewritten = quantify_bullet(bullet);
            debug!(rule = "quantify", entry = %entry.id, index, "Rule fired");
            out.push(
                Improvement::new(
                    Change::QuantifyBullet {
                        experience_id: entry.id.clone(),
                        bullet_index: index,
                        original: bullet.clone(),
                        rewritten: rewritten.clone(),
                    },
                    Priority::High,
                    IMPACT_QUANTIFY,
                    "Quantify this achievement",
                    "Numbers such as team size, money or percentages make impact concrete.",
                )
                .with_values(Some(bullet.clone()), Some(rewritten)),
            );
        }
    }
}

fn weave(entry: &ExperienceEntry, missing: &[String], out: &mut Vec<Improvement>) {
    let text = entry.text_lower();
    let keywords: Vec<String> = missing
        .iter()
        .filter(|kw| !text.contains(kw.as_str()))
        .take(MAX_WOVEN_KEYWORDS)
        .cloned()
        .collect();
    if keywords.is_empty() {
        return;
    }

    let current = entry.bullets.first().cloned().unwrap_or_default();
    let suggested = weave_keywords(&current, &keywords);
    debug!(rule = "weave_keywords", entry = %entry.id, "Rule fired");
    out.push(
        Improvement::new(
            Change::WeaveKeywords {
                experience_id: entry.id.clone(),
                keywords: keywords.clone(),
            },
            Priority::High,
            IMPACT_WEAVE,
            "Weave job keywords into this role",
            format!(
                "Mention {} in your {} experience.",
                keywords.join(" and "),
                role_label(entry)
            ),
        )
        .with_values(non_empty(&current), Some(suggested)),
    );
}

fn fill_thin_entry<R: Rng + ?Sized>(
    entry: &ExperienceEntry,
    rng: &mut R,
    out: &mut Vec<Improvement>,
) {
    let have = entry.bullets.iter().filter(|b| !b.trim().is_empty()).count();
    if have >= MIN_BULLETS_PER_ROLE {
        return;
    }
    let needed = MIN_BULLETS_PER_ROLE - have;
    let bullets = generate_bullets(&entry.title, needed, &entry.bullets, rng);
    if bullets.is_empty() {
        return;
    }

    let added = bullets.len() as u32;
    debug!(rule = "add_bullets", entry = %entry.id, needed, added, "Rule fired");
    let suggested = bullets.join("\n");
    out.push(
        Improvement::new(
            Change::AddBullets {
                experience_id: entry.id.clone(),
                bullets,
            },
            Priority::High,
            IMPACT_PER_BULLET * added,
            "Add more bullet points",
            format!(
                "{} has {have} bullet(s). Aim for at least {MIN_BULLETS_PER_ROLE}.",
                role_label(entry)
            ),
        )
        .with_values(None, Some(suggested)),
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Formatting
// ────────────────────────────────────────────────────────────────────────────

fn quantify_all(resume: &ResumeSnapshot, out: &mut Vec<Improvement>) {
    let unquantified = resume
        .all_bullets()
        .filter(|b| !b.trim().is_empty() && !has_metric(b))
        .count();
    if unquantified <= UNQUANTIFIED_BULLET_LIMIT {
        return;
    }
    debug!(rule = "quantify_all", unquantified, "Rule fired");
    out.push(
        Improvement::new(
            Change::QuantifyAll,
            Priority::High,
            IMPACT_QUANTIFY_ALL,
            "Quantify your achievements",
            format!("{unquantified} bullets have no numbers. Add metrics across your experience."),
        )
        .with_values(Some(format!("{unquantified} unquantified bullets")), None),
    );
}

fn role_label(entry: &ExperienceEntry) -> &str {
    match entry.title.trim() {
        "" => "this role",
        title => title,
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

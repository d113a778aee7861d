//! Apply Engine: performs an improvement's [`Change`] on a copy of the résumé and
//! patches the result's score without a full recompute.
//!
//! The patched score is a shadow value: `score + impact`, with the category's
//! facet boosted by `min(15, impact × 2)`. [`crate::ats::analyzer::recompute`]
//! reconciles it.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ats::rewrite::{
    append_sentence, derives_from, quantify_bullet, strengthen_bullet, weave_keywords,
};
use crate::ats::scorers::section_scores;
use crate::ats::vocabulary::has_metric;
use crate::models::ats::{AnalysisMode, AtsResult, Change, ContactField, KeywordReport};
use crate::models::resume::{ExperienceEntry, ResumeSnapshot, SkillGroup};

/// Upper bound on the facet boost a single patch may add.
pub const MAX_FACET_BOOST: u32 = 15;
const MAX_SCORE: u32 = 100;

#[derive(Debug, Error, PartialEq)]
pub enum ApplyError {
    #[error("improvement {0} not found")]
    UnknownImprovement(Uuid),

    #[error("experience entry '{0}' not found")]
    ExperienceNotFound(String),

    #[error("experience entry '{experience_id}' has no bullet at index {index}")]
    BulletNotFound { experience_id: String, index: usize },

    #[error("bullet {index} of experience entry '{experience_id}' no longer matches the suggestion")]
    BulletChanged { experience_id: String, index: usize },
}

/// Reported after each step of [`apply_all_with_progress`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyProgress {
    pub improvement_id: Uuid,
    pub step: usize,
    pub total: usize,
    pub score: u32,
    pub resume: ResumeSnapshot,
    pub result: AtsResult,
}

/// Applies one improvement. Failures (unknown id, stale entry or bullet) are
/// logged and leave both documents unchanged. Applying an already-applied id is a
/// no-op.
pub fn apply_one(
    result: &AtsResult,
    improvement_id: Uuid,
    resume: &ResumeSnapshot,
) -> (ResumeSnapshot, AtsResult) {
    match try_apply(result, improvement_id, resume) {
        Ok(applied) => applied,
        Err(e) => {
            warn!(%improvement_id, "Improvement not applied: {e}");
            (resume.clone(), result.clone())
        }
    }
}

/// Like [`apply_one`], but surfaces the failure.
pub fn try_apply(
    result: &AtsResult,
    improvement_id: Uuid,
    resume: &ResumeSnapshot,
) -> Result<(ResumeSnapshot, AtsResult), ApplyError> {
    let improvement = result
        .improvement(improvement_id)
        .ok_or(ApplyError::UnknownImprovement(improvement_id))?;

    if improvement.applied {
        debug!(%improvement_id, "Improvement already applied");
        return Ok((resume.clone(), result.clone()));
    }

    let mut next_resume = resume.clone();
    apply_change(&mut next_resume, &improvement.change)?;

    let mut next = result.clone();
    let impact = improvement.impact.min(MAX_SCORE);
    let facet = improvement.category.facet();

    // Step 1: mark applied (the entry stays in the list)
    if let Some(slot) = next.improvements.iter_mut().find(|i| i.id == improvement_id) {
        slot.applied = true;
    }

    // Step 2: heuristic score patch
    next.score = next.score.min(MAX_SCORE).saturating_add(impact).min(MAX_SCORE);
    next.breakdown.boost(facet, impact.saturating_mul(2).min(MAX_FACET_BOOST));
    next.section_scores = section_scores(&next.breakdown, next.mode == AnalysisMode::WithoutJd);
    next.patched = true;

    // Step 3: keywords the edit introduced move from missing to found
    reconcile_keywords(&mut next.keywords, &next_resume.corpus());

    info!(
        %improvement_id,
        category = ?improvement.category,
        score = next.score,
        "Applied improvement"
    );
    Ok((next_resume, next))
}

/// Applies every pending improvement in list order, yielding to the runtime
/// between steps.
pub async fn apply_all(result: &AtsResult, resume: &ResumeSnapshot) -> (ResumeSnapshot, AtsResult) {
    apply_all_with_progress(result, resume, |_| {}).await
}

/// Like [`apply_all`], reporting each step. Every [`ApplyProgress`] carries the
/// documents as they stand after that step, so a caller that stops early keeps
/// the improvements applied so far.
pub async fn apply_all_with_progress<F>(
    result: &AtsResult,
    resume: &ResumeSnapshot,
    mut on_progress: F,
) -> (ResumeSnapshot, AtsResult)
where
    F: FnMut(ApplyProgress),
{
    let pending: Vec<Uuid> = result.pending().map(|i| i.id).collect();
    let total = pending.len();

    let mut current_resume = resume.clone();
    let mut current = result.clone();

    for (step, id) in pending.into_iter().enumerate() {
        let (next_resume, next) = apply_one(&current, id, &current_resume);
        current_resume = next_resume;
        current = next;

        on_progress(ApplyProgress {
            improvement_id: id,
            step: step + 1,
            total,
            score: current.score,
            resume: current_resume.clone(),
            result: current.clone(),
        });
        tokio::task::yield_now().await;
    }

    info!(total, score = current.score, "Applied all pending improvements");
    (current_resume, current)
}

// ────────────────────────────────────────────────────────────────────────────
// Change dispatch
// ────────────────────────────────────────────────────────────────────────────

fn apply_change(resume: &mut ResumeSnapshot, change: &Change) -> Result<(), ApplyError> {
    match change {
        Change::SetContactField { field, value } => {
            let slot = match field {
                ContactField::Title => &mut resume.personal.title,
                ContactField::Link => &mut resume.personal.link,
            };
            *slot = value.clone();
        }
        Change::ReplaceSummary { text } => {
            resume.summary = text.clone();
        }
        Change::EnhanceSummary { text } => {
            resume.summary = append_sentence(&resume.summary, text);
        }
        Change::AddSkills { group_label, items } => {
            merge_skills(&mut resume.skills, group_label, items);
        }
        Change::StrengthenBullet {
            experience_id,
            bullet_index,
            original,
            rewritten,
        } => {
            let bullet = bullet_mut(resume, experience_id, *bullet_index)?;
            *bullet = rewrite_bullet(bullet.as_str(), original, rewritten, strengthen_bullet)
                .ok_or_else(|| bullet_changed(experience_id, *bullet_index))?;
        }
        Change::QuantifyBullet {
            experience_id,
            bullet_index,
            original,
            rewritten,
        } => {
            let bullet = bullet_mut(resume, experience_id, *bullet_index)?;
            *bullet = rewrite_bullet(bullet.as_str(), original, rewritten, quantify_bullet)
                .ok_or_else(|| bullet_changed(experience_id, *bullet_index))?;
        }
        Change::WeaveKeywords {
            experience_id,
            keywords,
        } => {
            let entry = entry_mut(resume, experience_id)?;
            match entry.bullets.first_mut() {
                Some(first) => *first = weave_keywords(first, keywords),
                None => entry.bullets.push(weave_keywords("", keywords)),
            }
        }
        Change::AddBullets {
            experience_id,
            bullets,
        } => {
            let entry = entry_mut(resume, experience_id)?;
            for bullet in bullets {
                if !entry.bullets.contains(bullet) {
                    entry.bullets.push(bullet.clone());
                }
            }
        }
        Change::QuantifyAll => {
            for bullet in resume.experience.iter_mut().flat_map(|e| e.bullets.iter_mut()) {
                if !bullet.trim().is_empty() && !has_metric(bullet) {
                    *bullet = quantify_bullet(bullet);
                }
            }
        }
    }
    Ok(())
}

fn entry_mut<'a>(
    resume: &'a mut ResumeSnapshot,
    experience_id: &str,
) -> Result<&'a mut ExperienceEntry, ApplyError> {
    resume
        .experience_by_id_mut(experience_id)
        .ok_or_else(|| ApplyError::ExperienceNotFound(experience_id.to_string()))
}

fn bullet_mut<'a>(
    resume: &'a mut ResumeSnapshot,
    experience_id: &str,
    index: usize,
) -> Result<&'a mut String, ApplyError> {
    entry_mut(resume, experience_id)?
        .bullets
        .get_mut(index)
        .ok_or_else(|| ApplyError::BulletNotFound {
            experience_id: experience_id.to_string(),
            index,
        })
}

/// The stored rewrite when the bullet is untouched, a fresh one when an earlier
/// edit descends from `original`, `None` when the bullet is something else.
fn rewrite_bullet(
    current: &str,
    original: &str,
    rewritten: &str,
    rewrite: fn(&str) -> String,
) -> Option<String> {
    if current == original {
        Some(rewritten.to_string())
    } else if derives_from(current, original) {
        Some(rewrite(current))
    } else {
        None
    }
}

fn bullet_changed(experience_id: &str, index: usize) -> ApplyError {
    ApplyError::BulletChanged {
        experience_id: experience_id.to_string(),
        index,
    }
}

/// Merges items into the group with a matching label (case-insensitive), or
/// appends a new group. Items already present anywhere in that group are skipped.
fn merge_skills(groups: &mut Vec<SkillGroup>, label: &str, items: &[String]) {
    let index = match groups
        .iter()
        .position(|g| g.label.trim().eq_ignore_ascii_case(label.trim()))
    {
        Some(index) => index,
        None => {
            groups.push(SkillGroup {
                label: label.to_string(),
                items: Vec::new(),
            });
            groups.len() - 1
        }
    };

    let group = &mut groups[index];
    for item in items {
        if !group.items.iter().any(|i| i.eq_ignore_ascii_case(item)) {
            group.items.push(item.clone());
        }
    }
}

/// Moves missing keywords that now appear in the corpus over to `found`.
fn reconcile_keywords(report: &mut KeywordReport, corpus_lower: &str) {
    let (now_found, still_missing): (Vec<String>, Vec<String>) = report
        .missing
        .drain(..)
        .partition(|kw| corpus_lower.contains(kw.as_str()));
    report.recommended.retain(|kw| !now_found.contains(kw));
    report.found.extend(now_found);
    report.missing = still_missing;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ats::analyzer::analyze;
    use crate::ats::test_support::{
        arb_resume, entry, resume_with_bullets, rng, sample_resume, BACKEND_JD,
    };
    use crate::models::ats::{Category, Facet, Improvement};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn analyzed(resume: &ResumeSnapshot, job: &str) -> AtsResult {
        let mode = if job.trim().is_empty() {
            AnalysisMode::WithoutJd
        } else {
            AnalysisMode::WithJd
        };
        analyze(resume, job, mode, &mut rng())
    }

    fn first_where(result: &AtsResult, pred: impl Fn(&Improvement) -> bool) -> Uuid {
        result
            .improvements
            .iter()
            .find(|i| pred(*i))
            .map(|i| i.id)
            .expect("matching improvement")
    }

    #[test]
    fn test_apply_link_patches_score_and_facet() {
        let resume = sample_resume();
        let result = analyzed(&resume, "");
        let id = first_where(&result, |i| {
            matches!(i.change, Change::SetContactField { field: ContactField::Link, .. })
        });

        let (next_resume, next) = apply_one(&result, id, &resume);
        assert_eq!(next_resume.personal.link, "linkedin.com/in/jane-q-doe");
        assert_eq!(next.score, (result.score + 5).min(100));
        assert_eq!(next.breakdown.contact, (result.breakdown.contact + 10).min(100));
        assert!(next.improvement(id).unwrap().applied);
        assert!(next.patched);
        // audit trail
        assert_eq!(next.improvements.len(), result.improvements.len());
        // input untouched
        assert_eq!(resume, sample_resume());
    }

    #[test]
    fn test_facet_boost_capped_at_fifteen() {
        let resume = sample_resume();
        let result = analyzed(&resume, "");
        let id = first_where(&result, |i| i.category == Category::Summary);
        let (_, next) = apply_one(&result, id, &resume);
        // impact 15 → boost min(15, 30)
        assert_eq!(next.breakdown.summary, (result.breakdown.summary + 15).min(100));
        let row = next.section_scores.iter().find(|r| r.facet == Facet::Summary).unwrap();
        assert_eq!(row.score, next.breakdown.summary);
    }

    #[test]
    fn test_apply_twice_equals_once() {
        let resume = sample_resume();
        let result = analyzed(&resume, BACKEND_JD);
        for imp in &result.improvements {
            let once = apply_one(&result, imp.id, &resume);
            let twice = apply_one(&once.1, imp.id, &once.0);
            assert_eq!(once, twice, "{:?}", imp.change);
        }
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let resume = sample_resume();
        let result = analyzed(&resume, "");
        let id = Uuid::new_v4();
        assert_eq!(
            try_apply(&result, id, &resume).unwrap_err(),
            ApplyError::UnknownImprovement(id)
        );
        assert_eq!(apply_one(&result, id, &resume), (resume, result));
    }

    #[test]
    fn test_stale_entry_is_noop_and_not_marked() {
        let resume = sample_resume();
        let result = analyzed(&resume, BACKEND_JD);
        let id = first_where(&result, |i| i.change.experience_id() == Some("exp-2"));

        let mut edited = resume.clone();
        edited.experience.retain(|e| e.id != "exp-2");

        assert_eq!(
            try_apply(&result, id, &edited).unwrap_err(),
            ApplyError::ExperienceNotFound("exp-2".to_string())
        );
        let (same_resume, same) = apply_one(&result, id, &edited);
        assert_eq!(same_resume, edited);
        assert!(!same.improvement(id).unwrap().applied);
        assert_eq!(same.score, result.score);
    }

    #[test]
    fn test_stale_bullet_index_is_noop() {
        let resume = sample_resume();
        let result = analyzed(&resume, "");
        let id = first_where(&result, |i| {
            i.change.experience_id() == Some("exp-1") && i.change.bullet_index() == Some(3)
        });

        let mut edited = resume.clone();
        edited.experience[0].bullets.truncate(2);
        assert!(matches!(
            try_apply(&result, id, &edited),
            Err(ApplyError::BulletNotFound { index: 3, .. })
        ));
    }

    #[test]
    fn test_removed_bullet_is_not_replaced_by_its_neighbour() {
        let resume = resume_with_bullets(&[
            "Worked on the payments API 3 times",
            "Helped with onboarding 4 hires",
            "Built 5 things",
        ]);
        let result = analyzed(&resume, "");
        let id = first_where(&result, |i| {
            matches!(i.change, Change::StrengthenBullet { bullet_index: 0, .. })
        });

        let mut edited = resume.clone();
        edited.experience[0].bullets.remove(0);

        assert_eq!(
            try_apply(&result, id, &edited).unwrap_err(),
            ApplyError::BulletChanged {
                experience_id: "e1".to_string(),
                index: 0
            }
        );
        let (same_resume, same) = apply_one(&result, id, &edited);
        assert_eq!(same_resume, edited);
        assert!(!same.improvement(id).unwrap().applied);
        assert_eq!(same.score, result.score);
    }

    #[test]
    fn test_strengthen_after_weave_on_same_bullet() {
        let resume = sample_resume();
        let result = analyzed(&resume, BACKEND_JD);
        let weave = first_where(&result, |i| {
            matches!(&i.change, Change::WeaveKeywords { experience_id, .. } if experience_id == "exp-1")
        });
        let verb = first_where(&result, |i| {
            matches!(&i.change, Change::StrengthenBullet { experience_id, bullet_index: 0, .. } if experience_id == "exp-1")
        });

        let (r1, s1) = apply_one(&result, weave, &resume);
        let (r2, s2) = apply_one(&s1, verb, &r1);
        assert!(s2.improvement(verb).unwrap().applied);
        assert!(r2.experience[0].bullets[0].starts_with("Led a team of 5 engineers using"));
    }

    #[test]
    fn test_oversized_impact_saturates() {
        let resume = sample_resume();
        let mut result = analyzed(&resume, "");
        result.improvements[0].impact = u32::MAX - 10;
        let id = result.improvements[0].id;
        let facet = result.improvements[0].category.facet();

        let (_, next) = apply_one(&result, id, &resume);
        assert_eq!(next.score, 100);
        assert!(next.breakdown.get(facet) >= result.breakdown.get(facet));
        assert!(next.breakdown.get(facet) <= 100);
    }

    #[test]
    fn test_duplicate_bullet_text_edits_only_target() {
        let resume = ResumeSnapshot {
            experience: vec![
                entry("a", "Engineer", &["Worked on the API", "Shipped 3 apps", "Cut 4 bugs"]),
                entry("b", "Engineer", &["Worked on the API", "Shipped 2 apps", "Cut 9 bugs"]),
            ],
            ..Default::default()
        };
        let result = analyzed(&resume, "");
        let id = first_where(&result, |i| {
            matches!(&i.change, Change::StrengthenBullet { experience_id, .. } if experience_id == "b")
        });

        let (next, _) = apply_one(&result, id, &resume);
        assert_eq!(next.experience[0].bullets[0], "Worked on the API");
        assert_eq!(next.experience[1].bullets[0], "Developed the API");
    }

    #[test]
    fn test_bullet_edits_compose() {
        let resume = ResumeSnapshot {
            experience: vec![entry("a", "Engineer", &["Worked on the payments API"])],
            ..Default::default()
        };
        let result = analyzed(&resume, "");
        let verb = first_where(&result, |i| matches!(i.change, Change::StrengthenBullet { .. }));
        let metric = first_where(&result, |i| matches!(i.change, Change::QuantifyBullet { .. }));

        let (r1, s1) = apply_one(&result, verb, &resume);
        let (r2, _) = apply_one(&s1, metric, &r1);
        assert_eq!(
            r2.experience[0].bullets[0],
            "Developed the payments API, improving efficiency by 25%."
        );
    }

    #[test]
    fn test_add_skills_merges_into_existing_group() {
        let mut groups = vec![SkillGroup {
            label: "Technical Skills".into(),
            items: vec!["Rust".into()],
        }];
        merge_skills(
            &mut groups,
            "technical skills",
            &["rust".to_string(), "docker".to_string()],
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items, vec!["Rust".to_string(), "docker".to_string()]);

        merge_skills(&mut groups, "Soft Skills", &["Communication".to_string()]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_woven_keywords_move_to_found() {
        let resume = sample_resume();
        let result = analyzed(&resume, BACKEND_JD);
        let (id, woven) = result
            .improvements
            .iter()
            .find_map(|i| match &i.change {
                Change::WeaveKeywords { keywords, .. } => Some((i.id, keywords.clone())),
                _ => None,
            })
            .unwrap();

        let (_, next) = apply_one(&result, id, &resume);
        for kw in &woven {
            assert!(next.keywords.found.contains(kw));
            assert!(!next.keywords.missing.contains(kw));
            assert!(!next.keywords.recommended.contains(kw));
        }
    }

    #[test]
    fn test_quantify_all_touches_only_unquantified() {
        let resume = sample_resume();
        let result = analyzed(&resume, "");
        let id = first_where(&result, |i| i.change == Change::QuantifyAll);
        let (next, _) = apply_one(&result, id, &resume);
        assert_eq!(
            next.experience[0].bullets[0],
            "Responsible for leading a team of 5 engineers"
        );
        assert!(next.all_bullets().all(has_metric));
    }

    #[tokio::test]
    async fn test_apply_all_marks_everything_and_never_decreases() {
        let resume = sample_resume();
        let result = analyzed(&resume, BACKEND_JD);

        let mut seen = Vec::new();
        let (_, done) = apply_all_with_progress(&result, &resume, |p| seen.push(p)).await;

        assert!(done.improvements.iter().all(|i| i.applied));
        assert!(done.score >= result.score && done.score <= 100);
        assert_eq!(seen.len(), result.improvements.len());
        assert!(seen.windows(2).all(|w| w[0].score <= w[1].score));
        assert_eq!(seen.last().map(|p| p.step), Some(seen.len()));
        // each step carries the documents reached so far
        let last = seen.last().unwrap();
        assert_eq!(last.result, done);
        assert_eq!(last.result.improvements.iter().filter(|i| i.applied).count(), seen.len());
        assert!(!seen[0].result.improvements[1..].iter().any(|i| i.applied));
    }

    #[tokio::test]
    async fn test_apply_all_skips_applied() {
        let resume = sample_resume();
        let result = analyzed(&resume, "");
        let first = result.improvements[0].id;
        let (r1, s1) = apply_one(&result, first, &resume);

        let mut steps = 0;
        let (_, done) = apply_all_with_progress(&s1, &r1, |_| steps += 1).await;
        assert_eq!(steps, result.improvements.len() - 1);
        assert!(done.pending().next().is_none());
    }

    proptest! {
        /// Property: applying any improvement twice is the same as applying it once
        #[test]
        fn apply_is_idempotent(resume in arb_resume(), pick in any::<prop::sample::Index>()) {
            let result = analyzed(&resume, BACKEND_JD);
            prop_assume!(!result.improvements.is_empty());
            let id = result.improvements[pick.index(result.improvements.len())].id;
            let once = apply_one(&result, id, &resume);
            let twice = apply_one(&once.1, id, &once.0);
            prop_assert_eq!(once, twice);
        }

        /// Property: patching never lowers the score and never exceeds 100
        #[test]
        fn apply_all_is_monotone(resume in arb_resume()) {
            let result = analyzed(&resume, BACKEND_JD);
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (_, done) = rt.block_on(apply_all(&result, &resume));
            prop_assert!(done.score >= result.score);
            prop_assert!(done.score <= 100);
        }
    }
}

//! Entry points that run the whole pipeline: extract → score → aggregate → generate.

use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::ats::improvements::generate_improvements;
use crate::ats::keywords::{extract_keywords, KeywordSet};
use crate::ats::scorers::{aggregate_score, score_breakdown, section_scores};
use crate::ats::vocabulary::TECH_SKILLS;
use crate::models::ats::{AnalysisMode, AtsResult, KeywordReport, ScoreBreakdown};
use crate::models::resume::ResumeSnapshot;

/// Scores the résumé from scratch and generates a fresh improvement list.
///
/// `WithJd` with job text that yields no keywords degrades to `WithoutJd`;
/// `WithoutJd` ignores the job text entirely.
pub fn analyze<R: Rng + ?Sized>(
    resume: &ResumeSnapshot,
    job_text: &str,
    mode: AnalysisMode,
    rng: &mut R,
) -> AtsResult {
    let (keywords, mode) = resolve_keywords(job_text, mode);
    let scored = score(resume, &keywords);
    let improvements = generate_improvements(resume, &scored.keywords.missing, rng);

    info!(
        score = scored.score,
        mode = ?mode,
        keywords = keywords.len(),
        improvements = improvements.len(),
        "Analyzed résumé"
    );

    AtsResult {
        score: scored.score,
        breakdown: scored.breakdown,
        keywords: scored.keywords,
        improvements,
        section_scores: section_scores(&scored.breakdown, keywords.is_general_mode()),
        mode,
        analyzed_at: Utc::now(),
        patched: false,
    }
}

/// Replaces the (possibly patched) score, breakdown, keywords and section scores
/// with freshly computed ones. Improvements and their applied flags are kept.
/// Uses the mode the result was analyzed with.
pub fn recompute(result: &AtsResult, resume: &ResumeSnapshot, job_text: &str) -> AtsResult {
    let (keywords, mode) = resolve_keywords(job_text, result.mode);
    let scored = score(resume, &keywords);

    if result.patched {
        info!(
            patched = result.score,
            recomputed = scored.score,
            "Reconciled patched score"
        );
    }

    AtsResult {
        score: scored.score,
        breakdown: scored.breakdown,
        keywords: scored.keywords,
        improvements: result.improvements.clone(),
        section_scores: section_scores(&scored.breakdown, keywords.is_general_mode()),
        mode,
        analyzed_at: Utc::now(),
        patched: false,
    }
}

fn resolve_keywords(job_text: &str, mode: AnalysisMode) -> (KeywordSet, AnalysisMode) {
    if mode == AnalysisMode::WithoutJd {
        return (KeywordSet::default(), AnalysisMode::WithoutJd);
    }
    let keywords = extract_keywords(job_text);
    if keywords.is_general_mode() {
        (keywords, AnalysisMode::WithoutJd)
    } else {
        (keywords, AnalysisMode::WithJd)
    }
}

struct Scored {
    score: u32,
    breakdown: ScoreBreakdown,
    keywords: KeywordReport,
}

fn score(resume: &ResumeSnapshot, keywords: &KeywordSet) -> Scored {
    let breakdown = score_breakdown(resume, keywords);
    let (found, missing) = keywords.partition(&resume.corpus());
    let recommended = missing
        .iter()
        .filter(|kw| TECH_SKILLS.contains(&kw.as_str()))
        .cloned()
        .collect();

    Scored {
        score: aggregate_score(&breakdown),
        breakdown,
        keywords: KeywordReport {
            found,
            missing,
            recommended,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ats::apply::apply_one;
    use crate::ats::test_support::{
        arb_resume, resume_with_bullets, rng, sample_resume, BACKEND_JD,
    };
    use crate::models::ats::{Action, Category, Priority};
    use crate::models::resume::SkillGroup;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_empty_everything() {
        let result = analyze(&ResumeSnapshot::default(), "", AnalysisMode::WithJd, &mut rng());
        assert_eq!(result.mode, AnalysisMode::WithoutJd);
        assert_eq!(result.breakdown.keyword_match, 50);
        assert_eq!(result.breakdown.summary, 0);
        assert!(result.improvements.iter().any(|i| i.category == Category::Summary
            && i.action == Action::Replace
            && i.priority == Priority::Critical
            && i.impact == 15));
        assert!(result.keywords.found.is_empty() && result.keywords.missing.is_empty());
        assert_eq!(result.section_scores.len(), 7);
        assert!(!result.patched);
    }

    #[test]
    fn test_without_jd_ignores_job_text() {
        let result = analyze(&sample_resume(), BACKEND_JD, AnalysisMode::WithoutJd, &mut rng());
        assert_eq!(result.mode, AnalysisMode::WithoutJd);
        assert_eq!(result.breakdown.keyword_match, 50);
        assert!(result.keywords.missing.is_empty());
    }

    #[test]
    fn test_keyword_gap_and_recommendations() {
        let mut resume = ResumeSnapshot::default();
        resume.skills.push(SkillGroup {
            label: "Languages".into(),
            items: vec!["JavaScript".into()],
        });
        let result = analyze(
            &resume,
            "Python Python AWS Docker Docker Docker",
            AnalysisMode::WithJd,
            &mut rng(),
        );
        assert_eq!(result.mode, AnalysisMode::WithJd);
        assert_eq!(result.keywords.missing, vec!["docker", "python", "aws"]);
        assert_eq!(result.keywords.recommended, vec!["docker", "python", "aws"]);
        assert!(result.breakdown.keyword_match < 100);
    }

    #[test]
    fn test_score_is_weighted_breakdown() {
        let result = analyze(&sample_resume(), BACKEND_JD, AnalysisMode::WithJd, &mut rng());
        assert_eq!(result.score, aggregate_score(&result.breakdown));
    }

    #[test]
    fn test_strong_single_role_scores_full_experience() {
        let resume = resume_with_bullets(&[
            "Built a billing platform serving 2M users",
            "Led 4 engineers through a Kafka migration",
            "Built CI pipelines cutting deploys by 60%",
            "Led on-call rotation for 12 services",
            "Built dashboards used by 30 teams",
        ]);
        let result = analyze(&resume, "", AnalysisMode::WithoutJd, &mut rng());
        assert_eq!(result.breakdown.experience, 100);
        assert!(result
            .improvements
            .iter()
            .all(|i| i.change.experience_id() != Some("e1")));
    }

    #[test]
    fn test_recompute_reconciles_patched_score() {
        let resume = sample_resume();
        let result = analyze(&resume, BACKEND_JD, AnalysisMode::WithJd, &mut rng());
        let id = result
            .improvements
            .iter()
            .find(|i| i.category == Category::Summary)
            .map(|i| i.id)
            .unwrap();

        let (next_resume, patched) = apply_one(&result, id, &resume);
        assert!(patched.patched);

        let fresh = recompute(&patched, &next_resume, BACKEND_JD);
        assert!(!fresh.patched);
        assert_eq!(fresh.score, aggregate_score(&fresh.breakdown));
        // improvement list and applied flags survive
        assert_eq!(fresh.improvements, patched.improvements);
        // the shadow value drifts from the real one
        assert_eq!(
            fresh.breakdown.summary,
            crate::ats::scorers::score_summary(&next_resume.summary)
        );
        assert_ne!(fresh.breakdown.summary, patched.breakdown.summary);
    }

    #[test]
    fn test_recompute_keeps_mode() {
        let resume = sample_resume();
        let result = analyze(&resume, "", AnalysisMode::WithoutJd, &mut rng());
        let fresh = recompute(&result, &resume, BACKEND_JD);
        assert_eq!(fresh.mode, AnalysisMode::WithoutJd);
        assert_eq!(fresh.breakdown, result.breakdown);
    }

    proptest! {
        /// Property: the patched score is the capped sum of applied impacts, and
        /// recompute replaces it with the weighted breakdown while keeping every flag
        #[test]
        fn recompute_reconciles_any_applied_subset(
            resume in arb_resume(),
            mask in proptest::collection::vec(any::<bool>(), 0..40),
        ) {
            let result = analyze(&resume, BACKEND_JD, AnalysisMode::WithJd, &mut rng());

            let mut current_resume = resume.clone();
            let mut patched = result.clone();
            let picks = mask.iter().copied().chain(std::iter::repeat(false));
            for (imp, pick) in result.improvements.iter().zip(picks) {
                if pick {
                    let (r, p) = apply_one(&patched, imp.id, &current_resume);
                    current_resume = r;
                    patched = p;
                }
            }

            let applied_impact: u32 = patched
                .improvements
                .iter()
                .filter(|i| i.applied)
                .map(|i| i.impact)
                .sum();
            prop_assert_eq!(patched.score, (result.score + applied_impact).min(100));

            let fresh = recompute(&patched, &current_resume, BACKEND_JD);
            prop_assert!(!fresh.patched);
            prop_assert_eq!(fresh.score, aggregate_score(&fresh.breakdown));
            prop_assert_eq!(fresh.mode, patched.mode);
            prop_assert_eq!(&fresh.improvements, &patched.improvements);
        }
    }
}

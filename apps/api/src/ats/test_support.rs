//! Fixtures and proptest strategies shared by the engine's unit tests.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::models::resume::{ExperienceEntry, PersonalInfo, ResumeSnapshot, SkillGroup};

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

pub fn entry(id: &str, title: &str, bullets: &[&str]) -> ExperienceEntry {
    ExperienceEntry {
        id: id.to_string(),
        title: title.to_string(),
        company: "Acme Corp".to_string(),
        dates: "2021 - Present".to_string(),
        bullets: bullets.iter().map(|b| b.to_string()).collect(),
    }
}

/// One experience entry (id "e1") holding the given bullets.
pub fn resume_with_bullets(bullets: &[&str]) -> ResumeSnapshot {
    ResumeSnapshot {
        experience: vec![entry("e1", "Software Engineer", bullets)],
        ..Default::default()
    }
}

/// A partially filled résumé that triggers most rules.
pub fn sample_resume() -> ResumeSnapshot {
    ResumeSnapshot {
        personal: PersonalInfo {
            name: "Jane Q. Doe".to_string(),
            title: "".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            location: "Austin, TX".to_string(),
            link: "".to_string(),
        },
        summary: "Engineer who likes building things.".to_string(),
        skills: vec![SkillGroup {
            label: "Languages".to_string(),
            items: vec!["JavaScript".to_string(), "SQL".to_string()],
        }],
        experience: vec![
            entry(
                "exp-1",
                "Backend Developer",
                &[
                    "Responsible for leading a team of 5 engineers",
                    "Worked on the payments API",
                    "Built internal dashboards",
                    "Improved the onboarding flow",
                ],
            ),
            entry("exp-2", "Team Lead", &["Managed release process"]),
        ],
    }
}

pub const BACKEND_JD: &str = "Senior Backend Engineer. Python, Docker, Kubernetes, AWS and \
     PostgreSQL required. Build microservices, own CI/CD, mentor engineers. Terraform a plus.";

fn arb_text(max: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[A-Za-z0-9 %$+.,]{{0,{max}}}"))
        .expect("valid regex")
}

fn arb_entry() -> impl Strategy<Value = ExperienceEntry> {
    (
        "[a-z]{1,6}",
        arb_text(30),
        proptest::collection::vec(arb_text(80), 0..7),
    )
        .prop_map(|(id, title, bullets)| ExperienceEntry {
            id,
            title,
            company: "Co".to_string(),
            dates: String::new(),
            bullets,
        })
}

fn arb_skill_group() -> impl Strategy<Value = SkillGroup> {
    (arb_text(20), proptest::collection::vec(arb_text(15), 0..5))
        .prop_map(|(label, items)| SkillGroup { label, items })
}

/// Arbitrary résumés with unique experience ids.
pub fn arb_resume() -> impl Strategy<Value = ResumeSnapshot> {
    (
        arb_text(20),
        arb_text(200),
        proptest::collection::vec(arb_skill_group(), 0..4),
        proptest::collection::vec(arb_entry(), 0..4),
        any::<bool>(),
    )
        .prop_map(|(title, summary, skills, mut experience, with_link)| {
            for (i, e) in experience.iter_mut().enumerate() {
                e.id = format!("{}-{i}", e.id);
            }
            ResumeSnapshot {
                personal: PersonalInfo {
                    title,
                    link: if with_link {
                        "linkedin.com/in/someone".to_string()
                    } else {
                        String::new()
                    },
                    ..Default::default()
                },
                summary,
                skills,
                experience,
            }
        })
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Scores
// ────────────────────────────────────────────────────────────────────────────

/// One scored facet of a résumé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    KeywordMatch,
    Formatting,
    Experience,
    Skills,
    Education,
    Summary,
    Contact,
}

impl Facet {
    pub const ALL: [Facet; 7] = [
        Facet::KeywordMatch,
        Facet::Formatting,
        Facet::Experience,
        Facet::Skills,
        Facet::Education,
        Facet::Summary,
        Facet::Contact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Facet::KeywordMatch => "Keyword Match",
            Facet::Formatting => "Formatting",
            Facet::Experience => "Experience",
            Facet::Skills => "Skills",
            Facet::Education => "Education",
            Facet::Summary => "Summary",
            Facet::Contact => "Contact Information",
        }
    }
}

/// Per-facet sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: u32,
    pub formatting: u32,
    pub experience: u32,
    pub skills: u32,
    pub education: u32,
    pub summary: u32,
    pub contact: u32,
}

impl ScoreBreakdown {
    pub fn get(&self, facet: Facet) -> u32 {
        match facet {
            Facet::KeywordMatch => self.keyword_match,
            Facet::Formatting => self.formatting,
            Facet::Experience => self.experience,
            Facet::Skills => self.skills,
            Facet::Education => self.education,
            Facet::Summary => self.summary,
            Facet::Contact => self.contact,
        }
    }

    fn get_mut(&mut self, facet: Facet) -> &mut u32 {
        match facet {
            Facet::KeywordMatch => &mut self.keyword_match,
            Facet::Formatting => &mut self.formatting,
            Facet::Experience => &mut self.experience,
            Facet::Skills => &mut self.skills,
            Facet::Education => &mut self.education,
            Facet::Summary => &mut self.summary,
            Facet::Contact => &mut self.contact,
        }
    }

    /// Adds `points` to one facet, saturating at 100.
    pub fn boost(&mut self, facet: Facet, points: u32) {
        let slot = self.get_mut(facet);
        *slot = slot.saturating_add(points).min(100);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub facet: Facet,
    pub label: String,
    pub score: u32,
    pub feedback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub found: Vec<String>,
    pub missing: Vec<String>,
    /// Missing keywords that belong in a skills section (vocabulary terms).
    pub recommended: Vec<String>,
}

/// Whether scoring ran against a job description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMode {
    WithJd,
    #[default]
    WithoutJd,
}

// ────────────────────────────────────────────────────────────────────────────
// Improvements
// ────────────────────────────────────────────────────────────────────────────

/// Ordered most to least urgent; the derived `Ord` is the sort rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Contact,
    Summary,
    Skills,
    Experience,
    Keywords,
    Formatting,
    Bullet,
}

impl Category {
    /// The breakdown facet a heuristic patch boosts for this category.
    pub fn facet(self) -> Facet {
        match self {
            Category::Contact => Facet::Contact,
            Category::Summary => Facet::Summary,
            Category::Skills => Facet::Skills,
            Category::Experience | Category::Bullet => Facet::Experience,
            Category::Keywords => Facet::KeywordMatch,
            Category::Formatting => Facet::Formatting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Add,
    Replace,
    Enhance,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Title,
    Link,
}

/// The concrete edit an improvement performs. Each variant carries exactly
/// what its apply rule needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Change {
    SetContactField {
        field: ContactField,
        value: String,
    },
    ReplaceSummary {
        text: String,
    },
    EnhanceSummary {
        text: String,
    },
    AddSkills {
        group_label: String,
        items: Vec<String>,
    },
    StrengthenBullet {
        experience_id: String,
        bullet_index: usize,
        original: String,
        rewritten: String,
    },
    QuantifyBullet {
        experience_id: String,
        bullet_index: usize,
        original: String,
        rewritten: String,
    },
    WeaveKeywords {
        experience_id: String,
        keywords: Vec<String>,
    },
    AddBullets {
        experience_id: String,
        bullets: Vec<String>,
    },
    /// Adds a quantifier to every bullet that still lacks one.
    QuantifyAll,
}

impl Change {
    pub fn category(&self) -> Category {
        match self {
            Change::SetContactField { .. } => Category::Contact,
            Change::ReplaceSummary { .. } | Change::EnhanceSummary { .. } => Category::Summary,
            Change::AddSkills { .. } => Category::Skills,
            Change::StrengthenBullet { .. } | Change::QuantifyBullet { .. } => {
                Category::Experience
            }
            Change::WeaveKeywords { .. } => Category::Keywords,
            Change::AddBullets { .. } => Category::Bullet,
            Change::QuantifyAll => Category::Formatting,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Change::SetContactField { .. } | Change::AddSkills { .. } | Change::AddBullets { .. } => {
                Action::Add
            }
            Change::ReplaceSummary { .. } | Change::StrengthenBullet { .. } => Action::Replace,
            Change::EnhanceSummary { .. }
            | Change::QuantifyBullet { .. }
            | Change::WeaveKeywords { .. }
            | Change::QuantifyAll => Action::Enhance,
        }
    }

    pub fn experience_id(&self) -> Option<&str> {
        match self {
            Change::StrengthenBullet { experience_id, .. }
            | Change::QuantifyBullet { experience_id, .. }
            | Change::WeaveKeywords { experience_id, .. }
            | Change::AddBullets { experience_id, .. } => Some(experience_id),
            _ => None,
        }
    }

    pub fn bullet_index(&self) -> Option<usize> {
        match self {
            Change::StrengthenBullet { bullet_index, .. }
            | Change::QuantifyBullet { bullet_index, .. } => Some(*bullet_index),
            _ => None,
        }
    }
}

/// A suggested, auto-appliable résumé edit.
///
/// Lifecycle is `applied: false → true`, never back. Applied improvements stay
/// in the list as an audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub id: Uuid,
    pub category: Category,
    pub action: Action,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub current_value: Option<String>,
    pub suggested_value: Option<String>,
    /// Heuristic score points; always > 0.
    pub impact: u32,
    pub applied: bool,
    pub change: Change,
}

impl Improvement {
    pub fn new(
        change: Change,
        priority: Priority,
        impact: u32,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: change.category(),
            action: change.action(),
            priority,
            title: title.into(),
            description: description.into(),
            current_value: None,
            suggested_value: None,
            impact: impact.max(1),
            applied: false,
            change,
        }
    }

    pub fn with_values(mut self, current: Option<String>, suggested: Option<String>) -> Self {
        self.current_value = current;
        self.suggested_value = suggested;
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsResult {
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub keywords: KeywordReport,
    pub improvements: Vec<Improvement>,
    pub section_scores: Vec<SectionScore>,
    pub mode: AnalysisMode,
    pub analyzed_at: DateTime<Utc>,
    /// True while `score`/`breakdown` carry heuristic apply patches that no
    /// recompute has reconciled yet.
    #[serde(default)]
    pub patched: bool,
}

impl AtsResult {
    pub fn improvement(&self, id: Uuid) -> Option<&Improvement> {
        self.improvements.iter().find(|i| i.id == id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Improvement> {
        self.improvements.iter().filter(|i| !i.applied)
    }
}

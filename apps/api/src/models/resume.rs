use serde::{Deserialize, Serialize};

/// Personal / contact block of a résumé. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    /// Professional profile URL (LinkedIn or similar).
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub label: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub id: String,
    pub title: String,
    pub company: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

/// The résumé document the engine reads. Owned by the caller; applying an
/// improvement produces a new snapshot and leaves the input untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeSnapshot {
    pub personal: PersonalInfo,
    pub summary: String,
    pub skills: Vec<SkillGroup>,
    /// Newest role first.
    pub experience: Vec<ExperienceEntry>,
}

impl ResumeSnapshot {
    pub fn experience_by_id(&self, id: &str) -> Option<&ExperienceEntry> {
        self.experience.iter().find(|e| e.id == id)
    }

    pub fn experience_by_id_mut(&mut self, id: &str) -> Option<&mut ExperienceEntry> {
        self.experience.iter_mut().find(|e| e.id == id)
    }

    /// All bullets across every experience entry, in document order.
    pub fn all_bullets(&self) -> impl Iterator<Item = &str> {
        self.experience
            .iter()
            .flat_map(|e| e.bullets.iter().map(String::as_str))
    }

    pub fn bullet_count(&self) -> usize {
        self.experience.iter().map(|e| e.bullets.len()).sum()
    }

    /// Lowercased text corpus used for keyword coverage:
    /// summary, skill items, then experience title/company/bullets.
    pub fn corpus(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        parts.push(&self.summary);
        for group in &self.skills {
            parts.extend(group.items.iter().map(String::as_str));
        }
        for entry in &self.experience {
            parts.push(&entry.title);
            parts.push(&entry.company);
            parts.extend(entry.bullets.iter().map(String::as_str));
        }
        parts.join(" ").to_lowercase()
    }

    /// Lowercased skill items across all groups.
    pub fn skill_items_lower(&self) -> Vec<String> {
        self.skills
            .iter()
            .flat_map(|g| g.items.iter())
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl ExperienceEntry {
    /// Lowercased text of this entry only.
    pub fn text_lower(&self) -> String {
        let mut text = format!("{} {}", self.title, self.company);
        for bullet in &self.bullets {
            text.push(' ');
            text.push_str(bullet);
        }
        text.to_lowercase()
    }
}

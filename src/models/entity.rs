//! Lookup subjects: groups, auditoriums and teachers.

use serde::{Deserialize, Serialize};

use super::time::HourMarker;

/// Process-local identifier of a directory entity, assigned on first
/// persistence and stable for the record's lifetime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub i64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(v: i64) -> Self {
        EntityId(v)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Which kind of lookup subject a record or operation concerns.
///
/// The three variants share one shape and one set of operations; the variant
/// only selects importer routing, the display-token prefix and the label
/// shown in formatted responses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Group,
    Auditorium,
    Teacher,
}

impl Variant {
    /// All variants, in the order combined search results are presented.
    pub const ALL: [Variant; 3] = [Variant::Group, Variant::Auditorium, Variant::Teacher];

    /// Prefix of the reference token for this variant (`/group_42`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Variant::Group => "/group_",
            Variant::Auditorium => "/auditorium_",
            Variant::Teacher => "/teacher_",
        }
    }

    /// Emoji used in formatted responses for this variant.
    pub fn emoji(&self) -> &'static str {
        match self {
            Variant::Group => "\u{1F465}",      // 👥
            Variant::Auditorium => "\u{1F6AA}", // 🚪
            Variant::Teacher => "\u{1F454}",    // 👔
        }
    }

    /// Human-readable singular label.
    pub fn label(&self) -> &'static str {
        match self {
            Variant::Group => "Group",
            Variant::Auditorium => "Auditorium",
            Variant::Teacher => "Teacher",
        }
    }

    /// Section heading used when rendering directory search hits.
    pub fn plural_label(&self) -> &'static str {
        match self {
            Variant::Group => "Groups",
            Variant::Auditorium => "Auditoriums",
            Variant::Teacher => "Teachers",
        }
    }

    /// Compose the reference token for an external id (`/teacher_55`).
    pub fn token(&self, external_id: i64) -> String {
        format!("{}{}", self.prefix(), external_id)
    }

    /// Decode a reference token back into a variant and external id.
    ///
    /// Returns `None` for unknown prefixes or a non-numeric id suffix.
    pub fn parse_token(token: &str) -> Option<(Variant, i64)> {
        for variant in Variant::ALL {
            if let Some(rest) = token.strip_prefix(variant.prefix()) {
                return rest.parse().ok().map(|id| (variant, id));
            }
        }
        None
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One directory row per lookup subject.
///
/// `search_key` is derived state: always the Unicode-lowercased form of
/// `display_name`, recomputed whenever the name changes. `last_refreshed_at`
/// is the staleness clock — an opaque hour token, `None` until the first
/// completed refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub variant: Variant,
    /// Identifier from the remote source; unique within a variant and used
    /// as the lookup key in all external-facing commands.
    pub external_id: i64,
    pub display_name: String,
    pub search_key: String,
    pub last_refreshed_at: Option<HourMarker>,
}

impl Entity {
    /// Case-fold a display name into its search key.
    pub fn search_key_for(display_name: &str) -> String {
        display_name.to_lowercase()
    }

    /// Reference token for this entity (`/group_42`).
    pub fn token(&self) -> String {
        self.variant.token(self.external_id)
    }
}

//! Response formatting.
//!
//! Pure functions turning query results into the text block shown to the
//! user, and directory search hits into selectable suggestions. Same input
//! always produces the same output, so the expected texts are pinned by
//! golden tests below.

use crate::models::{Entity, ScheduleRecord, Variant};
use crate::services::coordinator::DirectoryHits;

/// Sentinel text for an empty result.
pub const NOT_FOUND_MESSAGE: &str = "Nothing found for your request, try another one";

const TWO_LINES: &str = "\n\n";

/// A directory hit rendered as a selectable suggestion.
///
/// `token` is the caller-composable reference (`/group_42`) the outer
/// command layer turns into a follow-up lookup command or an inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
    pub token: String,
}

/// Render an entity's schedule as a text block.
///
/// Records must already be in display order (the coordinator returns them
/// that way). Output groups records under one heading per date, one line per
/// record, and closes with the entity's variant emoji and name. Empty input
/// produces [`NOT_FOUND_MESSAGE`].
pub fn format_schedule(entity: &Entity, records: &[ScheduleRecord]) -> String {
    if records.is_empty() {
        return NOT_FOUND_MESSAGE.to_string();
    }

    let mut out = String::new();
    let mut current_date = None;
    for record in records {
        if current_date != Some(record.date) {
            if current_date.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("\u{1F4C5} {}\n", record.date.format("%d.%m.%Y")));
            current_date = Some(record.date);
        }
        out.push_str(&format_record_line(record));
        out.push('\n');
    }

    out.push_str(&format!(
        "\n{} {} - {}",
        entity.variant.emoji(),
        entity.variant.label(),
        entity.display_name
    ));
    out
}

/// One line of schedule text: pair label plus the descriptive fields the
/// importer passed through.
fn format_record_line(record: &ScheduleRecord) -> String {
    let mut line = format!("\u{1F552} {} — {}", record.pair_name, record.details.subject);
    if let Some(kind) = &record.details.kind {
        line.push_str(&format!(" ({})", kind));
    }
    if let Some(auditorium) = &record.details.auditorium {
        line.push_str(&format!(", {}", auditorium));
    }
    if let Some(teacher) = &record.details.teacher {
        line.push_str(&format!(", {}", teacher));
    }
    if let Some(groups) = &record.details.groups {
        line.push_str(&format!(", {}", groups));
    }
    line
}

/// Turn directory hits into selectable suggestions, one per entity.
pub fn directory_suggestions(entities: &[Entity]) -> Vec<Suggestion> {
    entities
        .iter()
        .map(|e| Suggestion {
            title: e.display_name.clone(),
            token: e.token(),
        })
        .collect()
}

/// Render combined directory hits as a text block with one section per
/// variant, each hit as `name - token`.
///
/// Empty hits produce [`NOT_FOUND_MESSAGE`].
pub fn format_directory_hits(hits: &DirectoryHits) -> String {
    if hits.is_empty() {
        return NOT_FOUND_MESSAGE.to_string();
    }

    let mut out = String::new();
    for (variant, entities) in [
        (Variant::Group, &hits.groups),
        (Variant::Auditorium, &hits.auditoriums),
        (Variant::Teacher, &hits.teachers),
    ] {
        if entities.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(TWO_LINES);
        }
        out.push_str(&format!("{} {}:\n", variant.emoji(), variant.plural_label()));
        for entity in entities {
            out.push_str(&format!("{} - {}\n", entity.display_name, entity.token()));
        }
        // Section lists end without a trailing blank line.
        out.pop();
    }
    out
}

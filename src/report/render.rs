//! report::render
//!
//! Deterministic markdown rendering of normalized project records.
//!
//! # Design
//!
//! Per category the renderer:
//!
//! 1. Sorts a copy of the records by star count descending. The sort is
//!    stable: two projects with equal stars keep their pre-sort (input)
//!    relative order. That is a correctness property, not an implementation
//!    detail; output must be reproducible across runs.
//! 2. Emits a two-column table header carrying the escaped category title.
//! 3. Partitions the records into rows of two; a final odd record occupies
//!    the first cell of its row with the second cell left empty.
//! 4. Composes each cell from an optional icon tag, a bold hyperlink on the
//!    display title, a parenthetical with star count and the conditional
//!    language/license fields plus a 4-digit year, and the description on a
//!    new line within the cell.
//!
//! Every free-text field is HTML-escaped before embedding; the output is
//! markdown inside an HTML-rendering context and unescaped forge content
//! must never reach it.

use super::aggregate::OutputCategory;
use super::ReportError;
use crate::forge::RepoRecord;

/// Escape HTML-special characters for embedding in the output.
///
/// Escapes `& ' < > "` to their entities. The apostrophe and quote use
/// numeric entities so the result is safe in both attribute and text
/// positions.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    out
}

/// Compute the display title for a project.
///
/// When the full title splits into exactly two slash-separated segments and
/// the first equals `current_user`, the repo name alone is shown; otherwise
/// the full `owner/repo` pair is kept.
///
/// # Example
///
/// ```
/// use forgefolio::report::display_title;
///
/// assert_eq!(display_title("pojntfx/example", "pojntfx"), "example");
/// assert_eq!(display_title("alice/example", "pojntfx"), "alice/example");
/// ```
pub fn display_title(full_title: &str, current_user: &str) -> String {
    let parts: Vec<&str> = full_title.split('/').collect();
    if parts.len() == 2 && parts[0] == current_user {
        parts[1].to_string()
    } else {
        full_title.to_string()
    }
}

/// Render the categories as a markdown fragment.
///
/// Deterministic: identical input yields byte-identical output. Sorting
/// operates on a copy of each category's records, so re-rendering the same
/// aggregate is safe.
///
/// # Errors
///
/// Returns `ReportError::MalformedDate` if a record's activity timestamp is
/// not valid RFC 3339.
pub fn render(categories: &[OutputCategory], current_user: &str) -> Result<String, ReportError> {
    let mut output = String::new();

    for category in categories {
        let mut projects = category.projects.clone();
        // Stable sort: ties keep input order
        projects.sort_by(|a, b| b.stars.cmp(&a.stars));

        output.push_str(&format!(
            "\n| **{}** | |\n| - | - |\n",
            escape_html(&category.title)
        ));

        for row in projects.chunks(2) {
            let mut line = String::from("| ");
            for project in row {
                line.push_str(&render_cell(project, current_user)?);
                line.push_str(" | ");
            }
            output.push_str(&line);
            output.push('\n');
        }
    }

    Ok(output)
}

/// Render one project cell's inline markdown.
fn render_cell(project: &RepoRecord, current_user: &str) -> Result<String, ReportError> {
    let date = chrono::DateTime::parse_from_rfc3339(&project.last_activity).map_err(|source| {
        ReportError::MalformedDate {
            value: project.last_activity.clone(),
            title: project.full_title.clone(),
            source,
        }
    })?;
    let year = date.format("%Y").to_string();

    let icon_markdown = if !project.icon_url.is_empty() {
        format!(
            "<img alt=\"Icon\" src=\"{}\" height=\"24\" align=\"top\"> ",
            escape_html(&project.icon_url)
        )
    } else {
        String::new()
    };

    let mut displayed = display_title(&project.full_title, current_user);
    if !project.forge_emoji.is_empty() {
        displayed = format!("{}/{}", project.forge_emoji, displayed);
    }

    let language_part = if !project.language.is_empty() {
        format!(", {}", escape_html(&project.language))
    } else {
        String::new()
    };

    let license_part = if !project.license.is_empty() {
        format!(", {}", escape_html(&project.license))
    } else {
        String::new()
    };

    Ok(format!(
        "<a display=\"inline\" target=\"_blank\" href=\"{}\"><b>{}{}</b></a> (⭐ {}{}{}, {}) <br>{}",
        escape_html(&project.url),
        icon_markdown,
        escape_html(&displayed),
        project.stars,
        language_part,
        license_part,
        year,
        escape_html(&project.description),
    ))
}

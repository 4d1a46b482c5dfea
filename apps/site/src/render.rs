//! Plain-text rendering of catalog and contact views for the terminal.

use catalog::{CatalogPresenter, CatalogStats, ProjectCard, ProjectDetail};
use contact_core::FormSnapshot;
use shared::domain::FormField;

pub fn project_list(presenter: &CatalogPresenter) -> String {
    let cards = presenter.visible_cards();
    let layout = presenter.layout();
    let mut out = format!(
        "{} project(s) | filter: {} | view: {} ({:?}, {} column(s) on large screens)\n",
        cards.len(),
        presenter.filter(),
        presenter.view_mode(),
        layout.arrangement,
        layout.columns.lg,
    );
    if cards.is_empty() {
        out.push_str("No projects match this filter.\n");
    }
    for card in cards {
        out.push('\n');
        out.push_str(&project_card(&card));
    }
    out
}

pub fn project_card(card: &ProjectCard<'_>) -> String {
    let project = card.project;
    let marker = if project.is_featured() { " [featured]" } else { "" };
    format!(
        "{}{marker}\n  {}\n  {}\n  tech: {}\n  live: {}\n  code: {}\n",
        project.title,
        card.display_date,
        project.description,
        project.tech.join(", "),
        project.live_url,
        project.code_url,
    )
}

pub fn project_detail(detail: &ProjectDetail<'_>) -> String {
    let project = detail.project;
    let mut out = format!("{}\n", project.title);
    if project.is_featured() {
        out.push_str("Featured project\n");
    }
    out.push_str(&format!(
        "{}\n\n{}\n\nTechnologies: {}\n",
        detail.display_date,
        project.description,
        project.tech.join(", "),
    ));
    if !detail.details.is_empty() {
        out.push_str("\nKey features:\n");
        for line in detail.details {
            out.push_str(&format!("  - {line}\n"));
        }
    }
    out.push_str(&format!(
        "\nLive: {}\nCode: {}\n",
        project.live_url, project.code_url
    ));
    out
}

pub fn stats(stats: &CatalogStats) -> String {
    format!(
        "Total projects: {}\nFeatured: {}\nTechnologies: {}\n",
        stats.total, stats.featured, stats.technologies
    )
}

pub fn form_errors(snapshot: &FormSnapshot) -> String {
    FormField::ALL
        .iter()
        .copied()
        .filter_map(|field| {
            let message = snapshot.errors.get(field);
            (!message.is_empty()).then(|| format!("{field}: {message}\n"))
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;

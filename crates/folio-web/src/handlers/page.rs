//! Publications page: server-rendered list with type filter links.

use axum::{
    extract::{Query, State},
    response::Html,
};

use folio_ingestion::{filter_by_type, Publication, TypeFilter};

use super::publications::ListQuery;
use crate::selection::{LoadStatus, Snapshot};
use crate::state::SharedState;

const FILTERS: &[(TypeFilter, &str)] = &[
    (TypeFilter::All,        "All Publications"),
    (TypeFilter::Journal,    "Journal Papers"),
    (TypeFilter::Conference, "Conference Papers"),
    (TypeFilter::Review,     "Review Papers"),
];

pub async fn publications_page(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Html<String> {
    let snap = state.selection.snapshot().await;
    Html(render_page(&snap, query.filter))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

fn render_item(p: &Publication) -> String {
    let year = if p.year > 0 { p.year.to_string() } else { String::new() };
    let citations = p.citations
        .map(|c| format!(r#" <span class="citations">{c} citations</span>"#))
        .unwrap_or_default();
    format!(r#"
    <article class="publication {kind}">
        <h3>{title}</h3>
        <p class="authors">{authors}</p>
        <p class="venue">{venue} <span class="year">{year}</span>{citations}</p>
        <a href="{url}" target="_blank" rel="noopener noreferrer">View Publication</a>
    </article>"#,
        kind = p.kind,
        title = escape(&p.title),
        authors = escape(&p.authors),
        venue = escape(&p.venue),
        url = escape(&p.url),
    )
}

fn render_status(status: &LoadStatus) -> String {
    match status {
        LoadStatus::Idle    => r#"<p class="status">No source selected yet.</p>"#.to_string(),
        LoadStatus::Loading => r#"<p class="status loading">Loading publications…</p>"#.to_string(),
        LoadStatus::Ready   => String::new(),
        LoadStatus::Failed { message } => {
            format!(r#"<p class="status error">Could not load publications: {}</p>"#, escape(message))
        }
    }
}

fn render_page(snap: &Snapshot, filter: TypeFilter) -> String {
    let buttons: String = FILTERS
        .iter()
        .map(|(f, label)| {
            let active = if *f == filter { " active" } else { "" };
            format!(r#"<a class="filter{active}" href="/?type={}">{label}</a>"#, f.as_str())
        })
        .collect();

    let shown = filter_by_type(&snap.publications, filter);
    let items: String = if shown.is_empty() && snap.status == LoadStatus::Ready {
        r#"<p class="empty">No publications in this category.</p>"#.to_string()
    } else {
        shown.iter().map(render_item).collect()
    };

    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Publications</title>
</head>
<body>
<main class="container">
    <h1>Publications</h1>
    <nav class="filters">{buttons}</nav>
    {status}
    <section class="publications">{items}</section>
</main>
</body>
</html>"#,
        status = render_status(&snap.status),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_ingestion::PublicationType;

    fn snapshot_with(pubs: Vec<Publication>) -> Snapshot {
        Snapshot {
            generation: 1,
            status: LoadStatus::Ready,
            publications: pubs,
            ..Snapshot::default()
        }
    }

    fn publication(title: &str, kind: PublicationType) -> Publication {
        Publication {
            id: title.to_string(),
            title: title.to_string(),
            authors: "T. Taha".to_string(),
            venue: "Venue".to_string(),
            year: 2021,
            url: "https://doi.org/10.1/x".to_string(),
            citations: Some(3),
            kind,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_filter_hides_other_types() {
        let snap = snapshot_with(vec![
            publication("Journal Paper", PublicationType::Journal),
            publication("Conference Paper", PublicationType::Conference),
        ]);
        let html = render_page(&snap, TypeFilter::Journal);
        assert!(html.contains("<h3>Journal Paper</h3>"));
        assert!(!html.contains("<h3>Conference Paper</h3>"));
        assert!(html.contains(r#"class="filter active" href="/?type=journal""#));
    }

    #[test]
    fn test_titles_are_escaped() {
        let snap = snapshot_with(vec![publication("<script>x</script>", PublicationType::Other)]);
        let html = render_page(&snap, TypeFilter::All);
        assert!(!html.contains("<script>"));
        assert!(html.contains("3 citations"));
    }

    #[test]
    fn test_failed_status_shown() {
        let snap = Snapshot {
            status: LoadStatus::Failed { message: "upstream returned HTTP 503".into() },
            ..Snapshot::default()
        };
        assert!(render_page(&snap, TypeFilter::All).contains("Could not load publications"));
    }
}

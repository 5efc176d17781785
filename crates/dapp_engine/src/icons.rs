use dapp_core::IconInfo;
use scraper::{Html, Selector};
use url::Url;

/// Finds the best `<link rel=...icon>` in a landing page.
///
/// - `icon` / `shortcut icon` first
/// - then `apple-touch-icon` variants
/// - then any other `*-icon` rel (`mask-icon`, `fluid-icon`, ...)
///
/// Ties go to document order. Hrefs resolve against `<base href>` when
/// present, otherwise against `page_url`.
pub fn find_icon_link(html: &str, page_url: &Url) -> Option<IconInfo> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse("link[rel][href]").ok()?;
    let base_sel = Selector::parse("base[href]").ok()?;

    let base = document
        .select(&base_sel)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone());

    let mut best: Option<(u8, IconInfo)> = None;
    for link in document.select(&link_sel) {
        let element = link.value();
        let (Some(rel), Some(href)) = (element.attr("rel"), element.attr("href")) else {
            continue;
        };
        let Some(rank) = rel_rank(rel) else {
            continue;
        };
        if best.as_ref().is_some_and(|(best_rank, _)| *best_rank <= rank) {
            continue;
        }
        let Some(resolved) = resolve_href(href, &base) else {
            continue;
        };
        best = Some((
            rank,
            IconInfo {
                href: resolved.into(),
                rel: rel.trim().to_string(),
                sizes: non_empty(element.attr("sizes")),
                mime: non_empty(element.attr("type")),
            },
        ));
    }
    best.map(|(_, icon)| icon)
}

/// `/favicon.ico` on the origin.
pub fn default_favicon_url(origin: &Url) -> Option<Url> {
    origin.join("/favicon.ico").ok()
}

fn rel_rank(rel: &str) -> Option<u8> {
    let rel = rel.to_ascii_lowercase();
    let tokens: Vec<&str> = rel.split_ascii_whitespace().collect();
    if tokens.contains(&"icon") {
        Some(0)
    } else if tokens.iter().any(|t| t.starts_with("apple-touch-icon")) {
        Some(1)
    } else if tokens.iter().any(|t| t.ends_with("-icon")) {
        Some(2)
    } else {
        None
    }
}

fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let trimmed = href.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let url = base.join(trimmed).ok()?;
    matches!(url.scheme(), "http" | "https" | "data").then_some(url)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

//! Link extractor
//!
//! Given a rendered document, produces the set of in-scope outbound links,
//! classified as followable, external, or already seen. Newly followable
//! links are enqueued into the session's frontier as they are found, so two
//! anchors resolving to the same canonical URL enqueue it only once.

use crate::report::LinkAudit;
use crate::session::CrawlSession;
use crate::url::{canonicalize_in_scope, has_ignored_extension, ProxySetup};
use scraper::{Html, Selector};
use url::Url;

/// Audits the anchors of a rendered page
///
/// # Scope rules
///
/// A candidate is in scope when its host matches either the original URL's
/// host or the proxied URL's host (the proxy rewrite changes the apparent
/// host while the content is logically on the original one). In-scope
/// candidates are folded back onto the original origin with the synthetic
/// `host` parameter stripped.
///
/// # Counting rules
///
/// - Anchors with an empty or unparseable href are skipped entirely.
/// - Every resolvable anchor counts toward `nb_links`, including
///   fragment-only targets (which resolve to the current page and count as
///   already processed) and non-navigational schemes such as `mailto:` or
///   `javascript:` (which have no matching host and count as external).
/// - In-scope links ending in an ignored extension count nowhere else.
/// - A link equal to the current page, already visited, or already queued
///   counts as already processed and is never re-enqueued.
/// - Remaining in-scope links are enqueued and collected as links to follow.
/// - Foreign-host links count as external and are dropped.
pub fn extract_links(
    html: &str,
    current_url: &str,
    setup: &ProxySetup,
    session: &mut CrawlSession,
) -> LinkAudit {
    let document = Html::parse_document(html);
    let mut audit = LinkAudit::default();

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return audit,
    };

    let original_host = host_with_port(&setup.remote_url);
    let proxy_host = host_with_port(&setup.proxy_url);

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(href) => href,
            None => continue,
        };

        // Relative targets resolve against the proxied URL, exactly as they
        // would inside the rendered page.
        let resolved = match resolve_href(href, &setup.proxy_url) {
            Some(url) => url,
            None => continue,
        };

        audit.nb_links += 1;

        // mailto:, tel:, javascript: and the like resolve with no host, so
        // they match neither origin and land in the external bucket.
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            audit.nb_links_external_host += 1;
            continue;
        }

        let candidate_host = host_with_port(&resolved);
        if candidate_host != original_host && candidate_host != proxy_host {
            audit.nb_links_external_host += 1;
            continue;
        }

        if has_ignored_extension(resolved.path()) {
            // Non-page resource: counted among the page's links, nothing more
            continue;
        }

        let found = match canonicalize_in_scope(&resolved, &setup.remote_origin) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("Dropping uncanonicalizable link {}: {}", resolved, e);
                continue;
            }
        };

        if found == current_url || !session.enqueue(found.clone()) {
            audit.nb_links_already_processed += 1;
        } else {
            audit.links_to_follow.push(found);
        }
    }

    audit
}

/// Host plus explicit port when present, the unit the scope check compares
fn host_with_port(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Resolves an anchor href to an absolute URL, or None for an empty or
/// unparseable target
fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    base.join(href).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::proxy_setup;

    fn setup_for(url: &str) -> ProxySetup {
        let url = Url::parse(url).unwrap();
        proxy_setup(&url, "https://proxy.local").unwrap()
    }

    fn run_extract(html: &str, current: &str) -> (LinkAudit, CrawlSession) {
        let setup = setup_for(current);
        let mut session = CrawlSession::new();
        let audit = extract_links(html, current, &setup, &mut session);
        (audit, session)
    }

    #[test]
    fn test_seed_page_scenario() {
        // Self link, one followable, one external, one ignored extension
        let html = r#"<html><body>
            <a href="/a">self</a>
            <a href="/b">next</a>
            <a href="https://other.com/x">elsewhere</a>
            <a href="/img.png">image</a>
        </body></html>"#;

        let (audit, mut session) = run_extract(html, "https://example.com/a");

        assert_eq!(audit.nb_links, 4);
        assert_eq!(audit.nb_links_already_processed, 1);
        assert_eq!(audit.nb_links_external_host, 1);
        assert_eq!(audit.nb_links_to_follow(), 1);
        assert_eq!(audit.links_to_follow, vec!["https://example.com/b"]);

        assert_eq!(session.dequeue().as_deref(), Some("https://example.com/b"));
        assert_eq!(session.dequeue(), None);
    }

    #[test]
    fn test_duplicate_anchors_enqueue_once() {
        let html = r#"<html><body>
            <a href="/b">one</a>
            <a href="/b?">again</a>
        </body></html>"#;

        let (audit, mut session) = run_extract(html, "https://example.com/a");

        assert_eq!(audit.nb_links, 2);
        assert_eq!(audit.nb_links_to_follow(), 1);
        assert_eq!(audit.nb_links_already_processed, 1);
        assert_eq!(session.dequeue().as_deref(), Some("https://example.com/b"));
        assert_eq!(session.dequeue(), None);
    }

    #[test]
    fn test_visited_links_count_as_already_processed() {
        let html = r#"<html><body><a href="/done">done</a></body></html>"#;
        let setup = setup_for("https://example.com/a");
        let mut session = CrawlSession::new();
        session.record(crate::report::CrawlRow::failure(
            "https://example.com/done".to_string(),
            crate::report::PageStatus::Success,
        ));

        let audit = extract_links(html, "https://example.com/a", &setup, &mut session);

        assert_eq!(audit.nb_links_already_processed, 1);
        assert!(audit.links_to_follow.is_empty());
    }

    #[test]
    fn test_proxy_host_anchors_fold_onto_original_origin() {
        // An absolute link to the proxy host, carrying the synthetic host
        // parameter, is in scope and canonicalizes onto the original origin.
        let html = r#"<html><body>
            <a href="https://proxy.local/deep?host=https%3A%2F%2Fexample.com&page=2">deep</a>
        </body></html>"#;

        let (audit, _session) = run_extract(html, "https://example.com/a");

        assert_eq!(
            audit.links_to_follow,
            vec!["https://example.com/deep?page=2"]
        );
    }

    #[test]
    fn test_fragment_and_scheme_anchors_counted() {
        // Fragment-only targets resolve to the current page; mailto: and
        // javascript: targets have no host and match neither origin.
        let html = r##"<html><body>
            <a href="#top">fragment</a>
            <a href="mailto:a@b.c">mail</a>
            <a href="javascript:void(0)">js</a>
            <a href="/b">real</a>
        </body></html>"##;

        let (audit, mut session) = run_extract(html, "https://example.com/a");

        assert_eq!(audit.nb_links, 4);
        assert_eq!(audit.nb_links_already_processed, 1);
        assert_eq!(audit.nb_links_external_host, 2);
        assert_eq!(audit.links_to_follow, vec!["https://example.com/b"]);
        assert_eq!(session.dequeue().as_deref(), Some("https://example.com/b"));
        assert_eq!(session.dequeue(), None);
    }

    #[test]
    fn test_empty_hrefs_not_counted() {
        let html = r#"<html><body>
            <a href="">empty</a>
            <a href="   ">blank</a>
            <a name="anchor-without-href">no href</a>
            <a href="/real">real</a>
        </body></html>"#;

        let (audit, _session) = run_extract(html, "https://example.com/a");

        assert_eq!(audit.nb_links, 1);
        assert_eq!(audit.links_to_follow, vec!["https://example.com/real"]);
    }

    #[test]
    fn test_ignored_extensions_only_count_as_links() {
        let html = r#"<html><body>
            <a href="/doc.pdf">pdf</a>
            <a href="/style.css">css</a>
        </body></html>"#;

        let (audit, mut session) = run_extract(html, "https://example.com/a");

        assert_eq!(audit.nb_links, 2);
        assert_eq!(audit.nb_links_already_processed, 0);
        assert_eq!(audit.nb_links_external_host, 0);
        assert_eq!(audit.nb_links_to_follow(), 0);
        assert_eq!(session.dequeue(), None);
    }

    #[test]
    fn test_external_hosts_dropped() {
        let html = r#"<html><body>
            <a href="https://elsewhere.org/">out</a>
            <a href="http://example.com:8080/">different port</a>
        </body></html>"#;

        let (audit, _session) = run_extract(html, "https://example.com/a");

        assert_eq!(audit.nb_links_external_host, 2);
        assert!(audit.links_to_follow.is_empty());
    }
}

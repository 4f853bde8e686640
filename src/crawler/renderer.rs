//! Page renderer
//!
//! Loads exactly one target URL at a time into an isolated rendering
//! surface. A fresh `RenderSurface` is attached for every target and torn
//! down (detached) before the next one, so no state leaks between pages.
//!
//! Loading never fails eagerly: `attach` always yields a surface, and only
//! inspecting the surface's document surfaces an access failure. The
//! controller catches that and hands the target to the failure classifier.

use crate::config::CrawlConfig;
use crate::url::ProxySetup;
use reqwest::{redirect::Policy, Client};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// The rendered document could not be introspected
#[derive(Debug, Clone)]
pub struct AccessDenied {
    pub reason: String,
}

impl std::fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "document access denied: {}", self.reason)
    }
}

#[derive(Debug)]
enum SurfaceState {
    /// Page loaded; document body is available for introspection
    Loaded { body: String },
    /// Page did not load into an introspectable document
    Denied { reason: String },
}

/// One target's isolated rendering surface
///
/// Holds the loaded document (or the denial) for a single page. Consumed by
/// `detach` once the controller has recorded the target, guaranteeing the
/// next target starts from a fresh surface.
#[derive(Debug)]
pub struct RenderSurface {
    original_url: Url,
    proxied_url: Url,
    state: SurfaceState,
}

impl RenderSurface {
    /// The target URL as requested
    pub fn original_url(&self) -> &Url {
        &self.original_url
    }

    /// The proxy-rewritten URL actually loaded
    pub fn proxied_url(&self) -> &Url {
        &self.proxied_url
    }

    /// Inspects the rendered document
    ///
    /// This is the point where a failed load becomes observable.
    pub fn document(&self) -> Result<&str, AccessDenied> {
        match &self.state {
            SurfaceState::Loaded { body } => Ok(body),
            SurfaceState::Denied { reason } => Err(AccessDenied {
                reason: reason.clone(),
            }),
        }
    }

    /// Tears the surface down, releasing it before the next attach
    pub fn detach(self) {}
}

/// Renderer that attaches one fresh surface per target
pub struct PageRenderer {
    client: Client,
    enable_page_scripts: bool,
    settle_delay_ms: u64,
    render_timeout_ms: u64,
}

impl PageRenderer {
    /// Builds the renderer's HTTP client
    ///
    /// Redirects are not followed here: a redirected render is an access
    /// failure worth classifying, exactly like an error status.
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("site-scout/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.render_timeout_ms))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::none())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            enable_page_scripts: config.enable_page_scripts,
            settle_delay_ms: config.settle_delay_ms,
            render_timeout_ms: config.render_timeout_ms,
        })
    }

    /// Attaches a fresh surface and loads the target's proxied URL into it
    ///
    /// Waits the configured settle delay after the load completes before the
    /// surface is handed back, giving embedded content a chance to settle.
    /// Never returns an error; failures are stored in the surface and appear
    /// when the document is inspected.
    pub async fn attach(&self, setup: &ProxySetup) -> RenderSurface {
        tracing::info!("Loading surface with page {}", setup.remote_url);

        let state = match tokio::time::timeout(
            Duration::from_millis(self.render_timeout_ms),
            self.load(setup),
        )
        .await
        {
            Ok(state) => state,
            Err(_) => SurfaceState::Denied {
                reason: format!("render timed out after {} ms", self.render_timeout_ms),
            },
        };

        // Settle delay after the load signal, before introspection
        if self.settle_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settle_delay_ms)).await;
        }

        RenderSurface {
            original_url: setup.remote_url.clone(),
            proxied_url: setup.proxy_url.clone(),
            state,
        }
    }

    async fn load(&self, setup: &ProxySetup) -> SurfaceState {
        let response = match self.client.get(setup.proxy_url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                return SurfaceState::Denied {
                    reason: e.to_string(),
                }
            }
        };

        let status = response.status();
        if status.is_redirection() {
            return SurfaceState::Denied {
                reason: format!("redirected with HTTP {}", status.as_u16()),
            };
        }
        if !status.is_success() {
            return SurfaceState::Denied {
                reason: format!("HTTP {}", status.as_u16()),
            };
        }

        match response.text().await {
            Ok(body) => {
                let body = if self.enable_page_scripts {
                    body
                } else {
                    strip_scripts(&body)
                };
                SurfaceState::Loaded { body }
            }
            Err(e) => SurfaceState::Denied {
                reason: e.to_string(),
            },
        }
    }
}

/// Removes script elements from a document
///
/// The sandboxed (default) surface exposes documents with their scripts
/// stripped, the maximal-isolation counterpart of loading a page with
/// script execution disabled.
fn strip_scripts(body: &str) -> String {
    let mut document = Html::parse_document(body);

    if let Ok(selector) = Selector::parse("script") {
        let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    document.root_element().html()
}

//! Renderer backed by a running Chromium instance over the DevTools protocol.
//!
//! The browser is not launched here; `browser_ws` must point at the DevTools
//! websocket of an already running instance.

use super::{PdfRenderer, PrintRequest};
use crate::error::RenderError;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Browser;
use futures::StreamExt;
use tokio::runtime::Runtime;
use tracing::debug;

pub struct ChromiumRenderer {
    browser_ws: String,
    runtime: Runtime,
}

impl ChromiumRenderer {
    pub fn new(browser_ws: impl Into<String>) -> Result<Self, RenderError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;
        Ok(Self {
            browser_ws: browser_ws.into(),
            runtime,
        })
    }

    async fn render_async(&self, request: &PrintRequest) -> Result<Vec<u8>, RenderError> {
        let (browser, mut handler) = Browser::connect(&self.browser_ws)
            .await
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;
        let events = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let navigation = |e: chromiumoxide::error::CdpError| RenderError::Navigation {
            url: request.url.clone(),
            message: e.to_string(),
        };
        let page = browser.new_page(request.url.as_str()).await.map_err(navigation)?;
        page.wait_for_navigation().await.map_err(navigation)?;
        debug!(book = %request.book_id, url = %request.url, "Page loaded");

        let options = &request.options;
        let params = PrintToPdfParams {
            landscape: Some(options.landscape),
            display_header_footer: Some(options.display_header_footer),
            print_background: Some(options.print_background),
            paper_width: Some(options.paper_width),
            paper_height: Some(options.paper_height),
            margin_top: Some(options.margin.top),
            margin_bottom: Some(options.margin.bottom),
            margin_left: Some(options.margin.left),
            margin_right: Some(options.margin.right),
            header_template: Some(options.header_template.clone()),
            footer_template: Some(options.footer_template.clone()),
            ..Default::default()
        };
        let bytes = page
            .pdf(params)
            .await
            .map_err(|e| RenderError::Print(e.to_string()));

        // The browser is shared; only the page is ours to close.
        if let Err(e) = page.close().await {
            debug!(url = %request.url, error = %e, "Failed to close print page");
        }
        drop(browser);
        events.abort();
        bytes
    }
}

impl PdfRenderer for ChromiumRenderer {
    fn render(&self, request: &PrintRequest) -> Result<Vec<u8>, RenderError> {
        self.runtime.block_on(self.render_async(request))
    }
}

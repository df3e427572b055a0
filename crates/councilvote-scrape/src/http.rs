//! `MeetingPage` driver over plain HTTP: pages are fetched with `reqwest`
//! and queried with `scraper`. Popups are fetched as an extra frame.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use councilvote_core::url::absolutize;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::page::{ActionControl, Anchor, MeetingPage, SessionFactory, TableCell, TableRow};
use crate::PageError;

const ACTION_DETAILS: &str = "action details";

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").expect("valid selector"));
static RADOPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"radopen\(\s*['"]([^'"]+)['"]"#).expect("valid regex"));

/// One worker's page: the loaded document plus at most one open popup.
pub struct HttpPage {
    client: reqwest::Client,
    site_base: String,
    document: Option<String>,
    popup: Option<String>,
}

impl HttpPage {
    pub fn new(client: reqwest::Client, site_base: &str) -> Self {
        Self {
            client,
            site_base: site_base.trim_end_matches('/').to_string(),
            document: None,
            popup: None,
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, PageError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PageError::Navigation {
                url: url.to_string(),
                reason: format!("status {}", status.as_u16()),
            });
        }
        Ok(resp.text().await?)
    }

    fn document(&self) -> Result<&str, PageError> {
        self.document
            .as_deref()
            .ok_or_else(|| PageError::Driver("no page loaded".into()))
    }
}

#[async_trait]
impl MeetingPage for HttpPage {
    async fn goto(&mut self, url: &str) -> Result<(), PageError> {
        let url = absolutize(&self.site_base, url);
        debug!(url = %url, "loading page");
        let html = self.fetch(&url).await?;
        self.document = Some(html);
        self.popup = None;
        Ok(())
    }

    async fn anchors(&mut self) -> Result<Vec<Anchor>, PageError> {
        Ok(parse_anchors(self.document()?))
    }

    async fn table_rows(&mut self) -> Result<Vec<TableRow>, PageError> {
        Ok(parse_rows(self.document()?))
    }

    async fn action_controls(&mut self) -> Result<Vec<ActionControl>, PageError> {
        Ok(parse_action_controls(self.document()?))
    }

    async fn open_popup(&mut self, control: &ActionControl) -> Result<(), PageError> {
        if control.target.is_empty() {
            return Err(PageError::NoPopupTarget {
                index: control.index,
            });
        }
        let url = absolutize(&self.site_base, &control.target);
        let html = self.fetch(&url).await?;
        self.popup = Some(html);
        Ok(())
    }

    async fn wait_for_dialog(&mut self, _timeout: Duration) -> Result<bool, PageError> {
        // The popup is fully fetched by open_popup.
        Ok(self.popup.is_some())
    }

    async fn frame_rows(&mut self) -> Result<Vec<Vec<TableRow>>, PageError> {
        let mut frames = vec![parse_rows(self.document()?)];
        if let Some(popup) = &self.popup {
            frames.push(parse_rows(popup));
        }
        Ok(frames)
    }

    async fn close_popup(&mut self) -> Result<(), PageError> {
        self.popup.take().map(|_| ()).ok_or(PageError::NoDialog)
    }

    async fn dismiss(&mut self) -> Result<(), PageError> {
        self.popup = None;
        Ok(())
    }

    async fn paragraphs(&mut self) -> Result<Vec<String>, PageError> {
        Ok(parse_paragraphs(self.document()?))
    }
}

/// Opens an [`HttpPage`] per worker over a shared connection pool.
pub struct HttpSessionFactory {
    client: reqwest::Client,
    site_base: String,
}

impl HttpSessionFactory {
    pub fn new(site_base: &str, timeout: Duration) -> Result<Self, PageError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            site_base: site_base.to_string(),
        })
    }
}

#[async_trait]
impl SessionFactory for HttpSessionFactory {
    async fn open(&self, headless: bool) -> Result<Box<dyn MeetingPage>, PageError> {
        if !headless {
            info!("headed mode requested; the HTTP driver has no window, continuing headless");
        }
        Ok(Box::new(HttpPage::new(self.client.clone(), &self.site_base)))
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn anchor_of(el: ElementRef<'_>) -> Anchor {
    Anchor::new(text_of(el), el.value().attr("href").unwrap_or_default())
}

fn cells_of(row: ElementRef<'_>) -> Vec<TableCell> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| c.value().name() == "td")
        .map(|cell| TableCell {
            text: text_of(cell),
            anchor: cell.select(&ANCHOR).next().map(anchor_of),
        })
        .collect()
}

pub(crate) fn parse_anchors(html: &str) -> Vec<Anchor> {
    let doc = Html::parse_document(html);
    doc.select(&ANCHOR).map(anchor_of).collect()
}

pub(crate) fn parse_rows(html: &str) -> Vec<TableRow> {
    let doc = Html::parse_document(html);
    doc.select(&ROW).map(|tr| TableRow::new(cells_of(tr))).collect()
}

pub(crate) fn parse_paragraphs(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&PARAGRAPH).map(text_of).collect()
}

pub(crate) fn parse_action_controls(html: &str) -> Vec<ActionControl> {
    let doc = Html::parse_document(html);
    doc.select(&ANCHOR)
        .filter(|a| text_of(*a).to_lowercase().contains(ACTION_DETAILS))
        .enumerate()
        .map(|(index, a)| ActionControl {
            index,
            row_text: closest_row(a).map(text_of).unwrap_or_default(),
            target: popup_target(a),
        })
        .collect()
}

fn closest_row(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "tr")
}

/// The popup URL: a real href, else the argument of an `onclick` radopen call.
fn popup_target(a: ElementRef<'_>) -> String {
    let href = a.value().attr("href").unwrap_or_default().trim();
    if !href.is_empty() && href != "#" && !href.starts_with("javascript:") {
        return href.to_string();
    }
    a.value()
        .attr("onclick")
        .and_then(|js| RADOPEN.captures(js))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

//! Markup-scraping fetchers.
//!
//! [`MarkupSource`] extracts headlines from the upstream's listing pages using
//! the container, headline, and date classes those pages have carried for
//! years. Zero matches is a valid outcome: a redesigned page degrades to an
//! empty list and the orchestrator moves down the chain.
//!
//! [`AnchorSource`] is the ultimate fallback. It has no structure to key on,
//! so it sweeps anchor-tag inner text, drops entries too short to be a
//! headline (navigation labels, "More" links), and caps the yield.

use super::FetchError;
use crate::dates;
use crate::models::NewsRecord;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, instrument};

/// Container element for one story on a listing page.
const STORY_SELECTOR: &str = "li.clearfix";
/// Headline element inside a story container.
const HEADLINE_SELECTOR: &str = "h2";
/// Date element inside a story container.
const DATE_SELECTOR: &str = "span.article_schedule";

/// Anchor-sweep entries shorter than this are navigation noise, not headlines.
const MIN_ANCHOR_HEADLINE_LEN: usize = 5;
/// Upper bound on headlines taken from an anchor sweep.
const MAX_ANCHOR_HEADLINES: usize = 10;

/// A listing-page upstream extracted with fixed selectors.
pub struct MarkupSource {
    url: String,
    user_agent: String,
}

impl MarkupSource {
    pub fn new(url: String, user_agent: String) -> Self {
        Self { url, user_agent }
    }

    /// Fetch the listing page and extract its stories.
    ///
    /// # Errors
    ///
    /// Only [`FetchError::Transport`]; a page with no matching nodes is an
    /// empty list, not an error.
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    pub async fn attempt(&self, client: &Client) -> Result<Vec<NewsRecord>, FetchError> {
        let body = client
            .get(&self.url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?
            .text()
            .await?;

        let records = extract_stories(&body);
        info!(count = records.len(), "Markup listing yielded records");
        Ok(records)
    }
}

/// Extract story containers from listing-page markup.
///
/// Records keep the page's own order and set no raw date value: the page is
/// assumed newest-first and its display dates are trusted after cleanup.
pub fn extract_stories(html: &str) -> Vec<NewsRecord> {
    let document = Html::parse_document(html);
    let story_selector = Selector::parse(STORY_SELECTOR).unwrap();
    let headline_selector = Selector::parse(HEADLINE_SELECTOR).unwrap();
    let date_selector = Selector::parse(DATE_SELECTOR).unwrap();

    let mut records = Vec::new();
    for story in document.select(&story_selector) {
        let Some(headline_node) = story.select(&headline_selector).next() else {
            continue;
        };
        let headline = headline_node.text().collect::<Vec<_>>().join(" ");

        let date = story
            .select(&date_selector)
            .next()
            .map(|node| node.text().collect::<Vec<_>>().join(" "))
            .map(|text| dates::clean_markup_date(&text))
            .unwrap_or_default();

        if let Some(record) = NewsRecord::new(&headline, date, None) {
            records.push(record);
        }
    }
    records
}

/// A last-resort upstream with no extractable structure.
pub struct AnchorSource {
    url: String,
    user_agent: String,
}

impl AnchorSource {
    pub fn new(url: String, user_agent: String) -> Self {
        Self { url, user_agent }
    }

    /// Fetch the page and sweep anchor text for anything headline-shaped.
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    pub async fn attempt(&self, client: &Client) -> Result<Vec<NewsRecord>, FetchError> {
        let body = client
            .get(&self.url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?
            .text()
            .await?;

        let records = extract_anchor_text(&body);
        info!(count = records.len(), "Anchor sweep yielded records");
        Ok(records)
    }
}

/// Coarse extraction of anchor-tag inner text.
///
/// Entries shorter than [`MIN_ANCHOR_HEADLINE_LEN`] characters are discarded
/// and the result is capped at [`MAX_ANCHOR_HEADLINES`]. Dates are not
/// recoverable on this path.
pub fn extract_anchor_text(html: &str) -> Vec<NewsRecord> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a").unwrap();

    document
        .select(&anchor_selector)
        .map(|anchor| anchor.text().collect::<Vec<_>>().join(" "))
        .filter(|text| text.trim().len() >= MIN_ANCHOR_HEADLINE_LEN)
        .filter_map(|text| NewsRecord::new(&text, String::new(), None))
        .take(MAX_ANCHOR_HEADLINES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_PAGE: &str = r#"
        <html><body><ul>
          <li class="clearfix">
            <h2><a href="/news/1">Nifty ends above 21,700</a></h2>
            <span class="article_schedule">January 02, 2024&nbsp;03:45 PM Hrs IST</span>
          </li>
          <li class="clearfix">
            <h2>Rupee firms against dollar</h2>
          </li>
          <li class="clearfix">
            <span class="article_schedule">January 02, 2024 02:00 PM Hrs IST</span>
          </li>
        </ul></body></html>"#;

    #[test]
    fn test_extract_stories_with_cleaned_dates() {
        let records = extract_stories(LISTING_PAGE);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].headline, "Nifty ends above 21,700");
        assert_eq!(records[0].date, "January 02, 2024 03:45 PM");
        assert!(records[0].date_raw.is_none());
    }

    #[test]
    fn test_story_without_date_keeps_empty_display() {
        let records = extract_stories(LISTING_PAGE);
        assert_eq!(records[1].headline, "Rupee firms against dollar");
        assert_eq!(records[1].date, "");
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let records = extract_stories("<html><body><p>redesigned page</p></body></html>");
        assert!(records.is_empty());
    }

    #[test]
    fn test_anchor_sweep_filters_and_caps() {
        let mut page = String::from("<html><body>");
        page.push_str("<a href='/'>Home</a><a href='/more'>More</a>");
        for i in 0..20 {
            page.push_str(&format!("<a href='/news/{i}'>Market headline number {i}</a>"));
        }
        page.push_str("</body></html>");

        let records = extract_anchor_text(&page);
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].headline, "Market headline number 0");
        assert!(records.iter().all(|r| r.headline.len() >= 5));
    }

    #[test]
    fn test_anchor_sweep_tolerates_empty_page() {
        assert!(extract_anchor_text("<html></html>").is_empty());
    }
}

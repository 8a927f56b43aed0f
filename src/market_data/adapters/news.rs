// RSS headlines. Feeds are XML; we pull title/link/pubDate out of each
// <item> block rather than carrying a full feed parser. First feed that
// yields anything wins; all of them failing serves canned headlines.

use regex::Regex;
use tracing::warn;

use crate::config::endpoints;
use crate::fetch::FetchGuard;
use crate::market_data::synthetic;
use crate::market_data::types::*;

pub struct NewsAdapter {
    feeds: Vec<String>,
    item_re: Regex,
    title_re: Regex,
    link_re: Regex,
    date_re: Regex,
    tag_re: Regex,
}

impl NewsAdapter {
    pub fn new() -> Self {
        Self {
            feeds: endpoints::RSS_FEEDS.iter().map(|f| f.to_string()).collect(),
            item_re: Regex::new(r"(?is)<item[ >](.*?)</item>").expect("item regex"),
            title_re: Regex::new(r"(?is)<title>(.*?)</title>").expect("title regex"),
            link_re: Regex::new(r"(?is)<link>(.*?)</link>").expect("link regex"),
            date_re: Regex::new(r"(?is)<pubDate>(.*?)</pubDate>").expect("date regex"),
            tag_re: Regex::new(r"<[^>]*>").expect("tag regex"),
        }
    }

    #[cfg(test)]
    fn with_feeds(feeds: Vec<String>) -> Self {
        Self {
            feeds,
            ..Self::new()
        }
    }

    pub async fn news(&self, guard: &FetchGuard, limit: usize) -> NewsFeed {
        for feed in &self.feeds {
            if let Some(body) = guard.get_text(feed).await {
                let items = self.parse_feed(&body, limit);
                if !items.is_empty() {
                    return NewsFeed {
                        items,
                        origin: DataOrigin::Live,
                    };
                }
            }
        }
        warn!("all rss feeds unavailable, serving canned headlines");
        super::record_fallback("news");
        synthetic::news(limit)
    }

    /// Feed order is most-recent-first already; we keep it.
    pub fn parse_feed(&self, body: &str, limit: usize) -> Vec<NewsItem> {
        self.item_re
            .captures_iter(body)
            .filter_map(|item| {
                let chunk = item.get(1)?.as_str();
                let title = self.clean(self.title_re.captures(chunk)?.get(1)?.as_str());
                if title.is_empty() {
                    return None;
                }
                let link = self
                    .link_re
                    .captures(chunk)
                    .and_then(|c| c.get(1))
                    .map(|m| self.clean(m.as_str()))
                    .filter(|l| !l.is_empty());
                let published_at = self
                    .date_re
                    .captures(chunk)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().trim().to_string());
                Some(NewsItem {
                    title,
                    link,
                    published_at,
                })
            })
            .take(limit)
            .collect()
    }

    fn clean(&self, raw: &str) -> String {
        let no_tags = self.tag_re.replace_all(raw, "");
        no_tags
            .replace("<![CDATA[", "")
            .replace("]]>", "")
            .replace("&amp;", "&")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .trim()
            .to_string()
    }
}

impl Default for NewsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

use affilizap_common::{GeneratedCopy, Platform};

/// History filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    pub platform: Option<Platform>,
    pub search: Option<String>,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    /// Case-insensitive search over the link and the copy text.
    pub fn matches(&self, copy: &GeneratedCopy) -> bool {
        if let Some(platform) = self.platform {
            if copy.platform != platform {
                return false;
            }
        }

        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                copy.original_link.to_lowercase().contains(&term)
                    || copy.text.to_lowercase().contains(&term)
            }
            None => true,
        }
    }

    /// Matching entries, newest first.
    pub fn apply<'a>(&self, entries: impl IntoIterator<Item = &'a GeneratedCopy>) -> Vec<GeneratedCopy> {
        let mut matched: Vec<GeneratedCopy> =
            entries.into_iter().filter(|c| self.matches(c)).cloned().collect();
        sort_newest_first(&mut matched);
        matched
    }
}

pub fn sort_newest_first(entries: &mut [GeneratedCopy]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use affilizap_common::{classify, Category};

    fn copy(id: &str, link: &str, text: &str, timestamp: i64) -> GeneratedCopy {
        GeneratedCopy {
            id: id.into(),
            original_link: link.into(),
            text: text.into(),
            category: Category::Other,
            platform: classify(link),
            image_url: None,
            product_image_url: None,
            timestamp,
            is_error: false,
        }
    }

    fn sample() -> Vec<GeneratedCopy> {
        vec![
            copy("a", "https://amzn.to/1", "Fone Bluetooth", 10),
            copy("b", "https://shopee.com.br/2", "Panela elétrica", 30),
            copy("c", "https://amzn.to/3", "Air Fryer Mondial", 20),
        ]
    }

    #[test]
    fn test_empty_query_sorts_newest_first() {
        let ids: Vec<String> = HistoryQuery::new().apply(&sample()).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_platform_filter() {
        let matched = HistoryQuery::new().platform(Platform::Amazon).apply(&sample());
        assert_eq!(matched.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["c", "a"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_link_and_text() {
        let by_text = HistoryQuery::new().search("air fryer").apply(&sample());
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].id, "c");

        let by_link = HistoryQuery::new().search("SHOPEE").apply(&sample());
        assert_eq!(by_link.len(), 1);
        assert_eq!(by_link[0].id, "b");
    }

    #[test]
    fn test_filters_combine() {
        let matched = HistoryQuery::new()
            .platform(Platform::Shopee)
            .search("fone")
            .apply(&sample());
        assert!(matched.is_empty());
    }

    #[test]
    fn test_blank_search_matches_all() {
        assert_eq!(HistoryQuery::new().search("  ").search, None);
        assert_eq!(HistoryQuery::new().search("  ").apply(&sample()).len(), 3);
    }
}

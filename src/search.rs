use crate::{Error, Result};
use futures::future::LocalBoxFuture;
use std::fmt::{Display, Formatter};

/// A hashtag search, rendered with the operators the search endpoint understands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchQuery {
    keyword: String,
    exclude_retweets: bool,
}

impl SearchQuery {
    /// Build a query for a keyword given without its tag marker (a leading `#` is tolerated).
    pub fn new(keyword: &str, exclude_retweets: bool) -> Result<SearchQuery> {
        let keyword = keyword.trim().trim_start_matches('#');

        if keyword.is_empty() || keyword.contains(char::is_whitespace) {
            Err(Error::InvalidSettings(format!(
                "Invalid keyword: {:?}",
                keyword
            )))
        } else {
            Ok(SearchQuery {
                keyword: keyword.to_string(),
                exclude_retweets,
            })
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn excludes_retweets(&self) -> bool {
        self.exclude_retweets
    }
}

impl Display for SearchQuery {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.exclude_retweets {
            write!(f, "#{} exclude:retweets", self.keyword)
        } else {
            write!(f, "#{}", self.keyword)
        }
    }
}

/// The inclusive upper bound on status IDs for the next search request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cursor {
    /// No bound: start from the most recent statuses.
    Latest,
    /// Only statuses with an ID less than or equal to this one.
    MaxId(u64),
}

impl Cursor {
    pub fn max_id(&self) -> Option<u64> {
        match self {
            Cursor::Latest => None,
            Cursor::MaxId(id) => Some(*id),
        }
    }

    /// Whether a status with this ID falls within the bound.
    pub fn admits(&self, id: u64) -> bool {
        self.max_id().map_or(true, |max_id| id <= max_id)
    }

    /// The cursor for the page of statuses older than everything in `page`.
    ///
    /// Returns `None` when the page is empty or already reaches ID 0, since nothing older can exist.
    pub fn older_than(page: &[Post]) -> Option<Cursor> {
        page.iter()
            .map(|post| post.id)
            .min()
            .and_then(|min_id| min_id.checked_sub(1))
            .map(Cursor::MaxId)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::Latest
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Post {
    pub id: u64,
    pub author: String,
}

impl Post {
    pub fn new<S: Into<String>>(id: u64, author: S) -> Post {
        Post {
            id,
            author: author.into(),
        }
    }
}

/// Search results in the order the service returned them (newest first).
pub type Page = Vec<Post>;

/// A source of search result pages.
pub trait Fetcher {
    /// Load at most `page_size` statuses matching `query` with IDs bounded by `cursor`.
    fn fetch<'a>(
        &'a self,
        query: &'a SearchQuery,
        cursor: Cursor,
        page_size: u8,
    ) -> LocalBoxFuture<'a, Result<Page>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_query_without_retweets() {
        let query = SearchQuery::new("spam", true).unwrap();

        assert_eq!(query.to_string(), "#spam exclude:retweets");
    }

    #[test]
    fn render_query_with_retweets() {
        let query = SearchQuery::new("#spam", false).unwrap();

        assert_eq!(query.keyword(), "spam");
        assert_eq!(query.to_string(), "#spam");
    }

    #[test]
    fn reject_empty_keyword() {
        assert!(SearchQuery::new("", true).is_err());
        assert!(SearchQuery::new(" # ", true).is_err());
        assert!(SearchQuery::new("two words", true).is_err());
    }

    #[test]
    fn cursor_uses_minimum_id() {
        let page = vec![Post::new(105, "alice"), Post::new(99, "carol"), Post::new(102, "bob")];

        assert_eq!(Cursor::older_than(&page), Some(Cursor::MaxId(98)));
    }

    #[test]
    fn cursor_for_empty_or_bottom_page() {
        assert_eq!(Cursor::older_than(&[]), None);
        assert_eq!(Cursor::older_than(&[Post::new(0, "alice")]), None);
    }

    #[test]
    fn latest_cursor_has_no_bound() {
        assert_eq!(Cursor::default().max_id(), None);
        assert_eq!(Cursor::MaxId(101).max_id(), Some(101));
    }

    #[test]
    fn max_id_bound_is_inclusive() {
        assert!(Cursor::Latest.admits(u64::MAX));
        assert!(Cursor::MaxId(101).admits(101));
        assert!(!Cursor::MaxId(101).admits(102));
    }
}

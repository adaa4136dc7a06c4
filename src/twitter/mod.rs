pub mod config;

use crate::block::Blocker;
use crate::search::{Cursor, Fetcher, Page, Post, SearchQuery};
use crate::{Error, Result};
use config::Config;
use egg_mode::search::{search, ResultType};
use egg_mode::tweet::Tweet;
use egg_mode::Token;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::path::Path;

/// A Twitter API client that searches statuses and blocks accounts with a user access token.
pub struct Client {
    token: Token,
}

impl Client {
    pub fn new(token: Token) -> Client {
        Client { token }
    }

    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Client> {
        let config = Config::from_file(path)?;

        Ok(Self::new(config.token()))
    }

    /// Search for recent statuses matching `query`.
    pub async fn search(
        &self,
        query: &SearchQuery,
        cursor: Cursor,
        page_size: u8,
    ) -> Result<Page> {
        let mut builder = search(query.to_string())
            .result_type(ResultType::Recent)
            .count(page_size.into());

        if let Some(max_id) = cursor.max_id() {
            builder = builder.max_tweet(max_id);
        }

        let response = builder.call(&self.token).await?;

        response
            .response
            .statuses
            .into_iter()
            .map(Self::tweet_to_post)
            .collect()
    }

    /// Block a user by screen name.
    pub async fn block_user(&self, screen_name: &str) -> Result<()> {
        egg_mode::user::block(screen_name.to_string(), &self.token).await?;
        Ok(())
    }

    fn tweet_to_post(tweet: Tweet) -> Result<Post> {
        let id = tweet.id;

        tweet
            .user
            .map(|user| Post::new(id, user.screen_name))
            .ok_or_else(|| Error::MalformedResponse(format!("Status {} has no user", id)))
    }
}

impl Fetcher for Client {
    fn fetch<'a>(
        &'a self,
        query: &'a SearchQuery,
        cursor: Cursor,
        page_size: u8,
    ) -> LocalBoxFuture<'a, Result<Page>> {
        self.search(query, cursor, page_size).boxed_local()
    }
}

impl Blocker for Client {
    fn block<'a>(&'a self, screen_name: &'a str) -> LocalBoxFuture<'a, Result<()>> {
        self.block_user(screen_name).boxed_local()
    }
}

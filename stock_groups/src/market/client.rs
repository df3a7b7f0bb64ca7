use std::collections::HashMap;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::warn;

use crate::cfg::CONFIG;
use crate::redis::RedisCache;

use super::model::Quote;

/// Client for the market-data provider's `/quote` endpoint, with a Redis
/// cache in front so a leaderboard build does not re-fetch hot symbols.
#[derive(Clone)]
pub struct MarketClient {
    http: reqwest::Client,
    cache: RedisCache,
    base_url: String,
    api_key: String,
}

impl MarketClient {
    pub fn new(cache: RedisCache) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("error build http client");
        Self {
            http,
            cache,
            base_url: CONFIG.market_base_url.clone(),
            api_key: CONFIG.market_api_key.clone(),
        }
    }

    /// One batched lookup for a set of symbols. Cache misses fan out
    /// concurrently; a symbol whose fetch fails is simply absent from the
    /// returned map, so a partial provider outage degrades instead of
    /// failing the snapshot.
    pub async fn quotes(&self, symbols: &[String]) -> HashMap<String, Quote> {
        let mut out = HashMap::new();
        let mut misses = Vec::new();

        let mut cache = self.cache.clone();
        for symbol in symbols {
            match cache.get_cached::<Quote>(&quote_key(symbol)).await {
                Ok(Some(quote)) => {
                    out.insert(symbol.clone(), quote);
                }
                Ok(None) => misses.push(symbol.clone()),
                Err(e) => {
                    warn!("quote cache read failed for {}: {}", symbol, e);
                    misses.push(symbol.clone());
                }
            }
        }

        let mut set = JoinSet::new();
        for symbol in misses {
            let client = self.clone();
            set.spawn(async move {
                let quote = client.fetch_quote(&symbol).await;
                (symbol, quote)
            });
        }

        while let Some(joined) = set.join_next().await {
            let Ok((symbol, quote)) = joined else { continue };
            match quote {
                Ok(quote) => {
                    let mut cache = self.cache.clone();
                    if let Err(e) = cache
                        .set_cache_ex(&quote_key(&symbol), &quote, CONFIG.quote_ttl_secs)
                        .await
                    {
                        warn!("quote cache write failed for {}: {}", symbol, e);
                    }
                    out.insert(symbol, quote);
                }
                Err(e) => warn!("quote fetch failed for {}: {}", symbol, e),
            }
        }

        out
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, reqwest::Error> {
        let url = format!("{}/quote", self.base_url);
        self.http
            .get(&url)
            .query(&[("symbol", symbol), ("token", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<Quote>()
            .await
    }
}

fn quote_key(symbol: &str) -> String {
    format!("quote:{symbol}")
}

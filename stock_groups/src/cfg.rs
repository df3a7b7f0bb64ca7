use config::Config;
use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Cfg {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_public_key: String,
    pub market_base_url: String,
    pub market_api_key: String,
    pub bind_addr: String,
    pub quote_ttl_secs: u64,
}

pub static CONFIG: Lazy<Cfg> = Lazy::new(|| {
    dotenvy::dotenv().ok();
    Config::builder()
        .set_default("bind_addr", "127.0.0.1:7878")
        .expect("default bind_addr")
        .set_default("market_base_url", "https://finnhub.io/api/v1")
        .expect("default market_base_url")
        .set_default("quote_ttl_secs", 30_i64)
        .expect("default quote_ttl_secs")
        .add_source(config::Environment::default())
        .build()
        .expect("error build config")
        .try_deserialize()
        .expect("error load config")
});

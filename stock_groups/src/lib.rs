pub mod cfg;
pub mod constant;
pub mod error;
pub mod logging;
pub mod mdw;
pub mod redis;
pub mod server;
pub mod svc;
pub mod utils;

pub mod group {
    pub mod invite;
    pub mod model;
    pub mod repo;
}

pub mod member {
    pub mod model;
    pub mod position;
    pub mod repo;
}

pub mod market {
    pub mod client;
    pub mod model;
}

pub mod leaderboard {
    pub mod build;
    pub mod gain;
    pub mod model;
}

use std::sync::Arc;

use anyhow::Result;
use request_http_parser::parser::{Method::GET, Method::POST};
use sqlx::{Pool, Postgres};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot::Receiver;
use tracing::{error, info};

use crate::cfg::CONFIG;
use crate::group::repo::GroupRepo;
use crate::market::client::MarketClient;
use crate::mdw::Middleware;
use crate::member::repo::MemberRepo;
use crate::redis::RedisCache;
use crate::svc::Service;
use crate::{constant, logging};

pub struct Server {
    svc: Arc<Service>,
}

impl Server {
    pub fn new(pool: Pool<Postgres>, redis_cache: RedisCache) -> Self {
        Self {
            svc: Arc::new(Service::new(
                GroupRepo::new(pool.clone()),
                MemberRepo::new(pool.clone()),
                MarketClient::new(redis_cache),
            )),
        }
    }

    pub async fn start(self, mut shutdown_rx: Receiver<()>) -> Result<()> {
        let listener = TcpListener::bind(&CONFIG.bind_addr).await?;
        info!("Server running on http://{}", CONFIG.bind_addr);

        loop {
            tokio::select! {
                conn = listener.accept() => {
                    let (stream, _) = conn?;
                    let svc = Arc::clone(&self.svc);
                    tokio::spawn(async move {
                        logging::thread_logging(constant::LOGGING_INCOMING_REQUEST);
                        if let Err(e) = Self::handle_client(stream, &svc).await {
                            error!("Connection error: {}", e);
                        }
                    });
                },
                _ = &mut shutdown_rx => {
                    info!("shutting down ...");
                    break;
                }
            }
        }
        Ok(())
    }

    async fn handle_client(mut stream: TcpStream, svc: &Arc<Service>) -> Result<()> {
        // Middleware writes the failure response itself
        let (request, identity) = match Middleware::new(&mut stream).await {
            Ok(pair) => pair,
            Err(e) => {
                info!("error {}", e);
                return Ok(());
            }
        };
        let (_, mut writer) = stream.split();

        //Router
        match (&request.method, request.path.as_str()) {
            (POST, "/groups") => svc.create_group(request, identity, &mut writer).await?,
            (POST, "/groups/join") => svc.join_group(request, identity, &mut writer).await?,
            (POST, "/groups/leave") => svc.leave_group(request, identity, &mut writer).await?,
            (POST, "/groups/positions") => {
                svc.replace_positions(request, identity, &mut writer).await?
            }
            (GET, "/groups/me") => svc.get_my_group(identity, &mut writer).await?,
            (GET, "/groups/leaderboard") => svc.get_leaderboard(request, &mut writer).await?,

            _ => {
                writer
                    .write_all(format!("{}{}", constant::NOT_FOUND, "404 Not Found").as_bytes())
                    .await?;
            }
        };
        Ok(())
    }
}

use anyhow::{Context, Result, anyhow};
use identity::jwt::{Identity, verify_session};
use request_http_parser::parser::Request;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::cfg::CONFIG;
use crate::constant::{BAD_REQUEST, UNAUTHORIZED};
use crate::utils::extract_token;

pub struct Middleware {}

impl Middleware {
    pub async fn new(stream: &mut TcpStream) -> Result<(Request, Identity)> {
        let mut buffer = [0; 8192];
        let size = stream
            .read(&mut buffer)
            .await
            .context("Failed to read stream")?;
        if size >= buffer.len() {
            let _ = stream
                .write_all(format!("{}{}", BAD_REQUEST, "Request too large").as_bytes())
                .await
                .context("Failed to write");

            let _ = stream.flush().await.context("Failed to flush");

            return Err(anyhow!("request too large"));
        }
        let req_str = String::from_utf8_lossy(&buffer[..size]);
        let request = match Request::new(&req_str) {
            Ok(req) => req,
            Err(e) => {
                let _ = stream
                    .write_all(format!("{}{}", BAD_REQUEST, e).as_bytes())
                    .await
                    .context("Failed to write");

                let _ = stream.flush().await.context("Failed to flush");
                return Err(anyhow!("request format invalid"));
            }
        };

        let token = match extract_token(&request.headers) {
            Some(token) => token,
            None => {
                stream
                    .write_all(format!("{}{}", UNAUTHORIZED, "401 unauthorized").as_bytes())
                    .await?;
                return Err(anyhow!("extract token error"));
            }
        };

        let identity = match verify_session(&token, &CONFIG.jwt_public_key) {
            Ok(identity) => identity,
            Err(_) => {
                stream
                    .write_all(format!("{}{}", UNAUTHORIZED, "401 unauthorized").as_bytes())
                    .await?;
                return Err(anyhow!("token unauthorized"));
            }
        };

        Ok((request, identity))
    }
}

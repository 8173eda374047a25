use log::{error, info, warn};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::config::AppConfig;
use crate::error::handlers::{
    STATUS_INTERNAL_ERROR, STATUS_OK, error_to_message, error_to_status_code,
};
use crate::error::GatewayError;
use crate::gateway::{ChatContext, ChatGateway, parse_request};
use crate::middleware::logging::log_connection;
use crate::rate_limit::RateLimiter;

/// Outcome of reading one request line.
#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Eof,
    /// A complete line (trailing newline included, if present) is in the buffer.
    Line,
    /// The line ran past the size cap; the rest of it is still unread.
    Oversized,
}

#[derive(Serialize)]
struct SuccessBody<'a> {
    status: u16,
    #[serde(flatten)]
    context: &'a ChatContext,
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    error: String,
    message: String,
}

/// Newline-delimited JSON front end for the chat gateway.
pub struct Server {
    listener: TcpListener,
    gateway: Arc<ChatGateway>,
    config: Arc<AppConfig>,
}

impl Server {
    pub async fn bind(config: AppConfig, gateway: ChatGateway) -> std::io::Result<Self> {
        let socket = config.server.listen_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            e
        })?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            gateway: Arc::new(gateway),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(self) {
        info!(
            "Starting copilot gateway on {} (rate limiting {})",
            self.config.server.listen_socket(),
            if self.config.rate_limit.enabled { "on" } else { "off" }
        );

        spawn_sweeper(
            Arc::clone(self.gateway.limiter()),
            self.config.rate_limit.sweep_interval(),
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let gateway = Arc::clone(&self.gateway);
                    let max_request_bytes = self.config.server.max_request_bytes;

                    // Spawn a task per connection so the accept loop doesn't block
                    tokio::spawn(async move {
                        let result =
                            handle_connection(stream, addr, gateway, max_request_bytes).await;
                        if let Err(e) = result {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Periodically drop rate-limit buckets with no recent requests.
fn spawn_sweeper(limiter: Arc<RateLimiter>, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.sweep_idle(Instant::now());
        }
    });
}

async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    gateway: Arc<ChatGateway>,
    max_request_bytes: usize,
) -> std::io::Result<()> {
    log_connection(&peer_addr.to_string());

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();

    loop {
        let read = read_request_line(&mut reader, &mut buf, max_request_bytes).await?;
        let oversized = read == LineRead::Oversized;

        let mut response = match read {
            LineRead::Eof => {
                info!("Connection closed by client {}", peer_addr);
                return Ok(());
            }
            LineRead::Oversized => error_response(&GatewayError::MalformedRequest(format!(
                "request exceeds {} bytes",
                max_request_bytes
            ))),
            LineRead::Line => match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let trimmed = line.trim_end_matches(['\r', '\n']);
                    if trimmed.trim().is_empty() {
                        continue;
                    }
                    respond(&gateway, trimmed)
                }
                Err(_) => error_response(&GatewayError::MalformedRequest(
                    "request is not valid UTF-8".into(),
                )),
            },
        };
        response.push('\n');

        write_half.write_all(response.as_bytes()).await?;
        write_half.flush().await?;

        if oversized {
            // Answer first, then drop the remainder of the line.
            discard_line(&mut reader).await?;
        }
    }
}

/// Read up to `max_request_bytes` plus a newline into `buf`.
///
/// Never buffers more than `max_request_bytes + 1` bytes of one line.
async fn read_request_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_request_bytes: usize,
) -> std::io::Result<LineRead> {
    buf.clear();
    let limit = max_request_bytes as u64 + 1;
    let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;

    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.last() == Some(&b'\n') || n <= max_request_bytes {
        return Ok(LineRead::Line);
    }
    Ok(LineRead::Oversized)
}

/// Skip input up to and including the next newline, or to end of stream.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        let (consumed, done) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };
        reader.consume(consumed);
        if done {
            return Ok(());
        }
    }
}

/// Handle one request line and render the JSON response (without newline).
pub fn respond(gateway: &ChatGateway, line: &str) -> String {
    let outcome = parse_request(line).and_then(|request| gateway.handle(&request));
    match outcome {
        Ok(context) => to_json(&SuccessBody {
            status: STATUS_OK,
            context: &context,
        }),
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &GatewayError) -> String {
    let (error, message) = error_to_message(err);
    to_json(&ErrorBody {
        status: error_to_status_code(err),
        error,
        message,
    })
}

fn to_json<T: Serialize>(body: &T) -> String {
    serde_json::to_string(body).unwrap_or_else(|e| {
        error!("Failed to serialize response: {}", e);
        format!(
            r#"{{"status":{},"error":"Chat failed","message":"Chat failed"}}"#,
            STATUS_INTERNAL_ERROR
        )
    })
}

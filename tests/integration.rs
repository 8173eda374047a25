use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use studio_copilot_core::config::{AppConfig, RateLimitSettings};
use studio_copilot_core::gateway::ChatGateway;
use studio_copilot_core::rate_limit::{LimitWindow, RateLimitResult, RateLimiter};
use studio_copilot_core::retrieval::{
    CorpusStore, Document, TOP_K, build_corpus, load_sessions, retrieve,
};
use studio_copilot_core::server::Server;

fn sessions_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sessions.json")
}

fn session_corpus() -> Vec<Document> {
    let sessions = load_sessions(&sessions_path()).unwrap();
    build_corpus(&sessions)
}

fn limits(per_minute: u32, per_hour: u32) -> RateLimitSettings {
    RateLimitSettings {
        enabled: true,
        max_per_minute: per_minute,
        max_per_hour: per_hour,
        sweep_interval_secs: 300,
    }
}

#[test]
fn test_studio_scenario_ranking() {
    let corpus = vec![
        Document::new("yoga", "morning yoga class full"),
        Document::new("cycle", "evening cycle discount"),
        Document::new("pilates", "lunch pilates low fill"),
    ];
    let results = retrieve("yoga morning discount", &corpus);
    assert!(results.len() <= 3);
    assert_eq!(results[0].id, "yoga");
    assert_eq!(results[1].id, "cycle");
}

#[test]
fn test_retrieve_results_are_distinct_corpus_members() {
    let corpus = session_corpus();
    let queries = [
        "yoga morning",
        "low fill lunch discount",
        "Jordan Lee weekend cycle revenue",
        "price capacity booked",
        "nothing matches here",
    ];

    for query in queries {
        let results = retrieve(query, &corpus);
        assert!(results.len() <= TOP_K, "too many results for {query:?}");

        let ids: HashSet<&str> = results.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), results.len(), "duplicates for {query:?}");
        for doc in &results {
            assert!(corpus.contains(doc), "foreign document for {query:?}");
        }
    }
}

#[test]
fn test_empty_query_returns_session_head() {
    let corpus = session_corpus();
    assert_eq!(retrieve("", &corpus), corpus[..TOP_K].to_vec());
}

#[test]
fn test_session_file_query() {
    let corpus = session_corpus();
    assert_eq!(corpus.len(), 8);

    let results = retrieve("yoga morning", &corpus);
    assert_eq!(results[0].id, "s-0001");
}

#[test]
fn test_three_calls_within_a_second() {
    let limiter = RateLimiter::new();
    let results: Vec<RateLimitResult> = (0..3)
        .map(|_| limiter.check_rate_limit("ip1", 2, 100).unwrap())
        .collect();
    assert_eq!(
        results,
        vec![
            RateLimitResult::allowed(),
            RateLimitResult::allowed(),
            RateLimitResult::rejected(LimitWindow::Minute),
        ]
    );
}

#[test]
fn test_exactly_m_admitted_then_stable_rejection() {
    let limiter = RateLimiter::new();
    let start = Instant::now();
    let (m, h) = (4, 50);

    for i in 0..m {
        let now = start + Duration::from_millis(i * 100);
        assert!(limiter.check_rate_limit_at("ip1", m as u32, h, now).unwrap().allowed);
    }
    for i in 0..3 {
        let now = start + Duration::from_secs(10 + i);
        assert_eq!(
            limiter.check_rate_limit_at("ip1", m as u32, h, now).unwrap(),
            RateLimitResult::rejected(LimitWindow::Minute)
        );
    }

    let after_window = start + Duration::from_secs(61);
    assert!(limiter.check_rate_limit_at("ip1", m as u32, h, after_window).unwrap().allowed);
}

#[test]
fn test_concurrent_checks_never_exceed_limit() {
    let limiter = RateLimiter::new();
    let admitted = AtomicUsize::new(0);
    let other_admitted = AtomicUsize::new(0);
    let now = Instant::now();

    thread::scope(|scope| {
        for worker in 0..16 {
            let limiter = &limiter;
            let admitted = &admitted;
            let other_admitted = &other_admitted;
            scope.spawn(move || {
                for _ in 0..25 {
                    if limiter.check_rate_limit_at("shared", 5, 100, now).unwrap().allowed {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                    let own = format!("worker-{worker}");
                    if limiter.check_rate_limit_at(&own, 3, 100, now).unwrap().allowed {
                        other_admitted.fetch_add(1, Ordering::SeqCst);
                    }
                }
            });
        }
    });

    assert_eq!(admitted.load(Ordering::SeqCst), 5);
    assert_eq!(other_admitted.load(Ordering::SeqCst), 16 * 3);
    assert_eq!(limiter.tracked_clients(), 17);
}

#[tokio::test]
async fn test_server_round_trip() {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.rate_limit = limits(1, 10);

    let sessions = load_sessions(&sessions_path()).unwrap();
    let gateway = ChatGateway::new(
        Arc::new(RateLimiter::new()),
        Arc::new(CorpusStore::from_records(&sessions)),
        config.rate_limit.clone(),
    );

    let server = Server::bind(config, gateway).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.start());

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let request = r#"{"headers": {"X-Forwarded-For": "203.0.113.9"}, "message": "yoga morning"}"#;
    let mut line = String::new();

    write_half.write_all(format!("{request}\n").as_bytes()).await.unwrap();
    reader.read_line(&mut line).await.unwrap();
    let first: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(first["status"], 200);
    assert_eq!(first["client_id"], "203.0.113.9");
    assert_eq!(first["documents"][0]["id"], "s-0001");

    line.clear();
    write_half.write_all(format!("{request}\n").as_bytes()).await.unwrap();
    reader.read_line(&mut line).await.unwrap();
    let second: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(second["status"], 429);

    line.clear();
    write_half.write_all(b"{not json}\n").await.unwrap();
    reader.read_line(&mut line).await.unwrap();
    let third: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(third["status"], 400);
}

#[tokio::test]
async fn test_server_rejects_oversized_lines() {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.server.max_request_bytes = 64;

    let gateway = ChatGateway::new(
        Arc::new(RateLimiter::new()),
        Arc::new(CorpusStore::default()),
        config.rate_limit.clone(),
    );
    let server = Server::bind(config, gateway).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.start());

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let oversized = format!("{{\"message\": \"{}\"}}\n", "yoga ".repeat(40));
    stream.write_all(oversized.as_bytes()).await.unwrap();

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).await.unwrap();
    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["status"], 400);
}

async fn read_response<R: AsyncBufReadExt + Unpin>(reader: &mut R) -> Value {
    let mut line = String::new();
    tokio::time::timeout(Duration::from_secs(5), reader.read_line(&mut line))
        .await
        .expect("server did not answer in time")
        .unwrap();
    serde_json::from_str(&line).unwrap()
}

#[tokio::test]
async fn test_server_answers_unterminated_oversized_line() {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.server.max_request_bytes = 64;
    config.rate_limit = limits(10, 100);

    let sessions = load_sessions(&sessions_path()).unwrap();
    let gateway = ChatGateway::new(
        Arc::new(RateLimiter::new()),
        Arc::new(CorpusStore::from_records(&sessions)),
        config.rate_limit.clone(),
    );
    let server = Server::bind(config, gateway).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.start());

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // No newline: the server must answer once the cap is passed.
    write_half.write_all(&vec![b'a'; 4096]).await.unwrap();
    assert_eq!(read_response(&mut reader).await["status"], 400);

    // The rest of the long line is dropped and the connection stays usable.
    write_half
        .write_all(b"aaaa\n{\"message\": \"yoga morning\"}\n")
        .await
        .unwrap();
    let next = read_response(&mut reader).await;
    assert_eq!(next["status"], 200);
    assert_eq!(next["documents"][0]["id"], "s-0001");
}

#[tokio::test]
async fn test_server_rejects_invalid_utf8_and_keeps_connection() {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.rate_limit = limits(10, 100);

    let gateway = ChatGateway::new(
        Arc::new(RateLimiter::new()),
        Arc::new(CorpusStore::new(vec![Document::new("s1", "morning yoga")])),
        config.rate_limit.clone(),
    );
    let server = Server::bind(config, gateway).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.start());

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    write_half.write_all(b"\xff\xfe{\"message\": \"x\"}\n").await.unwrap();
    let rejected = read_response(&mut reader).await;
    assert_eq!(rejected["status"], 400);
    assert_eq!(rejected["error"], "Malformed request: request is not valid UTF-8");

    write_half.write_all(b"{\"message\": \"yoga\"}\n").await.unwrap();
    assert_eq!(read_response(&mut reader).await["status"], 200);
}

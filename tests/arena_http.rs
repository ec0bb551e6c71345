//! Are.na client against a local HTTP server serving fixture channels.
//!
//! Fixtures live in `fixtures/arena/<slug>.json`. Unknown slugs get a 404,
//! the archive fixture is deliberately malformed.

use sophia_site::config::{ApiConfig, ChannelsConfig, SiteConfig};
use sophia_site::generate;
use sophia_site::source::{ArenaClient, ChannelSource, SourceError, fetch_round};
use std::io::{Read as _, Write as _};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// ===========================================================================
// Minimal HTTP server
// ===========================================================================

struct TestServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    _stop: std::sync::mpsc::Sender<()>,
}

impl TestServer {
    fn start(root: PathBuf) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();

        thread::spawn(move || {
            listener.set_nonblocking(true).unwrap();
            loop {
                if rx.try_recv().is_ok() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, _)) => {
                        let root = root.clone();
                        let log = log.clone();
                        thread::spawn(move || serve_request(stream, &root, &log));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            port,
            requests,
            _stop: tx,
        }
    }

    fn url(&self) -> String {
        format!("http://127.0.0.1:{}/v2", self.port)
    }
}

fn serve_request(mut stream: std::net::TcpStream, root: &Path, log: &Mutex<Vec<String>>) {
    // The listener is non-blocking; accepted sockets must not be.
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 4096];
    let n = match stream.read(&mut buf) {
        Ok(n) if n > 0 => n,
        _ => return,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
    log.lock().unwrap().push(target.clone());

    let path = target.split('?').next().unwrap_or("");
    let slug = path.strip_prefix("/v2/channels/").unwrap_or("");
    let file = root.join(format!("{slug}.json"));

    let (status, body) = if !slug.is_empty() && file.is_file() {
        ("200 OK", std::fs::read(&file).unwrap_or_default())
    } else {
        ("404 Not Found", br#"{"code":404,"message":"Not Found"}"#.to_vec())
    };
    let header = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&body);
}

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/arena")
}

fn api(server: &TestServer) -> ApiConfig {
    ApiConfig {
        base_url: server.url(),
        timeout_secs: 5,
        ..ApiConfig::default()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn client_reads_channel_contents() {
    let server = TestServer::start(fixtures());
    let client = ArenaClient::new(&api(&server)).unwrap();

    let items = client
        .channel_contents("9413-sophia-ave-publication")
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 30110001);
    assert_eq!(items[0].title.as_deref(), Some("Publication launch"));
    assert_eq!(
        items[0].image_url(),
        Some("https://d2w9rnfcy7mm78.cloudfront.net/30110001/display_launch.jpg")
    );
    assert_eq!(items[0].source_url(), Some("https://9413sophia.com/publication"));
    assert!(items[1].image_url().is_none());
}

#[tokio::test]
async fn client_requests_first_page_with_configured_size() {
    let server = TestServer::start(fixtures());
    let client = ArenaClient::new(&api(&server)).unwrap();
    client.channel_contents("9413-sophia-ave-film").await.unwrap();

    let requests = server.requests.lock().unwrap().clone();
    assert_eq!(requests, vec!["/v2/channels/9413-sophia-ave-film?page=1&per=100"]);
}

#[tokio::test]
async fn client_reports_status_and_json_errors() {
    let server = TestServer::start(fixtures());
    let client = ArenaClient::new(&api(&server)).unwrap();

    let missing = client.channel_contents("no-such-channel").await;
    assert!(matches!(missing, Err(SourceError::Status { status: 404, .. })));

    let malformed = client.channel_contents("9413-sophia-ave-archive").await;
    assert!(matches!(malformed, Err(SourceError::Json { .. })));
}

#[tokio::test]
async fn round_isolates_failing_channels() {
    let server = TestServer::start(fixtures());
    let client = ArenaClient::new(&api(&server)).unwrap();

    let state = fetch_round(&client, &ChannelsConfig::default()).await;
    assert_eq!(state.publication.len(), 2);
    assert_eq!(state.film.len(), 1);
    // Malformed archive payload degrades to an empty list.
    assert!(state.archive.is_empty());
}

#[tokio::test]
async fn fetched_round_renders_a_page() {
    let server = TestServer::start(fixtures());
    let client = ArenaClient::new(&api(&server)).unwrap();
    let state = fetch_round(&client, &ChannelsConfig::default()).await;

    let source = tempfile::TempDir::new().unwrap();
    let out = tempfile::TempDir::new().unwrap();
    let report = generate::generate(
        &state,
        false,
        &SiteConfig::default(),
        source.path(),
        out.path(),
    )
    .unwrap();
    assert_eq!(report.assets, 0);

    let html = std::fs::read_to_string(out.path().join("index.html")).unwrap();
    assert!(html.contains("display_launch.jpg"));
    assert!(html.contains("display_trailer.jpg"));
    // Category views list captioned items as rows.
    assert!(html.contains(r#"data-key="film-30130001""#));
    assert!(html.contains(r#"data-key="publication-30110001""#));
}

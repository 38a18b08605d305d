//! End-to-end tests for [`OverpassClient`] against a loopback HTTP stub.
//!
//! The stub answers each accepted connection with the next canned response
//! and records the request line and form body it received.

use std::time::Duration;

use poimatch_core::QueryFilter;
use poimatch_data::CandidateSource;
use poimatch_data::overpass::{FetchError, OverpassClient, OverpassConfig, RetryPolicy};
use rstest::rstest;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const PEAK_JSON: &str = r#"{"elements":[{"type":"node","id":7,"lat":-33.935,"lon":18.3894,"tags":{"name":"Lion's Head","natural":"peak"}}]}"#;

/// A request as seen by the stub.
#[derive(Debug)]
struct Seen {
    request_line: String,
    body: String,
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

async fn read_request(stream: &mut TcpStream) -> Seen {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let read = stream.read(&mut chunk).await.expect("read request");
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
        let Some(end) = find_header_end(&buf) else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).into_owned();
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let body_start = end + 4;
        if buf.len() >= body_start + length {
            return Seen {
                request_line: head.lines().next().unwrap_or_default().to_owned(),
                body: String::from_utf8_lossy(&buf[body_start..body_start + length]).into_owned(),
            };
        }
    }
    Seen {
        request_line: String::new(),
        body: String::new(),
    }
}

/// A canned reply for one connection.
#[derive(Debug, Clone, Copy)]
enum Reply {
    /// A complete response with this status and body.
    Full(u16, &'static str),
    /// A 200 response that promises more body than it sends, then closes.
    Truncated(&'static str),
}

impl Reply {
    fn render(self) -> String {
        let (status, body, length) = match self {
            Self::Full(status, body) => (status, body, body.len()),
            Self::Truncated(body) => (200, body, 5000),
        };
        format!(
            "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {length}\r\nConnection: close\r\n\r\n{body}"
        )
    }
}

impl From<(u16, &'static str)> for Reply {
    fn from((status, body): (u16, &'static str)) -> Self {
        Self::Full(status, body)
    }
}

/// Serve `responses` in order, one per connection.
async fn serve<R: Into<Reply>>(responses: Vec<R>) -> (String, JoinHandle<Vec<Seen>>) {
    let responses: Vec<Reply> = responses.into_iter().map(Into::into).collect();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let base = format!("http://{}", listener.local_addr().expect("stub address"));
    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for reply in responses {
            let (mut stream, _) = listener.accept().await.expect("accept");
            seen.push(read_request(&mut stream).await);
            stream
                .write_all(reply.render().as_bytes())
                .await
                .expect("write response");
            stream.shutdown().await.expect("shutdown");
        }
        seen
    });
    (base, handle)
}

fn client(endpoints: Vec<String>, max_attempts: u32) -> OverpassClient {
    let config = OverpassConfig::default()
        .with_endpoints(endpoints)
        .with_request_timeout(Duration::from_secs(10))
        .with_system_proxy(false)
        .with_retry(RetryPolicy {
            max_attempts,
            backoff: Duration::from_millis(10),
        });
    OverpassClient::with_config(config).expect("client should build")
}

#[rstest]
#[tokio::test]
async fn posts_the_query_as_form_data() {
    let (base, server) = serve(vec![(200, PEAK_JSON)]).await;
    let client = client(vec![format!("{base}/api/interpreter")], 1);

    let elements = client
        .fetch_candidates(&[QueryFilter::new("natural", "peak")], 1000.0, -33.935, 18.3894)
        .await
        .expect("fetch succeeds");

    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].id, 7);
    let seen = server.await.expect("stub task");
    assert_eq!(seen[0].request_line, "POST /api/interpreter HTTP/1.1");
    assert!(seen[0].body.starts_with("data="), "body was {}", seen[0].body);
    assert!(seen[0].body.contains("timeout%3A20"), "body was {}", seen[0].body);
}

#[rstest]
#[tokio::test]
async fn falls_back_to_the_next_endpoint() {
    let (base, server) = serve(vec![(503, "{}"), (200, PEAK_JSON)]).await;
    let client = client(
        vec![format!("{base}/first/interpreter"), format!("{base}/second/interpreter")],
        1,
    );

    let response = client.run_query("[out:json];out;").await.expect("second endpoint answers");

    assert_eq!(response.elements.len(), 1);
    let seen = server.await.expect("stub task");
    assert!(seen[0].request_line.contains("/first/"));
    assert!(seen[1].request_line.contains("/second/"));
}

#[rstest]
#[tokio::test]
async fn retries_whole_passes_and_reports_the_last_error() {
    let (base, server) = serve(vec![(503, "{}"), (429, "{}")]).await;
    let client = client(vec![format!("{base}/api/interpreter")], 2);

    let err = client.run_query("[out:json];out;").await.expect_err("both passes fail");

    assert!(matches!(err, FetchError::HttpStatus { status: 429, .. }), "got {err:?}");
    assert_eq!(server.await.expect("stub task").len(), 2);
}

#[rstest]
#[tokio::test]
async fn a_later_pass_can_succeed() {
    let (base, server) = serve(vec![(500, "{}"), (200, PEAK_JSON)]).await;
    let client = client(vec![format!("{base}/api/interpreter")], 3);

    let response = client.run_query("[out:json];out;").await.expect("second pass answers");

    assert_eq!(response.elements[0].id, 7);
    assert_eq!(server.await.expect("stub task").len(), 2);
}

#[rstest]
#[tokio::test]
async fn undecodable_bodies_are_not_retried() {
    let (base, server) = serve(vec![(200, "<html>busy</html>")]).await;
    let client = client(vec![format!("{base}/api/interpreter")], 3);

    let err = client.run_query("[out:json];out;").await.expect_err("decode fails");

    assert!(matches!(err, FetchError::Decode { .. }), "got {err:?}");
    assert_eq!(server.await.expect("stub task").len(), 1);
}

#[rstest]
#[tokio::test]
async fn a_body_cut_short_moves_on_to_the_next_endpoint() {
    let (base, server) = serve(vec![
        Reply::Truncated(r#"{"elements""#),
        Reply::Full(200, PEAK_JSON),
    ])
    .await;
    let client = client(
        vec![format!("{base}/first/interpreter"), format!("{base}/second/interpreter")],
        1,
    );

    let response = client.run_query("[out:json];out;").await.expect("second endpoint answers");

    assert_eq!(response.elements[0].id, 7);
    let seen = server.await.expect("stub task");
    assert_eq!(seen.len(), 2);
    assert!(seen[1].request_line.contains("/second/"));
}

#[rstest]
#[tokio::test]
async fn a_body_cut_short_on_every_endpoint_is_a_transport_error() {
    let (base, server) = serve(vec![Reply::Truncated(r#"{"elements""#)]).await;
    let client = client(vec![format!("{base}/api/interpreter")], 1);

    let err = client.run_query("[out:json];out;").await.expect_err("body is incomplete");

    assert!(matches!(err, FetchError::Network { .. }), "got {err:?}");
    assert_eq!(server.await.expect("stub task").len(), 1);
}

use futures::future::join_all;
use provider_harvest::crawler::{build_http_client, FetchResult, Fetcher};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const RESPONSE_DELAY: Duration = Duration::from_millis(200);

/// Records when each request reaches the server, then answers after a delay
struct ArrivalLog {
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for ArrivalLog {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200)
            .set_body_string("<html></html>")
            .set_delay(RESPONSE_DELAY)
    }
}

/// Largest number of requests that arrived within one response delay of
/// each other, i.e. that were being served at the same time
fn peak_in_flight(arrivals: &[Instant]) -> usize {
    // Slightly under the delay so timer jitter cannot merge sequential requests
    let window = RESPONSE_DELAY.mul_f32(0.75);

    arrivals
        .iter()
        .map(|&at| {
            arrivals
                .iter()
                .filter(|&&other| other <= at && at.duration_since(other) < window)
                .count()
        })
        .max()
        .unwrap_or(0)
}

#[tokio::test]
async fn test_in_flight_requests_never_exceed_gate() {
    let mock_server = MockServer::start().await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));

    Mock::given(method("GET"))
        .and(path_regex(r"^/care/provider/\d+$"))
        .respond_with(ArrivalLog {
            arrivals: Arc::clone(&arrivals),
        })
        .mount(&mock_server)
        .await;

    let gate_size = 2;
    let client = build_http_client("TestAgent/1.0", 5).unwrap();
    let fetcher = Fetcher::with_client(client, gate_size);

    let urls: Vec<String> = (0..7)
        .map(|i| format!("{}/care/provider/{}", mock_server.uri(), i))
        .collect();
    let results = join_all(urls.iter().map(|url| fetcher.fetch(url))).await;

    assert!(results.iter().all(FetchResult::is_success));
    assert_eq!(fetcher.available_permits(), gate_size);

    let arrivals = arrivals.lock().unwrap();
    assert_eq!(arrivals.len(), 7);
    let peak = peak_in_flight(&arrivals);
    assert!(
        (1..=gate_size).contains(&peak),
        "peak of {} concurrent requests exceeds gate of {}",
        peak,
        gate_size
    );
}

#[tokio::test]
async fn test_clones_share_one_gate_under_load() {
    let mock_server = MockServer::start().await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));

    Mock::given(method("GET"))
        .and(path_regex(r"^/care/provider/\d+$"))
        .respond_with(ArrivalLog {
            arrivals: Arc::clone(&arrivals),
        })
        .mount(&mock_server)
        .await;

    let client = build_http_client("TestAgent/1.0", 5).unwrap();
    let fetcher = Fetcher::with_client(client, 1);

    // Two "departments" fetching through separate clones
    let crawl = |fetcher: Fetcher, offset: usize| {
        let base = mock_server.uri();
        async move {
            let urls: Vec<String> = (0..3)
                .map(|i| format!("{}/care/provider/{}", base, offset + i))
                .collect();
            join_all(urls.iter().map(|url| fetcher.fetch(url))).await
        }
    };
    let (left, right) = tokio::join!(crawl(fetcher.clone(), 0), crawl(fetcher.clone(), 10));

    assert_eq!(left.len() + right.len(), 6);
    assert_eq!(peak_in_flight(&arrivals.lock().unwrap()), 1);
}

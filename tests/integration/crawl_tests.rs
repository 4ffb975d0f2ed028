use crate::{detail_page, mount_detail, mount_results, results_page, test_config};
use provider_harvest::crawler::Coordinator;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEYWORD: &str = "Physical Therapist";

fn read_output(dir: &std::path::Path) -> Value {
    let content = std::fs::read_to_string(dir.join("providers_data.json"))
        .expect("Failed to read output file");
    serde_json::from_str(&content).expect("Output is not valid JSON")
}

#[tokio::test]
async fn test_flat_crawl_pages_until_empty() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_results(
        &mock_server,
        KEYWORD,
        "0",
        results_page(&[
            ("Dr. Ann Lee", "Physical Therapist", "ann-lee"),
            ("Dr. Bo Chan", "Physical Therapist", "bo-chan"),
        ]),
    )
    .await;
    mount_results(&mock_server, KEYWORD, "18", results_page(&[])).await;

    // Pagination stops at the first empty page
    Mock::given(method("GET"))
        .and(path("/care/search"))
        .and(query_param("start", "36"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_detail(
        &mock_server,
        "ann-lee",
        detail_page(
            "Lakeside Physical Therapy",
            &["555-1111", "555-2222"],
            &["1 Main St, Springfield", "9 Oak Ave, Shelbyville"],
        ),
    )
    .await;
    mount_detail(&mock_server, "bo-chan", detail_page("Harbor Rehab", &["555-3333"], &[])).await;

    let config = test_config(&mock_server.uri(), dir.path(), r#"mode = "flat""#, "");
    let coordinator = Coordinator::new(config, "test-hash").expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.records, 2);
    assert_eq!(report.keywords, 1);
    assert_eq!(report.pages_fetched, 4);
    assert_eq!(report.detail_pages_fetched, 2);
    assert_eq!(report.fetch_failures, 0);

    let output = read_output(dir.path());
    let records = output.as_array().expect("Flat output should be a list");
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["Provider Name"], "Dr. Ann Lee");
    assert_eq!(records[0]["Company Name"], "Lakeside Physical Therapy");
    assert_eq!(records[0]["Number of Locations"], 2);
    assert_eq!(records[0]["Phone Number"], json!(["555-1111", "555-2222"]));
    assert_eq!(
        records[0]["Website Link"],
        format!("{}/care/provider/ann-lee", mock_server.uri())
    );

    assert_eq!(records[1]["Company Name"], "Harbor Rehab");
    assert_eq!(records[1]["Location Addresses"], json!(["N/A"]));
    assert_eq!(records[1]["Number of Locations"], 0);
}

#[tokio::test]
async fn test_failed_detail_fetch_degrades_to_sentinels() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_results(
        &mock_server,
        KEYWORD,
        "0",
        results_page(&[("Dr. Ann Lee", "Physical Therapist", "ann-lee")]),
    )
    .await;
    mount_results(&mock_server, KEYWORD, "18", results_page(&[])).await;

    Mock::given(method("GET"))
        .and(path("/care/provider/ann-lee"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), dir.path(), r#"mode = "flat""#, "");
    let coordinator = Coordinator::new(config, "test-hash").unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.records, 1);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.detail_pages_fetched, 0);

    let output = read_output(dir.path());
    let record = &output[0];
    assert_eq!(record["Provider Name"], "Dr. Ann Lee");
    assert_eq!(record["Company Name"], "Physical Therapist");
    assert_eq!(record["Phone Number"], json!(["N/A"]));
    assert_eq!(record["Location Addresses"], json!(["N/A"]));
    assert_eq!(record["Number of Locations"], 0);
}

#[tokio::test]
async fn test_slow_detail_page_times_out() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_results(
        &mock_server,
        KEYWORD,
        "0",
        results_page(&[("Dr. Ann Lee", "Physical Therapist", "ann-lee")]),
    )
    .await;
    mount_results(&mock_server, KEYWORD, "18", results_page(&[])).await;

    Mock::given(method("GET"))
        .and(path("/care/provider/ann-lee"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page("Too Late Clinic", &["555-9999"], &[]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), dir.path(), r#"mode = "flat""#, "");
    let coordinator = Coordinator::new(config, "test-hash").unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.records, 1);
    assert_eq!(report.fetch_failures, 1);

    let output = read_output(dir.path());
    assert_eq!(output[0]["Company Name"], "Physical Therapist");
    assert_eq!(output[0]["Phone Number"], json!(["N/A"]));
}

#[tokio::test]
async fn test_failed_search_page_ends_keyword() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/care/search"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/care/search"))
        .and(query_param("start", "18"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server.uri(), dir.path(), r#"mode = "flat""#, "");
    let coordinator = Coordinator::new(config, "test-hash").unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.records, 0);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(read_output(dir.path()), json!([]));
}

#[tokio::test]
async fn test_departments_discovered_from_navigation() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/care/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><body><nav>
                    <a href="/care/pt">Physical Therapists</a>
                    <a href="/care/chiro">Chiropractors</a>
                    <a href="/care/chiro">Chiropractors</a>
                    <a href="/care/">Browse</a>
                    <a href="/">Back</a>
                    </nav></body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_results(
        &mock_server,
        "Physical Therapist",
        "0",
        results_page(&[("Dr. Ann Lee", "Physical Therapist", "ann-lee")]),
    )
    .await;
    mount_results(&mock_server, "Physical Therapist", "18", results_page(&[])).await;

    mount_results(
        &mock_server,
        "Chiropractor",
        "0",
        results_page(&[
            ("Dr. Cy Park", "Chiropractor", "cy-park"),
            ("Dr. Di Ross", "Chiropractor", "di-ross"),
        ]),
    )
    .await;
    mount_results(&mock_server, "Chiropractor", "18", results_page(&[])).await;

    mount_detail(&mock_server, "ann-lee", detail_page("Lakeside PT", &["555-1111"], &["1 Main St"])).await;
    mount_detail(&mock_server, "cy-park", detail_page("Spine Works", &["555-2222"], &["2 Elm St"])).await;
    mount_detail(&mock_server, "di-ross", detail_page("Spine Works", &["555-3333"], &["3 Elm St"])).await;

    let config = test_config(&mock_server.uri(), dir.path(), "", "");
    let coordinator = Coordinator::new(config, "test-hash").unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.keywords, 2);
    assert_eq!(report.records, 3);

    let output = read_output(dir.path());
    let groups = output.as_object().expect("Department output should be a map");
    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Chiropractor", "Physical Therapist"]);

    assert_eq!(groups["Chiropractor"].as_array().unwrap().len(), 2);
    assert_eq!(groups["Physical Therapist"][0]["Company Name"], "Lakeside PT");
}

#[tokio::test]
async fn test_configured_keywords_skip_navigation() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/care/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_results(
        &mock_server,
        "Dentist",
        "0",
        results_page(&[("Dr. Ed Wu", "Dentist", "ed-wu")]),
    )
    .await;
    mount_results(&mock_server, "Dentist", "18", results_page(&[])).await;
    mount_detail(&mock_server, "ed-wu", detail_page("Bright Smiles", &["555-4444"], &["4 Pine St"])).await;

    let config = test_config(
        &mock_server.uri(),
        dir.path(),
        "",
        r#"keywords = ["Dentists", "Dentist"]"#,
    );
    let coordinator = Coordinator::new(config, "test-hash").unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.keywords, 1);
    let output = read_output(dir.path());
    assert_eq!(output["Dentist"][0]["Company Name"], "Bright Smiles");
}

#[tokio::test]
async fn test_max_results_stops_paging() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    mount_results(
        &mock_server,
        KEYWORD,
        "0",
        results_page(&[("Dr. Ann Lee", "Physical Therapist", "ann-lee")]),
    )
    .await;
    mount_detail(&mock_server, "ann-lee", detail_page("Lakeside PT", &["555-1111"], &[])).await;

    Mock::given(method("GET"))
        .and(path("/care/search"))
        .and(query_param("start", "18"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(
        &mock_server.uri(),
        dir.path(),
        "mode = \"flat\"\nmax-results = 18",
        "",
    );
    let coordinator = Coordinator::new(config, "test-hash").unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.records, 1);
    assert_eq!(report.pages_fetched, 2);
}

#[tokio::test]
async fn test_path_relative_links_resolve_against_search_page() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let page = results_page(&[("Dr. Jane Doe", "Physical Therapist", "jane-doe")])
        .replace("/care/provider/jane-doe", "provider/jane-doe");
    mount_results(&mock_server, KEYWORD, "0", page).await;
    mount_results(&mock_server, KEYWORD, "18", results_page(&[])).await;
    mount_detail(&mock_server, "jane-doe", detail_page("Doe Rehab", &["555-7777"], &[])).await;

    let config = test_config(&mock_server.uri(), dir.path(), r#"mode = "flat""#, "");
    let coordinator = Coordinator::new(config, "test-hash").unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.detail_pages_fetched, 1);

    let output = read_output(dir.path());
    assert_eq!(
        output[0]["Website Link"],
        format!("{}/care/provider/jane-doe", mock_server.uri())
    );
    assert_eq!(output[0]["Company Name"], "Doe Rehab");
}

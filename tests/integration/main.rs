//! End-to-end tests against a mock provider directory

mod crawl_tests;
mod fetch_tests;

use provider_harvest::config::{parse_config, Config};
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a config pointed at the mock server, writing into `dir`
pub fn test_config(base_url: &str, dir: &Path, extra_crawler: &str, extra_departments: &str) -> Config {
    let toml = format!(
        r#"
[crawler]
max-concurrent-requests = 4
request-timeout-secs = 1
page-size = 18
{extra_crawler}

[site]
base-url = "{base_url}"

[departments]
{extra_departments}

[output]
json-path = "{json}"

[database]
path = "{db}"
"#,
        extra_crawler = extra_crawler,
        base_url = base_url,
        extra_departments = extra_departments,
        json = dir.join("providers_data.json").display(),
        db = dir.join("providers.db").display(),
    );

    parse_config(&toml).expect("Failed to parse test config")
}

/// Renders a results page with one card per `(name, specialty, slug)`
pub fn results_page(cards: &[(&str, &str, &str)]) -> String {
    let mut html = String::from("<html><body><section class=\"search-results\">");
    for (name, specialty, slug) in cards {
        html.push_str(&format!(
            r#"<article class="search-results__providers-provider">
                <h3 class="provider-name">{name}</h3>
                <p class="provider-specialty">{specialty}</p>
                <a class="article-link" href="/care/provider/{slug}">View profile</a>
            </article>"#,
            name = name,
            specialty = specialty,
            slug = slug,
        ));
    }
    html.push_str("</section></body></html>");
    html
}

/// Renders a provider detail page
pub fn detail_page(practice: &str, phones: &[&str], addresses: &[&str]) -> String {
    let mut html = format!(
        r#"<html><body><h1 class="practice-name">{}</h1>"#,
        practice
    );
    for phone in phones {
        html.push_str(&format!(r#"<button data-phone="{}">Call</button>"#, phone));
    }
    for address in addresses {
        html.push_str(&format!(r#"<p class="practice-address">{}</p>"#, address));
    }
    html.push_str("</body></html>");
    html
}

/// Mounts a results page for `keyword` at offset `start`
pub async fn mount_results(server: &MockServer, keyword: &str, start: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/care/search"))
        .and(query_param("keyword", keyword))
        .and(query_param("start", start))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a detail page under `/care/provider/{slug}`
pub async fn mount_detail(server: &MockServer, slug: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/care/provider/{}", slug)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

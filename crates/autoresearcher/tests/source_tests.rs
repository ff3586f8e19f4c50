//! Paper source tests: Semantic Scholar search, manual documents and paper files.

mod common;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use autoresearcher::client::SemanticScholarClient;
use autoresearcher::config::Config;
use autoresearcher::error::{ClientError, PipelineError, Stage};
use autoresearcher::models::{ModelTier, Paper};
use autoresearcher::pipeline::KeywordGenerator;
use autoresearcher::services::PaperSource;
use autoresearcher::sources::{self, ManualDocument, SemanticScholarSource};

use common::FakeCompletion;

const KEYWORDS: &str = "KeywordCombination: AI,healthcare\nKeywordCombination: machine learning,diagnosis";

fn search_body(papers: &[(&str, i32)]) -> serde_json::Value {
    let data: Vec<serde_json::Value> = papers
        .iter()
        .map(|(id, citations)| {
            serde_json::json!({
                "paperId": id,
                "title": format!("Paper {id}"),
                "abstract": format!("Abstract of {id}"),
                "url": format!("https://www.semanticscholar.org/paper/{id}"),
                "year": 2020,
                "citationCount": citations,
                "externalIds": {"DOI": format!("10.1/{id}")}
            })
        })
        .collect();
    serde_json::json!({"total": data.len(), "offset": 0, "data": data})
}

async fn mount_search(mock_server: &MockServer, query: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .and(query_param("query", query))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(mock_server)
        .await;
}

fn setup_source(mock_server: &MockServer, keywords: &'static str) -> SemanticScholarSource {
    let config = Config::for_testing(&mock_server.uri());
    let client = SemanticScholarClient::new(&config).unwrap();
    let completion = FakeCompletion::new(move |_| Ok(keywords.to_string()));
    SemanticScholarSource::new(&config, client, KeywordGenerator::new(completion))
}

fn ids(papers: &[Paper]) -> Vec<&str> {
    papers.iter().map(|p| p.paper_id.as_str()).collect()
}

// =============================================================================
// Semantic Scholar Source
// =============================================================================

#[tokio::test]
async fn test_fetch_merges_dedups_and_ranks() {
    let mock_server = MockServer::start().await;
    let question = "What is the impact of AI on healthcare?";

    mount_search(&mock_server, question, 200, search_body(&[("a", 10), ("b", 300)])).await;
    mount_search(&mock_server, "AI healthcare", 200, search_body(&[("b", 300), ("c", 50)])).await;
    mount_search(&mock_server, "machine learning diagnosis", 200, search_body(&[("d", 1000)]))
        .await;

    let source = setup_source(&mock_server, KEYWORDS);
    let papers = source.fetch_papers(question).await.unwrap();

    assert_eq!(ids(&papers), vec!["d", "b", "c", "a"]);
    assert_eq!(papers[0].doi(), Some("10.1/d"));
}

#[tokio::test]
async fn test_fetch_sends_year_range_and_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .and(query_param("year", "2000-2023"))
        .and(query_param("limit", "100"))
        .and(query_param("fields", "paperId,title,abstract,url,year,citationCount,externalIds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[("a", 1)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let source = setup_source(&mock_server, "no labelled lines");
    let papers = source.fetch_papers("q").await.unwrap();

    assert_eq!(ids(&papers), vec!["a"]);
}

#[tokio::test]
async fn test_fetch_keeps_top_twenty() {
    let mock_server = MockServer::start().await;

    let many: Vec<(String, i32)> = (0..30).map(|i| (format!("p{i:02}"), i)).collect();
    let many: Vec<(&str, i32)> = many.iter().map(|(id, c)| (id.as_str(), *c)).collect();
    mount_search(&mock_server, "q", 200, search_body(&many)).await;

    let source = setup_source(&mock_server, "");
    let papers = source.fetch_papers("q").await.unwrap();

    assert_eq!(papers.len(), 20);
    assert_eq!(papers[0].paper_id, "p29");
    assert_eq!(papers[19].paper_id, "p10");
}

#[tokio::test]
async fn test_failed_keyword_query_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_search(&mock_server, "q", 200, search_body(&[("a", 5)])).await;
    mount_search(&mock_server, "AI healthcare", 500, serde_json::json!({"error": "boom"})).await;
    mount_search(&mock_server, "machine learning diagnosis", 200, search_body(&[("b", 9)])).await;

    let source = setup_source(&mock_server, KEYWORDS);
    let papers = source.fetch_papers("q").await.unwrap();

    assert_eq!(ids(&papers), vec!["b", "a"]);
}

#[tokio::test]
async fn test_failed_question_query_is_error() {
    let mock_server = MockServer::start().await;

    mount_search(&mock_server, "q", 400, serde_json::json!({"error": "bad query"})).await;

    let source = setup_source(&mock_server, "");
    let err = source.fetch_papers("q").await.unwrap_err();

    assert!(matches!(err, PipelineError::PaperSource(ClientError::BadRequest { .. })));
}

#[tokio::test]
async fn test_keyword_failure_is_error() {
    let mock_server = MockServer::start().await;
    let config = Config::for_testing(&mock_server.uri());
    let client = SemanticScholarClient::new(&config).unwrap();
    let completion = FakeCompletion::new(|_| Err(ClientError::unauthorized("bad key")));
    let source = SemanticScholarSource::new(&config, client, KeywordGenerator::new(completion));

    let err = source.fetch_papers("q").await.unwrap_err();

    assert!(matches!(err, PipelineError::Completion { stage: Stage::Keywords, .. }));
}

#[tokio::test]
async fn test_keyword_request_parameters() {
    let completion = FakeCompletion::new(|_| Ok(KEYWORDS.to_string()));
    let generator = KeywordGenerator::new(completion.clone());

    let combinations = generator.generate("AI in healthcare").await.unwrap();

    assert_eq!(combinations, vec!["AI,healthcare", "machine learning,diagnosis"]);
    let request = &completion.requests()[0];
    assert_eq!(request.tier, ModelTier::Default);
    assert_eq!(request.max_tokens, 200);
    assert!(request.prompt.contains("AI in healthcare"));
}

// =============================================================================
// Manual Documents
// =============================================================================

#[test]
fn test_manual_document_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("study.txt");
    std::fs::write(&file, "My Study\nAbstract\nWe measured things.\u{c}Page two").unwrap();

    let paper = ManualDocument::read(&file).unwrap().into_paper();

    assert_eq!(paper.url, "study.txt");
    assert_eq!(paper.title_or_default(), "study.txt");
    assert_eq!(paper.abstract_text(), "Abstract\nWe measured things.");
    assert_eq!(paper.doi(), None);
}

#[test]
fn test_manual_document_without_abstract() {
    let paper = ManualDocument::new("notes.txt", "Just some notes").into_paper();
    assert_eq!(paper.abstract_text(), "");
    assert_eq!(paper.fallback_citation(), "notes.txt");
}

#[test]
fn test_manual_document_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ManualDocument::read(&dir.path().join("absent.txt")).is_err());
}

// =============================================================================
// Paper Files
// =============================================================================

#[test]
fn test_write_then_read_papers() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("nested").join("papers.json");
    let papers = vec![
        common::paper_with_doi("One", "first", "10.1/one"),
        common::paper_without_doi("Two", "second", "https://example.org/two"),
    ];

    sources::write_papers(&file, &papers).unwrap();
    let loaded = sources::read_papers(&file).unwrap();

    assert_eq!(loaded, papers);
}

#[test]
fn test_read_papers_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = sources::read_papers(&dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_read_papers_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("papers.json");
    std::fs::write(&file, "{not json").unwrap();
    assert!(sources::read_papers(&file).is_err());
}

#[test]
fn test_read_papers_accepts_null_url() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("papers.json");
    std::fs::write(&file, r#"[{"paperId": "x", "title": "T", "url": null}]"#).unwrap();

    let papers = sources::read_papers(&file).unwrap();

    assert_eq!(papers[0].url, "");
    assert_eq!(papers[0].fallback_citation(), "T");
}

use std::path::{Path, PathBuf};
use std::sync::Once;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use writer_app::format_cli::{self, FormatArgs};
use writer_app::publish_cli::{self, PublishArgs};
use writer_app::{log_destination, parse_args};
use writer_core::Platform;
use writer_engine::{PublishError, PulldownRenderer};
use writer_logging::LogDestination;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(writer_logging::initialize_for_tests);
}

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn publish_args(extra: &[&str]) -> PublishArgs {
    let mut argv = vec![
        "publish_wechat",
        "--article",
        "article.html",
        "--title",
        "标题",
        "--cover",
        "cover.jpg",
    ];
    argv.extend_from_slice(extra);
    parse_args(argv).unwrap()
}

#[test]
fn format_defaults_match_documented_values() {
    let args: FormatArgs = parse_args(["format_article", "-a", "post.md"]).unwrap();
    assert_eq!(args.platform, Platform::Wechat);
    assert_eq!(args.theme, "rose");
    assert_eq!(args.code_theme, "monokai");
    assert_eq!(args.output_dir, PathBuf::from("output"));
    assert!(!args.list_themes);
}

#[test]
fn log_file_adds_a_file_logger_next_to_the_terminal() {
    assert_eq!(log_destination(None), LogDestination::Terminal);
    assert_eq!(
        log_destination(Some(PathBuf::from("run.log"))),
        LogDestination::Both(PathBuf::from("run.log"))
    );
}

#[test]
fn unknown_platform_is_a_usage_error() {
    let result = parse_args::<FormatArgs, _, _>(["format_article", "-p", "medium"]);
    assert!(result.is_err());
}

#[test]
fn publish_defaults_and_flags() {
    let args = publish_args(&["--app-id", "id", "--app-secret", "secret"]);
    assert_eq!(args.author, "技术编辑");
    assert_eq!(args.open_comment, 0);
    assert_eq!(args.fans_only, 0);
    assert!(!args.dry_run);

    let request = args.to_request();
    assert!(!request.open_comment);
    assert!(request.upload_inline_images);
    assert_eq!(request.source_url, "");
    assert!(request.digest.is_none());
}

#[test]
fn comment_flags_reject_values_outside_zero_and_one() {
    let argv = [
        "publish_wechat",
        "--article",
        "a.html",
        "--title",
        "t",
        "--cover",
        "c.jpg",
        "--open-comment",
        "2",
    ];
    assert!(parse_args::<PublishArgs, _, _>(argv).is_err());
}

#[test]
fn list_themes_prints_both_catalogs() {
    init_logging();
    let args: FormatArgs = parse_args(["format_article", "--list-themes"]).unwrap();
    let mut out = Vec::new();
    format_cli::run(&args, &PulldownRenderer, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Article Themes:"));
    assert!(text.contains("  - rose: "));
    assert!(text.contains("Code Themes:"));
    assert!(text.contains("  - monokai: "));
}

#[test]
fn format_without_article_is_rejected() {
    init_logging();
    let args: FormatArgs = parse_args(["format_article"]).unwrap();
    let err = format_cli::run(&args, &PulldownRenderer, &mut Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Please specify article path with --article");
}

#[test]
fn format_reports_generated_path() {
    init_logging();
    let temp = tempfile::TempDir::new().unwrap();
    let article = write_file(temp.path(), "notes.md", b"# Notes\n\nbody\n");
    let output = temp.path().join("out");
    let args: FormatArgs = parse_args([
        "format_article",
        "-a",
        article.to_str().unwrap(),
        "-p",
        "juejin",
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let mut out = Vec::new();
    format_cli::run(&args, &PulldownRenderer, &mut out).unwrap();

    let expected = output.join("notes_juejin.html");
    assert!(expected.is_file());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("SUCCESS: Article formatted: {}\n", expected.display())
    );
}

#[tokio::test]
async fn blank_credentials_fail_before_any_request() {
    init_logging();
    let args = publish_args(&["--app-id", "", "--app-secret", "secret"]);
    let err = publish_cli::run(&args, &mut Vec::new()).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PublishError>(),
        Some(PublishError::MissingCredentials)
    ));
}

#[tokio::test]
async fn dry_run_prints_summary_against_mock_api() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "T", "expires_in": 7200})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/material/add_material"))
        .and(query_param("access_token", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"media_id": "thumb-9"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/draft/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"media_id": "never"})))
        .expect(0)
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let article = write_file(temp.path(), "article.html", "<p>短文</p>".as_bytes());
    let cover = write_file(temp.path(), "cover.jpg", b"jpeg");
    let uri = server.uri();
    let args: PublishArgs = parse_args([
        "publish_wechat",
        "--article",
        article.to_str().unwrap(),
        "--title",
        "标题",
        "--cover",
        cover.to_str().unwrap(),
        "--app-id",
        "id",
        "--app-secret",
        "secret",
        "--api-base",
        uri.as_str(),
        "--dry-run",
    ])
    .unwrap();

    let mut out = Vec::new();
    publish_cli::run(&args, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Dry run completed. Would publish:"));
    assert!(text.contains("  Title: 标题"));
    assert!(text.contains("  Author: 技术编辑"));
    assert!(text.contains("  Digest: 短文"));
    assert!(text.contains("  Cover: thumb-9"));
    assert!(text.contains("  Content length: 9 chars"));
}

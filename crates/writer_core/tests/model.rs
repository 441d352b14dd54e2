use std::str::FromStr;

use pretty_assertions::assert_eq;
use writer_core::{DraftArticle, DraftHandle, PipelineStage, Platform, PlatformError};

fn sample_draft() -> DraftArticle {
    DraftArticle {
        title: "标题 Title".to_string(),
        author: "技术编辑".to_string(),
        digest: "摘要".to_string(),
        content: "<p>正文</p>".to_string(),
        content_source_url: String::new(),
        thumb_media_id: "thumb-1".to_string(),
        need_open_comment: true,
        only_fans_can_comment: false,
    }
}

#[test]
fn draft_body_wraps_single_article_and_keeps_non_ascii() {
    let body = sample_draft().to_request_body().unwrap();
    let text = String::from_utf8(body.clone()).unwrap();
    assert!(text.contains("标题 Title"));
    assert!(!text.contains("\\u"));

    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let articles = value["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["thumb_media_id"], "thumb-1");
    assert_eq!(articles[0]["need_open_comment"], 1);
    assert_eq!(articles[0]["only_fans_can_comment"], 0);
    assert_eq!(articles[0]["content_source_url"], "");
}

#[test]
fn draft_handle_displays_raw_id() {
    let handle = DraftHandle("draft-42".to_string());
    assert_eq!(handle.to_string(), "draft-42");
    assert_eq!(handle.as_str(), "draft-42");
}

#[test]
fn stages_advance_linearly() {
    let mut stage = PipelineStage::default();
    assert_eq!(stage, PipelineStage::NoToken);
    for next in [
        PipelineStage::TokenCached,
        PipelineStage::CoverUploaded,
        PipelineStage::DraftCreated,
        PipelineStage::Published,
        PipelineStage::StatusChecked,
    ] {
        stage.advance(next).unwrap();
    }
    assert_eq!(stage.next(), None);
}

#[test]
fn skipping_a_stage_is_rejected() {
    let mut stage = PipelineStage::TokenCached;
    let err = stage.advance(PipelineStage::Published).unwrap_err();
    assert_eq!(err.from, PipelineStage::TokenCached);
    assert_eq!(stage, PipelineStage::TokenCached);
}

#[test]
fn platform_parses_known_names_only() {
    assert_eq!(Platform::from_str("wechat"), Ok(Platform::Wechat));
    assert_eq!(Platform::from_str("zhihu"), Ok(Platform::Zhihu));
    assert_eq!(Platform::from_str("juejin"), Ok(Platform::Juejin));
    assert_eq!(
        Platform::from_str("medium"),
        Err(PlatformError("medium".to_string()))
    );
}

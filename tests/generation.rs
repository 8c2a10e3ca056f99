//! Generation Pipeline Integration Tests
//!
//! Drives the generation client against a scripted backend to check the
//! all-or-nothing contract and the hand-off to the library store.

use std::sync::{Arc, Mutex};

use alurio::adapters::{BackendError, GenerationRequest, GenerativeBackend};
use alurio::core::{ContentGenerator, ModelSelection};
use alurio::domain::{ContentStatus, ImageAttachment, ItemKind, Profile, ScriptLength};
use alurio::error::GenerationError;
use alurio::library::{LibraryFilter, LibraryStore, MemoryStore};
use async_trait::async_trait;
use serde_json::json;
use tokio_test::assert_err;

/// Backend that replays a fixed answer and records every request
struct ScriptedBackend {
    answer: Result<String, (Option<u16>, String)>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    fn replying(body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(body.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Self::answering_status(None, message)
    }

    fn answering_status(status: Option<u16>, message: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err((status, message.to_string())),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.answer {
            Ok(body) => Ok(body.clone()),
            Err((None, message)) => Err(anyhow::anyhow!("{}", message)),
            Err((status, message)) => Err(BackendError::new(*status, message.clone()).into()),
        }
    }
}

fn models() -> ModelSelection {
    ModelSelection {
        script_model: "script-model".to_string(),
        post_model: "post-model".to_string(),
    }
}

fn generator(backend: Arc<ScriptedBackend>) -> ContentGenerator {
    ContentGenerator::new(backend, models())
}

fn profile() -> Profile {
    Profile::new(
        "Ana",
        "Produtividade",
        "Construir autoridade",
        "Educativo",
    )
}

fn segment(text: &str) -> serde_json::Value {
    json!({ "text": text, "action": format!("Ação para {}", text) })
}

fn script_response() -> serde_json::Value {
    json!({
        "title": "5 erros de produtividade que te travam",
        "hook": segment("Você ainda faz isso?"),
        "development": [segment("Erro 1"), segment("Erro 2"), segment("Erro 3")],
        "cta": segment("Salve para não esquecer"),
        "tips": ["Luz natural", "Fale devagar", "Grave em 4K", "Use legenda"],
        "reachTips": ["Poste às 18h", "Responda comentários", "Use áudio em alta"],
        "nextThemes": [
            { "title": "Rotina matinal", "reasoning": "Continua o tema" },
            { "title": "Deep work", "reasoning": "Alta busca" }
        ],
        "durationSeconds": 50
    })
}

fn post_response(slides: Option<serde_json::Value>) -> serde_json::Value {
    let mut body = json!({
        "title": "Escritório minimalista",
        "caption": "Menos é mais.",
        "hashtags": ["#foco", "#minimalismo"],
        "musicSuggestions": ["Lo-fi"],
        "nextImageTips": ["Foto da mesa"]
    });
    if let Some(slides) = slides {
        body["slides"] = slides;
    }
    body
}

fn slide(n: u32) -> serde_json::Value {
    json!({ "slideNumber": n, "text": format!("Slide {}", n), "visualAdvice": "Texto grande" })
}

fn image(tag: &[u8]) -> ImageAttachment {
    ImageAttachment::from_bytes("image/jpeg", tag)
}

#[tokio::test]
async fn test_end_to_end_script_then_save_then_filter() {
    let backend = ScriptedBackend::replying(script_response().to_string());
    let script = generator(backend.clone())
        .generate_script("5 erros de produtividade", &profile(), ScriptLength::Medium)
        .await
        .unwrap();

    assert_eq!(script.development_blocks.len(), 3);
    assert_eq!(script.recording_tips.len(), 4);
    assert_eq!(script.reach_tips.len(), 3);
    assert_eq!(script.next_themes.len(), 2);
    assert_eq!(script.duration_seconds, 50);
    assert_eq!(script.status, ContentStatus::Ready);
    assert!(!script.is_used);
    assert_eq!(script.requested_length, ScriptLength::Medium);

    let requests = backend.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "script-model");
    assert!(requests[0].images.is_empty());
    assert!(requests[0].prompt.contains("5 erros de produtividade"));
    assert!(requests[0].prompt.contains("Produtividade"));

    let mut library = LibraryStore::load(MemoryStore::new());
    library.save(script.clone()).unwrap();
    library.save(script.clone()).unwrap();

    let hits = library.filter(
        &LibraryFilter::default()
            .kind(ItemKind::Script)
            .search("5 erros"),
    );
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id(), &script.id);
}

#[tokio::test]
async fn test_script_accepts_fenced_json() {
    let fenced = format!("```json\n{}\n```", script_response());
    let script = generator(ScriptedBackend::replying(fenced))
        .generate_script("Rotina", &profile(), ScriptLength::Short)
        .await
        .unwrap();

    assert_eq!(script.title, "5 erros de produtividade que te travam");
}

#[tokio::test]
async fn test_missing_cta_is_schema_violation() {
    let mut body = script_response();
    body.as_object_mut().unwrap().remove("cta");

    let err = generator(ScriptedBackend::replying(body.to_string()))
        .generate_script("Rotina", &profile(), ScriptLength::Medium)
        .await
        .unwrap_err();

    match err {
        GenerationError::SchemaViolation { fields } => assert_eq!(fields, vec!["cta"]),
        other => panic!("expected SchemaViolation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_violations_name_every_field() {
    let mut body = script_response();
    body["hook"] = json!({ "text": "Sem ação" });
    body.as_object_mut().unwrap().remove("tips");

    let err = generator(ScriptedBackend::replying(body.to_string()))
        .generate_script("Rotina", &profile(), ScriptLength::Medium)
        .await
        .unwrap_err();

    let GenerationError::SchemaViolation { fields } = err else {
        panic!("expected SchemaViolation");
    };
    assert!(fields.contains(&"hook.action".to_string()));
    assert!(fields.contains(&"tips".to_string()));
}

#[tokio::test]
async fn test_malformed_json() {
    let result = generator(ScriptedBackend::replying("Desculpe, não consegui."))
        .generate_script("Rotina", &profile(), ScriptLength::Medium)
        .await;
    let err = assert_err!(result);

    assert!(matches!(err, GenerationError::MalformedResponse(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_backend_failure_is_retryable_service_error() {
    let err = generator(ScriptedBackend::failing("quota exceeded"))
        .generate_script("Rotina", &profile(), ScriptLength::Medium)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::ServiceUnavailable(_)));
    assert!(err.is_retryable());
    assert!(err.to_string().contains("quota exceeded"));
}

#[tokio::test]
async fn test_invalid_argument_status_is_not_retryable() {
    let err = generator(ScriptedBackend::answering_status(
        Some(400),
        "Gemini error (400 Bad Request): INVALID_ARGUMENT Unknown name \"responseSchema\"",
    ))
    .generate_script("Rotina", &profile(), ScriptLength::Medium)
    .await
    .unwrap_err();

    assert!(matches!(err, GenerationError::Rejected(_)));
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("INVALID_ARGUMENT"));
}

#[tokio::test]
async fn test_quota_and_server_statuses_stay_retryable() {
    for status in [401, 403, 429, 500, 503] {
        let err = generator(ScriptedBackend::answering_status(Some(status), "try later"))
            .generate_script("Rotina", &profile(), ScriptLength::Medium)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::ServiceUnavailable(_)), "{}", status);
        assert!(err.is_retryable());
    }
}

#[tokio::test]
async fn test_empty_topic_never_reaches_backend() {
    let backend = ScriptedBackend::replying(script_response().to_string());
    let err = generator(backend.clone())
        .generate_script("   ", &profile(), ScriptLength::Medium)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidRequest(_)));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_carousel_without_slides_is_schema_violation() {
    for slides in [Some(json!([])), None] {
        let body = post_response(slides);
        let err = generator(ScriptedBackend::replying(body.to_string()))
            .generate_from_images(&[image(b"1"), image(b"2")], &profile(), "", true)
            .await
            .unwrap_err();

        match err {
            GenerationError::SchemaViolation { fields } => {
                assert_eq!(fields, vec!["slides"])
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_single_post_drops_returned_slides() {
    let body = post_response(Some(json!([slide(1), slide(2)])));
    let only = image(b"only");

    let post = generator(ScriptedBackend::replying(body.to_string()))
        .generate_from_images(&[only.clone()], &profile(), "Meu escritório", false)
        .await
        .unwrap();

    assert!(!post.is_carousel);
    assert!(post.slides.is_empty());
    assert_eq!(post.primary_image, only);
    assert_eq!(post.all_images, vec![only]);
    assert_eq!(post.hashtags, vec!["#foco", "#minimalismo"]);
}

#[tokio::test]
async fn test_carousel_slides_sorted_and_primary_is_first_image() {
    let body = post_response(Some(json!([slide(2), slide(3), slide(1)])));
    let images = vec![image(b"a"), image(b"b"), image(b"c")];
    let backend = ScriptedBackend::replying(body.to_string());

    let post = generator(backend.clone())
        .generate_from_images(&images, &profile(), "", true)
        .await
        .unwrap();

    let numbers: Vec<u32> = post.slides.iter().map(|s| s.slide_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(post.primary_image, images[0]);
    assert_eq!(post.all_images, images);

    let requests = backend.requests.lock().unwrap();
    assert_eq!(requests[0].model, "post-model");
    assert_eq!(requests[0].images, images);
}

#[tokio::test]
async fn test_request_declares_the_derived_schema() {
    let body = post_response(Some(json!([slide(1), slide(2)])));
    let backend = ScriptedBackend::replying(body.to_string());
    generator(backend.clone())
        .generate_from_images(&[image(b"a"), image(b"b")], &profile(), "", true)
        .await
        .unwrap();

    let requests = backend.requests.lock().unwrap();
    let schema = &requests[0].response_schema;
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["slides"]["minItems"], 1);
    assert!(schema["required"]
        .as_array()
        .unwrap()
        .contains(&json!("musicSuggestions")));
}

#[tokio::test]
async fn test_slide_number_out_of_range_is_schema_violation() {
    let body = post_response(Some(json!([slide(1), slide(11)])));
    let err = generator(ScriptedBackend::replying(body.to_string()))
        .generate_from_images(&[image(b"a"), image(b"b")], &profile(), "", true)
        .await
        .unwrap_err();

    let GenerationError::SchemaViolation { fields } = err else {
        panic!("expected SchemaViolation");
    };
    assert_eq!(fields, vec!["slides[1].slideNumber"]);
}

#[tokio::test]
async fn test_carousel_with_gap_is_schema_violation() {
    let body = post_response(Some(json!([slide(1), slide(3)])));
    let err = generator(ScriptedBackend::replying(body.to_string()))
        .generate_from_images(&[image(b"a"), image(b"b")], &profile(), "", true)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::SchemaViolation { .. }));
}

#[tokio::test]
async fn test_single_post_with_several_images_is_rejected_locally() {
    let backend = ScriptedBackend::replying(post_response(None).to_string());
    let err = generator(backend.clone())
        .generate_from_images(&[image(b"a"), image(b"b")], &profile(), "", false)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidRequest(_)));
    assert_eq!(backend.request_count(), 0);
}

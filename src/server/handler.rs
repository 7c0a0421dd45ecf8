use actix_web::{http::Method, web, HttpRequest, HttpResponse, ResponseError};
use futures::StreamExt;
use uuid::Uuid;

use crate::{
    error::{ProxyError, Result},
    logger,
    models::{ImageGenerationRequest, ImageGenerationResponse},
    server::{cors, AppState},
};

pub async fn generate_image(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return cors::preflight();
    }

    let request_id = Uuid::new_v4().to_string();

    match process(req.method(), payload, &state, &request_id).await {
        Ok(response) => cors::with_cors(HttpResponse::Ok()).json(response),
        Err(err) => {
            if err.is_client_error() {
                log::warn!("[req:{}] Rejected request: {}", request_id, err);
            } else {
                log::error!("[req:{}] Image generation error: {}", request_id, err);
            }
            err.error_response()
        }
    }
}

async fn process(
    method: &Method,
    payload: web::Payload,
    state: &AppState,
    request_id: &str,
) -> Result<ImageGenerationResponse> {
    if method != Method::POST {
        return Err(ProxyError::MethodNotAllowed);
    }

    let body = read_body(payload, state.config.max_body_bytes).await?;
    let request = ImageGenerationRequest::from_body(&body);
    let (prompt, model_id) = required_fields(&request, state.config.default_model.as_deref())?;

    let api_key = state
        .config
        .api_key()
        .ok_or_else(|| ProxyError::Config("Hugging Face API key not configured".into()))?;

    let model = state
        .catalog
        .resolve(model_id)
        .ok_or_else(|| ProxyError::UnknownModel(model_id.to_string()))?;

    log::info!(
        "[req:{}] Forwarding prompt ({} chars) to {}",
        request_id,
        prompt.chars().count(),
        model.id
    );

    let mut timer = logger::timer(&format!("[req:{}] {} inference", request_id, model.id));
    let image = state.generator.generate(model, prompt, api_key).await?;
    timer.stop();

    Ok(ImageGenerationResponse::from_image_bytes(&image))
}

/// Collects the request body, refusing to buffer more than `limit` bytes.
async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| ProxyError::Payload(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(ProxyError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Returns the prompt and the model id to use, falling back to the
/// configured default model when the caller sent none.
fn required_fields<'a>(
    request: &'a ImageGenerationRequest,
    default_model: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    let model_id = request.model_id().or(default_model);

    match (request.prompt(), model_id) {
        (Some(prompt), Some(model_id)) => Ok((prompt, model_id)),
        _ if default_model.is_some() => Err(ProxyError::MissingFields("prompt".into())),
        _ => Err(ProxyError::MissingFields("prompt or modelId".into())),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use actix_web::{http::StatusCode, test as actix_test, App};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        config::{Config, HuggingFaceConfig},
        huggingface::{ImageGenerator, ModelConfig},
        server::{configure, GENERATE_IMAGE_PATH},
    };

    #[derive(Default)]
    struct FakeGenerator {
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ImageGenerator for FakeGenerator {
        async fn generate(&self, model: &ModelConfig, prompt: &str, _api_key: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut seen) = self.seen.lock() {
                seen.push((model.id.clone(), prompt.to_string()));
            }
            Ok(vec![0xFF, 0xD8, 0xFF])
        }
    }

    fn state(config: Config, generator: Arc<FakeGenerator>) -> web::Data<AppState> {
        web::Data::new(AppState::new(config, generator))
    }

    fn keyed() -> Config {
        Config::new().with_huggingface(HuggingFaceConfig::new().with_api_key("hf_test"))
    }

    #[test]
    fn fields_required_without_default_model() {
        let req = ImageGenerationRequest {
            prompt: Some("a cat".into()),
            model_id: None,
        };
        let err = required_fields(&req, None).unwrap_err();
        assert_eq!(err.to_string(), "Missing prompt or modelId in request body");
    }

    #[test]
    fn default_model_fills_in_missing_id() {
        let req = ImageGenerationRequest {
            prompt: Some("a cat".into()),
            model_id: None,
        };
        assert_eq!(
            required_fields(&req, Some("hf-sdxl-base")).unwrap(),
            ("a cat", "hf-sdxl-base")
        );

        let req = ImageGenerationRequest {
            prompt: Some("a cat".into()),
            model_id: Some("hf-z-image-turbo".into()),
        };
        assert_eq!(
            required_fields(&req, Some("hf-sdxl-base")).unwrap().1,
            "hf-z-image-turbo"
        );

        let err = required_fields(&ImageGenerationRequest::default(), Some("hf-sdxl-base")).unwrap_err();
        assert_eq!(err.to_string(), "Missing prompt in request body");
    }

    #[actix_web::test]
    async fn single_model_variant_uses_default() {
        let generator = Arc::new(FakeGenerator::default());
        let app = actix_test::init_service(
            App::new()
                .app_data(state(keyed().with_default_model("hf-z-image-turbo"), generator.clone()))
                .configure(configure),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri(GENERATE_IMAGE_PATH)
            .set_json(json!({ "prompt": "a lighthouse" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["imageUrl"], "data:image/jpeg;base64,/9j/");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            generator.seen.lock().unwrap()[0],
            ("hf-z-image-turbo".to_string(), "a lighthouse".to_string())
        );
    }

    #[actix_web::test]
    async fn validation_happens_before_credential_check() {
        let generator = Arc::new(FakeGenerator::default());
        let app = actix_test::init_service(
            App::new()
                .app_data(state(Config::new(), generator.clone()))
                .configure(configure),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri(GENERATE_IMAGE_PATH)
            .set_json(json!({ "modelId": "hf-sdxl-base" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn credential_check_happens_before_model_lookup() {
        let generator = Arc::new(FakeGenerator::default());
        let app = actix_test::init_service(
            App::new()
                .app_data(state(Config::new(), generator.clone()))
                .configure(configure),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri(GENERATE_IMAGE_PATH)
            .set_json(json!({ "prompt": "a cat", "modelId": "not-a-model" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Hugging Face API key not configured");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn oversized_body_gets_json_413() {
        let generator = Arc::new(FakeGenerator::default());
        let app = actix_test::init_service(
            App::new()
                .app_data(state(keyed().with_max_body_bytes(64), generator.clone()))
                .configure(configure),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri(GENERATE_IMAGE_PATH)
            .set_json(json!({ "prompt": "x".repeat(200), "modelId": "hf-sdxl-base" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            resp.headers()
                .get(actix_web::http::header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Request body exceeds 64 bytes");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}

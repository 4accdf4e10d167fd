use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{self, proxy};
use crate::middleware::session_middleware;
use crate::models::{Budget, Category, Goal, Resource, Transaction};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Session-checked proxy
        .merge(proxy_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn proxy_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<Transaction>())
        .merge(resource_routes::<Budget>())
        .merge(resource_routes::<Category>())
        .merge(resource_routes::<Goal>())
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}

/// PATCH/DELETE on `/api/{resource}/:id`. The id-less paths exist so a missing id gets a 400.
fn resource_routes<R: Resource>() -> Router<AppState> {
    let item = patch(proxy::patch::<R>).delete(proxy::delete::<R>);

    Router::new()
        .route(&format!("/api/{}/:id", R::PATH), item.clone())
        .route(&format!("/api/{}/", R::PATH), item.clone())
        .route(&format!("/api/{}", R::PATH), item)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let mut config = AppConfig::development();
        config.upstream.base_url = Some("http://127.0.0.1:9".to_string());
        config.security.session_secret = "secret".to_string();
        config.security.access_token_secret = "access".to_string();
        app(AppState::new(config).unwrap())
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_is_public() {
        let res = test_app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["success"], true);
    }

    #[tokio::test]
    async fn every_resource_route_requires_a_session() {
        for path in ["/api/transaction/t1", "/api/budget/b1", "/api/category/c1", "/api/goal/g1"] {
            let res = test_app()
                .oneshot(Request::delete(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
            assert_eq!(body_json(res).await, json!({ "error": "Unauthorized" }));
        }
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let res = test_app()
            .oneshot(Request::delete("/api/account/a1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

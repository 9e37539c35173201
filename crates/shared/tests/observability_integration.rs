//! 可观测性模块集成测试
//!
//! 测试 metrics、配置和 middleware 模块的核心功能。

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use feedback_shared::observability::metrics::{record_feedback_operation, record_http_request};

    #[test]
    fn test_record_http_request() {
        // 未安装 recorder 时记录为空操作，不应 panic
        record_http_request("GET", "/api/v1/feedback", 200, 0.05);
        record_http_request("POST", "/api/v1/feedback", 201, 0.12);
        record_http_request("PUT", "/api/v1/feedback/{id}", 200, 0.08);
        record_http_request("DELETE", "/api/v1/feedback/{id}", 404, 0.01);
        record_http_request("GET", "unmatched", 404, 0.01);
    }

    #[test]
    fn test_record_feedback_operation() {
        for operation in ["list", "get", "create", "update", "delete"] {
            record_feedback_operation(operation, "success");
        }
        record_feedback_operation("get", "not_found");
    }
}

// ============================================================================
// 配置测试
// ============================================================================

mod config_tests {
    use feedback_shared::observability::ObservabilityConfig;

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
        assert!(!config.metrics_enabled);
        assert_eq!(config.metrics_port, 9090);
    }

    #[test]
    fn test_observability_config_partial_deserialize() {
        let config: ObservabilityConfig =
            serde_json::from_str(r#"{"json_logs": true, "metrics_port": 9100}"#).unwrap();
        assert!(config.json_logs);
        assert_eq!(config.metrics_port, 9100);
        assert_eq!(config.log_level, "info");

        let named = config.with_service_name("feedback-service");
        assert_eq!(named.service_name, "feedback-service");
    }
}

// ============================================================================
// 中间件测试
// ============================================================================

mod middleware_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use feedback_shared::observability::middleware::{
        REQUEST_ID_HEADER, RequestId, http_tracing, request_id,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/items/{id}",
                get(|req: Request<Body>| async move {
                    req.extensions()
                        .get::<RequestId>()
                        .map(|id| id.as_str().to_string())
                        .unwrap_or_default()
                }),
            )
            .layer(middleware::from_fn(http_tracing))
            .layer(middleware::from_fn(request_id))
    }

    #[tokio::test]
    async fn test_request_id_visible_to_handler_and_echoed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/items/42")
                    .header(REQUEST_ID_HEADER, "trace-abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-abc");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"trace-abc");
    }

    #[tokio::test]
    async fn test_unmatched_route_passes_through() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}

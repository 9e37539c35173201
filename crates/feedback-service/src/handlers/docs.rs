//! API 文档处理器
//!
//! 提供 OpenAPI 3 文档与 Swagger UI 页面

use std::sync::Arc;

use axum::{Json, Router, response::Html, routing::get};
use serde_json::{Value, json};

use crate::models::{Division, FeedbackStatus};
use crate::state::AppState;

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Feedback API Documentation</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: '/api-docs/openapi.json', dom_id: '#swagger-ui' });
    };
  </script>
</body>
</html>
"#;

/// 文档路由
///
/// `base_path` 为 API 前缀（如 `/api/v1`），写入文档的 servers 字段
pub fn docs_routes(base_path: &str) -> Router<AppState> {
    let spec = Arc::new(openapi_document(base_path));

    Router::new()
        .route("/api-docs", get(|| async { Html(SWAGGER_UI_HTML) }))
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let spec = spec.clone();
                async move { Json(spec.as_ref().clone()) }
            }),
        )
}

/// 构造 OpenAPI 3 文档
pub fn openapi_document(base_path: &str) -> Value {
    let divisions: Vec<&str> = Division::ALL.iter().map(Division::as_str).collect();
    let statuses: Vec<&str> = FeedbackStatus::ALL
        .iter()
        .map(FeedbackStatus::as_str)
        .collect();

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Feedback API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Feedback management REST API"
        },
        "servers": [{ "url": base_path }],
        "tags": [{ "name": "Feedback", "description": "Feedback management" }],
        "paths": paths(&divisions, &statuses),
        "components": { "schemas": schemas(&divisions, &statuses) }
    })
}

fn paths(divisions: &[&str], statuses: &[&str]) -> Value {
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "minimum": 1 }
    });
    let response = |description: &str, schema: &str| {
        json!({
            "description": description,
            "content": { "application/json": { "schema": schema_ref(schema) } }
        })
    };
    let error_response = |description: &str| response(description, "ErrorResponse");
    let feedback_response = |description: &str| response(description, "FeedbackResponse");
    // 请求体同时接受 JSON 与表单
    let input_body = |schema: &str| {
        json!({
            "required": true,
            "content": {
                "application/json": { "schema": schema_ref(schema) },
                "application/x-www-form-urlencoded": { "schema": schema_ref(schema) }
            }
        })
    };
    let query_param =
        |name: &str, schema: Value| json!({ "name": name, "in": "query", "schema": schema });

    json!({
        "/feedback": {
            "get": {
                "tags": ["Feedback"],
                "summary": "List feedbacks",
                "parameters": [
                    query_param("status", json!({ "type": "string", "enum": statuses })),
                    query_param("division", json!({ "type": "string", "enum": divisions })),
                    query_param("page", json!({ "type": "integer", "default": 1, "minimum": 1 })),
                    query_param(
                        "limit",
                        json!({ "type": "integer", "default": 10, "minimum": 1, "maximum": 100 })
                    )
                ],
                "responses": {
                    "200": response("Feedbacks retrieved successfully", "FeedbackListResponse"),
                    "400": error_response("Invalid filter"),
                    "500": error_response("Internal server error")
                }
            },
            "post": {
                "tags": ["Feedback"],
                "summary": "Submit a new feedback from public form",
                "requestBody": input_body("FeedbackInput"),
                "responses": {
                    "201": feedback_response("Feedback created successfully"),
                    "400": error_response("Validation failed"),
                    "409": error_response("Duplicate record"),
                    "500": error_response("Internal server error")
                }
            }
        },
        "/feedback/{id}": {
            "get": {
                "tags": ["Feedback"],
                "summary": "Get feedback by id",
                "parameters": [id_param.clone()],
                "responses": {
                    "200": feedback_response("Feedback retrieved successfully"),
                    "400": error_response("Validation failed"),
                    "404": error_response("Feedback not found"),
                    "500": error_response("Internal server error")
                }
            },
            "put": {
                "tags": ["Feedback"],
                "summary": "Update feedback (partial)",
                "parameters": [id_param.clone()],
                "requestBody": input_body("FeedbackUpdate"),
                "responses": {
                    "200": feedback_response("Feedback updated successfully"),
                    "400": error_response("Validation failed"),
                    "404": error_response("Feedback not found"),
                    "500": error_response("Internal server error")
                }
            },
            "delete": {
                "tags": ["Feedback"],
                "summary": "Delete feedback",
                "parameters": [id_param],
                "responses": {
                    "200": response("Feedback deleted successfully", "MessageResponse"),
                    "400": error_response("Validation failed"),
                    "404": error_response("Feedback not found"),
                    "500": error_response("Internal server error")
                }
            }
        }
    })
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn schemas(divisions: &[&str], statuses: &[&str]) -> Value {
    json!({
        "Feedback": {
            "type": "object",
            "properties": {
                "id": { "type": "integer", "example": 1 },
                "name": { "type": "string", "maxLength": 255, "example": "John Doe" },
                "email": {
                    "type": "string",
                    "format": "email",
                    "maxLength": 255,
                    "example": "john.doe@example.com"
                },
                "eventName": {
                    "type": "string",
                    "maxLength": 255,
                    "example": "Workshop 2024"
                },
                "division": { "type": "string", "enum": divisions },
                "rating": { "type": "integer", "minimum": 1, "maximum": 5, "example": 5 },
                "comment": { "type": "string", "nullable": true },
                "suggestion": { "type": "string", "nullable": true },
                "createdAt": { "type": "string", "format": "date-time" },
                "status": { "type": "string", "enum": statuses, "default": "open" }
            }
        },
        "FeedbackInput": {
            "type": "object",
            "required": ["name", "email", "eventName", "division", "rating"],
            "properties": {
                "name": { "type": "string", "maxLength": 255 },
                "email": { "type": "string", "format": "email", "maxLength": 255 },
                "eventName": { "type": "string", "maxLength": 255 },
                "division": { "type": "string", "enum": divisions },
                "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                "comment": { "type": "string", "nullable": true },
                "suggestion": { "type": "string", "nullable": true }
            }
        },
        "FeedbackUpdate": {
            "type": "object",
            "properties": {
                "name": { "type": "string", "maxLength": 255 },
                "email": { "type": "string", "format": "email", "maxLength": 255 },
                "eventName": { "type": "string", "maxLength": 255 },
                "division": { "type": "string", "enum": divisions },
                "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                "comment": { "type": "string", "nullable": true },
                "suggestion": { "type": "string", "nullable": true },
                "status": { "type": "string", "enum": statuses }
            }
        },
        "Pagination": {
            "type": "object",
            "properties": {
                "page": { "type": "integer" },
                "limit": { "type": "integer" },
                "total": { "type": "integer" },
                "totalPages": { "type": "integer" }
            }
        },
        "FeedbackResponse": {
            "type": "object",
            "properties": {
                "success": { "type": "boolean" },
                "message": { "type": "string" },
                "data": schema_ref("Feedback")
            }
        },
        "FeedbackListResponse": {
            "type": "object",
            "properties": {
                "success": { "type": "boolean" },
                "message": { "type": "string" },
                "data": {
                    "type": "object",
                    "properties": {
                        "feedbacks": { "type": "array", "items": schema_ref("Feedback") },
                        "pagination": schema_ref("Pagination")
                    }
                }
            }
        },
        "MessageResponse": {
            "type": "object",
            "properties": {
                "success": { "type": "boolean" },
                "message": { "type": "string" }
            }
        },
        "ErrorResponse": {
            "type": "object",
            "properties": {
                "success": { "type": "boolean", "example": false },
                "message": { "type": "string" },
                "errors": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "field": { "type": "string" },
                            "message": { "type": "string" }
                        }
                    }
                },
                "error": {
                    "type": "string",
                    "description": "Internal detail, omitted in production"
                }
            }
        }
    })
}

// ABOUTME: Shared API response types
// ABOUTME: Provides consistent response format across all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 200 with the success envelope
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, ResponseJson(ApiResponse::success(data))).into_response()
}

/// 201 with the success envelope
pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, ResponseJson(ApiResponse::success(data))).into_response()
}

/// Body of a successful delete
#[derive(Debug, Default, Serialize)]
pub struct Deleted {}

//! Reusable OpenAPI response types.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 2003,
        "error": "DATABASE_ERROR",
        "message": "Something went wrong, please try again later"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid query parameters",
    content_type = "application/json",
    example = json!({
        "code": 1010,
        "error": "INVALID_QUERY",
        "message": "Failed to deserialize query string: unknown variant `open`"
    })
)]
pub struct BadRequestQueryResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Resource not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - the request cannot be applied in the current state",
    content_type = "application/json",
    examples(
        ("AlreadyRegistered" = (value = json!({
            "code": 1012,
            "error": "ALREADY_REGISTERED",
            "message": "You are already registered for this event"
        }))),
        ("EventFull" = (value = json!({
            "code": 1013,
            "error": "EVENT_FULL",
            "message": "This event has reached its attendee limit"
        })))
    )
)]
pub struct ConflictResponse(pub ErrorResponse);

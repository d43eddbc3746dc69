//! API Routes
//!
//! HTTP endpoint definitions.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Money, Role, TransferRecord, User, HOME_CURRENCY};
use crate::error::AppError;
use crate::handlers::{RegisterUserCommand, TransferCommand, TransferHandler, UserHandler};

/// Shared handler state for the router
#[derive(Clone)]
pub struct AppState {
    pub user_handler: Arc<UserHandler>,
    pub transfer_handler: Arc<TransferHandler>,
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub email: String,
    pub password: String,
    /// Opening balance as a decimal string, e.g. "100.50"
    pub balance: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub email: String,
    pub balance: Decimal,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            document: user.document.as_str().to_string(),
            email: user.email,
            balance: user.balance.to_major_units(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    /// Amount as a decimal string, e.g. "100.50"
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub id: Uuid,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<TransferRecord> for TransferResponse {
    fn from(record: TransferRecord) -> Self {
        Self {
            id: record.id,
            payer_id: record.payer_id,
            payee_id: record.payee_id,
            amount: record.amount.to_major_units(),
            created_at: record.created_at,
        }
    }
}

/// Parse a decimal string from a request body into home-currency money.
fn parse_amount(raw: &str) -> Result<Money, AppError> {
    let decimal: Decimal = raw
        .parse()
        .map_err(|_| AppError::InvalidRequest(format!("Invalid amount: {raw}")))?;

    Money::from_major_units(decimal, HOME_CURRENCY)
        .map_err(|e| AppError::InvalidRequest(e.to_string()))
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Registration and queries
        .route("/users", post(register_user))
        .route("/users", get(list_users))
        .route("/users/:user_id", get(get_user))
        // Transfers
        .route("/transfer", post(transfer))
        .route("/transfers/:transfer_id", get(get_transfer))
}

// =========================================================================
// POST /users
// =========================================================================

/// Register a new user
async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let balance = parse_amount(&request.balance)?;

    let command = RegisterUserCommand::new(
        request.first_name,
        request.last_name,
        request.document,
        request.email,
        request.password,
        balance,
    )
    .with_role(request.role);

    let id = state.user_handler.register(command).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

// =========================================================================
// GET /users
// =========================================================================

/// List users, 20 per page
async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UsersListResponse>, AppError> {
    let users = state.user_handler.list(query.page).await?;

    Ok(Json(UsersListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

// =========================================================================
// GET /users/:user_id
// =========================================================================

/// Get user by ID
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_handler.find(user_id).await?;

    Ok(Json(UserResponse::from(user)))
}

// =========================================================================
// POST /transfer
// =========================================================================

/// Move money from payer to payee
async fn transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let amount = parse_amount(&request.amount)?;

    let command = TransferCommand::new(request.payer_id, request.payee_id, amount)?;

    let id = state.transfer_handler.execute(command).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

// =========================================================================
// GET /transfers/:transfer_id
// =========================================================================

/// Get transfer record by ID
async fn get_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<Uuid>,
) -> Result<Json<TransferResponse>, AppError> {
    let record = state
        .transfer_handler
        .find(transfer_id)
        .await?
        .ok_or(AppError::TransferNotFound(transfer_id))?;

    Ok(Json(TransferResponse::from(record)))
}

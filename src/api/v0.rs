use crate::{
    api::AppState,
    domain::{Account, AccountHandle, Amount, Fault},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(account, deposit, withdraw, shutdown),
    components(schemas(Account, Amount, Fault))
)]
pub struct ApiDoc;

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/account", get(account))
        .route("/account/deposit", post(deposit))
        .route("/account/withdraw", post(withdraw))
        .route("/shutdown", post(shutdown))
}

#[utoipa::path(
    get,
    path = "/account",
    responses(
        (status = 200, description = "The account with its current balance", body = Account),
        (status = 503, description = "The service is shut down", body = Fault)
    )
)]
async fn account(State(state): State<AppState>) -> Result<Json<Account>, Fault> {
    let balance = state.account.balance().await?;
    Ok(Json(Account { balance }))
}

#[utoipa::path(
    post,
    path = "/account/deposit",
    request_body = Amount,
    responses(
        (status = 204, description = "Amount added to the balance"),
        (status = 422, description = "Amount rejected", body = Fault),
        (status = 503, description = "The service is shut down", body = Fault)
    )
)]
async fn deposit(
    State(state): State<AppState>,
    Json(Amount { amount }): Json<Amount>,
) -> Result<StatusCode, Fault> {
    state.account.deposit(amount).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/account/withdraw",
    request_body = Amount,
    responses(
        (status = 204, description = "Amount subtracted from the balance"),
        (status = 409, description = "Amount exceeds the balance", body = Fault),
        (status = 422, description = "Amount rejected", body = Fault),
        (status = 503, description = "The service is shut down", body = Fault)
    )
)]
async fn withdraw(
    State(state): State<AppState>,
    Json(Amount { amount }): Json<Amount>,
) -> Result<StatusCode, Fault> {
    state.account.withdraw(amount).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/shutdown",
    responses(
        (status = 202, description = "Shutdown accepted, the service terminates after draining"),
        (status = 503, description = "The service is already shut down", body = Fault)
    )
)]
async fn shutdown(State(state): State<AppState>) -> Result<StatusCode, Fault> {
    state.account.shutdown().await?;
    Ok(StatusCode::ACCEPTED)
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let status = match self {
            Fault::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Fault::InsufficientFunds(_) => StatusCode::CONFLICT,
            Fault::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Fault::TransportFailure(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(self)).into_response()
    }
}

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::error::TelegramError;
use crate::models::{CreateTelegramAccountRequest, TelegramAccount, TelegramAccountView, TelegramAuthRequest};
use crate::services::telegram;
use crate::state::AppState;

/// Resolve the account from the path for the authenticated user, or the
/// response to send back (401 / 404).
async fn account_for_request(
    req: &HttpRequest,
    state: &AppState,
    account_id: &str,
) -> Result<TelegramAccount, Result<HttpResponse, TelegramError>> {
    let user = match super::auth::authenticated_user(req, &state.pool).await {
        Ok(user) => user,
        Err(response) => return Err(Ok(response)),
    };

    match telegram::find_account(&state.pool, account_id, &user.id).await {
        Ok(Some(account)) => Ok(account),
        Ok(None) => Err(Ok(HttpResponse::NotFound().json(json!({
            "error": "Telegram account not found"
        })))),
        Err(e) => Err(Err(e)),
    }
}

pub async fn create_account(
    req: HttpRequest,
    data: web::Json<CreateTelegramAccountRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TelegramError> {
    let user = match super::auth::authenticated_user(&req, &state.pool).await {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let create_req = data.into_inner();

    // Per-account API credentials are optional; the server's own app
    // credentials are the default.
    let api_id = create_req.api_id.or_else(|| {
        std::env::var("TELEGRAM_API_ID")
            .ok()
            .and_then(|v| v.parse().ok())
    });
    let api_hash = create_req
        .api_hash
        .or_else(|| std::env::var("TELEGRAM_API_HASH").ok());
    let (Some(api_id), Some(api_hash)) = (api_id, api_hash) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Telegram API credentials are not configured"
        })));
    };

    let (account, is_authorized) = telegram::create_account(
        &state.pool,
        &state.registry,
        &user.id,
        &create_req.phone_number,
        api_id,
        &api_hash,
    )
    .await?;

    Ok(HttpResponse::Created().json(TelegramAccountView::from_account(account, is_authorized)))
}

pub async fn list_accounts(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TelegramError> {
    let user = match super::auth::authenticated_user(&req, &state.pool).await {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let accounts = telegram::list_accounts(&state.pool, &state.registry, &user.id).await?;

    Ok(HttpResponse::Ok().json(accounts))
}

pub async fn authenticate_account(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<TelegramAuthRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TelegramError> {
    let account = match account_for_request(&req, &state, &path.into_inner()).await {
        Ok(account) => account,
        Err(response) => return response,
    };

    let response =
        telegram::authenticate(&state.pool, &state.registry, &account, &data.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn delete_account(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TelegramError> {
    let account = match account_for_request(&req, &state, &path.into_inner()).await {
        Ok(account) => account,
        Err(response) => return response,
    };

    telegram::delete_account(&state.pool, &state.registry, &account).await?;

    Ok(HttpResponse::Ok().json(true))
}

pub async fn get_chats(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TelegramError> {
    let account = match account_for_request(&req, &state, &path.into_inner()).await {
        Ok(account) => account,
        Err(response) => return response,
    };

    let session = telegram::obtain_session(&state.registry, &account).await?;
    let chats = telegram::get_chats(&session).await?;

    Ok(HttpResponse::Ok().json(chats))
}

pub async fn get_messages(
    req: HttpRequest,
    path: web::Path<(String, i64)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TelegramError> {
    let (account_id, chat_id) = path.into_inner();
    let account = match account_for_request(&req, &state, &account_id).await {
        Ok(account) => account,
        Err(response) => return response,
    };

    let session = telegram::obtain_session(&state.registry, &account).await?;
    let messages = telegram::get_messages(&session, chat_id, telegram::MESSAGE_PAGE_SIZE).await?;

    Ok(HttpResponse::Ok().json(messages))
}

pub async fn logout_account(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, TelegramError> {
    let account = match account_for_request(&req, &state, &path.into_inner()).await {
        Ok(account) => account,
        Err(response) => return response,
    };

    let released = telegram::logout(&state.registry, &account.id).await?;

    Ok(HttpResponse::Ok().json(released))
}

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::{AuthRequest, User};
use crate::state::AppState;

pub async fn register(data: web::Json<AuthRequest>, state: web::Data<AppState>) -> HttpResponse {
    let auth_req = data.into_inner();
    let pool = &state.pool;

    // check existing user
    if let Ok(existing) =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM users WHERE email = ?")
            .bind(&auth_req.email)
            .fetch_one(pool)
            .await
    {
        if existing > 0 {
            return HttpResponse::BadRequest().json(json!({
                "error": "User already exists"
            }));
        }
    }

    let hashed_password = match bcrypt::hash(&auth_req.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "error": "Password hashing failed"
            }))
        }
    };

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: auth_req.email.clone(),
        password: hashed_password,
        is_active: true,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    if sqlx::query(
        "INSERT INTO users (id, email, password, is_active, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.password)
    .bind(user.is_active)
    .bind(&user.created_at)
    .execute(pool)
    .await
    .is_err()
    {
        return HttpResponse::InternalServerError().json(json!({"error": "Failed to create user"}));
    }

    let token = issue_token(pool, &user.id).await;

    HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "user": {
            "id": user.id,
            "email": user.email
        },
        "token": token
    }))
}

pub async fn login(data: web::Json<AuthRequest>, state: web::Data<AppState>) -> HttpResponse {
    let auth_req = data.into_inner();
    let pool = &state.pool;

    let row = sqlx::query(
        "SELECT id, email, password, is_active, created_at FROM users WHERE email = ? LIMIT 1",
    )
    .bind(&auth_req.email)
    .fetch_optional(pool)
    .await;

    let row = match row {
        Ok(Some(r)) => r,
        _ => {
            return HttpResponse::Unauthorized().json(json!({
                "error": "Invalid credentials"
            }));
        }
    };

    let user = User {
        id: row.get::<String, _>("id"),
        email: row.get::<String, _>("email"),
        password: row.get::<String, _>("password"),
        is_active: row.get::<bool, _>("is_active"),
        created_at: row.get::<String, _>("created_at"),
    };

    let is_valid = bcrypt::verify(&auth_req.password, &user.password).unwrap_or(false);

    if !is_valid || !user.is_active {
        return HttpResponse::Unauthorized().json(json!({
            "error": "Invalid credentials"
        }));
    }

    let token = issue_token(pool, &user.id).await;

    HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "user": {
            "id": user.id,
            "email": user.email
        },
        "token": token
    }))
}

async fn issue_token(pool: &SqlitePool, user_id: &str) -> String {
    let token = Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();
    let expires_at = (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339();

    let _ = sqlx::query(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(&created_at)
    .bind(&expires_at)
    .execute(pool)
    .await;

    token
}

/// Resolve the request's bearer token to its user, or the 401 response to
/// send back.
pub async fn authenticated_user(
    req: &HttpRequest,
    pool: &SqlitePool,
) -> Result<User, HttpResponse> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(token) = token else {
        return Err(HttpResponse::Unauthorized().json(json!({
            "error": "Missing bearer token"
        })));
    };

    let row = sqlx::query(
        "SELECT u.id, u.email, u.password, u.is_active, u.created_at, s.expires_at
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token = ?
         LIMIT 1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await;

    let row = match row {
        Ok(Some(r)) => r,
        _ => {
            return Err(HttpResponse::Unauthorized().json(json!({
                "error": "Invalid or expired token"
            })));
        }
    };

    let expired = row
        .try_get::<Option<String>, _>("expires_at")
        .unwrap_or(None)
        .map(|at| at < chrono::Utc::now().to_rfc3339())
        .unwrap_or(false);
    let is_active = row.get::<bool, _>("is_active");

    if expired || !is_active {
        return Err(HttpResponse::Unauthorized().json(json!({
            "error": "Invalid or expired token"
        })));
    }

    Ok(User {
        id: row.get::<String, _>("id"),
        email: row.get::<String, _>("email"),
        password: row.get::<String, _>("password"),
        is_active,
        created_at: row.get::<String, _>("created_at"),
    })
}

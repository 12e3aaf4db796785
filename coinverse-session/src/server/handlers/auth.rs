use axum::{extract::State, http::StatusCode, Json};

use super::rejected;
use crate::server::{
    error::LedgerError,
    models::{
        ChangePasswordRequest, Empty, LoginData, LoginRequest, OldTokenRequest, ProfileData,
        RefreshReply, RegisterRequest, Reply, TokenRequest,
    },
    AppState,
};

const TOKEN_TYPE: &str = "bearer";

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> (StatusCode, Json<Reply<Empty>>) {
    let reply = match state.ledger.register(&req.name, &req.email, &req.pwd_hash) {
        Ok(()) => {
            tracing::info!(name = %req.name, "User registered");
            Reply::ok(None, "User registered successfully.", Empty {})
        }
        Err(e) => rejected("register", None, e),
    };

    (StatusCode::CREATED, Json(reply))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Json<Reply<LoginData>> {
    tracing::debug!(maintain_online = req.maintain_online, "Login requested");

    let reply = match state.ledger.login(&req.name_or_email, &req.pwd_hash) {
        Ok(token) => Reply::ok(
            None,
            "Login successful",
            LoginData {
                token_type: TOKEN_TYPE,
                access_token: Some(token),
            },
        ),
        Err(e) => {
            let mut reply: Reply<LoginData> = rejected("login", None, e);
            reply.data.token_type = TOKEN_TYPE;
            reply
        }
    };

    Json(reply)
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<OldTokenRequest>,
) -> Json<RefreshReply> {
    let (sucess, expired, msg, access_token) = match state.ledger.refresh(&req.old_token) {
        Ok(token) => {
            tracing::info!("Token refresh successful");
            (true, false, "successfully update the token".to_string(), token)
        }
        Err(LedgerError::TokenExpired) => {
            tracing::warn!("Token expired, returning expired response");
            (false, true, "Token expired, please login again".to_string(), String::new())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Token refresh failed");
            (false, false, "Invalid or expired token".to_string(), String::new())
        }
    };

    Json(RefreshReply {
        sucess,
        expired,
        msg,
        access_token,
        token_type: TOKEN_TYPE,
    })
}

pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<OldTokenRequest>,
) -> Json<Reply<Empty>> {
    let reply = match state.ledger.logout(&req.old_token) {
        Ok(()) => Reply::ok(None, "Logout successful", Empty {}),
        // Unknown tokens still count as logged out.
        Err(LedgerError::TokenNotFound) => {
            tracing::warn!("Token not found, cannot logout");
            Reply::ok(None, "Token not found, cannot logout", Empty {})
        }
        Err(e) => rejected("logout", None, e),
    };

    Json(reply)
}

pub async fn profile(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Json<Reply<ProfileData>> {
    let reply = match state.ledger.profile(&req.token) {
        Ok((name, email)) => Reply::ok(
            None,
            "Profile retrieved successfully",
            ProfileData { name, email },
        ),
        Err(LedgerError::TokenNotFound) => {
            tracing::warn!("Token not found, cannot get profile");
            Reply::failed(None, "Token not found, cannot get profile")
        }
        Err(e) => rejected("profile", None, e),
    };

    Json(reply)
}

pub async fn change_password(
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Json<Reply<Empty>> {
    let reply = match state.ledger.change_password(
        &req.name_or_email,
        &req.old_pwd_hash,
        &req.new_pwd_hash,
    ) {
        Ok(()) => Reply::ok(None, "Password changed successfully", Empty {}),
        Err(e) => rejected("change_password", None, e),
    };

    Json(reply)
}

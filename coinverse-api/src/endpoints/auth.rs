use super::NoPayload;
use crate::macros::setter;
use crate::{Method, Operation};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct Register {
    name: String,
    email: String,
    pwd_hash: String,
}

impl Register {
    pub fn new(name: impl Into<String>, email: impl Into<String>, pwd_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            pwd_hash: pwd_hash.into(),
        }
    }
}

impl Operation for Register {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "register";
    type Payload = NoPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/register".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Login {
    name_or_email: String,
    pwd_hash: String,
    maintain_online: bool,
}

impl Login {
    pub fn new(name_or_email: impl Into<String>, pwd_hash: impl Into<String>) -> Self {
        Self {
            name_or_email: name_or_email.into(),
            pwd_hash: pwd_hash.into(),
            maintain_online: true,
        }
    }

    setter!(maintain_online: bool);
}

impl Operation for Login {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "login";
    type Payload = LoginPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/login".into()
    }

    fn issued_token(payload: &LoginPayload) -> Option<&str> {
        payload.access_token.as_deref()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshToken {
    old_token: String,
}

impl RefreshToken {
    pub fn new(old_token: impl Into<String>) -> Self {
        Self {
            old_token: old_token.into(),
        }
    }
}

impl Operation for RefreshToken {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "refresh_token";
    type Payload = RefreshPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/refresh_token".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Logout {
    old_token: String,
}

impl Logout {
    pub fn new(old_token: impl Into<String>) -> Self {
        Self {
            old_token: old_token.into(),
        }
    }
}

impl Operation for Logout {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "logout";
    type Payload = NoPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/logout".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePassword {
    name_or_email: String,
    old_pwd_hash: String,
    new_pwd_hash: String,
}

impl ChangePassword {
    pub fn new(
        name_or_email: impl Into<String>,
        old_pwd_hash: impl Into<String>,
        new_pwd_hash: impl Into<String>,
    ) -> Self {
        Self {
            name_or_email: name_or_email.into(),
            old_pwd_hash: old_pwd_hash.into(),
            new_pwd_hash: new_pwd_hash.into(),
        }
    }
}

impl Operation for ChangePassword {
    const METHOD: Method = Method::Put;
    const NAME: &'static str = "change_password";
    type Payload = NoPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/users/me/change_password".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetProfile {
    token: String,
}

impl GetProfile {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Operation for GetProfile {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "profile";
    type Payload = ProfilePayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/users/me".into()
    }
}

// Responses

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoginPayload {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RefreshPayload {
    pub access_token: Option<String>,
    #[serde(default)]
    pub expired: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfilePayload {
    pub name: Option<String>,
    pub email: Option<String>,
}

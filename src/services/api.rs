// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Travelog REST API client.
//!
//! Thin typed wrapper over the backend endpoints. Every call maps HTTP
//! failures into `AppError`; callers decide how to surface them.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::user::avatar_path;
use crate::models::{City, Comment, NewTrip, Trip, User};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login form.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Signup form.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
}

#[derive(Deserialize)]
struct SignupResponse {
    #[serde(default)]
    user: Option<User>,
}

#[derive(Serialize)]
struct FollowBody {
    target_user_id: u64,
}

#[derive(Serialize)]
struct LikeBody {
    user_id: u64,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    user_id: u64,
    content: &'a str,
}

/// Error body the backend sends alongside non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// Travelog API client.
#[derive(Clone)]
pub struct TravelogClient {
    http: reqwest::Client,
    base_url: String,
}

impl TravelogClient {
    /// Create a client for the backend configured in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Conventional avatar URL for a user.
    pub fn avatar_url(&self, user_id: u64) -> String {
        avatar_path(&self.base_url, user_id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ─── Auth ────────────────────────────────────────────────────

    /// Authenticate; bad credentials map to `AppError::InvalidCredentials`.
    pub async fn login(&self, request: &LoginRequest) -> Result<User> {
        request.validate()?;

        let response = self
            .http
            .post(self.url("/login"))
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        match self.check_response_json::<LoginResponse>(response).await {
            Ok(body) => Ok(body.user),
            Err(AppError::Unauthorized) | Err(AppError::NotFound(_)) => {
                Err(AppError::InvalidCredentials)
            }
            Err(e) => Err(e),
        }
    }

    /// Register a new account. Returns the user if the backend echoes it.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Option<User>> {
        request.validate()?;

        let response = self
            .http
            .post(self.url("/signup"))
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let body: SignupResponse = self.check_response_json(response).await?;
        Ok(body.user)
    }

    // ─── Users & follows ─────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("/users").await
    }

    pub async fn get_user(&self, user_id: u64) -> Result<User> {
        self.get_json(&format!("/users/{}", user_id)).await
    }

    pub async fn followers(&self, user_id: u64) -> Result<Vec<User>> {
        self.get_json(&format!("/users/{}/followers", user_id)).await
    }

    pub async fn following(&self, user_id: u64) -> Result<Vec<User>> {
        self.get_json(&format!("/users/{}/following", user_id)).await
    }

    pub async fn follow(&self, user_id: u64, target_user_id: u64) -> Result<()> {
        self.post_json(
            &format!("/users/{}/follow", user_id),
            &FollowBody { target_user_id },
        )
        .await
    }

    pub async fn unfollow(&self, user_id: u64, target_user_id: u64) -> Result<()> {
        self.post_json(
            &format!("/users/{}/unfollow", user_id),
            &FollowBody { target_user_id },
        )
        .await
    }

    // ─── Trips ───────────────────────────────────────────────────

    /// Trips owned by `user_id` (the "my log" listing).
    pub async fn user_trips(&self, user_id: u64) -> Result<Vec<Trip>> {
        self.get_json(&format!("/trips/{}", user_id)).await
    }

    /// Trips of everyone `user_id` follows, as ordered by the backend.
    pub async fn feed(&self, user_id: u64) -> Result<Vec<Trip>> {
        self.get_json(&format!("/feed/{}", user_id)).await
    }

    /// Submit the add-trip form as multipart, including media files.
    ///
    /// Returns the created trip when the backend includes it in the response.
    pub async fn create_trip(&self, user_id: u64, trip: &NewTrip) -> Result<Option<Trip>> {
        trip.validate()?;

        let mut form = Form::new().text("user_id", user_id.to_string());
        for (name, value) in trip.text_fields() {
            form = form.text(name, value);
        }
        for path in &trip.media {
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                AppError::Validation(format!("Cannot read {}: {}", path.display(), e))
            })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            form = form.part("media", Part::bytes(bytes).file_name(file_name));
        }

        let response = self
            .http
            .post(self.url("/trips"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let body = self.check_response_text(response).await?;
        Ok(serde_json::from_str::<Trip>(&body).ok())
    }

    pub async fn delete_trip(&self, trip_id: u64) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/trips/{}", trip_id)))
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response(response).await
    }

    pub async fn like(&self, trip_id: u64, user_id: u64) -> Result<()> {
        self.post_json(&format!("/trips/{}/like", trip_id), &LikeBody { user_id })
            .await
    }

    pub async fn unlike(&self, trip_id: u64, user_id: u64) -> Result<()> {
        self.post_json(&format!("/trips/{}/unlike", trip_id), &LikeBody { user_id })
            .await
    }

    // ─── Comments ────────────────────────────────────────────────

    pub async fn comments(&self, trip_id: u64) -> Result<Vec<Comment>> {
        self.get_json(&format!("/trips/{}/comments", trip_id)).await
    }

    /// Post a comment; the backend answers with the stored comment.
    pub async fn add_comment(&self, trip_id: u64, user_id: u64, content: &str) -> Result<Comment> {
        let response = self
            .http
            .post(self.url(&format!("/trips/{}/comment", trip_id)))
            .json(&CommentBody { user_id, content })
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    pub async fn delete_comment(&self, comment_id: u64) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/comments/{}", comment_id)))
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response(response).await
    }

    // ─── Cities ──────────────────────────────────────────────────

    pub async fn city(&self, city_id: u64) -> Result<City> {
        self.get_json(&format!("/cities/{}", city_id)).await
    }

    pub async fn city_trips(&self, city_id: u64) -> Result<Vec<Trip>> {
        self.get_json(&format!("/cities/{}/trips", city_id)).await
    }

    pub async fn city_users(&self, city_id: u64) -> Result<Vec<User>> {
        self.get_json(&format!("/cities/{}/users", city_id)).await
    }

    pub async fn search_cities(&self, query: &str) -> Result<Vec<City>> {
        let response = self
            .http
            .get(self.url("/cities/search"))
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    // ─── Helpers ─────────────────────────────────────────────────

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// POST a JSON body, ignoring the response body.
    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response(response).await
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<()> {
        self.check_response_text(response).await.map(|_| ())
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let url = response.url().path().to_string();
        let body = self.check_response_text(response).await?;
        serde_json::from_str(&body).map_err(|e| AppError::Api {
            status: 200,
            message: format!("Unexpected response from {}: {}", url, e),
        })
    }

    /// Check response status and return the body text.
    async fn check_response_text(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        tracing::debug!(status = status.as_u16(), message = %message, "Backend request failed");

        Err(match status.as_u16() {
            401 | 403 => AppError::Unauthorized,
            404 => AppError::NotFound(message),
            400 | 422 => AppError::Validation(message),
            code => AppError::Api {
                status: code,
                message,
            },
        })
    }
}

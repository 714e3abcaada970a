use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use reqwest::{Client, StatusCode};
use roost_shared::{
    api::{
        AuthResponse, CreateCommentRequest, CreateCommunityRequest, CreatePostRequest,
        LoginRequest, RefreshRequest, ToggleVoteRequest, UploadImageResponse,
    },
    Comment, Community, Post, PostWithCommunity, UserProfile, Vote,
};
use uuid::Uuid;

use super::auth::AuthTokens;

/// JWT payload claims we need for expiry checking
#[derive(serde::Deserialize)]
struct JwtClaims {
    exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Access forbidden")]
    Forbidden,
    #[error("Resource not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Thin wrapper over the managed backend's REST surface. Reads are open to
/// anonymous callers; every mutation demands a bearer token and fails with
/// `Unauthorized` before touching the network when none is loaded.
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Option<AuthTokens>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: None,
        }
    }

    /// Load tokens from disk
    pub fn load_tokens(&mut self) -> Result<bool> {
        self.tokens = AuthTokens::load()?;
        Ok(self.tokens.is_some())
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.tokens.as_ref().map(|t| t.user_id)
    }

    /// Build URL for endpoint
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn auth_header(&self) -> Option<String> {
        self.tokens
            .as_ref()
            .map(|t| format!("Bearer {}", t.access_token))
    }

    /// Decode JWT payload and extract expiration time
    fn decode_token_exp(token: &str) -> Option<i64> {
        // JWT format: header.payload.signature
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return None;
        }

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
        let claims: JwtClaims = serde_json::from_slice(&payload).ok()?;

        Some(claims.exp)
    }

    /// Check if the access token is expiring soon (within 60 seconds)
    fn is_token_expiring_soon(&self) -> bool {
        let Some(tokens) = &self.tokens else {
            return true;
        };

        let Some(exp) = Self::decode_token_exp(&tokens.access_token) else {
            return false; // Can't decode = don't refresh proactively
        };

        let now = chrono::Utc::now().timestamp();
        exp < now + 60
    }

    /// Ensure we have a valid token, refreshing if needed.
    /// Returns true if we have a valid token, false if refresh failed.
    async fn ensure_valid_token(&mut self) -> bool {
        if !self.is_authenticated() {
            return false;
        }

        if self.is_token_expiring_soon() && self.refresh().await.is_err() {
            return false;
        }

        true
    }

    // ============ Request Helpers ============

    /// GET a read endpoint. Reads work anonymously; the bearer token rides
    /// along when one is loaded.
    async fn get(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        let mut request = self.client.get(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header("Authorization", auth);
        }
        request.send().await.map_err(ApiError::Network)
    }

    /// GET an endpoint that only answers to an authenticated caller.
    async fn authed_get(&mut self, path: &str) -> Result<reqwest::Response, ApiError> {
        if !self.ensure_valid_token().await {
            return Err(ApiError::Unauthorized);
        }
        let auth = self.auth_header().ok_or(ApiError::Unauthorized)?;
        self.client
            .get(self.url(path))
            .header("Authorization", auth)
            .send()
            .await
            .map_err(ApiError::Network)
    }

    /// POST a mutation, auto-refreshing the token if needed.
    async fn authed_post<T: serde::Serialize>(
        &mut self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ApiError> {
        if !self.ensure_valid_token().await {
            return Err(ApiError::Unauthorized);
        }
        let auth = self.auth_header().ok_or(ApiError::Unauthorized)?;
        self.client
            .post(self.url(path))
            .header("Authorization", auth)
            .json(body)
            .send()
            .await
            .map_err(ApiError::Network)
    }

    /// Handle API response
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                response.json().await.map_err(ApiError::Network)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::Validation(text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::Server(format!("{}: {}", status, text)))
            }
        }
    }

    // ============ Auth ============

    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&req)
            .send()
            .await?;

        let auth: AuthResponse = self.handle_response(response).await?;

        self.tokens = Some(AuthTokens {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            user_id: auth.user_id,
        });

        if let Some(ref tokens) = self.tokens {
            tokens.save().map_err(ApiError::Other)?;
        }

        self.me().await
    }

    pub async fn logout(&mut self) -> Result<(), ApiError> {
        if let Some(auth) = self.auth_header() {
            let _ = self
                .client
                .post(self.url("/auth/logout"))
                .header("Authorization", auth)
                .send()
                .await;
        }

        self.tokens = None;
        AuthTokens::delete().map_err(ApiError::Other)?;
        Ok(())
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let refresh_token = self
            .tokens
            .as_ref()
            .map(|t| t.refresh_token.clone())
            .ok_or(ApiError::Unauthorized)?;

        let req = RefreshRequest { refresh_token };

        let response = self
            .client
            .post(self.url("/auth/refresh"))
            .json(&req)
            .send()
            .await?;

        let auth: AuthResponse = self.handle_response(response).await?;

        self.tokens = Some(AuthTokens {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            user_id: auth.user_id,
        });

        if let Some(ref tokens) = self.tokens {
            tokens.save().map_err(ApiError::Other)?;
        }

        Ok(())
    }

    pub async fn me(&mut self) -> Result<UserProfile, ApiError> {
        let response = self.authed_get("/auth/me").await?;
        self.handle_response(response).await
    }

    // ============ Posts ============

    /// List the feed, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let response = self.get("/posts").await?;
        self.handle_response(response).await
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Post, ApiError> {
        let response = self.get(&format!("/posts/{}", post_id)).await?;
        self.handle_response(response).await
    }

    pub async fn create_post(&mut self, req: CreatePostRequest) -> Result<Post, ApiError> {
        let response = self.authed_post("/posts", &req).await?;
        self.handle_response(response).await
    }

    /// Upload an image into the storage bucket and hand back its public URL.
    pub async fn upload_post_image(&mut self, path: &Path) -> Result<String, ApiError> {
        if !self.ensure_valid_token().await {
            return Err(ApiError::Unauthorized);
        }
        let auth = self.auth_header().ok_or(ApiError::Unauthorized)?;

        let bytes = tokio::fs::read(path)
            .await
            .context("Could not read image file")?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/storage/post-images"))
            .header("Authorization", auth)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let uploaded: UploadImageResponse = self.handle_response(response).await?;
        Ok(uploaded.public_url)
    }

    // ============ Communities ============

    pub async fn list_communities(&self) -> Result<Vec<Community>, ApiError> {
        let response = self.get("/communities").await?;
        self.handle_response(response).await
    }

    pub async fn create_community(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<Community, ApiError> {
        let req = CreateCommunityRequest {
            name: name.to_string(),
            description: description.to_string(),
        };
        let response = self.authed_post("/communities", &req).await?;
        self.handle_response(response).await
    }

    /// Posts filed under one community, newest first, each annotated with
    /// the community name.
    pub async fn list_community_posts(
        &self,
        community_id: i64,
    ) -> Result<Vec<PostWithCommunity>, ApiError> {
        let response = self
            .get(&format!("/communities/{}/posts", community_id))
            .await?;
        self.handle_response(response).await
    }

    // ============ Comments ============

    /// The full flat comment list for a post, ordered by creation time
    /// ascending. The thread forest is rebuilt from this on every fetch.
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, ApiError> {
        let response = self.get(&format!("/posts/{}/comments", post_id)).await?;
        self.handle_response(response).await
    }

    pub async fn create_comment(
        &mut self,
        post_id: i64,
        content: &str,
        parent_comment_id: Option<i64>,
        author: &str,
    ) -> Result<Comment, ApiError> {
        let req = CreateCommentRequest {
            content: content.to_string(),
            parent_comment_id,
            author: author.to_string(),
        };
        let response = self
            .authed_post(&format!("/posts/{}/comments", post_id), &req)
            .await?;
        self.handle_response(response).await
    }

    // ============ Votes ============

    pub async fn list_votes(&self, post_id: i64) -> Result<Vec<Vote>, ApiError> {
        let response = self.get(&format!("/posts/{}/votes", post_id)).await?;
        self.handle_response(response).await
    }

    /// One atomic toggle per user action; the store resolves insert, remove
    /// or switch against the caller's existing vote and responds with the
    /// post's refreshed vote list.
    pub async fn toggle_vote(&mut self, post_id: i64, value: i32) -> Result<Vec<Vote>, ApiError> {
        let req = ToggleVoteRequest { value };
        let response = self
            .authed_post(&format!("/posts/{}/votes/toggle", post_id), &req)
            .await?;
        self.handle_response(response).await
    }
}

use serde_json::Value;

use super::{
    ApiClient,
    models::{Credentials, Profile, Registration, TokenResponse},
};
use crate::error::AppError;

impl ApiClient {
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, AppError> {
        let request = self.http.post(self.url("/login")).json(credentials);

        self.send(request, "Login failed").await
    }

    pub async fn register(&self, registration: &Registration) -> Result<TokenResponse, AppError> {
        let request = self.http.post(self.url("/register")).json(registration);

        self.send(request, "Registration failed").await
    }

    pub async fn logout(&self, token: &str) -> Result<Value, AppError> {
        self.send(self.post("/logout", token), "Logout failed").await
    }

    pub async fn profile(&self, token: &str) -> Result<Profile, AppError> {
        self.send(self.get("/profile", token), "Failed to fetch profile")
            .await
    }
}

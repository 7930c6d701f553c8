//! Browser-based OAuth sign-in.
//!
//! Reworks the hosted redirect flow for a terminal client: start a
//! one-shot localhost callback listener, send the browser to the
//! provider's authorize URL, and wait for the redirect. The callback is
//! judged the same way the hosted flow judges it — an `error` parameter or
//! a missing `code` is a terminal failure; a `code` is exchanged for a
//! token, and success is decided by the session that results.

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use url::Url;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::config::{Config, OauthConfig};
use crate::error;
use crate::models::Token;
use crate::session::{self, Session};

/// Query parameters the provider redirects back with.
#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
    state: Option<String>,
}

/// Hands the first callback hit to the waiting flow; later hits are ignored.
struct CallbackState {
    tx: Mutex<Option<oneshot::Sender<CallbackQuery>>>,
}

async fn handle_callback(
    State(state): State<Arc<CallbackState>>,
    Query(query): Query<CallbackQuery>,
) -> Html<&'static str> {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(query);
    }
    Html("<h1>Sign-in complete</h1><p>You can close this tab and return to the terminal.</p>")
}

/// CLI entry point for `deepr oauth`.
pub async fn run_oauth(config: &Config) -> Result<()> {
    let oauth = config
        .auth
        .oauth
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no [auth.oauth] section in the config file"))?;

    let nonce = Uuid::new_v4().to_string();
    let redirect_uri = format!("http://{}/callback", oauth.callback_bind);
    let authorize = authorize_url(oauth, &redirect_uri, &nonce)?;

    let (tx, rx) = oneshot::channel();
    let state = Arc::new(CallbackState {
        tx: Mutex::new(Some(tx)),
    });
    let app = Router::new()
        .route("/callback", get(handle_callback))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind(&oauth.callback_bind)
        .await
        .with_context(|| format!("Failed to bind callback listener on {}", oauth.callback_bind))?;
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    println!("opening browser for sign-in...");
    if open::that(authorize.as_str()).is_err() {
        println!("could not open a browser — visit:\n  {}", authorize);
    }

    let callback = rx.await.context("callback listener closed unexpectedly")?;
    server.abort();

    if callback.error.is_some() {
        anyhow::bail!("Authentication failed. Please try again.");
    }
    let code = callback
        .code
        .ok_or_else(|| anyhow::anyhow!("No authorization code received."))?;
    if callback.state.as_deref() != Some(nonce.as_str()) {
        anyhow::bail!("Authentication failed. Please try again.");
    }

    let token = exchange_code(config, oauth, &code, &redirect_uri).await?;
    let mut signed_in = Session::from_token(token);
    let authed = ApiClient::new(config, Some(&signed_in))?;
    if let Ok(user) = authed.me().await {
        signed_in.user = Some(user);
    }
    session::save(&session::session_path(config), &signed_in)?;

    println!("You have been successfully signed in.");
    Ok(())
}

fn authorize_url(oauth: &OauthConfig, redirect_uri: &str, nonce: &str) -> Result<Url> {
    let mut authorize = Url::parse(&oauth.authorize_url)
        .with_context(|| "auth.oauth.authorize_url is not a valid URL")?;
    authorize
        .query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &oauth.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("state", nonce);
    Ok(authorize)
}

/// Exchange the authorization code for a token at the provider.
async fn exchange_code(
    config: &Config,
    oauth: &OauthConfig,
    code: &str,
    redirect_uri: &str,
) -> Result<Token> {
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    let response = http
        .post(&oauth.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", &oauth.client_id),
        ])
        .send()
        .await
        .context("Authentication failed. Please try again.")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error::backend_error(status.as_u16(), &body).into());
    }
    response
        .json()
        .await
        .context("Authentication failed. Please try again.")
}

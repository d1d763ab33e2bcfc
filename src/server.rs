//! HTTP surface.
//!
//! `GET /` renders the caller's shell. Every action is a form POST that
//! mutates the shell and answers `303 See Other` back to `/`. Clients are
//! told apart by the `vayama-client` cookie; the theme is kept in
//! `vayama-theme`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Request, State, multipart::MultipartError},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::client::{ClientHandle, ClientStore};
use crate::config::AppConfig;
use crate::itinerary::{BookingType, UnknownBookingType};
use crate::llm::LlmDriver;
use crate::prefs::{Language, UnknownPreference};
use crate::screens::auth::{AuthError, Credentials};
use crate::screens::booking::{BookingError, PaymentMethod};
use crate::screens::inbox::{CallKind, InboxError};
use crate::screens::profile::{FEEDBACK_MESSAGE, UnknownTopUpMethod};
use crate::screens::social::{ComposeAction, SHARE_NOTICE, SocialError};
use crate::shell::{Shell, Tab, UnknownTab};
use crate::ui;

pub const CLIENT_COOKIE: &str = "vayama-client";
pub const THEME_COOKIE: &str = "vayama-theme";

/// Request body ceiling. Larger than the attachment limit so oversized
/// files reach the inbox check.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, driver: Arc<dyn LlmDriver>) -> anyhow::Result<()> {
    info!(
        name: "llm.config.loaded",
        base_url = %config.llm.base_url,
        model = %config.llm.model,
        api_key_set = config.llm.api_key.is_some(),
        "LLM configuration loaded"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(Arc::clone(&config), driver);
    spawn_client_sweeper(state.clients.clone(), config.server.client_sweep());
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Periodically drop shells of browsers that stopped calling.
fn spawn_client_sweeper(clients: ClientStore, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let evicted = clients.cleanup_expired(Instant::now());
            if evicted > 0 {
                info!(
                    name: "clients.evicted",
                    evicted,
                    remaining = clients.len(),
                    "Idle clients evicted"
                );
            }
        }
    });
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        // Auth and navigation
        .route("/auth/login", post(auth_login))
        .route("/auth/mode", post(auth_mode))
        .route("/auth/logout", post(auth_logout))
        .route("/tab/{tab}", post(select_tab))
        .route("/notification/dismiss", post(dismiss_notification))
        // Assistant
        .route("/assistant/send", post(assistant_send))
        .route("/assistant/book", post(assistant_book))
        // Booking
        .route("/booking/category", post(booking_category))
        .route("/booking/search", post(booking_search))
        .route("/booking/select", post(booking_select))
        .route("/booking/back", post(booking_back))
        .route("/booking/payment-method", post(booking_payment_method))
        .route("/booking/pay", post(booking_pay))
        // Inbox
        .route("/inbox/open", post(inbox_open))
        .route("/inbox/close", post(inbox_close))
        .route("/inbox/send", post(inbox_send))
        .route("/inbox/attach", post(inbox_attach))
        .route("/inbox/voice", post(inbox_voice))
        .route("/inbox/video", post(inbox_video))
        .route("/inbox/call", post(inbox_call))
        // Reels
        .route("/reels/like", post(reels_like))
        .route("/reels/show", post(reels_show))
        // Social
        .route("/social/like", post(social_like))
        .route("/social/comments", post(social_comments))
        .route("/social/comment-like", post(social_comment_like))
        .route("/social/reply", post(social_reply))
        .route("/social/reply-cancel", post(social_reply_cancel))
        .route("/social/comment", post(social_comment))
        .route("/social/story", post(social_story))
        .route("/social/story-close", post(social_story_close))
        .route("/social/profile", post(social_profile))
        .route("/social/profile-close", post(social_profile_close))
        .route("/social/compose", post(social_compose))
        .route("/social/post", post(social_post))
        .route("/social/share", post(social_share))
        .route("/social/inbox", post(social_inbox))
        // Profile
        .route("/profile/theme", post(profile_theme))
        .route("/profile/language", post(profile_language))
        .route("/profile/topup/open", post(profile_topup_open))
        .route("/profile/topup/close", post(profile_topup_close))
        .route("/profile/topup", post(profile_topup))
        .route("/profile/feedback", post(profile_feedback))
        // Static assets
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(move |req: Request, next: Next| {
            let duration = timeout;
            async move {
                match tokio::time::timeout(duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            }
        }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Handler error, rendered as an HTML error page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An id that names nothing: 404.
    #[error("{0}")]
    NotFound(String),
    /// Input the screen refuses: 422.
    #[error("{0}")]
    Invalid(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Html(ui::error_page(status, &self.to_string()))).into_response()
    }
}

impl From<SocialError> for AppError {
    fn from(err: SocialError) -> Self {
        match err {
            SocialError::UnknownPost(_)
            | SocialError::UnknownComment(_)
            | SocialError::UnknownStory(_)
            | SocialError::UnknownTrack(_) => Self::NotFound(err.to_string()),
            SocialError::UnknownAction(_) | SocialError::EmptyPost => Self::Invalid(err.to_string()),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::UnknownOption(_) => Self::NotFound(err.to_string()),
            BookingError::NotAtPayment
            | BookingError::UnknownPaymentMethod(_)
            | BookingError::PaymentInProgress => {
                Self::Invalid(err.to_string())
            }
        }
    }
}

impl From<InboxError> for AppError {
    fn from(err: InboxError) -> Self {
        match err {
            InboxError::UnknownConversation(_) => Self::NotFound(err.to_string()),
            InboxError::NoConversation | InboxError::FileTooLarge { .. } => Self::Invalid(err.to_string()),
        }
    }
}

impl From<UnknownTab> for AppError {
    fn from(err: UnknownTab) -> Self {
        Self::NotFound(err.to_string())
    }
}

macro_rules! invalid_input {
    ($($err:ty),*) => {
        $(
            impl From<$err> for AppError {
                fn from(err: $err) -> Self {
                    Self::Invalid(err.to_string())
                }
            }
        )*
    };
}

invalid_input!(AuthError, UnknownPreference, UnknownTopUpMethod, UnknownBookingType, MultipartError);

// ─────────────────────────────────────────────────────────────────────────────
// Client plumbing
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve the caller's shell, creating one for a new or stale cookie.
///
/// Due time-driven effects are applied before the handler acts.
fn client(state: &AppState, jar: CookieJar) -> (CookieJar, ClientHandle) {
    let theme = jar
        .get(THEME_COOKIE)
        .and_then(|c| c.value().parse().ok())
        .unwrap_or_default();
    let known = jar.get(CLIENT_COOKIE).map(|c| c.value().to_string());
    let (id, handle) = state.clients.get_or_create(known.as_deref(), theme);
    let now = Instant::now();
    handle.touch(now);
    handle.lock().tick(now);

    let jar = if known.as_deref() == Some(id.as_str()) {
        jar
    } else {
        jar.add(
            Cookie::build((CLIENT_COOKIE, id))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        )
    };
    (jar, handle)
}

fn back(jar: CookieJar) -> Response {
    (jar, Redirect::to("/")).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Forms
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MessageForm {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct BookForm {
    turn_id: u64,
    day: usize,
    activity: usize,
}

#[derive(Debug, Deserialize)]
struct CategoryForm {
    category: String,
}

#[derive(Debug, Deserialize)]
struct OptionForm {
    option_id: u32,
}

#[derive(Debug, Deserialize)]
struct MethodForm {
    method: String,
}

#[derive(Debug, Deserialize)]
struct ConversationForm {
    conversation_id: u32,
}

#[derive(Debug, Deserialize)]
struct CallForm {
    kind: String,
}

#[derive(Debug, Deserialize)]
struct PostForm {
    post_id: u64,
}

#[derive(Debug, Deserialize)]
struct CommentRefForm {
    post_id: u64,
    comment_id: String,
}

#[derive(Debug, Deserialize)]
struct CommentForm {
    post_id: u64,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct StoryForm {
    story_id: u32,
}

#[derive(Debug, Deserialize)]
struct ComposeForm {
    #[serde(default)]
    text: String,
    action: String,
}

#[derive(Debug, Deserialize)]
struct TextForm {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct LanguageForm {
    language: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Render the caller's shell.
async fn index(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    let html = ui::render_page(&client.lock(), Instant::now());
    (jar, Html(html)).into_response()
}

/// GET /health - Liveness check.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "clients": state.clients.len(),
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth and navigation
// ─────────────────────────────────────────────────────────────────────────────

async fn auth_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client.lock().login(&credentials)?;
    Ok(back(jar))
}

async fn auth_mode(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    client.lock().toggle_auth_mode();
    back(jar)
}

async fn auth_logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    client.lock().logout();
    back(jar)
}

async fn select_tab(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(tab): Path<String>,
) -> Result<Response, AppError> {
    let tab: Tab = tab.parse()?;
    let (jar, client) = client(&state, jar);
    client.lock().select_tab(tab);
    Ok(back(jar))
}

async fn dismiss_notification(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    client.lock().dismiss_notification();
    back(jar)
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistant
// ─────────────────────────────────────────────────────────────────────────────

/// POST /assistant/send - Queue a planner call; the reply lands later.
async fn assistant_send(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<MessageForm>,
) -> Response {
    let (jar, client) = client(&state, jar);
    let pending = client.lock().begin_assistant_turn(&form.message);
    if let Some(pending) = pending {
        tracing::debug!(mount_id = pending.mount_id(), "Planner call queued");
        tokio::spawn(async move {
            client.drive(pending).await;
        });
    }
    back(jar)
}

async fn assistant_book(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    let mut shell = client.lock();
    if shell.assistant().is_some() && !shell.request_booking(form.turn_id, form.day, form.activity) {
        return Err(AppError::NotFound(format!(
            "no bookable activity {}/{} in turn {}",
            form.day, form.activity, form.turn_id
        )));
    }
    drop(shell);
    Ok(back(jar))
}

// ─────────────────────────────────────────────────────────────────────────────
// Booking
// ─────────────────────────────────────────────────────────────────────────────

async fn booking_category(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let category: BookingType = form.category.parse()?;
    let (jar, client) = client(&state, jar);
    client.with_screen(Shell::booking_mut, |b| b.select_category(category));
    Ok(back(jar))
}

async fn booking_search(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<BTreeMap<String, String>>,
) -> Response {
    let (jar, client) = client(&state, jar);
    client.with_screen(Shell::booking_mut, |b| b.search(&fields));
    back(jar)
}

async fn booking_select(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<OptionForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::booking_mut, |b| b.select_option(form.option_id).map(|_| ()))
        .transpose()?;
    Ok(back(jar))
}

async fn booking_back(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    client.with_screen(Shell::booking_mut, |b| b.back());
    back(jar)
}

async fn booking_payment_method(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<MethodForm>,
) -> Result<Response, AppError> {
    let method: PaymentMethod = form.method.parse()?;
    let (jar, client) = client(&state, jar);
    client.with_screen(Shell::booking_mut, |b| b.choose_payment(method));
    Ok(back(jar))
}

/// POST /booking/pay - Simulated payment, confirmed after a fixed delay.
async fn booking_pay(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    let checkout = client.lock().begin_booking_payment();
    let method = match checkout {
        None => {
            tracing::debug!("Ignoring payment, booking screen not mounted");
            return Ok(back(jar));
        }
        Some(Err(BookingError::PaymentInProgress)) => {
            tracing::debug!("Ignoring payment, one is already in flight");
            return Ok(back(jar));
        }
        Some(result) => result?,
    };

    tokio::time::sleep(state.clients.timing().payment_delay()).await;
    client.lock().complete_booking(method, Instant::now());
    Ok(back(jar))
}

// ─────────────────────────────────────────────────────────────────────────────
// Inbox
// ─────────────────────────────────────────────────────────────────────────────

async fn inbox_open(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ConversationForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::inbox_mut, |i| i.open(form.conversation_id))
        .transpose()?;
    Ok(back(jar))
}

async fn inbox_close(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    client.with_screen(Shell::inbox_mut, |i| i.close());
    back(jar)
}

async fn inbox_send(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<MessageForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    let now = Instant::now();
    client
        .with_screen(Shell::inbox_mut, |i| i.send_text(&form.message, now))
        .transpose()?;
    Ok(back(jar))
}

/// POST /inbox/attach - Multipart upload; only the size and name are kept.
async fn inbox_attach(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("attachment").to_string();
        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            size = size.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
        }
        let now = Instant::now();
        client
            .with_screen(Shell::inbox_mut, |i| i.attach_file(&name, size, now))
            .transpose()?;
        break;
    }
    Ok(back(jar))
}

async fn inbox_voice(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    let now = Instant::now();
    client
        .with_screen(Shell::inbox_mut, |i| i.send_voice_note(now))
        .transpose()?;
    Ok(back(jar))
}

async fn inbox_video(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    let now = Instant::now();
    client
        .with_screen(Shell::inbox_mut, |i| i.send_video(now))
        .transpose()?;
    Ok(back(jar))
}

async fn inbox_call(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CallForm>,
) -> Result<Response, AppError> {
    let kind = match form.kind.as_str() {
        "audio" => CallKind::Audio,
        "video" => CallKind::Video,
        other => return Err(AppError::Invalid(format!("unknown call kind: {other}"))),
    };
    let (jar, client) = client(&state, jar);
    let mut shell = client.lock();
    if shell.inbox().is_some() {
        shell.notify(kind.notification(), Instant::now());
    }
    drop(shell);
    Ok(back(jar))
}

// ─────────────────────────────────────────────────────────────────────────────
// Reels
// ─────────────────────────────────────────────────────────────────────────────

async fn reels_like(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::reels_mut, |r| r.toggle_like(form.post_id))
        .transpose()?;
    Ok(back(jar))
}

async fn reels_show(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::reels_mut, |r| r.show(form.post_id))
        .transpose()?;
    Ok(back(jar))
}

// ─────────────────────────────────────────────────────────────────────────────
// Social
// ─────────────────────────────────────────────────────────────────────────────

async fn social_like(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::social_mut, |s| s.toggle_like(form.post_id))
        .transpose()?;
    Ok(back(jar))
}

async fn social_comments(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::social_mut, |s| s.toggle_comments(form.post_id))
        .transpose()?;
    Ok(back(jar))
}

async fn social_comment_like(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CommentRefForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::social_mut, |s| s.like_comment(form.post_id, &form.comment_id))
        .transpose()?;
    Ok(back(jar))
}

async fn social_reply(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CommentRefForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::social_mut, |s| s.start_reply(form.post_id, &form.comment_id))
        .transpose()?;
    Ok(back(jar))
}

async fn social_reply_cancel(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::social_mut, |s| s.cancel_reply(form.post_id))
        .transpose()?;
    Ok(back(jar))
}

async fn social_comment(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::social_mut, |s| s.add_comment(form.post_id, &form.text))
        .transpose()?;
    Ok(back(jar))
}

async fn social_story(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<StoryForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    let now = Instant::now();
    client
        .with_screen(Shell::social_mut, |s| s.open_story(form.story_id, now))
        .transpose()?;
    Ok(back(jar))
}

async fn social_story_close(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    client.with_screen(Shell::social_mut, |s| s.close_story());
    back(jar)
}

async fn social_profile(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::social_mut, |s| s.open_profile(form.post_id))
        .transpose()?;
    Ok(back(jar))
}

async fn social_profile_close(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    client.with_screen(Shell::social_mut, |s| s.close_profile());
    back(jar)
}

/// POST /social/compose - One composer button, carrying the draft text.
async fn social_compose(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ComposeForm>,
) -> Result<Response, AppError> {
    let action: ComposeAction = form.action.parse()?;
    let (jar, client) = client(&state, jar);
    let notice = client
        .with_screen(Shell::social_mut, |s| s.compose(action, &form.text))
        .transpose()?
        .flatten();
    if let Some(notice) = notice {
        client.lock().notify(notice, Instant::now());
    }
    Ok(back(jar))
}

async fn social_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<TextForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::social_mut, |s| s.publish(&form.text))
        .transpose()?;
    Ok(back(jar))
}

async fn social_share(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    let mut shell = client.lock();
    if shell.social().is_some() {
        shell.notify(SHARE_NOTICE, Instant::now());
    }
    drop(shell);
    back(jar)
}

/// POST /social/inbox - Header shortcut to the messaging tab.
async fn social_inbox(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    let mut shell = client.lock();
    if shell.social().is_some() {
        shell.select_tab(Tab::Chat);
    }
    drop(shell);
    back(jar)
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────────────────────────

/// POST /profile/theme - Toggle and persist the theme cookie.
async fn profile_theme(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    let mut shell = client.lock();
    if shell.profile().is_none() {
        return back(jar);
    }
    let theme = shell.toggle_theme();
    drop(shell);
    let jar = jar.add(
        Cookie::build((THEME_COOKIE, theme.as_str()))
            .path("/")
            .permanent()
            .same_site(SameSite::Lax),
    );
    back(jar)
}

async fn profile_language(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LanguageForm>,
) -> Result<Response, AppError> {
    let language: Language = form.language.parse()?;
    let (jar, client) = client(&state, jar);
    let mut shell = client.lock();
    if shell.profile().is_some() {
        shell.set_language(language);
    }
    drop(shell);
    Ok(back(jar))
}

async fn profile_topup_open(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    client.with_screen(Shell::profile_mut, |p| p.open_top_up());
    back(jar)
}

async fn profile_topup_close(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    client.with_screen(Shell::profile_mut, |p| p.close_top_up());
    back(jar)
}

async fn profile_topup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<MethodForm>,
) -> Result<Response, AppError> {
    let (jar, client) = client(&state, jar);
    client
        .with_screen(Shell::profile_mut, |p| p.choose_top_up(&form.method).map(|_| ()))
        .transpose()?;
    Ok(back(jar))
}

async fn profile_feedback(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, client) = client(&state, jar);
    let mut shell = client.lock();
    if shell.profile().is_some() {
        shell.notify(FEEDBACK_MESSAGE, Instant::now());
    }
    drop(shell);
    back(jar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_status_mapping() {
        assert_eq!(AppError::from(SocialError::UnknownPost(9)).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(SocialError::EmptyPost).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(InboxError::FileTooLarge { size: 1 }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(BookingError::UnknownOption(3)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(BookingError::PaymentInProgress).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}

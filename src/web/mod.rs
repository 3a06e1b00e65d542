use axum::{
    Router,
    extract::{Request, State},
    http::Uri,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tracing::warn;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer, cookie::SameSite};

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

mod assets;
pub mod auth;
mod error;
pub mod flash;
mod movies;
mod settings;
pub mod templates;
pub mod validation;

use error::ErrorPage;
pub use error::WebError;
use templates::PageContext;

/// Everything handlers share, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store, config: Config) -> Self {
        let auth = Arc::new(SeaOrmAuthService::new(store.clone()));
        Self {
            store,
            auth,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthService> {
        &self.auth
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(Arc::new(AppState::new(store, config)))
}

/// Header owner, nav state and the flashes queued for this session.
async fn page_context(
    state: &AppState,
    session: &Session,
    authenticated: bool,
) -> Result<PageContext, WebError> {
    let owner_name = state.store().first_user().await?.map(|user| user.name);
    let flashes = flash::take_flashes(session).await?;

    Ok(PageContext {
        owner_name,
        authenticated,
        flashes,
    })
}

/// Error pages are built without request context; fill it in here so they carry the
/// same header, nav and flashes as every other page.
async fn render_error_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let Some(page) = response.extensions().get::<ErrorPage>().copied() else {
        return response;
    };

    let ctx = match auth::resolve_user(&state, &session).await {
        Ok(current) => page_context(&state, &session, current.is_authenticated()).await,
        Err(e) => Err(e),
    };

    match ctx {
        Ok(ctx) => (response.status(), Html(page.render(&ctx))).into_response(),
        Err(e) => {
            warn!("Serving bare error page: {e}");
            response
        }
    }
}

async fn not_found(uri: Uri) -> WebError {
    WebError::not_found("Page", uri.path())
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )));

    let protected_routes = Router::new()
        .route("/logout", get(auth::logout))
        .route(
            "/settings",
            get(settings::settings_page).post(settings::update_settings),
        )
        .route(
            "/movie/edit/{id}",
            get(movies::edit_page).post(movies::update_movie),
        )
        .route("/movie/delete/{id}", post(movies::delete_movie))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_login,
        ));

    Router::new()
        .route("/", get(movies::index).post(movies::create_movie))
        .route("/login", get(auth::login_page).post(auth::login))
        .merge(protected_routes)
        .route("/static/{*path}", get(assets::serve_static))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            render_error_page,
        ))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

mod config;
mod error;
mod flash;
mod forms;
mod routes;
mod session;

use anyhow::Context as _;
use axum::Router;
use kitchen_service::{
    form::CookCreateForm,
    sea_orm::{Database, DatabaseConnection},
    Mutation as MutationCore, Query as QueryCore,
};
use migration::{Migrator, MigratorTrait};
use tera::Tera;
use tower_cookies::{CookieManagerLayer, Key};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::{AdminAccount, Config};
pub use error::AppError;
pub use session::{CurrentCook, Session, LOGIN_URL, SESSION_COOKIE_NAME};

#[tokio::main]
async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let conn = Database::connect(config.database_url.as_str())
        .await
        .context("Database connection failed")?;
    Migrator::up(&conn, None).await.context("Migrations failed")?;
    if let Some(admin) = &config.admin {
        bootstrap_admin(&conn, admin).await?;
    }

    let state = AppState::new(conn, config.session_key.clone())?;

    let server_url = config.server_url();
    let listener = tokio::net::TcpListener::bind(&server_url)
        .await
        .with_context(|| format!("Cannot listen on {server_url}"))?;
    info!(%server_url, "kitchen listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}

#[derive(Clone)]
pub struct AppState {
    templates: Tera,
    conn: DatabaseConnection,
    key: Key,
}

impl AppState {
    pub fn new(conn: DatabaseConnection, key: Key) -> anyhow::Result<Self> {
        let mut templates = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))
            .context("Tera initialization failed")?;
        templates.autoescape_on(vec![".html.tera"]);

        Ok(Self {
            templates,
            conn,
            key,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::index::routes())
        .merge(routes::auth::routes())
        .merge(routes::dish_type::routes())
        .merge(routes::dish::routes())
        .merge(routes::cook::routes())
        .merge(routes::ingredient::routes())
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the first cook so that somebody can log in to an empty kitchen.
pub async fn bootstrap_admin(conn: &DatabaseConnection, admin: &AdminAccount) -> anyhow::Result<()> {
    if QueryCore::count_cooks(conn).await? > 0 {
        return Ok(());
    }

    let form = CookCreateForm {
        username: admin.username.clone(),
        password1: admin.password.clone(),
        password2: admin.password.clone(),
        first_name: admin.username.clone(),
        last_name: "Admin".to_owned(),
        years_of_experience: 2,
    };
    let cook = MutationCore::create_cook(conn, form)
        .await
        .context("Cannot create the admin cook")?;
    info!(cook_id = cook.id, username = %cook.username, "admin cook created");

    Ok(())
}

pub fn main() {
    let result = start();

    if let Some(err) = result.err() {
        println!("Error: {err:#}");
    }
}

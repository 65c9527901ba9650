use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use label_sheet::{FontCatalog, LabelError, LabelJob};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Parser)]
#[command(name = "labelpress-server", about = "Label sheet rendering service", version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Where uploaded logos are persisted
    #[arg(long, default_value = "logo.png")]
    logo_path: PathBuf,

    /// Register a TTF family, as Family=path/to/font.ttf (repeatable)
    #[arg(long = "font", value_name = "FAMILY=PATH")]
    fonts: Vec<String>,

    /// Register a TTF family and mark it Arabic-capable
    #[arg(long, value_name = "FAMILY=PATH")]
    arabic_font: Option<String>,
}

struct AppState {
    catalog: FontCatalog,
    logo_path: PathBuf,
}

#[derive(Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct FieldError {
    field: String,
    message: String,
}

#[derive(Serialize)]
struct GenericError {
    error: String,
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn render_labels(
    State(state): State<Arc<AppState>>,
    Json(mut job): Json<LabelJob>,
) -> axum::response::Response {
    // The logo location is server policy, not a client choice.
    job.logo_path = Some(state.logo_path.clone());

    let catalog = state.catalog.clone();
    let result =
        tokio::task::spawn_blocking(move || label_sheet::render_sheet_bytes(&job, &catalog)).await;

    match result {
        Ok(Ok(bytes)) => (
            [(axum::http::header::CONTENT_TYPE, "application/pdf")],
            bytes,
        )
            .into_response(),
        Ok(Err(LabelError::Validation { field, reason })) => (
            StatusCode::BAD_REQUEST,
            Json(FieldError {
                field,
                message: reason,
            }),
        )
            .into_response(),
        Ok(Err(e)) => {
            log::error!("render failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenericError {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            log::error!("render task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenericError {
                    error: "render task failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn upload_logo(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;

        // Write to a temp file and rename, so a render that snapshots
        // the logo mid-upload never sees a half-written image.
        let temp_path = state.logo_path.with_extension("tmp");
        tokio::fs::write(&temp_path, &data)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        tokio::fs::rename(&temp_path, &state.logo_path)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        log::info!("logo replaced ({} bytes)", data.len());
        return Ok(Json(serde_json::json!({ "message": "Logo uploaded" })));
    }

    Err(StatusCode::BAD_REQUEST)
}

fn parse_font_arg(arg: &str) -> anyhow::Result<(String, PathBuf)> {
    let (family, path) = arg
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected FAMILY=PATH, got '{}'", arg))?;
    Ok((family.to_string(), PathBuf::from(path)))
}

async fn build_catalog(cli: &Cli) -> anyhow::Result<FontCatalog> {
    let mut catalog = FontCatalog::with_builtins();

    for font_arg in &cli.fonts {
        let (family, path) = parse_font_arg(font_arg)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                if let Err(e) = catalog.register_ttf(&family, &bytes) {
                    log::warn!("skipping font '{}': {}", family, e);
                }
            }
            Err(e) => log::warn!("skipping font '{}' ({}): {}", family, path.display(), e),
        }
    }

    if let Some(arabic_arg) = &cli.arabic_font {
        let (family, path) = parse_font_arg(arabic_arg)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => match catalog.register_arabic_ttf(&family, &bytes) {
                Ok(()) => log::info!("Arabic font '{}' registered", family),
                Err(e) => log::warn!("Arabic font '{}' unusable: {}", family, e),
            },
            Err(e) => log::warn!("Arabic font '{}' ({}): {}", family, path.display(), e),
        }
    }

    Ok(catalog)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let catalog = build_catalog(&cli).await?;

    let state = Arc::new(AppState {
        catalog,
        logo_path: cli.logo_path.clone(),
    });

    let app = Router::new()
        .route("/", get(service_info))
        .route("/render", post(render_labels))
        .route("/logo", post(upload_logo))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cli.port));
    log::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

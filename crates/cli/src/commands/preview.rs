use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use blog_builder_generator::archive::ASSETS_DIR;
use blog_builder_generator::project::{PROJECT_FILE, build_project, load_project};
use blog_builder_generator::render::html_escape;
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::PathBuf};
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

/// Live reload client, injected into every preview page
const RELOAD_SCRIPT: &str = r#"<script>
    // Hot reload via Server-Sent Events
    const eventSource = new EventSource('/_reload');
    eventSource.onmessage = () => {
        console.log('Reloading...');
        location.reload();
    };
    eventSource.onerror = () => {
        console.log('Preview server disconnected');
        eventSource.close();
    };
</script>
"#;

#[derive(Clone)]
struct AppState {
    blog_path: PathBuf,
    reload_tx: broadcast::Sender<()>,
}

/// Start preview server with hot reload for local development.
///
/// The page is rebuilt from blog.toml and the posts on every request, so an
/// edit shows up on the next reload. Assets are served from the project's
/// assets directory under `/assets`, matching the packaged layout.
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("📝 Starting preview server...");
    println!("   Blog: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Blog directory does not exist: {}\nRun 'blog-builder init {}' first",
            path.display(),
            path.display()
        );
    }

    if !path.join(PROJECT_FILE).exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'blog-builder init {}' first",
            PROJECT_FILE,
            path.display(),
            path.display()
        );
    }

    let project = load_project(&path).context("Failed to parse blog.toml")?;
    let title = project.info.complete().title;

    println!("   ✓ Loaded: {}", title);
    println!("   ✓ Template: {}", project.template);

    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        blog_path: path.clone(),
        reload_tx: reload_tx.clone(),
    };

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/_reload", get(sse_handler))
        .nest_service(
            &format!("/{}", ASSETS_DIR),
            ServeDir::new(path.join(&project.assets_dir)),
        )
        .with_state(state);

    let watcher_path = path.clone();
    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watcher_path, watcher_tx).await {
            eprintln!("File watcher error: {}", e);
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Watch for file changes and trigger reload
async fn watch_files(path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                if event.paths.iter().any(|p| is_watched_file(p)) {
                    println!("   📝 File changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Hidden files and editor backups do not trigger a reload
fn is_watched_file(path: &std::path::Path) -> bool {
    let filename = path.file_name().unwrap_or_default().to_string_lossy();
    !filename.starts_with('.') && !filename.ends_with('~')
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Insert the reload client before `</body>`, or append it
fn inject_reload_script(html: &str) -> String {
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}{}", &html[..pos], RELOAD_SCRIPT, &html[pos..]),
        None => format!("{}{}", html, RELOAD_SCRIPT),
    }
}

fn error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Error</title></head><body>
<h1>Build Error</h1>
<pre>{}</pre>
</body></html>"#,
        html_escape(message)
    )
}

/// Main index page handler
async fn index_handler(State(state): State<AppState>) -> Response {
    let html = match build_project(&state.blog_path) {
        Ok(site) => site.html,
        Err(e) => error_page(&e.to_string()),
    };
    Html(inject_reload_script(&html)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_inject_reload_script_before_body_end() {
        let html = inject_reload_script("<html><body><p>x</p></body></html>");
        let script = html.find("EventSource('/_reload')").unwrap();
        let body_end = html.find("</body>").unwrap();
        assert!(script < body_end);
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn test_inject_reload_script_without_body() {
        let html = inject_reload_script("<p>x</p>");
        assert!(html.starts_with("<p>x</p>"));
        assert!(html.contains("/_reload"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let page = error_page("bad <value>");
        assert!(page.contains("bad &lt;value&gt;"));
    }

    #[test]
    fn test_is_watched_file() {
        assert!(is_watched_file(Path::new("posts/a.md")));
        assert!(!is_watched_file(Path::new("posts/.a.md.swp")));
        assert!(!is_watched_file(Path::new("blog.toml~")));
    }
}

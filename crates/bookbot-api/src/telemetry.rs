use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
///
/// When `logging.file` is set, a second plain-text layer appends everything
/// at DEBUG and above to that file. The returned guard must outlive the
/// program's logging or buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = match config.format.as_str() {
        "json" => fmt::layer().json().with_filter(env_filter).boxed(),
        _ => fmt::layer().pretty().with_filter(env_filter).boxed(),
    };
    let mut layers: Vec<BoxedLayer> = vec![console];

    let mut file_error = None;
    let guard = match config.file.as_deref() {
        Some(path) => match file_layer(Path::new(path)) {
            Ok((layer, guard)) => {
                layers.push(layer);
                Some(guard)
            }
            Err(e) => {
                file_error = Some((path.to_string(), e));
                None
            }
        },
        None => None,
    };

    tracing_subscriber::registry().with(layers).init();

    if let Some((path, e)) = file_error {
        tracing::warn!(path = %path, "Failed to open log file, logging to console only: {}", e);
    }

    guard
}

/// DEBUG-level layer appending to `path`, creating its directory if needed
fn file_layer(path: &Path) -> io::Result<(BoxedLayer, WorkerGuard)> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(LevelFilter::DEBUG)
        .boxed();

    Ok((layer, guard))
}

//! `EnvLogger`: the `Logger` port forwarded onto the ambient `log` facade,
//! initialized by the `cli` binary via `env_logger` the same way the teacher
//! configures logging from `--verbose`/`RUST_LOG` (see `src/main.rs`).

use crate::ports::{Field, Level, Logger};

pub struct EnvLogger;

impl Logger for EnvLogger {
    fn log(&self, level: Level, message: &str, fields: &[Field<'_>]) {
        let suffix = render_fields(fields);
        match level {
            Level::Debug => log::debug!("{message}{suffix}"),
            Level::Info => log::info!("{message}{suffix}"),
            Level::Warn => log::warn!("{message}{suffix}"),
            Level::Error => log::error!("{message}{suffix}"),
        }
    }
}

fn render_fields(fields: &[Field<'_>]) -> String {
    if fields.is_empty() {
        return String::new();
    }
    let rendered = fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(" [{rendered}]")
}

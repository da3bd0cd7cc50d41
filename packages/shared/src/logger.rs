//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when it is set. Otherwise the crate named by `bin_name`
/// (dashes mapped to underscores) and the roomcast libraries log at
/// `default_level`, everything else at `warn`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let target = bin_name.replace('-', "_");
    format!(
        "warn,{target}={level},roomcast_server={level},roomcast_shared={level},tower_http={level}",
        level = default_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_map_bin_name_to_target() {
        // テスト項目: バイナリ名のダッシュがターゲット名のアンダースコアに変換される
        // when (操作):
        let directives = default_directives("roomcast-client", "debug");

        // then (期待する結果):
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("roomcast_client=debug"));
        assert!(directives.contains("roomcast_server=debug"));
    }

    #[test]
    fn test_setup_logger_twice_does_not_panic() {
        setup_logger("roomcast-test", "info");
        setup_logger("roomcast-test", "debug");
    }
}

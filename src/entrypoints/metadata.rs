use shadow_rs::shadow;

shadow!(build);

/// Log version info using the appropriate logging mechanism for the platform.
/// On Android, we use the `log` crate (which android_logger handles).
/// On other platforms, we use `tracing` (which our tracing_subscriber handles).
pub fn log_version_info() {
    #[cfg(target_os = "android")]
    {
        log::info!("{}", short_version_info());
        log::info!(
            "Build date: {} ({})",
            build::BUILD_TIME_2822,
            build::BUILD_RUST_CHANNEL
        );
    }
    #[cfg(not(target_os = "android"))]
    {
        tracing::info!("{}", short_version_info());
        tracing::info!(
            "Build date: {} ({})",
            build::BUILD_TIME_2822,
            build::BUILD_RUST_CHANNEL
        );
    }
}

/// `explore-map 0.1.0 (main@abc1234+dirty)`
pub fn short_version_info() -> String {
    format!(
        "{} {} ({}@{}{})",
        build::PROJECT_NAME,
        build::PKG_VERSION,
        build::BRANCH,
        build::SHORT_COMMIT,
        if build::GIT_CLEAN { "" } else { "+dirty" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_version_info() {
        let info = short_version_info();
        assert!(info.starts_with("explore-map "), "got {info}");
        assert!(info.contains(env!("CARGO_PKG_VERSION")));
    }
}

// === Entry point for android ===
#[cfg(target_os = "android")]
pub fn android_main(app: winit::platform::android::activity::AndroidApp) {
    use winit::platform::android::EventLoopBuilderExtAndroid;

    android_logger::init_once(
        android_logger::Config::default().with_max_level(log::LevelFilter::Info),
    );
    log::info!("Starting Explore Map on Android");

    unsafe {
        // Safe: single-threaded at startup
        std::env::set_var("RUST_BACKTRACE", "full");
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            log::error!("Failed to create the async runtime: {err}");
            return;
        }
    };

    rt.block_on(async {
        if let Some(app_creator) = super::run::setup_app().await {
            let native_options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default().with_title(super::run::APP_NAME),
                event_loop_builder: Some(Box::new(move |builder| {
                    builder.with_android_app(app);
                })),
                ..Default::default()
            };

            if let Err(err) = eframe::run_native(
                super::run::APP_NAME,
                native_options,
                Box::new(move |cc| Ok(app_creator(cc))),
            ) {
                log::error!("App exited with an error: {err}");
            }
        }
    });
}

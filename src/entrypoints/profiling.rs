//! Optional puffin profiling server, toggled from the help window

#[cfg(feature = "profiling")]
const PUFFIN_ADDR: &str = "127.0.0.1:8585";

#[cfg(feature = "profiling")]
pub struct ProfilingServer {
    server: Option<puffin_http::Server>,
}

#[cfg(feature = "profiling")]
impl ProfilingServer {
    pub fn start() -> Self {
        puffin::set_scopes_on(true); // tell puffin to collect data

        match puffin_http::Server::new(PUFFIN_ADDR) {
            Ok(puffin_server) => {
                tracing::info!(
                    "Profiling enabled, to view: cargo install puffin_viewer && ~/.cargo/bin/puffin_viewer --url {PUFFIN_ADDR}"
                );
                ProfilingServer {
                    server: Some(puffin_server),
                }
            }
            Err(err) => {
                tracing::error!("Failed to start puffin server: {err}");
                ProfilingServer { server: None }
            }
        }
    }

    pub fn is_serving(&self) -> bool {
        self.server.is_some()
    }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilingServer {
    fn drop(&mut self) {
        puffin::set_scopes_on(false);
        if self.server.take().is_some() {
            tracing::info!("Profiling server stopped");
        }
    }
}

/// Checkbox starting and stopping the profiling server.
pub fn profiling_ui(ui: &mut egui::Ui) {
    #[cfg(feature = "profiling")]
    {
        use std::cell::RefCell;

        thread_local! {
            static PROFILING_SERVER: RefCell<Option<ProfilingServer>> = const { RefCell::new(None) };
        }

        PROFILING_SERVER.with_borrow_mut(|server| {
            let mut enabled = server.is_some();
            if ui
                .checkbox(&mut enabled, "Enable Profiling Server")
                .changed()
            {
                *server = enabled.then(ProfilingServer::start);
            }
            if server.as_ref().is_some_and(|s| !s.is_serving()) {
                ui.colored_label(ui.visuals().warn_fg_color, "Server failed to start");
            }
        });
        egui::warn_if_debug_build(ui);
    }
    #[cfg(not(feature = "profiling"))]
    {
        ui.label("Profiling feature is disabled in this build.");
    }
}

#![deny(clippy::all, clippy::pedantic)]
#![allow(non_snake_case, clippy::module_name_repetitions)]

use std::rc::Rc;

use leptos::{component, create_signal, provide_context, view, IntoView};
use leptos_router::{Route, Router, Routes, A};
use tracing::{error, info, Level};
use wasm_tracing::WASMLayerConfigBuilder;

use crate::app::FleetApp;
use crate::components::{BrowserConfirm, Toaster, Toasts};
use crate::config::Config;
use crate::fleet::components::{Dashboard, DashboardSink, DashboardState};
use crate::readings::components::Readings;
use crate::reports::components::Reports;
use crate::request::HttpTransport;

mod app;
mod components;
mod config;
mod datetime;
mod download;
mod error;
mod fleet;
mod ingest;
mod notify;
mod readings;
mod reports;
mod request;
#[cfg(test)]
mod testing;
mod types;

fn main() {
    console_error_panic_hook::set_once();
    wasm_tracing::set_as_global_default_with_config(
        WASMLayerConfigBuilder::new()
            .set_max_level(Level::INFO)
            .build(),
    );
    leptos::mount_to_body(|| view! { <App /> });
}

#[component]
fn App() -> impl IntoView {
    let config = Config::from_build_env();
    let api_base_url = if config.api_base_url.is_empty() {
        leptos::window().location().origin().unwrap_or_else(|err| {
            error!("window origin unavailable: {err:?}");
            String::new()
        })
    } else {
        config.api_base_url.clone()
    };
    info!(api = %api_base_url, "starting fleet monitor");

    let (fleet_view, set_view) = create_signal(None);
    let (refreshed_at, set_refreshed_at) = create_signal(None);
    let (notifications, set_notifications) = create_signal(Vec::new());

    let app = FleetApp::new(
        &config,
        Rc::new(HttpTransport::new(api_base_url)),
        Rc::new(DashboardSink {
            set_view,
            set_refreshed_at,
        }),
        Rc::new(Toaster::new(set_notifications, config.notification_ttl)),
        Rc::new(BrowserConfirm),
    );

    provide_context(app);
    provide_context(DashboardState {
        view: fleet_view,
        refreshed_at,
    });
    provide_context(config);

    view! {
        <main class="container-fluid">
            <Router>
                <nav>
                    <ul>
                        <li>
                            <strong>
                                <A href="/">"Fleet Monitor"</A>
                            </strong>
                        </li>
                    </ul>
                    <ul>
                        <li>
                            <A href="/">"Units"</A>
                        </li>
                        <li>
                            <A href="/reports">"Reports"</A>
                        </li>
                    </ul>
                </nav>
                <div class="h-full w-full overflow-auto">
                    <Routes>
                        <Route path="/" view=Dashboard />
                        <Route path="/units/:id/readings" view=Readings />
                        <Route path="/reports" view=Reports />
                        <Route path="/*any" view=|| view! { <h1>"Not Found"</h1> } />
                    </Routes>
                </div>
            </Router>
            <Toasts notifications />
        </main>
    }
}

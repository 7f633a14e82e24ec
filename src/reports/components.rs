use chrono::Utc;
use leptos::{component, expect_context, spawn_local, view, For, IntoView, SignalGet};
use tracing::error;

use crate::components::Spinner;
use crate::download::save_bytes;
use crate::fleet::components::AppServices;
use crate::request::{create_request, Transport};
use crate::types::{ReportRow, ReportScope};

use super::{fetch_report, SPREADSHEET_MIME};

/// Fetches a spreadsheet and saves it, reporting the outcome as notifications.
pub fn download_report(app: &AppServices, scope: ReportScope) {
    let app = app.clone();
    spawn_local(async move {
        app.notifier.info("Preparing report...");

        let saved = match fetch_report(app.transport.as_ref(), scope, Utc::now()).await {
            Ok(report) => save_bytes(&report.filename, &report.bytes, SPREADSHEET_MIME),
            Err(err) => Err(err.into()),
        };

        match saved {
            Ok(()) => app.notifier.success("Report downloaded"),
            Err(err) => {
                error!(?scope, "report download failed: {err}");
                app.notifier.error("Report could not be downloaded");
            }
        }
    });
}

#[component]
pub fn Reports() -> impl IntoView {
    let app = expect_context::<AppServices>();
    let transport = app.transport.clone();
    let notifier = app.notifier.clone();

    let rows = create_request(
        || (),
        move |()| {
            let transport = transport.clone();
            let notifier = notifier.clone();
            async move {
                let rows = transport.report_summary().await;
                if rows.is_err() {
                    notifier.error("Reports could not be loaded");
                }
                rows
            }
        },
    );

    view! {
        <div class="w-full p-4 flex flex-col items-center">
            <button on:click=move |_| download_report(&app, ReportScope::All)>
                "Download all units (Excel)"
            </button>
            {move || {
                if rows.loading().get() {
                    view! { <Spinner /> }.into_view()
                } else {
                    let rows = rows.get().flatten().unwrap_or_default();
                    view! { <ReportTable rows></ReportTable> }.into_view()
                }
            }}
        </div>
    }
}

#[component]
pub fn ReportTable(rows: Vec<ReportRow>) -> impl IntoView {
    let is_empty = rows.is_empty();

    view! {
        <div class="overflow-auto">
            <table class="striped">
                <thead>
                    <tr>
                        <th scope="col">"ID"</th>
                        <th scope="col">"Name"</th>
                        <th scope="col">"Model"</th>
                        <th scope="col">"Status"</th>
                        <th scope="col">"Battery"</th>
                        <th scope="col">"Readings"</th>
                        <th scope="col">"Avg. temperature"</th>
                        <th scope="col">"Avg. humidity"</th>
                        <th scope="col">"Avg. speed"</th>
                        <th scope="col">"Last reading"</th>
                        <th scope="col">"Created"</th>
                    </tr>
                </thead>
                <tbody>
                    {is_empty
                        .then(|| {
                            view! {
                                <tr>
                                    <td colspan="11">"No units yet"</td>
                                </tr>
                            }
                        })}
                    <For each=move || rows.clone() key=|row| row.id let:row>
                        <ReportRowView row></ReportRowView>
                    </For>
                </tbody>
            </table>
        </div>
    }
}

#[component]
pub fn ReportRowView(row: ReportRow) -> impl IntoView {
    view! {
        <tr>
            <td>{row.id}</td>
            <td>
                <strong>{row.name}</strong>
            </td>
            <td>{row.model}</td>
            <td>
                <span class=format!("status-badge status-{}", row.status)>{row.status.label()}</span>
            </td>
            <td>{row.battery.to_string()}</td>
            <td>{row.sensor_count}</td>
            <td>{format!("{:.2} °C", row.avg_temperature)}</td>
            <td>{format!("{:.2} %", row.avg_humidity)}</td>
            <td>{format!("{:.2} m/s", row.avg_speed)}</td>
            <td>
                <small>{row.last_reading}</small>
            </td>
            <td>
                <small>{row.created_at}</small>
            </td>
        </tr>
    }
}

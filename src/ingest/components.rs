use leptos::ev::{Event, MouseEvent};
use leptos::{
    component, create_signal, event_target, expect_context, spawn_local, view, CollectView,
    IntoView, SignalGet, SignalSet,
};
use tracing::error;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

use crate::download::save_json;
use crate::error::IngestError;
use crate::fleet::components::AppServices;
use crate::types::UnitId;

use super::bulk::{BulkReport, LineOutcome};
use super::{sample_bulk, sample_single, IngestState, UploadFile};

const SINGLE_SAMPLE_FILENAME: &str = "sensor_data_sample.json";
const BULK_SAMPLE_FILENAME: &str = "bulk_sensor_data_sample.json";

pub struct BrowserFile(File);

impl UploadFile for BrowserFile {
    fn name(&self) -> String {
        self.0.name()
    }

    async fn read_text(&self) -> Result<String, IngestError> {
        let text = JsFuture::from(self.0.text())
            .await
            .map_err(|err| IngestError::Read(format!("{err:?}")))?;

        text.as_string()
            .ok_or_else(|| IngestError::Read("file content is not text".to_string()))
    }
}

fn selected_file(ev: &Event) -> Option<BrowserFile> {
    let input = event_target::<HtmlInputElement>(ev);
    let file = input.files()?.get(0)?;
    // Clearing lets the same file be picked again after a failure.
    input.set_value("");
    Some(BrowserFile(file))
}

fn state_label(state: IngestState) -> &'static str {
    match state {
        IngestState::Idle | IngestState::Done { .. } | IngestState::Failed => "",
        IngestState::Validating => "Checking file...",
        IngestState::Reading => "Reading file...",
        IngestState::Parsing => "Parsing readings...",
        IngestState::Submitting => "Uploading...",
    }
}

#[component]
pub fn SingleUpload(unit_id: UnitId, unit_name: String) -> impl IntoView {
    let app = expect_context::<AppServices>();
    let (state, set_state) = create_signal(IngestState::Idle);
    let (outcome, set_outcome) = create_signal(None::<Result<String, String>>);

    let on_change = move |ev: Event| {
        let Some(file) = selected_file(&ev) else {
            return;
        };
        set_outcome.set(None);

        let app = app.clone();
        spawn_local(async move {
            let result = app
                .ingest
                .ingest(unit_id, &file, |state| set_state.set(state))
                .await;
            let result = match result {
                Ok(report) => {
                    app.notifier.success(&report.message());
                    Ok(report.message())
                }
                Err(err) => {
                    app.notifier.error(&err.to_string());
                    Err(err.to_string())
                }
            };
            set_outcome.set(Some(result));
        });
    };

    view! {
        <article class="upload">
            <small>"Readings for " {unit_name}</small>
            <input
                type="file"
                accept=".json"
                disabled=move || state.get().is_busy()
                on:change=on_change
            />
            <small aria-busy=move || state.get().is_busy().to_string()>
                {move || state_label(state.get())}
            </small>
            {move || {
                outcome
                    .get()
                    .map(|outcome| match outcome {
                        Ok(message) => view! { <p class="success">{message}</p> },
                        Err(message) => view! { <p class="error">{message}</p> },
                    })
            }}
        </article>
    }
}

#[component]
pub fn BulkUpload() -> impl IntoView {
    let app = expect_context::<AppServices>();
    let (state, set_state) = create_signal(IngestState::Idle);
    let (outcome, set_outcome) = create_signal(None::<Result<BulkReport, String>>);

    let on_change = {
        let app = app.clone();
        move |ev: Event| {
            let Some(file) = selected_file(&ev) else {
                return;
            };
            set_outcome.set(None);

            let app = app.clone();
            spawn_local(async move {
                let result = app
                    .bulk
                    .ingest(&file, |state| set_state.set(state))
                    .await
                    .map_err(|err| err.to_string());
                match &result {
                    Ok(report) => app.notifier.success(&report.summary),
                    Err(message) => app.notifier.error(message),
                }
                set_outcome.set(Some(result));
            });
        }
    };

    let download_sample = move |filename: &'static str, single: bool| {
        let app = app.clone();
        move |_: MouseEvent| {
            let saved = if single {
                save_json(filename, &sample_single())
            } else {
                save_json(filename, &sample_bulk())
            };
            if let Err(err) = saved {
                error!(filename, "sample download failed: {err}");
                app.notifier.error("Sample could not be downloaded");
            }
        }
    };

    view! {
        <details>
            <summary>"Bulk upload (JSON)"</summary>
            <fieldset role="group">
                <input
                    type="file"
                    accept=".json"
                    disabled=move || state.get().is_busy()
                    on:change=on_change
                />
            </fieldset>
            <div class="grid">
                <button class="outline" on:click=download_sample(SINGLE_SAMPLE_FILENAME, true)>
                    "Single unit sample"
                </button>
                <button class="outline" on:click=download_sample(BULK_SAMPLE_FILENAME, false)>
                    "Bulk sample"
                </button>
            </div>
            <small aria-busy=move || state.get().is_busy().to_string()>
                {move || state_label(state.get())}
            </small>
            {move || {
                outcome
                    .get()
                    .map(|outcome| match outcome {
                        Ok(report) => view! { <BulkResults report></BulkResults> },
                        Err(message) => view! { <p class="error">{message}</p> }.into_view(),
                    })
            }}
        </details>
    }
}

#[component]
fn BulkResults(report: BulkReport) -> impl IntoView {
    view! {
        <div class="bulk-results">
            <p>
                <strong>{report.summary}</strong>
            </p>
            <ul>
                {report
                    .lines
                    .into_iter()
                    .map(|line| {
                        let class = match line.outcome {
                            LineOutcome::Success => "success",
                            LineOutcome::Error => "error",
                        };
                        view! { <li class=class>{line.text}</li> }
                    })
                    .collect_view()}
            </ul>
        </div>
    }
}

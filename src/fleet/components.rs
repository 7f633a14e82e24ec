use chrono::{DateTime, Utc};
use leptos::ev::{KeyboardEvent, MouseEvent};
use leptos::{
    component, create_signal, event_target_value, expect_context, spawn_local, view,
    CollectView, IntoView, ReadSignal, Show, SignalGet, SignalSet, SignalUpdate, WriteSignal,
};
use leptos_router::A;
use leptos_use::use_interval_fn;
use tracing::debug;

use crate::app::FleetApp;
use crate::components::Spinner;
use crate::config::Config;
use crate::datetime::display_datetime;
use crate::fleet::actions::ActionOutcome;
use crate::ingest::components::{BulkUpload, SingleUpload};
use crate::reports::components::download_report;
use crate::request::{create_request, HttpTransport, Transport};
use crate::types::ReportScope;

use super::render::{FleetView, ListView, RenderSink, StatsView, UnitCard};

pub type AppServices = FleetApp<HttpTransport>;

/// Writes each rendered view into the dashboard signals.
#[derive(Debug, Clone, Copy)]
pub struct DashboardSink {
    pub set_view: WriteSignal<Option<FleetView>>,
    pub set_refreshed_at: WriteSignal<Option<DateTime<Utc>>>,
}

impl RenderSink for DashboardSink {
    fn render(&self, view: FleetView) {
        self.set_view.set(Some(view));
        self.set_refreshed_at.set(Some(Utc::now()));
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardState {
    pub view: ReadSignal<Option<FleetView>>,
    pub refreshed_at: ReadSignal<Option<DateTime<Utc>>>,
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let app = expect_context::<AppServices>();
    let config = expect_context::<Config>();
    let DashboardState { view: fleet, refreshed_at } = expect_context::<DashboardState>();

    let refresh = {
        let app = app.clone();
        move || {
            let app = app.clone();
            spawn_local(async move {
                let _ = app.sync.refresh().await;
            });
        }
    };
    refresh();

    #[expect(clippy::cast_possible_truncation)]
    let interval = config.refresh_interval.as_millis() as u64;
    debug!(interval, "scheduling refresh");
    let _ = use_interval_fn(refresh, interval);

    let transport = app.transport.clone();
    let remote_stats = create_request(
        move || refreshed_at.get(),
        move |_| {
            let transport = transport.clone();
            async move { transport.stats().await }
        },
    );

    let refresh_now = {
        let app = app.clone();
        move |_: MouseEvent| {
            let app = app.clone();
            spawn_local(async move {
                let _ = app.sync.refresh_now().await;
            });
        }
    };

    view! {
        <div class="w-full p-4 flex flex-col">
            <header class="flex justify-between">
                <small>
                    {move || {
                        refreshed_at
                            .get()
                            .map(|at| format!("Last refresh {}", display_datetime(at)))
                            .unwrap_or_default()
                    }}
                    " (every "
                    {humantime::format_duration(config.refresh_interval).to_string()}
                    ")"
                </small>
                <button class="outline" on:click=refresh_now>
                    "Refresh"
                </button>
            </header>
            {move || fleet.get().map(|fleet| view! { <Stats stats=fleet.stats></Stats> })}
            <small>
                {move || {
                    remote_stats
                        .get()
                        .flatten()
                        .map(|stats| {
                            format!(
                                "Service totals: {} units, {} active, {} readings",
                                stats.total_robots,
                                stats.active_robots,
                                stats.total_sensors,
                            )
                        })
                }}
            </small>
            <AddUnit />
            <BulkUpload />
            {move || match fleet.get() {
                None => view! { <Spinner /> }.into_view(),
                Some(FleetView { list: ListView::Empty { message }, .. }) => {
                    view! { <p class="empty-state">{message}</p> }.into_view()
                }
                Some(FleetView { list: ListView::Cards(cards), .. }) => {
                    view! {
                        <div class="grid">
                            {cards
                                .into_iter()
                                .map(|card| view! { <UnitCardView card></UnitCardView> })
                                .collect_view()}
                        </div>
                    }
                        .into_view()
                }
            }}
        </div>
    }
}

#[component]
fn Stats(stats: StatsView) -> impl IntoView {
    view! {
        <div class="grid stats">
            <article>
                <header>"Units"</header>
                {stats.total}
            </article>
            <article>
                <header>"Active"</header>
                {stats.active}
            </article>
            <article>
                <header>"Idle"</header>
                {stats.idle}
            </article>
            <article>
                <header>"Avg. battery"</header>
                {stats.average_battery}
            </article>
        </div>
    }
}

#[component]
fn AddUnit() -> impl IntoView {
    let app = expect_context::<AppServices>();
    let (name, set_name) = create_signal(String::new());
    let (model, set_model) = create_signal(String::new());

    let submit = move || {
        let app = app.clone();
        spawn_local(async move {
            let outcome = app.actions.create(&name.get(), &model.get()).await;
            if outcome == ActionOutcome::Done {
                set_name.set(String::new());
                set_model.set(String::new());
            }
        });
    };
    let submit_on_enter = {
        let submit = submit.clone();
        move |ev: KeyboardEvent| {
            if ev.key() == "Enter" {
                submit();
            }
        }
    };

    view! {
        <fieldset role="group">
            <input
                placeholder="Unit name"
                prop:value=name
                on:input=move |ev| set_name.set(event_target_value(&ev))
                on:keypress=submit_on_enter.clone()
            />
            <input
                placeholder="Model"
                prop:value=model
                on:input=move |ev| set_model.set(event_target_value(&ev))
                on:keypress=submit_on_enter
            />
            <button on:click=move |_| submit()>"New unit"</button>
        </fieldset>
    }
}

#[component]
fn UnitCardView(card: UnitCard) -> impl IntoView {
    let app = expect_context::<AppServices>();
    let (menu_open, set_menu_open) = create_signal(false);
    let (upload_open, set_upload_open) = create_signal(false);

    let id = card.id;
    let transitions = card.transitions.into_iter().map(|target| {
        let app = app.clone();
        view! {
            <button
                class=format!("outline status-{target}")
                on:click=move |_| {
                    set_menu_open.set(false);
                    let app = app.clone();
                    spawn_local(async move {
                        let _ = app.status.transition(id, target).await;
                    });
                }
            >
                {target.label()}
            </button>
        }
    })
    .collect_view();

    let simulate = {
        let app = app.clone();
        move |_: MouseEvent| {
            let app = app.clone();
            spawn_local(async move {
                app.actions.simulate(id).await;
            });
        }
    };
    let delete = {
        let app = app.clone();
        move |_: MouseEvent| {
            let app = app.clone();
            spawn_local(async move {
                app.actions.delete(id).await;
            });
        }
    };
    let unit_name = card.name.clone();

    view! {
        <article class="unit-card">
            <header class="flex justify-between">
                <hgroup>
                    <h5>{card.name}</h5>
                    <small>{card.model}</small>
                </hgroup>
                <button
                    class=format!("status-badge status-{}", card.status)
                    title="Change status"
                    on:click=move |_| set_menu_open.update(|open| *open = !*open)
                >
                    {card.status_label}
                </button>
            </header>
            <Show when=move || menu_open.get()>
                <div class="status-menu">{transitions.clone()}</div>
            </Show>
            <small>{card.battery_label}</small>
            <progress value=card.battery.percent() max="100"></progress>
            <small>"Created " {card.created_at}</small>
            <footer class="grid">
                <button on:click=move |_| set_upload_open.update(|open| *open = !*open)>
                    "Upload readings (JSON)"
                </button>
                <A href=format!("/units/{id}/readings")>"View readings"</A>
                <button on:click=simulate>"Simulate"</button>
                <button on:click=move |_| download_report(&app, ReportScope::Unit(id))>
                    "Download report"
                </button>
                <button class="secondary" on:click=delete>
                    "Delete"
                </button>
            </footer>
            <Show when=move || upload_open.get()>
                <SingleUpload unit_id=id unit_name=unit_name.clone() />
            </Show>
        </article>
    }
}

use leptos::ev::MouseEvent;
use leptos::html::Canvas as CanvasNode;
use leptos::{component, view, CollectView, IntoView, NodeRef, Signal, SignalGet, SignalSet};
use leptos_router::A;

use crate::components::Spinner;
use crate::types::Reading;

use super::canvas::DrawnChart;
use super::create_readings::{create_readings, CreateReadingsReturn};

pub const EMPTY_READINGS_MESSAGE: &str =
    "No sensor readings yet. Upload a JSON file or simulate one.";

#[component]
pub fn Readings() -> impl IntoView {
    let CreateReadingsReturn {
        canvas_node_ref,
        set_mouse_x,
        set_canvas_has_focus,

        id,
        is_loading,
        readings,
        chart,
        mouse_x,
        canvas_has_focus,
        canvas_actual_width,
        canvas_actual_height,
    } = create_readings();

    let handle_mousemove = move |evt: MouseEvent| {
        let Some(canvas_node) = canvas_node_ref.get() else {
            return;
        };

        let dom_rect = canvas_node.get_bounding_client_rect();
        set_mouse_x.set(f64::from(evt.client_x()) - dom_rect.left());
    };

    let is_empty = move || readings.get().map_or(true, |readings| readings.is_empty());

    view! {
        <div class="w-full p-4 flex flex-col">
            <header class="flex justify-between">
                <h4>
                    {move || id.get().map(|id| format!("Unit {id} readings")).unwrap_or_default()}
                </h4>
                <A href="/">"Back to fleet"</A>
            </header>
            <div class="w-full flex justify-center" class:hidden=move || !is_loading.get()>
                <Spinner />
            </div>
            <p class="empty-state" class:hidden=move || is_loading.get() || !is_empty()>
                {EMPTY_READINGS_MESSAGE}
            </p>
            <div
                class="relative"
                class:hidden=move || is_loading.get() || is_empty()
                on:mousemove=handle_mousemove
                on:mouseenter=move |_| set_canvas_has_focus.set(true)
                on:mouseleave=move |_| set_canvas_has_focus.set(false)
            >
                <Tooltip chart mouse_x canvas_has_focus></Tooltip>
                <Canvas
                    canvas_node_ref
                    actual_width=canvas_actual_width
                    actual_height=canvas_actual_height
                ></Canvas>
            </div>
            {move || {
                readings
                    .get()
                    .filter(|readings| !readings.is_empty())
                    .map(|readings| view! { <ReadingList readings></ReadingList> })
            }}
        </div>
    }
}

#[component]
fn Canvas(
    canvas_node_ref: NodeRef<CanvasNode>,
    actual_width: Signal<f64>,
    actual_height: Signal<f64>,
) -> impl IntoView {
    view! {
        <canvas
            class="border border-black w-full"
            node_ref=canvas_node_ref
            width=actual_width
            height=actual_height
            style:width="100%"
            style:height="400px"
        />
    }
}

#[component]
fn Tooltip(
    chart: Signal<Option<DrawnChart>>,
    mouse_x: Signal<f64>,
    canvas_has_focus: Signal<bool>,
) -> impl IntoView {
    let point = move || chart.get()?.point_at(mouse_x.get());

    view! {
        <article
            class="absolute flex flex-col"
            class:hidden=move || !canvas_has_focus.get() || point().is_none()
            style:left=move || format!("{}px", mouse_x.get() + 8.0)
            style:top="8px"
        >
            {move || {
                point()
                    .map(|point| {
                        view! {
                            <div>{point.label}</div>
                            {point
                                .values
                                .into_iter()
                                .map(|(metric, value)| {
                                    view! {
                                        <div>
                                            <span style:color=metric.color()>{metric.label()}</span>
                                            ": "
                                            {format!("{value:.2}")}
                                        </div>
                                    }
                                })
                                .collect_view()}
                        }
                    })
            }}
        </article>
    }
}

#[component]
fn ReadingList(readings: Vec<Reading>) -> impl IntoView {
    view! {
        <ol class="readings">
            {readings
                .into_iter()
                .enumerate()
                .map(|(index, reading)| {
                    view! {
                        <li>
                            {format!(
                                "#{} - {:.1} °C | {:.1} % | {:.1} m/s | {}",
                                index + 1,
                                reading.temperature,
                                reading.humidity,
                                reading.speed,
                                reading.timestamp,
                            )}
                        </li>
                    }
                })
                .collect_view()}
        </ol>
    }
}

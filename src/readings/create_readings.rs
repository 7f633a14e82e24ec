use std::{cell::RefCell, rc::Rc};

use leptos::{
    create_effect, create_node_ref, create_signal, expect_context, html::Canvas, on_cleanup,
    NodeRef, Params, Signal, SignalGet, SignalSet, SignalWith, WriteSignal,
};
use leptos_router::{use_params, Params};
use leptos_use::{use_device_pixel_ratio, use_element_size, UseElementSizeReturn};
use tracing::{debug, error};

use crate::fleet::components::AppServices;
use crate::request::{create_request, Transport};
use crate::types::{Reading, UnitId};

use super::canvas::{DrawnChart, ReadingsCanvas};
use super::chart::ChartProjector;

pub struct CreateReadingsReturn {
    pub canvas_node_ref: NodeRef<Canvas>,
    pub set_mouse_x: WriteSignal<f64>,
    pub set_canvas_has_focus: WriteSignal<bool>,

    pub id: Signal<Option<UnitId>>,
    pub is_loading: Signal<bool>,
    pub readings: Signal<Option<Vec<Reading>>>,
    pub chart: Signal<Option<DrawnChart>>,
    pub mouse_x: Signal<f64>,
    pub canvas_has_focus: Signal<bool>,
    pub canvas_actual_width: Signal<f64>,
    pub canvas_actual_height: Signal<f64>,
}

pub fn create_readings() -> CreateReadingsReturn {
    let app = expect_context::<AppServices>();
    let id = use_params_id();

    let canvas_node_ref = create_node_ref::<Canvas>();
    let dpr = use_device_pixel_ratio();
    let UseElementSizeReturn {
        width: canvas_width,
        height: canvas_height,
    } = use_element_size(canvas_node_ref);

    let (chart, set_chart) = create_signal::<Option<DrawnChart>>(None);
    let (mouse_x, set_mouse_x) = create_signal(0.0);
    let (canvas_has_focus, set_canvas_has_focus) = create_signal(false);

    let transport = app.transport.clone();
    let notifier = app.notifier.clone();
    let readings = create_request(
        move || id.get(),
        move |id| {
            let transport = transport.clone();
            let notifier = notifier.clone();
            async move {
                let Some(id) = id else {
                    return Ok(Vec::new());
                };
                let readings = transport.readings(id).await;
                if readings.is_err() {
                    notifier.error("Readings could not be loaded");
                }
                readings
            }
        },
    );

    let projector = Rc::new(RefCell::new(None::<ChartProjector<ReadingsCanvas>>));

    create_effect({
        let projector = projector.clone();
        move |_| {
            let Some(node) = canvas_node_ref.get() else {
                return;
            };
            let readings = readings.get().flatten().unwrap_or_default();
            let (width, height, dpr) = (canvas_width.get(), canvas_height.get(), dpr.get());

            let mut projector = projector.borrow_mut();
            if readings.is_empty() {
                if let Some(projector) = projector.as_mut() {
                    projector.release();
                }
                set_chart.set(None);
                return;
            }

            if let Some(projector) = projector.as_mut() {
                projector.surface_mut().resize(width, height, dpr);
            } else {
                match ReadingsCanvas::try_new(&node, width, height, dpr) {
                    Ok(canvas) => *projector = Some(ChartProjector::new(canvas)),
                    Err(err) => {
                        error!("readings canvas failed to initialize: {err}");
                        return;
                    }
                }
            }

            let Some(projector) = projector.as_mut() else {
                return;
            };
            match projector.show(&readings) {
                Ok(drawn) => set_chart.set(Some(drawn.clone())),
                Err(err) => {
                    debug!("readings chart not drawn: {err}");
                    set_chart.set(None);
                }
            }
        }
    });

    on_cleanup(move || {
        if let Some(projector) = projector.borrow_mut().as_mut() {
            projector.release();
        }
    });

    let canvas_actual_width = move || canvas_width.get() * dpr.get();
    let canvas_actual_height = move || canvas_height.get() * dpr.get();

    CreateReadingsReturn {
        canvas_node_ref,
        set_mouse_x,
        set_canvas_has_focus,

        id,
        is_loading: readings.loading().into(),
        readings: Signal::derive(move || readings.get().flatten()),
        chart: chart.into(),
        mouse_x: mouse_x.into(),
        canvas_has_focus: canvas_has_focus.into(),
        canvas_actual_width: canvas_actual_width.into(),
        canvas_actual_height: canvas_actual_height.into(),
    }
}

#[derive(Params, PartialEq)]
struct ReadingsParams {
    id: Option<UnitId>,
}

fn use_params_id() -> Signal<Option<UnitId>> {
    let params = use_params::<ReadingsParams>();
    let id = move || params.with(|params| params.as_ref().ok().and_then(|params| params.id));
    id.into()
}

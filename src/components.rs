use std::time::Duration;

use leptos::{
    component, set_timeout, view, For, IntoView, ReadSignal, SignalGet, SignalUpdate, WriteSignal,
};
use tracing::error;

use crate::notify::{Confirm, Notification, Notifier};

#[component]
pub fn Spinner() -> impl IntoView {
    view! { <article aria-busy="true"></article> }
}

/// Notifications shown in a corner stack, each removed once its lifetime is over.
#[derive(Debug, Clone, Copy)]
pub struct Toaster {
    set_notifications: WriteSignal<Vec<Notification>>,
    ttl: Duration,
}

impl Toaster {
    pub fn new(set_notifications: WriteSignal<Vec<Notification>>, ttl: Duration) -> Self {
        Self {
            set_notifications,
            ttl,
        }
    }
}

impl Notifier for Toaster {
    fn notify(&self, notification: Notification) {
        let id = notification.id;
        self.set_notifications
            .update(|notifications| notifications.push(notification));

        let set_notifications = self.set_notifications;
        set_timeout(
            move || {
                set_notifications
                    .update(|notifications| notifications.retain(|shown| shown.id != id));
            },
            self.ttl,
        );
    }
}

#[component]
pub fn Toasts(notifications: ReadSignal<Vec<Notification>>) -> impl IntoView {
    view! {
        <div class="toasts">
            <For
                each=move || notifications.get()
                key=|notification| notification.id
                let:notification
            >
                <div class=notification.level.class() role="status">
                    {notification.message}
                </div>
            </For>
        </div>
    }
}

pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        leptos::window()
            .confirm_with_message(prompt)
            .unwrap_or_else(|err| {
                error!("confirm dialog error: {err:?}");
                false
            })
    }
}

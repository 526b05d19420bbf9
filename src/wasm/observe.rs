//! Browser-side triggers for one arrow.
//!
//! Every source calls the same zero-argument closure, which only asks the
//! coordinator for a frame. Dropping [`Subscriptions`] releases all of them.

use log::warn;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{AddEventListenerOptions, Element, EventTarget, ResizeObserver, Window};

use crate::config::ResolverConfig;
use crate::coordinator::Invalidator;
use crate::tree::{ObservationSet, ScrollTarget};

use super::dom::DomHost;

pub struct Subscriptions {
    window: Window,
    observer: Option<ResizeObserver>,
    listeners: Vec<(EventTarget, &'static str)>,
    timers: Vec<i32>,
    nudge: Closure<dyn FnMut()>,
}

impl Subscriptions {
    /// Wire every trigger in `set` (plus window resize, settle timers and
    /// fonts-ready) to `invalidator`.
    ///
    /// Sources the browser refuses are skipped with a warning.
    pub fn attach(
        host: &DomHost,
        set: &ObservationSet<Element>,
        invalidator: Invalidator<DomHost>,
        config: &ResolverConfig,
    ) -> Self {
        let nudge = {
            let invalidator = invalidator.clone();
            Closure::wrap(Box::new(move || invalidator.invalidate()) as Box<dyn FnMut()>)
        };

        let mut subs = Self {
            window: host.window().clone(),
            observer: None,
            listeners: Vec::new(),
            timers: Vec::new(),
            nudge,
        };

        subs.observe_resize(&set.resize);

        let window: EventTarget = subs.window.clone().into();
        subs.listen(&window, "resize", config.passive_listeners);
        for target in &set.scroll {
            let target: EventTarget = match target {
                ScrollTarget::Viewport => subs.window.clone().into(),
                ScrollTarget::Element(el) => el.clone().into(),
            };
            subs.listen(&target, "scroll", config.passive_listeners);
        }

        for delay in config.settle_delays_ms {
            match subs
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    subs.nudge.as_ref().unchecked_ref(),
                    delay,
                ) {
                Ok(id) => subs.timers.push(id),
                Err(err) => warn!("settle timer ({delay} ms) not scheduled: {err:?}"),
            }
        }

        watch_fonts(host, invalidator);
        subs
    }

    fn observe_resize(&mut self, nodes: &[Element]) {
        if nodes.is_empty() {
            return;
        }
        match ResizeObserver::new(self.nudge.as_ref().unchecked_ref()) {
            Ok(observer) => {
                for node in nodes {
                    observer.observe(node);
                }
                self.observer = Some(observer);
            }
            Err(err) => warn!("ResizeObserver unavailable, relying on window events: {err:?}"),
        }
    }

    fn listen(&mut self, target: &EventTarget, event: &'static str, passive: bool) {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        match target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            self.nudge.as_ref().unchecked_ref(),
            &options,
        ) {
            Ok(()) => self.listeners.push((target.clone(), event)),
            Err(err) => warn!("{event} listener not attached: {err:?}"),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn observes_resize(&self) -> bool {
        self.observer.is_some()
    }
}

/// Recompute once web fonts settle; text metrics can move nodes after paint.
fn watch_fonts(host: &DomHost, invalidator: Invalidator<DomHost>) {
    let document = host.document();
    let has_fonts = js_sys::Reflect::has(document, &JsValue::from_str("fonts")).unwrap_or(false);
    if !has_fonts {
        return;
    }
    match document.fonts().ready() {
        Ok(ready) => spawn_local(async move {
            if JsFuture::from(ready).await.is_ok() {
                invalidator.invalidate();
            }
        }),
        Err(err) => warn!("document.fonts.ready unavailable: {err:?}"),
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        for (target, event) in self.listeners.drain(..) {
            let _ = target
                .remove_event_listener_with_callback(event, self.nudge.as_ref().unchecked_ref());
        }
        for id in self.timers.drain(..) {
            self.window.clear_timeout_with_handle(id);
        }
    }
}

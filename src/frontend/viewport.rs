use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::WatchOptions;

/// Owns an `IntersectionObserver` and its callback. Dropping the watcher
/// disconnects the observer.
pub struct ViewportWatcher {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl ViewportWatcher {
    pub fn new(
        options: WatchOptions,
        mut on_enter: impl FnMut(&Element) + 'static,
    ) -> Result<Self, JsValue> {
        let once = options.once;
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() {
                        continue;
                    }

                    let target = entry.target();
                    if once {
                        observer.unobserve(&target);
                    }
                    on_enter(&target);
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin());

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }

    /// Observes every element matching `selector`; returns how many matched.
    pub fn observe_all(&self, selector: &str) -> u32 {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return 0;
        };
        let Ok(nodes) = document.query_selector_all(selector) else {
            return 0;
        };

        let mut observed = 0;
        for index in 0..nodes.length() {
            if let Some(element) = nodes
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            {
                self.observe(&element);
                observed += 1;
            }
        }
        observed
    }
}

impl Drop for ViewportWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

mod hero;
mod navbar;
mod projects;
mod sections;
mod viewport;

use serde_json::json;
use web_sys::window;
use yew::prelude::*;

use crate::config::{PageConfig, WatchOptions};
use crate::telemetry::{log_event, set_min_level, LogLevel};
use navbar::Navbar;
use projects::ProjectsSection;
use sections::{AboutSection, ContactSection, HeroSection};
use viewport::ViewportWatcher;

const REVEAL_SELECTOR: &str = ".fade-in, .slide-in-left, .slide-in-right, .scale-in";

#[derive(Properties, PartialEq)]
struct AppProps {
    config: PageConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    use_effect_with((), |_| {
        let watcher = ViewportWatcher::new(WatchOptions::reveal(), |element| {
            let _ = element.class_list().add_1("visible");
        });

        let watcher = match watcher {
            Ok(watcher) => {
                let observed = watcher.observe_all(REVEAL_SELECTOR);
                log_event(LogLevel::Debug, "reveal_watch_started", json!({ "observed": observed }));
                Some(watcher)
            }
            Err(err) => {
                log_event(
                    LogLevel::Warn,
                    "viewport_watcher_unavailable",
                    json!({ "error": format!("{err:?}"), "target": "reveal" }),
                );
                None
            }
        };

        move || drop(watcher)
    });

    let endpoint = props.config.contact_endpoint.clone().map(AttrValue::from);

    html! {
        <>
            <Navbar />
            <main>
                <HeroSection />
                <AboutSection />
                <ProjectsSection auto_slide_ms={props.config.auto_slide_ms} />
                <ContactSection endpoint={endpoint} />
            </main>
            <footer class="footer">
                <p>{"Built with Rust and WebAssembly."}</p>
            </footer>
        </>
    }
}

pub fn run() {
    console_error_panic_hook::set_once();

    let root = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"))
        .expect("missing #app mount point");

    let config = PageConfig::from_attributes(|name| root.get_attribute(name));
    set_min_level(config.log_level);
    log_event(
        LogLevel::Info,
        "page_ready",
        json!({
            "log_level": config.log_level.as_str(),
            "auto_slide_ms": config.auto_slide_ms,
            "contact_forwarding": config.contact_endpoint.is_some(),
        }),
    );

    yew::Renderer::<App>::with_root_and_props(root, AppProps { config }).render();
}

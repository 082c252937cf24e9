use gloo::render::{request_animation_frame, AnimationFrame};
use gloo_net::http::Request;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, FormData, HtmlFormElement};
use yew::prelude::*;

use super::hero::HeroBackground;
use super::navbar::AnchorLink;
use super::viewport::ViewportWatcher;
use crate::config::WatchOptions;
use crate::contact::{ContactSubmission, ACKNOWLEDGEMENT};
use crate::content::{Stat, STATS};
use crate::stats::StatCounter;
use crate::telemetry::{log_event, LogLevel};

type FrameSlot = Rc<RefCell<Option<AnimationFrame>>>;

fn schedule_count(mut counter: StatCounter, text: UseStateSetter<String>, slot: FrameSlot) {
    let next_slot = slot.clone();
    let handle = request_animation_frame(move |_| {
        next_slot.borrow_mut().take();
        let frame = counter.advance();
        text.set(frame.text);
        if !frame.finished {
            schedule_count(counter, text, next_slot);
        }
    });
    *slot.borrow_mut() = Some(handle);
}

#[function_component(HeroSection)]
pub fn hero_section() -> Html {
    html! {
        <section id="home" class="hero">
            <HeroBackground />
            <div class="hero-content">
                <h1 class="hero-title fade-in">{"Building fast, dependable software"}</h1>
                <p class="hero-subtitle fade-in">
                    {"Systems engineer working across storage engines, web services and applied ML."}
                </p>
                <div class="hero-actions scale-in">
                    <AnchorLink class="btn btn-primary" href="#projects">{"View work"}</AnchorLink>
                    <AnchorLink class="btn btn-secondary" href="#contact">{"Get in touch"}</AnchorLink>
                </div>
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct StatBlockProps {
    stat: Stat,
}

/// Counts up from zero the first time the block is half visible.
#[function_component(StatBlock)]
fn stat_block(props: &StatBlockProps) -> Html {
    let stat = props.stat;
    let text = use_state(|| stat.value.to_string());
    let block_ref = use_node_ref();

    {
        let block_ref = block_ref.clone();
        let setter = text.setter();
        use_effect_with((), move |_| {
            let slot: FrameSlot = Rc::new(RefCell::new(None));
            let frame_slot = slot.clone();

            let watcher = ViewportWatcher::new(WatchOptions::stat(), move |_| {
                match StatCounter::from_text(stat.value) {
                    Ok(counter) => schedule_count(counter, setter.clone(), frame_slot.clone()),
                    Err(reason) => log_event(
                        LogLevel::Warn,
                        "stat_target_rejected",
                        json!({ "text": stat.value, "reason": reason }),
                    ),
                }
            });

            let watcher = match watcher {
                Ok(watcher) => {
                    if let Some(element) = block_ref.cast::<web_sys::Element>() {
                        watcher.observe(&element);
                    }
                    Some(watcher)
                }
                Err(err) => {
                    log_event(
                        LogLevel::Warn,
                        "viewport_watcher_unavailable",
                        json!({ "error": format!("{err:?}"), "target": "stat" }),
                    );
                    None
                }
            };

            move || {
                drop(watcher);
                slot.borrow_mut().take();
            }
        });
    }

    html! {
        <div class="stat" ref={block_ref}>
            <span class="stat-number">{(*text).clone()}</span>
            <span class="stat-label">{stat.label}</span>
        </div>
    }
}

#[function_component(AboutSection)]
pub fn about_section() -> Html {
    html! {
        <section id="about" class="about">
            <div class="container">
                <h2 class="section-title fade-in">{"About"}</h2>
                <div class="about-grid">
                    <div class="about-copy slide-in-left">
                        <p>
                            {"I design and ship backend services, developer tooling and the occasional interface. \
                              Most of my work lives close to the metal: storage, networking and the glue between them."}
                        </p>
                        <p>
                            {"Lately that has meant Rust services, WebAssembly front ends and small models that run \
                              where the data already is."}
                        </p>
                    </div>
                    <div class="stats slide-in-right">
                        { for STATS.iter().map(|stat| html! { <StatBlock key={stat.label} stat={*stat} /> }) }
                    </div>
                </div>
            </div>
        </section>
    }
}

fn collect_fields(form: &HtmlFormElement) -> Result<ContactSubmission, JsValue> {
    let data = FormData::new_with_form(form)?;
    let mut pairs = Vec::new();

    if let Some(entries) = js_sys::try_iter(&data)? {
        for entry in entries {
            let entry = js_sys::Array::from(&entry?);
            let (Some(name), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string())
            else {
                continue;
            };
            pairs.push((name, value));
        }
    }

    Ok(ContactSubmission::from_pairs(pairs))
}

async fn forward_submission(endpoint: String, submission: ContactSubmission) {
    let request = match Request::post(&endpoint).json(&submission) {
        Ok(request) => request,
        Err(err) => {
            log_event(
                LogLevel::Warn,
                "contact_forward_failed",
                json!({ "endpoint": endpoint, "error": err.to_string() }),
            );
            return;
        }
    };

    match request.send().await {
        Ok(response) if response.ok() => log_event(
            LogLevel::Info,
            "contact_forwarded",
            json!({ "endpoint": endpoint, "status": response.status() }),
        ),
        Ok(response) => log_event(
            LogLevel::Warn,
            "contact_forward_rejected",
            json!({ "endpoint": endpoint, "status": response.status() }),
        ),
        Err(err) => log_event(
            LogLevel::Warn,
            "contact_forward_failed",
            json!({ "endpoint": endpoint, "error": err.to_string() }),
        ),
    }
}

#[derive(Properties, PartialEq)]
pub struct ContactSectionProps {
    #[prop_or_default]
    pub endpoint: Option<AttrValue>,
}

#[function_component(ContactSection)]
pub fn contact_section(props: &ContactSectionProps) -> Html {
    let form_ref = use_node_ref();

    let onsubmit = {
        let form_ref = form_ref.clone();
        let endpoint = props.endpoint.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(form) = form_ref.cast::<HtmlFormElement>() else {
                return;
            };

            let submission = match collect_fields(&form) {
                Ok(submission) => submission,
                Err(err) => {
                    log_event(
                        LogLevel::Warn,
                        "contact_form_unreadable",
                        json!({ "error": format!("{err:?}") }),
                    );
                    return;
                }
            };

            log_event(
                LogLevel::Info,
                "contact_form_submitted",
                json!({ "fields": submission.to_json() }),
            );

            if let Some(endpoint) = endpoint.as_ref() {
                spawn_local(forward_submission(endpoint.to_string(), submission));
            }

            if let Some(win) = window() {
                let _ = win.alert_with_message(ACKNOWLEDGEMENT);
            }
            form.reset();
        })
    };

    html! {
        <section id="contact" class="contact">
            <div class="container">
                <h2 class="section-title fade-in">{"Contact"}</h2>
                <form id="contact-form" class="contact-form scale-in" ref={form_ref} onsubmit={onsubmit}>
                    <label for="contact-name">{"Name"}</label>
                    <input id="contact-name" name="name" type="text" required=true />
                    <label for="contact-email">{"Email"}</label>
                    <input id="contact-email" name="email" type="email" required=true />
                    <label for="contact-message">{"Message"}</label>
                    <textarea id="contact-message" name="message" rows="5" required=true></textarea>
                    <button class="btn btn-primary" type="submit">{"Send message"}</button>
                </form>
            </div>
        </section>
    }
}

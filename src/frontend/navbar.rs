use gloo::events::EventListener;
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, HtmlElement, Node, ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

use crate::content::SECTIONS;
use crate::navigation::{active_section, anchor_target, scroll_target, NavAction, NavMenu};
use crate::telemetry::{log_event, LogLevel};

impl Reducible for NavMenu {
    type Action = NavAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = self.apply(action);
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

/// Smooth-scrolls to the element an in-page anchor points at. Returns false
/// when the anchor or its target does not exist.
pub fn scroll_to_anchor(href: &str) -> bool {
    let Some(id) = anchor_target(href) else {
        return false;
    };
    let Some(win) = window() else {
        return false;
    };
    let Some(target) = win
        .document()
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        log_event(LogLevel::Debug, "anchor_target_missing", json!({ "href": href }));
        return false;
    };

    let options = ScrollToOptions::new();
    options.set_top(scroll_target(f64::from(target.offset_top())));
    options.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&options);
    true
}

fn section_offsets() -> Vec<(String, f64)> {
    let Some(document) = window().and_then(|w| w.document()) else {
        return Vec::new();
    };
    let Ok(nodes) = document.query_selector_all("section[id]") else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(|section| (section.id(), f64::from(section.offset_top())))
        .collect()
}

fn current_section() -> Option<String> {
    let scroll_y = window().and_then(|w| w.scroll_y().ok())?;
    let offsets = section_offsets();
    let sections: Vec<(&str, f64)> = offsets.iter().map(|(id, top)| (id.as_str(), *top)).collect();
    active_section(&sections, scroll_y).map(ToString::to_string)
}

fn set_body_overflow(value: &str) {
    if let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) {
        let _ = body.style().set_property("overflow", value);
    }
}

#[derive(Properties, PartialEq)]
pub struct AnchorLinkProps {
    pub href: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub onnavigate: Callback<()>,
    #[prop_or_default]
    pub children: Html,
}

/// In-page link that scrolls smoothly instead of jumping.
#[function_component(AnchorLink)]
pub fn anchor_link(props: &AnchorLinkProps) -> Html {
    let onclick = {
        let href = props.href.clone();
        let onnavigate = props.onnavigate.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            scroll_to_anchor(&href);
            onnavigate.emit(());
        })
    };

    html! {
        <a class={props.class.clone()} href={props.href.clone()} onclick={onclick}>
            {props.children.clone()}
        </a>
    }
}

#[function_component(Navbar)]
pub fn navbar() -> Html {
    let menu = use_reducer(NavMenu::default);
    let active = use_state_eq(current_section);
    let navbar_ref = use_node_ref();

    // Every close path goes through the reducer, so this also unlocks scroll
    // after outside clicks and resizes.
    use_effect_with(*menu, |menu| {
        set_body_overflow(menu.body_overflow());
        || ()
    });

    {
        let dispatcher = menu.dispatcher();
        let navbar_ref = navbar_ref.clone();
        let active = active.clone();
        use_effect_with((), move |_| {
            let mut listeners = Vec::new();

            if let Some(win) = window() {
                if let Some(document) = win.document() {
                    let dispatcher = dispatcher.clone();
                    listeners.push(EventListener::new(&document, "click", move |event| {
                        let Some(navbar) = navbar_ref.cast::<Element>() else {
                            return;
                        };
                        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
                        if !navbar.contains(target.as_ref()) {
                            dispatcher.dispatch(NavAction::Close);
                        }
                    }));
                }

                let resize_window = win.clone();
                listeners.push(EventListener::new(&win, "resize", move |_| {
                    let width = resize_window
                        .inner_width()
                        .ok()
                        .and_then(|value| value.as_f64())
                        .unwrap_or(0.0);
                    dispatcher.dispatch(NavAction::ViewportResized {
                        width_px: width.max(0.0) as u32,
                    });
                }));

                listeners.push(EventListener::new(&win, "scroll", move |_| {
                    active.set(current_section());
                }));
            }

            move || drop(listeners)
        });
    }

    let on_toggle = {
        let dispatcher = menu.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(NavAction::Toggle))
    };

    let on_navigate = {
        let dispatcher = menu.dispatcher();
        Callback::from(move |_| dispatcher.dispatch(NavAction::Close))
    };

    let open = menu.is_open();

    html! {
        <nav class="navbar" ref={navbar_ref}>
            <div class="nav-container">
                <AnchorLink class="nav-logo" href="#home">{"Portfolio"}</AnchorLink>
                <ul id="nav-menu" class={classes!("nav-menu", open.then_some("active"))}>
                    { for SECTIONS.iter().map(|section| {
                        let is_active = active.as_deref() == Some(section.id);
                        html! {
                            <li key={section.id}>
                                <AnchorLink
                                    class={classes!("nav-link", is_active.then_some("active"))}
                                    href={format!("#{}", section.id)}
                                    onnavigate={on_navigate.clone()}
                                >
                                    {section.label}
                                </AnchorLink>
                            </li>
                        }
                    }) }
                </ul>
                <button
                    id="nav-toggle"
                    class={classes!("nav-toggle", open.then_some("active"))}
                    type="button"
                    aria-label="Toggle navigation"
                    aria-expanded={open.to_string()}
                    onclick={on_toggle}
                >
                    <span class="bar"></span>
                    <span class="bar"></span>
                    <span class="bar"></span>
                </button>
            </div>
        </nav>
    }
}

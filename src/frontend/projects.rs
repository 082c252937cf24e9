use gloo::events::EventListener;
use gloo::timers::callback::{Interval, Timeout};
use serde_json::json;
use std::rc::Rc;
use web_sys::{window, HtmlElement};
use yew::prelude::*;

use crate::carousel::{Carousel, CarouselAction, GRACE_PERIOD_MS};
use crate::content::{project_categories, Project, PROJECTS};
use crate::filter::{filter_keys, CategoryFilter, SETTLE_DELAY_MS};
use crate::telemetry::{log_event, LogLevel};

impl Reducible for Carousel {
    type Action = CarouselAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

fn container_width(viewport_ref: &NodeRef) -> Option<f64> {
    viewport_ref
        .cast::<HtmlElement>()
        .map(|element| f64::from(element.offset_width()))
}

fn tab_hidden() -> bool {
    window()
        .and_then(|w| w.document())
        .map(|d| d.hidden())
        .unwrap_or(false)
}

fn filter_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Properties, PartialEq)]
struct ProjectCardProps {
    project: Project,
}

#[function_component(ProjectCard)]
fn project_card(props: &ProjectCardProps) -> Html {
    let project = props.project;

    html! {
        <article class="project-card" data-category={project.category}>
            <h3 class="project-title">{project.title}</h3>
            <p class="project-summary">{project.summary}</p>
            <ul class="project-stack">
                { for project.stack.iter().map(|item| html! { <li key={*item}>{*item}</li> }) }
            </ul>
            <a class="project-link" href={project.href} target="_blank" rel="noopener noreferrer">
                {"View project"}
            </a>
        </article>
    }
}

#[derive(Properties, PartialEq)]
struct ProjectsCarouselProps {
    cards: Vec<Project>,
    auto_slide_ms: u32,
}

#[function_component(ProjectsCarousel)]
fn projects_carousel(props: &ProjectsCarouselProps) -> Html {
    let carousel = {
        let card_count = props.cards.len();
        use_reducer(move || Carousel::unmeasured(card_count))
    };
    let viewport_ref = use_node_ref();

    {
        let dispatcher = carousel.dispatcher();
        let viewport_ref = viewport_ref.clone();
        use_effect_with((), move |_| {
            if let Some(width) = container_width(&viewport_ref) {
                dispatcher.dispatch(CarouselAction::Resize(width));
            }
            dispatcher.dispatch(CarouselAction::SetTabHidden(tab_hidden()));

            let mut listeners = Vec::new();
            if let Some(win) = window() {
                let resize_dispatcher = dispatcher.clone();
                listeners.push(EventListener::new(&win, "resize", move |_| {
                    if let Some(width) = container_width(&viewport_ref) {
                        resize_dispatcher.dispatch(CarouselAction::Resize(width));
                    }
                }));

                if let Some(document) = win.document() {
                    listeners.push(EventListener::new(&document, "visibilitychange", move |_| {
                        dispatcher.dispatch(CarouselAction::SetTabHidden(tab_hidden()));
                    }));
                }
            }

            move || drop(listeners)
        });
    }

    {
        let dispatcher = carousel.dispatcher();
        use_effect_with(props.cards.len(), move |card_count| {
            dispatcher.dispatch(CarouselAction::SetCardCount(*card_count));
            || ()
        });
    }

    // The interval lives exactly as long as auto-advance is allowed.
    {
        let dispatcher = carousel.dispatcher();
        let delay = props.auto_slide_ms;
        use_effect_with(carousel.auto_slide_active(), move |active| {
            let interval = active.then(|| {
                Interval::new(delay, move || dispatcher.dispatch(CarouselAction::AutoAdvance))
            });
            move || drop(interval)
        });
    }

    {
        let dispatcher = carousel.dispatcher();
        let in_grace = carousel.in_grace_period();
        use_effect_with(carousel.interaction(), move |interaction| {
            let sequence = *interaction;
            let timeout = in_grace.then(|| {
                Timeout::new(GRACE_PERIOD_MS, move || {
                    dispatcher.dispatch(CarouselAction::GraceElapsed(sequence))
                })
            });
            move || drop(timeout)
        });
    }

    let dispatch = |action: CarouselAction| {
        let dispatcher = carousel.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(action.clone()))
    };

    let ontouchstart = {
        let dispatcher = carousel.dispatcher();
        Callback::from(move |event: TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                dispatcher.dispatch(CarouselAction::TouchStart {
                    x: f64::from(touch.client_x()),
                    at_ms: js_sys::Date::now(),
                });
            }
        })
    };

    let ontouchmove = {
        let dispatcher = carousel.dispatcher();
        Callback::from(move |event: TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                dispatcher.dispatch(CarouselAction::TouchMove {
                    x: f64::from(touch.client_x()),
                });
            }
        })
    };

    let ontouchend = {
        let dispatcher = carousel.dispatcher();
        Callback::from(move |event: TouchEvent| {
            if let Some(touch) = event.changed_touches().get(0) {
                dispatcher.dispatch(CarouselAction::TouchEnd {
                    x: f64::from(touch.client_x()),
                    at_ms: js_sys::Date::now(),
                });
            }
        })
    };

    let view = carousel.view();
    let controls_display = if view.controls_visible { "flex" } else { "none" };
    let track_style = format!("transform: translateX({}px);", view.translate_x);
    let prev_style = format!("opacity: {}; display: {controls_display};", view.prev.opacity);
    let next_style = format!("opacity: {}; display: {controls_display};", view.next.opacity);

    html! {
        <div class="projects-carousel">
            <button
                id="prev-btn"
                class="carousel-btn"
                type="button"
                aria-label="Previous projects"
                disabled={view.prev.disabled}
                style={prev_style}
                onclick={dispatch(CarouselAction::Previous)}
            >
                {"‹"}
            </button>
            <div class="projects-viewport" ref={viewport_ref}>
                <div
                    id="projects-track"
                    class="projects-track"
                    style={track_style}
                    onmouseenter={dispatch(CarouselAction::SetHovered(true))}
                    onmouseleave={dispatch(CarouselAction::SetHovered(false))}
                    ontouchstart={ontouchstart}
                    ontouchmove={ontouchmove}
                    ontouchend={ontouchend}
                >
                    { for props.cards.iter().map(|project| html! {
                        <ProjectCard key={project.title} project={*project} />
                    }) }
                </div>
            </div>
            <button
                id="next-btn"
                class="carousel-btn"
                type="button"
                aria-label="Next projects"
                disabled={view.next.disabled}
                style={next_style}
                onclick={dispatch(CarouselAction::Next)}
            >
                {"›"}
            </button>
            <div class="carousel-indicators" style={format!("display: {controls_display};")}>
                { for (0..view.indicator_count).map(|index| html! {
                    <button
                        key={index}
                        type="button"
                        class={classes!("indicator", (index == view.active_indicator).then_some("active"))}
                        aria-label={format!("Go to slide {}", index + 1)}
                        onclick={dispatch(CarouselAction::GoTo(index))}
                    />
                }) }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProjectsSectionProps {
    pub auto_slide_ms: u32,
}

#[function_component(ProjectsSection)]
pub fn projects_section(props: &ProjectsSectionProps) -> Html {
    let filter = use_state(CategoryFilter::default);
    let generation = use_state(|| 0u32);
    let settle = use_mut_ref(|| None::<Timeout>);

    let on_filter = {
        let filter = filter.clone();
        let generation = generation.clone();
        Callback::from(move |key: &'static str| {
            let next = CategoryFilter::from_key(key);
            filter.set(next.clone());

            // Rebuild once layout has settled; a newer click replaces the
            // pending rebuild.
            let generation = generation.clone();
            let next_generation = (*generation).wrapping_add(1);
            *settle.borrow_mut() = Some(Timeout::new(SETTLE_DELAY_MS, move || {
                log_event(
                    LogLevel::Debug,
                    "carousel_rebuilt",
                    json!({ "filter": next.key(), "generation": next_generation }),
                );
                generation.set(next_generation);
            }));
        })
    };

    let cards: Vec<Project> = filter
        .apply(&PROJECTS, |project| project.category)
        .into_iter()
        .copied()
        .collect();

    html! {
        <section id="projects" class="projects">
            <div class="container">
                <h2 class="section-title fade-in">{"Projects"}</h2>
                <div class="project-filters scale-in">
                    { for filter_keys(project_categories()).into_iter().map(|key| {
                        let onclick = {
                            let on_filter = on_filter.clone();
                            Callback::from(move |_: MouseEvent| on_filter.emit(key))
                        };
                        html! {
                            <button
                                key={key}
                                type="button"
                                class={classes!("filter-btn", (filter.key() == key).then_some("active"))}
                                data-filter={key}
                                onclick={onclick}
                            >
                                {filter_label(key)}
                            </button>
                        }
                    }) }
                </div>
                <ProjectsCarousel key={*generation} cards={cards} auto_slide_ms={props.auto_slide_ms} />
            </div>
        </section>
    }
}

//! Slide bookkeeping for the projects carousel.
//!
//! Everything here is plain state: the browser side feeds in measurements,
//! clicks, touches and timer ticks as [`CarouselAction`]s and renders the
//! resulting [`CarouselView`]. Timers themselves live with the component that
//! owns them; this type only decides whether auto-advance should be running.

pub const CARD_WIDTH: f64 = 350.0;
pub const CARD_GAP: f64 = 24.0;
pub const CARD_PITCH: f64 = CARD_WIDTH + CARD_GAP;
pub const CONTAINER_PADDING: f64 = 32.0;

pub const GRACE_PERIOD_MS: u32 = 1_000;

const DRAG_DAMPING: f64 = 0.3;
const DRAG_FEEDBACK_MIN_PX: f64 = 10.0;
const SWIPE_MIN_DISTANCE_PX: f64 = 50.0;
const SWIPE_MIN_VELOCITY_PX_PER_MS: f64 = 0.5;

const CONTROL_ENABLED_OPACITY: f64 = 0.8;
const CONTROL_DISABLED_OPACITY: f64 = 0.3;

/// How many whole cards fit in a container of the given width. A container
/// narrower than one card still shows one.
pub fn visible_cards_for(container_width: f64, card_count: usize) -> usize {
    let fit = ((container_width - CONTAINER_PADDING) / CARD_PITCH).floor();
    let fit = if fit.is_finite() && fit > 0.0 {
        fit as usize
    } else {
        0
    };

    fit.max(1).min(card_count)
}

#[derive(Clone, Debug, PartialEq)]
pub enum CarouselAction {
    Next,
    Previous,
    GoTo(usize),
    AutoAdvance,
    Resize(f64),
    SetCardCount(usize),
    SetHovered(bool),
    SetTabHidden(bool),
    TouchStart { x: f64, at_ms: f64 },
    TouchMove { x: f64 },
    TouchEnd { x: f64, at_ms: f64 },
    /// Grace period expiry for the interaction with this sequence number.
    GraceElapsed(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeOutcome {
    Next,
    Previous,
    SnapBack,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PauseReasons {
    hovered: bool,
    tab_hidden: bool,
    dragging: bool,
    grace: bool,
}

impl PauseReasons {
    fn any(self) -> bool {
        self.hovered || self.tab_hidden || self.dragging || self.grace
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Drag {
    start_x: f64,
    started_at_ms: f64,
    feedback_offset: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlState {
    pub disabled: bool,
    pub opacity: f64,
}

impl ControlState {
    fn new(disabled: bool) -> Self {
        Self {
            disabled,
            opacity: if disabled {
                CONTROL_DISABLED_OPACITY
            } else {
                CONTROL_ENABLED_OPACITY
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarouselView {
    pub translate_x: f64,
    pub prev: ControlState,
    pub next: ControlState,
    /// False when everything fits: buttons and indicators are hidden.
    pub controls_visible: bool,
    pub indicator_count: usize,
    pub active_indicator: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Carousel {
    card_count: usize,
    container_width: f64,
    visible_cards: usize,
    max_index: usize,
    current_index: usize,
    paused: PauseReasons,
    drag: Option<Drag>,
    interaction: u32,
    measured: bool,
}

impl Carousel {
    pub fn new(card_count: usize, container_width: f64) -> Self {
        let mut carousel = Self::unmeasured(card_count);
        carousel.resize(container_width);
        carousel
    }

    /// A carousel whose container has not been measured yet. It reports
    /// everything as fitting until the first [`CarouselAction::Resize`].
    pub fn unmeasured(card_count: usize) -> Self {
        let mut carousel = Self {
            card_count,
            container_width: 0.0,
            visible_cards: 0,
            max_index: 0,
            current_index: 0,
            paused: PauseReasons::default(),
            drag: None,
            interaction: 0,
            measured: false,
        };
        carousel.recompute();
        carousel
    }

    pub fn is_measured(&self) -> bool {
        self.measured
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn visible_cards(&self) -> usize {
        self.visible_cards
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Sequence number of the latest manual interaction.
    pub fn interaction(&self) -> u32 {
        self.interaction
    }

    pub fn in_grace_period(&self) -> bool {
        self.paused.grace
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn auto_slide_active(&self) -> bool {
        self.max_index > 0 && !self.paused.any()
    }

    fn recompute(&mut self) {
        self.visible_cards = if self.measured {
            visible_cards_for(self.container_width, self.card_count)
        } else {
            self.card_count
        };
        self.max_index = self.card_count.saturating_sub(self.visible_cards);
        self.current_index = self.current_index.min(self.max_index);
    }

    pub fn resize(&mut self, container_width: f64) {
        self.container_width = container_width;
        self.measured = true;
        self.recompute();
    }

    pub fn set_card_count(&mut self, card_count: usize) {
        self.card_count = card_count;
        self.recompute();
    }

    pub fn next_slide(&mut self) {
        if self.current_index < self.max_index {
            self.current_index += 1;
        } else if self.max_index > 0 {
            self.current_index = 0;
        }
    }

    pub fn prev_slide(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        } else if self.max_index > 0 {
            self.current_index = self.max_index;
        }
    }

    pub fn go_to_slide(&mut self, index: isize) {
        self.current_index = usize::try_from(index.max(0))
            .unwrap_or(0)
            .min(self.max_index);
    }

    fn begin_grace(&mut self) {
        self.paused.grace = true;
        self.interaction = self.interaction.wrapping_add(1);
    }

    pub fn touch_start(&mut self, x: f64, at_ms: f64) {
        self.drag = Some(Drag {
            start_x: x,
            started_at_ms: at_ms,
            feedback_offset: None,
        });
        self.paused.dragging = true;
    }

    pub fn touch_move(&mut self, x: f64) {
        let max_index = self.max_index;
        let current_index = self.current_index;
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        let diff = drag.start_x - x;
        if diff.abs() > DRAG_FEEDBACK_MIN_PX {
            let min_translate = -(max_index as f64) * CARD_PITCH;
            let translate = -(current_index as f64) * CARD_PITCH - diff * DRAG_DAMPING;
            drag.feedback_offset = Some(translate.clamp(min_translate, 0.0));
        }
    }

    /// Ends a drag and commits a slide change when the gesture was long or
    /// fast enough. Returns `None` when no drag was in progress.
    pub fn touch_end(&mut self, x: f64, at_ms: f64) -> Option<SwipeOutcome> {
        let drag = self.drag.take()?;
        self.paused.dragging = false;

        let diff = drag.start_x - x;
        let elapsed_ms = (at_ms - drag.started_at_ms).max(1.0);
        let velocity = diff.abs() / elapsed_ms;

        let mut outcome = SwipeOutcome::SnapBack;
        if diff.abs() > SWIPE_MIN_DISTANCE_PX || velocity > SWIPE_MIN_VELOCITY_PX_PER_MS {
            if diff > 0.0 && self.current_index < self.max_index {
                self.next_slide();
                outcome = SwipeOutcome::Next;
            } else if diff < 0.0 && self.current_index > 0 {
                self.prev_slide();
                outcome = SwipeOutcome::Previous;
            }
        }

        self.begin_grace();
        Some(outcome)
    }

    pub fn apply(&mut self, action: CarouselAction) {
        match action {
            CarouselAction::Next => {
                self.next_slide();
                self.begin_grace();
            }
            CarouselAction::Previous => {
                self.prev_slide();
                self.begin_grace();
            }
            CarouselAction::GoTo(index) => {
                self.go_to_slide(isize::try_from(index).unwrap_or(isize::MAX));
                self.begin_grace();
            }
            CarouselAction::AutoAdvance => {
                if self.auto_slide_active() {
                    self.next_slide();
                }
            }
            CarouselAction::Resize(width) => self.resize(width),
            CarouselAction::SetCardCount(count) => self.set_card_count(count),
            CarouselAction::SetHovered(hovered) => self.paused.hovered = hovered,
            CarouselAction::SetTabHidden(hidden) => self.paused.tab_hidden = hidden,
            CarouselAction::TouchStart { x, at_ms } => self.touch_start(x, at_ms),
            CarouselAction::TouchMove { x } => self.touch_move(x),
            CarouselAction::TouchEnd { x, at_ms } => {
                self.touch_end(x, at_ms);
            }
            CarouselAction::GraceElapsed(sequence) => {
                if sequence == self.interaction {
                    self.paused.grace = false;
                }
            }
        }
    }

    pub fn resting_translate(&self) -> f64 {
        -(self.current_index as f64) * CARD_PITCH
    }

    pub fn view(&self) -> CarouselView {
        let translate_x = self
            .drag
            .and_then(|drag| drag.feedback_offset)
            .unwrap_or_else(|| self.resting_translate());

        CarouselView {
            translate_x,
            prev: ControlState::new(self.current_index == 0),
            next: ControlState::new(self.current_index >= self.max_index),
            controls_visible: self.max_index > 0,
            indicator_count: self.max_index + 1,
            active_indicator: self.current_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Container widths that fit exactly 1, 2 and 3 cards.
    const ONE_CARD: f64 = CONTAINER_PADDING + CARD_PITCH;
    const TWO_CARDS: f64 = CONTAINER_PADDING + 2.0 * CARD_PITCH;
    const THREE_CARDS: f64 = CONTAINER_PADDING + 3.0 * CARD_PITCH + 100.0;

    fn scripted_actions() -> Vec<CarouselAction> {
        vec![
            CarouselAction::Next,
            CarouselAction::Next,
            CarouselAction::GoTo(42),
            CarouselAction::Previous,
            CarouselAction::Resize(ONE_CARD),
            CarouselAction::GoTo(7),
            CarouselAction::Resize(THREE_CARDS),
            CarouselAction::SetCardCount(2),
            CarouselAction::TouchStart { x: 300.0, at_ms: 0.0 },
            CarouselAction::TouchMove { x: 100.0 },
            CarouselAction::TouchEnd { x: 100.0, at_ms: 400.0 },
            CarouselAction::Resize(0.0),
            CarouselAction::Previous,
            CarouselAction::AutoAdvance,
        ]
    }

    #[test]
    fn visible_cards_follow_container_width() {
        assert_eq!(visible_cards_for(ONE_CARD, 6), 1);
        assert_eq!(visible_cards_for(TWO_CARDS - 1.0, 6), 1);
        assert_eq!(visible_cards_for(TWO_CARDS, 6), 2);
        assert_eq!(visible_cards_for(THREE_CARDS, 2), 2);
        assert_eq!(visible_cards_for(10.0, 6), 1);
        assert_eq!(visible_cards_for(0.0, 6), 1);
        assert_eq!(visible_cards_for(THREE_CARDS, 0), 0);
    }

    #[test]
    fn max_index_and_current_index_stay_in_range_for_any_action() {
        let widths = [0.0, 100.0, ONE_CARD, TWO_CARDS, THREE_CARDS, 4_000.0];

        for card_count in 0..10 {
            for width in widths {
                let mut carousel = Carousel::new(card_count, width);
                let visible = visible_cards_for(width, card_count);
                assert_eq!(carousel.max_index(), card_count.saturating_sub(visible));

                for action in scripted_actions() {
                    carousel.apply(action);
                    assert_eq!(
                        carousel.max_index(),
                        carousel.card_count().saturating_sub(carousel.visible_cards())
                    );
                    assert!(carousel.current_index() <= carousel.max_index());
                }
            }
        }
    }

    #[test]
    fn next_wraps_to_start_only_with_room_to_scroll() {
        let mut carousel = Carousel::new(5, TWO_CARDS);
        assert_eq!(carousel.max_index(), 3);

        carousel.go_to_slide(3);
        carousel.next_slide();
        assert_eq!(carousel.current_index(), 0);

        carousel.prev_slide();
        assert_eq!(carousel.current_index(), 3);
    }

    #[test]
    fn single_page_carousel_ignores_next_and_prev() {
        let mut carousel = Carousel::new(2, THREE_CARDS);
        assert_eq!(carousel.max_index(), 0);

        carousel.next_slide();
        assert_eq!(carousel.current_index(), 0);
        carousel.prev_slide();
        assert_eq!(carousel.current_index(), 0);
    }

    #[test]
    fn go_to_slide_clamps_out_of_range_indices() {
        let mut carousel = Carousel::new(6, ONE_CARD);
        assert_eq!(carousel.max_index(), 5);

        carousel.go_to_slide(-4);
        assert_eq!(carousel.current_index(), 0);
        carousel.go_to_slide(99);
        assert_eq!(carousel.current_index(), 5);
        carousel.go_to_slide(2);
        assert_eq!(carousel.current_index(), 2);
    }

    #[test]
    fn resize_reclamps_current_index() {
        let mut carousel = Carousel::new(6, ONE_CARD);
        carousel.go_to_slide(5);

        carousel.resize(THREE_CARDS);
        assert_eq!(carousel.max_index(), 3);
        assert_eq!(carousel.current_index(), 3);
    }

    #[test]
    fn empty_carousel_survives_every_action() {
        let mut carousel = Carousel::new(0, TWO_CARDS);
        for action in scripted_actions() {
            carousel.apply(action);
        }

        assert_eq!(carousel.current_index(), 0);
        assert!(!carousel.view().controls_visible);
    }

    #[test]
    fn narrow_viewport_keeps_a_single_card_in_place() {
        let mut carousel = Carousel::new(1, 300.0);
        assert_eq!(carousel.visible_cards(), 1);
        assert_eq!(carousel.max_index(), 0);
        assert!(!carousel.view().controls_visible);
        assert!(!carousel.auto_slide_active());

        carousel.next_slide();
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.view().translate_x, 0.0);

        let mut phone = Carousel::new(4, 300.0);
        assert_eq!(phone.max_index(), 3);
        phone.go_to_slide(10);
        assert_eq!(phone.view().translate_x, -3.0 * CARD_PITCH);
    }

    #[test]
    fn unmeasured_carousel_hides_controls_until_first_resize() {
        let mut carousel = Carousel::unmeasured(7);
        assert!(!carousel.is_measured());
        assert_eq!(carousel.max_index(), 0);
        assert!(!carousel.auto_slide_active());
        let view = carousel.view();
        assert!(!view.controls_visible);
        assert_eq!(view.indicator_count, 1);

        carousel.apply(CarouselAction::AutoAdvance);
        carousel.apply(CarouselAction::Next);
        assert_eq!(carousel.current_index(), 0);

        carousel.apply(CarouselAction::Resize(ONE_CARD));
        assert!(carousel.is_measured());
        assert_eq!(carousel.max_index(), 6);
        assert!(carousel.view().controls_visible);
    }

    #[test]
    fn auto_slide_never_runs_without_room_to_scroll() {
        let mut carousel = Carousel::new(3, THREE_CARDS);
        assert!(!carousel.auto_slide_active());

        carousel.apply(CarouselAction::AutoAdvance);
        assert_eq!(carousel.current_index(), 0);
    }

    #[test]
    fn paused_carousel_ignores_auto_advance_until_resumed() {
        let mut carousel = Carousel::new(5, ONE_CARD);
        assert!(carousel.auto_slide_active());

        carousel.apply(CarouselAction::SetHovered(true));
        assert!(!carousel.auto_slide_active());
        carousel.apply(CarouselAction::AutoAdvance);
        carousel.apply(CarouselAction::AutoAdvance);
        assert_eq!(carousel.current_index(), 0);

        carousel.apply(CarouselAction::SetHovered(false));
        carousel.apply(CarouselAction::AutoAdvance);
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn hidden_tab_pauses_auto_advance() {
        let mut carousel = Carousel::new(5, ONE_CARD);
        carousel.apply(CarouselAction::SetTabHidden(true));
        carousel.apply(CarouselAction::AutoAdvance);
        assert_eq!(carousel.current_index(), 0);

        carousel.apply(CarouselAction::SetTabHidden(false));
        assert!(carousel.auto_slide_active());
    }

    #[test]
    fn manual_navigation_starts_grace_period() {
        let mut carousel = Carousel::new(5, ONE_CARD);

        carousel.apply(CarouselAction::Next);
        assert_eq!(carousel.current_index(), 1);
        assert!(carousel.in_grace_period());
        assert!(!carousel.auto_slide_active());

        let first = carousel.interaction();
        carousel.apply(CarouselAction::GoTo(3));
        let second = carousel.interaction();
        assert_ne!(first, second);

        carousel.apply(CarouselAction::GraceElapsed(first));
        assert!(carousel.in_grace_period(), "stale expiry must not resume");

        carousel.apply(CarouselAction::GraceElapsed(second));
        assert!(carousel.auto_slide_active());
    }

    #[test]
    fn long_slow_swipe_commits_in_drag_direction() {
        let mut carousel = Carousel::new(5, ONE_CARD);

        carousel.touch_start(400.0, 0.0);
        assert_eq!(carousel.touch_end(340.0, 1_000.0), Some(SwipeOutcome::Next));
        assert_eq!(carousel.current_index(), 1);

        carousel.touch_start(100.0, 2_000.0);
        assert_eq!(carousel.touch_end(160.0, 3_000.0), Some(SwipeOutcome::Previous));
        assert_eq!(carousel.current_index(), 0);
    }

    #[test]
    fn short_fast_swipe_commits() {
        let mut carousel = Carousel::new(5, ONE_CARD);

        // 20px in 33ms is just over 0.6 px/ms.
        carousel.touch_start(220.0, 1_000.0);
        assert_eq!(carousel.touch_end(200.0, 1_033.0), Some(SwipeOutcome::Next));
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn short_slow_swipe_snaps_back() {
        let mut carousel = Carousel::new(5, ONE_CARD);
        carousel.go_to_slide(2);

        carousel.touch_start(200.0, 0.0);
        carousel.touch_move(190.0);
        assert_eq!(carousel.touch_end(190.0, 500.0), Some(SwipeOutcome::SnapBack));
        assert_eq!(carousel.current_index(), 2);
        assert!(!carousel.is_dragging());
        assert_eq!(carousel.view().translate_x, carousel.resting_translate());
    }

    #[test]
    fn swipe_at_bounds_does_not_wrap() {
        let mut carousel = Carousel::new(5, ONE_CARD);

        carousel.touch_start(100.0, 0.0);
        assert_eq!(carousel.touch_end(300.0, 100.0), Some(SwipeOutcome::SnapBack));
        assert_eq!(carousel.current_index(), 0);
    }

    #[test]
    fn touch_events_without_start_are_ignored() {
        let mut carousel = Carousel::new(5, ONE_CARD);

        carousel.touch_move(10.0);
        assert_eq!(carousel.touch_end(10.0, 10.0), None);
        assert!(!carousel.in_grace_period());
    }

    #[test]
    fn dragging_pauses_and_release_starts_grace() {
        let mut carousel = Carousel::new(5, ONE_CARD);

        carousel.apply(CarouselAction::TouchStart { x: 0.0, at_ms: 0.0 });
        assert!(carousel.is_dragging());
        assert!(!carousel.auto_slide_active());

        carousel.apply(CarouselAction::TouchEnd { x: 0.0, at_ms: 10.0 });
        assert!(!carousel.is_dragging());
        assert!(carousel.in_grace_period());
    }

    #[test]
    fn drag_feedback_is_damped_and_clamped() {
        let mut carousel = Carousel::new(3, ONE_CARD);
        carousel.go_to_slide(1);

        carousel.touch_start(500.0, 0.0);
        carousel.touch_move(495.0);
        assert_eq!(carousel.view().translate_x, -CARD_PITCH, "under 10px shows no feedback");

        carousel.touch_move(400.0);
        assert_eq!(carousel.view().translate_x, -CARD_PITCH - 30.0);

        carousel.touch_move(-5_000.0);
        assert_eq!(carousel.view().translate_x, -2.0 * CARD_PITCH);

        carousel.touch_move(5_000.0);
        assert_eq!(carousel.view().translate_x, 0.0);
    }

    #[test]
    fn view_reflects_bounds_and_indicators() {
        let mut carousel = Carousel::new(4, TWO_CARDS);
        let view = carousel.view();

        assert!(view.controls_visible);
        assert_eq!(view.indicator_count, 3);
        assert_eq!(view.active_indicator, 0);
        assert!(view.prev.disabled);
        assert_eq!(view.prev.opacity, 0.3);
        assert!(!view.next.disabled);
        assert_eq!(view.next.opacity, 0.8);

        carousel.go_to_slide(2);
        let view = carousel.view();
        assert_eq!(view.translate_x, -2.0 * CARD_PITCH);
        assert!(!view.prev.disabled);
        assert!(view.next.disabled);
        assert_eq!(view.active_indicator, 2);
    }
}

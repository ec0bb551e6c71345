//! Page view state and its transitions.
//!
//! All interactive state of the page lives in [`ViewState`]: active
//! category, modal flags, pagination, the expanded gallery index and the
//! press-and-hold marker. [`ViewState::reduce`] is a pure function from
//! (state, event) to the next state plus an optional side effect for the
//! runtime to perform. The page script implements the same table; the
//! generator uses [`ViewState::initial`] for the markup it emits.

use crate::types::{Category, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    SelectCategory(Selector),
    /// A highlight block was clicked: jump to its category.
    HighlightClicked(Category),
    ToggleContact,
    ToggleInfo,
    SeeMore,
    OpenImage(usize),
    CloseImage,
    Previous,
    Next,
    Key(Key),
    TouchStart,
    /// The hold timer armed by `TouchStart` ran out.
    HoldElapsed,
    TouchEnd,
    FeedLoading(bool),
}

/// Side effects the runtime performs after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScrollToTop,
}

/// Facts about the current feed that transitions depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewContext {
    /// Items in the combined feed before truncation.
    pub total: usize,
    /// Length of the active gallery sequence.
    pub gallery_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub selector: Selector,
    pub contact_open: bool,
    pub info_open: bool,
    /// Combined-view rows allowed by pagination. Only ever grows.
    pub show_more_count: usize,
    /// Pagination step, fixed for the page's lifetime.
    pub page_size: usize,
    /// Gallery index shown in the full-screen viewer.
    pub expanded: Option<usize>,
    pub touch_pending: bool,
    /// Set by a completed press-and-hold; nothing consumes it yet.
    pub hold_marker: bool,
    pub loading: bool,
}

impl ViewState {
    pub fn initial(page_size: usize) -> Self {
        Self {
            selector: Selector::All,
            contact_open: false,
            info_open: false,
            show_more_count: page_size,
            page_size,
            expanded: None,
            touch_pending: false,
            hold_marker: false,
            loading: false,
        }
    }

    /// Any overlay open: the page body must not scroll.
    pub fn scroll_locked(&self) -> bool {
        self.contact_open || self.info_open || self.expanded.is_some()
    }

    /// Combined-view items visible under the current pagination.
    pub fn visible(&self, total: usize) -> usize {
        self.show_more_count.min(total)
    }

    /// Whether the "See N more" control is shown, and N.
    pub fn see_more(&self, total: usize) -> Option<usize> {
        (self.selector == Selector::All && self.show_more_count < total)
            .then(|| total - self.show_more_count)
    }

    pub fn can_go_previous(&self) -> bool {
        self.expanded.is_some_and(|i| i > 0)
    }

    pub fn can_go_next(&self, gallery_len: usize) -> bool {
        self.expanded.is_some_and(|i| i + 1 < gallery_len)
    }

    pub fn reduce(&self, event: ViewEvent, ctx: ViewContext) -> (ViewState, Option<Effect>) {
        let mut next = self.clone();
        let mut effect = None;

        match event {
            ViewEvent::SelectCategory(selector) => {
                next.selector = selector;
                next.expanded = None;
            }
            ViewEvent::HighlightClicked(category) => {
                next.selector = Selector::Only(category);
                next.expanded = None;
                effect = Some(Effect::ScrollToTop);
            }
            ViewEvent::ToggleContact => {
                next.contact_open = !self.contact_open;
                next.info_open = false;
            }
            ViewEvent::ToggleInfo => {
                next.info_open = !self.info_open;
                next.contact_open = false;
            }
            ViewEvent::SeeMore => {
                if self.see_more(ctx.total).is_some() {
                    next.show_more_count = self.show_more_count + self.page_size;
                }
            }
            ViewEvent::OpenImage(index) => {
                if index < ctx.gallery_len {
                    next.expanded = Some(index);
                }
            }
            ViewEvent::CloseImage => next.expanded = None,
            ViewEvent::Previous => {
                if self.can_go_previous() {
                    next.expanded = self.expanded.map(|i| i - 1);
                }
            }
            ViewEvent::Next => {
                if self.can_go_next(ctx.gallery_len) {
                    next.expanded = self.expanded.map(|i| i + 1);
                }
            }
            ViewEvent::Key(key) => {
                return match key {
                    Key::ArrowLeft => self.reduce(ViewEvent::Previous, ctx),
                    Key::ArrowRight => self.reduce(ViewEvent::Next, ctx),
                    Key::Escape => {
                        next.expanded = None;
                        next.contact_open = false;
                        next.info_open = false;
                        (next, None)
                    }
                };
            }
            ViewEvent::TouchStart => next.touch_pending = true,
            ViewEvent::HoldElapsed => {
                if self.touch_pending {
                    next.hold_marker = true;
                }
            }
            ViewEvent::TouchEnd => {
                next.touch_pending = false;
                next.hold_marker = false;
            }
            ViewEvent::FeedLoading(loading) => next.loading = loading,
        }

        (next, effect)
    }
}

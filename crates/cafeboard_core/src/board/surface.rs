//! Host surface contracts.
//!
//! Browser bindings implement these over the DOM; tests implement them
//! with recording fakes.

use crate::board::{CardId, Point, Size};

/// Cursor affordance shown over a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

/// Handle for one document-level move/up listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(pub u64);

/// Canvas that hosts the cards.
pub trait BoardSurface {
    /// Visible area used for initial placement.
    fn viewport(&self) -> Size;
    /// Creates the card element and appends it to the board.
    fn mount_card(&mut self, card: CardId, markup: &str, position: Point, cursor: Cursor);
    fn move_card(&mut self, card: CardId, position: Point);
    fn raise_card(&mut self, card: CardId, stack_order: i32);
    fn set_card_cursor(&mut self, card: CardId, cursor: Cursor);
    /// Starts delivering document-level move/up/cancel events for a drag.
    fn listen_document_pointer(&mut self, card: CardId) -> ListenerToken;
    /// Stops delivery for a registration. Must tolerate unknown tokens.
    fn release_document_pointer(&mut self, token: ListenerToken);
}

/// Overlay that shows one card's details.
pub trait PanelSurface {
    fn viewport_width(&self) -> f64;
    /// Replaces the panel content and makes it visible.
    fn show_panel(&mut self, markup: &str);
    fn hide_panel(&mut self);
    fn set_scroll_locked(&mut self, locked: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Warning,
}

/// Blocking user notification (an alert in the browser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// "Add card" form and user notifications.
pub trait CreationForm {
    fn show_form(&mut self);
    fn hide_form(&mut self);
    fn set_submit_enabled(&mut self, enabled: bool);
    /// Inline validation message next to the form.
    fn show_form_error(&mut self, message: &str);
    fn notify(&mut self, notice: Notice);
    /// Out-of-band keyword question shown with `prompt`. `None` when the
    /// user dismissed it.
    fn prompt_keywords(&mut self, prompt: &str) -> Option<String>;
}

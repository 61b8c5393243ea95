//! Per-card drag state machine and click disambiguation.
//!
//! # Responsibility
//! - Convert pointer down/move/up/cancel into card position updates.
//! - Decide whether the click that follows a release opens the panel.
//!
//! # Invariants
//! - States per card: `Idle -> Pressed -> Dragging -> Idle`.
//! - Any nonzero movement from the press position marks the interaction as
//!   a drag; the next click on that card is swallowed and clears the flag.
//! - A press holds exactly one document listener registration, released on
//!   up, cancel, abort or detach.
//! - Each card owns its state; a pointer only ever drives the card it
//!   pressed.

use crate::board::surface::{BoardSurface, Cursor, ListenerToken};
use crate::board::{CardId, Point, PointerId, PointerInput};
use log::{debug, warn};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Pressed,
    Dragging,
}

/// Outcome of a click on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickVerdict {
    /// Plain click; the detail panel should open.
    Open,
    /// Click trailing a drag (or on an unknown card); ignore it.
    Suppressed,
}

#[derive(Debug)]
struct CardDragState {
    phase: DragPhase,
    pointer: Option<PointerId>,
    press_position: Point,
    grab_offset: Point,
    moved: bool,
    listener: Option<ListenerToken>,
}

impl CardDragState {
    fn idle() -> Self {
        Self {
            phase: DragPhase::Idle,
            pointer: None,
            press_position: Point::default(),
            grab_offset: Point::default(),
            moved: false,
            listener: None,
        }
    }

    fn is_active(&self) -> bool {
        self.phase != DragPhase::Idle
    }
}

/// Drag controller for every card on one board.
#[derive(Debug)]
pub struct DragController {
    cards: HashMap<CardId, CardDragState>,
    next_stack_order: i32,
}

impl DragController {
    pub fn new(base_stack_order: i32) -> Self {
        Self {
            cards: HashMap::new(),
            next_stack_order: base_stack_order,
        }
    }

    /// Starts tracking a card in `Idle`.
    pub fn attach(&mut self, card: CardId) {
        self.cards.entry(card).or_insert_with(CardDragState::idle);
    }

    /// Stops tracking a card, releasing any listener it still holds.
    pub fn detach<S: BoardSurface + ?Sized>(&mut self, surface: &mut S, card: CardId) {
        if let Some(mut state) = self.cards.remove(&card) {
            release_listener(surface, &mut state);
        }
    }

    pub fn phase(&self, card: CardId) -> Option<DragPhase> {
        self.cards.get(&card).map(|state| state.phase)
    }

    /// Whether the last interaction on `card` moved it and no click has
    /// consumed that yet.
    pub fn moved(&self, card: CardId) -> bool {
        self.cards.get(&card).is_some_and(|state| state.moved)
    }

    /// Number of document listener registrations currently held.
    pub fn held_listeners(&self) -> usize {
        self.cards
            .values()
            .filter(|state| state.listener.is_some())
            .count()
    }

    /// `Idle -> Pressed`.
    ///
    /// `origin` is the card's current top-left corner. Returns `false` when
    /// the card is unknown or already held by a pointer.
    pub fn pointer_down<S: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        card: CardId,
        origin: Point,
        input: PointerInput,
    ) -> bool {
        if self.pointer_holder(input.pointer).is_some() {
            warn!(
                "event=drag_press module=board status=ignored reason=pointer_busy pointer={}",
                input.pointer.0
            );
            return false;
        }
        let Some(state) = self.cards.get_mut(&card) else {
            return false;
        };
        if state.is_active() {
            debug!("event=drag_press module=board status=ignored reason=card_held card={card}");
            return false;
        }

        state.phase = DragPhase::Pressed;
        state.pointer = Some(input.pointer);
        state.press_position = input.position;
        state.grab_offset = input.position - origin;
        state.moved = false;
        state.listener = Some(surface.listen_document_pointer(card));

        let stack_order = self.next_stack_order;
        self.next_stack_order = self.next_stack_order.saturating_add(1);
        surface.raise_card(card, stack_order);
        surface.set_card_cursor(card, Cursor::Grabbing);
        debug!(
            "event=drag_press module=board status=ok card={} pointer={} kind={:?}",
            card, input.pointer.0, input.kind
        );
        true
    }

    /// `Pressed -> Dragging` on the first nonzero delta, then position
    /// updates. Returns the moved card and its new top-left corner.
    pub fn pointer_move<S: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        input: PointerInput,
    ) -> Option<(CardId, Point)> {
        let card = self.pointer_holder(input.pointer)?;
        let state = self.cards.get_mut(&card)?;

        if state.phase == DragPhase::Pressed {
            if input.position == state.press_position {
                return None;
            }
            state.phase = DragPhase::Dragging;
            state.moved = true;
            debug!("event=drag_start module=board status=ok card={card}");
        }

        let position = input.position - state.grab_offset;
        surface.move_card(card, position);
        Some((card, position))
    }

    /// `Pressed/Dragging -> Idle`. The `moved` flag survives for the click.
    pub fn pointer_up<S: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        pointer: PointerId,
    ) -> Option<CardId> {
        self.end_press(surface, pointer, "release")
    }

    /// Same transition as `pointer_up`, for host-cancelled pointers.
    pub fn pointer_cancel<S: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        pointer: PointerId,
    ) -> Option<CardId> {
        self.end_press(surface, pointer, "cancel")
    }

    /// Ends any interaction on `card` regardless of pointer.
    pub fn abort<S: BoardSurface + ?Sized>(&mut self, surface: &mut S, card: CardId) {
        if let Some(state) = self.cards.get_mut(&card) {
            if state.is_active() {
                finish(surface, card, state);
                debug!("event=drag_end module=board status=aborted card={card}");
            }
        }
    }

    /// Aborts every active interaction, e.g. when the page loses focus.
    /// Returns how many were ended.
    pub fn abort_all<S: BoardSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let mut ended = 0;
        for (card, state) in self.cards.iter_mut() {
            if state.is_active() {
                finish(surface, *card, state);
                ended += 1;
            }
        }
        if ended > 0 {
            debug!("event=drag_end module=board status=aborted cards={ended}");
        }
        ended
    }

    /// Click verdict for `card`; consumes a pending `moved` flag.
    pub fn take_click(&mut self, card: CardId) -> ClickVerdict {
        let Some(state) = self.cards.get_mut(&card) else {
            return ClickVerdict::Suppressed;
        };
        if state.moved {
            state.moved = false;
            debug!("event=card_click module=board status=suppressed card={card}");
            return ClickVerdict::Suppressed;
        }
        ClickVerdict::Open
    }

    fn end_press<S: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        pointer: PointerId,
        reason: &str,
    ) -> Option<CardId> {
        let card = self.pointer_holder(pointer)?;
        let state = self.cards.get_mut(&card)?;
        finish(surface, card, state);
        debug!(
            "event=drag_end module=board status=ok card={} reason={} moved={}",
            card, reason, state.moved
        );
        Some(card)
    }

    fn pointer_holder(&self, pointer: PointerId) -> Option<CardId> {
        self.cards
            .iter()
            .find(|(_, state)| state.is_active() && state.pointer == Some(pointer))
            .map(|(card, _)| *card)
    }
}

fn finish<S: BoardSurface + ?Sized>(surface: &mut S, card: CardId, state: &mut CardDragState) {
    state.phase = DragPhase::Idle;
    state.pointer = None;
    release_listener(surface, state);
    surface.set_card_cursor(card, Cursor::Grab);
}

fn release_listener<S: BoardSurface + ?Sized>(surface: &mut S, state: &mut CardDragState) {
    if let Some(token) = state.listener.take() {
        surface.release_document_pointer(token);
    }
}

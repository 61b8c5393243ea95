//! Card materialization and per-card view state.
//!
//! # Responsibility
//! - Create the visual card for a record and register it for dragging.
//! - Track each card's current on-screen position.
//!
//! # Invariants
//! - Every `materialize` call yields a new card; there is no dedup by record.
//! - Positions are view state only and are never persisted.

use crate::board::drag::DragController;
use crate::board::markup::card_markup;
use crate::board::placement::Placement;
use crate::board::surface::{BoardSurface, Cursor};
use crate::board::{CardId, Point, Size};
use crate::model::card::CardRecord;
use log::debug;
use uuid::Uuid;

/// One rendered card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardHandle {
    pub id: CardId,
    pub record: CardRecord,
    pub position: Point,
}

/// Renderer for every card on one board, in creation order.
#[derive(Debug)]
pub struct CardRenderer {
    cards: Vec<CardHandle>,
    footprint: Size,
}

impl CardRenderer {
    pub fn new(footprint: Size) -> Self {
        Self {
            cards: Vec::new(),
            footprint,
        }
    }

    /// Mounts a new card for `record` and attaches drag handling to it.
    pub fn materialize<S: BoardSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        drag: &mut DragController,
        placement: &mut dyn Placement,
        record: CardRecord,
    ) -> CardId {
        let id = Uuid::new_v4();
        let position = placement.place(surface.viewport(), self.footprint);

        surface.mount_card(id, &card_markup(&record), position, Cursor::Grab);
        drag.attach(id);
        self.cards.push(CardHandle {
            id,
            record,
            position,
        });

        debug!(
            "event=card_materialize module=board status=ok card={} total={}",
            id,
            self.cards.len()
        );
        id
    }

    pub fn get(&self, card: CardId) -> Option<&CardHandle> {
        self.cards.iter().find(|handle| handle.id == card)
    }

    pub fn position(&self, card: CardId) -> Option<Point> {
        self.get(card).map(|handle| handle.position)
    }

    /// Records a position the surface already shows.
    pub fn set_position(&mut self, card: CardId, position: Point) -> bool {
        match self.cards.iter_mut().find(|handle| handle.id == card) {
            Some(handle) => {
                handle.position = position;
                true
            }
            None => false,
        }
    }

    pub fn cards(&self) -> &[CardHandle] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

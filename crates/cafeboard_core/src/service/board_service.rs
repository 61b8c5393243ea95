//! Board use-case service.
//!
//! # Responsibility
//! - Wire store, renderer, drag controller, panel and creation flow over one
//!   host.
//! - Translate host events (pointer, click, timers, form actions) into
//!   component calls and user-visible feedback.
//!
//! # Invariants
//! - Every loaded or created record is materialized exactly once.
//! - No failure here is fatal to the board; errors are reported to the user
//!   and logged, and the board stays interactive.
//! - A card that failed to persist still renders for the session.

use crate::board::drag::{ClickVerdict, DragController};
use crate::board::panel::{MapError, MapInitTicket, MapWidget, PanelController, PanelState};
use crate::board::placement::Placement;
use crate::board::renderer::CardRenderer;
use crate::board::surface::{BoardSurface, CreationForm, Notice, PanelSurface};
use crate::board::{CardId, PointerEvent, Size};
use crate::config::BoardConfig;
use crate::geocode::{GeocodeCandidate, GeocodeError, Geocoder};
use crate::model::card::CardRecord;
use crate::service::creation_flow::{CardForm, CreationError, CreationFlow, PendingSubmission};
use crate::store::card_store::{CardStore, StoreError};
use crate::store::kv::KeyValueStorage;
use log::{error, info, warn};

/// Result of a committed submission.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub card: CardId,
    /// Set when the card rendered but could not be persisted.
    pub storage_warning: Option<StoreError>,
}

impl SubmitOutcome {
    pub fn persisted(&self) -> bool {
        self.storage_warning.is_none()
    }
}

pub struct BoardService<K, H, M>
where
    K: KeyValueStorage,
    H: BoardSurface + PanelSurface + CreationForm,
    M: MapWidget,
{
    config: BoardConfig,
    store: CardStore<K>,
    host: H,
    renderer: CardRenderer,
    drag: DragController,
    panel: PanelController<M>,
    creation: CreationFlow,
    placement: Box<dyn Placement>,
}

impl<K, H, M> BoardService<K, H, M>
where
    K: KeyValueStorage,
    H: BoardSurface + PanelSurface + CreationForm,
    M: MapWidget,
{
    pub fn new(
        config: BoardConfig,
        storage: K,
        host: H,
        widget: M,
        placement: Box<dyn Placement>,
    ) -> Self {
        let store = CardStore::new(storage, config.storage_key.clone());
        let renderer = CardRenderer::new(Size::new(
            config.layout.card_width,
            config.layout.card_height,
        ));
        let drag = DragController::new(config.layout.base_stack_order);
        let panel = PanelController::new(widget, &config.map, &config.layout);
        let creation = CreationFlow::new(config.default_keywords.clone());
        Self {
            config,
            store,
            host,
            renderer,
            drag,
            panel,
            creation,
            placement,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &CardStore<K> {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn renderer(&self) -> &CardRenderer {
        &self.renderer
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn panel(&self) -> &PanelController<M> {
        &self.panel
    }

    pub fn panel_state(&self) -> &PanelState {
        self.panel.state()
    }

    pub fn creation(&self) -> &CreationFlow {
        &self.creation
    }

    /// Materializes every stored card. Returns how many were rendered.
    pub fn load(&mut self) -> usize {
        let records = self.store.load_all();
        let count = records.len();
        for record in records {
            self.materialize(record);
        }
        info!("event=board_load module=service status=ok cards={count}");
        count
    }

    /// Routes one raw pointer event to the drag controller.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { card, input } => {
                let Some(origin) = self.renderer.position(card) else {
                    warn!("event=pointer_down module=service status=ignored reason=unknown_card");
                    return;
                };
                self.drag.pointer_down(&mut self.host, card, origin, input);
            }
            PointerEvent::Move(input) => {
                if let Some((card, position)) = self.drag.pointer_move(&mut self.host, input) {
                    self.renderer.set_position(card, position);
                }
            }
            PointerEvent::Up(pointer) => {
                self.drag.pointer_up(&mut self.host, pointer);
            }
            PointerEvent::Cancel(pointer) => {
                self.drag.pointer_cancel(&mut self.host, pointer);
            }
        }
    }

    /// Ends every drag in progress and releases its listeners.
    ///
    /// Hosts call this on window blur or when the page is hidden, where no
    /// pointer up or cancel will arrive.
    pub fn abort_drags(&mut self) -> usize {
        let ended = self.drag.abort_all(&mut self.host);
        if ended > 0 {
            info!("event=drag_abort module=service status=ok cards={ended}");
        }
        ended
    }

    /// Opens the panel for a plain click; swallows the click after a drag.
    ///
    /// Returns the map ticket the host must fire after `ticket.delay()`.
    pub fn handle_click(&mut self, card: CardId) -> Option<MapInitTicket> {
        if self.drag.take_click(card) == ClickVerdict::Suppressed {
            return None;
        }
        let record = self.renderer.get(card)?.record.clone();
        Some(self.panel.open(&mut self.host, record))
    }

    /// Timer callback for a ticket from `handle_click`.
    pub fn on_map_settled(&mut self, ticket: MapInitTicket) -> Result<bool, MapError> {
        self.panel.on_layout_settled(ticket)
    }

    pub fn close_panel(&mut self) {
        self.panel.close(&mut self.host);
    }

    pub fn show_form(&mut self) {
        self.creation.show();
        self.host.show_form();
    }

    /// Hides the form and abandons any lookup still running.
    pub fn cancel_form(&mut self) {
        self.creation.cancel();
        self.host.hide_form();
        self.host.set_submit_enabled(true);
    }

    /// First half of a submission: validate and disable the submit action.
    ///
    /// When `form.keywords` is `None` the host is asked for them first; an
    /// empty or dismissed answer falls back to the default tag.
    pub fn begin_submission(
        &mut self,
        mut form: CardForm,
    ) -> Result<PendingSubmission, CreationError> {
        if form.keywords.is_none() && !self.creation.is_in_flight() {
            form.keywords = self
                .host
                .prompt_keywords(&self.config.messages.keywords_prompt);
        }
        match self.creation.begin(form) {
            Ok(pending) => {
                self.host.set_submit_enabled(false);
                Ok(pending)
            }
            Err(err) => {
                if matches!(
                    err,
                    CreationError::Validation(_) | CreationError::MissingAddress
                ) {
                    let message = self.config.messages.missing_fields.clone();
                    self.host.show_form_error(&message);
                }
                warn!("event=card_submit module=service status=rejected error={err}");
                Err(err)
            }
        }
    }

    /// Second half of a submission, once the address lookup has resolved.
    ///
    /// # Errors
    /// - `Abandoned` when the form was cancelled meanwhile; the result is
    ///   dropped without touching the host.
    /// - `LookupEmpty`, `LookupFailed`, `InvalidCoordinates` leave the form
    ///   open with submit re-enabled, after notifying the user.
    pub fn complete_submission(
        &mut self,
        pending: PendingSubmission,
        lookup: Result<Vec<GeocodeCandidate>, GeocodeError>,
    ) -> Result<SubmitOutcome, CreationError> {
        let record = match self.creation.finish(pending, lookup) {
            Ok(record) => record,
            Err(CreationError::Abandoned) => {
                info!("event=card_submit module=service status=abandoned");
                return Err(CreationError::Abandoned);
            }
            Err(err) => {
                self.host.set_submit_enabled(true);
                let message = match &err {
                    CreationError::LookupEmpty => self.config.messages.address_not_found.clone(),
                    _ => self.config.messages.lookup_failed.clone(),
                };
                self.host.notify(Notice::error(message));
                warn!("event=card_submit module=service status=error error={err}");
                return Err(err);
            }
        };

        let storage_warning = match self.store.append(&record) {
            Ok(_) => None,
            Err(err) => {
                let message = self.config.messages.storage_failed.clone();
                self.host.notify(Notice::warning(message));
                Some(err)
            }
        };
        let card = self.materialize(record);
        self.creation.complete();
        self.host.hide_form();
        self.host.set_submit_enabled(true);

        if let Some(err) = &storage_warning {
            error!("event=card_submit module=service status=unsaved card={card} error={err}");
        } else {
            info!("event=card_submit module=service status=ok card={card}");
        }
        Ok(SubmitOutcome {
            card,
            storage_warning,
        })
    }

    /// Runs a whole submission with a synchronous geocoder.
    pub fn submit<G: Geocoder + ?Sized>(
        &mut self,
        form: CardForm,
        geocoder: &G,
    ) -> Result<SubmitOutcome, CreationError> {
        let pending = self.begin_submission(form)?;
        let lookup = geocoder.lookup(pending.address());
        self.complete_submission(pending, lookup)
    }

    fn materialize(&mut self, record: CardRecord) -> CardId {
        self.renderer.materialize(
            &mut self.host,
            &mut self.drag,
            self.placement.as_mut(),
            record,
        )
    }
}

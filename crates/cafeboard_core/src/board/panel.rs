//! Detail panel and its map viewport.
//!
//! # Responsibility
//! - Show one card's details in the overlay panel.
//! - Own the single live map viewport: create it once layout settles,
//!   dispose it before any replacement.
//!
//! # Invariants
//! - At most one viewport is live at any time; the previous one is disposed
//!   before a new one is created.
//! - Only the ticket from the latest `open` may create a viewport; close and
//!   re-open invalidate older tickets.
//!
//! # See also
//! - `board::markup::MAP_CONTAINER_ID` for the container the widget binds to.

use crate::board::markup::{panel_markup, MAP_CONTAINER_ID};
use crate::board::surface::PanelSurface;
use crate::config::{LayoutConfig, MapConfig};
use crate::model::card::{CardRecord, Coordinates};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Tile layer configuration handed to the map widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    ContainerMissing(String),
    Widget(String),
}

impl Display for MapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContainerMissing(id) => write!(f, "map container `{id}` not found"),
            Self::Widget(message) => write!(f, "map widget error: {message}"),
        }
    }
}

impl Error for MapError {}

/// A live map instance bound to one container.
pub trait MapViewport {
    fn center(&self) -> Coordinates;
    fn add_marker(&mut self, at: Coordinates) -> Result<(), MapError>;
    /// Releases the widget instance. Consuming `self` makes reuse impossible.
    fn dispose(self);
}

/// Factory for map viewports (Leaflet-style widget in the browser).
pub trait MapWidget {
    type Viewport: MapViewport;

    fn create_viewport(
        &mut self,
        container_id: &str,
        center: Coordinates,
        zoom: u8,
        tiles: &TileSource,
    ) -> Result<Self::Viewport, MapError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Closed,
    Open(CardRecord),
}

/// Deferred map creation request returned by `PanelController::open`.
///
/// The host fires it after `delay()`, once the panel has been laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the map is only created when the ticket is settled"]
pub struct MapInitTicket {
    generation: u64,
    delay: Duration,
}

impl MapInitTicket {
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

pub struct PanelController<M: MapWidget> {
    widget: M,
    viewport: Option<M::Viewport>,
    state: PanelState,
    generation: u64,
    pending: Option<u64>,
    zoom: u8,
    tiles: TileSource,
    settle_delay: Duration,
    dispose_on_close: bool,
    narrow_viewport_max_width: f64,
    scroll_locked: bool,
}

impl<M: MapWidget> PanelController<M> {
    pub fn new(widget: M, map: &MapConfig, layout: &LayoutConfig) -> Self {
        Self {
            widget,
            viewport: None,
            state: PanelState::Closed,
            generation: 0,
            pending: None,
            zoom: map.zoom,
            tiles: TileSource {
                url_template: map.tile_url_template.clone(),
                attribution: map.attribution.clone(),
            },
            settle_delay: Duration::from_millis(map.settle_delay_ms),
            dispose_on_close: map.dispose_on_close,
            narrow_viewport_max_width: layout.narrow_viewport_max_width,
            scroll_locked: false,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open(_))
    }

    pub fn viewport(&self) -> Option<&M::Viewport> {
        self.viewport.as_ref()
    }

    /// Shows `record`, replacing whatever the panel displayed before.
    ///
    /// The previous viewport is disposed now because its container is gone;
    /// the new one is created by `on_layout_settled` with the returned ticket.
    pub fn open<S: PanelSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        record: CardRecord,
    ) -> MapInitTicket {
        self.dispose_viewport();
        surface.show_panel(&panel_markup(&record));
        if surface.viewport_width() <= self.narrow_viewport_max_width {
            surface.set_scroll_locked(true);
            self.scroll_locked = true;
        }

        self.state = PanelState::Open(record);
        self.generation += 1;
        self.pending = Some(self.generation);
        debug!(
            "event=panel_open module=board status=ok generation={}",
            self.generation
        );
        MapInitTicket {
            generation: self.generation,
            delay: self.settle_delay,
        }
    }

    /// Creates the viewport for the current card.
    ///
    /// Returns `Ok(false)` for a stale ticket, `Ok(true)` when a viewport with
    /// one marker is live.
    pub fn on_layout_settled(&mut self, ticket: MapInitTicket) -> Result<bool, MapError> {
        if self.pending != Some(ticket.generation) {
            debug!(
                "event=map_init module=board status=stale generation={}",
                ticket.generation
            );
            return Ok(false);
        }
        self.pending = None;
        let center = match &self.state {
            PanelState::Open(record) => record.coordinates(),
            PanelState::Closed => return Ok(false),
        };

        self.dispose_viewport();
        let mut viewport = self
            .widget
            .create_viewport(MAP_CONTAINER_ID, center, self.zoom, &self.tiles)
            .inspect_err(|err| {
                error!("event=map_init module=board status=error stage=create error={err}");
            })?;
        if let Err(err) = viewport.add_marker(center) {
            error!("event=map_init module=board status=error stage=marker error={err}");
            viewport.dispose();
            return Err(err);
        }
        self.viewport = Some(viewport);
        info!(
            "event=map_init module=board status=ok generation={} zoom={}",
            ticket.generation, self.zoom
        );
        Ok(true)
    }

    /// Hides the panel and drops any pending map creation.
    pub fn close<S: PanelSurface + ?Sized>(&mut self, surface: &mut S) {
        self.state = PanelState::Closed;
        self.pending = None;
        surface.hide_panel();
        if self.scroll_locked {
            surface.set_scroll_locked(false);
            self.scroll_locked = false;
        }
        if self.dispose_on_close {
            self.dispose_viewport();
        }
        debug!("event=panel_close module=board status=ok");
    }

    fn dispose_viewport(&mut self) {
        if let Some(viewport) = self.viewport.take() {
            viewport.dispose();
        }
    }
}

impl<M: MapWidget> Drop for PanelController<M> {
    fn drop(&mut self) {
        self.dispose_viewport();
    }
}

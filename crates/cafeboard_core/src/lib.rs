//! Core logic for the cafe card board.
//! This crate is the single source of truth for card invariants and for the
//! drag/click disambiguation rules.

pub mod board;
pub mod config;
pub mod db;
pub mod geocode;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use board::drag::{ClickVerdict, DragController, DragPhase};
pub use board::panel::{
    MapError, MapInitTicket, MapViewport, MapWidget, PanelController, PanelState, TileSource,
};
pub use board::placement::{Placement, RandomPlacement};
pub use board::renderer::{CardHandle, CardRenderer};
pub use board::surface::{
    BoardSurface, CreationForm, Cursor, ListenerToken, Notice, NoticeLevel, PanelSurface,
};
pub use board::{CardId, Point, PointerEvent, PointerId, PointerInput, PointerKind, Size};
pub use config::{BoardConfig, ConfigError};
pub use geocode::nominatim::NominatimGeocoder;
pub use geocode::{GeocodeCandidate, GeocodeError, Geocoder, HttpTransport};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::card::{
    CardDraft, CardRecord, CardValidationError, Coordinates, RequiredField, DEFAULT_KEYWORDS,
};
pub use service::board_service::{BoardService, SubmitOutcome};
pub use service::creation_flow::{CardForm, CreationError, CreationFlow, PendingSubmission};
pub use store::card_store::{CardStore, StoreError};
pub use store::kv::{KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage, StorageError};

/// Minimal health-check API for host bindings.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#![allow(dead_code)]

use cafeboard_core::{
    BoardConfig, BoardService, BoardSurface, CardForm, CardId, CardRecord, Coordinates,
    CreationForm, Cursor, GeocodeCandidate, GeocodeError, Geocoder, ListenerToken, MapError,
    MapViewport, MapWidget, MemoryKeyValueStorage, Notice, PanelSurface, Point, RandomPlacement,
    Size, TileSource,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Recording stand-in for the browser page.
pub struct FakeHost {
    pub viewport: Size,
    pub cards: HashMap<CardId, FakeCard>,
    pub mount_order: Vec<CardId>,
    pub live_listeners: HashSet<u64>,
    next_listener: u64,
    pub panel_visible: bool,
    pub panel_markup: Option<String>,
    pub scroll_locked: bool,
    pub form_visible: bool,
    pub submit_enabled: bool,
    pub form_errors: Vec<String>,
    pub notices: Vec<Notice>,
    /// Answer given to the keyword prompt.
    pub keyword_answer: Option<String>,
    pub prompts: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FakeCard {
    pub markup: String,
    pub position: Point,
    pub cursor: Cursor,
    pub stack_order: Option<i32>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::with_viewport(Size::new(1280.0, 900.0))
    }

    pub fn with_viewport(viewport: Size) -> Self {
        Self {
            viewport,
            cards: HashMap::new(),
            mount_order: Vec::new(),
            live_listeners: HashSet::new(),
            next_listener: 0,
            panel_visible: false,
            panel_markup: None,
            scroll_locked: false,
            form_visible: false,
            submit_enabled: true,
            form_errors: Vec::new(),
            notices: Vec::new(),
            keyword_answer: None,
            prompts: Vec::new(),
        }
    }
}

impl BoardSurface for FakeHost {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn mount_card(&mut self, card: CardId, markup: &str, position: Point, cursor: Cursor) {
        self.mount_order.push(card);
        self.cards.insert(
            card,
            FakeCard {
                markup: markup.to_string(),
                position,
                cursor,
                stack_order: None,
            },
        );
    }

    fn move_card(&mut self, card: CardId, position: Point) {
        if let Some(fake) = self.cards.get_mut(&card) {
            fake.position = position;
        }
    }

    fn raise_card(&mut self, card: CardId, stack_order: i32) {
        if let Some(fake) = self.cards.get_mut(&card) {
            fake.stack_order = Some(stack_order);
        }
    }

    fn set_card_cursor(&mut self, card: CardId, cursor: Cursor) {
        if let Some(fake) = self.cards.get_mut(&card) {
            fake.cursor = cursor;
        }
    }

    fn listen_document_pointer(&mut self, _card: CardId) -> ListenerToken {
        self.next_listener += 1;
        self.live_listeners.insert(self.next_listener);
        ListenerToken(self.next_listener)
    }

    fn release_document_pointer(&mut self, token: ListenerToken) {
        self.live_listeners.remove(&token.0);
    }
}

impl PanelSurface for FakeHost {
    fn viewport_width(&self) -> f64 {
        self.viewport.width
    }

    fn show_panel(&mut self, markup: &str) {
        self.panel_visible = true;
        self.panel_markup = Some(markup.to_string());
    }

    fn hide_panel(&mut self) {
        self.panel_visible = false;
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }
}

impl CreationForm for FakeHost {
    fn show_form(&mut self) {
        self.form_visible = true;
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn show_form_error(&mut self, message: &str) {
        self.form_errors.push(message.to_string());
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn prompt_keywords(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.keyword_answer.clone()
    }
}

/// Shared bookkeeping for every viewport a `FakeMapWidget` creates.
#[derive(Debug, Default)]
pub struct MapLedger {
    pub created: Vec<Coordinates>,
    pub live: HashSet<usize>,
    pub disposed: Vec<usize>,
    pub markers: HashMap<usize, Vec<Coordinates>>,
    pub zooms: Vec<u8>,
    pub tiles: Vec<TileSource>,
}

#[derive(Clone, Default)]
pub struct FakeMapWidget {
    pub ledger: Rc<RefCell<MapLedger>>,
    pub fail_next: Rc<Cell<bool>>,
}

impl FakeMapWidget {
    pub fn live_count(&self) -> usize {
        self.ledger.borrow().live.len()
    }

    pub fn live_center(&self) -> Option<Coordinates> {
        let ledger = self.ledger.borrow();
        let id = ledger.live.iter().next()?;
        ledger.created.get(*id).copied()
    }
}

pub struct FakeViewport {
    id: usize,
    center: Coordinates,
    ledger: Rc<RefCell<MapLedger>>,
}

impl MapViewport for FakeViewport {
    fn center(&self) -> Coordinates {
        self.center
    }

    fn add_marker(&mut self, at: Coordinates) -> Result<(), MapError> {
        self.ledger
            .borrow_mut()
            .markers
            .entry(self.id)
            .or_default()
            .push(at);
        Ok(())
    }

    fn dispose(self) {
        let mut ledger = self.ledger.borrow_mut();
        ledger.live.remove(&self.id);
        ledger.disposed.push(self.id);
    }
}

impl MapWidget for FakeMapWidget {
    type Viewport = FakeViewport;

    fn create_viewport(
        &mut self,
        container_id: &str,
        center: Coordinates,
        zoom: u8,
        tiles: &TileSource,
    ) -> Result<FakeViewport, MapError> {
        if self.fail_next.replace(false) {
            return Err(MapError::ContainerMissing(container_id.to_string()));
        }
        let mut ledger = self.ledger.borrow_mut();
        assert!(
            ledger.live.is_empty(),
            "a viewport was created while another one is still live"
        );
        let id = ledger.created.len();
        ledger.created.push(center);
        ledger.live.insert(id);
        ledger.zooms.push(zoom);
        ledger.tiles.push(tiles.clone());
        Ok(FakeViewport {
            id,
            center,
            ledger: Rc::clone(&self.ledger),
        })
    }
}

/// Geocoder returning a fixed answer and counting calls.
pub struct FixedGeocoder {
    pub answer: Result<Vec<GeocodeCandidate>, GeocodeError>,
    pub calls: RefCell<Vec<String>>,
}

impl FixedGeocoder {
    pub fn found(latitude: f64, longitude: f64) -> Self {
        Self {
            answer: Ok(vec![GeocodeCandidate {
                coordinates: Coordinates::new(latitude, longitude),
                display_name: None,
            }]),
            calls: RefCell::default(),
        }
    }

    pub fn empty() -> Self {
        Self {
            answer: Ok(Vec::new()),
            calls: RefCell::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(GeocodeError::Transport(message.to_string())),
            calls: RefCell::default(),
        }
    }
}

impl Geocoder for FixedGeocoder {
    fn lookup(&self, address: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        self.calls.borrow_mut().push(address.to_string());
        self.answer.clone()
    }
}

pub type TestBoard<'s> = BoardService<&'s MemoryKeyValueStorage, FakeHost, FakeMapWidget>;

pub fn board_with<'s>(
    config: BoardConfig,
    storage: &'s MemoryKeyValueStorage,
    host: FakeHost,
    widget: FakeMapWidget,
) -> TestBoard<'s> {
    BoardService::new(
        config,
        storage,
        host,
        widget,
        Box::new(RandomPlacement::seeded(7)),
    )
}

pub fn board(storage: &MemoryKeyValueStorage, widget: FakeMapWidget) -> TestBoard<'_> {
    board_with(BoardConfig::default(), storage, FakeHost::new(), widget)
}

pub fn record(name: &str, latitude: f64, longitude: f64) -> CardRecord {
    CardRecord {
        name: name.to_string(),
        description: format!("{name} description"),
        image_url: format!("{name}.jpg"),
        latitude,
        longitude,
        keywords: "#카페".to_string(),
    }
}

pub fn yeonnam_form() -> CardForm {
    CardForm {
        name: "Cafe Yeonnam".to_string(),
        description: "quiet corner".to_string(),
        image_url: "img.jpg".to_string(),
        address: "Yeonnam-dong, Seoul".to_string(),
        keywords: None,
    }
}

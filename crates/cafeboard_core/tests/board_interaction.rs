mod common;

use cafeboard_core::{
    CardStore, Cursor, DragPhase, KeyValueStorage, MemoryKeyValueStorage, PanelState, Point,
    PointerEvent, PointerId, PointerInput, PointerKind,
};
use common::{board, record, FakeMapWidget};

fn seeded_storage(names: &[&str]) -> MemoryKeyValueStorage {
    let storage = MemoryKeyValueStorage::new();
    let store = CardStore::new(&storage, "cafeCards");
    for (index, name) in names.iter().enumerate() {
        store.append(&record(name, 37.0 + index as f64, 127.0)).unwrap();
    }
    storage
}

fn press(card: cafeboard_core::CardId, x: f64, y: f64) -> PointerEvent {
    PointerEvent::Down {
        card,
        input: PointerInput::mouse(x, y),
    }
}

fn drag_to(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Move(PointerInput::mouse(x, y))
}

#[test]
fn load_materializes_every_stored_card_in_order() {
    let storage = seeded_storage(&["One", "Two", "Three"]);
    let mut board = board(&storage, FakeMapWidget::default());

    assert_eq!(board.load(), 3);

    let names: Vec<&str> = board
        .renderer()
        .cards()
        .iter()
        .map(|handle| handle.record.name.as_str())
        .collect();
    assert_eq!(names, vec!["One", "Two", "Three"]);
    assert_eq!(board.host().mount_order.len(), 3);
    for handle in board.renderer().cards() {
        let mounted = &board.host().cards[&handle.id];
        assert_eq!(mounted.position, handle.position);
        assert_eq!(mounted.cursor, Cursor::Grab);
        assert!(mounted.markup.contains(&format!("{}.jpg", handle.record.name)));
    }
}

#[test]
fn corrupt_storage_loads_an_empty_board() {
    let storage = MemoryKeyValueStorage::new();
    storage.set_item("cafeCards", "not json at all").unwrap();
    let mut board = board(&storage, FakeMapWidget::default());

    assert_eq!(board.load(), 0);
    assert!(board.renderer().is_empty());
    assert!(board.host().cards.is_empty());
}

#[test]
fn plain_click_opens_the_detail_panel() {
    let storage = seeded_storage(&["Solo"]);
    let mut board = board(&storage, FakeMapWidget::default());
    board.load();
    let card = board.renderer().cards()[0].id;
    let origin = board.renderer().position(card).unwrap();

    board.handle_pointer(press(card, origin.x + 10.0, origin.y + 10.0));
    board.handle_pointer(PointerEvent::Up(PointerId(1)));
    let ticket = board.handle_click(card);

    assert!(ticket.is_some());
    assert!(board.host().panel_visible);
    assert!(matches!(board.panel_state(), PanelState::Open(shown) if shown.name == "Solo"));
}

#[test]
fn drag_moves_the_card_and_swallows_one_click() {
    let storage = seeded_storage(&["Mover"]);
    let mut board = board(&storage, FakeMapWidget::default());
    board.load();
    let card = board.renderer().cards()[0].id;
    let origin = board.renderer().position(card).unwrap();
    let grab = Point::new(origin.x + 20.0, origin.y + 30.0);

    board.handle_pointer(press(card, grab.x, grab.y));
    assert_eq!(board.host().cards[&card].cursor, Cursor::Grabbing);
    assert_eq!(board.host().cards[&card].stack_order, Some(10_000));
    board.handle_pointer(drag_to(grab.x + 50.0, grab.y - 5.0));
    board.handle_pointer(PointerEvent::Up(PointerId(1)));

    let expected = Point::new(origin.x + 50.0, origin.y - 5.0);
    assert_eq!(board.renderer().position(card), Some(expected));
    assert_eq!(board.host().cards[&card].position, expected);
    assert_eq!(board.host().cards[&card].cursor, Cursor::Grab);

    assert!(board.handle_click(card).is_none());
    assert!(!board.host().panel_visible);
    assert!(board.handle_click(card).is_some());
    assert!(board.host().panel_visible);
}

#[test]
fn each_press_raises_the_card_above_earlier_ones() {
    let storage = seeded_storage(&["Under", "Over"]);
    let mut board = board(&storage, FakeMapWidget::default());
    board.load();
    let first = board.renderer().cards()[0].id;
    let second = board.renderer().cards()[1].id;

    for card in [first, second, first] {
        board.handle_pointer(press(card, 1.0, 1.0));
        board.handle_pointer(PointerEvent::Up(PointerId(1)));
    }

    let host = board.host();
    assert_eq!(host.cards[&second].stack_order, Some(10_001));
    assert_eq!(host.cards[&first].stack_order, Some(10_002));
}

#[test]
fn touch_cancel_ends_the_drag_and_releases_listeners() {
    let storage = seeded_storage(&["Touchy"]);
    let mut board = board(&storage, FakeMapWidget::default());
    board.load();
    let card = board.renderer().cards()[0].id;
    let finger = PointerId(42);

    board.handle_pointer(PointerEvent::Down {
        card,
        input: PointerInput::new(finger, PointerKind::Touch, Point::new(5.0, 5.0)),
    });
    board.handle_pointer(PointerEvent::Move(PointerInput::new(
        finger,
        PointerKind::Touch,
        Point::new(9.0, 5.0),
    )));
    assert_eq!(board.host().live_listeners.len(), 1);
    assert_eq!(board.drag().phase(card), Some(DragPhase::Dragging));

    board.handle_pointer(PointerEvent::Cancel(finger));

    assert_eq!(board.drag().phase(card), Some(DragPhase::Idle));
    assert!(board.host().live_listeners.is_empty());
    assert_eq!(board.drag().held_listeners(), 0);
}

#[test]
fn many_drags_leave_no_listeners_behind() {
    let storage = seeded_storage(&["Busy"]);
    let mut board = board(&storage, FakeMapWidget::default());
    board.load();
    let card = board.renderer().cards()[0].id;

    for step in 0..25 {
        let x = step as f64;
        board.handle_pointer(press(card, x, 0.0));
        board.handle_pointer(drag_to(x + 3.0, 4.0));
        board.handle_pointer(PointerEvent::Up(PointerId(1)));
    }

    assert!(board.host().live_listeners.is_empty());
}

#[test]
fn moves_without_a_press_are_ignored() {
    let storage = seeded_storage(&["Still"]);
    let mut board = board(&storage, FakeMapWidget::default());
    board.load();
    let card = board.renderer().cards()[0].id;
    let before = board.renderer().position(card);

    board.handle_pointer(drag_to(500.0, 500.0));
    board.handle_pointer(PointerEvent::Up(PointerId(1)));

    assert_eq!(board.renderer().position(card), before);
    assert!(board.handle_click(card).is_some());
}

#[test]
fn aborting_drags_releases_listeners_and_restores_cursor() {
    let storage = seeded_storage(&["Left", "Right"]);
    let mut board = board(&storage, FakeMapWidget::default());
    board.load();
    let card = board.renderer().cards()[0].id;
    let idle = board.renderer().cards()[1].id;

    board.handle_pointer(press(card, 10.0, 10.0));
    board.handle_pointer(drag_to(40.0, 25.0));
    assert_eq!(board.host().live_listeners.len(), 1);

    assert_eq!(board.abort_drags(), 1);

    assert!(board.host().live_listeners.is_empty());
    assert_eq!(board.drag().phase(card), Some(DragPhase::Idle));
    assert_eq!(board.drag().phase(idle), Some(DragPhase::Idle));
    assert_eq!(board.host().cards[&card].cursor, Cursor::Grab);
    assert_eq!(board.abort_drags(), 0);

    let parked = board.renderer().position(card);
    board.handle_pointer(drag_to(300.0, 300.0));
    assert_eq!(board.renderer().position(card), parked);
}

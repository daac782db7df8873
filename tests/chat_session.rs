//! A whole chat session driven through the controller with a scripted transport.

use reqwest::Method;
use serde_json::json;
use simplechat::chat::services::{MockReply, MockTransport};
use simplechat::config::{ChatSettings, EMPTY_BOARD_PLACEHOLDER};
use simplechat::{BoardModel, BoardView, ChatController};
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn session(transport: Arc<MockTransport>) -> (ChatController, Arc<BoardView>) {
    let settings = ChatSettings::new("http://board.test/SimpleChat/board", "alice");
    let model = BoardModel::new(settings, transport).unwrap();
    let mut controller = ChatController::new(Arc::new(model));
    let view = Arc::new(BoardView::new());
    controller.register_view(view.clone());
    (controller, view)
}

#[test]
fn post_then_clear_should_round_trip_through_the_board() {
    let transport = Arc::new(MockTransport::new());
    transport.push_reply(MockReply::json(200, &json!({"messages": ""})));
    transport.push_reply(MockReply::json(201, &json!({"messages": "alice: hi"})));
    transport.push_reply(MockReply::json(200, &json!({"messages": ""})));
    let (controller, view) = session(transport.clone());

    assert!(controller.initialize().wait_timeout(WAIT));
    assert_eq!(view.displayed_text(), EMPTY_BOARD_PLACEHOLDER);

    assert!(controller.send_post_request("hi").wait_timeout(WAIT));
    assert_eq!(view.displayed_text(), "alice: hi");

    assert!(controller.send_delete_request().wait_timeout(WAIT));
    assert_eq!(view.displayed_text(), EMPTY_BOARD_PLACEHOLDER);

    let methods: Vec<Method> = transport.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::GET, Method::POST, Method::DELETE]);
    assert_eq!(view.redraw_count(), 3);
}

#[test]
fn unreachable_board_should_keep_the_screen_unchanged() {
    let transport = Arc::new(MockTransport::with_fallback(MockReply::ConnectionRefused));
    let (controller, view) = session(transport);
    controller.change_output_text("offline draft").unwrap();

    assert!(controller.send_get_request().wait_timeout(WAIT));
    assert!(controller.send_post_request("lost").wait_timeout(WAIT));

    assert_eq!(view.displayed_text(), "offline draft");
    assert!(controller.model().pending_message().is_none());
    assert_eq!(view.redraw_count(), 1);
}

#[test]
fn unregistered_view_should_stop_receiving_updates() {
    let transport = Arc::new(MockTransport::new());
    transport.push_reply(MockReply::json(200, &json!({"messages": "later"})));
    let (mut controller, view) = session(transport);

    controller.unregister_view();
    assert!(controller.send_get_request().wait_timeout(WAIT));

    assert!(view.displayed_text().is_empty());
    assert_eq!(controller.model().output_text().as_deref(), Some("later"));
}

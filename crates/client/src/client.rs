// Browser client - owns the socket, the session and the canvas
//
// Socket callbacks never touch this struct; they only push `SessionEvent`s
// into the shared queue. The frame loop and the input ticker drain it, so
// every event is applied in receipt order from one place.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebSocket};

use crate::config::ClientConfig;
use crate::network::{endpoint_url, Connection, ReconnectTicket, Reconnector, Transport};
use crate::render::{self, CanvasSurface, FpsCounter, RenderOptions};
use crate::session::{Session, SessionEvent};
use crate::ui::UI;
use crate::utils;
use crate::view::ViewMode;

pub type EventQueue = Rc<RefCell<VecDeque<SessionEvent>>>;

/// Result of a reconnect timer firing.
pub enum ReconnectOutcome {
    /// New socket opened; its handlers still need attaching.
    Connected(WebSocket),
    /// The ticket was no longer pending.
    Stale,
    /// Opening failed outright; try again after the delay.
    Retry(ReconnectTicket),
}

pub struct CurveClient {
    connection: Connection,
    reconnect: Reconnector,
    session: Session,
    surface: CanvasSurface,
    ui: UI,
    events: EventQueue,
    fps: FpsCounter,
    options: RenderOptions,
    input_tick_ms: u32,
}

impl CurveClient {
    pub fn new(canvas_id: &str, config: ClientConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(config.field_width.max(1.0) as u32);
        canvas.set_height(config.field_height.max(1.0) as u32);
        let surface = CanvasSurface::new(canvas)?;

        let location = window.location();
        let url = endpoint_url(
            config.server_url.as_deref(),
            &location.protocol()?,
            &location.host()?,
            &config.ws_path,
        );
        let connection = Connection::open(&url)?;

        let ui = UI::new(document);
        if let Some(name) = &config.player_name {
            ui.prefill_name(name);
        }

        Ok(Self {
            connection,
            reconnect: Reconnector::new(config.reconnect_delay_ms),
            session: Session::new(config.player_name.clone()),
            surface,
            ui,
            events: Rc::new(RefCell::new(VecDeque::new())),
            fps: FpsCounter::new(),
            options: RenderOptions {
                field: Vec2::new(config.field_width, config.field_height),
                show_grid: config.show_grid,
            },
            input_tick_ms: config.input_tick_ms,
        })
    }

    pub fn events(&self) -> EventQueue {
        self.events.clone()
    }

    pub fn websocket(&self) -> WebSocket {
        self.connection.websocket().clone()
    }

    pub fn input_tick_ms(&self) -> u32 {
        self.input_tick_ms
    }

    /// Apply everything the socket queued since the last call.
    pub fn pump(&mut self) -> Option<ReconnectTicket> {
        let mut queue = self.events.borrow_mut();
        pump_events(&mut queue, &mut self.session, &mut self.reconnect, &self.connection)
    }

    /// Animation frame: drain events, then paint.
    pub fn frame(&mut self) -> Option<ReconnectTicket> {
        let ticket = self.pump();
        let fps = self.fps.tick(utils::now());
        render::draw_frame(&mut self.surface, &self.session, &self.options, fps);
        self.ui
            .update_status(self.session.view().is_connected(), self.session.view().mode());
        ticket
    }

    /// Input tick: drain events, then resend the steering intent.
    pub fn tick(&mut self) -> Option<ReconnectTicket> {
        let ticket = self.pump();
        self.session.tick_input(&self.connection);
        ticket
    }

    /// Reconnect timer elapsed.
    pub fn reconnect(&mut self, ticket: ReconnectTicket) -> ReconnectOutcome {
        if !self.reconnect.fire(ticket) {
            return ReconnectOutcome::Stale;
        }
        match self.connection.reconnect() {
            Ok(ws) => ReconnectOutcome::Connected(ws),
            Err(e) => {
                tracing::warn!(error = ?e, "reconnect failed");
                match self.reconnect.schedule() {
                    Some(ticket) => ReconnectOutcome::Retry(ticket),
                    None => ReconnectOutcome::Stale,
                }
            }
        }
    }

    pub fn set_name(&mut self, name: &str) -> bool {
        self.session.set_name(name, &self.connection)
    }

    pub fn create_lobby(&mut self) -> bool {
        self.session.create_lobby(&self.connection)
    }

    pub fn join_lobby(&mut self, lobby_id: &str) -> bool {
        self.session.join_lobby(lobby_id, &self.connection)
    }

    pub fn toggle_ready(&mut self) -> bool {
        self.session.toggle_ready(&self.connection)
    }

    pub fn key_down(&mut self, key: &str, repeat: bool) {
        self.session.key_down(key, repeat, &self.connection);
    }

    pub fn key_up(&mut self, key: &str) {
        self.session.key_up(key);
    }

    pub fn view_mode(&self) -> ViewMode {
        self.session.view().mode()
    }

    pub fn is_connected(&self) -> bool {
        self.session.view().is_connected()
    }
}

/// Drain `queue` into the session, keeping the reconnect policy in step with
/// open and close notifications. Returns a ticket when a reconnect needs
/// scheduling.
pub fn pump_events(
    queue: &mut VecDeque<SessionEvent>,
    session: &mut Session,
    reconnect: &mut Reconnector,
    transport: &dyn Transport,
) -> Option<ReconnectTicket> {
    let mut ticket = None;
    while let Some(event) = queue.pop_front() {
        match &event {
            SessionEvent::Opened => reconnect.opened(),
            SessionEvent::Closed { .. } => {
                if let Some(t) = reconnect.schedule() {
                    ticket = Some(t);
                }
            }
            _ => {}
        }
        session.dispatch(event, transport);
    }
    ticket
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ConnectionState;
    use crate::testing::RecordingTransport;
    use protocol::ClientMessage;

    fn closed_event() -> SessionEvent {
        SessionEvent::Closed {
            code: 1006,
            reason: String::new(),
        }
    }

    #[test]
    fn test_events_apply_in_order() {
        let transport = RecordingTransport::open();
        let mut session = Session::new(None);
        let mut reconnect = Reconnector::new(1000);
        let mut queue = VecDeque::from(vec![
            SessionEvent::Opened,
            SessionEvent::Frame(r#"{"type":"lobby_list","lobbies":[{"lobbyId":"a"}]}"#.into()),
        ]);

        assert_eq!(pump_events(&mut queue, &mut session, &mut reconnect, &transport), None);
        assert!(queue.is_empty());
        assert_eq!(session.view().mode(), ViewMode::LobbyList);
        assert_eq!(transport.take(), vec![ClientMessage::GetLobbies]);
    }

    #[test]
    fn test_close_then_error_schedules_one_reconnect() {
        let transport = RecordingTransport::open();
        let mut session = Session::new(None);
        let mut reconnect = Reconnector::new(250);
        let mut queue = VecDeque::from(vec![SessionEvent::Opened]);
        pump_events(&mut queue, &mut session, &mut reconnect, &transport);

        transport.set_state(ConnectionState::Closed);
        queue.extend([SessionEvent::Errored("reset".into()), closed_event(), closed_event()]);
        let ticket = pump_events(&mut queue, &mut session, &mut reconnect, &transport).unwrap();
        assert_eq!(ticket.delay_ms, 250);
        assert!(!session.view().is_connected());

        queue.push_back(closed_event());
        assert_eq!(pump_events(&mut queue, &mut session, &mut reconnect, &transport), None);

        // Reopened before the timer fired: the ticket is stale.
        transport.set_state(ConnectionState::Open);
        queue.push_back(SessionEvent::Opened);
        pump_events(&mut queue, &mut session, &mut reconnect, &transport);
        assert!(!reconnect.fire(ticket));
        assert!(session.view().is_connected());
    }
}

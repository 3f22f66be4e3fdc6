// WASM client entry point for native-curve
// Browser front end for the curve lobby server: lobby browsing, ready-up and
// the live round, all over one JSON WebSocket.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{window, CloseEvent, HtmlInputElement, KeyboardEvent, MessageEvent, WebSocket};

// Module structure - each module handles a specific concern
mod camera;   // Field-to-canvas viewport
mod client;   // Browser glue: socket, event queue, frame/tick
mod config;   // Options object from JS
mod error;    // Transport errors
mod game;     // Latest game_state snapshot
mod input;    // Key mapping, steering intent
mod lobby;    // Lobby registry
mod network;  // WebSocket connection, Transport seam, reconnect policy
mod render;   // Surface trait, canvas backend, frame drawing
mod session;  // Session context and message router
mod ui;       // DOM status badge and name field
mod utils;    // Browser helpers
mod view;     // Active view state machine

#[cfg(test)]
mod testing;

pub use client::{CurveClient, EventQueue, ReconnectOutcome};
pub use config::ClientConfig;
pub use error::TransportError;
pub use game::GameSnapshot;
pub use input::{InputController, KeyAction};
pub use lobby::{LobbyRegistry, LobbySummary};
pub use network::{endpoint_url, ConnectionState, ReconnectTicket, Reconnector, Transport};
pub use session::{Identity, Session, SessionEvent};
pub use view::{PendingJoin, ViewMode, ViewState};

/// Panic hook and log forwarding to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = tracing_wasm::try_set_as_global_default();
}

/// Handle returned to JavaScript, exported as `CurveClient`.
#[wasm_bindgen(js_name = CurveClient)]
pub struct CurveClientWrapper {
    client: Rc<RefCell<CurveClient>>,
}

#[wasm_bindgen(js_class = CurveClient)]
impl CurveClientWrapper {
    /// `new CurveClient("gameCanvas", { reconnectDelayMs: 500 })`; options may be omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, options: JsValue) -> Result<CurveClientWrapper, JsValue> {
        init();

        let config = ClientConfig::from_js(options)?;
        let client = CurveClient::new(canvas_id, config)?;
        let client_rc = Rc::new(RefCell::new(client));

        {
            let client = client_rc.borrow();
            attach_websocket_handlers(client.events(), &client.websocket());
        }
        setup_animation_loop(client_rc.clone())?;
        setup_input_ticker(client_rc.clone())?;
        setup_input_handlers(client_rc.clone())?;
        setup_menu_handlers(client_rc.clone())?;

        Ok(CurveClientWrapper { client: client_rc })
    }

    /// Remember the display name and announce it when connected.
    pub fn set_name(&self, name: &str) -> bool {
        self.client.borrow_mut().set_name(name)
    }

    pub fn create_lobby(&self) -> bool {
        self.client.borrow_mut().create_lobby()
    }

    pub fn join_lobby(&self, lobby_id: &str) -> bool {
        self.client.borrow_mut().join_lobby(lobby_id)
    }

    pub fn toggle_ready(&self) -> bool {
        self.client.borrow_mut().toggle_ready()
    }

    /// One of `menu`, `lobby-list`, `lobby`, `game`.
    pub fn view_mode(&self) -> String {
        self.client.borrow().view_mode().as_str().to_string()
    }

    pub fn is_connected(&self) -> bool {
        self.client.borrow().is_connected()
    }
}

/// Route socket callbacks into the event queue. Nothing here borrows the client.
fn attach_websocket_handlers(queue: EventQueue, ws: &WebSocket) {
    let open_queue = queue.clone();
    let onopen = Closure::wrap(Box::new(move |_event: JsValue| {
        open_queue.borrow_mut().push_back(SessionEvent::Opened);
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let message_queue = queue.clone();
    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        match event.data().as_string() {
            Some(text) => message_queue.borrow_mut().push_back(SessionEvent::Frame(text)),
            None => tracing::debug!("ignoring non-text frame"),
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let error_queue = queue.clone();
    let onerror = Closure::wrap(Box::new(move |e: JsValue| {
        error_queue
            .borrow_mut()
            .push_back(SessionEvent::Errored(format!("{:?}", e)));
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    let onclose = Closure::wrap(Box::new(move |event: CloseEvent| {
        queue.borrow_mut().push_back(SessionEvent::Closed {
            code: event.code(),
            reason: event.reason(),
        });
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();
}

/// Arm the reconnect timer for `ticket`.
fn schedule_reconnect(client: Weak<RefCell<CurveClient>>, ticket: ReconnectTicket) {
    let Some(window) = window() else {
        return;
    };
    let callback = Closure::wrap(Box::new(move || {
        let Some(client_rc) = client.upgrade() else {
            return;
        };
        let outcome = match client_rc.try_borrow_mut() {
            Ok(mut client) => client.reconnect(ticket),
            Err(_) => {
                // Client busy; the ticket is still pending, try again later.
                schedule_reconnect(client.clone(), ticket);
                return;
            }
        };
        match outcome {
            ReconnectOutcome::Connected(ws) => {
                let queue = client_rc.borrow().events();
                attach_websocket_handlers(queue, &ws);
            }
            ReconnectOutcome::Retry(next) => schedule_reconnect(client.clone(), next),
            ReconnectOutcome::Stale => tracing::debug!(attempt = ticket.attempt, "stale reconnect ticket"),
        }
    }) as Box<dyn FnMut()>);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        utils::timer_ms(ticket.delay_ms),
    );
    callback.forget();
}

fn setup_animation_loop(client: Rc<RefCell<CurveClient>>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;

    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    let weak = Rc::downgrade(&client);
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let ticket = match client.try_borrow_mut() {
            Ok(mut client) => client.frame(),
            Err(_) => None,
        };
        if let Some(ticket) = ticket {
            schedule_reconnect(weak.clone(), ticket);
        }

        if let (Some(win), Some(callback)) = (web_sys::window(), f.borrow().as_ref()) {
            win.request_animation_frame(callback.as_ref().unchecked_ref()).ok();
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }

    Ok(())
}

/// Resend the steering intent on a fixed cadence, independent of frame rate.
fn setup_input_ticker(client: Rc<RefCell<CurveClient>>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;
    let interval = utils::timer_ms(client.borrow().input_tick_ms().max(1));

    let weak = Rc::downgrade(&client);
    let closure = Closure::wrap(Box::new(move || {
        let Some(client_rc) = weak.upgrade() else {
            return;
        };
        let ticket = match client_rc.try_borrow_mut() {
            Ok(mut client) => client.tick(),
            Err(_) => None,
        };
        if let Some(ticket) = ticket {
            schedule_reconnect(weak.clone(), ticket);
        }
    }) as Box<dyn FnMut()>);

    window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        interval,
    )?;
    closure.forget();

    Ok(())
}

fn setup_input_handlers(client: Rc<RefCell<CurveClient>>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    // Keydown handler
    {
        let client = client.clone();
        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if utils::is_text_input_focused() {
                return; // Typing a name, not playing
            }
            let key = event.key();
            if KeyAction::from_key(&key).is_none() {
                return;
            }
            if matches!(key.as_str(), "ArrowLeft" | "ArrowRight" | " ") {
                event.prevent_default();
            }
            if let Ok(mut client) = client.try_borrow_mut() {
                client.key_down(&key, event.repeat());
            }
        }) as Box<dyn FnMut(_)>);

        document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyup handler
    {
        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if let Ok(mut client) = client.try_borrow_mut() {
                client.key_up(&event.key());
            }
        }) as Box<dyn FnMut(_)>);

        document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Optional page controls. Each element is looked up by id and skipped when absent.
fn setup_menu_handlers(client: Rc<RefCell<CurveClient>>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    if let Some(el) = document.get_element_by_id(ui::NAME_INPUT_ID) {
        let input = el.dyn_into::<HtmlInputElement>()?;
        let input_clone = input.clone();
        let client = client.clone();
        let closure = Closure::wrap(Box::new(move |_| {
            client.borrow_mut().set_name(&input_clone.value());
        }) as Box<dyn FnMut(JsValue)>);
        input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(button) = document.get_element_by_id("newLobbyButton") {
        let client = client.clone();
        let closure = Closure::wrap(Box::new(move |_| {
            client.borrow_mut().create_lobby();
        }) as Box<dyn FnMut(JsValue)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(button) = document.get_element_by_id("readyButton") {
        let closure = Closure::wrap(Box::new(move |_| {
            client.borrow_mut().toggle_ready();
        }) as Box<dyn FnMut(JsValue)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

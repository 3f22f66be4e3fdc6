// DOM side of the page: connection badge and the name field
use std::cell::RefCell;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

use crate::view::ViewMode;

pub const STATUS_ID: &str = "connectionStatus";
pub const NAME_INPUT_ID: &str = "nameInput";

pub struct UI {
    document: Document,
    last_status: RefCell<Option<String>>,
}

impl UI {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            last_status: RefCell::new(None),
        }
    }

    fn get_el(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    /// Refresh the status badge. The DOM is only touched when the text changes.
    pub fn update_status(&self, connected: bool, mode: ViewMode) {
        let text = status_text(connected, mode);
        if self.last_status.borrow().as_deref() == Some(text.as_str()) {
            return;
        }
        if let Some(el) = self.get_el(STATUS_ID) {
            el.set_text_content(Some(&text));
            let class = if connected { "status connected" } else { "status disconnected" };
            el.set_class_name(class);
        }
        *self.last_status.borrow_mut() = Some(text);
    }

    /// Put a remembered name back into the name field.
    pub fn prefill_name(&self, name: &str) {
        if let Some(input) = self.get_el(NAME_INPUT_ID) {
            if let Ok(input) = input.dyn_into::<HtmlInputElement>() {
                input.set_value(name);
            }
        }
    }
}

/// Text shown in the connection badge.
pub fn status_text(connected: bool, mode: ViewMode) -> String {
    if !connected {
        return "Disconnected".to_string();
    }
    let place = match mode {
        ViewMode::Menu => "menu",
        ViewMode::LobbyList => "browsing lobbies",
        ViewMode::Lobby => "in lobby",
        ViewMode::Game => "playing",
    };
    format!("Connected - {}", place)
}

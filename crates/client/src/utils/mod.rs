// Browser helpers

/// High-precision timestamp in milliseconds, or 0 outside a window context.
pub fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// True while a text field has focus, so typing a name does not steer.
pub fn is_text_input_focused() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element())
        .map(|el| el.tag_name().eq_ignore_ascii_case("INPUT"))
        .unwrap_or(false)
}

/// Millisecond delay for `setTimeout`/`setInterval`, saturating at the
/// largest value the timer API takes.
pub fn timer_ms(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

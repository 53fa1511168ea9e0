/// Match a key press with exact modifiers, e.g. `key_event!(CONTROL, 'c')`
#[macro_export]
macro_rules! key_event {
    ($mods:ident, $key:literal) => {
        $crate::key_event!(@build $mods, ::crossterm::event::KeyCode::Char($key))
    };
    ($mods:ident, $key:ident) => {
        $crate::key_event!(@build $mods, ::crossterm::event::KeyCode::$key)
    };
    (@build $mods:ident, $code:pat) => {
        ::crossterm::event::KeyEvent {
            code: $code,
            modifiers: ::crossterm::event::KeyModifiers::$mods,
            kind: ::crossterm::event::KeyEventKind::Press,
            ..
        }
    };
}

/// Unmodified key press
#[macro_export]
macro_rules! key {
    ($key:tt) => {
        $crate::key_event!(NONE, $key)
    };
}

#[macro_export]
macro_rules! ctrl {
    ($key:tt) => {
        $crate::key_event!(CONTROL, $key)
    };
}

#[macro_export]
macro_rules! shift {
    ($key:tt) => {
        $crate::key_event!(SHIFT, $key)
    };
}

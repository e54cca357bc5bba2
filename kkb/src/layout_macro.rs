/// Create a layer in keymap
#[macro_export]
macro_rules! layer {
    ([$([$($x: expr), +]), +]) => {
        [$([$($x), +]),+]
    };
}

/// Create a normal key. For example, `k!(A)` represents `KeyAction::Key(KeyCode::A)`
#[macro_export]
macro_rules! k {
    ($k: ident) => {
        $crate::action::KeyAction::Key($crate::keycode::KeyCode::$k)
    };
}

/// Create a normal action: `KeyAction`
#[macro_export]
macro_rules! a {
    ($a: ident) => {
        $crate::action::KeyAction::$a
    };
}

/// Create a layer activate action. For example, `mo!(StdFn1)` activates `Layer::StdFn1` while held.
#[macro_export]
macro_rules! mo {
    ($x: ident) => {
        $crate::action::KeyAction::LayerOn($crate::layer::Layer::$x)
    };
}

/// Create a layer toggle action
#[macro_export]
macro_rules! tg {
    ($x: ident) => {
        $crate::action::KeyAction::LayerToggle($crate::layer::Layer::$x)
    };
}

/// Create a layer switch action
#[macro_export]
macro_rules! to {
    ($x: ident) => {
        $crate::action::KeyAction::LayerTo($crate::layer::Layer::$x)
    };
}

/// Create a brightness key, `bri!(Increase)` or `bri!(Decrease)`
#[macro_export]
macro_rules! bri {
    ($d: ident) => {
        $crate::action::KeyAction::Brightness($crate::brightness::Direction::$d)
    };
}

/// Create a Windows shortcut key, for example `sc!(Task)`
#[macro_export]
macro_rules! sc {
    ($s: ident) => {
        $crate::action::KeyAction::Shortcut($crate::shortcut::Shortcut::$s)
    };
}

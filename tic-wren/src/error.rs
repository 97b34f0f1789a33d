use thiserror::Error;

use tic_script::InterpretResult;

/// Why a cart failed to load. Each of these leaves the bridge unloaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("can't load Tic wren api")]
    Prelude,
    #[error("cart script failed to interpret ({0:?})")]
    Script(InterpretResult),
    #[error("'{class} class' isn't found :(")]
    MissingClass { class: String },
    #[error("{class}.new() failed")]
    Constructor { class: String },
}

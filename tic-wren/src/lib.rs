//! tic-wren
//!
//! Binds the console's `Tic` API into a Wren-style slot engine.
//!
//! Loading a cart interprets the [`prelude`] declarations, which the engine
//! binds through the [`foreign`] dispatch table, then the cart itself, and
//! finally instantiates the game class ([`lifecycle`]). Every frame the host
//! calls back into the game object; foreign calls it makes land in the
//! [`api`] trampolines, which resolve defaulted arguments and call the
//! [`Console`](tic_core::Console). A `map` call with a remap callable walks
//! the map natively and re-enters the engine once per tile ([`remap`]).

pub mod api;
pub mod config;
pub mod error;
pub mod foreign;
pub mod lifecycle;
pub mod logger;
pub mod machine;
pub mod prelude;
pub mod remap;
pub mod trace;

pub use config::{BridgeConfig, BridgeConfigBuilder, BridgeConfigReader, InputMode, LoggerConfig};
pub use error::LoadError;
pub use foreign::Foreign;
pub use lifecycle::{BridgeState, WrenBridge};
pub use machine::Machine;
pub use prelude::PRELUDE;

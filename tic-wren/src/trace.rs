use std::env;
use std::fmt;
use std::sync::OnceLock;

/// Trace categories, enabled via environment variables.
///
/// Supported:
/// - TIC_TRACE="foreign,remap,lifecycle" (comma/space separated; "all" enables all)
/// - TIC_TRACE_FOREIGN=1, TIC_TRACE_REMAP=1, TIC_TRACE_LIFECYCLE=1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceKind {
    Foreign,
    Remap,
    Lifecycle,
}

const M_FOREIGN: u32 = 1 << 0;
const M_REMAP: u32 = 1 << 1;
const M_LIFECYCLE: u32 = 1 << 2;

impl TraceKind {
    fn mask(self) -> u32 {
        match self {
            TraceKind::Foreign => M_FOREIGN,
            TraceKind::Remap => M_REMAP,
            TraceKind::Lifecycle => M_LIFECYCLE,
        }
    }
}

fn parse_bool_env(name: &str) -> bool {
    match env::var(name) {
        Ok(v) => {
            let s = v.trim().to_ascii_lowercase();
            !(s.is_empty() || s == "0" || s == "false" || s == "no" || s == "off")
        }
        Err(_) => false,
    }
}

fn parse_mask_from_trace_list(s: &str) -> u32 {
    let mut mask = 0u32;
    for raw in s.split(|c: char| c == ',' || c == ';' || c.is_whitespace()) {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => {}
            "all" => mask |= M_FOREIGN | M_REMAP | M_LIFECYCLE,
            "foreign" | "ffi" => mask |= M_FOREIGN,
            "remap" => mask |= M_REMAP,
            "lifecycle" | "life" => mask |= M_LIFECYCLE,
            other => log::warn!("unknown trace category {other:?}"),
        }
    }
    mask
}

fn build_mask() -> u32 {
    let mut mask = 0u32;
    if let Ok(list) = env::var("TIC_TRACE") {
        mask |= parse_mask_from_trace_list(&list);
    }
    if parse_bool_env("TIC_TRACE_FOREIGN") {
        mask |= M_FOREIGN;
    }
    if parse_bool_env("TIC_TRACE_REMAP") {
        mask |= M_REMAP;
    }
    if parse_bool_env("TIC_TRACE_LIFECYCLE") {
        mask |= M_LIFECYCLE;
    }
    mask
}

fn mask() -> u32 {
    static MASK: OnceLock<u32> = OnceLock::new();
    *MASK.get_or_init(build_mask)
}

pub fn enabled(k: TraceKind) -> bool {
    mask() & k.mask() != 0
}

pub fn foreign(args: fmt::Arguments) {
    if enabled(TraceKind::Foreign) {
        log::debug!("{}", args);
    }
}

pub fn remap(args: fmt::Arguments) {
    if enabled(TraceKind::Remap) {
        log::trace!("{}", args);
    }
}

pub fn lifecycle(args: fmt::Arguments) {
    if enabled(TraceKind::Lifecycle) {
        log::info!("{}", args);
    }
}

//! The dispatch table: which `Tic` foreign declarations the console exposes
//! and the trampoline family each one runs.
//!
//! Every accepted arity of an operation is its own signature, and all of them
//! fan into one [`Foreign`] family. The table is built once per process.

use strum::FromRepr;
use tic_script::{ForeignId, SignatureTable};

use crate::config::BridgeConfig;

/// The one class foreign methods may be declared on.
pub const CLASS_NAME: &str = "Tic";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromRepr)]
#[repr(u16)]
pub enum Foreign {
    MapWidth,
    MapHeight,
    SpriteSize,

    Btn,
    Btnp,
    Mouse,

    Print,
    Font,
    Trace,

    Spr,
    Map,
    Mset,
    Mget,
    Mgeti,
    Textri,
    Pix,
    Line,
    Circ,
    Circb,
    Rect,
    Rectb,
    Tri,
    Cls,
    Clip,

    Peek,
    Poke,
    Peek4,
    Poke4,
    Memcpy,
    Memset,
    Pmem,

    Sfx,
    Music,

    Time,
    Sync,
    Exit,
}

impl Foreign {
    pub fn id(self) -> ForeignId {
        ForeignId(self as u16)
    }

    pub fn from_id(id: ForeignId) -> Option<Self> {
        Self::from_repr(id.0)
    }
}

/// Static getters, declared without a parameter list.
const GETTERS: &[(&str, Foreign)] = &[
    ("map_width", Foreign::MapWidth),
    ("map_height", Foreign::MapHeight),
    ("spritesize", Foreign::SpriteSize),
];

/// Static methods and every arity each accepts.
const METHODS: &[(&str, &[usize], Foreign)] = &[
    ("btn", &[0, 1], Foreign::Btn),
    ("btnp", &[0, 1, 3], Foreign::Btnp),
    ("mouse", &[0], Foreign::Mouse),
    ("print__", &[6], Foreign::Print),
    ("font", &[1, 3, 4, 6, 7, 8], Foreign::Font),
    ("trace__", &[2], Foreign::Trace),
    ("spr", &[1, 3, 4, 5, 6, 7, 9], Foreign::Spr),
    ("map", &[0, 2, 4, 6, 7, 8, 9], Foreign::Map),
    ("mset", &[2, 3], Foreign::Mset),
    ("mget", &[2], Foreign::Mget),
    ("mgeti", &[1], Foreign::Mgeti),
    ("textri", &[12, 13, 14], Foreign::Textri),
    ("pix", &[2, 3], Foreign::Pix),
    ("line", &[5], Foreign::Line),
    ("circ", &[4], Foreign::Circ),
    ("circb", &[4], Foreign::Circb),
    ("rect", &[5], Foreign::Rect),
    ("rectb", &[5], Foreign::Rectb),
    ("tri", &[7], Foreign::Tri),
    ("cls", &[0, 1], Foreign::Cls),
    ("clip", &[0, 4], Foreign::Clip),
    ("peek", &[1], Foreign::Peek),
    ("poke", &[2], Foreign::Poke),
    ("peek4", &[1], Foreign::Peek4),
    ("poke4", &[2], Foreign::Poke4),
    ("memcpy", &[3], Foreign::Memcpy),
    ("memset", &[3], Foreign::Memset),
    ("pmem", &[1, 2], Foreign::Pmem),
    ("sfx", &[1, 2, 3, 4, 5, 6], Foreign::Sfx),
    ("music", &[0, 1, 2, 3, 4], Foreign::Music),
    ("time", &[0], Foreign::Time),
    ("sync", &[0], Foreign::Sync),
    ("exit", &[0], Foreign::Exit),
];

/// `name(_,_)` for `arity` 2.
pub fn method_signature(name: &str, arity: usize) -> String {
    format!("{name}({})", vec!["_"; arity].join(","))
}

/// Every exposed signature (without the `static Tic.` prefix) and its family.
pub fn declarations() -> impl Iterator<Item = (String, Foreign)> {
    let getters = GETTERS.iter().map(|(name, f)| (name.to_string(), *f));
    let methods = METHODS
        .iter()
        .flat_map(|(name, arities, f)| arities.iter().map(move |a| (method_signature(name, *a), *f)));
    getters.chain(methods)
}

lazy_static::lazy_static! {
    static ref SIGNATURES: SignatureTable<Foreign> = declarations()
        .map(|(sig, f)| (SignatureTable::<Foreign>::compose(true, CLASS_NAME, &sig), f))
        .collect();
}

pub fn lookup(is_static: bool, class_name: &str, signature: &str) -> Option<Foreign> {
    SIGNATURES.lookup(is_static, class_name, signature)
}

/// Binding hook: resolves a declaration, honoring only the configured module.
pub fn bind(
    config: &BridgeConfig,
    module: &str,
    class_name: &str,
    is_static: bool,
    signature: &str,
) -> Option<ForeignId> {
    if module != config.module() {
        log::debug!("foreign {class_name}.{signature} declared in module {module:?} is not bound");
        return None;
    }
    let found = lookup(is_static, class_name, signature);
    if found.is_none() {
        log::warn!("unknown foreign method {class_name}.{signature}");
    }
    found.map(Foreign::id)
}

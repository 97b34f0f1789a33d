use std::collections::HashMap;

/// Exact-match table from fully qualified foreign signatures to a token.
///
/// Keys are composed as `[static ]Class.name(_,_)`; there is no prefix or
/// arity-insensitive lookup.
pub struct SignatureTable<T: Copy> {
    entries: HashMap<String, T>,
}

impl<T: Copy> Default for SignatureTable<T> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<T: Copy> SignatureTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(is_static: bool, class_name: &str, signature: &str) -> String {
        if is_static {
            format!("static {class_name}.{signature}")
        } else {
            format!("{class_name}.{signature}")
        }
    }

    /// Registers `full` (an already composed key). A duplicate key replaces
    /// the earlier entry and is logged.
    pub fn register(&mut self, full: impl Into<String>, value: T) {
        let full = full.into();
        if self.entries.insert(full.clone(), value).is_some() {
            log::warn!("foreign signature registered twice: {full}");
        }
    }

    pub fn resolve(&self, full: &str) -> Option<T> {
        self.entries.get(full).copied()
    }

    pub fn lookup(&self, is_static: bool, class_name: &str, signature: &str) -> Option<T> {
        self.resolve(&Self::compose(is_static, class_name, signature))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<T: Copy, S: Into<String>> FromIterator<(S, T)> for SignatureTable<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (full, value) in iter {
            table.register(full, value);
        }
        table
    }
}

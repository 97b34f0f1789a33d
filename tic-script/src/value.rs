/// A marshaled script value.
///
/// `Absent` is not a script value: it stands for a position the caller did
/// not supply, so a trampoline can tell "not passed" from "passed null".
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Absent,
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    List(Vec<Value>),
    /// Any engine object the bridge does not look into (instances, closures, maps).
    Other,
}

impl Value {
    /// Script truthiness: only `false` and `null` are false.
    pub fn truthy(&self) -> bool {
        !matches!(self, Value::Absent | Value::Null | Value::Bool(false))
    }

    /// Numbers truncate toward zero, saturating at the `i32` range; everything
    /// else reads as 0.
    pub fn as_int(&self) -> i32 {
        match self {
            Value::Num(v) => *v as i32,
            _ => 0,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Num(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Num(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

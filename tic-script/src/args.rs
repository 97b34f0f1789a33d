//! Argument marshaling for one foreign call.
//!
//! Slot 0 holds the receiver and, on return, the result. Arguments start at
//! slot 1, so "the caller supplied `k` arguments" reads as `top() > k`.
//! Readers never fail: a position that is missing or holds the wrong type
//! yields the documented fallback for that reader.

use arrayvec::ArrayVec;

use crate::value::Value;
use crate::vm::{ScriptVm, SlotType};

pub struct ArgumentFrame<'v, V: ScriptVm> {
    vm: &'v mut V,
    top: usize,
}

impl<'v, V: ScriptVm> ArgumentFrame<'v, V> {
    /// Captures the slot count once; later scratch slots do not change it.
    pub fn new(vm: &'v mut V) -> Self {
        let top = vm.slot_count();
        Self { vm, top }
    }

    /// Slot count at entry, receiver included.
    #[inline]
    pub fn top(&self) -> usize {
        self.top
    }

    /// Number of supplied arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.top.saturating_sub(1)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn vm(&mut self) -> &mut V {
        self.vm
    }

    pub fn into_vm(self) -> &'v mut V {
        self.vm
    }

    fn slot_type(&self, slot: usize) -> Option<SlotType> {
        (slot < self.top).then(|| self.vm.slot_type(slot))
    }

    pub fn is_null(&self, slot: usize) -> bool {
        self.slot_type(slot) == Some(SlotType::Null)
    }

    pub fn is_bool(&self, slot: usize) -> bool {
        self.slot_type(slot) == Some(SlotType::Bool)
    }

    pub fn is_num(&self, slot: usize) -> bool {
        self.slot_type(slot) == Some(SlotType::Num)
    }

    pub fn is_string(&self, slot: usize) -> bool {
        self.slot_type(slot) == Some(SlotType::String)
    }

    pub fn is_list(&self, slot: usize) -> bool {
        self.slot_type(slot) == Some(SlotType::List)
    }

    /// Shallow view of `slot` for the scalar readers. Strings, lists and
    /// objects are not copied and all read as [`Value::Other`].
    fn scalar(&self, slot: usize) -> Value {
        match self.slot_type(slot) {
            None => Value::Absent,
            Some(SlotType::Null) => Value::Null,
            Some(SlotType::Bool) => Value::Bool(self.vm.slot_bool(slot)),
            Some(SlotType::Num) => Value::Num(self.vm.slot_double(slot)),
            Some(_) => Value::Other,
        }
    }

    /// Truncates toward zero; anything but a number reads as 0.
    pub fn int(&self, slot: usize) -> i32 {
        self.scalar(slot).as_int()
    }

    pub fn num(&self, slot: usize) -> f64 {
        self.scalar(slot).as_num().unwrap_or(0.0)
    }

    /// Script truthiness.
    pub fn bool(&self, slot: usize) -> bool {
        self.scalar(slot).truthy()
    }

    /// Only an actual string is returned; nothing is stringified here.
    pub fn string(&self, slot: usize) -> Option<&str> {
        if self.is_string(slot) {
            Some(self.vm.slot_string(slot))
        } else {
            None
        }
    }

    /// Reads a full tagged value, copying list elements through scratch slots
    /// above `top` so the argument slots stay untouched.
    pub fn value(&mut self, slot: usize) -> Value {
        if slot >= self.top {
            return Value::Absent;
        }
        self.read_slot(slot, self.top)
    }

    fn read_slot(&mut self, slot: usize, scratch: usize) -> Value {
        match self.vm.slot_type(slot) {
            SlotType::Null => Value::Null,
            SlotType::Bool => Value::Bool(self.vm.slot_bool(slot)),
            SlotType::Num => Value::Num(self.vm.slot_double(slot)),
            SlotType::String => Value::Str(self.vm.slot_string(slot).to_owned()),
            SlotType::List => {
                self.vm.ensure_slots(scratch + 1);
                let count = self.vm.list_count(slot);
                let mut items = Vec::with_capacity(count);
                for i in 0..count {
                    self.vm.list_element(slot, i, scratch);
                    items.push(self.read_slot(scratch, scratch + 1));
                }
                Value::List(items)
            }
            SlotType::Foreign | SlotType::Map | SlotType::Unknown => Value::Other,
        }
    }

    /// Reads up to `N` small integers.
    ///
    /// A list contributes its leading numeric elements. Any other supplied
    /// value is read as a single number, so a mistyped one becomes `[0]`. An
    /// absent position is empty.
    pub fn bytes<const N: usize>(&mut self, slot: usize) -> ArrayVec<u8, N> {
        let mut out = ArrayVec::new();
        if slot >= self.top || N == 0 {
            return out;
        }
        if !self.is_list(slot) {
            out.push(self.int(slot) as u8);
        } else {
            let scratch = self.top;
            self.vm.ensure_slots(scratch + 1);
            let count = self.vm.list_count(slot).min(N);
            for i in 0..count {
                self.vm.list_element(slot, i, scratch);
                if self.vm.slot_type(scratch) != SlotType::Num {
                    break;
                }
                out.push(self.vm.slot_double(scratch) as i32 as u8);
            }
        }
        out
    }

    pub fn ret_null(&mut self) {
        self.vm.set_slot_null(0);
    }

    pub fn ret_bool(&mut self, value: bool) {
        self.vm.set_slot_bool(0, value);
    }

    pub fn ret_num(&mut self, value: impl Into<f64>) {
        self.vm.set_slot_double(0, value.into());
    }

    pub fn ret_string(&mut self, text: &str) {
        self.vm.set_slot_string(0, text);
    }

    pub fn ret_list(&mut self, items: &[Value]) {
        self.write_slot(0, &Value::List(items.to_vec()), self.top);
    }

    fn write_slot(&mut self, slot: usize, value: &Value, scratch: usize) {
        match value {
            Value::Absent | Value::Null | Value::Other => self.vm.set_slot_null(slot),
            Value::Bool(b) => self.vm.set_slot_bool(slot, *b),
            Value::Num(v) => self.vm.set_slot_double(slot, *v),
            Value::Str(s) => self.vm.set_slot_string(slot, s),
            Value::List(items) => {
                self.vm.ensure_slots(scratch + 1);
                self.vm.set_slot_new_list(slot);
                for item in items {
                    self.write_slot(scratch, item, scratch + 1);
                    self.vm.insert_in_list(slot, -1, scratch);
                }
            }
        }
    }
}

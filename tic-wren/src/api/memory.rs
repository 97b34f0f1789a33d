//! Raw RAM access. Out-of-range addresses are ignored: writes do nothing and
//! reads answer `null`.

use anyhow::Result;
use tic_script::{ArgumentFrame, ScriptVm};

use crate::machine::Machine;

pub fn peek<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    match m.console.ram().peek(args.int(1)) {
        Some(value) => args.ret_num(value),
        None => args.ret_null(),
    }
    Ok(())
}

pub fn poke<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let address = args.int(1);
    let value = (args.int(2) & 0xff) as u8;
    m.console.ram_mut().poke(address, value);
    Ok(())
}

/// Nibble addressing: address `n` is the low (even `n`) or high half of byte `n / 2`.
pub fn peek4<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    match m.console.ram().peek4(args.int(1)) {
        Some(value) => args.ret_num(value),
        None => args.ret_null(),
    }
    Ok(())
}

pub fn poke4<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let address = args.int(1);
    let value = args.int(2) as u8;
    m.console.ram_mut().poke4(address, value);
    Ok(())
}

/// `memcpy(dest, src, size)`; the whole block must fit, or nothing is copied.
pub fn memcpy<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let (dest, src, size) = (args.int(1), args.int(2), args.int(3));
    if !m.console.ram_mut().memcpy(dest, src, size) {
        log::trace!("memcpy({dest}, {src}, {size}) out of bounds");
    }
    Ok(())
}

pub fn memset<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let (dest, value, size) = (args.int(1), args.int(2) as u8, args.int(3));
    if !m.console.ram_mut().memset(dest, value, size) {
        log::trace!("memset({dest}, {value}, {size}) out of bounds");
    }
    Ok(())
}

/// `pmem(index)` reads a persistent slot, `pmem(index, value)` replaces it.
/// Both answer the value held before the call.
pub fn pmem<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let index = args.int(1) as u32;
    let previous = if args.top() > 2 {
        m.console.ram_mut().set_pmem(index, args.int(2))
    } else {
        m.console.ram().pmem(index)
    };
    args.ret_num(previous);
    Ok(())
}

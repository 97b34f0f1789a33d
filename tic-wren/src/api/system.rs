use anyhow::Result;
use tic_script::{ArgumentFrame, ScriptVm};

use crate::machine::Machine;

pub fn time<V: ScriptVm>(m: &mut Machine<'_>, args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    let now = m.console.time();
    args.ret_num(now);
    Ok(())
}

pub fn sync<V: ScriptVm>(m: &mut Machine<'_>, _args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    m.console.sync();
    Ok(())
}

pub fn exit<V: ScriptVm>(m: &mut Machine<'_>, _args: &mut ArgumentFrame<'_, V>) -> Result<()> {
    m.sink.exit();
    Ok(())
}

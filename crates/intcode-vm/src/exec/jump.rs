//! Control flow: Jnz, Jz, SetBase

use super::read;
use crate::error::{VmError, VmResult};
use crate::instruction::Instruction;
use crate::vm::VmState;

#[inline]
pub fn exec_jnz(state: &mut VmState, inst: &Instruction) -> VmResult<()> {
    let taken = read(state, inst.arg(0))? != 0;
    branch(state, inst, taken)
}

#[inline]
pub fn exec_jz(state: &mut VmState, inst: &Instruction) -> VmResult<()> {
    let taken = read(state, inst.arg(0))? == 0;
    branch(state, inst, taken)
}

#[inline]
pub fn exec_set_base(state: &mut VmState, inst: &Instruction) -> VmResult<()> {
    let delta = read(state, inst.arg(0))?;
    state.relative_base = state
        .relative_base
        .checked_add(delta)
        .ok_or(VmError::Overflow { ip: state.ip })?;
    Ok(())
}

fn branch(state: &mut VmState, inst: &Instruction, taken: bool) -> VmResult<()> {
    if !taken {
        state.ip += inst.width();
        return Ok(());
    }
    let target = read(state, inst.arg(1))?;
    state.ip = usize::try_from(target).map_err(|_| VmError::OutOfBoundsFetch {
        addr: target,
        len: state.memory.len(),
    })?;
    Ok(())
}

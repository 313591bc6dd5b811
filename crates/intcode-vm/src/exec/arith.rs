//! Arithmetic and comparison: Add, Mul, SetLt, SetEq

use super::{read, write};
use crate::error::{VmError, VmResult};
use crate::instruction::Instruction;
use crate::vm::VmState;

#[inline]
pub fn exec_add(state: &mut VmState, inst: &Instruction) -> VmResult<()> {
    let (a, b) = operands(state, inst)?;
    let val = a.checked_add(b).ok_or(VmError::Overflow { ip: state.ip })?;
    write(state, inst.arg(2), val)
}

#[inline]
pub fn exec_mul(state: &mut VmState, inst: &Instruction) -> VmResult<()> {
    let (a, b) = operands(state, inst)?;
    let val = a.checked_mul(b).ok_or(VmError::Overflow { ip: state.ip })?;
    write(state, inst.arg(2), val)
}

#[inline]
pub fn exec_set_lt(state: &mut VmState, inst: &Instruction) -> VmResult<()> {
    let (a, b) = operands(state, inst)?;
    write(state, inst.arg(2), (a < b) as i64)
}

#[inline]
pub fn exec_set_eq(state: &mut VmState, inst: &Instruction) -> VmResult<()> {
    let (a, b) = operands(state, inst)?;
    write(state, inst.arg(2), (a == b) as i64)
}

fn operands(state: &mut VmState, inst: &Instruction) -> VmResult<(i64, i64)> {
    Ok((read(state, inst.arg(0))?, read(state, inst.arg(1))?))
}

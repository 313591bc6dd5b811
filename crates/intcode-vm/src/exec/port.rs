//! I/O: In, Out

use super::{read, write};
use crate::error::VmResult;
use crate::instruction::Instruction;
use crate::io::Ports;
use crate::vm::VmState;

#[inline]
pub fn exec_in(state: &mut VmState, inst: &Instruction, ports: &mut Ports<'_, '_, '_>) -> VmResult<()> {
    let val = ports.read(state.ip)?;
    write(state, inst.arg(0), val)
}

#[inline]
pub fn exec_out(state: &mut VmState, inst: &Instruction, ports: &mut Ports<'_, '_, '_>) -> VmResult<()> {
    let val = read(state, inst.arg(0))?;
    ports.write(val)
}

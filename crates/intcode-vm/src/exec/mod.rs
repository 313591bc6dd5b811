//! Executor: opcode dispatch and operand resolution.

mod arith;
mod jump;
mod port;

use crate::error::{VmError, VmResult};
use crate::instruction::{Arg, Instruction, Mode, Opcode};
use crate::io::Ports;
use crate::vm::VmState;

/// Applies the effect of `inst`. The caller advances `ip` for non-jumps.
pub fn execute(state: &mut VmState, inst: &Instruction, ports: &mut Ports<'_, '_, '_>) -> VmResult<()> {
    match inst.opcode {
        Opcode::Add => arith::exec_add(state, inst),
        Opcode::Mul => arith::exec_mul(state, inst),
        Opcode::In => port::exec_in(state, inst, ports),
        Opcode::Out => port::exec_out(state, inst, ports),
        Opcode::Jnz => jump::exec_jnz(state, inst),
        Opcode::Jz => jump::exec_jz(state, inst),
        Opcode::SetLt => arith::exec_set_lt(state, inst),
        Opcode::SetEq => arith::exec_set_eq(state, inst),
        Opcode::SetBase => jump::exec_set_base(state, inst),
        Opcode::Halt => Ok(()),
    }
}

// =============================================================================
// Operand resolution
// =============================================================================

/// Memory address named by a non-immediate argument.
fn address(state: &VmState, arg: Arg) -> VmResult<usize> {
    let ip = state.ip;
    let addr = match arg.mode {
        Mode::Immediate => return Err(VmError::IllegalWriteTarget { ip, value: arg.value }),
        Mode::Indirect => arg.value,
        Mode::Relative => state
            .relative_base
            .checked_add(arg.value)
            .ok_or(VmError::Overflow { ip })?,
    };
    usize::try_from(addr).map_err(|_| VmError::NegativeAddress { ip, addr })
}

#[inline]
pub(crate) fn read(state: &mut VmState, arg: Arg) -> VmResult<i64> {
    if arg.mode == Mode::Immediate {
        return Ok(arg.value);
    }
    let addr = address(state, arg)?;
    state.memory.load(addr)
}

#[inline]
pub(crate) fn write(state: &mut VmState, arg: Arg, val: i64) -> VmResult<()> {
    let addr = address(state, arg)?;
    state.memory.store(addr, val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Memory;

    fn state(words: &[i64]) -> VmState {
        VmState::new(Memory::new(words))
    }

    #[test]
    fn test_read_modes() {
        let mut st = state(&[10, 20, 30]);
        st.relative_base = 1;
        assert_eq!(read(&mut st, Arg::new(Mode::Immediate, 7)).unwrap(), 7);
        assert_eq!(read(&mut st, Arg::new(Mode::Indirect, 2)).unwrap(), 30);
        assert_eq!(read(&mut st, Arg::new(Mode::Relative, -1)).unwrap(), 10);
    }

    #[test]
    fn test_read_grows_memory() {
        let mut st = state(&[1]);
        assert_eq!(read(&mut st, Arg::new(Mode::Indirect, 4)).unwrap(), 0);
        assert_eq!(st.memory.as_slice(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_negative_address() {
        let mut st = state(&[1]);
        assert!(matches!(
            read(&mut st, Arg::new(Mode::Indirect, -1)),
            Err(VmError::NegativeAddress { addr: -1, .. })
        ));
        st.relative_base = 2;
        assert!(matches!(
            write(&mut st, Arg::new(Mode::Relative, -3), 5),
            Err(VmError::NegativeAddress { addr: -1, .. })
        ));
    }

    #[test]
    fn test_immediate_write_rejected() {
        let mut st = state(&[1]);
        assert!(matches!(
            write(&mut st, Arg::new(Mode::Immediate, 0), 5),
            Err(VmError::IllegalWriteTarget { value: 0, .. })
        ));
        assert_eq!(st.memory.as_slice(), &[1]);
    }

    #[test]
    fn test_relative_write() {
        let mut st = state(&[0, 0, 0]);
        st.relative_base = 5;
        write(&mut st, Arg::new(Mode::Relative, -3), 9).unwrap();
        assert_eq!(st.memory.as_slice(), &[0, 0, 9]);
    }
}

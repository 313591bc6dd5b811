//! VM errors.

use thiserror::Error;

pub type VmResult<T> = Result<T, VmError>;

/// Every variant is fatal: the run that raised it stops immediately.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("invalid opcode: {} ({word}) at {ip}", .word.rem_euclid(100))]
    InvalidOpcode { ip: usize, word: i64 },

    #[error("invalid addressing mode {mode} in {word} at {ip}")]
    InvalidAddressingMode { ip: usize, word: i64, mode: i64 },

    #[error("fetch {addr} beyond [0, {len})")]
    OutOfBoundsFetch { addr: i64, len: usize },

    #[error("negative address {addr} at {ip}")]
    NegativeAddress { ip: usize, addr: i64 },

    #[error("invalid write target #{value} at {ip}")]
    IllegalWriteTarget { ip: usize, value: i64 },

    #[error("read past provided input at {ip}")]
    InputExhausted { ip: usize },

    #[error("malformed program source: token {index} `{token}` is not an integer")]
    MalformedProgram { index: usize, token: String },

    #[error("integer overflow at {ip}")]
    Overflow { ip: usize },

    #[error("cannot grow memory to address {addr}")]
    MemoryExhausted { addr: usize },

    #[error("not an integer: `{0}`")]
    BadTerminalInput(String),

    #[error("peripheral error: {0}")]
    Peripheral(String),

    #[error("line {line}: {message}")]
    Assembly { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

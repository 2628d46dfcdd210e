use thiserror::Error;

/// Fatal machine faults.
///
/// On a fault the core logs a full state dump, hands the matching exit
/// code to [`Context::close`](crate::Context::close) and bubbles the
/// fault up through [`step`](crate::Plum8::step) and
/// [`execute`](crate::Plum8::execute). The core never terminates the
/// process itself, shutdown belongs to the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// `execute` or `step` was called before `initialize`.
    #[error("emulator not initialized, call initialize() first")]
    Uninitialized,
    /// CALL with the return stack already at capacity.
    #[error("stack overflow, maximum stack size reached")]
    StackOverflow,
    /// RETURN with nothing on the return stack.
    #[error("illegal return, the call stack is empty")]
    StackUnderflow,
    /// Any failure inside an opcode handler, e.g. a memory access past
    /// the 4096 byte address space.
    #[error("exception while executing an opcode")]
    Dispatch,
    /// An opcode fetch or load crossed the end of memory.
    #[error("memory access out of bounds")]
    Memory,
}

impl Fault {
    /// The exit code reported through `Context::close` for this fault.
    /// Codes are distinct per cause and part of the crate's contract.
    pub fn exit_code(self) -> i32 {
        match self {
            Fault::StackOverflow => -2,
            Fault::StackUnderflow => -3,
            Fault::Dispatch => -4,
            Fault::Uninitialized => -5,
            Fault::Memory => -6,
        }
    }
}

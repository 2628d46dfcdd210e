//! The machine core: memory, registers, call stack and the fetch,
//! decode, execute loop.

use log::{error, info, trace, warn};
use rand::{rngs::ThreadRng, Rng};

use crate::context::Context;
use crate::error::Fault;
use crate::font;
use crate::frame::Frame;
use crate::opcode::OpCode;
use crate::timer::DelayTimer;

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const DEFAULT_STACK_DEPTH: usize = 32;

/// A CHIP-8 virtual machine.
///
/// The type parameters are the host [`Context`] and the call stack
/// capacity, which defaults to [`DEFAULT_STACK_DEPTH`] frames. The machine
/// does nothing on its own: the host calls [`Plum8::step`] to execute one
/// instruction, [`Plum8::tick_timer`] to account for wall-clock time and
/// [`Plum8::set_key_state`] to mirror the keyboard.
///
/// A fatal condition surfaces as a [`Fault`]: the machine logs a state
/// dump, reports the fault's exit code through [`Context::close`] and
/// returns the fault to the caller. It never terminates the process
/// itself.
pub struct Plum8<C: Context, const STACK: usize = DEFAULT_STACK_DEPTH> {
    ctx: C,
    memory: [u8; MEMORY_SIZE],
    v: [u8; 16],
    i: u16,
    pc: u16,
    pc_increment: u16,
    stack: heapless::Vec<u16, STACK>,
    frame: Frame,
    delay: DelayTimer,
    keys: [bool; 16],
    rng: ThreadRng,
    paused: bool,
    pending_key: Option<usize>,
    ready: bool,
    halted: bool,
}

impl<C: Context> Plum8<C> {
    /// A machine with the default call stack capacity.
    pub fn new(ctx: C) -> Self {
        Self::with_stack(ctx)
    }
}

impl<C: Context, const STACK: usize> Plum8<C, STACK> {
    /// A machine with a caller-chosen call stack capacity.
    pub fn with_stack(ctx: C) -> Self {
        Self {
            ctx,
            memory: [0; MEMORY_SIZE],
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            pc_increment: 0,
            stack: heapless::Vec::new(),
            frame: Frame::new(),
            delay: DelayTimer::new(),
            keys: [false; 16],
            rng: rand::thread_rng(),
            paused: false,
            pending_key: None,
            ready: false,
            halted: false,
        }
    }

    /// Load the fontset at address 0 and mark the machine ready to run.
    ///
    /// `fontset` is a base64 blob, usually straight from the host's
    /// settings. An absent or malformed blob falls back to the builtin
    /// font, as does one too large for memory.
    pub fn initialize(&mut self, fontset: Option<&str>) {
        let font = font::decode_fontset(fontset);
        if self.load_at(0, &font).is_err() {
            warn!("fontset does not fit in memory, using the default one");
            // the builtin font is 80 bytes and always fits
            let _ = self.load_at(0, &font::decode_fontset(None));
        }
        self.ready = true;
    }

    /// Copy a program into memory at [`PROGRAM_START`].
    pub fn load(&mut self, program: &[u8]) -> Result<(), Fault> {
        self.load_at(PROGRAM_START, program)
    }

    /// Copy bytes into memory at an arbitrary address.
    pub fn load_at(&mut self, addr: u16, data: &[u8]) -> Result<(), Fault> {
        let start = addr as usize;
        let end = start
            .checked_add(data.len())
            .filter(|&end| end <= MEMORY_SIZE)
            .ok_or(Fault::Memory)?;
        self.memory[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Fetch and execute the instruction under the program counter.
    ///
    /// Returns `Ok(true)` while the machine has more to do, `Ok(false)`
    /// once it halted or the program counter ran past the end of memory.
    /// While paused on a key wait this is a no-op reporting `Ok(true)`.
    pub fn step(&mut self) -> Result<bool, Fault> {
        if !self.ready {
            return Err(self.fail(Fault::Uninitialized));
        }
        if self.halted {
            return Ok(false);
        }
        if self.paused {
            return Ok(true);
        }
        let pc = self.pc as usize;
        if pc >= MEMORY_SIZE {
            info!("program counter reached the end of memory, stopping");
            return Ok(false);
        }
        if pc + 1 >= MEMORY_SIZE {
            return Err(self.fail(Fault::Memory));
        }
        let raw = u16::from_be_bytes([self.memory[pc], self.memory[pc + 1]]);
        self.execute(raw)?;
        Ok(!self.halted)
    }

    /// Execute a single raw instruction.
    ///
    /// Unrecognized instructions are skipped with a warning, except the
    /// all-zero word which is treated as silent padding.
    pub fn execute(&mut self, raw: u16) -> Result<(), Fault> {
        if !self.ready {
            return Err(self.fail(Fault::Uninitialized));
        }
        self.pc_increment = 2;
        match OpCode::decode(raw) {
            Some(op) => {
                trace!("{:#06x} | {:?}", raw, op);
                if let Err(fault) = self.dispatch(op) {
                    return Err(self.fail(fault));
                }
            }
            None if raw == 0 => (),
            None => warn!("unrecognized opcode {:#06x}, skipping", raw),
        }
        self.pc = self.pc.wrapping_add(self.pc_increment);
        Ok(())
    }

    #[rustfmt::skip]
    fn dispatch(&mut self, op: OpCode) -> Result<(), Fault> {
        use OpCode::*;
        match op {
            _00E0             => self.clear_screen(),
            _00EE             => self.return_from_call()?,
            _0FFF             => self.halt(),
            _1NNN { nnn }     => self.jump_to(nnn),
            _2NNN { nnn }     => self.call(nnn)?,
            _3XNN { x, nn }   => self.skip_if(self.v[x as usize] == nn),
            _4XNN { x, nn }   => self.skip_if(self.v[x as usize] != nn),
            _5XY0 { x, y }    => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            _6XNN { x, nn }   => self.v[x as usize] = nn,
            _7XNN { x, nn }   => self.v[x as usize] = self.v[x as usize].wrapping_add(nn),
            _8XY0 { x, y }    => self.v[x as usize] = self.v[y as usize],
            _8XY1 { x, y }    => self.v[x as usize] |= self.v[y as usize],
            _8XY2 { x, y }    => self.v[x as usize] &= self.v[y as usize],
            _8XY3 { x, y }    => self.v[x as usize] ^= self.v[y as usize],
            _8XY4 { x, y }    => self.add_with_carry(x as usize, y as usize),
            _8XY5 { x, y }    => self.sub_reporting_borrow(x as usize, self.v[x as usize], self.v[y as usize]),
            _8XY6 { x, .. }   => self.shift_right(x as usize),
            _8XY7 { x, y }    => self.sub_reporting_borrow(x as usize, self.v[y as usize], self.v[x as usize]),
            _8XYE { x, .. }   => self.shift_left(x as usize),
            _9XY0 { x, y }    => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            _ANNN { nnn }     => self.i = nnn,
            _BNNN { nnn }     => self.jump_to(nnn + self.v[0] as u16),
            _CXNN { x, nn }   => self.v[x as usize] = self.rng.gen::<u8>() & nn,
            _DXYN { x, y, n } => self.draw_sprite(x, y, n)?,
            _EX9E { x }       => self.skip_if_key(x, true)?,
            _EXA1 { x }       => self.skip_if_key(x, false)?,
            _FX07 { x }       => self.v[x as usize] = self.delay.load(),
            _FX0A { x }       => self.wait_for_key(x),
            _FX15 { x }       => self.delay.store(self.v[x as usize]),
            _FX1E { x }       => self.i = self.i.wrapping_add(self.v[x as usize] as u16),
            _FX29 { x }       => self.i = font::GLYPH_LEN * self.v[x as usize] as u16,
            _FX33 { x }       => self.store_bcd(x)?,
            _FX55 { x }       => self.store_registers(x)?,
            _FX65 { x }       => self.load_registers(x)?,
        }
        Ok(())
    }

    fn clear_screen(&mut self) {
        self.frame.clear();
        self.ctx.clear();
    }

    fn halt(&mut self) {
        self.halted = true;
        self.ctx.halt();
    }

    fn jump_to(&mut self, addr: u16) {
        self.pc = addr;
        self.pc_increment = 0;
    }

    fn call(&mut self, addr: u16) -> Result<(), Fault> {
        self.stack.push(self.pc).map_err(|_| Fault::StackOverflow)?;
        self.jump_to(addr);
        Ok(())
    }

    // the return address on the stack is the address of the call
    // instruction, so the pending increment lands on the one after it
    fn return_from_call(&mut self) -> Result<(), Fault> {
        self.pc = self.stack.pop().ok_or(Fault::StackUnderflow)?;
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc_increment = 4;
        }
    }

    fn add_with_carry(&mut self, x: usize, y: usize) {
        let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[x] = sum;
        self.v[0xF] = carry as u8;
    }

    // the flag clears only when the minuend is strictly greater, equal
    // operands report a borrow
    fn sub_reporting_borrow(&mut self, x: usize, minuend: u8, subtrahend: u8) {
        self.v[x] = minuend.wrapping_sub(subtrahend);
        self.v[0xF] = if minuend > subtrahend { 0 } else { 1 };
    }

    fn shift_right(&mut self, x: usize) {
        self.v[0xF] = self.v[x] & 0x1;
        self.v[x] >>= 1;
    }

    fn shift_left(&mut self, x: usize) {
        self.v[0xF] = self.v[x] >> 7;
        self.v[x] <<= 1;
    }

    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) -> Result<(), Fault> {
        let start = self.i as usize;
        let end = start + n as usize;
        if end > MEMORY_SIZE {
            return Err(Fault::Dispatch);
        }
        let Self {
            ctx,
            memory,
            frame,
            v,
            ..
        } = self;
        let collision = ctx.draw(v[x as usize], v[y as usize], n, &memory[start..end], frame);
        self.v[0xF] = collision as u8;
        Ok(())
    }

    fn skip_if_key(&mut self, x: u8, pressed: bool) -> Result<(), Fault> {
        let key = self.v[x as usize] as usize;
        let state = *self.keys.get(key).ok_or(Fault::Dispatch)?;
        self.skip_if(state == pressed);
        Ok(())
    }

    fn wait_for_key(&mut self, x: u8) {
        self.paused = true;
        self.pending_key = Some(x as usize);
    }

    fn store_bcd(&mut self, x: u8) -> Result<(), Fault> {
        let i = self.i as usize;
        if i + 2 >= MEMORY_SIZE {
            return Err(Fault::Dispatch);
        }
        let value = self.v[x as usize];
        self.memory[i] = value / 100;
        self.memory[i + 1] = value / 10 % 10;
        self.memory[i + 2] = value % 10;
        Ok(())
    }

    fn store_registers(&mut self, x: u8) -> Result<(), Fault> {
        let i = self.i as usize;
        let count = x as usize + 1;
        if i + count > MEMORY_SIZE {
            return Err(Fault::Dispatch);
        }
        self.memory[i..i + count].copy_from_slice(&self.v[..count]);
        Ok(())
    }

    fn load_registers(&mut self, x: u8) -> Result<(), Fault> {
        let i = self.i as usize;
        let count = x as usize + 1;
        if i + count > MEMORY_SIZE {
            return Err(Fault::Dispatch);
        }
        self.v[..count].copy_from_slice(&self.memory[i..i + count]);
        Ok(())
    }

    /// Account for wall-clock time elapsed since the previous call,
    /// driving the 60 Hz delay timer.
    pub fn tick_timer(&mut self, elapsed_ms: f32) {
        self.delay.add_time(elapsed_ms);
    }

    /// Mirror the state of one of the 16 keys into the machine.
    ///
    /// A key press also resolves a pending `FX0A` wait through
    /// [`Plum8::resolve_key_wait`].
    pub fn set_key_state(&mut self, key: u8, pressed: bool) {
        if key as usize >= self.keys.len() {
            warn!("key {} out of range, ignoring", key);
            return;
        }
        self.keys[key as usize] = pressed;
        if pressed {
            self.resolve_key_wait(key);
        }
    }

    /// Resolve a pending `FX0A` wait: the key value lands in the waiting
    /// register and execution resumes.
    ///
    /// Does nothing while no wait is pending, and leaves the keyboard
    /// snapshot untouched either way.
    pub fn resolve_key_wait(&mut self, key: u8) {
        if let Some(reg) = self.pending_key.take() {
            self.v[reg] = key;
            self.paused = false;
        }
    }

    /// Render the full machine state, one variable per line.
    ///
    /// This is what lands in the log when the machine faults, and hosts
    /// may expose it as a debugging aid.
    pub fn dump_state(&self) -> String {
        let separator = "-".repeat(50);
        let mut out = String::new();
        out.push_str(&separator);
        out.push('\n');
        out.push_str(&format!("I  = {:#06x}\n", self.i));
        out.push_str(&format!("PC = {:#06x}\n", self.pc));
        out.push_str(&separator);
        out.push('\n');
        for (n, value) in self.v.iter().enumerate() {
            out.push_str(&format!("V[{}] = {:#04x}\n", n, value));
        }
        out.push_str(&separator);
        out.push('\n');
        let frames: Vec<String> = self
            .stack
            .iter()
            .map(|addr| format!("{:#06x}", addr))
            .collect();
        out.push_str(&format!("stack = [{}]\n", frames.join(", ")));
        out.push_str(&separator);
        out.push('\n');
        out.push_str(&self.frame.to_string());
        out.push_str(&separator);
        out
    }

    fn fail(&mut self, fault: Fault) -> Fault {
        error!("{}", fault);
        for line in self.dump_state().lines() {
            info!("{}", line);
        }
        self.ctx.close(fault.exit_code());
        fault
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }
}

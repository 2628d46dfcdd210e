//! A CHIP-8 virtual machine core.
//!
//! The crate owns the whole machine state (memory, registers, call stack,
//! framebuffer, delay timer, keyboard snapshot) and executes one
//! instruction per [`Plum8::step`] call. Everything the machine cannot do
//! by itself - clearing a screen, compositing a sprite, shutting the
//! process down - goes through the [`Context`] trait supplied by the
//! embedding host at construction.
//!
//! The host drives the loop: typically N steps per display frame, a
//! [`Plum8::tick_timer`] call with the elapsed milliseconds, and a
//! keyboard refresh via [`Plum8::set_key_state`] in between.

pub mod builder;
pub mod context;
pub mod error;
pub mod font;
pub mod frame;
pub mod opcode;
pub mod plum;
pub mod timer;

pub use builder::Builder;
pub use context::Context;
pub use error::Fault;
pub use frame::Frame;
pub use opcode::OpCode;
pub use plum::Plum8;

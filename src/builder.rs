//! Chained construction of a ready-to-run machine.

use crate::context::Context;
use crate::plum::Plum8;

/// Builder gathering everything a machine needs before its first step.
///
/// The context is mandatory, the fontset and the program are optional:
/// a missing fontset falls back to the builtin one and a missing program
/// leaves memory above the font zeroed.
///
/// ```no_run
/// use plum8::{Builder, Context};
///
/// struct Host;
/// impl Context for Host {}
///
/// let mut plum = Builder::new()
///     .with_context(Host)
///     .with_program(&[0x61, 0x37])
///     .build()
///     .unwrap();
/// while plum.step().unwrap() {}
/// ```
pub struct Builder<'a, C: Context> {
    context: Option<C>,
    fontset: Option<&'a str>,
    program: Option<&'a [u8]>,
}

impl<'a, C: Context> Builder<'a, C> {
    pub fn new() -> Self {
        Self {
            context: None,
            fontset: None,
            program: None,
        }
    }

    pub fn with_context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// A base64-encoded fontset to load instead of the builtin one.
    pub fn with_fontset(mut self, fontset: &'a str) -> Self {
        self.fontset = Some(fontset);
        self
    }

    pub fn with_program(mut self, program: &'a [u8]) -> Self {
        self.program = Some(program);
        self
    }

    pub fn build(self) -> Result<Plum8<C>, &'static str> {
        let context = self.context.ok_or("Context not provided")?;
        let mut plum = Plum8::new(context);
        plum.initialize(self.fontset);
        if let Some(program) = self.program {
            plum.load(program)
                .map_err(|_| "Program does not fit in memory")?;
        }
        Ok(plum)
    }
}

impl<'a, C: Context> Default for Builder<'a, C> {
    fn default() -> Self {
        Self::new()
    }
}

//! Hooks into the platform that the machine is embedded in.
//!
//! The core calls into these synchronously and resumes when they return.
//! Every hook has a default stub that only logs a warning, so a host can
//! implement exactly the surface it cares about.

use log::warn;

use crate::frame::Frame;

/// Trait aggregating the host-side functionalities.
///
/// An implementation is injected at construction and owned by the machine
/// for its whole lifetime.
pub trait Context {
    /// The screen should be cleared.
    ///
    /// Called on `00E0`, after the core has already cleared its own
    /// framebuffer.
    fn clear(&mut self) {
        warn!("clear | external function not implemented");
    }

    /// A sprite should be composited at (x, y).
    ///
    /// Called on `DXYN` with the registers already resolved and `sprite`
    /// holding the `height` rows fetched from memory at `I`. The host owns
    /// the pixel XOR, the edge wraparound and the collision verdict -
    /// usually by delegating to [`Frame::draw_sprite`] - and the returned
    /// flag is written back to `VF` by the core.
    fn draw(&mut self, x: u8, y: u8, height: u8, sprite: &[u8], frame: &mut Frame) -> bool {
        let _ = (x, y, height, sprite, frame);
        warn!("draw | external function not implemented");
        false
    }

    /// The program executed the halt instruction `0FFF`.
    fn halt(&mut self) {
        warn!("halt | external function not implemented");
    }

    /// The machine is shutting down, fatally or not.
    ///
    /// `exit_code` is 0 for a host-initiated stop and the documented
    /// negative code of the [`Fault`](crate::Fault) otherwise.
    fn close(&mut self, exit_code: i32) {
        warn!("close({}) | external function not implemented", exit_code);
    }
}

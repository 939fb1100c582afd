//! Per-command-list bookkeeping of instrumented calls awaiting resolution.
//!
//! Each call site owns a [`SLOT_WIDTH`]-bit slot of a 64-bit mask, at offset
//! `call_location * SLOT_WIDTH`. The low bits of a slot hold the
//! [`InvocationFlags`] of that call; the rest are reserved.

use hunt_core::{Invocation, InvocationFlags};

use crate::error::{PreviewError, PreviewResult};

/// Bits reserved per call site.
pub const SLOT_WIDTH: u32 = 4;

/// Number of call sites one mask can track.
pub const MAX_CALL_SITES: u32 = u64::BITS / SLOT_WIDTH;

const SLOT_MASK: u64 = (1 << SLOT_WIDTH) - 1;

/// Which (call site, stage) pairs are still outstanding this recording pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingInvocationSet {
    mask: u64,
}

fn slot_bits(invocation: &Invocation) -> Option<u64> {
    if invocation.call_location >= MAX_CALL_SITES {
        return None;
    }
    Some((invocation.flags.bits() & SLOT_MASK) << (invocation.call_location * SLOT_WIDTH))
}

impl PendingInvocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the invocation's stages as outstanding.
    pub fn register(&mut self, invocation: &Invocation) -> PreviewResult<()> {
        let bits = slot_bits(invocation)
            .ok_or(PreviewError::CallLocationOutOfRange(invocation.call_location))?;
        self.mask |= bits;
        Ok(())
    }

    /// Drop the invocation's stages. Out-of-range call sites were never
    /// registered, so there is nothing to clear for them.
    pub fn clear(&mut self, invocation: &Invocation) {
        if let Some(bits) = slot_bits(invocation) {
            self.mask &= !bits;
        }
    }

    /// Whether any of the invocation's stages are still outstanding.
    pub fn is_pending(&self, invocation: &Invocation) -> bool {
        slot_bits(invocation).is_some_and(|bits| self.mask & bits != 0)
    }

    /// Stages outstanding for one call site.
    pub fn pending_flags(&self, call_location: u32) -> InvocationFlags {
        if call_location >= MAX_CALL_SITES {
            return InvocationFlags::empty();
        }
        InvocationFlags::from_bits_truncate((self.mask >> (call_location * SLOT_WIDTH)) & SLOT_MASK)
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn bits(&self) -> u64 {
        self.mask
    }

    pub fn reset(&mut self) {
        self.mask = 0;
    }
}

//! Commission-error counting

use crate::error::PvtError;
use crate::input::{InputSource, Key};

/// Drain every key already buffered and return how many there were.
///
/// Drained keys are discarded, so a premature press can never be read later
/// as the response to the stimulus that follows. Never blocks: the first
/// empty poll ends the drain.
pub fn drain_commission_errors<I: InputSource + ?Sized>(input: &mut I) -> Result<u32, PvtError> {
    let mut count = 0;
    while input.poll()? {
        if input.read_key()? == Key::Interrupt {
            return Err(PvtError::Interrupted);
        }
        count += 1;
    }
    if count > 0 {
        log::debug!("drained {} premature keypress(es)", count);
    }
    Ok(count)
}

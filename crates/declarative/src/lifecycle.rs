//! Create sequences with drop-on-failure rollback.

use std::fmt;

/// Run `create`, then `secondary`; if `secondary` fails, run `drop`.
///
/// A failing `create` is returned as-is with no rollback. When `secondary`
/// fails the primary object is dropped once and the secondary error is
/// returned; a failing drop is logged and never replaces that error.
pub fn create_with_rollback<E, D>(
    create: impl FnOnce() -> Result<(), E>,
    secondary: impl FnOnce() -> Result<(), E>,
    drop: impl FnOnce() -> Result<(), D>,
) -> Result<(), E>
where
    E: fmt::Display,
    D: fmt::Display,
{
    create()?;

    if let Err(err) = secondary() {
        log::info!("rolling back after failed create step: {err}");
        if let Err(drop_err) = drop() {
            log::warn!("rollback drop failed: {drop_err}");
        }
        return Err(err);
    }

    Ok(())
}

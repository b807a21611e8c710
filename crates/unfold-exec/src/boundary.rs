//! Request boundary.
//!
//! A placeholder's evaluation trap unwinds instead of returning an error so
//! that no operator-level error handling can absorb it. This is the one place
//! it is caught: the request is aborted with `ExecError::Programming`. Any
//! other panic keeps unwinding.
//!
//! The process panic hook is wrapped once so a trapped placeholder is reported
//! through `tracing` only; every other panic still reaches the previous hook.

use std::any::Any;
use std::panic::{self, catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::Once;

use tracing::error;

use unfold_core::error::ProgrammingError;

use crate::runtime::ExecError;

static QUIET_TRAP_HOOK: Once = Once::new();

fn is_trap(payload: &(dyn Any + Send)) -> bool {
    payload.is::<ProgrammingError>()
}

fn install_quiet_trap_hook() {
    QUIET_TRAP_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !is_trap(info.payload()) {
                previous(info);
            }
        }));
    });
}

pub fn guard_request<T, F>(request: F) -> Result<T, ExecError>
where
    F: FnOnce() -> Result<T, ExecError>,
{
    install_quiet_trap_hook();
    match catch_unwind(AssertUnwindSafe(request)) {
        Ok(result) => result,
        Err(payload) => match ProgrammingError::from_panic(payload) {
            Ok(e) => {
                error!(kind = %e.kind, position = ?e.position, "request aborted: {e}");
                Err(ExecError::Programming(e))
            }
            Err(other) => resume_unwind(other),
        },
    }
}

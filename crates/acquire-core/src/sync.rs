//! Blocking wrappers over the poll protocol.

use crate::backend::{Backend, Progress};
use crate::error::{Error, Result};
use crate::handle::{Handle, Status};

/// Poll `handle` until it leaves [`Status::InProgress`].
///
/// Returns `Ok` for [`Status::Complete`] and a copy of the stored error
/// otherwise. The error on the handle is left as it is.
pub fn drive(handle: &mut Handle) -> Result<()> {
    drive_with(handle, |_| {})
}

/// Like [`drive`], calling `observe` after every poll.
pub fn drive_with<F>(handle: &mut Handle, mut observe: F) -> Result<()>
where
    F: FnMut(&Handle),
{
    loop {
        let status = handle.poll();
        observe(handle);
        if status != Status::InProgress {
            break;
        }
        std::thread::yield_now();
    }

    match handle.status() {
        Status::Complete => Ok(()),
        Status::Idle => Err(Error::invalid_argument("handle was never started")),
        Status::Error | Status::InProgress => Err(handle
            .error()
            .unwrap_or_else(|| Error::new(handle.error_code(), handle.error_message()))),
    }
}

/// Start an operation and drive it to a terminal state.
pub fn run<F>(handle: &mut Handle, start: F) -> Result<()>
where
    F: FnOnce(&mut Progress) -> Result<Box<dyn Backend>>,
{
    handle.start(start)?;
    drive(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Step;
    use crate::error::ErrorCode;

    struct Ticks(u32);

    impl Backend for Ticks {
        fn name(&self) -> &'static str {
            "ticks"
        }

        fn poll(&mut self, progress: &mut Progress) -> Result<Step> {
            progress.advance(1);
            self.0 -= 1;
            Ok(if self.0 == 0 { Step::Done } else { Step::Pending })
        }
    }

    struct Broken;

    impl Backend for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn poll(&mut self, _progress: &mut Progress) -> Result<Step> {
            Err(Error::new(ErrorCode::NetworkFailure, "connection reset"))
        }
    }

    #[test]
    fn run_reaches_complete() {
        let mut handle = Handle::new();
        let mut observed = 0;
        handle.start(|_| Ok(Box::new(Ticks(4)) as Box<dyn Backend>)).unwrap();
        drive_with(&mut handle, |_| observed += 1).unwrap();
        assert_eq!(observed, 4);
        assert_eq!(handle.status(), Status::Complete);
        assert_eq!(handle.bytes_processed(), 4);
    }

    #[test]
    fn run_returns_stored_error() {
        let mut handle = Handle::new();
        let err = run(&mut handle, |_| Ok(Box::new(Broken) as Box<dyn Backend>)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NetworkFailure);
        assert_eq!(handle.error_code(), ErrorCode::NetworkFailure);
        assert_eq!(handle.error_message(), "connection reset");
    }

    #[test]
    fn driving_an_idle_handle_fails() {
        let mut handle = Handle::new();
        let err = drive(&mut handle).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(handle.status(), Status::Idle);
    }
}

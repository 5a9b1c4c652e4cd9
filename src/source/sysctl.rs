//! Native source backed by `sysctl(KERN_PROCARGS2)`.

use std::ptr;

use libc::{c_int, c_uint, c_void};

use crate::error::RawSignal;
use crate::options::{Pid, RetrievalOptions};
use crate::source::{procargs, Acquired, ArgumentSource, BoundedBuffer, PointerTable};

/// Reads argument regions straight from the kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysctlSource;

impl SysctlSource {
    pub fn new() -> Self {
        Self
    }

    /// Largest argument region the kernel will hand out.
    fn arg_max() -> Result<usize, RawSignal> {
        let mut mib: [c_int; 2] = [libc::CTL_KERN, libc::KERN_ARGMAX];
        let mut arg_max: c_int = 0;
        let mut len = std::mem::size_of::<c_int>();
        let rc = unsafe {
            libc::sysctl(
                mib.as_mut_ptr(),
                mib.len() as c_uint,
                (&mut arg_max as *mut c_int).cast::<c_void>(),
                &mut len,
                ptr::null_mut(),
                0,
            )
        };
        if rc != 0 {
            return Err(RawSignal::last_os_error());
        }
        usize::try_from(arg_max).map_err(|_| RawSignal::malformed())
    }

    fn copy_region(pid: Pid) -> Result<Vec<u8>, RawSignal> {
        // pid 0 is kernel_task; its arguments are never readable.
        if pid == 0 {
            return Err(RawSignal::permission_denied());
        }
        let pid = libc::pid_t::try_from(pid).map_err(|_| RawSignal::no_such_process())?;

        let mut foreign_owner = false;
        if unsafe { libc::kill(pid, 0) } != 0 {
            let signal = RawSignal::last_os_error();
            if signal == RawSignal::no_such_process() {
                return Err(signal);
            }
            foreign_owner = signal == RawSignal::permission_denied();
        }

        let arg_max = Self::arg_max()?;
        let mut region = vec![0u8; arg_max];
        let mut len = arg_max;
        let mut mib: [c_int; 3] = [libc::CTL_KERN, libc::KERN_PROCARGS2, pid];
        let rc = unsafe {
            libc::sysctl(
                mib.as_mut_ptr(),
                mib.len() as c_uint,
                region.as_mut_ptr().cast::<c_void>(),
                &mut len,
                ptr::null_mut(),
                0,
            )
        };
        if rc != 0 {
            let signal = RawSignal::last_os_error();
            tracing::debug!(pid, %signal, "KERN_PROCARGS2 failed");
            // The kernel reports EINVAL for processes owned by someone else.
            if foreign_owner && signal == RawSignal::malformed() {
                return Err(RawSignal::permission_denied());
            }
            return Err(signal);
        }
        if len > arg_max {
            return Err(RawSignal::too_large());
        }

        region.truncate(len);
        tracing::debug!(pid, bytes = len, arg_max, "Copied argument region");
        Ok(region)
    }
}

impl ArgumentSource for SysctlSource {
    fn fetch_buffer(&self, options: &RetrievalOptions) -> Result<BoundedBuffer, RawSignal> {
        let region = Self::copy_region(options.pid)?;
        procargs::bounded_buffer(region, options.skip, options.substitute_terminators)
    }

    fn fetch_pointer_table(&self, pid: Pid) -> Result<PointerTable, RawSignal> {
        procargs::pointer_table(Self::copy_region(pid)?)
    }

    fn release(&self, acquired: Acquired) {
        tracing::trace!(bytes = acquired.len(), "Releasing argument region");
        drop(acquired);
    }
}

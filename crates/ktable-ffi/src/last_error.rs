//! Per-thread "last error" slot for the C boundary.
//!
//! A failed call returns a sentinel (the null handle) and leaves the
//! message here.  Each thread sees only its own failures, so two threads
//! connecting at once never read each other's messages.

use std::cell::RefCell;
use std::error::Error;
use std::ffi::c_char;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Records `err` and its source chain as this thread's last error.
pub fn set(err: &dyn Error) {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Variants that interpolate their source already carry its text.
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    set_message(message);
}

/// Records a plain message as this thread's last error.
pub fn set_message(message: impl Into<String>) {
    let message = message.into().replace('\0', " ");
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

/// Clears this thread's last error.
pub fn clear() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Current message, if any.
pub fn get() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

/// Buffer size needed to hold the message plus its NUL, or 0 when empty.
pub fn required_len() -> usize {
    LAST_ERROR.with(|slot| slot.borrow().as_ref().map_or(0, |m| m.len() + 1))
}

/// Copies the message into `buf` as a NUL-terminated C string, truncating to
/// `len - 1` bytes.  Returns the number of bytes written excluding the NUL,
/// or -1 when there is no message or nothing can be written.
///
/// # Safety
///
/// `buf` must be null or valid for writes of `len` bytes.
pub unsafe fn copy_into(buf: *mut c_char, len: usize) -> isize {
    if buf.is_null() || len == 0 {
        return -1;
    }
    LAST_ERROR.with(|slot| {
        let slot = slot.borrow();
        let Some(message) = slot.as_deref() else {
            return -1;
        };
        let n = message.len().min(len - 1);
        // SAFETY: caller guarantees `buf` holds `len` bytes and `n < len`.
        unsafe {
            std::ptr::copy_nonoverlapping(message.as_ptr().cast::<c_char>(), buf, n);
            *buf.add(n) = 0;
        }
        n as isize
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

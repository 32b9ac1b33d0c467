//! C FFI bindings for growvec buffers.
//!
//! Buffers live behind opaque `u64` handles in a global slot+generation
//! table, tagged with their element [`DType`](growvec_core::DType) at
//! creation. Every entry point returns a [`GrowvecStatus`] code and is
//! wrapped in `ffi_guard!`, so a Rust panic never unwinds into C.
//!
//! `growvec_view` exports the valid prefix without copying. The exported
//! pointer stays valid until the next mutating call on the same handle
//! (`append`, `extend`, `reserve`, `consolidate`, `destroy`); the
//! `generation` field of [`GrowvecView`] changes whenever it is invalidated.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::os::raw::c_char;

thread_local! {
    /// Message of the most recent panic caught by `ffi_guard!` on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Run an FFI body, converting any panic into `GrowvecStatus::Panicked`.
///
/// The body is a closure returning `i32`; `return` inside it returns the
/// status code.
macro_rules! ffi_guard {
    ($body:block) => {{
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(payload) => {
                let msg = $crate::panic_message(payload.as_ref());
                ::log::error!("panic caught at growvec FFI boundary: {msg}");
                $crate::LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
                $crate::status::GrowvecStatus::Panicked as i32
            }
        }
    }};
}

/// Lock a mutex inside `ffi_guard!`, returning `InternalError` if poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::GrowvecStatus::InternalError as i32,
        }
    };
}

mod any;
pub mod buffer;
mod handle;
pub mod status;
pub mod types;

pub use buffer::{
    growvec_append, growvec_capacity_get, growvec_consolidate, growvec_create,
    growvec_create_with_config, growvec_destroy, growvec_dtype_get, growvec_extend,
    growvec_generation_get, growvec_read, growvec_reserve, growvec_size_get, growvec_view,
};
pub use status::GrowvecStatus;
pub use types::{GrowvecConfig, GrowvecDType, GrowvecView};

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

/// Copy the last caught panic message for this thread into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator),
/// whether or not it fit. When `buf` is non-null and `cap > 0`, writes at
/// most `cap - 1` bytes followed by a NUL. Pass a null `buf` to query the
/// length. Returns 0 if no panic has been recorded.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let bytes = msg.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: caller guarantees `buf` points to `cap` writable bytes
            // and `n + 1 <= cap`.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        i32::try_from(bytes.len()).unwrap_or(i32::MAX)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::GrowvecStatus;

    #[test]
    fn guard_passes_through_status() {
        let status = ffi_guard!({ GrowvecStatus::BufferTooSmall as i32 });
        assert_eq!(status, GrowvecStatus::BufferTooSmall as i32);
    }

    #[test]
    fn guard_catches_panic_and_records_message() {
        LAST_PANIC.with(|cell| cell.borrow_mut().clear());

        let status = ffi_guard!({
            panic!("deliberate panic in guarded body");
        });
        assert_eq!(status, GrowvecStatus::Panicked as i32);

        let len = growvec_last_panic_message(std::ptr::null_mut(), 0);
        assert!(len > 0);

        let mut buf = vec![0u8; len as usize + 1];
        let len2 = growvec_last_panic_message(buf.as_mut_ptr().cast::<c_char>(), buf.len());
        assert_eq!(len, len2);
        let msg = std::str::from_utf8(&buf[..len2 as usize]).unwrap();
        assert!(msg.contains("deliberate panic in guarded body"), "{msg:?}");
        assert_eq!(buf[len2 as usize], 0);
    }

    #[test]
    fn truncated_message_is_nul_terminated() {
        LAST_PANIC.with(|cell| *cell.borrow_mut() = "abcdef".to_owned());
        let mut buf = [0xffu8; 4];
        let len = growvec_last_panic_message(buf.as_mut_ptr().cast::<c_char>(), buf.len());
        assert_eq!(len, 6);
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn no_panic_recorded_returns_zero() {
        LAST_PANIC.with(|cell| cell.borrow_mut().clear());
        assert_eq!(growvec_last_panic_message(std::ptr::null_mut(), 0), 0);
    }

    #[test]
    fn panic_message_handles_payload_kinds() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}

//! Buffer lifecycle FFI: create, mutate, query, view, read, destroy.
//!
//! All buffers share one global handle table. Each call holds the table
//! lock for its whole duration, so operations on different handles are
//! serialised but never observe a half-grown buffer.

use std::ffi::c_void;
use std::sync::Mutex;

use growvec_core::{BufferConfig, DType};
use log::trace;

use crate::any::AnyBuffer;
use crate::handle::HandleTable;
use crate::status::GrowvecStatus;
use crate::types::{GrowvecConfig, GrowvecView};

static BUFFERS: Mutex<HandleTable<AnyBuffer>> = Mutex::new(HandleTable::new());

#[allow(unsafe_code)]
fn create(config: &GrowvecConfig, out: *mut u64) -> i32 {
    let dtype = match DType::from_code(config.dtype) {
        Some(d) => d,
        None => return GrowvecStatus::UnknownDType as i32,
    };
    let buf_config = BufferConfig::new(config.initial_size).with_reserve(config.reserve);
    let buf = match AnyBuffer::build(dtype, &buf_config) {
        Ok(b) => b,
        Err(e) => return GrowvecStatus::from(&e) as i32,
    };
    let handle = ffi_lock!(BUFFERS).insert(buf);
    trace!(
        "created {dtype} buffer {handle:#x} (size {}, capacity {})",
        config.initial_size,
        buf_config.capacity()
    );
    // SAFETY: out is non-null and valid per caller contract.
    unsafe { *out = handle };
    GrowvecStatus::Ok as i32
}

/// Create a buffer of `initial_size` zeroed elements of type `dtype`.
///
/// On success, writes the handle to `out` and returns `GROWVEC_STATUS_OK`.
/// Returns `UnknownDType` for an unrecognised dtype code.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_create(dtype: i32, initial_size: usize, out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return GrowvecStatus::InvalidArgument as i32;
        }
        let config = GrowvecConfig {
            dtype,
            initial_size,
            reserve: 0,
        };
        create(&config, out)
    })
}

/// Create a buffer from a [`GrowvecConfig`], reserving capacity up front.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_create_with_config(config: *const GrowvecConfig, out: *mut u64) -> i32 {
    ffi_guard!({
        if config.is_null() || out.is_null() {
            return GrowvecStatus::InvalidArgument as i32;
        }
        // SAFETY: config is non-null and points to a valid GrowvecConfig.
        let config = unsafe { *config };
        create(&config, out)
    })
}

/// Destroy a buffer, releasing its storage. The handle becomes invalid.
///
/// Any view previously exported from it dangles after this call.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_destroy(handle: u64) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(BUFFERS);
        match table.remove(handle) {
            Some(buf) => {
                trace!(
                    "destroyed {} buffer {handle:#x} ({} live)",
                    buf.dtype(),
                    table.live()
                );
                GrowvecStatus::Ok as i32
            }
            None => GrowvecStatus::InvalidHandle as i32,
        }
    })
}

/// Append one element read from `value`.
///
/// `value` must point to one element of the buffer's dtype; it need not be
/// aligned.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_append(handle: u64, value: *const c_void) -> i32 {
    ffi_guard!({
        if value.is_null() {
            return GrowvecStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(BUFFERS);
        let buf = match table.get_mut(handle) {
            Some(b) => b,
            None => return GrowvecStatus::InvalidHandle as i32,
        };
        // SAFETY: value is non-null and points to one element per caller contract.
        GrowvecStatus::from(unsafe { buf.append_raw(value) }) as i32
    })
}

/// Append `count` contiguous elements starting at `values`.
///
/// `values` must be aligned for the buffer's dtype and must not point into
/// the buffer's own storage. With `count == 0` it is not read and may be null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_extend(handle: u64, values: *const c_void, count: usize) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(BUFFERS);
        let buf = match table.get_mut(handle) {
            Some(b) => b,
            None => return GrowvecStatus::InvalidHandle as i32,
        };
        // SAFETY: values points to count elements per caller contract.
        unsafe { buf.extend_raw(values, count) as i32 }
    })
}

/// Ensure capacity is at least `capacity`. Never shrinks, never changes size.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_reserve(handle: u64, capacity: usize) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(BUFFERS);
        match table.get_mut(handle) {
            Some(buf) => GrowvecStatus::from(buf.reserve(capacity)) as i32,
            None => GrowvecStatus::InvalidHandle as i32,
        }
    })
}

/// Shrink capacity to exactly the current size.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_consolidate(handle: u64) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(BUFFERS);
        match table.get_mut(handle) {
            Some(buf) => GrowvecStatus::from(buf.consolidate()) as i32,
            None => GrowvecStatus::InvalidHandle as i32,
        }
    })
}

/// Write one property of a live buffer to `*out`.
///
/// `out` is left untouched on any error.
#[allow(unsafe_code)]
fn write_property<R>(handle: u64, out: *mut R, property: impl FnOnce(&AnyBuffer) -> R) -> i32 {
    if out.is_null() {
        return GrowvecStatus::InvalidArgument as i32;
    }
    let table = ffi_lock!(BUFFERS);
    let value = match table.get(handle) {
        Some(buf) => property(buf),
        None => return GrowvecStatus::InvalidHandle as i32,
    };
    // SAFETY: out is non-null and valid per caller contract.
    unsafe { *out = value };
    GrowvecStatus::Ok as i32
}

/// Number of valid elements.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_size_get(handle: u64, out: *mut usize) -> i32 {
    ffi_guard!({ write_property(handle, out, AnyBuffer::len) })
}

/// Number of elements the current storage can hold.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_capacity_get(handle: u64, out: *mut usize) -> i32 {
    ffi_guard!({ write_property(handle, out, AnyBuffer::capacity) })
}

/// Element type code of the buffer.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_dtype_get(handle: u64, out: *mut i32) -> i32 {
    ffi_guard!({ write_property(handle, out, |buf| buf.dtype().code()) })
}

/// Number of storage replacements so far.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_generation_get(handle: u64, out: *mut u64) -> i32 {
    ffi_guard!({ write_property(handle, out, AnyBuffer::generation) })
}

/// Export the valid prefix without copying.
///
/// The pointer in `*out` stays valid until the next mutating call on this
/// handle. Compare `generation` against `growvec_generation_get` to detect
/// a replaced storage block.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_view(handle: u64, out: *mut GrowvecView) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return GrowvecStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(BUFFERS);
        let view = match table.get_mut(handle) {
            Some(buf) => buf.view(),
            None => return GrowvecStatus::InvalidHandle as i32,
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = view };
        GrowvecStatus::Ok as i32
    })
}

/// Copy the valid prefix into `buf` as raw element bytes.
///
/// Returns `BufferTooSmall` if `buf_len_bytes` is below `size * itemsize`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growvec_read(handle: u64, buf: *mut c_void, buf_len_bytes: usize) -> i32 {
    ffi_guard!({
        if buf.is_null() {
            return GrowvecStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(BUFFERS);
        let view = match table.get_mut(handle) {
            Some(b) => b.view(),
            None => return GrowvecStatus::InvalidHandle as i32,
        };
        let nbytes = view.len * view.itemsize;
        if buf_len_bytes < nbytes {
            return GrowvecStatus::BufferTooSmall as i32;
        }
        // SAFETY: view.data covers nbytes initialised bytes while the table
        // lock is held; buf points to buf_len_bytes writable bytes.
        unsafe {
            std::ptr::copy_nonoverlapping(view.data.cast::<u8>(), buf.cast::<u8>(), nbytes);
        }
        GrowvecStatus::Ok as i32
    })
}

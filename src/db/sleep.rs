//! `SLEEP(seconds)` scalar function for SQLite.
//!
//! SQLite has no built-in way to stall a query, so time-based blind payloads
//! would be unobservable. The function is registered on every connection the
//! provider opens; it blocks the connection's worker thread only and returns `0`.

use libsqlite3_sys as ffi;
use sqlx::SqliteConnection;
use std::ffi::{CStr, c_int};
use std::ptr;
use std::thread;
use std::time::Duration;
use tracing::trace;

pub const SLEEP_FUNCTION: &CStr = c"SLEEP";

/// Result value returned to SQL once the delay elapsed.
pub const SLEEP_RESULT: c_int = 0;

/// Negative arguments sleep for zero time.
pub fn sleep_duration(seconds: i64) -> Duration {
    let millis = u64::try_from(seconds).unwrap_or(0).saturating_mul(1000);
    Duration::from_millis(millis)
}

unsafe extern "C" fn sleep_impl(
    ctx: *mut ffi::sqlite3_context,
    argc: c_int,
    argv: *mut *mut ffi::sqlite3_value,
) {
    // Text and real arguments are coerced by SQLite; NULL reads as 0.
    let seconds = if argc == 1 && !argv.is_null() {
        // SAFETY: SQLite passes `argc` valid value pointers in `argv` for the
        // duration of the call; `argc == 1` was checked.
        unsafe { ffi::sqlite3_value_int64(*argv) }
    } else {
        0
    };

    trace!(seconds, "SLEEP() invoked");
    thread::sleep(sleep_duration(seconds));

    // SAFETY: `ctx` is the live context SQLite handed to this invocation.
    unsafe { ffi::sqlite3_result_int(ctx, SLEEP_RESULT) };
}

/// Attach `SLEEP` to a live connection.
pub async fn register(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let mut handle = conn.lock_handle().await?;
    let db = handle.as_raw_handle().as_ptr();

    // SAFETY: `db` is the open handle kept locked by `handle` until return.
    // The name is a static C string, there is no user data to free, and
    // `sleep_impl` matches the xFunc signature.
    let rc = unsafe {
        ffi::sqlite3_create_function_v2(
            db,
            SLEEP_FUNCTION.as_ptr(),
            1,
            ffi::SQLITE_UTF8,
            ptr::null_mut(),
            Some(sleep_impl),
            None,
            None,
            None,
        )
    };

    if rc != ffi::SQLITE_OK {
        // SAFETY: `sqlite3_errmsg` returns a NUL-terminated string owned by
        // `db`, copied out before the handle is released.
        let msg = unsafe { CStr::from_ptr(ffi::sqlite3_errmsg(db)) }
            .to_string_lossy()
            .into_owned();
        return Err(sqlx::Error::Configuration(
            format!("registering SLEEP() failed (code {rc}): {msg}").into(),
        ));
    }
    Ok(())
}

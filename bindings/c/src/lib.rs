//! C ABI surface for dynamic loading (ctypes and friends).
//!
//! The calling convention follows the original shared-object plugin: the
//! return value of `Convert` is the error string (NULL on success) and the
//! encoded output is written through the final out-parameter. Strings handed
//! to the caller are allocated here and released with `Free`.

use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use reshape_core::{convert_bytes, version, ConvertOptions};

/// Convert `input` from `input_format` to `output_format`, optionally scoped
/// by the structural `input_path`/`output_path` (empty string = whole
/// document).
///
/// # Safety
///
/// All pointer arguments must be NUL-terminated strings or NULL; `output`
/// must be a valid location to store a pointer.
#[no_mangle]
pub unsafe extern "C" fn Convert(
    input: *const c_char,
    input_format: *const c_char,
    input_path: *const c_char,
    output_path: *const c_char,
    output_format: *const c_char,
    output: *mut *mut c_char,
) -> *mut c_char {
    let result = catch_unwind(AssertUnwindSafe(|| {
        convert_ffi(
            input,
            input_format,
            input_path,
            output_path,
            output_format,
            output,
        )
    }));
    match result {
        Ok(Ok(())) => ptr::null_mut(),
        Ok(Err(message)) => error_string(&message),
        Err(_) => error_string("internal panic"),
    }
}

/// Version of the underlying conversion library.
#[no_mangle]
pub extern "C" fn Version() -> *mut c_char {
    CString::new(version())
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Release a string previously returned by `Convert` or `Version`.
///
/// # Safety
///
/// `ptr` must be NULL or a pointer obtained from this library and not yet
/// freed.
#[no_mangle]
pub unsafe extern "C" fn Free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

unsafe fn convert_ffi(
    input: *const c_char,
    input_format: *const c_char,
    input_path: *const c_char,
    output_path: *const c_char,
    output_format: *const c_char,
    output: *mut *mut c_char,
) -> Result<(), String> {
    if output.is_null() {
        return Err("output pointer is null".to_string());
    }
    let input = required_bytes(input, "input")?;

    let mut options = ConvertOptions::new(
        required_str(input_format, "input format")?,
        required_str(output_format, "output format")?,
    );
    options.input_path = required_str(input_path, "input path")?.to_string();
    options.output_path = required_str(output_path, "output path")?.to_string();

    let converted = convert_bytes(input, &options).map_err(|err| err.to_string())?;
    let converted = CString::new(converted)
        .map_err(|_| "encode: output contains an interior nul byte".to_string())?;
    *output = converted.into_raw();
    Ok(())
}

unsafe fn required_bytes<'a>(ptr: *const c_char, what: &str) -> Result<&'a [u8], String> {
    if ptr.is_null() {
        return Err(format!("{what} pointer is null"));
    }
    Ok(CStr::from_ptr(ptr).to_bytes())
}

unsafe fn required_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    let bytes = required_bytes(ptr, what)?;
    std::str::from_utf8(bytes).map_err(|_| format!("{what} is not valid utf-8"))
}

fn error_string(message: &str) -> *mut c_char {
    CString::new(message.as_bytes())
        .unwrap_or_else(|_| CString::default())
        .into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(text: &str) -> CString {
        CString::new(text).unwrap()
    }

    unsafe fn take(ptr: *mut c_char) -> Option<String> {
        if ptr.is_null() {
            return None;
        }
        let text = CStr::from_ptr(ptr).to_string_lossy().into_owned();
        Free(ptr);
        Some(text)
    }

    #[test]
    fn converts_json_to_yaml() {
        let input = c(r#"{"a":"b","c":["d"]}"#);
        let mut output: *mut c_char = ptr::null_mut();
        let err = unsafe {
            Convert(
                input.as_ptr(),
                c("json").as_ptr(),
                c("").as_ptr(),
                c("").as_ptr(),
                c("yaml").as_ptr(),
                &mut output,
            )
        };
        assert!(err.is_null());
        let rendered = unsafe { take(output) }.unwrap();
        assert!(rendered.contains("a: b"));
        assert!(rendered.contains("- d"));
    }

    #[test]
    fn reports_errors_through_the_return_value() {
        let input = c("{}");
        let mut output: *mut c_char = ptr::null_mut();
        let err = unsafe {
            Convert(
                input.as_ptr(),
                c("bogus").as_ptr(),
                c("").as_ptr(),
                c("").as_ptr(),
                c("yaml").as_ptr(),
                &mut output,
            )
        };
        let message = unsafe { take(err) }.unwrap();
        assert_eq!(message, "unsupported format: bogus");
        assert!(output.is_null());
    }

    #[test]
    fn rejects_null_arguments() {
        let mut output: *mut c_char = ptr::null_mut();
        let err = unsafe {
            Convert(
                ptr::null(),
                c("json").as_ptr(),
                c("").as_ptr(),
                c("").as_ptr(),
                c("yaml").as_ptr(),
                &mut output,
            )
        };
        let message = unsafe { take(err) }.unwrap();
        assert!(message.contains("null"));
    }

    #[test]
    fn version_is_non_empty() {
        let ptr = Version();
        let text = unsafe { take(ptr) }.unwrap();
        assert!(!text.is_empty());
    }
}

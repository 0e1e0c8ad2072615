//! WebAssembly support glue. A Rust panic in WASM otherwise ends in a bare `abort`; routing it
//! through a panic hook surfaces the message in the browser console where it can be read.

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

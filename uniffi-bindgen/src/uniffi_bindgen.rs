//! Entrypoint for generating foreign-language bindings for AgeKit.

fn main() {
    uniffi::uniffi_bindgen_main();
}

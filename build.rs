fn main() {
    // The default pure-Rust encoder links nothing native.
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_LIBVIPS");
    if std::env::var_os("CARGO_FEATURE_LIBVIPS").is_some() {
        link_libvips();
    }
}

// ── libvips linking ──────────────────────────────────────────────────────────
//
// The libvips-rs bindings crate ships no build script of its own.
// We must tell cargo where to find the library on Linux and macOS.
//
// The VIPS_DIR environment variable points at an unpacked libvips
// distribution (with `lib/` inside) when it is not installed system-wide.
fn link_libvips() {
    // Re-run whenever the override env-var changes.
    println!("cargo:rerun-if-env-changed=VIPS_DIR");

    let lib_dir = std::env::var("VIPS_DIR")
        .ok()
        .map(|dir| std::path::Path::new(&dir).join("lib"));

    if let Some(lib_dir) = lib_dir.filter(|dir| dir.exists()) {
        println!("cargo:rustc-link-search=native={}", lib_dir.display());
    }
    // Linux: the system libvips-dev package is sufficient.
    println!("cargo:rustc-link-lib=dylib=vips");
    println!("cargo:rustc-link-lib=dylib=glib-2.0");
    println!("cargo:rustc-link-lib=dylib=gobject-2.0");
}

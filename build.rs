// Build script for vlc-bridge
// Compiles the C shim the stub engine uses to pass a real va_list

fn main() {
    cc::Build::new()
        .file("native/stub_log.c")
        .warnings(true)
        .compile("vlc_bridge_stub_log");

    println!("cargo:rerun-if-changed=native/stub_log.c");
}

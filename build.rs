// Copies the demo page in `static/` to `dist/` so `wasm-pack build --target web
// --out-dir dist/pkg` yields a servable site.
use std::{env, fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        println!("cargo:warning=build the bundle with `wasm-pack build --target web --out-dir dist/pkg`");
    }

    let out_dir = Path::new("dist");
    if let Err(err) = fs::create_dir_all(out_dir) {
        println!("cargo:warning=cannot create dist/: {err}");
        return;
    }

    let options = CopyOptions {
        overwrite: true,
        content_only: true,
        ..CopyOptions::new()
    };
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=copying static/ to dist/ failed: {err}");
    }
}

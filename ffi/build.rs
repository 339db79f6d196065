//! Generates `include/todo_view.h` from the `extern "C"` surface.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };
    let include_dir = crate_dir.join("include");
    if let Err(err) = std::fs::create_dir_all(&include_dir) {
        println!("cargo:warning=cannot create {}: {err}", include_dir.display());
        return;
    }
    let header = include_dir.join("todo_view.h");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("TODO_VIEW_H")
        .with_cpp_compat(true)
        .generate()
    {
        Ok(bindings) => {
            let mut source = Vec::new();
            bindings.write(&mut source);
            if let Err(err) = std::fs::write(&header, source) {
                println!("cargo:warning=cannot write {}: {err}", header.display());
            }
        }
        Err(err) => println!("cargo:warning=header not generated: {err}"),
    }
}

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };
    let include = crate_dir.join("include");
    if let Err(e) = std::fs::create_dir_all(&include) {
        println!("cargo:warning=cannot create {}: {e}", include.display());
        return;
    }
    let out = include.join("posts_ffi.h");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("POSTS_FFI_H")
        .generate()
    {
        Ok(bindings) => match std::fs::File::create(&out) {
            Ok(file) => bindings.write(file),
            Err(e) => println!("cargo:warning=cannot write {}: {e}", out.display()),
        },
        Err(e) => println!("cargo:warning=header not generated: {e}"),
    }
}

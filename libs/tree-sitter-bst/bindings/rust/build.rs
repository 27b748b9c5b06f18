use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=bindings/c/tree-sitter-bst.h");
    println!("cargo:rerun-if-changed=bindings/c/header_check.c");
    println!("cargo:rerun-if-changed=bindings/c/header_check.cpp");

    if std::env::var_os("CARGO_FEATURE_HEADER_CHECK").is_none() {
        return;
    }

    let c_dir = Path::new("bindings").join("c");
    cc::Build::new()
        .include(&c_dir)
        .file(c_dir.join("header_check.c"))
        .warnings(true)
        .compile("bst_header_check");

    if std::env::var_os("CARGO_FEATURE_CXX_HEADER_CHECK").is_some() {
        cc::Build::new()
            .cpp(true)
            .include(&c_dir)
            .file(c_dir.join("header_check.cpp"))
            .warnings(true)
            .compile("bst_header_check_cxx");
    }
}

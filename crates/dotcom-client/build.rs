fn main() {
    println!("cargo:rerun-if-changed=schemas/dotcom.graphql");

    cynic_codegen::register_schema("dotcom")
        .from_sdl_file("schemas/dotcom.graphql")
        .expect("dotcom schema should be readable")
        .as_default()
        .expect("dotcom schema should be valid");
}

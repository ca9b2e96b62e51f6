fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Server stubs for the AuthService contract shared with other services
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .compile(&["../proto/auth.proto"], &["../proto"])?;

    println!("cargo:rerun-if-changed=../proto/auth.proto");
    Ok(())
}

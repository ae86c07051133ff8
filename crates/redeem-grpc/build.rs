//! Build script for compiling the wallet service definition.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["../../proto/wallet.proto"], &["../../proto"])?;

    println!("cargo:rerun-if-changed=../../proto/wallet.proto");

    Ok(())
}

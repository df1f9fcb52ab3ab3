//! # Voxel Chunks Demo
//!
//! Builds a small column world, digs into it and logs the resulting meshes.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    match voxel_chunks::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            eprintln!("voxel-chunks: {}", error);
            ExitCode::FAILURE
        }
    }
}

// Browser-only wiring is compiled out on the host; the shared state and math
// modules are still built there for the server and for tests.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod carousel;
mod config;
mod contact;
mod content;
mod filter;
mod hero;
mod navigation;
mod stats;
mod telemetry;

#[cfg(not(target_arch = "wasm32"))]
mod backend;
#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    backend::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}

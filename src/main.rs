//! Data Plinko entry point
//!
//! In the browser this wires up the page. Natively it drops balls on an
//! in-memory board and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    data_plinko::page::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use data_plinko::consts::FRAME_MS;
    use data_plinko::sim::BucketColor;
    use data_plinko::surface::HeadlessBoard;
    use data_plinko::{Plinko, Settings};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("Data Plinko (native) starting...");
    log::info!("Browser mode requires the page markup - run with `trunk serve` for the web version");

    let settings = Settings::load();
    let clock_seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| settings.seed_or(clock_seed));

    let mut plinko = match Plinko::mount(
        HeadlessBoard::landing_page(),
        Pcg32::seed_from_u64(seed),
        data_plinko::PlinkoTuning::default(),
    ) {
        Ok(plinko) => plinko,
        Err(e) => {
            log::error!("Board could not be mounted: {}", e);
            return;
        }
    };

    // One simulated minute
    plinko.run_for(60_000.0, FRAME_MS);

    let stats = plinko.stats();
    println!("\nSeed {}: {} drops, {} settled, {} off board", seed, stats.drops, stats.settles, stats.off_board);
    let colors = plinko.bucket_colors();
    let row: Vec<&str> = (0..colors.len())
        .map(|i| match colors.get(i) {
            Some(BucketColor::Yellow) => "Y",
            _ => "W",
        })
        .collect();
    println!("Buckets: [{}]", row.join(" "));
}

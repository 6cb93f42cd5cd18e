extern crate oracle_server;

use std::thread;
use std::time::Duration;

const PORT: u16 = 20222;

fn main() {
    match oracle_server::start(PORT) {
        Ok(_listening) => {
            println!("Oracle server listening on http://localhost:{}", PORT);
            loop {
                thread::sleep(Duration::from_secs(60));
            }
        }
        Err(e) => {
            eprintln!("Failed to start oracle server: {}", e);
            std::process::exit(1);
        }
    }
}

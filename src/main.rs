use std::process;

fn main() {
    if let Err(err) = trainplay_lib::run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

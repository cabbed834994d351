pub fn run() {
    println!("swamp {}", env!("CARGO_PKG_VERSION"));
}

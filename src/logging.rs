use log::info;

/// Initialize the logger. Safe to call more than once.
pub fn init_logger() {
    if env_logger::try_init().is_ok() {
        info!("utxo-watch {} logging initialized", env!("CARGO_PKG_VERSION"));
    }
}

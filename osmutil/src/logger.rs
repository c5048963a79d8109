/// Intercept messages using the `log` crate and print them to STDERR. The level defaults to
/// `info` and can be overridden through `RUST_LOG`.
///
/// Calling this more than once is harmless; only the first call installs a logger.
pub fn setup() {
    use env_logger::{Builder, Env};

    let _ = Builder::from_env(Env::default().default_filter_or("info")).try_init();
}

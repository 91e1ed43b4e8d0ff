use log::LevelFilter;

pub fn setup_logging() {
    let _ = env_logger::builder()
        .filter_module("ibc-proof-query", LevelFilter::Info)
        .format_module_path(false)
        .is_test(cfg!(test))
        .try_init();
}

//! Browser logging
//!
//! Routes `tracing` events to the developer console and panics to
//! `console.error`.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the panic hook and console tracing subscriber once.
pub fn init_logging() {
    init_logging_with_level(tracing::Level::INFO);
}

/// Like [`init_logging`] with an explicit maximum level. Only the first call
/// takes effect.
pub fn init_logging_with_level(level: tracing::Level) {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default_with_config(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(level)
                .build(),
        );
        tracing::debug!(%level, "console logging initialized");
    });
}

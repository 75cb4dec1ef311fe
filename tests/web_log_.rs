use std::sync::Once;

static LOG_INIT: Once = Once::new();

pub fn init() {
	LOG_INIT.call_once(tracing_wasm::set_as_global_default);
}

// Line-delimited JSON-RPC bindings over stdin/stdout
pub mod handler;
pub mod protocol;

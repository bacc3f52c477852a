pub mod runtime;

pub use runtime::is_usable_java_binary;
pub use runtime::resolve_java_binary;

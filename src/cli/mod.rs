pub mod debug;
pub mod guard;
pub mod stop_once;
pub mod transcript;

pub mod feed_window;
pub mod neo_use_case;
pub mod ports;

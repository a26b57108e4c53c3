// Adapters layer: concrete implementations for external systems.
// Local storage lives with the CLI config in `config::cli`.

pub mod http;

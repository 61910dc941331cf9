/// String helpers: blank checks, case conversion, placeholder formatting,
/// random strings and regex validators.
pub mod strkit;

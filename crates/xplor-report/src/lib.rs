pub mod dot;
pub mod export;
pub mod json;
pub mod markdown;
pub mod text;

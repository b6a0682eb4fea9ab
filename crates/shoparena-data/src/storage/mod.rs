//! 저장소 백엔드.

pub mod memory;
pub mod postgres;
pub mod redis;

//! # Shoparena Core
//!
//! 마켓플레이스 API의 핵심 도메인 모델 및 협력자 인터페이스를 제공합니다.
//!
//! 이 크레이트는 API 서버와 저장소 구현이 공유하는 기본 타입을 정의합니다:
//! - 구매자/판매자 계정 및 인증된 주체(Principal)
//! - 라우트 접근 등급 (public / buyer / seller)
//! - 계정 저장소, 토큰 폐기 목록, 주체 조회 trait
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;

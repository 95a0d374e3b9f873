//! 레코드 타입 -- 서비스 응답 문서의 각 객체 군
//!
//! - [`knowledge_base`]: 취약점과 CVSS, 참조, 상관 정보
//! - [`map`]: 네트워크 맵과 옵션 프로필
//! - [`report`]: 리포트, 리포트 템플릿, 사용자
//! - [`scan`]: 스캔과 스캔 상태
//! - [`asset`]: 호스트와 자산 그룹
//! - [`response`]: 명령 응답
//! - [`common`]: 공용 텍스트 값과 날짜 헬퍼

pub mod asset;
pub mod common;
pub mod knowledge_base;
pub mod map;
pub mod report;
pub mod response;
pub mod scan;

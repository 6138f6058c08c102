/// 기능별 모듈
///
/// 각 기능 모듈은 모델, 데이터베이스 처리, 명령을 함께 묶은 단위다.
pub mod billing;
pub mod customers;
pub mod export;
pub mod reservations;
pub mod trash;
pub mod visits;

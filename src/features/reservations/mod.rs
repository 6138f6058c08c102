/// 호텔링 예약 기능 모듈
///
/// - 예약 생성, 수정, 소프트 삭제
/// - 날짜별 / 기간별 / 고객별 조회
pub mod commands;
pub mod models;
pub mod repository;

pub use models::{
    CreateReservationDto, Reservation, ReservationDetail, ReservationQuery, UpdateReservationDto,
};

pub use commands::{
    create_reservation, delete_reservation, get_customer_reservations, get_reservation,
    get_reservations, update_reservation,
};
